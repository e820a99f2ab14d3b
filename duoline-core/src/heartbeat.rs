//! Heartbeat loop
//!
//! Runs beside the pipeline and shares nothing with it but GPIO. Each tick
//! drives the mirror output to the inverse of the mirror input; every Nth
//! tick it also pulses the strobe output. The tick period itself belongs
//! to the caller (a ticker in the firmware).

use embedded_hal::digital::{InputPin, OutputPin, PinState};
use embedded_hal_async::delay::DelayNs;

/// Which pin failed during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HeartbeatError {
    /// Reading the mirror input
    Input,
    /// Driving the mirror output
    Mirror,
    /// Driving the strobe output
    Strobe,
}

/// Tick counter deciding when to strobe
///
/// Counts from 1; the tick that sees the count at `every` strobes and
/// resets it to 1, so strobes are exactly `every` ticks apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Heartbeat {
    count: u32,
    every: u32,
}

impl Heartbeat {
    /// Counter strobing every `every` ticks (values below 1 act as 1)
    pub const fn new(every: u32) -> Self {
        Self {
            count: 1,
            every: if every == 0 { 1 } else { every },
        }
    }

    /// Advance one tick, returning true when this tick strobes
    pub fn tick(&mut self) -> bool {
        if self.count >= self.every {
            self.count = 1;
            true
        } else {
            self.count += 1;
            false
        }
    }

    /// Current count
    pub fn count(&self) -> u32 {
        self.count
    }
}

/// Mirror and strobe pins driven once per tick
pub struct HeartbeatLoop<I, M, S, Y> {
    input: I,
    mirror: M,
    strobe: S,
    delay: Y,
    counter: Heartbeat,
    strobe_pulse_ms: u32,
}

impl<I, M, S, Y> HeartbeatLoop<I, M, S, Y>
where
    I: InputPin,
    M: OutputPin,
    S: OutputPin,
    Y: DelayNs,
{
    pub fn new(input: I, mirror: M, strobe: S, delay: Y, every: u32, strobe_pulse_ms: u32) -> Self {
        Self {
            input,
            mirror,
            strobe,
            delay,
            counter: Heartbeat::new(every),
            strobe_pulse_ms,
        }
    }

    /// Run one tick; returns true if it strobed
    ///
    /// The mirror is updated before the strobe pulse, so a strobing tick
    /// takes the pulse width longer than a plain one.
    pub async fn tick(&mut self) -> Result<bool, HeartbeatError> {
        let level = self.input.is_high().map_err(|_| HeartbeatError::Input)?;
        self.mirror
            .set_state(PinState::from(!level))
            .map_err(|_| HeartbeatError::Mirror)?;

        if !self.counter.tick() {
            return Ok(false);
        }

        self.strobe.set_high().map_err(|_| HeartbeatError::Strobe)?;
        self.delay.delay_ms(self.strobe_pulse_ms).await;
        self.strobe.set_low().map_err(|_| HeartbeatError::Strobe)?;
        Ok(true)
    }

    /// Tick counter
    pub fn counter(&self) -> &Heartbeat {
        &self.counter
    }
}
