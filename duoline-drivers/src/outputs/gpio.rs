//! GPIO LED bank
//!
//! Eight (or fewer) push-pull pins showing one byte, bit 0 on the first pin.

use core::convert::Infallible;

use duoline_core::traits::OutputBank;
use embedded_hal::digital::{OutputPin, PinState};

/// Byte-wide output over individual GPIO pins
pub struct GpioBank<P, const N: usize> {
    pins: [P; N],
    value: u8,
}

impl<P, const N: usize> GpioBank<P, N>
where
    P: OutputPin<Error = Infallible>,
{
    /// Take ownership of the pins and drive them all low
    pub fn new(pins: [P; N]) -> Self {
        let mut bank = Self { pins, value: 0 };
        bank.write(0);
        bank
    }
}

impl<P, const N: usize> OutputBank for GpioBank<P, N>
where
    P: OutputPin<Error = Infallible>,
{
    fn write(&mut self, value: u8) {
        self.value = value;
        for (bit, pin) in self.pins.iter_mut().enumerate() {
            let on = bit < 8 && value & (1 << bit) != 0;
            // Infallible
            let _ = pin.set_state(PinState::from(on));
        }
    }

    fn value(&self) -> u8 {
        self.value
    }
}
