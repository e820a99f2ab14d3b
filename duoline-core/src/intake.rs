//! Serial intake
//!
//! After a wake the intake reads one burst from the UART, pulses the
//! handshake line, splits the burst into lines and queues every line that
//! decodes to a command.

use core::convert::Infallible;
use core::future::Future;
use core::pin::pin;

use duoline_protocol::{decode_line, split_lines};
use embassy_futures::select::{select, Either};
use embedded_hal::digital::OutputPin;
use embedded_hal_async::delay::DelayNs;
use embedded_io_async::Read;

use crate::queue::CommandQueue;

/// Largest burst taken in one read window
pub const BURST_CAPACITY: usize = 255;

/// Per-chunk dispatch counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IntakeStats {
    /// Lines that decoded and were queued
    pub accepted: usize,
    /// Lines that did not decode
    pub dropped: usize,
}

/// Read until `buf` is full or `deadline` completes
///
/// Returns the number of bytes read, which may be zero when the window
/// closes with nothing received. A read error ends the burst early and
/// is returned instead.
pub async fn read_burst<R, T>(reader: &mut R, buf: &mut [u8], deadline: T) -> Result<usize, R::Error>
where
    R: Read,
    T: Future<Output = ()>,
{
    let mut filled = 0;

    let result = {
        let fill = pin!(async {
            while filled < buf.len() {
                let n = reader.read(&mut buf[filled..]).await?;
                if n == 0 {
                    break;
                }
                filled += n;
            }
            Ok::<(), R::Error>(())
        });

        match select(fill, pin!(deadline)).await {
            Either::First(result) => result,
            Either::Second(()) => Ok(()),
        }
    };

    result.map(|()| filled)
}

/// Decode every line of `chunk` and queue the commands in order
///
/// Waits while the queue is full, so a burst never loses a decoded line.
pub async fn dispatch<const N: usize>(chunk: &[u8], queue: &CommandQueue<N>) -> IntakeStats {
    let mut stats = IntakeStats::default();

    for line in split_lines(chunk) {
        match decode_line(line) {
            Ok(command) => {
                queue.enqueue(command).await;
                stats.accepted += 1;
            }
            Err(_) => stats.dropped += 1,
        }
    }

    stats
}

/// One wake's worth of serial work: read, handshake, queue
pub struct Intake<R, H, Y> {
    reader: R,
    handshake: H,
    delay: Y,
    handshake_pulse_ms: u32,
    buf: [u8; BURST_CAPACITY],
    len: usize,
}

impl<R, H, Y> Intake<R, H, Y>
where
    R: Read,
    H: OutputPin<Error = Infallible>,
    Y: DelayNs,
{
    pub fn new(reader: R, handshake: H, delay: Y, handshake_pulse_ms: u32) -> Self {
        Self {
            reader,
            handshake,
            delay,
            handshake_pulse_ms,
            buf: [0; BURST_CAPACITY],
            len: 0,
        }
    }

    /// Read a burst until `window` closes, then pulse and queue it
    ///
    /// Returns `None` when nothing arrived; no pulse is sent then. The
    /// handshake pulse always completes before the first command is
    /// queued.
    pub async fn service<T, const N: usize>(
        &mut self,
        window: T,
        queue: &CommandQueue<N>,
    ) -> Result<Option<IntakeStats>, R::Error>
    where
        T: Future<Output = ()>,
    {
        self.len = 0;
        let len = read_burst(&mut self.reader, &mut self.buf, window).await?;
        if len == 0 {
            return Ok(None);
        }
        self.len = len;

        // Infallible
        let _ = self.handshake.set_high();
        self.delay.delay_ms(self.handshake_pulse_ms).await;
        let _ = self.handshake.set_low();

        Ok(Some(dispatch(&self.buf[..len], queue).await))
    }

    /// Bytes of the most recent non-empty burst, empty after a quiet window
    pub fn last_burst(&self) -> &[u8] {
        &self.buf[..self.len]
    }
}
