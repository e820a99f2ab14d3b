//! Serial intake task
//!
//! Sleeps on the wake signal, then lets the core [`Intake`] read one burst
//! from the UART, pulse the handshake line and queue the decoded commands.

use defmt::*;
use duoline_core::intake::Intake;
use embassy_rp::gpio::Output;
use embassy_rp::uart::BufferedUartRx;
use embassy_time::{Delay, Timer};

use crate::channels::{SERIAL_QUEUE, WAKE};

/// Intake on UART0 with the handshake pin
pub type FirmwareIntake = Intake<BufferedUartRx, Output<'static>, Delay>;

#[embassy_executor::task]
pub async fn intake_task(mut intake: FirmwareIntake, read_timeout_ms: u32) {
    info!("Intake task started");

    loop {
        WAKE.wait().await;

        let window = Timer::after_millis(u64::from(read_timeout_ms));
        let stats = match intake.service(window, &SERIAL_QUEUE).await {
            Ok(Some(stats)) => stats,
            Ok(None) => {
                // Startup edge or line noise
                trace!("Read window closed empty");
                continue;
            }
            Err(e) => {
                warn!("UART read failed: {:?}", e);
                continue;
            }
        };
        trace!("RX {=[u8]:a}", intake.last_burst());

        if stats.dropped > 0 {
            warn!("Ignored {} unrecognized line(s)", stats.dropped);
        }
        debug!(
            "Queued {} command(s), {} waiting",
            stats.accepted,
            SERIAL_QUEUE.len()
        );
    }
}
