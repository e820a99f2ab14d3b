//! Applier task
//!
//! The single consumer: takes serial commands from the queue and HTTP
//! posts from the inbox, applies them and writes serial acknowledgments.

use defmt::*;
use duoline_core::{Applier, Origin};
use duoline_drivers::{GpioBank, Hd44780, Hd44780Error};
use duoline_protocol::Ack;
use embassy_futures::select::{select, Either};
use embassy_rp::gpio::Output;
use embassy_rp::i2c::{self, Async, I2c};
use embassy_rp::peripherals::I2C0;
use embassy_rp::uart::BufferedUartTx;
use embassy_time::Delay;
use embedded_io_async::Write;

use crate::channels::SERIAL_QUEUE;

/// LCD on I2C0
pub type Lcd = Hd44780<I2c<'static, I2C0, Async>, Delay>;

/// Applier with the RP2040 display, LED bank and timer
pub type FirmwareApplier = Applier<'static, Lcd, GpioBank<Output<'static>, 8>, Delay>;

#[embassy_executor::task]
pub async fn applier_task(mut applier: FirmwareApplier, mut tx: BufferedUartTx) {
    info!("Applier task started");

    let state = applier.state();

    loop {
        match select(SERIAL_QUEUE.dequeue(), state.wait_inbox()).await {
            Either::First(command) => {
                debug!("Applying {}", command);
                let applied = applier.apply(command, Origin::Serial).await;
                report_fault(applied.fault);
                if let Some(ack) = applied.ack {
                    send_ack(&mut tx, ack).await;
                }
            }
            Either::Second(()) => {
                let work = applier.drain_inbox().await;
                if let Some(led) = work.led {
                    debug!("LED bank set to {=u8:#04x}", led);
                }
                if let Some(text) = work.text {
                    debug!("HTTP text shown");
                    report_fault(text.fault);
                }
            }
        }
    }
}

fn report_fault(fault: Option<Hd44780Error<i2c::Error>>) {
    if let Some(e) = fault {
        warn!("Display write failed: {:?}", e);
    }
}

/// Write an acknowledgment line back to the sender
async fn send_ack(tx: &mut BufferedUartTx, ack: Ack) {
    let line = ack.to_line();
    if let Err(e) = tx.write_all(line.as_bytes()).await {
        warn!("Failed to send ack: {:?}", e);
    } else {
        trace!("Ack sent: {=str}", line.as_str());
    }
}
