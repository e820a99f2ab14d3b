//! Heartbeat task
//!
//! Mirrors the level input onto the mirror output every tick and pulses
//! the strobe output every Nth tick. Shares nothing with the pipeline.

use defmt::*;
use duoline_core::HeartbeatLoop;
use embassy_rp::gpio::{Input, Output};
use embassy_time::{Delay, Duration, Ticker};

/// Heartbeat loop on RP2040 pins
pub type FirmwareHeartbeat =
    HeartbeatLoop<Input<'static>, Output<'static>, Output<'static>, Delay>;

#[embassy_executor::task]
pub async fn heartbeat_task(mut heartbeat: FirmwareHeartbeat, period_ms: u32) {
    info!("Heartbeat task started");

    let mut ticker = Ticker::every(Duration::from_millis(u64::from(period_ms)));

    loop {
        match heartbeat.tick().await {
            Ok(true) => trace!("Strobe"),
            Ok(false) => {}
            Err(e) => warn!("Heartbeat pin fault: {:?}", e),
        }

        ticker.next().await;
    }
}
