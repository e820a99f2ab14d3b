//! Wake edge watcher
//!
//! Runs on the high-priority interrupt executor. Its only job is to turn
//! falling edges on the wake input into [`WAKE`] raises.

use defmt::*;
use embassy_rp::gpio::Input;

use crate::channels::WAKE;

#[embassy_executor::task]
pub async fn edge_task(mut wake_pin: Input<'static>) {
    info!("Edge task started");

    loop {
        wake_pin.wait_for_falling_edge().await;
        WAKE.raise();
    }
}
