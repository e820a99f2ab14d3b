//! Duoline - two-line display command pipeline firmware
//!
//! Main firmware binary for RP2040 boards. Commands arrive on a serial
//! line protocol (woken by a falling edge) and are shown on a 16x2
//! character LCD; control bytes drive an eight-LED bank.
//!
//! Pin map:
//!
//! | Function          | GPIO   |
//! |-------------------|--------|
//! | UART0 TX / RX     | 0 / 1  |
//! | Wake input        | 2      |
//! | Handshake output  | 3      |
//! | I2C0 SDA / SCL    | 4 / 5  |
//! | Mirror input      | 6      |
//! | Mirror output     | 7      |
//! | Strobe output     | 8      |
//! | LED bank          | 10..17 |

#![no_std]
#![no_main]

use defmt::*;
use duoline_core::{Applier, HeartbeatLoop, Intake};
use duoline_drivers::{GpioBank, Hd44780};
use embassy_executor::{InterruptExecutor, Spawner};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::i2c::{self, I2c};
use embassy_rp::interrupt;
use embassy_rp::interrupt::{InterruptExt, Priority};
use embassy_rp::peripherals::{I2C0, UART0};
use embassy_rp::uart::{BufferedInterruptHandler, BufferedUart, Config as UartConfig};
use embassy_time::Delay;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use crate::channels::DEVICE_STATE;

mod channels;
mod config;
mod tasks;

/// Boot splash, top row
const SPLASH_TITLE: &[u8] = b"Duoline ready";

/// Boot splash, bottom row
const SPLASH_VERSION: &str = concat!("v", env!("CARGO_PKG_VERSION"));

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
    I2C0_IRQ => i2c::InterruptHandler<I2C0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 64]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 512]> = StaticCell::new();

/// Executor for the edge watcher, preempting the thread-mode tasks
static EXECUTOR_HIGH: InterruptExecutor = InterruptExecutor::new();

#[interrupt]
unsafe fn SWI_IRQ_1() {
    EXECUTOR_HIGH.on_interrupt()
}

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Duoline firmware starting...");

    // Initialize RP2040 peripherals
    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = config::load();
    let timing = config.timing;

    // UART0 at 115200 8N1 (embassy default framing)
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = 115200;

    let tx_buf = TX_BUF.init([0u8; 64]);
    let rx_buf = RX_BUF.init([0u8; 512]);
    let uart = BufferedUart::new(p.UART0, p.PIN_0, p.PIN_1, Irqs, tx_buf, rx_buf, uart_config);
    let (tx, rx) = uart.split();
    info!("UART initialized");

    // Discrete I/O
    let wake_pin = Input::new(p.PIN_2, Pull::Up);
    let intake: tasks::FirmwareIntake = Intake::new(
        rx,
        Output::new(p.PIN_3, Level::Low),
        Delay,
        timing.handshake_pulse_ms,
    );
    let mirror_in = Input::new(p.PIN_6, Pull::Down);
    let mirror_out = Output::new(p.PIN_7, Level::Low);
    let strobe = Output::new(p.PIN_8, Level::Low);
    let leds = GpioBank::new([
        Output::new(p.PIN_10, Level::Low),
        Output::new(p.PIN_11, Level::Low),
        Output::new(p.PIN_12, Level::Low),
        Output::new(p.PIN_13, Level::Low),
        Output::new(p.PIN_14, Level::Low),
        Output::new(p.PIN_15, Level::Low),
        Output::new(p.PIN_16, Level::Low),
        Output::new(p.PIN_17, Level::Low),
    ]);

    // LCD on I2C0
    let i2c = I2c::new_async(p.I2C0, p.PIN_5, p.PIN_4, Irqs, i2c::Config::default());
    let mut lcd = Hd44780::new(i2c, Delay, config.display.i2c_address);
    if let Err(e) = lcd.init().await {
        // Keep going; the applier counts every failed write
        warn!("LCD init failed: {:?}", e);
    }

    let mut applier: tasks::FirmwareApplier =
        Applier::new(lcd, leds, Delay, &DEVICE_STATE, timing.dwell_ms);
    if applier.splash(SPLASH_TITLE, SPLASH_VERSION.as_bytes()).await.is_ok() {
        info!("Display initialized");
    }

    let heartbeat: tasks::FirmwareHeartbeat = HeartbeatLoop::new(
        mirror_in,
        mirror_out,
        strobe,
        Delay,
        timing.strobe_every,
        timing.strobe_pulse_ms,
    );

    // Edge watcher on the high-priority executor
    interrupt::SWI_IRQ_1.set_priority(Priority::P2);
    let high_spawner = EXECUTOR_HIGH.start(interrupt::SWI_IRQ_1);
    high_spawner.spawn(tasks::edge_task(wake_pin)).unwrap();

    // Spawn tasks
    spawner
        .spawn(tasks::intake_task(intake, timing.read_timeout_ms))
        .unwrap();
    spawner.spawn(tasks::applier_task(applier, tx)).unwrap();
    spawner
        .spawn(tasks::heartbeat_task(heartbeat, timing.heartbeat_period_ms))
        .unwrap();

    info!("All tasks spawned, firmware running");

    loop {
        embassy_time::Timer::after_secs(60).await;
        let snapshot = DEVICE_STATE.snapshot();
        debug!(
            "Applied {} command(s), {} display fault(s)",
            snapshot.commands_applied, snapshot.display_faults
        );
    }
}
