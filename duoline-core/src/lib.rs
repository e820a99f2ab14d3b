//! Board-agnostic core logic for the Duoline firmware
//!
//! This crate contains the command pipeline without any dependency on a
//! specific chip:
//!
//! - Hardware abstraction traits (character display, output bank)
//! - Two-line layout and word-wrap renderer
//! - Shared device state and the HTTP inbox
//! - Applier state machine, the single consumer of commands
//! - Bounded command queue and the coalescing wake signal
//! - Serial intake dispatch and the heartbeat/mirroring loop
//! - HTTP front-door connection handling
//! - Configuration types and the `device.toml` parser
//!
//! ```text
//! edge ─▶ WakeSignal ─▶ intake ─▶ CommandQueue ─▶ Applier ─▶ Renderer + outputs
//!                                                    ▲
//!                     HTTP ─▶ FrontDoor ─▶ DeviceState inbox
//! ```

#![no_std]
#![deny(unsafe_code)]

pub mod applier;
pub mod config;
pub mod heartbeat;
pub mod http;
pub mod intake;
pub mod queue;
pub mod render;
pub mod state;
pub mod traits;
pub mod wake;

pub use applier::{Applied, Applier, InboxWork, Origin};
pub use heartbeat::{Heartbeat, HeartbeatError, HeartbeatLoop};
pub use http::{FrontDoor, Served};
pub use intake::{Intake, IntakeStats, BURST_CAPACITY};
pub use queue::{CommandQueue, QUEUE_CAPACITY};
pub use state::{DeviceSnapshot, DeviceState};
pub use wake::WakeSignal;
