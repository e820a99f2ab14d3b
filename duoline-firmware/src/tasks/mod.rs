//! Embassy async tasks
//!
//! Each task runs independently and communicates via the statics in
//! `channels`.

pub mod applier;
pub mod edge;
pub mod heartbeat;
pub mod intake;

pub use applier::{applier_task, FirmwareApplier};
pub use edge::edge_task;
pub use heartbeat::{heartbeat_task, FirmwareHeartbeat};
pub use intake::{intake_task, FirmwareIntake};
