//! Inter-task communication
//!
//! Statics shared between the edge watcher, intake, applier and (when a
//! network stack is attached) the HTTP front door.

use duoline_core::{CommandQueue, DeviceState, WakeSignal};

/// Raised by the edge watcher on every falling edge of the wake input
pub static WAKE: WakeSignal = WakeSignal::new();

/// Serial commands waiting for the applier
pub static SERIAL_QUEUE: CommandQueue = CommandQueue::new();

/// Status fields and the HTTP inbox
pub static DEVICE_STATE: DeviceState = DeviceState::new();
