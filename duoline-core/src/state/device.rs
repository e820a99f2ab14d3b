//! Shared device state and HTTP inbox

use core::cell::RefCell;

use duoline_protocol::{BoundedText, StatusBody};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::signal::Signal;
use portable_atomic::{AtomicBool, AtomicI32, AtomicU32, AtomicU8, Ordering};

/// Status fields plus the latest-value-wins inbox fed by HTTP
///
/// Every scalar is its own atomic. A [`DeviceSnapshot`] loads each field
/// atomically but may mix fields from different updates; status readers
/// tolerate that staleness, so no lock spans the whole struct.
///
/// The `last_*` fields and counters are written only by the applier.
/// The inbox (`pending_cmd`, `pending_text`) is posted by the HTTP front
/// door and drained by the applier.
pub struct DeviceState {
    last_raw_output: AtomicI32,
    last_temperature: AtomicI32,
    last_led_byte: AtomicU8,
    pending_cmd: AtomicU8,
    cmd_pending: AtomicBool,
    /// Text and its pending flag change together under the lock
    pending_text: Mutex<CriticalSectionRawMutex, RefCell<(BoundedText, bool)>>,
    commands_applied: AtomicU32,
    display_faults: AtomicU32,
    inbox_ready: Signal<CriticalSectionRawMutex, ()>,
}

/// Point-in-time copy of [`DeviceState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceSnapshot {
    pub raw_output: i32,
    pub temperature: i32,
    pub led: u8,
    pub text_pending: bool,
    pub commands_applied: u32,
    pub display_faults: u32,
}

impl DeviceSnapshot {
    /// Status JSON body for the given timestamp
    ///
    /// Negative readings report as 0 since the status fields are unsigned.
    pub fn status_body(&self, timestamp: u64) -> StatusBody {
        StatusBody {
            raw: u32::try_from(self.raw_output).unwrap_or(0),
            temperature: u32::try_from(self.temperature).unwrap_or(0),
            led: self.led,
            timestamp,
        }
    }
}

impl DeviceState {
    /// Zeroed state, usable in a `static`
    pub const fn new() -> Self {
        Self {
            last_raw_output: AtomicI32::new(0),
            last_temperature: AtomicI32::new(0),
            last_led_byte: AtomicU8::new(0),
            pending_cmd: AtomicU8::new(0),
            cmd_pending: AtomicBool::new(false),
            pending_text: Mutex::new(RefCell::new((BoundedText::new(), false))),
            commands_applied: AtomicU32::new(0),
            display_faults: AtomicU32::new(0),
            inbox_ready: Signal::new(),
        }
    }

    /// Read every field once
    pub fn snapshot(&self) -> DeviceSnapshot {
        DeviceSnapshot {
            raw_output: self.last_raw_output.load(Ordering::Relaxed),
            temperature: self.last_temperature.load(Ordering::Relaxed),
            led: self.last_led_byte.load(Ordering::Relaxed),
            text_pending: self.pending_text.lock(|cell| cell.borrow().1),
            commands_applied: self.commands_applied.load(Ordering::Relaxed),
            display_faults: self.display_faults.load(Ordering::Relaxed),
        }
    }

    // Inbox, producer side

    /// Post a control byte; replaces any byte not yet drained
    pub fn post_control(&self, value: u8) {
        self.pending_cmd.store(value, Ordering::Relaxed);
        self.cmd_pending.store(true, Ordering::Release);
        self.inbox_ready.signal(());
    }

    /// Post display text; replaces any text not yet drained
    pub fn post_text(&self, text: BoundedText) {
        self.pending_text.lock(|cell| {
            *cell.borrow_mut() = (text, true);
        });
        self.inbox_ready.signal(());
    }

    // Inbox, consumer side

    /// Take the pending control byte, if one was posted
    pub fn take_pending_cmd(&self) -> Option<u8> {
        if self.cmd_pending.swap(false, Ordering::Acquire) {
            Some(self.pending_cmd.load(Ordering::Relaxed))
        } else {
            None
        }
    }

    /// Take the pending text, if one was posted
    pub fn take_pending_text(&self) -> Option<BoundedText> {
        self.pending_text.lock(|cell| {
            let mut slot = cell.borrow_mut();
            if slot.1 {
                slot.1 = false;
                Some(slot.0.clone())
            } else {
                None
            }
        })
    }

    /// Wait until something is posted to the inbox
    ///
    /// Posts made while nobody waits are latched; the wait may still find
    /// the inbox empty if an earlier drain already took them.
    pub async fn wait_inbox(&self) {
        self.inbox_ready.wait().await
    }

    // Status, applier side

    /// Store the last applied readings
    pub fn record_readings(&self, raw_output: i32, temperature: i32) {
        self.last_raw_output.store(raw_output, Ordering::Relaxed);
        self.last_temperature.store(temperature, Ordering::Relaxed);
    }

    /// Store the byte shown on the LED bank
    pub fn record_led(&self, value: u8) {
        self.last_led_byte.store(value, Ordering::Relaxed);
    }

    /// Count one applied unit of work
    pub fn record_applied(&self) {
        self.commands_applied.fetch_add(1, Ordering::Relaxed);
    }

    /// Count one display write failure
    pub fn record_display_fault(&self) {
        self.display_faults.fetch_add(1, Ordering::Relaxed);
    }
}

impl Default for DeviceState {
    fn default() -> Self {
        Self::new()
    }
}
