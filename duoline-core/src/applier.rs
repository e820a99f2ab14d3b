//! Device-state applier
//!
//! The single consumer of the command queue and the HTTP inbox. Owns the
//! renderer and the LED bank; only it writes the status fields of
//! [`DeviceState`].

use duoline_protocol::{Ack, BoundedText, Command};
use embedded_hal_async::delay::DelayNs;

use crate::render::{Layout, Renderer};
use crate::state::{ApplierEvent, ApplierState, DeviceState};
use crate::traits::{CharDisplay, OutputBank};

/// Channel a command arrived on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Origin {
    /// Serial line protocol, acknowledged on the UART
    Serial,
    /// HTTP inbox, already answered with `200 OK`
    Http,
}

/// Outcome of applying one command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Applied<E> {
    /// Acknowledgment to send back on the originating channel
    pub ack: Option<Ack>,
    /// Display write failure, already counted
    pub fault: Option<E>,
}

/// Outcome of draining the HTTP inbox
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboxWork<E> {
    /// Control byte written to the LED bank
    pub led: Option<u8>,
    /// Result of showing posted text
    pub text: Option<Applied<E>>,
}

impl<E> InboxWork<E> {
    /// Check if the inbox held nothing
    pub fn is_empty(&self) -> bool {
        self.led.is_none() && self.text.is_none()
    }
}

/// Applies commands to the display, outputs and shared state
pub struct Applier<'s, D, O, Y> {
    renderer: Renderer<D>,
    outputs: O,
    delay: Y,
    state: &'s DeviceState,
    machine: ApplierState,
    dwell_ms: u32,
}

impl<'s, D, O, Y> Applier<'s, D, O, Y>
where
    D: CharDisplay,
    O: OutputBank,
    Y: DelayNs,
{
    pub fn new(display: D, outputs: O, delay: Y, state: &'s DeviceState, dwell_ms: u32) -> Self {
        Self {
            renderer: Renderer::new(display),
            outputs,
            delay,
            state,
            machine: ApplierState::Idle,
            dwell_ms,
        }
    }

    /// Show a fixed two-line banner (boot splash)
    pub async fn splash(&mut self, top: &[u8], bottom: &[u8]) -> Result<(), D::Error> {
        let result = self.renderer.show(Layout::lines(top, bottom)).await;
        if result.is_err() {
            self.state.record_display_fault();
        }
        result
    }

    /// Render a command, update state and produce its acknowledgment
    ///
    /// Text is held on the display for the dwell time before this returns,
    /// so queued commands wait behind it. Display faults are counted and
    /// returned; they never stop the command from completing.
    pub async fn apply(&mut self, command: Command, origin: Origin) -> Applied<D::Error> {
        self.machine = self.machine.transition(ApplierEvent::Dequeued);

        let fault = self.render(Layout::for_command(&command)).await;

        match &command {
            Command::SetReadings { a, b } => self.state.record_readings(*a, *b),
            Command::SetText(_) => self.delay.delay_ms(self.dwell_ms).await,
        }
        self.state.record_applied();

        let ack = match origin {
            Origin::Serial => Some(command.ack()),
            Origin::Http => None,
        };

        self.machine = self.machine.transition(ApplierEvent::Completed);
        Applied { ack, fault }
    }

    /// Drive the LED bank and record the byte
    pub fn apply_led(&mut self, value: u8) {
        self.outputs.write(value);
        self.state.record_led(value);
    }

    /// Apply whatever the HTTP front door posted since the last drain
    ///
    /// The control byte is applied before the text so the LEDs do not
    /// wait out the text dwell.
    pub async fn drain_inbox(&mut self) -> InboxWork<D::Error> {
        let led = self.state.take_pending_cmd();
        if let Some(value) = led {
            self.apply_led(value);
        }

        let text = match self.state.take_pending_text() {
            Some(text) => Some(self.apply_text(text).await),
            None => None,
        };

        InboxWork { led, text }
    }

    async fn apply_text(&mut self, text: BoundedText) -> Applied<D::Error> {
        self.apply(Command::SetText(text), Origin::Http).await
    }

    async fn render(&mut self, layout: Layout) -> Option<D::Error> {
        match self.renderer.show(layout).await {
            Ok(()) => None,
            Err(err) => {
                self.state.record_display_fault();
                Some(err)
            }
        }
    }

    /// Current state machine position
    pub fn machine(&self) -> ApplierState {
        self.machine
    }

    /// Layout most recently sent to the display
    pub fn shown(&self) -> &Layout {
        self.renderer.shown()
    }

    /// Shared state this applier writes
    pub fn state(&self) -> &'s DeviceState {
        self.state
    }

    /// Borrow the renderer
    pub fn renderer(&self) -> &Renderer<D> {
        &self.renderer
    }

    /// Borrow the output bank
    pub fn outputs(&self) -> &O {
        &self.outputs
    }
}
