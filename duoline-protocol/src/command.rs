//! Command model shared by the serial and HTTP front doors

use core::fmt::Write;

use heapless::String;

use crate::text::BoundedText;

/// Acknowledgment sent after a text command has been shown
pub const TEXT_ACK: &str = "TXT-OK\n";

/// Longest acknowledgment line ("-2147483648F -2147483648C\n" fits)
pub const MAX_ACK_LEN: usize = 32;

/// A decoded command, ready for the applier
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Two readings, shown as `<a>F` on line 1 and `<b>C` on line 2
    SetReadings { a: i32, b: i32 },
    /// Free text wrapped across both lines
    SetText(BoundedText),
}

impl Command {
    /// Acknowledgment owed to the sender once this command is applied
    pub fn ack(&self) -> Ack {
        match self {
            Command::SetReadings { a, b } => Ack::Readings { a: *a, b: *b },
            Command::SetText(_) => Ack::Text,
        }
    }
}

/// Completion acknowledgment returned to the originating channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Ack {
    /// Echo of applied readings
    Readings { a: i32, b: i32 },
    /// Text shown
    Text,
}

impl Ack {
    /// Render the acknowledgment as a newline-terminated line
    pub fn to_line(&self) -> String<MAX_ACK_LEN> {
        let mut line = String::new();
        match self {
            Ack::Readings { a, b } => {
                let _ = writeln!(line, "{}F {}C", a, b);
            }
            Ack::Text => {
                let _ = line.push_str(TEXT_ACK);
            }
        }
        line
    }
}
