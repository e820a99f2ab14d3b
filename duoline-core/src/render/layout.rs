//! Two-line layout for the 16x2 display

use core::fmt::Write;

use duoline_protocol::{BoundedText, Command};
use heapless::{String, Vec};

use crate::traits::DISPLAY_COLUMNS;

/// One display row, at most 16 bytes
pub type Line = Vec<u8, DISPLAY_COLUMNS>;

/// Contents of both display rows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Layout {
    pub top: Line,
    pub bottom: Line,
}

impl Layout {
    /// Blank display
    pub const fn blank() -> Self {
        Self {
            top: Vec::new(),
            bottom: Vec::new(),
        }
    }

    /// Two independent lines, each clamped to the display width
    pub fn lines(top: &[u8], bottom: &[u8]) -> Self {
        Self {
            top: clamp(top),
            bottom: clamp(bottom),
        }
    }

    /// Readings layout: `<a>F` over `<b>C`
    pub fn readings(a: i32, b: i32) -> Self {
        let mut top: String<DISPLAY_COLUMNS> = String::new();
        let mut bottom: String<DISPLAY_COLUMNS> = String::new();
        // An i32 plus unit is at most 12 bytes
        let _ = write!(top, "{}F", a);
        let _ = write!(bottom, "{}C", b);
        Self::lines(top.as_bytes(), bottom.as_bytes())
    }

    /// Word-wrapped text layout
    ///
    /// Text that fits on one row stays on the top row. Longer text breaks
    /// at the last space among the first 16 bytes, dropping that space;
    /// without such a space it breaks hard at column 16. The remainder is
    /// cut to the width of the bottom row.
    pub fn wrapped(text: &[u8]) -> Self {
        if text.len() <= DISPLAY_COLUMNS {
            return Self::lines(text, &[]);
        }

        match text[..DISPLAY_COLUMNS].iter().rposition(|&b| b == b' ') {
            Some(split) => Self::lines(&text[..split], &text[split + 1..]),
            None => Self::lines(&text[..DISPLAY_COLUMNS], &text[DISPLAY_COLUMNS..]),
        }
    }

    /// Layout for a decoded command
    pub fn for_command(command: &Command) -> Self {
        match command {
            Command::SetReadings { a, b } => Self::readings(*a, *b),
            Command::SetText(text) => Self::for_text(text),
        }
    }

    /// Layout for free text
    pub fn for_text(text: &BoundedText) -> Self {
        Self::wrapped(text.as_bytes())
    }
}

fn clamp(bytes: &[u8]) -> Line {
    let len = bytes.len().min(DISPLAY_COLUMNS);
    let mut line = Vec::new();
    let _ = line.extend_from_slice(&bytes[..len]);
    line
}
