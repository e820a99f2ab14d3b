//! Fixed-capacity display text

use heapless::Vec;

/// Maximum text length in bytes (two 16-column display lines)
pub const TEXT_CAPACITY: usize = 32;

/// Text clamped to [`TEXT_CAPACITY`] bytes
///
/// Longer input is cut at the byte boundary on construction; this is a
/// deliberate clamp, never an error. Bytes are not required to be UTF-8
/// since the character display is byte oriented.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoundedText {
    bytes: Vec<u8, TEXT_CAPACITY>,
}

impl BoundedText {
    /// Create an empty text
    pub const fn new() -> Self {
        Self { bytes: Vec::new() }
    }

    /// Copy at most [`TEXT_CAPACITY`] bytes from `bytes`
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let len = bytes.len().min(TEXT_CAPACITY);
        let mut clamped = Vec::new();
        // Cannot overflow, len is clamped to capacity
        let _ = clamped.extend_from_slice(&bytes[..len]);
        Self { bytes: clamped }
    }

    /// Raw text bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Text as `&str`, if it is valid UTF-8
    pub fn as_str(&self) -> Option<&str> {
        core::str::from_utf8(&self.bytes).ok()
    }

    /// Length in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Check if the text is empty
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl From<&[u8]> for BoundedText {
    fn from(bytes: &[u8]) -> Self {
        Self::from_bytes(bytes)
    }
}

impl From<&str> for BoundedText {
    fn from(text: &str) -> Self {
        Self::from_bytes(text.as_bytes())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for BoundedText {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{=[u8]:a}", self.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_kept_whole() {
        let text = BoundedText::from("Hello");
        assert_eq!(text.as_bytes(), b"Hello");
        assert_eq!(text.len(), 5);
        assert_eq!(text.as_str(), Some("Hello"));
    }

    #[test]
    fn test_long_text_truncated_at_capacity() {
        let input = [b'x'; 40];
        let text = BoundedText::from_bytes(&input);
        assert_eq!(text.len(), TEXT_CAPACITY);
        assert_eq!(text.as_bytes(), &input[..TEXT_CAPACITY]);
    }

    #[test]
    fn test_exact_capacity_not_truncated() {
        let input = b"0123456789abcdef0123456789ABCDEF";
        let text = BoundedText::from_bytes(input);
        assert_eq!(text.as_bytes(), &input[..]);
    }

    #[test]
    fn test_empty_text() {
        let text = BoundedText::new();
        assert!(text.is_empty());
        assert_eq!(text, BoundedText::from(""));
    }

    #[test]
    fn test_non_utf8_bytes_preserved() {
        let text = BoundedText::from_bytes(&[0xDF, b'C']);
        assert_eq!(text.as_bytes(), &[0xDF, b'C']);
        assert_eq!(text.as_str(), None);
    }
}
