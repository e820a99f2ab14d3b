//! Serial line protocol
//!
//! One command per line, lines terminated by `\r` and/or `\n`:
//! ```text
//! CMD=<int> <int>     readings for the two display lines
//! TXT=<text>          free text, clamped to 32 bytes
//! ```
//! Any other line is ignored. Integers are read the way `%d` reads them:
//! leading whitespace skipped, optional sign, at least one digit. Bytes
//! after the second integer are ignored.

use crate::command::Command;
use crate::text::BoundedText;

/// Prefix of a readings line
pub const READINGS_PREFIX: &[u8] = b"CMD=";

/// Prefix of a text line
pub const TEXT_PREFIX: &[u8] = b"TXT=";

/// Reasons a line produced no command
///
/// Both are dropped silently by the intake; the variants exist for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    /// Line has neither a `CMD=` nor a `TXT=` prefix
    Unrecognized,
    /// `CMD=` line without two 32-bit integers
    MalformedReadings,
}

/// Decode one line (without its terminator) into a command
pub fn decode_line(line: &[u8]) -> Result<Command, DecodeError> {
    if let Some(rest) = line.strip_prefix(READINGS_PREFIX) {
        let (a, rest) = scan_int(rest).ok_or(DecodeError::MalformedReadings)?;
        let (b, _) = scan_int(rest).ok_or(DecodeError::MalformedReadings)?;
        return Ok(Command::SetReadings { a, b });
    }

    if let Some(rest) = line.strip_prefix(TEXT_PREFIX) {
        return Ok(Command::SetText(BoundedText::from_bytes(rest)));
    }

    Err(DecodeError::Unrecognized)
}

/// Split a received chunk into lines
///
/// Every `\r` and `\n` terminates a line, empty lines are skipped, and a
/// trailing segment without terminator still counts as a line.
pub fn split_lines(chunk: &[u8]) -> impl Iterator<Item = &[u8]> {
    chunk
        .split(|&byte| byte == b'\r' || byte == b'\n')
        .filter(|line| !line.is_empty())
}

/// Scan one decimal integer, returning it and the unconsumed remainder
fn scan_int(input: &[u8]) -> Option<(i32, &[u8])> {
    let start = input
        .iter()
        .position(|byte| !byte.is_ascii_whitespace())
        .unwrap_or(input.len());
    let input = &input[start..];

    let sign_len = usize::from(matches!(input.first(), Some(b'+' | b'-')));
    let digits = input[sign_len..]
        .iter()
        .take_while(|byte| byte.is_ascii_digit())
        .count();
    if digits == 0 {
        return None;
    }

    let end = sign_len + digits;
    // Sign and ASCII digits only, always valid UTF-8
    let number = core::str::from_utf8(&input[..end]).ok()?;
    let value = number.parse::<i32>().ok()?;
    Some((value, &input[end..]))
}

#[cfg(test)]
mod tests {
    extern crate std;

    use std::format;

    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_decode_readings() {
        assert_eq!(
            decode_line(b"CMD=72 22"),
            Ok(Command::SetReadings { a: 72, b: 22 })
        );
    }

    #[test]
    fn test_decode_negative_readings() {
        assert_eq!(
            decode_line(b"CMD=-40 -40"),
            Ok(Command::SetReadings { a: -40, b: -40 })
        );
    }

    #[test]
    fn test_decode_readings_whitespace_and_trailing_bytes() {
        assert_eq!(
            decode_line(b"CMD=  7\t+8 units"),
            Ok(Command::SetReadings { a: 7, b: 8 })
        );
    }

    #[test]
    fn test_decode_readings_adjacent_sign() {
        // Separator may be absent when the second value carries a sign
        assert_eq!(
            decode_line(b"CMD=72-22"),
            Ok(Command::SetReadings { a: 72, b: -22 })
        );
    }

    #[test]
    fn test_decode_readings_missing_second_value() {
        assert_eq!(decode_line(b"CMD=72"), Err(DecodeError::MalformedReadings));
        assert_eq!(decode_line(b"CMD=72,22"), Err(DecodeError::MalformedReadings));
        assert_eq!(decode_line(b"CMD=abc"), Err(DecodeError::MalformedReadings));
        assert_eq!(decode_line(b"CMD=- 1 2"), Err(DecodeError::MalformedReadings));
    }

    #[test]
    fn test_decode_readings_overflow_rejected() {
        assert_eq!(
            decode_line(b"CMD=2147483648 1"),
            Err(DecodeError::MalformedReadings)
        );
        assert_eq!(
            decode_line(b"CMD=-2147483648 2147483647"),
            Ok(Command::SetReadings {
                a: i32::MIN,
                b: i32::MAX
            })
        );
    }

    #[test]
    fn test_decode_text() {
        assert_eq!(
            decode_line(b"TXT=Hello World Testing"),
            Ok(Command::SetText(BoundedText::from("Hello World Testing")))
        );
    }

    #[test]
    fn test_decode_text_truncated() {
        let line = b"TXT=0123456789abcdef0123456789ABCDEFoverflow";
        match decode_line(line) {
            Ok(Command::SetText(text)) => {
                assert_eq!(text.as_bytes(), b"0123456789abcdef0123456789ABCDEF");
            }
            other => panic!("unexpected decode result: {:?}", other),
        }
    }

    #[test]
    fn test_decode_empty_text() {
        assert_eq!(
            decode_line(b"TXT="),
            Ok(Command::SetText(BoundedText::new()))
        );
    }

    #[test]
    fn test_garbage_unrecognized() {
        assert_eq!(decode_line(b"GARBAGE"), Err(DecodeError::Unrecognized));
        assert_eq!(decode_line(b"cmd=1 2"), Err(DecodeError::Unrecognized));
        assert_eq!(decode_line(b" CMD=1 2"), Err(DecodeError::Unrecognized));
    }

    #[test]
    fn test_split_lines_mixed_terminators() {
        let chunk = b"CMD=1 2\r\nTXT=hi\n\nGARBAGE\rTXT=tail";
        let mut lines = split_lines(chunk);
        assert_eq!(lines.next(), Some(&b"CMD=1 2"[..]));
        assert_eq!(lines.next(), Some(&b"TXT=hi"[..]));
        assert_eq!(lines.next(), Some(&b"GARBAGE"[..]));
        assert_eq!(lines.next(), Some(&b"TXT=tail"[..]));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_split_lines_only_terminators() {
        assert_eq!(split_lines(b"\r\n\r\n").count(), 0);
        assert_eq!(split_lines(b"").count(), 0);
    }

    proptest! {
        #[test]
        fn test_prop_readings_any_pair(a in any::<i32>(), b in any::<i32>(), gap in "[ \t]{1,4}") {
            let line = format!("CMD={}{}{}", a, gap, b);
            prop_assert_eq!(decode_line(line.as_bytes()), Ok(Command::SetReadings { a, b }));
        }

        #[test]
        fn test_prop_text_clamped(text in "[ -~]{0,64}") {
            let line = format!("TXT={}", text);
            let kept = text.len().min(32);
            match decode_line(line.as_bytes()) {
                Ok(Command::SetText(decoded)) => {
                    prop_assert_eq!(decoded.as_bytes(), &text.as_bytes()[..kept]);
                }
                other => prop_assert!(false, "unexpected decode result: {:?}", other),
            }
        }

        #[test]
        fn test_prop_split_never_yields_terminators(chunk in proptest::collection::vec(any::<u8>(), 0..255)) {
            for line in split_lines(&chunk) {
                prop_assert!(!line.is_empty());
                prop_assert!(!line.contains(&b'\r') && !line.contains(&b'\n'));
                // Arbitrary bytes decode or fail, never panic
                let _ = decode_line(line);
            }
        }
    }
}
