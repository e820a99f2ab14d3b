//! HTTP control surface
//!
//! Request framing, routing and JSON bodies for the three endpoints:
//!
//! | Request              | Body                   | Response                 |
//! |----------------------|------------------------|--------------------------|
//! | `GET /api/status`    | -                      | `200`, status JSON       |
//! | `POST /api/control`  | `{"led": <int>}`       | `200`, empty             |
//! | `POST /api/text`     | `{"text": "<string>"}` | `200`, empty             |
//!
//! Anything else gets no response at all; the caller closes the connection.
//! Socket accept/receive lives outside this crate.

use core::fmt::{self, Write};

use heapless::String;
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};

use crate::text::BoundedText;

/// Largest request buffered by a connection handler
pub const MAX_REQUEST_SIZE: usize = 512;

/// Largest status JSON body
pub const MAX_STATUS_BODY: usize = 192;

/// Largest response head produced by [`json_ok_head`]
pub const MAX_HEAD_LEN: usize = 128;

/// Status endpoint path
pub const STATUS_PATH: &str = "/api/status";

/// Control endpoint path
pub const CONTROL_PATH: &str = "/api/control";

/// Text endpoint path
pub const TEXT_PATH: &str = "/api/text";

/// Response for control and text requests
pub const EMPTY_OK: &[u8] = b"HTTP/1.1 200 OK\r\nContent-Length: 0\r\nConnection: close\r\n\r\n";

/// Request framing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RequestError {
    /// Request line is not UTF-8 or lacks a method or target
    MalformedRequestLine,
}

/// Request method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Method {
    Get,
    Post,
    Other,
}

impl Method {
    fn parse(token: &str) -> Self {
        match token {
            "GET" => Method::Get,
            "POST" => Method::Post,
            _ => Method::Other,
        }
    }
}

/// A parsed request borrowing from the receive buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Request<'a> {
    pub method: Method,
    /// Target path with any query string removed
    pub path: &'a str,
    /// Bytes after the blank line, `None` when the header terminator is missing
    pub body: Option<&'a [u8]>,
}

impl<'a> Request<'a> {
    /// Parse the request line and locate the body
    ///
    /// The body is limited to `Content-Length` bytes when that header is
    /// present, otherwise it runs to the end of `raw`.
    pub fn parse(raw: &'a [u8]) -> Result<Self, RequestError> {
        let line_end = find(raw, b"\r\n").unwrap_or(raw.len());
        let line = core::str::from_utf8(&raw[..line_end])
            .map_err(|_| RequestError::MalformedRequestLine)?;

        let mut parts = line.split_ascii_whitespace();
        let method = parts.next().ok_or(RequestError::MalformedRequestLine)?;
        let target = parts.next().ok_or(RequestError::MalformedRequestLine)?;
        let path = target.split('?').next().unwrap_or(target);

        let body = header_end(raw).map(|start| {
            let end = match content_length(&raw[..start]) {
                Some(len) => start.saturating_add(len).min(raw.len()),
                None => raw.len(),
            };
            &raw[start..end]
        });

        Ok(Self {
            method: Method::parse(method),
            path,
            body,
        })
    }

    /// Map the request onto an endpoint
    pub fn route(&self) -> Route<'a> {
        match (self.method, self.path) {
            (Method::Get, STATUS_PATH) => Route::Status,
            (Method::Post, CONTROL_PATH) => Route::Control(self.body),
            (Method::Post, TEXT_PATH) => Route::Text(self.body),
            _ => Route::Unhandled,
        }
    }
}

/// Endpoint selected for a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route<'a> {
    /// `GET /api/status`
    Status,
    /// `POST /api/control` with its body, if any
    Control(Option<&'a [u8]>),
    /// `POST /api/text` with its body, if any
    Text(Option<&'a [u8]>),
    /// No endpoint, close without a response
    Unhandled,
}

/// Offset of the first body byte, just past `\r\n\r\n`
pub fn header_end(raw: &[u8]) -> Option<usize> {
    find(raw, b"\r\n\r\n").map(|idx| idx + 4)
}

/// `Content-Length` value from a request head, if present and numeric
pub fn content_length(head: &[u8]) -> Option<usize> {
    const NAME: &[u8] = b"content-length:";

    head.split(|&byte| byte == b'\n').find_map(|line| {
        if line.len() < NAME.len() || !line[..NAME.len()].eq_ignore_ascii_case(NAME) {
            return None;
        }
        let value = core::str::from_utf8(&line[NAME.len()..]).ok()?;
        value.trim().parse().ok()
    })
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

#[derive(Deserialize)]
struct ControlBody {
    /// Any JSON number; integers are read through `f64` as well
    #[serde(default)]
    led: Option<f64>,
}

#[derive(Deserialize)]
struct TextBody {
    #[serde(default)]
    text: Option<TextField>,
}

/// Any JSON object, keys ignored
#[derive(Deserialize)]
struct AnyObject {}

/// A JSON string copied (and clamped) into [`BoundedText`]
struct TextField(BoundedText);

impl<'de> Deserialize<'de> for TextField {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TextVisitor;

        impl Visitor<'_> for TextVisitor {
            type Value = TextField;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a string")
            }

            // Unescaped strings arrive here too, via `visit_borrowed_str`
            fn visit_str<E: de::Error>(self, value: &str) -> Result<TextField, E> {
                Ok(TextField(BoundedText::from(value)))
            }
        }

        deserializer.deserialize_str(TextVisitor)
    }
}

/// Decode a control body into the LED byte
///
/// Numbers are truncated toward zero and saturated to `i32` before masking
/// with `0xFF`, so `300`, `300.0` and `300.9` all give 44. Returns `None`
/// when the body is not JSON or has no numeric `led` field.
pub fn decode_control_body(body: &[u8]) -> Option<u8> {
    let (parsed, _) = serde_json_core::from_slice::<ControlBody>(body).ok()?;
    parsed.led.map(|led| ((led as i32) & 0xFF) as u8)
}

/// Decode a text body
///
/// A JSON object yields its `text` string with escapes decoded; an object
/// without a string `text` yields `None`. A body that is not JSON is taken
/// verbatim as the text.
pub fn decode_text_body(body: &[u8]) -> Option<BoundedText> {
    // Unescaping never grows a string, so a request-sized buffer always fits
    let mut unescaped = [0u8; MAX_REQUEST_SIZE];
    if let Ok((parsed, _)) =
        serde_json_core::from_slice_escaped::<TextBody>(body, &mut unescaped)
    {
        return parsed.text.map(|field| field.0);
    }

    match serde_json_core::from_slice::<AnyObject>(body) {
        Ok(_) => None,
        Err(_) => Some(BoundedText::from_bytes(body)),
    }
}

/// Body of `GET /api/status`
///
/// Field order is part of the wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusBody {
    pub raw: u32,
    pub temperature: u32,
    pub led: u8,
    /// Unix seconds
    pub timestamp: u64,
}

impl StatusBody {
    /// Serialize into `buf`, returning the number of bytes written
    pub fn encode(&self, buf: &mut [u8]) -> Option<usize> {
        serde_json_core::to_slice(self, buf).ok()
    }
}

/// Response head for a JSON body of `body_len` bytes
pub fn json_ok_head(body_len: usize) -> String<MAX_HEAD_LEN> {
    let mut head = String::new();
    let _ = write!(
        head,
        "HTTP/1.1 200 OK\r\n\
         Content-Type: application/json\r\n\
         Content-Length: {}\r\n\
         Connection: close\r\n\r\n",
        body_len
    );
    head
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_status_request() {
        let raw = b"GET /api/status HTTP/1.1\r\nHost: pico\r\n\r\n";
        let req = Request::parse(raw).unwrap();
        assert_eq!(req.method, Method::Get);
        assert_eq!(req.path, "/api/status");
        assert_eq!(req.body, Some(&b""[..]));
        assert_eq!(req.route(), Route::Status);
    }

    #[test]
    fn test_query_string_ignored() {
        let raw = b"GET /api/status?x=1 HTTP/1.1\r\n\r\n";
        assert_eq!(Request::parse(raw).unwrap().route(), Route::Status);
    }

    #[test]
    fn test_parse_control_request_with_content_length() {
        let raw = b"POST /api/control HTTP/1.1\r\nContent-Length: 12\r\n\r\n{\"led\": 300}garbage";
        let req = Request::parse(raw).unwrap();
        assert_eq!(req.route(), Route::Control(Some(&b"{\"led\": 300}"[..])));
    }

    #[test]
    fn test_missing_header_terminator_has_no_body() {
        let raw = b"POST /api/text HTTP/1.1\r\nContent-Length: 5";
        let req = Request::parse(raw).unwrap();
        assert_eq!(req.route(), Route::Text(None));
    }

    #[test]
    fn test_unknown_routes_unhandled() {
        for raw in [
            &b"GET /index.html HTTP/1.1\r\n\r\n"[..],
            &b"POST /api/status HTTP/1.1\r\n\r\n"[..],
            &b"GET /api/text HTTP/1.1\r\n\r\n"[..],
            &b"DELETE /api/control HTTP/1.1\r\n\r\n"[..],
        ] {
            assert_eq!(Request::parse(raw).unwrap().route(), Route::Unhandled);
        }
    }

    #[test]
    fn test_malformed_request_line() {
        assert_eq!(
            Request::parse(b"GET\r\n\r\n"),
            Err(RequestError::MalformedRequestLine)
        );
        assert_eq!(
            Request::parse(&[0xFF, 0xFE, b'\r', b'\n']),
            Err(RequestError::MalformedRequestLine)
        );
    }

    #[test]
    fn test_content_length_case_insensitive() {
        assert_eq!(content_length(b"POST / HTTP/1.1\r\ncontent-LENGTH:  7\r\n"), Some(7));
        assert_eq!(content_length(b"POST / HTTP/1.1\r\nHost: x\r\n"), None);
    }

    #[test]
    fn test_control_body_masks_to_byte() {
        assert_eq!(decode_control_body(b"{\"led\": 300}"), Some(44));
        assert_eq!(decode_control_body(b"{\"led\":255}"), Some(255));
        assert_eq!(decode_control_body(b"{\"led\": -1}"), Some(255));
    }

    #[test]
    fn test_control_body_accepts_floats() {
        assert_eq!(decode_control_body(b"{\"led\": 300.0}"), Some(44));
        assert_eq!(decode_control_body(b"{\"led\": 3.7}"), Some(3));
        assert_eq!(decode_control_body(b"{\"led\": 1e2}"), Some(100));
    }

    #[test]
    fn test_control_body_without_led() {
        assert_eq!(decode_control_body(b"{\"other\": 1}"), None);
        assert_eq!(decode_control_body(b"{\"led\": \"on\"}"), None);
        assert_eq!(decode_control_body(b"not json"), None);
    }

    #[test]
    fn test_text_body_json() {
        assert_eq!(
            decode_text_body(b"{\"text\": \"Hello World\"}"),
            Some(BoundedText::from("Hello World"))
        );
    }

    #[test]
    fn test_text_body_raw_fallback() {
        assert_eq!(
            decode_text_body(b"plain words"),
            Some(BoundedText::from("plain words"))
        );
    }

    #[test]
    fn test_text_body_truncated() {
        let body = b"{\"text\": \"0123456789abcdef0123456789ABCDEFxyz\"}";
        let text = decode_text_body(body).unwrap();
        assert_eq!(text.as_bytes(), b"0123456789abcdef0123456789ABCDEF");
    }

    #[test]
    fn test_text_body_json_without_text() {
        assert_eq!(decode_text_body(b"{\"message\": \"hi\"}"), None);
        assert_eq!(decode_text_body(b"{\"text\": null}"), None);
        assert_eq!(decode_text_body(b"{\"text\": 5}"), None);
    }

    #[test]
    fn test_text_body_escapes_decoded() {
        let text = decode_text_body(br#"{"text":"say \"hi\""}"#).unwrap();
        assert_eq!(text.as_bytes(), b"say \"hi\"");

        let text = decode_text_body(br#"{"text":"caf\u00e9\n"}"#).unwrap();
        assert_eq!(text.as_bytes(), "caf\u{e9}\n".as_bytes());
    }

    #[test]
    fn test_huge_content_length_clamped() {
        let raw = b"POST /api/text HTTP/1.1\r\nContent-Length: 18446744073709551615\r\n\r\nhi";
        let req = Request::parse(raw).unwrap();
        assert_eq!(req.route(), Route::Text(Some(&b"hi"[..])));
    }

    #[test]
    fn test_status_body_encoding() {
        let status = StatusBody {
            raw: 72,
            temperature: 22,
            led: 44,
            timestamp: 1_700_000_000,
        };
        let mut buf = [0u8; MAX_STATUS_BODY];
        let len = status.encode(&mut buf).unwrap();
        assert_eq!(
            &buf[..len],
            b"{\"raw\":72,\"temperature\":22,\"led\":44,\"timestamp\":1700000000}"
        );
    }

    #[test]
    fn test_json_head() {
        let head = json_ok_head(10);
        assert!(head.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(head.contains("Content-Type: application/json\r\n"));
        assert!(head.contains("Content-Length: 10\r\n"));
        assert!(head.ends_with("Connection: close\r\n\r\n"));
    }
}
