//! Duoline wire formats
//!
//! This crate defines the two front doors of the display pipeline and the
//! command model they both normalize into.
//!
//! # Protocol Overview
//!
//! The serial front door is line oriented, one command per line:
//! ```text
//! ┌──────────────────┬──────────────────────┬────────────┐
//! │ LINE             │ EFFECT               │ ACK        │
//! ├──────────────────┼──────────────────────┼────────────┤
//! │ CMD=<int> <int>  │ readings on 2 lines  │ <a>F <b>C  │
//! │ TXT=<text>       │ wrapped free text    │ TXT-OK     │
//! │ anything else    │ ignored              │ none       │
//! └──────────────────┴──────────────────────┴────────────┘
//! ```
//!
//! The HTTP front door carries small JSON bodies on three endpoints:
//! `GET /api/status`, `POST /api/control` and `POST /api/text`.
//!
//! Decoders are pure functions from bytes to [`Command`] values. They never
//! block and never touch device state.

#![no_std]
#![deny(unsafe_code)]

pub mod command;
pub mod http;
pub mod line;
pub mod text;

pub use command::{Ack, Command, MAX_ACK_LEN};
pub use http::{Method, Request, RequestError, Route, StatusBody};
pub use line::{decode_line, split_lines, DecodeError};
pub use text::{BoundedText, TEXT_CAPACITY};
