//! HTTP front door
//!
//! Serves one request per connection on an already-accepted stream. The
//! socket accept loop lives with the network stack; this only needs
//! something that implements `Read + Write`.
//!
//! Control and text posts do not touch the display. They land in the
//! [`DeviceState`] inbox and the applier picks them up.

use duoline_protocol::http::{
    content_length, decode_control_body, decode_text_body, header_end, json_ok_head, EMPTY_OK,
    MAX_REQUEST_SIZE, MAX_STATUS_BODY,
};
use duoline_protocol::{Request, Route};
use embedded_io_async::{Read, Write};

use crate::config::ClockConfig;
use crate::state::DeviceState;

/// What a connection asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Served {
    /// Peer closed before sending anything
    Closed,
    /// Status JSON written
    Status,
    /// Control post answered, with the byte stored (if the body decoded)
    Control(Option<u8>),
    /// Text post answered; true if text was stored
    Text(bool),
    /// Unknown route or unreadable request line, closed without a response
    Unhandled,
}

/// Request handler bound to the shared device state
pub struct FrontDoor<'s> {
    state: &'s DeviceState,
    clock: ClockConfig,
}

impl<'s> FrontDoor<'s> {
    pub const fn new(state: &'s DeviceState, clock: ClockConfig) -> Self {
        Self { state, clock }
    }

    /// Read one request from `conn`, answer it and report what happened
    ///
    /// `uptime_s` feeds the status timestamp. The caller closes the
    /// connection afterwards.
    pub async fn serve<C>(&self, conn: &mut C, uptime_s: u64) -> Result<Served, C::Error>
    where
        C: Read + Write,
    {
        let mut buf = [0u8; MAX_REQUEST_SIZE];
        let total = read_request(conn, &mut buf).await?;
        if total == 0 {
            return Ok(Served::Closed);
        }

        let Ok(request) = Request::parse(&buf[..total]) else {
            return Ok(Served::Unhandled);
        };

        let served = match request.route() {
            Route::Status => {
                let body = self
                    .state
                    .snapshot()
                    .status_body(self.clock.unix_time(uptime_s));
                let mut json = [0u8; MAX_STATUS_BODY];
                let Some(len) = body.encode(&mut json) else {
                    return Ok(Served::Unhandled);
                };
                conn.write_all(json_ok_head(len).as_bytes()).await?;
                conn.write_all(&json[..len]).await?;
                Served::Status
            }
            Route::Control(body) => {
                let value = body.and_then(decode_control_body);
                if let Some(value) = value {
                    self.state.post_control(value);
                }
                conn.write_all(EMPTY_OK).await?;
                Served::Control(value)
            }
            Route::Text(body) => {
                // No header terminator means no body to read
                let text = body.and_then(decode_text_body);
                let stored = text.is_some();
                if let Some(text) = text {
                    self.state.post_text(text);
                }
                conn.write_all(EMPTY_OK).await?;
                Served::Text(stored)
            }
            Route::Unhandled => return Ok(Served::Unhandled),
        };

        conn.flush().await?;
        Ok(served)
    }
}

/// Read the head, then the body up to `Content-Length`
///
/// Stops early at end of stream or when the buffer is full.
async fn read_request<C: Read>(conn: &mut C, buf: &mut [u8]) -> Result<usize, C::Error> {
    let mut total = 0;

    let head_len = loop {
        if total >= buf.len() {
            return Ok(total);
        }
        let n = conn.read(&mut buf[total..]).await?;
        if n == 0 {
            return Ok(total);
        }
        total += n;
        if let Some(end) = header_end(&buf[..total]) {
            break end;
        }
    };

    let wanted = content_length(&buf[..head_len])
        .map(|len| head_len.saturating_add(len).min(buf.len()))
        .unwrap_or(total);

    while total < wanted {
        let n = conn.read(&mut buf[total..wanted]).await?;
        if n == 0 {
            break;
        }
        total += n;
    }

    Ok(total)
}
