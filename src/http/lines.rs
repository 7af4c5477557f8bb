//! Line scanner for the conversation event stream.
//!
//! The service re-sends the whole message so far with every event, so the
//! scanner only ever hands out complete payloads and callers usually keep the
//! last one. A line contributes a payload when it contains `": "`; everything
//! after the first separator (minus the line terminator) is the payload.

use futures::TryStreamExt;
use std::io;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio_util::io::StreamReader;

/// Payload that marks the end of the transmission.
pub const DONE: &str = "[DONE]";

const SEPARATOR: &[u8] = b": ";

/// Extract the payload of a single raw line, terminator included.
///
/// Returns `None` for lines shorter than two bytes and for lines without the
/// separator.
#[must_use]
pub fn line_payload(line: &[u8]) -> Option<String> {
    if line.len() < 2 {
        return None;
    }

    let pos = line
        .windows(SEPARATOR.len())
        .position(|window| window == SEPARATOR)?;
    let value = &line[pos + SEPARATOR.len()..];
    let value = value.strip_suffix(b"\n").unwrap_or(value);
    let value = value.strip_suffix(b"\r").unwrap_or(value);

    Some(String::from_utf8_lossy(value).into_owned())
}

/// Incremental reader of stream payloads.
#[derive(Debug)]
pub struct PayloadReader<R> {
    reader: R,
    line: Vec<u8>,
    finished: bool,
}

impl<R: AsyncBufRead + Unpin> PayloadReader<R> {
    /// Wrap any buffered reader.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: Vec::new(),
            finished: false,
        }
    }

    /// Read the next payload.
    ///
    /// Returns `None` once the input ends or the `[DONE]` sentinel arrives;
    /// nothing is read after that.
    pub async fn next_payload(&mut self) -> io::Result<Option<String>> {
        while !self.finished {
            self.line.clear();
            if self.reader.read_until(b'\n', &mut self.line).await? == 0 {
                self.finished = true;
                break;
            }

            let Some(payload) = line_payload(&self.line) else {
                continue;
            };

            if payload == DONE {
                self.finished = true;
                break;
            }
            return Ok(Some(payload));
        }

        Ok(None)
    }

    /// Read to the end of the stream and return the last payload seen.
    ///
    /// Yields an empty string when the stream carried no payload at all.
    pub async fn last_payload(mut self) -> io::Result<String> {
        let mut last = String::new();
        while let Some(payload) = self.next_payload().await? {
            last = payload;
        }
        Ok(last)
    }
}

/// Scan the body of a streamed response.
///
/// Dropping the reader releases the response and its connection.
pub fn from_response(response: reqwest::Response) -> PayloadReader<impl AsyncBufRead + Unpin> {
    let stream = Box::pin(response.bytes_stream().map_err(io::Error::other));
    PayloadReader::new(StreamReader::new(stream))
}
