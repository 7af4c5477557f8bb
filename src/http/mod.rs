//! Shared HTTP utilities for the session and conversation requests.

mod client;
mod error_body;
pub mod lines;

pub use client::{DEFAULT_TIMEOUT, WebClient};
pub use error_body::summarize_body;
pub use lines::{DONE, PayloadReader, line_payload};
