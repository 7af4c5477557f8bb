//! Conversations over the web app's streaming backend.
//!
//! Each message is posted with a link to its parent message; the reply
//! arrives as a stream of `data: <json>` lines, each carrying the whole
//! reply so far, ended by `data: [DONE]`.
//!
//! **Warning:** Unofficial / unsupported API surface.

mod client;
mod convert;
mod error;
mod types;

pub use client::Conversation;
pub use error::SendError;

/// Conversation endpoint of the web app.
pub const CONVERSATION_URL: &str = "https://chat.openai.com/backend-api/conversation";

/// Model requested unless overridden.
pub const DEFAULT_MODEL: &str = "text-davinci-002-render";
