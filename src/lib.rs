#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

//! Client for the ChatGPT web app, authenticated with browser session
//! cookies instead of an API key.
//!
//! ```no_run
//! use chatgpt_web::{ChatGpt, ClientOptions};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ChatGpt::new(ClientOptions::new("<session token>", "<cf_clearance>", "<user agent>"))?;
//! let mut conversation = client.new_conversation();
//! let reply = conversation.send_message("Hello!").await?;
//! println!("{reply}");
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod cli;
pub mod client;
pub mod config;
pub mod conversation;
pub mod error;
pub mod http;
pub mod options;

pub use auth::{AccessToken, AuthError, BuildError, Credentials, SessionManager};
pub use client::ChatGpt;
pub use conversation::{Conversation, SendError};
pub use options::{ClientOptions, Endpoints};
