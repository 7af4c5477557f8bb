//! Cookie-based authentication against the web app.
//!
//! The web app has no API keys. A browser session is represented by two
//! cookies (the session token and the Cloudflare clearance token) which the
//! session endpoint exchanges for a short-lived bearer token.

mod credentials;
mod error;
mod session;

pub use credentials::{AccessToken, Credentials};
pub use error::{AuthError, BuildError};
pub use session::{SESSION_URL, SessionManager};
