//! # API Module
//!
//! HTTP endpoints of the short-lived local server used during
//! authorization.
//!
//! - [`callback`] - Receives the authorization code from Spotify and
//!   exchanges it, together with the PKCE verifier, for an access token.
//! - [`health`] - Reports version and whether a token has arrived yet.
//!
//! The server only runs while an `auth` flow waits for its callback, see
//! [`crate::server`].

mod callback;
mod health;

pub use callback::callback;
pub use health::health;
