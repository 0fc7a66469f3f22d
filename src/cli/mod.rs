//! # CLI Module
//!
//! User-facing commands of the monthly playlist builder.
//!
//! ## Commands
//!
//! - [`auth`] - Authorizes a listener or the controller account (OAuth 2.0
//!   PKCE) and caches its token
//! - [`run`] - Builds this month's "Top Tracks" and "Recommended Tracks"
//!   playlists for every configured listener
//! - [`cover`] - Composes a single cover from image URLs, useful to preview
//!   the layout without touching any account
//!
//! ## Data Flow of a Run
//!
//! ```text
//! listener token ──> top tracks ──┬──> genres (top two)
//!                                 ├──> audio features ──> percentile bands
//!                                 └──> ISRC exclusions <── own playlists
//!                                            │
//!                      recommendations <─────┘
//!                                │
//! controller token ──> create playlist ──> add tracks ──> cover ──> follow
//! ```
//!
//! Console feedback uses the crate's `info!`, `success!`, `warning!` and
//! `error!` macros. A failure for one listener is reported and the run moves
//! on to the next one.

mod auth;
mod cover;
mod run;

pub use auth::auth;
pub use cover::cover;
pub use run::run;
