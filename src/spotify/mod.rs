//! # Spotify Integration Module
//!
//! Thin client for the parts of the Spotify Web API the monthly run needs.
//! Every function takes the bearer token of the account it acts for, so the
//! same calls serve both the listener accounts (read top tracks, follow
//! playlists) and the controller account (create playlists, upload covers).
//!
//! ## Architecture
//!
//! ```text
//! CLI (run, auth)
//!      ↓
//! Spotify Integration Layer
//!     ├── auth             OAuth 2.0 PKCE, token exchange and refresh
//!     ├── users            GET /me
//!     ├── tracks           top tracks, audio features, artists
//!     ├── playlist         list, read, create, fill, cover, follow
//!     └── recommendations  seeded recommendation queries
//!      ↓
//! HTTP Layer (reqwest, JSON)
//! ```
//!
//! ## Error Handling
//!
//! All calls go through [`send`], which waits out `429 Too Many Requests`
//! responses for up to two minutes as advertised by `Retry-After` and
//! retries `502 Bad Gateway` after ten seconds. Any other non-success status
//! becomes an error for the caller.
//!
//! ## API Coverage
//!
//! - `GET /me`, `GET /me/top/tracks`, `GET /me/playlists`
//! - `GET /audio-features`, `GET /artists`, `GET /recommendations`
//! - `GET /playlists/{id}/tracks`, `POST /users/{id}/playlists`
//! - `POST /playlists/{id}/tracks`, `PUT /playlists/{id}/images`
//! - `PUT /playlists/{id}/followers`
//! - `POST /api/token` for token exchange and refresh

use std::time::Duration;

use reqwest::{RequestBuilder, Response, StatusCode};
use tokio::time::sleep;

use crate::{Res, config, warning};

pub mod auth;
pub mod playlist;
pub mod recommendations;
pub mod tracks;
pub mod users;

const MAX_RETRY_AFTER_SECS: u64 = 120;

/// Absolute Web API URL for `path`.
pub(crate) fn api_url(path: &str) -> Res<String> {
    Ok(format!("{}{}", config::spotify_apiurl()?, path))
}

/// Sends the request built by `build`, rebuilding it for each retry.
pub(crate) async fn send<F>(build: F) -> Res<Response>
where
    F: Fn() -> RequestBuilder,
{
    loop {
        let response = build().send().await?;

        match response.status() {
            StatusCode::TOO_MANY_REQUESTS => {
                let retry_after = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(1);
                if retry_after > MAX_RETRY_AFTER_SECS {
                    warning!(
                        "Retry after has reached a abnormal high of {} seconds. Try again later.",
                        retry_after
                    );
                    return Err(format!("rate limited for {} seconds", retry_after).into());
                }
                sleep(Duration::from_secs(retry_after)).await;
            }
            StatusCode::BAD_GATEWAY => {
                sleep(Duration::from_secs(10)).await;
            }
            _ => return Ok(response.error_for_status()?),
        }
    }
}
