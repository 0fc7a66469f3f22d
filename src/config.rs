//! Configuration management for the monthly playlist builder.
//!
//! Values come from environment variables, optionally loaded from a `.env`
//! file in the local data directory:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (scopes and cover layout only)
//!
//! Missing required variables are reported as an error naming the variable.

use std::{env, path::PathBuf};

use crate::cover::CoverConfig;

const DEFAULT_CONTROLLER_SCOPE: &str =
    "user-library-modify playlist-modify-public playlist-modify-private ugc-image-upload";
const DEFAULT_LISTENER_SCOPE: &str =
    "user-top-read playlist-read-private playlist-modify-public";

/// Loads environment variables from `monthlycli/.env` in the local data
/// directory.
///
/// The directory is created when missing. A missing `.env` file is not an
/// error, the process environment may already carry everything needed.
///
/// # Directory Structure
///
/// - Linux: `~/.local/share/monthlycli/.env`
/// - macOS: `~/Library/Application Support/monthlycli/.env`
/// - Windows: `%LOCALAPPDATA%/monthlycli/.env`
pub async fn load_env() -> Result<(), String> {
    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| format!("{}: {}", path.display(), e))?;
    }
    Ok(())
}

/// Root of everything the application keeps on disk.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("monthlycli");
    path
}

fn required(key: &str) -> Result<String, String> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(format!("{} must be set", key)),
    }
}

/// Address the local OAuth callback server binds to, e.g. `127.0.0.1:8080`.
pub fn server_addr() -> Result<String, String> {
    required("SERVER_ADDRESS")
}

pub fn spotify_client_id() -> Result<String, String> {
    required("SPOTIFY_API_AUTH_CLIENT_ID")
}

/// Must match the redirect URI registered for the Spotify application.
pub fn spotify_redirect_uri() -> Result<String, String> {
    required("SPOTIFY_API_REDIRECT_URI")
}

/// e.g. `https://accounts.spotify.com/authorize`
pub fn spotify_apiauth_url() -> Result<String, String> {
    required("SPOTIFY_API_AUTH_URL")
}

/// e.g. `https://api.spotify.com/v1`
pub fn spotify_apiurl() -> Result<String, String> {
    required("SPOTIFY_API_URL").map(|url| url.trim_end_matches('/').to_string())
}

/// e.g. `https://accounts.spotify.com/api/token`
pub fn spotify_apitoken_url() -> Result<String, String> {
    required("SPOTIFY_API_TOKEN_URL")
}

/// Account that owns every generated playlist.
pub fn controller_user() -> Result<String, String> {
    required("MONTHLY_CONTROLLER_USER")
}

/// Accounts playlists are generated for, from the comma separated
/// `MONTHLY_USERS`.
pub fn listener_users() -> Result<Vec<String>, String> {
    let users = parse_user_list(&required("MONTHLY_USERS")?);
    if users.is_empty() {
        return Err("MONTHLY_USERS does not name any user".to_string());
    }
    Ok(users)
}

pub fn parse_user_list(raw: &str) -> Vec<String> {
    let mut users: Vec<String> = Vec::new();
    for user in raw.split(',').map(str::trim).filter(|u| !u.is_empty()) {
        if !users.iter().any(|u| u == user) {
            users.push(user.to_string());
        }
    }
    users
}

pub fn controller_scope() -> String {
    env::var("MONTHLY_CONTROLLER_SCOPE").unwrap_or_else(|_| DEFAULT_CONTROLLER_SCOPE.to_string())
}

pub fn listener_scope() -> String {
    env::var("MONTHLY_LISTENER_SCOPE").unwrap_or_else(|_| DEFAULT_LISTENER_SCOPE.to_string())
}

/// Bold TrueType font for cover labels. Covers are drawn without labels
/// when unset.
pub fn cover_font_path() -> Option<PathBuf> {
    env::var("COVER_FONT_PATH")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from)
}

/// Cover layout. `COVER_KMEANS_RESTARTS` trades color stability for speed.
pub fn cover_config() -> CoverConfig {
    let mut config = CoverConfig::default();
    if let Some(restarts) = env::var("COVER_KMEANS_RESTARTS")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|r| *r > 0)
    {
        config.kmeans_restarts = restarts;
    }
    config
}
