use std::path::PathBuf;

use chrono::Utc;

use crate::{config, spotify, types::Token, warning};

/// Seconds before expiry at which a token is already treated as expired.
const EXPIRY_MARGIN_SECS: u64 = 240;

/// Cached OAuth token of one Spotify account.
pub struct TokenManager {
    user: String,
    token: Token,
}

impl TokenManager {
    pub fn new(user: impl Into<String>, token: Token) -> Self {
        TokenManager {
            user: user.into(),
            token,
        }
    }

    pub async fn load(user: &str) -> Result<Self, String> {
        let path = Self::token_path(user);
        let content = async_fs::read_to_string(&path)
            .await
            .map_err(|e| format!("{}: {}", path.display(), e))?;
        let token: Token = serde_json::from_str(&content).map_err(|e| e.to_string())?;
        Ok(Self {
            user: user.to_string(),
            token,
        })
    }

    pub async fn persist(&self) -> Result<(), String> {
        let path = Self::token_path(&self.user);
        if let Some(parent) = path.parent() {
            async_fs::create_dir_all(parent)
                .await
                .map_err(|e| e.to_string())?;
        }

        let json = serde_json::to_string_pretty(&self.token).map_err(|e| e.to_string())?;
        async_fs::write(path, json).await.map_err(|e| e.to_string())
    }

    /// Access token, refreshed first when it is about to expire. A failed
    /// refresh keeps the old token and lets the API reject it.
    pub async fn get_valid_token(&mut self) -> String {
        if self.is_expired(Utc::now().timestamp() as u64) {
            match spotify::auth::refresh_token(&self.token.refresh_token).await {
                Ok(new_token) => {
                    self.token = new_token;
                    if let Err(e) = self.persist().await {
                        warning!("Failed to cache refreshed token for {}: {}", self.user, e);
                    }
                }
                Err(e) => warning!("Failed to refresh token for {}: {}", self.user, e),
            }
        }

        self.token.access_token.clone()
    }

    pub fn is_expired(&self, now: u64) -> bool {
        let lifetime = self.token.expires_in.saturating_sub(EXPIRY_MARGIN_SECS);
        now >= self.token.obtained_at + lifetime
    }

    /// True when every space separated entry of `scope` was granted.
    pub fn covers_scope(&self, scope: &str) -> bool {
        let granted: Vec<&str> = self.token.scope.split_whitespace().collect();
        scope.split_whitespace().all(|s| granted.contains(&s))
    }

    /// Token cache file, one per account name.
    pub fn token_path(user: &str) -> PathBuf {
        let file: String = user
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        let mut path = config::data_dir();
        path.push("cache/tokens");
        path.push(format!("{}.json", file));
        path
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn current_token(&self) -> &Token {
        &self.token
    }
}
