use std::path::{Path, PathBuf};

use chrono::Utc;
use reqwest::Client;

use crate::{config::Config, error::Error, spotify, types::Token};

/// Tokens are treated as expired this many seconds before Spotify would
/// reject them.
pub const EXPIRY_MARGIN_SECS: u64 = 240;

pub fn now_secs() -> u64 {
    Utc::now().timestamp().max(0) as u64
}

pub struct TokenManager {
    token: Token,
    path: PathBuf,
}

impl TokenManager {
    pub fn new(token: Token, path: PathBuf) -> Self {
        TokenManager { token, path }
    }

    pub async fn load(path: &Path) -> Result<Self, Error> {
        let content = match async_fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::NotAuthenticated);
            }
            Err(e) => return Err(e.into()),
        };
        let token: Token = serde_json::from_str(&content)?;
        Ok(Self {
            token,
            path: path.to_path_buf(),
        })
    }

    pub async fn persist(&self) -> Result<(), Error> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(&self.token)?;
        async_fs::write(&self.path, json).await?;
        Ok(())
    }

    /// Deletes the stored token. A token that was never stored is not an error.
    pub async fn clear(path: &Path) -> Result<(), Error> {
        match async_fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn is_expired(&self, now: u64) -> bool {
        now >= self.token.expires_at().saturating_sub(EXPIRY_MARGIN_SECS)
    }

    /// Returns an access token that is not about to expire, refreshing and
    /// persisting it first when needed.
    pub async fn get_valid_token(&mut self, http: &Client, config: &Config) -> Result<String, Error> {
        if self.is_expired(now_secs()) {
            self.refresh(http, config).await?;
        }

        Ok(self.token.access_token.clone())
    }

    /// Refreshes after the API rejected `rejected`. Skipped when the stored
    /// token has already moved on, so concurrent failures refresh only once.
    pub async fn refresh_after_rejection(
        &mut self,
        rejected: &str,
        http: &Client,
        config: &Config,
    ) -> Result<String, Error> {
        if self.token.access_token == rejected {
            self.refresh(http, config).await?;
        }
        Ok(self.token.access_token.clone())
    }

    pub async fn refresh(&mut self, http: &Client, config: &Config) -> Result<(), Error> {
        let Some(refresh_token) = self.token.refresh_token.clone() else {
            return Err(Error::SessionExpired);
        };

        let response = spotify::auth::refresh_token(http, config, &refresh_token).await?;
        self.token = Token {
            access_token: response.access_token,
            token_type: response.token_type,
            // Spotify may or may not rotate the refresh token.
            refresh_token: response.refresh_token.or(Some(refresh_token)),
            scope: response.scope.unwrap_or_else(|| self.token.scope.clone()),
            expires_in: response.expires_in,
            obtained_at: now_secs(),
        };
        self.persist().await
    }

    pub fn current_token(&self) -> &Token {
        &self.token
    }
}
