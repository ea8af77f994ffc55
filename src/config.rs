//! Configuration management for plmv.
//!
//! Values come from environment variables, which may be provided through a
//! `.env` file in the local data directory. Everything except the client id
//! has a sensible default pointing at the public Spotify endpoints.
//!
//! The lookup order is:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults

use std::{env, path::PathBuf, str::FromStr, time::Duration};

use crate::{Res, error::Error, types::GrantFlow};

pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8888";
pub const DEFAULT_REDIRECT_URI: &str = "http://127.0.0.1:8888/callback";
pub const DEFAULT_SCOPE: &str = "user-read-private playlist-read-private playlist-read-collaborative playlist-modify-private playlist-modify-public user-library-read user-library-modify user-top-read user-read-recently-played";
pub const DEFAULT_AUTH_TIMEOUT_SECS: u64 = 120;

/// Loads environment variables from a `.env` file in the local data directory.
///
/// The directory is created when missing so users know where to put the file.
/// A missing `.env` is fine, the process environment may already carry
/// everything that is needed.
///
/// # Directory Structure
///
/// - Linux: `~/.local/share/plmv/.env`
/// - macOS: `~/Library/Application Support/plmv/.env`
/// - Windows: `%LOCALAPPDATA%/plmv/.env`
pub async fn load_env() -> Res<()> {
    let path = app_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent).await?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| Error::InvalidConfig {
            name: ".env",
            value: e.to_string(),
        })?;
    }
    Ok(())
}

/// Base directory of all plmv files.
pub fn app_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("plmv");
    path
}

/// Runtime configuration resolved from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub client_id: String,
    pub client_secret: Option<String>,
    pub redirect_uri: String,
    pub scope: String,
    pub auth_url: String,
    pub token_url: String,
    pub api_url: String,
    pub server_addr: String,
    pub flow: GrantFlow,
    /// Accept authorization responses whose `state` does not match. Debugging only.
    pub skip_state_check: bool,
    pub auth_timeout: Duration,
    pub cache_dir: PathBuf,
}

impl Config {
    /// Reads the configuration from environment variables.
    ///
    /// Only `SPOTIFY_API_AUTH_CLIENT_ID` is required. Every other value falls
    /// back to the public Spotify endpoints and the local callback address.
    ///
    /// # Returns
    ///
    /// The resolved configuration, or `MissingConfig` / `InvalidConfig` naming
    /// the variable that could not be used.
    ///
    /// # Example
    ///
    /// ```
    /// config::load_env().await?;
    /// let config = Config::from_env()?;
    /// println!("Callback server on {}", config.server_addr);
    /// ```
    pub fn from_env() -> Result<Self, Error> {
        let client_id = required("SPOTIFY_API_AUTH_CLIENT_ID")?;

        let flow = match optional("PLMV_GRANT_FLOW") {
            Some(v) => GrantFlow::from_str(&v).map_err(|_| Error::InvalidConfig {
                name: "PLMV_GRANT_FLOW",
                value: v,
            })?,
            None => GrantFlow::AuthorizationCode,
        };

        let skip_state_check = match optional("PLMV_SKIP_STATE_CHECK") {
            Some(v) => parse_bool(&v).ok_or(Error::InvalidConfig {
                name: "PLMV_SKIP_STATE_CHECK",
                value: v,
            })?,
            None => false,
        };

        let auth_timeout = match optional("PLMV_AUTH_TIMEOUT") {
            Some(v) => v.parse::<u64>().map_err(|_| Error::InvalidConfig {
                name: "PLMV_AUTH_TIMEOUT",
                value: v,
            })?,
            None => DEFAULT_AUTH_TIMEOUT_SECS,
        };

        let cache_dir = optional("PLMV_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| app_dir().join("cache"));

        Ok(Self {
            client_id,
            client_secret: optional("SPOTIFY_API_AUTH_CLIENT_SECRET"),
            redirect_uri: optional("SPOTIFY_API_REDIRECT_URI")
                .unwrap_or_else(|| DEFAULT_REDIRECT_URI.to_string()),
            scope: optional("SPOTIFY_API_AUTH_SCOPE").unwrap_or_else(|| DEFAULT_SCOPE.to_string()),
            auth_url: optional("SPOTIFY_API_AUTH_URL")
                .unwrap_or_else(|| DEFAULT_AUTH_URL.to_string()),
            token_url: optional("SPOTIFY_API_TOKEN_URL")
                .unwrap_or_else(|| DEFAULT_TOKEN_URL.to_string()),
            api_url: optional("SPOTIFY_API_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            server_addr: optional("SERVER_ADDRESS")
                .unwrap_or_else(|| DEFAULT_SERVER_ADDRESS.to_string()),
            flow,
            skip_state_check,
            auth_timeout: Duration::from_secs(auth_timeout),
            cache_dir,
        })
    }

    /// Configuration with default endpoints, used as a base by tests and
    /// callers that wire things up by hand.
    pub fn with_client_id(client_id: &str) -> Self {
        Self {
            client_id: client_id.to_string(),
            client_secret: None,
            redirect_uri: DEFAULT_REDIRECT_URI.to_string(),
            scope: DEFAULT_SCOPE.to_string(),
            auth_url: DEFAULT_AUTH_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            server_addr: DEFAULT_SERVER_ADDRESS.to_string(),
            flow: GrantFlow::AuthorizationCode,
            skip_state_check: false,
            auth_timeout: Duration::from_secs(DEFAULT_AUTH_TIMEOUT_SECS),
            cache_dir: app_dir().join("cache"),
        }
    }

    pub fn token_path(&self) -> PathBuf {
        self.cache_dir.join("token.json")
    }

    pub fn profile_path(&self) -> PathBuf {
        self.cache_dir.join("profile.json")
    }
}

fn required(name: &'static str) -> Result<String, Error> {
    optional(name).ok_or(Error::MissingConfig(name))
}

fn optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_boolean_flags() {
        assert_eq!(parse_bool("true"), Some(true));
        assert_eq!(parse_bool(" YES "), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn default_config_derives_cache_files() {
        let mut config = Config::with_client_id("abc");
        config.cache_dir = PathBuf::from("/tmp/plmv-test");
        assert_eq!(config.token_path(), PathBuf::from("/tmp/plmv-test/token.json"));
        assert_eq!(
            config.profile_path(),
            PathBuf::from("/tmp/plmv-test/profile.json")
        );
        assert_eq!(config.flow, GrantFlow::AuthorizationCode);
    }
}
