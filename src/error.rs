use reqwest::StatusCode;
use thiserror::Error;

use crate::types::CallbackFailure;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0} must be set")]
    MissingConfig(&'static str),
    #[error("Invalid value for {name}: {value}")]
    InvalidConfig { name: &'static str, value: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Spotify API returned {status}: {message}")]
    Api { status: StatusCode, message: String },
    #[error("Token endpoint rejected the request ({code}): {description}")]
    TokenEndpoint { code: String, description: String },

    #[error("State mismatch in authorization response (expected {expected}, got {received})")]
    StateMismatch { expected: String, received: String },
    #[error("Authorization was denied: {0}")]
    AuthorizationDenied(String),
    #[error("Authorization callback failed: {0}")]
    CallbackFailed(String),
    #[error("Authorization failed or timed out")]
    AuthorizationTimeout,
    #[error("Not logged in. Please run plmv auth")]
    NotAuthenticated,
    #[error("Session expired and cannot be refreshed. Please run plmv auth")]
    SessionExpired,
    #[error("Spotify rejected the access token after refreshing it")]
    Unauthorized,

    #[error("No playlist matches '{0}'")]
    PlaylistNotFound(String),
    #[error("'{reference}' matches {count} playlists, use the playlist id instead")]
    AmbiguousPlaylist { reference: String, count: usize },
    #[error("Playlist '{0}' is neither owned by you nor collaborative")]
    NotEditable(String),
    #[error("Source and target playlist are the same")]
    SamePlaylist,
}

impl From<CallbackFailure> for Error {
    fn from(failure: CallbackFailure) -> Self {
        match failure {
            CallbackFailure::Denied(reason) => Error::AuthorizationDenied(reason),
            CallbackFailure::StateMismatch { expected, received } => {
                Error::StateMismatch { expected, received }
            }
            CallbackFailure::Exchange(message) => Error::CallbackFailed(message),
            CallbackFailure::MissingToken => {
                Error::CallbackFailed("no access token in redirect".to_string())
            }
        }
    }
}

impl Error {
    /// True when the stored credentials can no longer be used and should be
    /// wiped before sending the user back to `plmv auth`.
    pub fn is_auth_failure(&self) -> bool {
        match self {
            Error::SessionExpired | Error::Unauthorized => true,
            Error::TokenEndpoint { code, .. } => code == "invalid_grant",
            _ => false,
        }
    }
}

pub type Res<T> = std::result::Result<T, Error>;
