//! # CLI Module
//!
//! User facing commands of plmv. Each command loads what it needs from the
//! cache, talks to Spotify through [`crate::spotify`] and reports progress
//! with the crate's output macros.
//!
//! ## Commands
//!
//! - [`auth`] - log in with the authorization code (PKCE) or implicit grant
//! - [`logout`] - forget the stored token and profile
//! - [`status`] - show the stored session without touching the network
//! - [`whoami`] - fetch and cache the current profile
//! - [`playlists`] - list playlists, optionally filtered
//! - [`tracks`] - list the tracks of one playlist
//! - [`tracks`] also lists Liked Songs when given `liked`
//! - [`move_tracks`] - move tracks from a playlist or Liked Songs to another playlist
//! - [`create`] - create a playlist
//! - [`top`] - top tracks or artists
//! - [`recent`] - recently played tracks
//!
//! ## Failures
//!
//! Errors are printed and end the process. When an error means the stored
//! credentials are useless (refresh rejected, no refresh token, `401` after
//! refreshing) the session is wiped first so the next step is `plmv auth`.

mod auth;
mod insights;
mod move_tracks;
mod playlists;
mod session;
mod tracks;

pub use auth::auth;
pub use insights::TopKind;
pub use insights::recent;
pub use insights::top;
pub use move_tracks::move_tracks;
pub use playlists::create;
pub use playlists::playlists;
pub use session::logout;
pub use session::status;
pub use session::whoami;
pub use tracks::tracks;

use std::{sync::Arc, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};

use crate::{config::Config, error::Error, management, spotify::SpotifyClient, warning};

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb
}

/// Wipes the stored session when `err` means it can't be used anymore.
async fn end_session_if_needed(config: &Config, err: &Error) {
    if !err.is_auth_failure() {
        return;
    }
    match management::clear_session(config).await {
        Ok(()) => warning!("Stored credentials were removed. Please run plmv auth"),
        Err(e) => warning!("Failed to remove stored credentials: {}", e),
    }
}

async fn load_client(config: &Arc<Config>) -> Result<SpotifyClient, Error> {
    SpotifyClient::load(Arc::clone(config)).await
}
