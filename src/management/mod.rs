mod auth;
mod profile;

pub use auth::EXPIRY_MARGIN_SECS;
pub use auth::TokenManager;
pub use auth::now_secs;
pub use profile::ProfileManager;

use crate::{config::Config, error::Error};

/// Removes every stored credential and the cached profile.
pub async fn clear_session(config: &Config) -> Result<(), Error> {
    TokenManager::clear(&config.token_path()).await?;
    ProfileManager::clear(&config.profile_path()).await
}
