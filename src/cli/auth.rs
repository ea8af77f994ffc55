use std::sync::Arc;

use reqwest::Client;

use crate::{
    config::Config,
    error,
    management::ProfileManager,
    spotify::{self, SpotifyClient},
    success,
    types::GrantFlow,
    warning,
};

pub async fn auth(config: Arc<Config>, implicit: bool) {
    let flow = if implicit {
        GrantFlow::Implicit
    } else {
        config.flow
    };

    let http = Client::new();
    if let Err(e) = spotify::auth::auth(Arc::clone(&config), http, flow).await {
        error!("Authentication failed: {}", e);
    }

    let client = match SpotifyClient::load(Arc::clone(&config)).await {
        Ok(client) => client,
        Err(e) => error!("Failed to load the new token: {}", e),
    };

    match spotify::profile::current_user(&client).await {
        Ok(user) => {
            let profile = ProfileManager::new(user, config.profile_path());
            if let Err(e) = profile.persist().await {
                warning!("Failed to save profile to cache: {}", e);
            }
            success!("Authenticated as {}", profile.user().name());
        }
        Err(e) => {
            warning!("Fetching your profile failed: {}", e);
            success!("Authentication successful!");
        }
    }

    if flow == GrantFlow::Implicit {
        warning!("Implicit grant tokens cannot be refreshed, run plmv auth again once it expires.");
    }
}
