use std::sync::Arc;

use crate::{
    cli::{end_session_if_needed, load_client},
    config::Config,
    error, info,
    management::{self, ProfileManager, TokenManager, now_secs},
    spotify, success, utils, warning,
};

pub async fn logout(config: Arc<Config>) {
    match management::clear_session(&config).await {
        Ok(()) => success!("Logged out."),
        Err(e) => error!("Failed to remove stored credentials: {}", e),
    }
}

/// Shows the stored session. Does not touch the network.
pub async fn status(config: Arc<Config>) {
    let tokens = match TokenManager::load(&config.token_path()).await {
        Ok(tokens) => tokens,
        Err(e) => {
            warning!("{}", e);
            return;
        }
    };
    let token = tokens.current_token();
    let remaining = token.expires_at() as i64 - now_secs() as i64;

    match ProfileManager::load(&config.profile_path()).await {
        Ok(profile) => info!("Logged in as {}", profile.user().name().bold()),
        Err(_) => info!("Logged in"),
    }
    info!("Access token expires in {}", utils::format_remaining(remaining));
    if token.refresh_token.is_some() {
        info!("Refresh token stored, the session renews itself");
    } else {
        warning!("No refresh token stored, run plmv auth once the token expires");
    }
    if !token.scope.is_empty() {
        info!("Scopes: {}", token.scope);
    }
}

pub async fn whoami(config: Arc<Config>) {
    let client = match load_client(&config).await {
        Ok(client) => client,
        Err(e) => error!("{}", e),
    };

    let user = match spotify::profile::current_user(&client).await {
        Ok(user) => user,
        Err(e) => {
            end_session_if_needed(&config, &e).await;
            error!("Failed to fetch profile: {}", e)
        }
    };

    let profile = ProfileManager::new(user, config.profile_path());
    if let Err(e) = profile.persist().await {
        warning!("Failed to save profile to cache: {}", e);
    }

    let user = profile.user();
    info!("{} ({})", user.name().bold(), user.id);
    if let Some(email) = &user.email {
        info!("Email: {}", email);
    }
    if let Some(country) = &user.country {
        info!("Country: {}", country);
    }
    if let Some(product) = &user.product {
        info!("Plan: {}", product);
    }
}
