#![allow(dead_code)]

use std::path::PathBuf;

use axum::Router;
use plmv::{config::Config, types::Token, utils};
use tokio::net::TcpListener;

/// Binds an ephemeral port and returns the listener with its base URL.
pub async fn bind() -> (TcpListener, String) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    (listener, base)
}

pub fn serve(listener: TcpListener, router: Router) {
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
}

pub fn temp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("plmv-{}-{}", name, utils::generate_state()))
}

/// Configuration pointing all endpoints at a mock server.
pub fn config(base: &str, name: &str) -> Config {
    let mut config = Config::with_client_id("client-id");
    config.api_url = format!("{}/v1", base);
    config.token_url = format!("{}/api/token", base);
    config.auth_url = format!("{}/authorize", base);
    config.cache_dir = temp_dir(name);
    config
}

pub fn token(access: &str, refresh: Option<&str>, expires_in: u64, obtained_at: u64) -> Token {
    Token {
        access_token: access.to_string(),
        token_type: "Bearer".to_string(),
        refresh_token: refresh.map(str::to_string),
        scope: "playlist-read-private".to_string(),
        expires_in,
        obtained_at,
    }
}
