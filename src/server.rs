use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use reqwest::Client;
use tokio::{net::TcpListener, sync::Mutex};

use crate::{api, config::Config, error::Error, types::PendingAuth};

/// Everything the callback handlers need to finish a pending authorization.
#[derive(Clone)]
pub struct CallbackState {
    pub pending: Arc<Mutex<Option<PendingAuth>>>,
    pub config: Arc<Config>,
    pub http: Client,
}

pub fn router(state: CallbackState) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/callback", get(api::callback))
        .route("/callback/implicit", get(api::implicit_callback))
        .layer(Extension(state))
}

/// Binds the callback listener. Done before the browser is opened so a busy
/// port is reported instead of leaving the redirect without a receiver.
pub async fn bind(addr: &str) -> Result<TcpListener, Error> {
    Ok(TcpListener::bind(addr).await?)
}

pub async fn serve(listener: TcpListener, state: CallbackState) -> Result<(), Error> {
    axum::serve(listener, router(state)).await?;
    Ok(())
}
