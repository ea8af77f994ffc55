use std::{sync::Arc, time::Duration};

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use tokio::{sync::Mutex, time::sleep};

use crate::{
    config::Config,
    error::Error,
    management::TokenManager,
    types::{ApiErrorResponse, Page, Token},
};

const MAX_RATE_LIMIT_RETRIES: u32 = 3;
const MAX_RETRY_AFTER_SECS: u64 = 120;

/// Bearer authenticated access to the Web API.
///
/// Tokens are checked before every request and refreshed when they are about
/// to expire. A `401` triggers one refresh and exactly one retry. `429`
/// answers are retried after the `Retry-After` delay.
pub struct SpotifyClient {
    http: Client,
    config: Arc<Config>,
    tokens: Mutex<TokenManager>,
}

impl SpotifyClient {
    pub fn new(config: Arc<Config>, http: Client, tokens: TokenManager) -> Self {
        Self {
            http,
            config,
            tokens: Mutex::new(tokens),
        }
    }

    /// Client backed by the token stored by `plmv auth`.
    pub async fn load(config: Arc<Config>) -> Result<Self, Error> {
        let tokens = TokenManager::load(&config.token_path()).await?;
        Ok(Self::new(config, Client::new(), tokens))
    }

    pub async fn current_token(&self) -> Token {
        self.tokens.lock().await.current_token().clone()
    }

    /// Absolute URL for an API path. Absolute URLs, such as `next` links of
    /// paged responses, are returned untouched.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!("{}/{}", self.config.api_url, path.trim_start_matches('/'))
        }
    }

    /// Sends the request produced by `build` with a bearer token.
    ///
    /// `build` is called again for every retry since a `RequestBuilder` can't
    /// be reused once sent.
    pub async fn send<F>(&self, build: F) -> Result<Response, Error>
    where
        F: Fn(&Client) -> RequestBuilder,
    {
        let mut token = self
            .tokens
            .lock()
            .await
            .get_valid_token(&self.http, &self.config)
            .await?;
        let mut refreshed = false;
        let mut rate_limited = 0;

        loop {
            let response = build(&self.http).bearer_auth(&token).send().await?;

            match response.status() {
                StatusCode::UNAUTHORIZED if !refreshed => {
                    token = self
                        .tokens
                        .lock()
                        .await
                        .refresh_after_rejection(&token, &self.http, &self.config)
                        .await?;
                    refreshed = true;
                }
                StatusCode::UNAUTHORIZED => return Err(Error::Unauthorized),
                StatusCode::TOO_MANY_REQUESTS if rate_limited < MAX_RATE_LIMIT_RETRIES => {
                    let wait = retry_after(&response);
                    if wait > MAX_RETRY_AFTER_SECS {
                        return Err(api_error(response).await);
                    }
                    rate_limited += 1;
                    sleep(Duration::from_secs(wait)).await;
                }
                status if status.is_success() => return Ok(response),
                _ => return Err(api_error(response).await),
            }
        }
    }

    /// Fetches and decodes a JSON resource.
    ///
    /// # Arguments
    ///
    /// * `path` - API path relative to the configured base URL, or an absolute URL
    ///
    /// # Returns
    ///
    /// The decoded body, or the API error when Spotify answers with a failure
    /// status after the retries described on [`SpotifyClient::send`].
    ///
    /// # Example
    ///
    /// ```
    /// let user: User = client.get_json("me").await?;
    /// ```
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path);
        let response = self.send(|http| http.get(&url)).await?;
        Ok(response.json::<T>().await?)
    }

    /// Sends `body` as JSON with `POST` and decodes the JSON answer.
    ///
    /// # Arguments
    ///
    /// * `path` - API path relative to the configured base URL
    /// * `body` - Request payload
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, Error>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        let response = self.send(|http| http.post(&url).json(body)).await?;
        Ok(response.json::<T>().await?)
    }

    /// Sends `body` as JSON with `DELETE` and decodes the JSON answer.
    ///
    /// Used for removing playlist items, where the answer carries the new
    /// snapshot id.
    pub async fn delete_json<B, T>(&self, path: &str, body: &B) -> Result<T, Error>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        let response = self.send(|http| http.delete(&url).json(body)).await?;
        Ok(response.json::<T>().await?)
    }

    /// `DELETE` without a body, for endpoints that answer with an empty body.
    pub async fn delete(&self, path: &str) -> Result<(), Error> {
        let url = self.url(path);
        self.send(|http| http.delete(&url)).await?;
        Ok(())
    }

    /// Collects every item of a paged endpoint by following `next` links.
    pub async fn get_all_pages<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, Error> {
        let mut items = Vec::new();
        let mut next = Some(self.url(path));

        while let Some(url) = next {
            let page: Page<T> = self.get_json(&url).await?;
            items.extend(page.items);
            next = page.next;
        }

        Ok(items)
    }
}

fn retry_after(response: &Response) -> u64 {
    response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(1)
}

async fn api_error(response: Response) -> Error {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ApiErrorResponse>(&body) {
        Ok(err) => err.error.message,
        Err(_) if body.trim().is_empty() => status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string(),
        Err(_) => body,
    };
    Error::Api { status, message }
}
