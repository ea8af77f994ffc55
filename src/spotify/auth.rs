use std::{sync::Arc, time::Duration};

use reqwest::Client;
use tokio::sync::Mutex;

use crate::{
    config::Config,
    error::Error,
    info,
    management::{TokenManager, now_secs},
    server::{self, CallbackState},
    types::{CallbackFailure, GrantFlow, PendingAuth, Token, TokenErrorResponse, TokenResponse},
    utils, warning,
};

/// Runs the complete browser based OAuth flow and persists the resulting token.
///
/// 1. Generates the anti-CSRF `state` and, for the authorization code flow,
///    a PKCE verifier/challenge pair
/// 2. Stores the pending request before anything is sent to the browser
/// 3. Starts the local callback server
/// 4. Opens the authorize URL in the default browser
/// 5. Waits for the callback to record a token or a failure
/// 6. Saves the token to the cache
///
/// With the implicit grant there is no code to exchange and no refresh token;
/// the session ends once the access token expires.
pub async fn auth(config: Arc<Config>, http: Client, flow: GrantFlow) -> Result<Token, Error> {
    let state = utils::generate_state();
    let code_verifier = match flow {
        GrantFlow::AuthorizationCode => Some(utils::generate_code_verifier()),
        GrantFlow::Implicit => None,
    };
    let code_challenge = code_verifier
        .as_deref()
        .map(utils::generate_code_challenge);

    let pending = Arc::new(Mutex::new(Some(PendingAuth {
        flow,
        state: state.clone(),
        code_verifier,
        result: None,
    })));

    let listener = server::bind(&config.server_addr).await?;
    let server_state = CallbackState {
        pending: Arc::clone(&pending),
        config: Arc::clone(&config),
        http,
    };
    let server = tokio::spawn(async move {
        if let Err(e) = server::serve(listener, server_state).await {
            warning!("Callback server stopped: {}", e);
        }
    });

    let auth_url =
        utils::build_authorize_url(&config, flow, &state, code_challenge.as_deref());

    if webbrowser::open(&auth_url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        )
    } else {
        info!("Waiting for authorization in your browser ({} flow)...", flow);
    }

    let result = wait_for_token(Arc::clone(&pending), config.auth_timeout).await;
    server.abort();

    let token = match result {
        Some(Ok(token)) => token,
        Some(Err(failure)) => return Err(failure.into()),
        None => return Err(Error::AuthorizationTimeout),
    };

    TokenManager::new(token.clone(), config.token_path())
        .persist()
        .await?;
    Ok(token)
}

/// Polls the shared state until the callback handler recorded an outcome or
/// `max_wait` elapsed.
pub async fn wait_for_token(
    shared_state: Arc<Mutex<Option<PendingAuth>>>,
    max_wait: Duration,
) -> Option<Result<Token, CallbackFailure>> {
    use std::time::Instant;

    let start = Instant::now();

    while start.elapsed() < max_wait {
        let lock = shared_state.lock().await;
        if let Some(pending) = lock.as_ref() {
            if let Some(result) = &pending.result {
                return Some(result.clone());
            }
        }
        drop(lock);
        tokio::time::sleep(Duration::from_millis(250)).await;
    }

    None
}

/// Exchanges an authorization code for a token.
///
/// The PKCE verifier is sent when the flow started with a challenge. When a
/// client secret is configured it is sent with HTTP basic auth instead of
/// the plain `client_id` form field.
pub async fn exchange_code(
    http: &Client,
    config: &Config,
    code: &str,
    verifier: Option<&str>,
) -> Result<Token, Error> {
    let mut form: Vec<(&str, &str)> = vec![
        ("grant_type", "authorization_code"),
        ("code", code),
        ("redirect_uri", config.redirect_uri.as_str()),
    ];
    if let Some(verifier) = verifier {
        form.push(("code_verifier", verifier));
    }

    let response = token_request(http, config, form).await?;
    Ok(Token {
        access_token: response.access_token,
        token_type: response.token_type,
        refresh_token: response.refresh_token,
        scope: response.scope.unwrap_or_default(),
        expires_in: response.expires_in,
        obtained_at: now_secs(),
    })
}

/// Exchanges a refresh token for a fresh access token.
pub async fn refresh_token(
    http: &Client,
    config: &Config,
    refresh_token: &str,
) -> Result<TokenResponse, Error> {
    token_request(
        http,
        config,
        vec![
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ],
    )
    .await
}

async fn token_request<'a>(
    http: &Client,
    config: &'a Config,
    mut form: Vec<(&'a str, &'a str)>,
) -> Result<TokenResponse, Error> {
    let mut request = http.post(&config.token_url);
    match &config.client_secret {
        Some(secret) => request = request.basic_auth(&config.client_id, Some(secret)),
        None => form.push(("client_id", config.client_id.as_str())),
    }

    let response = request.form(&form).send().await?;
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(match serde_json::from_str::<TokenErrorResponse>(&body) {
            Ok(err) => Error::TokenEndpoint {
                code: err.error,
                description: err.error_description.unwrap_or_default(),
            },
            Err(_) => Error::Api {
                status,
                message: body,
            },
        });
    }

    Ok(serde_json::from_str(&body)?)
}
