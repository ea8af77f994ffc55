use std::collections::HashMap;

use axum::{Extension, extract::Query, response::Html};

use crate::{
    management::now_secs,
    server::CallbackState,
    spotify,
    types::{CallbackFailure, GrantFlow, PendingAuth, Token},
    utils, warning,
};

/// Forwards the URL fragment of an implicit grant redirect to the server,
/// browsers never send it on their own.
const IMPLICIT_RELAY_PAGE: &str = r#"<!doctype html>
<html>
  <body>
    <p>Completing login...</p>
    <script>
      var fragment = window.location.hash.substring(1);
      window.location.replace("/callback/implicit?" + fragment);
    </script>
  </body>
</html>"#;

const SUCCESS_PAGE: &str = "<h2>Authentication successful.</h2><p>Close this browser window.</p>";

fn failure_page(message: &str) -> Html<String> {
    Html(format!("<h4>Login failed.</h4><p>{}</p>", message))
}

/// Redirect target of the authorization server.
///
/// Handles the authorization code response directly. Without a `code` the
/// answer of an implicit grant is assumed and the relay page is served.
pub async fn callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(shared): Extension<CallbackState>,
) -> Html<String> {
    let mut lock = shared.pending.lock().await;
    let Some(pending) = lock.as_mut() else {
        return Html("<h4>No login in progress.</h4>".to_string());
    };
    if matches!(pending.result, Some(Ok(_))) {
        return Html("<h4>Login already completed.</h4>".to_string());
    }

    if let Some(error) = params.get("error") {
        pending.result = Some(Err(CallbackFailure::Denied(error.clone())));
        return failure_page(error);
    }

    let Some(code) = params.get("code") else {
        return match pending.flow {
            GrantFlow::Implicit => Html(IMPLICIT_RELAY_PAGE.to_string()),
            GrantFlow::AuthorizationCode => {
                pending.result = Some(Err(CallbackFailure::MissingToken));
                failure_page("Missing authorization code.")
            }
        };
    };

    if let Err(page) = check_state(pending, params.get("state"), shared.config.skip_state_check) {
        return page;
    }

    let verifier = pending.code_verifier.clone();
    match spotify::auth::exchange_code(&shared.http, &shared.config, code, verifier.as_deref())
        .await
    {
        Ok(token) => {
            pending.result = Some(Ok(token));
            Html(SUCCESS_PAGE.to_string())
        }
        Err(e) => {
            warning!("Token exchange failed: {}", e);
            pending.result = Some(Err(CallbackFailure::Exchange(e.to_string())));
            failure_page("Token exchange failed.")
        }
    }
}

/// Receives the fragment of an implicit grant redirect as query parameters.
pub async fn implicit_callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(shared): Extension<CallbackState>,
) -> Html<String> {
    let mut lock = shared.pending.lock().await;
    let Some(pending) = lock.as_mut() else {
        return Html("<h4>No login in progress.</h4>".to_string());
    };
    if matches!(pending.result, Some(Ok(_))) {
        return Html("<h4>Login already completed.</h4>".to_string());
    }

    if let Some(error) = params.get("error") {
        pending.result = Some(Err(CallbackFailure::Denied(error.clone())));
        return failure_page(error);
    }

    if let Err(page) = check_state(pending, params.get("state"), shared.config.skip_state_check) {
        return page;
    }

    let Some(access_token) = params.get("access_token") else {
        pending.result = Some(Err(CallbackFailure::MissingToken));
        return failure_page("Missing access token.");
    };

    pending.result = Some(Ok(Token {
        access_token: access_token.clone(),
        token_type: params
            .get("token_type")
            .cloned()
            .unwrap_or_else(|| "Bearer".to_string()),
        refresh_token: None,
        scope: params.get("scope").cloned().unwrap_or_default(),
        expires_in: params
            .get("expires_in")
            .and_then(|v| v.parse().ok())
            .unwrap_or(3600),
        obtained_at: now_secs(),
    }));
    Html(SUCCESS_PAGE.to_string())
}

fn check_state(
    pending: &mut PendingAuth,
    received: Option<&String>,
    skip: bool,
) -> Result<(), Html<String>> {
    match utils::verify_state(&pending.state, received.map(String::as_str), skip) {
        Ok(true) => Ok(()),
        Ok(false) => {
            warning!("Ignoring state mismatch in authorization response");
            Ok(())
        }
        Err(_) => {
            pending.result = Some(Err(CallbackFailure::StateMismatch {
                expected: pending.state.clone(),
                received: received.cloned().unwrap_or_default(),
            }));
            Err(failure_page("State mismatch, the response was not requested by plmv."))
        }
    }
}
