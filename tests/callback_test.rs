mod common;

use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use axum::{Form, Json, Router, extract::State, routing::post};
use plmv::{
    server::{self, CallbackState},
    spotify,
    types::{CallbackFailure, GrantFlow, PendingAuth},
};
use reqwest::Client;
use serde_json::{Value, json};
use tokio::sync::Mutex;

async fn exchange(
    State(calls): State<Arc<AtomicUsize>>,
    Form(form): Form<HashMap<String, String>>,
) -> Json<Value> {
    calls.fetch_add(1, Ordering::SeqCst);
    assert_eq!(
        form.get("grant_type").map(String::as_str),
        Some("authorization_code")
    );
    assert_eq!(form.get("code").map(String::as_str), Some("the-code"));
    assert_eq!(form.get("code_verifier").map(String::as_str), Some("verifier"));
    assert_eq!(
        form.get("redirect_uri").map(String::as_str),
        Some("http://127.0.0.1:8888/callback")
    );
    Json(json!({
        "access_token": "access-1",
        "token_type": "Bearer",
        "refresh_token": "refresh-1",
        "scope": "playlist-read-private",
        "expires_in": 3600,
    }))
}

struct Harness {
    base: String,
    pending: Arc<Mutex<Option<PendingAuth>>>,
    exchanges: Arc<AtomicUsize>,
}

impl Harness {
    async fn get(&self, path: &str) -> String {
        Client::new()
            .get(format!("{}{}", self.base, path))
            .send()
            .await
            .unwrap()
            .text()
            .await
            .unwrap()
    }

    async fn result(&self) -> Option<Result<plmv::types::Token, CallbackFailure>> {
        self.pending.lock().await.as_ref().and_then(|p| p.result.clone())
    }
}

async fn harness(flow: GrantFlow, skip_state_check: bool) -> Harness {
    let exchanges = Arc::new(AtomicUsize::new(0));
    let (token_listener, token_base) = common::bind().await;
    common::serve(
        token_listener,
        Router::new()
            .route("/api/token", post(exchange))
            .with_state(Arc::clone(&exchanges)),
    );

    let mut config = common::config(&token_base, "callback");
    config.skip_state_check = skip_state_check;

    let pending = Arc::new(Mutex::new(Some(PendingAuth {
        flow,
        state: "expected-state".to_string(),
        code_verifier: match flow {
            GrantFlow::AuthorizationCode => Some("verifier".to_string()),
            GrantFlow::Implicit => None,
        },
        result: None,
    })));

    let (listener, base) = common::bind().await;
    let state = CallbackState {
        pending: Arc::clone(&pending),
        config: Arc::new(config),
        http: Client::new(),
    };
    tokio::spawn(async move {
        server::serve(listener, state).await.unwrap();
    });

    Harness {
        base,
        pending,
        exchanges,
    }
}

#[tokio::test]
async fn test_code_is_exchanged_when_state_matches() {
    let h = harness(GrantFlow::AuthorizationCode, false).await;

    let body = h
        .get("/callback?code=the-code&state=expected-state")
        .await;

    assert!(body.contains("Authentication successful"));
    let token = h.result().await.unwrap().unwrap();
    assert_eq!(token.access_token, "access-1");
    assert_eq!(token.refresh_token.as_deref(), Some("refresh-1"));
    assert_eq!(token.expires_in, 3600);
    assert_eq!(h.exchanges.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_state_mismatch_is_fatal() {
    let h = harness(GrantFlow::AuthorizationCode, false).await;

    let body = h.get("/callback?code=the-code&state=forged").await;

    assert!(body.contains("State mismatch"));
    assert_eq!(
        h.result().await,
        Some(Err(CallbackFailure::StateMismatch {
            expected: "expected-state".to_string(),
            received: "forged".to_string(),
        }))
    );
    assert_eq!(h.exchanges.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_missing_state_is_a_mismatch() {
    let h = harness(GrantFlow::AuthorizationCode, false).await;

    h.get("/callback?code=the-code").await;

    assert!(matches!(
        h.result().await,
        Some(Err(CallbackFailure::StateMismatch { .. }))
    ));
}

#[tokio::test]
async fn test_state_mismatch_tolerated_when_check_is_skipped() {
    let h = harness(GrantFlow::AuthorizationCode, true).await;

    h.get("/callback?code=the-code&state=forged").await;

    assert!(matches!(h.result().await, Some(Ok(_))));
    assert_eq!(h.exchanges.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_denied_authorization_is_recorded() {
    let h = harness(GrantFlow::AuthorizationCode, false).await;

    h.get("/callback?error=access_denied&state=expected-state")
        .await;

    assert_eq!(
        h.result().await,
        Some(Err(CallbackFailure::Denied("access_denied".to_string())))
    );
}

#[tokio::test]
async fn test_implicit_grant_relays_fragment() {
    let h = harness(GrantFlow::Implicit, false).await;

    let relay = h.get("/callback").await;
    assert!(relay.contains("/callback/implicit?"));
    assert!(relay.contains("window.location.hash"));
    assert_eq!(h.result().await, None);

    let body = h
        .get("/callback/implicit?access_token=implicit-1&token_type=Bearer&expires_in=1800&state=expected-state")
        .await;

    assert!(body.contains("Authentication successful"));
    let token = h.result().await.unwrap().unwrap();
    assert_eq!(token.access_token, "implicit-1");
    assert_eq!(token.refresh_token, None);
    assert_eq!(token.expires_in, 1800);
    assert_eq!(h.exchanges.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_implicit_grant_checks_state() {
    let h = harness(GrantFlow::Implicit, false).await;

    h.get("/callback/implicit?access_token=implicit-1&expires_in=1800&state=forged")
        .await;

    assert!(matches!(
        h.result().await,
        Some(Err(CallbackFailure::StateMismatch { .. }))
    ));
}

#[tokio::test]
async fn test_callback_without_pending_request() {
    let h = harness(GrantFlow::AuthorizationCode, false).await;
    *h.pending.lock().await = None;

    let body = h.get("/callback?code=the-code&state=expected-state").await;

    assert!(body.contains("No login in progress"));
    assert_eq!(h.exchanges.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_health_reports_version() {
    let h = harness(GrantFlow::AuthorizationCode, false).await;

    let body: Value = serde_json::from_str(&h.get("/health").await).unwrap();

    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "plmv");
}

#[tokio::test]
async fn test_wait_for_token_returns_recorded_result() {
    let h = harness(GrantFlow::AuthorizationCode, false).await;
    h.get("/callback?code=the-code&state=expected-state").await;

    let result = spotify::auth::wait_for_token(Arc::clone(&h.pending), Duration::from_secs(2)).await;

    assert_eq!(result.unwrap().unwrap().access_token, "access-1");
}

#[tokio::test]
async fn test_wait_for_token_times_out() {
    let pending = Arc::new(Mutex::new(Some(PendingAuth {
        flow: GrantFlow::AuthorizationCode,
        state: "s".to_string(),
        code_verifier: None,
        result: None,
    })));

    let result = spotify::auth::wait_for_token(pending, Duration::from_millis(300)).await;

    assert!(result.is_none());
}
