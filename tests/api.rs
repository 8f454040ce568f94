//! End-to-end tests of the REST surface over the in-memory store, a
//! scripted events feed and a scripted identity provider.

#![allow(clippy::panic)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

use wager_gateway::api;
use wager_gateway::app_state::AppState;
use wager_gateway::domain::UserId;
use wager_gateway::identity::{AuthSession, AuthUser, IdentityError, IdentityProvider};
use wager_gateway::oracle::{EventOracle, OracleError};
use wager_gateway::persistence::MemoryStore;

const ALICE_TOKEN: &str = "tok-alice";
const ROTATING_TOKEN: &str = "tok-bob-old";

#[derive(Debug)]
struct ScriptedIdentity;

fn alice() -> AuthSession {
    AuthSession {
        user: AuthUser {
            id: UserId::from("alice"),
            email: "alice@example.com".into(),
            name: Some("Alice".into()),
            avatar: None,
            created: None,
            updated: None,
        },
        token: ALICE_TOKEN.into(),
    }
}

#[async_trait]
impl IdentityProvider for ScriptedIdentity {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, IdentityError> {
        if email == "alice@example.com" && password == "secret" {
            Ok(alice())
        } else {
            Err(IdentityError::InvalidCredentials)
        }
    }

    async fn refresh(&self, token: &str) -> Result<AuthSession, IdentityError> {
        match token {
            ALICE_TOKEN => Ok(alice()),
            ROTATING_TOKEN => Ok(AuthSession {
                user: AuthUser {
                    id: UserId::from("bob"),
                    email: "bob@example.com".into(),
                    name: None,
                    avatar: None,
                    created: None,
                    updated: None,
                },
                token: "tok-bob-new".into(),
            }),
            _ => Err(IdentityError::InvalidToken),
        }
    }
}

#[derive(Debug)]
struct ScriptedFeed(Option<Value>);

#[async_trait]
impl EventOracle for ScriptedFeed {
    async fn fetch_feed(&self) -> Result<Value, OracleError> {
        self.0
            .clone()
            .ok_or_else(|| OracleError::Unreachable("connection refused".into()))
    }
}

fn feed() -> Value {
    json!({
        "events": [
            {
                "eventId": 1001, "round": 18, "tournament": "RPL",
                "date": "2026-10-16", "mskTime": "20:00:00",
                "team1": "Spartak", "team2": "CSKA", "status": "upcoming",
                "score": null,
                "odds": { "win1": 2.5, "draw": 3.5, "win2": 4.1 }
            },
            {
                "eventId": 1002, "round": 18, "tournament": "RPL",
                "date": "2026-10-16", "mskTime": "17:00:00",
                "team1": "Zenit", "team2": "Dynamo", "status": "live",
                "score": { "team1": 1, "team2": 0 },
                "odds": { "win1": 2.1, "draw": 3.3, "win2": 3.3 }
            }
        ]
    })
}

fn app_with_feed(body: Option<Value>) -> Router {
    let state = AppState::new(
        Arc::new(MemoryStore::new()),
        Arc::new(ScriptedFeed(body)),
        Arc::new(ScriptedIdentity),
    );
    api::build_router().with_state(state)
}

fn app() -> Router {
    app_with_feed(Some(feed()))
}

async fn call(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(raw) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(raw.to_string())
        }
        None => Body::empty(),
    };
    let Ok(request) = builder.body(body) else {
        panic!("invalid request");
    };
    let Ok(response) = app.clone().oneshot(request).await else {
        panic!("router failed");
    };
    let status = response.status();
    let Ok(bytes) = axum::body::to_bytes(response.into_body(), usize::MAX).await else {
        panic!("unreadable body");
    };
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

fn bet_body(event_id: i64, amount: &str) -> String {
    json!({
        "eventId": event_id,
        "eventName": "Spartak - CSKA",
        "selection": "win1",
        "odds": 2.5,
        "amount": amount,
    })
    .to_string()
}

fn field(value: &Value, pointer: &str) -> Value {
    value.pointer(pointer).cloned().unwrap_or(Value::Null)
}

#[tokio::test]
async fn login_bet_and_history_round_trip() {
    let app = app();

    let (status, login) = call(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(r#"{"email":"alice@example.com","password":"secret"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(field(&login, "/token"), "tok-alice");
    assert_eq!(field(&login, "/user/id"), "alice");
    assert_eq!(field(&login, "/user/name"), "Alice");

    let (status, wallet) = call(&app, "GET", "/api/wallet", Some(ALICE_TOKEN), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(field(&wallet, "/balance"), "1000.00");
    assert_eq!(field(&wallet, "/topUpCount"), 0);
    assert!(wallet.get("newToken").is_none());

    let body = bet_body(1001, "100");
    let (status, bet) = call(&app, "POST", "/api/bets", Some(ALICE_TOKEN), Some(&body)).await;
    assert_eq!(status, StatusCode::OK, "{bet}");
    assert_eq!(field(&bet, "/amount"), "100.00");
    assert_eq!(field(&bet, "/odds"), "2.50");
    assert_eq!(field(&bet, "/potentialWin"), "250.00");
    assert_eq!(field(&bet, "/status"), "pending");
    assert_eq!(field(&bet, "/eventId"), 1001);
    assert_eq!(field(&bet, "/userId"), "alice");
    assert!(field(&bet, "/settledAt").is_null());

    let (_, wallet) = call(&app, "GET", "/api/wallet", Some(ALICE_TOKEN), None).await;
    assert_eq!(field(&wallet, "/balance"), "900.00");

    let (status, bets) = call(&app, "GET", "/api/bets", Some(ALICE_TOKEN), None).await;
    assert_eq!(status, StatusCode::OK);
    let Some(listed) = bets.as_array().and_then(|all| all.first()) else {
        panic!("bet history is empty: {bets}");
    };
    assert_eq!(bets.as_array().map(Vec::len), Some(1));
    assert_eq!(listed, &bet);
}

#[tokio::test]
async fn protected_routes_require_a_valid_token() {
    let app = app();
    for (method, uri) in [
        ("GET", "/api/wallet"),
        ("POST", "/api/wallet/topup"),
        ("GET", "/api/bets"),
        ("POST", "/api/bets"),
        ("GET", "/api/auth/me"),
    ] {
        let (status, body) = call(&app, method, uri, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{method} {uri}");
        assert!(field(&body, "/message").is_string());

        let (status, _) = call(&app, method, uri, Some("forged"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{method} {uri} with a forged token");
    }
}

#[tokio::test]
async fn rejected_credentials_are_unauthorized() {
    let app = app();
    let (status, _) = call(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(r#"{"email":"alice@example.com","password":"wrong"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let partial = Some(r#"{"email":"a@b.c"}"#);
    let (status, body) = call(&app, "POST", "/api/auth/login", None, partial).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(field(&body, "/errors/password").is_array());
}

#[tokio::test]
async fn structural_errors_list_every_field() {
    let app = app();
    let (status, body) = call(&app, "POST", "/api/bets", Some(ALICE_TOKEN), Some("{}")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    for key in ["eventId", "eventName", "selection", "odds", "amount"] {
        assert!(
            field(&body, &format!("/errors/{key}")).is_array(),
            "missing error for {key}: {body}"
        );
    }

    let (_, wallet) = call(&app, "GET", "/api/wallet", Some(ALICE_TOKEN), None).await;
    assert_eq!(field(&wallet, "/balance"), "1000.00");
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let app = app();
    let broken = Some("{not json");
    let (status, body) = call(&app, "POST", "/api/bets", Some(ALICE_TOKEN), broken).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(field(&body, "/message").is_string());
}

#[tokio::test]
async fn placement_rejections_leave_balance_untouched() {
    let app = app();

    let fractional = bet_body(1001, "10.5");
    let (status, _) = call(&app, "POST", "/api/bets", Some(ALICE_TOKEN), Some(&fractional)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let live = bet_body(1002, "10");
    let (status, _) = call(&app, "POST", "/api/bets", Some(ALICE_TOKEN), Some(&live)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let unknown = bet_body(4242, "10");
    let (status, _) = call(&app, "POST", "/api/bets", Some(ALICE_TOKEN), Some(&unknown)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let too_big = bet_body(1001, "1001");
    let (status, body) = call(&app, "POST", "/api/bets", Some(ALICE_TOKEN), Some(&too_big)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(field(&body, "/message"), "insufficient funds");

    let (_, wallet) = call(&app, "GET", "/api/wallet", Some(ALICE_TOKEN), None).await;
    assert_eq!(field(&wallet, "/balance"), "1000.00");
    let (_, bets) = call(&app, "GET", "/api/bets", Some(ALICE_TOKEN), None).await;
    assert_eq!(bets.as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn non_string_names_are_field_errors() {
    let app = app();
    let body = json!({
        "eventId": 1001,
        "eventName": 5,
        "selection": "win1",
        "odds": 2.5,
        "amount": 10,
    })
    .to_string();
    let (status, body) = call(&app, "POST", "/api/bets", Some(ALICE_TOKEN), Some(&body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(field(&body, "/errors/eventName/0"), "must be a string");
    assert!(field(&body, "/errors/selection").is_null());
}

#[tokio::test]
async fn whole_float_event_id_is_accepted() {
    let app = app();
    let body = json!({
        "eventId": 1001.0,
        "eventName": "Spartak - CSKA",
        "selection": "win1",
        "odds": 2.5,
        "amount": 10,
    })
    .to_string();
    let (status, bet) = call(&app, "POST", "/api/bets", Some(ALICE_TOKEN), Some(&body)).await;
    assert_eq!(status, StatusCode::OK, "{bet}");
    assert_eq!(field(&bet, "/eventId"), 1001);
}

#[tokio::test]
async fn broken_feed_neighbour_does_not_block_a_bet() {
    let mut events = feed();
    if let Some(list) = events.get_mut("events").and_then(Value::as_array_mut) {
        list.push(json!({ "eventId": 1006, "status": "canceled", "odds": null }));
    }
    let app = app_with_feed(Some(events));

    let body = bet_body(1001, "10");
    let (status, bet) = call(&app, "POST", "/api/bets", Some(ALICE_TOKEN), Some(&body)).await;
    assert_eq!(status, StatusCode::OK, "{bet}");

    let body = bet_body(1006, "10");
    let (status, _) = call(&app, "POST", "/api/bets", Some(ALICE_TOKEN), Some(&body)).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
}

#[derive(Debug, Clone, Default)]
struct CrateEvents(Arc<AtomicUsize>);

impl<S: tracing::Subscriber> Layer<S> for CrateEvents {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        if event.metadata().target().starts_with("wager_gateway") {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }
}

#[tokio::test]
async fn rejected_bet_is_logged_once() {
    let events = CrateEvents::default();
    let _guard =
        tracing::subscriber::set_default(tracing_subscriber::registry().with(events.clone()));
    let app = app();

    let fractional = bet_body(1001, "10.5");
    let (status, _) = call(&app, "POST", "/api/bets", Some(ALICE_TOKEN), Some(&fractional)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(events.0.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn feed_outage_is_bad_gateway() {
    let app = app_with_feed(None);

    let (status, body) = call(&app, "GET", "/api/events", None, None).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(field(&body, "/message"), "upstream service unavailable");

    let body = bet_body(1001, "10");
    let (status, _) = call(&app, "POST", "/api/bets", Some(ALICE_TOKEN), Some(&body)).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn events_are_proxied_verbatim() {
    let app = app();
    let (status, body) = call(&app, "GET", "/api/events", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, feed());
}

#[tokio::test]
async fn top_up_adds_a_thousand() {
    let app = app();
    let (status, wallet) = call(&app, "POST", "/api/wallet/topup", Some(ALICE_TOKEN), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(field(&wallet, "/balance"), "2000.00");
    assert_eq!(field(&wallet, "/topUpCount"), 1);
}

#[tokio::test]
async fn rotated_token_is_returned_with_the_wallet() {
    let app = app();
    let (status, wallet) = call(&app, "GET", "/api/wallet", Some(ROTATING_TOKEN), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(field(&wallet, "/newToken"), "tok-bob-new");
}

#[tokio::test]
async fn leaderboard_lists_known_wallets() {
    let app = app();
    let _ = call(&app, "GET", "/api/wallet", Some(ALICE_TOKEN), None).await;
    let _ = call(&app, "POST", "/api/wallet/topup", Some(ALICE_TOKEN), None).await;
    let _ = call(&app, "GET", "/api/wallet", Some(ROTATING_TOKEN), None).await;

    let (status, body) = call(&app, "GET", "/api/leaderboard", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(field(&body, "/leaders/0/displayName"), "Alice");
    assert_eq!(field(&body, "/leaders/0/balance"), "2000.00");
    assert_eq!(field(&body, "/leaders/0/winRate"), 0);
    assert_eq!(field(&body, "/leaders/1/displayName"), "bob");
    assert_eq!(field(&body, "/leaders/1/totalBets"), 0);
}

#[tokio::test]
async fn me_and_logout() {
    let app = app();
    let (status, body) = call(&app, "GET", "/api/auth/me", Some(ALICE_TOKEN), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(field(&body, "/user/email"), "alice@example.com");

    let (status, body) = call(&app, "POST", "/api/auth/logout", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(field(&body, "/message").is_string());
}

#[tokio::test]
async fn health_is_served_at_the_root() {
    let app = app();
    let (status, body) = call(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(field(&body, "/status"), "healthy");
}
