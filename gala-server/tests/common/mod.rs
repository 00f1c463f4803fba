//! Shared test harness: in-memory database, preview email transport,
//! requests driven straight through the router.

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use gala_server::{AppState, Config, api, db};
use shared::Money;
use shared::models::{MenuItem, User};
use shared::util::now_millis;

pub const STAFF_KEY: &str = "staff-test-key";

/// Fresh app over an in-memory database, email in preview mode
pub async fn test_app() -> (Router, AppState) {
    let config = Config {
        database_url: "sqlite::memory:".into(),
        http_port: 0,
        environment: "test".into(),
        app_base_url: "http://localhost:3000".into(),
        jwt_secret: "integration-test-secret".into(),
        staff_access_key: STAFF_KEY.into(),
        ses_from_email: None,
    };
    let state = AppState::new(&config).await.expect("state init");
    (api::create_router(state.clone()), state)
}

/// Drive one request through the router and decode the JSON body
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    cookie: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let response = send_raw(app, method, uri, cookie, body).await;
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

/// Like [`send`] but returns the raw response (for header assertions)
pub async fn send_raw(
    app: &Router,
    method: &str,
    uri: &str,
    cookie: Option<&str>,
    body: Option<Value>,
) -> http::Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(request).await.unwrap()
}

/// Send an arbitrary (possibly malformed) body under a JSON content type
pub async fn send_text(app: &Router, method: &str, uri: &str, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap();
    (status, value)
}

pub async fn seed_user(state: &AppState, email: &str, name: &str, organizer: bool) -> User {
    db::users::create(&state.pool, email, name, organizer, false, None, now_millis())
        .await
        .expect("seed user")
}

pub async fn seed_menu_item(state: &AppState, name: &str, price: &str) -> MenuItem {
    let price: Money = price.parse().expect("price");
    db::menu::create(&state.pool, name, None, price, None, now_millis())
        .await
        .expect("seed menu item")
}

/// Cookie header value for a logged-in user
pub fn login(state: &AppState, user: &User) -> String {
    format!("session={}", state.sessions.sign(user).expect("sign session"))
}
