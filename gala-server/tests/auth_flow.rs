//! Magic-link login and session lifecycle

mod common;

use common::*;
use http::StatusCode;
use serde_json::json;
use shared::util::now_millis;

fn extract_token(url: &str) -> String {
    url.split("token=")
        .nth(1)
        .unwrap()
        .split('&')
        .next()
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn login_unknown_email_is_404_in_preview() {
    let (app, _state) = test_app().await;
    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"email": "nobody@example.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("not found"));
}

#[tokio::test]
async fn login_empty_email_is_rejected() {
    let (app, _state) = test_app().await;
    let (status, _) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"email": "  "})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn magic_link_roundtrip_sets_session() {
    let (app, state) = test_app().await;
    seed_user(&state, "ana@example.com", "Ana", false).await;

    // Email is matched case-insensitively
    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"email": "Ana@Example.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let url = body["magicLinkUrl"].as_str().unwrap();
    assert!(url.contains("/invitation/verify?token="));
    let token = extract_token(url);

    let response = send_raw(
        &app,
        "GET",
        &format!("/api/auth/verify?token={token}"),
        None,
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response
        .headers()
        .get(http::header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("session="));
    assert!(cookie.contains("HttpOnly"));

    // Session endpoint sees the user through that cookie
    let session_cookie = cookie.split(';').next().unwrap().to_string();
    let (status, body) = send(&app, "GET", "/api/auth/session", Some(&session_cookie), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["email"], "ana@example.com");
    assert_eq!(body["user"]["isOrganizer"], false);
}

#[tokio::test]
async fn guest_token_redirects_to_invitation_page() {
    let (app, state) = test_app().await;
    seed_user(&state, "g@example.com", "G", false).await;
    let (_, body) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"email": "g@example.com"})),
    )
    .await;
    let token = extract_token(body["magicLinkUrl"].as_str().unwrap());

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/auth/verify?token={token}"),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["redirectUrl"], "/invitation");
}

#[tokio::test]
async fn organizer_token_redirects_to_organizer_page() {
    let (app, state) = test_app().await;
    seed_user(&state, "org@example.com", "Org", true).await;
    let (_, body) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"email": "org@example.com"})),
    )
    .await;
    let url = body["magicLinkUrl"].as_str().unwrap();
    assert!(url.contains("/organizer/verify?token="));
    let token = extract_token(url);

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/auth/verify?token={token}"),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["redirectUrl"], "/organizer");
}

#[tokio::test]
async fn token_is_single_use() {
    let (app, state) = test_app().await;
    seed_user(&state, "g@example.com", "G", false).await;
    let (_, body) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"email": "g@example.com"})),
    )
    .await;
    let token = extract_token(body["magicLinkUrl"].as_str().unwrap());
    let uri = format!("/api/auth/verify?token={token}");

    let (first, _) = send(&app, "GET", &uri, None, None).await;
    assert_eq!(first, StatusCode::OK);

    let (second, body) = send(&app, "GET", &uri, None, None).await;
    assert_eq!(second, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid or expired token");
}

#[tokio::test]
async fn expired_token_is_rejected() {
    let (app, state) = test_app().await;
    let user = seed_user(&state, "late@example.com", "Late", false).await;
    let now = now_millis();
    gala_server::db::invitations::create(&state.pool, user.id, "expiredtoken12345", now - 1, now)
        .await
        .unwrap();

    let (status, body) = send(
        &app,
        "GET",
        "/api/auth/verify?token=expiredtoken12345",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid or expired token");
}

#[tokio::test]
async fn unknown_token_is_rejected() {
    let (app, _state) = test_app().await;
    let (status, _) = send(&app, "GET", "/api/auth/verify?token=nosuchtoken", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "GET", "/api/auth/verify", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn organizer_verify_rejects_guest_token() {
    let (app, state) = test_app().await;
    seed_user(&state, "g@example.com", "G", false).await;
    let (_, body) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"email": "g@example.com"})),
    )
    .await;
    let token = extract_token(body["magicLinkUrl"].as_str().unwrap());

    let (status, _) = send(
        &app,
        "GET",
        &format!("/api/organizer/verify?token={token}"),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn organizer_verify_honors_redirect() {
    let (app, state) = test_app().await;
    seed_user(&state, "org@example.com", "Org", true).await;
    let (_, body) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"email": "org@example.com"})),
    )
    .await;
    let token = extract_token(body["magicLinkUrl"].as_str().unwrap());

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/organizer/verify?token={token}&redirect=/organizer/menu"),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["redirectUrl"], "/organizer/menu");
}

#[tokio::test]
async fn logout_clears_cookie() {
    let (app, _state) = test_app().await;
    let response = send_raw(&app, "POST", "/api/auth/logout", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response
        .headers()
        .get(http::header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(cookie.contains("Max-Age=0"));
}

#[tokio::test]
async fn malformed_body_still_gets_json_error() {
    let (app, _state) = test_app().await;
    let (status, body) = send_text(&app, "POST", "/api/auth/login", "{not json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    // missing content type is also answered on the error contract
    let (status, body) = send(&app, "POST", "/api/auth/login", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn session_without_cookie_is_null() {
    let (app, _state) = test_app().await;
    let (status, body) = send(&app, "GET", "/api/auth/session", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["user"].is_null());
}
