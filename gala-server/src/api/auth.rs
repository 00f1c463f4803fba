//! Magic-link login, token verification, and session endpoints

use axum::extract::State;
use axum::response::IntoResponse;
use serde::Deserialize;
use serde_json::{Value, json};
use shared::error::{AppError, ErrorCode};
use shared::models::Invitation;
use shared::util::{generate_token, now_millis};

use super::ApiResult;
use super::extract::{Json, Query};
use crate::auth::{MaybeSession, clear_session_cookie, session_cookie};
use crate::db;
use crate::error::ServiceError;
use crate::state::AppState;

/// Invitation tokens are valid for 7 days
const INVITE_TTL_MS: i64 = 7 * 24 * 60 * 60 * 1000;

/// Mint a fresh single-use invitation token for a user
pub(crate) async fn issue_invitation(
    state: &AppState,
    user_id: i64,
) -> Result<Invitation, ServiceError> {
    let now = now_millis();
    let invitation =
        db::invitations::create(&state.pool, user_id, &generate_token(), now + INVITE_TTL_MS, now)
            .await?;
    Ok(invitation)
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
}

/// POST /api/auth/login: request a magic link by email.
///
/// With real email delivery the response never reveals whether the address
/// is on the guest list. In preview mode there is no email to receive, so
/// unknown addresses get an explicit 404 instead.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Value> {
    let email = req.email.trim().to_lowercase();
    if email.is_empty() {
        return Err(AppError::validation("Email is required").into());
    }

    let Some(user) = db::users::find_by_email(&state.pool, &email).await? else {
        if state.email.is_preview() {
            return Err(AppError::with_message(
                ErrorCode::NotFound,
                "Email not found on invitation list. Please try a different email or add this user first.",
            )
            .into());
        }
        return Ok(Json(json!({
            "success": true,
            "message": "If your email is in our system, you will receive a magic link",
        })));
    };

    let invitation = issue_invitation(&state, user.id).await?;
    let preview_url = state
        .email
        .send_magic_link(&user.email, &user.name, &invitation.token, user.is_organizer)
        .await?;

    match preview_url {
        Some(url) => Ok(Json(json!({
            "success": true,
            "message": "Magic link generated",
            "magicLinkUrl": url,
        }))),
        None => Ok(Json(json!({
            "success": true,
            "message": "Magic link sent",
        }))),
    }
}

#[derive(Deserialize)]
pub struct VerifyQuery {
    pub token: Option<String>,
    pub redirect: Option<String>,
}

/// GET /api/auth/verify?token=...: redeem a magic link.
///
/// Consuming the token is a single conditional UPDATE, so a token can be
/// redeemed exactly once even under concurrent requests.
pub async fn verify(
    State(state): State<AppState>,
    Query(query): Query<VerifyQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let token = query
        .token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::validation("Token is required"))?;

    let user_id = db::invitations::consume(&state.pool, &token, now_millis())
        .await?
        .ok_or_else(AppError::invalid_or_expired_token)?;

    let user = db::users::find_by_id(&state.pool, user_id)
        .await?
        .ok_or_else(|| AppError::not_found("User"))?;

    let jwt = state
        .sessions
        .sign(&user)
        .map_err(|e| ServiceError::Db(e.into()))?;

    let redirect = match query.redirect.filter(|r| !r.is_empty()) {
        Some(r) => r,
        None if user.is_organizer => "/organizer".to_string(),
        None => "/invitation".to_string(),
    };

    Ok((
        [(http::header::SET_COOKIE, session_cookie(&jwt))],
        Json(json!({ "success": true, "redirectUrl": redirect })),
    ))
}

/// GET /api/organizer/verify?token=...: redeem an organizer magic link.
///
/// Rejects tokens belonging to non-organizers; the token is still consumed,
/// a guest token pushed through the organizer entrance is burned.
pub async fn organizer_verify(
    State(state): State<AppState>,
    Query(query): Query<VerifyQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let token = query
        .token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::validation("Token is required"))?;

    let user_id = db::invitations::consume(&state.pool, &token, now_millis())
        .await?
        .ok_or_else(AppError::invalid_or_expired_token)?;

    let user = db::users::find_by_id(&state.pool, user_id)
        .await?
        .ok_or_else(|| AppError::not_found("User"))?;

    if !user.is_organizer {
        return Err(AppError::forbidden("This invitation does not grant organizer access").into());
    }

    let jwt = state
        .sessions
        .sign(&user)
        .map_err(|e| ServiceError::Db(e.into()))?;

    let redirect = query
        .redirect
        .filter(|r| !r.is_empty())
        .unwrap_or_else(|| "/organizer".to_string());

    Ok((
        [(http::header::SET_COOKIE, session_cookie(&jwt))],
        Json(json!({ "success": true, "redirectUrl": redirect })),
    ))
}

/// POST /api/auth/logout: clear the session cookie
pub async fn logout() -> impl IntoResponse {
    (
        [(http::header::SET_COOKIE, clear_session_cookie())],
        Json(json!({ "success": true })),
    )
}

/// GET /api/auth/session: who am I (null user when not logged in)
pub async fn session(MaybeSession(session): MaybeSession) -> Json<Value> {
    match session {
        Some(claims) => Json(json!({ "user": claims })),
        None => Json(json!({ "user": null })),
    }
}
