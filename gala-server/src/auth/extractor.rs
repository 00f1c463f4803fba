//! Axum extractors for session state

use axum::extract::FromRequestParts;
use http::request::Parts;
use shared::AppError;

use super::session::{SessionClaims, token_from_cookie_header};
use crate::state::AppState;

/// Extractor requiring a valid session cookie; rejects with 401 otherwise
pub struct CurrentSession(pub SessionClaims);

/// Extractor that yields the session if present, without failing the request
pub struct MaybeSession(pub Option<SessionClaims>);

fn read_session(parts: &Parts, state: &AppState) -> Option<SessionClaims> {
    let header = parts.headers.get(http::header::COOKIE)?.to_str().ok()?;
    let token = token_from_cookie_header(header)?;
    state.sessions.verify(token)
}

impl FromRequestParts<AppState> for CurrentSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        read_session(parts, state)
            .map(CurrentSession)
            .ok_or_else(AppError::unauthorized)
    }
}

impl FromRequestParts<AppState> for MaybeSession {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(MaybeSession(read_session(parts, state)))
    }
}
