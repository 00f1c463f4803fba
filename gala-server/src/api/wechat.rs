//! WeChat group membership flag

use axum::extract::State;
use serde::Deserialize;
use serde_json::{Value, json};
use shared::AppError;
use shared::util::now_millis;

use super::ApiResult;
use super::extract::Json;
use crate::auth::CurrentSession;
use crate::db;
use crate::state::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRequest {
    pub user_id: i64,
}

/// POST /api/wechat/join: record that a guest joined the event group chat.
/// Idempotent; succeeds even before the guest has RSVP'd.
pub async fn join(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Json(req): Json<JoinRequest>,
) -> ApiResult<Value> {
    if req.user_id != session.id && !session.is_organizer {
        return Err(AppError::forbidden("You can only update your own membership").into());
    }

    let updated =
        db::rsvps::set_wechat_joined(&state.pool, req.user_id, true, now_millis()).await?;
    if !updated {
        tracing::debug!(user_id = req.user_id, "No RSVP row yet; join flag not stored");
    }

    Ok(Json(json!({ "success": true })))
}
