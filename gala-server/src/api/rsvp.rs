//! RSVP submission

use axum::extract::State;
use serde::Deserialize;
use serde_json::{Value, json};
use shared::AppError;
use shared::models::RsvpStatus;
use shared::util::now_millis;

use super::ApiResult;
use super::extract::Json;
use crate::auth::CurrentSession;
use crate::db;
use crate::state::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RsvpRequest {
    pub user_id: i64,
    pub status: RsvpStatus,
    #[serde(default)]
    pub plus_one: bool,
    pub plus_one_name: Option<String>,
}

/// POST /api/rsvp: create or update an RSVP.
///
/// Guests may only answer for themselves; organizers may answer on any
/// guest's behalf. Repeated submissions upsert, so the latest answer wins
/// and there is never more than one RSVP per guest.
pub async fn upsert(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Json(req): Json<RsvpRequest>,
) -> ApiResult<Value> {
    if req.user_id != session.id && !session.is_organizer {
        return Err(AppError::forbidden("You can only update your own RSVP").into());
    }

    let guest = db::users::find_by_id(&state.pool, req.user_id)
        .await?
        .ok_or_else(|| AppError::not_found("User"))?;

    let rsvp = db::rsvps::upsert(
        &state.pool,
        req.user_id,
        req.status,
        req.plus_one,
        req.plus_one_name.as_deref(),
        now_millis(),
    )
    .await?;

    notify_organizers(&state, &guest.name, &rsvp.status, req.plus_one_name.as_deref()).await;

    Ok(Json(json!({ "success": true, "rsvp": rsvp })))
}

/// Best-effort fan-out: an RSVP must never fail because a notification or
/// email could not be written.
async fn notify_organizers(
    state: &AppState,
    guest_name: &str,
    status: &RsvpStatus,
    plus_one_name: Option<&str>,
) {
    let attending = matches!(status, RsvpStatus::Attending);
    let verb = if attending { "accepted" } else { "declined" };
    let plus_one_suffix = match plus_one_name {
        Some(name) if attending => format!(" (bringing {name})"),
        _ => String::new(),
    };
    let subject = format!(
        "RSVP Update: {guest_name} is {}",
        if attending { "attending" } else { "not attending" }
    );
    let message = format!("{guest_name} has {verb} the invitation{plus_one_suffix}.");

    match db::users::organizers(&state.pool).await {
        Ok(organizers) => {
            let now = now_millis();
            for organizer in &organizers {
                if let Err(e) =
                    db::notifications::create(&state.pool, organizer.id, &message, now).await
                {
                    tracing::warn!(organizer = organizer.id, error = %e, "Notification write failed");
                }
            }
            state.email.notify_organizers(&organizers, &subject, &message).await;
        }
        Err(e) => {
            tracing::warn!(error = %e, "Skipping organizer fan-out");
        }
    }
}
