//! Organizer dashboard endpoints
//!
//! Everything here demands an organizer session. Bulk email operations are
//! best-effort per recipient: one bad address is logged and skipped, never
//! aborting the batch.

use axum::extract::State;
use serde::Deserialize;
use serde_json::{Value, json};
use shared::AppError;
use shared::models::{RsvpStatus, User};
use shared::util::now_millis;

use super::auth::issue_invitation;
use super::extract::Json;
use super::{ApiResult, require_organizer};
use crate::auth::CurrentSession;
use crate::db;
use crate::db::users::{GuestStats, GuestSummary};
use crate::state::AppState;

/// Synthesized addresses for guests without email live under this domain;
/// they satisfy the UNIQUE constraint and are never actually mailed.
const PLACEHOLDER_DOMAIN: &str = "@guests.local";

fn has_real_email(user: &User) -> bool {
    !user.email.ends_with(PLACEHOLDER_DOMAIN)
}

/// GET /api/organizer/guests: guest list with RSVP state
pub async fn guests(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> ApiResult<Vec<GuestSummary>> {
    require_organizer(&session)?;
    let guests = db::users::guests_with_rsvp(&state.pool, now_millis()).await?;
    Ok(Json(guests))
}

/// GET /api/organizer/stats: attendance counters
pub async fn stats(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> ApiResult<GuestStats> {
    require_organizer(&session)?;
    let stats = db::users::guest_stats(&state.pool).await?;
    Ok(Json(stats))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddGuestRequest {
    pub name: String,
    pub email: Option<String>,
    /// Guest has no email; synthesize a placeholder and skip the invitation
    #[serde(default)]
    pub no_email: bool,
    pub wechat_id: Option<String>,
}

/// POST /api/organizer/add-guest: create a guest, and when they have a
/// real email, issue and send their invitation immediately.
pub async fn add_guest(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Json(req): Json<AddGuestRequest>,
) -> ApiResult<Value> {
    require_organizer(&session)?;

    let name = req.name.trim();
    if name.is_empty() {
        return Err(AppError::validation("Name is required").into());
    }

    let email = req
        .email
        .as_deref()
        .map(|e| e.trim().to_lowercase())
        .filter(|e| !e.is_empty());
    let (email, emailable) = match (email, req.no_email) {
        (Some(email), _) => (email, true),
        (None, true) => (
            format!("no-email-{}{PLACEHOLDER_DOMAIN}", uuid::Uuid::new_v4()),
            false,
        ),
        (None, false) => {
            return Err(AppError::validation("Email is required unless noEmail is set").into());
        }
    };

    if db::users::find_by_email(&state.pool, &email).await?.is_some() {
        return Err(AppError::conflict("A guest with this email already exists").into());
    }

    // email_sent stays false until the invitation actually goes out
    let mut user = db::users::create(
        &state.pool,
        &email,
        name,
        false,
        false,
        req.wechat_id.as_deref(),
        now_millis(),
    )
    .await?;

    let mut magic_link = None;
    if emailable {
        let invitation = issue_invitation(&state, user.id).await?;
        magic_link = state
            .email
            .send_magic_link(&user.email, &user.name, &invitation.token, false)
            .await?;
        db::users::set_email_sent(&state.pool, user.id, true).await?;
        user.email_sent = true;
    }

    Ok(Json(json!({
        "success": true,
        "user": user,
        "magicLinkUrl": magic_link,
    })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGuestRequest {
    pub user_id: i64,
    pub name: Option<String>,
    pub email: Option<String>,
    pub wechat_id: Option<String>,
}

/// POST /api/organizer/update-guest: partial update of contact details
pub async fn update_guest(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Json(req): Json<UpdateGuestRequest>,
) -> ApiResult<Value> {
    require_organizer(&session)?;

    let name = req.name.as_deref().map(str::trim).filter(|n| !n.is_empty());
    let email = req
        .email
        .as_deref()
        .map(|e| e.trim().to_lowercase())
        .filter(|e| !e.is_empty());

    if let Some(ref email) = email {
        if let Some(existing) = db::users::find_by_email(&state.pool, email).await? {
            if existing.id != req.user_id {
                return Err(AppError::conflict("A guest with this email already exists").into());
            }
        }
    }

    let updated = db::users::update_guest(
        &state.pool,
        req.user_id,
        name,
        email.as_deref(),
        req.wechat_id.as_deref(),
    )
    .await?;
    if !updated {
        return Err(AppError::not_found("User").into());
    }

    Ok(Json(json!({ "success": true })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestIdRequest {
    pub guest_id: i64,
}

/// POST /api/organizer/send-invite: (re)send one guest's invitation
pub async fn send_invite(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Json(req): Json<GuestIdRequest>,
) -> ApiResult<Value> {
    require_organizer(&session)?;

    let user = db::users::find_by_id(&state.pool, req.guest_id)
        .await?
        .ok_or_else(|| AppError::not_found("User"))?;
    if !has_real_email(&user) {
        return Err(AppError::invalid_request("Guest has no email address").into());
    }

    let invitation = issue_invitation(&state, user.id).await?;
    let magic_link = state
        .email
        .send_magic_link(&user.email, &user.name, &invitation.token, user.is_organizer)
        .await?;
    db::users::set_email_sent(&state.pool, user.id, true).await?;

    Ok(Json(json!({ "success": true, "magicLinkUrl": magic_link })))
}

/// POST /api/organizer/generate-link: mint an invitation and return the
/// link without sending anything (for hand-delivery over chat)
pub async fn generate_link(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Json(req): Json<GuestIdRequest>,
) -> ApiResult<Value> {
    require_organizer(&session)?;

    let user = db::users::find_by_id(&state.pool, req.guest_id)
        .await?
        .ok_or_else(|| AppError::not_found("User"))?;

    let invitation = issue_invitation(&state, user.id).await?;
    let link = state.email.invitation_link(&invitation.token, user.is_organizer);

    Ok(Json(json!({ "success": true, "inviteLink": link })))
}

/// POST /api/organizer/send-all-invites: invitation for every guest with a
/// real email, regardless of previous sends
pub async fn send_all_invites(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> ApiResult<Value> {
    require_organizer(&session)?;

    let guests = db::users::guests(&state.pool).await?;
    let sent = send_invites_to(&state, guests.iter().filter(|g| has_real_email(g))).await;

    Ok(Json(json!({ "success": true, "count": sent })))
}

/// POST /api/organizer/send-pending-invites: invitations only for guests
/// who have not responded yet (no RSVP, or RSVP still pending)
pub async fn send_pending_invites(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> ApiResult<Value> {
    require_organizer(&session)?;

    let summaries = db::users::guests_with_rsvp(&state.pool, now_millis()).await?;
    let pending_ids: Vec<i64> = summaries
        .iter()
        .filter(|g| g.status == RsvpStatus::Pending)
        .map(|g| g.id)
        .collect();

    let guests = db::users::guests(&state.pool).await?;
    let sent = send_invites_to(
        &state,
        guests
            .iter()
            .filter(|g| pending_ids.contains(&g.id) && has_real_email(g)),
    )
    .await;

    Ok(Json(json!({ "success": true, "count": sent })))
}

/// POST /api/organizer/send-menu-emails: menu announcement with a login
/// link to every attending guest
pub async fn send_menu_emails(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> ApiResult<Value> {
    require_organizer(&session)?;

    let attending = db::users::attending_guests(&state.pool).await?;
    let mut sent = 0usize;
    for guest in attending.iter().filter(|g| has_real_email(g)) {
        let invitation = match issue_invitation(&state, guest.id).await {
            Ok(inv) => inv,
            Err(e) => {
                tracing::warn!(guest = guest.id, error = ?e, "Could not mint menu invitation");
                continue;
            }
        };
        match state
            .email
            .send_menu_invite(&guest.email, &guest.name, &invitation.token)
            .await
        {
            Ok(_) => sent += 1,
            Err(e) => {
                tracing::warn!(to = %guest.email, error = %e, "Menu email failed");
            }
        }
    }

    Ok(Json(json!({ "success": true, "count": sent })))
}

/// Shared bulk-send loop: mint, send, mark sent; failures skip the guest
async fn send_invites_to<'a>(
    state: &AppState,
    guests: impl Iterator<Item = &'a User>,
) -> usize {
    let mut sent = 0usize;
    for guest in guests {
        let invitation = match issue_invitation(state, guest.id).await {
            Ok(inv) => inv,
            Err(e) => {
                tracing::warn!(guest = guest.id, error = ?e, "Could not mint invitation");
                continue;
            }
        };
        if let Err(e) = state
            .email
            .send_magic_link(&guest.email, &guest.name, &invitation.token, false)
            .await
        {
            tracing::warn!(to = %guest.email, error = %e, "Invitation email failed");
            continue;
        }
        if let Err(e) = db::users::set_email_sent(&state.pool, guest.id, true).await {
            tracing::warn!(guest = guest.id, error = %e, "Could not mark invitation sent");
        }
        sent += 1;
    }
    sent
}

// ===== Organizer management =====

/// GET /api/organizer/manage: list all organizers
pub async fn list_organizers(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> ApiResult<Value> {
    require_organizer(&session)?;
    let organizers = db::users::organizers(&state.pool).await?;
    Ok(Json(json!({ "organizers": organizers })))
}

#[derive(Deserialize)]
pub struct AddOrganizerRequest {
    pub email: String,
}

/// POST /api/organizer/manage: promote an existing user to organizer
pub async fn add_organizer(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Json(req): Json<AddOrganizerRequest>,
) -> ApiResult<Value> {
    require_organizer(&session)?;

    let email = req.email.trim().to_lowercase();
    if email.is_empty() {
        return Err(AppError::validation("Email is required").into());
    }

    let user = db::users::find_by_email(&state.pool, &email)
        .await?
        .ok_or_else(|| {
            AppError::invalid_request("User does not exist. Add them as a guest first.")
        })?;

    db::users::set_organizer(&state.pool, user.id, true).await?;

    if has_real_email(&user) {
        if let Err(e) = state.email.send_organizer_status(&user.email, &user.name, true).await {
            tracing::warn!(to = %user.email, error = %e, "Organizer grant email failed");
        }
    }

    Ok(Json(json!({ "success": true, "message": "Organizer added successfully" })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizerIdRequest {
    pub organizer_id: i64,
}

/// DELETE /api/organizer/manage: revoke organizer access
pub async fn remove_organizer(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Json(req): Json<OrganizerIdRequest>,
) -> ApiResult<Value> {
    require_organizer(&session)?;

    let user = db::users::find_by_id(&state.pool, req.organizer_id)
        .await?
        .filter(|u| u.is_organizer)
        .ok_or_else(|| AppError::not_found("Organizer"))?;

    db::users::set_organizer(&state.pool, user.id, false).await?;

    if has_real_email(&user) {
        if let Err(e) = state.email.send_organizer_status(&user.email, &user.name, false).await {
            tracing::warn!(to = %user.email, error = %e, "Organizer revoke email failed");
        }
    }

    Ok(Json(json!({ "success": true, "message": "Organizer removed successfully" })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameOrganizerRequest {
    pub organizer_id: i64,
    pub name: String,
}

/// PATCH /api/organizer/manage: rename an organizer
pub async fn rename_organizer(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Json(req): Json<RenameOrganizerRequest>,
) -> ApiResult<Value> {
    require_organizer(&session)?;

    let name = req.name.trim();
    if name.is_empty() {
        return Err(AppError::validation("Name is required").into());
    }

    let renamed = db::users::rename(&state.pool, req.organizer_id, name).await?;
    if !renamed {
        return Err(AppError::not_found("Organizer").into());
    }

    Ok(Json(json!({ "success": true, "message": "Organizer renamed successfully" })))
}
