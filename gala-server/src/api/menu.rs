//! Menu endpoints

use axum::extract::State;
use serde::Deserialize;
use shared::error::AppError;
use shared::models::MenuItem;
use shared::money::Money;
use shared::util::now_millis;

use super::extract::Json;
use super::{ApiResult, require_organizer};
use crate::auth::{CurrentSession, MaybeSession};
use crate::db;
use crate::state::AppState;

/// GET /api/menu: guests (and anonymous callers) see available items only;
/// organizers see everything including hidden items.
pub async fn list(
    State(state): State<AppState>,
    MaybeSession(session): MaybeSession,
) -> ApiResult<Vec<MenuItem>> {
    let organizer = session.is_some_and(|s| s.is_organizer);
    let items = if organizer {
        db::menu::list_all(&state.pool).await?
    } else {
        db::menu::list_available(&state.pool).await?
    };
    Ok(Json(items))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemCreate {
    pub name: String,
    pub description: Option<String>,
    pub price: Money,
    pub image_url: Option<String>,
}

/// POST /api/menu: organizer only
pub async fn create(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Json(req): Json<MenuItemCreate>,
) -> ApiResult<MenuItem> {
    require_organizer(&session)?;

    let name = req.name.trim();
    if name.is_empty() {
        return Err(AppError::validation("Name is required").into());
    }
    if req.price.is_negative() {
        return Err(AppError::validation("Price must not be negative").into());
    }

    let item = db::menu::create(
        &state.pool,
        name,
        req.description.as_deref(),
        req.price,
        req.image_url.as_deref(),
        now_millis(),
    )
    .await?;
    Ok(Json(item))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemUpdate {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: Money,
    pub image_url: Option<String>,
    pub is_available: bool,
}

/// PUT /api/menu: organizer only; full-row update including availability
pub async fn update(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Json(req): Json<MenuItemUpdate>,
) -> ApiResult<MenuItem> {
    require_organizer(&session)?;

    let name = req.name.trim();
    if name.is_empty() {
        return Err(AppError::validation("Name is required").into());
    }
    if req.price.is_negative() {
        return Err(AppError::validation("Price must not be negative").into());
    }

    let item = db::menu::update(
        &state.pool,
        req.id,
        name,
        req.description.as_deref(),
        req.price,
        req.image_url.as_deref(),
        req.is_available,
        now_millis(),
    )
    .await?
    .ok_or_else(|| AppError::not_found("Menu item"))?;
    Ok(Json(item))
}
