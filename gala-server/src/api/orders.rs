//! Order endpoints

use axum::extract::State;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Value, json};
use shared::AppError;
use shared::models::{Order, OrderItem, OrderStatus};
use shared::money::Money;
use shared::util::now_millis;

use super::ApiResult;
use super::extract::{Json, Path, Query};
use crate::auth::{Capability, CurrentSession, MaybeSession, Principal};
use crate::db;
use crate::db::orders::{ItemDeletion, NewOrderItem, OrderScope, OrderWithItems};
use crate::state::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffKeyQuery {
    pub staff_key: Option<String>,
}

/// GET /api/orders: a guest sees their own orders; organizers and holders
/// of the staff key see every order with purchaser details.
pub async fn list(
    State(state): State<AppState>,
    MaybeSession(session): MaybeSession,
    Query(query): Query<StaffKeyQuery>,
) -> ApiResult<Vec<OrderWithItems>> {
    let principal =
        Principal::resolve(session, query.staff_key.as_deref(), &state.staff_access_key)
            .ok_or_else(AppError::unauthorized)?;

    let scope = if principal.allows(Capability::ManageOrders) {
        OrderScope::All
    } else {
        match principal.session() {
            Some(claims) => OrderScope::User(claims.id),
            None => return Err(AppError::unauthorized().into()),
        }
    };

    let orders = db::orders::list(&state.pool, scope).await?;
    Ok(Json(orders))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreate {
    pub items: Vec<NewOrderItem>,
}

/// POST /api/orders: place a pre-order.
///
/// Requires an existing RSVP. The total is computed here from current menu
/// prices; any client-sent amount is ignored.
pub async fn create(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Json(req): Json<OrderCreate>,
) -> ApiResult<Order> {
    let rsvp = db::rsvps::find_by_user(&state.pool, session.id)
        .await?
        .ok_or_else(AppError::rsvp_required)?;

    if req.items.is_empty() {
        return Err(AppError::validation("Order must contain at least one item").into());
    }

    let mut total = Decimal::ZERO;
    for item in &req.items {
        if item.quantity < 1 {
            return Err(AppError::validation("Quantity must be at least 1").into());
        }
        let menu_item = db::menu::find_by_id(&state.pool, item.menu_item_id)
            .await?
            .ok_or_else(|| {
                AppError::validation(format!("Menu item {} not found", item.menu_item_id))
            })?;
        total += menu_item.price.0 * Decimal::from(item.quantity);
    }

    let order = db::orders::create(
        &state.pool,
        session.id,
        rsvp.id,
        Money(total),
        &req.items,
        now_millis(),
    )
    .await?;
    Ok(Json(order))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatusUpdate {
    pub id: i64,
    pub status: OrderStatus,
    pub staff_key: Option<String>,
}

/// PUT /api/orders: change an order's status (kitchen workflow).
/// Requires the ManageOrders capability: organizer session or staff key
/// (accepted in the query string or the body).
pub async fn update_status(
    State(state): State<AppState>,
    MaybeSession(session): MaybeSession,
    Query(query): Query<StaffKeyQuery>,
    Json(req): Json<OrderStatusUpdate>,
) -> ApiResult<Order> {
    let staff_key = req.staff_key.as_deref().or(query.staff_key.as_deref());
    let principal = Principal::resolve(session, staff_key, &state.staff_access_key)
        .ok_or_else(AppError::unauthorized)?;
    if !principal.allows(Capability::ManageOrders) {
        return Err(AppError::unauthorized().into());
    }

    let order = db::orders::update_status(&state.pool, req.id, req.status, now_millis())
        .await?
        .ok_or_else(|| AppError::not_found("Order"))?;
    Ok(Json(order))
}

#[derive(Deserialize)]
pub struct ItemQuantityUpdate {
    pub quantity: i32,
}

/// PUT /api/orders/{order_id}/items/{item_id}: change a line item quantity.
/// Only the order's owner, and only while the order is still pending. The
/// order total is recomputed in the same transaction.
pub async fn update_item(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path((order_id, item_id)): Path<(i64, i64)>,
    Json(req): Json<ItemQuantityUpdate>,
) -> ApiResult<OrderItem> {
    let order = db::orders::find_for_user(&state.pool, order_id, session.id)
        .await?
        .ok_or_else(|| AppError::not_found("Order"))?;
    if order.status != OrderStatus::Pending {
        return Err(AppError::order_not_modifiable().into());
    }
    if req.quantity < 1 {
        return Err(AppError::validation("Quantity must be at least 1").into());
    }

    let item =
        db::orders::update_item_quantity(&state.pool, order_id, item_id, req.quantity, now_millis())
            .await?
            .ok_or_else(|| AppError::not_found("Order item"))?;
    Ok(Json(item))
}

/// DELETE /api/orders/{order_id}/items/{item_id}: remove a line item.
/// Removing the last item deletes the whole order.
pub async fn delete_item(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path((order_id, item_id)): Path<(i64, i64)>,
) -> ApiResult<Value> {
    let order = db::orders::find_for_user(&state.pool, order_id, session.id)
        .await?
        .ok_or_else(|| AppError::not_found("Order"))?;
    if order.status != OrderStatus::Pending {
        return Err(AppError::order_not_modifiable().into());
    }

    let outcome = db::orders::delete_item(&state.pool, order_id, item_id, now_millis())
        .await?
        .ok_or_else(|| AppError::not_found("Order item"))?;

    let message = match outcome {
        ItemDeletion::OrderDeleted => "Order deleted",
        ItemDeletion::ItemDeleted { .. } => "Order item deleted",
    };
    Ok(Json(json!({ "success": true, "message": message })))
}
