use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Order lifecycle state
///
/// Any state may be set by kitchen staff or organizers; there is no
/// enforced transition graph. Guests may only modify `Pending` orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Preparing,
    Ready,
    Delivered,
    Cancelled,
}

/// A food pre-order
///
/// `total_amount` is always computed server-side as Σ(quantity × price)
/// over the order's items.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    pub rsvp_id: i64,
    pub total_amount: Money,
    pub status: OrderStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

/// A line item within an order
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub menu_item_id: i64,
    pub quantity: i32,
    pub notes: Option<String>,
    pub created_at: i64,
}
