use crate::money::Money;
use serde::{Deserialize, Serialize};

/// A dish on the event menu
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: Money,
    pub image_url: Option<String>,
    /// Unavailable items are hidden from guests but visible to organizers
    pub is_available: bool,
    pub created_at: i64,
    pub updated_at: i64,
}
