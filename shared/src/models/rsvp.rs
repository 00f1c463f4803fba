use serde::{Deserialize, Serialize};

/// RSVP response state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum RsvpStatus {
    Attending,
    NotAttending,
    Pending,
}

/// A guest's RSVP; at most one row per user
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Rsvp {
    pub id: i64,
    pub user_id: i64,
    pub status: RsvpStatus,
    pub plus_one: bool,
    pub plus_one_name: Option<String>,
    /// Whether the guest has joined the event WeChat group
    pub joined_wechat: bool,
    pub created_at: i64,
    pub updated_at: i64,
}
