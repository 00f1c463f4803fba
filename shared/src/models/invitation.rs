use serde::{Deserialize, Serialize};

/// A single-use magic-link token
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Invitation {
    pub id: i64,
    pub user_id: i64,
    /// Random alphanumeric token, UNIQUE in the database
    pub token: String,
    pub is_used: bool,
    pub expires_at: i64,
    pub created_at: i64,
}
