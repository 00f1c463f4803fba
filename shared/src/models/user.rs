use serde::{Deserialize, Serialize};

/// An invited guest or organizer
///
/// Guests added without an email address get a synthesized placeholder
/// address (the email column is UNIQUE) and `email_sent = false`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub is_organizer: bool,
    /// Whether an invitation email has been sent to this user
    pub email_sent: bool,
    pub wechat_id: Option<String>,
    pub created_at: i64,
}
