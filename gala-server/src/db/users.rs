use serde::Serialize;
use shared::models::{RsvpStatus, User};
use sqlx::SqlitePool;

/// A guest joined with their RSVP, for the organizer dashboard.
/// Guests without an RSVP row surface as pending.
#[derive(Debug, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct GuestSummary {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub wechat_id: Option<String>,
    pub email_sent: bool,
    pub status: RsvpStatus,
    pub plus_one: bool,
    pub plus_one_name: Option<String>,
    pub joined_wechat: bool,
    pub updated_at: i64,
}

/// Attendance counters for the organizer dashboard
#[derive(Debug, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct GuestStats {
    pub total_guests: i64,
    pub attending: i64,
    pub not_attending: i64,
    pub pending: i64,
    pub plus_ones: i64,
}

pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM users WHERE email = ? LIMIT 1")
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

#[allow(clippy::too_many_arguments)]
pub async fn create(
    pool: &SqlitePool,
    email: &str,
    name: &str,
    is_organizer: bool,
    email_sent: bool,
    wechat_id: Option<&str>,
    now: i64,
) -> Result<User, sqlx::Error> {
    sqlx::query_as(
        "INSERT INTO users (email, name, is_organizer, email_sent, wechat_id, created_at)
         VALUES (?, ?, ?, ?, ?, ?)
         RETURNING *",
    )
    .bind(email)
    .bind(name)
    .bind(is_organizer)
    .bind(email_sent)
    .bind(wechat_id)
    .bind(now)
    .fetch_one(pool)
    .await
}

/// Partial update of guest contact details; None fields are left unchanged
pub async fn update_guest(
    pool: &SqlitePool,
    id: i64,
    name: Option<&str>,
    email: Option<&str>,
    wechat_id: Option<&str>,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE users SET
            name = COALESCE(?, name),
            email = COALESCE(?, email),
            wechat_id = COALESCE(?, wechat_id)
         WHERE id = ?",
    )
    .bind(name)
    .bind(email)
    .bind(wechat_id)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn set_email_sent(pool: &SqlitePool, id: i64, sent: bool) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET email_sent = ? WHERE id = ?")
        .bind(sent)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn set_organizer(pool: &SqlitePool, id: i64, flag: bool) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE users SET is_organizer = ? WHERE id = ?")
        .bind(flag)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn rename(pool: &SqlitePool, id: i64, name: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE users SET name = ? WHERE id = ?")
        .bind(name)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn organizers(pool: &SqlitePool) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM users WHERE is_organizer = 1 ORDER BY name")
        .fetch_all(pool)
        .await
}

/// All non-organizer users
pub async fn guests(pool: &SqlitePool) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM users WHERE is_organizer = 0 ORDER BY name")
        .fetch_all(pool)
        .await
}

/// Guests who have RSVP'd attending (menu announcement recipients)
pub async fn attending_guests(pool: &SqlitePool) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as(
        "SELECT u.* FROM users u
         JOIN rsvps r ON r.user_id = u.id
         WHERE u.is_organizer = 0 AND r.status = 'attending'
         ORDER BY u.name",
    )
    .fetch_all(pool)
    .await
}

/// Guest list with RSVP state, defaulting missing RSVPs to pending
pub async fn guests_with_rsvp(
    pool: &SqlitePool,
    now: i64,
) -> Result<Vec<GuestSummary>, sqlx::Error> {
    sqlx::query_as(
        "SELECT u.id, u.email, u.name, u.wechat_id, u.email_sent,
                COALESCE(r.status, 'pending') AS status,
                COALESCE(r.plus_one, 0) AS plus_one,
                r.plus_one_name,
                COALESCE(r.joined_wechat, 0) AS joined_wechat,
                COALESCE(r.updated_at, ?) AS updated_at
         FROM users u
         LEFT JOIN rsvps r ON r.user_id = u.id
         WHERE u.is_organizer = 0
         ORDER BY u.name",
    )
    .bind(now)
    .fetch_all(pool)
    .await
}

pub async fn guest_stats(pool: &SqlitePool) -> Result<GuestStats, sqlx::Error> {
    sqlx::query_as(
        "SELECT COUNT(*) AS total_guests,
                COUNT(CASE WHEN r.status = 'attending' THEN 1 END) AS attending,
                COUNT(CASE WHEN r.status = 'not_attending' THEN 1 END) AS not_attending,
                COUNT(CASE WHEN r.status IS NULL OR r.status = 'pending' THEN 1 END) AS pending,
                COUNT(CASE WHEN r.status = 'attending' AND r.plus_one = 1 THEN 1 END) AS plus_ones
         FROM users u
         LEFT JOIN rsvps r ON r.user_id = u.id
         WHERE u.is_organizer = 0",
    )
    .fetch_one(pool)
    .await
}
