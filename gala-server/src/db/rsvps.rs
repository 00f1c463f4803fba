use shared::models::{Rsvp, RsvpStatus};
use sqlx::SqlitePool;

pub async fn find_by_user(pool: &SqlitePool, user_id: i64) -> Result<Option<Rsvp>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM rsvps WHERE user_id = ?")
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

/// Insert or replace a user's RSVP. The UNIQUE(user_id) constraint plus
/// ON CONFLICT makes repeated submissions converge on the latest values
/// with no duplicate rows.
pub async fn upsert(
    pool: &SqlitePool,
    user_id: i64,
    status: RsvpStatus,
    plus_one: bool,
    plus_one_name: Option<&str>,
    now: i64,
) -> Result<Rsvp, sqlx::Error> {
    sqlx::query_as(
        "INSERT INTO rsvps (user_id, status, plus_one, plus_one_name, joined_wechat, created_at, updated_at)
         VALUES (?, ?, ?, ?, 0, ?, ?)
         ON CONFLICT(user_id) DO UPDATE SET
            status = excluded.status,
            plus_one = excluded.plus_one,
            plus_one_name = excluded.plus_one_name,
            updated_at = excluded.updated_at
         RETURNING *",
    )
    .bind(user_id)
    .bind(status)
    .bind(plus_one)
    .bind(plus_one_name)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await
}

/// Mark whether the guest has joined the WeChat group. No-op (returns false)
/// when the guest has not RSVP'd yet.
pub async fn set_wechat_joined(
    pool: &SqlitePool,
    user_id: i64,
    joined: bool,
    now: i64,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE rsvps SET joined_wechat = ?, updated_at = ? WHERE user_id = ?")
        .bind(joined)
        .bind(now)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
