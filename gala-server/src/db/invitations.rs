use shared::models::Invitation;
use sqlx::SqlitePool;

pub async fn create(
    pool: &SqlitePool,
    user_id: i64,
    token: &str,
    expires_at: i64,
    now: i64,
) -> Result<Invitation, sqlx::Error> {
    sqlx::query_as(
        "INSERT INTO invitations (user_id, token, is_used, expires_at, created_at)
         VALUES (?, ?, 0, ?, ?)
         RETURNING *",
    )
    .bind(user_id)
    .bind(token)
    .bind(expires_at)
    .bind(now)
    .fetch_one(pool)
    .await
}

/// Atomically consume a token: marks it used and returns the owning user id.
/// Returns `None` if the token is unknown, already used, or expired. The
/// single conditional UPDATE means two concurrent redemptions cannot both win.
pub async fn consume(
    pool: &SqlitePool,
    token: &str,
    now: i64,
) -> Result<Option<i64>, sqlx::Error> {
    let row: Option<(i64,)> = sqlx::query_as(
        "UPDATE invitations SET is_used = 1
         WHERE token = ? AND is_used = 0 AND expires_at > ?
         RETURNING user_id",
    )
    .bind(token)
    .bind(now)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(|(user_id,)| user_id))
}
