use shared::models::Notification;
use sqlx::SqlitePool;

pub async fn create(
    pool: &SqlitePool,
    user_id: i64,
    message: &str,
    now: i64,
) -> Result<Notification, sqlx::Error> {
    sqlx::query_as(
        "INSERT INTO notifications (user_id, message, is_read, created_at)
         VALUES (?, ?, 0, ?)
         RETURNING *",
    )
    .bind(user_id)
    .bind(message)
    .bind(now)
    .fetch_one(pool)
    .await
}

pub async fn list_for_user(
    pool: &SqlitePool,
    user_id: i64,
) -> Result<Vec<Notification>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM notifications WHERE user_id = ? ORDER BY created_at DESC")
        .bind(user_id)
        .fetch_all(pool)
        .await
}
