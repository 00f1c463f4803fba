use shared::Money;
use shared::models::MenuItem;
use sqlx::SqlitePool;

pub async fn list_all(pool: &SqlitePool) -> Result<Vec<MenuItem>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM menu_items ORDER BY id")
        .fetch_all(pool)
        .await
}

/// Only items guests may order from
pub async fn list_available(pool: &SqlitePool) -> Result<Vec<MenuItem>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM menu_items WHERE is_available = 1 ORDER BY id")
        .fetch_all(pool)
        .await
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<MenuItem>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM menu_items WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn create(
    pool: &SqlitePool,
    name: &str,
    description: Option<&str>,
    price: Money,
    image_url: Option<&str>,
    now: i64,
) -> Result<MenuItem, sqlx::Error> {
    sqlx::query_as(
        "INSERT INTO menu_items (name, description, price, image_url, is_available, created_at, updated_at)
         VALUES (?, ?, ?, ?, 1, ?, ?)
         RETURNING *",
    )
    .bind(name)
    .bind(description)
    .bind(price)
    .bind(image_url)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await
}

#[allow(clippy::too_many_arguments)]
pub async fn update(
    pool: &SqlitePool,
    id: i64,
    name: &str,
    description: Option<&str>,
    price: Money,
    image_url: Option<&str>,
    is_available: bool,
    now: i64,
) -> Result<Option<MenuItem>, sqlx::Error> {
    sqlx::query_as(
        "UPDATE menu_items SET
            name = ?, description = ?, price = ?, image_url = ?, is_available = ?, updated_at = ?
         WHERE id = ?
         RETURNING *",
    )
    .bind(name)
    .bind(description)
    .bind(price)
    .bind(image_url)
    .bind(is_available)
    .bind(now)
    .bind(id)
    .fetch_optional(pool)
    .await
}
