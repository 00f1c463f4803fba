use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::Money;
use shared::models::{Order, OrderItem, OrderStatus};
use sqlx::{Sqlite, SqlitePool, Transaction};

/// Whose orders to list
pub enum OrderScope {
    /// A single guest's own orders
    User(i64),
    /// Every order (organizer / kitchen view)
    All,
}

/// Line item joined with its menu item, as served to clients
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemDetail {
    pub id: i64,
    pub menu_item_id: i64,
    pub name: String,
    pub price: Money,
    pub quantity: i32,
    pub notes: Option<String>,
    pub image_url: Option<String>,
}

/// An order with its items and (in the manage view) the purchaser
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderWithItems {
    pub id: i64,
    pub user_id: i64,
    pub rsvp_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guest_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guest_email: Option<String>,
    pub total_amount: Money,
    pub status: OrderStatus,
    pub created_at: i64,
    pub order_items: Vec<OrderItemDetail>,
}

/// Requested line item for a new order
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrderItem {
    pub menu_item_id: i64,
    pub quantity: i32,
    pub notes: Option<String>,
}

/// What happened when a line item was removed
pub enum ItemDeletion {
    /// Last item removed; the whole order was deleted
    OrderDeleted,
    /// Item removed and the order total recomputed
    ItemDeleted { new_total: Money },
}

/// Flat row of the orders/items join, regrouped in [`list`]
#[derive(sqlx::FromRow)]
struct OrderRow {
    order_id: i64,
    user_id: i64,
    rsvp_id: i64,
    guest_name: String,
    guest_email: String,
    total_amount: Money,
    status: OrderStatus,
    created_at: i64,
    item_id: Option<i64>,
    menu_item_id: Option<i64>,
    item_name: Option<String>,
    item_price: Option<Money>,
    quantity: Option<i32>,
    notes: Option<String>,
    image_url: Option<String>,
}

/// List orders (newest first) with their line items.
///
/// Single flat join, grouped in memory by order id; orders with no
/// remaining items never exist (the last item deletion removes the order).
pub async fn list(pool: &SqlitePool, scope: OrderScope) -> Result<Vec<OrderWithItems>, sqlx::Error> {
    let base = "SELECT o.id AS order_id, o.user_id, o.rsvp_id, o.total_amount, o.status, o.created_at,
                       u.name AS guest_name, u.email AS guest_email,
                       oi.id AS item_id, oi.menu_item_id, oi.quantity, oi.notes,
                       mi.name AS item_name, mi.price AS item_price, mi.image_url
                FROM orders o
                JOIN users u ON u.id = o.user_id
                LEFT JOIN order_items oi ON oi.order_id = o.id
                LEFT JOIN menu_items mi ON mi.id = oi.menu_item_id";

    let rows: Vec<OrderRow> = match scope {
        OrderScope::User(user_id) => {
            sqlx::query_as(&format!(
                "{base} WHERE o.user_id = ? ORDER BY o.created_at DESC, oi.id"
            ))
            .bind(user_id)
            .fetch_all(pool)
            .await?
        }
        OrderScope::All => {
            sqlx::query_as(&format!("{base} ORDER BY o.created_at DESC, oi.id"))
                .fetch_all(pool)
                .await?
        }
    };

    let include_guest = matches!(scope, OrderScope::All);

    let mut orders: Vec<OrderWithItems> = Vec::new();
    let mut index: std::collections::HashMap<i64, usize> = std::collections::HashMap::new();

    for row in rows {
        let pos = match index.get(&row.order_id) {
            Some(&pos) => pos,
            None => {
                index.insert(row.order_id, orders.len());
                orders.push(OrderWithItems {
                    id: row.order_id,
                    user_id: row.user_id,
                    rsvp_id: row.rsvp_id,
                    guest_name: include_guest.then(|| row.guest_name.clone()),
                    guest_email: include_guest.then(|| row.guest_email.clone()),
                    total_amount: row.total_amount,
                    status: row.status,
                    created_at: row.created_at,
                    order_items: Vec::new(),
                });
                orders.len() - 1
            }
        };

        if let (Some(id), Some(menu_item_id), Some(name), Some(price), Some(quantity)) = (
            row.item_id,
            row.menu_item_id,
            row.item_name,
            row.item_price,
            row.quantity,
        ) {
            orders[pos].order_items.push(OrderItemDetail {
                id,
                menu_item_id,
                name,
                price,
                quantity,
                notes: row.notes,
                image_url: row.image_url,
            });
        }
    }

    Ok(orders)
}

/// Create an order with its items in one transaction.
/// `total` must already be the server-computed Σ(quantity × price).
pub async fn create(
    pool: &SqlitePool,
    user_id: i64,
    rsvp_id: i64,
    total: Money,
    items: &[NewOrderItem],
    now: i64,
) -> Result<Order, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let order: Order = sqlx::query_as(
        "INSERT INTO orders (user_id, rsvp_id, total_amount, status, created_at, updated_at)
         VALUES (?, ?, ?, 'pending', ?, ?)
         RETURNING *",
    )
    .bind(user_id)
    .bind(rsvp_id)
    .bind(total)
    .bind(now)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    for item in items {
        sqlx::query(
            "INSERT INTO order_items (order_id, menu_item_id, quantity, notes, created_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(order.id)
        .bind(item.menu_item_id)
        .bind(item.quantity)
        .bind(item.notes.as_deref())
        .bind(now)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(order)
}

/// Look up an order only if it belongs to the given user
pub async fn find_for_user(
    pool: &SqlitePool,
    order_id: i64,
    user_id: i64,
) -> Result<Option<Order>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM orders WHERE id = ? AND user_id = ?")
        .bind(order_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

/// Change a line item's quantity and recompute the order total, atomically.
/// Returns `None` when the item does not exist on that order.
pub async fn update_item_quantity(
    pool: &SqlitePool,
    order_id: i64,
    item_id: i64,
    quantity: i32,
    now: i64,
) -> Result<Option<OrderItem>, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let item: Option<OrderItem> = sqlx::query_as(
        "UPDATE order_items SET quantity = ?
         WHERE id = ? AND order_id = ?
         RETURNING *",
    )
    .bind(quantity)
    .bind(item_id)
    .bind(order_id)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(item) = item else {
        return Ok(None);
    };

    let total = recompute_total(&mut tx, order_id).await?;
    sqlx::query("UPDATE orders SET total_amount = ?, updated_at = ? WHERE id = ?")
        .bind(total)
        .bind(now)
        .bind(order_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(Some(item))
}

/// Remove a line item. Deleting the last item deletes the order itself;
/// otherwise the total is recomputed. All in one transaction.
pub async fn delete_item(
    pool: &SqlitePool,
    order_id: i64,
    item_id: i64,
    now: i64,
) -> Result<Option<ItemDeletion>, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let deleted = sqlx::query("DELETE FROM order_items WHERE id = ? AND order_id = ?")
        .bind(item_id)
        .bind(order_id)
        .execute(&mut *tx)
        .await?;
    if deleted.rows_affected() == 0 {
        return Ok(None);
    }

    let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM order_items WHERE order_id = ?")
        .bind(order_id)
        .fetch_one(&mut *tx)
        .await?;

    let outcome = if remaining == 0 {
        sqlx::query("DELETE FROM orders WHERE id = ?")
            .bind(order_id)
            .execute(&mut *tx)
            .await?;
        ItemDeletion::OrderDeleted
    } else {
        let new_total = recompute_total(&mut tx, order_id).await?;
        sqlx::query("UPDATE orders SET total_amount = ?, updated_at = ? WHERE id = ?")
            .bind(new_total)
            .bind(now)
            .bind(order_id)
            .execute(&mut *tx)
            .await?;
        ItemDeletion::ItemDeleted { new_total }
    };

    tx.commit().await?;
    Ok(Some(outcome))
}

pub async fn update_status(
    pool: &SqlitePool,
    order_id: i64,
    status: OrderStatus,
    now: i64,
) -> Result<Option<Order>, sqlx::Error> {
    sqlx::query_as(
        "UPDATE orders SET status = ?, updated_at = ? WHERE id = ? RETURNING *",
    )
    .bind(status)
    .bind(now)
    .bind(order_id)
    .fetch_optional(pool)
    .await
}

/// Σ(quantity × current menu price) over the order's items
async fn recompute_total(
    tx: &mut Transaction<'_, Sqlite>,
    order_id: i64,
) -> Result<Money, sqlx::Error> {
    let rows: Vec<(i32, Money)> = sqlx::query_as(
        "SELECT oi.quantity, mi.price
         FROM order_items oi
         JOIN menu_items mi ON mi.id = oi.menu_item_id
         WHERE oi.order_id = ?",
    )
    .bind(order_id)
    .fetch_all(&mut **tx)
    .await?;

    Ok(Money(rows.iter().fold(Decimal::ZERO, |acc, (qty, price)| {
        acc + price.0 * Decimal::from(*qty)
    })))
}
