//! Database access layer
//!
//! One module per table, free functions taking a pool or transaction.
//! Queries return `sqlx::Error`; business rules live in the handlers.

pub mod invitations;
pub mod menu;
pub mod notifications;
pub mod orders;
pub mod rsvps;
pub mod users;

use std::str::FromStr;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Database service: owns the pool, runs migrations on startup
pub struct DbService {
    pub pool: SqlitePool,
}

impl DbService {
    pub async fn new(database_url: &str) -> Result<Self, BoxError> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .pragma("foreign_keys", "ON");

        // An in-memory database is private to its connection; more than one
        // connection in the pool would see different databases.
        let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        sqlx::query("PRAGMA busy_timeout = 5000;").execute(&pool).await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database ready");

        Ok(Self { pool })
    }
}
