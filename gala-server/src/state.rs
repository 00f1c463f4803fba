//! Application state

use sqlx::SqlitePool;

use crate::auth::SessionService;
use crate::config::Config;
use crate::db::DbService;
use crate::email::EmailService;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// SQLite connection pool
    pub pool: SqlitePool,
    /// Session cookie signing/verification
    pub sessions: SessionService,
    /// Outbound email (SES or preview)
    pub email: EmailService,
    /// Shared key granting kitchen staff access to order management
    pub staff_access_key: String,
    /// Environment: development | staging | production
    pub environment: String,
}

impl AppState {
    /// Create a new AppState: open the database, run migrations, pick the
    /// email transport.
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let db = DbService::new(&config.database_url).await?;
        let email = EmailService::from_config(config).await;

        Ok(Self {
            pool: db.pool,
            sessions: SessionService::new(&config.jwt_secret),
            email,
            staff_access_key: config.staff_access_key.clone(),
            environment: config.environment.clone(),
        })
    }
}
