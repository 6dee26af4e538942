use sea_orm::sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sea_orm::sqlx::ConnectOptions as _;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, SqlxSqliteConnector};
use std::time::Duration;
use tracing::info;

/// Connection pool settings applied through `sea_orm::ConnectOptions`.
///
/// `idle_timeout` / `max_lifetime` are `None` for in-memory SQLite: the database lives
/// only as long as its single connection, so that connection is never recycled.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout: Duration,
    pub idle_timeout: Option<Duration>,
    pub max_lifetime: Option<Duration>,
    pub acquire_timeout: Duration,
    pub sqlx_logging: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self::from(&configs::DatabaseConfig::default())
    }
}

impl From<&configs::DatabaseConfig> for DatabaseConfig {
    fn from(c: &configs::DatabaseConfig) -> Self {
        // Each pooled connection to `sqlite::memory:` opens its own empty database.
        let memory = is_sqlite_memory(&c.url);
        Self {
            url: c.url.clone(),
            max_connections: if memory { 1 } else { c.max_connections },
            min_connections: if memory { 1 } else { c.min_connections },
            connect_timeout: Duration::from_secs(c.connect_timeout_secs),
            idle_timeout: (!memory).then(|| Duration::from_secs(c.idle_timeout_secs)),
            max_lifetime: (!memory).then(|| Duration::from_secs(c.max_lifetime_secs)),
            acquire_timeout: Duration::from_secs(c.acquire_timeout_secs),
            sqlx_logging: c.sqlx_logging,
        }
    }
}

fn is_sqlite_memory(url: &str) -> bool {
    url.starts_with("sqlite:") && url.contains(":memory:")
}

impl DatabaseConfig {
    /// Private in-memory SQLite database on a single connection.
    pub fn sqlite_memory() -> Self {
        let raw = configs::DatabaseConfig { url: "sqlite::memory:".to_string(), ..Default::default() };
        Self::from(&raw)
    }

    pub fn is_sqlite_memory(&self) -> bool {
        is_sqlite_memory(&self.url)
    }

    fn connect_options(&self) -> ConnectOptions {
        let mut opt = ConnectOptions::new(self.url.clone());
        opt.max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .connect_timeout(self.connect_timeout)
            .acquire_timeout(self.acquire_timeout)
            .sqlx_logging(self.sqlx_logging);
        if let Some(idle) = self.idle_timeout {
            opt.idle_timeout(idle);
        }
        if let Some(lifetime) = self.max_lifetime {
            opt.max_lifetime(lifetime);
        }
        opt
    }
}

pub async fn connect_with_config(cfg: &DatabaseConfig) -> anyhow::Result<DatabaseConnection> {
    let db = if cfg.is_sqlite_memory() {
        connect_sqlite_memory(cfg).await?
    } else {
        Database::connect(cfg.connect_options()).await?
    };
    info!(backend = ?db.get_database_backend(), max_connections = cfg.max_connections, "database connected");
    Ok(db)
}

// sea-orm only forwards timeouts it was given, so sqlx's own idle/lifetime
// defaults would still recycle the connection. Build the pool by hand instead.
async fn connect_sqlite_memory(cfg: &DatabaseConfig) -> anyhow::Result<DatabaseConnection> {
    let mut opts: SqliteConnectOptions = cfg.url.parse()?;
    if !cfg.sqlx_logging {
        opts = opts.disable_statement_logging();
    }
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .acquire_timeout(cfg.acquire_timeout)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(opts)
        .await?;
    Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
}
