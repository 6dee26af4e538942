#![cfg(test)]
use sea_orm::DatabaseConnection;
use migration::MigratorTrait;
use models::db::{connect_with_config, DatabaseConfig};

/// Connection for repository tests with migrations applied.
///
/// Defaults to a private in-memory SQLite database per call; set `TEST_DATABASE_URL`
/// to run against a dedicated PostgreSQL database instead.
pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    let cfg = match std::env::var("TEST_DATABASE_URL") {
        Ok(url) => DatabaseConfig { url, max_connections: 5, min_connections: 1, ..DatabaseConfig::default() },
        Err(_) => DatabaseConfig::sqlite_memory(),
    };
    let db = connect_with_config(&cfg).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}
