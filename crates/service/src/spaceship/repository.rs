use async_trait::async_trait;
use sea_orm::DatabaseConnection;

use super::Spaceship;
use crate::errors::ServiceError;

/// Record storage for spaceships.
///
/// Absent ids are not errors: `get_by_id` yields `None`, `delete` yields `false`,
/// and `update` inserts under the given id.
#[async_trait]
pub trait SpaceshipRepository: Send + Sync {
    async fn insert(&self, name: &str, series: &str) -> Result<Spaceship, ServiceError>;
    async fn get_by_id(&self, id: i64) -> Result<Option<Spaceship>, ServiceError>;
    /// Zero-based page ordered by id; empty past the end.
    async fn get_page(&self, page: u64, size: u64) -> Result<Vec<Spaceship>, ServiceError>;
    async fn find_by_name_contains(&self, fragment: &str) -> Result<Vec<Spaceship>, ServiceError>;
    async fn update(&self, ship: &Spaceship) -> Result<Spaceship, ServiceError>;
    async fn delete(&self, id: i64) -> Result<bool, ServiceError>;
}

/// SeaORM-backed repository implementation.
pub struct SeaOrmSpaceshipRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmSpaceshipRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

#[async_trait]
impl SpaceshipRepository for SeaOrmSpaceshipRepository {
    async fn insert(&self, name: &str, series: &str) -> Result<Spaceship, ServiceError> {
        Ok(models::spaceship::create(&self.db, name, series).await?)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Spaceship>, ServiceError> {
        Ok(models::spaceship::find_by_id(&self.db, id).await?)
    }

    async fn get_page(&self, page: u64, size: u64) -> Result<Vec<Spaceship>, ServiceError> {
        Ok(models::spaceship::find_page(&self.db, page, size).await?)
    }

    async fn find_by_name_contains(&self, fragment: &str) -> Result<Vec<Spaceship>, ServiceError> {
        Ok(models::spaceship::find_by_name_contains(&self.db, fragment).await?)
    }

    async fn update(&self, ship: &Spaceship) -> Result<Spaceship, ServiceError> {
        Ok(models::spaceship::upsert(&self.db, ship.id, &ship.name, &ship.series).await?)
    }

    async fn delete(&self, id: i64) -> Result<bool, ServiceError> {
        Ok(models::spaceship::delete_by_id(&self.db, id).await?)
    }
}

/// Simple in-memory repository for tests and local runs without a database.
pub mod memory {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Mutex;

    struct Rows {
        by_id: BTreeMap<i64, Spaceship>,
        next_id: i64,
    }

    pub struct InMemorySpaceshipRepository {
        rows: Mutex<Rows>,
        name_queries: AtomicUsize,
    }

    impl Default for InMemorySpaceshipRepository {
        fn default() -> Self {
            Self {
                rows: Mutex::new(Rows { by_id: BTreeMap::new(), next_id: 1 }),
                name_queries: AtomicUsize::new(0),
            }
        }
    }

    impl InMemorySpaceshipRepository {
        /// Number of `find_by_name_contains` calls served so far.
        pub fn name_queries(&self) -> usize { self.name_queries.load(Ordering::SeqCst) }
    }

    #[async_trait]
    impl SpaceshipRepository for InMemorySpaceshipRepository {
        async fn insert(&self, name: &str, series: &str) -> Result<Spaceship, ServiceError> {
            let mut rows = self.rows.lock().await;
            let ship = Spaceship { id: rows.next_id, name: name.to_string(), series: series.to_string() };
            rows.next_id += 1;
            rows.by_id.insert(ship.id, ship.clone());
            Ok(ship)
        }

        async fn get_by_id(&self, id: i64) -> Result<Option<Spaceship>, ServiceError> {
            Ok(self.rows.lock().await.by_id.get(&id).cloned())
        }

        async fn get_page(&self, page: u64, size: u64) -> Result<Vec<Spaceship>, ServiceError> {
            let rows = self.rows.lock().await;
            let skip = page.saturating_mul(size);
            let skip = usize::try_from(skip).unwrap_or(usize::MAX);
            let take = usize::try_from(size).unwrap_or(usize::MAX);
            Ok(rows.by_id.values().skip(skip).take(take).cloned().collect())
        }

        async fn find_by_name_contains(&self, fragment: &str) -> Result<Vec<Spaceship>, ServiceError> {
            self.name_queries.fetch_add(1, Ordering::SeqCst);
            let rows = self.rows.lock().await;
            Ok(rows.by_id.values().filter(|s| s.name.contains(fragment)).cloned().collect())
        }

        async fn update(&self, ship: &Spaceship) -> Result<Spaceship, ServiceError> {
            let mut rows = self.rows.lock().await;
            rows.next_id = rows.next_id.max(ship.id.saturating_add(1));
            rows.by_id.insert(ship.id, ship.clone());
            Ok(ship.clone())
        }

        async fn delete(&self, id: i64) -> Result<bool, ServiceError> {
            Ok(self.rows.lock().await.by_id.remove(&id).is_some())
        }
    }
}
