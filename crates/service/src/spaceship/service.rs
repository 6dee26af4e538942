use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use common::metrics::{SEARCH_CACHE_HITS_TOTAL, SEARCH_CACHE_MISSES_TOTAL, WRITES_TOTAL};
use configs::CacheConfig;
use moka::future::Cache;
use tracing::{debug, info, instrument};

use super::{Spaceship, SpaceshipDraft, SpaceshipRepository};
use crate::errors::ServiceError;
use crate::pagination::PageRequest;

/// Application service over a `SpaceshipRepository`.
///
/// Name searches are cached per literal search string. Concurrent misses on the same
/// string share a single storage query; failed queries are not cached. With
/// `invalidate_on_write` every successful write empties the cache.
///
/// Entries are keyed by the write generation they were read in. A search that read
/// storage before a write and finishes after it lands under the old generation, which
/// later searches never look up.
pub struct SpaceshipService {
    repo: Arc<dyn SpaceshipRepository>,
    search_cache: Cache<(u64, String), Vec<Spaceship>>,
    write_generation: AtomicU64,
    invalidate_on_write: bool,
}

impl SpaceshipService {
    pub fn new(repo: Arc<dyn SpaceshipRepository>, cache: &CacheConfig) -> Self {
        let mut builder = Cache::builder().max_capacity(cache.max_capacity);
        if let Some(ttl) = cache.ttl_secs {
            builder = builder.time_to_live(Duration::from_secs(ttl));
        }
        Self {
            repo,
            search_cache: builder.build(),
            write_generation: AtomicU64::new(0),
            invalidate_on_write: cache.invalidate_on_write,
        }
    }

    pub async fn list_page(&self, req: PageRequest) -> Result<Vec<Spaceship>, ServiceError> {
        let (page, size) = req.validate()?;
        self.repo.get_page(page, size).await
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<Spaceship>, ServiceError> {
        self.repo.get_by_id(id).await
    }

    #[instrument(skip(self))]
    pub async fn search_by_name(&self, name: &str) -> Result<Vec<Spaceship>, ServiceError> {
        let generation = self.write_generation.load(Ordering::Acquire);
        let key = (generation, name.to_owned());
        let entry = self
            .search_cache
            .entry_by_ref(&key)
            .or_try_insert_with(self.repo.find_by_name_contains(name))
            .await
            .map_err(|e| e.as_ref().clone())?;
        if entry.is_fresh() {
            SEARCH_CACHE_MISSES_TOTAL.inc();
            debug!(count = entry.value().len(), "search_cache_miss");
            if self.write_generation.load(Ordering::Acquire) != generation {
                // a write finished while this query ran; drop the outdated entry
                self.search_cache.invalidate(&key).await;
            }
        } else {
            SEARCH_CACHE_HITS_TOTAL.inc();
            debug!("search_cache_hit");
        }
        Ok(entry.into_value())
    }

    /// Insert when `draft.id` is `None`, otherwise replace (or create) the record under that id.
    #[instrument(skip(self, draft), fields(id = ?draft.id))]
    pub async fn save(&self, draft: SpaceshipDraft) -> Result<Spaceship, ServiceError> {
        let saved = match draft.id {
            None => {
                let created = self.repo.insert(&draft.name, &draft.series).await?;
                WRITES_TOTAL.with_label_values(&["insert"]).inc();
                info!(id = created.id, name = %created.name, "spaceship_created");
                created
            }
            Some(id) => {
                let ship = Spaceship { id, name: draft.name, series: draft.series };
                let updated = self.repo.update(&ship).await?;
                WRITES_TOTAL.with_label_values(&["update"]).inc();
                info!(id = updated.id, name = %updated.name, "spaceship_updated");
                updated
            }
        };
        self.after_write();
        Ok(saved)
    }

    #[instrument(skip(self))]
    pub async fn delete_by_id(&self, id: i64) -> Result<(), ServiceError> {
        if self.repo.delete(id).await? {
            WRITES_TOTAL.with_label_values(&["delete"]).inc();
            info!(id, "spaceship_deleted");
            self.after_write();
        } else {
            debug!(id, "delete of unknown spaceship ignored");
        }
        Ok(())
    }

    fn after_write(&self) {
        if self.invalidate_on_write {
            self.write_generation.fetch_add(1, Ordering::AcqRel);
            self.search_cache.invalidate_all();
        }
    }
}
