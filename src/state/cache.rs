use super::storage::KeyValueStore;
use crate::error::{SerdeJsonAction, SerdeJsonSnafu, SlateResult};
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use snafu::ResultExt;
use std::time::Duration;

#[derive(Serialize, Deserialize, Debug)]
struct CacheEntry<T> {
    /// milliseconds since the epoch
    timestamp: i64,
    data: Vec<T>,
}

/// Named lists kept in local storage with the time they were written. Only
/// ever a fallback for when the live fetch fails.
#[derive(Clone, Debug)]
pub struct TtlCache<S> {
    store: S,
    ttl: Duration,
}

impl<S: KeyValueStore> TtlCache<S> {
    pub fn new(store: S, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    pub async fn save<T: Serialize + Sync>(&self, key: &str, items: &[T]) {
        self.save_at(key, items, Utc::now()).await;
    }

    pub async fn save_at<T: Serialize + Sync>(&self, key: &str, items: &[T], now: DateTime<Utc>) {
        if let Err(e) = self.try_save(key, items, now).await {
            error!(?e, %key, "Unable to save cache");
        }
    }

    async fn try_save<T: Serialize + Sync>(
        &self,
        key: &str,
        items: &[T],
        now: DateTime<Utc>,
    ) -> SlateResult<()> {
        #[derive(Serialize)]
        struct BorrowedEntry<'a, T> {
            timestamp: i64,
            data: &'a [T],
        }

        let json = serde_json::to_string(&BorrowedEntry {
            timestamp: now.timestamp_millis(),
            data: items,
        })
        .context(SerdeJsonSnafu {
            action: SerdeJsonAction::EncodingCacheEntry(key.to_string()),
        })?;

        self.store.set(key, json).await
    }

    /// The cached list, or an empty one if it is missing, stale or unreadable.
    pub async fn load<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        self.load_at(key, Utc::now()).await
    }

    pub async fn load_at<T: DeserializeOwned>(&self, key: &str, now: DateTime<Utc>) -> Vec<T> {
        let raw = match self.store.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return vec![],
            Err(e) => {
                error!(?e, %key, "Unable to read cache");
                return vec![];
            }
        };

        let entry: CacheEntry<T> = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                error!(?e, %key, "Corrupted cache entry");
                return vec![];
            }
        };

        let age = now.timestamp_millis() - entry.timestamp;
        let ttl = i64::try_from(self.ttl.as_millis()).unwrap_or(i64::MAX);
        if (0..ttl).contains(&age) {
            debug!(%key, age, "Cache hit");
            entry.data
        } else {
            debug!(%key, age, "Cache entry expired");
            vec![]
        }
    }

    pub async fn invalidate(&self, key: &str) {
        if let Err(e) = self.store.remove(key).await {
            error!(?e, %key, "Unable to clear cache");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::Teacher,
        state::storage::{tests::scratch_dir, FileStore, MemoryStore},
    };
    use chrono::TimeDelta;

    const HOUR: Duration = Duration::from_secs(3600);

    fn teachers() -> Vec<Teacher> {
        vec![
            Teacher {
                id: 1,
                nom: "Durand".into(),
                prenom: "Paul".into(),
                ..Teacher::default()
            },
            Teacher {
                id: 2,
                nom: "Roux".into(),
                prenom: "Anne".into(),
                matieres: vec!["Physique".into()],
                ..Teacher::default()
            },
        ]
    }

    #[tokio::test]
    async fn fresh_entries_come_back_unchanged() {
        let cache = TtlCache::new(MemoryStore::default(), HOUR);
        let written = Utc::now();
        cache.save_at("teachers_cache", &teachers(), written).await;

        let read: Vec<Teacher> = cache
            .load_at("teachers_cache", written + TimeDelta::minutes(59))
            .await;
        assert_eq!(read, teachers());
    }

    #[tokio::test]
    async fn stale_entries_are_a_miss() {
        let cache = TtlCache::new(MemoryStore::default(), HOUR);
        let written = Utc::now();
        cache.save_at("teachers_cache", &teachers(), written).await;

        let at_ttl: Vec<Teacher> = cache
            .load_at("teachers_cache", written + TimeDelta::hours(1))
            .await;
        assert!(at_ttl.is_empty());

        let from_the_future: Vec<Teacher> = cache
            .load_at("teachers_cache", written - TimeDelta::minutes(5))
            .await;
        assert!(from_the_future.is_empty());
    }

    #[tokio::test]
    async fn corrupted_or_missing_entries_are_a_miss() {
        let store = MemoryStore::default();
        store.set("teachers_cache", "{not json".into()).await.unwrap();
        let cache = TtlCache::new(store.clone(), HOUR);

        let corrupted: Vec<Teacher> = cache.load("teachers_cache").await;
        assert!(corrupted.is_empty());

        let missing: Vec<Teacher> = cache.load("nothing_here").await;
        assert!(missing.is_empty());

        store
            .set("teachers_cache", r#"{"timestamp": "yesterday", "data": []}"#.into())
            .await
            .unwrap();
        let wrong_types: Vec<Teacher> = cache.load("teachers_cache").await;
        assert!(wrong_types.is_empty());
    }

    #[tokio::test]
    async fn survives_on_disk() {
        let dir = scratch_dir("ttl-cache");
        let cache = TtlCache::new(FileStore::new(&dir), HOUR);
        cache.save("teachers_cache", &teachers()).await;

        let reopened = TtlCache::new(FileStore::new(&dir), HOUR);
        let read: Vec<Teacher> = reopened.load("teachers_cache").await;
        assert_eq!(read.len(), 2);

        reopened.invalidate("teachers_cache").await;
        let gone: Vec<Teacher> = reopened.load("teachers_cache").await;
        assert!(gone.is_empty());

        let _ = tokio::fs::remove_dir_all(&dir).await;
    }
}
