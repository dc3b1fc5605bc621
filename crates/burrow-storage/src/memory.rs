use async_trait::async_trait;
use burrow_core::repository::Result;
use burrow_core::{ReadRepository, Repository, ShortCode, StorageError, UrlRecord};
use jiff::Timestamp;
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::{debug, trace};

#[derive(Debug)]
struct State {
    urls: HashMap<String, UrlRecord>,
    last_id: i64,
    closed: bool,
}

/// In-memory implementation of the [`Repository`] trait.
///
/// A single reader-writer lock guards the map and the id counter: lookups
/// and existence checks share the read side, while inserts and click
/// increments take the write side, so check-then-insert is atomic. Nothing
/// survives a process restart.
#[derive(Debug)]
pub struct InMemoryRepository {
    state: RwLock<State>,
}

impl InMemoryRepository {
    /// Creates a new in-memory repository.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates a new in-memory repository with the specified capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            state: RwLock::new(State {
                urls: HashMap::with_capacity(capacity),
                last_id: 0,
                closed: false,
            }),
        }
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.state.read().urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn ensure_open(state: &State) -> Result<()> {
    if state.closed {
        return Err(StorageError::Closed);
    }
    Ok(())
}

#[async_trait]
impl ReadRepository for InMemoryRepository {
    async fn find_by_short_code(&self, code: &ShortCode) -> Result<UrlRecord> {
        let state = self.state.read();
        ensure_open(&state)?;

        state
            .urls
            .get(code.as_str())
            .cloned()
            .ok_or_else(|| StorageError::NotFound(code.to_string()))
    }

    async fn exists(&self, code: &ShortCode) -> Result<bool> {
        let state = self.state.read();
        ensure_open(&state)?;
        Ok(state.urls.contains_key(code.as_str()))
    }

    async fn health_check(&self) -> Result<()> {
        ensure_open(&self.state.read())
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn create(&self, record: UrlRecord) -> Result<UrlRecord> {
        let mut state = self.state.write();
        ensure_open(&state)?;

        let key = record.short_code.as_str().to_owned();
        if state.urls.contains_key(&key) {
            return Err(StorageError::AlreadyExists(key));
        }

        state.last_id += 1;
        let created = UrlRecord {
            id: state.last_id,
            ..record
        };
        state.urls.insert(key, created.clone());

        debug!(code = %created.short_code, id = created.id, "Stored record in memory");
        Ok(created)
    }

    async fn increment_clicks(&self, code: &ShortCode) -> Result<UrlRecord> {
        let mut state = self.state.write();
        ensure_open(&state)?;

        let Some(record) = state.urls.get_mut(code.as_str()) else {
            return Err(StorageError::NotFound(code.to_string()));
        };
        record.clicks += 1;
        record.updated_at = Timestamp::now();

        trace!(code = %code, clicks = record.clicks, "Incremented clicks in memory");
        Ok(record.clone())
    }

    async fn close(&self) -> Result<()> {
        self.state.write().closed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn code(s: &str) -> ShortCode {
        ShortCode::new_unchecked(s)
    }

    fn record(c: &str, url: &str) -> UrlRecord {
        UrlRecord::new(code(c), url).unwrap()
    }

    #[tokio::test]
    async fn create_and_find() {
        let repo = InMemoryRepository::new();

        let created = repo
            .create(record("abc123", "https://example.com"))
            .await
            .unwrap();
        assert_eq!(created.id, 1);

        let found = repo.find_by_short_code(&code("abc123")).await.unwrap();
        assert_eq!(found, created);
        assert_eq!(found.original_url, "https://example.com");
    }

    #[tokio::test]
    async fn ids_increase_monotonically() {
        let repo = InMemoryRepository::new();

        let first = repo.create(record("aaa111", "https://a.com")).await.unwrap();
        let second = repo.create(record("bbb222", "https://b.com")).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
    }

    #[tokio::test]
    async fn find_nonexistent() {
        let repo = InMemoryRepository::new();

        let err = repo.find_by_short_code(&code("nope123")).await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
    }

    #[tokio::test]
    async fn create_conflict_keeps_original() {
        let repo = InMemoryRepository::new();

        repo.create(record("abc123", "https://example.com"))
            .await
            .unwrap();
        let err = repo
            .create(record("abc123", "https://other.com"))
            .await
            .unwrap_err();

        assert!(matches!(err, StorageError::AlreadyExists(_)));
        let found = repo.find_by_short_code(&code("abc123")).await.unwrap();
        assert_eq!(found.original_url, "https://example.com");
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn exists_checks() {
        let repo = InMemoryRepository::new();

        assert!(!repo.exists(&code("abc123")).await.unwrap());
        repo.create(record("abc123", "https://example.com"))
            .await
            .unwrap();
        assert!(repo.exists(&code("abc123")).await.unwrap());
    }

    #[tokio::test]
    async fn increment_updates_clicks_and_timestamp() {
        let repo = InMemoryRepository::new();
        let created = repo
            .create(record("abc123", "https://example.com"))
            .await
            .unwrap();

        let updated = repo.increment_clicks(&code("abc123")).await.unwrap();
        assert_eq!(updated.clicks, 1);
        assert!(updated.updated_at >= created.updated_at);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.original_url, created.original_url);
    }

    #[tokio::test]
    async fn increment_nonexistent() {
        let repo = InMemoryRepository::new();

        let err = repo.increment_clicks(&code("nope123")).await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
    }

    #[tokio::test]
    async fn close_is_idempotent_and_rejects_calls() {
        let repo = InMemoryRepository::new();
        repo.create(record("abc123", "https://example.com"))
            .await
            .unwrap();

        repo.close().await.unwrap();
        repo.close().await.unwrap();

        assert_eq!(
            repo.find_by_short_code(&code("abc123")).await.unwrap_err(),
            StorageError::Closed
        );
        assert_eq!(repo.health_check().await.unwrap_err(), StorageError::Closed);
    }

    #[tokio::test]
    async fn concurrent_creates_with_same_code_yield_one_winner() {
        let repo = Arc::new(InMemoryRepository::new());
        let mut handles = vec![];

        for i in 0..16 {
            let repo = Arc::clone(&repo);
            handles.push(tokio::spawn(async move {
                repo.create(record("contested", &format!("https://example{i}.com")))
                    .await
            }));
        }

        let mut successes = 0;
        let mut conflicts = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => successes += 1,
                Err(StorageError::AlreadyExists(_)) => conflicts += 1,
                Err(other) => panic!("unexpected error: {other}"),
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(conflicts, 15);
    }

    #[tokio::test]
    async fn concurrent_increments_are_not_lost() {
        let repo = Arc::new(InMemoryRepository::new());
        repo.create(record("popular", "https://example.com"))
            .await
            .unwrap();

        let mut handles = vec![];
        for _ in 0..10 {
            let repo = Arc::clone(&repo);
            handles.push(tokio::spawn(async move {
                for _ in 0..5 {
                    repo.increment_clicks(&code("popular")).await.unwrap();
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let found = repo.find_by_short_code(&code("popular")).await.unwrap();
        assert_eq!(found.clicks, 50);
    }
}
