//! In-Memory Analysis Repository
//!
//! Keeps the latest result per user and kind in memory.
//! Useful for testing and development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::UserId;
use crate::domain::styling::{AnalysisKind, ValidatedResult};
use crate::ports::{AnalysisRepository, StorageError};

/// In-memory storage for resolved analyses
#[derive(Debug, Clone, Default)]
pub struct InMemoryAnalysisRepository {
    results: Arc<RwLock<HashMap<(UserId, AnalysisKind), ValidatedResult>>>,
}

impl InMemoryAnalysisRepository {
    /// Create a new in-memory repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all stored data (useful for tests)
    pub async fn clear(&self) {
        self.results.write().await.clear();
    }

    /// Get the number of stored results
    pub async fn count(&self) -> usize {
        self.results.read().await.len()
    }
}

#[async_trait]
impl AnalysisRepository for InMemoryAnalysisRepository {
    async fn save(&self, user_id: &UserId, result: &ValidatedResult) -> Result<(), StorageError> {
        let mut results = self.results.write().await;
        results.insert((user_id.clone(), result.kind()), result.clone());
        Ok(())
    }

    async fn latest(
        &self,
        user_id: &UserId,
        kind: AnalysisKind,
    ) -> Result<Option<ValidatedResult>, StorageError> {
        let results = self.results.read().await;
        Ok(results.get(&(user_id.clone(), kind)).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::test_support::sample_result;

    fn user(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    #[tokio::test]
    async fn save_then_latest_returns_result() {
        let repo = InMemoryAnalysisRepository::new();
        let result = sample_result(AnalysisKind::ColorSeason);

        repo.save(&user("ana"), &result).await.unwrap();

        let loaded = repo.latest(&user("ana"), AnalysisKind::ColorSeason).await.unwrap();
        assert_eq!(loaded, Some(result));
    }

    #[tokio::test]
    async fn latest_is_scoped_by_user_and_kind() {
        let repo = InMemoryAnalysisRepository::new();
        repo.save(&user("ana"), &sample_result(AnalysisKind::ColorSeason))
            .await
            .unwrap();

        assert!(repo.latest(&user("bia"), AnalysisKind::ColorSeason).await.unwrap().is_none());
        assert!(repo.latest(&user("ana"), AnalysisKind::BodyShape).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_replaces_previous_result_of_same_kind() {
        let repo = InMemoryAnalysisRepository::new();
        let first = sample_result(AnalysisKind::BodyShape);
        let second = sample_result(AnalysisKind::BodyShape);

        repo.save(&user("ana"), &first).await.unwrap();
        repo.save(&user("ana"), &second).await.unwrap();

        assert_eq!(repo.count().await, 1);
        let loaded = repo.latest(&user("ana"), AnalysisKind::BodyShape).await.unwrap().unwrap();
        assert_eq!(loaded.id(), second.id());
    }

    #[tokio::test]
    async fn all_latest_lists_every_kind() {
        let repo = InMemoryAnalysisRepository::new();
        repo.save(&user("ana"), &sample_result(AnalysisKind::BodyShape)).await.unwrap();
        repo.save(&user("ana"), &sample_result(AnalysisKind::ColorSeason)).await.unwrap();

        let all = repo.all_latest(&user("ana")).await.unwrap();
        let kinds: Vec<AnalysisKind> = all.iter().map(ValidatedResult::kind).collect();
        assert_eq!(kinds, vec![AnalysisKind::ColorSeason, AnalysisKind::BodyShape]);

        repo.clear().await;
        assert_eq!(repo.count().await, 0);
    }
}
