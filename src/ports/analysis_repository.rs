//! AnalysisRepository port for persisting resolved analyses.
//!
//! Called by the caller-owned follow-up after a resolution returns, never by
//! the resolver itself.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, UserId};
use crate::domain::styling::{AnalysisKind, ValidatedResult};

/// Errors that can occur while storing or loading analyses.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// Permission denied
    #[error("Permission denied: {0}")]
    PermissionDenied(String),
    /// IO error
    #[error("IO error: {0}")]
    IoError(String),
    /// Invalid path
    #[error("Invalid path: {0}")]
    InvalidPath(String),
    /// Stored data could not be decoded
    #[error("Corrupt record: {0}")]
    Corrupt(String),
}

impl From<StorageError> for DomainError {
    fn from(err: StorageError) -> Self {
        DomainError::new(ErrorCode::StorageError, err.to_string())
    }
}

/// Repository for the latest analysis of each kind per user.
#[async_trait]
pub trait AnalysisRepository: Send + Sync {
    /// Stores a result, replacing any earlier result of the same kind.
    async fn save(&self, user_id: &UserId, result: &ValidatedResult) -> Result<(), StorageError>;

    /// Loads the most recent result of a kind, if one was saved.
    async fn latest(
        &self,
        user_id: &UserId,
        kind: AnalysisKind,
    ) -> Result<Option<ValidatedResult>, StorageError>;

    /// Loads the most recent result of every kind the user has.
    async fn all_latest(&self, user_id: &UserId) -> Result<Vec<ValidatedResult>, StorageError> {
        let mut results = Vec::new();
        for kind in AnalysisKind::all() {
            if let Some(result) = self.latest(user_id, *kind).await? {
                results.push(result);
            }
        }
        Ok(results)
    }
}
