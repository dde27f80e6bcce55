//! RunAnalysisHandler - Command handler that resolves an analysis and saves it.
//!
//! Persistence happens here, after the resolver has returned, so a resolution
//! that is abandoned midway leaves nothing behind.

use std::sync::Arc;

use thiserror::Error;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::styling::{InferenceRequest, ValidatedResult};
use crate::ports::{AnalysisRepository, StorageError};

use super::inference_resolver::{InferenceResolver, ResolveError};

/// Command to run one analysis for a user.
#[derive(Debug, Clone)]
pub struct RunAnalysisCommand {
    pub user_id: UserId,
    pub request: InferenceRequest,
}

/// Error type for running analyses
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RunAnalysisError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("Failed to save analysis: {0}")]
    Storage(#[from] StorageError),
}

impl From<RunAnalysisError> for DomainError {
    fn from(err: RunAnalysisError) -> Self {
        match err {
            RunAnalysisError::Resolve(err) => err.into(),
            RunAnalysisError::Storage(err) => err.into(),
        }
    }
}

/// Handler for running analyses.
pub struct RunAnalysisHandler {
    resolver: Arc<InferenceResolver>,
    repository: Arc<dyn AnalysisRepository>,
}

impl RunAnalysisHandler {
    pub fn new(resolver: Arc<InferenceResolver>, repository: Arc<dyn AnalysisRepository>) -> Self {
        Self {
            resolver,
            repository,
        }
    }

    pub async fn handle(&self, cmd: RunAnalysisCommand) -> Result<ValidatedResult, RunAnalysisError> {
        // 1. Resolve (never fails on service problems)
        let result = self.resolver.resolve(cmd.request).await?;

        // 2. Persist as the user's latest analysis of this kind
        self.repository.save(&cmd.user_id, &result).await?;

        tracing::info!(
            user_id = %cmd.user_id,
            kind = result.kind().as_str(),
            analysis_id = %result.id(),
            provenance = result.provenance().as_str(),
            "Analysis saved"
        );

        Ok(result)
    }
}
