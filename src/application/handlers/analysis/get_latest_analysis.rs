//! GetLatestAnalysisHandler - Query handler for a user's saved analyses.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, ErrorCode, UserId};
use crate::domain::styling::{AnalysisKind, ValidatedResult};
use crate::ports::AnalysisRepository;

/// Query for the latest analysis of one kind.
#[derive(Debug, Clone)]
pub struct GetLatestAnalysisQuery {
    pub user_id: UserId,
    pub kind: AnalysisKind,
}

/// Handler for retrieving saved analyses.
pub struct GetLatestAnalysisHandler {
    repository: Arc<dyn AnalysisRepository>,
}

impl GetLatestAnalysisHandler {
    pub fn new(repository: Arc<dyn AnalysisRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, query: GetLatestAnalysisQuery) -> Result<ValidatedResult, DomainError> {
        self.repository
            .latest(&query.user_id, query.kind)
            .await?
            .ok_or_else(|| {
                DomainError::new(
                    ErrorCode::AnalysisNotFound,
                    format!("No {} analysis saved yet", query.kind),
                )
                .with_detail("kind", query.kind.as_str())
            })
    }

    /// Every saved analysis for the user, in canonical kind order.
    pub async fn handle_all(&self, user_id: &UserId) -> Result<Vec<ValidatedResult>, DomainError> {
        Ok(self.repository.all_latest(user_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemoryAnalysisRepository;
    use crate::domain::styling::{validate, AnalysisCatalog, Provenance};
    use serde_json::json;

    fn result(kind: AnalysisKind) -> ValidatedResult {
        let catalog = AnalysisCatalog::builtin();
        let schema = catalog.schema(kind).unwrap();
        ValidatedResult::new(schema, validate(&json!({}), schema), Provenance::ServiceDerived)
    }

    fn user() -> UserId {
        UserId::new("user-1").unwrap()
    }

    #[tokio::test]
    async fn returns_saved_result() {
        let repository = Arc::new(InMemoryAnalysisRepository::new());
        let saved = result(AnalysisKind::ColorSeason);
        repository.save(&user(), &saved).await.unwrap();
        let handler = GetLatestAnalysisHandler::new(repository);

        let loaded = handler
            .handle(GetLatestAnalysisQuery {
                user_id: user(),
                kind: AnalysisKind::ColorSeason,
            })
            .await
            .unwrap();

        assert_eq!(loaded, saved);
    }

    #[tokio::test]
    async fn missing_result_is_not_found() {
        let handler = GetLatestAnalysisHandler::new(Arc::new(InMemoryAnalysisRepository::new()));

        let err = handler
            .handle(GetLatestAnalysisQuery {
                user_id: user(),
                kind: AnalysisKind::BodyShape,
            })
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::AnalysisNotFound);
        assert_eq!(err.details.get("kind"), Some(&"body_shape".to_string()));
    }

    #[tokio::test]
    async fn handle_all_lists_saved_kinds() {
        let repository = Arc::new(InMemoryAnalysisRepository::new());
        repository.save(&user(), &result(AnalysisKind::GarmentAssessment)).await.unwrap();
        repository.save(&user(), &result(AnalysisKind::ColorSeason)).await.unwrap();
        let handler = GetLatestAnalysisHandler::new(repository);

        let all = handler.handle_all(&user()).await.unwrap();

        let kinds: Vec<AnalysisKind> = all.iter().map(ValidatedResult::kind).collect();
        assert_eq!(kinds, vec![AnalysisKind::ColorSeason, AnalysisKind::GarmentAssessment]);
    }
}
