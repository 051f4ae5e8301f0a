//! Calculation Service - pricing and archive orchestration

use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{CalculationError, CalculationResult};
use crate::models::{Calculation, CalculationRequest, FenceType, MAX_LIST_LIMIT};
use crate::pricing::PricingEngine;
use crate::repository::CalculationRepository;

/// Validates input, prices it, and hands archived results to the repository.
pub struct CalculationService<R: CalculationRepository> {
    engine: Arc<PricingEngine>,
    repository: Arc<R>,
}

impl<R: CalculationRepository> CalculationService<R> {
    pub fn new(engine: PricingEngine, repository: R) -> Self {
        Self {
            engine: Arc::new(engine),
            repository: Arc::new(repository),
        }
    }

    /// Recognised countries, sorted
    pub fn countries(&self) -> Vec<String> {
        self.engine.rates().countries()
    }

    pub fn fence_types(&self) -> Vec<FenceType> {
        self.engine
            .rates()
            .fence_types()
            .into_iter()
            .map(|(code, daily_capacity)| FenceType {
                code,
                daily_capacity,
            })
            .collect()
    }

    /// Price a request without storing anything.
    #[instrument(skip(self, request), fields(country = %request.country, fence_type = %request.fence_type))]
    pub fn preview(&self, request: CalculationRequest) -> CalculationResult<Calculation> {
        request
            .validate()
            .map_err(|e| CalculationError::Validation(e.to_string()))?;

        let breakdown = self.engine.compute_estimate(&request)?;
        Ok(Calculation::new(request, breakdown))
    }

    /// Store a previewed calculation as-is. Never overwrites an existing id.
    #[instrument(skip(self, calculation), fields(calculation_id = %calculation.id))]
    pub async fn archive(&self, calculation: Calculation) -> CalculationResult<Calculation> {
        calculation
            .validate()
            .map_err(|e| CalculationError::Validation(e.to_string()))?;

        self.repository.save(calculation).await
    }

    /// Archived calculations, newest first
    #[instrument(skip(self))]
    pub async fn list(&self, limit: i64) -> CalculationResult<Vec<Calculation>> {
        if !(1..=MAX_LIST_LIMIT).contains(&limit) {
            return Err(CalculationError::Validation(format!(
                "limit must be between 1 and {MAX_LIST_LIMIT}, got {limit}"
            )));
        }

        self.repository.list(limit).await
    }

    /// Delete archived calculations by id, returning how many were removed
    #[instrument(skip(self, ids), fields(requested = ids.len()))]
    pub async fn delete(&self, mut ids: Vec<Uuid>) -> CalculationResult<u64> {
        if ids.is_empty() {
            return Err(CalculationError::Validation(
                "ids must contain at least one id".to_string(),
            ));
        }

        ids.sort_unstable();
        ids.dedup();
        self.repository.delete_by_ids(ids).await
    }
}

impl<R: CalculationRepository> Clone for CalculationService<R> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
            repository: Arc::clone(&self.repository),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockCalculationRepository;

    fn request(country: &str) -> CalculationRequest {
        CalculationRequest {
            user_name: "Ana".to_string(),
            project_name: "Paddock".to_string(),
            country: country.to_string(),
            fence_type: "OR".to_string(),
            meters: 272.0,
            gates: 4,
        }
    }

    fn service(mock_repo: MockCalculationRepository) -> CalculationService<MockCalculationRepository> {
        CalculationService::new(PricingEngine::default(), mock_repo)
    }

    #[test]
    fn test_preview_does_not_touch_repository() {
        // No expectations: any repository call would panic
        let service = service(MockCalculationRepository::new());

        let calculation = service.preview(request("United Kingdom")).unwrap();
        assert_eq!(calculation.country, "United Kingdom");
        assert_eq!(calculation.breakdown.work_days, 4.0);
    }

    #[test]
    fn test_preview_ids_are_unique() {
        let service = service(MockCalculationRepository::new());
        let a = service.preview(request("France")).unwrap();
        let b = service.preview(request("France")).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_preview_unknown_country() {
        let service = service(MockCalculationRepository::new());
        let err = service.preview(request("Atlantis")).unwrap_err();
        assert!(matches!(err, CalculationError::InvalidCountry(c) if c == "Atlantis"));
    }

    #[test]
    fn test_preview_rejects_overlong_names() {
        let service = service(MockCalculationRepository::new());
        let mut req = request("Spain");
        req.project_name = "x".repeat(201);
        assert!(matches!(
            service.preview(req),
            Err(CalculationError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_archive_saves_calculation() {
        let mut mock_repo = MockCalculationRepository::new();
        mock_repo
            .expect_save()
            .times(1)
            .returning(|calculation| Ok(calculation));

        let service = service(mock_repo);
        let preview = service.preview(request("Germany")).unwrap();
        let archived = service.archive(preview.clone()).await.unwrap();

        assert_eq!(archived, preview);
    }

    #[tokio::test]
    async fn test_archive_propagates_duplicate() {
        let mut mock_repo = MockCalculationRepository::new();
        mock_repo
            .expect_save()
            .returning(|calculation| Err(CalculationError::DuplicateId(calculation.id)));

        let service = service(mock_repo);
        let preview = service.preview(request("Germany")).unwrap();
        let err = service.archive(preview.clone()).await.unwrap_err();

        assert!(matches!(err, CalculationError::DuplicateId(id) if id == preview.id));
    }

    #[tokio::test]
    async fn test_list_passes_limit() {
        let mut mock_repo = MockCalculationRepository::new();
        mock_repo
            .expect_list()
            .with(mockall::predicate::eq(25))
            .returning(|_| Ok(vec![]));

        let service = service(mock_repo);
        assert!(service.list(25).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_rejects_out_of_range_limit() {
        let service = service(MockCalculationRepository::new());
        for limit in [0, -1, MAX_LIST_LIMIT + 1] {
            assert!(matches!(
                service.list(limit).await,
                Err(CalculationError::Validation(_))
            ));
        }
    }

    #[tokio::test]
    async fn test_delete_requires_ids() {
        let service = service(MockCalculationRepository::new());
        assert!(matches!(
            service.delete(vec![]).await,
            Err(CalculationError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_dedups_ids() {
        let id = Uuid::new_v4();
        let mut mock_repo = MockCalculationRepository::new();
        mock_repo
            .expect_delete_by_ids()
            .withf(move |ids| ids == &vec![id])
            .returning(|ids| Ok(ids.len() as u64));

        let service = service(mock_repo);
        assert_eq!(service.delete(vec![id, id]).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_storage_error_propagates() {
        let mut mock_repo = MockCalculationRepository::new();
        mock_repo
            .expect_list()
            .returning(|_| Err(CalculationError::Storage("timeout".to_string())));

        let service = service(mock_repo);
        assert!(matches!(
            service.list(10).await,
            Err(CalculationError::Storage(_))
        ));
    }

    #[test]
    fn test_fence_types_listing() {
        let service = service(MockCalculationRepository::new());
        let codes: Vec<String> = service.fence_types().into_iter().map(|f| f.code).collect();
        assert_eq!(codes, vec!["OR", "PR1", "PR2"]);
    }
}
