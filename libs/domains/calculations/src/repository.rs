use async_trait::async_trait;
use uuid::Uuid;

use crate::error::CalculationResult;
use crate::models::Calculation;

/// Archive of priced calculations.
///
/// Implementations never overwrite: saving an id that is already stored
/// fails with [`crate::CalculationError::DuplicateId`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CalculationRepository: Send + Sync {
    /// Store a calculation
    async fn save(&self, calculation: Calculation) -> CalculationResult<Calculation>;

    /// Up to `limit` calculations, newest first
    async fn list(&self, limit: i64) -> CalculationResult<Vec<Calculation>>;

    /// Remove every calculation whose id is in `ids`, returning how many existed
    async fn delete_by_ids(&self, ids: Vec<Uuid>) -> CalculationResult<u64>;
}
