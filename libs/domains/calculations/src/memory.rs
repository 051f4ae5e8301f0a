//! In-process CalculationRepository for local runs and tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use tokio::sync::RwLock;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{CalculationError, CalculationResult};
use crate::models::Calculation;
use crate::repository::CalculationRepository;

/// Keeps calculations in a map keyed by id. Contents are lost on restart.
#[derive(Default)]
pub struct InMemoryCalculationRepository {
    calculations: RwLock<HashMap<Uuid, Calculation>>,
}

impl InMemoryCalculationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.calculations.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.calculations.read().await.is_empty()
    }
}

#[async_trait]
impl CalculationRepository for InMemoryCalculationRepository {
    #[instrument(skip(self, calculation), fields(calculation_id = %calculation.id))]
    async fn save(&self, calculation: Calculation) -> CalculationResult<Calculation> {
        let mut calculations = self.calculations.write().await;
        match calculations.entry(calculation.id) {
            Entry::Occupied(_) => Err(CalculationError::DuplicateId(calculation.id)),
            Entry::Vacant(slot) => {
                slot.insert(calculation.clone());
                tracing::info!(calculation_id = %calculation.id, "Calculation archived");
                Ok(calculation)
            }
        }
    }

    #[instrument(skip(self))]
    async fn list(&self, limit: i64) -> CalculationResult<Vec<Calculation>> {
        let calculations = self.calculations.read().await;
        let mut all: Vec<Calculation> = calculations.values().cloned().collect();
        all.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        all.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(all)
    }

    #[instrument(skip(self, ids), fields(requested = ids.len()))]
    async fn delete_by_ids(&self, ids: Vec<Uuid>) -> CalculationResult<u64> {
        let mut calculations = self.calculations.write().await;
        let deleted_count = ids
            .iter()
            .filter(|id| calculations.remove(*id).is_some())
            .count() as u64;

        tracing::info!(deleted_count, "Calculations deleted");
        Ok(deleted_count)
    }
}
