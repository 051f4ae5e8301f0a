//! MongoDB implementation of CalculationRepository

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::{
    Collection, Database, IndexModel,
    bson::{Document, doc},
    error::{ErrorKind, WriteFailure},
    options::{FindOptions, IndexOptions},
};
use tracing::instrument;
use uuid::Uuid;

use crate::error::{CalculationError, CalculationResult};
use crate::models::Calculation;
use crate::record::{decode_all, timestamp_migration, to_document};
use crate::repository::CalculationRepository;

pub const COLLECTION_NAME: &str = "calculations";

const DUPLICATE_KEY_CODE: i32 = 11000;

pub struct MongoCalculationRepository {
    collection: Collection<Document>,
}

impl MongoCalculationRepository {
    /// ```ignore
    /// let client = database::mongodb::connect_from_config_with_retry(&config, None).await?;
    /// let repo = MongoCalculationRepository::new(&client.database(config.database()));
    /// repo.init_indexes().await?;
    /// ```
    pub fn new(db: &Database) -> Self {
        Self::with_collection(db, COLLECTION_NAME)
    }

    pub fn with_collection(db: &Database, collection_name: &str) -> Self {
        let collection = db.collection::<Document>(collection_name);
        Self { collection }
    }

    /// Rewrites BSON datetime timestamps left by older revisions as strings.
    pub async fn migrate_legacy_timestamps(&self) -> CalculationResult<u64> {
        let (filter, pipeline) = timestamp_migration();
        let result = self.collection.update_many(filter, pipeline).await?;

        if result.modified_count > 0 {
            tracing::info!(
                migrated = result.modified_count,
                "Converted legacy datetime timestamps"
            );
        }
        Ok(result.modified_count)
    }

    /// Migrates legacy timestamps, then ensures a unique `id` (no-overwrite
    /// archiving) and a newest-first `timestamp` index.
    pub async fn init_indexes(&self) -> CalculationResult<()> {
        self.migrate_legacy_timestamps().await?;

        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "id": 1 })
                .options(
                    IndexOptions::builder()
                        .unique(true)
                        .name("idx_id_unique".to_string())
                        .build(),
                )
                .build(),
            IndexModel::builder()
                .keys(doc! { "timestamp": -1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_timestamp".to_string())
                        .build(),
                )
                .build(),
        ];

        self.collection.create_indexes(indexes).await?;
        tracing::info!("Calculation indexes created successfully");
        Ok(())
    }

    fn list_options(limit: i64) -> FindOptions {
        FindOptions::builder()
            .projection(doc! { "_id": 0 })
            .sort(doc! { "timestamp": -1 })
            .limit(limit)
            .build()
    }

    fn ids_filter(ids: &[Uuid]) -> Document {
        let ids: Vec<String> = ids.iter().map(Uuid::to_string).collect();
        doc! { "id": { "$in": ids } }
    }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        *err.kind,
        ErrorKind::Write(WriteFailure::WriteError(ref write_error))
            if write_error.code == DUPLICATE_KEY_CODE
    )
}

#[async_trait]
impl CalculationRepository for MongoCalculationRepository {
    #[instrument(skip(self, calculation), fields(calculation_id = %calculation.id))]
    async fn save(&self, calculation: Calculation) -> CalculationResult<Calculation> {
        match self.collection.insert_one(to_document(&calculation)).await {
            Ok(_) => {
                tracing::info!(calculation_id = %calculation.id, "Calculation archived");
                Ok(calculation)
            }
            Err(err) if is_duplicate_key(&err) => Err(CalculationError::DuplicateId(calculation.id)),
            Err(err) => Err(err.into()),
        }
    }

    #[instrument(skip(self))]
    async fn list(&self, limit: i64) -> CalculationResult<Vec<Calculation>> {
        let documents: Vec<Document> = self
            .collection
            .find(doc! {})
            .with_options(Self::list_options(limit))
            .await?
            .try_collect()
            .await?;

        Ok(decode_all(documents))
    }

    #[instrument(skip(self, ids), fields(requested = ids.len()))]
    async fn delete_by_ids(&self, ids: Vec<Uuid>) -> CalculationResult<u64> {
        let result = self.collection.delete_many(Self::ids_filter(&ids)).await?;

        tracing::info!(deleted_count = result.deleted_count, "Calculations deleted");
        Ok(result.deleted_count)
    }
}
