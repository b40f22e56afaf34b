//! Persistence seam used by the orchestrator.

use async_trait::async_trait;
use boxiii_core::prompt::CreatorProfile;
use boxiii_core::types::DbId;
use boxiii_db::models::creator::Creator;
use boxiii_db::models::generation::{NewGeneratedSet, PersistedSet};
use boxiii_db::repositories::{CreatorRepo, GenerationRepo};
use boxiii_db::StoreError;
use sqlx::PgPool;

/// What the orchestrator needs from storage.
#[async_trait]
pub trait GenerationStore: Send + Sync {
    /// The prompt-relevant slice of a creator, or `None` if it does not exist.
    async fn find_creator_profile(
        &self,
        creator_id: DbId,
    ) -> Result<Option<CreatorProfile>, StoreError>;

    /// Write the set and all of its cards atomically, assigning sequence
    /// numbers inside the same transaction.
    async fn persist_generated_set(
        &self,
        set: &NewGeneratedSet,
    ) -> Result<PersistedSet, StoreError>;
}

/// PostgreSQL-backed store.
#[derive(Clone)]
pub struct PgGenerationStore {
    pool: PgPool,
    max_attempts: u32,
}

impl PgGenerationStore {
    pub fn new(pool: PgPool, max_attempts: u32) -> Self {
        Self { pool, max_attempts }
    }
}

/// Map a creator row to the fields that shape the prompt.
pub fn creator_profile(creator: &Creator) -> CreatorProfile {
    CreatorProfile {
        display_name: creator.display_name.clone(),
        description: creator.description.clone(),
        categories: creator.categories.clone(),
        expertise_areas: creator.expertise_areas.clone(),
        content_style: creator.content_style.clone(),
    }
}

#[async_trait]
impl GenerationStore for PgGenerationStore {
    async fn find_creator_profile(
        &self,
        creator_id: DbId,
    ) -> Result<Option<CreatorProfile>, StoreError> {
        let creator = CreatorRepo::find_by_id(&self.pool, creator_id).await?;
        Ok(creator.as_ref().map(creator_profile))
    }

    async fn persist_generated_set(
        &self,
        set: &NewGeneratedSet,
    ) -> Result<PersistedSet, StoreError> {
        GenerationRepo::persist_generated_set(&self.pool, set, self.max_attempts).await
    }
}
