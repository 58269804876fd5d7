//! Mapping rules that route event amounts to ledger accounts. The
//! resolver itself is a pure function over the active rows; rows are
//! re-read on every post so configuration changes apply immediately.
mod entity;
pub mod error;
mod repo;
mod resolver;

use sqlx::SqlitePool;
use tracing::instrument;

use crate::primitives::{AccountMappingId, EventContext, EventType};

pub use entity::*;
use error::*;
use repo::*;
pub(crate) use resolver::resolve;
pub use resolver::ResolvedMappings;

/// Service for working with `AccountMapping` rules.
#[derive(Clone)]
pub struct Mappings {
    repo: AccountMappingRepo,
}

impl Mappings {
    pub(crate) fn new(pool: &SqlitePool) -> Self {
        Self {
            repo: AccountMappingRepo::new(pool),
        }
    }

    #[instrument(name = "toko_ledger.mappings.create", skip(self))]
    pub async fn create(
        &self,
        new_mapping: NewAccountMapping,
    ) -> Result<AccountMappingValues, MappingError> {
        let values = new_mapping.into_values(chrono::Utc::now());
        self.repo.create(&values).await?;
        Ok(values)
    }

    pub async fn find_by_id(
        &self,
        id: AccountMappingId,
    ) -> Result<AccountMappingValues, MappingError> {
        self.repo.find_by_id(id).await
    }

    #[instrument(name = "toko_ledger.mappings.list_for_event", skip(self))]
    pub async fn list_for_event(
        &self,
        event_type: EventType,
    ) -> Result<Vec<AccountMappingValues>, MappingError> {
        self.repo.list_for_event(event_type).await
    }

    #[instrument(name = "toko_ledger.mappings.update_priority", skip(self))]
    pub async fn update_priority(
        &self,
        id: AccountMappingId,
        priority: i32,
    ) -> Result<(), MappingError> {
        self.repo.update_priority(id, priority).await
    }

    #[instrument(name = "toko_ledger.mappings.set_active", skip(self))]
    pub async fn set_active(
        &self,
        id: AccountMappingId,
        active: bool,
    ) -> Result<(), MappingError> {
        self.repo.set_active(id, active).await
    }

    #[instrument(name = "toko_ledger.mappings.resolve", skip(self, tx), err)]
    pub(crate) async fn resolve_in_tx(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
        event_type: EventType,
        event_context: Option<EventContext>,
    ) -> Result<ResolvedMappings, MappingError> {
        let rows = self
            .repo
            .list_active_for_event_in_tx(tx, event_type)
            .await?;
        resolve(&rows, event_type, event_context)
    }
}
