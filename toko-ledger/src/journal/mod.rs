//! Journal entry and line persistence. Writes only ever happen inside
//! the posting transaction; everything here is append-only after commit.
mod entity;
pub mod error;
mod repo;

use sqlx::SqlitePool;
use tracing::instrument;

use crate::primitives::{EventContext, EventType, JournalEntryId};

pub use entity::*;
use error::*;
use repo::*;

/// Service for reading posted journal entries.
#[derive(Clone)]
pub struct JournalEntries {
    repo: JournalEntryRepo,
}

impl JournalEntries {
    pub(crate) fn new(pool: &SqlitePool) -> Self {
        Self {
            repo: JournalEntryRepo::new(pool),
        }
    }

    pub async fn find_by_id(&self, id: JournalEntryId) -> Result<PostedEntry, JournalError> {
        self.repo.find_by_id(id).await
    }

    #[instrument(name = "toko_ledger.journal.find_by_reference", skip(self), err)]
    pub async fn find_by_reference(
        &self,
        reference_type: &str,
        reference_id: uuid::Uuid,
    ) -> Result<Vec<PostedEntry>, JournalError> {
        self.repo.find_by_reference(reference_type, reference_id).await
    }

    #[instrument(name = "toko_ledger.journal.list_by_range", skip(self), err)]
    pub async fn list_by_range(
        &self,
        from: Option<chrono::NaiveDate>,
        until: Option<chrono::NaiveDate>,
    ) -> Result<Vec<PostedEntry>, JournalError> {
        self.repo.list_by_range(from, until).await
    }

    pub(crate) async fn create_in_tx(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
        entry: &JournalEntryValues,
        lines: &[JournalLineValues],
    ) -> Result<(), JournalError> {
        self.repo.create_in_tx(tx, entry, lines).await
    }

    pub(crate) async fn find_id_by_event_key_in_tx(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
        event_type: EventType,
        reference_type: &str,
        reference_id: uuid::Uuid,
        event_context: Option<EventContext>,
    ) -> Result<Option<JournalEntryId>, JournalError> {
        self.repo
            .find_id_by_event_key_in_tx(tx, event_type, reference_type, reference_id, event_context)
            .await
    }

    pub(crate) async fn find_id_by_reference_in_tx(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
        event_type: EventType,
        reference_type: &str,
        reference_id: uuid::Uuid,
    ) -> Result<Option<JournalEntryId>, JournalError> {
        self.repo
            .find_id_by_reference_in_tx(tx, event_type, reference_type, reference_id)
            .await
    }
}
