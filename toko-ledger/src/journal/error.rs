use thiserror::Error;

use crate::primitives::JournalEntryId;

#[derive(Error, Debug)]
pub enum JournalError {
    #[error("JournalError - Sqlx: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("JournalError - NotFound: no journal entry with id {0}")]
    CouldNotFindById(JournalEntryId),
    #[error("JournalError - DuplicateEventKey: an entry for this event reference exists")]
    DuplicateEventKey,
}
