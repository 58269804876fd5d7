use serde::{Deserialize, Serialize};

pub use toko_types::{
    journal::*,
    primitives::{JournalEntryId, JournalLineId},
};

/// A persisted journal entry together with its lines.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PostedEntry {
    pub entry: JournalEntryValues,
    pub lines: Vec<JournalLineValues>,
}

impl PostedEntry {
    pub fn id(&self) -> JournalEntryId {
        self.entry.id
    }
}
