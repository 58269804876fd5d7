use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::primitives::*;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JournalEntryValues {
    pub id: JournalEntryId,
    pub entry_date: chrono::NaiveDate,
    pub description: String,
    pub reference_type: String,
    pub reference_id: uuid::Uuid,
    pub event_type: EventType,
    pub event_context: Option<EventContext>,
    pub total_debit: Decimal,
    pub total_credit: Decimal,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// One side of one posting. Exactly one of `debit`/`credit` is non-zero.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JournalLineValues {
    pub id: JournalLineId,
    pub journal_entry_id: JournalEntryId,
    pub account_id: AccountId,
    pub debit: Decimal,
    pub credit: Decimal,
    pub description: Option<String>,
}

impl JournalLineValues {
    pub fn side(&self) -> DebitOrCredit {
        if self.debit > Decimal::ZERO {
            DebitOrCredit::Debit
        } else {
            DebitOrCredit::Credit
        }
    }

    pub fn amount(&self) -> Decimal {
        match self.side() {
            DebitOrCredit::Debit => self.debit,
            DebitOrCredit::Credit => self.credit,
        }
    }
}
