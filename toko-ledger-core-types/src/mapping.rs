use serde::{Deserialize, Serialize};

use super::primitives::*;

/// One resolution rule: for an event (optionally narrowed by context),
/// the given role on the given side posts to `account_id`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AccountMappingValues {
    pub id: AccountMappingId,
    pub event_type: EventType,
    pub event_context: Option<EventContext>,
    pub side: DebitOrCredit,
    pub amount_role: AmountRole,
    pub account_id: AccountId,
    pub priority: i32,
    pub active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
