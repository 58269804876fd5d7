use derive_builder::Builder;

pub use toko_types::{mapping::*, primitives::AccountMappingId};

use crate::primitives::*;

/// Representation of a ***new*** mapping rule with a builder. Priority
/// defaults to 0; higher priorities win at resolution time.
#[derive(Builder, Debug, Clone)]
pub struct NewAccountMapping {
    #[builder(setter(into))]
    pub id: AccountMappingId,
    pub(super) event_type: EventType,
    #[builder(setter(strip_option, into), default)]
    pub(super) event_context: Option<EventContext>,
    pub(super) side: DebitOrCredit,
    pub(super) amount_role: AmountRole,
    #[builder(setter(into))]
    pub(super) account_id: AccountId,
    #[builder(default)]
    pub(super) priority: i32,
    #[builder(default = "true")]
    pub(super) active: bool,
}

impl NewAccountMapping {
    pub fn builder() -> NewAccountMappingBuilder {
        NewAccountMappingBuilder::default()
    }

    pub(super) fn into_values(
        self,
        created_at: chrono::DateTime<chrono::Utc>,
    ) -> AccountMappingValues {
        AccountMappingValues {
            id: self.id,
            event_type: self.event_type,
            event_context: self.event_context,
            side: self.side,
            amount_role: self.amount_role,
            account_id: self.account_id,
            priority: self.priority,
            active: self.active,
            created_at,
        }
    }
}
