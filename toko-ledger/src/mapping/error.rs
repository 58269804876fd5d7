use thiserror::Error;

use crate::primitives::{AccountMappingId, AmountRole, DebitOrCredit, EventType};

#[derive(Error, Debug)]
pub enum MappingError {
    #[error("MappingError - Sqlx: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("MappingError - NotFound: no mapping with id {0}")]
    CouldNotFindById(AccountMappingId),
    #[error(
        "MappingError - NotFound: no active mapping for {event_type} {side}/{amount_role}"
    )]
    NotFound {
        event_type: EventType,
        side: DebitOrCredit,
        amount_role: AmountRole,
    },
    #[error(
        "MappingError - Ambiguous: {count} mappings for {event_type} {side}/{amount_role} share top priority {priority}"
    )]
    Ambiguous {
        event_type: EventType,
        side: DebitOrCredit,
        amount_role: AmountRole,
        priority: i32,
        count: usize,
    },
}
