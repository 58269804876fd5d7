use rust_decimal::Decimal;
use thiserror::Error;

use crate::{
    mapping::error::MappingError,
    primitives::{AccountId, AmountKey, EventType, JournalEntryId},
};

#[derive(Error, Debug)]
pub enum PostError {
    #[error("PostError - AlreadyPosted: entry {existing} covers this event reference")]
    AlreadyPosted { existing: JournalEntryId },
    #[error("PostError - Mapping: {0}")]
    Mapping(#[from] MappingError),
    #[error("PostError - UnbalancedEntry: debits {total_debit} != credits {total_credit}")]
    UnbalancedEntry {
        total_debit: Decimal,
        total_credit: Decimal,
    },
    #[error("PostError - EmptyEntry: event produces no monetary effect")]
    EmptyEntry,
    #[error("PostError - MissingAmount: event requires the '{0}' amount")]
    MissingAmount(AmountKey),
    #[error("PostError - NegativeAmount: '{key}' amount {amount} is negative")]
    NegativeAmount { key: AmountKey, amount: Decimal },
    #[error("PostError - DiscountExceedsGross: discount {discount} exceeds gross {gross}")]
    DiscountExceedsGross { gross: Decimal, discount: Decimal },
    #[error("PostError - FeeExceedsPaid: fee {fee} exceeds paid {paid}")]
    FeeExceedsPaid { paid: Decimal, fee: Decimal },
    #[error("PostError - MissingStockDetails: {0} requires stock details")]
    MissingStockDetails(EventType),
    #[error("PostError - UnexpectedStockDetails: {0} does not move stock")]
    UnexpectedStockDetails(EventType),
    #[error("PostError - MixedLine: each line must carry exactly one positive side")]
    MixedLine,
    #[error("PostError - UnpostableAccount: account {0} is missing or inactive")]
    UnpostableAccount(AccountId),
    #[error("PostError - CostLockTimeout: variant cost lock not acquired, safe to retry")]
    CostLockTimeout,
    #[error("PostError - ManualJournalViaEvent: manual entries are posted with post_manual_entry")]
    ManualJournalViaEvent,
}
