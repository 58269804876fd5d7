use std::collections::HashMap;

use derive_builder::Builder;
use rust_decimal::Decimal;

use crate::primitives::*;

use super::error::PostError;

/// The named monetary amounts an event carries. Unset keys read as
/// absent; line plans decide which keys are required.
#[derive(Debug, Clone, Default)]
pub struct EventAmounts(HashMap<AmountKey, Decimal>);

impl EventAmounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: AmountKey, amount: Decimal) -> Self {
        self.0.insert(key, amount);
        self
    }

    pub fn set(&mut self, key: AmountKey, amount: Decimal) {
        self.0.insert(key, amount);
    }

    pub(crate) fn get_or_zero(&self, key: AmountKey) -> Decimal {
        self.0.get(&key).copied().unwrap_or(Decimal::ZERO)
    }

    pub(crate) fn require(&self, key: AmountKey) -> Result<Decimal, PostError> {
        self.0
            .get(&key)
            .copied()
            .ok_or(PostError::MissingAmount(key))
    }

    pub(crate) fn validate_non_negative(&self) -> Result<(), PostError> {
        for (key, amount) in &self.0 {
            if *amount < Decimal::ZERO {
                return Err(PostError::NegativeAmount {
                    key: *key,
                    amount: *amount,
                });
            }
        }
        Ok(())
    }
}

/// Stock side of an event. For [`EventType::StockOpname`] the quantity
/// is the freshly counted on-hand; for every other stock event it is
/// the moved quantity.
#[derive(Debug, Clone, PartialEq)]
pub struct StockDetails {
    pub variant_id: VariantId,
    pub quantity: Decimal,
}

impl StockDetails {
    pub fn new(variant_id: impl Into<VariantId>, quantity: Decimal) -> Self {
        Self {
            variant_id: variant_id.into(),
            quantity,
        }
    }
}

/// Representation of a ***new*** business event to be posted, with a
/// builder. The reference (type + id) is the idempotency anchor: one
/// entry per (event type, reference, context).
#[derive(Builder, Debug, Clone)]
pub struct PostEvent {
    pub(crate) event_type: EventType,
    #[builder(setter(strip_option), default)]
    pub(crate) event_context: Option<EventContext>,
    pub(crate) entry_date: chrono::NaiveDate,
    #[builder(setter(into))]
    pub(crate) description: String,
    #[builder(setter(into))]
    pub(crate) reference_type: String,
    #[builder(setter(into))]
    pub(crate) reference_id: uuid::Uuid,
    #[builder(default)]
    pub(crate) amounts: EventAmounts,
    #[builder(setter(strip_option), default)]
    pub(crate) stock: Option<StockDetails>,
}

impl PostEvent {
    pub fn builder() -> PostEventBuilder {
        PostEventBuilder::default()
    }
}

/// One caller-supplied line of a manual journal entry.
#[derive(Debug, Clone, PartialEq)]
pub struct ManualLine {
    pub account_id: AccountId,
    pub debit: Decimal,
    pub credit: Decimal,
    pub description: Option<String>,
}

impl ManualLine {
    pub fn debit(account_id: impl Into<AccountId>, amount: Decimal) -> Self {
        Self {
            account_id: account_id.into(),
            debit: amount,
            credit: Decimal::ZERO,
            description: None,
        }
    }

    pub fn credit(account_id: impl Into<AccountId>, amount: Decimal) -> Self {
        Self {
            account_id: account_id.into(),
            debit: Decimal::ZERO,
            credit: amount,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Representation of a ***new*** manual journal entry with explicit
/// lines, with a builder.
#[derive(Builder, Debug, Clone)]
pub struct ManualEntry {
    pub(crate) entry_date: chrono::NaiveDate,
    #[builder(setter(into))]
    pub(crate) description: String,
    #[builder(setter(into))]
    pub(crate) reference_type: String,
    #[builder(setter(into))]
    pub(crate) reference_id: uuid::Uuid,
    #[builder(setter(strip_option), default)]
    pub(crate) event_context: Option<EventContext>,
    #[builder(setter(each(name = "line")), default)]
    pub(crate) lines: Vec<ManualLine>,
}

impl ManualEntry {
    pub fn builder() -> ManualEntryBuilder {
        ManualEntryBuilder::default()
    }
}
