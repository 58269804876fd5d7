use serde::{Deserialize, Serialize};

crate::entity_id! { AccountId }
crate::entity_id! { AccountMappingId }
crate::entity_id! { AccountingPeriodId }
crate::entity_id! { JournalEntryId }
crate::entity_id! { JournalLineId }
crate::entity_id! { StockMovementId }
crate::entity_id! { VariantId }

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
#[derive(strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum DebitOrCredit {
    Debit,
    Credit,
}

/// Account classification; fixes the normal balance side used by reports.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
#[derive(strum::Display, strum::EnumString, strum::EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum AccountType {
    Asset,
    Liability,
    Equity,
    Revenue,
    Expense,
}

impl AccountType {
    pub fn normal_balance_side(&self) -> DebitOrCredit {
        match self {
            AccountType::Asset | AccountType::Expense => DebitOrCredit::Debit,
            AccountType::Liability | AccountType::Equity | AccountType::Revenue => {
                DebitOrCredit::Credit
            }
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
#[derive(strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum PeriodStatus {
    Open,
    Closed,
}

/// The business events the posting engine understands. Keeping this an
/// enum (rather than a free string) means a new event cannot be added
/// without also giving it a line plan.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
#[derive(strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum EventType {
    ConfirmPurchase,
    ConfirmSalesOrder,
    CustomerPayment,
    SupplierPayment,
    StockOpname,
    SalesReturn,
    ManualJournal,
}

/// Optional qualifier narrowing which mapping rows apply to an event.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
#[derive(strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum EventContext {
    Increase,
    Decrease,
    Cash,
    Bank,
    Manual,
    Marketplace,
}

/// Which amount formula feeds a resolved journal line. The mapping row
/// declares the role; the posting engine owns the arithmetic behind it.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
#[derive(strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum AmountRole {
    Gross,
    NetOfDiscount,
    Paid,
    SettlementNet,
    Fee,
    CostOfGoods,
    CountDelta,
}

/// Keys of the named monetary amounts an event may carry.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
#[derive(strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum AmountKey {
    Gross,
    Discount,
    Paid,
    Fee,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
#[derive(strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum MovementType {
    In,
    Out,
    Adjustment,
    Return,
    Sale,
}

impl MovementType {
    /// Outbound movements consume stock at the current cost.
    pub fn is_outbound(&self) -> bool {
        matches!(self, MovementType::Out | MovementType::Sale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_assets_and_expenses_are_debit_normal() {
        use strum::IntoEnumIterator;
        let debit_normal: Vec<_> = AccountType::iter()
            .filter(|t| t.normal_balance_side() == DebitOrCredit::Debit)
            .collect();
        assert_eq!(debit_normal, [AccountType::Asset, AccountType::Expense]);
    }

    #[test]
    fn event_type_string_round_trip() {
        use std::str::FromStr;
        assert_eq!(EventType::ConfirmPurchase.to_string(), "confirm_purchase");
        assert_eq!(
            EventType::from_str("stock_opname").unwrap(),
            EventType::StockOpname
        );
        assert_eq!(EventContext::Marketplace.to_string(), "marketplace");
    }

    #[test]
    fn serde_uses_snake_case() {
        assert_eq!(
            serde_json::to_string(&EventType::ConfirmSalesOrder).unwrap(),
            "\"confirm_sales_order\""
        );
        assert_eq!(
            serde_json::from_str::<DebitOrCredit>("\"credit\"").unwrap(),
            DebitOrCredit::Credit
        );
    }
}
