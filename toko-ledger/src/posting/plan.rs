//! Per-event line plans. Which (side, amount role) pairs an event posts
//! is fixed here at compile time; which accounts they land on comes from
//! the mapping table at post time.
use rust_decimal::Decimal;

use crate::{
    inventory::{CostChange, StockOp},
    mapping::ResolvedMappings,
    primitives::*,
};

use super::{error::PostError, event::*};

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PlannedLine {
    pub account_id: AccountId,
    pub side: DebitOrCredit,
    pub amount: Decimal,
    pub description: Option<String>,
}

/// The stock movement an event implies, if any.
pub(crate) fn stock_op(event: &PostEvent) -> Result<Option<StockOp>, PostError> {
    let op = match event.event_type {
        EventType::ConfirmPurchase => {
            let stock = require_stock(event)?;
            Some(StockOp::Receive {
                variant_id: stock.variant_id,
                quantity: stock.quantity,
                total_cost: event.amounts.require(AmountKey::Gross)?,
            })
        }
        EventType::ConfirmSalesOrder => {
            let stock = require_stock(event)?;
            Some(StockOp::Consume {
                variant_id: stock.variant_id,
                quantity: stock.quantity,
                movement_type: MovementType::Sale,
            })
        }
        EventType::SalesReturn => {
            let stock = require_stock(event)?;
            Some(StockOp::Restock {
                variant_id: stock.variant_id,
                quantity: stock.quantity,
            })
        }
        EventType::StockOpname => {
            let stock = require_stock(event)?;
            Some(StockOp::Recount {
                variant_id: stock.variant_id,
                counted: stock.quantity,
            })
        }
        EventType::CustomerPayment | EventType::SupplierPayment => {
            if event.stock.is_some() {
                return Err(PostError::UnexpectedStockDetails(event.event_type));
            }
            None
        }
        EventType::ManualJournal => return Err(PostError::ManualJournalViaEvent),
    };
    Ok(op)
}

fn require_stock(event: &PostEvent) -> Result<&StockDetails, PostError> {
    event
        .stock
        .as_ref()
        .ok_or(PostError::MissingStockDetails(event.event_type))
}

/// The context resolution and idempotency actually key on. Opname
/// derives it from the count delta; everything else takes the caller's.
pub(crate) fn effective_context(
    event_type: EventType,
    caller_context: Option<EventContext>,
    change: Option<&CostChange>,
) -> Result<Option<EventContext>, PostError> {
    if event_type != EventType::StockOpname {
        return Ok(caller_context);
    }
    let change = change.ok_or(PostError::MissingStockDetails(event_type))?;
    if change.quantity > Decimal::ZERO {
        Ok(Some(EventContext::Increase))
    } else if change.quantity < Decimal::ZERO {
        Ok(Some(EventContext::Decrease))
    } else {
        Err(PostError::EmptyEntry)
    }
}

pub(crate) fn build_lines(
    event: &PostEvent,
    resolved: &ResolvedMappings,
    change: Option<&CostChange>,
) -> Result<Vec<PlannedLine>, PostError> {
    event.amounts.validate_non_negative()?;
    let cost_value = change
        .map(|c| c.value_delta.abs())
        .unwrap_or(Decimal::ZERO);

    let mut lines = Vec::new();
    match event.event_type {
        EventType::ConfirmPurchase => {
            let gross = event.amounts.require(AmountKey::Gross)?;
            pair(&mut lines, resolved, AmountRole::Gross, gross)?;
        }
        EventType::ConfirmSalesOrder => {
            let gross = event.amounts.require(AmountKey::Gross)?;
            let discount = event.amounts.get_or_zero(AmountKey::Discount);
            if discount > gross {
                return Err(PostError::DiscountExceedsGross { gross, discount });
            }
            pair(&mut lines, resolved, AmountRole::NetOfDiscount, gross - discount)?;
            pair(&mut lines, resolved, AmountRole::CostOfGoods, cost_value)?;
        }
        EventType::CustomerPayment => {
            let paid = event.amounts.require(AmountKey::Paid)?;
            let fee = event.amounts.get_or_zero(AmountKey::Fee);
            if fee > paid {
                return Err(PostError::FeeExceedsPaid { paid, fee });
            }
            let settlement = paid - fee;
            if settlement > Decimal::ZERO {
                lines.push(line(
                    resolved.require(DebitOrCredit::Debit, AmountRole::SettlementNet)?,
                    DebitOrCredit::Debit,
                    settlement,
                ));
            }
            if fee > Decimal::ZERO {
                lines.push(line(
                    resolved.require(DebitOrCredit::Debit, AmountRole::Fee)?,
                    DebitOrCredit::Debit,
                    fee,
                ));
            }
            if paid > Decimal::ZERO {
                lines.push(line(
                    resolved.require(DebitOrCredit::Credit, AmountRole::Paid)?,
                    DebitOrCredit::Credit,
                    paid,
                ));
            }
        }
        EventType::SupplierPayment => {
            let paid = event.amounts.require(AmountKey::Paid)?;
            pair(&mut lines, resolved, AmountRole::Paid, paid)?;
        }
        EventType::StockOpname => {
            pair(&mut lines, resolved, AmountRole::CountDelta, cost_value)?;
        }
        EventType::SalesReturn => {
            let gross = event.amounts.require(AmountKey::Gross)?;
            pair(&mut lines, resolved, AmountRole::Gross, gross)?;
            pair(&mut lines, resolved, AmountRole::CostOfGoods, cost_value)?;
        }
        EventType::ManualJournal => return Err(PostError::ManualJournalViaEvent),
    }
    Ok(lines)
}

/// Caller lines of a manual entry, checked for one-sidedness.
pub(crate) fn manual_lines(lines: &[ManualLine]) -> Result<Vec<PlannedLine>, PostError> {
    lines
        .iter()
        .map(|l| {
            let debit_set = l.debit > Decimal::ZERO;
            let credit_set = l.credit > Decimal::ZERO;
            if l.debit < Decimal::ZERO || l.credit < Decimal::ZERO || debit_set == credit_set {
                return Err(PostError::MixedLine);
            }
            let (side, amount) = if debit_set {
                (DebitOrCredit::Debit, l.debit)
            } else {
                (DebitOrCredit::Credit, l.credit)
            };
            Ok(PlannedLine {
                account_id: l.account_id,
                side,
                amount,
                description: l.description.clone(),
            })
        })
        .collect()
}

/// Final gate before persistence: at least one line and exact balance.
pub(crate) fn validate_lines(lines: &[PlannedLine]) -> Result<(Decimal, Decimal), PostError> {
    if lines.is_empty() {
        return Err(PostError::EmptyEntry);
    }
    let mut total_debit = Decimal::ZERO;
    let mut total_credit = Decimal::ZERO;
    for planned in lines {
        match planned.side {
            DebitOrCredit::Debit => total_debit += planned.amount,
            DebitOrCredit::Credit => total_credit += planned.amount,
        }
    }
    if total_debit != total_credit {
        return Err(PostError::UnbalancedEntry {
            total_debit,
            total_credit,
        });
    }
    Ok((total_debit, total_credit))
}

fn line(account_id: AccountId, side: DebitOrCredit, amount: Decimal) -> PlannedLine {
    PlannedLine {
        account_id,
        side,
        amount,
        description: None,
    }
}

/// A matched debit/credit pair of one role. Zero-amount pairs are
/// skipped so mappings for roles an event does not exercise stay
/// optional.
fn pair(
    lines: &mut Vec<PlannedLine>,
    resolved: &ResolvedMappings,
    role: AmountRole,
    amount: Decimal,
) -> Result<(), PostError> {
    if amount == Decimal::ZERO {
        return Ok(());
    }
    lines.push(line(
        resolved.require(DebitOrCredit::Debit, role)?,
        DebitOrCredit::Debit,
        amount,
    ));
    lines.push(line(
        resolved.require(DebitOrCredit::Credit, role)?,
        DebitOrCredit::Credit,
        amount,
    ));
    Ok(())
}
