//! Weighted-average cost arithmetic. Everything here is pure; the
//! surrounding service decides when the results are persisted.
use rust_decimal::Decimal;

use toko_types::inventory::VariantCostValues;

use crate::primitives::MovementType;

use super::error::InventoryError;

/// The computed effect of one stock movement on a variant's cost state.
#[derive(Debug, Clone, PartialEq)]
pub struct CostChange {
    pub movement_type: MovementType,
    /// Signed quantity delta applied to on-hand.
    pub quantity: Decimal,
    /// Unit cost snapshot recorded on the movement.
    pub unit_cost: Decimal,
    /// Signed change in total inventory value.
    pub value_delta: Decimal,
    pub new_qty_on_hand: Decimal,
    pub new_unit_cost: Decimal,
}

/// A receipt folds the received cost into the running average. When
/// nothing (or less than nothing) is on hand the old cost carries no
/// weight and the received unit cost becomes the new average.
pub(super) fn receive(
    state: &VariantCostValues,
    quantity: Decimal,
    total_cost: Decimal,
) -> Result<CostChange, InventoryError> {
    if quantity <= Decimal::ZERO {
        return Err(InventoryError::InvalidQuantity(quantity));
    }
    let received_unit_cost = total_cost / quantity;
    let new_qty_on_hand = state.qty_on_hand + quantity;
    let new_unit_cost = if state.qty_on_hand <= Decimal::ZERO {
        received_unit_cost
    } else {
        (state.qty_on_hand * state.unit_cost + total_cost) / new_qty_on_hand
    };
    Ok(CostChange {
        movement_type: MovementType::In,
        quantity,
        unit_cost: received_unit_cost,
        value_delta: total_cost,
        new_qty_on_hand,
        new_unit_cost,
    })
}

/// Outbound movements consume at the current average; the average
/// itself never moves. On-hand may go negative and is tracked as-is.
pub(super) fn consume(
    state: &VariantCostValues,
    quantity: Decimal,
    movement_type: MovementType,
) -> Result<CostChange, InventoryError> {
    if quantity <= Decimal::ZERO {
        return Err(InventoryError::InvalidQuantity(quantity));
    }
    Ok(CostChange {
        movement_type,
        quantity: -quantity,
        unit_cost: state.unit_cost,
        value_delta: -(quantity * state.unit_cost),
        new_qty_on_hand: state.qty_on_hand - quantity,
        new_unit_cost: state.unit_cost,
    })
}

/// A return restocks at the current average cost.
pub(super) fn restock(
    state: &VariantCostValues,
    quantity: Decimal,
) -> Result<CostChange, InventoryError> {
    if quantity <= Decimal::ZERO {
        return Err(InventoryError::InvalidQuantity(quantity));
    }
    Ok(CostChange {
        movement_type: MovementType::Return,
        quantity,
        unit_cost: state.unit_cost,
        value_delta: quantity * state.unit_cost,
        new_qty_on_hand: state.qty_on_hand + quantity,
        new_unit_cost: state.unit_cost,
    })
}

/// A recount pins on-hand to the counted quantity. The delta (which may
/// be zero; callers decide what that means) is valued at the current
/// average.
pub(super) fn recount(
    state: &VariantCostValues,
    counted: Decimal,
) -> Result<CostChange, InventoryError> {
    if counted < Decimal::ZERO {
        return Err(InventoryError::InvalidQuantity(counted));
    }
    let delta = counted - state.qty_on_hand;
    Ok(CostChange {
        movement_type: MovementType::Adjustment,
        quantity: delta,
        unit_cost: state.unit_cost,
        value_delta: delta * state.unit_cost,
        new_qty_on_hand: counted,
        new_unit_cost: state.unit_cost,
    })
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn state(qty_on_hand: Decimal, unit_cost: Decimal) -> VariantCostValues {
        VariantCostValues {
            variant_id: crate::primitives::VariantId::new(),
            qty_on_hand,
            unit_cost,
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn first_receipt_takes_received_cost() {
        let change = receive(&state(dec!(0), dec!(0)), dec!(10), dec!(1_000_000)).unwrap();
        assert_eq!(change.new_unit_cost, dec!(100_000));
        assert_eq!(change.new_qty_on_hand, dec!(10));
        assert_eq!(change.value_delta, dec!(1_000_000));
    }

    #[test]
    fn receipt_recomputes_weighted_average() {
        // 10 @ 100 on hand, receive 10 @ 200 -> average 150
        let change = receive(&state(dec!(10), dec!(100)), dec!(10), dec!(2000)).unwrap();
        assert_eq!(change.new_unit_cost, dec!(150));
        assert_eq!(change.new_qty_on_hand, dec!(20));
        assert_eq!(change.unit_cost, dec!(200));
    }

    #[test]
    fn receipt_into_negative_stock_resets_the_average() {
        let change = receive(&state(dec!(-3), dec!(80)), dec!(10), dec!(1200)).unwrap();
        assert_eq!(change.new_unit_cost, dec!(120));
        assert_eq!(change.new_qty_on_hand, dec!(7));
    }

    #[test]
    fn consume_keeps_cost_and_values_at_average() {
        let change = consume(&state(dec!(20), dec!(150)), dec!(5), MovementType::Sale).unwrap();
        assert_eq!(change.quantity, dec!(-5));
        assert_eq!(change.value_delta, dec!(-750));
        assert_eq!(change.new_qty_on_hand, dec!(15));
        assert_eq!(change.new_unit_cost, dec!(150));
    }

    #[test]
    fn consume_may_drive_on_hand_negative() {
        let change = consume(&state(dec!(2), dec!(50)), dec!(5), MovementType::Sale).unwrap();
        assert_eq!(change.new_qty_on_hand, dec!(-3));
        assert_eq!(change.new_unit_cost, dec!(50));
    }

    #[test]
    fn restock_uses_current_average() {
        let change = restock(&state(dec!(15), dec!(150)), dec!(2)).unwrap();
        assert_eq!(change.movement_type, MovementType::Return);
        assert_eq!(change.value_delta, dec!(300));
        assert_eq!(change.new_qty_on_hand, dec!(17));
        assert_eq!(change.new_unit_cost, dec!(150));
    }

    #[test]
    fn recount_values_delta_at_current_cost() {
        let gain = recount(&state(dec!(10), dec!(120)), dec!(12)).unwrap();
        assert_eq!(gain.quantity, dec!(2));
        assert_eq!(gain.value_delta, dec!(240));
        assert_eq!(gain.new_qty_on_hand, dec!(12));

        let loss = recount(&state(dec!(10), dec!(120)), dec!(7)).unwrap();
        assert_eq!(loss.quantity, dec!(-3));
        assert_eq!(loss.value_delta, dec!(-360));
    }

    #[test]
    fn recount_to_the_same_quantity_is_a_zero_delta() {
        let change = recount(&state(dec!(10), dec!(120)), dec!(10)).unwrap();
        assert_eq!(change.quantity, dec!(0));
        assert_eq!(change.value_delta, dec!(0));
    }

    #[test]
    fn zero_and_negative_quantities_are_rejected() {
        let s = state(dec!(10), dec!(100));
        assert!(matches!(
            receive(&s, dec!(0), dec!(100)),
            Err(InventoryError::InvalidQuantity(_))
        ));
        assert!(matches!(
            consume(&s, dec!(-1), MovementType::Out),
            Err(InventoryError::InvalidQuantity(_))
        ));
        assert!(matches!(
            restock(&s, dec!(0)),
            Err(InventoryError::InvalidQuantity(_))
        ));
        assert!(matches!(
            recount(&s, dec!(-4)),
            Err(InventoryError::InvalidQuantity(_))
        ));
    }
}
