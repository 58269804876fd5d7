use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::primitives::*;

/// One stock delta. `quantity` is signed by movement type: receipts,
/// returns and upward adjustments are positive, outbound movements and
/// downward adjustments negative.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StockMovementValues {
    pub id: StockMovementId,
    pub variant_id: VariantId,
    pub movement_type: MovementType,
    pub quantity: Decimal,
    pub unit_cost: Decimal,
    pub reference_type: String,
    pub reference_id: uuid::Uuid,
    pub recorded_at: chrono::DateTime<chrono::Utc>,
}

/// Running weighted-average cost state for one variant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VariantCostValues {
    pub variant_id: VariantId,
    pub qty_on_hand: Decimal,
    pub unit_cost: Decimal,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl VariantCostValues {
    pub fn total_value(&self) -> Decimal {
        self.qty_on_hand * self.unit_cost
    }
}
