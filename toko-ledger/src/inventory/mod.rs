//! Stock movements and the running weighted-average cost per variant.
//! Movements are only ever written from inside a posting transaction;
//! the cost-row lock is what serializes concurrent postings per variant.
mod cost;
pub mod error;
mod repo;

use rust_decimal::Decimal;
use sqlx::SqlitePool;
use tracing::instrument;

pub use toko_types::inventory::*;

use crate::primitives::{MovementType, StockMovementId, VariantId};

pub use cost::CostChange;
use error::*;
use repo::*;

/// One planned stock effect, expressed in event terms.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum StockOp {
    Receive {
        variant_id: VariantId,
        quantity: Decimal,
        total_cost: Decimal,
    },
    Consume {
        variant_id: VariantId,
        quantity: Decimal,
        movement_type: MovementType,
    },
    Restock {
        variant_id: VariantId,
        quantity: Decimal,
    },
    Recount {
        variant_id: VariantId,
        counted: Decimal,
    },
}

impl StockOp {
    pub(crate) fn variant_id(&self) -> VariantId {
        match self {
            StockOp::Receive { variant_id, .. }
            | StockOp::Consume { variant_id, .. }
            | StockOp::Restock { variant_id, .. }
            | StockOp::Recount { variant_id, .. } => *variant_id,
        }
    }
}

/// Service for variant cost state and movement history.
#[derive(Clone)]
pub struct Inventory {
    repo: InventoryRepo,
}

impl Inventory {
    pub(crate) fn new(pool: &SqlitePool) -> Self {
        Self {
            repo: InventoryRepo::new(pool),
        }
    }

    /// Locks the variant's cost row and computes the movement's effect.
    /// Nothing is persisted until [`Self::commit_movement_in_tx`].
    pub(crate) async fn begin_movement_in_tx(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
        op: &StockOp,
    ) -> Result<CostChange, InventoryError> {
        let state = self.repo.lock_cost_in_tx(tx, op.variant_id()).await?;
        match op {
            StockOp::Receive {
                quantity,
                total_cost,
                ..
            } => cost::receive(&state, *quantity, *total_cost),
            StockOp::Consume {
                quantity,
                movement_type,
                ..
            } => cost::consume(&state, *quantity, *movement_type),
            StockOp::Restock { quantity, .. } => cost::restock(&state, *quantity),
            StockOp::Recount { counted, .. } => cost::recount(&state, *counted),
        }
    }

    pub(crate) async fn commit_movement_in_tx(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
        variant_id: VariantId,
        change: &CostChange,
        reference_type: &str,
        reference_id: uuid::Uuid,
        recorded_at: chrono::DateTime<chrono::Utc>,
    ) -> Result<StockMovementValues, InventoryError> {
        let movement = StockMovementValues {
            id: StockMovementId::new(),
            variant_id,
            movement_type: change.movement_type,
            quantity: change.quantity,
            unit_cost: change.unit_cost,
            reference_type: reference_type.to_string(),
            reference_id,
            recorded_at,
        };
        self.repo.insert_movement_in_tx(tx, &movement).await?;
        self.repo
            .update_cost_in_tx(
                tx,
                &VariantCostValues {
                    variant_id,
                    qty_on_hand: change.new_qty_on_hand,
                    unit_cost: change.new_unit_cost,
                    updated_at: recorded_at,
                },
            )
            .await?;
        Ok(movement)
    }

    /// Current cost state; a variant that never moved reads as zeroed.
    #[instrument(name = "toko_ledger.inventory.cost", skip(self), err)]
    pub async fn cost(&self, variant_id: VariantId) -> Result<VariantCostValues, InventoryError> {
        Ok(self
            .repo
            .find_cost(variant_id)
            .await?
            .unwrap_or(VariantCostValues {
                variant_id,
                qty_on_hand: Decimal::ZERO,
                unit_cost: Decimal::ZERO,
                updated_at: chrono::DateTime::UNIX_EPOCH,
            }))
    }

    #[instrument(name = "toko_ledger.inventory.movements", skip(self), err)]
    pub async fn movements(
        &self,
        variant_id: VariantId,
    ) -> Result<Vec<StockMovementValues>, InventoryError> {
        self.repo.movements(variant_id).await
    }
}
