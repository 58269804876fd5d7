use rust_decimal::Decimal;
use sqlx::{Sqlite, SqlitePool};

use toko_types::inventory::{StockMovementValues, VariantCostValues};

use crate::primitives::{MovementType, StockMovementId, VariantId};

use super::error::InventoryError;

#[derive(sqlx::FromRow)]
struct VariantCostRow {
    variant_id: VariantId,
    qty_on_hand: String,
    unit_cost: String,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<VariantCostRow> for VariantCostValues {
    fn from(row: VariantCostRow) -> Self {
        VariantCostValues {
            variant_id: row.variant_id,
            qty_on_hand: decimal_col(&row.qty_on_hand),
            unit_cost: decimal_col(&row.unit_cost),
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct StockMovementRow {
    id: StockMovementId,
    variant_id: VariantId,
    movement_type: MovementType,
    quantity: String,
    unit_cost: String,
    reference_type: String,
    reference_id: uuid::Uuid,
    recorded_at: chrono::DateTime<chrono::Utc>,
}

impl From<StockMovementRow> for StockMovementValues {
    fn from(row: StockMovementRow) -> Self {
        StockMovementValues {
            id: row.id,
            variant_id: row.variant_id,
            movement_type: row.movement_type,
            quantity: decimal_col(&row.quantity),
            unit_cost: decimal_col(&row.unit_cost),
            reference_type: row.reference_type,
            reference_id: row.reference_id,
            recorded_at: row.recorded_at,
        }
    }
}

fn decimal_col(text: &str) -> Decimal {
    text.parse().expect("corrupt decimal column")
}

fn is_busy(err: &sqlx::Error) -> bool {
    match err {
        // 5 = SQLITE_BUSY, 261 = SQLITE_BUSY_RECOVERY, 517 = SQLITE_BUSY_SNAPSHOT
        sqlx::Error::Database(db) => {
            matches!(db.code().as_deref(), Some("5") | Some("261") | Some("517"))
        }
        _ => false,
    }
}

#[derive(Debug, Clone)]
pub(super) struct InventoryRepo {
    pool: SqlitePool,
}

impl InventoryRepo {
    pub fn new(pool: &SqlitePool) -> Self {
        Self { pool: pool.clone() }
    }

    /// Upserts the cost row before reading it back, which acquires the
    /// database writer lock for the rest of the transaction. A writer
    /// whose snapshot lost the race cannot upgrade and reports a lock
    /// timeout instead.
    pub async fn lock_cost_in_tx(
        &self,
        tx: &mut sqlx::Transaction<'_, Sqlite>,
        variant_id: VariantId,
    ) -> Result<VariantCostValues, InventoryError> {
        sqlx::query(
            r#"INSERT INTO toko_variant_costs (variant_id, qty_on_hand, unit_cost, updated_at)
               VALUES (?1, '0', '0', ?2)
               ON CONFLICT(variant_id) DO UPDATE SET updated_at = updated_at"#,
        )
        .bind(variant_id)
        .bind(chrono::Utc::now())
        .execute(&mut **tx)
        .await
        .map_err(|e| {
            if is_busy(&e) {
                InventoryError::CostLockTimeout
            } else {
                InventoryError::Sqlx(e)
            }
        })?;

        let row = sqlx::query_as::<_, VariantCostRow>(
            r#"SELECT variant_id, qty_on_hand, unit_cost, updated_at
               FROM toko_variant_costs WHERE variant_id = ?1"#,
        )
        .bind(variant_id)
        .fetch_one(&mut **tx)
        .await?;
        Ok(VariantCostValues::from(row))
    }

    pub async fn update_cost_in_tx(
        &self,
        tx: &mut sqlx::Transaction<'_, Sqlite>,
        values: &VariantCostValues,
    ) -> Result<(), InventoryError> {
        sqlx::query(
            r#"UPDATE toko_variant_costs
               SET qty_on_hand = ?2, unit_cost = ?3, updated_at = ?4
               WHERE variant_id = ?1"#,
        )
        .bind(values.variant_id)
        .bind(values.qty_on_hand.to_string())
        .bind(values.unit_cost.to_string())
        .bind(values.updated_at)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    pub async fn insert_movement_in_tx(
        &self,
        tx: &mut sqlx::Transaction<'_, Sqlite>,
        movement: &StockMovementValues,
    ) -> Result<(), InventoryError> {
        sqlx::query(
            r#"INSERT INTO toko_stock_movements
               (id, variant_id, movement_type, quantity, unit_cost,
                reference_type, reference_id, recorded_at)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"#,
        )
        .bind(movement.id)
        .bind(movement.variant_id)
        .bind(movement.movement_type)
        .bind(movement.quantity.to_string())
        .bind(movement.unit_cost.to_string())
        .bind(&movement.reference_type)
        .bind(movement.reference_id)
        .bind(movement.recorded_at)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    pub async fn find_cost(
        &self,
        variant_id: VariantId,
    ) -> Result<Option<VariantCostValues>, InventoryError> {
        let row = sqlx::query_as::<_, VariantCostRow>(
            r#"SELECT variant_id, qty_on_hand, unit_cost, updated_at
               FROM toko_variant_costs WHERE variant_id = ?1"#,
        )
        .bind(variant_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(VariantCostValues::from))
    }

    pub async fn movements(
        &self,
        variant_id: VariantId,
    ) -> Result<Vec<StockMovementValues>, InventoryError> {
        let rows = sqlx::query_as::<_, StockMovementRow>(
            r#"SELECT id, variant_id, movement_type, quantity, unit_cost,
                      reference_type, reference_id, recorded_at
               FROM toko_stock_movements
               WHERE variant_id = ?1
               ORDER BY rowid"#,
        )
        .bind(variant_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(StockMovementValues::from).collect())
    }
}
