use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InventoryError {
    #[error("InventoryError - Sqlx: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("InventoryError - InvalidQuantity: {0} is not a valid movement quantity")]
    InvalidQuantity(Decimal),
    #[error("InventoryError - CostLockTimeout: could not acquire the variant cost lock")]
    CostLockTimeout,
}
