use thiserror::Error;

use crate::{
    account::error::AccountError, inventory::error::InventoryError, journal::error::JournalError,
    mapping::error::MappingError, period::error::PeriodError, posting::error::PostError,
    report::error::ReportError,
};

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("LedgerError - Sqlx: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("LedgerError - Migrate: {0}")]
    SqlxMigrate(#[from] sqlx::migrate::MigrateError),
    #[error("LedgerError - Config: {0}")]
    ConfigError(String),
    #[error("LedgerError - AccountError: {0}")]
    AccountError(#[from] AccountError),
    #[error("LedgerError - MappingError: {0}")]
    MappingError(#[from] MappingError),
    #[error("LedgerError - PeriodError: {0}")]
    PeriodError(#[from] PeriodError),
    #[error("LedgerError - JournalError: {0}")]
    JournalError(#[from] JournalError),
    #[error("LedgerError - InventoryError: {0}")]
    InventoryError(#[from] InventoryError),
    #[error("LedgerError - PostError: {0}")]
    PostError(#[from] PostError),
    #[error("LedgerError - ReportError: {0}")]
    ReportError(#[from] ReportError),
}
