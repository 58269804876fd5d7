use thiserror::Error;

use crate::primitives::AccountingPeriodId;

#[derive(Error, Debug)]
pub enum PeriodError {
    #[error("PeriodError - Sqlx: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("PeriodError - NotFound: no period with id {0}")]
    CouldNotFindById(AccountingPeriodId),
    #[error("PeriodError - PeriodClosed: period '{name}' is closed for {date}")]
    PeriodClosed {
        name: String,
        date: chrono::NaiveDate,
    },
    #[error("PeriodError - NoPeriodForDate: no period covers {0} (strict mode)")]
    NoPeriodForDate(chrono::NaiveDate),
    #[error("PeriodError - AlreadyClosed: period {0} is already closed")]
    AlreadyClosed(AccountingPeriodId),
    #[error("PeriodError - AlreadyOpen: period {0} is already open")]
    AlreadyOpen(AccountingPeriodId),
    #[error("PeriodError - Unauthorized: reopen credential rejected")]
    Unauthorized,
    #[error("PeriodError - CredentialHashInvalid: configured reopen hash is not a PHC string")]
    CredentialHashInvalid,
    #[error("PeriodError - Overlapping: {year}-{month:02} overlaps an existing period")]
    Overlapping { year: i32, month: u32 },
    #[error("PeriodError - InvalidDate: {year}-{month:02} is not a calendar month")]
    InvalidDate { year: i32, month: u32 },
    #[error("PeriodError - NameTaken: period '{0}' already exists")]
    NameTaken(String),
}
