//! Accounting periods gate posting by entry date. A missing period means
//! "open" unless strict mode is on; closing is reversible only through
//! the credential-gated reopen.
pub mod error;
mod repo;

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use chrono::{Months, NaiveDate};
use sqlx::SqlitePool;
use tracing::instrument;

pub use toko_types::period::*;

use crate::primitives::{AccountingPeriodId, PeriodStatus};

use error::*;
use repo::*;

#[derive(Debug, Clone, Default)]
pub(crate) struct PeriodsConfig {
    pub strict_periods: bool,
    pub reopen_credential_hash: Option<String>,
}

/// Service for working with `AccountingPeriod` entities.
#[derive(Clone)]
pub struct Periods {
    repo: AccountingPeriodRepo,
    config: PeriodsConfig,
}

impl Periods {
    pub(crate) fn new(pool: &SqlitePool, config: PeriodsConfig) -> Self {
        Self {
            repo: AccountingPeriodRepo::new(pool),
            config,
        }
    }

    /// Finds the calendar-month period, creating it open when absent.
    /// Concurrent creation of the same month resolves to the winner's row.
    #[instrument(name = "toko_ledger.periods.open_or_create", skip(self))]
    pub async fn open_or_create(
        &self,
        year: i32,
        month: u32,
    ) -> Result<AccountingPeriodValues, PeriodError> {
        let (start_date, end_date) = month_bounds(year, month)?;
        let name = format!("{year}-{month:02}");
        if let Some(existing) = self.repo.find_by_name(&name).await? {
            return Ok(existing);
        }
        if self.repo.overlaps(start_date, end_date).await? {
            return Err(PeriodError::Overlapping { year, month });
        }
        let values = AccountingPeriodValues {
            id: AccountingPeriodId::new(),
            name: name.clone(),
            start_date,
            end_date,
            status: PeriodStatus::Open,
            closed_at: None,
            closed_by: None,
            notes: None,
        };
        match self.repo.create(&values).await {
            Ok(()) => Ok(values),
            Err(PeriodError::NameTaken(_)) => {
                let existing = self.repo.find_by_name(&name).await?;
                existing.ok_or(PeriodError::NameTaken(name))
            }
            Err(e) => Err(e),
        }
    }

    #[instrument(name = "toko_ledger.periods.close", skip(self))]
    pub async fn close(
        &self,
        id: AccountingPeriodId,
        closed_by: &str,
    ) -> Result<AccountingPeriodValues, PeriodError> {
        let transitioned = self
            .repo
            .transition(
                id,
                PeriodStatus::Open,
                PeriodStatus::Closed,
                Some(chrono::Utc::now()),
                Some(closed_by),
            )
            .await?;
        if !transitioned {
            let current = self.repo.find_by_id(id).await?;
            return Err(PeriodError::AlreadyClosed(current.id));
        }
        self.repo.find_by_id(id).await
    }

    /// Reopens a closed period. Only re-enables posting into the range;
    /// nothing already posted is revalidated.
    #[instrument(name = "toko_ledger.periods.reopen", skip(self, credential))]
    pub async fn reopen(
        &self,
        id: AccountingPeriodId,
        credential: &str,
    ) -> Result<AccountingPeriodValues, PeriodError> {
        self.verify_credential(credential)?;
        let transitioned = self
            .repo
            .transition(id, PeriodStatus::Closed, PeriodStatus::Open, None, None)
            .await?;
        if !transitioned {
            let current = self.repo.find_by_id(id).await?;
            return Err(PeriodError::AlreadyOpen(current.id));
        }
        self.repo.find_by_id(id).await
    }

    pub async fn find_by_id(
        &self,
        id: AccountingPeriodId,
    ) -> Result<AccountingPeriodValues, PeriodError> {
        self.repo.find_by_id(id).await
    }

    pub async fn list(&self) -> Result<Vec<AccountingPeriodValues>, PeriodError> {
        self.repo.list().await
    }

    /// The posting gate, evaluated inside the posting transaction so a
    /// close that committed first is always observed.
    pub(crate) async fn assert_open_for_in_tx(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
        date: NaiveDate,
    ) -> Result<(), PeriodError> {
        match self.repo.find_containing_in_tx(tx, date).await? {
            Some(period) if period.is_open() => Ok(()),
            Some(period) => Err(PeriodError::PeriodClosed {
                name: period.name,
                date,
            }),
            None if self.config.strict_periods => Err(PeriodError::NoPeriodForDate(date)),
            None => Ok(()),
        }
    }

    fn verify_credential(&self, credential: &str) -> Result<(), PeriodError> {
        let hash = self
            .config
            .reopen_credential_hash
            .as_deref()
            .ok_or(PeriodError::Unauthorized)?;
        let parsed = PasswordHash::new(hash).map_err(|_| PeriodError::CredentialHashInvalid)?;
        Argon2::default()
            .verify_password(credential.as_bytes(), &parsed)
            .map_err(|_| PeriodError::Unauthorized)
    }
}

fn month_bounds(year: i32, month: u32) -> Result<(NaiveDate, NaiveDate), PeriodError> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or(PeriodError::InvalidDate { year, month })?;
    let end = start
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .ok_or(PeriodError::InvalidDate { year, month })?;
    Ok((start, end))
}
