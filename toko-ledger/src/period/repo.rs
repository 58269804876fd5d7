use sqlx::SqlitePool;

use toko_types::period::AccountingPeriodValues;

use crate::primitives::{AccountingPeriodId, PeriodStatus};

use super::error::PeriodError;

#[derive(sqlx::FromRow)]
struct PeriodRow {
    id: AccountingPeriodId,
    name: String,
    start_date: chrono::NaiveDate,
    end_date: chrono::NaiveDate,
    status: PeriodStatus,
    closed_at: Option<chrono::DateTime<chrono::Utc>>,
    closed_by: Option<String>,
    notes: Option<String>,
}

impl From<PeriodRow> for AccountingPeriodValues {
    fn from(row: PeriodRow) -> Self {
        AccountingPeriodValues {
            id: row.id,
            name: row.name,
            start_date: row.start_date,
            end_date: row.end_date,
            status: row.status,
            closed_at: row.closed_at,
            closed_by: row.closed_by,
            notes: row.notes,
        }
    }
}

const SELECT_COLUMNS: &str =
    "id, name, start_date, end_date, status, closed_at, closed_by, notes";

#[derive(Debug, Clone)]
pub(super) struct AccountingPeriodRepo {
    pool: SqlitePool,
}

impl AccountingPeriodRepo {
    pub fn new(pool: &SqlitePool) -> Self {
        Self { pool: pool.clone() }
    }

    pub async fn create(&self, values: &AccountingPeriodValues) -> Result<(), PeriodError> {
        sqlx::query(
            r#"INSERT INTO toko_accounting_periods
               (id, name, start_date, end_date, status, closed_at, closed_by, notes)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"#,
        )
        .bind(values.id)
        .bind(&values.name)
        .bind(values.start_date)
        .bind(values.end_date)
        .bind(values.status)
        .bind(values.closed_at)
        .bind(&values.closed_by)
        .bind(&values.notes)
        .execute(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db)
                if db.kind() == sqlx::error::ErrorKind::UniqueViolation =>
            {
                PeriodError::NameTaken(values.name.clone())
            }
            _ => PeriodError::Sqlx(e),
        })?;
        Ok(())
    }

    pub async fn find_by_id(
        &self,
        id: AccountingPeriodId,
    ) -> Result<AccountingPeriodValues, PeriodError> {
        let row = sqlx::query_as::<_, PeriodRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM toko_accounting_periods WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(AccountingPeriodValues::from)
            .ok_or(PeriodError::CouldNotFindById(id))
    }

    pub async fn find_by_name(
        &self,
        name: &str,
    ) -> Result<Option<AccountingPeriodValues>, PeriodError> {
        let row = sqlx::query_as::<_, PeriodRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM toko_accounting_periods WHERE name = ?1"
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(AccountingPeriodValues::from))
    }

    pub async fn find_containing_in_tx(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
        date: chrono::NaiveDate,
    ) -> Result<Option<AccountingPeriodValues>, PeriodError> {
        let row = sqlx::query_as::<_, PeriodRow>(&format!(
            r#"SELECT {SELECT_COLUMNS} FROM toko_accounting_periods
               WHERE start_date <= ?1 AND end_date >= ?1"#
        ))
        .bind(date)
        .fetch_optional(&mut **tx)
        .await?;
        Ok(row.map(AccountingPeriodValues::from))
    }

    pub async fn overlaps(
        &self,
        start_date: chrono::NaiveDate,
        end_date: chrono::NaiveDate,
    ) -> Result<bool, PeriodError> {
        let found: Option<i64> = sqlx::query_scalar(
            r#"SELECT 1 FROM toko_accounting_periods
               WHERE start_date <= ?2 AND end_date >= ?1"#,
        )
        .bind(start_date)
        .bind(end_date)
        .fetch_optional(&self.pool)
        .await?;
        Ok(found.is_some())
    }

    pub async fn list(&self) -> Result<Vec<AccountingPeriodValues>, PeriodError> {
        let rows = sqlx::query_as::<_, PeriodRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM toko_accounting_periods ORDER BY start_date DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(AccountingPeriodValues::from).collect())
    }

    /// Returns false when the period was not in the expected state.
    pub async fn transition(
        &self,
        id: AccountingPeriodId,
        from: PeriodStatus,
        to: PeriodStatus,
        closed_at: Option<chrono::DateTime<chrono::Utc>>,
        closed_by: Option<&str>,
    ) -> Result<bool, PeriodError> {
        let result = sqlx::query(
            r#"UPDATE toko_accounting_periods
               SET status = ?3, closed_at = ?4, closed_by = ?5
               WHERE id = ?1 AND status = ?2"#,
        )
        .bind(id)
        .bind(from)
        .bind(to)
        .bind(closed_at)
        .bind(closed_by)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
