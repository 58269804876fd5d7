use sqlx::SqlitePool;

use crate::primitives::{AccountId, AccountType, DebitOrCredit};

use super::{entity::*, error::AccountError};

#[derive(sqlx::FromRow)]
struct AccountRow {
    id: AccountId,
    code: String,
    name: String,
    account_type: AccountType,
    normal_balance_side: DebitOrCredit,
    parent_id: Option<AccountId>,
    active: bool,
    description: Option<String>,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl From<AccountRow> for AccountValues {
    fn from(row: AccountRow) -> Self {
        AccountValues {
            id: row.id,
            code: row.code,
            name: row.name,
            account_type: row.account_type,
            normal_balance_side: row.normal_balance_side,
            parent_id: row.parent_id,
            active: row.active,
            description: row.description,
            created_at: row.created_at,
        }
    }
}

const SELECT_COLUMNS: &str = r#"id, code, name, account_type, normal_balance_side,
       parent_id, active, description, created_at"#;

#[derive(Debug, Clone)]
pub(super) struct AccountRepo {
    pool: SqlitePool,
}

impl AccountRepo {
    pub fn new(pool: &SqlitePool) -> Self {
        Self { pool: pool.clone() }
    }

    pub async fn create(&self, values: &AccountValues) -> Result<(), AccountError> {
        sqlx::query(
            r#"INSERT INTO toko_accounts
               (id, code, name, account_type, normal_balance_side, parent_id, active, description, created_at)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"#,
        )
        .bind(values.id)
        .bind(&values.code)
        .bind(&values.name)
        .bind(values.account_type)
        .bind(values.normal_balance_side)
        .bind(values.parent_id)
        .bind(values.active)
        .bind(&values.description)
        .bind(values.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db)
                if db.kind() == sqlx::error::ErrorKind::UniqueViolation =>
            {
                AccountError::CodeAlreadyExists(values.code.clone())
            }
            _ => AccountError::Sqlx(e),
        })?;
        Ok(())
    }

    pub async fn find_by_id(&self, id: AccountId) -> Result<AccountValues, AccountError> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM toko_accounts WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(AccountValues::from)
            .ok_or(AccountError::CouldNotFindById(id))
    }

    pub async fn find_by_code(&self, code: &str) -> Result<AccountValues, AccountError> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM toko_accounts WHERE code = ?1"
        ))
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;
        row.map(AccountValues::from)
            .ok_or_else(|| AccountError::CouldNotFindByCode(code.to_string()))
    }

    pub async fn list(&self) -> Result<Vec<AccountValues>, AccountError> {
        let rows = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM toko_accounts ORDER BY code"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(AccountValues::from).collect())
    }

    pub async fn exists(&self, id: AccountId) -> Result<bool, AccountError> {
        let found: Option<i64> =
            sqlx::query_scalar("SELECT 1 FROM toko_accounts WHERE id = ?1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(found.is_some())
    }

    pub async fn set_active(&self, id: AccountId, active: bool) -> Result<(), AccountError> {
        let result = sqlx::query("UPDATE toko_accounts SET active = ?2 WHERE id = ?1")
            .bind(id)
            .bind(active)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AccountError::CouldNotFindById(id));
        }
        Ok(())
    }

    /// Returns the subset of `ids` that is missing or inactive.
    pub async fn find_unpostable_in_tx(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
        ids: &[AccountId],
    ) -> Result<Vec<AccountId>, AccountError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut query_builder =
            sqlx::QueryBuilder::new("SELECT id, active FROM toko_accounts WHERE id IN (");
        let mut separated = query_builder.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");
        let rows: Vec<(AccountId, bool)> = query_builder
            .build_query_as()
            .fetch_all(&mut **tx)
            .await?;

        let mut unpostable: Vec<AccountId> = ids
            .iter()
            .filter(|id| !rows.iter().any(|(found, _)| found == *id))
            .copied()
            .collect();
        unpostable.extend(
            rows.iter()
                .filter(|(_, active)| !active)
                .map(|(id, _)| *id),
        );
        Ok(unpostable)
    }
}
