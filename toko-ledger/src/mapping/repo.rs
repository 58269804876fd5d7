use sqlx::SqlitePool;

use crate::primitives::{AccountId, AccountMappingId, AmountRole, DebitOrCredit, EventContext, EventType};

use super::{entity::*, error::MappingError};

#[derive(sqlx::FromRow)]
struct AccountMappingRow {
    id: AccountMappingId,
    event_type: EventType,
    event_context: Option<EventContext>,
    side: DebitOrCredit,
    amount_role: AmountRole,
    account_id: AccountId,
    priority: i32,
    active: bool,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl From<AccountMappingRow> for AccountMappingValues {
    fn from(row: AccountMappingRow) -> Self {
        AccountMappingValues {
            id: row.id,
            event_type: row.event_type,
            event_context: row.event_context,
            side: row.side,
            amount_role: row.amount_role,
            account_id: row.account_id,
            priority: row.priority,
            active: row.active,
            created_at: row.created_at,
        }
    }
}

const SELECT_COLUMNS: &str =
    "id, event_type, event_context, side, amount_role, account_id, priority, active, created_at";

#[derive(Debug, Clone)]
pub(super) struct AccountMappingRepo {
    pool: SqlitePool,
}

impl AccountMappingRepo {
    pub fn new(pool: &SqlitePool) -> Self {
        Self { pool: pool.clone() }
    }

    pub async fn create(&self, values: &AccountMappingValues) -> Result<(), MappingError> {
        sqlx::query(
            r#"INSERT INTO toko_account_mappings
               (id, event_type, event_context, side, amount_role, account_id, priority, active, created_at)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"#,
        )
        .bind(values.id)
        .bind(values.event_type)
        .bind(values.event_context)
        .bind(values.side)
        .bind(values.amount_role)
        .bind(values.account_id)
        .bind(values.priority)
        .bind(values.active)
        .bind(values.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn find_by_id(
        &self,
        id: AccountMappingId,
    ) -> Result<AccountMappingValues, MappingError> {
        let row = sqlx::query_as::<_, AccountMappingRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM toko_account_mappings WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(AccountMappingValues::from)
            .ok_or(MappingError::CouldNotFindById(id))
    }

    pub async fn list_for_event(
        &self,
        event_type: EventType,
    ) -> Result<Vec<AccountMappingValues>, MappingError> {
        let rows = sqlx::query_as::<_, AccountMappingRow>(&format!(
            r#"SELECT {SELECT_COLUMNS} FROM toko_account_mappings
               WHERE event_type = ?1
               ORDER BY priority DESC, created_at"#
        ))
        .bind(event_type)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(AccountMappingValues::from).collect())
    }

    /// Active rows for one event, read inside the posting transaction so
    /// resolution always sees the latest committed configuration.
    pub async fn list_active_for_event_in_tx(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
        event_type: EventType,
    ) -> Result<Vec<AccountMappingValues>, MappingError> {
        let rows = sqlx::query_as::<_, AccountMappingRow>(&format!(
            r#"SELECT {SELECT_COLUMNS} FROM toko_account_mappings
               WHERE event_type = ?1 AND active = 1"#
        ))
        .bind(event_type)
        .fetch_all(&mut **tx)
        .await?;
        Ok(rows.into_iter().map(AccountMappingValues::from).collect())
    }

    pub async fn update_priority(
        &self,
        id: AccountMappingId,
        priority: i32,
    ) -> Result<(), MappingError> {
        let result =
            sqlx::query("UPDATE toko_account_mappings SET priority = ?2 WHERE id = ?1")
                .bind(id)
                .bind(priority)
                .execute(&self.pool)
                .await?;
        if result.rows_affected() == 0 {
            return Err(MappingError::CouldNotFindById(id));
        }
        Ok(())
    }

    pub async fn set_active(
        &self,
        id: AccountMappingId,
        active: bool,
    ) -> Result<(), MappingError> {
        let result = sqlx::query("UPDATE toko_account_mappings SET active = ?2 WHERE id = ?1")
            .bind(id)
            .bind(active)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(MappingError::CouldNotFindById(id));
        }
        Ok(())
    }
}
