use std::collections::HashMap;

use rust_decimal::Decimal;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::primitives::{
    AccountId, EventContext, EventType, JournalEntryId, JournalLineId,
};

use super::{entity::*, error::JournalError};

#[derive(sqlx::FromRow)]
struct JournalEntryRow {
    id: JournalEntryId,
    entry_date: chrono::NaiveDate,
    description: String,
    reference_type: String,
    reference_id: uuid::Uuid,
    event_type: EventType,
    event_context: Option<EventContext>,
    total_debit: String,
    total_credit: String,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl From<JournalEntryRow> for JournalEntryValues {
    fn from(row: JournalEntryRow) -> Self {
        JournalEntryValues {
            id: row.id,
            entry_date: row.entry_date,
            description: row.description,
            reference_type: row.reference_type,
            reference_id: row.reference_id,
            event_type: row.event_type,
            event_context: row.event_context,
            total_debit: decimal_col(&row.total_debit),
            total_credit: decimal_col(&row.total_credit),
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct JournalLineRow {
    id: JournalLineId,
    journal_entry_id: JournalEntryId,
    account_id: AccountId,
    debit: String,
    credit: String,
    description: Option<String>,
}

impl From<JournalLineRow> for JournalLineValues {
    fn from(row: JournalLineRow) -> Self {
        JournalLineValues {
            id: row.id,
            journal_entry_id: row.journal_entry_id,
            account_id: row.account_id,
            debit: decimal_col(&row.debit),
            credit: decimal_col(&row.credit),
            description: row.description,
        }
    }
}

fn decimal_col(text: &str) -> Decimal {
    text.parse().expect("corrupt decimal column")
}

const ENTRY_COLUMNS: &str = r#"id, entry_date, description, reference_type, reference_id,
       event_type, event_context, total_debit, total_credit, created_at"#;

const LINE_COLUMNS: &str = "id, journal_entry_id, account_id, debit, credit, description";

#[derive(Debug, Clone)]
pub(super) struct JournalEntryRepo {
    pool: SqlitePool,
}

impl JournalEntryRepo {
    pub fn new(pool: &SqlitePool) -> Self {
        Self { pool: pool.clone() }
    }

    pub async fn create_in_tx(
        &self,
        tx: &mut sqlx::Transaction<'_, Sqlite>,
        entry: &JournalEntryValues,
        lines: &[JournalLineValues],
    ) -> Result<(), JournalError> {
        sqlx::query(
            r#"INSERT INTO toko_journal_entries
               (id, entry_date, description, reference_type, reference_id,
                event_type, event_context, total_debit, total_credit, created_at)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"#,
        )
        .bind(entry.id)
        .bind(entry.entry_date)
        .bind(&entry.description)
        .bind(&entry.reference_type)
        .bind(entry.reference_id)
        .bind(entry.event_type)
        .bind(entry.event_context)
        .bind(entry.total_debit.to_string())
        .bind(entry.total_credit.to_string())
        .bind(entry.created_at)
        .execute(&mut **tx)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db)
                if db.kind() == sqlx::error::ErrorKind::UniqueViolation =>
            {
                JournalError::DuplicateEventKey
            }
            _ => JournalError::Sqlx(e),
        })?;

        let mut query_builder: QueryBuilder<Sqlite> = QueryBuilder::new(
            "INSERT INTO toko_journal_lines (id, journal_entry_id, account_id, debit, credit, description)",
        );
        query_builder.push_values(lines, |mut builder, line| {
            builder.push_bind(line.id);
            builder.push_bind(line.journal_entry_id);
            builder.push_bind(line.account_id);
            builder.push_bind(line.debit.to_string());
            builder.push_bind(line.credit.to_string());
            builder.push_bind(line.description.clone());
        });
        query_builder.build().execute(&mut **tx).await?;
        Ok(())
    }

    pub async fn find_id_by_event_key_in_tx(
        &self,
        tx: &mut sqlx::Transaction<'_, Sqlite>,
        event_type: EventType,
        reference_type: &str,
        reference_id: uuid::Uuid,
        event_context: Option<EventContext>,
    ) -> Result<Option<JournalEntryId>, JournalError> {
        let id = sqlx::query_scalar::<_, JournalEntryId>(
            r#"SELECT id FROM toko_journal_entries
               WHERE event_type = ?1 AND reference_type = ?2 AND reference_id = ?3
                 AND IFNULL(event_context, '') = IFNULL(?4, '')"#,
        )
        .bind(event_type)
        .bind(reference_type)
        .bind(reference_id)
        .bind(event_context)
        .fetch_optional(&mut **tx)
        .await?;
        Ok(id)
    }

    pub async fn find_id_by_reference_in_tx(
        &self,
        tx: &mut sqlx::Transaction<'_, Sqlite>,
        event_type: EventType,
        reference_type: &str,
        reference_id: uuid::Uuid,
    ) -> Result<Option<JournalEntryId>, JournalError> {
        let id = sqlx::query_scalar::<_, JournalEntryId>(
            r#"SELECT id FROM toko_journal_entries
               WHERE event_type = ?1 AND reference_type = ?2 AND reference_id = ?3"#,
        )
        .bind(event_type)
        .bind(reference_type)
        .bind(reference_id)
        .fetch_optional(&mut **tx)
        .await?;
        Ok(id)
    }

    pub async fn find_by_id(&self, id: JournalEntryId) -> Result<PostedEntry, JournalError> {
        let row = sqlx::query_as::<_, JournalEntryRow>(&format!(
            "SELECT {ENTRY_COLUMNS} FROM toko_journal_entries WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        let entry = row
            .map(JournalEntryValues::from)
            .ok_or(JournalError::CouldNotFindById(id))?;
        let mut lines_by_entry = self.fetch_lines(&[entry.id]).await?;
        let lines = lines_by_entry.remove(&entry.id).unwrap_or_default();
        Ok(PostedEntry { entry, lines })
    }

    pub async fn find_by_reference(
        &self,
        reference_type: &str,
        reference_id: uuid::Uuid,
    ) -> Result<Vec<PostedEntry>, JournalError> {
        let rows = sqlx::query_as::<_, JournalEntryRow>(&format!(
            r#"SELECT {ENTRY_COLUMNS} FROM toko_journal_entries
               WHERE reference_type = ?1 AND reference_id = ?2
               ORDER BY created_at DESC"#
        ))
        .bind(reference_type)
        .bind(reference_id)
        .fetch_all(&self.pool)
        .await?;
        self.assemble(rows).await
    }

    pub async fn list_by_range(
        &self,
        from: Option<chrono::NaiveDate>,
        until: Option<chrono::NaiveDate>,
    ) -> Result<Vec<PostedEntry>, JournalError> {
        let rows = sqlx::query_as::<_, JournalEntryRow>(&format!(
            r#"SELECT {ENTRY_COLUMNS} FROM toko_journal_entries
               WHERE (?1 IS NULL OR entry_date >= ?1)
                 AND (?2 IS NULL OR entry_date <= ?2)
               ORDER BY entry_date DESC, created_at DESC"#
        ))
        .bind(from)
        .bind(until)
        .fetch_all(&self.pool)
        .await?;
        self.assemble(rows).await
    }

    async fn assemble(
        &self,
        rows: Vec<JournalEntryRow>,
    ) -> Result<Vec<PostedEntry>, JournalError> {
        let entries: Vec<JournalEntryValues> =
            rows.into_iter().map(JournalEntryValues::from).collect();
        let ids: Vec<JournalEntryId> = entries.iter().map(|e| e.id).collect();
        let mut lines_by_entry = self.fetch_lines(&ids).await?;
        Ok(entries
            .into_iter()
            .map(|entry| {
                let lines = lines_by_entry.remove(&entry.id).unwrap_or_default();
                PostedEntry { entry, lines }
            })
            .collect())
    }

    async fn fetch_lines(
        &self,
        entry_ids: &[JournalEntryId],
    ) -> Result<HashMap<JournalEntryId, Vec<JournalLineValues>>, JournalError> {
        if entry_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let mut query_builder: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
            "SELECT {LINE_COLUMNS} FROM toko_journal_lines WHERE journal_entry_id IN ("
        ));
        let mut separated = query_builder.separated(", ");
        for id in entry_ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(") ORDER BY rowid");
        let rows: Vec<JournalLineRow> = query_builder
            .build_query_as()
            .fetch_all(&self.pool)
            .await?;

        let mut grouped: HashMap<JournalEntryId, Vec<JournalLineValues>> = HashMap::new();
        for row in rows {
            let line = JournalLineValues::from(row);
            grouped.entry(line.journal_entry_id).or_default().push(line);
        }
        Ok(grouped)
    }
}
