use chrono::NaiveDate;
use sqlx::SqlitePool;

use crate::primitives::{AccountId, AccountType};

/// One posted line with the account columns the reports group by.
/// Amounts stay TEXT here; the service parses and folds them.
#[derive(sqlx::FromRow)]
pub(super) struct PostedLineRow {
    pub account_id: AccountId,
    pub code: String,
    pub name: String,
    pub account_type: AccountType,
    pub debit: String,
    pub credit: String,
}

#[derive(Debug, Clone)]
pub(super) struct ReportRepo {
    pool: SqlitePool,
}

impl ReportRepo {
    pub fn new(pool: &SqlitePool) -> Self {
        Self { pool: pool.clone() }
    }

    pub async fn posted_lines(
        &self,
        from: Option<NaiveDate>,
        until: Option<NaiveDate>,
    ) -> Result<Vec<PostedLineRow>, sqlx::Error> {
        sqlx::query_as::<_, PostedLineRow>(
            r#"SELECT a.id AS account_id, a.code, a.name, a.account_type, l.debit, l.credit
               FROM toko_journal_lines l
               JOIN toko_journal_entries e ON e.id = l.journal_entry_id
               JOIN toko_accounts a ON a.id = l.account_id
               WHERE (?1 IS NULL OR e.entry_date >= ?1)
                 AND (?2 IS NULL OR e.entry_date <= ?2)"#,
        )
        .bind(from)
        .bind(until)
        .fetch_all(&self.pool)
        .await
    }
}
