pub mod config;
pub mod error;

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::{Sqlite, SqlitePool, Transaction as DbTransaction};
pub use tracing::instrument;

pub use config::*;
pub use error::*;

use crate::{
    account::Accounts,
    inventory::{error::InventoryError, Inventory},
    journal::{JournalEntries, JournalEntryValues, JournalLineValues, PostedEntry},
    mapping::Mappings,
    period::{Periods, PeriodsConfig},
    posting::{
        error::PostError,
        plan::{self, PlannedLine},
        ManualEntry, PostEvent,
    },
    primitives::*,
    report::Reports,
};

/// Entry point for the ledger subsystem. All posting flows through
/// [`post_event`](Self::post_event) or
/// [`post_manual_entry`](Self::post_manual_entry); everything an event
/// touches commits in one transaction or not at all.
#[derive(Clone)]
pub struct TokoLedger {
    pool: SqlitePool,
    accounts: Accounts,
    mappings: Mappings,
    periods: Periods,
    journal: JournalEntries,
    inventory: Inventory,
    reports: Reports,
}

impl TokoLedger {
    pub async fn init(config: TokoLedgerConfig) -> Result<Self, LedgerError> {
        let pool = match (config.pool, config.db_path) {
            (Some(pool), None) => pool,
            (None, Some(db_path)) => {
                let mut conn_opts = sqlx::sqlite::SqliteConnectOptions::new()
                    .filename(&db_path)
                    .create_if_missing(true)
                    .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
                    .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
                    .foreign_keys(true);
                if let Some(busy_timeout) = config.busy_timeout {
                    conn_opts = conn_opts.busy_timeout(busy_timeout);
                }
                let mut pool_opts = sqlx::sqlite::SqlitePoolOptions::new();
                if let Some(max_connections) = config.max_connections {
                    pool_opts = pool_opts.max_connections(max_connections);
                }
                pool_opts.connect_with(conn_opts).await?
            }
            _ => {
                return Err(LedgerError::ConfigError(
                    "One of db_path or pool must be set".to_string(),
                ))
            }
        };
        if config.exec_migrations {
            crate::migrate::MIGRATOR.run(&pool).await?;
        }

        let periods_config = PeriodsConfig {
            strict_periods: config.strict_periods,
            reopen_credential_hash: config.reopen_credential_hash,
        };
        Ok(Self {
            accounts: Accounts::new(&pool),
            mappings: Mappings::new(&pool),
            periods: Periods::new(&pool, periods_config),
            journal: JournalEntries::new(&pool),
            inventory: Inventory::new(&pool),
            reports: Reports::new(&pool),
            pool,
        })
    }

    pub fn accounts(&self) -> &Accounts {
        &self.accounts
    }

    pub fn mappings(&self) -> &Mappings {
        &self.mappings
    }

    pub fn periods(&self) -> &Periods {
        &self.periods
    }

    pub fn journal(&self) -> &JournalEntries {
        &self.journal
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn reports(&self) -> &Reports {
        &self.reports
    }

    pub async fn post_event(&self, event: PostEvent) -> Result<PostedEntry, LedgerError> {
        let tx = self.pool.begin().await?;
        self.post_event_in_tx(tx, event).await
    }

    #[instrument(name = "toko_ledger.post_event", skip(self, tx))]
    pub async fn post_event_in_tx(
        &self,
        mut tx: DbTransaction<'_, Sqlite>,
        event: PostEvent,
    ) -> Result<PostedEntry, LedgerError> {
        if event.event_type == EventType::ManualJournal {
            return Err(PostError::ManualJournalViaEvent.into());
        }
        self.periods
            .assert_open_for_in_tx(&mut tx, event.entry_date)
            .await?;

        let stock_op = plan::stock_op(&event)?;

        if event.event_type == EventType::StockOpname {
            // An opname recomputes its delta from current state, so a
            // repost must be caught before the recount sees the already
            // corrected on-hand quantity. Matching is reference-wide
            // because the stored context was derived from that delta.
            if let Some(existing) = self
                .journal
                .find_id_by_reference_in_tx(
                    &mut tx,
                    event.event_type,
                    &event.reference_type,
                    event.reference_id,
                )
                .await?
            {
                return Err(PostError::AlreadyPosted { existing }.into());
            }
        } else if let Some(existing) = self
            .journal
            .find_id_by_event_key_in_tx(
                &mut tx,
                event.event_type,
                &event.reference_type,
                event.reference_id,
                event.event_context,
            )
            .await?
        {
            return Err(PostError::AlreadyPosted { existing }.into());
        }

        let change = match &stock_op {
            Some(op) => Some(
                self.inventory
                    .begin_movement_in_tx(&mut tx, op)
                    .await
                    .map_err(cost_error)?,
            ),
            None => None,
        };

        let event_context =
            plan::effective_context(event.event_type, event.event_context, change.as_ref())?;
        let resolved = self
            .mappings
            .resolve_in_tx(&mut tx, event.event_type, event_context)
            .await
            .map_err(PostError::from)?;
        let lines = plan::build_lines(&event, &resolved, change.as_ref())?;

        let posted = self
            .persist_entry_in_tx(
                &mut tx,
                EntryHeader {
                    entry_date: event.entry_date,
                    description: event.description,
                    reference_type: event.reference_type,
                    reference_id: event.reference_id,
                    event_type: event.event_type,
                    event_context,
                },
                lines,
            )
            .await?;

        if let (Some(op), Some(change)) = (&stock_op, &change) {
            self.inventory
                .commit_movement_in_tx(
                    &mut tx,
                    op.variant_id(),
                    change,
                    &posted.entry.reference_type,
                    posted.entry.reference_id,
                    posted.entry.created_at,
                )
                .await
                .map_err(cost_error)?;
        }

        tx.commit().await?;
        Ok(posted)
    }

    pub async fn post_manual_entry(&self, entry: ManualEntry) -> Result<PostedEntry, LedgerError> {
        let tx = self.pool.begin().await?;
        self.post_manual_entry_in_tx(tx, entry).await
    }

    #[instrument(name = "toko_ledger.post_manual_entry", skip(self, tx))]
    pub async fn post_manual_entry_in_tx(
        &self,
        mut tx: DbTransaction<'_, Sqlite>,
        manual: ManualEntry,
    ) -> Result<PostedEntry, LedgerError> {
        self.periods
            .assert_open_for_in_tx(&mut tx, manual.entry_date)
            .await?;

        if let Some(existing) = self
            .journal
            .find_id_by_event_key_in_tx(
                &mut tx,
                EventType::ManualJournal,
                &manual.reference_type,
                manual.reference_id,
                manual.event_context,
            )
            .await?
        {
            return Err(PostError::AlreadyPosted { existing }.into());
        }

        let lines = plan::manual_lines(&manual.lines)?;
        let posted = self
            .persist_entry_in_tx(
                &mut tx,
                EntryHeader {
                    entry_date: manual.entry_date,
                    description: manual.description,
                    reference_type: manual.reference_type,
                    reference_id: manual.reference_id,
                    event_type: EventType::ManualJournal,
                    event_context: manual.event_context,
                },
                lines,
            )
            .await?;

        tx.commit().await?;
        Ok(posted)
    }

    /// Balance-checks the planned lines, verifies the accounts are
    /// postable and writes entry plus lines. The duplicate-key race
    /// against a concurrent commit surfaces here as `AlreadyPosted`.
    async fn persist_entry_in_tx(
        &self,
        tx: &mut DbTransaction<'_, Sqlite>,
        header: EntryHeader,
        lines: Vec<PlannedLine>,
    ) -> Result<PostedEntry, LedgerError> {
        let (total_debit, total_credit) = plan::validate_lines(&lines)?;

        let mut account_ids: Vec<AccountId> = lines.iter().map(|l| l.account_id).collect();
        account_ids.sort_unstable();
        account_ids.dedup();
        let unpostable = self
            .accounts
            .find_unpostable_in_tx(tx, &account_ids)
            .await?;
        if let Some(account_id) = unpostable.first() {
            return Err(PostError::UnpostableAccount(*account_id).into());
        }

        let entry = JournalEntryValues {
            id: JournalEntryId::new(),
            entry_date: header.entry_date,
            description: header.description,
            reference_type: header.reference_type,
            reference_id: header.reference_id,
            event_type: header.event_type,
            event_context: header.event_context,
            total_debit,
            total_credit,
            created_at: Utc::now(),
        };
        let lines: Vec<JournalLineValues> = lines
            .into_iter()
            .map(|planned| {
                let (debit, credit) = match planned.side {
                    DebitOrCredit::Debit => (planned.amount, Decimal::ZERO),
                    DebitOrCredit::Credit => (Decimal::ZERO, planned.amount),
                };
                JournalLineValues {
                    id: JournalLineId::new(),
                    journal_entry_id: entry.id,
                    account_id: planned.account_id,
                    debit,
                    credit,
                    description: planned.description,
                }
            })
            .collect();

        use crate::journal::error::JournalError;
        match self.journal.create_in_tx(tx, &entry, &lines).await {
            Ok(()) => Ok(PostedEntry { entry, lines }),
            Err(JournalError::DuplicateEventKey) => {
                let existing = match self
                    .journal
                    .find_id_by_event_key_in_tx(
                        tx,
                        entry.event_type,
                        &entry.reference_type,
                        entry.reference_id,
                        entry.event_context,
                    )
                    .await?
                {
                    Some(id) => id,
                    None => self
                        .journal
                        .find_id_by_reference_in_tx(
                            tx,
                            entry.event_type,
                            &entry.reference_type,
                            entry.reference_id,
                        )
                        .await?
                        .ok_or(JournalError::DuplicateEventKey)?,
                };
                Err(PostError::AlreadyPosted { existing }.into())
            }
            Err(e) => Err(e.into()),
        }
    }
}

struct EntryHeader {
    entry_date: chrono::NaiveDate,
    description: String,
    reference_type: String,
    reference_id: uuid::Uuid,
    event_type: EventType,
    event_context: Option<EventContext>,
}

fn cost_error(err: InventoryError) -> LedgerError {
    match err {
        InventoryError::CostLockTimeout => LedgerError::PostError(PostError::CostLockTimeout),
        other => LedgerError::InventoryError(other),
    }
}
