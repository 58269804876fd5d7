//! Schema migrations for the ledger tables. Run them through
//! [`TokoLedgerConfig::exec_migrations`](crate::TokoLedgerConfig), or
//! merge them into a host application's own migrator when the ledger
//! shares its database.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!();

pub trait IncludeMigrations {
    fn include_toko_ledger_migrations(&mut self) -> &Self;
}

impl IncludeMigrations for sqlx::migrate::Migrator {
    fn include_toko_ledger_migrations(&mut self) -> &Self {
        let mut new_migrations = self.migrations.to_vec();
        new_migrations.extend_from_slice(&MIGRATOR.migrations);

        self.migrations = std::borrow::Cow::Owned(new_migrations);

        self
    }
}
