use derive_builder::Builder;

use std::{path::PathBuf, time::Duration};

#[derive(Builder)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct TokoLedgerConfig {
    #[builder(setter(into, strip_option), default)]
    pub(super) db_path: Option<PathBuf>,
    #[builder(setter(into, strip_option), default)]
    pub(super) max_connections: Option<u32>,
    #[builder(setter(into, strip_option), default)]
    pub(super) busy_timeout: Option<Duration>,
    #[builder(default)]
    pub(super) exec_migrations: bool,
    #[builder(setter(into, strip_option), default)]
    pub(super) pool: Option<sqlx::SqlitePool>,
    /// When set, posting to a date with no accounting period is refused
    /// instead of allowed.
    #[builder(default)]
    pub(super) strict_periods: bool,
    /// PHC-format argon2 hash of the credential required to reopen a
    /// closed period.
    #[builder(setter(into, strip_option), default)]
    pub(super) reopen_credential_hash: Option<String>,
}

impl TokoLedgerConfig {
    pub fn builder() -> TokoLedgerConfigBuilder {
        TokoLedgerConfigBuilder::default()
    }
}

impl TokoLedgerConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        match (self.db_path.as_ref(), self.pool.as_ref()) {
            (None, None) | (Some(None), None) | (None, Some(None)) => {
                return Err("One of db_path or pool must be set".to_string())
            }
            (Some(_), Some(_)) => {
                return Err("Only one of db_path or pool must be set".to_string())
            }
            _ => (),
        }
        Ok(())
    }
}
