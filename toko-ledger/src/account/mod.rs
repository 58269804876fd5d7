//! Chart of accounts. Accounts are flat rows with optional parent
//! links; they are deactivated rather than deleted.
mod entity;
pub mod error;
mod repo;

use sqlx::SqlitePool;
use tracing::instrument;

use crate::primitives::AccountId;

pub use entity::*;
use error::*;
use repo::*;

/// Service for working with `Account` entities.
#[derive(Clone)]
pub struct Accounts {
    repo: AccountRepo,
}

impl Accounts {
    pub(crate) fn new(pool: &SqlitePool) -> Self {
        Self {
            repo: AccountRepo::new(pool),
        }
    }

    #[instrument(name = "toko_ledger.accounts.create", skip(self))]
    pub async fn create(&self, new_account: NewAccount) -> Result<AccountValues, AccountError> {
        if let Some(parent_id) = new_account.parent_id {
            if !self.repo.exists(parent_id).await? {
                return Err(AccountError::ParentNotFound(parent_id));
            }
        }
        let values = new_account.into_values(chrono::Utc::now());
        self.repo.create(&values).await?;
        Ok(values)
    }

    pub async fn find_by_id(&self, id: AccountId) -> Result<AccountValues, AccountError> {
        self.repo.find_by_id(id).await
    }

    pub async fn find_by_code(&self, code: &str) -> Result<AccountValues, AccountError> {
        self.repo.find_by_code(code).await
    }

    #[instrument(name = "toko_ledger.accounts.list", skip(self))]
    pub async fn list(&self) -> Result<Vec<AccountValues>, AccountError> {
        self.repo.list().await
    }

    #[instrument(name = "toko_ledger.accounts.set_active", skip(self))]
    pub async fn set_active(&self, id: AccountId, active: bool) -> Result<(), AccountError> {
        self.repo.set_active(id, active).await
    }

    pub(crate) async fn find_unpostable_in_tx(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
        ids: &[AccountId],
    ) -> Result<Vec<AccountId>, AccountError> {
        self.repo.find_unpostable_in_tx(tx, ids).await
    }
}
