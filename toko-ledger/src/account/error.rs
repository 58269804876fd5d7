use thiserror::Error;

use crate::primitives::AccountId;

#[derive(Error, Debug)]
pub enum AccountError {
    #[error("AccountError - Sqlx: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("AccountError - NotFound: no account with id {0}")]
    CouldNotFindById(AccountId),
    #[error("AccountError - NotFound: no account with code '{0}'")]
    CouldNotFindByCode(String),
    #[error("AccountError - CodeAlreadyExists: account code '{0}' is taken")]
    CodeAlreadyExists(String),
    #[error("AccountError - ParentNotFound: no account with id {0}")]
    ParentNotFound(AccountId),
}
