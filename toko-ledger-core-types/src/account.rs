use serde::{Deserialize, Serialize};

use super::primitives::*;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AccountValues {
    pub id: AccountId,
    pub code: String,
    pub name: String,
    pub account_type: AccountType,
    pub normal_balance_side: DebitOrCredit,
    pub parent_id: Option<AccountId>,
    pub active: bool,
    pub description: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
