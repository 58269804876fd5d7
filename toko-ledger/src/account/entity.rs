use derive_builder::Builder;

pub use toko_types::{account::*, primitives::AccountId};

use crate::primitives::*;

/// Representation of a ***new*** chart-of-accounts entry with
/// required/optional properties and a builder.
///
/// The normal balance side is always derived from the account type and
/// cannot be set directly.
#[derive(Builder, Debug, Clone)]
pub struct NewAccount {
    #[builder(setter(into))]
    pub id: AccountId,
    #[builder(setter(into))]
    pub(super) code: String,
    #[builder(setter(into))]
    pub(super) name: String,
    pub(super) account_type: AccountType,
    #[builder(setter(strip_option, into), default)]
    pub(super) parent_id: Option<AccountId>,
    #[builder(setter(strip_option, into), default)]
    pub(super) description: Option<String>,
    #[builder(default = "true")]
    pub(super) active: bool,
}

impl NewAccount {
    pub fn builder() -> NewAccountBuilder {
        NewAccountBuilder::default()
    }

    pub(super) fn into_values(self, created_at: chrono::DateTime<chrono::Utc>) -> AccountValues {
        AccountValues {
            id: self.id,
            code: self.code,
            name: self.name,
            account_type: self.account_type,
            normal_balance_side: self.account_type.normal_balance_side(),
            parent_id: self.parent_id,
            active: self.active,
            description: self.description,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_builds() {
        let new_account = NewAccount::builder()
            .id(uuid::Uuid::new_v4())
            .code("1-10001")
            .name("Inventory")
            .account_type(AccountType::Asset)
            .build()
            .unwrap();
        assert_eq!(new_account.code, "1-10001");
        assert_eq!(new_account.name, "Inventory");
        assert!(new_account.active);
        assert_eq!(new_account.description, None);
    }

    #[test]
    fn fails_when_mandatory_fields_are_missing() {
        let new_account = NewAccount::builder().build();
        assert!(new_account.is_err());
    }

    #[test]
    fn normal_side_follows_account_type() {
        let new_account = NewAccount::builder()
            .id(uuid::Uuid::new_v4())
            .code("4-10001")
            .name("Sales revenue")
            .account_type(AccountType::Revenue)
            .build()
            .unwrap();
        let values = new_account.into_values(chrono::Utc::now());
        assert_eq!(values.normal_balance_side, DebitOrCredit::Credit);
    }
}
