use serde::{Deserialize, Serialize};

use super::primitives::*;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AccountingPeriodValues {
    pub id: AccountingPeriodId,
    pub name: String,
    pub start_date: chrono::NaiveDate,
    pub end_date: chrono::NaiveDate,
    pub status: PeriodStatus,
    pub closed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub closed_by: Option<String>,
    pub notes: Option<String>,
}

impl AccountingPeriodValues {
    pub fn contains(&self, date: chrono::NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    pub fn is_open(&self) -> bool {
        self.status == PeriodStatus::Open
    }
}
