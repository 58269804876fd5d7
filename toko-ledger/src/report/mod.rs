//! Read-side aggregation over posted journal lines. Totals are folded
//! in Rust with `Decimal` arithmetic; the TEXT-stored amounts are never
//! summed in SQL.
pub mod error;
mod repo;

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::instrument;

use crate::primitives::*;

use error::ReportError;
use repo::{PostedLineRow, ReportRepo};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrialBalanceRow {
    pub account_id: AccountId,
    pub code: String,
    pub name: String,
    pub account_type: AccountType,
    pub total_debit: Decimal,
    pub total_credit: Decimal,
    /// Net balance, positive on the account's normal side.
    pub balance: Decimal,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrialBalance {
    pub from: Option<NaiveDate>,
    pub until: Option<NaiveDate>,
    pub rows: Vec<TrialBalanceRow>,
    pub total_debit: Decimal,
    pub total_credit: Decimal,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IncomeStatementRow {
    pub account_id: AccountId,
    pub code: String,
    pub name: String,
    /// Natural-side magnitude; negative when contra activity dominates.
    pub amount: Decimal,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IncomeStatement {
    pub from: Option<NaiveDate>,
    pub until: Option<NaiveDate>,
    pub revenue: Vec<IncomeStatementRow>,
    pub expenses: Vec<IncomeStatementRow>,
    pub total_revenue: Decimal,
    pub total_expenses: Decimal,
    pub net_income: Decimal,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BalanceSheetRow {
    pub account_id: AccountId,
    pub code: String,
    pub name: String,
    pub balance: Decimal,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BalanceSheet {
    pub as_of: NaiveDate,
    pub assets: Vec<BalanceSheetRow>,
    pub liabilities: Vec<BalanceSheetRow>,
    pub equity: Vec<BalanceSheetRow>,
    /// Revenue minus expense over all entries up to `as_of`. Derived at
    /// read time; income accounts are never closed into equity.
    pub retained_earnings: Decimal,
    pub total_assets: Decimal,
    pub total_liabilities: Decimal,
    pub total_equity: Decimal,
}

struct AccountTotals {
    account_id: AccountId,
    name: String,
    account_type: AccountType,
    debit: Decimal,
    credit: Decimal,
}

impl AccountTotals {
    fn natural_balance(&self) -> Decimal {
        match self.account_type.normal_balance_side() {
            DebitOrCredit::Debit => self.debit - self.credit,
            DebitOrCredit::Credit => self.credit - self.debit,
        }
    }
}

/// Read-only report service over the journal.
#[derive(Clone)]
pub struct Reports {
    repo: ReportRepo,
}

impl Reports {
    pub(crate) fn new(pool: &SqlitePool) -> Self {
        Self {
            repo: ReportRepo::new(pool),
        }
    }

    #[instrument(name = "toko_ledger.reports.trial_balance", skip(self), err)]
    pub async fn trial_balance(
        &self,
        from: Option<NaiveDate>,
        until: Option<NaiveDate>,
    ) -> Result<TrialBalance, ReportError> {
        let accounts = self.totals_by_code(from, until).await?;
        let mut total_debit = Decimal::ZERO;
        let mut total_credit = Decimal::ZERO;
        let rows = accounts
            .into_iter()
            .map(|(code, totals)| {
                total_debit += totals.debit;
                total_credit += totals.credit;
                let balance = totals.natural_balance();
                TrialBalanceRow {
                    account_id: totals.account_id,
                    code,
                    name: totals.name,
                    account_type: totals.account_type,
                    total_debit: totals.debit,
                    total_credit: totals.credit,
                    balance,
                }
            })
            .collect();
        Ok(TrialBalance {
            from,
            until,
            rows,
            total_debit,
            total_credit,
        })
    }

    #[instrument(name = "toko_ledger.reports.income_statement", skip(self), err)]
    pub async fn income_statement(
        &self,
        from: Option<NaiveDate>,
        until: Option<NaiveDate>,
    ) -> Result<IncomeStatement, ReportError> {
        let accounts = self.totals_by_code(from, until).await?;
        let mut revenue = Vec::new();
        let mut expenses = Vec::new();
        let mut total_revenue = Decimal::ZERO;
        let mut total_expenses = Decimal::ZERO;
        for (code, totals) in accounts {
            let amount = totals.natural_balance();
            let row = IncomeStatementRow {
                account_id: totals.account_id,
                code,
                name: totals.name,
                amount,
            };
            match totals.account_type {
                AccountType::Revenue => {
                    total_revenue += row.amount;
                    revenue.push(row);
                }
                AccountType::Expense => {
                    total_expenses += row.amount;
                    expenses.push(row);
                }
                _ => {}
            }
        }
        Ok(IncomeStatement {
            from,
            until,
            revenue,
            expenses,
            total_revenue,
            total_expenses,
            net_income: total_revenue - total_expenses,
        })
    }

    #[instrument(name = "toko_ledger.reports.balance_sheet", skip(self), err)]
    pub async fn balance_sheet(&self, as_of: NaiveDate) -> Result<BalanceSheet, ReportError> {
        let accounts = self.totals_by_code(None, Some(as_of)).await?;
        let mut assets = Vec::new();
        let mut liabilities = Vec::new();
        let mut equity = Vec::new();
        let mut total_assets = Decimal::ZERO;
        let mut total_liabilities = Decimal::ZERO;
        let mut total_equity = Decimal::ZERO;
        let mut retained_earnings = Decimal::ZERO;
        for (code, totals) in accounts {
            let balance = totals.natural_balance();
            let section = match totals.account_type {
                AccountType::Asset => {
                    total_assets += balance;
                    &mut assets
                }
                AccountType::Liability => {
                    total_liabilities += balance;
                    &mut liabilities
                }
                AccountType::Equity => {
                    total_equity += balance;
                    &mut equity
                }
                AccountType::Revenue => {
                    retained_earnings += balance;
                    continue;
                }
                AccountType::Expense => {
                    retained_earnings -= balance;
                    continue;
                }
            };
            section.push(BalanceSheetRow {
                account_id: totals.account_id,
                code,
                name: totals.name,
                balance,
            });
        }
        total_equity += retained_earnings;
        Ok(BalanceSheet {
            as_of,
            assets,
            liabilities,
            equity,
            retained_earnings,
            total_assets,
            total_liabilities,
            total_equity,
        })
    }

    async fn totals_by_code(
        &self,
        from: Option<NaiveDate>,
        until: Option<NaiveDate>,
    ) -> Result<BTreeMap<String, AccountTotals>, ReportError> {
        let lines = self.repo.posted_lines(from, until).await?;
        let mut accounts: BTreeMap<String, AccountTotals> = BTreeMap::new();
        for line in lines {
            let PostedLineRow {
                account_id,
                code,
                name,
                account_type,
                debit,
                credit,
            } = line;
            let totals = accounts.entry(code).or_insert_with(|| AccountTotals {
                account_id,
                name,
                account_type,
                debit: Decimal::ZERO,
                credit: Decimal::ZERO,
            });
            totals.debit += decimal_col(&debit);
            totals.credit += decimal_col(&credit);
        }
        Ok(accounts)
    }
}

fn decimal_col(text: &str) -> Decimal {
    text.parse().expect("corrupt decimal column")
}
