#![allow(dead_code)]
use rand::distr::{Alphanumeric, SampleString};
use rust_decimal::Decimal;

use toko_ledger::{account::*, mapping::*, *};

pub async fn init_pool() -> anyhow::Result<sqlx::SqlitePool> {
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await?;
    Ok(pool)
}

pub async fn init_ledger() -> anyhow::Result<TokoLedger> {
    let pool = init_pool().await?;
    let config = TokoLedgerConfig::builder()
        .pool(pool)
        .exec_migrations(true)
        .build()?;
    Ok(TokoLedger::init(config).await?)
}

pub async fn init_strict_ledger() -> anyhow::Result<TokoLedger> {
    let pool = init_pool().await?;
    let config = TokoLedgerConfig::builder()
        .pool(pool)
        .exec_migrations(true)
        .strict_periods(true)
        .build()?;
    Ok(TokoLedger::init(config).await?)
}

pub async fn init_ledger_with_reopen_hash(hash: String) -> anyhow::Result<TokoLedger> {
    let pool = init_pool().await?;
    let config = TokoLedgerConfig::builder()
        .pool(pool)
        .exec_migrations(true)
        .reopen_credential_hash(hash)
        .build()?;
    Ok(TokoLedger::init(config).await?)
}

/// A file-backed ledger so tests can exercise real connection
/// concurrency; `:memory:` pools are capped at one connection.
pub async fn init_file_ledger() -> anyhow::Result<(TokoLedger, std::path::PathBuf)> {
    let suffix = Alphanumeric.sample_string(&mut rand::rng(), 12);
    let db_path = std::env::temp_dir().join(format!("toko-ledger-test-{suffix}.sqlite"));
    let config = TokoLedgerConfig::builder()
        .db_path(db_path.clone())
        .max_connections(4u32)
        .busy_timeout(std::time::Duration::from_secs(5))
        .exec_migrations(true)
        .build()?;
    Ok((TokoLedger::init(config).await?, db_path))
}

/// The chart of accounts the standard mappings post into.
pub struct Chart {
    pub bank: AccountValues,
    pub marketplace_escrow: AccountValues,
    pub receivable: AccountValues,
    pub inventory: AccountValues,
    pub payable: AccountValues,
    pub capital: AccountValues,
    pub revenue: AccountValues,
    pub opname_gain: AccountValues,
    pub cogs: AccountValues,
    pub platform_fees: AccountValues,
    pub shrinkage: AccountValues,
}

pub async fn standard_chart(ledger: &TokoLedger) -> anyhow::Result<Chart> {
    async fn create(
        ledger: &TokoLedger,
        code: &str,
        name: &str,
        account_type: AccountType,
    ) -> anyhow::Result<AccountValues> {
        Ok(ledger
            .accounts()
            .create(
                NewAccount::builder()
                    .id(AccountId::new())
                    .code(code)
                    .name(name)
                    .account_type(account_type)
                    .build()
                    .unwrap(),
            )
            .await?)
    }

    Ok(Chart {
        bank: create(ledger, "1110", "Bank", AccountType::Asset).await?,
        marketplace_escrow: create(ledger, "1120", "Marketplace Escrow", AccountType::Asset)
            .await?,
        receivable: create(ledger, "1130", "Accounts Receivable", AccountType::Asset).await?,
        inventory: create(ledger, "1140", "Inventory", AccountType::Asset).await?,
        payable: create(ledger, "2110", "Accounts Payable", AccountType::Liability).await?,
        capital: create(ledger, "3110", "Owner Capital", AccountType::Equity).await?,
        revenue: create(ledger, "4110", "Sales Revenue", AccountType::Revenue).await?,
        opname_gain: create(ledger, "4910", "Inventory Count Gain", AccountType::Revenue).await?,
        cogs: create(ledger, "5110", "Cost of Goods Sold", AccountType::Expense).await?,
        platform_fees: create(ledger, "5210", "Platform Fees", AccountType::Expense).await?,
        shrinkage: create(ledger, "5310", "Inventory Shrinkage", AccountType::Expense).await?,
    })
}

pub async fn standard_mappings(ledger: &TokoLedger, chart: &Chart) -> anyhow::Result<()> {
    use toko_ledger::DebitOrCredit::{Credit, Debit};

    let rules = [
        (EventType::ConfirmPurchase, None, Debit, AmountRole::Gross, &chart.inventory),
        (EventType::ConfirmPurchase, None, Credit, AmountRole::Gross, &chart.payable),
        (
            EventType::ConfirmSalesOrder,
            None,
            Debit,
            AmountRole::NetOfDiscount,
            &chart.receivable,
        ),
        (
            EventType::ConfirmSalesOrder,
            None,
            Credit,
            AmountRole::NetOfDiscount,
            &chart.revenue,
        ),
        (EventType::ConfirmSalesOrder, None, Debit, AmountRole::CostOfGoods, &chart.cogs),
        (
            EventType::ConfirmSalesOrder,
            None,
            Credit,
            AmountRole::CostOfGoods,
            &chart.inventory,
        ),
        (EventType::CustomerPayment, None, Debit, AmountRole::SettlementNet, &chart.bank),
        (EventType::CustomerPayment, None, Credit, AmountRole::Paid, &chart.receivable),
        (
            EventType::CustomerPayment,
            Some(EventContext::Marketplace),
            Debit,
            AmountRole::SettlementNet,
            &chart.marketplace_escrow,
        ),
        (
            EventType::CustomerPayment,
            Some(EventContext::Marketplace),
            Debit,
            AmountRole::Fee,
            &chart.platform_fees,
        ),
        (EventType::SupplierPayment, None, Debit, AmountRole::Paid, &chart.payable),
        (EventType::SupplierPayment, None, Credit, AmountRole::Paid, &chart.bank),
        (
            EventType::StockOpname,
            Some(EventContext::Increase),
            Debit,
            AmountRole::CountDelta,
            &chart.inventory,
        ),
        (
            EventType::StockOpname,
            Some(EventContext::Increase),
            Credit,
            AmountRole::CountDelta,
            &chart.opname_gain,
        ),
        (
            EventType::StockOpname,
            Some(EventContext::Decrease),
            Debit,
            AmountRole::CountDelta,
            &chart.shrinkage,
        ),
        (
            EventType::StockOpname,
            Some(EventContext::Decrease),
            Credit,
            AmountRole::CountDelta,
            &chart.inventory,
        ),
        (EventType::SalesReturn, None, Debit, AmountRole::Gross, &chart.revenue),
        (EventType::SalesReturn, None, Credit, AmountRole::Gross, &chart.receivable),
        (EventType::SalesReturn, None, Debit, AmountRole::CostOfGoods, &chart.inventory),
        (EventType::SalesReturn, None, Credit, AmountRole::CostOfGoods, &chart.cogs),
    ];
    for (event_type, event_context, side, amount_role, account) in rules {
        let mut builder = NewAccountMapping::builder();
        builder
            .id(AccountMappingId::new())
            .event_type(event_type)
            .side(side)
            .amount_role(amount_role)
            .account_id(account.id);
        if let Some(context) = event_context {
            builder.event_context(context);
        }
        ledger.mappings().create(builder.build().unwrap()).await?;
    }
    Ok(())
}

/// Chart plus standard mappings in one go.
pub async fn setup_chart(ledger: &TokoLedger) -> anyhow::Result<Chart> {
    let chart = standard_chart(ledger).await?;
    standard_mappings(ledger, &chart).await?;
    Ok(chart)
}

pub fn date(year: i32, month: u32, day: u32) -> chrono::NaiveDate {
    chrono::NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn dec(value: i64) -> Decimal {
    Decimal::from(value)
}
