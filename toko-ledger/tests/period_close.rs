mod helpers;

use toko_ledger::{journal::PostedEntry, period::error::PeriodError, posting::*, *};

fn hash_credential(credential: &str) -> String {
    use argon2::{
        password_hash::{rand_core::OsRng, SaltString},
        Argon2, PasswordHasher,
    };
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(credential.as_bytes(), &salt)
        .unwrap()
        .to_string()
}

async fn post_capital(
    ledger: &TokoLedger,
    chart: &helpers::Chart,
    entry_date: chrono::NaiveDate,
) -> Result<PostedEntry, LedgerError> {
    let entry = ManualEntry::builder()
        .entry_date(entry_date)
        .description("Owner top-up")
        .reference_type("manual")
        .reference_id(uuid::Uuid::new_v4())
        .line(ManualLine::debit(chart.bank.id, helpers::dec(100_000)))
        .line(ManualLine::credit(chart.capital.id, helpers::dec(100_000)))
        .build()
        .unwrap();
    ledger.post_manual_entry(entry).await
}

#[tokio::test]
async fn closed_period_blocks_posting_into_its_range() -> anyhow::Result<()> {
    let ledger = helpers::init_ledger().await?;
    let chart = helpers::standard_chart(&ledger).await?;

    let period = ledger.periods().open_or_create(2025, 3).await?;
    assert_eq!(period.name, "2025-03");
    assert_eq!(period.start_date, helpers::date(2025, 3, 1));
    assert_eq!(period.end_date, helpers::date(2025, 3, 31));

    post_capital(&ledger, &chart, helpers::date(2025, 3, 15)).await?;

    let closed = ledger.periods().close(period.id, "owner").await?;
    assert_eq!(closed.status, PeriodStatus::Closed);
    assert_eq!(closed.closed_by.as_deref(), Some("owner"));
    assert!(closed.closed_at.is_some());

    let err = post_capital(&ledger, &chart, helpers::date(2025, 3, 20))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        LedgerError::PeriodError(PeriodError::PeriodClosed { .. })
    ));

    // April has no period row, which reads as open outside strict mode.
    post_capital(&ledger, &chart, helpers::date(2025, 4, 2)).await?;

    Ok(())
}

#[tokio::test]
async fn closing_twice_is_rejected() -> anyhow::Result<()> {
    let ledger = helpers::init_ledger().await?;

    let period = ledger.periods().open_or_create(2025, 3).await?;
    ledger.periods().close(period.id, "owner").await?;
    let err = ledger.periods().close(period.id, "owner").await.unwrap_err();
    match err {
        PeriodError::AlreadyClosed(id) => assert_eq!(id, period.id),
        other => panic!("unexpected error: {other}"),
    }

    Ok(())
}

#[tokio::test]
async fn open_or_create_returns_the_existing_month() -> anyhow::Result<()> {
    let ledger = helpers::init_ledger().await?;

    let first = ledger.periods().open_or_create(2025, 3).await?;
    let second = ledger.periods().open_or_create(2025, 3).await?;
    assert_eq!(first.id, second.id);

    // Closing does not change what open_or_create resolves to.
    ledger.periods().close(first.id, "owner").await?;
    let third = ledger.periods().open_or_create(2025, 3).await?;
    assert_eq!(third.id, first.id);
    assert_eq!(third.status, PeriodStatus::Closed);

    assert_eq!(ledger.periods().list().await?.len(), 1);

    Ok(())
}

#[tokio::test]
async fn reopen_requires_the_configured_credential() -> anyhow::Result<()> {
    let ledger = helpers::init_ledger_with_reopen_hash(hash_credential("rahasia")).await?;
    let chart = helpers::standard_chart(&ledger).await?;

    let period = ledger.periods().open_or_create(2025, 3).await?;
    ledger.periods().close(period.id, "owner").await?;

    let err = ledger.periods().reopen(period.id, "salah").await.unwrap_err();
    assert!(matches!(err, PeriodError::Unauthorized));
    let still_closed = ledger.periods().find_by_id(period.id).await?;
    assert_eq!(still_closed.status, PeriodStatus::Closed);

    let reopened = ledger.periods().reopen(period.id, "rahasia").await?;
    assert_eq!(reopened.status, PeriodStatus::Open);
    post_capital(&ledger, &chart, helpers::date(2025, 3, 20)).await?;

    let err = ledger
        .periods()
        .reopen(period.id, "rahasia")
        .await
        .unwrap_err();
    assert!(matches!(err, PeriodError::AlreadyOpen(_)));

    Ok(())
}

#[tokio::test]
async fn reopen_without_a_configured_hash_is_refused() -> anyhow::Result<()> {
    let ledger = helpers::init_ledger().await?;

    let period = ledger.periods().open_or_create(2025, 3).await?;
    ledger.periods().close(period.id, "owner").await?;
    let err = ledger
        .periods()
        .reopen(period.id, "anything")
        .await
        .unwrap_err();
    assert!(matches!(err, PeriodError::Unauthorized));

    Ok(())
}

#[tokio::test]
async fn strict_mode_requires_a_covering_period() -> anyhow::Result<()> {
    let ledger = helpers::init_strict_ledger().await?;
    let chart = helpers::standard_chart(&ledger).await?;

    let err = post_capital(&ledger, &chart, helpers::date(2025, 5, 15))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        LedgerError::PeriodError(PeriodError::NoPeriodForDate(_))
    ));

    ledger.periods().open_or_create(2025, 5).await?;
    post_capital(&ledger, &chart, helpers::date(2025, 5, 15)).await?;

    Ok(())
}
