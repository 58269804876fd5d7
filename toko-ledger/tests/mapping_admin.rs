mod helpers;

use toko_ledger::{
    account::NewAccount,
    mapping::{error::MappingError, NewAccountMapping},
    posting::{error::PostError, *},
    *,
};

fn supplier_payment(amount: i64) -> PostEvent {
    PostEvent::builder()
        .event_type(EventType::SupplierPayment)
        .entry_date(helpers::date(2025, 3, 18))
        .description("supplier installment")
        .reference_type("payment")
        .reference_id(uuid::Uuid::new_v4())
        .amounts(EventAmounts::new().with(AmountKey::Paid, helpers::dec(amount)))
        .build()
        .unwrap()
}

fn marketplace_payout(paid: i64, fee: i64) -> PostEvent {
    PostEvent::builder()
        .event_type(EventType::CustomerPayment)
        .event_context(EventContext::Marketplace)
        .entry_date(helpers::date(2025, 3, 14))
        .description("marketplace payout")
        .reference_type("payment")
        .reference_id(uuid::Uuid::new_v4())
        .amounts(
            EventAmounts::new()
                .with(AmountKey::Paid, helpers::dec(paid))
                .with(AmountKey::Fee, helpers::dec(fee)),
        )
        .build()
        .unwrap()
}

#[tokio::test]
async fn a_higher_priority_rule_takes_over() -> anyhow::Result<()> {
    let ledger = helpers::init_ledger().await?;
    let chart = helpers::setup_chart(&ledger).await?;

    let posted = ledger.post_event(supplier_payment(100_000)).await?;
    assert_eq!(posted.lines[1].account_id, chart.bank.id);

    let petty_cash = ledger
        .accounts()
        .create(
            NewAccount::builder()
                .id(AccountId::new())
                .code("1115")
                .name("Petty Cash")
                .account_type(AccountType::Asset)
                .build()
                .unwrap(),
        )
        .await?;
    let rule = ledger
        .mappings()
        .create(
            NewAccountMapping::builder()
                .id(AccountMappingId::new())
                .event_type(EventType::SupplierPayment)
                .side(DebitOrCredit::Credit)
                .amount_role(AmountRole::Paid)
                .account_id(petty_cash.id)
                .priority(5)
                .build()
                .unwrap(),
        )
        .await?;
    assert_eq!(ledger.mappings().find_by_id(rule.id).await?.priority, 5);

    // Rules are re-read per posting, so the override applies immediately.
    let posted = ledger.post_event(supplier_payment(50_000)).await?;
    assert_eq!(posted.lines[1].account_id, petty_cash.id);

    Ok(())
}

#[tokio::test]
async fn an_equal_priority_tie_fails_the_post() -> anyhow::Result<()> {
    let ledger = helpers::init_ledger().await?;
    let chart = helpers::setup_chart(&ledger).await?;

    // Same (event, side, role) at the same priority as the standard rule.
    ledger
        .mappings()
        .create(
            NewAccountMapping::builder()
                .id(AccountMappingId::new())
                .event_type(EventType::SupplierPayment)
                .side(DebitOrCredit::Credit)
                .amount_role(AmountRole::Paid)
                .account_id(chart.opname_gain.id)
                .build()
                .unwrap(),
        )
        .await?;

    let err = ledger.post_event(supplier_payment(100_000)).await.unwrap_err();
    assert!(matches!(
        err,
        LedgerError::PostError(PostError::Mapping(MappingError::Ambiguous { .. }))
    ));
    assert!(ledger.journal().list_by_range(None, None).await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn deactivating_the_contextual_rule_falls_back_to_the_default() -> anyhow::Result<()> {
    let ledger = helpers::init_ledger().await?;
    let chart = helpers::setup_chart(&ledger).await?;

    let posted = ledger.post_event(marketplace_payout(450_000, 13_500)).await?;
    assert_eq!(posted.lines[0].account_id, chart.marketplace_escrow.id);

    let escrow_rule = ledger
        .mappings()
        .list_for_event(EventType::CustomerPayment)
        .await?
        .into_iter()
        .find(|rule| {
            rule.event_context == Some(EventContext::Marketplace)
                && rule.side == DebitOrCredit::Debit
                && rule.amount_role == AmountRole::SettlementNet
        })
        .unwrap();
    ledger.mappings().set_active(escrow_rule.id, false).await?;

    let posted = ledger.post_event(marketplace_payout(200_000, 6_000)).await?;
    assert_eq!(posted.lines[0].account_id, chart.bank.id);
    assert_eq!(posted.lines[1].account_id, chart.platform_fees.id);

    ledger.mappings().set_active(escrow_rule.id, true).await?;
    let posted = ledger.post_event(marketplace_payout(300_000, 9_000)).await?;
    assert_eq!(posted.lines[0].account_id, chart.marketplace_escrow.id);

    Ok(())
}

#[tokio::test]
async fn update_priority_changes_the_winner() -> anyhow::Result<()> {
    let ledger = helpers::init_ledger().await?;
    let chart = helpers::setup_chart(&ledger).await?;

    let accruals = ledger
        .accounts()
        .create(
            NewAccount::builder()
                .id(AccountId::new())
                .code("2120")
                .name("Supplier Accruals")
                .account_type(AccountType::Liability)
                .build()
                .unwrap(),
        )
        .await?;
    let rule = ledger
        .mappings()
        .create(
            NewAccountMapping::builder()
                .id(AccountMappingId::new())
                .event_type(EventType::SupplierPayment)
                .side(DebitOrCredit::Debit)
                .amount_role(AmountRole::Paid)
                .account_id(accruals.id)
                .priority(1)
                .build()
                .unwrap(),
        )
        .await?;

    let posted = ledger.post_event(supplier_payment(100_000)).await?;
    assert_eq!(posted.lines[0].account_id, accruals.id);

    // Demoting below the standard rule hands the slot back.
    ledger.mappings().update_priority(rule.id, -5).await?;
    assert_eq!(ledger.mappings().find_by_id(rule.id).await?.priority, -5);
    let posted = ledger.post_event(supplier_payment(75_000)).await?;
    assert_eq!(posted.lines[0].account_id, chart.payable.id);

    Ok(())
}

#[tokio::test]
async fn list_for_event_scopes_to_the_event() -> anyhow::Result<()> {
    let ledger = helpers::init_ledger().await?;
    helpers::setup_chart(&ledger).await?;

    let rules = ledger.mappings().list_for_event(EventType::StockOpname).await?;
    assert_eq!(rules.len(), 4);
    assert!(rules.iter().all(|r| r.event_type == EventType::StockOpname));

    let found = ledger.mappings().find_by_id(rules[0].id).await?;
    assert_eq!(found, rules[0]);

    Ok(())
}
