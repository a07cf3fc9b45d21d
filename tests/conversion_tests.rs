mod harness;

use std::sync::Arc;

use rust_decimal_macros::dec;
use squadledger::application::conversion::ConversionService;
use squadledger::domain::error::LedgerError;
use squadledger::domain::{DivisionTier, WithdrawalStatus};
use squadledger::port::{Event, LedgerStore};
use squadledger::testkit::config::ledger_service;
use squadledger::testkit::domain::{ledger_at, squad, withdrawal};

use harness::recording_sink::RecordingNotifier;
use harness::temp_db::TempDb;

#[tokio::test]
async fn over_balance_withdrawal_leaves_ledger_untouched() {
    let db = TempDb::create("overdraw");
    let store = db.store();
    store
        .insert(&ledger_at("alpha", DivisionTier::Gold, 120, 2))
        .await
        .unwrap();
    let before = store.load(&squad("alpha")).await.unwrap().unwrap();

    let notifier = RecordingNotifier::new();
    let service = ConversionService::new(Arc::new(ledger_service(
        store.clone(),
        Arc::new(notifier.clone()),
    )));

    let err = service
        .request_withdrawal(&withdrawal("alpha", 121))
        .await
        .unwrap_err();
    assert!(matches!(
        err.as_ledger(),
        Some(LedgerError::InsufficientBalance {
            requested: 121,
            available: 120
        })
    ));

    let after = store.load(&squad("alpha")).await.unwrap().unwrap();
    assert_eq!(before, after);
    assert!(store.withdrawals(&squad("alpha")).await.unwrap().is_empty());
    assert_eq!(notifier.len(), 0);
}

#[tokio::test]
async fn withdrawal_debits_and_persists_reservation_together() {
    let db = TempDb::create("withdraw");
    let store = db.store();
    store
        .insert(&ledger_at("alpha", DivisionTier::Diamond, 175, 2))
        .await
        .unwrap();

    let notifier = RecordingNotifier::new();
    let service = ConversionService::new(Arc::new(ledger_service(
        store.clone(),
        Arc::new(notifier.clone()),
    )));

    let reservation = service
        .request_withdrawal(&withdrawal("alpha", 75))
        .await
        .unwrap();

    // 75 coins at 2.00 per 50 coins.
    assert_eq!(reservation.currency_amount, dec!(3.00));
    assert_eq!(reservation.conversion_rate, dec!(2.00));
    assert_eq!(reservation.tier, DivisionTier::Diamond);
    assert_eq!(reservation.status, WithdrawalStatus::Pending);

    let ledger = store.load(&squad("alpha")).await.unwrap().unwrap();
    assert_eq!(ledger.current_bounty_coins, 100);
    assert_eq!(ledger.total_bounty_coins_spent, 75);
    assert_eq!(ledger.version, 1);

    let stored = service.withdrawals(&squad("alpha")).await.unwrap();
    assert_eq!(stored, vec![reservation.clone()]);

    let events = notifier.events();
    let [Event::WithdrawalReserved(event)] = events.as_slice() else {
        panic!("expected one withdrawal event, got {events:?}");
    };
    assert_eq!(event.reservation_id, reservation.id);
    assert_eq!(event.remaining_coins, 100);
}

#[tokio::test]
async fn rate_follows_the_division_at_request_time() {
    let db = TempDb::create("rates");
    let store = db.store();
    for (id, tier) in [
        ("silver", DivisionTier::Silver),
        ("gold", DivisionTier::Gold),
        ("diamond", DivisionTier::Diamond),
    ] {
        store.insert(&ledger_at(id, tier, 200, 2)).await.unwrap();
    }
    let service = ConversionService::new(Arc::new(ledger_service(
        store,
        Arc::new(RecordingNotifier::new()),
    )));

    let mut amounts = Vec::new();
    for id in ["silver", "gold", "diamond"] {
        let reservation = service.request_withdrawal(&withdrawal(id, 100)).await.unwrap();
        amounts.push(reservation.currency_amount);
    }
    assert_eq!(amounts, vec![dec!(2.00), dec!(3.00), dec!(4.00)]);
}

#[tokio::test]
async fn unknown_squad_cannot_withdraw() {
    let db = TempDb::create("unknown");
    let service = ConversionService::new(Arc::new(ledger_service(
        db.store(),
        Arc::new(RecordingNotifier::new()),
    )));

    let err = service
        .request_withdrawal(&withdrawal("ghost", 10))
        .await
        .unwrap_err();
    assert!(matches!(err.as_ledger(), Some(LedgerError::SquadNotFound(_))));
}
