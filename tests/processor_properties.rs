//! Property tests for the outcome processor.
//!
//! Random WIN/LOSS sequences are driven through `processor::apply` from
//! arbitrary starting points, checking the ledger stays consistent at every
//! step.

use chrono::Utc;
use proptest::prelude::*;

use squadledger::domain::processor;
use squadledger::domain::{
    DivisionCatalog, DivisionTier, MatchOutcome, SquadLedger, TransitionEvent,
    DEMOTION_LOSS_STREAK,
};
use squadledger::testkit::domain::ledger_at;

fn outcome_strategy() -> impl Strategy<Value = MatchOutcome> {
    prop_oneof![Just(MatchOutcome::Win), Just(MatchOutcome::Loss)]
}

fn tier_strategy() -> impl Strategy<Value = DivisionTier> {
    prop_oneof![
        Just(DivisionTier::Silver),
        Just(DivisionTier::Gold),
        Just(DivisionTier::Diamond),
    ]
}

// Valid starting ledgers: coins below the tier's threshold, protection within
// the grant, no streak while holding coins.
fn start_strategy() -> impl Strategy<Value = SquadLedger> {
    (tier_strategy(), 0u64..2_000, 0u32..=2, 0u32..2).prop_map(
        |(tier, coins, protection, streak)| {
            let catalog = DivisionCatalog::default();
            let cap = catalog
                .config_for(tier)
                .ok()
                .and_then(|c| c.promotion_threshold)
                .unwrap_or(u64::MAX);
            let coins = coins.min(cap.saturating_sub(1));
            let mut ledger = ledger_at("prop", tier, coins, protection);
            if coins == 0 && protection == 0 {
                ledger.consecutive_unprotected_losses = streak;
            }
            ledger
        },
    )
}

proptest! {
    #[test]
    fn any_sequence_keeps_ledger_consistent(
        start in start_strategy(),
        outcomes in prop::collection::vec(outcome_strategy(), 0..200),
    ) {
        let catalog = DivisionCatalog::default();
        let mut ledger = start;

        for outcome in outcomes {
            let before = ledger.clone();
            let transition = processor::apply(&ledger, outcome, &catalog, Utc::now())
                .expect("valid ledger accepts every outcome");
            ledger = transition.ledger;

            prop_assert!(ledger.check_invariants(&catalog).is_ok());
            prop_assert!(ledger.consecutive_unprotected_losses <= DEMOTION_LOSS_STREAK);
            prop_assert!(
                ledger.protection_charges
                    <= catalog.config_for(ledger.tier).unwrap().pity_grant_size
            );
            prop_assert!(ledger.total_bounty_coins_earned >= before.total_bounty_coins_earned);
            prop_assert_eq!(ledger.total_bounty_coins_spent, before.total_bounty_coins_spent);
            prop_assert_eq!(ledger.version, before.version);

            // Exactly one WIN_APPLIED or LOSS_APPLIED, and it comes first.
            match (outcome, transition.events.first()) {
                (MatchOutcome::Win, Some(TransitionEvent::WinApplied { .. }))
                | (MatchOutcome::Loss, Some(TransitionEvent::LossApplied { .. })) => {}
                (_, first) => prop_assert!(false, "unexpected first event {:?}", first),
            }

            // Tier moves at most one step per outcome under the default catalog.
            let step = (ledger.tier.code() - before.tier.code()).abs();
            prop_assert!(step <= 1);
        }
    }

    #[test]
    fn demotion_lands_one_below_lower_threshold(
        tier in prop_oneof![Just(DivisionTier::Gold), Just(DivisionTier::Diamond)],
    ) {
        let catalog = DivisionCatalog::default();
        let ledger = ledger_at("prop", tier, 0, 0);

        let first = processor::apply(&ledger, MatchOutcome::Loss, &catalog, Utc::now()).unwrap();
        let second =
            processor::apply(&first.ledger, MatchOutcome::Loss, &catalog, Utc::now()).unwrap();

        let lower = tier.previous().unwrap();
        let threshold = catalog.config_for(lower).unwrap().promotion_threshold.unwrap();
        prop_assert_eq!(second.ledger.tier, lower);
        prop_assert_eq!(second.ledger.current_bounty_coins, threshold - 1);
        prop_assert_eq!(second.ledger.consecutive_unprotected_losses, 0);
        prop_assert_eq!(
            second.ledger.protection_charges,
            catalog.config_for(lower).unwrap().pity_grant_size
        );
    }

    #[test]
    fn spend_moves_coins_into_spent(coins in 1u64..240, fraction in 0.0f64..=1.0) {
        let catalog = DivisionCatalog::default();
        let ledger = ledger_at("prop", DivisionTier::Silver, coins, 2);
        let amount = ((coins as f64 * fraction) as u64).clamp(1, coins);

        let next = processor::spend(&ledger, amount, &catalog).unwrap();
        prop_assert_eq!(next.current_bounty_coins + amount, coins);
        prop_assert_eq!(next.total_bounty_coins_spent, amount);
        prop_assert_eq!(next.tier, ledger.tier);
    }
}
