//! Structured log sink.

use async_trait::async_trait;
use tracing::{error, info};

use crate::error::Result;
use crate::port::outbound::notifier::{Event, NotificationSink};

/// Writes every committed event as a `tracing` line.
pub struct LogSink;

#[async_trait]
impl NotificationSink for LogSink {
    fn name(&self) -> &'static str {
        "log"
    }

    async fn deliver(&self, event: &Event) -> Result<()> {
        match event {
            Event::TransitionCommitted(e) => {
                let labels: Vec<String> = e.events.iter().map(ToString::to_string).collect();
                info!(
                    squad_id = %e.snapshot.squad_id,
                    match_result_id = %e.match_result_id,
                    outcome = %e.outcome,
                    events = %labels.join(","),
                    tier = %e.snapshot.tier,
                    coins = e.snapshot.current_bounty_coins,
                    protection = e.snapshot.protection_charges,
                    version = e.version,
                    "Transition committed"
                );
            }
            Event::WithdrawalReserved(e) => {
                info!(
                    squad_id = %e.squad_id,
                    reservation_id = %e.reservation_id,
                    tier = %e.tier,
                    coins = e.coins,
                    currency = %e.currency_amount,
                    remaining = e.remaining_coins,
                    "Withdrawal reserved"
                );
            }
            Event::CoinsSpent {
                squad_id,
                amount,
                remaining_coins,
                ..
            } => {
                info!(squad_id = %squad_id, amount, remaining = remaining_coins, "Coins spent");
            }
            Event::SquadCreated { squad_id, tier } => {
                info!(squad_id = %squad_id, tier = %tier, "Squad created");
            }
            Event::SquadArchived { squad_id, tier } => {
                info!(squad_id = %squad_id, tier = %tier, "Squad archived");
            }
            Event::OperatorAlert { squad_id, detail } => {
                error!(squad_id = %squad_id, detail = %detail, "Operator alert");
            }
        }
        Ok(())
    }
}
