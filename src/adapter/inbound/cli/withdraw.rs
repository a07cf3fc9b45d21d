//! Handlers for `withdraw` and `withdrawals`.

use serde_json::json;
use tabled::Tabled;

use crate::adapter::inbound::cli::output;
use crate::domain::{SquadId, WithdrawalRequest, WithdrawalReservation};
use crate::error::Result;
use crate::infrastructure::bootstrap::Engine;
use crate::port::outbound::store::LedgerStore;

#[derive(Tabled)]
struct ReservationRow {
    #[tabled(rename = "Reservation")]
    id: String,
    #[tabled(rename = "Division")]
    tier: String,
    #[tabled(rename = "Coins")]
    coins: u64,
    #[tabled(rename = "Rate")]
    rate: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Requested")]
    requested_at: String,
}

impl From<&WithdrawalReservation> for ReservationRow {
    fn from(r: &WithdrawalReservation) -> Self {
        Self {
            id: r.id.to_string(),
            tier: r.tier.to_string(),
            coins: r.coins,
            rate: r.conversion_rate.to_string(),
            amount: r.currency_amount.to_string(),
            status: r.status.to_string(),
            requested_at: r.requested_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

/// Execute `withdraw`.
pub async fn execute_withdraw<S: LedgerStore + 'static>(
    engine: &Engine<S>,
    squad_id: &str,
    coins: u64,
    payout: &str,
) -> Result<()> {
    let request = WithdrawalRequest {
        squad_id: SquadId::new(squad_id),
        requested_coins: coins,
        payout_details: payout.to_string(),
    };
    let reservation = engine.conversion.request_withdrawal(&request).await?;

    if output::is_json() {
        output::json_output(json!({
            "command": "withdraw",
            "reservation": reservation,
        }));
        return Ok(());
    }

    output::success("Withdrawal reserved");
    output::field("Reservation", &reservation.id);
    output::field("Division", reservation.tier);
    output::field("Coins", reservation.coins);
    output::field("Rate", reservation.conversion_rate);
    output::field("Amount", output::highlight(reservation.currency_amount));
    output::field("Status", reservation.status);
    output::note("Payout is completed by the manual payout workflow.");
    Ok(())
}

/// Execute `withdrawals`.
pub async fn execute_list<S: LedgerStore + 'static>(
    engine: &Engine<S>,
    squad_id: &str,
) -> Result<()> {
    let reservations = engine.conversion.withdrawals(&SquadId::new(squad_id)).await?;

    if output::is_json() {
        output::json_output(json!({
            "command": "withdrawals",
            "squad_id": squad_id,
            "withdrawals": reservations,
        }));
        return Ok(());
    }

    output::section(&format!("Withdrawals for {}", output::highlight(squad_id)));
    if reservations.is_empty() {
        output::note("(none)");
        return Ok(());
    }
    output::table(reservations.iter().map(ReservationRow::from));
    Ok(())
}
