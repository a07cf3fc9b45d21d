//! Handlers for the `squad` command group.

use serde_json::json;

use crate::adapter::inbound::cli::output;
use crate::domain::{SquadId, SquadLedger};
use crate::error::Result;
use crate::infrastructure::bootstrap::Engine;
use crate::port::outbound::store::LedgerStore;

pub(crate) fn print_ledger(command: &str, ledger: &SquadLedger) {
    if output::is_json() {
        output::json_output(json!({
            "command": command,
            "ledger": ledger,
        }));
        return;
    }

    output::section(&format!("Squad {}", output::highlight(&ledger.squad_id)));
    output::field("Division", ledger.tier);
    output::field("Coins", ledger.current_bounty_coins);
    output::field("Protection", ledger.protection_charges);
    output::field("Loss streak", ledger.consecutive_unprotected_losses);
    output::field("Earned", ledger.total_bounty_coins_earned);
    output::field("Spent", ledger.total_bounty_coins_spent);
    output::field("Version", ledger.version);
    output::field("Last change", ledger.last_transition_at.to_rfc3339());
    if let Some(archived_at) = ledger.archived_at {
        output::field("Archived", archived_at.to_rfc3339());
    }
}

/// Execute `squad create`.
pub async fn execute_create<S: LedgerStore + 'static>(
    engine: &Engine<S>,
    squad_id: &str,
) -> Result<()> {
    let ledger = engine.ledger.create_squad(&SquadId::new(squad_id)).await?;
    output::success("Squad ledger ready");
    print_ledger("squad.create", &ledger);
    Ok(())
}

/// Execute `squad show`.
pub async fn execute_show<S: LedgerStore + 'static>(
    engine: &Engine<S>,
    squad_id: &str,
) -> Result<()> {
    let ledger = engine.ledger.ledger(&SquadId::new(squad_id)).await?;
    print_ledger("squad.show", &ledger);
    Ok(())
}

/// Execute `squad archive`.
pub async fn execute_archive<S: LedgerStore + 'static>(
    engine: &Engine<S>,
    squad_id: &str,
) -> Result<()> {
    let ledger = engine.ledger.archive_squad(&SquadId::new(squad_id)).await?;
    output::success("Squad archived");
    print_ledger("squad.archive", &ledger);
    Ok(())
}
