//! Handler for `match apply`.

use serde_json::json;

use crate::adapter::inbound::cli::output;
use crate::application::ledger::ApplyResult;
use crate::domain::{MatchOutcome, MatchOutcomeEvent, MatchResultId, SquadId};
use crate::error::Result;
use crate::infrastructure::bootstrap::Engine;
use crate::port::outbound::store::LedgerStore;

use super::squad::print_ledger;

/// Execute `match apply`.
pub async fn execute_apply<S: LedgerStore + 'static>(
    engine: &Engine<S>,
    squad_id: &str,
    match_result_id: &str,
    outcome: &str,
) -> Result<()> {
    let event = MatchOutcomeEvent {
        squad_id: SquadId::new(squad_id),
        match_result_id: MatchResultId::new(match_result_id),
        outcome: outcome.parse::<MatchOutcome>()?,
    };

    match engine.ledger.apply_outcome(&event).await? {
        ApplyResult::Duplicate(ledger) => {
            if output::is_json() {
                output::json_output(json!({
                    "command": "match.apply",
                    "duplicate": true,
                    "events": [],
                    "ledger": ledger,
                }));
                return Ok(());
            }
            output::warning(&format!(
                "Match {match_result_id} was already applied; ledger unchanged"
            ));
            print_ledger("match.apply", &ledger);
        }
        ApplyResult::Applied(transition) => {
            if output::is_json() {
                output::json_output(json!({
                    "command": "match.apply",
                    "duplicate": false,
                    "events": transition.events,
                    "ledger": transition.ledger,
                }));
                return Ok(());
            }
            let labels: Vec<String> = transition.events.iter().map(ToString::to_string).collect();
            output::success(&format!("Applied {}", labels.join(", ")));
            print_ledger("match.apply", &transition.ledger);
        }
    }
    Ok(())
}
