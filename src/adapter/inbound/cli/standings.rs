//! Handlers for `standings` and `divisions`.

use serde_json::json;
use tabled::Tabled;

use crate::adapter::inbound::cli::output;
use crate::domain::{DivisionCatalog, DivisionTier};
use crate::error::Result;
use crate::infrastructure::bootstrap::Engine;
use crate::port::outbound::store::LedgerStore;

#[derive(Tabled)]
struct StandingRow {
    #[tabled(rename = "#")]
    rank: usize,
    #[tabled(rename = "Squad")]
    squad_id: String,
    #[tabled(rename = "Division")]
    tier: String,
    #[tabled(rename = "Coins")]
    coins: u64,
    #[tabled(rename = "Protection")]
    protection: u32,
}

#[derive(Tabled)]
struct DivisionRow {
    #[tabled(rename = "Division")]
    tier: String,
    #[tabled(rename = "Promote at")]
    threshold: String,
    #[tabled(rename = "Win")]
    win_reward: u64,
    #[tabled(rename = "Loss")]
    loss_penalty: u64,
    #[tabled(rename = "Protection")]
    pity_grant_size: u32,
    #[tabled(rename = "Rate")]
    conversion_rate: String,
}

/// Execute `standings`.
pub async fn execute_standings<S: LedgerStore + 'static>(
    engine: &Engine<S>,
    tier: Option<&str>,
) -> Result<()> {
    let tier = tier.map(str::parse::<DivisionTier>).transpose()?;
    let standings = engine.standings.standings(tier).await?;

    if output::is_json() {
        output::json_output(json!({
            "command": "standings",
            "tier": tier,
            "standings": standings,
        }));
        return Ok(());
    }

    output::section("Standings");
    if standings.is_empty() {
        output::note("(no active squads)");
        return Ok(());
    }
    output::table(standings.iter().enumerate().map(|(i, s)| StandingRow {
        rank: i + 1,
        squad_id: s.squad_id.to_string(),
        tier: s.tier.to_string(),
        coins: s.current_bounty_coins,
        protection: s.protection_charges,
    }));
    Ok(())
}

/// Execute `divisions`.
pub fn execute_divisions(catalog: &DivisionCatalog) -> Result<()> {
    if output::is_json() {
        output::json_output(json!({
            "command": "divisions",
            "conversion_block": catalog.conversion_block(),
            "divisions": catalog.divisions(),
        }));
        return Ok(());
    }

    output::section("Divisions");
    output::table(catalog.divisions().iter().map(|d| DivisionRow {
        tier: d.tier.to_string(),
        threshold: d
            .promotion_threshold
            .map_or_else(|| "-".to_string(), |t| t.to_string()),
        win_reward: d.win_reward,
        loss_penalty: d.loss_penalty,
        pity_grant_size: d.pity_grant_size,
        conversion_rate: d.conversion_rate.to_string(),
    }));
    output::note(&format!(
        "Rates are currency per {} coins.",
        catalog.conversion_block()
    ));
    Ok(())
}
