//! Match outcomes and the transition events they produce.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::LedgerError;
use super::id::{MatchResultId, SquadId};
use super::tier::DivisionTier;

/// Inbound event from the match subsystem once a result is finalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchOutcomeEvent {
    pub squad_id: SquadId,
    pub match_result_id: MatchResultId,
    pub outcome: MatchOutcome,
}

/// Finalized result of a match from one squad's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MatchOutcome {
    Win,
    Loss,
}

impl MatchOutcome {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Win => "WIN",
            Self::Loss => "LOSS",
        }
    }
}

impl fmt::Display for MatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchOutcome {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "WIN" => Ok(Self::Win),
            "LOSS" => Ok(Self::Loss),
            _ => Err(LedgerError::InvalidOutcome {
                value: s.to_string(),
            }),
        }
    }
}

/// Event emitted by the outcome processor for a single application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransitionEvent {
    WinApplied {
        coins_awarded: u64,
    },
    LossApplied {
        coins_deducted: u64,
    },
    Promoted {
        from: DivisionTier,
        to: DivisionTier,
    },
    Demoted {
        from: DivisionTier,
        to: DivisionTier,
    },
    ProtectionConsumed {
        remaining: u32,
    },
    /// Two unprotected losses at the floor tier. Not a demotion.
    FloorReached,
}

impl TransitionEvent {
    /// Stable upper-case label used in logs and notifications.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::WinApplied { .. } => "WIN_APPLIED",
            Self::LossApplied { .. } => "LOSS_APPLIED",
            Self::Promoted { .. } => "PROMOTED",
            Self::Demoted { .. } => "DEMOTED",
            Self::ProtectionConsumed { .. } => "PROTECTION_CONSUMED",
            Self::FloorReached => "FLOOR_REACHED",
        }
    }

    /// True for events that change a squad's tier.
    #[must_use]
    pub const fn changes_tier(&self) -> bool {
        matches!(self, Self::Promoted { .. } | Self::Demoted { .. })
    }
}

impl fmt::Display for TransitionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Promoted { to, .. } | Self::Demoted { to, .. } => {
                write!(f, "{}({to})", self.label())
            }
            _ => f.write_str(self.label()),
        }
    }
}
