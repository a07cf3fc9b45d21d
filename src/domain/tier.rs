//! Competitive division tiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::LedgerError;

/// Ordered competitive bracket. `Silver < Gold < Diamond`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DivisionTier {
    Silver,
    Gold,
    Diamond,
}

impl DivisionTier {
    /// All tiers, lowest first.
    pub const ALL: [DivisionTier; 3] = [Self::Silver, Self::Gold, Self::Diamond];

    /// The tier a new squad starts in.
    pub const FLOOR: DivisionTier = Self::Silver;

    /// Next tier up, or `None` at the top.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Silver => Some(Self::Gold),
            Self::Gold => Some(Self::Diamond),
            Self::Diamond => None,
        }
    }

    /// Next tier down, or `None` at the floor.
    #[must_use]
    pub const fn previous(self) -> Option<Self> {
        match self {
            Self::Silver => None,
            Self::Gold => Some(Self::Silver),
            Self::Diamond => Some(Self::Gold),
        }
    }

    /// Stable storage code.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Silver => 0,
            Self::Gold => 1,
            Self::Diamond => 2,
        }
    }

    /// Resolve a storage code.
    ///
    /// # Errors
    /// Returns [`LedgerError::UnknownTier`] for codes outside the enum.
    pub fn from_code(code: i32) -> Result<Self, LedgerError> {
        match code {
            0 => Ok(Self::Silver),
            1 => Ok(Self::Gold),
            2 => Ok(Self::Diamond),
            other => Err(LedgerError::UnknownTier {
                tier: other.to_string(),
            }),
        }
    }

    /// Upper-case display name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Silver => "SILVER",
            Self::Gold => "GOLD",
            Self::Diamond => "DIAMOND",
        }
    }
}

impl fmt::Display for DivisionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DivisionTier {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SILVER" => Ok(Self::Silver),
            "GOLD" => Ok(Self::Gold),
            "DIAMOND" => Ok(Self::Diamond),
            _ => Err(LedgerError::UnknownTier { tier: s.to_string() }),
        }
    }
}
