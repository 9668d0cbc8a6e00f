use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Ordinal skill bracket, ordered from lowest to highest.
#[derive(
    Default,
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
pub enum Tier {
    #[default]
    Bronze,
    Silver,
    Gold,
    Platinum,
    Diamond,
    Master,
    Grandmaster,
}

/// How to treat tier labels that are not one of the seven known values.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TierParsing {
    /// Unknown labels fall back to [`Tier::Bronze`].
    #[default]
    Lenient,
    /// Unknown labels are rejected with [`ValidationError::UnknownTier`].
    Strict,
}

impl Tier {
    pub const LEN: usize = 7;

    pub const ALL: [Self; Self::LEN] = [
        Self::Bronze,
        Self::Silver,
        Self::Gold,
        Self::Platinum,
        Self::Diamond,
        Self::Master,
        Self::Grandmaster,
    ];

    /// Ordinal rank: Bronze = 0 through Grandmaster = 6.
    #[must_use]
    pub const fn rank(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Bronze => "Bronze",
            Self::Silver => "Silver",
            Self::Gold => "Gold",
            Self::Platinum => "Platinum",
            Self::Diamond => "Diamond",
            Self::Master => "Master",
            Self::Grandmaster => "Grandmaster",
        }
    }

    /// Parses a tier label according to `mode`.
    pub fn parse(label: &str, mode: TierParsing) -> Result<Self, ValidationError> {
        match (label.parse(), mode) {
            (Ok(tier), _) => Ok(tier),
            (Err(e), TierParsing::Strict) => Err(e),
            (Err(_), TierParsing::Lenient) => {
                log::warn!("unknown tier '{label}', defaulting to {}", Self::default());
                Ok(Self::default())
            }
        }
    }
}

impl FromStr for Tier {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tier| tier.label() == s.trim())
            .ok_or_else(|| ValidationError::UnknownTier {
                label: s.to_owned(),
            })
    }
}
