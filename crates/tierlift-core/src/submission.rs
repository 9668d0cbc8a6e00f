use serde::{Deserialize, Serialize};

use crate::{FeatureVector, Stat, Tier, TierParsing, ValidationError};

/// Inbound player stats as submitted by a client.
///
/// Every field is optional at the wire level so that missing fields can be
/// reported as a [`ValidationError`] instead of a deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSubmission {
    pub username: Option<String>,
    pub kd_ratio: Option<f64>,
    pub avg_damage: Option<f64>,
    pub avg_survival_time: Option<f64>,
    pub tier: Option<String>,
    pub win_ratio: Option<f64>,
    pub headshot_percentage: Option<f64>,
}

/// A submission whose stats are present, finite and in range.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedSubmission {
    /// Registered player name; `None` for guests.
    pub username: Option<String>,
    pub features: FeatureVector,
    pub tier: Tier,
}

impl PlayerSubmission {
    fn stat(&self, stat: Stat) -> Option<f64> {
        match stat {
            Stat::KdRatio => self.kd_ratio,
            Stat::AvgDamage => self.avg_damage,
            Stat::AvgSurvivalTime => self.avg_survival_time,
            Stat::WinRatio => self.win_ratio,
            Stat::HeadshotPercentage => self.headshot_percentage,
        }
    }

    /// Validates the submission.
    ///
    /// A missing or unrecognized tier falls back to [`Tier::Bronze`] under
    /// [`TierParsing::Lenient`] and is rejected under [`TierParsing::Strict`].
    /// An empty username is treated as a guest.
    pub fn validate(
        &self,
        tier_parsing: TierParsing,
    ) -> Result<ValidatedSubmission, ValidationError> {
        let mut values = [0.0; Stat::LEN];
        for stat in Stat::ALL {
            values[stat.index()] = self.stat(stat).ok_or(ValidationError::MissingField {
                field: stat.wire_name(),
            })?;
        }
        let features = FeatureVector::from_array(values);
        features.validate()?;

        let tier = match (&self.tier, tier_parsing) {
            (Some(label), mode) => Tier::parse(label, mode)?,
            (None, TierParsing::Lenient) => Tier::default(),
            (None, TierParsing::Strict) => {
                return Err(ValidationError::MissingField { field: "tier" });
            }
        };

        let username = self
            .username
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_owned);

        Ok(ValidatedSubmission {
            username,
            features,
            tier,
        })
    }
}
