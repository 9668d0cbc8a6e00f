use serde::{Deserialize, Serialize};

use crate::{Stat, ValidationError};

/// Numeric representation of one measurement of a player's five stats.
///
/// Survival time is in minutes; win ratio and headshot percentage are
/// percentages in `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureVector {
    pub kd_ratio: f64,
    pub avg_damage: f64,
    pub avg_survival_time: f64,
    pub win_ratio: f64,
    pub headshot_percentage: f64,
}

impl FeatureVector {
    /// Builds a vector by evaluating `f` for every stat.
    #[must_use]
    pub fn from_fn<F>(mut f: F) -> Self
    where
        F: FnMut(Stat) -> f64,
    {
        Self {
            kd_ratio: f(Stat::KdRatio),
            avg_damage: f(Stat::AvgDamage),
            avg_survival_time: f(Stat::AvgSurvivalTime),
            win_ratio: f(Stat::WinRatio),
            headshot_percentage: f(Stat::HeadshotPercentage),
        }
    }

    /// Builds a vector from values in [`Stat::ALL`] order.
    #[must_use]
    pub fn from_array(values: [f64; Stat::LEN]) -> Self {
        Self::from_fn(|stat| values[stat.index()])
    }

    #[must_use]
    pub const fn get(&self, stat: Stat) -> f64 {
        match stat {
            Stat::KdRatio => self.kd_ratio,
            Stat::AvgDamage => self.avg_damage,
            Stat::AvgSurvivalTime => self.avg_survival_time,
            Stat::WinRatio => self.win_ratio,
            Stat::HeadshotPercentage => self.headshot_percentage,
        }
    }

    /// Values in [`Stat::ALL`] order.
    #[must_use]
    pub fn to_array(&self) -> [f64; Stat::LEN] {
        Stat::ALL.map(|stat| self.get(stat))
    }

    /// Checks every stat is finite and within [`Stat::valid_range`].
    pub fn validate(&self) -> Result<(), ValidationError> {
        for stat in Stat::ALL {
            let value = self.get(stat);
            if !value.is_finite() {
                return Err(ValidationError::NotFinite { stat, value });
            }
            let (min, max) = stat.valid_range();
            if !(min..=max).contains(&value) {
                return Err(ValidationError::OutOfRange {
                    stat,
                    value,
                    min,
                    max,
                });
            }
        }
        Ok(())
    }
}
