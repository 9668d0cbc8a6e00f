use serde::{Deserialize, Serialize};

/// One of the five tracked performance stats.
///
/// Declaration order is the tie-breaking priority used when two stats are
/// equally far below their benchmark: `KdRatio` wins over `AvgDamage`, and so on.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    derive_more::Display,
)]
#[serde(rename_all = "camelCase")]
pub enum Stat {
    #[display("K/D Ratio")]
    KdRatio,
    #[display("Average Damage")]
    AvgDamage,
    #[display("Survival Time")]
    AvgSurvivalTime,
    #[display("Win Rate")]
    WinRatio,
    #[display("Headshot Percentage")]
    HeadshotPercentage,
}

impl Stat {
    pub const LEN: usize = 5;

    /// All stats in priority order.
    pub const ALL: [Self; Self::LEN] = [
        Self::KdRatio,
        Self::AvgDamage,
        Self::AvgSurvivalTime,
        Self::WinRatio,
        Self::HeadshotPercentage,
    ];

    /// Position of this stat in [`Self::ALL`] and in feature arrays.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Field name used by inbound submissions and the profile history.
    #[must_use]
    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::KdRatio => "kdRatio",
            Self::AvgDamage => "avgDamage",
            Self::AvgSurvivalTime => "avgSurvivalTime",
            Self::WinRatio => "winRatio",
            Self::HeadshotPercentage => "headshotPercentage",
        }
    }

    /// Column name used by the historical table and the standards artifact.
    #[must_use]
    pub const fn column_name(self) -> &'static str {
        match self {
            Self::KdRatio => "K/D_Ratio",
            Self::AvgDamage => "Avg_Damage",
            Self::AvgSurvivalTime => "Survival_Time",
            Self::WinRatio => "Win_Rate (%)",
            Self::HeadshotPercentage => "Headshot_Rate (%)",
        }
    }

    /// Inclusive range of plausible values.
    #[must_use]
    pub const fn valid_range(self) -> (f64, f64) {
        match self {
            Self::KdRatio | Self::AvgDamage | Self::AvgSurvivalTime => (0.0, f64::INFINITY),
            Self::WinRatio | Self::HeadshotPercentage => (0.0, 100.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_matches_priority_order() {
        for (i, stat) in Stat::ALL.into_iter().enumerate() {
            assert_eq!(stat.index(), i);
        }
        assert!(Stat::ALL.is_sorted());
    }

    #[test]
    fn test_serde_uses_wire_name() {
        for stat in Stat::ALL {
            let json = serde_json::to_string(&stat).unwrap();
            assert_eq!(json, format!("\"{}\"", stat.wire_name()));
        }
    }

    #[test]
    fn test_display_name() {
        assert_eq!(Stat::KdRatio.to_string(), "K/D Ratio");
        assert_eq!(Stat::HeadshotPercentage.to_string(), "Headshot Percentage");
    }
}
