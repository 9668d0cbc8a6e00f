use std::collections::{BTreeMap, btree_map};

use serde::{Deserialize, Serialize};

use crate::{FeatureVector, Stat, Tier};

/// Representative performance vector for one tier.
///
/// Serialized with the historical-table column names, which is the format of
/// the persisted standards artifact.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierStandard {
    #[serde(rename = "K/D_Ratio")]
    kd_ratio: f64,
    #[serde(rename = "Avg_Damage")]
    avg_damage: f64,
    #[serde(rename = "Survival_Time")]
    avg_survival_time: f64,
    #[serde(rename = "Win_Rate (%)")]
    win_ratio: f64,
    #[serde(rename = "Headshot_Rate (%)")]
    headshot_percentage: f64,
}

impl TierStandard {
    #[must_use]
    pub fn get(&self, stat: Stat) -> f64 {
        self.as_features().get(stat)
    }

    #[must_use]
    pub fn as_features(&self) -> FeatureVector {
        FeatureVector {
            kd_ratio: self.kd_ratio,
            avg_damage: self.avg_damage,
            avg_survival_time: self.avg_survival_time,
            win_ratio: self.win_ratio,
            headshot_percentage: self.headshot_percentage,
        }
    }

    /// Whether every stat of `features` meets or exceeds this standard.
    ///
    /// Exact equality counts as meeting the standard.
    #[must_use]
    pub fn is_met_by(&self, features: &FeatureVector) -> bool {
        Stat::ALL
            .into_iter()
            .all(|stat| features.get(stat) >= self.get(stat))
    }
}

impl From<FeatureVector> for TierStandard {
    fn from(features: FeatureVector) -> Self {
        Self {
            kd_ratio: features.kd_ratio,
            avg_damage: features.avg_damage,
            avg_survival_time: features.avg_survival_time,
            win_ratio: features.win_ratio,
            headshot_percentage: features.headshot_percentage,
        }
    }
}

/// Standards for every tier that had data when they were built.
///
/// Built once and never modified; recomputation produces a fresh value.
/// Tiers absent from the source population have no entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TierStandards(BTreeMap<Tier, TierStandard>);

impl TierStandards {
    #[must_use]
    pub fn get(&self, tier: Tier) -> Option<&TierStandard> {
        self.0.get(&tier)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates in tier order, lowest first.
    pub fn iter(&self) -> btree_map::Iter<'_, Tier, TierStandard> {
        self.0.iter()
    }
}

impl FromIterator<(Tier, TierStandard)> for TierStandards {
    fn from_iter<I: IntoIterator<Item = (Tier, TierStandard)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a TierStandards {
    type Item = (&'a Tier, &'a TierStandard);
    type IntoIter = btree_map::Iter<'a, Tier, TierStandard>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standard() -> TierStandard {
        TierStandard::from(FeatureVector {
            kd_ratio: 1.5,
            avg_damage: 300.0,
            avg_survival_time: 9.0,
            win_ratio: 20.0,
            headshot_percentage: 15.0,
        })
    }

    #[test]
    fn test_equality_meets_standard() {
        let standard = standard();
        assert!(standard.is_met_by(&standard.as_features()));
    }

    #[test]
    fn test_single_stat_below_fails() {
        let standard = standard();
        for stat in Stat::ALL {
            let features = FeatureVector::from_fn(|s| {
                let value = standard.get(s);
                if s == stat { value - 0.01 } else { value + 10.0 }
            });
            assert!(!standard.is_met_by(&features), "{stat} below must fail");
        }
    }

    #[test]
    fn test_all_stats_above_meets_standard() {
        let standard = standard();
        let features = FeatureVector::from_fn(|s| standard.get(s) * 1.2);
        assert!(standard.is_met_by(&features));
    }

    #[test]
    fn test_artifact_format() {
        let standards: TierStandards = [(Tier::Gold, standard())].into_iter().collect();
        let json = serde_json::to_value(&standards).unwrap();
        assert_eq!(json["Gold"]["K/D_Ratio"], 1.5);
        assert_eq!(json["Gold"]["Headshot_Rate (%)"], 15.0);

        let parsed: TierStandards = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, standards);
        assert!(parsed.get(Tier::Silver).is_none());
    }
}
