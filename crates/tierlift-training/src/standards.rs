//! Per-tier performance standards derived by clustering.
//!
//! For every tier present in the population:
//!
//! 1. Keep the rows whose five stats are all present and valid
//! 2. Standardize the stats to zero mean / unit variance (fitted per tier)
//! 3. Partition the scaled rows into [`KMeansParams::clusters`] clusters
//! 4. Map the centroids back to original units
//! 5. Take the centroid with the highest K/D ratio as the tier's standard
//!
//! The standard therefore describes the top-skill sub-cluster of a tier, not
//! its average player.
//!
//! A build either produces standards for every tier present or fails; no
//! partial result is ever returned.

use std::collections::BTreeMap;

use tierlift_core::{FeatureVector, Stat, Tier, TierStandard, TierStandards};
use tierlift_stats::scaler::StandardScaler;

use crate::{
    kmeans::{KMeans, KMeansError, KMeansParams},
    population::HistoricalRecord,
};

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum BuildStandardsError {
    #[display("tier {tier} has {valid_records} valid records, at least {required} are needed")]
    DataInsufficient {
        tier: Tier,
        valid_records: usize,
        required: usize,
    },
    #[display("clustering failed for tier {tier}")]
    Clustering {
        tier: Tier,
        #[error(source)]
        source: KMeansError,
    },
}

/// Builds [`TierStandards`] from a historical population.
#[derive(Debug, Clone, Default)]
pub struct TierStandardBuilder {
    params: KMeansParams,
}

impl TierStandardBuilder {
    #[must_use]
    pub fn new(params: KMeansParams) -> Self {
        Self { params }
    }

    #[must_use]
    pub fn params(&self) -> &KMeansParams {
        &self.params
    }

    /// Computes one standard per tier present in `population`.
    ///
    /// Tiers without any rows are omitted from the result. A tier with fewer
    /// valid rows than clusters fails the whole build with
    /// [`BuildStandardsError::DataInsufficient`].
    pub fn build(
        &self,
        population: &[HistoricalRecord],
    ) -> Result<TierStandards, BuildStandardsError> {
        let mut by_tier: BTreeMap<Tier, Vec<[f64; Stat::LEN]>> = BTreeMap::new();
        for record in population {
            let rows = by_tier.entry(record.tier).or_default();
            if let Some(features) = record.valid_features() {
                rows.push(features.to_array());
            }
        }

        by_tier
            .into_iter()
            .map(|(tier, rows)| {
                let dropped = population.iter().filter(|r| r.tier == tier).count() - rows.len();
                if dropped > 0 {
                    log::debug!("{tier}: dropped {dropped} rows with missing or invalid stats");
                }
                let standard = self.build_tier(tier, &rows)?;
                log::info!(
                    "{tier}: standard from {} rows (K/D {:.3})",
                    rows.len(),
                    standard.get(Stat::KdRatio)
                );
                Ok((tier, standard))
            })
            .collect()
    }

    fn build_tier(
        &self,
        tier: Tier,
        rows: &[[f64; Stat::LEN]],
    ) -> Result<TierStandard, BuildStandardsError> {
        let required = self.params.clusters;
        let insufficient = || BuildStandardsError::DataInsufficient {
            tier,
            valid_records: rows.len(),
            required,
        };
        if rows.len() < required {
            return Err(insufficient());
        }

        let scaler = StandardScaler::fit(rows).ok_or_else(insufficient)?;
        let scaled = scaler.transform_all(rows);
        let kmeans = KMeans::fit(&scaled, &self.params)
            .map_err(|source| BuildStandardsError::Clustering { tier, source })?;

        let kd = Stat::KdRatio.index();
        let top = kmeans
            .centroids()
            .iter()
            .map(|c| scaler.inverse_transform(c))
            .reduce(|best, c| if c[kd] > best[kd] { c } else { best })
            .ok_or_else(insufficient)?;

        Ok(TierStandard::from(FeatureVector::from_fn(|stat| {
            top[stat.index()]
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(tier: Tier, kd: f64) -> HistoricalRecord {
        HistoricalRecord::new(
            tier,
            FeatureVector {
                kd_ratio: kd,
                avg_damage: 100.0 + 100.0 * kd,
                avg_survival_time: 4.0 + 2.0 * kd,
                win_ratio: 5.0 + 10.0 * kd,
                headshot_percentage: 6.0 + 5.0 * kd,
            },
        )
    }

    fn gold_population() -> Vec<HistoricalRecord> {
        [1.0, 1.2, 1.5, 3.0, 3.2]
            .into_iter()
            .map(|kd| record(Tier::Gold, kd))
            .collect()
    }

    #[test]
    fn test_standard_is_top_cluster_not_mean() {
        let standards = TierStandardBuilder::default()
            .build(&gold_population())
            .unwrap();
        let gold = standards.get(Tier::Gold).unwrap();

        let mean_kd = (1.0 + 1.2 + 1.5 + 3.0 + 3.2) / 5.0;
        assert!(gold.get(Stat::KdRatio) >= 3.0 - 1e-9);
        assert!((gold.get(Stat::KdRatio) - mean_kd).abs() > 1.0);
        // other stats come from the same centroid
        let kd = gold.get(Stat::KdRatio);
        assert!((gold.get(Stat::AvgDamage) - (100.0 + 100.0 * kd)).abs() < 1e-6);
        assert!((gold.get(Stat::WinRatio) - (5.0 + 10.0 * kd)).abs() < 1e-6);
    }

    #[test]
    fn test_build_is_deterministic() {
        let mut population = gold_population();
        population.extend([0.4, 0.5, 0.9, 1.1, 2.0, 0.7].map(|kd| record(Tier::Silver, kd)));
        let builder = TierStandardBuilder::default();
        let a = builder.build(&population).unwrap();
        let b = builder.build(&population).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_absent_tiers_are_omitted() {
        let standards = TierStandardBuilder::default()
            .build(&gold_population())
            .unwrap();
        assert_eq!(standards.len(), 1);
        assert!(standards.get(Tier::Diamond).is_none());
    }

    #[test]
    fn test_tier_with_too_few_records_fails() {
        let mut population = gold_population();
        population.push(record(Tier::Master, 4.0));
        population.push(record(Tier::Master, 4.5));

        let err = TierStandardBuilder::default().build(&population).unwrap_err();
        assert_eq!(
            err,
            BuildStandardsError::DataInsufficient {
                tier: Tier::Master,
                valid_records: 2,
                required: 3,
            }
        );
        assert!(err.to_string().contains("Master"));
    }

    #[test]
    fn test_rows_with_missing_stats_are_dropped() {
        let mut population = vec![record(Tier::Platinum, 2.0), record(Tier::Platinum, 2.5)];
        population.push(HistoricalRecord {
            tier: Tier::Platinum,
            features: None,
            promotion_ready: None,
        });
        population.push(HistoricalRecord::new(
            Tier::Platinum,
            FeatureVector {
                win_ratio: f64::NAN,
                ..FeatureVector::default()
            },
        ));

        let err = TierStandardBuilder::default().build(&population).unwrap_err();
        assert!(matches!(
            err,
            BuildStandardsError::DataInsufficient {
                tier: Tier::Platinum,
                valid_records: 2,
                ..
            }
        ));

        population.push(record(Tier::Platinum, 3.0));
        let standards = TierStandardBuilder::default().build(&population).unwrap();
        assert!((standards.get(Tier::Platinum).unwrap().get(Stat::KdRatio) - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_identical_records_yield_that_record() {
        let population = vec![record(Tier::Bronze, 0.8); 4];
        let standards = TierStandardBuilder::default().build(&population).unwrap();
        let bronze = standards.get(Tier::Bronze).unwrap();
        assert!((bronze.get(Stat::KdRatio) - 0.8).abs() < 1e-9);
        assert!((bronze.get(Stat::AvgDamage) - 180.0).abs() < 1e-9);
    }
}
