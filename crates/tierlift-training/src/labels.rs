//! Promotion labels derived from tier standards.
//!
//! A record is labeled promotion-ready when each of its five stats meets or
//! exceeds its tier's standard. Labels are training signal only; request-time
//! readiness comes from the trained classifier.

use tierlift_core::{FeatureVector, Tier, TierStandards};

use crate::{dataset::LabeledSample, population::HistoricalRecord};

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum LabelError {
    #[display("no standard available for tier {tier}")]
    StandardNotFound { tier: Tier },
}

/// Derives the promotion label of one record.
pub fn promotion_label(
    standards: &TierStandards,
    tier: Tier,
    features: &FeatureVector,
) -> Result<bool, LabelError> {
    standards
        .get(tier)
        .map(|standard| standard.is_met_by(features))
        .ok_or(LabelError::StandardNotFound { tier })
}

/// Labels every record of the population.
///
/// Records without valid stats cannot be labeled and are returned as
/// `None` in the corresponding slot. A record whose tier has no standard
/// aborts the whole run.
pub fn label_population(
    population: &[HistoricalRecord],
    standards: &TierStandards,
) -> Result<Vec<Option<bool>>, LabelError> {
    population
        .iter()
        .map(|record| {
            record
                .valid_features()
                .map(|features| promotion_label(standards, record.tier, &features))
                .transpose()
        })
        .collect()
}

/// Collects the records that carry both valid stats and a label.
#[must_use]
pub fn labeled_samples(population: &[HistoricalRecord]) -> Vec<LabeledSample> {
    population
        .iter()
        .filter_map(|record| {
            Some(LabeledSample {
                features: record.valid_features()?,
                tier: record.tier,
                promotion_ready: record.promotion_ready?,
            })
        })
        .collect()
}
