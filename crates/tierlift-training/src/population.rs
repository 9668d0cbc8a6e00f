//! Historical population rows used as training input.

use tierlift_core::{FeatureVector, Tier};

/// One row of the historical population.
///
/// `features` is `None` when the source row had any stat missing; such rows
/// take part in nothing that needs the stats.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistoricalRecord {
    pub tier: Tier,
    pub features: Option<FeatureVector>,
    /// Previously derived promotion label, if the source carries one.
    pub promotion_ready: Option<bool>,
}

impl HistoricalRecord {
    #[must_use]
    pub fn new(tier: Tier, features: FeatureVector) -> Self {
        Self {
            tier,
            features: Some(features),
            promotion_ready: None,
        }
    }

    #[must_use]
    pub fn with_label(self, promotion_ready: bool) -> Self {
        Self {
            promotion_ready: Some(promotion_ready),
            ..self
        }
    }

    /// Stats that are present, finite and in range.
    #[must_use]
    pub fn valid_features(&self) -> Option<FeatureVector> {
        self.features.filter(|f| f.validate().is_ok())
    }
}
