use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{FeatureVector, Tier};

/// One player's measured performance at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatRecord {
    #[serde(flatten)]
    pub features: FeatureVector,
    pub tier: Tier,
    pub timestamp: DateTime<Utc>,
}

impl StatRecord {
    #[must_use]
    pub fn new(features: FeatureVector, tier: Tier, timestamp: DateTime<Utc>) -> Self {
        Self {
            features,
            tier,
            timestamp,
        }
    }
}
