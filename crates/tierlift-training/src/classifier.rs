//! Promotion-readiness classifier.
//!
//! Training:
//!
//! 1. Shuffle the labeled samples with the forest seed and hold out
//!    [`ClassifierParams::test_fraction`] of them
//! 2. Fit a [`RandomForest`] on the remaining samples
//! 3. Score the held-out samples into an [`Evaluation`]
//!
//! The held-out evaluation is reported, never used to select anything.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tierlift_core::{FeatureVector, Tier};

use crate::{
    dataset::{self, LabeledSample},
    evaluation::Evaluation,
    forest::{ForestError, ForestParams, RandomForest},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierParams {
    pub forest: ForestParams,
    /// Fraction of samples held out for evaluation
    pub test_fraction: f64,
}

impl Default for ClassifierParams {
    fn default() -> Self {
        Self {
            forest: ForestParams::default(),
            test_fraction: 0.2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum TrainError {
    #[display("no labeled samples to train on")]
    NoSamples,
    #[display("failed to fit forest")]
    Forest(ForestError),
}

/// Trains [`TrainedClassifier`]s.
#[derive(Debug, Clone, Default)]
pub struct PromotionClassifier {
    params: ClassifierParams,
}

impl PromotionClassifier {
    #[must_use]
    pub fn new(params: ClassifierParams) -> Self {
        Self { params }
    }

    #[must_use]
    pub fn params(&self) -> &ClassifierParams {
        &self.params
    }

    pub fn train(&self, samples: &[LabeledSample]) -> Result<TrainedClassifier, TrainError> {
        if samples.is_empty() {
            return Err(TrainError::NoSamples);
        }
        let positives = samples.iter().filter(|s| s.promotion_ready).count();
        if positives == 0 || positives == samples.len() {
            log::warn!(
                "all {} samples share one label; the classifier will always predict it",
                samples.len()
            );
        }

        let (train, test) =
            dataset::train_test_split(samples, self.params.test_fraction, self.params.forest.seed);
        log::info!(
            "training on {} samples, holding out {} ({positives} ready overall)",
            train.len(),
            test.len()
        );

        let x = train.iter().map(LabeledSample::encode).collect::<Vec<_>>();
        let y = train.iter().map(|s| s.promotion_ready).collect::<Vec<_>>();
        let forest =
            RandomForest::fit(&x, &y, self.params.forest.clone()).map_err(TrainError::Forest)?;

        let evaluation = Evaluation::from_pairs(
            test.iter()
                .map(|s| (forest.predict(&s.encode()), s.promotion_ready)),
        );
        match evaluation.accuracy() {
            Some(accuracy) => log::info!("held-out accuracy: {:.3}", accuracy),
            None => log::warn!("no held-out samples; accuracy not measured"),
        }

        Ok(TrainedClassifier {
            trained_at: Utc::now(),
            params: self.params.clone(),
            training_samples: train.len(),
            evaluation,
            forest,
        })
    }
}

/// A fitted classifier together with how it was trained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainedClassifier {
    pub trained_at: DateTime<Utc>,
    pub params: ClassifierParams,
    pub training_samples: usize,
    pub evaluation: Evaluation,
    pub forest: RandomForest,
}

impl TrainedClassifier {
    #[must_use]
    pub fn predict_probability(&self, features: &FeatureVector, tier: Tier) -> f64 {
        self.forest
            .predict_probability(&dataset::encode(features, tier))
    }

    /// Whether the player is predicted promotion-ready.
    #[must_use]
    pub fn predict(&self, features: &FeatureVector, tier: Tier) -> bool {
        self.forest.predict(&dataset::encode(features, tier))
    }
}
