//! Classifier inputs: labeled samples, feature encoding and held-out splits.

use rand::{SeedableRng as _, seq::SliceRandom};
use rand_pcg::Pcg64;
use tierlift_core::{FeatureVector, Stat, Tier};

/// Number of encoded classifier features: the five stats plus the tier rank.
pub const ENCODED_LEN: usize = Stat::LEN + 1;

/// Encoded classifier input.
pub type EncodedFeatures = [f64; ENCODED_LEN];

/// Encodes stats and tier for the classifier.
///
/// The tier is a single ordinal feature (Bronze = 0 ... Grandmaster = 6), not
/// a one-hot block, so tree splits can separate low and high tiers with one
/// threshold.
#[must_use]
pub fn encode(features: &FeatureVector, tier: Tier) -> EncodedFeatures {
    let mut encoded = [0.0; ENCODED_LEN];
    encoded[..Stat::LEN].copy_from_slice(&features.to_array());
    encoded[Stat::LEN] = f64::from(tier.rank());
    encoded
}

/// A historical record with its promotion label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabeledSample {
    pub features: FeatureVector,
    pub tier: Tier,
    pub promotion_ready: bool,
}

impl LabeledSample {
    #[must_use]
    pub fn encode(&self) -> EncodedFeatures {
        encode(&self.features, self.tier)
    }
}

/// Shuffles `samples` with a seeded generator and splits off a test set.
///
/// The test set holds `ceil(len * test_fraction)` samples, clamped so that
/// the training set keeps at least one sample when there is any data.
///
/// # Panics
///
/// Panics if `test_fraction` is not within `0.0..1.0`.
#[must_use]
pub fn train_test_split<T>(samples: &[T], test_fraction: f64, seed: u64) -> (Vec<T>, Vec<T>)
where
    T: Clone,
{
    assert!(
        (0.0..1.0).contains(&test_fraction),
        "test fraction must be within 0.0..1.0"
    );

    let mut shuffled = samples.to_vec();
    shuffled.shuffle(&mut Pcg64::seed_from_u64(seed));

    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss
    )]
    let test_len = ((shuffled.len() as f64 * test_fraction).ceil() as usize)
        .min(shuffled.len().saturating_sub(1));

    let train = shuffled.split_off(test_len);
    (train, shuffled)
}
