//! Bagged ensemble of decision trees (random forest).
//!
//! Every tree is grown on a bootstrap sample (`n` draws with replacement from
//! `n` training samples) and examines a random subset of features at each
//! split. The forest's probability is the mean of its trees' leaf
//! probabilities; a sample is classified positive when that mean is strictly
//! greater than one half.
//!
//! # Reproducibility
//!
//! One generator seeded with [`ForestParams::seed`] draws a seed for every
//! tree up front. Trees are then grown in parallel, each from its own seed, so
//! the fitted forest does not depend on thread scheduling.

use std::thread;

use rand::{Rng, SeedableRng as _};
use rand_pcg::Pcg64;
use serde::{Deserialize, Serialize};

use crate::{
    dataset::{ENCODED_LEN, EncodedFeatures},
    tree::{DecisionTree, TreeParams},
};

/// Forest hyperparameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestParams {
    /// Number of trees in the ensemble
    pub trees: usize,
    /// Features examined per split
    pub max_features: usize,
    /// Depth cap for every tree
    pub max_depth: usize,
    /// Seed from which all tree seeds are drawn
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            trees: 100,
            max_features: default_max_features(),
            max_depth: 32,
            seed: 42,
        }
    }
}

/// `floor(sqrt(feature count))`, at least one.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
fn default_max_features() -> usize {
    ((ENCODED_LEN as f64).sqrt() as usize).max(1)
}

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ForestError {
    #[display("cannot train on an empty data set")]
    EmptyTrainingSet,
    #[display("forest needs at least one tree")]
    NoTrees,
}

/// A fitted random forest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    params: ForestParams,
    trees: Vec<DecisionTree>,
}

impl RandomForest {
    /// Fits a forest on encoded samples `x` with labels `y`.
    ///
    /// # Panics
    ///
    /// Panics if `x` and `y` have different lengths.
    pub fn fit(
        x: &[EncodedFeatures],
        y: &[bool],
        params: ForestParams,
    ) -> Result<Self, ForestError> {
        assert_eq!(x.len(), y.len(), "features and labels must have the same length");
        if x.is_empty() {
            return Err(ForestError::EmptyTrainingSet);
        }
        if params.trees == 0 {
            return Err(ForestError::NoTrees);
        }

        let mut rng = Pcg64::seed_from_u64(params.seed);
        let seeds = (0..params.trees).map(|_| rng.random()).collect::<Vec<u64>>();
        let tree_params = TreeParams {
            max_features: params.max_features,
            max_depth: params.max_depth,
        };

        let workers = thread::available_parallelism().map_or(1, usize::from);
        let chunk_len = seeds.len().div_ceil(workers);
        let trees = thread::scope(|s| {
            let handles = seeds
                .chunks(chunk_len)
                .map(|chunk| {
                    s.spawn(move || {
                        chunk
                            .iter()
                            .map(|&seed| grow_tree(x, y, seed, tree_params))
                            .collect::<Vec<_>>()
                    })
                })
                .collect::<Vec<_>>();
            handles
                .into_iter()
                .flat_map(|h| h.join().expect("tree worker panicked"))
                .collect::<Vec<_>>()
        });

        log::debug!(
            "grew {} trees, {} nodes in total",
            trees.len(),
            trees.iter().map(DecisionTree::node_count).sum::<usize>()
        );
        Ok(Self { params, trees })
    }

    #[must_use]
    pub fn params(&self) -> &ForestParams {
        &self.params
    }

    #[must_use]
    pub fn trees(&self) -> &[DecisionTree] {
        &self.trees
    }

    /// Mean positive-class probability across trees.
    #[must_use]
    pub fn predict_probability(&self, x: &EncodedFeatures) -> f64 {
        #[expect(clippy::cast_precision_loss)]
        let n = self.trees.len() as f64;
        self.trees
            .iter()
            .map(|tree| tree.predict_probability(x))
            .sum::<f64>()
            / n
    }

    #[must_use]
    pub fn predict(&self, x: &EncodedFeatures) -> bool {
        self.predict_probability(x) > 0.5
    }
}

fn grow_tree(x: &[EncodedFeatures], y: &[bool], seed: u64, params: TreeParams) -> DecisionTree {
    let mut rng = Pcg64::seed_from_u64(seed);
    let mut bootstrap = (0..x.len())
        .map(|_| rng.random_range(0..x.len()))
        .collect::<Vec<_>>();
    DecisionTree::fit(x, y, &mut bootstrap, params, &mut rng)
}
