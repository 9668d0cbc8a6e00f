//! CART decision tree for binary classification.
//!
//! Trees are grown greedily with Gini impurity:
//!
//! - At each node a random subset of `max_features` features is examined; if
//!   none of them can split the node (all constant), the remaining features are
//!   examined too
//! - For a feature, candidate thresholds are the midpoints between adjacent
//!   distinct values; samples `<= threshold` go left
//! - The split with the lowest weighted child impurity wins (first found on ties)
//! - A node becomes a leaf when it is pure, has fewer than two samples, cannot
//!   be split, or reaches `max_depth`
//!
//! Leaves store the fraction of positive samples that reached them.
//! Duplicated sample indices (as produced by bootstrapping) act as weights.

use rand::{Rng, seq::SliceRandom};
use serde::{Deserialize, Serialize};

use crate::dataset::{ENCODED_LEN, EncodedFeatures};

/// Growth limits of a single tree.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TreeParams {
    /// Features examined per split before falling back to the rest
    pub max_features: usize,
    /// Maximum depth; the root is depth 0
    pub max_depth: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum Node {
    Leaf {
        probability: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// A fitted decision tree, stored as a flat node arena rooted at index 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    nodes: Vec<Node>,
}

struct Split {
    feature: usize,
    threshold: f64,
    impurity: f64,
}

impl DecisionTree {
    /// Grows a tree on the samples selected by `indices`.
    ///
    /// # Panics
    ///
    /// Panics if `indices` is empty or refers outside `x`/`y`.
    pub fn fit<R>(
        x: &[EncodedFeatures],
        y: &[bool],
        indices: &mut [usize],
        params: TreeParams,
        rng: &mut R,
    ) -> Self
    where
        R: Rng + ?Sized,
    {
        assert!(!indices.is_empty(), "cannot grow a tree without samples");
        assert_eq!(x.len(), y.len());

        let mut tree = Self { nodes: vec![] };
        tree.grow(x, y, indices, 0, params, rng);
        tree
    }

    fn grow<R>(
        &mut self,
        x: &[EncodedFeatures],
        y: &[bool],
        indices: &mut [usize],
        depth: usize,
        params: TreeParams,
        rng: &mut R,
    ) -> usize
    where
        R: Rng + ?Sized,
    {
        let id = self.nodes.len();
        let positives = indices.iter().filter(|&&i| y[i]).count();
        #[expect(clippy::cast_precision_loss)]
        let probability = positives as f64 / indices.len() as f64;
        self.nodes.push(Node::Leaf { probability });

        let pure = positives == 0 || positives == indices.len();
        if pure || indices.len() < 2 || depth >= params.max_depth {
            return id;
        }
        let Some(split) = best_split(x, y, indices, params.max_features, rng) else {
            return id;
        };

        let mid = partition(indices, |i| x[i][split.feature] <= split.threshold);
        let (left_indices, right_indices) = indices.split_at_mut(mid);
        let left = self.grow(x, y, left_indices, depth + 1, params, rng);
        let right = self.grow(x, y, right_indices, depth + 1, params, rng);
        self.nodes[id] = Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
        };
        id
    }

    /// Fraction of positive training samples in the leaf `x` falls into.
    #[must_use]
    pub fn predict_probability(&self, x: &EncodedFeatures) -> f64 {
        let mut id = 0;
        loop {
            match self.nodes[id] {
                Node::Leaf { probability } => return probability,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => id = if x[feature] <= threshold { left } else { right },
            }
        }
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        fn depth_of(nodes: &[Node], id: usize) -> usize {
            match nodes[id] {
                Node::Leaf { .. } => 0,
                Node::Split { left, right, .. } => {
                    1 + depth_of(nodes, left).max(depth_of(nodes, right))
                }
            }
        }
        depth_of(&self.nodes, 0)
    }
}

fn gini(positives: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    #[expect(clippy::cast_precision_loss)]
    let p = positives as f64 / total as f64;
    2.0 * p * (1.0 - p)
}

fn best_split<R>(
    x: &[EncodedFeatures],
    y: &[bool],
    indices: &[usize],
    max_features: usize,
    rng: &mut R,
) -> Option<Split>
where
    R: Rng + ?Sized,
{
    let mut features: [usize; ENCODED_LEN] = std::array::from_fn(|i| i);
    features.shuffle(rng);

    let mut best: Option<Split> = None;
    for (examined, &feature) in features.iter().enumerate() {
        if examined >= max_features.max(1) && best.is_some() {
            break;
        }
        if let Some(split) = best_split_on(x, y, indices, feature)
            && best.as_ref().is_none_or(|b| split.impurity < b.impurity)
        {
            best = Some(split);
        }
    }
    best
}

fn best_split_on(
    x: &[EncodedFeatures],
    y: &[bool],
    indices: &[usize],
    feature: usize,
) -> Option<Split> {
    let mut sorted = indices
        .iter()
        .map(|&i| (x[i][feature], y[i]))
        .collect::<Vec<_>>();
    sorted.sort_by(|a, b| a.0.total_cmp(&b.0));

    let total = sorted.len();
    let total_positives = sorted.iter().filter(|(_, label)| *label).count();

    let mut best: Option<Split> = None;
    let mut left_positives = 0;
    for i in 1..total {
        if sorted[i - 1].1 {
            left_positives += 1;
        }
        let (prev, cur) = (sorted[i - 1].0, sorted[i].0);
        if prev >= cur {
            continue;
        }
        let right_positives = total_positives - left_positives;
        #[expect(clippy::cast_precision_loss)]
        let impurity = (i as f64 * gini(left_positives, i)
            + (total - i) as f64 * gini(right_positives, total - i))
            / total as f64;
        if best.as_ref().is_none_or(|b| impurity < b.impurity) {
            let mut threshold = prev / 2.0 + cur / 2.0;
            // keep the split effective when the midpoint rounds up to `cur`
            if threshold >= cur {
                threshold = prev;
            }
            best = Some(Split {
                feature,
                threshold,
                impurity,
            });
        }
    }
    best
}

/// Reorders `indices` so that elements satisfying `pred` come first and
/// returns how many do.
fn partition<F>(indices: &mut [usize], pred: F) -> usize
where
    F: Fn(usize) -> bool,
{
    let mut mid = 0;
    for i in 0..indices.len() {
        if pred(indices[i]) {
            indices.swap(i, mid);
            mid += 1;
        }
    }
    mid
}
