//! Offline training: tier standards, promotion labels and the readiness classifier.
//!
//! This crate turns a historical population of player records into the two
//! artifacts the advisor serves from: per-tier [`TierStandards`] and a
//! [`TrainedClassifier`].
//!
//! # How Training Works
//!
//! 1. **Standards** - For each tier, cluster the standardized stats with
//!    k-means and keep the centroid with the highest K/D ratio
//! 2. **Labels** - Mark each record promotion-ready when every stat meets its
//!    tier's standard
//! 3. **Classifier** - Fit a random forest on the stats plus tier rank,
//!    holding out a fifth of the samples for evaluation
//!
//! # Architecture
//!
//! ```text
//! Historical records
//!     ↓ clustered by (standards, kmeans)
//! Tier standards
//!     ↓ compared against (labels)
//! Labeled samples
//!     ↓ encoded and split (dataset)
//! Random forest (forest, tree)
//!     ↓ scored on held-out samples (evaluation)
//! Trained classifier (classifier)
//! ```
//!
//! # Determinism
//!
//! Every randomized step draws from a [`rand_pcg::Pcg64`] seeded from the
//! parameters ([`KMeansParams::seed`], [`ForestParams::seed`]), so the same
//! input and parameters always produce the same artifacts.
//!
//! # Example
//!
//! ```rust,ignore
//! use tierlift_training::{
//!     classifier::PromotionClassifier, labels, standards::TierStandardBuilder,
//! };
//! # let mut population = todo!();
//!
//! let standards = TierStandardBuilder::default().build(&population)?;
//! let labels = labels::label_population(&population, &standards)?;
//! for (record, label) in population.iter_mut().zip(labels) {
//!     record.promotion_ready = label;
//! }
//! let classifier = PromotionClassifier::default().train(&labels::labeled_samples(&population))?;
//! ```
//!
//! [`TierStandards`]: tierlift_core::TierStandards
//! [`TrainedClassifier`]: classifier::TrainedClassifier
//! [`KMeansParams::seed`]: kmeans::KMeansParams::seed
//! [`ForestParams::seed`]: forest::ForestParams::seed

pub mod classifier;
pub mod dataset;
pub mod evaluation;
pub mod forest;
pub mod kmeans;
pub mod labels;
pub mod population;
pub mod standards;
pub mod tree;
