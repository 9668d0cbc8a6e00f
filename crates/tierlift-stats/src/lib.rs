//! Statistical utilities for the tierlift workspace.
//!
//! This crate provides the small set of numeric tools the training pipeline
//! relies on:
//!
//! - **Descriptive statistics**: Calculate mean, median, variance, standard deviation, etc.
//! - **Standard scaling**: Fit per-column zero-mean / unit-variance transforms and invert them
//!
//! # Modules
//!
//! - [`descriptive`]: Descriptive statistics for summarizing datasets
//! - [`scaler`]: Column-wise standardization of row-major feature matrices
//!
//! # Examples
//!
//! ## Computing descriptive statistics
//!
//! ```
//! use tierlift_stats::descriptive::DescriptiveStats;
//!
//! let values = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let stats = DescriptiveStats::new(values).unwrap();
//! assert_eq!(stats.mean, 3.0);
//! ```
//!
//! ## Standardizing a feature matrix
//!
//! ```
//! use tierlift_stats::scaler::StandardScaler;
//!
//! let rows = [[1.0, 10.0], [3.0, 30.0]];
//! let scaler = StandardScaler::fit(&rows).unwrap();
//! let scaled = scaler.transform(&rows[0]);
//! assert_eq!(scaled, vec![-1.0, -1.0]);
//! assert_eq!(scaler.inverse_transform(&scaled), vec![1.0, 10.0]);
//! ```

pub mod descriptive;
pub mod scaler;
