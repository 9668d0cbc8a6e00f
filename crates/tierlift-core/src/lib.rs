//! Core data model for player performance tracking.
//!
//! Everything the training pipeline and the request-time advisor exchange is
//! defined here:
//!
//! - [`Tier`] - the seven ordinal skill brackets, Bronze through Grandmaster
//! - [`Stat`] - the five tracked stats, in tie-breaking priority order
//! - [`FeatureVector`] - one measurement of the five stats
//! - [`StatRecord`] - a feature vector tagged with tier and timestamp
//! - [`TierStandard`] / [`TierStandards`] - per-tier benchmark vectors
//! - [`PlayerSubmission`] - the loosely-typed inbound payload, validated into
//!   a [`ValidatedSubmission`]
//!
//! Validation failures are reported as [`ValidationError`].

pub use self::{
    error::ValidationError,
    features::FeatureVector,
    record::StatRecord,
    standard::{TierStandard, TierStandards},
    stat::Stat,
    submission::{PlayerSubmission, ValidatedSubmission},
    tier::{Tier, TierParsing},
};

mod error;
mod features;
mod record;
mod standard;
mod stat;
mod submission;
mod tier;
