//! Request-time advice: feedback, readiness and weekly goals.
//!
//! The [`Engine`] answers requests from the artifacts currently held by an
//! [`ArtifactStore`]:
//!
//! - **Submit** - validate stats, select [`Feedback`], predict readiness and
//!   forward named players' assessments to a [`ProfileHistory`]
//! - **Standard lookup** - the standard of one tier
//! - **Weekly goal** - the weakest stat of the player's last
//!   [`goal::WINDOW_DAYS`] days against their tier's standard
//!
//! Failures are reported as [`EngineError`], each with an [`ErrorStatus`].
//!
//! [`Feedback`]: feedback::Feedback
//! [`ProfileHistory`]: history::ProfileHistory

pub use self::{
    engine::{Assessment, Engine},
    error::{EngineError, ErrorStatus},
    store::{ArtifactStore, Artifacts},
};

mod engine;
mod error;
pub mod feedback;
pub mod goal;
pub mod history;
mod store;
