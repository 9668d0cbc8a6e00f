use serde::Serialize;
use tierlift_core::{Tier, ValidationError};
use tierlift_training::standards::BuildStandardsError;

use crate::{goal::GoalError, history::HistoryError};

/// Coarse outcome class of a failed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, derive_more::Display)]
#[serde(rename_all = "snake_case")]
pub enum ErrorStatus {
    /// The caller sent something unusable
    #[display("bad input")]
    BadInput,
    /// The requested data does not exist
    #[display("not found")]
    NotFound,
    /// The engine cannot serve the request yet
    #[display("service not ready")]
    ServiceNotReady,
}

/// Failure of an [`Engine`](crate::Engine) operation.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum EngineError {
    #[display("invalid submission")]
    Validation(ValidationError),
    #[display("not enough data to build standards")]
    DataInsufficient(BuildStandardsError),
    #[display("failed to cluster the population")]
    Clustering(BuildStandardsError),
    #[display("no standard available for tier {tier}")]
    StandardNotFound { tier: Tier },
    #[display("no recent stats to analyze")]
    NoRecentData,
    #[display("{artifact} is not loaded")]
    ModelUnavailable {
        #[error(not(source))]
        artifact: &'static str,
    },
    #[display("profile history unavailable")]
    History(HistoryError),
}

impl EngineError {
    #[must_use]
    pub fn status(&self) -> ErrorStatus {
        match self {
            Self::Validation(_) | Self::DataInsufficient(_) => ErrorStatus::BadInput,
            Self::StandardNotFound { .. } | Self::NoRecentData => ErrorStatus::NotFound,
            Self::Clustering(_) | Self::ModelUnavailable { .. } | Self::History(_) => {
                ErrorStatus::ServiceNotReady
            }
        }
    }
}

impl From<ValidationError> for EngineError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err)
    }
}

impl From<BuildStandardsError> for EngineError {
    fn from(err: BuildStandardsError) -> Self {
        match err {
            BuildStandardsError::DataInsufficient { .. } => Self::DataInsufficient(err),
            BuildStandardsError::Clustering { .. } => Self::Clustering(err),
        }
    }
}

impl From<GoalError> for EngineError {
    fn from(err: GoalError) -> Self {
        match err {
            GoalError::NoRecentData => Self::NoRecentData,
            GoalError::StandardNotFound { tier } => Self::StandardNotFound { tier },
        }
    }
}

impl From<HistoryError> for EngineError {
    fn from(err: HistoryError) -> Self {
        Self::History(err)
    }
}
