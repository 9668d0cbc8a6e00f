use crate::Stat;

/// Rejected input: a required stat is missing, malformed or out of range.
///
/// Raised before any computation takes place.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ValidationError {
    #[display("missing required field '{field}'")]
    MissingField {
        #[error(not(source))]
        field: &'static str,
    },
    #[display("{stat} must be a finite number, got {value}")]
    NotFinite { stat: Stat, value: f64 },
    #[display("{stat} must be within {min}..={max}, got {value}")]
    OutOfRange {
        stat: Stat,
        value: f64,
        min: f64,
        max: f64,
    },
    #[display("unknown tier '{label}'")]
    UnknownTier {
        #[error(not(source))]
        label: String,
    },
}
