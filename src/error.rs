//! Error types for model construction and solving.
//!
//! Infeasible, unbounded and limit-reached outcomes are *not* errors: they
//! are reported through [`SolveStatus`](crate::solution::SolveStatus). Only
//! malformed input and numerical breakdowns surface as [`SolveError`].

use thiserror::Error;

/// Result type for engine operations.
pub type SolveResult<T> = Result<T, SolveError>;

/// A model is malformed. Detected before any pivoting begins.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Two variables share a name.
    #[error("duplicate variable name `{0}`")]
    DuplicateVariable(String),

    /// Two constraints share a name.
    #[error("duplicate constraint name `{0}`")]
    DuplicateConstraint(String),

    /// A document refers to a variable name the model does not declare.
    #[error("unknown variable `{name}` referenced in {context}")]
    UnknownVariable { name: String, context: String },

    /// A [`VarId`](crate::model::VarId) does not belong to the model.
    #[error("variable index {index} is out of range in {context}")]
    UnknownVariableIndex { index: usize, context: String },

    /// Lower bound above upper bound, `+inf` lower or `-inf` upper bound.
    #[error("variable `{name}` has invalid bounds [{lower}, {upper}]")]
    InvalidBounds { name: String, lower: f64, upper: f64 },

    /// NaN or infinite coefficient, constant or right-hand side.
    #[error("non-finite value in {0}")]
    NonFinite(String),

    /// Variable or constraint declared with an empty name.
    #[error("empty {0} name")]
    EmptyName(&'static str),
}

/// Errors that abort a solve call.
#[derive(Debug, Error)]
pub enum SolveError {
    /// The model failed validation.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Pivoting broke down (near-zero pivot, non-finite tableau entry).
    ///
    /// Fatal for the call; no retry beyond the built-in Bland's-rule switch.
    #[error("numerical error: {0}")]
    Numerical(String),

    /// [`SolveOptions::validate`](crate::options::SolveOptions::validate) rejected the options.
    #[error("invalid solve options: {0}")]
    InvalidOptions(String),

    /// The external adapter was requested but none is configured.
    #[error("external solver unavailable: {0}")]
    ExternalUnavailable(String),

    /// The external adapter reported an internal failure.
    #[error("external solver failed: {0}")]
    External(String),

    /// A JSON document could not be parsed.
    #[cfg(feature = "serde")]
    #[error("malformed document: {0}")]
    Document(#[from] serde_json::Error),
}

impl SolveError {
    /// Snake-case status code surfaced to callers for this failure.
    pub fn status_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::Numerical(_) => "numerical_error",
            Self::InvalidOptions(_) => "invalid_options",
            Self::ExternalUnavailable(_) | Self::External(_) => "external_error",
            #[cfg(feature = "serde")]
            Self::Document(_) => "validation_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message() {
        let err = ValidationError::InvalidBounds {
            name: "x".into(),
            lower: 5.0,
            upper: 3.0,
        };
        assert_eq!(err.to_string(), "variable `x` has invalid bounds [5, 3]");
    }

    #[test]
    fn test_from_validation() {
        let err: SolveError = ValidationError::DuplicateVariable("y".into()).into();
        assert_eq!(err.status_code(), "validation_error");
        assert!(err.to_string().contains("duplicate variable name `y`"));
    }

    #[test]
    fn test_numerical_status_code() {
        let err = SolveError::Numerical("pivot too small".into());
        assert_eq!(err.status_code(), "numerical_error");
    }
}
