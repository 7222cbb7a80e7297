//! Error types in glmnet
//!

use thiserror::Error;

use ndarray::ShapeError;
pub type Result<T> = std::result::Result<T, ElasticNetError>;

/// Status code `elnet` reports when every penalty factor is negative
pub const STATUS_NEGATIVE_PENALTIES: i32 = 10000;
/// Status code `elnet` reports when no usable predictor has any variance
pub const STATUS_ZERO_VARIANCE: i32 = 7777;

/// Coarse classification of an [`ElasticNetError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Invalid arguments, detected before the solver runs
    Configuration,
    /// Invalid arguments the solver only detects while running
    SolverConfiguration,
    /// The solver exceeded its working memory (`memlimit`)
    ResourceExhausted,
    /// Any status code the solver does not document
    UnknownSolver,
}

#[derive(Error, Debug, Clone)]
pub enum ElasticNetError {
    #[error("largest must not exceed memlimit, but largest is {largest} and memlimit is {memlimit}")]
    LargestExceedsMemlimit { largest: usize, memlimit: usize },
    #[error("balance must be within [0.0, 1.0], but is {0}")]
    InvalidBalance(f64),
    #[error("cannot specify both lambdas and flmin")]
    ConflictingPath,
    #[error("the design matrix has no predictors")]
    NoPredictors,
    #[error("{what} should have length {expected}, but has length {actual}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("excluded predictor {index} is outside of 1..={n_predictors}")]
    InvalidExclusion { index: usize, n_predictors: usize },
    #[error("flmin {0} selects explicit lambdas, but none were given")]
    MissingLambdas(f64),
    #[error("{0} does not fit into a Fortran integer")]
    IntegerOverflow(usize),
    #[error("invalid ndarray shape {0}")]
    NdShape(#[from] ShapeError),
    #[error("cannot have max(penalties) < 0.0")]
    NegativePenalties,
    #[error("all used predictors have zero variance")]
    ZeroVariance,
    #[error("elnet ran out of working memory (error code {0})")]
    ResourceExhausted(i32),
    #[error("unknown elnet error: {0}")]
    UnknownSolver(i32),
    #[error("malformed elnet output: {0}")]
    MalformedOutput(String),
}

impl ElasticNetError {
    /// Translates a status code returned by `elnet`
    ///
    /// Returns `None` for the success code `0`.
    pub fn from_status(code: i32) -> Option<Self> {
        match code {
            0 => None,
            STATUS_NEGATIVE_PENALTIES => Some(ElasticNetError::NegativePenalties),
            STATUS_ZERO_VARIANCE => Some(ElasticNetError::ZeroVariance),
            code if code < STATUS_ZERO_VARIANCE => Some(ElasticNetError::ResourceExhausted(code)),
            code => Some(ElasticNetError::UnknownSolver(code)),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ElasticNetError::NegativePenalties | ElasticNetError::ZeroVariance => {
                ErrorKind::SolverConfiguration
            }
            ElasticNetError::ResourceExhausted(_) => ErrorKind::ResourceExhausted,
            ElasticNetError::UnknownSolver(_) | ElasticNetError::MalformedOutput(_) => {
                ErrorKind::UnknownSolver
            }
            _ => ErrorKind::Configuration,
        }
    }

    /// The raw solver status code, if the error originates from the solver
    pub fn status(&self) -> Option<i32> {
        match self {
            ElasticNetError::NegativePenalties => Some(STATUS_NEGATIVE_PENALTIES),
            ElasticNetError::ZeroVariance => Some(STATUS_ZERO_VARIANCE),
            ElasticNetError::ResourceExhausted(code) | ElasticNetError::UnknownSolver(code) => {
                Some(*code)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ElasticNetError, ErrorKind};

    #[test]
    fn success_is_not_an_error() {
        assert!(ElasticNetError::from_status(0).is_none());
    }

    #[test]
    fn documented_codes_are_solver_configuration() {
        for code in &[10000, 7777] {
            let err = ElasticNetError::from_status(*code).unwrap();
            assert_eq!(err.kind(), ErrorKind::SolverConfiguration);
            assert_eq!(err.status(), Some(*code));
        }
    }

    #[test]
    fn codes_below_7777_exhaust_memory() {
        for code in &[1, 5000, 7776, -3] {
            let err = ElasticNetError::from_status(*code).unwrap();
            assert_eq!(err.kind(), ErrorKind::ResourceExhausted);
            assert_eq!(err.status(), Some(*code));
        }
    }

    #[test]
    fn other_codes_are_unknown() {
        for code in &[7778, 9999, 10001, 99999] {
            let err = ElasticNetError::from_status(*code).unwrap();
            assert_eq!(err.kind(), ErrorKind::UnknownSolver);
            assert!(err.to_string().contains(&code.to_string()));
        }
    }

    #[test]
    fn local_errors_carry_no_status() {
        let err = ElasticNetError::InvalidBalance(1.1);
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert_eq!(err.status(), None);
        assert_eq!(
            ElasticNetError::ConflictingPath.to_string(),
            "cannot specify both lambdas and flmin"
        );
    }
}
