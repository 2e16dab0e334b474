use std::fmt;

use thiserror::Error;

pub type BallisticsResult<T> = Result<T, BallisticsError>;

/// What made an integration step numerically unusable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DivergenceCause {
    /// Velocity magnitude was exactly zero when the drag direction was needed.
    ZeroSpeed,
    /// Position or velocity became NaN or infinite.
    NonFiniteState,
}

impl fmt::Display for DivergenceCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DivergenceCause::ZeroSpeed => write!(f, "velocity magnitude is zero"),
            DivergenceCause::NonFiniteState => write!(f, "state is no longer finite"),
        }
    }
}

#[derive(Error, Debug)]
pub enum BallisticsError {
    #[error("Numeric divergence at step {step}: {cause}")]
    NumericDivergence { step: usize, cause: DivergenceCause },

    #[error("Invalid {name}: {value} (expected {expected})")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        expected: &'static str,
    },

    #[error("Projectile still airborne after {steps} steps")]
    StepLimitExceeded { steps: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Plot error: {0}")]
    Plot(String),
}

impl BallisticsError {
    pub fn is_divergence(&self) -> bool {
        matches!(self, BallisticsError::NumericDivergence { .. })
    }
}
