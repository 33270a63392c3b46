//! Equation-of-state errors.

use crate::grid::Regime;
use pl_core::CoreError;
use thiserror::Error;

/// Result type for EOS operations.
pub type EosResult<T> = Result<T, EosError>;

/// Errors that can occur during EOS evaluation, inversion or table loading.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EosError {
    /// Non-physical values (negative density, pressure, etc.).
    #[error("Non-physical value for {what}")]
    NonPhysical { what: &'static str },

    /// Value out of valid range.
    #[error("Value out of range for {what}")]
    OutOfRange { what: &'static str },

    /// Invalid argument.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// Interpolation stencil would read outside the allocated grid.
    #[error("Query outside the {regime} table: stencil centre (row {row}, column {col})")]
    OutOfTable { regime: Regime, row: i64, col: i64 },

    /// Newton iteration ceiling exceeded.
    #[error(
        "Envelope iteration limit exceeded after {iterations} steps solving for P = {pressure:e}, S = {entropy}"
    )]
    IterationLimit {
        pressure: f64,
        entropy: f64,
        iterations: usize,
    },

    /// Isentrope iteration ceiling exceeded.
    #[error(
        "Isentrope iteration limit exceeded after {iterations} steps at log rho = {log_density}, S = {entropy}"
    )]
    IsentropeLimit {
        log_density: f64,
        entropy: f64,
        iterations: usize,
    },

    /// Malformed table stream.
    #[error("Malformed table ({what}): {detail}")]
    Table { what: &'static str, detail: String },

    /// Table file could not be read.
    #[error("Failed to read {path}: {message}")]
    Io { path: String, message: String },

    #[error("Core error: {0}")]
    Core(#[from] CoreError),
}

impl From<EosError> for CoreError {
    fn from(err: EosError) -> Self {
        match err {
            EosError::InvalidArg { what } => CoreError::InvalidArg { what },
            EosError::Core(inner) => inner,
            other => CoreError::Invariant {
                what: format!("EOS failure: {other}"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = EosError::OutOfTable {
            regime: Regime::High,
            row: 61,
            col: 3,
        };
        let msg = err.to_string();
        assert!(msg.contains("high-temperature"));
        assert!(msg.contains("row 61"));

        let err = EosError::IterationLimit {
            pressure: 1.0e7,
            entropy: 6.0,
            iterations: 10_001,
        };
        assert!(err.to_string().contains("iteration limit"));
    }

    #[test]
    fn error_to_core_error() {
        let err: CoreError = EosError::InvalidArg { what: "metals" }.into();
        assert!(matches!(err, CoreError::InvalidArg { what: "metals" }));

        let err: CoreError = EosError::NonPhysical { what: "density" }.into();
        assert!(matches!(err, CoreError::Invariant { .. }));
    }
}
