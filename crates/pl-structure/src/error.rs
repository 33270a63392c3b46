//! Error types for structure integration.

use pl_core::CoreError;
use pl_eos::EosError;
use thiserror::Error;

/// Errors encountered while building or integrating a planet.
#[derive(Error, Debug)]
pub enum StructureError {
    #[error("EOS error: {0}")]
    Eos(#[from] EosError),

    #[error("Core error: {0}")]
    Core(#[from] CoreError),

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Non-physical condition: {what}")]
    NonPhysical { what: &'static str },

    /// Integration passed the configured maximum radius before reaching the surface.
    #[error("Radius limit {max_radius:e} m reached after {steps} steps without finding the surface")]
    RadiusLimit { max_radius: f64, steps: usize },

    /// Integration used up the configured step budget.
    #[error("Step limit of {max_steps} reached at r = {radius:e} m")]
    StepLimit { max_steps: usize, radius: f64 },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type StructureResult<T> = Result<T, StructureError>;
