//! Integration settings.

use crate::error::{StructureError, StructureResult};
use serde::{Deserialize, Serialize};

/// Options for a structure integration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegratorConfig {
    /// Fixed radial step (m)
    pub step: f64,
    /// Integration stops once pressure falls to this value (Pa)
    pub surface_pressure: f64,
    /// Safety limit on radius (m)
    pub max_radius: f64,
    /// Safety limit on step count
    pub max_steps: usize,
}

impl Default for IntegratorConfig {
    fn default() -> Self {
        Self {
            step: 1.0e3,
            surface_pressure: 1.0e5,
            max_radius: 2.0e8,
            max_steps: 1_000_000,
        }
    }
}

impl IntegratorConfig {
    /// Parse a YAML document. Missing keys take their defaults.
    pub fn from_yaml(text: &str) -> StructureResult<Self> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> StructureResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> StructureResult<()> {
        if !(self.step.is_finite() && self.step > 0.0) {
            return Err(StructureError::InvalidArg {
                what: "step must be positive and finite",
            });
        }
        if !(self.surface_pressure.is_finite() && self.surface_pressure >= 0.0) {
            return Err(StructureError::InvalidArg {
                what: "surface pressure must be non-negative and finite",
            });
        }
        if !(self.max_radius > self.step) {
            return Err(StructureError::InvalidArg {
                what: "max_radius must exceed the step",
            });
        }
        if self.max_steps == 0 {
            return Err(StructureError::InvalidArg {
                what: "max_steps must be positive",
            });
        }
        Ok(())
    }
}
