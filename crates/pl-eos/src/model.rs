//! EOS capability trait and validation helpers.

use crate::error::{EosError, EosResult};

/// Material state at one point of an EOS, in SI units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EosSample {
    /// Density [kg/m³]
    pub density: f64,

    /// Pressure [Pa]
    pub pressure: f64,

    /// Temperature [K]
    pub temperature: f64,

    /// Pressure derivative with respect to density along the layer's thermal path [m²/s²]
    pub dp_drho: f64,
}

impl EosSample {
    /// Return a summary string of all contained properties (for debugging).
    pub fn summary(&self) -> String {
        format!(
            "Sample(ρ={:.4e}kg/m³,P={:.4e}Pa,T={:.1}K,dP/dρ={:.4e}m²/s²)",
            self.density, self.pressure, self.temperature, self.dp_drho
        )
    }
}

/// Trait for layer equations of state.
///
/// Implementations must be thread-safe (Send + Sync) so a set of layers can be
/// shared read-only across parallel structure solves.
///
/// The temperature argument is the integrator's current temperature. Layers
/// with a fixed thermal path ignore it and echo it back; entropy-tagged
/// layers use it as a starting guess and report their own temperature.
pub trait Eos: Send + Sync {
    /// Get the model name (for debugging/logging).
    fn name(&self) -> &str;

    /// Evaluate pressure and dP/dρ at the given density.
    fn at_density(&self, rho: f64, t: f64) -> EosResult<EosSample>;

    /// Invert the EOS: density and dP/dρ at the given pressure.
    fn at_pressure(&self, p: f64, t: f64) -> EosResult<EosSample>;
}

/// Validation helpers for EOS inputs and outputs.
pub(crate) mod validation {
    use super::*;

    /// Ensure density is positive and finite.
    pub fn validate_density(rho: f64) -> EosResult<()> {
        if !rho.is_finite() || rho <= 0.0 {
            return Err(EosError::NonPhysical {
                what: "density must be positive and finite",
            });
        }
        Ok(())
    }

    /// Ensure pressure is positive and finite.
    pub fn validate_pressure(p: f64) -> EosResult<()> {
        if !p.is_finite() || p <= 0.0 {
            return Err(EosError::NonPhysical {
                what: "pressure must be positive and finite",
            });
        }
        Ok(())
    }

    /// Ensure entropy is positive and finite (it is inverted in log space).
    pub fn validate_entropy(s: f64) -> EosResult<()> {
        if !s.is_finite() || s <= 0.0 {
            return Err(EosError::NonPhysical {
                what: "entropy must be positive and finite",
            });
        }
        Ok(())
    }

    /// Ensure an outgoing sample is physically usable by the integrator.
    pub fn validate_sample(sample: &EosSample) -> EosResult<()> {
        validate_density(sample.density)?;
        validate_pressure(sample.pressure)?;
        if !sample.dp_drho.is_finite() || sample.dp_drho <= 0.0 {
            return Err(EosError::NonPhysical {
                what: "dP/drho must be positive and finite",
            });
        }
        Ok(())
    }
}
