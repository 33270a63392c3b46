//! Polytropic EOS `P = K ρ^γ`.

use crate::error::{EosError, EosResult};
use crate::model::validation::{validate_density, validate_pressure};
use crate::model::{Eos, EosSample};
use pl_core::constants::k_wd;

/// Barotropic layer with a power-law pressure-density relation.
///
/// Temperature plays no role; the integrator's temperature is echoed back.
#[derive(Clone, Debug, PartialEq)]
pub struct Polytrope {
    name: String,
    k: f64,
    gamma: f64,
}

impl Polytrope {
    pub fn new(name: impl Into<String>, k: f64, gamma: f64) -> EosResult<Self> {
        if !k.is_finite() || k <= 0.0 {
            return Err(EosError::InvalidArg {
                what: "polytropic constant must be positive and finite",
            });
        }
        if !gamma.is_finite() || gamma <= 0.0 {
            return Err(EosError::InvalidArg {
                what: "polytropic exponent must be positive and finite",
            });
        }
        Ok(Self {
            name: name.into(),
            k,
            gamma,
        })
    }

    /// Cold degenerate electron gas, `P = K_WD ρ^(5/3)`.
    pub fn white_dwarf() -> Self {
        Self {
            name: "degenerate electron gas".to_string(),
            k: k_wd(),
            gamma: 5.0 / 3.0,
        }
    }

    /// Polytrope of index `n`, i.e. `γ = 1 + 1/n`.
    pub fn with_index(name: impl Into<String>, k: f64, n: f64) -> EosResult<Self> {
        if !n.is_finite() || n <= 0.0 {
            return Err(EosError::InvalidArg {
                what: "polytropic index must be positive and finite",
            });
        }
        Self::new(name, k, 1.0 + 1.0 / n)
    }

    pub fn k(&self) -> f64 {
        self.k
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }
}

impl Eos for Polytrope {
    fn name(&self) -> &str {
        &self.name
    }

    fn at_density(&self, rho: f64, t: f64) -> EosResult<EosSample> {
        validate_density(rho)?;
        let pressure = self.k * rho.powf(self.gamma);
        Ok(EosSample {
            density: rho,
            pressure,
            temperature: t,
            dp_drho: self.gamma * pressure / rho,
        })
    }

    fn at_pressure(&self, p: f64, t: f64) -> EosResult<EosSample> {
        validate_pressure(p)?;
        let rho = (p / self.k).powf(1.0 / self.gamma);
        Ok(EosSample {
            density: rho,
            pressure: p,
            temperature: t,
            dp_drho: self.gamma * p / rho,
        })
    }
}
