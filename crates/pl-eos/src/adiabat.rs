//! HHe envelope held at constant specific entropy.

use crate::error::EosResult;
use crate::inverter::{HHeEos, SolveOutcome};
use crate::model::validation::{validate_density, validate_entropy, validate_pressure, validate_sample};
use crate::model::{Eos, EosSample};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

/// Multiplicative factors converting HHe table units to SI.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableUnits {
    /// Table pressure × factor = Pa
    pub pressure_to_si: f64,
    /// Table density × factor = kg/m³
    pub density_to_si: f64,
    /// Table temperature × factor = K
    pub temperature_to_si: f64,
}

impl Default for TableUnits {
    /// CGS tables: dyn/cm², g/cm³, K.
    fn default() -> Self {
        Self {
            pressure_to_si: 0.1,
            density_to_si: 1000.0,
            temperature_to_si: 1.0,
        }
    }
}

/// Isentropic HHe layer.
///
/// Entering the layer at a given pressure goes through the 2D Newton solve;
/// stepping through it at a given density follows the isentrope in
/// temperature. The table set is shared, so many layers (or many parallel
/// solves) can use one `HHeEos`.
#[derive(Clone, Debug)]
pub struct HHeAdiabat {
    name: String,
    eos: Arc<HHeEos>,
    entropy: f64,
    units: TableUnits,
}

impl HHeAdiabat {
    pub fn new(eos: Arc<HHeEos>, entropy: f64) -> EosResult<Self> {
        Self::with_units(eos, entropy, TableUnits::default())
    }

    pub fn with_units(eos: Arc<HHeEos>, entropy: f64, units: TableUnits) -> EosResult<Self> {
        validate_entropy(entropy)?;
        Ok(Self {
            name: format!("HHe adiabat (S = {entropy})"),
            eos,
            entropy,
            units,
        })
    }

    pub fn entropy(&self) -> f64 {
        self.entropy
    }

    pub fn units(&self) -> &TableUnits {
        &self.units
    }

    fn log_t_guess(&self, t: f64) -> f64 {
        if t.is_finite() && t > 0.0 {
            (t / self.units.temperature_to_si).log10()
        } else {
            self.eos.config().initial_log_temperature
        }
    }

    /// Convert a table-space dP/dρ slope to SI.
    fn slope_to_si(&self, slope: f64) -> f64 {
        slope * self.units.pressure_to_si / self.units.density_to_si
    }
}

impl Eos for HHeAdiabat {
    fn name(&self) -> &str {
        &self.name
    }

    fn at_density(&self, rho: f64, t: f64) -> EosResult<EosSample> {
        validate_density(rho)?;
        let step = self.eos.config().step;
        let log_rho = (rho / self.units.density_to_si).log10();

        let here = self.eos.isentrope(log_rho, self.entropy, self.log_t_guess(t))?;
        let next = self
            .eos
            .isentrope(log_rho + step, self.entropy, here.log_temperature)?;
        if here.outcome == SolveOutcome::LeftEnvelope {
            warn!(rho, entropy = self.entropy, "isentrope left the HHe table envelope");
        }

        let slope = (10f64.powf(next.log_pressure) - 10f64.powf(here.log_pressure))
            / (10f64.powf(log_rho + step) - 10f64.powf(log_rho));
        let sample = EosSample {
            density: rho,
            pressure: 10f64.powf(here.log_pressure) * self.units.pressure_to_si,
            temperature: 10f64.powf(here.log_temperature) * self.units.temperature_to_si,
            dp_drho: self.slope_to_si(slope),
        };
        validate_sample(&sample)?;
        Ok(sample)
    }

    fn at_pressure(&self, p: f64, _t: f64) -> EosResult<EosSample> {
        validate_pressure(p)?;
        let solution = self.eos.solve(p / self.units.pressure_to_si, self.entropy)?;
        if solution.outcome == SolveOutcome::LeftEnvelope {
            warn!(
                pressure = p,
                entropy = self.entropy,
                iterations = solution.iterations,
                "HHe solve left the table envelope; using the extrapolated estimate"
            );
        }
        let sample = EosSample {
            density: solution.density() * self.units.density_to_si,
            pressure: p,
            temperature: solution.temperature() * self.units.temperature_to_si,
            dp_drho: self.slope_to_si(solution.dp_drho_table),
        };
        validate_sample(&sample)?;
        Ok(sample)
    }
}
