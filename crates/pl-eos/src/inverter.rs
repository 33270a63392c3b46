//! Newton-Raphson inversion of the HHe tables: (P, S) → (ρ, T).
//!
//! The solve runs in log10 space on both sides. Each iteration looks the
//! tables up at the current point and at two forward-perturbed points, forms
//! a scaled Jacobian, solves the 2×2 system by Cramer's rule and applies a
//! damped step. Solver scratch lives in a [`SolverState`] created per call.

use crate::error::{EosError, EosResult};
use crate::grid::{HHeTables, Regime, TableSample};
use crate::jacobian::{cramer_step, log_scaled_jacobian};
use crate::model::validation::{validate_entropy, validate_pressure};
use crate::table::RawTable;
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Delta log(ρ) and log(T) used for finite differences.
pub const STEP: f64 = 0.01;
/// Required precision for log(ρ) and log(T).
pub const RT_PRECISION: f64 = 0.001;
/// Maximum Newton step in log(ρ) and log(T).
pub const STEP_SIZE: f64 = 0.1;
/// Maximum number of Newton iterations.
pub const MAX_STEP: usize = 10_000;

/// Pressure and entropy of the constructor's warm-up solve.
pub const WARMUP_PRESSURE: f64 = 1.0e7;
pub const WARMUP_ENTROPY: f64 = 6.0;

/// Newton solver configuration.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InverterConfig {
    /// Finite-difference step in log space
    pub step: f64,
    /// Convergence threshold on both log-space step magnitudes
    pub rt_precision: f64,
    /// Clamp on each log-space step
    pub step_size: f64,
    /// Iteration ceiling
    pub max_steps: usize,
    /// Starting log10 density
    pub initial_log_density: f64,
    /// Starting log10 temperature
    pub initial_log_temperature: f64,
    /// Below this log10 temperature the solve has left the tabulated envelope
    pub temperature_floor: f64,
    /// Determinant substituted when the Jacobian is exactly singular
    pub fallback_determinant: f64,
    /// Divisor applied to the linear dP/dρ slope
    pub dp_drho_scale: f64,
}

impl Default for InverterConfig {
    fn default() -> Self {
        Self {
            step: STEP,
            rt_precision: RT_PRECISION,
            step_size: STEP_SIZE,
            max_steps: MAX_STEP,
            initial_log_density: -3.1,
            initial_log_temperature: 3.95,
            temperature_floor: 0.5,
            // Unverified heuristic kept for compatibility.
            fallback_determinant: -0.001,
            dp_drho_scale: 1.0e12,
        }
    }
}

/// How a Newton solve ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolveOutcome {
    /// Both step magnitudes fell below the precision threshold.
    Converged,
    /// The temperature estimate dropped below the envelope floor. The returned
    /// point is an extrapolation outside the tabulated range.
    LeftEnvelope,
}

/// Mutable scratch of one solve.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SolverState {
    pub log_density: f64,
    pub log_temperature: f64,
    /// Sticky regime flag shared by every lookup of the solve.
    pub regime: Regime,
    /// Last scaled partials `[[dP/dρ, dP/dT], [dS/dρ, dS/dT]]`.
    pub partials: nalgebra::Matrix2<f64>,
}

impl SolverState {
    pub fn new(log_density: f64, log_temperature: f64) -> Self {
        Self {
            log_density,
            log_temperature,
            regime: Regime::High,
            partials: nalgebra::Matrix2::zeros(),
        }
    }
}

/// Result of [`HHeEos::solve`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HHeSolution {
    pub log_density: f64,
    pub log_temperature: f64,
    /// Linear-space dP/dρ from the final evaluations, in table units.
    pub dp_drho_table: f64,
    /// `dp_drho_table` divided by the configured unit scale.
    pub dp_drho: f64,
    pub outcome: SolveOutcome,
    pub iterations: usize,
    /// Regime in force when the loop exited.
    pub regime: Regime,
    /// Number of iterations that hit an exactly singular Jacobian.
    pub degenerate_jacobians: usize,
    /// Clamped `(Δ log ρ, Δ log T)` of the final iteration.
    pub last_step: [f64; 2],
}

impl HHeSolution {
    /// Density in table units.
    pub fn density(&self) -> f64 {
        10f64.powf(self.log_density)
    }

    /// Temperature in table units.
    pub fn temperature(&self) -> f64 {
        10f64.powf(self.log_temperature)
    }

    pub fn converged(&self) -> bool {
        self.outcome == SolveOutcome::Converged
    }
}

/// Result of [`HHeEos::isentrope`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IsentropeSolution {
    pub log_temperature: f64,
    pub log_pressure: f64,
    pub outcome: SolveOutcome,
    pub iterations: usize,
    pub regime: Regime,
}

/// Tabulated hydrogen-helium EOS with its Newton inverter.
#[derive(Clone, Debug)]
pub struct HHeEos {
    tables: HHeTables,
    config: InverterConfig,
    warmup: HHeSolution,
}

impl HHeEos {
    /// Wrap a table set and run the warm-up solve.
    pub fn new(tables: HHeTables) -> EosResult<Self> {
        Self::with_config(tables, InverterConfig::default())
    }

    pub fn with_config(tables: HHeTables, config: InverterConfig) -> EosResult<Self> {
        if !(config.step > 0.0 && config.rt_precision > 0.0 && config.step_size > 0.0) {
            return Err(EosError::InvalidArg {
                what: "inverter step, precision and step size must be positive",
            });
        }
        if config.max_steps == 0 || config.dp_drho_scale == 0.0 {
            return Err(EosError::InvalidArg {
                what: "inverter max_steps and dp_drho_scale must be non-zero",
            });
        }
        let warmup = solve_with(&tables, &config, WARMUP_PRESSURE, WARMUP_ENTROPY)?;
        Ok(Self {
            tables,
            config,
            warmup,
        })
    }

    /// Build from four raw streams and a bulk metal fraction.
    pub fn from_raw(
        entropy_high: &RawTable,
        pressure_high: &RawTable,
        entropy_low: &RawTable,
        pressure_low: &RawTable,
        metals: f64,
    ) -> EosResult<Self> {
        let tables =
            HHeTables::from_raw(entropy_high, pressure_high, entropy_low, pressure_low, metals)?;
        Self::new(tables)
    }

    /// Load the standard four table files from `dir`.
    pub fn load_dir(dir: &Path, metals: f64) -> EosResult<Self> {
        Self::new(HHeTables::load_dir(dir, metals)?)
    }

    pub fn tables(&self) -> &HHeTables {
        &self.tables
    }

    pub fn config(&self) -> &InverterConfig {
        &self.config
    }

    /// Result of the construction-time solve at `P = 1e7`, `S = 6`.
    pub fn warmup(&self) -> &HHeSolution {
        &self.warmup
    }

    /// (log S, log P) at (log ρ, log T), starting from the high regime.
    pub fn evaluate(&self, log_rho: f64, log_t: f64) -> EosResult<TableSample> {
        let mut regime = Regime::High;
        self.tables.lookup(log_rho, log_t, &mut regime)
    }

    /// Lookup sharing a caller-held sticky regime flag.
    pub fn lookup(&self, log_rho: f64, log_t: f64, regime: &mut Regime) -> EosResult<TableSample> {
        self.tables.lookup(log_rho, log_t, regime)
    }

    /// Recover (log ρ, log T) from linear pressure and entropy in table units.
    pub fn solve(&self, pressure: f64, entropy: f64) -> EosResult<HHeSolution> {
        solve_with(&self.tables, &self.config, pressure, entropy)
    }

    /// Temperature on the isentrope `S = entropy` at fixed `log_rho`.
    ///
    /// A damped 1D Newton iteration in log T with the same step, clamp,
    /// precision and iteration ceiling as [`solve`](Self::solve).
    pub fn isentrope(
        &self,
        log_rho: f64,
        entropy: f64,
        log_t_guess: f64,
    ) -> EosResult<IsentropeSolution> {
        validate_entropy(entropy)?;
        let c = &self.config;
        let target = entropy.log10();
        let mut regime = Regime::High;
        let mut log_t = log_t_guess;
        let mut n = 0;

        let outcome = loop {
            n += 1;
            let s0 = self.tables.lookup(log_rho, log_t, &mut regime)?;
            let s2 = self.tables.lookup(log_rho, log_t + c.step, &mut regime)?;
            let dsdt = (s2.log_entropy - s0.log_entropy) / c.step;
            if dsdt == 0.0 {
                return Err(EosError::OutOfRange {
                    what: "isentrope: entropy is flat in temperature",
                });
            }
            let mut dt = (s0.log_entropy - target) / dsdt;
            if dt.abs() > c.step_size {
                dt *= c.step_size / dt.abs();
            }
            log_t -= dt;

            if log_t < c.temperature_floor {
                break SolveOutcome::LeftEnvelope;
            }
            if dt.abs() < c.rt_precision {
                break SolveOutcome::Converged;
            }
            if n > c.max_steps {
                return Err(EosError::IsentropeLimit {
                    log_density: log_rho,
                    entropy,
                    iterations: n,
                });
            }
        };

        let sample = self.tables.lookup(log_rho, log_t, &mut regime)?;
        Ok(IsentropeSolution {
            log_temperature: log_t,
            log_pressure: sample.log_pressure,
            outcome,
            iterations: n,
            regime,
        })
    }
}

fn solve_with(
    tables: &HHeTables,
    c: &InverterConfig,
    pressure: f64,
    entropy: f64,
) -> EosResult<HHeSolution> {
    validate_pressure(pressure)?;
    validate_entropy(entropy)?;
    let target = Vector2::new(pressure.log10(), entropy.log10());
    let mut state = SolverState::new(c.initial_log_density, c.initial_log_temperature);
    let mut n = 0;
    let mut degenerate = 0;

    let (outcome, p0, p1, last_step) = loop {
        n += 1;
        let (r, t) = (state.log_density, state.log_temperature);
        let s0 = tables.lookup(r, t, &mut state.regime)?;
        let s1 = tables.lookup(r + c.step, t, &mut state.regime)?;
        let s2 = tables.lookup(r, t + c.step, &mut state.regime)?;

        state.partials = log_scaled_jacobian(r, t, c.step, &s0, &s1, &s2);
        let mut det = state.partials.determinant();
        if det == 0.0 {
            // Singular when the query has walked off a table edge and flattened out.
            det = c.fallback_determinant;
            degenerate += 1;
            debug!(iteration = n, r, t, "degenerate HHe Jacobian, using fallback determinant");
        }

        let residual = Vector2::new(s0.log_pressure, s0.log_entropy) - target;
        let raw = cramer_step(&state.partials, det, &residual);
        let mut dr = raw[0] / r;
        let mut dt = raw[1] / t;
        if dr.abs() > c.step_size {
            dr *= c.step_size / dr.abs();
        }
        if dt.abs() > c.step_size {
            dt *= c.step_size / dt.abs();
        }

        state.log_density -= dr;
        state.log_temperature -= dt;

        if state.log_temperature < c.temperature_floor {
            break (SolveOutcome::LeftEnvelope, s0.log_pressure, s1.log_pressure, [dr, dt]);
        }
        if dr.abs() < c.rt_precision && dt.abs() < c.rt_precision {
            break (SolveOutcome::Converged, s0.log_pressure, s1.log_pressure, [dr, dt]);
        }
        if n > c.max_steps {
            return Err(EosError::IterationLimit {
                pressure,
                entropy,
                iterations: n,
            });
        }
    };

    let r = state.log_density;
    let dp_drho_table = (10f64.powf(p1) - 10f64.powf(p0)) / (10f64.powf(r + c.step) - 10f64.powf(r));
    debug!(
        pressure,
        entropy,
        iterations = n,
        ?outcome,
        log_density = r,
        log_temperature = state.log_temperature,
        "HHe solve finished"
    );

    Ok(HHeSolution {
        log_density: r,
        log_temperature: state.log_temperature,
        dp_drho_table,
        dp_drho: dp_drho_table / c.dp_drho_scale,
        outcome,
        iterations: n,
        regime: state.regime,
        degenerate_jacobians: degenerate,
        last_step,
    })
}
