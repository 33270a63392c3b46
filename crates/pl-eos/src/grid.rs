//! HHe table grids and the quadratic stencil lookup.
//!
//! Both regimes are `length × 100` grids over a sheared region of
//! (log10 ρ, log10 T). Row `i` sits at a fixed log density; its temperature
//! span runs from `t1(i)` to `t2(i)`, and both endpoints drift linearly
//! with `i`.

use crate::error::{EosError, EosResult};
use crate::table::RawTable;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Number of temperature columns in every grid row.
pub const TEMPERATURE_POINTS: usize = 100;

/// Mass-fraction scale applied to the bulk metal fraction before mixing.
const METAL_SCALE: f64 = 0.00276;
/// Mixing-entropy coefficient of the metal correction.
const METAL_ENTROPY: f64 = 1.77e-4;
/// Molar-mass terms of the pressure correction.
const METAL_MOLAR: f64 = 16.93;
const HHE_MOLAR: f64 = 2.247;

/// Which of the two tabulated sub-grids serves a lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Regime {
    High,
    Low,
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Regime::High => write!(f, "high-temperature"),
            Regime::Low => write!(f, "low-temperature"),
        }
    }
}

/// Geometry scalars of one regime, all log10.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridBounds {
    pub rho1: f64,
    pub rho2: f64,
    /// Lower temperature edge at the first row.
    pub t11: f64,
    /// Upper temperature edge at the first row.
    pub t12: f64,
    /// Lower temperature edge at the last row.
    pub t21: f64,
    /// Upper temperature edge at the last row.
    pub t22: f64,
}

impl GridBounds {
    pub(crate) fn validate(&self) -> EosResult<()> {
        if self.rho2 <= self.rho1 {
            return Err(EosError::Table {
                what: "density bounds",
                detail: format!("rho2 ({}) must exceed rho1 ({})", self.rho2, self.rho1),
            });
        }
        if self.t12 <= self.t11 || self.t22 <= self.t21 {
            return Err(EosError::Table {
                what: "temperature bounds",
                detail: "upper temperature edge must exceed the lower edge".to_string(),
            });
        }
        Ok(())
    }

    /// Fractional position of `log_rho` between `rho1` and `rho2`.
    pub fn density_fraction(&self, log_rho: f64) -> f64 {
        (log_rho - self.rho1) / (self.rho2 - self.rho1)
    }

    /// Normalised temperature offset of `log_t` within the row at `log_rho`.
    ///
    /// Zero on the lower temperature edge, one on the upper edge.
    pub fn temperature_fraction(&self, log_rho: f64, log_t: f64) -> f64 {
        let x = self.density_fraction(log_rho);
        let alpha = self.t11 + x * (self.t21 - self.t11);
        let beta = self.t12 - self.t11 + ((self.t22 - self.t21) - (self.t12 - self.t11)) * x;
        (log_t - alpha) / beta
    }

    /// Log density of grid row `i`.
    pub fn row_log_density(&self, i: usize, length: usize) -> f64 {
        self.rho1 + (self.rho2 - self.rho1) * i as f64 / (length as f64 - 1.0)
    }

    /// Log temperature of grid node `(i, j)`.
    pub fn node_log_temperature(&self, i: usize, j: usize, length: usize) -> f64 {
        let x = i as f64 / (length as f64 - 1.0);
        let t1 = self.t11 + (self.t21 - self.t11) * x;
        let t2 = self.t12 + (self.t22 - self.t12) * x;
        t1 + (t2 - t1) * j as f64 / (TEMPERATURE_POINTS as f64 - 1.0)
    }
}

/// Dense row-major `rows × 100` grid.
#[derive(Clone, Debug, PartialEq)]
struct Grid {
    rows: usize,
    data: Vec<f64>,
}

impl Grid {
    fn at(&self, i: usize, j: usize) -> f64 {
        self.data[i * TEMPERATURE_POINTS + j]
    }

    /// Quadratic 6-point stencil centred on `(jr, jq)`.
    ///
    /// Reads `[jr][jq±1]`, `[jr±1][jq]` and `[jr+1][jq+1]`. Exact for any
    /// quadratic in the grid indices. Callers check the index range.
    fn stencil(&self, jr: usize, jq: usize, p: f64, q: f64) -> f64 {
        0.5 * q * (q - 1.0) * self.at(jr, jq - 1)
            + 0.5 * p * (p - 1.0) * self.at(jr - 1, jq)
            + (1.0 + p * q - p * p - q * q) * self.at(jr, jq)
            + 0.5 * p * (p - 2.0 * q + 1.0) * self.at(jr + 1, jq)
            + 0.5 * q * (q - 2.0 * p + 1.0) * self.at(jr, jq + 1)
            + p * q * self.at(jr + 1, jq + 1)
    }
}

/// Entropy and pressure grids of one regime, composition already applied.
#[derive(Clone, Debug, PartialEq)]
pub struct RegimeGrid {
    bounds: GridBounds,
    entropy: Grid,
    pressure: Grid,
}

impl RegimeGrid {
    /// Build a regime from its raw entropy and pressure streams.
    ///
    /// `metals` is the bulk metal mass fraction. It enters the entropy through
    /// an ideal mixing term evaluated at each node's own (ρ, T), and the
    /// pressure through a molar-mass ratio.
    pub fn from_raw(entropy: &RawTable, pressure: &RawTable, metals: f64) -> EosResult<Self> {
        if entropy.length != pressure.length || entropy.bounds != pressure.bounds {
            return Err(EosError::Table {
                what: "regime headers",
                detail: "entropy and pressure streams describe different grids".to_string(),
            });
        }
        let length = entropy.length;
        let bounds = pressure.bounds;
        let z = metals * METAL_SCALE;
        let log_mrat = (HHE_MOLAR / (HHE_MOLAR + z * METAL_MOLAR)).log10();

        let mut s = Vec::with_capacity(length * TEMPERATURE_POINTS);
        let mut p = Vec::with_capacity(length * TEMPERATURE_POINTS);
        for i in 0..length {
            let rho = 10f64.powf(bounds.row_log_density(i, length));
            for j in 0..TEMPERATURE_POINTS {
                let t = 10f64.powf(bounds.node_log_temperature(i, j, length));
                let mixing = METAL_ENTROPY * z / METAL_SCALE * (t.powf(1.5) / rho).ln();
                s.push(((1.0 - z) * 10f64.powf(entropy.value(i, j)) + mixing).log10());
                p.push(pressure.value(i, j) + log_mrat);
            }
        }

        Ok(Self {
            bounds,
            entropy: Grid {
                rows: length,
                data: s,
            },
            pressure: Grid {
                rows: length,
                data: p,
            },
        })
    }

    pub fn bounds(&self) -> &GridBounds {
        &self.bounds
    }

    /// Number of density rows.
    pub fn length(&self) -> usize {
        self.entropy.rows
    }

    /// Stored (log entropy, log pressure) at node `(i, j)`.
    pub fn node(&self, i: usize, j: usize) -> (f64, f64) {
        (self.entropy.at(i, j), self.pressure.at(i, j))
    }

    fn interpolate(
        &self,
        regime: Regime,
        jr: i64,
        jq: i64,
        p: f64,
        q: f64,
    ) -> EosResult<TableSample> {
        let rows = self.entropy.rows as i64;
        let cols = TEMPERATURE_POINTS as i64;
        if jr < 1 || jr + 1 >= rows || jq < 1 || jq + 1 >= cols {
            return Err(EosError::OutOfTable {
                regime,
                row: jr,
                col: jq,
            });
        }
        let (jr, jq) = (jr as usize, jq as usize);
        let log_entropy = self.entropy.stencil(jr, jq, p, q);
        let log_pressure = self.pressure.stencil(jr, jq, p, q);
        if !log_entropy.is_finite() || !log_pressure.is_finite() {
            return Err(EosError::NonPhysical {
                what: "table interpolation produced a non-finite value",
            });
        }
        Ok(TableSample {
            log_entropy,
            log_pressure,
            regime,
        })
    }
}

/// Interpolated log10 entropy and log10 pressure, with the regime that produced them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TableSample {
    pub log_entropy: f64,
    pub log_pressure: f64,
    pub regime: Regime,
}

/// The full HHe table set at one composition.
#[derive(Clone, Debug, PartialEq)]
pub struct HHeTables {
    helium_fraction: f64,
    metals: f64,
    high: RegimeGrid,
    low: RegimeGrid,
}

impl HHeTables {
    /// Table file names, in the order
    /// `(high entropy, high pressure, low entropy, low pressure)`.
    pub const FILES: [&'static str; 4] =
        ["stabnew.dat", "ptabnew.dat", "stablow.dat", "ptablow.dat"];

    /// Assemble both regimes from four raw streams and a bulk metal fraction.
    pub fn from_raw(
        entropy_high: &RawTable,
        pressure_high: &RawTable,
        entropy_low: &RawTable,
        pressure_low: &RawTable,
        metals: f64,
    ) -> EosResult<Self> {
        if !metals.is_finite() || !(0.0..=1.0).contains(&metals) {
            return Err(EosError::InvalidArg {
                what: "metal fraction must lie in [0, 1]",
            });
        }
        let high = RegimeGrid::from_raw(entropy_high, pressure_high, metals)?;
        let low = RegimeGrid::from_raw(entropy_low, pressure_low, metals)?;
        if high.length() != low.length() {
            return Err(EosError::Table {
                what: "grid length",
                detail: format!(
                    "high regime has {} rows, low regime has {}",
                    high.length(),
                    low.length()
                ),
            });
        }
        Ok(Self {
            helium_fraction: pressure_low.helium_fraction,
            metals,
            high,
            low,
        })
    }

    /// Load the four table files from `dir`.
    pub fn load_dir(dir: &Path, metals: f64) -> EosResult<Self> {
        let [sh, ph, sl, pl] = Self::FILES.map(|name| RawTable::read(&dir.join(name)));
        Self::from_raw(&sh?, &ph?, &sl?, &pl?, metals)
    }

    pub fn helium_fraction(&self) -> f64 {
        self.helium_fraction
    }

    pub fn metals(&self) -> f64 {
        self.metals
    }

    pub fn regime(&self, regime: Regime) -> &RegimeGrid {
        match regime {
            Regime::High => &self.high,
            Regime::Low => &self.low,
        }
    }

    /// Interpolate log entropy and log pressure at `(log_rho, log_t)`.
    ///
    /// `regime` is sticky: once a lookup falls back to the low-temperature
    /// grid it is set to [`Regime::Low`] and every later lookup sharing the
    /// same flag stays there.
    pub fn lookup(&self, log_rho: f64, log_t: f64, regime: &mut Regime) -> EosResult<TableSample> {
        if !log_rho.is_finite() || !log_t.is_finite() {
            return Err(EosError::NonPhysical {
                what: "table query must be finite",
            });
        }
        let length = self.high.length() as f64;

        let bounds = &self.high.bounds;
        let ql = bounds.temperature_fraction(log_rho, log_t);
        if *regime == Regime::High && ql > 0.0 && log_rho > bounds.rho1 {
            let delta = bounds.density_fraction(log_rho) * length;
            let jr = cell_index(delta, length);
            let jq = cell_index(100.0 * ql, TEMPERATURE_POINTS as f64);
            return self
                .high
                .interpolate(Regime::High, jr, jq, delta.fract(), (100.0 * ql).fract());
        }

        *regime = Regime::Low;
        let bounds = &self.low.bounds;
        let ql = bounds.temperature_fraction(log_rho, log_t);
        let delta = bounds.density_fraction(log_rho) * length;
        let jr = cell_index(delta, length);
        let mut jq = cell_index(100.0 * ql, TEMPERATURE_POINTS as f64);
        let mut q = (100.0 * ql).fract();
        // Unverified heuristic kept for compatibility: below the lower
        // temperature edge the first column is reused with q = 0.
        if jq < 1 {
            jq = 1;
            q = 0.0;
        }
        self.low
            .interpolate(Regime::Low, jr, jq, delta.fract(), q)
    }
}

/// `1 + floor(x)`, with `x` pinned to `[-1, limit + 1]` so far-off queries
/// still map to an index just outside the grid.
fn cell_index(x: f64, limit: f64) -> i64 {
    1 + x.clamp(-1.0, limit + 1.0).floor() as i64
}
