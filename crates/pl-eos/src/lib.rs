//! pl-eos: equations of state for planetary interior layers.
//!
//! Provides:
//! - `Eos` trait, the capability the structure integrator depends on
//! - HHe table set with two temperature regimes and a quadratic stencil lookup
//! - Newton-Raphson inverter recovering (density, temperature) from (pressure, entropy)
//! - Polytropes, monotonic 1D tables (rock, metal, ice) and the HHe adiabat layer
//!
//! # Architecture
//!
//! The integrator only sees `&dyn Eos`. Concrete variants live here and never leak
//! into the integrator. `HHeEos` is immutable after construction; all Newton
//! scratch lives in a per-call [`SolverState`], so one instance can be shared
//! across threads behind an `Arc`.
//!
//! # Example
//!
//! ```no_run
//! use pl_eos::{Eos, Polytrope};
//!
//! let eos = Polytrope::new("mantle", 4.0e5, 5.0 / 3.0).unwrap();
//! let sample = eos.at_pressure(1.0e11, 2000.0).unwrap();
//! println!("rho = {} kg/m3", sample.density);
//! ```

pub mod adiabat;
pub mod error;
pub mod grid;
pub mod inverter;
pub mod jacobian;
pub mod model;
pub mod polytrope;
pub mod table;
pub mod tabulated;

// Re-exports for ergonomics
pub use adiabat::{HHeAdiabat, TableUnits};
pub use error::{EosError, EosResult};
pub use grid::{GridBounds, HHeTables, Regime, RegimeGrid, TEMPERATURE_POINTS, TableSample};
pub use inverter::{
    HHeEos, HHeSolution, InverterConfig, IsentropeSolution, MAX_STEP, RT_PRECISION, STEP,
    STEP_SIZE, SolveOutcome, SolverState, WARMUP_ENTROPY, WARMUP_PRESSURE,
};
pub use model::{Eos, EosSample};
pub use polytrope::Polytrope;
pub use table::RawTable;
pub use tabulated::{Interpolation, TabulatedEos};
