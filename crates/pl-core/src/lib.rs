//! pl-core: stable foundation for the planet interior workspace.
//!
//! Contains:
//! - constants (physical constants in SI, plus derived k_B and K_WD)
//! - interp (ordered-array search, linear and cubic-Hermite interpolation)
//! - numeric (Real + tolerances + float helpers)
//! - units (uom SI types + constructors)
//! - error (shared error types)

pub mod constants;
pub mod error;
pub mod interp;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{CoreError, CoreResult};
pub use interp::{SearchPosition, find_index, lin_interp, spline_interp};
pub use numeric::*;
