//! pl-structure: radial structure integration for layered planets.
//!
//! A [`Planet`] starts at the centre with a given pressure and an innermost
//! EOS, then steps outward with classical RK4 on density and enclosed mass.
//! Registered layer boundaries are crossed in order of falling pressure;
//! each crossing hands the integration to the next EOS.

pub mod config;
pub mod error;
pub mod integrator;
pub mod layer;
pub mod planet;
pub mod profile;
pub mod sweep;

pub use config::IntegratorConfig;
pub use error::{StructureError, StructureResult};
pub use integrator::{RK4, RadialModel};
pub use layer::{BoundaryCrossing, LayerBoundary, LayerKind};
pub use planet::{Planet, PlanetSummary, Termination};
pub use profile::{Profile, ProfileRecord};
pub use sweep::{LayerSpec, integrate_all};
