//! Independent structure solves over a set of central pressures.

use crate::config::IntegratorConfig;
use crate::error::StructureResult;
use crate::layer::LayerKind;
use crate::planet::{Planet, PlanetSummary};
use pl_core::units::{Pressure, Temperature};
use pl_eos::Eos;
use rayon::prelude::*;

/// A layer to register on every planet of a sweep.
#[derive(Clone, Copy)]
pub struct LayerSpec<'a> {
    pub threshold: Pressure,
    pub kind: LayerKind,
    pub eos: &'a dyn Eos,
}

/// Integrate one planet per central pressure, in parallel.
///
/// The EOS instances are shared read-only between workers. Results come back
/// in input order; a failed solve does not affect the others.
pub fn integrate_all<'a>(
    config: &IntegratorConfig,
    core: &'a dyn Eos,
    layers: &[LayerSpec<'a>],
    temperature: Temperature,
    central_pressures: &[Pressure],
) -> Vec<StructureResult<PlanetSummary>> {
    central_pressures
        .par_iter()
        .map(|&pc| -> StructureResult<PlanetSummary> {
            let mut planet = Planet::new(config.clone(), pc, core)?;
            planet.set_temperature(temperature);
            for layer in layers {
                planet.add_eos(layer.threshold, layer.kind, layer.eos)?;
            }
            planet.integrate()?;
            Ok(planet.summary())
        })
        .collect()
}
