//! Layered planet integrated outward from the centre.

use crate::config::IntegratorConfig;
use crate::error::{StructureError, StructureResult};
use crate::integrator::{RK4, RadialModel};
use crate::layer::{BoundaryCrossing, LayerBoundary, LayerKind};
use crate::profile::{Profile, ProfileRecord};
use pl_core::constants::{G, PI};
use pl_core::ensure_positive;
use pl_core::units::{Length, Mass, Pressure, Temperature, k, kg, m, pa};
use pl_eos::Eos;
use serde::{Deserialize, Serialize};
use std::collections::BinaryHeap;
use tracing::{debug, info};

/// Why a structure integration stopped at the surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    /// Pressure fell to the configured surface pressure.
    Surface,
    /// A trial density went non-positive or non-finite; the surface lies
    /// within the last step.
    DensityExhausted,
}

/// Scalar results of a finished integration, SI units.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlanetSummary {
    pub central_pressure: f64,
    pub radius: f64,
    pub total_mass: f64,
    pub surface_temperature: f64,
    pub core_temperature: Option<f64>,
    pub core_pressure: Option<f64>,
    pub envelope_base_temperature: Option<f64>,
    pub ice_mass_fraction: f64,
    pub steps: usize,
    pub termination: Option<Termination>,
}

/// Hydrostatic equilibrium and mass continuity for one EOS, state `[ρ, M]`.
struct Shell<'e> {
    eos: &'e dyn Eos,
    temperature: f64,
    /// Set once any stage density leaves the physical domain.
    exhausted: bool,
}

impl RadialModel for Shell<'_> {
    type State = [f64; 2];

    fn rhs(&mut self, r: f64, x: &[f64; 2]) -> StructureResult<[f64; 2]> {
        let [rho, mass] = *x;
        if self.exhausted || !rho.is_finite() || rho <= 0.0 {
            self.exhausted = true;
            return Ok([0.0, 0.0]);
        }
        let sample = self.eos.at_density(rho, self.temperature)?;
        if !sample.dp_drho.is_finite() || sample.dp_drho <= 0.0 {
            return Err(StructureError::NonPhysical {
                what: "dP/drho must be positive for hydrostatic stepping",
            });
        }
        let drho = -G * mass * rho / (r * r * sample.dp_drho);
        let dmass = 4.0 * PI * r * r * rho;
        Ok([drho, dmass])
    }

    fn add(&self, a: &[f64; 2], b: &[f64; 2]) -> [f64; 2] {
        [a[0] + b[0], a[1] + b[1]]
    }

    fn scale(&self, a: &[f64; 2], scale: f64) -> [f64; 2] {
        [a[0] * scale, a[1] * scale]
    }
}

/// A planet under construction.
///
/// The integrator borrows every EOS for `'a`; the caller keeps ownership.
/// Register layers with [`add_eos`](Self::add_eos), then call
/// [`integrate`](Self::integrate).
pub struct Planet<'a> {
    config: IntegratorConfig,
    central_pressure: f64,
    temperature: f64,
    active: &'a dyn Eos,
    active_kind: LayerKind,
    boundaries: BinaryHeap<LayerBoundary<'a>>,
    next_seq: u64,
    // Current point: radius, density, enclosed mass, pressure, moment of inertia.
    r: f64,
    rho: f64,
    mass: f64,
    pressure: f64,
    inertia: f64,
    steps: usize,
    profile: Profile,
    crossings: Vec<BoundaryCrossing>,
    termination: Option<Termination>,
}

impl<'a> Planet<'a> {
    pub fn new(
        config: IntegratorConfig,
        central_pressure: Pressure,
        core_eos: &'a dyn Eos,
    ) -> StructureResult<Self> {
        config.validate()?;
        let central_pressure = ensure_positive(central_pressure.value, "central pressure")?;
        Ok(Self {
            config,
            central_pressure,
            temperature: 0.0,
            active: core_eos,
            active_kind: LayerKind::Core,
            boundaries: BinaryHeap::new(),
            next_seq: 0,
            r: 0.0,
            rho: 0.0,
            mass: 0.0,
            pressure: central_pressure,
            inertia: 0.0,
            steps: 0,
            profile: Profile::default(),
            crossings: Vec::new(),
            termination: None,
        })
    }

    /// Queue `eos` to take over once pressure falls to `threshold`.
    pub fn add_eos(
        &mut self,
        threshold: Pressure,
        kind: LayerKind,
        eos: &'a dyn Eos,
    ) -> StructureResult<()> {
        let threshold = threshold.value;
        if !threshold.is_finite() {
            return Err(StructureError::InvalidArg {
                what: "layer threshold must be finite",
            });
        }
        if threshold >= self.central_pressure {
            return Err(StructureError::InvalidArg {
                what: "layer threshold must lie below the central pressure",
            });
        }
        if !self.profile.is_empty() {
            return Err(StructureError::InvalidArg {
                what: "layers cannot be added after integration has started",
            });
        }
        self.boundaries
            .push(LayerBoundary::new(threshold, kind, eos, self.next_seq));
        self.next_seq += 1;
        Ok(())
    }

    /// Reference temperature handed to the EOS at the centre.
    pub fn set_temperature(&mut self, t: Temperature) {
        self.temperature = t.value;
    }

    /// Step outward until the surface.
    ///
    /// Hitting the radius or step limit is an error; the partial profile
    /// remains readable through [`profile`](Self::profile).
    pub fn integrate(&mut self) -> StructureResult<Termination> {
        loop {
            if let Some(termination) = self.step()? {
                info!(
                    radius = self.r,
                    mass = self.mass,
                    steps = self.steps,
                    crossings = self.crossings.len(),
                    ?termination,
                    "structure integration finished"
                );
                return Ok(termination);
            }
            if self.r >= self.config.max_radius {
                return Err(StructureError::RadiusLimit {
                    max_radius: self.config.max_radius,
                    steps: self.steps,
                });
            }
            if self.steps >= self.config.max_steps {
                return Err(StructureError::StepLimit {
                    max_steps: self.config.max_steps,
                    radius: self.r,
                });
            }
        }
    }

    /// Advance one radial step, crossing boundaries as needed.
    ///
    /// Returns the termination once the surface is reached. Further calls
    /// keep returning it without stepping.
    pub fn step(&mut self) -> StructureResult<Option<Termination>> {
        if let Some(termination) = self.termination {
            return Ok(Some(termination));
        }
        if self.profile.is_empty() {
            self.start()?;
        }

        let h = self.config.step;
        let mut shell = Shell {
            eos: self.active,
            temperature: self.temperature,
            exhausted: false,
        };
        let [rho, mass] = RK4.step(&mut shell, self.r, &[self.rho, self.mass], h)?;
        if shell.exhausted || !rho.is_finite() || rho <= 0.0 {
            self.termination = Some(Termination::DensityExhausted);
            return Ok(self.termination);
        }

        let sample = self.active.at_density(rho, self.temperature)?;
        let r = self.r + h;
        self.inertia += 8.0 * PI / 3.0 * 0.5 * (self.rho * self.r.powi(4) + rho * r.powi(4)) * h;
        self.r = r;
        self.rho = rho;
        self.mass = mass;
        self.pressure = sample.pressure;
        self.temperature = sample.temperature;
        self.steps += 1;

        self.check_boundary()?;
        self.record();

        if self.pressure <= self.config.surface_pressure {
            self.termination = Some(Termination::Surface);
        }
        Ok(self.termination)
    }

    /// Pop every boundary whose threshold the current pressure has reached.
    ///
    /// Pressure is continuous across a boundary; density is re-derived from
    /// the entered EOS.
    pub fn check_boundary(&mut self) -> StructureResult<()> {
        while let Some(top) = self.boundaries.peek().copied() {
            if self.pressure > top.threshold {
                break;
            }
            self.boundaries.pop();
            let sample = top.eos.at_pressure(self.pressure, self.temperature)?;
            debug!(
                radius = self.r,
                pressure = self.pressure,
                threshold = top.threshold,
                from = %self.active_kind,
                to = %top.kind,
                eos = top.eos.name(),
                "crossing layer boundary"
            );
            self.crossings.push(BoundaryCrossing {
                radius: self.r,
                mass: self.mass,
                pressure: self.pressure,
                temperature: self.temperature,
                density: sample.density,
                left: self.active_kind,
                entered: top.kind,
                eos: top.eos.name().to_string(),
            });
            self.active = top.eos;
            self.active_kind = top.kind;
            self.rho = sample.density;
            self.temperature = sample.temperature;
        }
        Ok(())
    }

    fn start(&mut self) -> StructureResult<()> {
        let h = self.config.step;
        let sample = self.active.at_pressure(self.central_pressure, self.temperature)?;
        let rho_c = sample.density;
        if !rho_c.is_finite() || rho_c <= 0.0 {
            return Err(StructureError::NonPhysical {
                what: "central density must be positive and finite",
            });
        }
        self.r = h;
        self.rho = rho_c;
        self.mass = 4.0 / 3.0 * PI * h.powi(3) * rho_c;
        self.inertia = 8.0 * PI / 15.0 * rho_c * h.powi(5);
        self.pressure = self.central_pressure;
        self.temperature = sample.temperature;
        debug!(rho_c, eos = self.active.name(), "starting structure integration");
        self.record();
        Ok(())
    }

    fn record(&mut self) {
        self.profile.push(ProfileRecord {
            radius: self.r,
            density: self.rho,
            mass: self.mass,
            pressure: self.pressure,
            moment_of_inertia: self.inertia,
            temperature: self.temperature,
        });
    }

    pub fn config(&self) -> &IntegratorConfig {
        &self.config
    }

    pub fn central_pressure(&self) -> Pressure {
        pa(self.central_pressure)
    }

    /// Current temperature state.
    pub fn temperature(&self) -> Temperature {
        k(self.temperature)
    }

    /// Outermost integrated radius.
    pub fn radius(&self) -> Length {
        m(self.profile.last().map_or(0.0, |rec| rec.radius))
    }

    pub fn total_mass(&self) -> Mass {
        kg(self.profile.last().map_or(0.0, |rec| rec.mass))
    }

    pub fn surface_temperature(&self) -> Temperature {
        k(self.profile.last().map_or(self.temperature, |rec| rec.temperature))
    }

    /// Temperature at the top of the innermost layer.
    pub fn core_temperature(&self) -> Option<Temperature> {
        self.crossings.first().map(|c| k(c.temperature))
    }

    /// Pressure at the top of the innermost layer.
    pub fn core_pressure(&self) -> Option<Pressure> {
        self.crossings.first().map(|c| pa(c.pressure))
    }

    /// Temperature at the base of the outermost layer.
    pub fn envelope_base_temperature(&self) -> Option<Temperature> {
        self.crossings.last().map(|c| k(c.temperature))
    }

    /// Mass in [`LayerKind::Ice`] layers over total mass.
    pub fn ice_mass_fraction(&self) -> f64 {
        let total = self.total_mass().value;
        if total <= 0.0 {
            return 0.0;
        }
        // Layer i spans from crossing i - 1 (or the centre) to crossing i (or the surface).
        let kinds = std::iter::once(LayerKind::Core).chain(self.crossings.iter().map(|c| c.entered));
        let edges: Vec<f64> = std::iter::once(0.0)
            .chain(self.crossings.iter().map(|c| c.mass))
            .chain(std::iter::once(total))
            .collect();
        let ice: f64 = kinds
            .zip(edges.windows(2))
            .filter(|(kind, _)| *kind == LayerKind::Ice)
            .map(|(_, w)| w[1] - w[0])
            .sum();
        ice / total
    }

    pub fn crossings(&self) -> &[BoundaryCrossing] {
        &self.crossings
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    /// Number of layers not yet entered.
    pub fn pending_boundaries(&self) -> usize {
        self.boundaries.len()
    }

    pub fn active_eos(&self) -> &'a dyn Eos {
        self.active
    }

    pub fn active_kind(&self) -> LayerKind {
        self.active_kind
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn termination(&self) -> Option<Termination> {
        self.termination
    }

    pub fn summary(&self) -> PlanetSummary {
        PlanetSummary {
            central_pressure: self.central_pressure,
            radius: self.radius().value,
            total_mass: self.total_mass().value,
            surface_temperature: self.surface_temperature().value,
            core_temperature: self.core_temperature().map(|t| t.value),
            core_pressure: self.core_pressure().map(|p| p.value),
            envelope_base_temperature: self.envelope_base_temperature().map(|t| t.value),
            ice_mass_fraction: self.ice_mass_fraction(),
            steps: self.steps,
            termination: self.termination,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pl_eos::{EosResult, EosSample, Polytrope};

    /// Polytrope whose temperature follows its own adiabat, `T ∝ ρ^(2/3)`.
    struct Adiabatic(Polytrope);

    impl Adiabatic {
        fn with_temperature(&self, mut s: EosSample) -> EosSample {
            s.temperature = 10.0 * s.density.powf(2.0 / 3.0);
            s
        }
    }

    impl Eos for Adiabatic {
        fn name(&self) -> &str {
            "adiabatic"
        }

        fn at_density(&self, rho: f64, t: f64) -> EosResult<EosSample> {
            self.0.at_density(rho, t).map(|s| self.with_temperature(s))
        }

        fn at_pressure(&self, p: f64, t: f64) -> EosResult<EosSample> {
            self.0.at_pressure(p, t).map(|s| self.with_temperature(s))
        }
    }

    /// Polytrope with a corrupted density sample.
    struct Broken {
        inner: Polytrope,
        flat: bool,
        empty_centre: bool,
    }

    impl Eos for Broken {
        fn name(&self) -> &str {
            "broken"
        }

        fn at_density(&self, rho: f64, t: f64) -> EosResult<EosSample> {
            let mut s = self.inner.at_density(rho, t)?;
            if self.flat {
                s.dp_drho = 0.0;
            }
            Ok(s)
        }

        fn at_pressure(&self, p: f64, t: f64) -> EosResult<EosSample> {
            let mut s = self.inner.at_pressure(p, t)?;
            if self.empty_centre {
                s.density = 0.0;
            }
            Ok(s)
        }
    }

    fn config(step: f64) -> IntegratorConfig {
        IntegratorConfig {
            step,
            surface_pressure: 1.0e5,
            ..IntegratorConfig::default()
        }
    }

    #[test]
    fn first_record_is_the_central_sphere() {
        let eos = Polytrope::new("core", 1.0e5, 5.0 / 3.0).unwrap();
        let pc = 1.0e5 * 5000.0_f64.powf(5.0 / 3.0);
        let mut planet = Planet::new(config(1.0e4), pa(pc), &eos).unwrap();
        planet.set_temperature(k(4000.0));
        assert_eq!(planet.step().unwrap(), None);

        let first = planet.profile().record(0).unwrap();
        assert_eq!(first.radius, 1.0e4);
        assert!((first.density / 5000.0 - 1.0).abs() < 1e-12);
        let m0 = 4.0 / 3.0 * PI * 1.0e12 * first.density;
        assert!((first.mass / m0 - 1.0).abs() < 1e-12);
        assert_eq!(first.pressure, pc);
        assert_eq!(first.temperature, 4000.0);

        let second = planet.profile().record(1).unwrap();
        assert!(second.density < first.density);
        assert!(second.pressure < first.pressure);
        assert!(second.moment_of_inertia > first.moment_of_inertia);
    }

    #[test]
    fn thresholds_must_lie_below_central_pressure() {
        let eos = Polytrope::new("core", 1.0e5, 2.0).unwrap();
        let mut planet = Planet::new(config(1.0e3), pa(1.0e11), &eos).unwrap();
        assert!(matches!(
            planet.add_eos(pa(1.0e11), LayerKind::Mantle, &eos),
            Err(StructureError::InvalidArg { .. })
        ));
        assert!(planet.add_eos(pa(f64::NAN), LayerKind::Mantle, &eos).is_err());
        assert!(planet.add_eos(pa(1.0e10), LayerKind::Mantle, &eos).is_ok());
        assert_eq!(planet.pending_boundaries(), 1);

        assert!(Planet::new(config(1.0e3), pa(-1.0), &eos).is_err());
    }

    #[test]
    fn ice_fraction_without_ice_is_zero() {
        let eos = Polytrope::new("core", 1.0e5, 2.0).unwrap();
        let mut planet = Planet::new(config(2.0e4), pa(1.0e11), &eos).unwrap();
        planet.integrate().unwrap();
        assert_eq!(planet.ice_mass_fraction(), 0.0);
        assert!(planet.core_temperature().is_none());
        assert!(planet.total_mass().value > 0.0);
    }

    #[test]
    fn temperature_follows_the_active_eos() {
        let eos = Adiabatic(Polytrope::new("gas", 1.0e5, 5.0 / 3.0).unwrap());
        let pc = 1.0e5 * 1000.0_f64.powf(5.0 / 3.0);
        let mut planet = Planet::new(config(2.0e4), pa(pc), &eos).unwrap();
        planet.set_temperature(k(1.0));
        planet.integrate().unwrap();

        let p = planet.profile();
        assert!((p.temperature()[0] - 1000.0).abs() < 1e-6);
        assert!(planet.surface_temperature().value < p.temperature()[0]);
        for (rho, t) in p.density().iter().zip(p.temperature()) {
            assert!((t - 10.0 * rho.powf(2.0 / 3.0)).abs() < 1e-6 * t.max(1.0));
        }
    }

    #[test]
    fn non_physical_samples_stop_the_integration() {
        let inner = Polytrope::new("core", 1.0e5, 2.0).unwrap();
        let flat = Broken {
            inner: inner.clone(),
            flat: true,
            empty_centre: false,
        };
        let mut planet = Planet::new(config(1.0e4), pa(1.0e11), &flat).unwrap();
        assert!(matches!(
            planet.step(),
            Err(StructureError::NonPhysical { .. })
        ));
        assert_eq!(planet.steps(), 0);

        let hollow = Broken {
            inner,
            flat: false,
            empty_centre: true,
        };
        let mut planet = Planet::new(config(1.0e4), pa(1.0e11), &hollow).unwrap();
        let err = planet.integrate().unwrap_err();
        assert!(matches!(err, StructureError::NonPhysical { .. }));
        assert!(err.to_string().contains("central density"));
        assert!(planet.profile().is_empty());
    }
}
