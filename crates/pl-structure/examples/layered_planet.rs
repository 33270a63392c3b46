//! Three-layer planet: iron core, rock mantle, ice shell.
//!
//! Run with `RUST_LOG=debug` to see each layer crossing.

use pl_core::constants::{M_EARTH, R_EARTH};
use pl_core::units::{k, pa};
use pl_eos::{Eos, Polytrope};
use pl_structure::{IntegratorConfig, LayerKind, Planet};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let iron = Polytrope::new("iron", 5.0e4, 5.0 / 3.0)?;
    let rock = Polytrope::new("rock", 1.0e5, 5.0 / 3.0)?;
    let ice = Polytrope::new("ice", 2.0e5, 5.0 / 3.0)?;

    let config = IntegratorConfig::from_yaml("step: 2000.0\nsurface_pressure: 1.0e5\n")?;
    let pc = iron.at_density(8000.0, 0.0)?.pressure;

    let mut planet = Planet::new(config, pa(pc), &iron)?;
    planet.set_temperature(k(300.0));
    planet.add_eos(pa(5.0e10), LayerKind::Mantle, &rock)?;
    planet.add_eos(pa(2.0e10), LayerKind::Ice, &ice)?;
    let termination = planet.integrate()?;

    println!("termination: {termination:?}");
    println!("radius: {:.3} R_earth", planet.radius().value / R_EARTH);
    println!("mass: {:.3} M_earth", planet.total_mass().value / M_EARTH);
    println!("ice mass fraction: {:.3}", planet.ice_mass_fraction());
    for c in planet.crossings() {
        println!(
            "{} -> {} at r = {:.0} km, P = {:.3e} Pa",
            c.left,
            c.entered,
            c.radius / 1.0e3,
            c.pressure
        );
    }

    for rec in planet.profile().decimate(500)?.iter() {
        println!(
            "{:>10.0} {:>10.1} {:>12.3e} {:>12.3e}",
            rec.radius / 1.0e3,
            rec.density,
            rec.mass,
            rec.pressure
        );
    }
    Ok(())
}
