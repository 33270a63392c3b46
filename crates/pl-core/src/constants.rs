//! Physical constants, all in SI units.

pub use std::f64::consts::{E, PI};

/// Gravitational constant [m³/(kg·s²)]
pub const G: f64 = 6.674_28e-11;
/// Reduced Planck constant [J·s]
pub const HBAR: f64 = 1.054_571_7e-34;
/// Electron mass [kg]
pub const MASS_E: f64 = 9.109_382_9e-31;
/// Atomic mass unit [kg]
pub const U: f64 = 1.660_538_8e-27;
/// Gas constant [J/(mol·K)]
pub const R: f64 = 8.314_462_1;
/// Avogadro constant [1/mol]
pub const N_A: f64 = 6.022_141_29e23;

/// Molar mass of iron [kg/mol]
pub const M_FE: f64 = 0.055_85;
/// Molar mass of MgSiO3 perovskite [kg/mol]
pub const M_PV: f64 = 0.100_39;
/// Molar mass of MgO [kg/mol]
pub const M_MGO: f64 = 0.040_30;
/// Molar mass of carbon [kg/mol]
pub const M_C: f64 = 0.012_01;

/// Earth mass [kg]
pub const M_EARTH: f64 = 5.9736e24;
/// Earth radius [m]
pub const R_EARTH: f64 = 6.371e6;

/// Seconds per megayear
pub const MYR: f64 = 3.155_695_2e13;
/// Astronomical unit [m]
pub const AU: f64 = 1.495_978_707e11;

/// Boltzmann constant [J/K]
pub const K_B: f64 = R / N_A;

/// Polytropic constant of a cold, degenerate, non-relativistic electron gas,
/// `P = K_WD ρ^(5/3)`, normalised by half an atomic mass unit per electron.
pub fn k_wd() -> f64 {
    (HBAR * HBAR / (15.0 * MASS_E * PI * PI)) * ((3.0 * PI * PI) / (U * 0.5)).powf(5.0 / 3.0)
}
