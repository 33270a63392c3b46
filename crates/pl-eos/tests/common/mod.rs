//! Synthetic HHe table sets shared by the integration tests.
//!
//! Both regimes tabulate the same smooth ideal-gas-like surfaces,
//! `log P = log ρ + log T + 5` and `S = 2 + 0.5 (1.5 log T - log ρ)`, so
//! the warm-up target `P = 1e7`, `S = 6` sits comfortably inside the high
//! grid. The low grid can be offset in pressure to tell the regimes apart.

#![allow(dead_code)]

use pl_eos::{GridBounds, HHeEos, HHeTables, InverterConfig, RawTable, TEMPERATURE_POINTS};

pub const LENGTH: usize = 60;

pub fn high_bounds() -> GridBounds {
    GridBounds {
        rho1: -6.0,
        rho2: 2.0,
        t11: 3.0,
        t12: 5.0,
        t21: 3.5,
        t22: 6.0,
    }
}

pub fn low_bounds() -> GridBounds {
    GridBounds {
        rho1: -6.0,
        rho2: 2.0,
        t11: 0.0,
        t12: 4.5,
        t21: 0.0,
        t22: 4.5,
    }
}

pub fn raw(bounds: GridBounds, f: impl Fn(f64, f64) -> f64) -> RawTable {
    let mut values = Vec::with_capacity(LENGTH * TEMPERATURE_POINTS);
    for i in 0..LENGTH {
        for j in 0..TEMPERATURE_POINTS {
            let r = bounds.row_log_density(i, LENGTH);
            let t = bounds.node_log_temperature(i, j, LENGTH);
            values.push(f(r, t));
        }
    }
    RawTable {
        helium_fraction: 0.27,
        length: LENGTH,
        bounds,
        values,
    }
}

pub fn log_pressure(r: f64, t: f64) -> f64 {
    r + t + 5.0
}

pub fn log_entropy(r: f64, t: f64) -> f64 {
    (2.0 + 0.5 * (1.5 * t - r)).log10()
}

/// Table set with the low grid's pressure shifted by `low_offset` dex.
pub fn tables(metals: f64, low_offset: f64) -> HHeTables {
    let sh = raw(high_bounds(), log_entropy);
    let ph = raw(high_bounds(), log_pressure);
    let sl = raw(low_bounds(), log_entropy);
    let pl = raw(low_bounds(), |r, t| log_pressure(r, t) + low_offset);
    HHeTables::from_raw(&sh, &ph, &sl, &pl, metals).unwrap()
}

pub fn eos() -> HHeEos {
    HHeEos::new(tables(0.0, 0.0)).unwrap()
}

pub fn eos_with(config: InverterConfig) -> HHeEos {
    HHeEos::with_config(tables(0.0, 0.0), config).unwrap()
}
