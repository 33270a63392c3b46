//! Monotonic 1D `P(ρ)` tables for rock, metal and ice layers.

use crate::error::{EosError, EosResult};
use crate::model::validation::{validate_density, validate_pressure};
use crate::model::{Eos, EosSample};
use pl_core::{SearchPosition, find_index, lin_interp, spline_interp};
use serde::{Deserialize, Serialize};

/// How values between table nodes are reconstructed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Interpolation {
    /// Piecewise linear in (ρ, P).
    Linear,
    /// Cubic Hermite with finite-difference nodal slopes.
    #[default]
    Hermite,
}

/// Barotropic EOS sampled at ascending densities.
#[derive(Clone, Debug, PartialEq)]
pub struct TabulatedEos {
    name: String,
    densities: Vec<f64>,
    pressures: Vec<f64>,
    /// dP/dρ at each node.
    slopes: Vec<f64>,
    interpolation: Interpolation,
}

impl TabulatedEos {
    /// Bisection iterations used when inverting a Hermite segment.
    const INVERT_ITERS: usize = 80;

    pub fn from_columns(
        name: impl Into<String>,
        densities: Vec<f64>,
        pressures: Vec<f64>,
        interpolation: Interpolation,
    ) -> EosResult<Self> {
        if densities.len() != pressures.len() {
            return Err(EosError::InvalidArg {
                what: "density and pressure columns must have equal length",
            });
        }
        if densities.len() < 2 {
            return Err(EosError::InvalidArg {
                what: "table needs at least two rows",
            });
        }
        for pair in densities.windows(2).chain(pressures.windows(2)) {
            if !(pair[0].is_finite() && pair[1].is_finite() && pair[1] > pair[0]) {
                return Err(EosError::InvalidArg {
                    what: "density and pressure columns must be finite and strictly ascending",
                });
            }
        }

        let n = densities.len();
        let slopes = (0..n)
            .map(|i| {
                let (lo, hi) = (i.saturating_sub(1), (i + 1).min(n - 1));
                (pressures[hi] - pressures[lo]) / (densities[hi] - densities[lo])
            })
            .collect();

        Ok(Self {
            name: name.into(),
            densities,
            pressures,
            slopes,
            interpolation,
        })
    }

    pub fn densities(&self) -> &[f64] {
        &self.densities
    }

    pub fn pressures(&self) -> &[f64] {
        &self.pressures
    }

    /// Segment index `i` such that `xs[i - 1] <= x <= xs[i]`.
    fn segment(x: f64, xs: &[f64], what: &'static str) -> EosResult<usize> {
        match find_index(x, xs)? {
            SearchPosition::Within(i) => Ok(i),
            SearchPosition::Below if x == xs[0] => Ok(1),
            _ => Err(EosError::OutOfRange { what }),
        }
    }

    /// Pressure and dP/dρ on segment `i` at density `rho`.
    fn eval_segment(&self, i: usize, rho: f64) -> (f64, f64) {
        let (x1, x2) = (self.densities[i - 1], self.densities[i]);
        let (y1, y2) = (self.pressures[i - 1], self.pressures[i]);
        let (d1, d2) = (self.slopes[i - 1], self.slopes[i]);
        let dp_drho = lin_interp(rho, x1, x2, d1, d2);
        let p = match self.interpolation {
            Interpolation::Linear => lin_interp(rho, x1, x2, y1, y2),
            Interpolation::Hermite => spline_interp(rho, x1, x2, y1, y2, d1, d2),
        };
        (p, dp_drho)
    }
}

impl Eos for TabulatedEos {
    fn name(&self) -> &str {
        &self.name
    }

    fn at_density(&self, rho: f64, t: f64) -> EosResult<EosSample> {
        validate_density(rho)?;
        let i = Self::segment(rho, &self.densities, "density outside tabulated range")?;
        let (pressure, dp_drho) = self.eval_segment(i, rho);
        Ok(EosSample {
            density: rho,
            pressure,
            temperature: t,
            dp_drho,
        })
    }

    fn at_pressure(&self, p: f64, t: f64) -> EosResult<EosSample> {
        validate_pressure(p)?;
        let i = Self::segment(p, &self.pressures, "pressure outside tabulated range")?;
        let (mut lo, mut hi) = (self.densities[i - 1], self.densities[i]);
        let rho = match self.interpolation {
            Interpolation::Linear => {
                lin_interp(p, self.pressures[i - 1], self.pressures[i], lo, hi)
            }
            Interpolation::Hermite => {
                for _ in 0..Self::INVERT_ITERS {
                    let mid = 0.5 * (lo + hi);
                    if self.eval_segment(i, mid).0 < p {
                        lo = mid;
                    } else {
                        hi = mid;
                    }
                }
                0.5 * (lo + hi)
            }
        };
        let (_, dp_drho) = self.eval_segment(i, rho);
        Ok(EosSample {
            density: rho,
            pressure: p,
            temperature: t,
            dp_drho,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iron_like(interpolation: Interpolation) -> TabulatedEos {
        // P = 1e5 * rho^2 sampled on a coarse grid.
        let densities: Vec<f64> = (1..=12).map(|i| 1000.0 * i as f64).collect();
        let pressures = densities.iter().map(|r| 1.0e5 * r * r).collect();
        TabulatedEos::from_columns("iron", densities, pressures, interpolation).unwrap()
    }

    #[test]
    fn nodes_are_reproduced() {
        for interp in [Interpolation::Linear, Interpolation::Hermite] {
            let eos = iron_like(interp);
            let s = eos.at_density(4000.0, 0.0).unwrap();
            assert!((s.pressure - 1.6e12).abs() / 1.6e12 < 1e-12);
            let s = eos.at_density(1000.0, 0.0).unwrap();
            assert!((s.pressure - 1.0e11).abs() / 1.0e11 < 1e-12);
        }
    }

    #[test]
    fn hermite_beats_linear_between_nodes() {
        let exact = 1.0e5 * 4500.0_f64 * 4500.0;
        let lin = iron_like(Interpolation::Linear)
            .at_density(4500.0, 0.0)
            .unwrap()
            .pressure;
        let herm = iron_like(Interpolation::Hermite)
            .at_density(4500.0, 0.0)
            .unwrap()
            .pressure;
        assert!((herm - exact).abs() < (lin - exact).abs());
    }

    #[test]
    fn pressure_inversion_is_consistent() {
        for interp in [Interpolation::Linear, Interpolation::Hermite] {
            let eos = iron_like(interp);
            let forward = eos.at_density(7321.0, 0.0).unwrap();
            let back = eos.at_pressure(forward.pressure, 0.0).unwrap();
            assert!((back.density - 7321.0).abs() < 1e-6, "{interp:?}: {}", back.density);
            assert!(back.dp_drho > 0.0);
        }
    }

    #[test]
    fn outside_range_is_an_error() {
        let eos = iron_like(Interpolation::Hermite);
        assert!(matches!(
            eos.at_density(500.0, 0.0),
            Err(EosError::OutOfRange { .. })
        ));
        assert!(matches!(
            eos.at_pressure(1.0e20, 0.0),
            Err(EosError::OutOfRange { .. })
        ));
    }

    #[test]
    fn rejects_non_monotonic_columns() {
        let err = TabulatedEos::from_columns(
            "bad",
            vec![1.0, 2.0, 3.0],
            vec![1.0, 3.0, 2.0],
            Interpolation::Linear,
        );
        assert!(err.is_err());
        assert!(
            TabulatedEos::from_columns("bad", vec![1.0], vec![1.0], Interpolation::Linear)
                .is_err()
        );
    }
}
