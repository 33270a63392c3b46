//! Finite difference Jacobian of the HHe lookup.

use crate::grid::TableSample;
use nalgebra::{Matrix2, Vector2};

/// Forward-difference Jacobian of (log P, log S) with respect to (log ρ, log T).
///
/// Rows are `[P, S]`, columns `[ρ, T]`. Each column is additionally divided by
/// the current log coordinate, so the Newton update must divide its step by
/// the same coordinate to undo the scaling.
pub fn log_scaled_jacobian(
    log_rho: f64,
    log_t: f64,
    step: f64,
    base: &TableSample,
    rho_step: &TableSample,
    t_step: &TableSample,
) -> Matrix2<f64> {
    let dpdr = (rho_step.log_pressure - base.log_pressure) / (log_rho * step);
    let dpdt = (t_step.log_pressure - base.log_pressure) / (log_t * step);
    let dsdr = (rho_step.log_entropy - base.log_entropy) / (log_rho * step);
    let dsdt = (t_step.log_entropy - base.log_entropy) / (log_t * step);
    Matrix2::new(dpdr, dpdt, dsdr, dsdt)
}

/// Cramer's-rule solution of `J · x = residual` with an explicit determinant.
///
/// The determinant is passed in so callers can substitute a fallback value
/// when the true one vanishes.
pub fn cramer_step(jac: &Matrix2<f64>, det: f64, residual: &Vector2<f64>) -> Vector2<f64> {
    let (dpdr, dpdt) = (jac[(0, 0)], jac[(0, 1)]);
    let (dsdr, dsdt) = (jac[(1, 0)], jac[(1, 1)]);
    let (rp, rs) = (residual[0], residual[1]);
    Vector2::new(
        1.0 / det * (dsdt * rp - dpdt * rs),
        1.0 / det * (-dsdr * rp + dpdr * rs),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Regime;

    fn sample(log_entropy: f64, log_pressure: f64) -> TableSample {
        TableSample {
            log_entropy,
            log_pressure,
            regime: Regime::High,
        }
    }

    #[test]
    fn jacobian_linear() {
        // log P = 2 r + t, log S = -r + 3 t at (r, t) = (-2, 4)
        let step = 0.01;
        let base = sample(14.0, 0.0);
        let rho = sample(14.0 - step, 2.0 * step);
        let t = sample(14.0 + 3.0 * step, step);
        let jac = log_scaled_jacobian(-2.0, 4.0, step, &base, &rho, &t);

        assert!((jac[(0, 0)] - 2.0 / -2.0).abs() < 1e-9);
        assert!((jac[(0, 1)] - 1.0 / 4.0).abs() < 1e-9);
        assert!((jac[(1, 0)] - -1.0 / -2.0).abs() < 1e-9);
        assert!((jac[(1, 1)] - 3.0 / 4.0).abs() < 1e-9);
    }

    #[test]
    fn cramer_matches_lu_solve() {
        let jac = Matrix2::new(2.0, 1.0, -1.0, 3.0);
        let residual = Vector2::new(0.5, -0.25);
        let x = cramer_step(&jac, jac.determinant(), &residual);
        let expected = jac.lu().solve(&residual).unwrap();
        assert!((x - expected).norm() < 1e-12);
    }
}
