use crate::CoreError;

/// Floating point type used throughout system
pub type Real = f64;

/// One tolerance for everything
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, CoreError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CoreError::NonFinite { what, value: v })
    }
}

/// Ensure `v` is finite and strictly positive.
pub fn ensure_positive(v: Real, what: &'static str) -> Result<Real, CoreError> {
    let v = ensure_finite(v, what)?;
    if v > 0.0 {
        Ok(v)
    } else {
        Err(CoreError::InvalidArg { what })
    }
}

/// Relative difference `|a - b| / |b|`, falling back to the absolute difference near zero.
pub fn rel_diff(a: Real, b: Real) -> Real {
    let scale = b.abs();
    if scale < Real::MIN_POSITIVE {
        (a - b).abs()
    } else {
        (a - b).abs() / scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearly_equal_basic() {
        let tol = Tolerances {
            abs: 1e-12,
            rel: 1e-9,
        };
        assert!(nearly_equal(1.0, 1.0 + 1e-12, tol));
        assert!(nearly_equal(0.0, 1e-13, tol));
        assert!(!nearly_equal(1.0, 1.0 + 1e-6, tol));
    }

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }

    #[test]
    fn ensure_positive_rejects_zero_and_negative() {
        assert_eq!(ensure_positive(2.5, "x").unwrap(), 2.5);
        assert!(matches!(
            ensure_positive(0.0, "x"),
            Err(CoreError::InvalidArg { what: "x" })
        ));
        assert!(ensure_positive(-1.0, "x").is_err());
        assert!(matches!(
            ensure_positive(Real::INFINITY, "x"),
            Err(CoreError::NonFinite { .. })
        ));
    }

    #[test]
    fn rel_diff_handles_zero_reference() {
        assert!((rel_diff(1.1, 1.0) - 0.1).abs() < 1e-12);
        assert_eq!(rel_diff(1e-3, 0.0), 1e-3);
    }
}
