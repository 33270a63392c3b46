//! Ordered-array search and 1D interpolation primitives.

use crate::error::{CoreError, CoreResult};

/// Where a value falls relative to an ascending array.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchPosition {
    /// At or below the first element.
    Below,
    /// Strictly above the last element.
    Above,
    /// `vals[i - 1] <= find <= vals[i]`, with `i >= 1`.
    Within(usize),
}

/// Binary search for the bracketing index of `find` in ascending `vals`.
///
/// Returns [`CoreError::SearchFailed`] if the located bracket does not
/// actually contain `find`, which happens only when `vals` is not sorted.
pub fn find_index(find: f64, vals: &[f64]) -> CoreResult<SearchPosition> {
    let (Some(&first), Some(&last)) = (vals.first(), vals.last()) else {
        return Err(CoreError::InvalidArg {
            what: "search array must not be empty",
        });
    };
    if find <= first {
        return Ok(SearchPosition::Below);
    }
    if find > last {
        return Ok(SearchPosition::Above);
    }

    let mut lo = 0;
    let mut hi = vals.len() - 1;
    while lo < hi {
        let mid = (lo + hi) / 2;
        if find > vals[mid] {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }

    if lo == 0 || vals[lo] < find || vals[lo - 1] > find {
        return Err(CoreError::SearchFailed { value: find });
    }
    Ok(SearchPosition::Within(lo))
}

/// Cubic Hermite interpolation between `(x1, y1)` and `(x2, y2)` with end slopes.
pub fn spline_interp(x: f64, x1: f64, x2: f64, y1: f64, y2: f64, dydx1: f64, dydx2: f64) -> f64 {
    let t = (x - x1) / (x2 - x1);
    let a = dydx1 * (x2 - x1) - (y2 - y1);
    let b = -(dydx2 * (x2 - x1)) + (y2 - y1);

    (1.0 - t) * y1 + t * y2 + t * (1.0 - t) * (a * (1.0 - t) + b * t)
}

/// Linear interpolation between `(x1, y1)` and `(x2, y2)`.
pub fn lin_interp(x: f64, x1: f64, x2: f64, y1: f64, y2: f64) -> f64 {
    let t = (x - x1) / (x2 - x1);
    (1.0 - t) * y1 + t * y2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_index_brackets() {
        let vals = [1.0, 2.0, 4.0, 8.0];
        assert_eq!(find_index(0.5, &vals).unwrap(), SearchPosition::Below);
        assert_eq!(find_index(1.0, &vals).unwrap(), SearchPosition::Below);
        assert_eq!(find_index(1.5, &vals).unwrap(), SearchPosition::Within(1));
        assert_eq!(find_index(2.0, &vals).unwrap(), SearchPosition::Within(1));
        assert_eq!(find_index(3.0, &vals).unwrap(), SearchPosition::Within(2));
        assert_eq!(find_index(8.0, &vals).unwrap(), SearchPosition::Within(3));
        assert_eq!(find_index(9.0, &vals).unwrap(), SearchPosition::Above);
    }

    #[test]
    fn find_index_rejects_empty_and_unsorted() {
        assert!(matches!(
            find_index(1.0, &[]),
            Err(CoreError::InvalidArg { .. })
        ));
        let unsorted = [0.0, 5.0, 1.0, 2.0, 10.0];
        assert!(matches!(
            find_index(3.0, &unsorted),
            Err(CoreError::SearchFailed { .. })
        ));
    }

    #[test]
    fn lin_interp_endpoints_and_midpoint() {
        assert_eq!(lin_interp(1.0, 1.0, 3.0, 10.0, 20.0), 10.0);
        assert_eq!(lin_interp(3.0, 1.0, 3.0, 10.0, 20.0), 20.0);
        assert_eq!(lin_interp(2.0, 1.0, 3.0, 10.0, 20.0), 15.0);
    }

    #[test]
    fn spline_interp_reproduces_cubic() {
        // y = x^3 on [1, 2] has slopes 3 and 12.
        let y = spline_interp(1.5, 1.0, 2.0, 1.0, 8.0, 3.0, 12.0);
        assert!((y - 3.375).abs() < 1e-12);
    }

    #[test]
    fn spline_interp_matches_endpoints() {
        let y1 = spline_interp(0.0, 0.0, 1.0, 2.0, 5.0, -1.0, 4.0);
        let y2 = spline_interp(1.0, 0.0, 1.0, 2.0, 5.0, -1.0, 4.0);
        assert!((y1 - 2.0).abs() < 1e-12);
        assert!((y2 - 5.0).abs() < 1e-12);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn find_index_brackets_sorted_arrays(
                mut vals in prop::collection::vec(-1.0e3_f64..1.0e3_f64, 2..40),
                frac in 0.0_f64..1.0_f64,
            ) {
                vals.sort_by(|a, b| a.total_cmp(b));
                let find = vals[0] + frac * (vals[vals.len() - 1] - vals[0]);
                match find_index(find, &vals).unwrap() {
                    SearchPosition::Within(i) => {
                        prop_assert!(vals[i - 1] <= find && find <= vals[i]);
                    }
                    SearchPosition::Below => prop_assert!(find <= vals[0]),
                    SearchPosition::Above => prop_assert!(false, "value inside range reported above"),
                }
            }
        }
    }
}
