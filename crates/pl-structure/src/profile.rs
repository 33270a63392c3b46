//! Radial profile recorded during integration.

use crate::error::{StructureError, StructureResult};
use pl_core::{SearchPosition, find_index, lin_interp};
use serde::{Deserialize, Serialize};

/// One row of a [`Profile`], SI units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub radius: f64,
    pub density: f64,
    pub mass: f64,
    pub pressure: f64,
    /// Cumulative moment of inertia (kg m²)
    pub moment_of_inertia: f64,
    pub temperature: f64,
}

/// Column-oriented, append-only record of a structure solve, ascending in radius.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    radius: Vec<f64>,
    density: Vec<f64>,
    mass: Vec<f64>,
    pressure: Vec<f64>,
    moment_of_inertia: Vec<f64>,
    temperature: Vec<f64>,
}

impl Profile {
    pub(crate) fn push(&mut self, rec: ProfileRecord) {
        self.radius.push(rec.radius);
        self.density.push(rec.density);
        self.mass.push(rec.mass);
        self.pressure.push(rec.pressure);
        self.moment_of_inertia.push(rec.moment_of_inertia);
        self.temperature.push(rec.temperature);
    }

    pub fn len(&self) -> usize {
        self.radius.len()
    }

    pub fn is_empty(&self) -> bool {
        self.radius.is_empty()
    }

    pub fn radius(&self) -> &[f64] {
        &self.radius
    }

    pub fn density(&self) -> &[f64] {
        &self.density
    }

    pub fn mass(&self) -> &[f64] {
        &self.mass
    }

    pub fn pressure(&self) -> &[f64] {
        &self.pressure
    }

    pub fn moment_of_inertia(&self) -> &[f64] {
        &self.moment_of_inertia
    }

    pub fn temperature(&self) -> &[f64] {
        &self.temperature
    }

    pub fn record(&self, i: usize) -> Option<ProfileRecord> {
        (i < self.len()).then(|| ProfileRecord {
            radius: self.radius[i],
            density: self.density[i],
            mass: self.mass[i],
            pressure: self.pressure[i],
            moment_of_inertia: self.moment_of_inertia[i],
            temperature: self.temperature[i],
        })
    }

    pub fn last(&self) -> Option<ProfileRecord> {
        self.len().checked_sub(1).and_then(|i| self.record(i))
    }

    pub fn iter(&self) -> impl Iterator<Item = ProfileRecord> + '_ {
        (0..self.len()).filter_map(|i| self.record(i))
    }

    /// Every `interval`-th record, starting with the first. The last record
    /// is always kept.
    pub fn decimate(&self, interval: usize) -> StructureResult<Profile> {
        if interval == 0 {
            return Err(StructureError::InvalidArg {
                what: "decimation interval must be positive",
            });
        }
        let mut out = Profile::default();
        let n = self.len();
        for i in (0..n).step_by(interval) {
            if let Some(rec) = self.record(i) {
                out.push(rec);
            }
        }
        if n > 0 && (n - 1) % interval != 0 {
            if let Some(rec) = self.last() {
                out.push(rec);
            }
        }
        Ok(out)
    }

    /// All columns linearly interpolated at radius `r`.
    pub fn at_radius(&self, r: f64) -> StructureResult<ProfileRecord> {
        let i = match find_index(r, &self.radius)? {
            SearchPosition::Within(i) => i,
            SearchPosition::Below if r == self.radius[0] => {
                return self.record(0).ok_or(StructureError::InvalidArg {
                    what: "profile is empty",
                });
            }
            _ => {
                return Err(StructureError::InvalidArg {
                    what: "radius outside the integrated profile",
                });
            }
        };
        let (r1, r2) = (self.radius[i - 1], self.radius[i]);
        let at = |col: &[f64]| lin_interp(r, r1, r2, col[i - 1], col[i]);
        Ok(ProfileRecord {
            radius: r,
            density: at(&self.density),
            mass: at(&self.mass),
            pressure: at(&self.pressure),
            moment_of_inertia: at(&self.moment_of_inertia),
            temperature: at(&self.temperature),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linear_profile(n: usize) -> Profile {
        let mut p = Profile::default();
        for i in 0..n {
            let r = 100.0 * (i + 1) as f64;
            p.push(ProfileRecord {
                radius: r,
                density: 5000.0 - r,
                mass: 2.0 * r,
                pressure: 1.0e9 - 1.0e3 * r,
                moment_of_inertia: 3.0 * r,
                temperature: 300.0,
            });
        }
        p
    }

    #[test]
    fn decimate_keeps_first_and_last() {
        let p = linear_profile(10);
        let d = p.decimate(4).unwrap();
        assert_eq!(d.radius(), &[100.0, 500.0, 900.0, 1000.0]);
        let d = p.decimate(3).unwrap();
        assert_eq!(d.radius(), &[100.0, 400.0, 700.0, 1000.0]);
        assert_eq!(p.decimate(1).unwrap(), p);
        assert!(p.decimate(0).is_err());
        assert!(Profile::default().decimate(5).unwrap().is_empty());
    }

    #[test]
    fn at_radius_interpolates_every_column() {
        let p = linear_profile(10);
        let rec = p.at_radius(250.0).unwrap();
        assert!((rec.density - 4750.0).abs() < 1e-9);
        assert!((rec.mass - 500.0).abs() < 1e-9);
        assert!((rec.moment_of_inertia - 750.0).abs() < 1e-9);
        assert_eq!(p.at_radius(100.0).unwrap(), p.record(0).unwrap());
        assert_eq!(p.at_radius(1000.0).unwrap().mass, 2000.0);
    }

    #[test]
    fn at_radius_rejects_outside_points() {
        let p = linear_profile(5);
        assert!(p.at_radius(50.0).is_err());
        assert!(p.at_radius(501.0).is_err());
        assert!(Profile::default().at_radius(1.0).is_err());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn decimation_keeps_endpoints_and_order(n in 1_usize..200, interval in 1_usize..40) {
            let mut p = Profile::default();
            for i in 0..n {
                let r = (i + 1) as f64;
                p.push(ProfileRecord {
                    radius: r,
                    density: 1.0 / r,
                    mass: r * r,
                    pressure: 1.0 / r,
                    moment_of_inertia: r,
                    temperature: 1.0,
                });
            }
            let d = p.decimate(interval).unwrap();
            prop_assert_eq!(d.radius()[0], 1.0);
            prop_assert_eq!(d.last().unwrap(), p.last().unwrap());
            prop_assert_eq!(d.len(), n.div_ceil(interval) + usize::from((n - 1) % interval != 0));
            prop_assert!(d.radius().windows(2).all(|w| w[1] > w[0]));
        }
    }
}
