//! Reader for whitespace-delimited HHe table streams.
//!
//! Layout of one stream:
//!
//! ```text
//! yfrac length rho1 rho2 t11 t12 t21 t22
//! v[0][0] v[0][1] ... v[0][99]
//! v[1][0] ...
//! ```
//!
//! The eight header scalars are followed by `length × 100` values in
//! density-major order. Line breaks carry no meaning; only token order does.

use crate::error::{EosError, EosResult};
use crate::grid::{GridBounds, TEMPERATURE_POINTS};
use std::path::Path;

/// One parsed table stream, before any composition correction.
#[derive(Clone, Debug, PartialEq)]
pub struct RawTable {
    /// Helium mass fraction the table was computed for.
    pub helium_fraction: f64,
    /// Number of density rows.
    pub length: usize,
    /// Grid geometry (log10 density and temperature endpoints).
    pub bounds: GridBounds,
    /// `length × 100` values, row-major.
    pub values: Vec<f64>,
}

impl RawTable {
    /// Parse a table stream.
    pub fn parse(text: &str) -> EosResult<Self> {
        let mut tokens = text.split_whitespace();
        let mut next = |what: &'static str| -> EosResult<f64> {
            let token = tokens.next().ok_or_else(|| EosError::Table {
                what,
                detail: "unexpected end of stream".to_string(),
            })?;
            let value: f64 = token.parse().map_err(|_| EosError::Table {
                what,
                detail: format!("cannot parse {token:?} as a number"),
            })?;
            if !value.is_finite() {
                return Err(EosError::Table {
                    what,
                    detail: format!("non-finite value {token:?}"),
                });
            }
            Ok(value)
        };

        let helium_fraction = next("helium fraction")?;
        let length_raw = next("grid length")?;
        if length_raw.fract() != 0.0 || length_raw < 3.0 {
            return Err(EosError::Table {
                what: "grid length",
                detail: format!("expected an integer of at least 3, found {length_raw}"),
            });
        }
        let length = length_raw as usize;
        let bounds = GridBounds {
            rho1: next("rho1")?,
            rho2: next("rho2")?,
            t11: next("t11")?,
            t12: next("t12")?,
            t21: next("t21")?,
            t22: next("t22")?,
        };
        bounds.validate()?;

        let count = length * TEMPERATURE_POINTS;
        let mut values = Vec::with_capacity(count);
        for _ in 0..count {
            values.push(next("grid value")?);
        }

        Ok(Self {
            helium_fraction,
            length,
            bounds,
            values,
        })
    }

    /// Read and parse a table file.
    pub fn read(path: &Path) -> EosResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| EosError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::parse(&text)
    }

    /// Value at density row `i`, temperature column `j`.
    pub fn value(&self, i: usize, j: usize) -> f64 {
        self.values[i * TEMPERATURE_POINTS + j]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stream(length: usize, values: impl Fn(usize, usize) -> f64) -> String {
        let mut text = format!("0.27 {length} -6.0 2.0 3.0 5.0 3.5 6.0\n");
        for i in 0..length {
            let row: Vec<String> = (0..TEMPERATURE_POINTS)
                .map(|j| format!("{}", values(i, j)))
                .collect();
            text.push_str(&row.join(" "));
            text.push('\n');
        }
        text
    }

    #[test]
    fn parses_header_and_row_major_values() {
        let text = stream(4, |i, j| (i * 1000 + j) as f64);
        let table = RawTable::parse(&text).unwrap();

        assert_eq!(table.helium_fraction, 0.27);
        assert_eq!(table.length, 4);
        assert_eq!(table.bounds.rho1, -6.0);
        assert_eq!(table.bounds.t22, 6.0);
        assert_eq!(table.values.len(), 400);
        assert_eq!(table.value(0, 99), 99.0);
        assert_eq!(table.value(3, 7), 3007.0);
    }

    #[test]
    fn line_breaks_do_not_matter() {
        let text = stream(3, |i, j| (i + j) as f64);
        let flat = text.replace('\n', " ");
        assert_eq!(
            RawTable::parse(&text).unwrap(),
            RawTable::parse(&flat).unwrap()
        );
    }

    #[test]
    fn short_stream_is_rejected() {
        let mut text = stream(3, |_, _| 1.0);
        text.truncate(text.len() - 10);
        let err = RawTable::parse(&text).unwrap_err();
        assert!(matches!(err, EosError::Table { .. }));
    }

    #[test]
    fn garbage_and_bad_length_are_rejected() {
        assert!(matches!(
            RawTable::parse("0.27 abc"),
            Err(EosError::Table {
                what: "grid length",
                ..
            })
        ));
        assert!(matches!(
            RawTable::parse("0.27 10.5 -6 2 3 5 3.5 6"),
            Err(EosError::Table {
                what: "grid length",
                ..
            })
        ));
        assert!(RawTable::parse("0.27 4 -6 2 3 5 3.5 nan").is_err());
    }

    #[test]
    fn missing_file_reports_path() {
        let err = RawTable::read(Path::new("/nonexistent/stabnew.dat")).unwrap_err();
        match err {
            EosError::Io { path, .. } => assert!(path.contains("stabnew.dat")),
            other => panic!("unexpected error {other:?}"),
        }
    }
}
