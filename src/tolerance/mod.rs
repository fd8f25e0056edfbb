//! # Mass Tolerances
//!
//! A [`Tolerance`] turns a nominal mass into the closed window `[min, max]` an
//! observed value may fall into, either relative to the mass (ppm) or as a
//! fixed absolute offset (Da). Every index lookup goes through this module.
//!
//! ```rust
//! use xlfrag::tolerance::Tolerance;
//!
//! let tolerance: Tolerance = "20ppm".parse()?;
//! let window = tolerance.range(1000.0);
//! assert!(window.contains(1000.019));
//! assert!(!window.contains(1000.021));
//! # Ok::<(), xlfrag::tolerance::ToleranceError>(())
//! ```

mod error;

#[cfg(test)]
mod tests;

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::chemistry::ONE_PPM;

pub use error::ToleranceError;

/// A closed mass window; both bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MassRange {
    /// Smallest mass inside the window
    pub min: f64,
    /// Largest mass inside the window
    pub max: f64,
}

impl MassRange {
    /// Create a window from explicit bounds
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Whether `mass` lies inside the window (bounds inclusive)
    pub fn contains(&self, mass: f64) -> bool {
        self.min <= mass && mass <= self.max
    }

    /// Returns true if the window is degenerate (NaN bounds or `min > max`)
    pub fn is_empty(&self) -> bool {
        !(self.min <= self.max)
    }

    /// Width of the window in Da
    pub fn width(&self) -> f64 {
        self.max - self.min
    }
}

/// How masses are matched: relative (ppm) or absolute (Da).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tolerance {
    /// Parts-per-million of the reference mass
    Ppm(f64),
    /// Absolute offset in Dalton (also used for m/z tolerances)
    Da(f64),
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Tolerance {
    /// Exact matching
    pub const ZERO: Tolerance = Tolerance::Da(0.0);

    /// Relative tolerance in ppm
    pub fn ppm(value: f64) -> Self {
        Self::Ppm(value)
    }

    /// Absolute tolerance in Da
    pub fn da(value: f64) -> Self {
        Self::Da(value)
    }

    /// The configured numeric value (ppm or Da, depending on the unit)
    pub fn value(&self) -> f64 {
        match *self {
            Tolerance::Ppm(v) | Tolerance::Da(v) => v,
        }
    }

    /// Returns true for ppm tolerances
    pub fn is_relative(&self) -> bool {
        matches!(self, Tolerance::Ppm(_))
    }

    /// Half-width of the window around `reference`, in Da.
    ///
    /// The magnitude of `reference` is used so that negative inputs never
    /// produce an inverted window.
    #[inline]
    pub fn absolute_error(&self, reference: f64) -> f64 {
        match *self {
            Tolerance::Ppm(ppm) => reference.abs() * ONE_PPM * ppm,
            Tolerance::Da(da) => da,
        }
    }

    /// Window centred on `mass` whose size is derived from `mass` itself.
    #[inline]
    pub fn range(&self, mass: f64) -> MassRange {
        self.range_with_reference(mass, mass)
    }

    /// Window centred on `mass` whose size is derived from `reference`.
    ///
    /// Used when a search window around a shifted mass (e.g. a neutral loss
    /// applied to a peak) should keep the tolerance of the observed peak. For
    /// absolute tolerances this is identical to [`range`](Self::range).
    #[inline]
    pub fn range_with_reference(&self, mass: f64, reference: f64) -> MassRange {
        let error = self.absolute_error(reference);
        MassRange {
            min: mass - error,
            max: mass + error,
        }
    }

    /// Smallest mass that `mass` could represent
    pub fn min_range(&self, mass: f64) -> f64 {
        self.range(mass).min
    }

    /// Largest mass that `mass` could represent
    pub fn max_range(&self, mass: f64) -> f64 {
        self.range(mass).max
    }

    /// Compares two masses under consideration of the tolerance.
    ///
    /// Returns `Equal` if the masses are within tolerance of each other,
    /// `Less` if `value1` lies below the window of `value2` and `Greater` if
    /// it lies above. For ppm tolerances the window of the larger mass is used.
    pub fn compare(&self, value1: f64, value2: f64) -> Ordering {
        match *self {
            Tolerance::Ppm(_) => {
                if value1 > value2 {
                    if value1 - self.absolute_error(value1) > value2 {
                        Ordering::Greater
                    } else {
                        Ordering::Equal
                    }
                } else if value2 - self.absolute_error(value2) > value1 {
                    Ordering::Less
                } else {
                    Ordering::Equal
                }
            }
            Tolerance::Da(da) => {
                if value1 + da < value2 {
                    Ordering::Less
                } else if value1 - da > value2 {
                    Ordering::Greater
                } else {
                    Ordering::Equal
                }
            }
        }
    }

    /// Compares two masses where both carry their own tolerance window.
    pub fn compare_double_error(&self, value1: f64, value2: f64) -> Ordering {
        let r1 = self.range(value1);
        let r2 = self.range(value2);
        if r1.max < r2.min {
            Ordering::Less
        } else if r2.max < r1.min {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }

    /// Minimal distance between two masses once the tolerance is taken into
    /// account; `0.0` when they overlap.
    pub fn min_diff(&self, value1: f64, value2: f64) -> f64 {
        let raw = (value2 - value1).abs();
        let reduced = match *self {
            Tolerance::Ppm(_) => {
                let larger = value1.max(value2);
                raw - 2.0 * self.absolute_error(larger)
            }
            Tolerance::Da(da) => raw - da,
        };
        reduced.clamp(0.0, raw)
    }

    /// Error between a measured and a theoretical mass, in this tolerance's
    /// unit (ppm or Da).
    pub fn error(&self, measured: f64, theoretical: f64) -> f64 {
        match self {
            Tolerance::Ppm(_) => (theoretical - measured) / theoretical * 1e6,
            Tolerance::Da(_) => theoretical - measured,
        }
    }

    /// Human readable error between a measured and a theoretical mass
    pub fn format_error(&self, measured: f64, theoretical: f64) -> String {
        match self {
            Tolerance::Ppm(_) => format!("{:.2}ppm", (measured - theoretical) / theoretical * 1e6),
            Tolerance::Da(_) => format!("{:.3}Da", measured - theoretical),
        }
    }
}

impl fmt::Display for Tolerance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tolerance::Ppm(v) => write!(f, "{} ppm", v),
            Tolerance::Da(v) => write!(f, "{} Da", v),
        }
    }
}

impl FromStr for Tolerance {
    type Err = ToleranceError;

    /// Parses strings such as `"20ppm"`, `"0.02 Da"`, `"0.5 m/z"` or `"0.02"`.
    ///
    /// Units are matched case-insensitively; a missing unit means Da.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ToleranceError::Empty);
        }

        let split = s
            .char_indices()
            .find(|&(i, c)| !(c.is_ascii_digit() || c == '.' || (i == 0 && (c == '-' || c == '+'))))
            .map(|(i, _)| i)
            .unwrap_or(s.len());
        let (number, unit) = s.split_at(split);

        let value: f64 = number
            .trim()
            .parse()
            .map_err(|_| ToleranceError::InvalidValue(number.to_string()))?;
        if !value.is_finite() || value < 0.0 {
            return Err(ToleranceError::OutOfRange(value));
        }

        let unit = unit.trim().to_ascii_lowercase();
        match unit.as_str() {
            "ppm" => Ok(Tolerance::Ppm(value)),
            "" | "da" | "m/z" | "mz" | "th" => Ok(Tolerance::Da(value)),
            _ => Err(ToleranceError::UnknownUnit(unit)),
        }
    }
}
