//! Unit conversion utilities.
//!
//! Slide geometry is stored in EMU (English Metric Units). Callers usually
//! think in inches, percentages of the page or points, so positions are
//! accepted as a [`Length`] and resolved against the page extent when an
//! object is placed.

use crate::common::error::{ConfigurationError, Error, Result};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::str::FromStr;

pub const EMUS_PER_INCH: i64 = 914_400;
pub const EMUS_PER_CM: i64 = 360_000;
pub const EMUS_PER_MM: i64 = 36_000;
pub const EMUS_PER_PT: i64 = 12_700;

#[inline]
pub fn inches_to_emu(inches: f64) -> i64 {
    (inches * EMUS_PER_INCH as f64).round() as i64
}

#[inline]
pub fn pt_to_emu_f64(pt: f64) -> i64 {
    (pt * EMUS_PER_PT as f64).round() as i64
}

/// Font size in points to the hundredths-of-a-point value used by `sz`.
#[inline]
pub fn pt_to_centipoints(pt: f64) -> u32 {
    (pt * 100.0).round().max(0.0) as u32
}

/// A length as written by the caller, before it is pinned to a page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Length {
    Inches(f64),
    /// Percentage of the page extent along the same axis
    Percent(f64),
    Points(f64),
    Centimeters(f64),
    Millimeters(f64),
    Emu(i64),
}

impl Length {
    /// Resolve to EMU against the page extent along this length's axis.
    ///
    /// # Arguments
    /// * `extent` - Page width (for x/w) or height (for y/h) in EMU
    pub fn to_emu(self, extent: i64) -> i64 {
        match self {
            Self::Inches(v) => inches_to_emu(v),
            Self::Percent(p) => (extent as f64 * p / 100.0).round() as i64,
            Self::Points(v) => pt_to_emu_f64(v),
            Self::Centimeters(v) => (v * EMUS_PER_CM as f64).round() as i64,
            Self::Millimeters(v) => (v * EMUS_PER_MM as f64).round() as i64,
            Self::Emu(v) => v,
        }
    }
}

impl From<f64> for Length {
    fn from(inches: f64) -> Self {
        Self::Inches(inches)
    }
}

impl From<i32> for Length {
    fn from(inches: i32) -> Self {
        Self::Inches(inches as f64)
    }
}

impl TryFrom<&str> for Length {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        s.parse()
    }
}

impl FromStr for Length {
    type Err = Error;

    /// Parse `"50%"`, `"2in"`, `"72pt"`, `"3cm"`, `"25mm"`, `"12700emu"` or a
    /// bare number of inches.
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let invalid = || ConfigurationError::InvalidLength(s.to_string());

        // The unit is the trailing run of letters, so exponents stay in the number.
        let is_unit = |c: char| c.is_ascii_alphabetic() || c == '%';
        let split = trimmed
            .char_indices()
            .rev()
            .find(|&(_, c)| !is_unit(c))
            .map_or(0, |(i, c)| i + c.len_utf8());
        let (number, unit) = trimmed.split_at(split);
        let number = number.trim();

        if unit == "emu" {
            let v = number.parse::<i64>().map_err(|_| invalid())?;
            return Ok(Self::Emu(v));
        }

        let value = number.parse::<f64>().map_err(|_| invalid())?;
        if !value.is_finite() {
            return Err(invalid().into());
        }

        match unit {
            "" | "in" | "inch" => Ok(Self::Inches(value)),
            "%" => Ok(Self::Percent(value)),
            "pt" => Ok(Self::Points(value)),
            "cm" => Ok(Self::Centimeters(value)),
            "mm" => Ok(Self::Millimeters(value)),
            _ => Err(invalid().into()),
        }
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inches(v) => write!(f, "{}in", v),
            Self::Percent(v) => write!(f, "{}%", v),
            Self::Points(v) => write!(f, "{}pt", v),
            Self::Centimeters(v) => write!(f, "{}cm", v),
            Self::Millimeters(v) => write!(f, "{}mm", v),
            Self::Emu(v) => write!(f, "{}emu", v),
        }
    }
}

impl<'de> Deserialize<'de> for Length {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(f64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(v) => Ok(Self::Inches(v)),
            Raw::Text(s) => s.parse().map_err(serde::de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inches_to_emu() {
        assert_eq!(inches_to_emu(1.0), 914_400);
        assert_eq!(inches_to_emu(8.27), (8.27f64 * 914_400.0).round() as i64);
        assert_eq!(inches_to_emu(-0.5), -457_200);
    }

    #[test]
    fn test_parse_units() {
        assert_eq!("50%".parse::<Length>().unwrap(), Length::Percent(50.0));
        assert_eq!("2in".parse::<Length>().unwrap(), Length::Inches(2.0));
        assert_eq!("1.5".parse::<Length>().unwrap(), Length::Inches(1.5));
        assert_eq!("72pt".parse::<Length>().unwrap(), Length::Points(72.0));
        assert_eq!("3 cm".parse::<Length>().unwrap(), Length::Centimeters(3.0));
        assert_eq!("12700emu".parse::<Length>().unwrap(), Length::Emu(12_700));
    }

    #[test]
    fn test_parse_exponents() {
        assert_eq!("1e-2in".parse::<Length>().unwrap(), Length::Inches(0.01));
        assert_eq!("2.5E1pt".parse::<Length>().unwrap(), Length::Points(25.0));
        assert_eq!("1e1".parse::<Length>().unwrap(), Length::Inches(10.0));
        assert!("2e".parse::<Length>().is_err());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("".parse::<Length>().is_err());
        assert!("wide".parse::<Length>().is_err());
        assert!("5furlongs".parse::<Length>().is_err());
        assert!("1.5emu".parse::<Length>().is_err());
    }

    #[test]
    fn test_percent_resolves_against_extent() {
        assert_eq!(Length::Percent(50.0).to_emu(9_144_000), 4_572_000);
        assert_eq!(Length::Points(72.0).to_emu(0), EMUS_PER_INCH);
        assert_eq!(Length::Millimeters(10.0).to_emu(0), EMUS_PER_CM);
    }

    #[test]
    fn test_centipoints() {
        assert_eq!(pt_to_centipoints(12.0), 1200);
        assert_eq!(pt_to_centipoints(10.5), 1050);
    }
}
