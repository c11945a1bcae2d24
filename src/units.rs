//! Dimension parsing and length formatting.
//!
//! Lengths are stored in internal units (96 per inch). User input may carry a
//! trailing `cm`, `in` or `inch` suffix; otherwise the caller's default unit
//! applies. Inch values also accept `8 1/2` and `1/4`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{EditorError, Result};

pub const UNITS_PER_INCH: f32 = 96.0;
pub const UNITS_PER_CM: f32 = 96.0 / 2.54;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LengthUnit {
    #[default]
    #[serde(rename = "cm")]
    Centimeter,
    #[serde(rename = "in", alias = "inch")]
    Inch,
}

impl LengthUnit {
    pub fn units_per(self) -> f32 {
        match self {
            LengthUnit::Centimeter => UNITS_PER_CM,
            LengthUnit::Inch => UNITS_PER_INCH,
        }
    }

    pub fn suffix(self) -> &'static str {
        match self {
            LengthUnit::Centimeter => "cm",
            LengthUnit::Inch => "in",
        }
    }

    pub fn to_units(self, value: f32) -> f32 {
        value * self.units_per()
    }

    pub fn from_units(self, units: f32) -> f32 {
        units / self.units_per()
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

impl FromStr for LengthUnit {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cm" => Ok(LengthUnit::Centimeter),
            "in" | "inch" | "inches" => Ok(LengthUnit::Inch),
            _ => Err(EditorError::InvalidDimension {
                input: s.to_string(),
            }),
        }
    }
}

/// Splits a trailing unit suffix off `input`, longest suffix first.
fn split_unit(input: &str) -> (&str, Option<LengthUnit>) {
    let lower = input.to_ascii_lowercase();
    for (suffix, unit) in [
        ("inch", LengthUnit::Inch),
        ("cm", LengthUnit::Centimeter),
        ("in", LengthUnit::Inch),
    ] {
        if lower.ends_with(suffix) {
            let cut = input.len() - suffix.len();
            return (input[..cut].trim_end(), Some(unit));
        }
    }
    (input, None)
}

fn parse_number(s: &str) -> Option<f32> {
    let v = s.parse::<f32>().ok()?;
    v.is_finite().then_some(v)
}

fn parse_whole(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Parses `N/D` or `W N/D` (digits only, denominator non-zero).
fn parse_fraction(s: &str) -> Option<f32> {
    let (whole, frac) = match s.split_once(char::is_whitespace) {
        Some((w, rest)) => (Some(w), rest.trim_start()),
        None => (None, s),
    };
    let (num, den) = frac.split_once('/')?;
    let num = parse_whole(num)?;
    let den = parse_whole(den)?;
    if den == 0 {
        return None;
    }
    let whole = match whole {
        Some(w) => parse_whole(w)?,
        None => 0,
    };
    Some(whole as f32 + num as f32 / den as f32)
}

/// Converts dimension text to internal units.
///
/// `default_unit` applies when the text carries no suffix. Fractions are only
/// understood for inch values. Empty, non-numeric and non-finite input yields
/// [`EditorError::InvalidDimension`].
pub fn parse_dimension(input: &str, default_unit: LengthUnit) -> Result<f32> {
    let invalid = || EditorError::InvalidDimension {
        input: input.to_string(),
    };
    let trimmed = input.trim();
    let (number, unit) = split_unit(trimmed);
    let unit = unit.unwrap_or(default_unit);
    let number = number.trim();
    if number.is_empty() {
        return Err(invalid());
    }

    let value = match unit {
        LengthUnit::Inch if number.contains('/') => parse_fraction(number),
        _ => parse_number(number),
    }
    .ok_or_else(invalid)?;

    Ok(unit.to_units(value))
}

/// Formats a length in centimetres with one decimal, dropping a trailing `.0`.
pub fn format_cm(units: f32) -> String {
    let cm = LengthUnit::Centimeter.from_units(units);
    let s = format!("{:.1}", cm);
    match s.strip_suffix(".0") {
        Some(whole) => whole.to_string(),
        None => s,
    }
}

/// Formats a length for a prompt default, e.g. `"12.5cm"`.
pub fn format_dimension(units: f32, unit: LengthUnit) -> String {
    let value = unit.from_units(units);
    let s = format!("{:.2}", value);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    format!("{}{}", s, unit.suffix())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn mixed_number_inches() {
        let v = parse_dimension("8 1/2in", LengthUnit::Centimeter).unwrap();
        assert!(approx(v, 8.5 * 96.0));
    }

    #[test]
    fn simple_fraction_uses_default_inch() {
        let v = parse_dimension("1/4", LengthUnit::Inch).unwrap();
        assert!(approx(v, 24.0));
    }

    #[test]
    fn centimetres_with_suffix() {
        let v = parse_dimension("10cm", LengthUnit::Inch).unwrap();
        assert!(approx(v, 10.0 * 96.0 / 2.54));
    }

    #[test]
    fn suffix_is_case_insensitive() {
        let v = parse_dimension("2 INCH", LengthUnit::Centimeter).unwrap();
        assert!(approx(v, 192.0));
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_dimension("abc", LengthUnit::Centimeter).is_err());
        assert!(parse_dimension("", LengthUnit::Centimeter).is_err());
        assert!(parse_dimension("cm", LengthUnit::Centimeter).is_err());
        assert!(parse_dimension("1/0in", LengthUnit::Centimeter).is_err());
        assert!(parse_dimension("inf", LengthUnit::Centimeter).is_err());
    }

    #[test]
    fn fractions_are_inch_only() {
        assert!(parse_dimension("1/2cm", LengthUnit::Inch).is_err());
    }

    #[test]
    fn cm_label_drops_trailing_zero() {
        assert_eq!(format_cm(UNITS_PER_CM * 3.0), "3");
        assert_eq!(format_cm(UNITS_PER_CM * 2.5), "2.5");
    }

    #[test]
    fn dimension_default_text() {
        assert_eq!(format_dimension(96.0, LengthUnit::Inch), "1in");
        assert_eq!(format_dimension(UNITS_PER_CM * 2.5, LengthUnit::Centimeter), "2.5cm");
    }
}
