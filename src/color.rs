//! Hex colours and the cylinder shading used for 3-D parts.

use std::fmt;
use std::str::FromStr;

use crate::error::{EditorError, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#rgb` or `#rrggbb` (the `#` is optional).
    pub fn parse(s: &str) -> Result<Self> {
        let invalid = || EditorError::InvalidColor(s.to_string());
        let hex = s.trim().trim_start_matches('#');
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let expanded: String = match hex.len() {
            3 => hex.chars().flat_map(|c| [c, c]).collect(),
            6 => hex.to_string(),
            _ => return Err(invalid()),
        };
        let channel = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16).map_err(|_| invalid());
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    fn map(self, f: impl Fn(f32) -> f32) -> Self {
        let c = |v: u8| f(v as f32).round().clamp(0.0, 255.0) as u8;
        Self::new(c(self.r), c(self.g), c(self.b))
    }

    /// Moves each channel `p` of the way towards white.
    pub fn lighten(self, p: f32) -> Self {
        self.map(|c| c + (255.0 - c) * p)
    }

    /// Scales each channel down by `p`.
    pub fn darken(self, p: f32) -> Self {
        self.map(|c| c * (1.0 - p))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Rgb {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientStop {
    /// Position across the body, 0 at the left edge and 1 at the right.
    pub offset: f32,
    pub color: Rgb,
}

/// Horizontal shading that makes a flat body read as a cylinder.
pub fn cylinder_gradient(base: Rgb) -> [GradientStop; 5] {
    let dark = base.darken(0.25);
    let light = base.lighten(0.2);
    let highlight = base.lighten(0.4);
    [
        GradientStop { offset: 0.0, color: dark },
        GradientStop { offset: 0.25, color: light },
        GradientStop { offset: 0.5, color: highlight },
        GradientStop { offset: 0.75, color: light },
        GradientStop { offset: 1.0, color: dark },
    ]
}

/// Colour of the gradient at `t` in `[0, 1]`, linearly interpolated.
pub fn sample_gradient(stops: &[GradientStop], t: f32) -> Rgb {
    let t = t.clamp(0.0, 1.0);
    let Some(first) = stops.first() else {
        return Rgb::new(0, 0, 0);
    };
    for pair in stops.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if t <= b.offset {
            let span = (b.offset - a.offset).max(f32::EPSILON);
            let k = ((t - a.offset) / span).clamp(0.0, 1.0);
            let mix = |x: u8, y: u8| (x as f32 + (y as f32 - x as f32) * k).round() as u8;
            return Rgb::new(
                mix(a.color.r, b.color.r),
                mix(a.color.g, b.color.g),
                mix(a.color.b, b.color.b),
            );
        }
    }
    stops.last().map_or(first.color, |s| s.color)
}

#[derive(Clone, Debug, PartialEq)]
pub enum Fill {
    Solid(Rgb),
    Cylinder([GradientStop; 5]),
}

impl Fill {
    pub fn new(base: Rgb, shaded: bool) -> Self {
        if shaded {
            Fill::Cylinder(cylinder_gradient(base))
        } else {
            Fill::Solid(base)
        }
    }

    /// Colour at horizontal position `t` across the filled body.
    pub fn at(&self, t: f32) -> Rgb {
        match self {
            Fill::Solid(c) => *c,
            Fill::Cylinder(stops) => sample_gradient(stops, t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_short_and_long_hex() {
        assert_eq!(Rgb::parse("#ccc").unwrap(), Rgb::new(0xcc, 0xcc, 0xcc));
        assert_eq!(Rgb::parse("#12ab3F").unwrap(), Rgb::new(0x12, 0xab, 0x3f));
        assert!(Rgb::parse("#12345").is_err());
        assert!(Rgb::parse("red").is_err());
    }

    #[test]
    fn shading_matches_channel_math() {
        let base = Rgb::new(200, 100, 0);
        assert_eq!(base.darken(0.25), Rgb::new(150, 75, 0));
        assert_eq!(base.lighten(0.2), Rgb::new(211, 131, 51));
    }

    #[test]
    fn gradient_is_symmetric() {
        let stops = cylinder_gradient(Rgb::new(0xcc, 0xcc, 0xcc));
        assert_eq!(stops[0].color, stops[4].color);
        assert_eq!(stops[1].color, stops[3].color);
        assert_eq!(sample_gradient(&stops, 0.5), stops[2].color);
        assert_eq!(sample_gradient(&stops, 0.0), stops[0].color);
    }
}
