//! Axis rulers around the stack.
//!
//! Rulers live in screen space (canvas units times zoom) so their stroke and
//! font stay the same size at every zoom level.

use crate::model::{Part, Point, Rect};
use crate::units::{self, UNITS_PER_CM, UNITS_PER_INCH};

/// Candidate vertical tick steps in centimetres.
pub const VERTICAL_SCALES: [f32; 6] = [1.0, 2.0, 4.0, 6.0, 8.0, 10.0];
pub const TICK_HALF: f32 = 4.0;
pub const AXIS_FONT_SIZE: f32 = 10.0;
pub const BODY_AXIS_FONT_SIZE: f32 = 9.0;

const H_AXIS_GAP: f32 = 10.0;
const V_AXIS_GAP: f32 = 20.0;
const BODY_AXIS_GAP: f32 = 12.0;

/// Vertical ruler step for a zoom level. Zooming out thins the ticks.
pub fn vertical_step_cm(zoom: f32) -> f32 {
    let index = if zoom < 1.0 {
        (((1.0 - zoom) / 0.5).floor() as usize).min(VERTICAL_SCALES.len() - 1)
    } else {
        0
    };
    VERTICAL_SCALES[index]
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

impl TextAnchor {
    pub fn svg_name(self) -> &'static str {
        match self {
            TextAnchor::Start => "start",
            TextAnchor::Middle => "middle",
            TextAnchor::End => "end",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RulerLabel {
    pub at: Point,
    pub text: String,
    pub anchor: TextAnchor,
    pub font_size: f32,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Rulers {
    pub lines: Vec<[Point; 2]>,
    pub labels: Vec<RulerLabel>,
}

impl Rulers {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty() && self.labels.is_empty()
    }

    fn line(&mut self, a: Point, b: Point) {
        self.lines.push([a, b]);
    }

    fn label(&mut self, at: Point, text: impl Into<String>, anchor: TextAnchor, font_size: f32) {
        self.labels.push(RulerLabel {
            at,
            text: text.into(),
            anchor,
            font_size,
        });
    }
}

/// Builds every ruler for `parts` at `zoom`. Empty when there are no parts.
pub fn build(parts: &[Part], zoom: f32) -> Rulers {
    let mut out = Rulers::default();
    let Some(bounds) = parts.iter().map(Part::bounds).reduce(Rect::union) else {
        return out;
    };
    horizontal_axis(&mut out, &bounds, zoom);
    vertical_axis(&mut out, &bounds, zoom, vertical_step_cm(zoom));
    for part in parts {
        body_axis(&mut out, part, zoom);
    }
    out
}

fn horizontal_axis(out: &mut Rulers, b: &Rect, zoom: f32) {
    let axis_y = b.bottom() * zoom + H_AXIS_GAP;
    out.line(
        Point::new(b.x * zoom, axis_y),
        Point::new(b.right() * zoom, axis_y),
    );

    // Ticks run outwards from the centre, half an inch per side per step,
    // so tick `i` spans a total width of `i` inches.
    let center_x = b.center().x * zoom;
    let steps = (b.width / UNITS_PER_INCH).ceil() as usize;
    for i in 0..=steps {
        let d = i as f32 * 0.5 * UNITS_PER_INCH * zoom;
        let sides: &[f32] = if i == 0 { &[0.0] } else { &[-1.0, 1.0] };
        for s in sides {
            let x = center_x + s * d;
            out.line(
                Point::new(x, axis_y - TICK_HALF),
                Point::new(x, axis_y + TICK_HALF),
            );
            out.label(
                Point::new(x, axis_y + 14.0),
                i.to_string(),
                TextAnchor::Middle,
                AXIS_FONT_SIZE,
            );
        }
    }
    out.label(
        Point::new(b.right() * zoom + 12.0, axis_y + 14.0),
        "inch",
        TextAnchor::Start,
        AXIS_FONT_SIZE,
    );
}

fn vertical_axis(out: &mut Rulers, b: &Rect, zoom: f32, step_cm: f32) {
    let axis_x = b.x * zoom - V_AXIS_GAP;
    out.line(
        Point::new(axis_x, b.bottom() * zoom),
        Point::new(axis_x, b.y * zoom),
    );
    let steps = (b.height / UNITS_PER_CM / step_cm).ceil() as usize;
    for i in 0..=steps {
        let cm = i as f32 * step_cm;
        let y = b.bottom() * zoom - cm * UNITS_PER_CM * zoom;
        out.line(
            Point::new(axis_x - TICK_HALF, y),
            Point::new(axis_x + TICK_HALF, y),
        );
        out.label(
            Point::new(axis_x - 6.0, y + 3.0),
            format!("{cm}"),
            TextAnchor::End,
            AXIS_FONT_SIZE,
        );
    }
    out.label(
        Point::new(axis_x, b.y * zoom - 10.0),
        "cm",
        TextAnchor::Middle,
        AXIS_FONT_SIZE,
    );
}

fn body_axis(out: &mut Rulers, part: &Part, zoom: f32) {
    let x = (part.x + part.width) * zoom + BODY_AXIS_GAP;
    let top = part.y * zoom;
    let bottom = part.bottom() * zoom;
    out.line(Point::new(x, top), Point::new(x, bottom));
    for y in [top, bottom] {
        out.line(Point::new(x - TICK_HALF, y), Point::new(x + TICK_HALF, y));
    }
    out.label(
        Point::new(x + 6.0, (top + bottom) * 0.5),
        format!("{}cm", units::format_cm(part.height)),
        TextAnchor::Start,
        BODY_AXIS_FONT_SIZE,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PartId;

    #[test]
    fn step_grows_as_zoom_shrinks() {
        assert_eq!(vertical_step_cm(1.0), 1.0);
        assert_eq!(vertical_step_cm(2.0), 1.0);
        assert_eq!(vertical_step_cm(0.75), 1.0);
        assert_eq!(vertical_step_cm(0.5), 2.0);
        assert_eq!(vertical_step_cm(0.25), 2.0);
    }

    #[test]
    fn no_parts_no_rulers() {
        assert!(build(&[], 1.0).is_empty());
    }

    #[test]
    fn body_label_reads_height_in_cm() {
        let part = Part::new(PartId(1), 0.0, 0.0, 96.0, UNITS_PER_CM * 5.0);
        let rulers = build(&[part], 1.0);
        assert!(rulers.labels.iter().any(|l| l.text == "5cm"));
        assert!(rulers.labels.iter().any(|l| l.text == "inch"));
        assert!(rulers.labels.iter().any(|l| l.text == "cm"));
        // one-inch body: centre tick plus two ticks for i = 1
        let inch_ticks = rulers
            .labels
            .iter()
            .filter(|l| l.anchor == TextAnchor::Middle && l.text != "cm")
            .count();
        assert_eq!(inch_ticks, 3);
    }
}
