//! Static SVG rendering of a diagram for export.

use std::fmt::Write as _;

use crate::color::{self, Fill, GradientStop, Rgb};
use crate::connector::Connector;
use crate::model::{Diagram, Point, Rect, ShapeGeometry};
use crate::rulers::{self, Rulers};
use crate::view::{PartView, ShapeView, ViewCache};

const PADDING: f32 = 24.0;
/// Extra room for the axis labels around the stack.
const RULER_PADDING: f32 = 48.0;
const OUTLINE_STROKE: &str = "#333333";
const SHAPE_STROKE: &str = "#000000";

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

fn points_attr(points: &[Point]) -> String {
    points
        .iter()
        .map(|p| format!("{:.3},{:.3}", p.x, p.y))
        .collect::<Vec<_>>()
        .join(" ")
}

fn dash_attr(dash: Option<&str>) -> String {
    dash.map(|d| format!(r#" stroke-dasharray="{d}""#))
        .unwrap_or_default()
}

fn gradient_def(out: &mut String, id: &str, stops: &[GradientStop]) {
    let _ = writeln!(out, r#"<linearGradient id="{id}" x1="0" y1="0" x2="1" y2="0">"#);
    for s in stops {
        let _ = writeln!(
            out,
            r#"<stop offset="{:.0}%" stop-color="{}"/>"#,
            s.offset * 100.0,
            s.color.to_hex()
        );
    }
    out.push_str("</linearGradient>\n");
}

fn part_fill_attr(view: &PartView) -> String {
    match &view.fill {
        Fill::Solid(c) => c.to_hex(),
        Fill::Cylinder(_) => format!("url(#body_{})", view.id.0),
    }
}

fn export_bounds(diagram: &Diagram, views: &ViewCache) -> Rect {
    let mut bounds = diagram.parts_bounds();
    let mut grow = |r: Rect| {
        bounds = Some(bounds.map_or(r, |b| b.union(r)));
    };
    for view in diagram.parts.iter().filter_map(|p| views.part(p.id)) {
        for c in &view.connectors {
            grow(c.bounds);
        }
        for f in &view.special_forms {
            grow(f.rect);
            if let Some(m) = f.mirror {
                grow(m);
            }
        }
    }
    for shape in &diagram.shapes {
        let r = match shape.geometry {
            ShapeGeometry::Circle { center, r } => Rect::centered(center, r * 2.0),
            ShapeGeometry::Line { a, b } => Rect::new(
                a.x.min(b.x),
                a.y.min(b.y),
                (a.x - b.x).abs(),
                (a.y - b.y).abs(),
            ),
            ShapeGeometry::Curve { p0, p1, p2 } => {
                let xs = [p0.x, p1.x, p2.x];
                let ys = [p0.y, p1.y, p2.y];
                let min_x = xs.iter().copied().fold(f32::INFINITY, f32::min);
                let min_y = ys.iter().copied().fold(f32::INFINITY, f32::min);
                let max_x = xs.iter().copied().fold(f32::NEG_INFINITY, f32::max);
                let max_y = ys.iter().copied().fold(f32::NEG_INFINITY, f32::max);
                Rect::new(min_x, min_y, max_x - min_x, max_y - min_y)
            }
        };
        grow(r);
    }
    bounds.unwrap_or(Rect::new(0.0, 0.0, 800.0, 600.0))
}

fn write_connector(out: &mut String, c: &Connector, gradient: Option<&str>) {
    let style = c.style;
    let fill = gradient
        .map(|id| format!("url(#{id})"))
        .unwrap_or_else(|| style.fill.to_string());
    let stroke = match style.stroke {
        Some(s) => format!(
            r#" stroke="{}" stroke-width="{:.3}"{}"#,
            s,
            style.stroke_width,
            dash_attr(style.dash)
        ),
        None => r#" stroke="none""#.to_string(),
    };
    for body in &c.bodies {
        let _ = writeln!(
            out,
            r#"<polygon points="{}" fill="{}"{} />"#,
            points_attr(body),
            fill,
            stroke
        );
    }
    for [a, b] in &c.lines {
        let _ = writeln!(
            out,
            r#"<line x1="{:.3}" y1="{:.3}" x2="{:.3}" y2="{:.3}" stroke="{}" stroke-width="{:.3}"{} />"#,
            a.x,
            a.y,
            b.x,
            b.y,
            style.line_stroke,
            style.line_width * c.scale,
            dash_attr(style.dash)
        );
    }
}

fn write_part(out: &mut String, view: &PartView) {
    let fill = part_fill_attr(view);
    let _ = writeln!(
        out,
        r#"<polygon points="{}" fill="{}" stroke="{}" stroke-width="1" />"#,
        points_attr(&view.outline),
        fill,
        OUTLINE_STROKE
    );
    for f in &view.special_forms {
        for r in std::iter::once(f.rect).chain(f.mirror) {
            let _ = writeln!(
                out,
                r#"<rect x="{:.3}" y="{:.3}" width="{:.3}" height="{:.3}" rx="{:.3}" fill="{}" stroke="{}" stroke-width="1" />"#,
                r.x, r.y, r.width, r.height, f.rx, fill, OUTLINE_STROKE
            );
        }
    }
    let gradient = view
        .shaded_connectors
        .then(|| format!("connector_{}", view.id.0));
    for c in &view.connectors {
        write_connector(out, c, gradient.as_deref());
    }
    for label in view.labels.iter().filter(|l| !l.text.is_empty()) {
        let _ = writeln!(
            out,
            r#"<text x="{:.3}" y="{:.3}" font-size="10" text-anchor="middle">{}</text>"#,
            label.anchor.x,
            label.anchor.y,
            escape_xml(label.text)
        );
    }
}

fn write_shape(out: &mut String, view: &ShapeView) {
    let stroke = format!(
        r#"stroke="{}" stroke-width="{:.3}" fill="none""#,
        SHAPE_STROKE, view.stroke_width
    );
    let _ = match view.geometry {
        ShapeGeometry::Line { a, b } => writeln!(
            out,
            r#"<line x1="{:.3}" y1="{:.3}" x2="{:.3}" y2="{:.3}" {} />"#,
            a.x, a.y, b.x, b.y, stroke
        ),
        ShapeGeometry::Circle { center, r } => writeln!(
            out,
            r#"<circle cx="{:.3}" cy="{:.3}" r="{:.3}" {} />"#,
            center.x, center.y, r, stroke
        ),
        ShapeGeometry::Curve { p0, p1, p2 } => writeln!(
            out,
            r#"<path d="M {:.3} {:.3} Q {:.3} {:.3} {:.3} {:.3}" {} />"#,
            p0.x, p0.y, p1.x, p1.y, p2.x, p2.y, stroke
        ),
    };
}

fn write_rulers(out: &mut String, rulers: &Rulers) {
    out.push_str(r##"<g class="axes" stroke="#000000" stroke-width="1">"##);
    out.push('\n');
    for [a, b] in &rulers.lines {
        let _ = writeln!(
            out,
            r#"<line x1="{:.3}" y1="{:.3}" x2="{:.3}" y2="{:.3}" />"#,
            a.x, a.y, b.x, b.y
        );
    }
    for l in &rulers.labels {
        let _ = writeln!(
            out,
            r#"<text x="{:.3}" y="{:.3}" font-size="{}" text-anchor="{}" stroke="none">{}</text>"#,
            l.at.x,
            l.at.y,
            l.font_size,
            l.anchor.svg_name(),
            escape_xml(&l.text)
        );
    }
    out.push_str("</g>\n");
}

/// Renders the diagram at zoom 1. `views` must be in step with `diagram`.
pub fn diagram_to_svg(diagram: &Diagram, views: &ViewCache, show_rulers: bool) -> String {
    let bounds = export_bounds(diagram, views);
    let padding = if show_rulers { RULER_PADDING } else { PADDING };
    let min_x = bounds.x - padding;
    let min_y = bounds.y - padding;
    let width = bounds.width + padding * 2.0;
    let height = bounds.height + padding * 2.0;

    let part_views: Vec<&PartView> = diagram
        .parts
        .iter()
        .filter_map(|p| views.part(p.id))
        .collect();

    let mut out = String::new();
    out.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    out.push('\n');
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="{:.3} {:.3} {:.3} {:.3}" width="{:.3}" height="{:.3}">"#,
        min_x, min_y, width, height, width, height
    );
    if !diagram.name.is_empty() {
        let _ = writeln!(out, "<title>{}</title>", escape_xml(&diagram.name));
    }
    out.push_str("<defs>\n");
    for view in &part_views {
        if let Fill::Cylinder(stops) = &view.fill {
            gradient_def(&mut out, &format!("body_{}", view.id.0), stops);
        }
        if view.shaded_connectors && !view.connectors.is_empty() {
            let connector_base = view
                .connectors
                .first()
                .and_then(|c| Rgb::parse(c.style.fill).ok())
                .unwrap_or(Rgb::new(0xcc, 0xcc, 0xcc));
            gradient_def(
                &mut out,
                &format!("connector_{}", view.id.0),
                &color::cylinder_gradient(connector_base),
            );
        }
    }
    out.push_str("</defs>\n");

    for view in &part_views {
        write_part(&mut out, view);
    }
    for view in diagram.shapes.iter().filter_map(|s| views.shape(s.id)) {
        write_shape(&mut out, view);
    }
    if show_rulers {
        write_rulers(&mut out, &rulers::build(&diagram.parts, 1.0));
    }

    out.push_str("</svg>\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Part, PartId};

    #[test]
    fn escapes_markup() {
        assert_eq!(escape_xml(r#"a<b & "c""#), "a&lt;b &amp; &quot;c&quot;");
    }

    #[test]
    fn shaded_part_references_its_gradient() {
        let mut diagram = Diagram::default();
        diagram.parts.push(Part::new(PartId(3), 0.0, 20.0, 60.0, 120.0));
        let mut views = ViewCache::default();
        views.rebuild(&diagram, None, None, None);
        let svg = diagram_to_svg(&diagram, &views, false);
        assert!(svg.contains(r#"<linearGradient id="body_3""#));
        assert!(svg.contains("url(#body_3)"));
        assert!(!svg.contains("inch"));
    }

    #[test]
    fn rulers_are_optional() {
        let mut diagram = Diagram::default();
        diagram.parts.push(Part::new(PartId(1), 0.0, 20.0, 96.0, 120.0));
        let mut views = ViewCache::default();
        views.rebuild(&diagram, None, None, None);
        assert!(diagram_to_svg(&diagram, &views, true).contains(">inch</text>"));
    }
}
