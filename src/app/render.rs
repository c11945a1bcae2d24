use bodystack::color::{Fill, Rgb};
use bodystack::connector::Connector;
use bodystack::geometry;
use bodystack::model::{Point, Rect, ShapeGeometry};
use bodystack::rulers::{Rulers, TextAnchor};
use bodystack::view::{PartView, ShapeView};
use eframe::egui;

use super::{BodyApp, View};

/// Vertical strips used to approximate the cylinder gradient.
const SHADE_STRIPS: usize = 16;

const OUTLINE: egui::Color32 = egui::Color32::from_rgb(0x33, 0x33, 0x33);
const HANDLE_FILL: egui::Color32 = egui::Color32::from_rgb(0x3b, 0x82, 0xf6);
const SELECTED_SHAPE: egui::Color32 = egui::Color32::from_rgb(0x25, 0x63, 0xeb);

fn color32(c: Rgb) -> egui::Color32 {
    egui::Color32::from_rgb(c.r, c.g, c.b)
}

fn hex(s: &str) -> egui::Color32 {
    Rgb::parse(s).map(color32).unwrap_or(egui::Color32::GRAY)
}

fn lerp(a: Point, b: Point, t: f32) -> Point {
    Point::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t)
}

/// Canvas-to-screen mapping for one frame.
#[derive(Clone, Copy)]
pub(super) struct Frame {
    pub origin: egui::Pos2,
    pub zoom: f32,
    pub view: View,
}

impl Frame {
    fn pos(&self, p: Point) -> egui::Pos2 {
        self.view.world_to_screen(self.origin, self.zoom, p)
    }

    fn rect(&self, r: Rect) -> egui::Rect {
        egui::Rect::from_min_max(
            self.pos(Point::new(r.x, r.y)),
            self.pos(Point::new(r.right(), r.bottom())),
        )
    }

    fn points(&self, pts: &[Point]) -> Vec<egui::Pos2> {
        pts.iter().map(|p| self.pos(*p)).collect()
    }
}

fn paint_band(painter: &egui::Painter, f: Frame, band: &[Point; 4], fill: &Fill) {
    match fill {
        Fill::Solid(c) => {
            painter.add(egui::Shape::convex_polygon(
                f.points(band),
                color32(*c),
                egui::Stroke::NONE,
            ));
        }
        Fill::Cylinder(_) => {
            let [tl, tr, br, bl] = *band;
            for i in 0..SHADE_STRIPS {
                let t0 = i as f32 / SHADE_STRIPS as f32;
                let t1 = (i + 1) as f32 / SHADE_STRIPS as f32;
                let strip = [
                    lerp(tl, tr, t0),
                    lerp(tl, tr, t1),
                    lerp(bl, br, t1),
                    lerp(bl, br, t0),
                ];
                painter.add(egui::Shape::convex_polygon(
                    f.points(&strip),
                    color32(fill.at((t0 + t1) * 0.5)),
                    egui::Stroke::NONE,
                ));
            }
        }
    }
}

fn paint_connector(painter: &egui::Painter, f: Frame, c: &Connector, shaded: bool) {
    let style = c.style;
    let base = hex(style.fill);
    let fill = if shaded {
        // Connectors sit on the body centreline where the gradient peaks.
        Rgb::parse(style.fill)
            .map(|rgb| color32(rgb.lighten(0.2)))
            .unwrap_or(base)
    } else {
        base
    };
    let outline = style
        .stroke
        .map(|s| egui::Stroke::new(style.stroke_width * f.zoom, hex(s)))
        .unwrap_or(egui::Stroke::NONE);
    for body in &c.bodies {
        let pts = f.points(body);
        painter.add(egui::Shape::convex_polygon(pts.clone(), fill, egui::Stroke::NONE));
        if outline != egui::Stroke::NONE {
            let mut closed = pts;
            if let Some(first) = closed.first().copied() {
                closed.push(first);
            }
            if style.dash.is_some() {
                painter.extend(egui::Shape::dashed_line(&closed, outline, 4.0, 2.0));
            } else {
                painter.add(egui::Shape::line(closed, outline));
            }
        }
    }
    let line_stroke = egui::Stroke::new(style.line_width * c.scale * f.zoom, hex(style.line_stroke));
    for [a, b] in &c.lines {
        let seg = [f.pos(*a), f.pos(*b)];
        if style.dash.is_some() {
            painter.extend(egui::Shape::dashed_line(&seg, line_stroke, 4.0, 2.0));
        } else {
            painter.line_segment(seg, line_stroke);
        }
    }
}

pub(super) fn paint_part(painter: &egui::Painter, f: Frame, view: &PartView) {
    for band in &view.bands {
        paint_band(painter, f, band, &view.fill);
    }
    painter.add(egui::Shape::closed_line(
        f.points(&view.outline),
        egui::Stroke::new(1.0, OUTLINE),
    ));

    let form_fill = color32(view.fill.at(0.5));
    for form in &view.special_forms {
        for r in std::iter::once(form.rect).chain(form.mirror) {
            let rect = f.rect(r);
            let radius = egui::CornerRadius::same((form.rx * f.zoom).clamp(0.0, 255.0) as u8);
            painter.rect(
                rect,
                radius,
                form_fill,
                egui::Stroke::new(1.0, OUTLINE),
                egui::StrokeKind::Middle,
            );
        }
    }

    for c in &view.connectors {
        paint_connector(painter, f, c, view.shaded_connectors);
    }

    for label in view.labels.iter().filter(|l| !l.text.is_empty()) {
        let color = if label.active {
            egui::Color32::BLACK
        } else {
            egui::Color32::GRAY
        };
        painter.text(
            f.pos(label.anchor),
            egui::Align2::CENTER_CENTER,
            label.text,
            egui::FontId::proportional(10.0),
            color,
        );
    }

    if let Some(marker) = view.special_marker {
        painter.rect_filled(f.rect(marker), 2.0, egui::Color32::from_rgb(0xf5, 0x9e, 0x0b));
    }

    if view.handles_visible {
        for r in [view.handles.height, view.handles.left, view.handles.right] {
            painter.rect_filled(f.rect(r), 1.0, HANDLE_FILL);
        }
        for h in &view.vertex_handles {
            painter.rect(
                f.rect(h.rect),
                0.0,
                egui::Color32::WHITE,
                egui::Stroke::new(1.0, HANDLE_FILL),
                egui::StrokeKind::Middle,
            );
        }
    }
}

fn paint_geometry(painter: &egui::Painter, f: Frame, g: &ShapeGeometry, stroke: egui::Stroke) {
    match *g {
        ShapeGeometry::Line { a, b } => {
            painter.line_segment([f.pos(a), f.pos(b)], stroke);
        }
        ShapeGeometry::Circle { center, r } => {
            painter.circle_stroke(f.pos(center), r * f.zoom, stroke);
        }
        ShapeGeometry::Curve { p0, p1, p2 } => {
            let pts = geometry::quad_bezier_points(p0, p1, p2, geometry::CURVE_SEGMENTS);
            painter.add(egui::Shape::line(f.points(&pts), stroke));
        }
    }
}

pub(super) fn paint_shape(painter: &egui::Painter, f: Frame, view: &ShapeView) {
    let color = if view.selected {
        SELECTED_SHAPE
    } else {
        egui::Color32::BLACK
    };
    let stroke = egui::Stroke::new(view.stroke_width * f.zoom, color);
    if view.path.len() > 2 {
        painter.add(egui::Shape::line(f.points(&view.path), stroke));
    } else {
        paint_geometry(painter, f, &view.geometry, stroke);
    }
    for h in &view.handles {
        painter.circle(
            f.pos(*h),
            4.0,
            egui::Color32::WHITE,
            egui::Stroke::new(1.0, SELECTED_SHAPE),
        );
    }
}

pub(super) fn paint_preview(painter: &egui::Painter, f: Frame, g: &ShapeGeometry, width: f32) {
    let stroke = egui::Stroke::new(width * f.zoom, egui::Color32::from_gray(120));
    paint_geometry(painter, f, g, stroke);
}

pub(super) fn paint_rulers(painter: &egui::Painter, f: Frame, rulers: &Rulers) {
    let stroke = egui::Stroke::new(1.0, egui::Color32::BLACK);
    let to_screen = |p: Point| f.view.zoomed_to_screen(f.origin, p);
    for [a, b] in &rulers.lines {
        painter.line_segment([to_screen(*a), to_screen(*b)], stroke);
    }
    for l in &rulers.labels {
        // Label anchors are text baselines.
        let align = match l.anchor {
            TextAnchor::Start => egui::Align2::LEFT_BOTTOM,
            TextAnchor::Middle => egui::Align2::CENTER_BOTTOM,
            TextAnchor::End => egui::Align2::RIGHT_BOTTOM,
        };
        painter.text(
            to_screen(l.at),
            align,
            &l.text,
            egui::FontId::proportional(l.font_size),
            egui::Color32::DARK_GRAY,
        );
    }
}

impl BodyApp {
    pub(super) fn paint_canvas(&self, painter: &egui::Painter, f: Frame) {
        let diagram = self.editor.diagram();
        let views = self.editor.views();
        for part in &diagram.parts {
            if let Some(view) = views.part(part.id) {
                paint_part(painter, f, view);
            }
        }
        for shape in &diagram.shapes {
            if let Some(view) = views.shape(shape.id) {
                paint_shape(painter, f, view);
            }
        }
        if let Some(g) = self
            .pointer_world
            .and_then(|p| self.editor.draw_preview(p))
        {
            paint_preview(painter, f, &g, self.editor.stroke_width());
        }
        for p in self.editor.pending_points() {
            painter.circle_filled(f.pos(*p), 3.0, egui::Color32::from_gray(120));
        }
        if self.settings.show_rulers {
            paint_rulers(painter, f, &bodystack::rulers::build(&diagram.parts, f.zoom));
        }
    }
}
