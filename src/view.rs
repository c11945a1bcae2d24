//! Derived view state keyed by stable ids.
//!
//! A view is a pure function of one model entity (plus the connector
//! template and selection). Renderers read these and never touch the model.

use std::collections::HashMap;

use tracing::warn;

use crate::color::{Fill, Rgb};
use crate::connector::{self, Connector, ConnectorTemplate};
use crate::geometry::{self, PartHandles, VertexHandle};
use crate::model::{
    ConnectorEnd, ConnectorKind, DEFAULT_PART_COLOR, Diagram, Part, PartId, Point, Rect, Shape, ShapeGeometry,
    ShapeId,
};

pub const LABEL_OFFSET: f32 = 6.0;
pub const SPECIAL_MARKER_SIZE: f32 = 14.0;
const SPECIAL_MARKER_GAP: f32 = 4.0;

#[derive(Clone, Debug, PartialEq)]
pub struct ConnectorLabel {
    pub end: ConnectorEnd,
    pub anchor: Point,
    pub text: &'static str,
    pub active: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SpecialFormView {
    pub rect: Rect,
    pub rx: f32,
    pub mirror: Option<Rect>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PartView {
    pub id: PartId,
    pub bounds: Rect,
    pub outline: Vec<Point>,
    pub bands: Vec<[Point; 4]>,
    pub fill: Fill,
    pub handles: PartHandles,
    pub vertex_handles: Vec<VertexHandle>,
    pub labels: [ConnectorLabel; 2],
    pub special_marker: Option<Rect>,
    pub special_forms: Vec<SpecialFormView>,
    pub connectors: Vec<Connector>,
    /// Connectors share the part's shading.
    pub shaded_connectors: bool,
    pub handles_visible: bool,
}

fn part_fill(part: &Part) -> Fill {
    let base = Rgb::parse(&part.color).unwrap_or_else(|e| {
        warn!(part = ?part.id, error = %e, "falling back to default part colour");
        Rgb::parse(DEFAULT_PART_COLOR).unwrap_or(Rgb::new(0xcc, 0xcc, 0xcc))
    });
    Fill::new(base, part.has_3d)
}

fn connector_label(part: &Part, end: ConnectorEnd) -> ConnectorLabel {
    let kind = part.connector(end);
    let y = match end {
        ConnectorEnd::Top => part.y - LABEL_OFFSET,
        ConnectorEnd::Bottom => part.bottom() + LABEL_OFFSET,
    };
    ConnectorLabel {
        end,
        anchor: Point::new(part.center_x(), y),
        text: kind.label(),
        active: kind == ConnectorKind::Pin,
    }
}

impl PartView {
    pub fn build(part: &Part, template: Option<&ConnectorTemplate>, selected: bool) -> Self {
        let center_x = part.center_x();
        Self {
            id: part.id,
            bounds: part.bounds(),
            outline: geometry::outline(part),
            bands: geometry::outline_bands(part),
            fill: part_fill(part),
            handles: geometry::part_handles(part),
            vertex_handles: geometry::vertex_handles(part),
            labels: [
                connector_label(part, ConnectorEnd::Top),
                connector_label(part, ConnectorEnd::Bottom),
            ],
            special_marker: part.special.then(|| {
                Rect::new(
                    part.x + part.width + SPECIAL_MARKER_GAP,
                    part.y + part.height * 0.5 - SPECIAL_MARKER_SIZE * 0.5,
                    SPECIAL_MARKER_SIZE,
                    SPECIAL_MARKER_SIZE,
                )
            }),
            special_forms: part
                .special_forms
                .iter()
                .map(|f| SpecialFormView {
                    rect: f.rect(),
                    rx: f.rx,
                    mirror: f.mirror_rect(center_x),
                })
                .collect(),
            connectors: template
                .map(|t| connector::derive_connectors(part, t))
                .unwrap_or_default(),
            shaded_connectors: part.has_3d,
            handles_visible: selected,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ShapeView {
    pub id: ShapeId,
    pub geometry: ShapeGeometry,
    pub stroke_width: f32,
    /// Polyline approximation for curves; the two endpoints for lines.
    pub path: Vec<Point>,
    pub handles: Vec<Point>,
    pub attached: bool,
    pub selected: bool,
}

impl ShapeView {
    pub fn build(shape: &Shape, selected: bool) -> Self {
        let path = match shape.geometry {
            ShapeGeometry::Line { a, b } => vec![a, b],
            ShapeGeometry::Circle { .. } => Vec::new(),
            ShapeGeometry::Curve { p0, p1, p2 } => {
                geometry::quad_bezier_points(p0, p1, p2, geometry::CURVE_SEGMENTS)
            }
        };
        Self {
            id: shape.id,
            geometry: shape.geometry,
            stroke_width: shape.stroke_width,
            path,
            handles: if selected {
                geometry::shape_handle_points(&shape.geometry)
            } else {
                Vec::new()
            },
            attached: shape.attachment.is_some(),
            selected,
        }
    }
}

/// Views for every part and shape, kept in step with the model by the editor.
#[derive(Clone, Debug, Default)]
pub struct ViewCache {
    parts: HashMap<PartId, PartView>,
    shapes: HashMap<ShapeId, ShapeView>,
}

impl ViewCache {
    pub fn part(&self, id: PartId) -> Option<&PartView> {
        self.parts.get(&id)
    }

    pub fn shape(&self, id: ShapeId) -> Option<&ShapeView> {
        self.shapes.get(&id)
    }

    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    pub fn refresh_part(&mut self, part: &Part, template: Option<&ConnectorTemplate>, selected: bool) {
        self.parts
            .insert(part.id, PartView::build(part, template, selected));
    }

    pub fn refresh_shape(&mut self, shape: &Shape, selected: bool) {
        self.shapes.insert(shape.id, ShapeView::build(shape, selected));
    }

    pub fn remove_part(&mut self, id: PartId) {
        self.parts.remove(&id);
    }

    pub fn remove_shape(&mut self, id: ShapeId) {
        self.shapes.remove(&id);
    }

    /// Throws everything away and rebuilds from the model.
    pub fn rebuild(
        &mut self,
        diagram: &Diagram,
        template: Option<&ConnectorTemplate>,
        selected_part: Option<PartId>,
        selected_shape: Option<ShapeId>,
    ) {
        self.parts.clear();
        self.shapes.clear();
        for p in &diagram.parts {
            self.refresh_part(p, template, selected_part == Some(p.id));
        }
        for s in &diagram.shapes {
            self.refresh_shape(s, selected_shape == Some(s.id));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Side, SpecialForm};

    #[test]
    fn labels_and_marker_follow_part_box() {
        let mut part = Part::new(PartId(1), 10.0, 20.0, 60.0, 120.0);
        part.top_connector = ConnectorKind::Pin;
        part.special = true;
        let v = PartView::build(&part, None, false);
        assert_eq!(v.labels[0].anchor, Point::new(40.0, 14.0));
        assert_eq!(v.labels[0].text, "PIN");
        assert!(v.labels[0].active);
        assert_eq!(v.labels[1].anchor, Point::new(40.0, 146.0));
        assert_eq!(v.labels[1].text, "");
        assert_eq!(v.special_marker, Some(Rect::new(74.0, 73.0, 14.0, 14.0)));
        assert!(v.connectors.is_empty());
        assert!(!v.handles_visible);
    }

    #[test]
    fn special_forms_carry_their_mirror() {
        let mut part = Part::new(PartId(1), 0.0, 20.0, 60.0, 120.0);
        part.special_forms.push(SpecialForm {
            x: 60.0,
            y: 70.0,
            width: 10.0,
            height: 20.0,
            rx: 2.0,
            side: Side::Right,
            symmetrical: true,
        });
        let v = PartView::build(&part, None, true);
        assert_eq!(v.special_forms[0].mirror, Some(Rect::new(-10.0, 70.0, 10.0, 20.0)));
        assert!(v.handles_visible);
    }

    #[test]
    fn invalid_colour_falls_back() {
        let mut part = Part::new(PartId(1), 0.0, 20.0, 60.0, 120.0);
        part.color = "nope".to_string();
        part.has_3d = false;
        let v = PartView::build(&part, None, false);
        assert_eq!(v.fill, Fill::Solid(Rgb::new(0xcc, 0xcc, 0xcc)));
    }
}
