//! Flat JSON wire format for diagrams and connector templates.
//!
//! Shapes reference their parent by index into `parts` at export time; the
//! index is only meaningful within one export/import cycle.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::Result;
use crate::geometry;
use crate::layout;
use crate::model::{
    self, Attachment, ConnectorKind, Diagram, IdAllocator, Part, PartId, Point, RelativeGeometry,
    Shape, ShapeGeometry, SpecialForm, SymVertex,
};

fn default_color() -> String {
    model::DEFAULT_PART_COLOR.to_string()
}

fn default_stroke_width() -> f32 {
    model::DEFAULT_STROKE_WIDTH
}

fn default_true() -> bool {
    true
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DiagramFile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub parts: Vec<PartRecord>,
    #[serde(default)]
    pub drawn_shapes: Vec<ShapeRecord>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PartRecord {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default)]
    pub top_connector: ConnectorKind,
    #[serde(default)]
    pub bottom_connector: ConnectorKind,
    #[serde(default)]
    pub special: bool,
    #[serde(default)]
    pub special_forms: Vec<SpecialForm>,
    #[serde(default)]
    pub sym_vertices: Vec<SymVertex>,
    #[serde(default = "default_true", rename = "has3d")]
    pub has_3d: bool,
}

impl From<&Part> for PartRecord {
    fn from(p: &Part) -> Self {
        Self {
            x: p.x,
            y: p.y,
            width: p.width,
            height: p.height,
            color: p.color.clone(),
            top_connector: p.top_connector,
            bottom_connector: p.bottom_connector,
            special: p.special,
            special_forms: p.special_forms.clone(),
            sym_vertices: p.sym_vertices.clone(),
            has_3d: p.has_3d,
        }
    }
}

impl PartRecord {
    /// Builds a live part; corner vertices are added when missing.
    pub fn to_part(&self, id: PartId) -> Part {
        let mut part = Part {
            id,
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
            color: self.color.clone(),
            top_connector: self.top_connector,
            bottom_connector: self.bottom_connector,
            special: self.special,
            special_forms: self.special_forms.clone(),
            sym_vertices: self.sym_vertices.clone(),
            has_3d: self.has_3d,
        };
        part.ensure_corner_vertices();
        part
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LineRecord {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    #[serde(rename = "width", default = "default_stroke_width")]
    pub stroke_width: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rel_x1: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rel_y1: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rel_x2: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rel_y2: Option<f32>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CircleRecord {
    pub cx: f32,
    pub cy: f32,
    pub r: f32,
    #[serde(rename = "width", default = "default_stroke_width")]
    pub stroke_width: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_index: Option<usize>,
    #[serde(rename = "relCX", default, skip_serializing_if = "Option::is_none")]
    pub rel_cx: Option<f32>,
    #[serde(rename = "relCY", default, skip_serializing_if = "Option::is_none")]
    pub rel_cy: Option<f32>,
    #[serde(rename = "relR", default, skip_serializing_if = "Option::is_none")]
    pub rel_r: Option<f32>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CurveRecord {
    pub p0: Point,
    pub p1: Point,
    pub p2: Point,
    #[serde(rename = "width", default = "default_stroke_width")]
    pub stroke_width: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rel_p0: Option<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rel_p1: Option<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rel_p2: Option<Point>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum ShapeRecord {
    #[serde(rename = "line")]
    Line(LineRecord),
    #[serde(rename = "circle")]
    Circle(CircleRecord),
    #[serde(rename = "curve")]
    Curve(CurveRecord),
    /// Any other `type`; skipped on import.
    #[serde(other)]
    Unsupported,
}

impl ShapeRecord {
    pub fn parent_index(&self) -> Option<usize> {
        match self {
            ShapeRecord::Line(l) => l.parent_index,
            ShapeRecord::Circle(c) => c.parent_index,
            ShapeRecord::Curve(c) => c.parent_index,
            ShapeRecord::Unsupported => None,
        }
    }

    fn stroke_width(&self) -> f32 {
        match self {
            ShapeRecord::Line(l) => l.stroke_width,
            ShapeRecord::Circle(c) => c.stroke_width,
            ShapeRecord::Curve(c) => c.stroke_width,
            ShapeRecord::Unsupported => model::DEFAULT_STROKE_WIDTH,
        }
    }

    fn geometry(&self) -> Option<ShapeGeometry> {
        match self {
            ShapeRecord::Line(l) => Some(ShapeGeometry::Line {
                a: Point::new(l.x1, l.y1),
                b: Point::new(l.x2, l.y2),
            }),
            ShapeRecord::Circle(c) => Some(ShapeGeometry::Circle {
                center: Point::new(c.cx, c.cy),
                r: c.r,
            }),
            ShapeRecord::Curve(c) => Some(ShapeGeometry::Curve {
                p0: c.p0,
                p1: c.p1,
                p2: c.p2,
            }),
            ShapeRecord::Unsupported => None,
        }
    }

    /// Stored fractions, present only when every field for the shape's kind is.
    fn relative(&self) -> Option<RelativeGeometry> {
        match self {
            ShapeRecord::Line(l) => Some(RelativeGeometry::Line {
                a: Point::new(l.rel_x1?, l.rel_y1?),
                b: Point::new(l.rel_x2?, l.rel_y2?),
            }),
            ShapeRecord::Circle(c) => Some(RelativeGeometry::Circle {
                center: Point::new(c.rel_cx?, c.rel_cy?),
                r: c.rel_r?,
            }),
            ShapeRecord::Curve(c) => Some(RelativeGeometry::Curve {
                p0: c.rel_p0?,
                p1: c.rel_p1?,
                p2: c.rel_p2?,
            }),
            ShapeRecord::Unsupported => None,
        }
    }

    fn from_shape(shape: &Shape, parent_index: Option<usize>) -> Self {
        let rel = parent_index.and(shape.attachment.map(|a| a.rel));
        let stroke_width = shape.stroke_width;
        match shape.geometry {
            ShapeGeometry::Line { a, b } => {
                let (ra, rb) = match rel {
                    Some(RelativeGeometry::Line { a, b }) => (Some(a), Some(b)),
                    _ => (None, None),
                };
                ShapeRecord::Line(LineRecord {
                    x1: a.x,
                    y1: a.y,
                    x2: b.x,
                    y2: b.y,
                    stroke_width,
                    parent_index,
                    rel_x1: ra.map(|p| p.x),
                    rel_y1: ra.map(|p| p.y),
                    rel_x2: rb.map(|p| p.x),
                    rel_y2: rb.map(|p| p.y),
                })
            }
            ShapeGeometry::Circle { center, r } => {
                let (rc, rr) = match rel {
                    Some(RelativeGeometry::Circle { center, r }) => (Some(center), Some(r)),
                    _ => (None, None),
                };
                ShapeRecord::Circle(CircleRecord {
                    cx: center.x,
                    cy: center.y,
                    r,
                    stroke_width,
                    parent_index,
                    rel_cx: rc.map(|p| p.x),
                    rel_cy: rc.map(|p| p.y),
                    rel_r: rr,
                })
            }
            ShapeGeometry::Curve { p0, p1, p2 } => {
                let rel = match rel {
                    Some(RelativeGeometry::Curve { p0, p1, p2 }) => Some((p0, p1, p2)),
                    _ => None,
                };
                ShapeRecord::Curve(CurveRecord {
                    p0,
                    p1,
                    p2,
                    stroke_width,
                    parent_index,
                    rel_p0: rel.map(|r| r.0),
                    rel_p1: rel.map(|r| r.1),
                    rel_p2: rel.map(|r| r.2),
                })
            }
        }
    }
}

/// Snapshot of the whole diagram with absolute geometry and attachment data.
pub fn export(diagram: &Diagram) -> DiagramFile {
    let parts = diagram.parts.iter().map(PartRecord::from).collect();
    let drawn_shapes = diagram
        .shapes
        .iter()
        .map(|s| {
            let parent = s
                .attachment
                .and_then(|a| diagram.part_index(a.part));
            ShapeRecord::from_shape(s, parent)
        })
        .collect();
    DiagramFile {
        name: diagram.name.clone(),
        parts,
        drawn_shapes,
    }
}

/// Rebuilds a diagram: parts in order with the stacking and corner-vertex
/// invariants restored, then shapes re-attached by index into the new parts.
pub fn import(file: &DiagramFile, ids: &mut IdAllocator) -> Diagram {
    let mut parts: Vec<Part> = file.parts.iter().map(|r| r.to_part(ids.part())).collect();
    layout::restack_from(&mut parts, 1);

    let mut shapes = Vec::with_capacity(file.drawn_shapes.len());
    for (i, record) in file.drawn_shapes.iter().enumerate() {
        let Some(mut geometry) = record.geometry() else {
            warn!(index = i, "skipping drawn shape of unsupported type");
            continue;
        };
        let parent = match record.parent_index() {
            Some(idx) if idx < parts.len() => Some(&parts[idx]),
            Some(idx) => {
                warn!(index = i, parent_index = idx, "parent index out of range, shape left unattached");
                None
            }
            None => None,
        };
        let attachment = parent.map(|part| {
            let bounds = part.bounds();
            let rel = match record.relative() {
                Some(rel) => {
                    geometry = geometry::resolve_relative(&rel, &bounds);
                    rel
                }
                None => geometry::relative_geometry(&geometry, &bounds),
            };
            Attachment { part: part.id, rel }
        });
        shapes.push(Shape {
            id: ids.shape(),
            geometry,
            stroke_width: record.stroke_width(),
            attachment,
        });
    }

    info!(
        parts = parts.len(),
        shapes = shapes.len(),
        "imported diagram"
    );
    Diagram {
        name: file.name.clone(),
        parts,
        shapes,
    }
}

pub fn to_json_pretty(file: &DiagramFile) -> Result<String> {
    Ok(serde_json::to_string_pretty(file)?)
}

pub fn from_json(s: &str) -> Result<DiagramFile> {
    Ok(serde_json::from_str(s)?)
}
