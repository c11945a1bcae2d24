//! Templated PIN/BOX connectors.
//!
//! The template is a diagram file whose parts and lines describe one PIN at
//! arbitrary scale. It is shifted to the origin once at load; every connector
//! is then derived from it by scaling to 80% of the owning part's width.

use std::path::Path;

use tracing::{debug, info, warn};

use crate::error::{EditorError, Result};
use crate::geometry;
use crate::model::{ConnectorEnd, ConnectorKind, Part, Point, Rect};
use crate::serialize::{DiagramFile, ShapeRecord};

/// Connector width as a fraction of the part width.
pub const CONNECTOR_WIDTH_RATIO: f32 = 0.8;

#[derive(Clone, Debug, PartialEq)]
pub struct ConnectorTemplate {
    pub width: f32,
    pub height: f32,
    pub bodies: Vec<Vec<Point>>,
    pub lines: Vec<[Point; 2]>,
}

impl ConnectorTemplate {
    pub fn from_file(file: &DiagramFile) -> Result<Self> {
        let mut bounds: Option<Rect> = None;
        let mut extend = |r: Rect| {
            bounds = Some(bounds.map_or(r, |b| b.union(r)));
        };

        let mut bodies = Vec::with_capacity(file.parts.len());
        for p in &file.parts {
            let rect = Rect::new(p.x, p.y, p.width, p.height);
            extend(rect);
            let mut verts = p.sym_vertices.clone();
            verts.sort_by(|a, b| a.y.total_cmp(&b.y));
            bodies.push(geometry::outline_of(&rect, &verts));
        }

        let mut lines = Vec::new();
        for s in &file.drawn_shapes {
            if let ShapeRecord::Line(l) = s {
                let (a, b) = (Point::new(l.x1, l.y1), Point::new(l.x2, l.y2));
                extend(Rect::new(
                    a.x.min(b.x),
                    a.y.min(b.y),
                    (a.x - b.x).abs(),
                    (a.y - b.y).abs(),
                ));
                lines.push([a, b]);
            }
        }

        let bounds = bounds.ok_or(EditorError::EmptyTemplate)?;
        if bounds.width <= 0.0 {
            return Err(EditorError::EmptyTemplate);
        }
        let shift = |p: Point| p.offset(-bounds.x, -bounds.y);
        for body in &mut bodies {
            for p in body.iter_mut() {
                *p = shift(*p);
            }
        }
        for line in &mut lines {
            *line = [shift(line[0]), shift(line[1])];
        }

        Ok(Self {
            width: bounds.width,
            height: bounds.height,
            bodies,
            lines,
        })
    }

    pub fn from_json(s: &str) -> Result<Self> {
        let file: DiagramFile = serde_json::from_str(s)?;
        Self::from_file(&file)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let template = Self::from_json(&text)?;
        info!(
            path = %path.display(),
            width = template.width,
            height = template.height,
            "loaded connector template"
        );
        Ok(template)
    }

    /// Scale that maps the template onto a part of width `part_width`.
    pub fn scale_for(&self, part_width: f32) -> f32 {
        part_width * CONNECTOR_WIDTH_RATIO / self.width
    }
}

/// Load state of the template. Connector operations are no-ops until `Ready`.
#[derive(Clone, Debug, Default)]
pub enum TemplateState {
    #[default]
    Pending,
    Ready(ConnectorTemplate),
    Failed(String),
}

impl TemplateState {
    pub fn from_result(result: Result<ConnectorTemplate>) -> Self {
        match result {
            Ok(t) => TemplateState::Ready(t),
            Err(e) => {
                warn!(error = %e, "connector template unavailable, connectors disabled");
                TemplateState::Failed(e.to_string())
            }
        }
    }

    pub fn template(&self) -> Option<&ConnectorTemplate> {
        match self {
            TemplateState::Ready(t) => Some(t),
            TemplateState::Pending | TemplateState::Failed(_) => None,
        }
    }

    pub fn require(&self) -> Result<&ConnectorTemplate> {
        self.template().ok_or(EditorError::TemplateNotReady)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConnectorStyle {
    pub fill: &'static str,
    pub stroke: Option<&'static str>,
    pub stroke_width: f32,
    pub line_stroke: &'static str,
    pub line_width: f32,
    /// SVG dash pattern shared by outline and lines.
    pub dash: Option<&'static str>,
}

impl ConnectorStyle {
    pub fn for_kind(kind: ConnectorKind) -> Self {
        match kind {
            ConnectorKind::Box => Self {
                fill: "#b3b3b3",
                stroke: Some("#555555"),
                stroke_width: 1.0,
                line_stroke: "#555555",
                line_width: 2.0,
                dash: Some("4 2"),
            },
            ConnectorKind::Pin | ConnectorKind::None => Self {
                fill: "#cccccc",
                stroke: None,
                stroke_width: 0.0,
                line_stroke: "#000000",
                line_width: 2.0,
                dash: None,
            },
        }
    }
}

/// Canvas-space rendering of one connector slot.
#[derive(Clone, Debug, PartialEq)]
pub struct Connector {
    pub end: ConnectorEnd,
    pub kind: ConnectorKind,
    pub bounds: Rect,
    /// Template scale, for scaling stroke widths.
    pub scale: f32,
    pub bodies: Vec<Vec<Point>>,
    pub lines: Vec<[Point; 2]>,
    pub style: ConnectorStyle,
}

/// Top PINs and bottom BOXes are drawn with the template mirrored vertically.
pub fn is_flipped(end: ConnectorEnd, kind: ConnectorKind) -> bool {
    matches!(
        (end, kind),
        (ConnectorEnd::Top, ConnectorKind::Pin) | (ConnectorEnd::Bottom, ConnectorKind::Box)
    )
}

/// Derives the connector for one slot of `part`. `None` when the slot is empty.
pub fn derive_connector(
    part: &Part,
    end: ConnectorEnd,
    template: &ConnectorTemplate,
) -> Option<Connector> {
    let kind = part.connector(end);
    if kind.is_none() {
        return None;
    }
    let scale = template.scale_for(part.width);
    let w = template.width * scale;
    let h = template.height * scale;
    let x0 = part.x + (part.width - w) * 0.5;
    let y0 = match (end, kind) {
        (ConnectorEnd::Top, ConnectorKind::Pin) => part.y - h,
        (ConnectorEnd::Top, _) => part.y,
        (ConnectorEnd::Bottom, ConnectorKind::Pin) => part.bottom(),
        (ConnectorEnd::Bottom, _) => part.bottom() - h,
    };
    let flipped = is_flipped(end, kind);
    let map = |p: Point| {
        let y = if flipped {
            y0 + h - p.y * scale
        } else {
            y0 + p.y * scale
        };
        Point::new(x0 + p.x * scale, y)
    };

    debug!(part = ?part.id, ?end, ?kind, scale, "derived connector");
    Some(Connector {
        end,
        kind,
        bounds: Rect::new(x0, y0, w, h),
        scale,
        bodies: template
            .bodies
            .iter()
            .map(|b| b.iter().copied().map(map).collect())
            .collect(),
        lines: template
            .lines
            .iter()
            .map(|l| [map(l[0]), map(l[1])])
            .collect(),
        style: ConnectorStyle::for_kind(kind),
    })
}

pub fn derive_connectors(part: &Part, template: &ConnectorTemplate) -> Vec<Connector> {
    [ConnectorEnd::Top, ConnectorEnd::Bottom]
        .into_iter()
        .filter_map(|end| derive_connector(part, end, template))
        .collect()
}

/// How far a part's top PIN reaches above its top edge. Only pins protrude.
pub fn top_extent(part: &Part, template: &ConnectorTemplate) -> f32 {
    match part.top_connector {
        ConnectorKind::Pin => template.height * template.scale_for(part.width),
        ConnectorKind::None | ConnectorKind::Box => 0.0,
    }
}

/// Which slot a click at canvas height `y` toggles: the 10-unit band at the
/// top or bottom edge of the part.
pub fn slot_at(part: &Part, y: f32) -> Option<ConnectorEnd> {
    const SLOT_BAND: f32 = 10.0;
    if y < part.y + SLOT_BAND {
        Some(ConnectorEnd::Top)
    } else if y > part.bottom() - SLOT_BAND {
        Some(ConnectorEnd::Bottom)
    } else {
        None
    }
}
