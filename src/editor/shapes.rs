use tracing::{debug, info};

use super::{DrawState, DrawTool, Editor};
use crate::error::{EditorError, Result};
use crate::geometry;
use crate::model::{Attachment, PartId, Point, Shape, ShapeGeometry, ShapeId};

impl Editor {
    pub fn tool(&self) -> Option<DrawTool> {
        self.drawing.as_ref().map(|d| d.tool)
    }

    /// Clicks collected so far by the active tool.
    pub fn pending_points(&self) -> &[Point] {
        self.drawing
            .as_ref()
            .map(|d| d.points.as_slice())
            .unwrap_or_default()
    }

    /// Enters or leaves a drawing mode, discarding any half-drawn shape.
    pub fn set_tool(&mut self, tool: Option<DrawTool>) {
        self.drawing = tool.map(|tool| DrawState {
            tool,
            points: Vec::new(),
        });
        if tool.is_some() {
            self.select_shape(None);
        }
    }

    pub fn set_stroke_width(&mut self, width: f32) -> Result<()> {
        if !(width.is_finite() && width > 0.0) {
            return Err(EditorError::InvalidStrokeWidth(width));
        }
        self.stroke_width = width;
        Ok(())
    }

    /// Feeds one click to the active tool. Returns the new shape once the
    /// tool has all its points; the editor then leaves drawing mode.
    pub fn draw_click(&mut self, at: Point) -> Option<ShapeId> {
        let state = self.drawing.as_mut()?;
        state.points.push(at);
        if state.points.len() < state.tool.clicks() {
            return None;
        }
        let geometry = match (state.tool, state.points.as_slice()) {
            (DrawTool::Line, [a, b]) => Some(ShapeGeometry::Line { a: *a, b: *b }),
            (DrawTool::Circle, [c, rim]) => Some(ShapeGeometry::Circle {
                center: *c,
                r: c.distance(*rim),
            }),
            (DrawTool::Curve, [p0, p1, p2]) => Some(ShapeGeometry::Curve {
                p0: *p0,
                p1: *p1,
                p2: *p2,
            }),
            _ => None,
        };
        self.drawing = None;
        let geometry = geometry?;
        Some(self.add_shape(geometry))
    }

    /// Geometry of the shape being drawn if the next click landed at `pointer`.
    pub fn draw_preview(&self, pointer: Point) -> Option<ShapeGeometry> {
        let state = self.drawing.as_ref()?;
        match (state.tool, state.points.as_slice()) {
            (DrawTool::Line, [a]) | (DrawTool::Curve, [a]) => Some(ShapeGeometry::Line {
                a: *a,
                b: pointer,
            }),
            (DrawTool::Circle, [c]) => Some(ShapeGeometry::Circle {
                center: *c,
                r: c.distance(pointer),
            }),
            (DrawTool::Curve, [p0, p1]) => Some(ShapeGeometry::Curve {
                p0: *p0,
                p1: *p1,
                p2: pointer,
            }),
            _ => None,
        }
    }

    /// Stores a free (unattached) shape with the current stroke width.
    pub fn add_shape(&mut self, geometry: ShapeGeometry) -> ShapeId {
        self.push_undo();
        let id = self.ids.shape();
        self.diagram.shapes.push(Shape {
            id,
            geometry,
            stroke_width: self.stroke_width,
            attachment: None,
        });
        info!(shape = ?id, kind = geometry.kind_name(), "added shape");
        self.refresh_shape_view(id);
        id
    }

    pub fn delete_shape(&mut self, id: ShapeId) -> Result<()> {
        self.ensure_idle()?;
        let index = self
            .diagram
            .shapes
            .iter()
            .position(|s| s.id == id)
            .ok_or(EditorError::UnknownShape(id))?;
        self.push_undo();
        self.diagram.shapes.remove(index);
        if self.selected_shape == Some(id) {
            self.selected_shape = None;
        }
        self.views.remove_shape(id);
        Ok(())
    }

    /// Binds a shape to a part at its current position.
    pub fn attach_shape(&mut self, shape: ShapeId, part: PartId) -> Result<()> {
        let bounds = self
            .diagram
            .part(part)
            .ok_or(EditorError::UnknownPart(part))?
            .bounds();
        if self.diagram.shape(shape).is_none() {
            return Err(EditorError::UnknownShape(shape));
        }
        self.push_undo();
        let s = self
            .diagram
            .shape_mut(shape)
            .ok_or(EditorError::UnknownShape(shape))?;
        s.attachment = Some(Attachment {
            part,
            rel: geometry::relative_geometry(&s.geometry, &bounds),
        });
        debug!(?shape, ?part, "attached shape");
        self.refresh_shape_view(shape);
        Ok(())
    }

    /// Unbinds a shape; it stays where it was last drawn.
    pub fn detach_shape(&mut self, shape: ShapeId) -> Result<()> {
        if self.diagram.shape(shape).is_none() {
            return Err(EditorError::UnknownShape(shape));
        }
        self.push_undo();
        if let Some(s) = self.diagram.shape_mut(shape) {
            s.attachment = None;
        }
        self.refresh_shape_view(shape);
        Ok(())
    }

    /// Recomputes an attached shape's fractions from its absolute geometry.
    pub(super) fn refresh_relative(&mut self, shape: ShapeId) {
        let Some(part) = self
            .diagram
            .shape(shape)
            .and_then(|s| s.attachment)
            .map(|a| a.part)
        else {
            return;
        };
        let Some(bounds) = self.diagram.part(part).map(|p| p.bounds()) else {
            return;
        };
        if let Some(s) = self.diagram.shape_mut(shape) {
            s.attachment = Some(Attachment {
                part,
                rel: geometry::relative_geometry(&s.geometry, &bounds),
            });
        }
    }
}
