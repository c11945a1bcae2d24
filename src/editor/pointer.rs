//! Pointer routing: hit testing and the drag session lifecycle.

use tracing::debug;

use super::Editor;
use super::parts::{apply_height, apply_width, clamp_vertices, insert_vertex};
use crate::connector;
use crate::drag::{DragKind, DragSession, DragUpdate};
use crate::error::{EditorError, Result};
use crate::geometry::{self, PartHandle, SHAPE_GRAB_TOLERANCE};
use crate::model::{PartId, Point, ShapeId, Side};

/// Double-clicking within this distance of a vertex removes it.
const VERTEX_PICK_DISTANCE: f32 = 5.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HandleHit {
    Part(PartId, PartHandle),
    Vertex {
        part: PartId,
        index: usize,
        side: Side,
    },
}

/// What a primary press did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PressOutcome {
    Nothing,
    DrawPoint,
    ShapeDrawn(ShapeId),
    DragStarted,
    SelectedPart(PartId),
    ConnectorToggled(PartId),
}

impl Editor {
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Topmost part whose outline contains `p`.
    pub fn part_at(&self, p: Point) -> Option<PartId> {
        self.diagram
            .parts
            .iter()
            .rev()
            .find(|part| {
                part.bounds().contains(p) || geometry::point_in_polygon(p, &geometry::outline(part))
            })
            .map(|part| part.id)
    }

    /// Topmost shape whose stroke passes near `p`.
    pub fn shape_at(&self, p: Point) -> Option<ShapeId> {
        let tolerance = SHAPE_GRAB_TOLERANCE / self.zoom;
        self.diagram
            .shapes
            .iter()
            .rev()
            .find(|s| geometry::hit_shape(&s.geometry, p, tolerance.max(s.stroke_width)))
            .map(|s| s.id)
    }

    /// Handle of the selected part under `p`. Only the selected part shows handles.
    pub fn handle_at(&self, p: Point) -> Option<HandleHit> {
        let id = self.selected_part?;
        let view = self.views.part(id)?;
        if let Some(h) = view.vertex_handles.iter().find(|h| h.rect.contains(p)) {
            return Some(HandleHit::Vertex {
                part: id,
                index: h.index,
                side: h.side,
            });
        }
        view.handles.hit(p).map(|h| HandleHit::Part(id, h))
    }

    /// Routes a primary press at canvas point `world` (screen point `screen`).
    pub fn press(&mut self, world: Point, screen: Point) -> Result<PressOutcome> {
        self.ensure_idle()?;
        if self.drawing.is_some() {
            return Ok(match self.draw_click(world) {
                Some(id) => PressOutcome::ShapeDrawn(id),
                None => PressOutcome::DrawPoint,
            });
        }

        match self.handle_at(world) {
            Some(HandleHit::Part(part, handle)) => {
                self.begin_part_resize(part, handle, world, screen)?;
                return Ok(PressOutcome::DragStarted);
            }
            Some(HandleHit::Vertex { part, index, side }) => {
                self.begin_vertex_drag(part, index, side, world, screen)?;
                return Ok(PressOutcome::DragStarted);
            }
            None => {}
        }

        if let Some(shape) = self.shape_at(world) {
            self.select_shape(Some(shape));
            self.begin_shape_drag(shape, world, screen)?;
            return Ok(PressOutcome::DragStarted);
        }
        self.select_shape(None);

        let Some(part) = self.part_at(world) else {
            return Ok(PressOutcome::Nothing);
        };
        self.select_part(Some(part));
        if self.connector_mode {
            if let Some(end) = self
                .diagram
                .part(part)
                .and_then(|p| connector::slot_at(p, world.y))
            {
                self.toggle_connector(part, end)?;
                return Ok(PressOutcome::ConnectorToggled(part));
            }
        }
        Ok(PressOutcome::SelectedPart(part))
    }

    /// Double-click on a part body: remove the vertex near the pointer, or add
    /// one and start dragging it from the nearer side.
    pub fn double_click(&mut self, world: Point, screen: Point) -> Result<bool> {
        self.ensure_idle()?;
        let Some(id) = self.part_at(world) else {
            return Ok(false);
        };
        self.select_part(Some(id));
        self.toggle_vertex_at(id, world, screen)?;
        Ok(true)
    }

    pub fn toggle_vertex_at(&mut self, id: PartId, world: Point, screen: Point) -> Result<()> {
        self.ensure_idle()?;
        let part = self.diagram.part(id).ok_or(EditorError::UnknownPart(id))?;
        let offset_y = world.y - part.y;
        let existing = part
            .sym_vertices
            .iter()
            .position(|v| (v.y - offset_y).abs() < VERTEX_PICK_DISTANCE);
        let from_left = world.x - part.x < part.width * 0.5;

        self.push_undo();
        let part = self
            .diagram
            .part_mut(id)
            .ok_or(EditorError::UnknownPart(id))?;
        match existing {
            Some(index) => {
                part.sym_vertices.remove(index);
                part.ensure_corner_vertices();
                debug!(part = ?id, index, "vertex removed");
                self.refresh_part_view(id);
            }
            None => {
                let index = insert_vertex(part, offset_y);
                debug!(part = ?id, index, "vertex added");
                self.refresh_part_view(id);
                let side = if from_left { Side::Left } else { Side::Right };
                self.start_vertex_session(id, index, side, world, screen)?;
            }
        }
        Ok(())
    }

    pub fn begin_part_resize(
        &mut self,
        id: PartId,
        handle: PartHandle,
        world: Point,
        screen: Point,
    ) -> Result<()> {
        self.ensure_idle()?;
        if self.diagram.part(id).is_none() {
            return Err(EditorError::UnknownPart(id));
        }
        self.push_undo();
        let part = self
            .diagram
            .part_mut(id)
            .ok_or(EditorError::UnknownPart(id))?;
        let kind = match handle {
            PartHandle::Height => {
                clamp_vertices(part);
                DragKind::ResizeHeight {
                    part: id,
                    start_height: part.height,
                    start_vertex_ys: part.sym_vertices.iter().map(|v| v.y).collect(),
                }
            }
            PartHandle::Width(side) => DragKind::ResizeWidth {
                part: id,
                side,
                start_width: part.width,
                center_x: part.center_x(),
            },
        };
        self.drag = Some(DragSession::new(kind, screen, world, self.zoom));
        Ok(())
    }

    pub fn begin_vertex_drag(
        &mut self,
        id: PartId,
        index: usize,
        side: Side,
        world: Point,
        screen: Point,
    ) -> Result<()> {
        self.ensure_idle()?;
        self.push_undo();
        self.start_vertex_session(id, index, side, world, screen)
    }

    fn start_vertex_session(
        &mut self,
        id: PartId,
        index: usize,
        side: Side,
        world: Point,
        screen: Point,
    ) -> Result<()> {
        let part = self.diagram.part(id).ok_or(EditorError::UnknownPart(id))?;
        let vertex = part
            .sym_vertices
            .get(index)
            .ok_or(EditorError::UnknownVertex { part: id, index })?;
        let kind = DragKind::Vertex {
            part: id,
            index,
            side,
            start_dx: vertex.dx,
            part_width: part.width,
        };
        self.drag = Some(DragSession::new(kind, screen, world, self.zoom));
        Ok(())
    }

    pub fn begin_shape_drag(&mut self, id: ShapeId, world: Point, screen: Point) -> Result<()> {
        self.ensure_idle()?;
        let shape = self
            .diagram
            .shape(id)
            .ok_or(EditorError::UnknownShape(id))?;
        let kind = DragKind::Shape {
            shape: id,
            mode: geometry::pick_shape_drag_mode(&shape.geometry, world),
            start: shape.geometry,
        };
        self.push_undo();
        self.drag = Some(DragSession::new(kind, screen, world, self.zoom));
        Ok(())
    }

    /// Applies the active session for the pointer at `screen`. Returns `false`
    /// when no drag is running.
    pub fn drag_to(&mut self, screen: Point) -> bool {
        let Some(update) = self.drag.as_ref().map(|d| d.update(screen)) else {
            return false;
        };
        match update {
            DragUpdate::Height {
                part,
                height,
                vertex_ys,
            } => {
                let Some(index) = self.diagram.part_index(part) else {
                    return false;
                };
                apply_height(&mut self.diagram.parts[index], height, &vertex_ys);
                self.part_changed(part);
                self.restack_from(index + 1);
                self.ensure_top_connector_visible();
            }
            DragUpdate::Width { part, x, width } => {
                let Some(p) = self.diagram.part_mut(part) else {
                    return false;
                };
                apply_width(p, x, width);
                self.part_changed(part);
                self.ensure_top_connector_visible();
            }
            DragUpdate::Vertex { part, index, dx } => {
                let Some(v) = self
                    .diagram
                    .part_mut(part)
                    .and_then(|p| p.sym_vertices.get_mut(index))
                else {
                    return false;
                };
                v.dx = dx;
                self.refresh_part_view(part);
            }
            DragUpdate::Shape { shape, geometry } => {
                let Some(s) = self.diagram.shape_mut(shape) else {
                    return false;
                };
                s.geometry = geometry;
                self.refresh_shape_view(shape);
            }
        }
        true
    }

    /// Ends the active session. A dragged attached shape takes new fractions.
    pub fn end_drag(&mut self) {
        let Some(session) = self.drag.take() else {
            return;
        };
        if let Some(shape) = session.shape() {
            self.refresh_relative(shape);
        }
        self.ensure_top_connector_visible();
    }
}
