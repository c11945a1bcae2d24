//! The single pointer-drag session.
//!
//! A session records everything it needs at press time, so every move is
//! computed from the start state plus the pointer delta rather than
//! accumulated. Pointer positions are in screen units; deltas are divided by
//! the zoom captured at press.

use crate::geometry::{self, ShapeDragMode};
use crate::model::{PartId, Point, ShapeGeometry, ShapeId, Side, Translate};

#[derive(Clone, Debug, PartialEq)]
pub enum DragKind {
    ResizeHeight {
        part: PartId,
        start_height: f32,
        start_vertex_ys: Vec<f32>,
    },
    ResizeWidth {
        part: PartId,
        side: Side,
        start_width: f32,
        center_x: f32,
    },
    Vertex {
        part: PartId,
        index: usize,
        side: Side,
        start_dx: f32,
        part_width: f32,
    },
    Shape {
        shape: ShapeId,
        mode: ShapeDragMode,
        start: ShapeGeometry,
    },
}

/// New state for the dragged entity, ready for the editor to apply.
#[derive(Clone, Debug, PartialEq)]
pub enum DragUpdate {
    Height {
        part: PartId,
        height: f32,
        vertex_ys: Vec<f32>,
    },
    Width {
        part: PartId,
        x: f32,
        width: f32,
    },
    Vertex {
        part: PartId,
        index: usize,
        dx: f32,
    },
    Shape {
        shape: ShapeId,
        geometry: ShapeGeometry,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct DragSession {
    pub kind: DragKind,
    start_screen: Point,
    start_world: Point,
    zoom: f32,
}

/// Outward horizontal movement for a handle on `side`.
fn outward(side: Side, dx: f32) -> f32 {
    match side {
        Side::Left => -dx,
        Side::Right => dx,
    }
}

impl DragSession {
    pub fn new(kind: DragKind, start_screen: Point, start_world: Point, zoom: f32) -> Self {
        Self {
            kind,
            start_screen,
            start_world,
            zoom: if zoom > 0.0 { zoom } else { 1.0 },
        }
    }

    /// Pointer movement since press, in diagram units.
    pub fn delta(&self, screen: Point) -> (f32, f32) {
        (
            (screen.x - self.start_screen.x) / self.zoom,
            (screen.y - self.start_screen.y) / self.zoom,
        )
    }

    pub fn world_pointer(&self, screen: Point) -> Point {
        let (dx, dy) = self.delta(screen);
        self.start_world.offset(dx, dy)
    }

    pub fn part(&self) -> Option<PartId> {
        match &self.kind {
            DragKind::ResizeHeight { part, .. }
            | DragKind::ResizeWidth { part, .. }
            | DragKind::Vertex { part, .. } => Some(*part),
            DragKind::Shape { .. } => None,
        }
    }

    pub fn shape(&self) -> Option<ShapeId> {
        match &self.kind {
            DragKind::Shape { shape, .. } => Some(*shape),
            _ => None,
        }
    }

    pub fn update(&self, screen: Point) -> DragUpdate {
        let (dx, dy) = self.delta(screen);
        match &self.kind {
            DragKind::ResizeHeight {
                part,
                start_height,
                start_vertex_ys,
            } => {
                let height = geometry::resized_height(*start_height, dy);
                DragUpdate::Height {
                    part: *part,
                    height,
                    vertex_ys: geometry::rescale_vertex_ys(start_vertex_ys, *start_height, height),
                }
            }
            DragKind::ResizeWidth {
                part,
                side,
                start_width,
                center_x,
            } => {
                let (x, width) = geometry::resized_width(*start_width, *center_x, outward(*side, dx));
                DragUpdate::Width {
                    part: *part,
                    x,
                    width,
                }
            }
            DragKind::Vertex {
                part,
                index,
                side,
                start_dx,
                part_width,
            } => DragUpdate::Vertex {
                part: *part,
                index: *index,
                dx: geometry::clamp_vertex_dx(start_dx + outward(*side, dx), *part_width),
            },
            DragKind::Shape { shape, mode, start } => DragUpdate::Shape {
                shape: *shape,
                geometry: self.shape_geometry(*mode, start, dx, dy, screen),
            },
        }
    }

    fn shape_geometry(
        &self,
        mode: ShapeDragMode,
        start: &ShapeGeometry,
        dx: f32,
        dy: f32,
        screen: Point,
    ) -> ShapeGeometry {
        let mut g = *start;
        match (mode, &mut g) {
            (ShapeDragMode::LineStart, ShapeGeometry::Line { a, .. }) => *a = a.offset(dx, dy),
            (ShapeDragMode::LineEnd, ShapeGeometry::Line { b, .. }) => *b = b.offset(dx, dy),
            (ShapeDragMode::CircleRadius, ShapeGeometry::Circle { center, r }) => {
                *r = self.world_pointer(screen).distance(*center).max(1.0);
            }
            (_, other) => other.translate(dx, dy),
        }
        g
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deltas_are_divided_by_zoom() {
        let s = DragSession::new(
            DragKind::ResizeHeight {
                part: PartId(1),
                start_height: 120.0,
                start_vertex_ys: vec![0.0, 60.0, 120.0],
            },
            Point::new(100.0, 100.0),
            Point::new(50.0, 50.0),
            2.0,
        );
        let DragUpdate::Height {
            height, vertex_ys, ..
        } = s.update(Point::new(100.0, 340.0))
        else {
            panic!("expected height update");
        };
        assert_eq!(height, 240.0);
        assert_eq!(vertex_ys, vec![0.0, 120.0, 240.0]);
    }

    #[test]
    fn left_width_handle_grows_when_moved_left() {
        let s = DragSession::new(
            DragKind::ResizeWidth {
                part: PartId(1),
                side: Side::Left,
                start_width: 60.0,
                center_x: 100.0,
            },
            Point::new(70.0, 0.0),
            Point::new(70.0, 0.0),
            1.0,
        );
        assert_eq!(
            s.update(Point::new(60.0, 0.0)),
            DragUpdate::Width {
                part: PartId(1),
                x: 60.0,
                width: 80.0
            }
        );
    }

    #[test]
    fn vertex_dx_never_crosses_centre() {
        let s = DragSession::new(
            DragKind::Vertex {
                part: PartId(1),
                index: 2,
                side: Side::Right,
                start_dx: 0.0,
                part_width: 60.0,
            },
            Point::new(0.0, 0.0),
            Point::new(0.0, 0.0),
            1.0,
        );
        assert_eq!(
            s.update(Point::new(-500.0, 0.0)),
            DragUpdate::Vertex {
                part: PartId(1),
                index: 2,
                dx: -29.0
            }
        );
    }

    #[test]
    fn circle_rim_drag_sets_radius_to_pointer() {
        let start = ShapeGeometry::Circle {
            center: Point::new(0.0, 0.0),
            r: 10.0,
        };
        let s = DragSession::new(
            DragKind::Shape {
                shape: ShapeId(7),
                mode: ShapeDragMode::CircleRadius,
                start,
            },
            Point::new(10.0, 0.0),
            Point::new(10.0, 0.0),
            1.0,
        );
        let DragUpdate::Shape { geometry, .. } = s.update(Point::new(30.0, 0.0)) else {
            panic!("expected shape update");
        };
        assert_eq!(
            geometry,
            ShapeGeometry::Circle {
                center: Point::new(0.0, 0.0),
                r: 30.0
            }
        );
    }
}
