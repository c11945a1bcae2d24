//! Pure geometry for parts and drawn shapes.
//!
//! Nothing here touches the model store; every function maps numbers to
//! numbers so the view layer and the drag controller can share it.

use crate::model::{
    CORNER_TOLERANCE, MIN_PART_SIZE, Part, Point, Rect, RelativeGeometry, ShapeGeometry, Side,
    SymVertex,
};

pub const VERTEX_HANDLE_SIZE: f32 = 8.0;
pub const PART_HANDLE_SIZE: f32 = 10.0;
/// Pointer distance that grabs a line endpoint or a circle rim.
pub const SHAPE_GRAB_TOLERANCE: f32 = 6.0;
pub const CURVE_SEGMENTS: usize = 24;

const DEDUP_EPSILON: f32 = 1e-4;

pub fn sorted_vertices(part: &Part) -> Vec<SymVertex> {
    let mut verts = part.sym_vertices.clone();
    verts.sort_by(|a, b| a.y.total_cmp(&b.y));
    verts
}

fn push_distinct(points: &mut Vec<Point>, p: Point) {
    if points
        .last()
        .is_some_and(|last| last.distance(p) < DEDUP_EPSILON)
    {
        return;
    }
    points.push(p);
}

/// Closed outline of a part, clockwise from the top-left corner.
///
/// The right edge is walked top to bottom through each vertex, then the left
/// edge bottom to top. Coincident neighbours are merged, so a part whose only
/// vertices are the two flat corners yields exactly its four rectangle corners.
pub fn outline(part: &Part) -> Vec<Point> {
    outline_of(&part.bounds(), &sorted_vertices(part))
}

/// Outline of a box with vertices already sorted by `y`.
pub fn outline_of(bounds: &Rect, verts: &[SymVertex]) -> Vec<Point> {
    let (x, y, w, h) = (bounds.x, bounds.y, bounds.width, bounds.height);
    let mut points = Vec::with_capacity(verts.len() * 2 + 4);

    push_distinct(&mut points, Point::new(x, y));
    push_distinct(&mut points, Point::new(x + w, y));
    for v in verts {
        push_distinct(&mut points, Point::new(x + w + v.dx, y + v.y));
    }
    push_distinct(&mut points, Point::new(x + w, y + h));
    push_distinct(&mut points, Point::new(x, y + h));
    for v in verts.iter().rev() {
        push_distinct(&mut points, Point::new(x - v.dx, y + v.y));
    }

    while points.len() > 1
        && points
            .last()
            .is_some_and(|last| last.distance(points[0]) < DEDUP_EPSILON)
    {
        points.pop();
    }
    points
}

/// Trapezoids between consecutive vertex heights, each `[top-left, top-right,
/// bottom-right, bottom-left]`. Together they tile the filled body; each one is
/// convex because `dx` never drops below [`min_vertex_dx`].
pub fn outline_bands(part: &Part) -> Vec<[Point; 4]> {
    let (x, y, w) = (part.x, part.y, part.width);
    let verts = sorted_vertices(part);
    verts
        .windows(2)
        .filter(|pair| pair[1].y - pair[0].y > DEDUP_EPSILON)
        .map(|pair| {
            let (a, b) = (pair[0], pair[1]);
            [
                Point::new(x - a.dx, y + a.y),
                Point::new(x + w + a.dx, y + a.y),
                Point::new(x + w + b.dx, y + b.y),
                Point::new(x - b.dx, y + b.y),
            ]
        })
        .collect()
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VertexHandle {
    /// Index into the part's unsorted `sym_vertices`.
    pub index: usize,
    pub side: Side,
    pub rect: Rect,
}

pub fn vertex_handles(part: &Part) -> Vec<VertexHandle> {
    let half = VERTEX_HANDLE_SIZE * 0.5;
    let mut handles = Vec::with_capacity(part.sym_vertices.len() * 2);
    for (index, v) in part.sym_vertices.iter().enumerate() {
        let vy = part.y + v.y - half;
        handles.push(VertexHandle {
            index,
            side: Side::Left,
            rect: Rect::new(
                part.x - v.dx - half,
                vy,
                VERTEX_HANDLE_SIZE,
                VERTEX_HANDLE_SIZE,
            ),
        });
        handles.push(VertexHandle {
            index,
            side: Side::Right,
            rect: Rect::new(
                part.x + part.width + v.dx - half,
                vy,
                VERTEX_HANDLE_SIZE,
                VERTEX_HANDLE_SIZE,
            ),
        });
    }
    handles
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PartHandles {
    pub height: Rect,
    pub left: Rect,
    pub right: Rect,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PartHandle {
    Height,
    Width(Side),
}

impl PartHandles {
    pub fn hit(&self, p: Point) -> Option<PartHandle> {
        if self.height.contains(p) {
            Some(PartHandle::Height)
        } else if self.left.contains(p) {
            Some(PartHandle::Width(Side::Left))
        } else if self.right.contains(p) {
            Some(PartHandle::Width(Side::Right))
        } else {
            None
        }
    }
}

pub fn part_handles(part: &Part) -> PartHandles {
    let b = part.bounds();
    let mid_y = b.y + b.height * 0.5;
    PartHandles {
        height: Rect::centered(Point::new(part.center_x(), b.bottom()), PART_HANDLE_SIZE),
        left: Rect::centered(Point::new(b.x, mid_y), PART_HANDLE_SIZE),
        right: Rect::centered(Point::new(b.right(), mid_y), PART_HANDLE_SIZE),
    }
}

/// Smallest allowed `dx`: the two sides must stay at least 2 units apart.
pub fn min_vertex_dx(width: f32) -> f32 {
    -(width * 0.5 - 1.0)
}

pub fn clamp_vertex_dx(dx: f32, width: f32) -> f32 {
    dx.max(min_vertex_dx(width))
}

/// `dx` that gives the outline a total width of `total` at a vertex.
pub fn vertex_dx_for_width(part_width: f32, total: f32) -> f32 {
    clamp_vertex_dx((total - part_width) * 0.5, part_width)
}

pub fn resized_height(start_height: f32, delta: f32) -> f32 {
    (start_height + delta).max(MIN_PART_SIZE)
}

/// Width resize about a fixed centreline. `delta` is the outward movement of
/// one side, so the width changes by twice as much. Returns `(x, width)`.
pub fn resized_width(start_width: f32, center_x: f32, delta: f32) -> (f32, f32) {
    let width = (start_width + 2.0 * delta).max(MIN_PART_SIZE);
    (center_x - width * 0.5, width)
}

/// Maps vertex heights recorded at `start_height` onto `new_height`.
///
/// Heights at the old top or bottom snap exactly to the new top or bottom;
/// everything else scales and is clamped into `[0, new_height]`.
pub fn rescale_vertex_ys(start_ys: &[f32], start_height: f32, new_height: f32) -> Vec<f32> {
    let ratio = if start_height > 0.0 {
        new_height / start_height
    } else {
        1.0
    };
    start_ys
        .iter()
        .map(|&y| {
            if y.abs() < CORNER_TOLERANCE {
                0.0
            } else if (y - start_height).abs() < CORNER_TOLERANCE {
                new_height
            } else {
                (y * ratio).clamp(0.0, new_height)
            }
        })
        .collect()
}

fn to_rel(p: Point, b: &Rect) -> Point {
    Point::new((p.x - b.x) / b.width, (p.y - b.y) / b.height)
}

fn from_rel(p: Point, b: &Rect) -> Point {
    Point::new(b.x + p.x * b.width, b.y + p.y * b.height)
}

fn mean_extent(b: &Rect) -> f32 {
    (b.width + b.height) * 0.5
}

/// Expresses absolute shape geometry as fractions of `bounds`.
pub fn relative_geometry(geometry: &ShapeGeometry, bounds: &Rect) -> RelativeGeometry {
    match *geometry {
        ShapeGeometry::Line { a, b } => RelativeGeometry::Line {
            a: to_rel(a, bounds),
            b: to_rel(b, bounds),
        },
        ShapeGeometry::Circle { center, r } => RelativeGeometry::Circle {
            center: to_rel(center, bounds),
            r: r / mean_extent(bounds),
        },
        ShapeGeometry::Curve { p0, p1, p2 } => RelativeGeometry::Curve {
            p0: to_rel(p0, bounds),
            p1: to_rel(p1, bounds),
            p2: to_rel(p2, bounds),
        },
    }
}

/// Inverse of [`relative_geometry`] for the part's current box.
pub fn resolve_relative(rel: &RelativeGeometry, bounds: &Rect) -> ShapeGeometry {
    match *rel {
        RelativeGeometry::Line { a, b } => ShapeGeometry::Line {
            a: from_rel(a, bounds),
            b: from_rel(b, bounds),
        },
        RelativeGeometry::Circle { center, r } => ShapeGeometry::Circle {
            center: from_rel(center, bounds),
            r: r * mean_extent(bounds),
        },
        RelativeGeometry::Curve { p0, p1, p2 } => ShapeGeometry::Curve {
            p0: from_rel(p0, bounds),
            p1: from_rel(p1, bounds),
            p2: from_rel(p2, bounds),
        },
    }
}

pub fn quad_bezier_point(p0: Point, p1: Point, p2: Point, t: f32) -> Point {
    let u = 1.0 - t;
    Point::new(
        u * u * p0.x + 2.0 * u * t * p1.x + t * t * p2.x,
        u * u * p0.y + 2.0 * u * t * p1.y + t * t * p2.y,
    )
}

pub fn quad_bezier_points(p0: Point, p1: Point, p2: Point, segments: usize) -> Vec<Point> {
    let n = segments.max(1);
    (0..=n)
        .map(|i| quad_bezier_point(p0, p1, p2, i as f32 / n as f32))
        .collect()
}

/// Control points a selected shape exposes as handles.
pub fn shape_handle_points(geometry: &ShapeGeometry) -> Vec<Point> {
    match *geometry {
        ShapeGeometry::Line { a, b } => vec![a, b],
        ShapeGeometry::Circle { center, r } => vec![center, Point::new(center.x + r, center.y)],
        ShapeGeometry::Curve { p0, p1, p2 } => vec![p0, p1, p2],
    }
}

pub fn distance_to_segment(p: Point, a: Point, b: Point) -> f32 {
    let (vx, vy) = (b.x - a.x, b.y - a.y);
    let len2 = vx * vx + vy * vy;
    if len2 <= f32::EPSILON {
        return p.distance(a);
    }
    let t = (((p.x - a.x) * vx + (p.y - a.y) * vy) / len2).clamp(0.0, 1.0);
    p.distance(Point::new(a.x + t * vx, a.y + t * vy))
}

fn distance_to_polyline(p: Point, points: &[Point]) -> f32 {
    points
        .windows(2)
        .map(|s| distance_to_segment(p, s[0], s[1]))
        .fold(f32::INFINITY, f32::min)
}

/// Whether `p` is within `tolerance` of the shape's stroke (circles also hit
/// on their interior).
pub fn hit_shape(geometry: &ShapeGeometry, p: Point, tolerance: f32) -> bool {
    match *geometry {
        ShapeGeometry::Line { a, b } => distance_to_segment(p, a, b) <= tolerance,
        ShapeGeometry::Circle { center, r } => p.distance(center) <= r + tolerance,
        ShapeGeometry::Curve { p0, p1, p2 } => {
            let pts = quad_bezier_points(p0, p1, p2, CURVE_SEGMENTS);
            distance_to_polyline(p, &pts) <= tolerance
        }
    }
}

pub fn point_in_polygon(p: Point, poly: &[Point]) -> bool {
    if poly.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = poly.len() - 1;
    for i in 0..poly.len() {
        let (a, b) = (poly[i], poly[j]);
        if (a.y > p.y) != (b.y > p.y) {
            let x = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
            if p.x < x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShapeDragMode {
    Move,
    LineStart,
    LineEnd,
    CircleRadius,
}

/// Chooses what a press at `p` does to a shape: grab an endpoint, the rim,
/// or move the whole shape.
pub fn pick_shape_drag_mode(geometry: &ShapeGeometry, p: Point) -> ShapeDragMode {
    match *geometry {
        ShapeGeometry::Line { a, b } => {
            if p.distance(a) <= SHAPE_GRAB_TOLERANCE {
                ShapeDragMode::LineStart
            } else if p.distance(b) <= SHAPE_GRAB_TOLERANCE {
                ShapeDragMode::LineEnd
            } else {
                ShapeDragMode::Move
            }
        }
        ShapeGeometry::Circle { center, r } => {
            if r >= 1.0 && (p.distance(center) - r).abs() <= SHAPE_GRAB_TOLERANCE {
                ShapeDragMode::CircleRadius
            } else {
                ShapeDragMode::Move
            }
        }
        ShapeGeometry::Curve { .. } => ShapeDragMode::Move,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PartId;

    fn part() -> Part {
        Part::new(PartId(1), 10.0, 20.0, 60.0, 120.0)
    }

    #[test]
    fn flat_part_outline_is_rectangle() {
        let pts = outline(&part());
        assert_eq!(
            pts,
            vec![
                Point::new(10.0, 20.0),
                Point::new(70.0, 20.0),
                Point::new(70.0, 140.0),
                Point::new(10.0, 140.0),
            ]
        );
    }

    #[test]
    fn bulge_adds_points_on_both_sides() {
        let mut p = part();
        p.sym_vertices.push(SymVertex { y: 60.0, dx: 5.0 });
        let pts = outline(&p);
        assert_eq!(pts.len(), 6);
        assert!(pts.contains(&Point::new(75.0, 80.0)));
        assert!(pts.contains(&Point::new(5.0, 80.0)));
    }

    #[test]
    fn bands_tile_between_vertices() {
        let mut p = part();
        p.sym_vertices.push(SymVertex { y: 60.0, dx: 5.0 });
        let bands = outline_bands(&p);
        assert_eq!(bands.len(), 2);
        assert_eq!(bands[0][2], Point::new(75.0, 80.0));
    }

    #[test]
    fn vertex_handles_straddle_outline() {
        let mut p = part();
        p.sym_vertices = vec![SymVertex { y: 30.0, dx: 2.0 }];
        let hs = vertex_handles(&p);
        assert_eq!(hs[0].rect, Rect::new(10.0 - 2.0 - 4.0, 46.0, 8.0, 8.0));
        assert_eq!(hs[1].rect, Rect::new(70.0 + 2.0 - 4.0, 46.0, 8.0, 8.0));
    }

    #[test]
    fn part_handles_sit_on_edges() {
        let h = part_handles(&part());
        assert_eq!(h.height, Rect::new(35.0, 135.0, 10.0, 10.0));
        assert_eq!(h.left, Rect::new(5.0, 75.0, 10.0, 10.0));
        assert_eq!(h.hit(Point::new(72.0, 80.0)), Some(PartHandle::Width(Side::Right)));
    }

    #[test]
    fn vertex_dx_is_clamped() {
        assert_eq!(clamp_vertex_dx(-100.0, 60.0), -29.0);
        assert_eq!(vertex_dx_for_width(60.0, 80.0), 10.0);
        assert_eq!(vertex_dx_for_width(60.0, 0.0), -29.0);
    }

    #[test]
    fn width_resize_is_symmetric() {
        let (x, w) = resized_width(60.0, 40.0, 10.0);
        assert_eq!(w, 80.0);
        assert_eq!(x, 0.0);
        let (_, w) = resized_width(60.0, 40.0, -100.0);
        assert_eq!(w, MIN_PART_SIZE);
    }

    #[test]
    fn corner_ys_snap_on_rescale() {
        let ys = rescale_vertex_ys(&[0.0, 60.0, 120.0], 120.0, 240.0);
        assert_eq!(ys, vec![0.0, 120.0, 240.0]);
    }

    #[test]
    fn relative_round_trip() {
        let b = Rect::new(10.0, 20.0, 60.0, 120.0);
        let g = ShapeGeometry::Circle {
            center: Point::new(40.0, 80.0),
            r: 9.0,
        };
        let rel = relative_geometry(&g, &b);
        assert_eq!(
            rel,
            RelativeGeometry::Circle {
                center: Point::new(0.5, 0.5),
                r: 0.1
            }
        );
        assert_eq!(resolve_relative(&rel, &b), g);
    }

    #[test]
    fn drag_mode_prefers_endpoints() {
        let g = ShapeGeometry::Line {
            a: Point::new(0.0, 0.0),
            b: Point::new(100.0, 0.0),
        };
        assert_eq!(pick_shape_drag_mode(&g, Point::new(3.0, 2.0)), ShapeDragMode::LineStart);
        assert_eq!(pick_shape_drag_mode(&g, Point::new(98.0, 0.0)), ShapeDragMode::LineEnd);
        assert_eq!(pick_shape_drag_mode(&g, Point::new(50.0, 0.0)), ShapeDragMode::Move);
        let c = ShapeGeometry::Circle {
            center: Point::new(0.0, 0.0),
            r: 20.0,
        };
        assert_eq!(pick_shape_drag_mode(&c, Point::new(0.0, 22.0)), ShapeDragMode::CircleRadius);
        assert_eq!(pick_shape_drag_mode(&c, Point::new(0.0, 5.0)), ShapeDragMode::Move);
    }

    #[test]
    fn polygon_containment() {
        let pts = outline(&part());
        assert!(point_in_polygon(Point::new(40.0, 80.0), &pts));
        assert!(!point_in_polygon(Point::new(0.0, 80.0), &pts));
    }
}
