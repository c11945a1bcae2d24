use serde::{Deserialize, Serialize};

pub const DEFAULT_PART_WIDTH: f32 = 60.0;
pub const DEFAULT_PART_HEIGHT: f32 = 120.0;
pub const DEFAULT_PART_COLOR: &str = "#cccccc";
pub const DEFAULT_STROKE_WIDTH: f32 = 2.0;
/// Smallest width or height a part can be resized to.
pub const MIN_PART_SIZE: f32 = 30.0;
/// Tolerance used to recognise the corner vertices at `y = 0` and `y = height`.
pub const CORNER_TOLERANCE: f32 = 1e-3;

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    pub fn distance(self, other: Point) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Axis-aligned box given by its top-left corner and size.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn centered(center: Point, size: f32) -> Self {
        Self::new(center.x - size * 0.5, center.y - size * 0.5, size, size)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    pub fn union(self, other: Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(x, y, right - x, bottom - y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PartId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ShapeId(pub u64);

/// Hands out ids that stay unique for the lifetime of an editor session.
#[derive(Clone, Copy, Debug)]
pub struct IdAllocator {
    next: u64,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl IdAllocator {
    pub fn part(&mut self) -> PartId {
        PartId(self.bump())
    }

    pub fn shape(&mut self) -> ShapeId {
        ShapeId(self.bump())
    }

    fn bump(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }
}

/// State of a connector slot. Clicking a slot cycles `None -> Pin -> Box -> None`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConnectorKind {
    #[default]
    #[serde(rename = "none")]
    None,
    #[serde(rename = "PIN")]
    Pin,
    #[serde(rename = "BOX")]
    Box,
}

impl ConnectorKind {
    pub fn next(self) -> Self {
        match self {
            ConnectorKind::None => ConnectorKind::Pin,
            ConnectorKind::Pin => ConnectorKind::Box,
            ConnectorKind::Box => ConnectorKind::None,
        }
    }

    pub fn is_none(self) -> bool {
        self == ConnectorKind::None
    }

    /// Text shown next to the slot; only pins are labelled.
    pub fn label(self) -> &'static str {
        match self {
            ConnectorKind::Pin => "PIN",
            ConnectorKind::None | ConnectorKind::Box => "",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConnectorEnd {
    Top,
    Bottom,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

/// Outline control point: the outline bulges by `dx` on both sides at height `y`
/// (measured from the part's top edge).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SymVertex {
    pub y: f32,
    pub dx: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpecialForm {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub rx: f32,
    pub side: Side,
    #[serde(default)]
    pub symmetrical: bool,
}

impl SpecialForm {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Reflection across the vertical line `x = center_x`, present only for
    /// symmetrical forms.
    pub fn mirror_rect(&self, center_x: f32) -> Option<Rect> {
        self.symmetrical.then(|| {
            Rect::new(
                2.0 * center_x - self.x - self.width,
                self.y,
                self.width,
                self.height,
            )
        })
    }
}

pub trait Translate {
    fn translate(&mut self, dx: f32, dy: f32);
}

impl Translate for SpecialForm {
    fn translate(&mut self, dx: f32, dy: f32) {
        self.x += dx;
        self.y += dy;
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Part {
    pub id: PartId,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub color: String,
    pub top_connector: ConnectorKind,
    pub bottom_connector: ConnectorKind,
    pub special: bool,
    pub special_forms: Vec<SpecialForm>,
    pub sym_vertices: Vec<SymVertex>,
    pub has_3d: bool,
}

impl Part {
    pub fn new(id: PartId, x: f32, y: f32, width: f32, height: f32) -> Self {
        let mut part = Self {
            id,
            x,
            y,
            width,
            height,
            color: DEFAULT_PART_COLOR.to_string(),
            top_connector: ConnectorKind::None,
            bottom_connector: ConnectorKind::None,
            special: false,
            special_forms: Vec::new(),
            sym_vertices: Vec::new(),
            has_3d: true,
        };
        part.ensure_corner_vertices();
        part
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width * 0.5
    }

    pub fn connector(&self, end: ConnectorEnd) -> ConnectorKind {
        match end {
            ConnectorEnd::Top => self.top_connector,
            ConnectorEnd::Bottom => self.bottom_connector,
        }
    }

    pub fn set_connector(&mut self, end: ConnectorEnd, kind: ConnectorKind) {
        match end {
            ConnectorEnd::Top => self.top_connector = kind,
            ConnectorEnd::Bottom => self.bottom_connector = kind,
        }
    }

    pub fn is_corner_vertex(&self, v: &SymVertex) -> bool {
        v.y.abs() < CORNER_TOLERANCE || (v.y - self.height).abs() < CORNER_TOLERANCE
    }

    /// Adds the `y = 0` and `y = height` vertices when they are missing.
    pub fn ensure_corner_vertices(&mut self) {
        if !self.sym_vertices.iter().any(|v| v.y.abs() < CORNER_TOLERANCE) {
            self.sym_vertices.push(SymVertex { y: 0.0, dx: 0.0 });
        }
        let h = self.height;
        if !self
            .sym_vertices
            .iter()
            .any(|v| (v.y - h).abs() < CORNER_TOLERANCE)
        {
            self.sym_vertices.push(SymVertex { y: h, dx: 0.0 });
        }
    }
}

impl Translate for Part {
    fn translate(&mut self, dx: f32, dy: f32) {
        self.x += dx;
        self.y += dy;
        for form in &mut self.special_forms {
            form.translate(dx, dy);
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ShapeGeometry {
    Line { a: Point, b: Point },
    Circle { center: Point, r: f32 },
    Curve { p0: Point, p1: Point, p2: Point },
}

impl ShapeGeometry {
    pub fn kind_name(&self) -> &'static str {
        match self {
            ShapeGeometry::Line { .. } => "line",
            ShapeGeometry::Circle { .. } => "circle",
            ShapeGeometry::Curve { .. } => "curve",
        }
    }
}

impl Translate for ShapeGeometry {
    fn translate(&mut self, dx: f32, dy: f32) {
        match self {
            ShapeGeometry::Line { a, b } => {
                *a = a.offset(dx, dy);
                *b = b.offset(dx, dy);
            }
            ShapeGeometry::Circle { center, .. } => {
                *center = center.offset(dx, dy);
            }
            ShapeGeometry::Curve { p0, p1, p2 } => {
                *p0 = p0.offset(dx, dy);
                *p1 = p1.offset(dx, dy);
                *p2 = p2.offset(dx, dy);
            }
        }
    }
}

/// Shape coordinates as fractions of the owning part's box. Circle radii are
/// fractions of the mean of the part's width and height.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RelativeGeometry {
    Line { a: Point, b: Point },
    Circle { center: Point, r: f32 },
    Curve { p0: Point, p1: Point, p2: Point },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Attachment {
    pub part: PartId,
    pub rel: RelativeGeometry,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Shape {
    pub id: ShapeId,
    pub geometry: ShapeGeometry,
    pub stroke_width: f32,
    pub attachment: Option<Attachment>,
}

impl Translate for Shape {
    fn translate(&mut self, dx: f32, dy: f32) {
        self.geometry.translate(dx, dy);
    }
}

/// The model store: plain data only, ordered top to bottom for parts and in
/// drawing order for shapes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Diagram {
    pub name: String,
    pub parts: Vec<Part>,
    pub shapes: Vec<Shape>,
}

impl Diagram {
    pub fn part(&self, id: PartId) -> Option<&Part> {
        self.parts.iter().find(|p| p.id == id)
    }

    pub fn part_mut(&mut self, id: PartId) -> Option<&mut Part> {
        self.parts.iter_mut().find(|p| p.id == id)
    }

    pub fn part_index(&self, id: PartId) -> Option<usize> {
        self.parts.iter().position(|p| p.id == id)
    }

    pub fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id == id)
    }

    pub fn shape_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.shapes.iter_mut().find(|s| s.id == id)
    }

    pub fn attached_shape_ids(&self, part: PartId) -> Vec<ShapeId> {
        self.shapes
            .iter()
            .filter(|s| s.attachment.is_some_and(|a| a.part == part))
            .map(|s| s.id)
            .collect()
    }

    /// Union of all part boxes, `None` for an empty stack.
    pub fn parts_bounds(&self) -> Option<Rect> {
        self.parts
            .iter()
            .map(Part::bounds)
            .reduce(Rect::union)
    }
}
