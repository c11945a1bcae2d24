//! The engine facade.
//!
//! [`Editor`] owns the model store, the view cache, the connector template
//! and all interaction state. Every user-facing command is a method here;
//! the methods are grouped by concern across the submodules.

use tracing::{debug, info};

use crate::connector::{ConnectorTemplate, TemplateState};
use crate::drag::DragSession;
use crate::error::{EditorError, Result};
use crate::geometry;
use crate::layout;
use crate::model::{
    DEFAULT_STROKE_WIDTH, Diagram, IdAllocator, PartId, Point, ShapeId, Translate,
};
use crate::rulers;
use crate::serialize::PartRecord;
use crate::units::LengthUnit;
use crate::view::ViewCache;

mod io;
mod parts;
mod pointer;
mod prompts;
mod shapes;

pub use pointer::{HandleHit, PressOutcome};

/// Snapshots kept for undo.
pub const UNDO_LIMIT: usize = 15;
pub const ZOOM_STEP: f32 = 0.25;
pub const MIN_ZOOM: f32 = 0.25;
pub const MAX_ZOOM: f32 = 3.0;
pub const DEFAULT_CANVAS_WIDTH: f32 = 800.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawTool {
    Line,
    Circle,
    Curve,
}

impl DrawTool {
    /// Clicks needed to complete a shape.
    pub fn clicks(self) -> usize {
        match self {
            DrawTool::Line | DrawTool::Circle => 2,
            DrawTool::Curve => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DrawTool::Line => "Line",
            DrawTool::Circle => "Circle",
            DrawTool::Curve => "Curve",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
struct DrawState {
    tool: DrawTool,
    points: Vec<Point>,
}

#[derive(Clone)]
struct Snapshot {
    diagram: Diagram,
    selected_part: Option<PartId>,
    selected_shape: Option<ShapeId>,
}

pub struct Editor {
    diagram: Diagram,
    views: ViewCache,
    template: TemplateState,
    ids: IdAllocator,
    selected_part: Option<PartId>,
    selected_shape: Option<ShapeId>,
    copied_color: Option<String>,
    copied_part: Option<PartRecord>,
    history: Vec<Snapshot>,
    drag: Option<DragSession>,
    connector_mode: bool,
    drawing: Option<DrawState>,
    stroke_width: f32,
    zoom: f32,
    canvas_width: f32,
    width_unit: LengthUnit,
    height_unit: LengthUnit,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(DEFAULT_CANVAS_WIDTH, DEFAULT_STROKE_WIDTH)
    }
}

impl Editor {
    pub fn new(canvas_width: f32, stroke_width: f32) -> Self {
        Self {
            diagram: Diagram::default(),
            views: ViewCache::default(),
            template: TemplateState::Pending,
            ids: IdAllocator::default(),
            selected_part: None,
            selected_shape: None,
            copied_color: None,
            copied_part: None,
            history: Vec::new(),
            drag: None,
            connector_mode: false,
            drawing: None,
            stroke_width: if stroke_width > 0.0 {
                stroke_width
            } else {
                DEFAULT_STROKE_WIDTH
            },
            zoom: 1.0,
            canvas_width,
            width_unit: LengthUnit::Inch,
            height_unit: LengthUnit::Centimeter,
        }
    }

    pub fn diagram(&self) -> &Diagram {
        &self.diagram
    }

    pub fn views(&self) -> &ViewCache {
        &self.views
    }

    pub fn template_state(&self) -> &TemplateState {
        &self.template
    }

    pub fn template(&self) -> Option<&ConnectorTemplate> {
        self.template.template()
    }

    pub fn selected_part(&self) -> Option<PartId> {
        self.selected_part
    }

    pub fn selected_shape(&self) -> Option<ShapeId> {
        self.selected_shape
    }

    pub fn copied_color(&self) -> Option<&str> {
        self.copied_color.as_deref()
    }

    pub fn has_copied_part(&self) -> bool {
        self.copied_part.is_some()
    }

    pub fn undo_depth(&self) -> usize {
        self.history.len()
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn stroke_width(&self) -> f32 {
        self.stroke_width
    }

    pub fn canvas_width(&self) -> f32 {
        self.canvas_width
    }

    pub fn set_canvas_width(&mut self, width: f32) {
        if width > 0.0 {
            self.canvas_width = width;
        }
    }

    /// Units assumed for unsuffixed prompt answers: part widths use the
    /// first, every other length the second.
    pub fn set_default_units(&mut self, width: LengthUnit, height: LengthUnit) {
        self.width_unit = width;
        self.height_unit = height;
    }

    pub fn default_units(&self) -> (LengthUnit, LengthUnit) {
        (self.width_unit, self.height_unit)
    }

    pub fn connector_mode(&self) -> bool {
        self.connector_mode
    }

    pub fn set_connector_mode(&mut self, on: bool) {
        self.connector_mode = on;
    }

    pub fn name(&self) -> &str {
        &self.diagram.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.diagram.name = name.into();
    }

    /// Installs the result of loading the connector template. On success all
    /// connectors are regenerated and the top pin is brought into view.
    pub fn install_template(&mut self, result: Result<ConnectorTemplate>) {
        self.template = TemplateState::from_result(result);
        if self.template.template().is_some() {
            info!("connector template ready");
            self.rebuild_views();
            self.ensure_top_connector_visible();
        }
    }

    pub fn select_part(&mut self, id: Option<PartId>) {
        let previous = self.selected_part;
        self.selected_part = id.filter(|id| self.diagram.part(*id).is_some());
        for changed in [previous, self.selected_part].into_iter().flatten() {
            self.refresh_part_view(changed);
        }
    }

    pub fn select_shape(&mut self, id: Option<ShapeId>) {
        let previous = self.selected_shape;
        self.selected_shape = id.filter(|id| self.diagram.shape(*id).is_some());
        for changed in [previous, self.selected_shape].into_iter().flatten() {
            self.refresh_shape_view(changed);
        }
    }

    pub fn clear_selection(&mut self) {
        self.select_part(None);
        self.select_shape(None);
    }

    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.pop() else {
            return false;
        };
        self.diagram = snapshot.diagram;
        self.selected_part = snapshot.selected_part;
        self.selected_shape = snapshot.selected_shape;
        self.drag = None;
        self.drawing = None;
        self.rebuild_views();
        debug!(remaining = self.history.len(), "undo");
        true
    }

    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom + ZOOM_STEP).min(MAX_ZOOM);
    }

    pub fn zoom_out(&mut self) {
        self.zoom = (self.zoom - ZOOM_STEP).max(MIN_ZOOM);
    }

    pub fn reset_zoom(&mut self) {
        self.zoom = 1.0;
    }

    /// Step of the vertical cm ruler for the current zoom.
    pub fn vertical_step_cm(&self) -> f32 {
        rulers::vertical_step_cm(self.zoom)
    }

    /// Removes every part and shape.
    pub fn clear(&mut self) {
        self.push_undo();
        self.reset_diagram(Diagram {
            name: self.diagram.name.clone(),
            ..Diagram::default()
        });
        info!("canvas cleared");
    }

    fn reset_diagram(&mut self, diagram: Diagram) {
        self.diagram = diagram;
        self.selected_part = None;
        self.selected_shape = None;
        self.drag = None;
        self.drawing = None;
        self.rebuild_views();
    }

    fn push_undo(&mut self) {
        self.history.push(Snapshot {
            diagram: self.diagram.clone(),
            selected_part: self.selected_part,
            selected_shape: self.selected_shape,
        });
        if self.history.len() > UNDO_LIMIT {
            let overflow = self.history.len() - UNDO_LIMIT;
            self.history.drain(0..overflow);
        }
    }

    fn ensure_idle(&self) -> Result<()> {
        if self.drag.is_some() {
            Err(EditorError::DragInProgress)
        } else {
            Ok(())
        }
    }

    fn rebuild_views(&mut self) {
        self.views.rebuild(
            &self.diagram,
            self.template.template(),
            self.selected_part,
            self.selected_shape,
        );
    }

    fn refresh_part_view(&mut self, id: PartId) {
        match self.diagram.part(id) {
            Some(part) => {
                self.views
                    .refresh_part(part, self.template.template(), self.selected_part == Some(id))
            }
            None => self.views.remove_part(id),
        }
    }

    fn refresh_shape_view(&mut self, id: ShapeId) {
        match self.diagram.shape(id) {
            Some(shape) => self
                .views
                .refresh_shape(shape, self.selected_shape == Some(id)),
            None => self.views.remove_shape(id),
        }
    }

    /// Re-derives every shape attached to `part` from its stored fractions.
    fn sync_attached(&mut self, part: PartId) {
        let Some(bounds) = self.diagram.part(part).map(|p| p.bounds()) else {
            return;
        };
        let mut touched = Vec::new();
        for shape in &mut self.diagram.shapes {
            if let Some(att) = shape.attachment.filter(|a| a.part == part) {
                shape.geometry = geometry::resolve_relative(&att.rel, &bounds);
                touched.push(shape.id);
            }
        }
        for id in touched {
            self.refresh_shape_view(id);
        }
    }

    /// Refreshes everything derived from one part's box.
    fn part_changed(&mut self, id: PartId) {
        self.refresh_part_view(id);
        self.sync_attached(id);
    }

    fn restack_from(&mut self, start: usize) {
        let moved = layout::restack_from(&mut self.diagram.parts, start);
        for (id, _) in moved {
            self.part_changed(id);
        }
    }

    /// Shifts the whole diagram down when a top pin would poke above the
    /// top margin. No-op until the template is ready.
    fn ensure_top_connector_visible(&mut self) {
        let Some(template) = self.template.template() else {
            return;
        };
        if let Some(dy) = layout::top_connector_deficit(&self.diagram.parts, template) {
            self.shift_diagram_down(dy);
        }
    }

    fn shift_diagram_down(&mut self, dy: f32) {
        debug!(dy, "shifting diagram down");
        for part in &mut self.diagram.parts {
            part.translate(0.0, dy);
        }
        for shape in &mut self.diagram.shapes {
            if shape.attachment.is_none() {
                shape.translate(0.0, dy);
            }
        }
        let ids: Vec<PartId> = self.diagram.parts.iter().map(|p| p.id).collect();
        for id in ids {
            self.sync_attached(id);
        }
        self.rebuild_views();
    }
}
