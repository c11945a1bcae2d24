use bodystack::connector::ConnectorTemplate;
use bodystack::model::{PartId, Point, ShapeId, Side};
use bodystack::settings::{self, AppSettings};
use bodystack::{Editor, EditorError};
use eframe::egui;
use tracing::{info, warn};

mod actions;
mod command_palette;
mod help;
mod interaction;
mod prompt_dialog;
mod render;
mod update;

use prompt_dialog::PromptDialog;

/// Screen mapping for the canvas. Zoom is owned by the editor; the view
/// only adds panning.
#[derive(Clone, Copy, Debug, Default)]
struct View {
    pan_screen: egui::Vec2,
}

impl View {
    fn world_to_screen(&self, origin: egui::Pos2, zoom: f32, world: Point) -> egui::Pos2 {
        origin + self.pan_screen + egui::vec2(world.x, world.y) * zoom
    }

    fn screen_to_world(&self, origin: egui::Pos2, zoom: f32, screen: egui::Pos2) -> Point {
        let v = (screen - origin - self.pan_screen) / zoom;
        Point::new(v.x, v.y)
    }

    /// Rulers are already scaled by zoom; they only need the pan.
    fn zoomed_to_screen(&self, origin: egui::Pos2, p: Point) -> egui::Pos2 {
        origin + self.pan_screen + egui::vec2(p.x, p.y)
    }
}

/// Right-click target, captured when the menu opens.
#[derive(Clone, Copy, Debug, PartialEq)]
enum ContextTarget {
    Canvas,
    Part(PartId),
    Shape(ShapeId),
}

pub struct BodyApp {
    editor: Editor,
    view: View,
    settings: AppSettings,
    settings_path: String,
    context_target: Option<ContextTarget>,
    context_world_pos: Option<Point>,
    pointer_world: Option<Point>,
    symmetrical_forms: bool,
    prompt: Option<PromptDialog>,
    command_palette: command_palette::CommandPalette,
    status: Option<String>,
    show_help: bool,
}

impl BodyApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let settings_path = settings::config_path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "settings.toml".to_string());
        let settings = settings::load_or_default();

        let mut editor = Editor::new(settings.canvas_width, settings.stroke_width);
        editor.set_default_units(settings.default_width_unit, settings.default_height_unit);
        editor.install_template(ConnectorTemplate::load(&settings.template_path));

        Self {
            editor,
            view: View::default(),
            settings,
            settings_path,
            context_target: None,
            context_world_pos: None,
            pointer_world: None,
            symmetrical_forms: true,
            prompt: None,
            command_palette: command_palette::CommandPalette::default(),
            status: None,
            show_help: false,
        }
    }

    fn report(&mut self, result: Result<(), EditorError>) {
        if let Err(e) = result {
            warn!(error = %e, "command failed");
            self.status = Some(e.to_string());
        }
    }

    fn persist_settings(&mut self) {
        self.settings.stroke_width = self.editor.stroke_width();
        match settings::save_settings(&self.settings_path, &self.settings) {
            Ok(()) => info!(path = %self.settings_path, "saved settings"),
            Err(e) => self.status = Some(format!("Settings not saved: {e}")),
        }
    }

    fn side_label(side: Side) -> &'static str {
        match side {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}
