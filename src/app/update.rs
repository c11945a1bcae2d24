use bodystack::DrawTool;
use bodystack::units;
use eframe::egui;

use super::command_palette::{CommandContext, CommandPalette};
use super::help;
use super::prompt_dialog::{DialogOutcome, PromptCommand};
use super::render::Frame;
use super::BodyApp;

impl eframe::App for BodyApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_keys(ctx);

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    ui.label("Diagram name:");
                    let mut name = self.editor.name().to_string();
                    if ui.text_edit_singleline(&mut name).changed() {
                        self.editor.set_name(name);
                    }
                    ui.separator();
                    if ui.button("Open... (⌘O)").clicked() {
                        self.open_json_dialog();
                        ui.close();
                    }
                    if ui.button("Save JSON... (⌘S)").clicked() {
                        self.save_json_dialog();
                        ui.close();
                    }
                    if ui.button("Export SVG... (⌘⇧S)").clicked() {
                        self.save_svg_dialog();
                        ui.close();
                    }
                    ui.separator();
                    if ui.button("Clear canvas").clicked() {
                        self.editor.clear();
                        ui.close();
                    }
                });
                ui.menu_button("View", |ui| {
                    if ui.checkbox(&mut self.settings.show_rulers, "Rulers").changed() {
                        self.persist_settings();
                    }
                    if ui.button("Zoom in").clicked() {
                        self.editor.zoom_in();
                    }
                    if ui.button("Zoom out").clicked() {
                        self.editor.zoom_out();
                    }
                    if ui.button("Reset zoom").clicked() {
                        self.editor.reset_zoom();
                    }
                });
                if ui.button("Help").clicked() {
                    self.show_help = true;
                }
            });
        });

        egui::SidePanel::left("tools").resizable(false).show(ctx, |ui| {
            ui.heading("Bodies");
            if ui.button("Add body").clicked() {
                self.editor.add_part();
            }
            let mut connector_mode = self.editor.connector_mode();
            if ui.checkbox(&mut connector_mode, "Connector mode").changed() {
                self.editor.set_connector_mode(connector_mode);
            }
            ui.add_enabled_ui(self.editor.undo_depth() > 0, |ui| {
                if ui.button("Undo").clicked() {
                    self.editor.undo();
                }
            });

            ui.separator();
            ui.heading("Draw");
            let current = self.editor.tool();
            for tool in [DrawTool::Line, DrawTool::Circle, DrawTool::Curve] {
                if ui.selectable_label(current == Some(tool), tool.label()).clicked() {
                    let next = (current != Some(tool)).then_some(tool);
                    self.editor.set_tool(next);
                }
            }
            if ui
                .button(format!("Stroke width: {}", self.editor.stroke_width()))
                .clicked()
            {
                self.open_prompt(PromptCommand::StrokeWidth);
            }

            ui.separator();
            self.selection_panel(ui);
        });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(self.status.as_deref().unwrap_or("Ready"));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(format!("Zoom: {:.0}%", self.editor.zoom() * 100.0));
                    ui.separator();
                    ui.label(format!(
                        "Ruler step: {} cm",
                        self.editor.vertical_step_cm()
                    ));
                    ui.separator();
                    ui.label(match self.editor.template_state() {
                        bodystack::connector::TemplateState::Ready(_) => "Connectors ready".to_string(),
                        bodystack::connector::TemplateState::Pending => "Connectors loading".to_string(),
                        bodystack::connector::TemplateState::Failed(e) => format!("No connectors: {e}"),
                    });
                    ui.separator();
                    ui.label(format!("Bodies: {}", self.editor.diagram().parts.len()));
                });
            });
        });

        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(egui::Color32::WHITE))
            .show(ctx, |ui| {
                let (rect, response) =
                    ui.allocate_exact_size(ui.available_size(), egui::Sense::click_and_drag());
                let frame = Frame {
                    origin: rect.min,
                    zoom: self.editor.zoom(),
                    view: self.view,
                };
                self.editor.set_canvas_width(rect.width() / frame.zoom);
                if self.prompt.is_none() && !self.command_palette.open {
                    self.handle_canvas_input(ctx, &response, frame);
                }
                let frame = Frame {
                    zoom: self.editor.zoom(),
                    view: self.view,
                    ..frame
                };
                let painter = ui.painter_at(rect);
                self.paint_canvas(&painter, frame);
                response.context_menu(|ui| self.context_menu(ui));
            });

        if let Some(mut dialog) = self.prompt.take() {
            match dialog.ui(ctx, &mut self.editor) {
                DialogOutcome::Open => self.prompt = Some(dialog),
                DialogOutcome::Cancelled => {}
                DialogOutcome::Done(result) => {
                    if result.is_ok() {
                        self.settings.stroke_width = self.editor.stroke_width();
                    }
                    self.report(result);
                }
            }
        }

        let cx = CommandContext {
            has_selection: self.editor.selected_part().is_some()
                || self.editor.selected_shape().is_some(),
            has_part_selected: self.editor.selected_part().is_some(),
            has_copied_part: self.editor.has_copied_part(),
            has_undo: self.editor.undo_depth() > 0,
        };
        if let Some(cmd) = self.command_palette.ui(ctx, cx) {
            CommandPalette::execute(self, ctx, cmd);
        }

        help::draw_help_window(ctx, &mut self.show_help);
    }
}

impl BodyApp {
    fn handle_keys(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() || self.prompt.is_some() || self.command_palette.open {
            return;
        }
        ctx.input_mut(|i| {
            if i.consume_key(egui::Modifiers::COMMAND | egui::Modifiers::SHIFT, egui::Key::P) {
                self.command_palette.open("");
            }
            if i.consume_key(egui::Modifiers::COMMAND | egui::Modifiers::SHIFT, egui::Key::S) {
                self.save_svg_dialog();
            }
            if i.consume_key(egui::Modifiers::COMMAND, egui::Key::S) {
                self.save_json_dialog();
            }
            if i.consume_key(egui::Modifiers::COMMAND, egui::Key::O) {
                self.open_json_dialog();
            }
            if i.consume_key(egui::Modifiers::COMMAND, egui::Key::Z) {
                self.editor.undo();
            }
            if i.consume_key(egui::Modifiers::COMMAND, egui::Key::Plus)
                || i.consume_key(egui::Modifiers::COMMAND, egui::Key::Equals)
            {
                self.editor.zoom_in();
            }
            if i.consume_key(egui::Modifiers::COMMAND, egui::Key::Minus) {
                self.editor.zoom_out();
            }
            if i.consume_key(egui::Modifiers::COMMAND, egui::Key::Num0) {
                self.editor.reset_zoom();
            }
            if i.consume_key(egui::Modifiers::COMMAND, egui::Key::C) {
                if let Some(id) = self.editor.selected_part() {
                    let result = self.editor.copy_part(id);
                    self.report(result);
                }
            }
            if i.consume_key(egui::Modifiers::COMMAND, egui::Key::V) {
                self.paste_part();
            }
            if i.consume_key(egui::Modifiers::NONE, egui::Key::B) {
                self.editor.add_part();
            }
            if i.consume_key(egui::Modifiers::NONE, egui::Key::L) {
                self.editor.set_tool(Some(DrawTool::Line));
            }
            if i.consume_key(egui::Modifiers::NONE, egui::Key::O) {
                self.editor.set_tool(Some(DrawTool::Circle));
            }
            if i.consume_key(egui::Modifiers::NONE, egui::Key::C) {
                self.editor.set_tool(Some(DrawTool::Curve));
            }
            if i.consume_key(egui::Modifiers::NONE, egui::Key::Escape) {
                self.editor.set_tool(None);
                self.editor.clear_selection();
            }
            if i.consume_key(egui::Modifiers::NONE, egui::Key::Delete)
                || i.consume_key(egui::Modifiers::NONE, egui::Key::Backspace)
            {
                self.remove_selected();
            }
        });
    }

    fn selection_panel(&mut self, ui: &mut egui::Ui) {
        let Some(id) = self.editor.selected_part() else {
            ui.label("No body selected");
            return;
        };
        let Some(part) = self.editor.diagram().part(id).cloned() else {
            return;
        };
        let (width_unit, height_unit) = self.editor.default_units();
        ui.heading("Selected body");
        ui.label(format!("Width: {}", units::format_dimension(part.width, width_unit)));
        ui.label(format!("Height: {}", units::format_dimension(part.height, height_unit)));
        ui.label(format!("Colour: {}", part.color));
        ui.label(format!("Vertices: {}", part.sym_vertices.len()));
        if !part.special_forms.is_empty() {
            ui.label(format!("Special forms: {}", part.special_forms.len()));
        }
        if ui.button("Exact size...").clicked() {
            self.open_prompt(PromptCommand::PartSize(id));
        }
    }
}
