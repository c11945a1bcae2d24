use bodystack::model::{ConnectorEnd, ConnectorKind, PartId, Point, ShapeId, Side};
use bodystack::PressOutcome;
use eframe::egui;
use tracing::debug;

use super::prompt_dialog::{PromptCommand, PromptDialog};
use super::render::Frame;
use super::{BodyApp, ContextTarget};

fn point(p: egui::Pos2) -> Point {
    Point::new(p.x, p.y)
}

impl BodyApp {
    pub(super) fn open_prompt(&mut self, command: PromptCommand) {
        self.prompt = Some(PromptDialog::new(command, &mut self.editor));
    }

    /// Routes pointer input on the canvas into the editor.
    pub(super) fn handle_canvas_input(
        &mut self,
        ctx: &egui::Context,
        response: &egui::Response,
        frame: Frame,
    ) {
        let pointer = ctx.input(|i| i.pointer.interact_pos());
        let world = pointer.map(|p| frame.view.screen_to_world(frame.origin, frame.zoom, p));
        self.pointer_world = ctx
            .input(|i| i.pointer.hover_pos())
            .map(|p| frame.view.screen_to_world(frame.origin, frame.zoom, p));

        let middle_drag = ctx.input(|i| i.pointer.middle_down());
        if middle_drag && response.dragged() {
            self.view.pan_screen += response.drag_delta();
            return;
        }

        if response.double_clicked() {
            if let (Some(w), Some(p)) = (world, pointer) {
                self.editor.end_drag();
                let result = self.editor.double_click(w, point(p)).map(drop);
                self.report(result);
            }
        } else if response.drag_started_by(egui::PointerButton::Primary)
            || response.clicked_by(egui::PointerButton::Primary)
        {
            if let (Some(w), Some(p)) = (world, pointer) {
                match self.editor.press(w, point(p)) {
                    Ok(outcome) => {
                        debug!(?outcome, "press");
                        if let PressOutcome::ConnectorToggled(_) = outcome {
                            self.status = Some("Connector changed".to_string());
                        }
                    }
                    Err(e) => self.status = Some(e.to_string()),
                }
            }
        }

        if response.dragged_by(egui::PointerButton::Primary) {
            if let Some(p) = pointer {
                self.editor.drag_to(point(p));
            }
        }
        // A click without motion opens a session too; close it right away.
        if response.drag_stopped() || (response.clicked() && self.editor.is_dragging()) {
            self.editor.end_drag();
        }

        if response.secondary_clicked() {
            self.context_world_pos = world;
            self.context_target = world.map(|w| {
                if let Some(shape) = self.editor.shape_at(w) {
                    ContextTarget::Shape(shape)
                } else if let Some(part) = self.editor.part_at(w) {
                    ContextTarget::Part(part)
                } else {
                    ContextTarget::Canvas
                }
            });
            match self.context_target {
                Some(ContextTarget::Part(id)) => self.editor.select_part(Some(id)),
                Some(ContextTarget::Shape(id)) => self.editor.select_shape(Some(id)),
                _ => {}
            }
        }

        let scroll = ctx.input(|i| i.raw_scroll_delta.y);
        if scroll.abs() > 0.0 && ctx.input(|i| i.modifiers.command) {
            if scroll > 0.0 {
                self.editor.zoom_in();
            } else {
                self.editor.zoom_out();
            }
        } else if scroll.abs() > 0.0 {
            self.view.pan_screen.y += scroll;
        }
    }

    pub(super) fn context_menu(&mut self, ui: &mut egui::Ui) {
        match self.context_target {
            Some(ContextTarget::Part(id)) => self.part_menu(ui, id),
            Some(ContextTarget::Shape(id)) => self.shape_menu(ui, id),
            Some(ContextTarget::Canvas) | None => {
                if ui.button("Add body").clicked() {
                    self.editor.add_part();
                    ui.close();
                }
                ui.add_enabled_ui(self.editor.has_copied_part(), |ui| {
                    if ui.button("Paste body").clicked() {
                        let result = self.editor.paste_part_new().map(drop);
                        self.report(result);
                        ui.close();
                    }
                });
            }
        }
    }

    fn part_menu(&mut self, ui: &mut egui::Ui, id: PartId) {
        let Some(part) = self.editor.diagram().part(id).cloned() else {
            ui.label("Body no longer exists");
            return;
        };
        if ui.button("Exact size...").clicked() {
            self.open_prompt(PromptCommand::PartSize(id));
            ui.close();
        }
        if ui.button("Colour...").clicked() {
            self.open_prompt(PromptCommand::PartColor(id));
            ui.close();
        }
        ui.horizontal(|ui| {
            if ui.button("Copy colour").clicked() {
                let result = self.editor.copy_color(id);
                self.report(result);
                ui.close();
            }
            ui.add_enabled_ui(self.editor.copied_color().is_some(), |ui| {
                if ui.button("Paste colour").clicked() {
                    let result = self.editor.paste_color(id).map(drop);
                    self.report(result);
                    ui.close();
                }
            });
        });
        let shade_label = if part.has_3d { "Flat fill" } else { "3-D fill" };
        if ui.button(shade_label).clicked() {
            let result = self.editor.toggle_3d(id).map(drop);
            self.report(result);
            ui.close();
        }
        if ui.button("Toggle special").clicked() {
            let result = self.editor.toggle_special(id).map(drop);
            self.report(result);
            ui.close();
        }
        ui.separator();
        for end in [ConnectorEnd::Top, ConnectorEnd::Bottom] {
            let label = format!(
                "{} connector: {} (cycle)",
                match end {
                    ConnectorEnd::Top => "Top",
                    ConnectorEnd::Bottom => "Bottom",
                },
                match part.connector(end) {
                    ConnectorKind::None => "none",
                    ConnectorKind::Pin => "PIN",
                    ConnectorKind::Box => "BOX",
                }
            );
            if ui.button(label).clicked() {
                let result = self.editor.toggle_connector(id, end).map(drop);
                self.report(result);
                ui.close();
            }
        }
        ui.separator();
        ui.menu_button("Special forms", |ui| {
            ui.checkbox(&mut self.symmetrical_forms, "Symmetrical");
            for side in [Side::Left, Side::Right] {
                if ui
                    .button(format!("Add on {} side...", Self::side_label(side)))
                    .clicked()
                {
                    self.open_prompt(PromptCommand::AddSpecialForm(id, side, self.symmetrical_forms));
                    ui.close();
                }
            }
            for (index, form) in part.special_forms.iter().enumerate() {
                ui.separator();
                ui.label(format!("#{} ({})", index + 1, Self::side_label(form.side)));
                ui.horizontal(|ui| {
                    if ui.button("Resize...").clicked() {
                        self.open_prompt(PromptCommand::ResizeSpecialForm(id, index));
                        ui.close();
                    }
                    if ui.button("Round...").clicked() {
                        self.open_prompt(PromptCommand::RoundSpecialForm(id, index));
                        ui.close();
                    }
                    if ui.button("Remove").clicked() {
                        let result = self.editor.remove_special_form(id, index);
                        self.report(result);
                        ui.close();
                    }
                });
            }
        });
        ui.menu_button("Vertices", |ui| {
            if let Some(w) = self.context_world_pos {
                if ui.button("Add vertex here").clicked() {
                    let result = self.editor.add_vertex(id, w.y - part.y).map(drop);
                    self.report(result);
                    ui.close();
                }
            }
            for (index, v) in part.sym_vertices.iter().enumerate() {
                ui.horizontal(|ui| {
                    ui.label(format!(
                        "at {}",
                        bodystack::units::format_dimension(v.y, self.editor.default_units().1)
                    ));
                    if ui.button("Width...").clicked() {
                        self.open_prompt(PromptCommand::VertexWidth(id, index));
                        ui.close();
                    }
                    if !part.is_corner_vertex(v) && ui.button("Remove").clicked() {
                        let result = self.editor.remove_vertex(id, index);
                        self.report(result);
                        ui.close();
                    }
                });
            }
        });
        ui.separator();
        if ui.button("Copy body").clicked() {
            let result = self.editor.copy_part(id);
            self.report(result);
            ui.close();
        }
        ui.add_enabled_ui(self.editor.has_copied_part(), |ui| {
            if ui.button("Paste onto body").clicked() {
                let result = self.editor.paste_part_onto(id).map(drop);
                self.report(result);
                ui.close();
            }
        });
        if ui.button("Remove body").clicked() {
            let result = self.editor.remove_part(id);
            self.report(result);
            ui.close();
        }
    }

    fn shape_menu(&mut self, ui: &mut egui::Ui, id: ShapeId) {
        let Some(shape) = self.editor.diagram().shape(id).cloned() else {
            ui.label("Shape no longer exists");
            return;
        };
        match shape.attachment {
            Some(_) => {
                if ui.button("Detach from body").clicked() {
                    let result = self.editor.detach_shape(id);
                    self.report(result);
                    ui.close();
                }
            }
            None => {
                let under = self
                    .context_world_pos
                    .and_then(|w| self.editor.part_at(w));
                ui.add_enabled_ui(under.is_some(), |ui| {
                    if ui.button("Attach to body").clicked() {
                        if let Some(part) = under {
                            let result = self.editor.attach_shape(id, part);
                            self.report(result);
                        }
                        ui.close();
                    }
                });
            }
        }
        if ui.button("Delete shape").clicked() {
            let result = self.editor.delete_shape(id);
            self.report(result);
            ui.close();
        }
    }
}
