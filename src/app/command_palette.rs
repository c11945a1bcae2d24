use bodystack::DrawTool;
use eframe::egui;
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use super::BodyApp;
use super::prompt_dialog::PromptCommand;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum CommandId {
    AddBody,
    RemoveSelected,
    ToolLine,
    ToolCircle,
    ToolCurve,
    ToolNone,
    ToggleConnectorMode,
    ExactSize,
    CopyBody,
    PasteBody,
    StrokeWidth,
    Undo,
    ZoomIn,
    ZoomOut,
    ZoomReset,
    ToggleRulers,
    Clear,
    SaveJson,
    LoadJson,
    ExportSvg,
}

pub(super) struct CommandSpec {
    pub id: CommandId,
    pub name: &'static str,
    pub search: &'static str,
}

const COMMANDS: &[CommandSpec] = &[
    CommandSpec { id: CommandId::AddBody, name: "Body: Add", search: "add body part new b" },
    CommandSpec { id: CommandId::RemoveSelected, name: "Edit: Delete selected", search: "delete remove" },
    CommandSpec { id: CommandId::ToolLine, name: "Draw: Line", search: "line draw tool l" },
    CommandSpec { id: CommandId::ToolCircle, name: "Draw: Circle", search: "circle draw tool o" },
    CommandSpec { id: CommandId::ToolCurve, name: "Draw: Curve", search: "curve bezier draw tool c" },
    CommandSpec { id: CommandId::ToolNone, name: "Draw: Stop drawing", search: "select stop cancel tool v" },
    CommandSpec { id: CommandId::ToggleConnectorMode, name: "Connectors: Toggle edit mode", search: "connector pin box mode" },
    CommandSpec { id: CommandId::ExactSize, name: "Body: Exact size", search: "exact size width height dimension" },
    CommandSpec { id: CommandId::CopyBody, name: "Body: Copy", search: "copy body" },
    CommandSpec { id: CommandId::PasteBody, name: "Body: Paste", search: "paste body" },
    CommandSpec { id: CommandId::StrokeWidth, name: "Draw: Stroke width", search: "stroke width line thickness" },
    CommandSpec { id: CommandId::Undo, name: "Edit: Undo", search: "undo" },
    CommandSpec { id: CommandId::ZoomIn, name: "View: Zoom in", search: "zoom in +" },
    CommandSpec { id: CommandId::ZoomOut, name: "View: Zoom out", search: "zoom out -" },
    CommandSpec { id: CommandId::ZoomReset, name: "View: Reset zoom", search: "zoom reset 100" },
    CommandSpec { id: CommandId::ToggleRulers, name: "View: Toggle rulers", search: "rulers axes toggle" },
    CommandSpec { id: CommandId::Clear, name: "Edit: Clear canvas", search: "clear reset canvas" },
    CommandSpec { id: CommandId::SaveJson, name: "File: Save", search: "save file json" },
    CommandSpec { id: CommandId::LoadJson, name: "File: Load", search: "load open file json" },
    CommandSpec { id: CommandId::ExportSvg, name: "File: Export SVG", search: "export svg save" },
];

#[derive(Default)]
pub(super) struct CommandPalette {
    pub open: bool,
    pub query: String,
    pub selected: usize,
    request_focus: bool,
}

#[derive(Clone, Copy)]
pub(super) struct CommandContext {
    pub has_selection: bool,
    pub has_part_selected: bool,
    pub has_copied_part: bool,
    pub has_undo: bool,
}

impl CommandPalette {
    pub fn open(&mut self, query: impl Into<String>) {
        self.open = true;
        self.query = query.into();
        self.selected = 0;
        self.request_focus = true;
    }

    pub fn close(&mut self) {
        self.open = false;
        self.query.clear();
        self.selected = 0;
        self.request_focus = false;
    }

    fn is_enabled(cx: CommandContext, id: CommandId) -> bool {
        match id {
            CommandId::Undo => cx.has_undo,
            CommandId::RemoveSelected => cx.has_selection,
            CommandId::ExactSize | CommandId::CopyBody => cx.has_part_selected,
            CommandId::PasteBody => cx.has_copied_part,
            _ => true,
        }
    }

    pub(super) fn execute(app: &mut BodyApp, ctx: &egui::Context, id: CommandId) {
        match id {
            CommandId::AddBody => {
                app.editor.add_part();
            }
            CommandId::RemoveSelected => app.remove_selected(),
            CommandId::ToolLine => app.editor.set_tool(Some(DrawTool::Line)),
            CommandId::ToolCircle => app.editor.set_tool(Some(DrawTool::Circle)),
            CommandId::ToolCurve => app.editor.set_tool(Some(DrawTool::Curve)),
            CommandId::ToolNone => app.editor.set_tool(None),
            CommandId::ToggleConnectorMode => {
                let on = !app.editor.connector_mode();
                app.editor.set_connector_mode(on);
            }
            CommandId::ExactSize => {
                if let Some(id) = app.editor.selected_part() {
                    app.open_prompt(PromptCommand::PartSize(id));
                }
            }
            CommandId::CopyBody => {
                if let Some(id) = app.editor.selected_part() {
                    let result = app.editor.copy_part(id);
                    app.report(result);
                }
            }
            CommandId::PasteBody => app.paste_part(),
            CommandId::StrokeWidth => app.open_prompt(PromptCommand::StrokeWidth),
            CommandId::Undo => {
                app.editor.undo();
            }
            CommandId::ZoomIn => app.editor.zoom_in(),
            CommandId::ZoomOut => app.editor.zoom_out(),
            CommandId::ZoomReset => app.editor.reset_zoom(),
            CommandId::ToggleRulers => {
                app.settings.show_rulers = !app.settings.show_rulers;
                app.persist_settings();
            }
            CommandId::Clear => app.editor.clear(),
            CommandId::SaveJson => app.save_to_path(),
            CommandId::LoadJson => app.load_from_path(),
            CommandId::ExportSvg => app.save_svg_to_path(),
        }
        ctx.request_repaint();
    }

    fn filtered(&self) -> Vec<(&'static CommandSpec, i64)> {
        let matcher = SkimMatcherV2::default();
        let q = self.query.trim();
        if q.is_empty() {
            return COMMANDS.iter().map(|c| (c, 0)).collect();
        }
        let mut out: Vec<_> = COMMANDS
            .iter()
            .filter_map(|c| matcher.fuzzy_match(c.search, q).map(|score| (c, score)))
            .collect();
        out.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.name.cmp(b.0.name)));
        out
    }

    pub fn ui(&mut self, ctx: &egui::Context, cx: CommandContext) -> Option<CommandId> {
        if !self.open {
            return None;
        }
        let matches = self.filtered();
        if self.selected >= matches.len() {
            self.selected = matches.len().saturating_sub(1);
        }
        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.close();
            return None;
        }
        if ctx.input(|i| i.key_pressed(egui::Key::ArrowDown)) && !matches.is_empty() {
            self.selected = (self.selected + 1).min(matches.len() - 1);
        }
        if ctx.input(|i| i.key_pressed(egui::Key::ArrowUp)) && !matches.is_empty() {
            self.selected = self.selected.saturating_sub(1);
        }
        let mut run_selected = ctx.input(|i| i.key_pressed(egui::Key::Enter));

        let screen = ctx.content_rect();
        let width = 480.0;
        let height = 300.0;
        let pos = egui::pos2(screen.center().x - width * 0.5, screen.top() + 48.0);
        egui::Area::new(egui::Id::new("command_palette"))
            .fixed_pos(pos)
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                let frame = egui::Frame::new()
                    .fill(egui::Color32::from_rgba_unmultiplied(24, 24, 24, 240))
                    .stroke(egui::Stroke::new(1.0, egui::Color32::from_rgb(90, 160, 255)))
                    .inner_margin(10.0)
                    .corner_radius(egui::CornerRadius::same(8));
                frame.show(ui, |ui| {
                    ui.set_min_size(egui::vec2(width, height));
                    let resp = ui.add(
                        egui::TextEdit::singleline(&mut self.query)
                            .desired_width(f32::INFINITY)
                            .hint_text("Search commands"),
                    );
                    if self.request_focus {
                        resp.request_focus();
                        self.request_focus = false;
                    }
                    ui.separator();
                    egui::ScrollArea::vertical().max_height(height - 64.0).show(ui, |ui| {
                        for (idx, (spec, _)) in matches.iter().enumerate() {
                            let enabled = CommandPalette::is_enabled(cx, spec.id);
                            let resp = ui.add_enabled(
                                enabled,
                                egui::Button::new(spec.name).selected(idx == self.selected),
                            );
                            if resp.clicked() {
                                self.selected = idx;
                                run_selected = true;
                            }
                        }
                    });
                });
            });

        if run_selected {
            if let Some((spec, _)) = matches.get(self.selected) {
                if CommandPalette::is_enabled(cx, spec.id) {
                    let cmd = spec.id;
                    self.close();
                    return Some(cmd);
                }
            }
        }
        None
    }
}
