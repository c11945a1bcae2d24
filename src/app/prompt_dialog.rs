use bodystack::Editor;
use bodystack::error::Result;
use bodystack::model::{PartId, Side};
use bodystack::prompt::{PresetAnswers, ValueKind, ValueRequest};
use eframe::egui;

/// A command that needs typed values before it can run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) enum PromptCommand {
    PartSize(PartId),
    VertexWidth(PartId, usize),
    AddSpecialForm(PartId, Side, bool),
    ResizeSpecialForm(PartId, usize),
    RoundSpecialForm(PartId, usize),
    StrokeWidth,
    PartColor(PartId),
}

impl PromptCommand {
    fn title(self) -> &'static str {
        match self {
            PromptCommand::PartSize(_) => "Exact size",
            PromptCommand::VertexWidth(..) => "Vertex width",
            PromptCommand::AddSpecialForm(..) => "Add special form",
            PromptCommand::ResizeSpecialForm(..) => "Resize special form",
            PromptCommand::RoundSpecialForm(..) => "Round special form",
            PromptCommand::StrokeWidth => "Stroke width",
            PromptCommand::PartColor(_) => "Body colour",
        }
    }

    fn kinds(self) -> &'static [ValueKind] {
        match self {
            PromptCommand::PartSize(_) => &[ValueKind::PartWidth, ValueKind::PartHeight],
            PromptCommand::VertexWidth(..) => &[ValueKind::VertexWidth],
            PromptCommand::AddSpecialForm(..) | PromptCommand::ResizeSpecialForm(..) => {
                &[ValueKind::SpecialFormWidth, ValueKind::SpecialFormHeight]
            }
            PromptCommand::RoundSpecialForm(..) => &[ValueKind::CornerRadius],
            PromptCommand::StrokeWidth => &[ValueKind::StrokeWidth],
            PromptCommand::PartColor(_) => &[ValueKind::Color],
        }
    }

    fn run(self, editor: &mut Editor, req: &mut dyn ValueRequest) -> Result<()> {
        match self {
            PromptCommand::PartSize(id) => editor.prompt_part_size(id, req).map(drop),
            PromptCommand::VertexWidth(id, index) => {
                editor.prompt_vertex_width(id, index, req).map(drop)
            }
            PromptCommand::AddSpecialForm(id, side, symmetrical) => editor
                .prompt_add_special_form(id, side, symmetrical, req)
                .map(drop),
            PromptCommand::ResizeSpecialForm(id, index) => {
                editor.prompt_resize_special_form(id, index, req).map(drop)
            }
            PromptCommand::RoundSpecialForm(id, index) => {
                editor.prompt_round_special_form(id, index, req).map(drop)
            }
            PromptCommand::StrokeWidth => editor.prompt_stroke_width(req).map(drop),
            PromptCommand::PartColor(id) => editor.prompt_part_color(id, req).map(drop),
        }
    }
}

/// Collects the defaults a command offers without answering any of them.
#[derive(Default)]
struct DefaultsProbe {
    seen: Vec<(ValueKind, String)>,
}

impl ValueRequest for DefaultsProbe {
    fn request_value(&mut self, kind: ValueKind, default: &str) -> Option<String> {
        self.seen.push((kind, default.to_string()));
        None
    }
}

pub(super) struct PromptDialog {
    command: PromptCommand,
    fields: Vec<(ValueKind, String)>,
}

pub(super) enum DialogOutcome {
    Open,
    Cancelled,
    Done(Result<()>),
}

impl PromptDialog {
    pub fn new(command: PromptCommand, editor: &mut Editor) -> Self {
        // Every answer is `None`, so the probe run leaves the editor as is.
        let mut probe = DefaultsProbe::default();
        let _ = command.run(editor, &mut probe);
        let fields = command
            .kinds()
            .iter()
            .map(|kind| {
                let default = probe
                    .seen
                    .iter()
                    .find(|(k, _)| k == kind)
                    .map(|(_, d)| d.clone())
                    .unwrap_or_default();
                (*kind, default)
            })
            .collect();
        Self { command, fields }
    }

    pub fn ui(&mut self, ctx: &egui::Context, editor: &mut Editor) -> DialogOutcome {
        let mut outcome = DialogOutcome::Open;
        egui::Window::new(self.command.title())
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                for (kind, text) in &mut self.fields {
                    ui.label(kind.prompt());
                    let hint = if kind.is_length() { "e.g. 8 1/2in" } else { "" };
                    ui.add(egui::TextEdit::singleline(text).hint_text(hint));
                }
                ui.separator();
                ui.horizontal(|ui| {
                    let enter = ui.input(|i| i.key_pressed(egui::Key::Enter));
                    if ui.button("OK").clicked() || enter {
                        let mut answers =
                            PresetAnswers::new(self.fields.iter().map(|(_, t)| Some(t.clone())));
                        outcome = DialogOutcome::Done(self.command.run(editor, &mut answers));
                    }
                    let escape = ui.input(|i| i.key_pressed(egui::Key::Escape));
                    if ui.button("Cancel").clicked() || escape {
                        outcome = DialogOutcome::Cancelled;
                    }
                });
            });
        outcome
    }
}
