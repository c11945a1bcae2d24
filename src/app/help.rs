use eframe::egui;

pub(super) fn draw_help_window(ctx: &egui::Context, open: &mut bool) {
    egui::Window::new("Help")
        .open(open)
        .resizable(true)
        .default_width(520.0)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.heading("Keyboard");
                ui.separator();
                help_row(ui, "⌘⇧P", "Open command palette");
                help_row(ui, "⌘S", "Save diagram (JSON)");
                help_row(ui, "⌘⇧S", "Export as SVG");
                help_row(ui, "⌘O", "Open diagram");
                help_row(ui, "⌘Z", "Undo");
                help_row(ui, "B", "Add body");
                help_row(ui, "L / O / C", "Draw line / circle / curve");
                help_row(ui, "Escape", "Stop drawing");
                help_row(ui, "Delete / Backspace", "Delete selected body or shape");
                help_row(ui, "⌘+ / ⌘- / ⌘0", "Zoom in / out / reset");

                ui.add_space(10.0);
                ui.heading("Mouse");
                ui.separator();
                help_row(ui, "Click", "Select a body or shape");
                help_row(ui, "Drag a handle", "Resize height (bottom) or width (sides)");
                help_row(ui, "Double-click a body", "Add a vertex, or remove the one under the pointer");
                help_row(ui, "Drag a vertex handle", "Pinch or widen the body at that height");
                help_row(ui, "Right-click", "Body, shape or canvas menu");
                help_row(ui, "Middle drag / wheel", "Pan");
                help_row(ui, "⌘ + wheel", "Zoom");

                ui.add_space(10.0);
                ui.heading("Dimensions");
                ui.separator();
                ui.label("Sizes accept a cm or in suffix. Inch values may be fractions such as 8 1/2in.");
                ui.label("In connector mode, clicking near the top or bottom edge of a body cycles none, PIN and BOX.");
            });
        });
}

fn help_row(ui: &mut egui::Ui, key: &str, action: &str) {
    ui.horizontal(|ui| {
        ui.add_sized([150.0, 18.0], egui::Label::new(egui::RichText::new(key).monospace()));
        ui.label(action);
    });
}
