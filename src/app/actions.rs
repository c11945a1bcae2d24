use std::path::Path;

use super::BodyApp;

impl BodyApp {
    fn diagram_stem(&self) -> String {
        let name = self.editor.name();
        if name.is_empty() {
            "diagram".to_string()
        } else {
            name.to_string()
        }
    }

    fn adopt_name_from(&mut self, path: &Path) {
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            self.editor.set_name(stem);
        }
    }

    pub(super) fn save_to_path(&mut self) {
        let path = self.settings.file_path.clone();
        match self.editor.save_json(&path) {
            Ok(()) => self.status = Some(format!("Saved {path}")),
            Err(e) => self.status = Some(format!("Save failed: {e}")),
        }
    }

    pub(super) fn load_from_path(&mut self) {
        let path = self.settings.file_path.clone();
        match self.editor.load_json(&path) {
            Ok(()) => self.status = Some(format!("Loaded {path}")),
            Err(e) => self.status = Some(format!("Load failed: {e}")),
        }
    }

    pub(super) fn save_svg_to_path(&mut self) {
        let path = self.settings.svg_path.clone();
        match self.editor.save_svg(&path, self.settings.show_rulers) {
            Ok(()) => self.status = Some(format!("Exported {path}")),
            Err(e) => self.status = Some(format!("Export failed: {e}")),
        }
    }

    pub(super) fn save_json_dialog(&mut self) {
        let default_name = format!("{}.json", self.diagram_stem());
        let Some(path) = rfd::FileDialog::new()
            .set_file_name(&default_name)
            .add_filter("JSON", &["json"])
            .save_file()
        else {
            return;
        };
        self.adopt_name_from(&path);
        let path_str = path.display().to_string();
        match self.editor.save_json(&path) {
            Ok(()) => {
                self.settings.file_path = path_str.clone();
                self.persist_settings();
                self.status = Some(format!("Saved {path_str}"));
            }
            Err(e) => self.status = Some(format!("Save failed: {e}")),
        }
    }

    pub(super) fn save_svg_dialog(&mut self) {
        let default_name = format!("{}.svg", self.diagram_stem());
        let Some(path) = rfd::FileDialog::new()
            .set_file_name(&default_name)
            .add_filter("SVG", &["svg"])
            .save_file()
        else {
            return;
        };
        let path_str = path.display().to_string();
        match self.editor.save_svg(&path, self.settings.show_rulers) {
            Ok(()) => {
                self.settings.svg_path = path_str.clone();
                self.persist_settings();
                self.status = Some(format!("Exported {path_str}"));
            }
            Err(e) => self.status = Some(format!("Export failed: {e}")),
        }
    }

    pub(super) fn open_json_dialog(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON", &["json"])
            .pick_file()
        else {
            return;
        };
        let path_str = path.display().to_string();
        match self.editor.load_json(&path) {
            Ok(()) => {
                if self.editor.name().is_empty() {
                    self.adopt_name_from(&path);
                }
                self.settings.file_path = path_str.clone();
                self.persist_settings();
                self.status = Some(format!("Loaded {path_str}"));
            }
            Err(e) => self.status = Some(format!("Load failed: {e}")),
        }
    }

    pub(super) fn remove_selected(&mut self) {
        if let Some(shape) = self.editor.selected_shape() {
            let result = self.editor.delete_shape(shape);
            self.report(result);
        } else if let Some(part) = self.editor.selected_part() {
            let result = self.editor.remove_part(part);
            self.report(result);
        }
    }

    pub(super) fn paste_part(&mut self) {
        let result = match self.editor.selected_part() {
            Some(target) => self.editor.paste_part_onto(target).map(drop),
            None => self.editor.paste_part_new().map(drop),
        };
        self.report(result);
    }
}
