use std::fs;
use std::path::Path;

use tracing::info;

use super::Editor;
use crate::error::Result;
use crate::serialize::{self, DiagramFile};
use crate::svg;

impl Editor {
    pub fn export_file(&self) -> DiagramFile {
        serialize::export(&self.diagram)
    }

    pub fn export_json(&self) -> Result<String> {
        serialize::to_json_pretty(&self.export_file())
    }

    /// Replaces the diagram with `file`. The previous diagram goes on the
    /// undo stack.
    pub fn import_file(&mut self, file: &DiagramFile) -> Result<()> {
        self.ensure_idle()?;
        self.push_undo();
        let diagram = serialize::import(file, &mut self.ids);
        self.reset_diagram(diagram);
        self.ensure_top_connector_visible();
        info!(
            parts = self.diagram.parts.len(),
            shapes = self.diagram.shapes.len(),
            "diagram loaded"
        );
        Ok(())
    }

    /// Parses first; malformed text leaves the editor untouched.
    pub fn import_json(&mut self, text: &str) -> Result<()> {
        let file = serialize::from_json(text)?;
        self.import_file(&file)
    }

    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.export_json()?)?;
        info!(path = %path.display(), "saved diagram");
        Ok(())
    }

    pub fn load_json(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        self.import_json(&text)?;
        info!(path = %path.display(), "opened diagram");
        Ok(())
    }

    pub fn export_svg(&self, show_rulers: bool) -> String {
        svg::diagram_to_svg(&self.diagram, &self.views, show_rulers)
    }

    pub fn save_svg(&self, path: impl AsRef<Path>, show_rulers: bool) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.export_svg(show_rulers))?;
        info!(path = %path.display(), "exported svg");
        Ok(())
    }
}
