//! Commands that gather their parameters through a [`ValueRequest`].
//!
//! Every answer is parsed before anything is applied, so a bad value aborts
//! the whole command with the model untouched. An empty or cancelled answer
//! leaves that parameter unchanged.

use super::Editor;
use crate::error::{EditorError, Result};
use crate::model::{PartId, Side};
use crate::prompt::{ValueKind, ValueRequest};
use crate::units::{self, LengthUnit};

fn ask(req: &mut dyn ValueRequest, kind: ValueKind, default: &str) -> Option<String> {
    req.request_value(kind, default)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn ask_dimension(
    req: &mut dyn ValueRequest,
    kind: ValueKind,
    unit: LengthUnit,
    current: Option<f32>,
) -> Result<Option<f32>> {
    let default = current
        .map(|v| units::format_dimension(v, unit))
        .unwrap_or_default();
    ask(req, kind, &default)
        .map(|text| units::parse_dimension(&text, unit))
        .transpose()
}

fn ask_number(req: &mut dyn ValueRequest, kind: ValueKind, current: f32) -> Result<Option<f32>> {
    ask(req, kind, &current.to_string())
        .map(|text| match text.parse::<f32>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ => Err(EditorError::InvalidDimension { input: text }),
        })
        .transpose()
}

impl Editor {
    fn unit_for(&self, kind: ValueKind) -> LengthUnit {
        match kind {
            ValueKind::PartWidth => self.width_unit,
            _ => self.height_unit,
        }
    }

    fn ask_length(
        &self,
        req: &mut dyn ValueRequest,
        kind: ValueKind,
        current: Option<f32>,
    ) -> Result<Option<f32>> {
        ask_dimension(req, kind, self.unit_for(kind), current)
    }

    /// Asks for width then height (either may be skipped).
    pub fn prompt_part_size(&mut self, id: PartId, req: &mut dyn ValueRequest) -> Result<bool> {
        let part = self.diagram.part(id).ok_or(EditorError::UnknownPart(id))?;
        let (w0, h0) = (part.width, part.height);
        let width = self.ask_length(req, ValueKind::PartWidth, Some(w0))?;
        let height = self.ask_length(req, ValueKind::PartHeight, Some(h0))?;
        if let Some(w) = width {
            self.set_part_width(id, w)?;
        }
        if let Some(h) = height {
            self.set_part_height(id, h)?;
        }
        Ok(width.is_some() || height.is_some())
    }

    pub fn prompt_vertex_width(
        &mut self,
        id: PartId,
        index: usize,
        req: &mut dyn ValueRequest,
    ) -> Result<bool> {
        let part = self.diagram.part(id).ok_or(EditorError::UnknownPart(id))?;
        if part.sym_vertices.len() <= index {
            return Err(EditorError::UnknownVertex { part: id, index });
        }
        match self.ask_length(req, ValueKind::VertexWidth, None)? {
            Some(total) => self.set_vertex_width(id, index, total).map(|_| true),
            None => Ok(false),
        }
    }

    /// Asks for width and height of a new special form; both are required.
    pub fn prompt_add_special_form(
        &mut self,
        id: PartId,
        side: Side,
        symmetrical: bool,
        req: &mut dyn ValueRequest,
    ) -> Result<Option<usize>> {
        if self.diagram.part(id).is_none() {
            return Err(EditorError::UnknownPart(id));
        }
        let Some(width) = self.ask_length(req, ValueKind::SpecialFormWidth, None)? else {
            return Ok(None);
        };
        let Some(height) = self.ask_length(req, ValueKind::SpecialFormHeight, None)? else {
            return Ok(None);
        };
        self.add_special_form(id, side, width, height, symmetrical)
            .map(Some)
    }

    pub fn prompt_resize_special_form(
        &mut self,
        id: PartId,
        index: usize,
        req: &mut dyn ValueRequest,
    ) -> Result<bool> {
        let form = self
            .diagram
            .part(id)
            .and_then(|p| p.special_forms.get(index))
            .ok_or(EditorError::UnknownSpecialForm { part: id, index })?;
        let (w0, h0) = (form.width, form.height);
        let width = self.ask_length(req, ValueKind::SpecialFormWidth, Some(w0))?;
        let height = self.ask_length(req, ValueKind::SpecialFormHeight, Some(h0))?;
        if width.is_none() && height.is_none() {
            return Ok(false);
        }
        self.resize_special_form(id, index, width, height)?;
        Ok(true)
    }

    pub fn prompt_round_special_form(
        &mut self,
        id: PartId,
        index: usize,
        req: &mut dyn ValueRequest,
    ) -> Result<bool> {
        let rx0 = self
            .diagram
            .part(id)
            .and_then(|p| p.special_forms.get(index))
            .ok_or(EditorError::UnknownSpecialForm { part: id, index })?
            .rx;
        match ask_number(req, ValueKind::CornerRadius, rx0)? {
            Some(rx) => self.round_special_form(id, index, rx).map(|_| true),
            None => Ok(false),
        }
    }

    pub fn prompt_stroke_width(&mut self, req: &mut dyn ValueRequest) -> Result<bool> {
        match ask_number(req, ValueKind::StrokeWidth, self.stroke_width)? {
            Some(w) => self.set_stroke_width(w).map(|_| true),
            None => Ok(false),
        }
    }

    pub fn prompt_part_color(&mut self, id: PartId, req: &mut dyn ValueRequest) -> Result<bool> {
        let current = self
            .diagram
            .part(id)
            .ok_or(EditorError::UnknownPart(id))?
            .color
            .clone();
        match ask(req, ValueKind::Color, &current) {
            Some(c) => self.set_part_color(id, &c).map(|_| true),
            None => Ok(false),
        }
    }
}
