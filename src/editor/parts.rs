use tracing::{debug, info};

use super::Editor;
use crate::color::Rgb;
use crate::error::{EditorError, Result};
use crate::geometry;
use crate::layout;
use crate::model::{
    ConnectorEnd, ConnectorKind, DEFAULT_PART_HEIGHT, DEFAULT_PART_WIDTH, MIN_PART_SIZE, Part,
    PartId, Side, SpecialForm, SymVertex, Translate,
};
use crate::serialize::PartRecord;

impl Editor {
    fn part_ref(&self, id: PartId) -> Result<&Part> {
        self.diagram.part(id).ok_or(EditorError::UnknownPart(id))
    }

    fn part_mut(&mut self, id: PartId) -> Result<&mut Part> {
        self.diagram.part_mut(id).ok_or(EditorError::UnknownPart(id))
    }

    fn part_index_of(&self, id: PartId) -> Result<usize> {
        self.diagram
            .part_index(id)
            .ok_or(EditorError::UnknownPart(id))
    }

    /// Appends a default body to the bottom of the stack and selects it.
    pub fn add_part(&mut self) -> PartId {
        self.push_undo();
        let origin = layout::next_part_origin(&self.diagram.parts, self.canvas_width);
        let id = self.ids.part();
        self.diagram.parts.push(Part::new(
            id,
            origin.x,
            origin.y,
            DEFAULT_PART_WIDTH,
            DEFAULT_PART_HEIGHT,
        ));
        info!(part = ?id, x = origin.x, y = origin.y, "added part");
        self.refresh_part_view(id);
        self.select_part(Some(id));
        id
    }

    /// Deletes a part: its shapes are detached and the parts below close the gap.
    pub fn remove_part(&mut self, id: PartId) -> Result<()> {
        self.ensure_idle()?;
        let index = self.part_index_of(id)?;
        self.push_undo();
        for shape in &mut self.diagram.shapes {
            if shape.attachment.is_some_and(|a| a.part == id) {
                shape.attachment = None;
            }
        }
        self.diagram.parts.remove(index);
        if self.selected_part == Some(id) {
            self.selected_part = None;
        }
        let moved = layout::restack_after_removal(&mut self.diagram.parts, index);
        info!(part = ?id, index, moved = moved.len(), "removed part");
        self.rebuild_views();
        for (moved_id, _) in moved {
            self.sync_attached(moved_id);
        }
        self.ensure_top_connector_visible();
        Ok(())
    }

    pub fn set_part_color(&mut self, id: PartId, color: &str) -> Result<()> {
        let rgb = Rgb::parse(color)?;
        self.part_ref(id)?;
        self.push_undo();
        self.part_mut(id)?.color = rgb.to_hex();
        self.refresh_part_view(id);
        Ok(())
    }

    pub fn copy_color(&mut self, id: PartId) -> Result<()> {
        self.copied_color = Some(self.part_ref(id)?.color.clone());
        Ok(())
    }

    /// Applies the copied colour. Returns `false` when nothing was copied.
    pub fn paste_color(&mut self, id: PartId) -> Result<bool> {
        let Some(color) = self.copied_color.clone() else {
            return Ok(false);
        };
        self.set_part_color(id, &color)?;
        Ok(true)
    }

    pub fn toggle_3d(&mut self, id: PartId) -> Result<bool> {
        self.part_ref(id)?;
        self.push_undo();
        let part = self.part_mut(id)?;
        part.has_3d = !part.has_3d;
        let on = part.has_3d;
        self.refresh_part_view(id);
        Ok(on)
    }

    pub fn toggle_special(&mut self, id: PartId) -> Result<bool> {
        self.part_ref(id)?;
        self.push_undo();
        let part = self.part_mut(id)?;
        part.special = !part.special;
        let on = part.special;
        self.refresh_part_view(id);
        Ok(on)
    }

    pub fn copy_part(&mut self, id: PartId) -> Result<()> {
        self.copied_part = Some(PartRecord::from(self.part_ref(id)?));
        Ok(())
    }

    /// Gives `target` the copied part's size, colour, connectors, vertices and
    /// special forms. The target keeps its place in the stack.
    pub fn paste_part_onto(&mut self, target: PartId) -> Result<bool> {
        self.ensure_idle()?;
        let Some(rec) = self.copied_part.clone() else {
            return Ok(false);
        };
        let index = self.part_index_of(target)?;
        self.push_undo();

        let part = &mut self.diagram.parts[index];
        let center = part.center_x();
        part.width = rec.width.max(MIN_PART_SIZE);
        part.x = center - part.width * 0.5;
        part.height = rec.height.max(MIN_PART_SIZE);
        part.color = rec.color.clone();
        part.top_connector = rec.top_connector;
        part.bottom_connector = rec.bottom_connector;
        part.special = rec.special;
        part.has_3d = rec.has_3d;
        part.sym_vertices = rec.sym_vertices.clone();
        part.ensure_corner_vertices();
        let (dx, dy) = (part.x - rec.x, part.y - rec.y);
        part.special_forms = rec
            .special_forms
            .iter()
            .cloned()
            .map(|mut f| {
                f.translate(dx, dy);
                f
            })
            .collect();

        self.part_changed(target);
        self.restack_from(index + 1);
        self.ensure_top_connector_visible();
        Ok(true)
    }

    /// Appends a copy of the copied part, nudged 10 units right.
    pub fn paste_part_new(&mut self) -> Result<Option<PartId>> {
        self.ensure_idle()?;
        let Some(rec) = self.copied_part.clone() else {
            return Ok(None);
        };
        self.push_undo();
        let y = layout::next_part_origin(&self.diagram.parts, self.canvas_width).y;
        let id = self.ids.part();
        let mut part = rec.to_part(id);
        part.translate(10.0, y - rec.y);
        self.diagram.parts.push(part);
        info!(part = ?id, "pasted part");
        self.part_changed(id);
        self.select_part(Some(id));
        self.ensure_top_connector_visible();
        Ok(Some(id))
    }

    /// Sets the width about the part's centreline; special forms stay flush
    /// with their side.
    pub fn set_part_width(&mut self, id: PartId, width: f32) -> Result<()> {
        self.ensure_idle()?;
        self.part_ref(id)?;
        self.push_undo();
        let part = self.part_mut(id)?;
        let (x, width) = geometry::resized_width(part.width, part.center_x(), (width - part.width) * 0.5);
        apply_width(part, x, width);
        self.part_changed(id);
        self.ensure_top_connector_visible();
        Ok(())
    }

    /// Sets the height, rescaling vertices and restacking the parts below.
    pub fn set_part_height(&mut self, id: PartId, height: f32) -> Result<()> {
        self.ensure_idle()?;
        let index = self.part_index_of(id)?;
        self.push_undo();
        let part = &mut self.diagram.parts[index];
        clamp_vertices(part);
        let new_height = height.max(MIN_PART_SIZE);
        let ys: Vec<f32> = part.sym_vertices.iter().map(|v| v.y).collect();
        let scaled = geometry::rescale_vertex_ys(&ys, part.height, new_height);
        apply_height(part, new_height, &scaled);
        self.part_changed(id);
        self.restack_from(index + 1);
        self.ensure_top_connector_visible();
        Ok(())
    }

    /// Advances one connector slot `none -> PIN -> BOX -> none`.
    pub fn toggle_connector(&mut self, id: PartId, end: ConnectorEnd) -> Result<ConnectorKind> {
        self.part_ref(id)?;
        self.push_undo();
        let part = self.part_mut(id)?;
        let next = part.connector(end).next();
        part.set_connector(end, next);
        debug!(part = ?id, ?end, ?next, "connector toggled");
        self.refresh_part_view(id);
        self.ensure_top_connector_visible();
        Ok(next)
    }

    pub fn add_special_form(
        &mut self,
        id: PartId,
        side: Side,
        width: f32,
        height: f32,
        symmetrical: bool,
    ) -> Result<usize> {
        self.part_ref(id)?;
        let (width, height) = (width.max(0.0), height.max(0.0));
        self.push_undo();
        let part = self.part_mut(id)?;
        let x = match side {
            Side::Left => part.x - width,
            Side::Right => part.x + part.width,
        };
        part.special_forms.push(SpecialForm {
            x,
            y: part.y + (part.height - height) * 0.5,
            width,
            height,
            rx: 0.0,
            side,
            symmetrical,
        });
        let index = part.special_forms.len() - 1;
        self.refresh_part_view(id);
        Ok(index)
    }

    fn special_form_mut(&mut self, id: PartId, index: usize) -> Result<&mut SpecialForm> {
        self.part_mut(id)?
            .special_forms
            .get_mut(index)
            .ok_or(EditorError::UnknownSpecialForm { part: id, index })
    }

    fn check_special_form(&self, id: PartId, index: usize) -> Result<()> {
        if self.part_ref(id)?.special_forms.len() > index {
            Ok(())
        } else {
            Err(EditorError::UnknownSpecialForm { part: id, index })
        }
    }

    pub fn remove_special_form(&mut self, id: PartId, index: usize) -> Result<()> {
        self.check_special_form(id, index)?;
        self.push_undo();
        self.part_mut(id)?.special_forms.remove(index);
        self.refresh_part_view(id);
        Ok(())
    }

    /// Changes the size of a special form; `None` keeps that dimension.
    pub fn resize_special_form(
        &mut self,
        id: PartId,
        index: usize,
        width: Option<f32>,
        height: Option<f32>,
    ) -> Result<()> {
        self.check_special_form(id, index)?;
        self.push_undo();
        let form = self.special_form_mut(id, index)?;
        if let Some(w) = width {
            form.width = w.max(0.0);
        }
        if let Some(h) = height {
            form.height = h.max(0.0);
        }
        self.refresh_part_view(id);
        Ok(())
    }

    pub fn round_special_form(&mut self, id: PartId, index: usize, rx: f32) -> Result<()> {
        self.check_special_form(id, index)?;
        self.push_undo();
        self.special_form_mut(id, index)?.rx = rx.max(0.0);
        self.refresh_part_view(id);
        Ok(())
    }

    /// Adds a flat vertex at height `y` from the part's top. Returns its index.
    pub fn add_vertex(&mut self, id: PartId, y: f32) -> Result<usize> {
        self.part_ref(id)?;
        self.push_undo();
        let index = insert_vertex(self.part_mut(id)?, y);
        self.refresh_part_view(id);
        Ok(index)
    }

    /// Removes a vertex. A corner vertex comes straight back flat.
    pub fn remove_vertex(&mut self, id: PartId, index: usize) -> Result<()> {
        if self.part_ref(id)?.sym_vertices.len() <= index {
            return Err(EditorError::UnknownVertex { part: id, index });
        }
        self.push_undo();
        let part = self.part_mut(id)?;
        part.sym_vertices.remove(index);
        part.ensure_corner_vertices();
        self.refresh_part_view(id);
        Ok(())
    }

    /// Sets a vertex so the outline is `total` wide at its height.
    pub fn set_vertex_width(&mut self, id: PartId, index: usize, total: f32) -> Result<()> {
        let part = self.part_ref(id)?;
        if part.sym_vertices.len() <= index {
            return Err(EditorError::UnknownVertex { part: id, index });
        }
        let dx = geometry::vertex_dx_for_width(part.width, total);
        self.push_undo();
        self.part_mut(id)?.sym_vertices[index].dx = dx;
        self.refresh_part_view(id);
        Ok(())
    }
}

pub(super) fn insert_vertex(part: &mut Part, y: f32) -> usize {
    part.sym_vertices.push(SymVertex {
        y: y.clamp(0.0, part.height),
        dx: 0.0,
    });
    part.sym_vertices.len() - 1
}

/// Pulls stored vertices back into `[0, height]`.
pub(super) fn clamp_vertices(part: &mut Part) {
    let h = part.height;
    for v in &mut part.sym_vertices {
        v.y = v.y.clamp(0.0, h);
    }
}

pub(super) fn apply_height(part: &mut Part, height: f32, vertex_ys: &[f32]) {
    part.height = height;
    for (v, y) in part.sym_vertices.iter_mut().zip(vertex_ys) {
        v.y = *y;
    }
}

pub(super) fn apply_width(part: &mut Part, x: f32, width: f32) {
    let left_shift = x - part.x;
    let right_shift = (x + width) - (part.x + part.width);
    for form in &mut part.special_forms {
        let shift = match form.side {
            Side::Left => left_shift,
            Side::Right => right_shift,
        };
        form.translate(shift, 0.0);
    }
    part.x = x;
    part.width = width;
}
