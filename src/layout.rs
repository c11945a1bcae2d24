//! Vertical stacking of parts.
//!
//! Part `i + 1` always starts where part `i` ends. Every structural change
//! runs a forward pass that reassigns `y` and reports which parts moved so the
//! caller can refresh their dependants.

use crate::connector::{self, ConnectorTemplate};
use crate::model::{Part, PartId, Point, Translate, DEFAULT_PART_WIDTH};

/// Canvas-space `y` of the topmost part and the lowest point any connector may reach.
pub const TOP_MARGIN: f32 = 20.0;

const STACK_TOLERANCE: f32 = 1e-3;

/// Where "add body" puts a new part: centred under the last part, or
/// centred on the canvas at the top margin when the stack is empty.
pub fn next_part_origin(parts: &[Part], canvas_width: f32) -> Point {
    let half = DEFAULT_PART_WIDTH * 0.5;
    match parts.last() {
        Some(last) => Point::new(last.center_x() - half, last.bottom()),
        None => Point::new(canvas_width * 0.5 - half, TOP_MARGIN),
    }
}

/// Reassigns `y` for every part from `start` on. Returns `(id, dy)` for each
/// part that actually moved; special forms travel with their part.
pub fn restack_from(parts: &mut [Part], start: usize) -> Vec<(PartId, f32)> {
    let mut moved = Vec::new();
    for i in start.max(1)..parts.len() {
        let expected = parts[i - 1].bottom();
        let dy = expected - parts[i].y;
        if dy != 0.0 {
            parts[i].translate(0.0, dy);
            moved.push((parts[i].id, dy));
        }
    }
    moved
}

/// Restacking after the part at `index` was removed: the new first part goes
/// to the top margin, later parts close the gap.
pub fn restack_after_removal(parts: &mut [Part], index: usize) -> Vec<(PartId, f32)> {
    let mut moved = Vec::new();
    if index == 0 {
        if let Some(first) = parts.first_mut() {
            let dy = TOP_MARGIN - first.y;
            if dy != 0.0 {
                first.translate(0.0, dy);
                moved.push((first.id, dy));
            }
        }
    }
    moved.extend(restack_from(parts, index));
    moved
}

pub fn is_stacked(parts: &[Part]) -> bool {
    parts
        .windows(2)
        .all(|w| (w[1].y - w[0].bottom()).abs() < STACK_TOLERANCE)
}

/// Downward shift needed so no part's top pin reaches above [`TOP_MARGIN`].
/// `None` when everything already fits or the stack is empty.
pub fn top_connector_deficit(parts: &[Part], template: &ConnectorTemplate) -> Option<f32> {
    let min_y = parts
        .iter()
        .map(|p| p.y - connector::top_extent(p, template))
        .reduce(f32::min)?;
    let delta = TOP_MARGIN - min_y;
    (delta > 0.0).then_some(delta)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stack(heights: &[f32]) -> Vec<Part> {
        let mut parts: Vec<Part> = Vec::new();
        for (i, h) in heights.iter().enumerate() {
            let origin = next_part_origin(&parts, 800.0);
            parts.push(Part::new(PartId(i as u64 + 1), origin.x, origin.y, 60.0, *h));
        }
        parts
    }

    #[test]
    fn first_part_is_centred_at_top_margin() {
        let p = next_part_origin(&[], 800.0);
        assert_eq!(p, Point::new(370.0, TOP_MARGIN));
    }

    #[test]
    fn restack_closes_gap_after_growth() {
        let mut parts = stack(&[120.0, 100.0, 80.0]);
        parts[0].height = 200.0;
        let moved = restack_from(&mut parts, 1);
        assert_eq!(moved.len(), 2);
        assert!(moved.iter().all(|(_, dy)| *dy == 80.0));
        assert!(is_stacked(&parts));
        assert_eq!(parts[2].y, 20.0 + 200.0 + 100.0);
    }

    #[test]
    fn removing_first_part_pulls_stack_to_margin() {
        let mut parts = stack(&[120.0, 100.0, 80.0]);
        parts.remove(0);
        restack_after_removal(&mut parts, 0);
        assert_eq!(parts[0].y, TOP_MARGIN);
        assert_eq!(parts[1].y, TOP_MARGIN + 100.0);
    }
}
