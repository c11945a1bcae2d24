//! Drawn shapes bound to a body follow it through resizes and restacks.

use bodystack::model::{PartId, Point, ShapeGeometry, ShapeId};
use bodystack::{DrawTool, Editor, PressOutcome};

fn pt(x: f32, y: f32) -> Point {
    Point::new(x, y)
}

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

fn line(editor: &Editor, id: ShapeId) -> (Point, Point) {
    match editor.diagram().shape(id).unwrap().geometry {
        ShapeGeometry::Line { a, b } => (a, b),
        other => panic!("expected a line, got {other:?}"),
    }
}

/// A 60x120 body at (370, 20) with a vertical line a quarter of the way in.
fn body_with_line() -> (Editor, PartId, ShapeId) {
    let mut editor = Editor::default();
    let part = editor.add_part();
    let shape = editor.add_shape(ShapeGeometry::Line {
        a: pt(385.0, 20.0),
        b: pt(385.0, 140.0),
    });
    editor.attach_shape(shape, part).unwrap();
    (editor, part, shape)
}

#[test]
fn line_follows_width_change() {
    let (mut editor, part, shape) = body_with_line();
    editor.set_part_width(part, 120.0).unwrap();

    let (a, b) = line(&editor, shape);
    assert!(approx(a.x, 370.0), "a.x = {}", a.x);
    assert!(approx(b.x, 370.0));
    assert!(approx(a.y, 20.0));
}

#[test]
fn line_follows_height_change() {
    let (mut editor, part, shape) = body_with_line();
    editor.set_part_height(part, 240.0).unwrap();

    let (a, b) = line(&editor, shape);
    assert!(approx(a.y, 20.0));
    assert!(approx(b.y, 260.0));
    assert!(editor.views().shape(shape).unwrap().attached);
}

#[test]
fn midpoint_stays_at_midpoint() {
    let mut editor = Editor::default();
    let part = editor.add_part();
    let shape = editor.add_shape(ShapeGeometry::Circle {
        center: pt(400.0, 80.0),
        r: 10.0,
    });
    editor.attach_shape(shape, part).unwrap();
    editor.set_part_width(part, 120.0).unwrap();
    editor.set_part_height(part, 200.0).unwrap();

    let body = editor.diagram().part(part).unwrap().bounds();
    let ShapeGeometry::Circle { center, r } = editor.diagram().shape(shape).unwrap().geometry else {
        panic!("expected a circle");
    };
    assert!(approx(center.x, body.center().x));
    assert!(approx(center.y, body.center().y));
    // radius scales with the mean of width and height: 90 -> 160
    assert!(approx(r, 10.0 * 160.0 / 90.0));
}

#[test]
fn shapes_on_lower_bodies_move_when_the_stack_shifts() {
    let mut editor = Editor::default();
    let top = editor.add_part();
    let lower = editor.add_part();
    let shape = editor.add_shape(ShapeGeometry::Line {
        a: pt(380.0, 150.0),
        b: pt(420.0, 150.0),
    });
    editor.attach_shape(shape, lower).unwrap();

    editor.set_part_height(top, 170.0).unwrap();
    let (a, b) = line(&editor, shape);
    assert!(approx(a.y, 200.0));
    assert!(approx(b.y, 200.0));
}

#[test]
fn detached_shapes_stay_put() {
    let (mut editor, part, shape) = body_with_line();
    editor.detach_shape(shape).unwrap();
    editor.set_part_width(part, 120.0).unwrap();

    let (a, _) = line(&editor, shape);
    assert_eq!(a.x, 385.0);
    assert!(!editor.views().shape(shape).unwrap().attached);
}

#[test]
fn removing_the_body_frees_its_shapes() {
    let (mut editor, part, shape) = body_with_line();
    editor.remove_part(part).unwrap();
    let s = editor.diagram().shape(shape).unwrap();
    assert!(s.attachment.is_none());
    assert!(editor.diagram().attached_shape_ids(part).is_empty());
}

#[test]
fn shapes_on_lower_bodies_follow_when_an_upper_body_is_removed() {
    let mut editor = Editor::default();
    let top = editor.add_part();
    let lower = editor.add_part();
    let shape = editor.add_shape(ShapeGeometry::Line {
        a: pt(380.0, 200.0),
        b: pt(420.0, 200.0),
    });
    editor.attach_shape(shape, lower).unwrap();

    editor.remove_part(top).unwrap();
    assert_eq!(editor.diagram().part(lower).unwrap().y, 20.0);

    let (a, b) = line(&editor, shape);
    assert!(approx(a.y, 80.0), "a.y = {}", a.y);
    assert!(approx(b.y, 80.0));
    let view = editor.views().shape(shape).unwrap();
    assert_eq!(view.geometry, editor.diagram().shape(shape).unwrap().geometry);

    let mut reloaded = Editor::default();
    reloaded.import_json(&editor.export_json().unwrap()).unwrap();
    let ShapeGeometry::Line { a, .. } = reloaded.diagram().shapes[0].geometry else {
        panic!("expected a line");
    };
    assert!(approx(a.y, 80.0));
}

#[test]
fn moving_an_attached_shape_rebinds_its_fractions() {
    let (mut editor, part, shape) = body_with_line();
    editor.clear_selection();

    let grab = pt(385.0, 80.0);
    assert_eq!(editor.press(grab, grab).unwrap(), PressOutcome::DragStarted);
    assert_eq!(editor.selected_shape(), Some(shape));
    editor.drag_to(pt(395.0, 80.0));
    editor.end_drag();

    editor.set_part_width(part, 120.0).unwrap();
    let (a, _) = line(&editor, shape);
    // 25/60 of the way across the new 120-wide body at x = 340
    assert!(approx(a.x, 390.0), "a.x = {}", a.x);
}

#[test]
fn line_endpoint_drag_moves_one_end() {
    let mut editor = Editor::default();
    let shape = editor.add_shape(ShapeGeometry::Line {
        a: pt(0.0, 0.0),
        b: pt(100.0, 0.0),
    });
    let grab = pt(100.0, 1.0);
    editor.press(grab, grab).unwrap();
    editor.drag_to(pt(100.0, 51.0));
    editor.end_drag();

    let (a, b) = line(&editor, shape);
    assert_eq!(a, pt(0.0, 0.0));
    assert_eq!(b, pt(100.0, 50.0));
}

#[test]
fn drawing_tools_collect_clicks() {
    let mut editor = Editor::default();
    editor.set_tool(Some(DrawTool::Curve));

    assert_eq!(
        editor.press(pt(0.0, 0.0), pt(0.0, 0.0)).unwrap(),
        PressOutcome::DrawPoint
    );
    editor.press(pt(50.0, -40.0), pt(50.0, -40.0)).unwrap();
    assert_eq!(editor.pending_points().len(), 2);
    assert!(matches!(
        editor.draw_preview(pt(100.0, 0.0)),
        Some(ShapeGeometry::Curve { .. })
    ));

    let PressOutcome::ShapeDrawn(id) = editor.press(pt(100.0, 0.0), pt(100.0, 0.0)).unwrap()
    else {
        panic!("third click should finish the curve");
    };
    assert_eq!(editor.tool(), None);
    let view = editor.views().shape(id).unwrap();
    assert_eq!(view.stroke_width, 2.0);
    assert!(view.path.len() > 3);
}

#[test]
fn circle_tool_uses_rim_distance() {
    let mut editor = Editor::default();
    editor.set_stroke_width(4.0).unwrap();
    editor.set_tool(Some(DrawTool::Circle));
    assert_eq!(editor.draw_click(pt(10.0, 10.0)), None);
    let id = editor.draw_click(pt(13.0, 14.0)).unwrap();

    let shape = editor.diagram().shape(id).unwrap();
    assert_eq!(shape.stroke_width, 4.0);
    assert_eq!(
        shape.geometry,
        ShapeGeometry::Circle {
            center: pt(10.0, 10.0),
            r: 5.0
        }
    );
    assert!(editor.set_stroke_width(0.0).is_err());
}

#[test]
fn deleting_a_shape_drops_its_view() {
    let (mut editor, _, shape) = body_with_line();
    editor.delete_shape(shape).unwrap();
    assert!(editor.diagram().shape(shape).is_none());
    assert!(editor.views().shape(shape).is_none());
    assert!(editor.delete_shape(shape).is_err());
}
