//! PIN/BOX connectors derived from the template, and the top margin rule.

use bodystack::{Editor, EditorError};
use bodystack::PressOutcome;
use bodystack::connector::{ConnectorTemplate, TemplateState};
use bodystack::layout::{self, TOP_MARGIN};
use bodystack::model::{ConnectorEnd, ConnectorKind, Point, ShapeGeometry};

/// 40 wide, 30 tall once the line below the body is included.
const TEMPLATE: &str = r#"{
    "parts": [{"x": 10, "y": 10, "width": 40, "height": 20, "symVertices": []}],
    "drawnShapes": [{"type": "line", "x1": 30, "y1": 30, "x2": 30, "y2": 40, "width": 2}]
}"#;

fn template() -> ConnectorTemplate {
    ConnectorTemplate::from_json(TEMPLATE).unwrap()
}

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

#[test]
fn connectors_wait_for_the_template() {
    let mut editor = Editor::default();
    let id = editor.add_part();
    assert!(matches!(editor.template_state(), TemplateState::Pending));
    assert!(matches!(
        editor.template_state().require(),
        Err(EditorError::TemplateNotReady)
    ));

    editor.toggle_connector(id, ConnectorEnd::Top).unwrap();
    let view = editor.views().part(id).unwrap();
    assert!(view.connectors.is_empty());
    assert_eq!(view.labels[0].text, "PIN");
    assert_eq!(editor.diagram().part(id).unwrap().y, TOP_MARGIN);
}

#[test]
fn installing_the_template_brings_the_top_pin_into_view() {
    let mut editor = Editor::default();
    let top = editor.add_part();
    editor.add_part();
    let free = editor.add_shape(ShapeGeometry::Line {
        a: Point::new(0.0, 0.0),
        b: Point::new(10.0, 0.0),
    });
    editor.toggle_connector(top, ConnectorEnd::Top).unwrap();

    editor.install_template(Ok(template()));

    // scale 60 * 0.8 / 40 = 1.2, so the pin reaches 36 above the body
    let part = editor.diagram().part(top).unwrap();
    assert!(approx(part.y, TOP_MARGIN + 36.0));
    assert!(layout::is_stacked(&editor.diagram().parts));
    let ShapeGeometry::Line { a, .. } = editor.diagram().shape(free).unwrap().geometry else {
        panic!("expected a line");
    };
    assert!(approx(a.y, 36.0));

    let view = editor.views().part(top).unwrap();
    assert_eq!(view.connectors.len(), 1);
    let pin = &view.connectors[0];
    assert_eq!(pin.kind, ConnectorKind::Pin);
    assert!(approx(pin.bounds.y, TOP_MARGIN));
    assert!(approx(pin.bounds.width, 48.0));
    assert!(approx(pin.bounds.x, 376.0));
}

#[test]
fn widening_a_pinned_body_shifts_the_diagram_again() {
    let mut editor = Editor::default();
    editor.install_template(Ok(template()));
    let id = editor.add_part();
    editor.toggle_connector(id, ConnectorEnd::Top).unwrap();
    assert!(approx(editor.diagram().part(id).unwrap().y, 56.0));

    editor.set_part_width(id, 120.0).unwrap();
    assert!(approx(editor.diagram().part(id).unwrap().y, TOP_MARGIN + 72.0));
}

#[test]
fn boxes_do_not_protrude() {
    let mut editor = Editor::default();
    editor.install_template(Ok(template()));
    let id = editor.add_part();
    editor.toggle_connector(id, ConnectorEnd::Top).unwrap();
    editor.toggle_connector(id, ConnectorEnd::Top).unwrap();

    let view = editor.views().part(id).unwrap();
    assert_eq!(view.connectors[0].kind, ConnectorKind::Box);
    assert_eq!(view.connectors[0].style.dash, Some("4 2"));
    assert!(view.connectors[0].bounds.y >= view.bounds.y);
    assert_eq!(view.labels[0].text, "");
}

#[test]
fn missing_template_disables_connectors() {
    let mut editor = Editor::default();
    editor.install_template(ConnectorTemplate::load("/nonexistent/threads.json"));
    assert!(matches!(editor.template_state(), TemplateState::Failed(_)));
    assert!(editor.template().is_none());

    let id = editor.add_part();
    editor.toggle_connector(id, ConnectorEnd::Bottom).unwrap();
    assert!(editor.views().part(id).unwrap().connectors.is_empty());
}

#[test]
fn connector_mode_clicks_cycle_slots() {
    let mut editor = Editor::default();
    let id = editor.add_part();
    editor.set_connector_mode(true);

    let top = Point::new(400.0, 25.0);
    let expected = [ConnectorKind::Pin, ConnectorKind::Box, ConnectorKind::None];
    for kind in expected {
        assert_eq!(editor.press(top, top).unwrap(), PressOutcome::ConnectorToggled(id));
        assert_eq!(editor.diagram().part(id).unwrap().top_connector, kind);
    }

    let bottom = Point::new(390.0, 135.0);
    editor.press(bottom, bottom).unwrap();
    assert_eq!(
        editor.diagram().part(id).unwrap().bottom_connector,
        ConnectorKind::Pin
    );

    let middle = Point::new(390.0, 80.0);
    assert_eq!(
        editor.press(middle, middle).unwrap(),
        PressOutcome::SelectedPart(id)
    );
}
