//! Diagram files, SVG export and settings on disk.

use bodystack::layout;
use bodystack::model::{ConnectorEnd, ConnectorKind, Point, ShapeGeometry, Side};
use bodystack::serialize::{self, ShapeRecord};
use bodystack::settings::{self, AppSettings};
use bodystack::units::LengthUnit;
use bodystack::{Editor, EditorError};
use tempfile::TempDir;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

/// Two bodies, a pinched vertex, a special form, one attached circle and one
/// free line.
fn sample_editor() -> Editor {
    let mut editor = Editor::default();
    editor.set_name("sample");
    let top = editor.add_part();
    let lower = editor.add_part();
    editor.set_part_height(top, 200.0).unwrap();
    editor.set_part_color(lower, "#884422").unwrap();
    editor.toggle_connector(lower, ConnectorEnd::Bottom).unwrap();
    editor.toggle_3d(lower).unwrap();
    let v = editor.add_vertex(top, 100.0).unwrap();
    editor.set_vertex_width(top, v, 40.0).unwrap();
    editor.add_special_form(lower, Side::Left, 10.0, 30.0, true).unwrap();

    let circle = editor.add_shape(ShapeGeometry::Circle {
        center: Point::new(400.0, 280.0),
        r: 12.0,
    });
    editor.attach_shape(circle, lower).unwrap();
    editor.add_shape(ShapeGeometry::Line {
        a: Point::new(0.0, 0.0),
        b: Point::new(50.0, 50.0),
    });
    editor
}

#[test]
fn json_round_trip_preserves_the_diagram() {
    let editor = sample_editor();
    let json = editor.export_json().unwrap();

    let mut loaded = Editor::default();
    loaded.import_json(&json).unwrap();
    let d = loaded.diagram();

    assert_eq!(d.name, "sample");
    assert_eq!(d.parts.len(), 2);
    assert_eq!(d.parts[0].height, 200.0);
    assert_eq!(d.parts[1].y, d.parts[0].bottom());
    assert_eq!(d.parts[1].color, "#884422");
    assert_eq!(d.parts[1].bottom_connector, ConnectorKind::Pin);
    assert!(!d.parts[1].has_3d);
    assert_eq!(d.parts[0].sym_vertices.len(), 3);
    assert_eq!(d.parts[1].special_forms.len(), 1);

    assert_eq!(d.shapes.len(), 2);
    let circle = &d.shapes[0];
    assert_eq!(circle.attachment.map(|a| a.part), Some(d.parts[1].id));
    assert!(d.shapes[1].attachment.is_none());
    assert_eq!(loaded.views().part_count(), 2);
    assert_eq!(loaded.views().shape_count(), 2);
}

#[test]
fn export_records_parent_index_and_fractions() {
    let file = sample_editor().export_file();
    let ShapeRecord::Circle(c) = &file.drawn_shapes[0] else {
        panic!("first shape should be the circle");
    };
    assert_eq!(c.parent_index, Some(1));
    assert!(approx(c.rel_cx.unwrap(), 0.5));
    let ShapeRecord::Line(l) = &file.drawn_shapes[1] else {
        panic!("second shape should be the line");
    };
    assert_eq!(l.parent_index, None);
    assert_eq!(l.rel_x1, None);
}

#[test]
fn import_restacks_overlapping_parts() {
    let json = r#"{
        "name": "loose",
        "parts": [
            {"x": 100, "y": 20, "width": 60, "height": 100},
            {"x": 100, "y": 500, "width": 60, "height": 80}
        ],
        "drawnShapes": [
            {"type": "line", "x1": 110, "y1": 510, "x2": 150, "y2": 510, "width": 2, "parentIndex": 1},
            {"type": "polygon"}
        ]
    }"#;
    let mut editor = Editor::default();
    editor.import_json(json).unwrap();

    let d = editor.diagram();
    assert!(layout::is_stacked(&d.parts));
    assert_eq!(d.parts[1].y, 120.0);
    assert_eq!(d.shapes.len(), 1);
    // Without stored fractions the saved absolute position wins.
    let ShapeGeometry::Line { a, .. } = d.shapes[0].geometry else {
        panic!("expected a line");
    };
    assert_eq!(a.y, 510.0);
    assert_eq!(d.shapes[0].attachment.map(|a| a.part), Some(d.parts[1].id));
}

#[test]
fn malformed_json_leaves_the_editor_untouched() {
    let mut editor = sample_editor();
    let before = editor.diagram().clone();
    let depth = editor.undo_depth();

    let err = editor.import_json("{ not json").unwrap_err();
    assert!(matches!(err, EditorError::Json(_)));
    assert_eq!(editor.diagram(), &before);
    assert_eq!(editor.undo_depth(), depth);
}

#[test]
fn import_can_be_undone() {
    let mut editor = sample_editor();
    editor.import_json(r#"{"parts": []}"#).unwrap();
    assert!(editor.diagram().parts.is_empty());
    assert!(editor.undo());
    assert_eq!(editor.diagram().parts.len(), 2);
}

#[test]
fn save_and_load_through_files() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("diagram.json");

    let editor = sample_editor();
    editor.save_json(&path).unwrap();

    let mut loaded = Editor::default();
    loaded.load_json(&path).unwrap();
    assert_eq!(
        serialize::export(loaded.diagram()).parts,
        editor.export_file().parts
    );

    let missing = temp_dir.path().join("missing.json");
    assert!(matches!(loaded.load_json(&missing), Err(EditorError::Io(_))));
}

#[test]
fn svg_export_contains_bodies_and_shapes() {
    let editor = sample_editor();
    let svg = editor.export_svg(false);

    assert!(svg.starts_with("<?xml"));
    assert!(svg.contains("<title>sample</title>"));
    assert_eq!(svg.matches("<polygon").count(), 2);
    assert!(svg.contains("<circle"));
    assert!(svg.contains("<line"));
    // only the shaded top body gets a gradient
    assert_eq!(svg.matches("<linearGradient").count(), 1);
    assert!(!svg.contains(r#"class="axes""#));

    let with_rulers = editor.export_svg(true);
    assert!(with_rulers.contains(r#"class="axes""#));
    assert!(with_rulers.contains(">cm<"));
}

#[test]
fn svg_is_written_to_disk() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("out.svg");
    sample_editor().save_svg(&path, true).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.trim_end().ends_with("</svg>"));
}

#[test]
fn settings_round_trip_as_toml_and_json() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let custom = AppSettings {
        file_path: "body.json".to_string(),
        stroke_width: 3.0,
        show_rulers: false,
        default_width_unit: LengthUnit::Centimeter,
        ..AppSettings::default()
    };

    for name in ["settings.toml", "settings.json"] {
        let path = temp_dir.path().join(name);
        settings::save_settings(&path, &custom).unwrap();
        assert_eq!(settings::load_settings(&path).unwrap(), custom, "{name}");
    }

    let text = std::fs::read_to_string(temp_dir.path().join("settings.toml")).unwrap();
    assert!(text.contains(r#"default_width_unit = "cm""#));
}

#[test]
fn partial_settings_fill_in_defaults() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("settings.toml");
    std::fs::write(&path, "stroke_width = 5.0\ndefault_height_unit = \"inch\"\n").unwrap();

    let loaded = settings::load_settings(&path).unwrap();
    assert_eq!(loaded.stroke_width, 5.0);
    assert_eq!(loaded.default_height_unit, LengthUnit::Inch);
    assert_eq!(loaded.template_path, AppSettings::default().template_path);
}

#[test]
fn broken_settings_are_an_error() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("settings.toml");
    std::fs::write(&path, "stroke_width = [").unwrap();
    assert!(settings::load_settings(&path).is_err());
}
