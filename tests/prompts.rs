//! Parameter prompts: answers are parsed up front and a bad answer leaves the
//! diagram untouched.

use bodystack::model::{PartId, Side};
use bodystack::prompt::{PresetAnswers, ValueKind};
use bodystack::units::{LengthUnit, UNITS_PER_CM, UNITS_PER_INCH};
use bodystack::{Editor, EditorError};

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

fn editor_with_body() -> (Editor, PartId) {
    let mut editor = Editor::default();
    let id = editor.add_part();
    (editor, id)
}

#[test]
fn part_size_accepts_mixed_units() {
    let (mut editor, id) = editor_with_body();
    let mut answers = PresetAnswers::new([Some("2in"), Some("10cm")]);
    assert!(editor.prompt_part_size(id, &mut answers).unwrap());

    let part = editor.diagram().part(id).unwrap();
    assert!(approx(part.width, 2.0 * UNITS_PER_INCH));
    assert!(approx(part.height, 10.0 * UNITS_PER_CM));
    assert_eq!(answers.remaining(), 0);
}

#[test]
fn unsuffixed_answers_use_the_default_units() {
    let (mut editor, id) = editor_with_body();
    let mut answers = PresetAnswers::new([Some("1 1/2"), Some("5")]);
    editor.prompt_part_size(id, &mut answers).unwrap();

    let part = editor.diagram().part(id).unwrap();
    assert!(approx(part.width, 1.5 * UNITS_PER_INCH));
    assert!(approx(part.height, 5.0 * UNITS_PER_CM));

    editor.set_default_units(LengthUnit::Centimeter, LengthUnit::Inch);
    let mut answers = PresetAnswers::new([Some("4"), Some("2")]);
    editor.prompt_part_size(id, &mut answers).unwrap();
    let part = editor.diagram().part(id).unwrap();
    assert!(approx(part.width, 4.0 * UNITS_PER_CM));
    assert!(approx(part.height, 2.0 * UNITS_PER_INCH));
}

#[test]
fn bad_height_aborts_before_width_is_applied() {
    let (mut editor, id) = editor_with_body();
    let before = editor.diagram().clone();
    let depth = editor.undo_depth();

    let mut answers = PresetAnswers::new([Some("2in"), Some("tall")]);
    let err = editor.prompt_part_size(id, &mut answers).unwrap_err();
    assert!(matches!(err, EditorError::InvalidDimension { ref input } if input == "tall"));
    assert_eq!(editor.diagram(), &before);
    assert_eq!(editor.undo_depth(), depth);
}

#[test]
fn empty_and_cancelled_answers_keep_values() {
    let (mut editor, id) = editor_with_body();
    let mut answers = PresetAnswers::new([Some("   "), Some("6cm")]);
    assert!(editor.prompt_part_size(id, &mut answers).unwrap());
    let part = editor.diagram().part(id).unwrap();
    assert_eq!(part.width, 60.0);
    assert!(approx(part.height, 6.0 * UNITS_PER_CM));

    let mut answers = PresetAnswers::new([None::<String>, None]);
    assert!(!editor.prompt_part_size(id, &mut answers).unwrap());
}

#[test]
fn current_size_is_offered_as_default() {
    let (mut editor, id) = editor_with_body();
    editor.set_part_width(id, 2.0 * UNITS_PER_INCH).unwrap();
    editor.set_part_height(id, 10.0 * UNITS_PER_CM).unwrap();

    let mut answers = PresetAnswers::default();
    editor.prompt_part_size(id, &mut answers).unwrap();
    assert_eq!(
        answers.asked(),
        &[
            (ValueKind::PartWidth, "2in".to_string()),
            (ValueKind::PartHeight, "10cm".to_string()),
        ]
    );
}

#[test]
fn vertex_width_sets_total_outline_width() {
    let (mut editor, id) = editor_with_body();
    let index = editor.add_vertex(id, 60.0).unwrap();

    let mut answers = PresetAnswers::new([Some("1in")]);
    assert!(editor.prompt_vertex_width(id, index, &mut answers).unwrap());
    let v = editor.diagram().part(id).unwrap().sym_vertices[index];
    assert!(approx(v.dx, (96.0 - 60.0) / 2.0));

    let mut answers = PresetAnswers::new([Some("1in")]);
    assert!(matches!(
        editor.prompt_vertex_width(id, 42, &mut answers),
        Err(EditorError::UnknownVertex { index: 42, .. })
    ));
}

#[test]
fn special_form_needs_both_dimensions() {
    let (mut editor, id) = editor_with_body();

    let mut answers = PresetAnswers::new([Some("1cm"), None]);
    assert_eq!(
        editor
            .prompt_add_special_form(id, Side::Right, true, &mut answers)
            .unwrap(),
        None
    );
    assert!(editor.diagram().part(id).unwrap().special_forms.is_empty());

    let mut answers = PresetAnswers::new([Some("1cm"), Some("2cm")]);
    let index = editor
        .prompt_add_special_form(id, Side::Right, true, &mut answers)
        .unwrap()
        .unwrap();
    let part = editor.diagram().part(id).unwrap();
    let form = &part.special_forms[index];
    assert_eq!(form.x, part.x + part.width);
    assert!(approx(form.width, UNITS_PER_CM));
    assert!(approx(form.height, 2.0 * UNITS_PER_CM));

    let view = editor.views().part(id).unwrap();
    let mirror = view.special_forms[index].mirror.unwrap();
    assert!(approx(mirror.right(), part.x));
}

#[test]
fn negative_special_form_size_is_clamped() {
    let (mut editor, id) = editor_with_body();
    let mut answers = PresetAnswers::new([Some("-2cm"), Some("3cm")]);
    let index = editor
        .prompt_add_special_form(id, Side::Right, false, &mut answers)
        .unwrap()
        .unwrap();
    let form = &editor.diagram().part(id).unwrap().special_forms[index];
    assert_eq!(form.width, 0.0);
    assert!(approx(form.height, 3.0 * UNITS_PER_CM));

    let index = editor.add_special_form(id, Side::Left, 10.0, -5.0, false).unwrap();
    let part = editor.diagram().part(id).unwrap();
    assert_eq!(part.special_forms[index].height, 0.0);
    assert_eq!(part.special_forms[index].x, part.x - 10.0);
}

#[test]
fn special_form_resize_and_rounding() {
    let (mut editor, id) = editor_with_body();
    let index = editor.add_special_form(id, Side::Left, 20.0, 40.0, false).unwrap();

    let mut answers = PresetAnswers::new([None, Some("2cm")]);
    assert!(editor
        .prompt_resize_special_form(id, index, &mut answers)
        .unwrap());
    let form = &editor.diagram().part(id).unwrap().special_forms[index];
    assert_eq!(form.width, 20.0);
    assert!(approx(form.height, 2.0 * UNITS_PER_CM));

    let mut answers = PresetAnswers::new([Some("6")]);
    assert!(editor
        .prompt_round_special_form(id, index, &mut answers)
        .unwrap());
    assert_eq!(editor.diagram().part(id).unwrap().special_forms[index].rx, 6.0);

    let mut answers = PresetAnswers::new([Some("round")]);
    assert!(editor
        .prompt_round_special_form(id, index, &mut answers)
        .is_err());
    assert_eq!(editor.diagram().part(id).unwrap().special_forms[index].rx, 6.0);
}

#[test]
fn stroke_width_prompt_validates() {
    let mut editor = Editor::default();
    let mut answers = PresetAnswers::new([Some("3.5")]);
    assert!(editor.prompt_stroke_width(&mut answers).unwrap());
    assert_eq!(editor.stroke_width(), 3.5);
    assert_eq!(answers.asked()[0], (ValueKind::StrokeWidth, "2".to_string()));

    let mut answers = PresetAnswers::new([Some("-1")]);
    assert!(matches!(
        editor.prompt_stroke_width(&mut answers),
        Err(EditorError::InvalidStrokeWidth(_))
    ));
    let mut answers = PresetAnswers::new([Some("thick")]);
    assert!(editor.prompt_stroke_width(&mut answers).is_err());
    assert_eq!(editor.stroke_width(), 3.5);
}

#[test]
fn colour_prompt_normalises_hex() {
    let (mut editor, id) = editor_with_body();
    let mut answers = PresetAnswers::new([Some("#0A0")]);
    assert!(editor.prompt_part_color(id, &mut answers).unwrap());
    assert_eq!(editor.diagram().part(id).unwrap().color, "#00aa00");
    assert_eq!(answers.asked()[0].1, "#cccccc");

    let mut answers = PresetAnswers::new([Some("green")]);
    assert!(matches!(
        editor.prompt_part_color(id, &mut answers),
        Err(EditorError::InvalidColor(_))
    ));
}
