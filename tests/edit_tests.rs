//! Inline editing: cell and header editors, value parsing, validators,
//! paste and undo.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::*;
use scigrid::editor::{EditTarget, EditorKind, EditorRect};
use scigrid::interaction::PointerInput;
use scigrid::{CellValue, ColumnHeader, ColumnType, GridConfig, GridCore, SelectionMode, VecProvider};

fn double_click(core: &mut GridCore, (x, y): (f64, f64)) {
    core.pointer_down(PointerInput::at(x, y).double_click());
}

fn anchor_at(core: &mut GridCore, row: u32, col: u32) {
    core.update_selection(SelectionMode::Cell, Some(row), Some(col), false, false);
}

// ============================================================================
// Cell editor
// ============================================================================

#[test]
fn test_double_click_opens_text_editor_over_cell() {
    let (mut core, _) = grid_with(samples(), GridConfig::default());
    double_click(&mut core, cell_point(1, 0));
    let editor = core.editor().unwrap();
    assert_eq!(editor.target, EditTarget::Cell { row: 1, col: 0 });
    assert_eq!(editor.kind, EditorKind::Text);
    assert_eq!(editor.initial_value, "alpha");
    assert_eq!(
        editor.rect,
        EditorRect {
            x: BAND,
            y: HEADER + ROW,
            width: COL,
            height: ROW,
        }
    );
}

#[test]
fn test_commit_writes_and_records_history() {
    let (mut core, recorder) = grid_with(samples(), GridConfig::default());
    double_click(&mut core, cell_point(1, 0));
    assert!(core.commit_editor("delta"));
    assert!(core.editor().is_none());
    assert_eq!(core.cell_value(1, 0), CellValue::from("delta"));

    {
        let log = recorder.log.borrow();
        assert_eq!(log.edits.len(), 1);
        assert_eq!(log.edits[0].old_value, CellValue::from("alpha"));
        assert_eq!(log.edits[0].new_value, CellValue::from("delta"));
    }

    assert!(core.undo());
    assert_eq!(core.cell_value(1, 0), CellValue::from("alpha"));
    assert!(core.redo());
    assert_eq!(core.cell_value(1, 0), CellValue::from("delta"));
    assert!(!core.redo());
}

#[test]
fn test_numeric_column_parses_prefixes() {
    let (mut core, _) = grid_with(samples(), GridConfig::default());
    double_click(&mut core, cell_point(0, 1));
    assert_eq!(core.editor().unwrap().initial_value, "2.5");
    assert!(core.commit_editor("1.5k"));
    assert_eq!(core.cell_value(0, 1), CellValue::Number(1500.0));

    double_click(&mut core, cell_point(0, 1));
    assert!(core.commit_editor("n/a"));
    assert_eq!(core.cell_value(0, 1), CellValue::from("n/a"));
}

#[test]
fn test_cancel_discards_text() {
    let (mut core, recorder) = grid_with(samples(), GridConfig::default());
    double_click(&mut core, cell_point(0, 0));
    core.cancel_editor();
    assert!(core.editor().is_none());
    assert!(!core.commit_editor("ignored"));
    assert_eq!(core.cell_value(0, 0), CellValue::from("beta"));
    assert!(recorder.log.borrow().edits.is_empty());
}

#[test]
fn test_scroll_closes_editor() {
    let (mut core, _) = grid_with(
        VecProvider::from_fn(100, 3, |r, c| format!("{r}-{c}")),
        GridConfig::default(),
    );
    double_click(&mut core, cell_point(2, 0));
    assert!(core.editor().is_some());
    assert!(core.on_scroll(0.0, 200.0));
    assert!(core.editor().is_none());
}

#[test]
fn test_validator_rejects_value() {
    let (mut core, recorder) = grid_with(samples(), GridConfig::default());
    recorder
        .knobs
        .borrow_mut()
        .reject
        .insert(1, "mass must be positive".into());

    double_click(&mut core, cell_point(0, 1));
    assert!(!core.commit_editor("-3"));
    assert!(core.editor().is_none());
    assert_eq!(core.cell_value(0, 1), CellValue::Number(2.5));

    let log = recorder.log.borrow();
    assert_eq!(log.rejections, vec![(1, CellValue::Number(-3.0))]);
    assert!(log.edits.is_empty());
    drop(log);
    assert!(!core.history().can_undo());
}

#[test]
fn test_select_column_uses_option_editor() {
    let mut provider = samples();
    {
        let header = &mut provider.headers_mut()[0];
        header.column_type = ColumnType::Select;
        header.select_options = vec!["alpha".into(), "beta".into(), "gamma".into()];
    }
    let (mut core, _) = grid_with(provider, GridConfig::default());
    double_click(&mut core, cell_point(2, 0));
    assert_eq!(
        core.editor().unwrap().kind,
        EditorKind::Select(vec!["alpha".into(), "beta".into(), "gamma".into()])
    );
    assert!(core.commit_editor("beta"));
    assert_eq!(core.cell_value(2, 0), CellValue::from("beta"));
}

#[test]
fn test_read_only_sources_never_edit() {
    let (mut core, _) = grid_with(samples().read_only(), GridConfig::default());
    double_click(&mut core, cell_point(0, 0));
    assert!(core.editor().is_none());
    assert!(!core.edit_cell(0, 0, CellValue::from("x")));
    anchor_at(&mut core, 0, 0);
    assert_eq!(core.paste_text("x\ty"), 0);

    let mut provider = samples();
    provider.headers_mut()[0].is_editable = Some(false);
    let (mut core, _) = grid_with(provider, GridConfig::default());
    double_click(&mut core, cell_point(0, 0));
    assert!(core.editor().is_none());
    double_click(&mut core, cell_point(0, 1));
    assert!(core.editor().is_some());
}

// ============================================================================
// Header editor
// ============================================================================

fn three_line_headers() -> (GridCore, Recorder) {
    let config = GridConfig {
        header_sub_text_count: 2,
        ..GridConfig::default()
    };
    grid_with(samples(), config)
}

#[test]
fn test_header_bands_pick_the_edited_line() {
    let (mut core, _) = three_line_headers();
    assert_eq!(core.state().header_height, 70.0);
    let (x, _) = header_point(1);

    double_click(&mut core, (x, 10.0));
    assert_eq!(core.editor().unwrap().target, EditTarget::Header { col: 1, sub: 0 });
    assert_eq!(core.editor().unwrap().initial_value, "mass");

    double_click(&mut core, (x, 45.0));
    let editor = core.editor().unwrap();
    assert_eq!(editor.target, EditTarget::Header { col: 1, sub: 1 });
    assert_eq!(editor.initial_value, "g");
    assert_eq!((editor.rect.y, editor.rect.height), (35.0, 17.5));

    double_click(&mut core, (x, 60.0));
    assert_eq!(core.editor().unwrap().target, EditTarget::Header { col: 1, sub: 2 });
    assert_eq!(core.editor().unwrap().initial_value, "");
}

#[test]
fn test_header_commit_updates_provider() {
    let (mut core, _) = three_line_headers();
    let (x, _) = header_point(1);
    double_click(&mut core, (x, 45.0));
    assert!(core.commit_editor("kg"));
    assert_eq!(core.header(1).units.as_deref(), Some("kg"));

    double_click(&mut core, (x, 60.0));
    assert!(core.commit_editor("sample mass"));
    assert_eq!(core.header(1).description.as_deref(), Some("sample mass"));
    assert_eq!(core.header(1).name, "mass");
}

// ============================================================================
// Paste
// ============================================================================

#[test]
fn test_paste_block_at_anchor_is_one_undo_step() {
    let (mut core, recorder) = grid_with(samples(), GridConfig::default());
    anchor_at(&mut core, 0, 0);
    assert_eq!(core.paste_text("x\t1.5k\ny\t2\n"), 4);
    assert_eq!(core.cell_value(0, 0), CellValue::from("x"));
    assert_eq!(core.cell_value(0, 1), CellValue::Number(1500.0));
    assert_eq!(core.cell_value(1, 1), CellValue::Number(2.0));
    assert_eq!(recorder.log.borrow().edits.len(), 4);
    assert_eq!(core.history().len(), 1);

    assert!(core.undo());
    assert_eq!(core.cell_value(0, 0), CellValue::from("beta"));
    assert_eq!(core.cell_value(1, 1), CellValue::Number(10.0));
}

#[test]
fn test_paste_is_clipped_to_the_grid() {
    let (mut core, _) = grid_with(samples(), GridConfig::default());
    anchor_at(&mut core, 2, 1);
    // Only row 2, columns mass and ok exist.
    assert_eq!(core.paste_text("1\t0\t9\n2\n3"), 2);
    assert_eq!(core.cell_value(2, 1), CellValue::Number(1.0));
    assert_eq!(core.cell_value(2, 2), CellValue::from("0"));
}

#[test]
fn test_paste_skips_rejected_cells() {
    let (mut core, recorder) = grid_with(samples(), GridConfig::default());
    recorder.knobs.borrow_mut().reject.insert(1, "locked".into());
    anchor_at(&mut core, 0, 0);
    assert_eq!(core.paste_text("x\t5\ny\t6"), 2);
    assert_eq!(core.cell_value(0, 1), CellValue::Number(2.5));
    assert_eq!(core.cell_value(1, 0), CellValue::from("y"));
}

#[test]
fn test_custom_header_provider_round_trip() {
    let provider = VecProvider::new(
        vec![ColumnHeader::new("t").with_units("s")],
        vec![vec![1.0.into()]],
    );
    let mut core = sized(GridCore::new(Box::new(provider), GridConfig::default()));
    assert!(core.open_header_editor(0, 0));
    assert!(core.commit_editor("time"));
    assert_eq!(core.header(0).name, "time");
    assert_eq!(core.header(0).units.as_deref(), Some("s"));
}
