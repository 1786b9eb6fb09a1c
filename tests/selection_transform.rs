use eframe_board::Editor;
use eframe_board::element::{ElementId, ElementKind, FlipAxis};
use eframe_board::sync::{RecordingSync, SyncEvent};
use eframe_board::tools::{FreehandTool, SelectionTool, ToolType};
use egui::{Modifiers, Pos2, pos2};

fn at(editor: &Editor, x: f32, y: f32) -> Pos2 {
    editor.scene_to_screen(pos2(x, y))
}

fn drag(editor: &mut Editor, path: &[(f32, f32)]) {
    let first = at(editor, path[0].0, path[0].1);
    editor.pointer_down(first, None, Modifiers::NONE);
    for (x, y) in &path[1..] {
        let screen = at(editor, *x, *y);
        editor.pointer_move(screen, None, Modifiers::NONE);
    }
    let (x, y) = path[path.len() - 1];
    editor.pointer_up(at(editor, x, y), None, Modifiers::NONE);
}

/// Commits a two-point stroke (left untouched by smoothing) and returns
/// its id.
fn stroke(editor: &mut Editor, from: (f32, f32), to: (f32, f32)) -> ElementId {
    editor.set_tool(ToolType::Freehand(FreehandTool::new()));
    drag(editor, &[from, to]);
    let id = editor.snapshot().last().unwrap().id();
    editor.set_tool(ToolType::Select(SelectionTool::new()));
    id
}

fn path_points(editor: &Editor, id: ElementId) -> Vec<Pos2> {
    match &editor.scene().find_element(id).unwrap().kind {
        ElementKind::Path(path) => path.positions().collect(),
        _ => unreachable!(),
    }
}

#[test]
fn drag_applies_total_delta_and_undoes() {
    let mut editor = Editor::new();
    let id = stroke(&mut editor, (0.0, 0.0), (40.0, 0.0));

    drag(&mut editor, &[(20.0, 0.0), (300.0, 300.0), (30.0, 10.0)]);
    assert_eq!(path_points(&editor, id), vec![pos2(10.0, 10.0), pos2(50.0, 10.0)]);

    editor.undo();
    assert_eq!(path_points(&editor, id), vec![pos2(0.0, 0.0), pos2(40.0, 0.0)]);
}

#[test]
fn drag_released_at_start_leaves_no_history_entry() {
    let mut editor = Editor::new();
    let _id = stroke(&mut editor, (0.0, 0.0), (40.0, 0.0));
    let before = editor.snapshot();

    drag(&mut editor, &[(20.0, 0.0), (200.0, 200.0), (20.0, 0.0)]);
    assert_eq!(editor.snapshot(), before);

    // Only the stroke creation is undoable.
    editor.undo();
    assert!(editor.scene().is_empty());
    assert!(!editor.can_undo());
}

#[test]
fn flip_horizontal_mirrors_selection_about_shared_center() {
    let mut editor = Editor::new();
    let a = stroke(&mut editor, (0.0, 0.0), (10.0, 0.0));
    let b = stroke(&mut editor, (90.0, 20.0), (100.0, 20.0));
    let untouched = stroke(&mut editor, (0.0, 200.0), (10.0, 200.0));
    let untouched_before = path_points(&editor, untouched);

    editor.set_selection(vec![a, b]);
    editor.flip_selection(FlipAxis::Horizontal);

    // Shared bounds x-range 0..100, center x = 50.
    assert_eq!(path_points(&editor, a), vec![pos2(100.0, 0.0), pos2(90.0, 0.0)]);
    assert_eq!(path_points(&editor, b), vec![pos2(10.0, 20.0), pos2(0.0, 20.0)]);
    assert_eq!(path_points(&editor, untouched), untouched_before);
}

#[test]
fn marquee_selects_contained_elements_only() {
    let mut editor = Editor::new();
    let near = stroke(&mut editor, (10.0, 10.0), (20.0, 20.0));
    let far = stroke(&mut editor, (400.0, 400.0), (420.0, 420.0));

    drag(&mut editor, &[(-50.0, -50.0), (60.0, 60.0)]);
    assert!(editor.scene().is_selected(near));
    assert!(!editor.scene().is_selected(far));
}

#[test]
fn resize_from_corner_is_anchored_and_clamped() {
    let mut editor = Editor::new();
    let id = stroke(&mut editor, (0.0, 0.0), (100.0, 50.0));
    editor.set_selection(vec![id]);

    // Pull the bottom-right handle far past the opposite anchor: the
    // factor clamps at 0.1 instead of mirroring or collapsing.
    drag(&mut editor, &[(100.0, 50.0), (-1000.0, -1000.0)]);
    assert_eq!(path_points(&editor, id), vec![pos2(0.0, 0.0), pos2(10.0, 5.0)]);

    // And a plain outward pull scales relative to the original bounds.
    editor.undo();
    editor.set_selection(vec![id]);
    drag(&mut editor, &[(100.0, 50.0), (200.0, 100.0)]);
    assert_eq!(path_points(&editor, id), vec![pos2(0.0, 0.0), pos2(200.0, 100.0)]);
}

#[test]
fn group_then_ungroup_restores_originals_exactly() {
    let mut editor = Editor::new();
    let a = stroke(&mut editor, (0.0, 0.0), (10.0, 0.0));
    let b = stroke(&mut editor, (20.0, 0.0), (30.0, 0.0));
    let c = stroke(&mut editor, (40.0, 0.0), (50.0, 0.0));
    let before_geometry: Vec<Vec<Pos2>> =
        [a, b, c].iter().map(|id| path_points(&editor, *id)).collect();

    editor.set_selection(vec![a, b, c]);
    editor.group_selection();

    assert_eq!(editor.snapshot().len(), 4);
    let group_id = editor.scene().selected_ids()[0];
    assert!(editor.scene().find_element(group_id).unwrap().is_group());

    editor.ungroup_selection();
    assert!(!editor.scene().contains(group_id));
    assert_eq!(editor.snapshot().len(), 3);
    for (id, points) in [a, b, c].iter().zip(&before_geometry) {
        assert_eq!(&path_points(&editor, *id), points);
    }
    for id in [a, b, c] {
        assert!(editor.scene().is_selected(id));
    }
}

#[test]
fn grouped_elements_move_as_one() {
    let mut editor = Editor::new();
    let a = stroke(&mut editor, (0.0, 0.0), (10.0, 0.0));
    let b = stroke(&mut editor, (0.0, 40.0), (10.0, 40.0));
    editor.set_selection(vec![a, b]);
    editor.group_selection();
    // Drop the selection so its handles cannot swallow the click below.
    editor.clear_selection();

    // Click on child `a`: the hit promotes to the group, dragging both.
    drag(&mut editor, &[(5.0, 0.0), (5.0, 100.0)]);
    assert_eq!(path_points(&editor, a), vec![pos2(0.0, 100.0), pos2(10.0, 100.0)]);
    assert_eq!(path_points(&editor, b), vec![pos2(0.0, 140.0), pos2(10.0, 140.0)]);
}

#[test]
fn duplicate_skips_locked_and_selects_copies() {
    let mut editor = Editor::new();
    let a = stroke(&mut editor, (0.0, 0.0), (10.0, 0.0));
    let b = stroke(&mut editor, (20.0, 0.0), (30.0, 0.0));
    editor.set_selection(vec![a, b]);

    // Lock one of them.
    let mut snapshot = editor.snapshot();
    for element in &mut snapshot {
        if element.id() == b {
            element.locked = true;
        }
    }
    editor.apply_remote_snapshot(snapshot);
    editor.set_selection(vec![a, b]);

    editor.duplicate_selection();
    assert_eq!(editor.snapshot().len(), 3); // only `a` was copied

    let copies = editor.scene().selected_ids().to_vec();
    assert_eq!(copies.len(), 1);
    assert_ne!(copies[0], a);
    assert_eq!(path_points(&editor, copies[0]), vec![pos2(12.0, 12.0), pos2(22.0, 12.0)]);
}

#[test]
fn delete_selection_respects_locks() {
    let mut editor = Editor::new();
    let a = stroke(&mut editor, (0.0, 0.0), (10.0, 0.0));
    let b = stroke(&mut editor, (20.0, 0.0), (30.0, 0.0));

    let mut snapshot = editor.snapshot();
    for element in &mut snapshot {
        if element.id() == b {
            element.locked = true;
        }
    }
    editor.apply_remote_snapshot(snapshot);

    editor.set_selection(vec![a, b]);
    editor.delete_selection();

    assert!(!editor.scene().contains(a));
    assert!(editor.scene().contains(b));
}

#[test]
fn moves_surface_as_sync_updates() {
    let sync = RecordingSync::default();
    let mut editor = Editor::with_sync(Box::new(sync.clone()));
    let id = stroke(&mut editor, (0.0, 0.0), (40.0, 0.0));

    sync.clear();
    drag(&mut editor, &[(20.0, 0.0), (30.0, 10.0)]);
    assert_eq!(sync.events(), vec![SyncEvent::Updated(id)]);
}
