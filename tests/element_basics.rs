use eframe_board::element::{ElementKind, PathPoint, StrokeStyle, factory};
use eframe_board::persistence;
use egui::{Color32, pos2, vec2};

fn test_stroke() -> eframe_board::Element {
    let points = vec![
        PathPoint::new(pos2(10.0, 10.0)),
        PathPoint::with_pressure(pos2(20.0, 20.0), 0.8),
    ];
    factory::path(points, StrokeStyle::default())
}

#[test]
fn elements_carry_fresh_unique_ids() {
    let a = test_stroke();
    let b = test_stroke();
    assert_ne!(a.id(), b.id());

    let copy = a.duplicate();
    assert_ne!(copy.id(), a.id());
    assert_eq!(copy.kind, a.kind);
}

#[test]
fn element_kinds_report_their_names() {
    assert_eq!(test_stroke().kind_name(), "path");
    assert_eq!(
        factory::text(pos2(0.0, 0.0), "hi", 16.0, Color32::BLACK).kind_name(),
        "text"
    );
    assert_eq!(factory::image(pos2(0.0, 0.0), vec![0u8; 4]).kind_name(), "image");
    assert_eq!(factory::group(Vec::new()).kind_name(), "group");
}

#[test]
fn default_flags_allow_everything() {
    let element = test_stroke();
    assert!(!element.locked);
    assert!(!element.lock_movement_x);
    assert!(!element.lock_movement_y);
    assert!(element.selectable);
    assert!(element.evented);
}

#[test]
fn translate_preserves_pressure() {
    let mut element = test_stroke();
    element.translate(vec2(5.0, 5.0));
    match &element.kind {
        ElementKind::Path(path) => {
            assert_eq!(path.points[1].pos, pos2(25.0, 25.0));
            assert_eq!(path.points[1].pressure, Some(0.8));
        }
        _ => unreachable!(),
    }
}

#[test]
fn text_bounds_union_multiple_lines() {
    let element = factory::text(pos2(0.0, 0.0), "short\nmuch longer line", 10.0, Color32::BLACK);
    let bounds = element.own_bounds().unwrap();
    // Two lines tall, sized by the longer line.
    assert!(bounds.height() >= 2.0 * 10.0);
    assert!(bounds.width() > 10.0 * 0.6 * 5.0);
}

#[test]
fn scene_json_round_trip_preserves_order_and_content() {
    let elements = vec![
        test_stroke(),
        factory::text(pos2(5.0, 5.0), "note", 14.0, Color32::RED),
        factory::image(pos2(50.0, 50.0), vec![1, 2, 3, 4]),
    ];
    let json = persistence::scene_to_json(&elements).unwrap();
    let restored = persistence::scene_from_json(&json).unwrap();
    assert_eq!(restored, elements);
    // Array order is z-order and must survive verbatim.
    let ids: Vec<_> = restored.iter().map(|e| e.id()).collect();
    let expected: Vec<_> = elements.iter().map(|e| e.id()).collect();
    assert_eq!(ids, expected);
}
