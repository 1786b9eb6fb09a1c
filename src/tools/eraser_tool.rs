use egui::Pos2;

use crate::element::{Element, ElementId, ElementKind};
use crate::geometry::{self, distance, distance_to_segment};
use crate::scene::Scene;
use crate::tools::{PointerEvent, Tool};

/// How the eraser decides what to remove.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EraserMode {
    /// Collect the whole traveled path and remove everything it crossed
    /// at pointer-up.
    Stroke,
    /// Delete the topmost element under the pointer immediately, on
    /// pointer-down and while moving.
    Object,
}

pub struct EraserTool {
    pub radius: f32,
    pub mode: EraserMode,
    state: EraserState,
}

enum EraserState {
    Idle,
    Erasing { visited: Vec<Pos2> },
}

impl EraserTool {
    pub fn new() -> Self {
        Self {
            radius: 10.0,
            mode: EraserMode::Stroke,
            state: EraserState::Idle,
        }
    }

    /// Removes the topmost erasable element at `pos`, if any.
    fn erase_topmost_at(&self, pos: Pos2, scene: &mut Scene) {
        let target = scene
            .elements()
            .iter()
            .rev()
            .find(|element| {
                !element.is_group()
                    && !scene.is_effectively_locked(element.id())
                    && eraser_intersects(element, pos, self.radius)
            })
            .map(Element::id);
        if let Some(id) = target {
            scene.delete_element(id);
        }
    }
}

impl Default for EraserTool {
    fn default() -> Self {
        Self::new()
    }
}

impl Tool for EraserTool {
    fn name(&self) -> &'static str {
        "Eraser"
    }

    fn on_pointer_down(&mut self, event: &PointerEvent, scene: &mut Scene) {
        self.state = EraserState::Erasing { visited: vec![event.pos] };
        if self.mode == EraserMode::Object {
            self.erase_topmost_at(event.pos, scene);
        }
    }

    fn on_pointer_move(&mut self, event: &PointerEvent, scene: &mut Scene) {
        let EraserState::Erasing { visited } = &mut self.state else {
            return;
        };
        visited.push(event.pos);
        if self.mode == EraserMode::Object {
            self.erase_topmost_at(event.pos, scene);
        }
    }

    fn on_pointer_up(&mut self, _event: &PointerEvent, scene: &mut Scene) {
        let state = std::mem::replace(&mut self.state, EraserState::Idle);
        let EraserState::Erasing { visited } = state else {
            return;
        };
        if self.mode != EraserMode::Stroke {
            return;
        }

        // Every element crossed by any visited point of the gesture goes,
        // not just whatever sits under the release point.
        let doomed: Vec<ElementId> = scene
            .elements()
            .iter()
            .filter(|element| {
                !element.is_group()
                    && !scene.is_effectively_locked(element.id())
                    && visited.iter().any(|pos| eraser_intersects(element, *pos, self.radius))
            })
            .map(Element::id)
            .collect();
        for id in doomed {
            scene.delete_element(id);
        }
    }

    fn deactivate(&mut self, _scene: &mut Scene) {
        self.state = EraserState::Idle;
    }
}

/// Intersection test between the eraser disc and one element.
///
/// Path-carrying elements use point-to-path proximity with a tolerance of
/// their own stroke width plus the eraser radius; box elements (text,
/// image) use their bounding box expanded by the radius.
fn eraser_intersects(element: &Element, pos: Pos2, radius: f32) -> bool {
    match &element.kind {
        ElementKind::Path(path) => {
            let positions: Vec<Pos2> = path.positions().collect();
            polyline_within(&positions, pos, path.style.width + radius)
        }
        ElementKind::Shape(shape) => {
            polyline_within(&shape.path, pos, shape.style.width + radius)
        }
        ElementKind::Text(text) => text.bounds().expand(radius).contains(pos),
        ElementKind::Image(image) => image.bounds().expand(radius).contains(pos),
        ElementKind::Group(_) => false,
    }
}

fn polyline_within(points: &[Pos2], pos: Pos2, threshold: f32) -> bool {
    match points {
        [] => false,
        [only] => distance(pos, *only) <= threshold,
        _ => {
            let Some(bounds) = geometry::bounding_box(points) else {
                return false;
            };
            bounds.expand(threshold).contains(pos)
                && points
                    .windows(2)
                    .any(|pair| distance_to_segment(pos, pair[0], pair[1]) <= threshold)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{PathPoint, StrokeStyle, factory};
    use egui::pos2;

    fn stroke(points: &[(f32, f32)]) -> Element {
        factory::path(
            points.iter().map(|(x, y)| PathPoint::new(pos2(*x, *y))).collect(),
            StrokeStyle::default(),
        )
    }

    #[test]
    fn stroke_mode_erases_everything_along_the_path() {
        let mut scene = Scene::new();
        let near_start = scene.add_element(stroke(&[(0.0, 0.0), (10.0, 0.0)]));
        let near_end = scene.add_element(stroke(&[(200.0, 0.0), (210.0, 0.0)]));
        let far_away = scene.add_element(stroke(&[(0.0, 500.0), (10.0, 500.0)]));

        let mut tool = EraserTool::new();
        tool.on_pointer_down(&PointerEvent::new(pos2(5.0, 0.0)), &mut scene);
        tool.on_pointer_move(&PointerEvent::new(pos2(100.0, 0.0)), &mut scene);
        // Elements crossed mid-gesture still count at commit.
        assert_eq!(scene.elements().len(), 3);
        tool.on_pointer_up(&PointerEvent::new(pos2(205.0, 0.0)), &mut scene);

        assert!(!scene.contains(near_start));
        assert!(!scene.contains(near_end));
        assert!(scene.contains(far_away));
    }

    #[test]
    fn object_mode_deletes_immediately() {
        let mut scene = Scene::new();
        let id = scene.add_element(stroke(&[(0.0, 0.0), (10.0, 0.0)]));

        let mut tool = EraserTool::new();
        tool.mode = EraserMode::Object;
        tool.on_pointer_down(&PointerEvent::new(pos2(5.0, 0.0)), &mut scene);
        assert!(!scene.contains(id));
    }

    #[test]
    fn object_mode_takes_topmost_only() {
        let mut scene = Scene::new();
        let bottom = scene.add_element(stroke(&[(0.0, 0.0), (10.0, 0.0)]));
        let top = scene.add_element(stroke(&[(0.0, 1.0), (10.0, 1.0)]));

        let mut tool = EraserTool::new();
        tool.mode = EraserMode::Object;
        tool.on_pointer_down(&PointerEvent::new(pos2(5.0, 0.5)), &mut scene);

        assert!(!scene.contains(top));
        assert!(scene.contains(bottom));
    }

    #[test]
    fn locked_elements_survive() {
        let mut scene = Scene::new();
        let mut element = stroke(&[(0.0, 0.0), (10.0, 0.0)]);
        element.locked = true;
        let id = scene.add_element(element);

        let mut tool = EraserTool::new();
        let event = PointerEvent::new(pos2(5.0, 0.0));
        tool.on_pointer_down(&event, &mut scene);
        tool.on_pointer_up(&event, &mut scene);
        assert!(scene.contains(id));
    }

    #[test]
    fn erasing_empty_space_changes_nothing() {
        let mut scene = Scene::new();
        scene.add_element(stroke(&[(0.0, 0.0), (10.0, 0.0)]));
        let before = scene.snapshot();

        let mut tool = EraserTool::new();
        let event = PointerEvent::new(pos2(900.0, 900.0));
        tool.on_pointer_down(&event, &mut scene);
        tool.on_pointer_up(&event, &mut scene);

        assert_eq!(scene.snapshot(), before);
    }
}
