use egui::Pos2;

use crate::element::{StrokeStyle, factory};
use crate::geometry::shapes::{ShapeSettings, generate_shape_path};
use crate::scene::Scene;
use crate::tools::{PointerEvent, Tool, ToolPreview};

/// Two-corner shape gesture: the anchor corner is fixed at pointer-down
/// and the outline is regenerated live while the pointer moves. Nothing
/// touches the committed scene until release.
pub struct ShapeTool {
    pub settings: ShapeSettings,
    pub style: StrokeStyle,
    state: ShapeState,
}

enum ShapeState {
    Idle,
    Dragging { start: Pos2, current: Pos2, constrain: bool },
}

impl ShapeTool {
    pub fn new() -> Self {
        Self {
            settings: ShapeSettings::default(),
            style: StrokeStyle::default(),
            state: ShapeState::Idle,
        }
    }
}

impl Default for ShapeTool {
    fn default() -> Self {
        Self::new()
    }
}

impl Tool for ShapeTool {
    fn name(&self) -> &'static str {
        "Shape"
    }

    fn on_pointer_down(&mut self, event: &PointerEvent, _scene: &mut Scene) {
        self.state = ShapeState::Dragging {
            start: event.pos,
            current: event.pos,
            constrain: event.modifiers.shift,
        };
    }

    fn on_pointer_move(&mut self, event: &PointerEvent, _scene: &mut Scene) {
        if let ShapeState::Dragging { current, constrain, .. } = &mut self.state {
            *current = event.pos;
            *constrain = event.modifiers.shift;
        }
    }

    fn on_pointer_up(&mut self, event: &PointerEvent, scene: &mut Scene) {
        let state = std::mem::replace(&mut self.state, ShapeState::Idle);
        let ShapeState::Dragging { start, .. } = state else {
            return;
        };
        // A zero-length drag describes no shape.
        if start == event.pos {
            return;
        }

        let constrain = event.modifiers.shift;
        let path = generate_shape_path(start, event.pos, &self.settings, constrain);
        scene.add_element(factory::shape(self.settings, path, self.style.clone()));
    }

    fn deactivate(&mut self, _scene: &mut Scene) {
        self.state = ShapeState::Idle;
    }

    fn preview(&self) -> ToolPreview<'_> {
        match &self.state {
            ShapeState::Dragging { start, current, constrain } => ToolPreview::Shape {
                path: generate_shape_path(*start, *current, &self.settings, *constrain),
                closed: self.settings.kind.is_closed(),
                style: &self.style,
            },
            ShapeState::Idle => ToolPreview::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementKind;
    use crate::geometry::shapes::ShapeKind;
    use egui::pos2;

    #[test]
    fn drag_commits_one_shape() {
        let mut scene = Scene::new();
        let mut tool = ShapeTool::new();

        tool.on_pointer_down(&PointerEvent::new(pos2(0.0, 0.0)), &mut scene);
        tool.on_pointer_move(&PointerEvent::new(pos2(50.0, 20.0)), &mut scene);
        assert!(scene.is_empty()); // preview only, nothing committed
        tool.on_pointer_up(&PointerEvent::new(pos2(100.0, 50.0)), &mut scene);

        assert_eq!(scene.elements().len(), 1);
        match &scene.elements()[0].kind {
            ElementKind::Shape(shape) => {
                assert_eq!(shape.settings.kind, ShapeKind::Rectangle);
                assert_eq!(shape.path.len(), 4);
                assert!(shape.closed);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn zero_length_drag_is_a_no_op() {
        let mut scene = Scene::new();
        let mut tool = ShapeTool::new();
        let event = PointerEvent::new(pos2(10.0, 10.0));
        tool.on_pointer_down(&event, &mut scene);
        tool.on_pointer_up(&event, &mut scene);
        assert!(scene.is_empty());
    }

    #[test]
    fn shift_constrains_at_commit() {
        let mut scene = Scene::new();
        let mut tool = ShapeTool::new();

        tool.on_pointer_down(&PointerEvent::new(pos2(0.0, 0.0)), &mut scene);
        let mut up = PointerEvent::new(pos2(100.0, 40.0));
        up.modifiers.shift = true;
        tool.on_pointer_up(&up, &mut scene);

        match &scene.elements()[0].kind {
            ElementKind::Shape(shape) => {
                assert_eq!(shape.path[2], pos2(100.0, 100.0)); // squared
            }
            _ => unreachable!(),
        }
    }
}
