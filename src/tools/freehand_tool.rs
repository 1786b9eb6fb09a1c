use crate::element::{PathPoint, StrokeStyle, factory};
use crate::geometry::smoothing;
use crate::scene::Scene;
use crate::tools::{PointerEvent, Tool, ToolPreview};

/// Freehand stroke gesture: raw points accumulate while the pointer is
/// down and a smoothed path element is committed on release.
pub struct FreehandTool {
    pub style: StrokeStyle,
    /// Smoothing factor in `[0, 1]` handed to the spline pass.
    pub smoothing: f32,
    state: FreehandState,
}

enum FreehandState {
    Idle,
    Drawing { points: Vec<PathPoint> },
}

impl FreehandTool {
    pub fn new() -> Self {
        Self {
            style: StrokeStyle::default(),
            smoothing: 0.5,
            state: FreehandState::Idle,
        }
    }
}

impl Default for FreehandTool {
    fn default() -> Self {
        Self::new()
    }
}

impl Tool for FreehandTool {
    fn name(&self) -> &'static str {
        "Freehand"
    }

    fn on_pointer_down(&mut self, event: &PointerEvent, _scene: &mut Scene) {
        self.state = FreehandState::Drawing {
            points: vec![PathPoint { pos: event.pos, pressure: event.pressure }],
        };
    }

    fn on_pointer_move(&mut self, event: &PointerEvent, _scene: &mut Scene) {
        if let FreehandState::Drawing { points } = &mut self.state {
            points.push(PathPoint { pos: event.pos, pressure: event.pressure });
        }
    }

    fn on_pointer_up(&mut self, _event: &PointerEvent, scene: &mut Scene) {
        let state = std::mem::replace(&mut self.state, FreehandState::Idle);
        let FreehandState::Drawing { points } = state else {
            return;
        };
        // A tap without movement is not a stroke; discard it quietly.
        if points.len() < 2 {
            return;
        }

        let smoothed = smoothing::smooth(&points, self.smoothing);
        scene.add_element(factory::path(smoothed, self.style.clone()));
    }

    fn deactivate(&mut self, _scene: &mut Scene) {
        self.state = FreehandState::Idle;
    }

    fn preview(&self) -> ToolPreview<'_> {
        match &self.state {
            FreehandState::Drawing { points } => {
                ToolPreview::Stroke { points, style: &self.style }
            }
            FreehandState::Idle => ToolPreview::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementKind;
    use egui::pos2;

    fn drive(tool: &mut FreehandTool, scene: &mut Scene, points: &[(f32, f32)]) {
        let mut events = points.iter().map(|(x, y)| PointerEvent::new(pos2(*x, *y)));
        let first = events.next().unwrap();
        tool.on_pointer_down(&first, scene);
        let mut last = first;
        for event in events {
            tool.on_pointer_move(&event, scene);
            last = event;
        }
        tool.on_pointer_up(&last, scene);
    }

    #[test]
    fn stroke_commits_with_endpoints_preserved() {
        let mut scene = Scene::new();
        let mut tool = FreehandTool::new();
        drive(&mut tool, &mut scene, &[(0.0, 0.0), (10.0, 0.0), (20.0, 0.0)]);

        assert_eq!(scene.elements().len(), 1);
        match &scene.elements()[0].kind {
            ElementKind::Path(path) => {
                assert_eq!(path.points.first().unwrap().pos, pos2(0.0, 0.0));
                assert_eq!(path.points.last().unwrap().pos, pos2(20.0, 0.0));
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn tap_is_discarded() {
        let mut scene = Scene::new();
        let mut tool = FreehandTool::new();
        let event = PointerEvent::new(pos2(5.0, 5.0));
        tool.on_pointer_down(&event, &mut scene);
        tool.on_pointer_up(&event, &mut scene);

        assert!(scene.is_empty());
    }
}
