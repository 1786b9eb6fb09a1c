use egui::{Pos2, Rect};

use crate::element::{Element, ElementId};
use crate::geometry::hit_testing::{self, HandleRole};
use crate::scene::Scene;
use crate::tools::{PointerEvent, Tool, ToolPreview};

/// Per-axis resize factors are clamped to this range.
pub const MIN_SCALE: f32 = 0.1;
pub const MAX_SCALE: f32 = 20.0;

/// Selection tool: click-select, multi-select, drag-move, marquee,
/// handle-resize and handle-rotate.
///
/// Every transform is applied from clones of the pre-gesture elements on
/// each pointer move, never compounded frame over frame, so rounding
/// cannot drift and releasing at the start position restores the scene
/// bit for bit.
pub struct SelectionTool {
    state: SelectState,
}

enum SelectState {
    Idle,
    Dragging {
        origin: Vec<(ElementId, Element)>,
        start: Pos2,
    },
    Marquee {
        start: Pos2,
        current: Pos2,
        /// Selection kept when the marquee started additively.
        keep: Vec<ElementId>,
    },
    Resizing {
        role: HandleRole,
        origin: Vec<(ElementId, Element)>,
        bounds: Rect,
    },
    Rotating {
        origin: Vec<(ElementId, Element)>,
        center: Pos2,
        start_angle: f32,
    },
}

impl SelectionTool {
    pub fn new() -> Self {
        Self { state: SelectState::Idle }
    }

    /// Clones of the selection's leaf elements (groups resolved), to
    /// transform from on every move. `unlocked_only` drops elements that
    /// may not be resized or rotated.
    fn clone_leaves(scene: &Scene, unlocked_only: bool) -> Vec<(ElementId, Element)> {
        scene
            .resolve_leaves(scene.selected_ids())
            .into_iter()
            .filter(|id| !unlocked_only || !scene.is_effectively_locked(*id))
            .filter_map(|id| scene.find_element(id).map(|e| (id, e.clone())))
            .collect()
    }
}

impl Default for SelectionTool {
    fn default() -> Self {
        Self::new()
    }
}

impl Tool for SelectionTool {
    fn name(&self) -> &'static str {
        "Select"
    }

    fn on_pointer_down(&mut self, event: &PointerEvent, scene: &mut Scene) {
        let pos = event.pos;

        // Transform handles take precedence over element hits.
        if let Some(bounds) = scene.selection_bounds() {
            let handles = hit_testing::transform_handles(bounds);
            if let Some(handle) = hit_testing::hovered_handle(pos, &handles) {
                let origin = Self::clone_leaves(scene, true);
                if origin.is_empty() {
                    // Everything under the handles is locked.
                    self.state = SelectState::Idle;
                    return;
                }
                self.state = if handle.role.is_rotation() {
                    SelectState::Rotating {
                        origin,
                        center: bounds.center(),
                        start_angle: (pos - bounds.center()).angle(),
                    }
                } else {
                    SelectState::Resizing { role: handle.role, origin, bounds }
                };
                return;
            }
        }

        match hit_testing::hit_test(scene, pos) {
            Some(hit) => {
                if event.modifiers.command {
                    scene.toggle_selected(hit.id);
                } else if !scene.is_selected(hit.id) {
                    scene.set_selection(vec![hit.id]);
                }
                if scene.is_selected(hit.id) {
                    self.state = SelectState::Dragging {
                        origin: Self::clone_leaves(scene, false),
                        start: pos,
                    };
                } else {
                    self.state = SelectState::Idle;
                }
            }
            None => {
                let keep = if event.modifiers.command {
                    scene.selected_ids().to_vec()
                } else {
                    scene.clear_selection();
                    Vec::new()
                };
                self.state = SelectState::Marquee { start: pos, current: pos, keep };
            }
        }
    }

    fn on_pointer_move(&mut self, event: &PointerEvent, scene: &mut Scene) {
        let pos = event.pos;
        match &mut self.state {
            SelectState::Idle => {}
            SelectState::Marquee { current, .. } => *current = pos,
            SelectState::Dragging { origin, start } => {
                let delta = pos - *start;
                for (id, original) in origin.iter() {
                    let mut element = original.clone();
                    let mut allowed = delta;
                    if element.lock_movement_x {
                        allowed.x = 0.0;
                    }
                    if element.lock_movement_y {
                        allowed.y = 0.0;
                    }
                    element.translate(allowed);
                    scene.update_element(*id, |e| *e = element);
                }
            }
            SelectState::Resizing { role, origin, bounds } => {
                let (scale_x, scale_y) = resize_factors(*role, *bounds, pos);
                let anchor = role.resize_anchor(*bounds);
                for (id, original) in origin.iter() {
                    let mut element = original.clone();
                    element.scale_about(anchor, scale_x, scale_y);
                    scene.update_element(*id, |e| *e = element);
                }
            }
            SelectState::Rotating { origin, center, start_angle } => {
                let angle = (pos - *center).angle() - *start_angle;
                for (id, original) in origin.iter() {
                    let mut element = original.clone();
                    element.rotate_about(*center, angle);
                    scene.update_element(*id, |e| *e = element);
                }
            }
        }
    }

    fn on_pointer_up(&mut self, _event: &PointerEvent, scene: &mut Scene) {
        let state = std::mem::replace(&mut self.state, SelectState::Idle);
        if let SelectState::Marquee { start, current, keep } = state {
            let rect = Rect::from_two_pos(start, current);
            let grouped = scene.grouped_ids();
            let mut picked = keep;
            for element in scene.elements() {
                if grouped.contains(&element.id()) || !element.selectable {
                    continue;
                }
                if hit_testing::marquee_contains(scene, element, rect) {
                    picked.push(element.id());
                }
            }
            scene.set_selection(picked);
        }
    }

    fn deactivate(&mut self, _scene: &mut Scene) {
        self.state = SelectState::Idle;
    }

    fn preview(&self) -> ToolPreview<'_> {
        match &self.state {
            SelectState::Marquee { start, current, .. } => {
                ToolPreview::Marquee(Rect::from_two_pos(*start, *current))
            }
            _ => ToolPreview::None,
        }
    }
}

/// Per-axis scale factors relative to the original bounds and the handle's
/// opposite anchor, clamped to `[MIN_SCALE, MAX_SCALE]`.
fn resize_factors(role: HandleRole, bounds: Rect, pointer: Pos2) -> (f32, f32) {
    let anchor = role.resize_anchor(bounds);
    let handle = role.position(bounds);
    let (scales_x, scales_y) = role.scales_axes();

    let factor = |scales: bool, pointer: f32, handle: f32, anchor: f32| {
        let span = handle - anchor;
        if !scales || span.abs() < f32::EPSILON {
            1.0
        } else {
            ((pointer - anchor) / span).clamp(MIN_SCALE, MAX_SCALE)
        }
    };

    (
        factor(scales_x, pointer.x, handle.x, anchor.x),
        factor(scales_y, pointer.y, handle.y, anchor.y),
    )
}
