use egui::Color32;

use crate::element::{ElementId, ElementKind, factory};
use crate::geometry::hit_testing;
use crate::scene::Scene;
use crate::tools::{PointerEvent, Tool};

/// Keyboard input routed into an active text editing session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKey {
    Backspace,
    Enter,
    Escape,
    Char(char),
}

/// Text tool: a click either opens an existing note for editing or places
/// a new one. While a note is marked editing, keystrokes mutate its text
/// in place; Escape or a click outside ends the session.
///
/// The whole session, placement plus every keystroke, is one gesture
/// from the history's point of view, so a single undo removes it.
pub struct TextTool {
    pub font_size: f32,
    pub color: Color32,
    state: TextState,
}

enum TextState {
    Idle,
    Editing { id: ElementId },
}

impl TextTool {
    pub fn new() -> Self {
        Self {
            font_size: 24.0,
            color: Color32::BLACK,
            state: TextState::Idle,
        }
    }

    /// Id of the note currently being edited, if any.
    pub fn editing_id(&self) -> Option<ElementId> {
        match self.state {
            TextState::Editing { id } => Some(id),
            TextState::Idle => None,
        }
    }

    fn end_editing(&mut self, scene: &mut Scene) {
        if let TextState::Editing { id } = self.state {
            // A note that never received any text is discarded; placing
            // and immediately abandoning one is a no-op.
            let empty = matches!(
                scene.find_element(id).map(|e| &e.kind),
                Some(ElementKind::Text(text)) if text.text.is_empty()
            );
            if empty {
                scene.delete_element(id);
            }
        }
        self.state = TextState::Idle;
    }
}

impl Default for TextTool {
    fn default() -> Self {
        Self::new()
    }
}

impl Tool for TextTool {
    fn name(&self) -> &'static str {
        "Text"
    }

    fn on_pointer_down(&mut self, event: &PointerEvent, scene: &mut Scene) {
        if let TextState::Editing { id } = self.state {
            let inside = matches!(
                scene.find_element(id).map(|e| &e.kind),
                Some(ElementKind::Text(text)) if text.bounds().contains(event.pos)
            );
            if inside {
                return; // keep editing
            }
            self.end_editing(scene);
            return;
        }

        // Clicking an existing note re-opens it; empty space places a new
        // one and starts editing immediately.
        let hit_text = hit_testing::hit_test(scene, event.pos).filter(|hit| {
            matches!(
                scene.find_element(hit.id).map(|e| &e.kind),
                Some(ElementKind::Text(_))
            )
        });

        let id = match hit_text {
            Some(hit) => hit.id,
            None => scene.add_element(factory::text(event.pos, "", self.font_size, self.color)),
        };
        scene.set_selection(vec![id]);
        self.state = TextState::Editing { id };
    }

    fn on_pointer_move(&mut self, _event: &PointerEvent, _scene: &mut Scene) {}

    fn on_pointer_up(&mut self, _event: &PointerEvent, _scene: &mut Scene) {}

    fn on_key(&mut self, key: &EditKey, scene: &mut Scene) {
        let TextState::Editing { id } = self.state else {
            return;
        };

        match key {
            EditKey::Escape => self.end_editing(scene),
            EditKey::Backspace => {
                scene.update_element(id, |element| {
                    if let ElementKind::Text(text) = &mut element.kind {
                        text.text.pop();
                    }
                });
            }
            EditKey::Enter => {
                scene.update_element(id, |element| {
                    if let ElementKind::Text(text) = &mut element.kind {
                        text.text.push('\n');
                    }
                });
            }
            EditKey::Char(c) => {
                if c.is_control() {
                    return;
                }
                let c = *c;
                scene.update_element(id, |element| {
                    if let ElementKind::Text(text) = &mut element.kind {
                        text.text.push(c);
                    }
                });
            }
        }
    }

    fn gesture_open(&self) -> bool {
        matches!(self.state, TextState::Editing { .. })
    }

    fn deactivate(&mut self, scene: &mut Scene) {
        self.end_editing(scene);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    fn text_of(scene: &Scene, id: ElementId) -> String {
        match &scene.find_element(id).unwrap().kind {
            ElementKind::Text(t) => t.text.clone(),
            _ => unreachable!(),
        }
    }

    #[test]
    fn click_places_note_and_keys_edit_it() {
        let mut scene = Scene::new();
        let mut tool = TextTool::new();

        tool.on_pointer_down(&PointerEvent::new(pos2(10.0, 10.0)), &mut scene);
        let id = tool.editing_id().unwrap();

        for c in "hi".chars() {
            tool.on_key(&EditKey::Char(c), &mut scene);
        }
        tool.on_key(&EditKey::Enter, &mut scene);
        tool.on_key(&EditKey::Char('!'), &mut scene);
        tool.on_key(&EditKey::Backspace, &mut scene);
        assert_eq!(text_of(&scene, id), "hi\n");

        tool.on_key(&EditKey::Escape, &mut scene);
        assert!(tool.editing_id().is_none());
        assert!(scene.contains(id));
    }

    #[test]
    fn abandoned_empty_note_is_discarded() {
        let mut scene = Scene::new();
        let mut tool = TextTool::new();

        tool.on_pointer_down(&PointerEvent::new(pos2(10.0, 10.0)), &mut scene);
        tool.on_key(&EditKey::Escape, &mut scene);
        assert!(scene.is_empty());
    }

    #[test]
    fn outside_click_ends_editing() {
        let mut scene = Scene::new();
        let mut tool = TextTool::new();

        tool.on_pointer_down(&PointerEvent::new(pos2(10.0, 10.0)), &mut scene);
        tool.on_key(&EditKey::Char('a'), &mut scene);
        assert!(tool.gesture_open());

        tool.on_pointer_down(&PointerEvent::new(pos2(900.0, 900.0)), &mut scene);
        assert!(!tool.gesture_open());
        assert_eq!(scene.elements().len(), 1);
    }

    #[test]
    fn clicking_existing_note_reopens_it() {
        let mut scene = Scene::new();
        let mut tool = TextTool::new();

        tool.on_pointer_down(&PointerEvent::new(pos2(10.0, 10.0)), &mut scene);
        let id = tool.editing_id().unwrap();
        tool.on_key(&EditKey::Char('x'), &mut scene);
        tool.on_key(&EditKey::Escape, &mut scene);

        // Click inside the committed note's bounds.
        tool.on_pointer_down(&PointerEvent::new(pos2(12.0, 15.0)), &mut scene);
        assert_eq!(tool.editing_id(), Some(id));
        tool.on_key(&EditKey::Char('y'), &mut scene);
        assert_eq!(text_of(&scene, id), "xy");
    }
}
