use egui::{Modifiers, Pos2, Rect};

use crate::element::{PathPoint, StrokeStyle};
use crate::scene::Scene;

mod eraser_tool;
mod freehand_tool;
mod selection_tool;
mod shape_tool;
mod text_tool;

pub use eraser_tool::{EraserMode, EraserTool};
pub use freehand_tool::FreehandTool;
pub use selection_tool::SelectionTool;
pub use shape_tool::ShapeTool;
pub use text_tool::{EditKey, TextTool};

/// One pointer sample in scene coordinates, as seen by a tool.
#[derive(Debug, Clone, Copy)]
pub struct PointerEvent {
    pub pos: Pos2,
    /// Pen pressure in `[0, 1]` when the input device reports it.
    pub pressure: Option<f32>,
    pub modifiers: Modifiers,
}

impl PointerEvent {
    pub fn new(pos: Pos2) -> Self {
        Self { pos, pressure: None, modifiers: Modifiers::NONE }
    }
}

/// What a tool wants painted on top of the committed scene while its
/// gesture is in flight.
pub enum ToolPreview<'a> {
    None,
    Stroke { points: &'a [PathPoint], style: &'a StrokeStyle },
    Shape { path: Vec<Pos2>, closed: bool, style: &'a StrokeStyle },
    Marquee(Rect),
}

/// Tool trait: each tool is a gesture state machine driven by pointer
/// events already converted to scene coordinates.
///
/// Tools mutate the scene directly; the mutation engine decides whether
/// the gesture committed anything by comparing the scene against the
/// pre-gesture snapshot, so tools never do history bookkeeping.
pub trait Tool {
    fn name(&self) -> &'static str;

    fn on_pointer_down(&mut self, event: &PointerEvent, scene: &mut Scene);
    fn on_pointer_move(&mut self, event: &PointerEvent, scene: &mut Scene);
    fn on_pointer_up(&mut self, event: &PointerEvent, scene: &mut Scene);

    /// Keyboard input while this tool is active. Only the text tool
    /// consumes keys.
    fn on_key(&mut self, _key: &EditKey, _scene: &mut Scene) {}

    /// True while the tool's editing session outlives the pointer cycle
    /// (text editing). The mutation engine keeps the gesture transaction
    /// open until this clears.
    fn gesture_open(&self) -> bool {
        false
    }

    /// Reset transient state when the tool is swapped out.
    fn deactivate(&mut self, _scene: &mut Scene) {}

    fn preview(&self) -> ToolPreview<'_> {
        ToolPreview::None
    }
}

/// All available tools, dispatched without `Box<dyn Tool>`.
pub enum ToolType {
    Select(SelectionTool),
    Freehand(FreehandTool),
    Shape(ShapeTool),
    Eraser(EraserTool),
    Text(TextTool),
}

impl ToolType {
    fn as_tool(&self) -> &dyn Tool {
        match self {
            Self::Select(tool) => tool,
            Self::Freehand(tool) => tool,
            Self::Shape(tool) => tool,
            Self::Eraser(tool) => tool,
            Self::Text(tool) => tool,
        }
    }

    fn as_tool_mut(&mut self) -> &mut dyn Tool {
        match self {
            Self::Select(tool) => tool,
            Self::Freehand(tool) => tool,
            Self::Shape(tool) => tool,
            Self::Eraser(tool) => tool,
            Self::Text(tool) => tool,
        }
    }
}

impl Tool for ToolType {
    fn name(&self) -> &'static str {
        self.as_tool().name()
    }

    fn on_pointer_down(&mut self, event: &PointerEvent, scene: &mut Scene) {
        self.as_tool_mut().on_pointer_down(event, scene);
    }

    fn on_pointer_move(&mut self, event: &PointerEvent, scene: &mut Scene) {
        self.as_tool_mut().on_pointer_move(event, scene);
    }

    fn on_pointer_up(&mut self, event: &PointerEvent, scene: &mut Scene) {
        self.as_tool_mut().on_pointer_up(event, scene);
    }

    fn on_key(&mut self, key: &EditKey, scene: &mut Scene) {
        self.as_tool_mut().on_key(key, scene);
    }

    fn gesture_open(&self) -> bool {
        self.as_tool().gesture_open()
    }

    fn deactivate(&mut self, scene: &mut Scene) {
        self.as_tool_mut().deactivate(scene);
    }

    fn preview(&self) -> ToolPreview<'_> {
        self.as_tool().preview()
    }
}
