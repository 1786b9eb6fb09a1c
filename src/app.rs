use egui::{Key, Pos2, pos2};

use crate::editor::Editor;
use crate::element::FlipAxis;
use crate::renderer::Renderer;
use crate::tools::{
    EditKey, EraserMode, EraserTool, FreehandTool, SelectionTool, ShapeTool, TextTool, Tool,
    ToolType,
};

/// Thin eframe shell hosting the board core: one canvas panel plus a
/// minimal tool row. All real behavior lives in [`Editor`]; this type
/// only routes input and drives the renderer.
pub struct BoardApp {
    editor: Editor,
    renderer: Renderer,
    pointer_was_down: bool,
    last_pointer: Pos2,
}

impl BoardApp {
    /// Called once before the first frame.
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        Self {
            editor: Editor::new(),
            renderer: Renderer::new(),
            pointer_was_down: false,
            last_pointer: pos2(0.0, 0.0),
        }
    }

    fn tool_row(&mut self, ui: &mut egui::Ui) {
        let current = self.editor.tool().name();
        ui.horizontal(|ui| {
            if ui.selectable_label(current == "Select", "Select").clicked() {
                self.editor.set_tool(ToolType::Select(SelectionTool::new()));
            }
            if ui.selectable_label(current == "Freehand", "Draw").clicked() {
                self.editor.set_tool(ToolType::Freehand(FreehandTool::new()));
            }
            if ui.selectable_label(current == "Shape", "Shape").clicked() {
                self.editor.set_tool(ToolType::Shape(ShapeTool::new()));
            }
            if ui.selectable_label(current == "Eraser", "Eraser").clicked() {
                self.editor.set_tool(ToolType::Eraser(EraserTool::new()));
            }
            if ui.selectable_label(current == "Text", "Text").clicked() {
                self.editor.set_tool(ToolType::Text(TextTool::new()));
            }

            ui.separator();
            if let ToolType::Eraser(eraser) = self.editor.tool_mut() {
                let object = eraser.mode == EraserMode::Object;
                if ui.selectable_label(object, "Object erase").clicked() {
                    eraser.mode = if object { EraserMode::Stroke } else { EraserMode::Object };
                }
            }

            ui.separator();
            if ui.add_enabled(self.editor.can_undo(), egui::Button::new("Undo")).clicked() {
                self.editor.undo();
            }
            if ui.add_enabled(self.editor.can_redo(), egui::Button::new("Redo")).clicked() {
                self.editor.redo();
            }
            if ui.button("Clear").clicked() {
                self.editor.clear_board();
            }

            ui.separator();
            ui.label(format!("{:.0}%", self.editor.viewport().zoom() * 100.0));
        });
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        // While a text note is being edited the keyboard belongs to it.
        if self.editor.tool().gesture_open() {
            let events = ctx.input(|i| i.events.clone());
            for event in events {
                match event {
                    egui::Event::Text(text) => {
                        for c in text.chars() {
                            self.editor.key_input(EditKey::Char(c));
                        }
                    }
                    egui::Event::Key { key: Key::Backspace, pressed: true, .. } => {
                        self.editor.key_input(EditKey::Backspace);
                    }
                    egui::Event::Key { key: Key::Enter, pressed: true, .. } => {
                        self.editor.key_input(EditKey::Enter);
                    }
                    egui::Event::Key { key: Key::Escape, pressed: true, .. } => {
                        self.editor.key_input(EditKey::Escape);
                    }
                    _ => {}
                }
            }
            return;
        }

        let command = egui::Modifiers::COMMAND;
        let command_shift = egui::Modifiers::COMMAND | egui::Modifiers::SHIFT;

        if ctx.input_mut(|i| i.consume_key(command_shift, Key::Z)) {
            self.editor.redo();
        } else if ctx.input_mut(|i| i.consume_key(command, Key::Z)) {
            self.editor.undo();
        }
        if ctx.input_mut(|i| i.consume_key(command, Key::A)) {
            self.editor.select_all();
        }
        if ctx.input_mut(|i| i.consume_key(command, Key::D)) {
            self.editor.duplicate_selection();
        }
        if ctx.input_mut(|i| i.consume_key(command_shift, Key::G)) {
            self.editor.ungroup_selection();
        } else if ctx.input_mut(|i| i.consume_key(command, Key::G)) {
            self.editor.group_selection();
        }
        if ctx.input_mut(|i| {
            i.consume_key(egui::Modifiers::NONE, Key::Delete)
                || i.consume_key(egui::Modifiers::NONE, Key::Backspace)
        }) {
            self.editor.delete_selection();
        }
        if ctx.input_mut(|i| i.consume_key(egui::Modifiers::NONE, Key::H)) {
            self.editor.flip_selection(FlipAxis::Horizontal);
        }
        if ctx.input_mut(|i| i.consume_key(egui::Modifiers::NONE, Key::V)) {
            self.editor.flip_selection(FlipAxis::Vertical);
        }
        if ctx.input_mut(|i| i.consume_key(egui::Modifiers::NONE, Key::Plus)) {
            self.editor.zoom_in();
        }
        if ctx.input_mut(|i| i.consume_key(egui::Modifiers::NONE, Key::Minus)) {
            self.editor.zoom_out();
        }
    }

    fn canvas(&mut self, ui: &mut egui::Ui) {
        let (response, painter) =
            ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
        let rect = response.rect;
        self.editor.set_canvas_size(rect.size());

        let modifiers = ui.input(|i| i.modifiers);

        // Wheel: plain scroll pans, command-scroll zooms in steps.
        let scroll = ui.input(|i| i.smooth_scroll_delta);
        if response.hovered() && scroll != egui::Vec2::ZERO {
            if modifiers.command {
                if scroll.y > 0.0 {
                    self.editor.zoom_in();
                } else if scroll.y < 0.0 {
                    self.editor.zoom_out();
                }
            } else {
                self.editor.pan_by(scroll / self.editor.viewport().zoom());
            }
        }

        // Map egui's polled pointer state onto down/move/up gestures.
        let pointer_down = response.is_pointer_button_down_on()
            || (self.pointer_was_down && ui.input(|i| i.pointer.primary_down()));
        if let Some(pos) = response.interact_pointer_pos() {
            self.last_pointer = (pos - rect.min).to_pos2();
        }

        if pointer_down && !self.pointer_was_down {
            self.editor.pointer_down(self.last_pointer, None, modifiers);
        } else if pointer_down {
            self.editor.pointer_move(self.last_pointer, None, modifiers);
        } else if self.pointer_was_down {
            self.editor.pointer_up(self.last_pointer, None, modifiers);
        }
        self.pointer_was_down = pointer_down;

        // Cursor feedback over transform handles.
        if let Some(hover) = response.hover_pos() {
            let local = (hover - rect.min).to_pos2();
            if let Some(handle) = self.editor.hovered_handle_at(local) {
                ui.output_mut(|o| o.cursor_icon = handle.role.cursor());
            }
        }

        // The viewport works canvas-local; the painter in window
        // coordinates. The renderer bridges the two via the origin.
        let painter = painter.with_clip_rect(rect);
        let origin = rect.min.to_vec2();
        let viewport = *self.editor.viewport();
        self.renderer.paint_scene(&painter, self.editor.scene(), &viewport, origin);
        self.renderer.paint_preview(&painter, &self.editor.tool().preview(), &viewport, origin);
        self.renderer.paint_selection(&painter, self.editor.scene(), &viewport, origin);
    }
}

impl eframe::App for BoardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Finished image decodes feed the texture cache.
        for loaded in self.editor.poll_images() {
            self.renderer.install_image(ctx, loaded.id, loaded.image);
        }

        // Dropped files become image elements at the canvas center.
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        for file in dropped {
            if let Some(bytes) = file.bytes {
                let center = self.editor.screen_to_scene(pos2(
                    self.editor.viewport().canvas_size().x / 2.0,
                    self.editor.viewport().canvas_size().y / 2.0,
                ));
                self.editor.add_image(center, bytes.to_vec());
            }
        }

        self.handle_shortcuts(ctx);

        egui::TopBottomPanel::top("board_toolbar").show(ctx, |ui| self.tool_row(ui));
        egui::CentralPanel::default().show(ctx, |ui| self.canvas(ui));

        if self.editor.flush_redraw() {
            ctx.request_repaint();
        }
    }
}
