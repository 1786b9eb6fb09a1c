use std::collections::{HashMap, HashSet};

use egui::{Modifiers, Pos2, Vec2, vec2};
use log::warn;

use crate::element::{Element, ElementId, ElementKind, FlipAxis, factory};
use crate::geometry::hit_testing::{self, Handle};
use crate::history::History;
use crate::image_loader::{DecodeOutcome, ImageLoader};
use crate::persistence::{self, PersistenceError};
use crate::renderer::RedrawScheduler;
use crate::scene::Scene;
use crate::sync::{NullSync, SyncSink};
use crate::tools::{EditKey, PointerEvent, SelectionTool, Tool, ToolType};
use crate::viewport::Viewport;

/// Offset applied to duplicated elements so the copies are visible.
const DUPLICATE_OFFSET: Vec2 = vec2(12.0, 12.0);

/// Decoded image ready for the renderer's texture cache.
pub struct LoadedImage {
    pub id: ElementId,
    pub image: egui::ColorImage,
}

/// The mutation engine.
///
/// Owns the scene, the viewport, the undo/redo history and the active
/// tool, and is the only code that mutates the scene. All input arrives
/// here already routed (pointer, keyboard); a gesture is wrapped in a
/// transaction holding the pre-gesture snapshot, and committing it pushes
/// that snapshot to history and reports the element diff to the sync
/// collaborator. A gesture whose net effect is nothing (the eraser over
/// empty space, a drag released at its start) concludes without a
/// history entry.
pub struct Editor {
    scene: Scene,
    history: History,
    viewport: Viewport,
    tool: ToolType,
    sync: Box<dyn SyncSink>,
    loader: ImageLoader,
    scheduler: RedrawScheduler,
    subscribers: Vec<Box<dyn FnMut(&[Element])>>,
    /// Pre-gesture snapshot while a gesture transaction is open.
    transaction: Option<Vec<Element>>,
    pointer_active: bool,
}

impl Editor {
    pub fn new() -> Self {
        Self::with_sync(Box::new(NullSync))
    }

    pub fn with_sync(sync: Box<dyn SyncSink>) -> Self {
        Self {
            scene: Scene::new(),
            history: History::new(),
            viewport: Viewport::default(),
            tool: ToolType::Select(SelectionTool::new()),
            sync,
            loader: ImageLoader::new(),
            scheduler: RedrawScheduler::new(),
            subscribers: Vec::new(),
            transaction: None,
            pointer_active: false,
        }
    }

    // ---- read access ----------------------------------------------

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Deep copy of the element list, in z-order (first = bottom).
    pub fn snapshot(&self) -> Vec<Element> {
        self.scene.snapshot()
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn tool(&self) -> &ToolType {
        &self.tool
    }

    pub fn tool_mut(&mut self) -> &mut ToolType {
        &mut self.tool
    }

    // ---- tool management ------------------------------------------

    /// Swaps the active tool. An open editing session on the outgoing
    /// tool is committed first.
    pub fn set_tool(&mut self, tool: ToolType) {
        self.begin_transaction();
        self.tool.deactivate(&mut self.scene);
        self.tool = tool;
        self.pointer_active = false;
        self.conclude_if_idle();
        self.scheduler.request();
    }

    // ---- pointer & keyboard routing -------------------------------

    /// Pointer press, in screen coordinates.
    pub fn pointer_down(&mut self, screen: Pos2, pressure: Option<f32>, modifiers: Modifiers) {
        let event = PointerEvent {
            pos: self.viewport.screen_to_scene(screen),
            pressure,
            modifiers,
        };
        self.pointer_active = true;
        self.begin_transaction();
        self.tool.on_pointer_down(&event, &mut self.scene);
        self.scheduler.request();
    }

    /// Pointer movement while the button is held.
    pub fn pointer_move(&mut self, screen: Pos2, pressure: Option<f32>, modifiers: Modifiers) {
        if !self.pointer_active {
            return;
        }
        let event = PointerEvent {
            pos: self.viewport.screen_to_scene(screen),
            pressure,
            modifiers,
        };
        self.tool.on_pointer_move(&event, &mut self.scene);
        self.scheduler.request();
    }

    /// Pointer release: the gesture commits (or concludes as a no-op).
    pub fn pointer_up(&mut self, screen: Pos2, pressure: Option<f32>, modifiers: Modifiers) {
        let event = PointerEvent {
            pos: self.viewport.screen_to_scene(screen),
            pressure,
            modifiers,
        };
        self.tool.on_pointer_up(&event, &mut self.scene);
        self.pointer_active = false;
        self.conclude_if_idle();
        self.scheduler.request();
    }

    /// Keyboard input for the active tool (text editing).
    pub fn key_input(&mut self, key: EditKey) {
        self.begin_transaction();
        self.tool.on_key(&key, &mut self.scene);
        self.conclude_if_idle();
        self.scheduler.request();
    }

    /// The transform handle under the pointer, for cursor feedback.
    pub fn hovered_handle_at(&self, screen: Pos2) -> Option<Handle> {
        let pos = self.viewport.screen_to_scene(screen);
        let bounds = self.scene.selection_bounds()?;
        hit_testing::hovered_handle(pos, &hit_testing::transform_handles(bounds))
    }

    // ---- transactions ---------------------------------------------

    fn begin_transaction(&mut self) {
        if self.transaction.is_none() {
            self.transaction = Some(self.scene.snapshot());
        }
    }

    fn conclude_if_idle(&mut self) {
        if !self.pointer_active && !self.tool.gesture_open() {
            if let Some(before) = self.transaction.take() {
                self.commit(before);
            }
        }
    }

    /// Runs `mutate` as one closed gesture. Silently ignored while a
    /// pointer gesture or editing session is in flight.
    fn transact(&mut self, mutate: impl FnOnce(&mut Scene)) {
        if self.transaction.is_some() {
            return;
        }
        let before = self.scene.snapshot();
        mutate(&mut self.scene);
        self.commit(before);
    }

    fn commit(&mut self, before: Vec<Element>) {
        if before.as_slice() == self.scene.elements() {
            return;
        }
        self.emit_diff(&before);
        self.history.record(before);
        self.scheduler.request();
    }

    /// Reports per-element adds/updates/deletes between `before` and the
    /// current scene to the sync collaborator.
    fn emit_diff(&mut self, before: &[Element]) {
        let previous: HashMap<ElementId, &Element> =
            before.iter().map(|e| (e.id(), e)).collect();
        let live: HashSet<ElementId> = self.scene.elements().iter().map(|e| e.id()).collect();

        for element in self.scene.elements() {
            match previous.get(&element.id()) {
                None => self.sync.add_element(element),
                Some(prev) if **prev != *element => {
                    self.sync.update_element(element.id(), element);
                }
                Some(_) => {}
            }
        }
        for element in before {
            if !live.contains(&element.id()) {
                self.sync.delete_element(element.id());
            }
        }
    }

    // ---- history --------------------------------------------------

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo(&mut self) {
        if self.transaction.is_some() {
            return;
        }
        let current = self.scene.snapshot();
        if let Some(snapshot) = self.history.undo(current.clone()) {
            self.scene.restore(snapshot);
            self.emit_diff(&current);
            self.scheduler.request();
        }
    }

    pub fn redo(&mut self) {
        if self.transaction.is_some() {
            return;
        }
        let current = self.scene.snapshot();
        if let Some(snapshot) = self.history.redo(current.clone()) {
            self.scene.restore(snapshot);
            self.emit_diff(&current);
            self.scheduler.request();
        }
    }

    // ---- selection operations -------------------------------------

    pub fn set_selection(&mut self, ids: Vec<ElementId>) {
        self.scene.set_selection(ids);
        self.scheduler.request();
    }

    pub fn clear_selection(&mut self) {
        self.scene.clear_selection();
        self.scheduler.request();
    }

    pub fn select_all(&mut self) {
        self.scene.select_all();
        self.scheduler.request();
    }

    /// Deletes the selected elements. Locked elements survive; deleting
    /// a group takes its children with it.
    pub fn delete_selection(&mut self) {
        self.transact(|scene| {
            for id in scene.selected_ids().to_vec() {
                if scene.is_effectively_locked(id) {
                    continue;
                }
                for leaf in scene.resolve_leaves(&[id]) {
                    if !scene.is_effectively_locked(leaf) {
                        scene.delete_element(leaf);
                    }
                }
                scene.delete_element(id);
            }
        });
    }

    /// Clones the selection with fresh ids, slightly offset, and selects
    /// the copies.
    pub fn duplicate_selection(&mut self) {
        self.transact(|scene| {
            let mut copies = Vec::new();
            for id in scene.selected_ids().to_vec() {
                if scene.is_effectively_locked(id) {
                    continue;
                }
                if let Some(copy) = duplicate_subtree(scene, id) {
                    copies.push(copy);
                }
            }
            if !copies.is_empty() {
                scene.set_selection(copies);
            }
        });
    }

    /// Replaces the selected elements with one group referencing them.
    /// The children stay in the element list; the group is a grouping
    /// layer, not a container.
    pub fn group_selection(&mut self) {
        self.transact(|scene| {
            // Children keep their z-order inside the group.
            let members: Vec<ElementId> = scene
                .elements()
                .iter()
                .filter(|e| scene.is_selected(e.id()))
                .map(|e| e.id())
                .collect();
            if members.len() < 2 {
                return;
            }
            let group = scene.add_element(factory::group(members));
            scene.set_selection(vec![group]);
        });
    }

    /// Dissolves selected groups one nesting level, reselecting their
    /// children. Non-group elements in the selection stay selected.
    pub fn ungroup_selection(&mut self) {
        self.transact(|scene| {
            let mut reselect = Vec::new();
            for id in scene.selected_ids().to_vec() {
                match scene.find_element(id).map(|e| e.kind.clone()) {
                    Some(ElementKind::Group(group)) => {
                        scene.delete_element(id);
                        reselect.extend(group.children);
                    }
                    Some(_) => reselect.push(id),
                    None => {}
                }
            }
            scene.set_selection(reselect);
        });
    }

    /// Reflects every selected element about the selection bounding-box
    /// center axis. Locked elements are left in place.
    pub fn flip_selection(&mut self, axis: FlipAxis) {
        self.transact(|scene| {
            let Some(bounds) = scene.selection_bounds() else {
                return;
            };
            let center = bounds.center();
            for id in scene.resolve_leaves(scene.selected_ids()) {
                if scene.is_effectively_locked(id) {
                    continue;
                }
                scene.update_element(id, |element| element.flip_about(axis, center));
            }
        });
    }

    /// Removes every unlocked element from the board.
    pub fn clear_board(&mut self) {
        self.transact(|scene| {
            let ids: Vec<ElementId> = scene.elements().iter().map(|e| e.id()).collect();
            for id in ids {
                if !scene.is_effectively_locked(id) {
                    scene.delete_element(id);
                }
            }
        });
    }

    // ---- images ----------------------------------------------------

    /// Places an image element at a scene position and kicks off the
    /// asynchronous decode of its bytes. The element stays unrendered
    /// until the decode lands.
    pub fn add_image(&mut self, pos: Pos2, bytes: Vec<u8>) -> Option<ElementId> {
        if self.transaction.is_some() {
            return None;
        }
        let before = self.scene.snapshot();
        let id = self.scene.add_element(factory::image(pos, bytes.clone()));
        self.loader.spawn_decode(id, bytes);
        self.commit(before);
        Some(id)
    }

    /// Applies finished decodes: flips `loaded` and patches the real
    /// pixel size, or removes the element when the bytes were undecodable
    /// (the upload becomes a no-op). Neither path is a history entry.
    /// Returns the decoded images for the renderer's texture cache.
    pub fn poll_images(&mut self) -> Vec<LoadedImage> {
        let mut ready = Vec::new();
        for outcome in self.loader.poll() {
            match outcome {
                DecodeOutcome::Ready { id, image, size } => {
                    let applied = self.scene.update_element(id, |element| {
                        if let ElementKind::Image(img) = &mut element.kind {
                            img.size = size;
                            img.loaded = true;
                        }
                    });
                    if applied {
                        if let Some(element) = self.scene.find_element(id) {
                            let element = element.clone();
                            self.sync.update_element(id, &element);
                        }
                        ready.push(LoadedImage { id, image });
                        self.scheduler.request();
                    }
                }
                DecodeOutcome::Failed { id } => {
                    warn!("image decode failed, dropping upload {id}");
                    if self.scene.delete_element(id) {
                        self.sync.delete_element(id);
                        self.scheduler.request();
                    }
                }
            }
        }
        ready
    }

    // ---- viewport --------------------------------------------------

    pub fn screen_to_scene(&self, screen: Pos2) -> Pos2 {
        self.viewport.screen_to_scene(screen)
    }

    pub fn scene_to_screen(&self, scene: Pos2) -> Pos2 {
        self.viewport.scene_to_screen(scene)
    }

    pub fn set_canvas_size(&mut self, size: Vec2) {
        if self.viewport.canvas_size() != size {
            self.viewport.set_canvas_size(size);
            self.scheduler.request();
        }
    }

    pub fn zoom_in(&mut self) {
        self.viewport.zoom_in();
        self.scheduler.request();
    }

    pub fn zoom_out(&mut self) {
        self.viewport.zoom_out();
        self.scheduler.request();
    }

    pub fn pan_by(&mut self, delta: Vec2) {
        self.viewport.pan_by(delta);
        self.scheduler.request();
    }

    // ---- redraw subscription --------------------------------------

    /// Registers a renderer-side callback, fired once per coalesced
    /// redraw with the current element snapshot.
    pub fn on_scene_changed(&mut self, callback: Box<dyn FnMut(&[Element])>) {
        self.subscribers.push(callback);
    }

    /// Drains the coalesced redraw request, notifying subscribers.
    /// Returns true when a repaint is due.
    pub fn flush_redraw(&mut self) -> bool {
        if !self.scheduler.take() {
            return false;
        }
        for subscriber in &mut self.subscribers {
            subscriber(self.scene.elements());
        }
        true
    }

    // ---- remote sync & persistence --------------------------------

    /// Accepts an externally pushed full snapshot (last-writer-wins at
    /// snapshot granularity). Local history is cleared: undoing across a
    /// remote overwrite would resurrect state the remote already
    /// overruled.
    pub fn apply_remote_snapshot(&mut self, elements: Vec<Element>) {
        self.scene.restore(elements);
        self.history.clear();
        self.scheduler.request();
    }

    pub fn save_scene(&self, path: &std::path::Path) -> Result<(), PersistenceError> {
        persistence::save_scene(path, self.scene.elements())
    }

    pub fn load_scene(&mut self, path: &std::path::Path) -> Result<(), PersistenceError> {
        let elements = persistence::load_scene(path)?;
        self.scene.restore(elements);
        self.history.clear();
        self.scheduler.request();
        Ok(())
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

/// Clones an element (or a group and its children, recursively) with
/// fresh ids, offset so the copy is visible. Returns the top-level copy.
fn duplicate_subtree(scene: &mut Scene, id: ElementId) -> Option<ElementId> {
    let element = scene.find_element(id)?.clone();
    match &element.kind {
        ElementKind::Group(group) => {
            let mut children = Vec::new();
            for child in &group.children {
                if let Some(copy) = duplicate_subtree(scene, *child) {
                    children.push(copy);
                }
            }
            if children.is_empty() {
                None
            } else {
                Some(scene.add_element(factory::group(children)))
            }
        }
        _ => {
            let mut copy = element.duplicate();
            copy.translate(DUPLICATE_OFFSET);
            Some(scene.add_element(copy))
        }
    }
}
