use std::collections::HashSet;

use egui::Rect;
use log::debug;

use crate::element::{Element, ElementId, ElementKind};

/// The ordered collection of drawing elements plus the selection set.
///
/// Element order is z-order: first element at the bottom, last on top.
/// The scene is owned exclusively by the mutation engine; the renderer
/// only ever reads snapshots of it.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    elements: Vec<Element>,
    selected: Vec<ElementId>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Structurally independent deep copy of the element list, safe to
    /// keep across later mutations (history snapshots, renderer input).
    pub fn snapshot(&self) -> Vec<Element> {
        self.elements.clone()
    }

    /// Replaces the whole element list (undo/redo restore, remote
    /// snapshot push). The selection is pruned to ids that still exist.
    pub fn restore(&mut self, elements: Vec<Element>) {
        self.elements = elements;
        let live: HashSet<ElementId> = self.elements.iter().map(|e| e.id()).collect();
        self.selected.retain(|id| live.contains(id));
    }

    pub fn add_element(&mut self, element: Element) -> ElementId {
        let id = element.id();
        debug!("scene: add {} {}", element.kind_name(), id);
        self.elements.push(element);
        id
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.iter().any(|e| e.id() == id)
    }

    pub fn find_element(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id() == id)
    }

    /// Applies `patch` to the element with the given id. Unknown ids are
    /// a silent no-op, mirroring the gesture failure semantics.
    pub fn update_element(&mut self, id: ElementId, patch: impl FnOnce(&mut Element)) -> bool {
        match self.elements.iter_mut().find(|e| e.id() == id) {
            Some(element) => {
                patch(element);
                true
            }
            None => false,
        }
    }

    /// Removes an element. The selection is pruned atomically, the id is
    /// dropped from any group that references it, and groups left with no
    /// children are removed as well, so normal operations never leave a
    /// dangling child reference behind.
    pub fn delete_element(&mut self, id: ElementId) -> bool {
        let Some(index) = self.elements.iter().position(|e| e.id() == id) else {
            return false;
        };
        let removed = self.elements.remove(index);
        debug!("scene: delete {} {}", removed.kind_name(), id);
        self.selected.retain(|sel| *sel != id);

        let mut emptied = Vec::new();
        for element in &mut self.elements {
            if let ElementKind::Group(group) = &mut element.kind {
                group.children.retain(|child| *child != id);
                if group.children.is_empty() {
                    emptied.push(element.id());
                }
            }
        }
        for group_id in emptied {
            self.delete_element(group_id);
        }
        true
    }

    // ---- selection -------------------------------------------------

    pub fn selected_ids(&self) -> &[ElementId] {
        &self.selected
    }

    pub fn is_selected(&self, id: ElementId) -> bool {
        self.selected.contains(&id)
    }

    /// Replaces the selection. Ids that do not exist, are not selectable,
    /// or repeat are dropped, which keeps the live-ids invariant.
    pub fn set_selection(&mut self, ids: Vec<ElementId>) {
        let mut seen = HashSet::new();
        let filtered: Vec<ElementId> = ids
            .into_iter()
            .filter(|id| {
                seen.insert(*id) && self.find_element(*id).is_some_and(|e| e.selectable)
            })
            .collect();
        self.selected = filtered;
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    pub fn toggle_selected(&mut self, id: ElementId) {
        if self.is_selected(id) {
            self.selected.retain(|sel| *sel != id);
        } else if self.find_element(id).is_some_and(|e| e.selectable) {
            self.selected.push(id);
        }
    }

    /// Selects every selectable element that is not owned by a group
    /// (grouped children are represented by their group).
    pub fn select_all(&mut self) {
        let grouped = self.grouped_ids();
        self.selected = self
            .elements
            .iter()
            .filter(|e| e.selectable && !grouped.contains(&e.id()))
            .map(|e| e.id())
            .collect();
    }

    // ---- group resolution ------------------------------------------

    /// Ids referenced as a child by any group in the scene.
    pub fn grouped_ids(&self) -> HashSet<ElementId> {
        let mut grouped = HashSet::new();
        for element in &self.elements {
            if let ElementKind::Group(group) = &element.kind {
                grouped.extend(group.children.iter().copied());
            }
        }
        grouped
    }

    /// The outermost group containing `id`, if any. Hitting a grouped
    /// child selects its outermost group.
    pub fn outermost_group_of(&self, id: ElementId) -> Option<ElementId> {
        let mut current = id;
        let mut outermost = None;
        // Bounded by the element count; group creation cannot form cycles
        // but a malformed snapshot must not hang us.
        for _ in 0..self.elements.len() {
            let Some(owner) = self.owner_of(current) else { break };
            outermost = Some(owner);
            current = owner;
        }
        outermost
    }

    fn owner_of(&self, id: ElementId) -> Option<ElementId> {
        self.elements.iter().find_map(|element| match &element.kind {
            ElementKind::Group(group) if group.children.contains(&id) => Some(element.id()),
            _ => None,
        })
    }

    /// True when the element itself or any group containing it is locked.
    pub fn is_effectively_locked(&self, id: ElementId) -> bool {
        let mut current = Some(id);
        for _ in 0..=self.elements.len() {
            let Some(id) = current else { return false };
            if self.find_element(id).is_some_and(|e| e.locked) {
                return true;
            }
            current = self.owner_of(id);
        }
        false
    }

    /// Expands the given ids into concrete drawable elements: groups are
    /// resolved to their children, recursively.
    pub fn resolve_leaves(&self, ids: &[ElementId]) -> Vec<ElementId> {
        let mut leaves = Vec::new();
        let mut visited = HashSet::new();
        let mut stack: Vec<ElementId> = ids.to_vec();

        while let Some(id) = stack.pop() {
            if !visited.insert(id) {
                continue;
            }
            match self.find_element(id).map(|e| &e.kind) {
                Some(ElementKind::Group(group)) => stack.extend(group.children.iter().copied()),
                Some(_) => leaves.push(id),
                None => {}
            }
        }
        leaves
    }

    // ---- bounds ----------------------------------------------------

    /// Bounding box of an element, resolving groups to the union of
    /// their children.
    pub fn element_bounds(&self, element: &Element) -> Option<Rect> {
        match &element.kind {
            ElementKind::Group(group) => {
                let mut union: Option<Rect> = None;
                for id in self.resolve_leaves(&group.children) {
                    if let Some(bounds) = self.find_element(id).and_then(|e| e.own_bounds()) {
                        union = Some(match union {
                            Some(u) => u.union(bounds),
                            None => bounds,
                        });
                    }
                }
                union
            }
            _ => element.own_bounds(),
        }
    }

    /// Union bounding box over the current selection.
    pub fn selection_bounds(&self) -> Option<Rect> {
        let mut union: Option<Rect> = None;
        for id in self.resolve_leaves(&self.selected) {
            if let Some(bounds) = self.find_element(id).and_then(|e| e.own_bounds()) {
                union = Some(match union {
                    Some(u) => u.union(bounds),
                    None => bounds,
                });
            }
        }
        union
    }
}
