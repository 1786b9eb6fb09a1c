use crate::element::{Element, ElementId};

/// Fire-and-forget outbound contract for a remote sync collaborator.
///
/// The mutation engine calls these on every committed local change. The
/// core never blocks on the sink and never rolls local state back on its
/// behalf; reconciling divergent remote state is the collaborator's
/// problem. Inbound remote updates arrive as whole-scene snapshots via
/// [`crate::editor::Editor::apply_remote_snapshot`] (last-writer-wins).
pub trait SyncSink {
    fn add_element(&mut self, element: &Element);
    fn update_element(&mut self, id: ElementId, element: &Element);
    fn delete_element(&mut self, id: ElementId);
}

/// Sink for running without any collaborator attached.
#[derive(Debug, Default)]
pub struct NullSync;

impl SyncSink for NullSync {
    fn add_element(&mut self, _element: &Element) {}
    fn update_element(&mut self, _id: ElementId, _element: &Element) {}
    fn delete_element(&mut self, _id: ElementId) {}
}

/// What a [`RecordingSync`] captured.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncEvent {
    Added(ElementId),
    Updated(ElementId),
    Deleted(ElementId),
}

/// Sink that records the calls it receives; used by tests to assert on
/// the commit traffic the engine produces. Clones share the same log, so
/// a handle can be kept after boxing one into the engine.
#[derive(Debug, Clone, Default)]
pub struct RecordingSync {
    events: std::sync::Arc<parking_lot::Mutex<Vec<SyncEvent>>>,
}

impl RecordingSync {
    pub fn events(&self) -> Vec<SyncEvent> {
        self.events.lock().clone()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl SyncSink for RecordingSync {
    fn add_element(&mut self, element: &Element) {
        self.events.lock().push(SyncEvent::Added(element.id()));
    }

    fn update_element(&mut self, id: ElementId, _element: &Element) {
        self.events.lock().push(SyncEvent::Updated(id));
    }

    fn delete_element(&mut self, id: ElementId) {
        self.events.lock().push(SyncEvent::Deleted(id));
    }
}
