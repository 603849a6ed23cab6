use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use super::ListenerKind;

pub type ListenerId = usize;

/// Input surface a session listens on, and the sink for its pointer style
pub trait InputSurface {
    fn add_listener(&mut self, kind: ListenerKind) -> ListenerId;

    fn remove_listener(&mut self, id: ListenerId);

    fn set_cursor(&mut self, cursor: &str);
}

#[derive(Debug)]
struct SurfaceData {
    listeners: BTreeMap<ListenerId, ListenerKind>,
    next_listener_id: ListenerId,
    cursor: String,
}

impl Default for SurfaceData {
    fn default() -> Self {
        Self {
            listeners: Default::default(),
            next_listener_id: 1,
            cursor: "default".to_owned(),
        }
    }
}

/// In-memory input surface
///
/// Clones share the same state, so the host can keep a handle on a surface owned by a session.
#[derive(Debug, Default, Clone)]
pub struct HeadlessSurface(Arc<Mutex<SurfaceData>>);

impl HeadlessSurface {
    pub fn new() -> Self {
        Self::default()
    }

    fn data(&self) -> MutexGuard<'_, SurfaceData> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn cursor(&self) -> String {
        self.data().cursor.clone()
    }

    pub fn listener_count(&self) -> usize {
        self.data().listeners.len()
    }

    pub fn has_listener(&self, kind: ListenerKind) -> bool {
        self.data().listeners.values().any(|k| *k == kind)
    }
}

impl InputSurface for HeadlessSurface {
    fn add_listener(&mut self, kind: ListenerKind) -> ListenerId {
        let mut data = self.data();

        let id = data.next_listener_id;
        data.next_listener_id += 1;
        data.listeners.insert(id, kind);

        trace!(id, kind = %kind, "added listener");
        id
    }

    fn remove_listener(&mut self, id: ListenerId) {
        if let Some(kind) = self.data().listeners.remove(&id) {
            trace!(id, kind = %kind, "removed listener");
        }
    }

    fn set_cursor(&mut self, cursor: &str) {
        trace!(cursor, "set cursor");
        self.data().cursor = cursor.to_owned();
    }
}
