//! Event binding for immediate triggers

use splice_dom::{ElementData, EventType, Listener, ListenerId, NodeId, Window};

use crate::attributes::MARKER_TRIGGER;

/// Activation event for a trigger: a non-empty marker value wins, otherwise
/// forms submit, form controls change and everything else clicks.
pub fn event_for(element: &ElementData) -> EventType {
    if let Some(name) = element.get_attr(MARKER_TRIGGER).map(str::trim).filter(|v| !v.is_empty()) {
        return EventType::parse(name);
    }
    match element.tag() {
        "form" => EventType::Submit,
        "input" | "select" | "textarea" => EventType::Change,
        _ => EventType::Click,
    }
}

/// A listener registered on a trigger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerBinding {
    pub target: NodeId,
    pub event_type: EventType,
    pub id: ListenerId,
}

/// Listener bookkeeping for one renderer
#[derive(Debug, Default)]
pub struct EventBinder {
    bindings: Vec<ListenerBinding>,
}

impl EventBinder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, window: &Window, target: NodeId, event_type: EventType, listener: Listener) {
        let id = window.add_event_listener(target, event_type.clone(), listener);
        tracing::debug!(?target, event = %event_type, "bound trigger");
        self.bindings.push(ListenerBinding { target, event_type, id });
    }

    /// Remove every registered listener; returns how many were removed
    pub fn unbind_all(&mut self, window: &Window) -> usize {
        self.bindings
            .drain(..)
            .filter(|b| window.remove_event_listener(b.target, &b.event_type, b.id))
            .count()
    }

    pub fn bindings(&self) -> &[ListenerBinding] {
        &self.bindings
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
