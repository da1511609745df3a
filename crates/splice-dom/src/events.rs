//! DOM Events
//!
//! Event objects, listener registration and bubbling dispatch.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::{DomTree, NodeId};

/// Event type identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventType {
    Click,
    Change,
    Input,
    Submit,
    Custom(String),
}

impl EventType {
    /// Parse an event name (`"click"`, `"my-lib:ready"`, ...)
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "click" => Self::Click,
            "change" => Self::Change,
            "input" => Self::Input,
            "submit" => Self::Submit,
            other => Self::Custom(other.to_string()),
        }
    }

    /// Event name as used by `addEventListener`
    pub fn as_str(&self) -> &str {
        match self {
            Self::Click => "click",
            Self::Change => "change",
            Self::Input => "input",
            Self::Submit => "submit",
            Self::Custom(name) => name,
        }
    }

    /// Whether events of this type carry a default action that can be prevented
    pub fn is_cancelable(&self) -> bool {
        matches!(self, Self::Click | Self::Submit)
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// DOM event
#[derive(Debug, Clone)]
pub struct Event {
    pub event_type: EventType,
    pub target: NodeId,
    pub current_target: Option<NodeId>,
    pub bubbles: bool,
    pub cancelable: bool,
    /// `CustomEvent.detail`
    pub detail: Option<serde_json::Value>,
    default_prevented: bool,
    propagation_stopped: bool,
}

impl Event {
    /// A user-interaction event (click, change, submit, ...)
    pub fn new(event_type: EventType, target: NodeId) -> Self {
        let cancelable = event_type.is_cancelable();
        Self {
            event_type,
            target,
            current_target: None,
            bubbles: true,
            cancelable,
            detail: None,
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    /// A bubbling, non-cancelable custom event with a detail payload
    pub fn custom(name: &str, target: NodeId, detail: serde_json::Value) -> Self {
        Self {
            event_type: EventType::Custom(name.to_string()),
            target,
            current_target: None,
            bubbles: true,
            cancelable: false,
            detail: Some(detail),
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    /// Prevent default action
    pub fn prevent_default(&mut self) {
        if self.cancelable {
            self.default_prevented = true;
        }
    }

    /// Stop propagation
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Check if default was prevented
    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}

/// Event listener callback
pub type Listener = Rc<dyn Fn(&mut Event)>;

/// Handle returned by registration, needed to remove the listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Listener table keyed by (target, event type)
#[derive(Default)]
pub struct EventListeners {
    handlers: HashMap<(NodeId, EventType), Vec<(ListenerId, Listener)>>,
    next_id: u64,
}

impl fmt::Debug for EventListeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventListeners")
            .field("targets", &self.handlers.len())
            .field("listeners", &self.len())
            .finish()
    }
}

impl EventListeners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener
    pub fn add(&mut self, target: NodeId, event_type: EventType, listener: Listener) -> ListenerId {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.handlers
            .entry((target, event_type))
            .or_default()
            .push((id, listener));
        id
    }

    /// Remove a listener; returns false when it was not registered
    pub fn remove(&mut self, target: NodeId, event_type: &EventType, id: ListenerId) -> bool {
        let key = (target, event_type.clone());
        let Some(listeners) = self.handlers.get_mut(&key) else {
            return false;
        };
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        let removed = listeners.len() < before;
        if listeners.is_empty() {
            self.handlers.remove(&key);
        }
        removed
    }

    /// Snapshot of the listeners for a target and type
    pub fn get(&self, target: NodeId, event_type: &EventType) -> Vec<Listener> {
        self.handlers
            .get(&(target, event_type.clone()))
            .map(|v| v.iter().map(|(_, l)| Rc::clone(l)).collect())
            .unwrap_or_default()
    }

    /// Total number of registered listeners
    pub fn len(&self) -> usize {
        self.handlers.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Number of listeners registered on one target
    pub fn count_for(&self, target: NodeId) -> usize {
        self.handlers
            .iter()
            .filter(|((t, _), _)| *t == target)
            .map(|(_, v)| v.len())
            .sum()
    }
}

/// Target first, then ancestors when the event bubbles
pub(crate) fn propagation_path(tree: &DomTree, event: &Event) -> Vec<NodeId> {
    let mut path = vec![event.target];
    if event.bubbles {
        path.extend(tree.ancestors(event.target));
    }
    path
}
