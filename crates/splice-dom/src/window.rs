//! Window - host services for one page
//!
//! Owns the document, the listener table, session history and the
//! intersection observers. Everything sits behind `RefCell` so listeners
//! and observer callbacks can re-enter the window while being dispatched;
//! no borrow is held across a callback.

use std::cell::{Ref, RefCell, RefMut};
use std::collections::HashMap;

use url::Url;

use crate::events::propagation_path;
use crate::intersection::IntersectionObservers;
use crate::{
    Document, Event, EventListeners, EventType, History, IntersectionCallback,
    IntersectionObserverOptions, Listener, ListenerId, NodeId, ObserverId, Rect,
};

/// Browsing context of a single document
#[derive(Debug)]
pub struct Window {
    document: RefCell<Document>,
    listeners: RefCell<EventListeners>,
    history: RefCell<History>,
    observers: RefCell<IntersectionObservers>,
}

impl Window {
    pub fn new(document: Document, location: Url) -> Self {
        Self {
            document: RefCell::new(document),
            listeners: RefCell::new(EventListeners::new()),
            history: RefCell::new(History::new(location)),
            observers: RefCell::new(IntersectionObservers::default()),
        }
    }

    /// Borrow the document
    pub fn document(&self) -> Ref<'_, Document> {
        self.document.borrow()
    }

    /// Borrow the document mutably
    pub fn document_mut(&self) -> RefMut<'_, Document> {
        self.document.borrow_mut()
    }

    /// Current location
    pub fn location(&self) -> Url {
        self.history.borrow().current().url.clone()
    }

    pub fn history(&self) -> Ref<'_, History> {
        self.history.borrow()
    }

    pub fn push_state(&self, url: Url) {
        let title = self.document.borrow().title();
        self.history.borrow_mut().push_state(None, &title, url);
        tracing::debug!(location = %self.location(), "history push");
    }

    pub fn replace_state(&self, url: Url) {
        let title = self.document.borrow().title();
        self.history.borrow_mut().replace_state(None, &title, url);
        tracing::debug!(location = %self.location(), "history replace");
    }

    // ==== Events ====

    pub fn add_event_listener(&self, target: NodeId, event_type: EventType, listener: Listener) -> ListenerId {
        self.listeners.borrow_mut().add(target, event_type, listener)
    }

    pub fn remove_event_listener(&self, target: NodeId, event_type: &EventType, id: ListenerId) -> bool {
        self.listeners.borrow_mut().remove(target, event_type, id)
    }

    /// Total registered listeners
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Listeners registered on one node
    pub fn listener_count_for(&self, target: NodeId) -> usize {
        self.listeners.borrow().count_for(target)
    }

    /// Dispatch an event along its propagation path and return it, so the
    /// caller can inspect `is_default_prevented`.
    pub fn dispatch_event(&self, mut event: Event) -> Event {
        let path = propagation_path(&self.document.borrow().tree, &event);

        for node in path {
            let handlers = self.listeners.borrow().get(node, &event.event_type);
            if handlers.is_empty() {
                continue;
            }
            event.current_target = Some(node);
            for handler in handlers {
                handler(&mut event);
            }
            if event.is_propagation_stopped() {
                break;
            }
        }

        event.current_target = None;
        event
    }

    // ==== Intersection observers ====

    pub fn create_intersection_observer(
        &self,
        options: IntersectionObserverOptions,
        callback: IntersectionCallback,
    ) -> ObserverId {
        self.observers.borrow_mut().create(options, callback)
    }

    /// Start observing `target`; returns false for an unknown observer
    pub fn observe(&self, observer: ObserverId, target: NodeId) -> bool {
        match self.observers.borrow_mut().get_mut(observer) {
            Some(obs) => {
                obs.observe(target);
                true
            }
            None => false,
        }
    }

    pub fn unobserve(&self, observer: ObserverId, target: NodeId) {
        if let Some(obs) = self.observers.borrow_mut().get_mut(observer) {
            obs.unobserve(target);
        }
    }

    /// Whether `observer` is currently watching `target`
    pub fn is_observing(&self, observer: ObserverId, target: NodeId) -> bool {
        self.observers
            .borrow()
            .get(observer)
            .is_some_and(|obs| obs.is_observing(target))
    }

    /// Drop an observer and all its targets
    pub fn disconnect_observer(&self, observer: ObserverId) -> bool {
        self.observers.borrow_mut().remove(observer)
    }

    pub fn observer_count(&self) -> usize {
        self.observers.borrow().len()
    }

    /// Feed a layout pass to every observer and run the callbacks that have
    /// entries.
    pub fn update_layout(&self, viewport: Rect, element_rects: &HashMap<NodeId, Rect>) {
        let pending = self.observers.borrow_mut().process(viewport, element_rects);
        for (id, callback, entries) in pending {
            callback(id, &entries);
        }
    }
}
