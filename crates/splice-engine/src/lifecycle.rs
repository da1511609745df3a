//! Lifecycle events, loading indicator and history
//!
//! Every activation that reaches the network emits `render-started`, and its
//! [`LoadingGuard`] emits `render-ended` when dropped, whatever the outcome.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde_json::json;
use splice_dom::{Document, Event, NodeId, Window};

use crate::attributes::MARKER_CLOAK;
use crate::config::{HistoryMode, RendererConfig, TriggerConfig};
use crate::error::RenderError;

pub const EVENT_INITIALIZED: &str = "section-renderer:initialized";
pub const EVENT_RENDER_STARTED: &str = "section-renderer:render-started";
pub const EVENT_RENDER_ENDED: &str = "section-renderer:render-ended";
pub const EVENT_RENDER_ERROR: &str = "section-renderer:render-error";
pub const EVENT_DESTROYING: &str = "section-renderer:destroying";

/// Element shown while activations are in flight
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadingIndicator {
    element: Option<NodeId>,
    /// Toggled when set, otherwise inline `display` is used
    class: Option<String>,
}

impl LoadingIndicator {
    /// Find the indicator, drop its cloak marker and put it in the idle state
    pub fn discover(document: &mut Document, search_root: NodeId, config: &RendererConfig) -> Self {
        let Some(selector) = config.loading_selector.as_deref() else {
            return Self::default();
        };
        let element = match document.query_selector(search_root, selector) {
            Ok(Some(element)) => element,
            Ok(None) => {
                tracing::warn!(selector, "loading indicator not found");
                return Self::default();
            }
            Err(e) => {
                tracing::warn!("invalid loading selector: {e}");
                return Self::default();
            }
        };

        if let Some(data) = document.tree_mut().element_mut(element) {
            data.remove_attr(MARKER_CLOAK);
        }
        let indicator = Self {
            element: Some(element),
            class: config.loading_class.clone(),
        };
        indicator.show(document, false);
        indicator
    }

    pub fn element(&self) -> Option<NodeId> {
        self.element
    }

    pub fn show(&self, document: &mut Document, loading: bool) {
        let Some(element) = self.element else {
            return;
        };
        let Some(data) = document.tree_mut().element_mut(element) else {
            return;
        };
        match &self.class {
            Some(class) => {
                data.toggle_class(class, loading);
            }
            None => data.set_style_property("display", (!loading).then_some("none")),
        }
    }
}

/// Event emission and loading bookkeeping for one renderer
#[derive(Debug)]
pub struct Lifecycle {
    window: Rc<Window>,
    host: NodeId,
    id: String,
    indicator: RefCell<LoadingIndicator>,
    in_flight: Cell<usize>,
}

impl Lifecycle {
    pub fn new(window: Rc<Window>, host: NodeId, id: String) -> Self {
        Self {
            window,
            host,
            id,
            indicator: RefCell::new(LoadingIndicator::default()),
            in_flight: Cell::new(0),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn set_indicator(&self, indicator: LoadingIndicator) {
        self.indicator.replace(indicator);
    }

    pub fn indicator(&self) -> LoadingIndicator {
        self.indicator.borrow().clone()
    }

    /// Whether any activation is in flight
    pub fn is_loading(&self) -> bool {
        self.in_flight.get() > 0
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.get()
    }

    /// Dispatch a lifecycle event on the host
    pub fn emit(&self, name: &str) {
        tracing::debug!(id = %self.id, event = name, "lifecycle event");
        self.window
            .dispatch_event(Event::custom(name, self.host, json!({ "id": self.id })));
    }

    pub fn emit_error(&self, error: &RenderError) {
        let detail = json!({
            "id": self.id,
            "error": error.to_string(),
            "kind": error.kind().as_str(),
        });
        self.window
            .dispatch_event(Event::custom(EVENT_RENDER_ERROR, self.host, detail));
    }

    /// Enter the loading state and emit `render-started`
    pub fn begin(self: &Rc<Self>) -> LoadingGuard {
        let previous = self.in_flight.replace(self.in_flight.get() + 1);
        if previous == 0 {
            self.set_loading(true);
        }
        self.emit(EVENT_RENDER_STARTED);
        LoadingGuard {
            lifecycle: Rc::clone(self),
        }
    }

    fn end(&self) {
        let remaining = self.in_flight.get().saturating_sub(1);
        self.in_flight.set(remaining);
        if remaining == 0 {
            self.set_loading(false);
        }
        self.emit(EVENT_RENDER_ENDED);
    }

    fn set_loading(&self, loading: bool) {
        let indicator = self.indicator.borrow();
        indicator.show(&mut self.window.document_mut(), loading);
    }

    /// Mirror a successful activation into the title and session history
    pub fn apply_history(&self, trigger: &TriggerConfig, config: &RendererConfig) {
        if let Some(title) = trigger.update_title.as_deref().or(config.update_title.as_deref()) {
            self.window.document_mut().set_title(title);
        }

        let Some(update_url) = trigger.update_url.as_deref().or(config.update_url.as_deref()) else {
            return;
        };
        if config.history == HistoryMode::Off {
            return;
        }
        let url = match self.window.location().join(update_url) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!(update_url, "not updating history: {e}");
                return;
            }
        };
        match config.history {
            HistoryMode::Push => self.window.push_state(url),
            HistoryMode::Replace => self.window.replace_state(url),
            HistoryMode::Off => {}
        }
    }
}

/// Leaves the loading state and emits `render-ended` on drop
#[derive(Debug)]
pub struct LoadingGuard {
    lifecycle: Rc<Lifecycle>,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.lifecycle.end();
    }
}
