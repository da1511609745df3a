//! Section renderer
//!
//! The `<section-renderer>` component. [`SectionRenderer::attach`] discovers
//! triggers and wires them up; every activation then runs
//! resolve, fetch, patch and history on the environment's executor.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use splice_dom::{DomError, Event, NodeId};

use crate::activator::IntersectionActivator;
use crate::binder::{self, EventBinder};
use crate::config::{RendererConfig, TriggerConfig};
use crate::debounce::Debouncer;
use crate::env::RenderEnv;
use crate::error::RenderError;
use crate::fetch::{fetch_sections, render_url};
use crate::lifecycle::{
    LoadingIndicator, Lifecycle, EVENT_DESTROYING, EVENT_INITIALIZED,
};
use crate::patcher;
use crate::registry::{self, TriggerSet};
use crate::resolver::{self, ResolvedBatch};

/// Handle to one renderer instance
#[derive(Debug, Clone)]
pub struct SectionRenderer {
    inner: Rc<Inner>,
}

#[derive(Debug)]
struct Inner {
    env: RenderEnv,
    host: NodeId,
    config: RendererConfig,
    lifecycle: Rc<Lifecycle>,
    debouncer: Debouncer,
    state: RefCell<State>,
}

#[derive(Debug, Default)]
struct State {
    attached: bool,
    triggers: TriggerSet,
    binder: EventBinder,
    activator: Option<IntersectionActivator>,
}

impl SectionRenderer {
    /// Read the host's configuration; nothing is bound until [`attach`](Self::attach)
    pub fn new(env: RenderEnv, host: NodeId) -> Result<Self, RenderError> {
        let config = {
            let document = env.window.document();
            let element = document
                .tree()
                .element(host)
                .ok_or(DomError::NotFound(host))?;
            RendererConfig::from_element(element)
        };
        let lifecycle = Rc::new(Lifecycle::new(Rc::clone(&env.window), host, config.id.clone()));

        Ok(Self {
            inner: Rc::new(Inner {
                debouncer: Debouncer::new(config.debounce),
                env,
                host,
                config,
                lifecycle,
                state: RefCell::new(State::default()),
            }),
        })
    }

    pub fn id(&self) -> &str {
        &self.inner.config.id
    }

    pub fn host(&self) -> NodeId {
        self.inner.host
    }

    pub fn config(&self) -> &RendererConfig {
        &self.inner.config
    }

    pub fn is_attached(&self) -> bool {
        self.inner.state.borrow().attached
    }

    /// Whether any activation is in flight
    pub fn is_loading(&self) -> bool {
        self.inner.lifecycle.is_loading()
    }

    /// Number of activations between `render-started` and `render-ended`
    pub fn in_flight(&self) -> usize {
        self.inner.lifecycle.in_flight()
    }

    /// Loading indicator element found at attach
    pub fn loading_indicator(&self) -> Option<NodeId> {
        self.inner.lifecycle.indicator().element()
    }

    /// Triggers found by the last successful attach
    pub fn triggers(&self) -> TriggerSet {
        self.inner.state.borrow().triggers.clone()
    }

    /// Listeners currently registered on triggers
    pub fn binding_count(&self) -> usize {
        self.inner.state.borrow().binder.len()
    }

    /// Discover triggers, bind listeners, start observing lazy triggers,
    /// emit `initialized` and run explicit-init triggers.
    ///
    /// Attaching an attached renderer does nothing. With no triggers the
    /// renderer stays inert and [`RenderError::NoTriggers`] is returned.
    pub fn attach(&self) -> Result<(), RenderError> {
        let inner = &self.inner;
        if inner.state.borrow().attached {
            tracing::debug!(id = %inner.config.id, "already attached");
            return Ok(());
        }

        let search_root = inner.search_root();
        let triggers = registry::discover(&inner.env.window.document(), inner.host, inner.config.scoped);
        if triggers.is_empty() {
            let error = RenderError::NoTriggers {
                id: inner.config.id.clone(),
            };
            tracing::warn!(id = %inner.config.id, "{error}");
            return Err(error);
        }

        let indicator = LoadingIndicator::discover(&mut inner.env.window.document_mut(), search_root, &inner.config);
        inner.lifecycle.set_indicator(indicator);

        let mut listeners = EventBinder::new();
        for &trigger in &triggers.immediate {
            let event_type = match inner.env.window.document().tree().element(trigger) {
                Some(element) => binder::event_for(element),
                None => continue,
            };
            let weak = Rc::downgrade(inner);
            listeners.bind(
                &inner.env.window,
                trigger,
                event_type,
                Rc::new(move |event: &mut Event| {
                    event.prevent_default();
                    if let Some(inner) = weak.upgrade() {
                        inner.schedule(trigger);
                    }
                }),
            );
        }

        let activator = (!triggers.intersecting.is_empty()).then(|| {
            let weak = Rc::downgrade(inner);
            IntersectionActivator::start(
                &inner.env.window,
                inner.config.intersection_margin,
                inner.config.intersection_threshold,
                &triggers.intersecting,
                Rc::new(move |trigger| {
                    if let Some(inner) = weak.upgrade() {
                        Inner::spawn_activation(inner, trigger);
                    }
                }),
            )
        });

        let deferred = triggers.deferred.clone();
        {
            let mut state = inner.state.borrow_mut();
            state.attached = true;
            state.triggers = triggers;
            state.binder = listeners;
            state.activator = activator;
        }

        tracing::debug!(id = %inner.config.id, "attached");
        inner.lifecycle.emit(EVENT_INITIALIZED);

        for trigger in deferred {
            Inner::spawn_activation(Rc::clone(inner), trigger);
        }
        Ok(())
    }

    /// Emit `destroying`, then remove listeners, stop observing and cancel the
    /// pending debounce. Activations already fetching run to completion.
    /// Detaching twice, or from a `destroying` listener, is harmless.
    pub fn detach(&self) {
        let inner = &self.inner;
        let (mut listeners, activator) = {
            let mut state = inner.state.borrow_mut();
            if !state.attached {
                return;
            }
            state.attached = false;
            state.triggers = TriggerSet::default();
            (std::mem::take(&mut state.binder), state.activator.take())
        };
        inner.lifecycle.emit(EVENT_DESTROYING);

        let removed = listeners.unbind_all(&inner.env.window);
        if let Some(activator) = activator {
            activator.stop(&inner.env.window);
        }
        inner.debouncer.cancel();
        tracing::debug!(id = %inner.config.id, listeners = removed, "detached");
    }

    /// Schedule an activation through the debounce gate, as a trigger event does
    pub fn schedule(&self, trigger: NodeId) {
        self.inner.schedule(trigger);
    }

    /// Run one activation for `trigger` now, bypassing the debounce gate.
    /// Failures are also reported through `render-error`.
    pub async fn render(&self, trigger: NodeId) -> Result<(), RenderError> {
        Inner::activate(Rc::clone(&self.inner), trigger).await
    }
}

impl Inner {
    fn search_root(&self) -> NodeId {
        registry::search_root(self.host, self.config.scoped)
    }

    fn schedule(self: &Rc<Self>, trigger: NodeId) {
        let weak: Weak<Inner> = Rc::downgrade(self);
        self.debouncer.schedule(&self.env.executor, move || {
            if let Some(inner) = weak.upgrade() {
                Inner::spawn_activation(inner, trigger);
            }
        });
    }

    /// Run an activation as its own task so later debounce calls cannot
    /// cancel it
    fn spawn_activation(self: Rc<Self>, trigger: NodeId) {
        let executor = Rc::clone(&self.env.executor);
        executor
            .spawn(async move {
                let _ = Inner::activate(self, trigger).await;
            })
            .detach();
    }

    async fn activate(self: Rc<Self>, trigger: NodeId) -> Result<(), RenderError> {
        let prepared = self.prepare(trigger);
        let (trigger_config, batch, url) = match prepared {
            Ok(prepared) => prepared,
            Err(error) => {
                self.report(&error);
                return Err(error);
            }
        };

        let _guard = self.lifecycle.begin();
        let result = self.fetch_and_patch(&batch, url).await;
        match &result {
            Ok(()) => self.lifecycle.apply_history(&trigger_config, &self.config),
            Err(error) => self.report(error),
        }
        result
    }

    fn prepare(&self, trigger: NodeId) -> Result<(TriggerConfig, ResolvedBatch, splice_net::Url), RenderError> {
        let document = self.env.window.document();
        let element = document
            .tree()
            .element(trigger)
            .ok_or(DomError::NotFound(trigger))?;
        let trigger_config = TriggerConfig::from_element(element);
        let batch = resolver::resolve(&document, trigger, &trigger_config, self.env.context.as_ref())?;
        drop(document);

        let render_override = trigger_config
            .render_url
            .as_deref()
            .or(self.config.render_url.as_deref());
        let url = render_url(&self.env.window.location(), render_override, &batch.sections)?;
        Ok((trigger_config, batch, url))
    }

    async fn fetch_and_patch(&self, batch: &ResolvedBatch, url: splice_net::Url) -> Result<(), RenderError> {
        let source = Rc::clone(&self.env.source);
        let response = fetch_sections(source.as_ref(), url, self.config.timeout).await?;

        let mut document = self.env.window.document_mut();
        patcher::apply(&mut document, self.search_root(), &response, &batch.updates)?;
        Ok(())
    }

    fn report(&self, error: &RenderError) {
        tracing::error!(id = %self.config.id, kind = %error.kind(), "render failed: {error}");
        self.lifecycle.emit_error(error);
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        let state = self.state.get_mut();
        state.binder.unbind_all(&self.env.window);
        if let Some(activator) = state.activator.take() {
            activator.stop(&self.env.window);
        }
    }
}
