//! Shared harness for renderer integration tests

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::future::Future;
use std::rc::Rc;
use std::time::Duration;

use smol::{LocalExecutor, Timer};
use splice_dom::{Event, EventType, NodeId, Rect, Window};
use splice_engine::{
    RenderEnv, EVENT_DESTROYING, EVENT_INITIALIZED, EVENT_RENDER_ENDED, EVENT_RENDER_ERROR,
    EVENT_RENDER_STARTED,
};
use splice_net::{FetchFuture, FetchResponse, NetError, SectionSource, Url};

pub const LOCATION: &str = "https://shop.example/collections/all";

/// Canned render endpoint that records every request
pub struct FakeSource {
    body: RefCell<String>,
    /// 0 answers with a transport failure
    status: u16,
    delay: Duration,
    requests: RefCell<Vec<Url>>,
}

impl FakeSource {
    pub fn json(body: &str) -> Self {
        Self {
            body: RefCell::new(body.to_string()),
            status: 200,
            delay: Duration::ZERO,
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn set_body(&self, body: &str) {
        self.body.replace(body.to_string());
    }

    pub fn requests(&self) -> Vec<Url> {
        self.requests.borrow().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }
}

impl SectionSource for FakeSource {
    fn get(&self, url: &Url) -> FetchFuture {
        self.requests.borrow_mut().push(url.clone());
        let (status, delay, body) = (self.status, self.delay, self.body.borrow().clone());
        Box::pin(async move {
            Timer::after(delay).await;
            if status == 0 {
                return Err(NetError::Network("connection refused".into()));
            }
            Ok(FetchResponse {
                status,
                headers: vec![("content-type".into(), "application/json".into())],
                body: body.into_bytes(),
            })
        })
    }
}

/// A parsed page with a renderer environment and an event log
pub struct Page {
    pub env: RenderEnv,
    pub source: Rc<FakeSource>,
    events: Rc<RefCell<Vec<(String, serde_json::Value)>>>,
}

impl Page {
    pub fn new(html: &str, source: FakeSource) -> Self {
        let document = splice_html::parse(html);
        let window = Rc::new(Window::new(document, Url::parse(LOCATION).unwrap()));
        let executor = Rc::new(LocalExecutor::new());
        let source = Rc::new(source);

        let events: Rc<RefCell<Vec<(String, serde_json::Value)>>> = Rc::default();
        for name in [
            EVENT_INITIALIZED,
            EVENT_RENDER_STARTED,
            EVENT_RENDER_ENDED,
            EVENT_RENDER_ERROR,
            EVENT_DESTROYING,
        ] {
            let log = Rc::clone(&events);
            window.add_event_listener(
                NodeId::ROOT,
                EventType::parse(name),
                Rc::new(move |event: &mut Event| {
                    let short = event.event_type.as_str().trim_start_matches("section-renderer:");
                    let detail = event.detail.clone().unwrap_or_default();
                    log.borrow_mut().push((short.to_string(), detail));
                }),
            );
        }

        let env = RenderEnv::new(window, executor, Rc::clone(&source) as Rc<dyn SectionSource>);
        Self { env, source, events }
    }

    pub fn window(&self) -> &Window {
        &self.env.window
    }

    pub fn by_id(&self, id: &str) -> NodeId {
        self.window().document().get_element_by_id(id).unwrap()
    }

    pub fn text(&self, id: &str) -> String {
        let node = self.by_id(id);
        self.window().document().tree().text_content(node)
    }

    pub fn child_texts(&self, id: &str) -> Vec<String> {
        let node = self.by_id(id);
        let doc = self.window().document();
        doc.tree()
            .element_children(node)
            .into_iter()
            .map(|c| doc.tree().text_content(c))
            .collect()
    }

    /// Dispatch a click and report whether the default was prevented
    pub fn click(&self, id: &str) -> bool {
        let target = self.by_id(id);
        self.window()
            .dispatch_event(Event::new(EventType::Click, target))
            .is_default_prevented()
    }

    /// Drive the executor until `future` completes
    pub fn run<F: Future>(&self, future: F) -> F::Output {
        smol::block_on(self.env.executor.run(future))
    }

    /// Let timers and spawned activations progress
    pub fn settle(&self, millis: u64) {
        self.run(Timer::after(Duration::from_millis(millis)));
    }

    /// Report layout and run intersection callbacks
    pub fn layout(&self, rects: &[(&str, Rect)]) {
        let rects: HashMap<NodeId, Rect> = rects.iter().map(|(id, rect)| (self.by_id(id), *rect)).collect();
        self.window().update_layout(Rect::new(0.0, 0.0, 800.0, 600.0), &rects);
    }

    /// Event names with the `section-renderer:` prefix removed
    pub fn events(&self) -> Vec<String> {
        self.events.borrow().iter().map(|(name, _)| name.clone()).collect()
    }

    pub fn last_error(&self) -> Option<serde_json::Value> {
        self.events
            .borrow()
            .iter()
            .rev()
            .find(|(name, _)| name == "render-error")
            .map(|(_, detail)| detail.clone())
    }

    pub fn clear_events(&self) {
        self.events.borrow_mut().clear();
    }
}
