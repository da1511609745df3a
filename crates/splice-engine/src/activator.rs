//! Intersection-based activation
//!
//! One observer per renderer. A trigger activates when it becomes visible
//! past the threshold and is then unobserved unless `data-once="false"`.

use std::rc::Rc;

use splice_dom::{
    IntersectionObserverEntry, IntersectionObserverOptions, NodeId, ObserverId, Window,
};

use crate::attributes::DATA_ONCE;

/// Callback run for each trigger that scrolled into view
pub type ActivateFn = Rc<dyn Fn(NodeId)>;

#[derive(Debug)]
pub struct IntersectionActivator {
    observer: ObserverId,
}

impl IntersectionActivator {
    /// Create the observer and start watching `targets`
    pub fn start(
        window: &Rc<Window>,
        root_margin: f32,
        threshold: f32,
        targets: &[NodeId],
        on_enter: ActivateFn,
    ) -> Self {
        let weak = Rc::downgrade(window);
        let options = IntersectionObserverOptions {
            root_margin,
            thresholds: vec![threshold],
        };

        let observer = window.create_intersection_observer(
            options,
            Rc::new(move |observer: ObserverId, entries: &[IntersectionObserverEntry]| {
                let Some(window) = weak.upgrade() else {
                    return;
                };
                for entry in entries.iter().filter(|e| should_activate(e, threshold)) {
                    on_enter(entry.target);
                    if !repeats(&window, entry.target) {
                        window.unobserve(observer, entry.target);
                    }
                }
            }),
        );

        for &target in targets {
            window.observe(observer, target);
        }
        tracing::debug!(targets = targets.len(), root_margin, threshold, "observing lazy triggers");
        Self { observer }
    }

    pub fn observer(&self) -> ObserverId {
        self.observer
    }

    /// Disconnect the observer
    pub fn stop(self, window: &Window) {
        window.disconnect_observer(self.observer);
    }
}

/// Visible and past the threshold (any visible part for a zero threshold)
pub fn should_activate(entry: &IntersectionObserverEntry, threshold: f32) -> bool {
    entry.is_intersecting
        && if threshold <= 0.0 {
            entry.intersection_ratio > 0.0
        } else {
            entry.intersection_ratio >= threshold
        }
}

fn repeats(window: &Window, target: NodeId) -> bool {
    window
        .document()
        .tree()
        .element(target)
        .and_then(|e| e.get_attr(DATA_ONCE))
        .is_some_and(|v| v.trim().eq_ignore_ascii_case("false"))
}
