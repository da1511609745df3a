//! Intersection Observer API
//!
//! Observe element visibility against the viewport. The host feeds layout
//! rectangles in through [`crate::Window::update_layout`]; observers report an
//! entry whenever an element crosses one of their thresholds.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::NodeId;

/// Observer handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

/// Intersection observer options
#[derive(Debug, Clone, PartialEq)]
pub struct IntersectionObserverOptions {
    /// Root margin in pixels, grows (or shrinks, when negative) the viewport
    pub root_margin: f32,
    /// Visible fractions (0.0..=1.0) that trigger a notification
    pub thresholds: Vec<f32>,
}

impl Default for IntersectionObserverOptions {
    fn default() -> Self {
        Self {
            root_margin: 0.0,
            thresholds: vec![0.0],
        }
    }
}

/// Intersection observer entry
#[derive(Debug, Clone, PartialEq)]
pub struct IntersectionObserverEntry {
    pub target: NodeId,
    pub bounding_client_rect: Rect,
    pub intersection_rect: Rect,
    pub root_bounds: Rect,
    pub intersection_ratio: f32,
    pub is_intersecting: bool,
}

/// Layout rectangle
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn area(&self) -> f32 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    /// Grow the rect by `margin` on every side
    pub fn inflate(&self, margin: f32) -> Rect {
        Rect {
            x: self.x - margin,
            y: self.y - margin,
            width: (self.width + 2.0 * margin).max(0.0),
            height: (self.height + 2.0 * margin).max(0.0),
        }
    }

    /// Calculate intersection with another rect
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        (right >= x && bottom >= y).then(|| Rect {
            x,
            y,
            width: right - x,
            height: bottom - y,
        })
    }
}

/// Callback invoked with the entries of one layout pass
pub type IntersectionCallback = Rc<dyn Fn(ObserverId, &[IntersectionObserverEntry])>;

/// Intersection observer
#[derive(Debug, Clone)]
pub struct IntersectionObserver {
    id: ObserverId,
    options: IntersectionObserverOptions,
    /// Observed targets with their last reported ratio, in observation order
    observed: Vec<(NodeId, Option<f32>)>,
}

impl IntersectionObserver {
    fn new(id: ObserverId, options: IntersectionObserverOptions) -> Self {
        Self {
            id,
            options,
            observed: Vec::new(),
        }
    }

    pub fn id(&self) -> ObserverId {
        self.id
    }

    pub fn options(&self) -> &IntersectionObserverOptions {
        &self.options
    }

    /// Observe an element; observing twice is a no-op
    pub fn observe(&mut self, target: NodeId) {
        if !self.is_observing(target) {
            self.observed.push((target, None));
        }
    }

    /// Stop observing; idempotent
    pub fn unobserve(&mut self, target: NodeId) {
        self.observed.retain(|(node, _)| *node != target);
    }

    pub fn is_observing(&self, target: NodeId) -> bool {
        self.observed.iter().any(|(node, _)| *node == target)
    }

    /// Number of observed targets
    pub fn len(&self) -> usize {
        self.observed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observed.is_empty()
    }

    /// Compute entries for targets that crossed a threshold since the last pass.
    /// The first pass for a target always reports.
    pub fn check_intersections(
        &mut self,
        viewport: Rect,
        element_rects: &HashMap<NodeId, Rect>,
    ) -> Vec<IntersectionObserverEntry> {
        let root = viewport.inflate(self.options.root_margin);
        let thresholds = &self.options.thresholds;
        let mut entries = Vec::new();

        for (node, last_ratio) in &mut self.observed {
            let Some(rect) = element_rects.get(node) else {
                continue;
            };
            let intersection = rect.intersect(&root);
            let ratio = match intersection {
                Some(i) if rect.area() > 0.0 => (i.area() / rect.area()).clamp(0.0, 1.0),
                Some(_) => 1.0,
                None => 0.0,
            };

            let should_notify = match *last_ratio {
                Some(previous) => thresholds
                    .iter()
                    .any(|&t| passes(previous, t) != passes(ratio, t)),
                None => true,
            };

            if should_notify {
                *last_ratio = Some(ratio);
                entries.push(IntersectionObserverEntry {
                    target: *node,
                    bounding_client_rect: *rect,
                    intersection_rect: intersection.unwrap_or_default(),
                    root_bounds: root,
                    intersection_ratio: ratio,
                    is_intersecting: intersection.is_some() && ratio > 0.0,
                });
            }
        }
        entries
    }
}

/// A zero threshold means "any visible part"
fn passes(ratio: f32, threshold: f32) -> bool {
    if threshold <= 0.0 {
        ratio > 0.0
    } else {
        ratio >= threshold
    }
}

/// All observers of a window with their callbacks
#[derive(Default)]
pub(crate) struct IntersectionObservers {
    observers: Vec<(IntersectionObserver, IntersectionCallback)>,
    next_id: u64,
}

impl fmt::Debug for IntersectionObservers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.observers.iter().map(|(o, _)| o))
            .finish()
    }
}

impl IntersectionObservers {
    pub(crate) fn create(
        &mut self,
        options: IntersectionObserverOptions,
        callback: IntersectionCallback,
    ) -> ObserverId {
        self.next_id += 1;
        let id = ObserverId(self.next_id);
        self.observers.push((IntersectionObserver::new(id, options), callback));
        id
    }

    pub(crate) fn get(&self, id: ObserverId) -> Option<&IntersectionObserver> {
        self.observers.iter().find(|(o, _)| o.id() == id).map(|(o, _)| o)
    }

    pub(crate) fn get_mut(&mut self, id: ObserverId) -> Option<&mut IntersectionObserver> {
        self.observers
            .iter_mut()
            .find(|(o, _)| o.id() == id)
            .map(|(o, _)| o)
    }

    pub(crate) fn remove(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(o, _)| o.id() != id);
        self.observers.len() < before
    }

    pub(crate) fn len(&self) -> usize {
        self.observers.len()
    }

    /// Run every observer; returns the callbacks to invoke with their entries
    pub(crate) fn process(
        &mut self,
        viewport: Rect,
        element_rects: &HashMap<NodeId, Rect>,
    ) -> Vec<(ObserverId, IntersectionCallback, Vec<IntersectionObserverEntry>)> {
        self.observers
            .iter_mut()
            .filter_map(|(observer, callback)| {
                let entries = observer.check_intersections(viewport, element_rects);
                (!entries.is_empty()).then(|| (observer.id(), Rc::clone(callback), entries))
            })
            .collect()
    }
}
