//! Splice DOM - Document Object Model
//!
//! Arena-based DOM tree plus the host services a page component needs:
//! selector queries, event dispatch, session history and intersection
//! observers, tied together by [`Window`].

mod node;
mod tree;
mod document;
mod selector;
mod events;
mod history;
mod intersection;
mod window;

pub use node::{Attribute, ElementData, Node, NodeData};
pub use tree::{DomError, DomResult, DomTree};
pub use document::Document;
pub use selector::{Selector, SelectorError};
pub use events::{Event, EventListeners, EventType, Listener, ListenerId};
pub use history::{History, HistoryEntry};
pub use intersection::{
    IntersectionCallback, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverOptions, ObserverId, Rect,
};
pub use window::Window;

/// Node identifier (index into the tree arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// The document node of every tree
    pub const ROOT: NodeId = NodeId(0);

    /// Sentinel for a missing link
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check that this id points at a node
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    /// Raw arena index
    pub fn index(self) -> usize {
        self.0 as usize
    }
}
