//! Trigger discovery

use splice_dom::{Document, NodeId};

use crate::attributes::{MARKER_INIT, MARKER_LAZY, MARKER_TRIGGER};

/// Triggers found in a scope, grouped by how they activate
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TriggerSet {
    /// Bound to an interaction event
    pub immediate: Vec<NodeId>,
    /// Activated once, right after initialization
    pub deferred: Vec<NodeId>,
    /// Activated when scrolled into view
    pub intersecting: Vec<NodeId>,
}

impl TriggerSet {
    pub fn is_empty(&self) -> bool {
        self.immediate.is_empty() && self.deferred.is_empty() && self.intersecting.is_empty()
    }

    pub fn len(&self) -> usize {
        self.immediate.len() + self.deferred.len() + self.intersecting.len()
    }
}

/// Node that scoped lookups start from
pub fn search_root(host: NodeId, scoped: bool) -> NodeId {
    if scoped { host } else { NodeId::ROOT }
}

/// Scan for marked triggers in document order
pub fn discover(document: &Document, host: NodeId, scoped: bool) -> TriggerSet {
    let tree = document.tree();
    let mut set = TriggerSet::default();

    for node in tree.descendants(search_root(host, scoped)) {
        let Some(element) = tree.element(node) else {
            continue;
        };
        if element.has_attr(MARKER_TRIGGER) {
            set.immediate.push(node);
        }
        if element.has_attr(MARKER_INIT) {
            set.deferred.push(node);
        }
        if element.has_attr(MARKER_LAZY) {
            set.intersecting.push(node);
        }
    }

    tracing::debug!(
        immediate = set.immediate.len(),
        deferred = set.deferred.len(),
        intersecting = set.intersecting.len(),
        "discovered triggers"
    );
    set
}
