//! Document - High-level document API

use crate::selector::Selector;
use crate::{DomTree, NodeId, SelectorError};

/// HTML Document
#[derive(Debug, Clone, Default)]
pub struct Document {
    /// The DOM tree
    pub tree: DomTree,
}

impl Document {
    /// Create a document with an `html`/`head`/`body` skeleton
    pub fn new() -> Self {
        let mut tree = DomTree::new();
        let html = tree.create_element("html");
        let head = tree.create_element("head");
        let body = tree.create_element("body");
        // Fresh detached nodes; insertion cannot fail.
        let _ = tree.append_child(tree.root(), html);
        let _ = tree.append_child(html, head);
        let _ = tree.append_child(html, body);
        Self { tree }
    }

    /// Create an empty document (document node only)
    pub fn empty() -> Self {
        Self {
            tree: DomTree::new(),
        }
    }

    /// Wrap an existing tree
    pub fn from_tree(tree: DomTree) -> Self {
        Self { tree }
    }

    /// Access the DOM tree
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Access the DOM tree mutably
    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }

    /// Get `<html>` element
    pub fn document_element(&self) -> Option<NodeId> {
        self.child_by_tag(self.tree.root(), "html")
    }

    /// Get `<head>` element
    pub fn head(&self) -> Option<NodeId> {
        self.child_by_tag(self.document_element()?, "head")
    }

    /// Get `<body>` element
    pub fn body(&self) -> Option<NodeId> {
        self.child_by_tag(self.document_element()?, "body")
    }

    fn child_by_tag(&self, parent: NodeId, tag: &str) -> Option<NodeId> {
        self.tree
            .children(parent)
            .find(|(_, node)| node.as_element().is_some_and(|e| e.tag() == tag))
            .map(|(id, _)| id)
    }

    fn title_element(&self) -> Option<NodeId> {
        let head = self.head()?;
        self.tree
            .descendants(head)
            .into_iter()
            .find(|&id| self.tree.element(id).is_some_and(|e| e.tag() == "title"))
    }

    /// Get document title
    pub fn title(&self) -> String {
        self.title_element()
            .map(|id| self.tree.text_content(id).trim().to_string())
            .unwrap_or_default()
    }

    /// Set document title, creating `<title>` in `<head>` when missing
    pub fn set_title(&mut self, title: &str) {
        let element = match self.title_element() {
            Some(id) => id,
            None => {
                let Some(head) = self.head() else {
                    tracing::warn!("document has no <head>; title not set");
                    return;
                };
                let id = self.tree.create_element("title");
                let _ = self.tree.append_child(head, id);
                id
            }
        };
        let _ = self.tree.set_text_content(element, title);
    }

    /// Get element by ID (connected elements only)
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.tree
            .descendants(self.tree.root())
            .into_iter()
            .find(|&node| self.tree.element(node).and_then(|e| e.id()) == Some(id))
    }

    /// First descendant of `scope` matching `selector`
    pub fn query_selector(&self, scope: NodeId, selector: &str) -> Result<Option<NodeId>, SelectorError> {
        let selector = Selector::parse(selector)?;
        Ok(self
            .tree
            .descendants(scope)
            .into_iter()
            .find(|&id| selector.matches(&self.tree, id)))
    }

    /// All descendants of `scope` matching `selector`, in document order
    pub fn query_selector_all(&self, scope: NodeId, selector: &str) -> Result<Vec<NodeId>, SelectorError> {
        let selector = Selector::parse(selector)?;
        Ok(self
            .tree
            .descendants(scope)
            .into_iter()
            .filter(|&id| selector.matches(&self.tree, id))
            .collect())
    }

    /// Check if an element matches `selector`
    pub fn matches(&self, element: NodeId, selector: &str) -> Result<bool, SelectorError> {
        Ok(Selector::parse(selector)?.matches(&self.tree, element))
    }

    /// Nearest inclusive ancestor matching `selector`
    pub fn closest(&self, element: NodeId, selector: &str) -> Result<Option<NodeId>, SelectorError> {
        let selector = Selector::parse(selector)?;
        Ok(std::iter::once(element)
            .chain(self.tree.ancestors(element))
            .find(|&id| selector.matches(&self.tree, id)))
    }
}
