//! HTML5 Parser implementation
//!
//! Uses html5ever's RcDom and converts it into the splice-dom arena.

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};
use splice_dom::{Document, DomTree, ElementData, NodeId};

/// HTML5 parser
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlParser;

impl HtmlParser {
    /// Create a new HTML parser
    pub fn new() -> Self {
        Self
    }

    /// Parse an HTML string into a Document.
    ///
    /// Fragments are wrapped in `html`/`head`/`body` the way browsers do, so
    /// a server-rendered section lands inside `body`.
    pub fn parse(&self, html: &str) -> Document {
        let dom = parse_document(RcDom::default(), Default::default()).one(html);

        let mut document = Document::empty();
        let root = document.tree().root();
        convert_node(&dom.document, document.tree_mut(), root);

        tracing::debug!(nodes = document.tree().len(), "parsed html");
        document
    }
}

/// Convert an RcDom node (and its subtree) into `tree` under `parent`
fn convert_node(handle: &Handle, tree: &mut DomTree, parent: NodeId) {
    let id = match &handle.data {
        RcNodeData::Document => {
            for child in handle.children.borrow().iter() {
                convert_node(child, tree, parent);
            }
            return;
        }
        RcNodeData::Doctype { name, .. } => tree.create_doctype(name),
        RcNodeData::Text { contents } => {
            let text = contents.borrow();
            if text.trim().is_empty() && !in_content(tree, parent) {
                return;
            }
            tree.create_text(&text)
        }
        RcNodeData::Comment { contents } => tree.create_comment(contents),
        RcNodeData::Element { name, attrs, .. } => {
            let mut element = ElementData::new(&name.local);
            for attr in attrs.borrow().iter() {
                element.set_attr(&attr.name.local, attr.value.to_string());
            }
            tree.create_element_with(element)
        }
        RcNodeData::ProcessingInstruction { .. } => return,
    };

    if let Err(e) = tree.append_child(parent, id) {
        tracing::warn!("dropping node from parse tree: {e}");
        return;
    }
    for child in handle.children.borrow().iter() {
        convert_node(child, tree, id);
    }
}

/// Whitespace between `html`, `head` and `body` is formatting; anywhere
/// else it is content and is kept.
fn in_content(tree: &DomTree, parent: NodeId) -> bool {
    tree.element(parent)
        .is_some_and(|element| !matches!(element.tag(), "html" | "head"))
}
