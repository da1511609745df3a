//! HTML serialization
//!
//! Markup output for a subtree, following the HTML fragment serialization
//! rules for void elements, raw text elements and escaping.

use splice_dom::{DomTree, NodeData, NodeId};

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "xmp", "iframe", "noembed", "noframes", "plaintext"];

/// Serialize a node including its own tag
pub fn outer_html(tree: &DomTree, node: NodeId) -> String {
    let mut out = String::new();
    write_node(tree, node, false, &mut out);
    out
}

/// Serialize the children of a node
pub fn inner_html(tree: &DomTree, node: NodeId) -> String {
    let raw = tree
        .element(node)
        .is_some_and(|e| RAW_TEXT_ELEMENTS.contains(&e.tag()));
    let mut out = String::new();
    for (child, _) in tree.children(node) {
        write_node(tree, child, raw, &mut out);
    }
    out
}

fn write_node(tree: &DomTree, node: NodeId, raw_text: bool, out: &mut String) {
    let Some(data) = tree.get(node).map(|n| &n.data) else {
        return;
    };
    match data {
        NodeData::Document => {
            for (child, _) in tree.children(node) {
                write_node(tree, child, false, out);
            }
        }
        NodeData::Doctype { name } => {
            out.push_str("<!DOCTYPE ");
            out.push_str(name);
            out.push('>');
        }
        NodeData::Text(text) if raw_text => out.push_str(text),
        NodeData::Text(text) => escape(text, false, out),
        NodeData::Comment(text) => {
            out.push_str("<!--");
            out.push_str(text);
            out.push_str("-->");
        }
        NodeData::Element(element) => {
            let tag = element.tag();
            out.push('<');
            out.push_str(tag);
            for attr in &element.attrs {
                out.push(' ');
                out.push_str(&attr.name);
                out.push_str("=\"");
                escape(&attr.value, true, out);
                out.push('"');
            }
            out.push('>');
            if VOID_ELEMENTS.contains(&tag) {
                return;
            }
            out.push_str(&inner_html(tree, node));
            out.push_str("</");
            out.push_str(tag);
            out.push('>');
        }
    }
}

fn escape(text: &str, attribute: bool, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            '"' if attribute => out.push_str("&quot;"),
            '<' if !attribute => out.push_str("&lt;"),
            '>' if !attribute => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HtmlParser;

    #[test]
    fn test_outer_html_escapes() {
        let doc = HtmlParser::new().parse(r#"<p title="a &quot;b&quot;">x &lt; y</p>"#);
        let p = doc.query_selector(doc.tree().root(), "p").unwrap().unwrap();

        assert_eq!(outer_html(doc.tree(), p), r#"<p title="a &quot;b&quot;">x &lt; y</p>"#);
    }

    #[test]
    fn test_void_elements_have_no_end_tag() {
        let doc = HtmlParser::new().parse(r#"<div><img src="a.png"><br></div>"#);
        let div = doc.query_selector(doc.tree().root(), "div").unwrap().unwrap();

        assert_eq!(inner_html(doc.tree(), div), r#"<img src="a.png"><br>"#);
    }

    #[test]
    fn test_script_text_not_escaped() {
        let doc = HtmlParser::new().parse("<script>if (a < b) {}</script>");
        let script = doc.query_selector(doc.tree().root(), "script").unwrap().unwrap();

        assert_eq!(inner_html(doc.tree(), script), "if (a < b) {}");
    }
}
