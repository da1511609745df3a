//! Splice HTML
//!
//! HTML5 parsing built on html5ever, converted into the splice-dom arena,
//! plus serialization back to markup.

mod parser;
mod serializer;

pub use parser::HtmlParser;
pub use serializer::{inner_html, outer_html};

use splice_dom::Document;

/// Parse an HTML string into a Document
pub fn parse(html: &str) -> Document {
    HtmlParser::new().parse(html)
}
