//! Edge case tests for splice-net
//!
//! Render URL construction and the source trait.

use std::cell::RefCell;
use std::rc::Rc;

use splice_net::{
    resolve_base, sections_url, FetchFuture, FetchResponse, NetError, SectionSource, Url,
};

// ============================================================================
// URL CONSTRUCTION
// ============================================================================

#[test]
fn test_sections_are_comma_joined_and_encoded() {
    let base = Url::parse("https://shop.example/collections/all").unwrap();
    let url = sections_url(&base, &["a".into(), "b".into()]);
    assert_eq!(url.as_str(), "https://shop.example/collections/all?sections=a%2Cb");
}

#[test]
fn test_empty_identifiers_dropped() {
    let base = Url::parse("https://shop.example/").unwrap();
    let url = sections_url(&base, &["".into(), "  ".into(), "main".into()]);
    assert_eq!(url.query(), Some("sections=main"));
}

#[test]
fn test_fragment_not_sent() {
    let base = Url::parse("https://shop.example/p?x=1#reviews").unwrap();
    let url = sections_url(&base, &["main".into()]);
    assert_eq!(url.fragment(), None);
    assert_eq!(url.query(), Some("x=1&sections=main"));
}

#[test]
fn test_absolute_render_url_overrides_host() {
    let location = Url::parse("https://shop.example/collections/all").unwrap();
    let base = resolve_base(&location, Some("https://cdn.example/render")).unwrap();
    assert_eq!(base.host_str(), Some("cdn.example"));
}

#[test]
fn test_unparsable_render_url() {
    let location = Url::parse("https://shop.example/").unwrap();
    let result = resolve_base(&location, Some("http://[::1"));
    assert!(matches!(result, Err(NetError::InvalidUrl(_))));
}

// ============================================================================
// SOURCE TRAIT
// ============================================================================

struct Recording {
    seen: RefCell<Vec<Url>>,
}

impl SectionSource for Recording {
    fn get(&self, url: &Url) -> FetchFuture {
        self.seen.borrow_mut().push(url.clone());
        Box::pin(async { Ok(FetchResponse::ok_with(r#"{"main":"<div></div>"}"#)) })
    }
}

#[test]
fn test_source_is_object_safe() {
    let recording = Rc::new(Recording { seen: RefCell::new(Vec::new()) });
    let source: Rc<dyn SectionSource> = recording.clone();
    let url = Url::parse("https://shop.example/?sections=main").unwrap();

    let response = smol::block_on(source.get(&url)).unwrap();
    assert!(response.ok());
    assert_eq!(recording.seen.borrow().len(), 1);
}
