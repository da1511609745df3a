//! Renderer integration tests
//!
//! Whole activations against a parsed page and a canned render endpoint.

mod common;

use std::rc::Rc;
use std::time::Duration;

use common::{FakeSource, Page};
use splice_dom::{Event, EventType, Rect};
use splice_engine::{upgrade_all, ErrorKind, RenderError, SectionRenderer, EVENT_DESTROYING};

/// Response body with one `shopify-section-<name>` root per entry
fn sections(entries: &[(&str, &str)]) -> String {
    let map: serde_json::Map<String, serde_json::Value> = entries
        .iter()
        .map(|(name, inner)| {
            let html = format!(r#"<div id="shopify-section-{name}">{inner}</div>"#);
            (name.to_string(), serde_json::Value::String(html))
        })
        .collect();
    serde_json::Value::Object(map).to_string()
}

fn attached(page: &Page, host: &str) -> SectionRenderer {
    let renderer = SectionRenderer::new(page.env.clone(), page.by_id(host)).unwrap();
    renderer.attach().unwrap();
    renderer
}

const PAGINATION: &str = r##"
<section-renderer id="r" debounce="10">
  <a id="next" href="/collections/all?page=2" data-render-trigger
     data-section="grid" data-destination="#grid">Next</a>
  <div id="grid"><p>1</p></div>
</section-renderer>
"##;

// ============================================================================
// LIFECYCLE
// ============================================================================

#[test]
fn test_successful_activation_event_order() {
    let page = Page::new(PAGINATION, FakeSource::json(&sections(&[("grid", "2")])));
    let renderer = attached(&page, "r");

    page.run(renderer.render(page.by_id("next"))).unwrap();

    assert_eq!(page.events(), ["initialized", "render-started", "render-ended"]);
    assert_eq!(page.text("grid"), "2");
    assert!(!renderer.is_loading());
    assert_eq!(renderer.in_flight(), 0);
}

#[test]
fn test_click_is_debounced_and_prevents_default() {
    let page = Page::new(PAGINATION, FakeSource::json(&sections(&[("grid", "2")])));
    let _renderer = attached(&page, "r");

    assert!(page.click("next"));
    assert!(page.click("next"));
    assert!(page.click("next"));
    assert_eq!(page.source.request_count(), 0);

    page.settle(80);
    assert_eq!(page.source.request_count(), 1);
    assert_eq!(
        page.source.requests()[0].as_str(),
        "https://shop.example/collections/all?sections=grid"
    );
    assert_eq!(page.text("grid"), "2");
}

#[test]
fn test_init_failure_leaves_instance_inert() {
    let page = Page::new(
        r#"<section-renderer id="empty"><p>nothing to do</p></section-renderer>"#,
        FakeSource::json("{}"),
    );
    let renderer = SectionRenderer::new(page.env.clone(), page.by_id("empty")).unwrap();

    let err = renderer.attach().unwrap_err();
    assert_eq!(err, RenderError::NoTriggers { id: "empty".into() });
    assert_eq!(err.kind(), ErrorKind::Initialization);
    assert!(!renderer.is_attached());
    assert!(page.events().is_empty());
}

#[test]
fn test_reattach_does_not_leak_listeners() {
    let page = Page::new(PAGINATION, FakeSource::json(&sections(&[("grid", "2")])));
    let next = page.by_id("next");
    let renderer = attached(&page, "r");

    renderer.attach().unwrap();
    assert_eq!(page.window().listener_count_for(next), 1);

    renderer.detach();
    renderer.detach();
    assert_eq!(page.window().listener_count_for(next), 0);

    renderer.attach().unwrap();
    assert_eq!(page.window().listener_count_for(next), 1);
    assert_eq!(renderer.binding_count(), 1);
    assert_eq!(page.events(), ["initialized", "destroying", "initialized"]);
}

#[test]
fn test_detach_from_destroying_listener() {
    let page = Page::new(PAGINATION, FakeSource::json(&sections(&[("grid", "2")])));
    let renderer = attached(&page, "r");
    let destroying = EventType::parse(EVENT_DESTROYING);

    let reentrant = renderer.clone();
    let listener = page.window().add_event_listener(
        page.by_id("r"),
        destroying.clone(),
        Rc::new(move |_: &mut Event| reentrant.detach()),
    );

    renderer.detach();

    assert!(!renderer.is_attached());
    assert_eq!(page.events(), ["initialized", "destroying"]);
    assert_eq!(page.window().listener_count_for(page.by_id("next")), 0);
    page.window().remove_event_listener(page.by_id("r"), &destroying, listener);
}

#[test]
fn test_debounce_is_per_instance_and_keeps_last_trigger() {
    let page = Page::new(
        r##"<section-renderer id="r" debounce="40">
              <button id="a" data-render-trigger data-section="sa" data-destination="#out">a</button>
              <button id="b" data-render-trigger data-section="sb" data-destination="#out">b</button>
              <div id="out"></div>
            </section-renderer>"##,
        FakeSource::json(&sections(&[("sa", "A"), ("sb", "B")])),
    );
    let _renderer = attached(&page, "r");

    page.click("a");
    page.settle(20);
    page.click("b");
    page.settle(25);
    assert_eq!(page.source.request_count(), 0);

    page.settle(60);
    let requests = page.source.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].as_str(),
        "https://shop.example/collections/all?sections=sb"
    );
    assert_eq!(page.text("out"), "B");
}

#[test]
fn test_detach_during_fetch() {
    let source = FakeSource::json(&sections(&[("grid", "2")])).with_delay(Duration::from_millis(50));
    let page = Page::new(PAGINATION, source);
    let host = page.by_id("r");
    let renderer = attached(&page, "r");

    page.click("next");
    page.settle(25);
    assert_eq!(page.source.request_count(), 1);
    assert!(renderer.is_loading());

    renderer.detach();
    assert_eq!(page.window().listener_count_for(page.by_id("next")), 0);

    page.settle(100);
    assert_eq!(
        page.events(),
        ["initialized", "render-started", "destroying", "render-ended"]
    );
    assert!(!renderer.is_loading());

    page.click("next");
    page.settle(40);
    assert_eq!(page.source.request_count(), 1);

    let fresh = SectionRenderer::new(page.env.clone(), host).unwrap();
    fresh.attach().unwrap();
    assert_eq!(fresh.triggers().immediate.len(), 1);
    page.click("next");
    page.settle(100);
    assert_eq!(page.source.request_count(), 2);
}

#[test]
fn test_explicit_init_trigger_runs_after_attach() {
    let page = Page::new(
        r##"<section-renderer id="r">
              <div id="recs" data-render-init data-section="recommendations"
                   data-destination="#recs"></div>
            </section-renderer>"##,
        FakeSource::json(&sections(&[("recommendations", "<p>Hat</p>")])),
    );
    let _renderer = attached(&page, "r");

    page.settle(20);
    assert_eq!(page.source.request_count(), 1);
    assert_eq!(page.text("recs"), "Hat");
    assert_eq!(page.events(), ["initialized", "render-started", "render-ended"]);
}

#[test]
fn test_upgrade_all_skips_hosts_without_triggers() {
    let page = Page::new(
        r##"<section-renderer id="empty"></section-renderer>
            <section-renderer id="r">
              <button id="go" data-render-trigger data-section="a" data-destination="#out">go</button>
              <div id="out"></div>
            </section-renderer>"##,
        FakeSource::json(&sections(&[("a", "A")])),
    );

    let renderers = upgrade_all(&page.env);
    assert_eq!(renderers.len(), 1);
    assert_eq!(renderers[0].id(), "r");
    assert!(renderers[0].is_attached());
}

// ============================================================================
// UPDATES
// ============================================================================

#[test]
fn test_structured_updates_share_one_fetch() {
    let page = Page::new(
        r##"<section-renderer id="r" debounce="5">
              <button id="go" data-render-trigger
                data-updates='[{"section": "a", "destination": "#da"},
                               {"section": "b", "destination": "#db", "mode": "append"}]'>go</button>
              <div id="da">old</div>
              <div id="db"><p>keep</p></div>
            </section-renderer>"##,
        FakeSource::json(&sections(&[("a", "A"), ("b", "B")])),
    );
    let _renderer = attached(&page, "r");

    page.click("go");
    page.settle(50);

    let requests = page.source.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].as_str(),
        "https://shop.example/collections/all?sections=a%2Cb"
    );
    assert_eq!(page.text("da"), "A");
    assert_eq!(page.child_texts("db"), ["keep", "B"]);
}

#[test]
fn test_main_product_replaces_children() {
    let page = Page::new(
        r##"<section-renderer id="r">
              <div id="product-section"><p>old</p><p>older</p></div>
              <button id="variant" data-render-trigger data-section="main-product"
                      data-destination="#product-section">Blue</button>
            </section-renderer>"##,
        FakeSource::json(r#"{"main-product": "<div id=\"shopify-section-main-product\">X</div>"}"#),
    );
    let renderer = attached(&page, "r");

    page.run(renderer.render(page.by_id("variant"))).unwrap();

    assert_eq!(page.child_texts("product-section"), ["X"]);
}

#[test]
fn test_prepend_with_sub_selector() {
    let page = Page::new(
        r##"<section-renderer id="r">
              <button id="more" data-render-trigger data-section="grid" data-destination="#list"
                      data-mode="prepend" data-select=".item">more</button>
              <ul id="list"><li>2</li></ul>
            </section-renderer>"##,
        FakeSource::json(&sections(&[("grid", r#"<ul><li class="item">1</li></ul>"#)])),
    );
    let renderer = attached(&page, "r");

    page.run(renderer.render(page.by_id("more"))).unwrap();

    assert_eq!(page.child_texts("list"), ["1", "2"]);
}

#[test]
fn test_malformed_updates_fall_back_to_attributes() {
    let page = Page::new(
        r##"<section-renderer id="r">
              <button id="go" data-render-trigger data-updates="[{"
                      data-section="grid" data-destination="#grid">go</button>
              <div id="grid"></div>
            </section-renderer>"##,
        FakeSource::json(&sections(&[("grid", "fresh")])),
    );
    let renderer = attached(&page, "r");

    page.run(renderer.render(page.by_id("go"))).unwrap();

    assert_eq!(page.source.request_count(), 1);
    assert_eq!(page.text("grid"), "fresh");
}

#[test]
fn test_malformed_updates_without_fallback() {
    let page = Page::new(
        r#"<section-renderer id="r">
             <button id="go" data-render-trigger data-updates="[{">go</button>
           </section-renderer>"#,
        FakeSource::json("{}"),
    );
    let renderer = attached(&page, "r");

    let err = page.run(renderer.render(page.by_id("go"))).unwrap_err();

    assert_eq!(err, RenderError::MissingSection);
    assert_eq!(page.source.request_count(), 0);
    assert_eq!(page.events(), ["initialized", "render-error"]);
    assert_eq!(page.last_error().unwrap()["kind"], "configuration");
}

#[test]
fn test_ambient_section_container() {
    let page = Page::new(
        r#"<div id="shopify-section-featured">
             <section-renderer id="r" scoped="false">
               <button id="refresh" data-render-trigger>refresh</button>
             </section-renderer>
           </div>"#,
        FakeSource::json(&sections(&[("featured", "new")])),
    );
    let renderer = attached(&page, "r");

    page.run(renderer.render(page.by_id("refresh"))).unwrap();

    assert_eq!(
        page.source.requests()[0].as_str(),
        "https://shop.example/collections/all?sections=featured"
    );
    assert_eq!(page.text("shopify-section-featured"), "new");
}

#[test]
fn test_scoped_destination_outside_host() {
    let page = Page::new(
        r##"<div id="outside"></div>
            <section-renderer id="r">
              <button id="go" data-render-trigger data-section="a" data-destination="#outside">go</button>
            </section-renderer>"##,
        FakeSource::json(&sections(&[("a", "A")])),
    );
    let renderer = attached(&page, "r");

    let err = page.run(renderer.render(page.by_id("go"))).unwrap_err();

    assert_eq!(err, RenderError::DestinationNotFound("#outside".into()));
    assert_eq!(page.text("outside"), "");
    assert_eq!(page.events(), ["initialized", "render-started", "render-error", "render-ended"]);
}

#[test]
fn test_trigger_render_url_override() {
    let page = Page::new(
        r##"<section-renderer id="r" render-url="/collections/hats">
              <button id="go" data-render-trigger data-render-url="/search?q=hat"
                      data-section="grid" data-destination="#grid">go</button>
              <div id="grid"></div>
            </section-renderer>"##,
        FakeSource::json(&sections(&[("grid", "hats")])),
    );
    let renderer = attached(&page, "r");

    page.run(renderer.render(page.by_id("go"))).unwrap();

    assert_eq!(
        page.source.requests()[0].as_str(),
        "https://shop.example/search?q=hat&sections=grid"
    );
}

// ============================================================================
// FAILURES
// ============================================================================

#[test]
fn test_timeout_never_patches() {
    let source = FakeSource::json(&sections(&[("grid", "late")])).with_delay(Duration::from_millis(200));
    let page = Page::new(
        r##"<section-renderer id="r" timeout="20">
              <a id="next" data-render-trigger data-section="grid" data-destination="#grid">Next</a>
              <div id="grid">1</div>
            </section-renderer>"##,
        source,
    );
    let renderer = attached(&page, "r");

    let err = page.run(renderer.render(page.by_id("next"))).unwrap_err();
    assert_eq!(err, RenderError::Timeout(Duration::from_millis(20)));
    assert_eq!(
        page.events(),
        ["initialized", "render-started", "render-error", "render-ended"]
    );
    assert_eq!(page.last_error().unwrap()["kind"], "timeout");

    page.settle(250);
    assert_eq!(page.text("grid"), "1");
    assert!(!renderer.is_loading());
}

#[test]
fn test_http_error_is_network_kind() {
    let page = Page::new(
        r##"<section-renderer id="r" history="push">
              <a id="next" data-render-trigger data-section="grid" data-destination="#grid"
                 data-update-url="?page=2">Next</a>
              <div id="grid">1</div>
            </section-renderer>"##,
        FakeSource::json("").with_status(500),
    );
    let renderer = attached(&page, "r");

    let err = page.run(renderer.render(page.by_id("next"))).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Network);
    let detail = page.last_error().unwrap();
    assert_eq!(detail["kind"], "network");
    assert_eq!(detail["id"], "r");
    assert_eq!(page.text("grid"), "1");
    assert_eq!(page.window().history().len(), 1);
}

#[test]
fn test_transport_failure() {
    let page = Page::new(PAGINATION, FakeSource::json("{}").with_status(0));
    let renderer = attached(&page, "r");

    let err = page.run(renderer.render(page.by_id("next"))).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Network);
    assert_eq!(page.events().last().map(String::as_str), Some("render-ended"));
}

#[test]
fn test_missing_fragment() {
    let page = Page::new(PAGINATION, FakeSource::json(&sections(&[("other", "x")])));
    let renderer = attached(&page, "r");

    let err = page.run(renderer.render(page.by_id("next"))).unwrap_err();

    assert_eq!(err, RenderError::MissingFragment("grid".into()));
    assert_eq!(page.last_error().unwrap()["kind"], "configuration");
    assert_eq!(page.text("grid"), "1");
}

// ============================================================================
// HISTORY & LOADING
// ============================================================================

#[test]
fn test_history_push_and_title() {
    let page = Page::new(
        r##"<html><head><title>All</title></head><body>
            <section-renderer id="r" history="push">
              <a id="next" data-render-trigger data-section="grid" data-destination="#grid"
                 data-update-url="?page=2" data-update-title="Page 2">Next</a>
              <div id="grid">1</div>
            </section-renderer></body></html>"##,
        FakeSource::json(&sections(&[("grid", "2")])),
    );
    let renderer = attached(&page, "r");

    page.run(renderer.render(page.by_id("next"))).unwrap();

    let window = page.window();
    assert_eq!(window.location().as_str(), "https://shop.example/collections/all?page=2");
    assert_eq!(window.history().len(), 2);
    assert_eq!(window.document().title(), "Page 2");
}

#[test]
fn test_history_replace_keeps_length() {
    let page = Page::new(
        r##"<section-renderer id="r" history="replace" update-url="/collections/all?sort=price">
              <a id="next" data-render-trigger data-section="grid" data-destination="#grid">Next</a>
              <div id="grid">1</div>
            </section-renderer>"##,
        FakeSource::json(&sections(&[("grid", "2")])),
    );
    let renderer = attached(&page, "r");

    page.run(renderer.render(page.by_id("next"))).unwrap();

    let window = page.window();
    assert_eq!(window.location().as_str(), "https://shop.example/collections/all?sort=price");
    assert_eq!(window.history().len(), 1);
}

#[test]
fn test_loading_class_tracks_fetch() {
    let source = FakeSource::json(&sections(&[("grid", "2")])).with_delay(Duration::from_millis(50));
    let page = Page::new(
        r##"<section-renderer id="r" debounce="5" loading-selector=".spinner" loading-class="is-loading">
              <div class="spinner" id="spinner" data-render-cloak></div>
              <a id="next" data-render-trigger data-section="grid" data-destination="#grid">Next</a>
              <div id="grid">1</div>
            </section-renderer>"##,
        source,
    );
    let renderer = attached(&page, "r");
    let spinner = page.by_id("spinner");
    let has_class = || {
        page.window().document().tree().element(spinner).unwrap().has_class("is-loading")
    };

    assert_eq!(renderer.loading_indicator(), Some(spinner));
    assert!(!page.window().document().tree().element(spinner).unwrap().has_attr("data-render-cloak"));
    assert!(!has_class());

    page.click("next");
    page.settle(25);
    assert!(renderer.is_loading());
    assert!(has_class());

    page.settle(100);
    assert!(!renderer.is_loading());
    assert!(!has_class());
}

#[test]
fn test_loading_display_without_class() {
    let source = FakeSource::json(&sections(&[("grid", "2")])).with_delay(Duration::from_millis(50));
    let page = Page::new(
        r##"<section-renderer id="r" debounce="5" loading-selector="#spinner">
              <div id="spinner"></div>
              <a id="next" data-render-trigger data-section="grid" data-destination="#grid">Next</a>
              <div id="grid">1</div>
            </section-renderer>"##,
        source,
    );
    let _renderer = attached(&page, "r");
    let spinner = page.by_id("spinner");
    let display = || {
        page.window().document().tree().element(spinner).unwrap().style_property("display")
    };

    assert_eq!(display().as_deref(), Some("none"));
    page.click("next");
    page.settle(25);
    assert_eq!(display(), None);
    page.settle(100);
    assert_eq!(display().as_deref(), Some("none"));
}

// ============================================================================
// INTERSECTION
// ============================================================================

const LAZY: &str = r##"
<section-renderer id="r">
  <ul id="grid"></ul>
  <div id="sentinel" data-render-lazy data-section="grid" data-destination="#grid"
       data-mode="append" data-select="li"></div>
</section-renderer>
"##;

fn lazy_page(once: bool) -> Page {
    let html = if once {
        LAZY.to_string()
    } else {
        LAZY.replace("data-render-lazy", r#"data-render-lazy data-once="false""#)
    };
    Page::new(&html, FakeSource::json(&sections(&[("grid", "<ul><li>item</li></ul>")])))
}

fn scroll(page: &Page, visible: bool) {
    let y = if visible { 100.0 } else { 1000.0 };
    page.layout(&[("sentinel", Rect::new(0.0, y, 100.0, 20.0))]);
    page.settle(10);
}

#[test]
fn test_lazy_trigger_fires_once() {
    let page = lazy_page(true);
    let _renderer = attached(&page, "r");

    scroll(&page, false);
    assert_eq!(page.source.request_count(), 0);

    scroll(&page, true);
    assert_eq!(page.source.request_count(), 1);

    scroll(&page, false);
    scroll(&page, true);
    assert_eq!(page.source.request_count(), 1);
    assert_eq!(page.child_texts("grid"), ["item"]);
}

#[test]
fn test_lazy_trigger_repeats_when_not_once() {
    let page = lazy_page(false);
    let _renderer = attached(&page, "r");

    scroll(&page, true);
    scroll(&page, false);
    scroll(&page, true);

    assert_eq!(page.source.request_count(), 2);
    assert_eq!(page.child_texts("grid"), ["item", "item"]);
}

#[test]
fn test_detach_stops_observing() {
    let page = lazy_page(false);
    let renderer = attached(&page, "r");
    assert_eq!(page.window().observer_count(), 1);

    renderer.detach();
    assert_eq!(page.window().observer_count(), 0);

    scroll(&page, true);
    assert_eq!(page.source.request_count(), 0);
}
