//! Example: "Load more" pagination against a canned render endpoint

use std::rc::Rc;
use std::time::Duration;

use smol::{LocalExecutor, Timer};
use splice_dom::{Event, EventType, Window};
use splice_engine::{upgrade_all, RenderEnv};
use splice_net::{FetchFuture, FetchResponse, SectionSource, Url};
use tracing_subscriber::EnvFilter;

const PAGE: &str = r##"<!DOCTYPE html>
<html>
<head><title>All products</title></head>
<body>
  <section-renderer id="collection" debounce="50" history="push"
                    loading-selector=".spinner" loading-class="is-loading">
    <ul id="product-grid">
      <li>Wool hat</li>
      <li>Cotton scarf</li>
    </ul>
    <div class="spinner" data-render-cloak></div>
    <a id="load-more" href="?page=2" data-render-trigger
       data-section="product-grid" data-destination="#product-grid"
       data-mode="append" data-select="li"
       data-update-url="?page=2" data-update-title="All products - page 2">Load more</a>
  </section-renderer>
</body>
</html>"##;

/// Answers every request with page two of the grid
struct CannedSource;

impl SectionSource for CannedSource {
    fn get(&self, url: &Url) -> FetchFuture {
        println!("GET {url}");
        let body = serde_json::json!({
            "product-grid": r#"<div id="shopify-section-product-grid"><ul><li>Leather gloves</li><li>Rain boots</li></ul></div>"#,
        });
        Box::pin(async move {
            Timer::after(Duration::from_millis(20)).await;
            Ok(FetchResponse::ok_with(body.to_string()))
        })
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let location = Url::parse("https://shop.example/collections/all")?;
    let window = Rc::new(Window::new(splice_html::parse(PAGE), location));
    let executor = Rc::new(LocalExecutor::new());
    let env = RenderEnv::new(Rc::clone(&window), Rc::clone(&executor), Rc::new(CannedSource));

    let renderers = upgrade_all(&env);
    println!("attached {} renderer(s)", renderers.len());

    let load_more = window
        .document()
        .get_element_by_id("load-more")
        .ok_or_else(|| anyhow::anyhow!("no #load-more link"))?;
    window.dispatch_event(Event::new(EventType::Click, load_more));

    // Debounce plus the canned response delay
    smol::block_on(executor.run(Timer::after(Duration::from_millis(200))));

    let document = window.document();
    let grid = document
        .get_element_by_id("product-grid")
        .ok_or_else(|| anyhow::anyhow!("no #product-grid"))?;
    println!("{}", splice_html::outer_html(document.tree(), grid));
    println!("location: {}", window.location());
    println!("title: {}", document.title());
    Ok(())
}
