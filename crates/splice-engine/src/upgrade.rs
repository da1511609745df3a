//! Element upgrade
//!
//! Instantiates and attaches a renderer for every `<section-renderer>` in the
//! document, the way a custom element registry upgrades defined tags.

use splice_dom::NodeId;

use crate::attributes::TAG_NAME;
use crate::env::RenderEnv;
use crate::renderer::SectionRenderer;

/// Attach a renderer to each host in document order.
///
/// Hosts that fail to initialize are logged and left out; the rest of the
/// page is unaffected.
pub fn upgrade_all(env: &RenderEnv) -> Vec<SectionRenderer> {
    let hosts = match env.window.document().query_selector_all(NodeId::ROOT, TAG_NAME) {
        Ok(hosts) => hosts,
        Err(e) => {
            tracing::warn!("cannot query renderer hosts: {e}");
            return Vec::new();
        }
    };

    let mut renderers = Vec::with_capacity(hosts.len());
    for host in hosts {
        let renderer = match SectionRenderer::new(env.clone(), host) {
            Ok(renderer) => renderer,
            Err(e) => {
                tracing::warn!(?host, "cannot create renderer: {e}");
                continue;
            }
        };
        match renderer.attach() {
            Ok(()) => renderers.push(renderer),
            Err(e) => tracing::warn!(id = renderer.id(), "renderer not attached: {e}"),
        }
    }

    tracing::debug!(count = renderers.len(), "upgraded renderers");
    renderers
}
