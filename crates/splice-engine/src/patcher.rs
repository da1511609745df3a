//! DOM patching
//!
//! Whole-fragment insertion. Updates apply in order and the first failure
//! stops the rest; earlier updates stay applied.

use splice_dom::{Document, NodeId};

use crate::attributes::section_element_id;
use crate::error::RenderError;
use crate::fetch::FragmentResponse;
use crate::resolver::{InsertMode, UpdateDescriptor};

/// Apply `updates`, looking destinations up under `search_root`.
/// Returns the inserted nodes in update order.
pub fn apply(
    document: &mut Document,
    search_root: NodeId,
    response: &FragmentResponse,
    updates: &[UpdateDescriptor],
) -> Result<Vec<NodeId>, RenderError> {
    updates
        .iter()
        .map(|update| apply_one(document, search_root, response, update))
        .collect()
}

fn apply_one(
    document: &mut Document,
    search_root: NodeId,
    response: &FragmentResponse,
    update: &UpdateDescriptor,
) -> Result<NodeId, RenderError> {
    let fragment = splice_html::parse(response.fragment(&update.section)?);
    let section_root = fragment
        .get_element_by_id(&section_element_id(&update.section))
        .ok_or_else(|| RenderError::MissingSectionRoot(update.section.clone()))?;
    let extracted = narrow(&fragment, section_root, update.sub_selector.as_deref());

    let destination = document
        .query_selector(search_root, &update.destination)?
        .ok_or_else(|| RenderError::DestinationNotFound(update.destination.clone()))?;

    let tree = document.tree_mut();
    let node = tree.import_node(fragment.tree(), extracted)?;
    match update.mode {
        InsertMode::Replace => {
            tree.remove_children(destination);
            tree.append_child(destination, node)?;
        }
        InsertMode::Append => tree.append_child(destination, node)?,
        InsertMode::Prepend => tree.prepend_child(destination, node)?,
    }

    tracing::debug!(
        section = %update.section,
        destination = %update.destination,
        mode = ?update.mode,
        "patched section"
    );
    Ok(node)
}

/// First match of `sub_selector` inside the section, or the section itself
fn narrow(fragment: &Document, section_root: NodeId, sub_selector: Option<&str>) -> NodeId {
    let Some(selector) = sub_selector else {
        return section_root;
    };
    match fragment.query_selector(section_root, selector) {
        Ok(Some(node)) => node,
        Ok(None) => section_root,
        Err(e) => {
            tracing::warn!(selector, "ignoring sub-selector: {e}");
            section_root
        }
    }
}
