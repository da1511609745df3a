//! Update resolution
//!
//! Turns a trigger into the list of (section, destination, mode,
//! sub-selector) updates, either from structured `data-updates` JSON or from
//! the individual `data-*` attributes with an ambient fallback.

use serde::Deserialize;
use serde_json::Value;
use splice_dom::{Document, NodeId};

use crate::attributes::{section_element_id, SECTION_ID_PREFIX};
use crate::config::TriggerConfig;
use crate::error::RenderError;

/// How a fragment is inserted into its destination
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InsertMode {
    /// Clear the destination, then insert
    #[default]
    Replace,
    /// Insert as last child
    Append,
    /// Insert as first child
    Prepend,
}

impl InsertMode {
    /// Unknown modes are treated as replace
    pub fn parse(value: Option<&str>) -> Self {
        let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
            return Self::Replace;
        };
        match value.to_ascii_lowercase().as_str() {
            "replace" => Self::Replace,
            "append" | "after" => Self::Append,
            "prepend" | "before" => Self::Prepend,
            other => {
                tracing::debug!(mode = other, "unknown insert mode, using replace");
                Self::Replace
            }
        }
    }
}

/// One section to patch into one destination
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateDescriptor {
    pub section: String,
    /// Destination selector
    pub destination: String,
    pub mode: InsertMode,
    /// Narrow the fetched section to its first match
    pub sub_selector: Option<String>,
}

/// Updates for one activation plus the sections they need
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedBatch {
    /// Unique, first-seen order
    pub sections: Vec<String>,
    pub updates: Vec<UpdateDescriptor>,
}

/// Fields the surrounding markup can supply when a trigger leaves them out
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AmbientFields {
    pub section: Option<String>,
    pub destination: Option<String>,
}

/// Source of defaults for triggers that omit their section or destination
pub trait AmbientContext {
    /// `section` is the trigger's own section, when it names one
    fn lookup(&self, document: &Document, trigger: NodeId, section: Option<&str>) -> AmbientFields;
}

/// Uses the nearest ancestor whose id is `shopify-section-<section>`; the
/// destination is that ancestor.
#[derive(Debug, Clone, Copy, Default)]
pub struct SectionContainerContext;

impl AmbientContext for SectionContainerContext {
    fn lookup(&self, document: &Document, trigger: NodeId, section: Option<&str>) -> AmbientFields {
        let tree = document.tree();
        let wanted = section.map(section_element_id);

        let container = tree.ancestors(trigger).find_map(|ancestor| {
            let id = tree.element(ancestor)?.id()?;
            let matches = match &wanted {
                Some(wanted) => id == wanted,
                None => id.len() > SECTION_ID_PREFIX.len() && id.starts_with(SECTION_ID_PREFIX),
            };
            matches.then(|| id.to_string())
        });

        match container {
            Some(id) => AmbientFields {
                section: id.strip_prefix(SECTION_ID_PREFIX).map(str::to_string),
                destination: Some(format!("#{id}")),
            },
            None => AmbientFields::default(),
        }
    }
}

/// Resolve the updates a trigger asks for
pub fn resolve(
    document: &Document,
    trigger: NodeId,
    config: &TriggerConfig,
    context: &dyn AmbientContext,
) -> Result<ResolvedBatch, RenderError> {
    let structured = config.updates.as_deref().map(parse_updates).unwrap_or_default();

    let updates = if structured.is_empty() {
        vec![synthesize(document, trigger, config, context)?]
    } else {
        structured
            .into_iter()
            .enumerate()
            .map(|(index, raw)| validate(index, raw))
            .collect::<Result<Vec<_>, _>>()?
    };

    let mut sections: Vec<String> = Vec::new();
    for update in &updates {
        if !sections.contains(&update.section) {
            sections.push(update.section.clone());
        }
    }
    Ok(ResolvedBatch { sections, updates })
}

/// Structured update as written in `data-updates`
#[derive(Debug, Default, Deserialize)]
struct RawUpdate {
    #[serde(default)]
    section: Option<Value>,
    #[serde(default)]
    destination: Option<Value>,
    #[serde(default)]
    mode: Option<Value>,
    #[serde(default, alias = "subSelector", alias = "sub_selector")]
    select: Option<Value>,
}

/// Parse `data-updates`; bad JSON or a non-array is logged and yields nothing
fn parse_updates(raw: &str) -> Vec<Value> {
    let normalized = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    match serde_json::from_str::<Value>(&normalized) {
        Ok(Value::Array(items)) => items,
        Ok(other) => {
            tracing::warn!(value = %other, "data-updates is not an array, ignoring");
            Vec::new()
        }
        Err(e) => {
            tracing::warn!("malformed data-updates, ignoring: {e}");
            Vec::new()
        }
    }
}

fn validate(index: usize, item: Value) -> Result<UpdateDescriptor, RenderError> {
    let invalid = |reason: &str| RenderError::InvalidUpdate {
        index,
        reason: reason.to_string(),
    };
    let raw: RawUpdate = serde_json::from_value(item).map_err(|e| invalid(&e.to_string()))?;

    let section = non_empty_string(raw.section).ok_or_else(|| invalid("`section` must be a non-empty string"))?;
    let destination =
        non_empty_string(raw.destination).ok_or_else(|| invalid("`destination` must be a non-empty string"))?;

    Ok(UpdateDescriptor {
        section,
        destination,
        mode: InsertMode::parse(raw.mode.as_ref().and_then(Value::as_str)),
        sub_selector: non_empty_string(raw.select),
    })
}

fn non_empty_string(value: Option<Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}

fn synthesize(
    document: &Document,
    trigger: NodeId,
    config: &TriggerConfig,
    context: &dyn AmbientContext,
) -> Result<UpdateDescriptor, RenderError> {
    let mut section = config.section.clone();
    let mut destination = config.destination.clone();

    if section.is_none() || destination.is_none() {
        let ambient = context.lookup(document, trigger, section.as_deref());
        section = section.or(ambient.section);
        destination = destination.or(ambient.destination);
    }

    let section = section.ok_or(RenderError::MissingSection)?;
    let destination = destination.ok_or_else(|| RenderError::MissingDestination {
        section: section.clone(),
    })?;

    Ok(UpdateDescriptor {
        section,
        destination,
        mode: InsertMode::parse(config.mode.as_deref()),
        sub_selector: config.sub_selector.clone(),
    })
}
