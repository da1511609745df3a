//! Typed configuration
//!
//! Host and trigger attributes parsed once with explicit defaults.

use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use splice_dom::ElementData;

use crate::attributes::*;

static RENDERER_ID: AtomicU32 = AtomicU32::new(1);

/// How a successful activation is mirrored into session history
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HistoryMode {
    #[default]
    Off,
    Push,
    Replace,
}

impl HistoryMode {
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("add" | "push") => Self::Push,
            Some("replace") => Self::Replace,
            _ => Self::Off,
        }
    }
}

/// `<section-renderer>` host configuration
#[derive(Debug, Clone, PartialEq)]
pub struct RendererConfig {
    pub id: String,
    pub debounce: Duration,
    pub timeout: Duration,
    pub history: HistoryMode,
    /// Search only the host subtree for triggers, destinations and the
    /// loading indicator
    pub scoped: bool,
    pub render_url: Option<String>,
    pub loading_selector: Option<String>,
    pub loading_class: Option<String>,
    /// Root margin in pixels
    pub intersection_margin: f32,
    /// Visible fraction, 0.0..=1.0
    pub intersection_threshold: f32,
    pub update_url: Option<String>,
    pub update_title: Option<String>,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            id: next_generated_id(),
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            history: HistoryMode::Off,
            scoped: true,
            render_url: None,
            loading_selector: None,
            loading_class: None,
            intersection_margin: DEFAULT_INTERSECTION_MARGIN,
            intersection_threshold: DEFAULT_INTERSECTION_THRESHOLD / 100.0,
            update_url: None,
            update_title: None,
        }
    }
}

impl RendererConfig {
    /// Read host attributes; bad numbers fall back to their defaults
    pub fn from_element(element: &ElementData) -> Self {
        let threshold = float(element, ATTR_INTERSECTION_THRESHOLD, DEFAULT_INTERSECTION_THRESHOLD);

        Self {
            id: text(element, ATTR_ID).unwrap_or_else(next_generated_id),
            debounce: Duration::from_millis(number(element, ATTR_DEBOUNCE, DEFAULT_DEBOUNCE_MS)),
            timeout: Duration::from_millis(number(element, ATTR_TIMEOUT, DEFAULT_TIMEOUT_MS)),
            history: HistoryMode::parse(element.get_attr(ATTR_HISTORY)),
            scoped: !element
                .get_attr(ATTR_SCOPED)
                .is_some_and(|v| v.trim().eq_ignore_ascii_case("false")),
            render_url: text(element, ATTR_RENDER_URL),
            loading_selector: text(element, ATTR_LOADING_SELECTOR),
            loading_class: text(element, ATTR_LOADING_CLASS),
            intersection_margin: float(element, ATTR_INTERSECTION_MARGIN, DEFAULT_INTERSECTION_MARGIN),
            intersection_threshold: (threshold / 100.0).clamp(0.0, 1.0),
            update_url: text(element, ATTR_UPDATE_URL),
            update_title: text(element, ATTR_UPDATE_TITLE),
        }
    }
}

/// Per-trigger overrides, read at activation time
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TriggerConfig {
    pub section: Option<String>,
    pub destination: Option<String>,
    pub sub_selector: Option<String>,
    pub mode: Option<String>,
    pub render_url: Option<String>,
    /// Raw `data-updates` JSON
    pub updates: Option<String>,
    /// Stop observing an intersection trigger after its first activation
    pub once: bool,
    pub update_url: Option<String>,
    pub update_title: Option<String>,
}

impl TriggerConfig {
    pub fn from_element(element: &ElementData) -> Self {
        Self {
            section: text(element, DATA_SECTION),
            destination: text(element, DATA_DESTINATION),
            sub_selector: text(element, DATA_SELECT),
            mode: text(element, DATA_MODE),
            render_url: text(element, DATA_RENDER_URL),
            updates: text(element, DATA_UPDATES),
            once: !element
                .get_attr(DATA_ONCE)
                .is_some_and(|v| v.trim().eq_ignore_ascii_case("false")),
            update_url: text(element, DATA_UPDATE_URL),
            update_title: text(element, DATA_UPDATE_TITLE),
        }
    }
}

/// Attribute value, with blank values treated as absent
fn text(element: &ElementData, name: &str) -> Option<String> {
    element
        .get_attr(name)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn number<T: FromStr + Copy>(element: &ElementData, name: &str, default: T) -> T {
    let Some(raw) = text(element, name) else {
        return default;
    };
    match raw.parse() {
        Ok(value) => value,
        Err(_) => {
            tracing::warn!(attribute = name, value = %raw, "unparsable number, using default");
            default
        }
    }
}

/// Like [`number`], with `NaN` and infinities rejected
fn float(element: &ElementData, name: &str, default: f32) -> f32 {
    let value = number(element, name, default);
    if value.is_finite() {
        return value;
    }
    tracing::warn!(attribute = name, value, "non-finite number, using default");
    default
}

fn next_generated_id() -> String {
    format!("{TAG_NAME}-{}", RENDERER_ID.fetch_add(1, Ordering::Relaxed))
}
