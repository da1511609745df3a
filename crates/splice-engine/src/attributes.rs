//! Attribute vocabulary
//!
//! Names and defaults recognized on the `<section-renderer>` host and on
//! trigger elements.

/// Custom element tag upgraded by [`crate::upgrade_all`]
pub const TAG_NAME: &str = "section-renderer";

/// Id prefix of a server-rendered section root
pub const SECTION_ID_PREFIX: &str = "shopify-section-";

// Host attributes
pub const ATTR_ID: &str = "id";
pub const ATTR_DEBOUNCE: &str = "debounce";
pub const ATTR_TIMEOUT: &str = "timeout";
pub const ATTR_HISTORY: &str = "history";
pub const ATTR_SCOPED: &str = "scoped";
pub const ATTR_RENDER_URL: &str = "render-url";
pub const ATTR_LOADING_SELECTOR: &str = "loading-selector";
pub const ATTR_LOADING_CLASS: &str = "loading-class";
pub const ATTR_INTERSECTION_MARGIN: &str = "intersection-margin";
pub const ATTR_INTERSECTION_THRESHOLD: &str = "intersection-threshold";
pub const ATTR_UPDATE_URL: &str = "update-url";
pub const ATTR_UPDATE_TITLE: &str = "update-title";

// Trigger attributes
pub const DATA_SECTION: &str = "data-section";
pub const DATA_DESTINATION: &str = "data-destination";
pub const DATA_SELECT: &str = "data-select";
pub const DATA_MODE: &str = "data-mode";
pub const DATA_RENDER_URL: &str = "data-render-url";
pub const DATA_UPDATES: &str = "data-updates";
pub const DATA_ONCE: &str = "data-once";
pub const DATA_UPDATE_URL: &str = "data-update-url";
pub const DATA_UPDATE_TITLE: &str = "data-update-title";

// Markers
pub const MARKER_TRIGGER: &str = "data-render-trigger";
pub const MARKER_INIT: &str = "data-render-init";
pub const MARKER_LAZY: &str = "data-render-lazy";
pub const MARKER_CLOAK: &str = "data-render-cloak";

// Defaults
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_INTERSECTION_MARGIN: f32 = 0.0;
/// Percent of the element that must be visible
pub const DEFAULT_INTERSECTION_THRESHOLD: f32 = 10.0;

/// Id of the root element of a rendered section
pub fn section_element_id(section: &str) -> String {
    format!("{SECTION_ID_PREFIX}{section}")
}
