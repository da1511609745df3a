//! Splice Networking
//!
//! Section fetching: the [`SectionSource`] seam, an HTTP implementation and
//! render-URL construction.

mod fetch;
mod http;
mod sections;

pub use fetch::{FetchFuture, FetchResponse, SectionSource};
pub use http::HttpSource;
pub use sections::{resolve_base, sections_url, SECTIONS_PARAM};
pub use url::Url;

/// Network error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NetError {
    #[error("HTTP error: {status}")]
    HttpError { status: u16 },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid response body: {0}")]
    Decode(String),
}
