//! Renderer errors

use std::fmt;
use std::time::Duration;

use splice_dom::{DomError, SelectorError};
use splice_net::NetError;

/// Error classification reported in `render-error` details
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Initialization,
    Configuration,
    Network,
    Timeout,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Initialization => "initialization",
            Self::Configuration => "configuration",
            Self::Network => "network",
            Self::Timeout => "timeout",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised while attaching or running an activation
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RenderError {
    #[error("no render triggers found for `{id}`")]
    NoTriggers { id: String },

    #[error("trigger has no section to render")]
    MissingSection,

    #[error("trigger has no destination for section `{section}`")]
    MissingDestination { section: String },

    #[error("update #{index} is invalid: {reason}")]
    InvalidUpdate { index: usize, reason: String },

    #[error("destination `{0}` not found")]
    DestinationNotFound(String),

    #[error("section `{0}` missing from response")]
    MissingFragment(String),

    #[error("fragment for `{0}` has no section root element")]
    MissingSectionRoot(String),

    #[error(transparent)]
    Selector(#[from] SelectorError),

    #[error(transparent)]
    Dom(#[from] DomError),

    #[error(transparent)]
    Net(#[from] NetError),

    #[error("request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),
}

impl RenderError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NoTriggers { .. } => ErrorKind::Initialization,
            Self::Net(NetError::InvalidUrl(_)) => ErrorKind::Configuration,
            Self::Net(_) => ErrorKind::Network,
            Self::Timeout(_) => ErrorKind::Timeout,
            Self::MissingSection
            | Self::MissingDestination { .. }
            | Self::InvalidUpdate { .. }
            | Self::DestinationNotFound(_)
            | Self::MissingFragment(_)
            | Self::MissingSectionRoot(_)
            | Self::Selector(_)
            | Self::Dom(_) => ErrorKind::Configuration,
        }
    }
}
