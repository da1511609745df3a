//! Fetch API
//!
//! Response type and the source trait the renderer fetches sections through.

use std::future::Future;
use std::pin::Pin;

use url::Url;

use crate::NetError;

/// Future returned by [`SectionSource::get`]
pub type FetchFuture = Pin<Box<dyn Future<Output = Result<FetchResponse, NetError>>>>;

/// Anything that can answer a GET for a render URL.
///
/// The returned future runs on a single-threaded executor, so it need not be
/// `Send`.
pub trait SectionSource {
    fn get(&self, url: &Url) -> FetchFuture;
}

/// Fetch response with convenience methods
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl FetchResponse {
    /// A 200 response with a body
    pub fn ok_with(body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    /// HTTP status code
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Check if response is OK (2xx)
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Get header value
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Fail with [`NetError::HttpError`] unless the status is 2xx
    pub fn error_for_status(self) -> Result<Self, NetError> {
        if self.ok() {
            Ok(self)
        } else {
            Err(NetError::HttpError { status: self.status })
        }
    }

    /// Get body as text
    pub fn text(&self) -> Result<String, NetError> {
        String::from_utf8(self.body.clone()).map_err(|e| NetError::Decode(e.to_string()))
    }

    /// Get body as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, NetError> {
        serde_json::from_slice(&self.body).map_err(|e| NetError::Decode(e.to_string()))
    }
}
