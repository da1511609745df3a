//! Fetch pipeline
//!
//! One GET per activation for every section in the batch, raced against the
//! renderer timeout.

use std::collections::HashMap;
use std::time::Duration;

use smol::Timer;
use splice_net::{resolve_base, sections_url, FetchResponse, SectionSource, Url};

use crate::error::RenderError;

/// Section id to HTML, as returned by the render endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FragmentResponse {
    fragments: HashMap<String, Option<String>>,
}

impl FragmentResponse {
    /// Decode a JSON object body
    pub fn from_response(response: &FetchResponse) -> Result<Self, RenderError> {
        Ok(Self {
            fragments: response.json()?,
        })
    }

    /// HTML for `section`; missing and null entries are errors
    pub fn fragment(&self, section: &str) -> Result<&str, RenderError> {
        self.fragments
            .get(section)
            .and_then(Option::as_deref)
            .ok_or_else(|| RenderError::MissingFragment(section.to_string()))
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FragmentResponse {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fragments: iter
                .into_iter()
                .map(|(k, v)| (k.into(), Some(v.into())))
                .collect(),
        }
    }
}

/// Request URL: trigger override, then the renderer's render URL, then the
/// current path, with `sections` merged in
pub fn render_url(
    location: &Url,
    render_url: Option<&str>,
    sections: &[String],
) -> Result<Url, RenderError> {
    let base = resolve_base(location, render_url)?;
    Ok(sections_url(&base, sections))
}

/// GET `url` and parse the fragment map, failing with
/// [`RenderError::Timeout`] when `timeout` passes first. A timed-out request
/// is dropped and its result ignored.
pub async fn fetch_sections(
    source: &dyn SectionSource,
    url: Url,
    timeout: Duration,
) -> Result<FragmentResponse, RenderError> {
    tracing::debug!(%url, "fetching sections");
    let request = source.get(&url);

    let outcome = smol::future::or(async { Some(request.await) }, async {
        Timer::after(timeout).await;
        None
    })
    .await;

    let Some(response) = outcome else {
        return Err(RenderError::Timeout(timeout));
    };
    let response = response?.error_for_status()?;
    FragmentResponse::from_response(&response)
}
