//! Render URL construction

use url::Url;

use crate::NetError;

/// Query parameter carrying the requested section identifiers
pub const SECTIONS_PARAM: &str = "sections";

/// Pick the base URL for a render request.
///
/// An explicit render URL is resolved against `location`; without one the
/// current page path is used, with query and fragment dropped.
pub fn resolve_base(location: &Url, render_url: Option<&str>) -> Result<Url, NetError> {
    match render_url.map(str::trim).filter(|s| !s.is_empty()) {
        Some(render_url) => location
            .join(render_url)
            .map_err(|e| NetError::InvalidUrl(format!("{render_url}: {e}"))),
        None => {
            let mut base = location.clone();
            base.set_query(None);
            base.set_fragment(None);
            Ok(base)
        }
    }
}

/// Merge `sections=<a,b,...>` into `base`, replacing an existing `sections`
/// parameter and keeping every other one in order.
pub fn sections_url(base: &Url, sections: &[String]) -> Url {
    let joined = sections
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(",");

    let kept: Vec<(String, String)> = base
        .query_pairs()
        .filter(|(name, _)| name != SECTIONS_PARAM)
        .map(|(name, value)| (name.into_owned(), value.into_owned()))
        .collect();

    let mut url = base.clone();
    url.set_fragment(None);
    url.query_pairs_mut()
        .clear()
        .extend_pairs(kept)
        .append_pair(SECTIONS_PARAM, &joined);
    url
}
