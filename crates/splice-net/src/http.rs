//! HTTP section source
//!
//! A reqwest blocking client driven from smol's blocking thread pool.

use std::time::Duration;

use url::Url;

use crate::{FetchFuture, FetchResponse, NetError, SectionSource};

const DEFAULT_USER_AGENT: &str = concat!("splice/", env!("CARGO_PKG_VERSION"));

/// Fetches render URLs over HTTP(S)
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::blocking::Client,
}

impl HttpSource {
    /// Client with the default user agent and a 30s transport timeout
    pub fn new() -> Result<Self, NetError> {
        Self::with_user_agent(DEFAULT_USER_AGENT)
    }

    pub fn with_user_agent(user_agent: &str) -> Result<Self, NetError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| NetError::Network(e.to_string()))?;
        Ok(Self { client })
    }
}

impl SectionSource for HttpSource {
    fn get(&self, url: &Url) -> FetchFuture {
        let client = self.client.clone();
        let url = url.clone();
        Box::pin(smol::unblock(move || fetch_blocking(&client, url)))
    }
}

fn fetch_blocking(client: &reqwest::blocking::Client, url: Url) -> Result<FetchResponse, NetError> {
    tracing::debug!("Fetching from network: {}", url);

    let response = client
        .get(url)
        .header(reqwest::header::ACCEPT, "application/json")
        .send()
        .map_err(|e| NetError::Network(e.to_string()))?;

    let status = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect();
    let body = response
        .bytes()
        .map_err(|e| NetError::Network(e.to_string()))?
        .to_vec();

    tracing::debug!(status, bytes = body.len(), "response received");
    Ok(FetchResponse { status, headers, body })
}
