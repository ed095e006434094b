use crate::browser::Renderer;
use crate::config::HttpIdentity;
use reqwest::header::{ACCEPT_LANGUAGE, HeaderMap, HeaderValue, REFERER, USER_AGENT};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Errors raised while building a fetcher
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid {header} header value: {value:?}")]
    InvalidHeader { header: &'static str, value: String },

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// How a page should be retrieved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    /// Plain GET, for pages that render without JavaScript
    Static,
    /// Full browser render, for pages filled in by client-side scripts
    Browser,
}

/// Retrieves page HTML either with a plain HTTP request or through a browser.
///
/// Both modes report failures by logging them and returning `None`.
pub struct PageFetcher {
    client: reqwest::Client,
    renderer: Arc<dyn Renderer>,
}

impl PageFetcher {
    pub fn new(
        identity: &HttpIdentity,
        timeout: Duration,
        renderer: Arc<dyn Renderer>,
    ) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .default_headers(identity_headers(identity)?)
            .timeout(timeout)
            .build()?;

        Ok(Self { client, renderer })
    }

    pub async fn fetch(&self, url: &str, mode: FetchMode) -> Option<String> {
        match mode {
            FetchMode::Static => self.fetch_static(url).await,
            FetchMode::Browser => self.fetch_browser(url).await,
        }
    }

    /// Single GET; the body is returned only for a success status
    pub async fn fetch_static(&self, url: &str) -> Option<String> {
        ::log::info!("Static fetch: {}", url);

        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                ::log::error!("Static fetch of {} failed: {}", url, e);
                return None;
            }
        };

        let response = match response.error_for_status() {
            Ok(response) => response,
            Err(e) => {
                ::log::error!("Static fetch of {} returned an error status: {}", url, e);
                return None;
            }
        };

        match response.text().await {
            Ok(body) => Some(body),
            Err(e) => {
                ::log::error!("Failed to read body of {}: {}", url, e);
                None
            }
        }
    }

    /// Render the page in a browser without running any routines
    pub async fn fetch_browser(&self, url: &str) -> Option<String> {
        ::log::info!("Browser fetch: {}", url);
        self.renderer.render(url, &[]).await
    }
}

fn identity_headers(identity: &HttpIdentity) -> Result<HeaderMap, FetchError> {
    let mut headers = HeaderMap::new();
    for (name, header, value) in [
        (USER_AGENT, "User-Agent", &identity.user_agent),
        (ACCEPT_LANGUAGE, "Accept-Language", &identity.accept_language),
        (REFERER, "Referer", &identity.referer),
    ] {
        let value = HeaderValue::from_str(value).map_err(|_| FetchError::InvalidHeader {
            header,
            value: value.clone(),
        })?;
        headers.insert(name, value);
    }
    Ok(headers)
}
