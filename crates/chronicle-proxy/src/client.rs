//! Upstream file fetching with a timeout and a hard size cap.

use crate::error::ProxyError;
use chronicle_common::{ChronicleError, Result};
use chronicle_config::ProxyConfig;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

/// Placeholder replaced by the encoded file id.
pub const ID_PLACEHOLDER: &str = "{id}";

/// Content type used when the upstream does not send one.
pub const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// A fully read upstream body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedFile {
    /// Upstream `Content-Type`, if any.
    pub content_type: Option<String>,
    /// Body bytes, never longer than the configured limit.
    pub body: Vec<u8>,
}

/// Whether `id` is a non-empty run of `[A-Za-z0-9_-]`.
pub fn is_valid_file_id(id: &str) -> bool {
    !id.is_empty() && id.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

/// Upstream URL for `id` under `template`.
pub fn upstream_url(template: &str, id: &str) -> std::result::Result<Url, ProxyError> {
    if !is_valid_file_id(id) {
        return Err(ProxyError::InvalidId(id.to_string()));
    }
    let encoded: String = url::form_urlencoded::byte_serialize(id.as_bytes()).collect();
    Ok(Url::parse(&template.replace(ID_PLACEHOLDER, &encoded))?)
}

/// Single-attempt HTTP fetcher shared by all requests.
#[derive(Debug, Clone)]
pub struct FileFetcher {
    client: Client,
}

impl FileFetcher {
    /// Builds the underlying connection pool.
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| ChronicleError::network_with_source("Failed to create HTTP client", e))?;
        Ok(Self { client })
    }

    /// Fetches file `id` using the limits in `config`. No retries.
    #[instrument(skip(self, config))]
    pub async fn fetch(&self, config: &ProxyConfig, id: &str) -> std::result::Result<FetchedFile, ProxyError> {
        let url = upstream_url(&config.upstream_url_template, id)?;
        let limit = config.max_response_bytes;
        debug!("Fetching {}", url);

        let mut response = self
            .client
            .get(url)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .send()
            .await
            .map_err(ProxyError::from_request)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProxyError::Upstream {
                status: status.as_u16(),
            });
        }

        if response.content_length().is_some_and(|len| len > limit) {
            return Err(ProxyError::TooLarge { limit });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(String::from);

        // Content-Length can be absent or wrong, so count as we go
        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(ProxyError::from_request)? {
            if (body.len() + chunk.len()) as u64 > limit {
                return Err(ProxyError::TooLarge { limit });
            }
            body.extend_from_slice(&chunk);
        }

        debug!(bytes = body.len(), "Upstream body read");
        Ok(FetchedFile { content_type, body })
    }
}
