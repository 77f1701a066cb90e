//! Outbound HTTP client.

use reqwest::header::{HeaderValue, REFERER, USER_AGENT};
use url::Url;

use crate::config::UpstreamConfig;
use crate::error::{ForwardError, ForwardResult};

/// Shared client for stream requests.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone, Debug)]
pub struct UpstreamClient {
    inner: reqwest::Client,
}

impl UpstreamClient {
    /// Environment proxy variables are ignored; requests go straight to the
    /// configured host. Redirects are followed, and every hop keeps the
    /// configured `Referer` instead of the URL it was redirected from.
    pub fn new() -> ForwardResult<Self> {
        let inner = reqwest::Client::builder()
            .no_proxy()
            .referer(false)
            .build()?;
        Ok(Self { inner })
    }

    /// Issue the single GET for a stream document.
    ///
    /// Inbound request headers are never forwarded; only the configured
    /// `Referer` and `User-Agent` are sent. The body is left unread so the
    /// caller can stream it.
    pub async fn fetch(
        &self,
        target: Url,
        upstream: &UpstreamConfig,
    ) -> ForwardResult<reqwest::Response> {
        let referer = HeaderValue::from_str(upstream.referer())
            .map_err(|e| ForwardError::InvalidTarget(format!("referer: {}", e)))?;
        let user_agent = HeaderValue::from_str(&upstream.user_agent)
            .map_err(|e| ForwardError::InvalidTarget(format!("user agent: {}", e)))?;

        let response = self
            .inner
            .get(target)
            .header(REFERER, referer)
            .header(USER_AGENT, user_agent)
            .send()
            .await?;

        Ok(response)
    }
}
