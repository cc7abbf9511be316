//! The page-renderer capability the monitor core depends on.
//!
//! The monitor only needs two operations from whatever renders the
//! storefront: fetch a page as content, and fetch an endpoint as JSON.
//! [`HttpRenderer`] implements the capability with a plain HTTP session
//! carrying a browser request profile (Chrome user agent, browser `Accept`
//! headers, persistent cookies) so storefront bot filtering that rejects
//! default scraper headers lets requests through. Anything heavier
//! (real browser automation) can slot in behind the same trait.

use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use dropwatch_core::AppConfig;

use crate::error::ScraperError;
use crate::retry::retry_with_backoff;

const ACCEPT_PAGE: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8";
const ACCEPT_JSON: &str = "application/json,text/html;q=0.9,*/*;q=0.8";

/// Capability contract: given a URL, return rendered page content or parsed
/// JSON. The monitor core depends only on this, not on how rendering is
/// achieved.
#[allow(async_fn_in_trait)]
pub trait PageRenderer {
    /// Fetches `url` and returns its content as text.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError`] when the page cannot be fetched within the
    /// configured timeout or the server responds with a non-2xx status.
    async fn render(&self, url: &str) -> Result<String, ScraperError>;

    /// Fetches `url` and parses the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError`] on fetch failure or a body that is not
    /// valid JSON.
    async fn fetch_json(&self, url: &str) -> Result<Value, ScraperError>;
}

/// HTTP-session implementation of [`PageRenderer`].
///
/// Keeps a cookie jar across requests so the session established by
/// [`HttpRenderer::acquire`]'s warm-up navigation carries into the polling
/// cycles. Transient errors (429, network failures) are retried with
/// exponential backoff; 404 and other non-2xx statuses are typed errors
/// returned without retrying.
#[derive(Debug)]
pub struct HttpRenderer {
    client: Client,
    /// Storefront origin, sent as the `Referer` for endpoint fetches.
    base_url: String,
    max_retries: u32,
    backoff_base_secs: u64,
}

impl HttpRenderer {
    /// Builds a renderer session from config without touching the network.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(config: &AppConfig) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(&config.user_agent)
            .cookie_store(true)
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            max_retries: config.max_retries,
            backoff_base_secs: config.retry_backoff_base_secs,
        })
    }

    /// Builds the session and warms it up the way a shopper arrives: the
    /// storefront landing page first, then the shop page. Failure here means
    /// the renderer cannot be acquired at all and is fatal to the caller.
    ///
    /// # Errors
    ///
    /// Propagates any [`ScraperError`] from the warm-up navigations.
    pub async fn acquire(config: &AppConfig) -> Result<Self, ScraperError> {
        let renderer = Self::new(config)?;
        renderer.render(&config.base_url).await?;
        renderer.render(&config.shop_url()).await?;
        tracing::info!(base_url = %config.base_url, "renderer session established");
        Ok(renderer)
    }

    async fn get_text(
        &self,
        url: &str,
        accept: &'static str,
        as_json_endpoint: bool,
    ) -> Result<String, ScraperError> {
        retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            let url = url.to_owned();
            async move {
                let mut request = self
                    .client
                    .get(&url)
                    .header(reqwest::header::ACCEPT, accept)
                    .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
                    .header(reqwest::header::REFERER, &self.base_url)
                    .header(reqwest::header::CACHE_CONTROL, "no-cache");

                if as_json_endpoint {
                    request = request.header("X-Requested-With", "XMLHttpRequest");
                }

                let response = request.send().await?;
                let status = response.status();

                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    let retry_after_secs = response
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok())
                        .unwrap_or(60);
                    return Err(ScraperError::RateLimited {
                        url,
                        retry_after_secs,
                    });
                }

                if status == reqwest::StatusCode::NOT_FOUND {
                    return Err(ScraperError::NotFound { url });
                }

                if !status.is_success() {
                    return Err(ScraperError::UnexpectedStatus {
                        status: status.as_u16(),
                        url,
                    });
                }

                Ok(response.text().await?)
            }
        })
        .await
    }
}

impl PageRenderer for HttpRenderer {
    async fn render(&self, url: &str) -> Result<String, ScraperError> {
        self.get_text(url, ACCEPT_PAGE, false).await
    }

    async fn fetch_json(&self, url: &str) -> Result<Value, ScraperError> {
        let body = self.get_text(url, ACCEPT_JSON, true).await?;
        serde_json::from_str(&body).map_err(|e| ScraperError::Deserialize {
            context: format!("JSON endpoint {url}"),
            source: e,
        })
    }
}
