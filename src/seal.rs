//! Optional company seal image fetching and embedding.
//!
//! The seal fetch is the only network call and the only suspension point
//! in the whole pipeline. [`resolve`] never errors: every failure mode
//! degrades to a [`SealOutcome`] the signature builders can render. No
//! timeout is imposed here; callers needing bounded latency wrap the
//! whole generation call.

use crate::error::{Error, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use std::future::Future;
use std::pin::Pin;

/// A fetched seal image ready for embedding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealImage {
    /// Base64-encoded image bytes
    pub data: String,

    /// MIME type (e.g. "image/png")
    pub mime: String,
}

/// Three-way degradation of the seal fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SealOutcome {
    /// URL present and fetch succeeded
    Embedded(SealImage),

    /// URL present but fetch failed; generation continues with a
    /// visible placeholder
    LoadFailed {
        /// The URL that failed
        url: String,
        /// Failure description shown nowhere, logged only
        reason: String,
    },

    /// No seal URL configured
    Absent,
}

impl SealOutcome {
    /// Check if an image was embedded.
    pub fn is_embedded(&self) -> bool {
        matches!(self, SealOutcome::Embedded(_))
    }

    /// Check if the fetch failed.
    pub fn is_load_failed(&self) -> bool {
        matches!(self, SealOutcome::LoadFailed { .. })
    }
}

/// Boxed future returned by [`SealLoader::load`].
pub type SealFuture<'a> = Pin<Box<dyn Future<Output = Result<SealImage>> + Send + 'a>>;

/// Source of seal images.
///
/// Implement this to substitute the transport, e.g. an in-memory loader
/// in tests or a cache-backed loader in a service.
pub trait SealLoader: Send + Sync {
    /// Fetch the image behind `url`.
    fn load<'a>(&'a self, url: &'a str) -> SealFuture<'a>;
}

/// HTTP seal loader performing a plain GET.
///
/// Deliberately configures no request timeout: a hanging fetch hangs
/// only its own generation call.
pub struct HttpSealLoader {
    client: reqwest::Client,
}

impl HttpSealLoader {
    /// Create a loader with a fresh HTTP client.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpSealLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl SealLoader for HttpSealLoader {
    fn load<'a>(&'a self, url: &'a str) -> SealFuture<'a> {
        Box::pin(async move {
            let response = self.client.get(url).send().await?.error_for_status()?;

            let mime = response
                .headers()
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|value| value.to_str().ok())
                .map(|value| value.split(';').next().unwrap_or(value).trim().to_string())
                .filter(|value| value.starts_with("image/"))
                .unwrap_or_else(|| mime_from_url(url).to_string());

            let bytes = response.bytes().await?;
            if bytes.is_empty() {
                return Err(Error::SealFetch("empty response body".to_string()));
            }

            Ok(SealImage {
                data: BASE64.encode(&bytes),
                mime,
            })
        })
    }
}

/// Loader for offline callers; every fetch fails, so configured seal
/// URLs degrade to the visible load-failed placeholder.
pub struct NullSealLoader;

impl SealLoader for NullSealLoader {
    fn load<'a>(&'a self, _url: &'a str) -> SealFuture<'a> {
        Box::pin(async { Err(Error::SealFetch("seal fetching disabled".to_string())) })
    }
}

/// Guess a MIME type from the URL extension. Defaults to PNG.
fn mime_from_url(url: &str) -> &'static str {
    let path = url.split(['?', '#']).next().unwrap_or(url).to_lowercase();
    if path.ends_with(".jpg") || path.ends_with(".jpeg") {
        "image/jpeg"
    } else if path.ends_with(".gif") {
        "image/gif"
    } else if path.ends_with(".webp") {
        "image/webp"
    } else if path.ends_with(".svg") {
        "image/svg+xml"
    } else {
        "image/png"
    }
}

/// Resolve a company's optional seal URL to an outcome. Never errors.
pub async fn resolve(loader: &dyn SealLoader, url: Option<&str>) -> SealOutcome {
    let Some(url) = url.map(str::trim).filter(|url| !url.is_empty()) else {
        return SealOutcome::Absent;
    };

    match loader.load(url).await {
        Ok(image) => {
            log::debug!("embedded seal image from {url}");
            SealOutcome::Embedded(image)
        }
        Err(err) => {
            log::warn!("seal image fetch failed for {url}: {err}");
            SealOutcome::LoadFailed {
                url: url.to_string(),
                reason: err.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StaticSealLoader;

    impl SealLoader for StaticSealLoader {
        fn load<'a>(&'a self, _url: &'a str) -> SealFuture<'a> {
            Box::pin(async {
                Ok(SealImage {
                    data: BASE64.encode(b"png-bytes"),
                    mime: "image/png".to_string(),
                })
            })
        }
    }

    #[tokio::test]
    async fn test_resolve_absent_without_url() {
        let outcome = resolve(&StaticSealLoader, None).await;
        assert_eq!(outcome, SealOutcome::Absent);

        let outcome = resolve(&StaticSealLoader, Some("   ")).await;
        assert_eq!(outcome, SealOutcome::Absent);
    }

    #[tokio::test]
    async fn test_resolve_embeds_on_success() {
        let outcome = resolve(&StaticSealLoader, Some("https://example.com/seal.png")).await;
        assert!(outcome.is_embedded());
    }

    #[tokio::test]
    async fn test_resolve_degrades_on_failure() {
        let outcome = resolve(&NullSealLoader, Some("https://example.com/seal.png")).await;
        match outcome {
            SealOutcome::LoadFailed { url, reason } => {
                assert_eq!(url, "https://example.com/seal.png");
                assert!(reason.contains("disabled"));
            }
            other => panic!("expected LoadFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_mime_from_url() {
        assert_eq!(mime_from_url("https://x/seal.png"), "image/png");
        assert_eq!(mime_from_url("https://x/seal.JPG?v=2"), "image/jpeg");
        assert_eq!(mime_from_url("https://x/seal.webp#frag"), "image/webp");
        assert_eq!(mime_from_url("https://x/seal"), "image/png");
    }
}
