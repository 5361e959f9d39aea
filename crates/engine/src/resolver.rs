//! Bounded HTTP redirect-chain resolver.
//!
//! A short innocuous-looking link can silently redirect to a
//! credential-harvesting or malware-delivery host; evaluating only the
//! literal QR text misses that. The resolver follows the chain hop by hop
//! with redirects disabled so every `Location` passes through the engine.

use reqwest::header::LOCATION;
use tokio_util::sync::CancellationToken;
use url::Url;

use qrshield_core::{RedirectOutcome, ResolverConfig, ShieldError};

/// Follows redirect chains one hop at a time, up to a fixed cap.
///
/// Network failures never surface as errors: any failed hop aborts the
/// chain and yields the fallback outcome carrying the original URL, so the
/// evaluator can continue its heuristics regardless.
#[derive(Debug, Clone)]
pub struct RedirectResolver {
    /// Shared HTTP client with redirect following disabled.
    client: reqwest::Client,
    max_hops: u32,
}

impl RedirectResolver {
    /// Build a resolver from config.
    ///
    /// Fails fast on unusable config (`max_hops` or timeout of zero) —
    /// that is a programming error, not a runtime condition.
    pub fn new(config: &ResolverConfig) -> Result<Self, ShieldError> {
        if config.max_hops == 0 {
            return Err(ShieldError::Config("max_hops must be at least 1".into()));
        }
        if config.timeout_secs == 0 {
            return Err(ShieldError::Config("timeout must be non-zero".into()));
        }

        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout())
            .build()
            .map_err(|e| ShieldError::Http(e.to_string()))?;

        Ok(Self {
            client,
            max_hops: config.max_hops,
        })
    }

    /// Follow redirects from `url` and report where the chain ends.
    pub async fn resolve(&self, url: &str) -> RedirectOutcome {
        self.resolve_with_cancel(url, &CancellationToken::new())
            .await
    }

    /// Like [`resolve`](Self::resolve), but abandonable at any hop
    /// boundary. A cancelled resolution returns the original URL as a
    /// non-erroring partial outcome.
    pub async fn resolve_with_cancel(
        &self,
        url: &str,
        cancel: &CancellationToken,
    ) -> RedirectOutcome {
        let mut current = url.to_string();
        let mut hops = Vec::new();

        for _ in 0..self.max_hops {
            let response = tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::debug!(url, "redirect resolution abandoned");
                    return RedirectOutcome::fallback(url, None);
                }
                r = self.client.get(&current).send() => r,
            };

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    tracing::debug!(url, error = %e, "hop failed, falling back to original URL");
                    return RedirectOutcome::fallback(url, Some(e.to_string()));
                }
            };

            if !response.status().is_redirection() {
                break;
            }

            let location = match response.headers().get(LOCATION).and_then(|v| v.to_str().ok()) {
                Some(l) => l.to_string(),
                None => break,
            };

            // Relative references resolve against the URL that issued them.
            let next = match join_location(&current, &location) {
                Some(u) => u,
                None => break,
            };

            tracing::debug!(from = %current, to = %next, "following redirect");
            hops.push(next.clone());
            current = next;
        }

        let redirected = current != url;
        RedirectOutcome {
            final_url: current,
            hops,
            redirected,
            error: None,
        }
    }
}

/// Resolve a `Location` header value against the URL that produced it.
fn join_location(current: &str, location: &str) -> Option<String> {
    match Url::parse(current) {
        Ok(base) => base.join(location).ok().map(|u| u.to_string()),
        // Base didn't parse; only an absolute Location can continue the chain.
        Err(_) => Url::parse(location).ok().map(|u| u.to_string()),
    }
}
