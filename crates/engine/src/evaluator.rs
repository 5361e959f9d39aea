//! Combines redirect resolution and the heuristic registry into verdicts.

use chrono::Utc;
use tokio_util::sync::CancellationToken;
use url::Url;

use qrshield_core::{Config, RedirectOutcome, ShieldError, Verdict};

use crate::heuristics::{self, Heuristic, HeuristicContext};
use crate::resolver::RedirectResolver;

/// A verdict is suspicious once this many independent signals match.
/// Any single heuristic alone is too prone to false positives.
pub const SUSPICION_THRESHOLD: usize = 2;

/// Scores one payload at a time.
///
/// Deterministic given the payload and the live state of the network;
/// redirect targets may of course change between calls.
pub struct Evaluator {
    resolver: RedirectResolver,
    heuristics: Vec<Heuristic>,
}

impl Evaluator {
    pub fn new(config: &Config) -> Result<Self, ShieldError> {
        let resolver = RedirectResolver::new(&config.resolver)?;

        let mut blocklist: Vec<String> = heuristics::DEFAULT_BLOCKLIST
            .iter()
            .map(|s| s.to_string())
            .collect();
        blocklist.extend(config.scanner.extra_blocklist.iter().cloned());

        Ok(Self {
            resolver,
            heuristics: heuristics::registry(blocklist),
        })
    }

    /// Score a payload. Never fails: network trouble degrades to
    /// evaluating the original URL without redirect inspection.
    pub async fn evaluate(&self, payload: &str) -> Verdict {
        self.evaluate_with_cancel(payload, &CancellationToken::new())
            .await
    }

    /// Like [`evaluate`](Self::evaluate), with an abandonable resolution.
    pub async fn evaluate_with_cancel(
        &self,
        payload: &str,
        cancel: &CancellationToken,
    ) -> Verdict {
        // Case-sensitive on purpose: QR encoders emit the scheme verbatim.
        let url_payload = payload.starts_with("http://") || payload.starts_with("https://");

        let outcome: Option<RedirectOutcome> = if url_payload {
            Some(self.resolver.resolve_with_cancel(payload, cancel).await)
        } else {
            None
        };

        // An unparseable final URL degrades to host/path-less heuristics.
        let parsed: Option<Url> = outcome
            .as_ref()
            .and_then(|o| Url::parse(&o.final_url).ok());

        let ctx = HeuristicContext {
            payload,
            url_payload,
            final_url: parsed.as_ref(),
            redirected: outcome.as_ref().is_some_and(|o| o.redirected),
        };

        // Every registered heuristic runs; signals accumulate in registry
        // order. No early return on first match.
        let signals: Vec<_> = self
            .heuristics
            .iter()
            .filter_map(|h| h.evaluate(&ctx))
            .collect();

        let suspicious = signals.len() >= SUSPICION_THRESHOLD;

        tracing::debug!(
            suspicious,
            signal_count = signals.len(),
            url_payload,
            "payload evaluated"
        );

        Verdict {
            payload: payload.to_string(),
            final_url: outcome.map(|o| o.final_url),
            signals,
            suspicious,
            evaluated_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qrshield_core::SignalKind;

    fn evaluator() -> Evaluator {
        Evaluator::new(&Config::default()).unwrap()
    }

    // Non-URL payloads never touch the resolver, so these tests run with
    // no network at all.

    #[tokio::test]
    async fn plain_text_yields_empty_verdict() {
        let verdict = evaluator().evaluate("hello from a business card").await;
        assert!(verdict.signals.is_empty());
        assert!(!verdict.suspicious);
        assert_eq!(verdict.final_url, None);
    }

    #[tokio::test]
    async fn script_scheme_alone_is_not_suspicious() {
        let verdict = evaluator().evaluate("javascript:alert(1)").await;
        assert_eq!(verdict.signal_kinds(), vec![SignalKind::ScriptScheme]);
        assert!(!verdict.suspicious);
    }

    #[tokio::test]
    async fn base64_blob_alone_is_not_suspicious() {
        let blob = "QWxh".repeat(40); // 160 chars
        let verdict = evaluator().evaluate(&blob).await;
        assert_eq!(verdict.signal_kinds(), vec![SignalKind::Base64Blob]);
        assert!(!verdict.suspicious);
    }

    #[tokio::test]
    async fn uppercase_scheme_is_not_a_url_payload() {
        // Scheme matching is case-sensitive; this payload is treated as
        // plain text and makes no network call.
        let verdict = evaluator().evaluate("HTTPS://example.com/").await;
        assert_eq!(verdict.final_url, None);
        assert!(verdict.signals.is_empty());
    }

    #[tokio::test]
    async fn evaluation_is_idempotent_without_network() {
        let evaluator = evaluator();
        let a = evaluator.evaluate("javascript:void(0)").await;
        let b = evaluator.evaluate("javascript:void(0)").await;
        assert_eq!(a.signals, b.signals);
        assert_eq!(a.suspicious, b.suspicious);
        assert_eq!(a.final_url, b.final_url);
    }
}
