//! Shared data model for payload evaluation.
//!
//! A [`Verdict`] is produced fresh for every admitted payload and handed to
//! whatever presents it; it has no lifecycle beyond that call. The matched
//! [`Signal`] list keeps registry order so output is deterministic.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ── Signals ─────────────────────────────────────────────────────────

/// Which heuristic matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    /// The resolver observed at least one redirect hop.
    Redirected,
    /// Final host belongs to a known URL-shortening service.
    ShortenerDomain,
    /// Final host is on the known-phishing blocklist.
    BlocklistedHost,
    /// Final path ends with an executable-carrying extension.
    DangerousExtension,
    /// Final host is a raw dotted-quad IP literal.
    IpLiteralHost,
    /// Original payload is unusually long for a QR symbol.
    ExcessiveLength,
    /// Payload starts with a `javascript:` scheme.
    ScriptScheme,
    /// Payload is one long run of base64-alphabet characters.
    Base64Blob,
}

impl SignalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalKind::Redirected => "redirected",
            SignalKind::ShortenerDomain => "shortener_domain",
            SignalKind::BlocklistedHost => "blocklisted_host",
            SignalKind::DangerousExtension => "dangerous_extension",
            SignalKind::IpLiteralHost => "ip_literal_host",
            SignalKind::ExcessiveLength => "excessive_length",
            SignalKind::ScriptScheme => "script_scheme",
            SignalKind::Base64Blob => "base64_blob",
        }
    }
}

/// One matched suspicion heuristic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signal {
    pub kind: SignalKind,
    /// Human-readable reason shown to the user.
    pub description: String,
}

// ── Redirect outcome ────────────────────────────────────────────────

/// Result of following a bounded redirect chain for one candidate URL.
///
/// Owned by the evaluation that requested it and discarded afterwards.
/// Network failures are data here, never an `Err`: a failed hop produces
/// the fallback outcome with `error` set, and heuristics continue against
/// the original URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedirectOutcome {
    /// URL the chain ended on (the input URL when nothing redirected or
    /// resolution fell back).
    pub final_url: String,
    /// URL reached after each followed redirect, in order.
    pub hops: Vec<String>,
    /// True iff `final_url` differs from the input URL.
    pub redirected: bool,
    /// Network-level failure text when a hop failed.
    pub error: Option<String>,
}

impl RedirectOutcome {
    /// Fallback outcome: the original URL stands in for the final one.
    ///
    /// Used both when a hop failed (`error` set) and when the caller
    /// abandoned the resolution at a hop boundary (`error` empty).
    pub fn fallback(url: impl Into<String>, error: Option<String>) -> Self {
        Self {
            final_url: url.into(),
            hops: Vec::new(),
            redirected: false,
            error,
        }
    }
}

// ── Verdict ─────────────────────────────────────────────────────────

/// The scoring result for one admitted payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Verdict {
    /// Raw decoded payload, untouched.
    pub payload: String,
    /// Resolved final URL when the payload was treated as a URL
    /// (falls back to the original text when resolution failed);
    /// `None` for non-URL payloads.
    pub final_url: Option<String>,
    /// Every matched signal, in registry order.
    pub signals: Vec<Signal>,
    /// True iff at least two independent signals matched.
    pub suspicious: bool,
    /// When the evaluation ran. Informational only.
    pub evaluated_at: DateTime<Utc>,
}

impl Verdict {
    pub fn has_signal(&self, kind: SignalKind) -> bool {
        self.signals.iter().any(|s| s.kind == kind)
    }

    /// Matched signal kinds in registry order.
    pub fn signal_kinds(&self) -> Vec<SignalKind> {
        self.signals.iter().map(|s| s.kind).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signal_kind_serializes_snake_case() {
        let json = serde_json::to_string(&SignalKind::ShortenerDomain).unwrap();
        assert_eq!(json, "\"shortener_domain\"");
        let json = serde_json::to_string(&SignalKind::Base64Blob).unwrap();
        assert_eq!(json, "\"base64_blob\"");
    }

    #[test]
    fn signal_kind_as_str_matches_serde_name() {
        for kind in [
            SignalKind::Redirected,
            SignalKind::ShortenerDomain,
            SignalKind::BlocklistedHost,
            SignalKind::DangerousExtension,
            SignalKind::IpLiteralHost,
            SignalKind::ExcessiveLength,
            SignalKind::ScriptScheme,
            SignalKind::Base64Blob,
        ] {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }

    #[test]
    fn fallback_outcome_is_not_redirected() {
        let outcome = RedirectOutcome::fallback("https://a.test/", Some("timed out".into()));
        assert_eq!(outcome.final_url, "https://a.test/");
        assert!(!outcome.redirected);
        assert!(outcome.hops.is_empty());
        assert_eq!(outcome.error.as_deref(), Some("timed out"));
    }

    #[test]
    fn verdict_signal_lookup() {
        let verdict = Verdict {
            payload: "javascript:alert(1)".into(),
            final_url: None,
            signals: vec![Signal {
                kind: SignalKind::ScriptScheme,
                description: "javascript: scheme payload".into(),
            }],
            suspicious: false,
            evaluated_at: Utc::now(),
        };
        assert!(verdict.has_signal(SignalKind::ScriptScheme));
        assert!(!verdict.has_signal(SignalKind::Base64Blob));
        assert_eq!(verdict.signal_kinds(), vec![SignalKind::ScriptScheme]);
    }
}
