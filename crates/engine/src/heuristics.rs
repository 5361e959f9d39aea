//! Ordered registry of independent suspicion heuristics.
//!
//! Each heuristic is a predicate paired with the [`SignalKind`] it emits,
//! so individual checks are unit-testable in isolation and new checks slot
//! in without touching evaluator control flow. Registry order is the order
//! signals appear in a verdict.

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use qrshield_core::{Signal, SignalKind};

// ── Fixed heuristic constants ───────────────────────────────────────

/// Known URL-shortening service hosts.
pub const SHORTENER_DOMAINS: &[&str] = &["bit.ly", "tinyurl.com", "t.co", "goo.gl"];

/// Extensions that deliver executables straight to the device.
pub const DANGEROUS_EXTENSIONS: &[&str] = &[".exe", ".apk", ".bat", ".sh"];

/// Payloads longer than this are suspicious for a QR symbol.
pub const MAX_PAYLOAD_LEN: usize = 200;

/// Minimum run of base64-alphabet characters to count as an encoded blob.
pub const MIN_BASE64_RUN: usize = 100;

/// Known-phishing hosts observed in the wild. Extended at runtime via
/// `QRSHIELD_BLOCKLIST`.
pub const DEFAULT_BLOCKLIST: &[&str] = &[
    "example-phish.com",
    "malicious-site.net",
    "fake-login.org",
    "discord-gift.com",
    "free-nitro.com",
    "discord-airdrop.com",
    "discord-fake-login.com",
    "phishingsite.net",
];

/// Dotted-quad IP literal: four 1-3 digit groups. Deliberately no per-octet
/// range validation; an out-of-range quad host is no less suspicious.
static IP_LITERAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{1,3}(\.\d{1,3}){3}$").unwrap());

static BASE64_BLOB_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!("^[A-Za-z0-9+/=]{{{MIN_BASE64_RUN},}}$")).unwrap()
});

// ── Registry ────────────────────────────────────────────────────────

/// Everything a heuristic may inspect for one evaluation.
pub struct HeuristicContext<'a> {
    /// Original decoded payload, untouched.
    pub payload: &'a str,
    /// Whether the payload started with an `http://`/`https://` prefix.
    pub url_payload: bool,
    /// Parsed final URL, when the payload was URL-shaped and the resolved
    /// URL parsed. Host/path checks skip when this is absent.
    pub final_url: Option<&'a Url>,
    /// Whether the resolver observed a redirect chain.
    pub redirected: bool,
}

impl<'a> HeuristicContext<'a> {
    fn host(&self) -> Option<&str> {
        self.final_url.and_then(|u| u.host_str())
    }
}

type Check = Box<dyn Fn(&HeuristicContext) -> Option<String> + Send + Sync>;

/// One registered heuristic: the signal kind it emits plus its predicate.
pub struct Heuristic {
    kind: SignalKind,
    check: Check,
}

impl Heuristic {
    fn new(
        kind: SignalKind,
        check: impl Fn(&HeuristicContext) -> Option<String> + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            check: Box::new(check),
        }
    }

    pub fn kind(&self) -> SignalKind {
        self.kind
    }

    /// Run the predicate, producing a signal on match.
    pub fn evaluate(&self, ctx: &HeuristicContext) -> Option<Signal> {
        (self.check)(ctx).map(|description| Signal {
            kind: self.kind,
            description,
        })
    }
}

/// Build the fixed, ordered heuristic list. `blocklist` entries are
/// expected lower-cased without a `www.` prefix.
pub fn registry(blocklist: Vec<String>) -> Vec<Heuristic> {
    vec![
        Heuristic::new(SignalKind::Redirected, check_redirected),
        Heuristic::new(SignalKind::ShortenerDomain, check_shortener),
        Heuristic::new(SignalKind::BlocklistedHost, move |ctx| {
            check_blocklist(ctx, &blocklist)
        }),
        Heuristic::new(SignalKind::DangerousExtension, check_dangerous_extension),
        Heuristic::new(SignalKind::IpLiteralHost, check_ip_literal),
        Heuristic::new(SignalKind::ExcessiveLength, check_excessive_length),
        Heuristic::new(SignalKind::ScriptScheme, check_script_scheme),
        Heuristic::new(SignalKind::Base64Blob, check_base64_blob),
    ]
}

// ── Checks ──────────────────────────────────────────────────────────

fn check_redirected(ctx: &HeuristicContext) -> Option<String> {
    ctx.redirected.then(|| "redirect chain detected".to_string())
}

fn check_shortener(ctx: &HeuristicContext) -> Option<String> {
    let host = ctx.host()?;
    SHORTENER_DOMAINS
        .iter()
        .find(|d| host.ends_with(*d))
        .map(|_| format!("link shortener host: {host}"))
}

fn check_blocklist(ctx: &HeuristicContext, blocklist: &[String]) -> Option<String> {
    let host = ctx.host()?;
    let bare = host.strip_prefix("www.").unwrap_or(host);
    blocklist
        .iter()
        .any(|b| b.as_str() == bare)
        .then(|| format!("host on known-phishing blocklist: {bare}"))
}

fn check_dangerous_extension(ctx: &HeuristicContext) -> Option<String> {
    let path = ctx.final_url?.path();
    DANGEROUS_EXTENSIONS
        .iter()
        .find(|ext| path.ends_with(*ext))
        .map(|ext| format!("path ends with dangerous extension {ext}"))
}

fn check_ip_literal(ctx: &HeuristicContext) -> Option<String> {
    let host = ctx.host()?;
    IP_LITERAL_RE
        .is_match(host)
        .then(|| format!("raw IP address host: {host}"))
}

/// Length is judged on the *original* payload, not the resolved URL, and
/// only for URL-shaped payloads.
fn check_excessive_length(ctx: &HeuristicContext) -> Option<String> {
    if !ctx.url_payload {
        return None;
    }
    let len = ctx.payload.chars().count();
    (len > MAX_PAYLOAD_LEN).then(|| format!("payload length {len} exceeds {MAX_PAYLOAD_LEN}"))
}

fn check_script_scheme(ctx: &HeuristicContext) -> Option<String> {
    ctx.payload
        .trim()
        .to_lowercase()
        .starts_with("javascript:")
        .then(|| "javascript: scheme payload".to_string())
}

fn check_base64_blob(ctx: &HeuristicContext) -> Option<String> {
    BASE64_BLOB_RE
        .is_match(ctx.payload)
        .then(|| "long base64-alphabet blob".to_string())
}
