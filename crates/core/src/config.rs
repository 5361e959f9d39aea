use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

fn env_u64(key: &str, default: u64) -> u64 {
    env_opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_u32(key: &str, default: u32) -> u32 {
    env_opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

/// Default User-Agent sent on every hop. Some phishing infrastructure
/// serves different content to recognizable scripted clients, so the
/// resolver identifies as an ordinary desktop browser.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64)";

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub resolver: ResolverConfig,
    pub scanner: ScannerConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    pub fn from_env() -> Self {
        Self {
            resolver: ResolverConfig::from_env(),
            scanner: ScannerConfig::from_env(),
        }
    }

    /// Print a summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded:");
        tracing::info!(
            "  resolver:  timeout={}s, max_hops={}",
            self.resolver.timeout_secs,
            self.resolver.max_hops
        );
        tracing::info!(
            "  scanner:   cooldown={}ms, extra_blocklist={} hosts",
            self.scanner.cooldown_ms,
            self.scanner.extra_blocklist.len()
        );
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            resolver: ResolverConfig::default(),
            scanner: ScannerConfig::default(),
        }
    }
}

// ── Redirect resolver ─────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Per-hop HTTP timeout in seconds.
    pub timeout_secs: u64,
    /// Maximum redirect hops to follow before giving up on the chain.
    pub max_hops: u32,
    /// User-Agent header sent on every hop.
    pub user_agent: String,
}

impl ResolverConfig {
    fn from_env() -> Self {
        Self {
            timeout_secs: env_u64("QRSHIELD_TIMEOUT_SECS", 5),
            max_hops: env_u32("QRSHIELD_MAX_HOPS", 5),
            user_agent: env_or("QRSHIELD_USER_AGENT", DEFAULT_USER_AGENT),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 5,
            max_hops: 5,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

// ── Scan session ──────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannerConfig {
    /// Debounce cooldown in milliseconds: minimum elapsed time before an
    /// identical payload is re-evaluated.
    pub cooldown_ms: u64,
    /// Extra blocklisted hosts, merged with the built-in list
    /// (comma-separated in `QRSHIELD_BLOCKLIST`).
    pub extra_blocklist: Vec<String>,
}

impl ScannerConfig {
    fn from_env() -> Self {
        let extra_blocklist = env_opt("QRSHIELD_BLOCKLIST")
            .map(|v| {
                v.split(',')
                    .map(|s| s.trim().to_lowercase())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();
        Self {
            cooldown_ms: env_u64("QRSHIELD_COOLDOWN_MS", 2_000),
            extra_blocklist,
        }
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            cooldown_ms: 2_000,
            extra_blocklist: Vec::new(),
        }
    }
}
