//! Outward contract for whatever renders or alerts on verdicts.

use async_trait::async_trait;

use qrshield_core::{ShieldError, Verdict};

/// Trait for verdict presentation channels.
///
/// The engine hands every verdict for an admitted payload to its
/// presenters and decides nothing about rendering. Overlay text, popups,
/// and log lines are all implementations of this seam.
#[async_trait]
pub trait Presenter: Send + Sync {
    /// Render or deliver one verdict.
    async fn present(&self, verdict: &Verdict) -> Result<(), ShieldError>;

    /// Ask the user whether a URL should be opened.
    ///
    /// A capability the presenter may or may not offer; the default offers
    /// nothing. Implementations that can prompt return `Some(answer)`.
    async fn confirm_open(&self, _url: &str) -> Option<bool> {
        None
    }

    /// Human-readable name for this channel (e.g., "log", "terminal").
    fn name(&self) -> &str;
}

/// Presents verdicts as structured log lines.
#[derive(Debug, Default)]
pub struct LogPresenter;

#[async_trait]
impl Presenter for LogPresenter {
    async fn present(&self, verdict: &Verdict) -> Result<(), ShieldError> {
        let reasons: Vec<&str> = verdict
            .signals
            .iter()
            .map(|s| s.description.as_str())
            .collect();

        if verdict.suspicious {
            tracing::warn!(
                payload = %verdict.payload,
                final_url = verdict.final_url.as_deref().unwrap_or(""),
                reasons = ?reasons,
                "suspicious payload"
            );
        } else {
            tracing::info!(
                payload = %verdict.payload,
                signal_count = verdict.signals.len(),
                "payload looks clean"
            );
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "log"
    }
}
