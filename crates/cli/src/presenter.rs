use async_trait::async_trait;

use qrshield_core::{ShieldError, Verdict};
use qrshield_engine::Presenter;

/// Prints verdicts to stdout, as readable text or one JSON object per line.
pub struct TermPresenter {
    json: bool,
}

impl TermPresenter {
    pub fn new(json: bool) -> Self {
        Self { json }
    }
}

#[async_trait]
impl Presenter for TermPresenter {
    async fn present(&self, verdict: &Verdict) -> Result<(), ShieldError> {
        if self.json {
            let line = serde_json::to_string(verdict)
                .map_err(|e| ShieldError::Present(e.to_string()))?;
            println!("{line}");
            return Ok(());
        }

        if verdict.suspicious {
            println!("⚠ suspicious: {}", verdict.payload);
        } else {
            println!("✓ clean: {}", verdict.payload);
        }

        // Show the final URL only when redirection moved us somewhere else.
        if let Some(final_url) = &verdict.final_url {
            if final_url != &verdict.payload {
                println!("  final URL: {final_url}");
            }
        }

        for signal in &verdict.signals {
            println!("  - {}", signal.description);
        }

        Ok(())
    }

    fn name(&self) -> &str {
        "terminal"
    }
}
