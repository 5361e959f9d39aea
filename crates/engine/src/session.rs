//! Wires the debouncer, evaluator, and presenters into one pipeline.
//!
//! Control flow per admitted payload: debouncer admits or suppresses →
//! evaluator scores → every presenter receives the verdict. Suppressed
//! payloads produce no verdict, no network call, and no presentation.

use std::time::Instant;

use qrshield_core::{Config, ShieldError, Verdict};

use crate::debounce::Debouncer;
use crate::evaluator::Evaluator;
use crate::presenter::Presenter;

/// One scanner session: owned debounce state plus the evaluation pipeline.
///
/// Lifecycle is tied to a capture session, not the process, so multiple
/// independent sessions can coexist. The debouncer is consulted and
/// updated *before* any evaluation work is dispatched (single-writer
/// discipline).
pub struct ScanSession {
    debouncer: Debouncer,
    evaluator: Evaluator,
    presenters: Vec<Box<dyn Presenter>>,
}

impl ScanSession {
    pub fn new(config: &Config, presenters: Vec<Box<dyn Presenter>>) -> Result<Self, ShieldError> {
        Ok(Self {
            debouncer: Debouncer::new(config.scanner.cooldown()),
            evaluator: Evaluator::new(config)?,
            presenters,
        })
    }

    /// Feed one decoded payload through the pipeline.
    ///
    /// Returns `None` when the debouncer suppressed it; otherwise the
    /// verdict after every presenter has seen it. Presenter failures are
    /// logged and never block other presenters or the caller.
    pub async fn process(&mut self, payload: &str, now: Instant) -> Option<Verdict> {
        if !self.debouncer.admit(payload, now) {
            tracing::debug!(payload, "payload suppressed by debounce window");
            return None;
        }

        let verdict = self.evaluator.evaluate(payload).await;

        for presenter in &self.presenters {
            if let Err(e) = presenter.present(&verdict).await {
                tracing::warn!(
                    presenter = presenter.name(),
                    error = %e,
                    "presenter failed"
                );
            }
        }

        Some(verdict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    /// Records presented payloads through a shared handle.
    struct RecordingPresenter {
        seen: Arc<Mutex<Vec<String>>>,
    }

    impl RecordingPresenter {
        fn new() -> (Self, Arc<Mutex<Vec<String>>>) {
            let seen = Arc::new(Mutex::new(Vec::new()));
            (Self { seen: seen.clone() }, seen)
        }
    }

    #[async_trait]
    impl Presenter for RecordingPresenter {
        async fn present(&self, verdict: &Verdict) -> Result<(), ShieldError> {
            self.seen.lock().unwrap().push(verdict.payload.clone());
            Ok(())
        }

        fn name(&self) -> &str {
            "recording"
        }
    }

    /// Always fails, to prove failures don't block other presenters.
    struct FailingPresenter;

    #[async_trait]
    impl Presenter for FailingPresenter {
        async fn present(&self, _verdict: &Verdict) -> Result<(), ShieldError> {
            Err(ShieldError::Present("channel unavailable".into()))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    fn session_with(presenters: Vec<Box<dyn Presenter>>) -> ScanSession {
        ScanSession::new(&Config::default(), presenters).unwrap()
    }

    #[tokio::test]
    async fn suppressed_payload_produces_nothing() {
        let (recorder, seen) = RecordingPresenter::new();
        let mut session = session_with(vec![Box::new(recorder)]);
        let t0 = Instant::now();

        assert!(session.process("ticket #42", t0).await.is_some());
        assert!(session
            .process("ticket #42", t0 + Duration::from_millis(33))
            .await
            .is_none());
        assert_eq!(*seen.lock().unwrap(), vec!["ticket #42"]);
    }

    #[tokio::test]
    async fn admitted_payload_reaches_every_presenter() {
        let (recorder, seen) = RecordingPresenter::new();
        let mut session = session_with(vec![Box::new(FailingPresenter), Box::new(recorder)]);

        let verdict = session.process("hello", Instant::now()).await.unwrap();
        assert!(!verdict.suspicious);
        // The recording presenter ran despite the failing one before it.
        assert_eq!(*seen.lock().unwrap(), vec!["hello"]);
    }

    #[tokio::test]
    async fn same_payload_after_cooldown_is_reevaluated() {
        let mut session = session_with(Vec::new());
        let t0 = Instant::now();

        assert!(session.process("javascript:x", t0).await.is_some());
        assert!(session
            .process("javascript:x", t0 + Duration::from_secs(2))
            .await
            .is_some());
    }
}
