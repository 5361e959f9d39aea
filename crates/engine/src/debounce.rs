//! Suppresses re-evaluation of a payload the decoder keeps seeing.
//!
//! A camera loop re-decodes the same physical symbol on dozens of
//! consecutive frames; without debounce every frame would re-issue
//! network requests and re-alert the user.

use std::time::{Duration, Instant};

/// Minimum elapsed time before an identical payload is re-admitted.
pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(2);

/// Two-state debounce machine: idle, or cooling down on the last admitted
/// payload. Owned by its scan session; single writer.
#[derive(Debug)]
pub struct Debouncer {
    cooldown: Duration,
    last_payload: Option<String>,
    last_seen_at: Option<Instant>,
}

impl Debouncer {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            last_payload: None,
            last_seen_at: None,
        }
    }

    /// Decide whether `payload` seen at `now` should be evaluated.
    ///
    /// Admits when the payload differs from the last admitted one, or when
    /// the cooldown has elapsed since it was last admitted. On admission the
    /// state is unconditionally overwritten; suppression leaves it untouched,
    /// so the window is measured from the last admission, not the last
    /// sighting.
    pub fn admit(&mut self, payload: &str, now: Instant) -> bool {
        let suppress = match (&self.last_payload, self.last_seen_at) {
            (Some(last), Some(seen)) => {
                last == payload && now.saturating_duration_since(seen) < self.cooldown
            }
            _ => false,
        };

        if suppress {
            return false;
        }

        self.last_payload = Some(payload.to_string());
        self.last_seen_at = Some(now);
        true
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_COOLDOWN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_sighting_is_admitted() {
        let mut debouncer = Debouncer::default();
        assert!(debouncer.admit("https://example.com/", Instant::now()));
    }

    #[test]
    fn repeat_within_cooldown_is_suppressed() {
        let mut debouncer = Debouncer::default();
        let t0 = Instant::now();
        assert!(debouncer.admit("payload", t0));
        assert!(!debouncer.admit("payload", t0 + Duration::from_secs(1)));
    }

    #[test]
    fn repeat_after_cooldown_is_admitted() {
        let mut debouncer = Debouncer::default();
        let t0 = Instant::now();
        assert!(debouncer.admit("payload", t0));
        assert!(debouncer.admit("payload", t0 + Duration::from_secs(2)));
    }

    #[test]
    fn different_payload_is_admitted_immediately() {
        let mut debouncer = Debouncer::default();
        let t0 = Instant::now();
        assert!(debouncer.admit("payload-a", t0));
        assert!(debouncer.admit("payload-b", t0 + Duration::from_millis(100)));
    }

    #[test]
    fn suppression_does_not_extend_the_window() {
        let mut debouncer = Debouncer::default();
        let t0 = Instant::now();
        assert!(debouncer.admit("payload", t0));
        // Sighting at t0+1.9s is suppressed and must not refresh the window.
        assert!(!debouncer.admit("payload", t0 + Duration::from_millis(1_900)));
        assert!(debouncer.admit("payload", t0 + Duration::from_secs(2)));
    }

    #[test]
    fn admitting_a_new_payload_resets_the_window() {
        let mut debouncer = Debouncer::new(Duration::from_secs(2));
        let t0 = Instant::now();
        assert!(debouncer.admit("payload-a", t0));
        assert!(debouncer.admit("payload-b", t0 + Duration::from_millis(500)));
        // payload-a is no longer the last admitted payload.
        assert!(debouncer.admit("payload-a", t0 + Duration::from_millis(600)));
    }
}
