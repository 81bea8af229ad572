//! Per-agent throttled diagnostics
//!
//! Goals emit the same warning every tick while stuck (no reachable item,
//! lease lost, navmesh projection failing). `DiagnosticsContext` rate-limits
//! those per key so the log stays readable. Each agent owns one; there is
//! no ambient global state.

use ahash::AHashMap;

use crate::core::config::config;
use crate::core::types::TimeMs;

/// Throttles repeated warnings by string key
#[derive(Debug, Default)]
pub struct DiagnosticsContext {
    last_emitted: AHashMap<&'static str, TimeMs>,
}

impl DiagnosticsContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true (and records the emission) if `key` has not fired within
    /// the throttle window. Callers log only when this returns true.
    pub fn should_emit(&mut self, key: &'static str, now: TimeMs) -> bool {
        let window = config().diag_throttle_ms;
        match self.last_emitted.get(key) {
            Some(&last) if now < last.saturating_add(window) => false,
            _ => {
                self.last_emitted.insert(key, now);
                true
            }
        }
    }

    /// Emit a throttled warning through tracing
    pub fn warn(&mut self, key: &'static str, now: TimeMs, message: &str) {
        if self.should_emit(key, now) {
            tracing::warn!(key, "{message}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_emission_passes() {
        let mut diag = DiagnosticsContext::new();
        assert!(diag.should_emit("no_item", 0));
    }

    #[test]
    fn test_repeat_within_window_suppressed() {
        let mut diag = DiagnosticsContext::new();
        assert!(diag.should_emit("no_item", 0));
        assert!(!diag.should_emit("no_item", 100));
        assert!(!diag.should_emit("no_item", 4_999));
    }

    #[test]
    fn test_repeat_after_window_passes() {
        let mut diag = DiagnosticsContext::new();
        assert!(diag.should_emit("no_item", 0));
        assert!(diag.should_emit("no_item", 5_000));
    }

    #[test]
    fn test_keys_throttle_independently() {
        let mut diag = DiagnosticsContext::new();
        assert!(diag.should_emit("no_item", 0));
        assert!(diag.should_emit("lease_lost", 1));
    }
}
