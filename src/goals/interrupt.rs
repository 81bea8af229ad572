//! The interrupt protocol applied uniformly to composite goals
//!
//! Each goal owns an `InterruptPolicy` and delegates to it; there is no
//! runtime capability injection. The gate is deliberately strict at the
//! boundary: a challenger sitting exactly at `current + min_priority_gap`
//! is rejected, one point above is accepted.

use serde::{Deserialize, Serialize};

use crate::core::config::config;
use crate::core::types::TimeMs;
use crate::goals::goal::Goal;
use crate::goals::priority::GoalPriority;
use crate::world::AgentState;

/// Preemption gate state carried by every goal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterruptPolicy {
    /// Hard off-switch; a non-interruptible goal runs to completion
    pub interruptible: bool,
    /// Minimum commitment time before any interruption is considered
    pub min_duration_ms: TimeMs,
    /// Minimum priority-point advantage a challenger needs
    pub min_priority_gap: i32,
    activated_at: Option<TimeMs>,
}

impl InterruptPolicy {
    pub fn new(min_priority_gap: i32, min_duration_ms: TimeMs) -> Self {
        Self {
            interruptible: true,
            min_duration_ms,
            min_priority_gap,
            activated_at: None,
        }
    }

    /// Policy with the config-wide base gap and commitment window
    pub fn base() -> Self {
        let cfg = config();
        Self::new(cfg.min_priority_gap, cfg.min_goal_duration_ms)
    }

    /// Tighter gate shared by the resource goals
    pub fn resource() -> Self {
        let cfg = config();
        Self::new(cfg.resource_priority_gap, cfg.min_goal_duration_ms)
    }

    pub fn locked(mut self) -> Self {
        self.interruptible = false;
        self
    }

    /// Record activation time; called from `Goal::activate`
    pub fn on_activated(&mut self, now: TimeMs) {
        self.activated_at = Some(now);
    }

    /// Clear activation state; called from `Goal::terminate`
    pub fn on_terminated(&mut self) {
        self.activated_at = None;
    }

    /// Milliseconds since activation (0 if not active)
    pub fn elapsed(&self, now: TimeMs) -> TimeMs {
        self.activated_at
            .map(|t| now.saturating_sub(t))
            .unwrap_or(0)
    }

    /// The base interruption gate.
    ///
    /// Being under fire overrides every protection: a bot standing on a
    /// medkit while taking hits must be allowed to fight back.
    pub fn can_interrupt(&self, now: TimeMs, at_critical_phase: bool, under_fire: bool) -> bool {
        if under_fire {
            return true;
        }
        if !self.interruptible {
            return false;
        }
        if self.elapsed(now) < self.min_duration_ms {
            return false;
        }
        if at_critical_phase {
            return false;
        }
        true
    }
}

impl Default for InterruptPolicy {
    fn default() -> Self {
        Self::base()
    }
}

/// Decide whether `challenger_priority` preempts the current goal.
///
/// 1. The current goal must consent via `can_interrupt`.
/// 2. The challenger must strictly outrank the current priority.
/// 3. The advantage must exceed the current goal's `min_priority_gap`.
pub fn should_interrupt_for(
    current: &dyn Goal,
    agent: &AgentState,
    challenger_priority: GoalPriority,
    now: TimeMs,
) -> bool {
    if !current.can_interrupt(agent, now) {
        return false;
    }
    let gap = challenger_priority.value() - current.priority(agent).value();
    if gap <= 0 {
        return false;
    }
    gap > current.policy().min_priority_gap
}
