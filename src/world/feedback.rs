//! Outcome-driven selection bias
//!
//! Reference `OutcomeSink` that turns goal results into a per-kind bias in
//! [-1, 1], expressed in fractional priority levels. Repeated failures push
//! a goal kind negative so hosts can deprioritize it for a while; successes
//! claw the bias back at half rate. The step sizes are tuned constants
//! (`accuracy_bias_step`, `survival_bias_step`), overridable in config.

use ahash::AHashMap;

use crate::core::config::config;
use crate::core::types::AgentId;
use crate::goals::goal::{GoalKind, GoalReason};
use crate::world::OutcomeSink;

/// Tracks goal outcomes and exposes a selection bias per goal kind
#[derive(Debug, Default)]
pub struct OutcomeLedger {
    bias: AHashMap<GoalKind, f32>,
}

impl OutcomeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current bias for a goal kind, in [-1, 1]; 0 = unbiased
    pub fn bias(&self, kind: GoalKind) -> f32 {
        self.bias.get(&kind).copied().unwrap_or(0.0)
    }

    fn step_for(kind: GoalKind) -> f32 {
        let cfg = config();
        match kind {
            GoalKind::GetHealth => cfg.survival_bias_step,
            GoalKind::GetAmmo | GoalKind::GetWeapon => cfg.accuracy_bias_step,
        }
    }
}

impl OutcomeSink for OutcomeLedger {
    fn on_goal_completed(
        &mut self,
        _agent: AgentId,
        kind: GoalKind,
        success: bool,
        reason: GoalReason,
    ) {
        // Preemption says nothing about the goal's viability
        if reason == GoalReason::Preempted {
            return;
        }
        let step = Self::step_for(kind);
        let entry = self.bias.entry(kind).or_insert(0.0);
        if success {
            *entry = (*entry + step * 0.5).clamp(-1.0, 1.0);
        } else {
            *entry = (*entry - step).clamp(-1.0, 1.0);
        }
    }
}
