//! Ammo-seeking composite goal

use crate::core::config::config;
use crate::core::types::{ItemKind, TimeMs};
use crate::goals::goal::{AgentContext, Goal, GoalKind, GoalReason, GoalStatus};
use crate::goals::interrupt::InterruptPolicy;
use crate::goals::priority::GoalPriority;
use crate::goals::seek::{ItemSeek, SeekStep};
use crate::world::AgentState;

/// Ammo ratio above which a resupply run is not worth starting
const AMMO_COMFORTABLE: f32 = 0.5;

/// Find, reserve and collect the nearest ammo pickup
pub struct GetAmmoGoal {
    status: GoalStatus,
    policy: InterruptPolicy,
    seek: ItemSeek,
    ammo_at_activation: u32,
    cooldown_until: TimeMs,
    outcome: Option<GoalReason>,
    notified: bool,
}

impl GetAmmoGoal {
    pub fn new() -> Self {
        Self {
            status: GoalStatus::Inactive,
            policy: InterruptPolicy::resource(),
            seek: ItemSeek::new(ItemKind::Ammo),
            ammo_at_activation: 0,
            cooldown_until: 0,
            outcome: None,
            notified: false,
        }
    }

    fn finish(&mut self, status: GoalStatus, reason: GoalReason) {
        self.status = status;
        self.outcome = Some(reason);
    }

    fn fail(&mut self, reason: GoalReason, now: TimeMs) {
        self.cooldown_until = now.saturating_add(config().seek_retry_backoff_ms);
        self.finish(GoalStatus::Failed, reason);
        tracing::debug!(%reason, "ammo goal failed");
    }
}

impl Default for GetAmmoGoal {
    fn default() -> Self {
        Self::new()
    }
}

impl Goal for GetAmmoGoal {
    fn kind(&self) -> GoalKind {
        GoalKind::GetAmmo
    }

    fn status(&self) -> GoalStatus {
        self.status
    }

    fn priority(&self, agent: &AgentState) -> GoalPriority {
        let cfg = config();
        let ratio = agent.weakest_ammo_ratio();
        if agent.total_ammo() == 0 {
            GoalPriority::ResourceCritical
        } else if ratio <= cfg.ammo_combat_threshold && agent.in_combat {
            GoalPriority::ResourceHigh
        } else if ratio <= cfg.ammo_low_threshold {
            GoalPriority::ResourceHigh
        } else if ratio <= AMMO_COMFORTABLE {
            GoalPriority::ResourceNormal
        } else {
            GoalPriority::Idle
        }
    }

    fn policy(&self) -> &InterruptPolicy {
        &self.policy
    }

    fn at_critical_phase(&self) -> bool {
        self.seek.is_waiting()
    }

    /// A bot with an empty gun has nothing to interrupt the run for, so
    /// zero total ammo tightens protection. Exceptions: critical health
    /// (a dying bot picks the medkit) and taking fire.
    fn can_interrupt(&self, agent: &AgentState, now: TimeMs) -> bool {
        if agent.under_fire {
            return true;
        }
        if agent.total_ammo() == 0
            && agent.health_ratio() > config().health_critical_threshold
        {
            return false;
        }
        self.policy.can_interrupt(now, self.at_critical_phase(), false)
    }

    fn ready(&self, now: TimeMs) -> bool {
        now >= self.cooldown_until
    }

    fn activate(&mut self, ctx: &mut AgentContext) {
        self.status = GoalStatus::Active;
        self.outcome = None;
        self.notified = false;
        self.seek.reset();

        if ctx.now < self.cooldown_until {
            self.finish(GoalStatus::Failed, GoalReason::CoolingDown);
            return;
        }
        if ctx.agent.weakest_ammo_ratio() > config().ammo_low_threshold {
            self.finish(GoalStatus::Completed, GoalReason::NeedAlreadyMet);
            return;
        }

        self.ammo_at_activation = ctx.agent.total_ammo();
        match self.seek.start(ctx) {
            Ok(()) => self.policy.on_activated(ctx.now),
            Err(reason) => self.fail(reason, ctx.now),
        }
    }

    fn execute(&mut self, ctx: &mut AgentContext) -> GoalStatus {
        if self.status != GoalStatus::Active {
            return self.status;
        }

        if ctx.agent.total_ammo() > self.ammo_at_activation {
            self.finish(GoalStatus::Completed, GoalReason::ResourceGained);
            return self.status;
        }

        match self.seek.step(ctx) {
            SeekStep::InProgress => GoalStatus::Active,
            SeekStep::Failed(reason) => {
                self.fail(reason, ctx.now);
                self.status
            }
        }
    }

    fn terminate(&mut self, ctx: &mut AgentContext) {
        self.seek.release(ctx);
        ctx.movement.terminate();
        self.policy.on_terminated();
        if !self.notified {
            self.notified = true;
            let reason = self.outcome.unwrap_or(GoalReason::Preempted);
            ctx.sink
                .on_goal_completed(ctx.agent.id, self.kind(), reason.is_success(), reason);
        }
        if self.status == GoalStatus::Active {
            self.status = GoalStatus::Inactive;
        }
    }
}
