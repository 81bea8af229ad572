//! Health-seeking composite goal

use crate::core::config::config;
use crate::core::types::{ItemKind, TimeMs};
use crate::goals::goal::{AgentContext, Goal, GoalKind, GoalReason, GoalStatus};
use crate::goals::interrupt::InterruptPolicy;
use crate::goals::priority::GoalPriority;
use crate::goals::seek::{ItemSeek, SeekStep};
use crate::world::AgentState;

/// Find, reserve and collect the nearest health pickup
pub struct GetHealthGoal {
    status: GoalStatus,
    policy: InterruptPolicy,
    seek: ItemSeek,
    health_at_activation: f32,
    cooldown_until: TimeMs,
    outcome: Option<GoalReason>,
    notified: bool,
}

impl GetHealthGoal {
    pub fn new() -> Self {
        Self {
            status: GoalStatus::Inactive,
            policy: InterruptPolicy::resource(),
            seek: ItemSeek::new(ItemKind::Health),
            health_at_activation: 0.0,
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
        tracing::debug!(%reason, "health goal failed");
    }

    /// Health gained since activation, as a fraction of max
    fn health_gain(&self, agent: &AgentState) -> f32 {
        if agent.max_health <= 0.0 {
            return 0.0;
        }
        (agent.health - self.health_at_activation) / agent.max_health
    }
}

impl Default for GetHealthGoal {
    fn default() -> Self {
        Self::new()
    }
}

impl Goal for GetHealthGoal {
    fn kind(&self) -> GoalKind {
        GoalKind::GetHealth
    }

    fn status(&self) -> GoalStatus {
        self.status
    }

    fn priority(&self, agent: &AgentState) -> GoalPriority {
        let cfg = config();
        let ratio = agent.health_ratio();
        if ratio <= cfg.health_critical_threshold {
            GoalPriority::CriticalSurvival
        } else if ratio <= cfg.health_low_threshold {
            GoalPriority::HighSurvival
        } else if ratio <= cfg.health_seek_threshold {
            GoalPriority::ResourceHigh
        } else if ratio <= 0.85 {
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

    /// Critical health locks the run down; being shot at unlocks it.
    /// A bot that will die to the next hit must be free to fight back even
    /// mid-sprint to a medkit.
    fn can_interrupt(&self, agent: &AgentState, now: TimeMs) -> bool {
        if agent.under_fire {
            return true;
        }
        if agent.health_ratio() <= config().health_critical_threshold {
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
        if ctx.agent.health_ratio() > config().health_seek_threshold {
            self.finish(GoalStatus::Completed, GoalReason::NeedAlreadyMet);
            return;
        }

        self.health_at_activation = ctx.agent.health;
        match self.seek.start(ctx) {
            Ok(()) => self.policy.on_activated(ctx.now),
            Err(reason) => self.fail(reason, ctx.now),
        }
    }

    fn execute(&mut self, ctx: &mut AgentContext) -> GoalStatus {
        if self.status != GoalStatus::Active {
            return self.status;
        }

        if self.health_gain(ctx.agent) >= config().health_gain_success {
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
