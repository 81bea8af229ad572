//! Weapon-upgrade composite goal
//!
//! Success is deliberately asymmetric: the goal never completes just
//! because the bot holds *a* working weapon. It completes on acquiring
//! the pursued weapon type, on a strict quality improvement over the
//! arsenal captured at activation, or immediately when the map offers
//! nothing better. This keeps a pistol-only bot from declaring victory
//! and re-seeking the same rack every other tick.

use crate::core::config::config;
use crate::core::types::{ItemKind, TimeMs, WeaponKind};
use crate::goals::goal::{AgentContext, Goal, GoalKind, GoalReason, GoalStatus};
use crate::goals::interrupt::InterruptPolicy;
use crate::goals::priority::GoalPriority;
use crate::goals::seek::{ItemSeek, SeekStep};
use crate::world::AgentState;

/// Find, reserve and collect a weapon better than anything owned
pub struct GetWeaponGoal {
    status: GoalStatus,
    policy: InterruptPolicy,
    seek: ItemSeek,
    quality_at_activation: u8,
    cooldown_until: TimeMs,
    outcome: Option<GoalReason>,
    notified: bool,
}

impl GetWeaponGoal {
    pub fn new() -> Self {
        Self {
            status: GoalStatus::Inactive,
            policy: InterruptPolicy::resource(),
            seek: ItemSeek::new(ItemKind::Weapon),
            quality_at_activation: 0,
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
        tracing::debug!(%reason, "weapon goal failed");
    }

    /// The weapon type currently being pursued, if the target carries one
    fn pursued_kind(&self) -> Option<WeaponKind> {
        self.seek.target().and_then(|t| t.weapon)
    }
}

impl Default for GetWeaponGoal {
    fn default() -> Self {
        Self::new()
    }
}

impl Goal for GetWeaponGoal {
    fn kind(&self) -> GoalKind {
        GoalKind::GetWeapon
    }

    fn status(&self) -> GoalStatus {
        self.status
    }

    /// An upgrade run is opportunistic, never urgent. Priority is derived
    /// from the arsenal alone; whether the map actually offers something
    /// better is checked against the registry at activation.
    fn priority(&self, agent: &AgentState) -> GoalPriority {
        let best = agent.best_owned_quality();
        if best <= WeaponKind::Pistol.quality() {
            GoalPriority::ResourceNormal
        } else if best < WeaponKind::Machinegun.quality() && !agent.in_combat {
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
        let best_on_map = ctx.items.best_weapon_quality(ctx.now);
        match best_on_map {
            None => {
                self.finish(GoalStatus::Completed, GoalReason::NeedAlreadyMet);
                return;
            }
            Some(q) if q <= ctx.agent.best_owned_quality() => {
                self.finish(GoalStatus::Completed, GoalReason::NeedAlreadyMet);
                return;
            }
            Some(_) => {}
        }

        self.quality_at_activation = ctx.agent.best_owned_quality();
        self.seek
            .require_weapon_quality_above(self.quality_at_activation);
        match self.seek.start(ctx) {
            Ok(()) => self.policy.on_activated(ctx.now),
            Err(reason) => self.fail(reason, ctx.now),
        }
    }

    fn execute(&mut self, ctx: &mut AgentContext) -> GoalStatus {
        if self.status != GoalStatus::Active {
            return self.status;
        }

        // Owning the pursued kind only counts when it is a real upgrade;
        // the seek filter guarantees that, this keeps the invariant local.
        if let Some(kind) = self.pursued_kind() {
            if kind.quality() > self.quality_at_activation && ctx.agent.owns(kind) {
                self.finish(GoalStatus::Completed, GoalReason::ResourceGained);
                return self.status;
            }
        }
        if ctx.agent.best_owned_quality() > self.quality_at_activation {
            self.finish(GoalStatus::Completed, GoalReason::QualityImproved);
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
