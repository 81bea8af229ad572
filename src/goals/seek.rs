//! Shared item-seeking driver for the resource goals
//!
//! One state machine covers the common shape of health/ammo/weapon runs:
//! find the nearest viable pickup, lease it, walk to it with a tight
//! arrival radius, then stand on it waiting for the engine to grant it.
//! Pickup collision is never simulated here; the wait phase polls only
//! external confirmation. Losing the lease mid-run is a recoverable
//! failure, answered by retrying an alternative target.

use crate::core::config::config;
use crate::core::types::{ItemKind, TimeMs};
use crate::goals::goal::{AgentContext, GoalReason};
use crate::world::{ApproachStatus, ItemSnapshot};

/// Internal sub-phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SeekPhase {
    Idle,
    Approaching,
    WaitingForPickup { deadline: TimeMs },
}

/// Outcome of one driver tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekStep {
    InProgress,
    Failed(GoalReason),
}

/// Search / reserve / approach / wait machinery shared by resource goals
#[derive(Debug)]
pub struct ItemSeek {
    kind: ItemKind,
    phase: SeekPhase,
    target: Option<ItemSnapshot>,
    tried: Vec<crate::core::types::ItemId>,
    attempts: u32,
    min_weapon_quality: Option<u8>,
}

impl ItemSeek {
    pub fn new(kind: ItemKind) -> Self {
        Self {
            kind,
            phase: SeekPhase::Idle,
            target: None,
            tried: Vec::new(),
            attempts: 0,
            min_weapon_quality: None,
        }
    }

    /// Forget all run state; called on goal (re)activation
    pub fn reset(&mut self) {
        self.phase = SeekPhase::Idle;
        self.target = None;
        self.tried.clear();
        self.attempts = 0;
        self.min_weapon_quality = None;
    }

    /// Only pursue weapon pickups strictly above this quality.
    ///
    /// Without the floor a weapon run would chase the nearest rack even
    /// when it holds a kind the agent already carries, collect nothing
    /// new, and immediately re-seek the same rack.
    pub fn require_weapon_quality_above(&mut self, quality: u8) {
        self.min_weapon_quality = Some(quality);
    }

    /// The pickup currently being pursued
    pub fn target(&self) -> Option<&ItemSnapshot> {
        self.target.as_ref()
    }

    /// Standing on the pickup waiting for the grant
    pub fn is_waiting(&self) -> bool {
        matches!(self.phase, SeekPhase::WaitingForPickup { .. })
    }

    /// Acquire the next viable target and start moving toward it.
    ///
    /// Skips items that fail navmesh projection or whose lease is taken,
    /// charging one attempt per started target.
    pub fn start(&mut self, ctx: &mut AgentContext) -> Result<(), GoalReason> {
        let cfg = config();
        loop {
            if self.attempts >= cfg.max_seek_attempts {
                return Err(GoalReason::AttemptsExhausted);
            }
            let Some(found) =
                ctx.items
                    .closest_available(ctx.agent.position, self.kind, &self.tried, ctx.now)
            else {
                return Err(if self.attempts == 0 {
                    GoalReason::NoItemAvailable
                } else {
                    GoalReason::AttemptsExhausted
                });
            };

            if let Some(floor) = self.min_weapon_quality {
                if !found.weapon.map_or(false, |w| w.quality() > floor) {
                    self.tried.push(found.id);
                    continue;
                }
            }

            let Some(spot) = ctx
                .nav
                .project_to_traversable(found.position, cfg.nav_projection_radius)
            else {
                ctx.diag
                    .warn("nav_projection_failed", ctx.now, "pickup position off the navmesh");
                self.tried.push(found.id);
                continue;
            };

            if !ctx
                .items
                .reserve(found.id, ctx.agent.id, cfg.reservation_ttl_ms, ctx.now)
            {
                self.tried.push(found.id);
                continue;
            }

            self.attempts += 1;
            tracing::debug!(item = ?found.id, kind = %self.kind, attempt = self.attempts, "seek target acquired");
            ctx.movement.activate(spot, cfg.approach_radius);
            self.target = Some(found);
            self.phase = SeekPhase::Approaching;
            return Ok(());
        }
    }

    /// Drive one tick of the approach/wait machinery.
    ///
    /// The owning goal checks its own success condition before calling this;
    /// the driver only reports progress or unrecoverable failure.
    pub fn step(&mut self, ctx: &mut AgentContext) -> SeekStep {
        match self.phase {
            SeekPhase::Idle => SeekStep::Failed(GoalReason::NoItemAvailable),
            SeekPhase::Approaching => {
                if !self.target_still_available(ctx) {
                    return self.retry(ctx, GoalReason::ReservationLost);
                }
                match ctx.movement.execute(ctx.now) {
                    ApproachStatus::Moving => SeekStep::InProgress,
                    ApproachStatus::Arrived => {
                        self.phase = SeekPhase::WaitingForPickup {
                            deadline: ctx.now.saturating_add(config().pickup_wait_ms),
                        };
                        SeekStep::InProgress
                    }
                    ApproachStatus::Failed => self.retry(ctx, GoalReason::NavigationFailed),
                }
            }
            SeekPhase::WaitingForPickup { deadline } => {
                if !self.target_still_available(ctx) {
                    // Someone else took it while we stood on the pad
                    return self.retry(ctx, GoalReason::ReservationLost);
                }
                if ctx.now >= deadline {
                    ctx.diag
                        .warn("pickup_wait_timeout", ctx.now, "stood on pickup without a grant");
                    return self.retry(ctx, GoalReason::WaitTimeout);
                }
                SeekStep::InProgress
            }
        }
    }

    /// Release any held lease; safe to call repeatedly
    pub fn release(&mut self, ctx: &mut AgentContext) {
        if let Some(target) = self.target.take() {
            ctx.items.release(target.id, ctx.agent.id);
        }
        self.phase = SeekPhase::Idle;
    }

    fn target_still_available(&self, ctx: &AgentContext) -> bool {
        self.target
            .map(|t| ctx.items.is_available(t.id))
            .unwrap_or(false)
    }

    /// Abandon the current target and try the next one; surfaces `reason`
    /// when no alternative remains.
    fn retry(&mut self, ctx: &mut AgentContext, reason: GoalReason) -> SeekStep {
        if let Some(target) = self.target.take() {
            self.tried.push(target.id);
            ctx.items.release(target.id, ctx.agent.id);
        }
        ctx.movement.terminate();
        self.phase = SeekPhase::Idle;
        match self.start(ctx) {
            Ok(()) => SeekStep::InProgress,
            Err(GoalReason::NoItemAvailable) | Err(GoalReason::AttemptsExhausted) => {
                SeekStep::Failed(reason)
            }
            Err(other) => SeekStep::Failed(other),
        }
    }
}
