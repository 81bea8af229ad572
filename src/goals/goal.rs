//! The goal contract shared by every objective
//!
//! Goals are long-lived state machines owned by the arbiter: reset and
//! re-activated across runs, driven one `execute` per tick, terminated on
//! completion, failure or preemption. Kind dispatch is a closed enum; no
//! runtime type introspection.

use serde::{Deserialize, Serialize};

use crate::core::diag::DiagnosticsContext;
use crate::core::types::TimeMs;
use crate::goals::interrupt::InterruptPolicy;
use crate::goals::priority::GoalPriority;
use crate::world::{AgentState, ApproachDriver, ItemRegistry, Navigator, OutcomeSink};

/// Lifecycle status of a goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
pub enum GoalStatus {
    #[display(fmt = "inactive")]
    Inactive,
    #[display(fmt = "active")]
    Active,
    #[display(fmt = "completed")]
    Completed,
    #[display(fmt = "failed")]
    Failed,
}

/// Closed set of goal kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
pub enum GoalKind {
    #[display(fmt = "get_health")]
    GetHealth,
    #[display(fmt = "get_ammo")]
    GetAmmo,
    #[display(fmt = "get_weapon")]
    GetWeapon,
}

/// Why a goal terminated; forwarded verbatim to the outcome sink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
pub enum GoalReason {
    #[display(fmt = "resource_gained")]
    ResourceGained,
    #[display(fmt = "need_already_met")]
    NeedAlreadyMet,
    #[display(fmt = "quality_improved")]
    QualityImproved,
    #[display(fmt = "no_item_available")]
    NoItemAvailable,
    #[display(fmt = "reservation_lost")]
    ReservationLost,
    #[display(fmt = "navigation_failed")]
    NavigationFailed,
    #[display(fmt = "wait_timeout")]
    WaitTimeout,
    #[display(fmt = "attempts_exhausted")]
    AttemptsExhausted,
    #[display(fmt = "cooling_down")]
    CoolingDown,
    #[display(fmt = "preempted")]
    Preempted,
}

impl GoalReason {
    /// Whether this reason counts as success for the outcome sink
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            GoalReason::ResourceGained | GoalReason::NeedAlreadyMet | GoalReason::QualityImproved
        )
    }
}

/// Mutable view over the agent's collaborators for one tick
pub struct AgentContext<'a> {
    pub agent: &'a AgentState,
    pub items: &'a mut dyn ItemRegistry,
    pub nav: &'a dyn Navigator,
    pub movement: &'a mut dyn ApproachDriver,
    pub sink: &'a mut dyn OutcomeSink,
    pub diag: &'a mut DiagnosticsContext,
    pub now: TimeMs,
}

/// A preemptible objective
pub trait Goal {
    fn kind(&self) -> GoalKind;
    fn status(&self) -> GoalStatus;

    /// Recomputed every arbitration tick from live agent state
    fn priority(&self, agent: &AgentState) -> GoalPriority;

    fn policy(&self) -> &InterruptPolicy;

    /// At a critical micro-phase (standing on the pickup, waiting for the
    /// grant) interruption is refused by the base gate.
    fn at_critical_phase(&self) -> bool {
        false
    }

    /// Whether this goal may be preempted right now.
    ///
    /// Base rule: the policy gate, with being under fire forcing true.
    /// Goals layer domain exceptions on top (see the ammo goal).
    fn can_interrupt(&self, agent: &AgentState, now: TimeMs) -> bool {
        self.policy()
            .can_interrupt(now, self.at_critical_phase(), agent.under_fire)
    }

    /// Whether the arbiter may select this goal at all (failure cooldowns)
    fn ready(&self, now: TimeMs) -> bool {
        let _ = now;
        true
    }

    /// Acquire a target and any reservations; may complete or fail
    /// immediately (need already met, nothing on the map).
    fn activate(&mut self, ctx: &mut AgentContext);

    /// Drive one tick; returns the resulting status
    fn execute(&mut self, ctx: &mut AgentContext) -> GoalStatus;

    /// Idempotent teardown: always attempts reservation release and
    /// notifies the outcome sink exactly once.
    fn terminate(&mut self, ctx: &mut AgentContext);
}
