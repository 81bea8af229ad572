//! Priority-driven goal arbitration
//!
//! One arbiter per agent owns the long-lived goal set. Each tick it
//! recomputes every goal's dynamic priority from live sensor state, starts
//! the strongest contender when idle, weighs preemption through the
//! interrupt protocol when busy, and drives the active goal one step.

use crate::core::types::TimeMs;
use crate::goals::get_ammo::GetAmmoGoal;
use crate::goals::get_health::GetHealthGoal;
use crate::goals::get_weapon::GetWeaponGoal;
use crate::goals::goal::{AgentContext, Goal, GoalKind, GoalStatus};
use crate::goals::interrupt::should_interrupt_for;
use crate::goals::priority::GoalPriority;
use crate::world::AgentState;

/// Owns an agent's goals and decides which one runs
pub struct GoalArbiter {
    goals: Vec<Box<dyn Goal>>,
    active: Option<usize>,
}

impl GoalArbiter {
    /// Arbiter with no goals; hosts push their own set
    pub fn new() -> Self {
        Self {
            goals: Vec::new(),
            active: None,
        }
    }

    /// Arbiter pre-loaded with the three resource goals
    pub fn with_resource_goals() -> Self {
        let mut arbiter = Self::new();
        arbiter.push(Box::new(GetHealthGoal::new()));
        arbiter.push(Box::new(GetAmmoGoal::new()));
        arbiter.push(Box::new(GetWeaponGoal::new()));
        arbiter
    }

    pub fn push(&mut self, goal: Box<dyn Goal>) {
        self.goals.push(goal);
    }

    /// Kind of the currently running goal, if any
    pub fn active_kind(&self) -> Option<GoalKind> {
        self.active.map(|i| self.goals[i].kind())
    }

    /// Strongest ready contender above idle priority; earlier goals win ties
    fn best_contender(&self, agent: &AgentState, now: TimeMs) -> Option<(usize, GoalPriority)> {
        let mut best: Option<(usize, GoalPriority)> = None;
        for (i, goal) in self.goals.iter().enumerate() {
            if Some(i) != self.active && !goal.ready(now) {
                continue;
            }
            let priority = goal.priority(agent);
            if priority == GoalPriority::Idle {
                continue;
            }
            match best {
                Some((_, current)) if priority.value() <= current.value() => {}
                _ => best = Some((i, priority)),
            }
        }
        best
    }

    /// Run one arbitration step followed by one execution step
    pub fn tick(&mut self, ctx: &mut AgentContext) {
        let contender = self.best_contender(ctx.agent, ctx.now);

        match (self.active, contender) {
            (None, Some((j, _))) => self.activate_at(j, ctx),
            (Some(i), Some((j, challenger))) if j != i => {
                if should_interrupt_for(self.goals[i].as_ref(), ctx.agent, challenger, ctx.now) {
                    tracing::debug!(
                        from = %self.goals[i].kind(),
                        to = %self.goals[j].kind(),
                        %challenger,
                        "goal preempted"
                    );
                    self.goals[i].terminate(ctx);
                    self.active = None;
                    self.activate_at(j, ctx);
                }
            }
            _ => {}
        }

        if let Some(i) = self.active {
            match self.goals[i].execute(ctx) {
                GoalStatus::Completed | GoalStatus::Failed => {
                    self.goals[i].terminate(ctx);
                    self.active = None;
                }
                GoalStatus::Active | GoalStatus::Inactive => {}
            }
        }
    }

    /// Tear down the active goal; called when the owning agent is destroyed
    pub fn shutdown(&mut self, ctx: &mut AgentContext) {
        if let Some(i) = self.active.take() {
            self.goals[i].terminate(ctx);
        }
    }

    fn activate_at(&mut self, index: usize, ctx: &mut AgentContext) {
        self.goals[index].activate(ctx);
        match self.goals[index].status() {
            GoalStatus::Active => {
                tracing::debug!(goal = %self.goals[index].kind(), "goal activated");
                self.active = Some(index);
            }
            // Instant completion/failure (need already met, nothing on the
            // map): notify and stay idle for this tick
            GoalStatus::Completed | GoalStatus::Failed => {
                self.goals[index].terminate(ctx);
            }
            GoalStatus::Inactive => {}
        }
    }
}

impl Default for GoalArbiter {
    fn default() -> Self {
        Self::with_resource_goals()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    use crate::core::diag::DiagnosticsContext;
    use crate::core::types::{AgentId, ItemKind, WeaponKind};
    use crate::goals::goal::GoalReason;
    use crate::world::{
        ApproachDriver, ApproachStatus, ItemBoard, Navigator, OutcomeSink, WeaponState,
    };

    struct StubNav;

    impl Navigator for StubNav {
        fn project_to_traversable(&self, raw: Vec3, _search_radius: f32) -> Option<Vec3> {
            Some(raw)
        }

        fn compute_path(&self, from: Vec3, to: Vec3) -> Option<Vec<Vec3>> {
            Some(vec![from, to])
        }
    }

    /// Approach driver that arrives after a fixed number of execute calls
    struct ScriptedApproach {
        arrive_after: u32,
        calls: u32,
    }

    impl ScriptedApproach {
        fn new(arrive_after: u32) -> Self {
            Self {
                arrive_after,
                calls: 0,
            }
        }
    }

    impl ApproachDriver for ScriptedApproach {
        fn activate(&mut self, _target: Vec3, _arrive_radius: f32) {
            self.calls = 0;
        }

        fn execute(&mut self, _now: u64) -> ApproachStatus {
            self.calls += 1;
            if self.calls >= self.arrive_after {
                ApproachStatus::Arrived
            } else {
                ApproachStatus::Moving
            }
        }

        fn terminate(&mut self) {}
    }

    #[derive(Default)]
    struct RecordingSink {
        events: Vec<(GoalKind, bool, GoalReason)>,
    }

    impl OutcomeSink for RecordingSink {
        fn on_goal_completed(
            &mut self,
            _agent: AgentId,
            kind: GoalKind,
            success: bool,
            reason: GoalReason,
        ) {
            self.events.push((kind, success, reason));
        }
    }

    fn full_ammo_agent() -> crate::world::AgentState {
        let mut agent = crate::world::AgentState::new(AgentId::new(), 100.0);
        agent.weapons.insert(
            WeaponKind::Pistol,
            WeaponState {
                owned: true,
                ammo: 50,
                capacity: Some(50),
                hit_ratio: 0.5,
            },
        );
        agent
    }

    #[test]
    fn test_health_goal_runs_to_completion() {
        let mut agent = full_ammo_agent();
        agent.health = 20.0;
        let mut board = ItemBoard::new();
        let item = board.add_item(ItemKind::Health, None, Vec3::new(5.0, 0.0, 0.0));
        let nav = StubNav;
        let mut movement = ScriptedApproach::new(2);
        let mut sink = RecordingSink::default();
        let mut diag = DiagnosticsContext::new();
        let mut arbiter = GoalArbiter::with_resource_goals();

        for now in [0, 100, 200] {
            let mut ctx = AgentContext {
                agent: &agent,
                items: &mut board,
                nav: &nav,
                movement: &mut movement,
                sink: &mut sink,
                diag: &mut diag,
                now,
            };
            arbiter.tick(&mut ctx);
        }
        assert_eq!(arbiter.active_kind(), Some(GoalKind::GetHealth));
        assert!(board.reservation(item).is_some());

        // Engine grants the pickup: health jumps well past the 12% bar
        agent.health = 55.0;
        board.consume(item);
        let mut ctx = AgentContext {
            agent: &agent,
            items: &mut board,
            nav: &nav,
            movement: &mut movement,
            sink: &mut sink,
            diag: &mut diag,
            now: 300,
        };
        arbiter.tick(&mut ctx);

        assert_eq!(arbiter.active_kind(), None);
        assert_eq!(
            sink.events,
            vec![(GoalKind::GetHealth, true, GoalReason::ResourceGained)]
        );
        assert!(board.reservation(item).is_none());
    }

    #[test]
    fn test_critical_ammo_preempts_health_run() {
        let mut agent = full_ammo_agent();
        agent.health = 50.0;
        let mut board = ItemBoard::new();
        board.add_item(ItemKind::Health, None, Vec3::new(5.0, 0.0, 0.0));
        board.add_item(ItemKind::Ammo, None, Vec3::new(8.0, 0.0, 0.0));
        let nav = StubNav;
        let mut movement = ScriptedApproach::new(100);
        let mut sink = RecordingSink::default();
        let mut diag = DiagnosticsContext::new();
        let mut arbiter = GoalArbiter::with_resource_goals();

        let mut ctx = AgentContext {
            agent: &agent,
            items: &mut board,
            nav: &nav,
            movement: &mut movement,
            sink: &mut sink,
            diag: &mut diag,
            now: 0,
        };
        arbiter.tick(&mut ctx);
        assert_eq!(arbiter.active_kind(), Some(GoalKind::GetHealth));

        // Magazine runs dry: ammo goes critical, out-gapping the health run
        // once the minimum commitment window has elapsed
        if let Some(w) = agent.weapons.get_mut(&WeaponKind::Pistol) {
            w.ammo = 0;
        }
        let mut ctx = AgentContext {
            agent: &agent,
            items: &mut board,
            nav: &nav,
            movement: &mut movement,
            sink: &mut sink,
            diag: &mut diag,
            now: 2_000,
        };
        arbiter.tick(&mut ctx);

        assert_eq!(arbiter.active_kind(), Some(GoalKind::GetAmmo));
        assert_eq!(
            sink.events,
            vec![(GoalKind::GetHealth, false, GoalReason::Preempted)]
        );
    }

    #[test]
    fn test_weapon_goal_completes_instantly_on_empty_map() {
        // Healthy, stocked agent: only the weapon goal is above idle, and
        // with no weapon on the map it resolves on activation
        let agent = full_ammo_agent();
        let mut board = ItemBoard::new();
        let nav = StubNav;
        let mut movement = ScriptedApproach::new(1);
        let mut sink = RecordingSink::default();
        let mut diag = DiagnosticsContext::new();
        let mut arbiter = GoalArbiter::with_resource_goals();

        let mut ctx = AgentContext {
            agent: &agent,
            items: &mut board,
            nav: &nav,
            movement: &mut movement,
            sink: &mut sink,
            diag: &mut diag,
            now: 0,
        };
        arbiter.tick(&mut ctx);

        assert_eq!(arbiter.active_kind(), None);
        assert_eq!(
            sink.events,
            vec![(GoalKind::GetWeapon, true, GoalReason::NeedAlreadyMet)]
        );
    }

    #[test]
    fn test_shutdown_releases_active_goal() {
        let mut agent = full_ammo_agent();
        agent.health = 20.0;
        let mut board = ItemBoard::new();
        let item = board.add_item(ItemKind::Health, None, Vec3::new(5.0, 0.0, 0.0));
        let nav = StubNav;
        let mut movement = ScriptedApproach::new(100);
        let mut sink = RecordingSink::default();
        let mut diag = DiagnosticsContext::new();
        let mut arbiter = GoalArbiter::with_resource_goals();

        let mut ctx = AgentContext {
            agent: &agent,
            items: &mut board,
            nav: &nav,
            movement: &mut movement,
            sink: &mut sink,
            diag: &mut diag,
            now: 0,
        };
        arbiter.tick(&mut ctx);
        assert!(board.reservation(item).is_some());

        let mut ctx = AgentContext {
            agent: &agent,
            items: &mut board,
            nav: &nav,
            movement: &mut movement,
            sink: &mut sink,
            diag: &mut diag,
            now: 100,
        };
        arbiter.shutdown(&mut ctx);

        assert_eq!(arbiter.active_kind(), None);
        assert!(board.reservation(item).is_none());
        assert_eq!(
            sink.events,
            vec![(GoalKind::GetHealth, false, GoalReason::Preempted)]
        );
    }
}
