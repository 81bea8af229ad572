//! Narrow seams to the host engine
//!
//! The decision core never touches rendering, physics or pathfinding
//! directly. It consumes scalar sensor readouts (`AgentState`) and calls
//! out through the traits here: item discovery/reservation, navmesh
//! projection, movement delegation and outcome notification. Hosts
//! implement these against the real engine; tests use stubs plus the
//! bundled `ItemBoard`.

pub mod board;
pub mod feedback;

pub use board::{ItemBoard, Reservation};
pub use feedback::OutcomeLedger;

use ahash::AHashMap;
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::core::config::config;
use crate::core::types::{AgentId, ItemId, ItemKind, TimeMs, WeaponKind};
use crate::goals::goal::{GoalKind, GoalReason};

/// A pickup as seen by a goal: identity, kind, position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemSnapshot {
    pub id: ItemId,
    pub kind: ItemKind,
    /// Set when `kind == ItemKind::Weapon`
    pub weapon: Option<WeaponKind>,
    pub position: Vec3,
}

/// World item registry: discovery and lease reservations.
///
/// Reservations are leases, not locks. A grant is exclusive within the tick
/// it is requested; expiry is purely time-based, so holders must tolerate
/// finding their target re-taken mid-run.
pub trait ItemRegistry {
    /// Nearest available, unreserved item of `kind`, skipping `exclude`
    fn closest_available(
        &self,
        from: Vec3,
        kind: ItemKind,
        exclude: &[ItemId],
        now: TimeMs,
    ) -> Option<ItemSnapshot>;

    /// Try to lease the item; false if it is gone or held by another agent
    fn reserve(&mut self, item: ItemId, holder: AgentId, ttl_ms: TimeMs, now: TimeMs) -> bool;

    /// Release a lease early; a no-op unless `holder` owns it
    fn release(&mut self, item: ItemId, holder: AgentId);

    /// Whether the item still exists and has not been consumed
    fn is_available(&self, item: ItemId) -> bool;

    /// Best weapon quality tier currently on the map, if any weapon is up
    fn best_weapon_quality(&self, now: TimeMs) -> Option<u8>;
}

/// Navigation queries, answered by the host's navmesh
pub trait Navigator {
    /// Snap a raw position onto traversable space within `search_radius`
    fn project_to_traversable(&self, raw: Vec3, search_radius: f32) -> Option<Vec3>;

    /// Full path between two points, if one exists
    fn compute_path(&self, from: Vec3, to: Vec3) -> Option<Vec<Vec3>>;
}

/// Progress report from the movement delegate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApproachStatus {
    Moving,
    Arrived,
    Failed,
}

/// Atomic approach sub-goal owned by the host's locomotion layer.
///
/// Goals hand it a target and a completion-radius override (pickups use the
/// tight `approach_radius` from config) and poll it each tick.
pub trait ApproachDriver {
    fn activate(&mut self, target: Vec3, arrive_radius: f32);
    fn execute(&mut self, now: TimeMs) -> ApproachStatus;
    fn terminate(&mut self);
}

/// Callback invoked on every goal termination so an external evaluator can
/// adapt future selection bias
pub trait OutcomeSink {
    fn on_goal_completed(
        &mut self,
        agent: AgentId,
        kind: GoalKind,
        success: bool,
        reason: GoalReason,
    );
}

/// Sink that drops all notifications; for hosts that do not adapt
#[derive(Debug, Default)]
pub struct NullSink;

impl OutcomeSink for NullSink {
    fn on_goal_completed(&mut self, _: AgentId, _: GoalKind, _: bool, _: GoalReason) {}
}

/// Per-weapon sensor readout
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WeaponState {
    pub owned: bool,
    pub ammo: u32,
    /// True capacity when the host tracks it; otherwise ratios fall back to
    /// the configured capacity heuristic
    pub capacity: Option<u32>,
    /// Historical hit ratio with this weapon, in [0,1]
    pub hit_ratio: f32,
}

impl Default for WeaponState {
    fn default() -> Self {
        Self {
            owned: false,
            ammo: 0,
            capacity: None,
            hit_ratio: 0.5,
        }
    }
}

/// Scalar sensor readout for one agent, refreshed by the host each tick
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentState {
    pub id: AgentId,
    pub position: Vec3,
    pub health: f32,
    pub max_health: f32,
    pub current_weapon: WeaponKind,
    pub weapons: AHashMap<WeaponKind, WeaponState>,
    pub target_visible: bool,
    pub under_fire: bool,
    pub in_combat: bool,
}

impl AgentState {
    /// Fresh agent at full health holding only the pistol
    pub fn new(id: AgentId, max_health: f32) -> Self {
        let mut weapons = AHashMap::new();
        weapons.insert(
            WeaponKind::Pistol,
            WeaponState {
                owned: true,
                ammo: 50,
                capacity: None,
                hit_ratio: 0.5,
            },
        );
        Self {
            id,
            position: Vec3::ZERO,
            health: max_health,
            max_health,
            current_weapon: WeaponKind::Pistol,
            weapons,
            target_visible: false,
            under_fire: false,
            in_combat: false,
        }
    }

    pub fn health_ratio(&self) -> f32 {
        if self.max_health <= 0.0 {
            return 0.0;
        }
        (self.health / self.max_health).clamp(0.0, 1.0)
    }

    pub fn weapon(&self, kind: WeaponKind) -> WeaponState {
        self.weapons.get(&kind).copied().unwrap_or_default()
    }

    pub fn owns(&self, kind: WeaponKind) -> bool {
        self.weapon(kind).owned
    }

    pub fn ammo(&self, kind: WeaponKind) -> u32 {
        let w = self.weapon(kind);
        if w.owned {
            w.ammo
        } else {
            0
        }
    }

    /// Total rounds across all owned weapons
    pub fn total_ammo(&self) -> u32 {
        self.weapons
            .iter()
            .filter(|(_, w)| w.owned)
            .map(|(_, w)| w.ammo)
            .sum()
    }

    /// Ammo ratio for a weapon against its capacity.
    ///
    /// When the host does not track true capacity this falls back to the
    /// configured heuristic (total rounds x `ammo_capacity_multiplier`),
    /// an acknowledged approximation.
    pub fn ammo_ratio(&self, kind: WeaponKind) -> f32 {
        let w = self.weapon(kind);
        if !w.owned {
            return 0.0;
        }
        let capacity = match w.capacity {
            Some(cap) if cap > 0 => cap as f32,
            _ => {
                let estimated = self.total_ammo() as f32 * config().ammo_capacity_multiplier;
                estimated.max(1.0)
            }
        };
        (w.ammo as f32 / capacity).clamp(0.0, 1.0)
    }

    /// Lowest ammo ratio across owned weapons; drives the ammo goal
    pub fn weakest_ammo_ratio(&self) -> f32 {
        self.weapons
            .iter()
            .filter(|(_, w)| w.owned)
            .map(|(kind, _)| self.ammo_ratio(*kind))
            .fold(1.0, f32::min)
    }

    /// Quality tier of the best weapon the agent owns
    pub fn best_owned_quality(&self) -> u8 {
        self.weapons
            .iter()
            .filter(|(_, w)| w.owned)
            .map(|(kind, _)| kind.quality())
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_ratio_clamped() {
        let mut agent = AgentState::new(AgentId::new(), 100.0);
        agent.health = 150.0;
        assert_eq!(agent.health_ratio(), 1.0);
        agent.health = -5.0;
        assert_eq!(agent.health_ratio(), 0.0);
    }

    #[test]
    fn test_unowned_weapon_reads_empty() {
        let agent = AgentState::new(AgentId::new(), 100.0);
        assert!(!agent.owns(WeaponKind::Shotgun));
        assert_eq!(agent.ammo(WeaponKind::Shotgun), 0);
        assert_eq!(agent.ammo_ratio(WeaponKind::Shotgun), 0.0);
    }

    #[test]
    fn test_ammo_ratio_uses_capacity_when_known() {
        let mut agent = AgentState::new(AgentId::new(), 100.0);
        agent.weapons.insert(
            WeaponKind::Machinegun,
            WeaponState {
                owned: true,
                ammo: 30,
                capacity: Some(120),
                hit_ratio: 0.5,
            },
        );
        assert!((agent.ammo_ratio(WeaponKind::Machinegun) - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_ammo_ratio_heuristic_without_capacity() {
        let agent = AgentState::new(AgentId::new(), 100.0);
        // 50 rounds, estimated capacity 50 * 6 = 300
        let expected = 50.0 / 300.0;
        assert!((agent.ammo_ratio(WeaponKind::Pistol) - expected).abs() < 1e-6);
    }

    #[test]
    fn test_best_owned_quality() {
        let mut agent = AgentState::new(AgentId::new(), 100.0);
        assert_eq!(agent.best_owned_quality(), WeaponKind::Pistol.quality());
        agent.weapons.insert(
            WeaponKind::Machinegun,
            WeaponState {
                owned: true,
                ammo: 10,
                capacity: None,
                hit_ratio: 0.5,
            },
        );
        assert_eq!(agent.best_owned_quality(), WeaponKind::Machinegun.quality());
    }
}
