//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for agents (bots)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AgentId(pub Uuid);

impl AgentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for AgentId {
    fn default() -> Self {
        Self::new()
    }
}

/// Unique identifier for world pickups (health packs, ammo boxes, weapons)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemId(pub Uuid);

impl ItemId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

/// Simulation time in milliseconds, supplied by the host each tick.
///
/// The core never reads a system clock; all cooldowns, lease expiries and
/// wait timeouts are comparisons against this value, which keeps every
/// decision replayable.
pub type TimeMs = u64;

/// Kind of world pickup a goal can seek
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
pub enum ItemKind {
    #[display(fmt = "health")]
    Health,
    #[display(fmt = "ammo")]
    Ammo,
    #[display(fmt = "weapon")]
    Weapon,
}

/// Weapon kinds known to the selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
pub enum WeaponKind {
    #[display(fmt = "pistol")]
    Pistol,
    #[display(fmt = "machinegun")]
    Machinegun,
    #[display(fmt = "shotgun")]
    Shotgun,
}

impl WeaponKind {
    pub const ALL: [WeaponKind; 3] =
        [WeaponKind::Pistol, WeaponKind::Machinegun, WeaponKind::Shotgun];

    /// Intrinsic quality tier used by the weapon goal's completion test.
    ///
    /// Higher is better. The pistol is deliberately the floor: upgrade rules
    /// key off it.
    pub fn quality(&self) -> u8 {
        match self {
            WeaponKind::Pistol => 5,
            WeaponKind::Machinegun => 8,
            WeaponKind::Shotgun => 7,
        }
    }

    /// True if this weapon outclasses the other by quality tier
    pub fn outclasses(&self, other: &WeaponKind) -> bool {
        self.quality() > other.quality()
    }
}
