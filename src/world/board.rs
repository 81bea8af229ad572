//! In-memory item registry with lease reservations
//!
//! Reference implementation of `ItemRegistry` used by tests and simple
//! hosts. Reservation grants are exclusive and deterministic within a tick;
//! expiry is purely a timestamp comparison, never a scheduled callback.

use ahash::AHashMap;
use glam::Vec3;
use ordered_float::OrderedFloat;

use crate::core::types::{AgentId, ItemId, ItemKind, TimeMs, WeaponKind};
use crate::world::{ItemRegistry, ItemSnapshot};

/// A lease on a pickup
#[derive(Debug, Clone)]
pub struct Reservation {
    pub holder: AgentId,
    pub expires_at: TimeMs,
    pub reason: String,
}

impl Reservation {
    pub fn is_expired(&self, now: TimeMs) -> bool {
        now >= self.expires_at
    }
}

#[derive(Debug, Clone)]
struct BoardItem {
    kind: ItemKind,
    weapon: Option<WeaponKind>,
    position: Vec3,
    available: bool,
    reservation: Option<Reservation>,
}

impl BoardItem {
    fn actively_reserved(&self, now: TimeMs) -> bool {
        self.reservation
            .as_ref()
            .map(|r| !r.is_expired(now))
            .unwrap_or(false)
    }
}

/// The shared pickup board for one arena
#[derive(Debug, Default)]
pub struct ItemBoard {
    items: AHashMap<ItemId, BoardItem>,
}

impl ItemBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a pickup; returns its id
    pub fn add_item(&mut self, kind: ItemKind, weapon: Option<WeaponKind>, position: Vec3) -> ItemId {
        let id = ItemId::new();
        self.items.insert(
            id,
            BoardItem {
                kind,
                weapon,
                position,
                available: true,
                reservation: None,
            },
        );
        id
    }

    /// Mark a pickup as taken (the engine granted it to someone)
    pub fn consume(&mut self, item: ItemId) {
        if let Some(entry) = self.items.get_mut(&item) {
            entry.available = false;
            entry.reservation = None;
        }
    }

    /// Respawn a consumed pickup
    pub fn respawn(&mut self, item: ItemId) {
        if let Some(entry) = self.items.get_mut(&item) {
            entry.available = true;
        }
    }

    /// Current lease on an item, if any
    pub fn reservation(&self, item: ItemId) -> Option<&Reservation> {
        self.items.get(&item).and_then(|i| i.reservation.as_ref())
    }
}

impl ItemRegistry for ItemBoard {
    fn closest_available(
        &self,
        from: Vec3,
        kind: ItemKind,
        exclude: &[ItemId],
        now: TimeMs,
    ) -> Option<ItemSnapshot> {
        self.items
            .iter()
            .filter(|(id, item)| {
                item.kind == kind
                    && item.available
                    && !item.actively_reserved(now)
                    && !exclude.contains(id)
            })
            .min_by_key(|(_, item)| OrderedFloat(item.position.distance(from)))
            .map(|(id, item)| ItemSnapshot {
                id: *id,
                kind: item.kind,
                weapon: item.weapon,
                position: item.position,
            })
    }

    fn reserve(&mut self, item: ItemId, holder: AgentId, ttl_ms: TimeMs, now: TimeMs) -> bool {
        let Some(entry) = self.items.get_mut(&item) else {
            return false;
        };
        if !entry.available {
            return false;
        }
        // A live lease by someone else blocks; our own lease renews
        if let Some(existing) = &entry.reservation {
            if !existing.is_expired(now) && existing.holder != holder {
                return false;
            }
        }
        entry.reservation = Some(Reservation {
            holder,
            expires_at: now.saturating_add(ttl_ms),
            reason: format!("{} run", entry.kind),
        });
        true
    }

    fn release(&mut self, item: ItemId, holder: AgentId) {
        if let Some(entry) = self.items.get_mut(&item) {
            if entry
                .reservation
                .as_ref()
                .map(|r| r.holder == holder)
                .unwrap_or(false)
            {
                entry.reservation = None;
            }
        }
    }

    fn is_available(&self, item: ItemId) -> bool {
        self.items.get(&item).map(|i| i.available).unwrap_or(false)
    }

    fn best_weapon_quality(&self, now: TimeMs) -> Option<u8> {
        self.items
            .values()
            .filter(|item| item.kind == ItemKind::Weapon && item.available && !item.actively_reserved(now))
            .filter_map(|item| item.weapon.map(|w| w.quality()))
            .max()
    }
}
