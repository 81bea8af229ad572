//! Decision-core configuration with documented constants
//!
//! All tuning values are collected here with explanations of their purpose
//! and how they interact with each other. Everything is fixed at
//! initialization time; nothing in this struct is reloaded at runtime.

use serde::{Deserialize, Serialize};

use crate::core::error::{AiError, Result};

/// Configuration for the decision core
///
/// These values were tuned against live bot matches. Changing them shifts
/// how eagerly bots break off fights for pickups and how often they swap
/// weapons mid-engagement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    // === INTERRUPT PROTOCOL ===
    /// Default priority-point advantage a challenger goal needs to preempt
    ///
    /// A challenger must outrank the active goal by at least this many
    /// points (on the 0-100 priority scale) before an interrupt is even
    /// considered. Resource goals override this upward; see
    /// `resource_priority_gap`.
    pub min_priority_gap: i32,

    /// Priority gap required to preempt a resource-seeking goal
    ///
    /// Resource runs (health/ammo/weapon) are protected more tightly than
    /// generic goals so a bot that committed to a medkit run actually
    /// reaches the medkit instead of ping-ponging between objectives.
    pub resource_priority_gap: i32,

    /// Minimum commitment time before any goal may be interrupted (ms)
    ///
    /// Below this age a goal refuses interruption outright. Keeps the
    /// arbiter from thrashing between two goals whose priorities hover
    /// near each other across consecutive ticks.
    pub min_goal_duration_ms: u64,

    // === RESOURCE GOALS ===
    /// Lease duration when reserving a pickup (ms)
    ///
    /// Long enough to cross a mid-size arena to the item, short enough
    /// that a dead reserver frees the item quickly. Leases lapse purely
    /// by time; no release call is required.
    pub reservation_ttl_ms: u64,

    /// How long to stand on a pickup waiting for the engine to grant it (ms)
    ///
    /// Pickup grant is confirmed externally (collision trigger). If nothing
    /// arrives within this window the item is presumed contested or stuck
    /// and the goal retries elsewhere.
    pub pickup_wait_ms: u64,

    /// Arrival radius handed to the movement delegate for pickups (meters)
    ///
    /// Deliberately tighter than the general-purpose movement completion
    /// distance: the pickup trigger volume is ~0.5 m half-extent, so 0.3 m
    /// guarantees overlap and avoids false "arrived" signals.
    pub approach_radius: f32,

    /// Search radius when projecting an item position onto the navmesh (meters)
    pub nav_projection_radius: f32,

    /// Maximum alternative targets tried before a resource goal fails
    pub max_seek_attempts: u32,

    /// Cooldown after a failed resource goal before the same goal kind
    /// may be re-selected (ms)
    ///
    /// Prevents a bot from re-running a doomed medkit hunt every frame
    /// when the map simply has no reachable medkits.
    pub seek_retry_backoff_ms: u64,

    /// Health gain (fraction of max health) that counts as pickup success
    ///
    /// A health goal completes once health rises by at least this much
    /// during the wait window. 0.12 tolerates regen ticking underneath
    /// while still requiring a real pack.
    pub health_gain_success: f32,

    // === PRIORITY STEP FUNCTIONS ===
    /// Health ratio at or below which survival is critical
    pub health_critical_threshold: f32,

    /// Health ratio at or below which survival is high-priority
    pub health_low_threshold: f32,

    /// Health ratio at or below which a health run is still worthwhile
    pub health_seek_threshold: f32,

    /// Ammo ratio at or below which an ammo run is high-priority in combat
    pub ammo_combat_threshold: f32,

    /// Ammo ratio at or below which an ammo run is high-priority anywhere
    pub ammo_low_threshold: f32,

    // === WEAPON SELECTION ===
    /// Weapon score cache lifetime (ms)
    ///
    /// Scores are recomputed at most this often, not every frame. 200 ms is
    /// far below human reaction time and keeps scoring off the hot path.
    pub weapon_score_cache_ms: u64,

    /// Minimum time between weapon switches (ms)
    pub weapon_switch_cooldown_ms: u64,

    /// Score multiplier a recommended weapon must beat the current one by
    ///
    /// At 1.06, a candidate needs a ~6% advantage before a switch is worth
    /// the swap animation. Nudged upward by the caution personality trait.
    pub weapon_switch_margin: f32,

    /// Ammo ratio below which a switch away is forced
    pub ammo_force_switch_ratio: f32,

    /// Ammo advantage multiple another weapon needs to justify a forced switch
    pub ammo_material_advantage: f32,

    /// Blend weight of the fuzzy preference in the final weapon score
    ///
    /// The remaining (1 - weight) goes to the deterministic factor product.
    pub weapon_fuzzy_weight: f32,

    /// Estimated capacity multiplier when true per-weapon capacity is unknown
    ///
    /// The source game never tracked max carriable ammo, so ratios are
    /// computed against `current total x this multiplier`. This is an
    /// acknowledged approximation, not balance intent; hosts that know the
    /// real capacity should set it accordingly.
    pub ammo_capacity_multiplier: f32,

    // === DECISION MODULES ===
    /// Weight of the fuzzy output when blending combat aggression with a
    /// personality bias (the bias gets the remainder)
    pub aggression_fuzzy_weight: f32,

    /// Fractional priority-level delta applied per accuracy feedback step
    ///
    /// Tuned constant carried over from the source without re-derivation.
    pub accuracy_bias_step: f32,

    /// Fractional priority-level delta applied per survival-time feedback step
    ///
    /// Tuned constant carried over from the source without re-derivation.
    pub survival_bias_step: f32,

    // === DIAGNOSTICS ===
    /// Minimum interval between repeated throttled warnings (ms)
    pub diag_throttle_ms: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            // Interrupt protocol
            min_priority_gap: 10,
            resource_priority_gap: 15,
            min_goal_duration_ms: 1_500,

            // Resource goals
            reservation_ttl_ms: 12_000,
            pickup_wait_ms: 5_000,
            approach_radius: 0.3,
            nav_projection_radius: 2.0,
            max_seek_attempts: 4,
            seek_retry_backoff_ms: 6_000,
            health_gain_success: 0.12,

            // Priority steps (critical < low < seek)
            health_critical_threshold: 0.15,
            health_low_threshold: 0.35,
            health_seek_threshold: 0.60,
            ammo_combat_threshold: 0.20,
            ammo_low_threshold: 0.30,

            // Weapon selection
            weapon_score_cache_ms: 200,
            weapon_switch_cooldown_ms: 600,
            weapon_switch_margin: 1.06,
            ammo_force_switch_ratio: 0.05,
            ammo_material_advantage: 2.0,
            weapon_fuzzy_weight: 0.7,
            ammo_capacity_multiplier: 6.0,

            // Decision modules
            aggression_fuzzy_weight: 0.7,
            accuracy_bias_step: 0.5,
            survival_bias_step: 0.5,

            // Diagnostics
            diag_throttle_ms: 5_000,
        }
    }
}

impl AiConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.health_critical_threshold >= self.health_low_threshold
            || self.health_low_threshold >= self.health_seek_threshold
        {
            return Err(AiError::InvalidConfig(format!(
                "health thresholds must be ordered critical ({}) < low ({}) < seek ({})",
                self.health_critical_threshold,
                self.health_low_threshold,
                self.health_seek_threshold
            )));
        }

        if self.min_priority_gap <= 0 || self.resource_priority_gap < self.min_priority_gap {
            return Err(AiError::InvalidConfig(format!(
                "priority gaps must satisfy 0 < min ({}) <= resource ({})",
                self.min_priority_gap, self.resource_priority_gap
            )));
        }

        if !(1.0..=2.0).contains(&self.weapon_switch_margin) {
            return Err(AiError::InvalidConfig(format!(
                "weapon_switch_margin ({}) should be in [1.0, 2.0]",
                self.weapon_switch_margin
            )));
        }

        if !(0.0..=1.0).contains(&self.weapon_fuzzy_weight)
            || !(0.0..=1.0).contains(&self.aggression_fuzzy_weight)
        {
            return Err(AiError::InvalidConfig(
                "blend weights must be in [0, 1]".into(),
            ));
        }

        if self.approach_radius <= 0.0 || self.approach_radius > 0.5 {
            return Err(AiError::InvalidConfig(format!(
                "approach_radius ({}) must stay within the 0.5 m pickup trigger half-extent",
                self.approach_radius
            )));
        }

        if self.max_seek_attempts == 0 {
            return Err(AiError::InvalidConfig(
                "max_seek_attempts must be at least 1".into(),
            ));
        }

        Ok(())
    }
}

// === GLOBAL CONFIG ACCESS ===

use std::sync::OnceLock;

static CONFIG: OnceLock<AiConfig> = OnceLock::new();

/// Get the global decision-core config (initializes with defaults if not set)
pub fn config() -> &'static AiConfig {
    CONFIG.get_or_init(AiConfig::default)
}

/// Set the global decision-core config (can only be called once)
///
/// Returns Err if config was already set.
pub fn set_config(config: AiConfig) -> std::result::Result<(), AiConfig> {
    CONFIG.set(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(AiConfig::default().validate().is_ok());
    }

    #[test]
    fn test_unordered_health_thresholds_rejected() {
        let mut cfg = AiConfig::default();
        cfg.health_critical_threshold = 0.5;
        cfg.health_low_threshold = 0.4;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_resource_gap_must_cover_base_gap() {
        let mut cfg = AiConfig::default();
        cfg.resource_priority_gap = 5;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_loose_approach_radius_rejected() {
        let mut cfg = AiConfig::default();
        cfg.approach_radius = 1.0;
        assert!(cfg.validate().is_err());
    }
}
