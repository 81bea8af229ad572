//! Weapon scoring and switch decisions
//!
//! Each candidate gets a blended score: a fuzzy preference value remapped
//! through a per-weapon desirability curve (weight 0.7) plus a
//! deterministic component built from range fit, fire rate, ammo
//! conservation, intrinsic accuracy and historical hit ratio (weight 0.3).
//! Scores are cached per weapon and recomputed at a fixed interval rather
//! than every frame. Switch timing layers a cooldown, forced low-ammo
//! rules and a hysteresis margin on top of the raw ranking.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::config::config;
use crate::core::types::{TimeMs, WeaponKind};
use crate::decision::BotPersonality;
use crate::fuzzy::FuzzySet;
use crate::world::AgentState;

/// Static ballistic profile for one weapon type
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WeaponProfile {
    pub damage: f32,
    /// Inside this range the weapon is at its best
    pub optimal_range: f32,
    /// Beyond this range the weapon is nearly useless
    pub max_range: f32,
    /// Rounds per second
    pub fire_rate: f32,
    /// Intrinsic accuracy in [0,1]
    pub accuracy: f32,
}

impl WeaponProfile {
    pub fn of(kind: WeaponKind) -> Self {
        match kind {
            WeaponKind::Pistol => Self {
                damage: 15.0,
                optimal_range: 20.0,
                max_range: 45.0,
                fire_rate: 2.0,
                accuracy: 0.85,
            },
            WeaponKind::Machinegun => Self {
                damage: 10.0,
                optimal_range: 15.0,
                max_range: 35.0,
                fire_rate: 10.0,
                accuracy: 0.65,
            },
            WeaponKind::Shotgun => Self {
                damage: 45.0,
                optimal_range: 6.0,
                max_range: 15.0,
                fire_rate: 1.2,
                accuracy: 0.55,
            },
        }
    }

    /// x1.5 inside optimal range, x0.2 beyond max, linear falloff between
    fn range_factor(&self, distance: f32) -> f32 {
        if distance <= self.optimal_range {
            1.5
        } else if distance >= self.max_range {
            0.2
        } else {
            let span = self.max_range - self.optimal_range;
            let t = (distance - self.optimal_range) / span;
            1.5 + t * (0.2 - 1.5)
        }
    }

    fn fire_rate_bonus(&self) -> f32 {
        let fastest = WeaponKind::ALL
            .iter()
            .map(|k| WeaponProfile::of(*k).fire_rate)
            .fold(0.0, f32::max);
        1.0 + 0.5 * (self.fire_rate / fastest)
    }
}

/// Steep conservation penalty below 10% ammo, moderate below 30%
fn ammo_factor(ratio: f32) -> f32 {
    if ratio < 0.10 {
        0.1
    } else if ratio < 0.30 {
        0.3 + 0.7 * ratio
    } else {
        1.0
    }
}

/// Desirability remap of the fuzzy weapon-preference output.
///
/// The fuzzy module answers "how much reach/precision does this fight
/// need" in [0,1]; each weapon reads that through its own piecewise-linear
/// curve. Shotgun peaks at the low end, machinegun in the middle, pistol
/// at the high end.
fn desirability(kind: WeaponKind, preference: f64) -> f32 {
    let curve = match kind {
        WeaponKind::Shotgun => FuzzySet::left_shoulder("close_work", 0.25, 0.6),
        WeaponKind::Machinegun => FuzzySet::triangular("mid_pressure", 0.2, 0.5, 0.8),
        WeaponKind::Pistol => FuzzySet::right_shoulder("long_precision", 0.4, 0.75),
    };
    curve.membership(preference) as f32
}

/// Why a switch decision came out the way it did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
pub enum SwitchReason {
    #[display(fmt = "all_weapons_depleted")]
    AllWeaponsDepleted,
    #[display(fmt = "ammo_critical")]
    AmmoCritical,
    #[display(fmt = "cooldown")]
    Cooldown,
    #[display(fmt = "current_unusable")]
    CurrentUnusable,
    #[display(fmt = "pistol_upgrade")]
    PistolUpgrade,
    #[display(fmt = "better_score")]
    BetterScore,
    #[display(fmt = "no_better_option")]
    NoBetterOption,
}

/// Outcome of `should_switch_weapon`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwitchDecision {
    pub should_switch: bool,
    pub target: Option<WeaponKind>,
    pub reason: SwitchReason,
    /// Set when every owned weapon is dry; the host should fall back to a
    /// defensive or flee posture
    pub flee_recommended: bool,
}

impl SwitchDecision {
    fn hold(reason: SwitchReason) -> Self {
        Self {
            should_switch: false,
            target: None,
            reason,
            flee_recommended: false,
        }
    }

    fn switch(target: WeaponKind, reason: SwitchReason) -> Self {
        Self {
            should_switch: true,
            target: Some(target),
            reason,
            flee_recommended: false,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct CachedScore {
    score: f32,
    computed_at: TimeMs,
}

/// Per-agent weapon ranking state: score cache and switch cooldown
#[derive(Debug, Default)]
pub struct WeaponSelector {
    cache: AHashMap<WeaponKind, CachedScore>,
    last_switch_at: Option<TimeMs>,
}

impl WeaponSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Blended score for one weapon, served from cache when fresh
    pub fn score(
        &mut self,
        agent: &AgentState,
        kind: WeaponKind,
        distance: f32,
        preference: f64,
        now: TimeMs,
    ) -> f32 {
        let cfg = config();
        if let Some(cached) = self.cache.get(&kind) {
            if now.saturating_sub(cached.computed_at) < cfg.weapon_score_cache_ms {
                return cached.score;
            }
        }
        let score = self.compute_score(agent, kind, distance, preference);
        self.cache.insert(
            kind,
            CachedScore {
                score,
                computed_at: now,
            },
        );
        score
    }

    fn compute_score(
        &self,
        agent: &AgentState,
        kind: WeaponKind,
        distance: f32,
        preference: f64,
    ) -> f32 {
        let cfg = config();
        let profile = WeaponProfile::of(kind);
        let state = agent.weapon(kind);

        let deterministic = profile.damage
            * profile.range_factor(distance)
            * profile.fire_rate_bonus()
            * ammo_factor(agent.ammo_ratio(kind))
            * profile.accuracy
            * (0.5 + state.hit_ratio);

        // Normalize against the best any profile could reach so the
        // deterministic part lands in [0,1] alongside the desirability curve
        let ceiling = WeaponKind::ALL
            .iter()
            .map(|k| {
                let p = WeaponProfile::of(*k);
                p.damage * 1.5 * p.fire_rate_bonus() * p.accuracy * 1.5
            })
            .fold(0.0, f32::max);
        let deterministic = if ceiling > 0.0 {
            deterministic / ceiling
        } else {
            0.0
        };

        let w = cfg.weapon_fuzzy_weight;
        w * desirability(kind, preference) + (1.0 - w) * deterministic
    }

    /// Highest-scoring owned weapon with ammo, or None if nothing qualifies
    pub fn select_best_weapon(
        &mut self,
        agent: &AgentState,
        distance: f32,
        preference: f64,
        now: TimeMs,
    ) -> Option<WeaponKind> {
        let mut best: Option<(WeaponKind, f32)> = None;
        for kind in WeaponKind::ALL {
            if !agent.owns(kind) || agent.ammo(kind) == 0 {
                continue;
            }
            let score = self.score(agent, kind, distance, preference, now);
            match best {
                Some((_, top)) if score <= top => {}
                _ => best = Some((kind, score)),
            }
        }
        best.map(|(kind, _)| kind)
    }

    /// Record that the host actually performed a switch; starts the cooldown
    pub fn note_switched(&mut self, now: TimeMs) {
        self.last_switch_at = Some(now);
    }

    fn in_cooldown(&self, now: TimeMs) -> bool {
        self.last_switch_at
            .map(|t| now.saturating_sub(t) < config().weapon_switch_cooldown_ms)
            .unwrap_or(false)
    }

    /// Decide whether to swap off the current weapon.
    ///
    /// Evaluated in order: all-dry flee fallback, forced low-ammo switch
    /// (bypasses the cooldown), cooldown gate, unusable current weapon,
    /// then the scored comparison with hysteresis. A pistol upgrade to any
    /// heavier weapon scoring at least as well is always accepted.
    pub fn should_switch_weapon(
        &mut self,
        agent: &AgentState,
        distance: f32,
        preference: f64,
        personality: &BotPersonality,
        now: TimeMs,
    ) -> SwitchDecision {
        let cfg = config();
        let current = agent.current_weapon;

        if agent.total_ammo() == 0 {
            return SwitchDecision {
                should_switch: false,
                target: None,
                reason: SwitchReason::AllWeaponsDepleted,
                flee_recommended: true,
            };
        }

        // Forced switch: current weapon nearly dry while another sits on a
        // materially larger reserve
        let current_ammo = agent.ammo(current);
        if agent.ammo_ratio(current) < cfg.ammo_force_switch_ratio {
            let alternative = WeaponKind::ALL
                .iter()
                .copied()
                .filter(|k| *k != current && agent.owns(*k))
                .filter(|k| {
                    agent.ammo(*k) as f32 > current_ammo as f32 * cfg.ammo_material_advantage
                })
                .max_by_key(|k| agent.ammo(*k));
            if let Some(target) = alternative {
                return SwitchDecision::switch(target, SwitchReason::AmmoCritical);
            }
        }

        if self.in_cooldown(now) {
            return SwitchDecision::hold(SwitchReason::Cooldown);
        }

        let Some(best) = self.select_best_weapon(agent, distance, preference, now) else {
            return SwitchDecision::hold(SwitchReason::NoBetterOption);
        };

        if current_ammo == 0 {
            return SwitchDecision::switch(best, SwitchReason::CurrentUnusable);
        }
        if best == current {
            return SwitchDecision::hold(SwitchReason::NoBetterOption);
        }

        let best_score = self.score(agent, best, distance, preference, now);
        let current_score = self.score(agent, current, distance, preference, now);

        // Never hesitate to climb off the weakest weapon
        if current == WeaponKind::Pistol && best.quality() > current.quality() {
            if best_score >= current_score {
                return SwitchDecision::switch(best, SwitchReason::PistolUpgrade);
            }
        }

        let margin = personality.nudged_switch_margin(cfg.weapon_switch_margin);
        if best_score > current_score * margin {
            SwitchDecision::switch(best, SwitchReason::BetterScore)
        } else {
            SwitchDecision::hold(SwitchReason::NoBetterOption)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::AgentId;
    use crate::world::WeaponState;

    fn agent_with(weapons: &[(WeaponKind, u32, u32)]) -> AgentState {
        let mut agent = AgentState::new(AgentId::new(), 100.0);
        agent.weapons.clear();
        for (kind, ammo, capacity) in weapons {
            agent.weapons.insert(
                *kind,
                WeaponState {
                    owned: true,
                    ammo: *ammo,
                    capacity: Some(*capacity),
                    hit_ratio: 0.5,
                },
            );
        }
        agent
    }

    #[test]
    fn test_range_factor_bands() {
        let profile = WeaponProfile::of(WeaponKind::Shotgun);
        assert_eq!(profile.range_factor(3.0), 1.5);
        assert_eq!(profile.range_factor(30.0), 0.2);
        let mid = profile.range_factor((profile.optimal_range + profile.max_range) / 2.0);
        assert!(mid > 0.2 && mid < 1.5);
    }

    #[test]
    fn test_ammo_factor_penalties() {
        assert_eq!(ammo_factor(0.05), 0.1);
        assert!((ammo_factor(0.2) - (0.3 + 0.7 * 0.2)).abs() < 1e-6);
        assert_eq!(ammo_factor(0.8), 1.0);
    }

    #[test]
    fn test_desirability_curves_peak_in_their_band() {
        // Low preference favors the shotgun, mid the machinegun, high the pistol
        assert!(desirability(WeaponKind::Shotgun, 0.1) > desirability(WeaponKind::Pistol, 0.1));
        assert!(
            desirability(WeaponKind::Machinegun, 0.5) > desirability(WeaponKind::Shotgun, 0.5)
        );
        assert!(desirability(WeaponKind::Pistol, 0.9) > desirability(WeaponKind::Machinegun, 0.9));
    }

    #[test]
    fn test_select_skips_dry_and_unowned_weapons() {
        let agent = agent_with(&[
            (WeaponKind::Pistol, 12, 12),
            (WeaponKind::Machinegun, 0, 100),
        ]);
        let mut selector = WeaponSelector::new();
        // Machinegun is dry, shotgun unowned: only the pistol qualifies
        assert_eq!(
            selector.select_best_weapon(&agent, 10.0, 0.5, 0),
            Some(WeaponKind::Pistol)
        );
    }

    #[test]
    fn test_score_cache_holds_within_interval() {
        let mut agent = agent_with(&[(WeaponKind::Pistol, 12, 12)]);
        let mut selector = WeaponSelector::new();
        let first = selector.score(&agent, WeaponKind::Pistol, 10.0, 0.9, 0);
        // Ammo drops, but within the cache window the stale score is served
        if let Some(w) = agent.weapons.get_mut(&WeaponKind::Pistol) {
            w.ammo = 1;
        }
        let cached = selector.score(&agent, WeaponKind::Pistol, 10.0, 0.9, 100);
        assert_eq!(first, cached);
        let refreshed = selector.score(&agent, WeaponKind::Pistol, 10.0, 0.9, 250);
        assert!(refreshed < first);
    }

    #[test]
    fn test_all_depleted_recommends_flee() {
        let agent = agent_with(&[
            (WeaponKind::Pistol, 0, 12),
            (WeaponKind::Shotgun, 0, 8),
        ]);
        let mut selector = WeaponSelector::new();
        let personality = BotPersonality::default();
        let decision = selector.should_switch_weapon(&agent, 10.0, 0.5, &personality, 0);
        assert!(!decision.should_switch);
        assert_eq!(decision.reason, SwitchReason::AllWeaponsDepleted);
        assert!(decision.flee_recommended);
        assert_eq!(format!("{}", decision.reason), "all_weapons_depleted");
    }

    #[test]
    fn test_forced_switch_bypasses_cooldown() {
        let mut agent = agent_with(&[
            (WeaponKind::Pistol, 0, 100),
            (WeaponKind::Machinegun, 80, 100),
        ]);
        agent.current_weapon = WeaponKind::Pistol;
        let mut selector = WeaponSelector::new();
        selector.note_switched(0);
        let personality = BotPersonality::default();
        // Inside the 600ms cooldown, but the forced rule fires first
        let decision = selector.should_switch_weapon(&agent, 10.0, 0.5, &personality, 100);
        assert!(decision.should_switch);
        assert_eq!(decision.target, Some(WeaponKind::Machinegun));
        assert_eq!(decision.reason, SwitchReason::AmmoCritical);
    }

    #[test]
    fn test_cooldown_blocks_ordinary_switch() {
        let mut agent = agent_with(&[
            (WeaponKind::Pistol, 12, 12),
            (WeaponKind::Machinegun, 100, 100),
        ]);
        agent.current_weapon = WeaponKind::Pistol;
        let mut selector = WeaponSelector::new();
        selector.note_switched(0);
        let personality = BotPersonality::default();
        let decision = selector.should_switch_weapon(&agent, 10.0, 0.3, &personality, 100);
        assert!(!decision.should_switch);
        assert_eq!(decision.reason, SwitchReason::Cooldown);
    }

    #[test]
    fn test_pistol_upgrade_ignores_margin() {
        let mut agent = agent_with(&[
            (WeaponKind::Pistol, 12, 12),
            (WeaponKind::Machinegun, 100, 100),
        ]);
        agent.current_weapon = WeaponKind::Pistol;
        let mut selector = WeaponSelector::new();
        let personality = BotPersonality::default();
        // Mid preference at close-mid range: machinegun edges out the pistol
        // but nowhere near the 6% margin alone would demand
        let decision = selector.should_switch_weapon(&agent, 12.0, 0.5, &personality, 10_000);
        assert!(decision.should_switch);
        assert_eq!(decision.target, Some(WeaponKind::Machinegun));
        assert_eq!(decision.reason, SwitchReason::PistolUpgrade);
    }

    #[test]
    fn test_holds_current_without_material_advantage() {
        let mut agent = agent_with(&[
            (WeaponKind::Machinegun, 100, 100),
            (WeaponKind::Shotgun, 8, 8),
        ]);
        agent.current_weapon = WeaponKind::Machinegun;
        let mut selector = WeaponSelector::new();
        let personality = BotPersonality::default();
        // Mid preference favors the machinegun it already holds
        let decision = selector.should_switch_weapon(&agent, 12.0, 0.5, &personality, 10_000);
        assert!(!decision.should_switch);
        assert_eq!(decision.reason, SwitchReason::NoBetterOption);
    }
}
