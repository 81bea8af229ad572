//! Weapon selection integration tests
//!
//! Run the fuzzy weapon-preference module end-to-end into the selector:
//! the preference output feeds the desirability curves, the deterministic
//! factors feed off live agent state, and the switch rules sit on top.

use ironsight::core::types::{AgentId, WeaponKind};
use ironsight::decision::{BotPersonality, DecisionEngine};
use ironsight::weapons::{SwitchReason, WeaponSelector};
use ironsight::world::{AgentState, WeaponState};

fn arsenal(weapons: &[(WeaponKind, u32, u32)]) -> AgentState {
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

/// Close-quarters fight: the fuzzy module leans low, the shotgun's
/// desirability curve peaks there, and a stocked shotgun wins the ranking.
#[test]
fn test_close_range_preference_selects_shotgun() {
    let mut engine = DecisionEngine::new();
    let preference = engine.evaluate_weapon_preference(3.0, 0.9, 0.2);
    assert!((0.0..=1.0).contains(&preference));

    let mut agent = arsenal(&[
        (WeaponKind::Pistol, 12, 12),
        (WeaponKind::Shotgun, 8, 8),
    ]);
    agent.current_weapon = WeaponKind::Pistol;
    let mut selector = WeaponSelector::new();
    let best = selector.select_best_weapon(&agent, 3.0, preference, 0);
    assert_eq!(best, Some(WeaponKind::Shotgun));
}

/// Pistol to shotgun at close range is an upgrade: accepted without the
/// score-margin hysteresis.
#[test]
fn test_pistol_upgrade_is_never_hesitant() {
    let mut agent = arsenal(&[
        (WeaponKind::Pistol, 12, 12),
        (WeaponKind::Shotgun, 8, 8),
    ]);
    agent.current_weapon = WeaponKind::Pistol;
    let mut selector = WeaponSelector::new();
    let personality = BotPersonality::default();

    let decision = selector.should_switch_weapon(&agent, 3.0, 0.1, &personality, 10_000);
    assert!(decision.should_switch);
    assert_eq!(decision.target, Some(WeaponKind::Shotgun));
    assert_eq!(decision.reason, SwitchReason::PistolUpgrade);
}

/// Every owned weapon dry: no switch target exists, the decision names the
/// depletion and recommends a defensive fallback.
#[test]
fn test_depleted_arsenal_signals_flee() {
    let mut agent = arsenal(&[
        (WeaponKind::Pistol, 0, 12),
        (WeaponKind::Machinegun, 0, 100),
    ]);
    agent.current_weapon = WeaponKind::Machinegun;
    let mut selector = WeaponSelector::new();
    let personality = BotPersonality::default();

    let decision = selector.should_switch_weapon(&agent, 10.0, 0.5, &personality, 0);
    assert!(!decision.should_switch);
    assert!(decision.flee_recommended);
    assert_eq!(decision.reason, SwitchReason::AllWeaponsDepleted);
}

/// Back-to-back switch requests inside the cooldown window hold, then the
/// same request goes through once the window lapses.
#[test]
fn test_switch_cooldown_window() {
    let mut agent = arsenal(&[
        (WeaponKind::Pistol, 12, 12),
        (WeaponKind::Shotgun, 8, 8),
    ]);
    agent.current_weapon = WeaponKind::Pistol;
    let mut selector = WeaponSelector::new();
    let personality = BotPersonality::default();

    let first = selector.should_switch_weapon(&agent, 3.0, 0.1, &personality, 1_000);
    assert!(first.should_switch);
    selector.note_switched(1_000);

    let held = selector.should_switch_weapon(&agent, 3.0, 0.1, &personality, 1_200);
    assert_eq!(held.reason, SwitchReason::Cooldown);

    let after = selector.should_switch_weapon(&agent, 3.0, 0.1, &personality, 2_000);
    assert!(after.should_switch);
}

/// Holding a weapon that already fits the fight: no switch, even with an
/// alternative available, because the margin rule demands a material edge.
#[test]
fn test_margin_hysteresis_holds_current_weapon() {
    let mut engine = DecisionEngine::new();
    // Mid-range engagement with a healthy magazine
    let preference = engine.evaluate_weapon_preference(18.0, 0.8, 0.5);

    let mut agent = arsenal(&[
        (WeaponKind::Machinegun, 90, 100),
        (WeaponKind::Shotgun, 8, 8),
    ]);
    agent.current_weapon = WeaponKind::Machinegun;
    let mut selector = WeaponSelector::new();
    let personality = BotPersonality::default();

    let decision = selector.should_switch_weapon(&agent, 18.0, preference, &personality, 10_000);
    assert!(!decision.should_switch);
    assert_eq!(decision.reason, SwitchReason::NoBetterOption);
}
