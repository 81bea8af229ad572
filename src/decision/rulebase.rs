//! Static construction of the nine decision models
//!
//! Each builder declares 2-4 input variables, one or two output variables
//! and a small rule set. The shapes follow a common scheme: unit-range
//! variables carry low/medium/high bands (shoulders at 0.2-0.5 and 0.5-0.8,
//! a triangle between), distances carry close/medium/far over their metric
//! range. Rule bases are static; `FuzzyModule::validate` is run on every
//! builder's output in the engine constructor.

use crate::fuzzy::{FuzzyModule, FuzzyRule, FuzzySet, FuzzyTerm, FuzzyVariable};

/// Standard low/medium/high banding for a [0,1] variable
fn unit_bands(name: &str) -> FuzzyVariable {
    FuzzyVariable::new(name, 0.0, 1.0)
        .add(FuzzySet::left_shoulder("low", 0.2, 0.5))
        .add(FuzzySet::triangular("medium", 0.2, 0.5, 0.8))
        .add(FuzzySet::right_shoulder("high", 0.5, 0.8))
}

/// Close/medium/far banding for a metric distance variable
fn range_bands(name: &str, max: f64) -> FuzzyVariable {
    FuzzyVariable::new(name, 0.0, max)
        .add(FuzzySet::left_shoulder("close", max * 0.15, max * 0.4))
        .add(FuzzySet::triangular("medium", max * 0.15, max * 0.4, max * 0.7))
        .add(FuzzySet::right_shoulder("far", max * 0.4, max * 0.7))
}

fn rule(antecedent: FuzzyTerm, variable: &str, set: &str) -> FuzzyRule {
    FuzzyRule::new(antecedent, variable, set)
}

fn is(variable: &str, set: &str) -> FuzzyTerm {
    FuzzyTerm::is(variable, set)
}

/// Combat aggression: threat + health + ammo -> aggression
pub fn combat_module() -> FuzzyModule {
    let mut m = FuzzyModule::new();
    m.add_variable(unit_bands("threat"));
    m.add_variable(unit_bands("health"));
    m.add_variable(unit_bands("ammo"));
    m.add_variable(unit_bands("aggression"));

    // Survival trumps bravado
    m.add_rule(rule(is("health", "low"), "aggression", "low"));
    m.add_rule(rule(is("ammo", "low"), "aggression", "low"));
    m.add_rule(rule(
        is("threat", "low").and(is("health", "high")),
        "aggression",
        "high",
    ));
    m.add_rule(rule(
        is("threat", "high")
            .and(is("health", "high"))
            .and(is("ammo", "high")),
        "aggression",
        "high",
    ));
    m.add_rule(rule(
        is("threat", "medium").and(is("health", "medium")),
        "aggression",
        "medium",
    ));
    m.add_rule(rule(
        is("threat", "high").and(is("health", "medium")),
        "aggression",
        "medium",
    ));
    m
}

/// Survival urgency: health + distance to nearest health item + pressure -> urgency
pub fn survival_module() -> FuzzyModule {
    let mut m = FuzzyModule::new();
    m.add_variable(unit_bands("health"));
    m.add_variable(range_bands("item_distance", 50.0));
    m.add_variable(unit_bands("pressure"));
    m.add_variable(unit_bands("urgency"));

    m.add_rule(rule(
        is("health", "low").and(is("item_distance", "close")),
        "urgency",
        "high",
    ));
    m.add_rule(rule(
        is("health", "low").and(is("pressure", "high")),
        "urgency",
        "high",
    ));
    m.add_rule(rule(
        is("health", "low").and(is("item_distance", "far")),
        "urgency",
        "medium",
    ));
    m.add_rule(rule(is("health", "medium"), "urgency", "medium"));
    m.add_rule(rule(
        is("health", "high").and(is("pressure", "low")),
        "urgency",
        "low",
    ));
    m.add_rule(rule(is("health", "high"), "urgency", "low"));
    m
}

/// Weapon preference: engagement distance + current ammo + accuracy need
/// -> weapon bias (0 = close-range weapon, 1 = precise long-range weapon)
pub fn weapon_module() -> FuzzyModule {
    let mut m = FuzzyModule::new();
    m.add_variable(range_bands("distance", 50.0));
    m.add_variable(unit_bands("weapon_ammo"));
    m.add_variable(unit_bands("accuracy_need"));
    m.add_variable(unit_bands("weapon_bias"));

    m.add_rule(rule(is("distance", "close"), "weapon_bias", "low"));
    m.add_rule(rule(is("distance", "medium"), "weapon_bias", "medium"));
    m.add_rule(rule(is("distance", "far"), "weapon_bias", "high"));
    m.add_rule(rule(
        is("accuracy_need", "high").and(is("distance", "far")),
        "weapon_bias",
        "high",
    ));
    // Low on ammo at range: favor conserving with precise fire
    m.add_rule(rule(
        is("weapon_ammo", "low").and(is("distance", "medium")),
        "weapon_bias",
        "high",
    ));
    m
}

/// Goal bias: survival need + combat opportunity + explore value
/// -> goal bias (0 = survive, 0.5 = fight, 1 = explore)
pub fn goal_module() -> FuzzyModule {
    let mut m = FuzzyModule::new();
    m.add_variable(unit_bands("survival_need"));
    m.add_variable(unit_bands("combat_opportunity"));
    m.add_variable(unit_bands("explore_value"));
    m.add_variable(unit_bands("goal_bias"));

    m.add_rule(rule(is("survival_need", "high"), "goal_bias", "low"));
    m.add_rule(rule(
        is("survival_need", "medium").and(is("combat_opportunity", "low")),
        "goal_bias",
        "low",
    ));
    m.add_rule(rule(
        is("combat_opportunity", "high").and(is("survival_need", "low")),
        "goal_bias",
        "medium",
    ));
    m.add_rule(rule(
        is("explore_value", "high")
            .and(is("survival_need", "low"))
            .and(is("combat_opportunity", "low")),
        "goal_bias",
        "high",
    ));
    m.add_rule(rule(
        is("explore_value", "medium").and(is("survival_need", "low")),
        "goal_bias",
        "medium",
    ));
    m
}

/// Tactical response: cover distance + threat direction
/// -> response (0 = hold position, 1 = reposition now)
pub fn tactical_module() -> FuzzyModule {
    let mut m = FuzzyModule::new();
    m.add_variable(range_bands("cover_distance", 30.0));
    // 0 = threat ahead, 1 = threat behind
    m.add_variable(unit_bands("threat_direction"));
    m.add_variable(unit_bands("response"));

    m.add_rule(rule(
        is("cover_distance", "close").and(is("threat_direction", "low")),
        "response",
        "low",
    ));
    m.add_rule(rule(is("threat_direction", "high"), "response", "high"));
    m.add_rule(rule(is("cover_distance", "far"), "response", "high"));
    m.add_rule(rule(is("cover_distance", "medium"), "response", "medium"));
    m
}

/// Stress: combat intensity + health status -> stress level
pub fn stress_module() -> FuzzyModule {
    let mut m = FuzzyModule::new();
    m.add_variable(unit_bands("combat_intensity"));
    m.add_variable(unit_bands("health_status"));
    m.add_variable(unit_bands("stress"));

    m.add_rule(rule(
        is("combat_intensity", "high").and(is("health_status", "low")),
        "stress",
        "high",
    ));
    m.add_rule(rule(is("health_status", "low"), "stress", "high"));
    m.add_rule(rule(
        is("combat_intensity", "high").and(is("health_status", "high")),
        "stress",
        "medium",
    ));
    m.add_rule(rule(is("combat_intensity", "medium"), "stress", "medium"));
    m.add_rule(rule(
        is("combat_intensity", "low").and(is("health_status", "high")),
        "stress",
        "low",
    ));
    m
}

/// Confidence: recent performance ratio + success rate -> confidence
pub fn confidence_module() -> FuzzyModule {
    let mut m = FuzzyModule::new();
    m.add_variable(unit_bands("performance_ratio"));
    m.add_variable(unit_bands("success_rate"));
    m.add_variable(unit_bands("confidence"));

    m.add_rule(rule(
        is("performance_ratio", "high").and(is("success_rate", "high")),
        "confidence",
        "high",
    ));
    m.add_rule(rule(is("performance_ratio", "low"), "confidence", "low"));
    m.add_rule(rule(
        is("success_rate", "low").and(is("performance_ratio", "medium")),
        "confidence",
        "low",
    ));
    m.add_rule(rule(
        is("performance_ratio", "medium").or(is("success_rate", "medium")),
        "confidence",
        "medium",
    ));
    m
}

/// Fatigue: time in combat (seconds) + accumulated fatigue -> degradation
pub fn fatigue_module() -> FuzzyModule {
    let mut m = FuzzyModule::new();
    m.add_variable(
        FuzzyVariable::new("time_in_combat", 0.0, 120.0)
            .add(FuzzySet::left_shoulder("short", 20.0, 50.0))
            .add(FuzzySet::triangular("medium", 20.0, 50.0, 90.0))
            .add(FuzzySet::right_shoulder("long", 50.0, 90.0)),
    );
    m.add_variable(unit_bands("current_fatigue"));
    m.add_variable(unit_bands("degradation"));

    m.add_rule(rule(
        is("time_in_combat", "long").and(is("current_fatigue", "high")),
        "degradation",
        "high",
    ));
    m.add_rule(rule(is("time_in_combat", "long"), "degradation", "medium"));
    m.add_rule(rule(is("current_fatigue", "high"), "degradation", "medium"));
    m.add_rule(rule(
        is("time_in_combat", "medium").and(is("current_fatigue", "medium")),
        "degradation",
        "medium",
    ));
    m.add_rule(rule(
        is("time_in_combat", "short").and(is("current_fatigue", "low")),
        "degradation",
        "low",
    ));
    m
}

/// Emotional impact: emotional load + composure -> accuracy modifier and
/// decision speed, both over [0.5, 1.0] where 1.0 is unimpaired
pub fn emotion_module() -> FuzzyModule {
    fn impact_bands(name: &str) -> FuzzyVariable {
        FuzzyVariable::new(name, 0.5, 1.0)
            .add(FuzzySet::left_shoulder("impaired", 0.6, 0.75))
            .add(FuzzySet::triangular("shaken", 0.6, 0.75, 0.9))
            .add(FuzzySet::right_shoulder("steady", 0.75, 0.9))
    }

    let mut m = FuzzyModule::new();
    m.add_variable(unit_bands("emotional_load"));
    m.add_variable(unit_bands("composure"));
    m.add_variable(impact_bands("accuracy_mod"));
    m.add_variable(impact_bands("decision_speed"));

    for output in ["accuracy_mod", "decision_speed"] {
        m.add_rule(rule(
            is("emotional_load", "high").and(is("composure", "low")),
            output,
            "impaired",
        ));
        m.add_rule(rule(
            is("emotional_load", "high").and(is("composure", "medium")),
            output,
            "shaken",
        ));
        m.add_rule(rule(
            is("emotional_load", "medium").and(is("composure", "low")),
            output,
            "shaken",
        ));
        m.add_rule(rule(
            is("emotional_load", "low").or(is("composure", "high")),
            output,
            "steady",
        ));
    }
    m
}
