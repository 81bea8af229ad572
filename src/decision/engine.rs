//! Typed evaluation surface over the nine fuzzy models
//!
//! Every method follows the same contract: sanitize inputs, fuzzify in a
//! fixed order, defuzzify, clamp, and on any internal fault return the
//! documented neutral default. A malformed sensor reading must never stall
//! an agent's decision loop.

use crate::core::config::config;
use crate::decision::rulebase;
use crate::fuzzy::{FuzzyError, FuzzyModule};

/// Neutral defaults returned when an evaluation faults
mod defaults {
    pub const AGGRESSION: f64 = 0.5;
    pub const URGENCY: f64 = 0.5;
    pub const WEAPON_BIAS: f64 = 0.5;
    pub const GOAL_BIAS: f64 = 0.5;
    pub const TACTICAL: f64 = 0.5;
    pub const STRESS: f64 = 0.5;
    pub const CONFIDENCE: f64 = 0.7;
    pub const FATIGUE: f64 = 0.0;
    pub const EMOTION: f64 = 1.0;
}

/// Crisp output of the emotional-impact model
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmotionalImpact {
    /// Multiplier on aim accuracy, 1.0 = unimpaired
    pub accuracy_mod: f64,
    /// Multiplier on decision cadence, 1.0 = unimpaired
    pub decision_speed: f64,
}

impl Default for EmotionalImpact {
    fn default() -> Self {
        Self {
            accuracy_mod: defaults::EMOTION,
            decision_speed: defaults::EMOTION,
        }
    }
}

/// Owns the nine fuzzy models, built once at agent creation
pub struct DecisionEngine {
    combat: FuzzyModule,
    survival: FuzzyModule,
    weapon: FuzzyModule,
    goal: FuzzyModule,
    tactical: FuzzyModule,
    stress: FuzzyModule,
    confidence: FuzzyModule,
    fatigue: FuzzyModule,
    emotion: FuzzyModule,
}

impl DecisionEngine {
    pub fn new() -> Self {
        let engine = Self {
            combat: rulebase::combat_module(),
            survival: rulebase::survival_module(),
            weapon: rulebase::weapon_module(),
            goal: rulebase::goal_module(),
            tactical: rulebase::tactical_module(),
            stress: rulebase::stress_module(),
            confidence: rulebase::confidence_module(),
            fatigue: rulebase::fatigue_module(),
            emotion: rulebase::emotion_module(),
        };
        // The rule base is static; a broken reference is a programmer error.
        debug_assert!(engine.combat.validate().is_ok());
        debug_assert!(engine.survival.validate().is_ok());
        debug_assert!(engine.weapon.validate().is_ok());
        debug_assert!(engine.goal.validate().is_ok());
        debug_assert!(engine.tactical.validate().is_ok());
        debug_assert!(engine.stress.validate().is_ok());
        debug_assert!(engine.confidence.validate().is_ok());
        debug_assert!(engine.fatigue.validate().is_ok());
        debug_assert!(engine.emotion.validate().is_ok());
        engine
    }

    /// How hard to press the current fight, in [0,1].
    ///
    /// A nonzero `personality_bias` (typically the bot's aggression trait)
    /// is blended in at `1 - aggression_fuzzy_weight`.
    pub fn evaluate_combat_aggression(
        &mut self,
        threat: f64,
        health: f64,
        ammo: f64,
        personality_bias: f64,
    ) -> f64 {
        let fuzzy = run(
            &mut self.combat,
            &[("threat", threat), ("health", health), ("ammo", ammo)],
            "aggression",
            defaults::AGGRESSION,
        );
        let blended = if personality_bias != 0.0 && personality_bias.is_finite() {
            let w = config().aggression_fuzzy_weight as f64;
            fuzzy * w + personality_bias * (1.0 - w)
        } else {
            fuzzy
        };
        blended.clamp(0.0, 1.0)
    }

    /// How urgently to break off for a health pickup, in [0,1]
    pub fn evaluate_survival_urgency(
        &mut self,
        health: f64,
        health_item_distance: f64,
        pressure: f64,
    ) -> f64 {
        run(
            &mut self.survival,
            &[
                ("health", health),
                ("item_distance", health_item_distance),
                ("pressure", pressure),
            ],
            "urgency",
            defaults::URGENCY,
        )
    }

    /// Preferred weapon class for the engagement, in [0,1]
    /// (0 favors close-range spread, 1 favors precise long-range fire)
    pub fn evaluate_weapon_preference(
        &mut self,
        distance: f64,
        weapon_ammo: f64,
        accuracy_need: f64,
    ) -> f64 {
        run(
            &mut self.weapon,
            &[
                ("distance", distance),
                ("weapon_ammo", weapon_ammo),
                ("accuracy_need", accuracy_need),
            ],
            "weapon_bias",
            defaults::WEAPON_BIAS,
        )
    }

    /// Which family of goals deserves the tick, in [0,1]
    /// (0 survive, 0.5 fight, 1 explore)
    pub fn evaluate_goal_bias(
        &mut self,
        survival_need: f64,
        combat_opportunity: f64,
        explore_value: f64,
    ) -> f64 {
        run(
            &mut self.goal,
            &[
                ("survival_need", survival_need),
                ("combat_opportunity", combat_opportunity),
                ("explore_value", explore_value),
            ],
            "goal_bias",
            defaults::GOAL_BIAS,
        )
    }

    /// Whether to hold or reposition, in [0,1] (1 = reposition now)
    pub fn evaluate_tactical_response(&mut self, cover_distance: f64, threat_direction: f64) -> f64 {
        run(
            &mut self.tactical,
            &[
                ("cover_distance", cover_distance),
                ("threat_direction", threat_direction),
            ],
            "response",
            defaults::TACTICAL,
        )
    }

    /// Current stress level, in [0,1]
    pub fn evaluate_stress(&mut self, combat_intensity: f64, health_status: f64) -> f64 {
        run(
            &mut self.stress,
            &[
                ("combat_intensity", combat_intensity),
                ("health_status", health_status),
            ],
            "stress",
            defaults::STRESS,
        )
    }

    /// Confidence from recent results, in [0,1]; faults read as mildly
    /// confident (0.7) rather than neutral so a broken sensor does not make
    /// the bot timid.
    pub fn evaluate_confidence(&mut self, performance_ratio: f64, success_rate: f64) -> f64 {
        run(
            &mut self.confidence,
            &[
                ("performance_ratio", performance_ratio),
                ("success_rate", success_rate),
            ],
            "confidence",
            defaults::CONFIDENCE,
        )
    }

    /// Skill degradation from sustained combat, in [0,1]; faults read as
    /// fresh (0.0).
    pub fn evaluate_fatigue(&mut self, time_in_combat_secs: f64, current_fatigue: f64) -> f64 {
        run(
            &mut self.fatigue,
            &[
                ("time_in_combat", time_in_combat_secs),
                ("current_fatigue", current_fatigue),
            ],
            "degradation",
            defaults::FATIGUE,
        )
    }

    /// Accuracy and decision-speed multipliers from emotional state.
    ///
    /// Faults read as unimpaired (1.0 each).
    pub fn evaluate_emotional_impact(
        &mut self,
        emotional_load: f64,
        composure: f64,
    ) -> EmotionalImpact {
        let inputs = [("emotional_load", emotional_load), ("composure", composure)];
        match feed(&mut self.emotion, &inputs) {
            Ok(()) => {
                let accuracy_mod = self
                    .emotion
                    .defuzzify("accuracy_mod")
                    .map(|v| v.clamp(0.0, 1.0))
                    .unwrap_or_else(|err| fault("accuracy_mod", err, defaults::EMOTION));
                let decision_speed = self
                    .emotion
                    .defuzzify("decision_speed")
                    .map(|v| v.clamp(0.0, 1.0))
                    .unwrap_or_else(|err| fault("decision_speed", err, defaults::EMOTION));
                EmotionalImpact {
                    accuracy_mod,
                    decision_speed,
                }
            }
            Err(err) => {
                tracing::warn!(%err, "emotional impact fell back to defaults");
                EmotionalImpact::default()
            }
        }
    }
}

impl Default for DecisionEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Fuzzify the inputs in order, defuzzify the output, clamp to [0,1];
/// resolve any fault to `default`.
fn run(module: &mut FuzzyModule, inputs: &[(&str, f64)], output: &str, default: f64) -> f64 {
    let result = feed(module, inputs).and_then(|()| module.defuzzify(output));
    match result {
        Ok(value) => value.clamp(0.0, 1.0),
        Err(err) => fault(output, err, default),
    }
}

fn feed(module: &mut FuzzyModule, inputs: &[(&str, f64)]) -> Result<(), FuzzyError> {
    for &(name, value) in inputs {
        module.fuzzify(name, value)?;
    }
    Ok(())
}

fn fault(output: &str, err: FuzzyError, default: f64) -> f64 {
    tracing::warn!(output, %err, "fuzzy evaluation fell back to default");
    default
}
