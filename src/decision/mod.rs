//! Fuzzy decision modules and the typed evaluation surface
//!
//! Nine independent fuzzy models (combat aggression, survival urgency,
//! weapon preference, goal bias, tactical response, stress, confidence,
//! fatigue, emotional impact) built once at startup and queried every tick
//! through `DecisionEngine`. Evaluations are fail-soft: a malformed sensor
//! reading resolves to a documented neutral default, never a panic.

pub mod engine;
pub mod personality;
pub mod rulebase;

pub use engine::{DecisionEngine, EmotionalImpact};
pub use personality::BotPersonality;
