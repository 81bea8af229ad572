//! Generic fuzzy inference primitives
//!
//! A small Mamdani-style engine: linguistic sets with piecewise-linear
//! membership, variables over a numeric domain, rules whose antecedents are
//! recursive AND/OR trees, and centroid defuzzification. Modules are built
//! once at startup and never mutated afterwards; the only per-tick state is
//! the membership cache written by `fuzzify`.

pub mod module;
pub mod rule;
pub mod set;
pub mod term;
pub mod variable;

pub use module::FuzzyModule;
pub use rule::FuzzyRule;
pub use set::FuzzySet;
pub use term::FuzzyTerm;
pub use variable::FuzzyVariable;

use thiserror::Error;

/// Faults raised by the inference engine.
///
/// These never cross the decision-module boundary: callers there resolve
/// them to documented neutral defaults. An `UnknownVariable` is a programmer
/// error (the rule base is static) and also trips a debug assertion.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FuzzyError {
    #[error("Unknown fuzzy variable: {0}")]
    UnknownVariable(String),

    #[error("Unknown fuzzy set '{set}' on variable '{variable}'")]
    UnknownSet { variable: String, set: String },

    #[error("Non-finite input for variable '{0}'")]
    NonFiniteInput(String),
}
