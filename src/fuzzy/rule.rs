//! IF-THEN rules pairing an antecedent tree with one consequent set

use serde::{Deserialize, Serialize};

use crate::fuzzy::term::FuzzyTerm;

/// A single inference rule
///
/// The antecedent degree clips the consequent set's membership function
/// during defuzzification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuzzyRule {
    pub antecedent: FuzzyTerm,
    pub consequent_variable: String,
    pub consequent_set: String,
}

impl FuzzyRule {
    pub fn new(
        antecedent: FuzzyTerm,
        consequent_variable: impl Into<String>,
        consequent_set: impl Into<String>,
    ) -> Self {
        Self {
            antecedent,
            consequent_variable: consequent_variable.into(),
            consequent_set: consequent_set.into(),
        }
    }
}
