//! Antecedent expression trees
//!
//! A closed tagged variant evaluated by recursion: AND takes the minimum of
//! its operands, OR the maximum. No combinator objects, no dynamic dispatch.

use serde::{Deserialize, Serialize};

/// One node of a rule antecedent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum FuzzyTerm {
    /// Membership of `variable` in the labeled `set`
    Is { variable: String, set: String },
    And(Box<FuzzyTerm>, Box<FuzzyTerm>),
    Or(Box<FuzzyTerm>, Box<FuzzyTerm>),
}

impl FuzzyTerm {
    pub fn is(variable: impl Into<String>, set: impl Into<String>) -> Self {
        FuzzyTerm::Is {
            variable: variable.into(),
            set: set.into(),
        }
    }

    pub fn and(self, other: FuzzyTerm) -> Self {
        FuzzyTerm::And(Box::new(self), Box::new(other))
    }

    pub fn or(self, other: FuzzyTerm) -> Self {
        FuzzyTerm::Or(Box::new(self), Box::new(other))
    }

    /// Visit every leaf reference in the tree
    pub fn for_each_leaf(&self, f: &mut impl FnMut(&str, &str)) {
        match self {
            FuzzyTerm::Is { variable, set } => f(variable, set),
            FuzzyTerm::And(a, b) | FuzzyTerm::Or(a, b) => {
                a.for_each_leaf(f);
                b.for_each_leaf(f);
            }
        }
    }
}
