//! Named scalar domains owning an ordered collection of fuzzy sets

use serde::{Deserialize, Serialize};

use crate::fuzzy::set::FuzzySet;

/// A named input or output domain
///
/// Owns its sets in insertion order plus the membership degrees cached by
/// the last `fuzzify` call. Sets may overlap; there is no normalization
/// invariant across them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuzzyVariable {
    name: String,
    min: f64,
    max: f64,
    sets: Vec<FuzzySet>,
    #[serde(skip)]
    degrees: Vec<f64>,
}

impl FuzzyVariable {
    pub fn new(name: impl Into<String>, min: f64, max: f64) -> Self {
        Self {
            name: name.into(),
            min,
            max,
            sets: Vec::new(),
            degrees: Vec::new(),
        }
    }

    /// Register a labeled set. Labels should be unique for meaningful
    /// defuzzification; this is not enforced.
    pub fn add(mut self, set: FuzzySet) -> Self {
        self.sets.push(set);
        self.degrees.push(0.0);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// Midpoint of the domain, the safe default when no rule fires
    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    pub fn sets(&self) -> &[FuzzySet] {
        &self.sets
    }

    /// Compute and cache the membership degree of every set at `crisp`
    pub fn fuzzify(&mut self, crisp: f64) {
        if self.degrees.len() != self.sets.len() {
            self.degrees.resize(self.sets.len(), 0.0);
        }
        for (i, set) in self.sets.iter().enumerate() {
            self.degrees[i] = set.membership(crisp);
        }
    }

    /// Cached membership degree of the labeled set, if it exists
    pub fn degree_of(&self, label: &str) -> Option<f64> {
        self.sets
            .iter()
            .position(|s| s.label() == label)
            .map(|i| self.degrees.get(i).copied().unwrap_or(0.0))
    }

    /// Look up a set by label
    pub fn set(&self, label: &str) -> Option<&FuzzySet> {
        self.sets.iter().find(|s| s.label() == label)
    }
}
