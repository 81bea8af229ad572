//! Variable registry plus rule base with Mamdani inference

use ahash::AHashMap;

use crate::fuzzy::rule::FuzzyRule;
use crate::fuzzy::term::FuzzyTerm;
use crate::fuzzy::variable::FuzzyVariable;
use crate::fuzzy::FuzzyError;

/// Number of sample points for the discretized centroid.
///
/// Bounded-time per tick; fine enough that rule-band boundaries on a unit
/// domain land between samples.
const CENTROID_SAMPLES: usize = 40;

/// A self-contained fuzzy model: variables and an ordered rule list
///
/// Built once at startup. `fuzzify` writes crisp inputs, `defuzzify` reads a
/// crisp output; the result is a pure function of the inputs and the static
/// rule base.
#[derive(Debug, Clone, Default)]
pub struct FuzzyModule {
    variables: AHashMap<String, FuzzyVariable>,
    rules: Vec<FuzzyRule>,
}

impl FuzzyModule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_variable(&mut self, variable: FuzzyVariable) {
        self.variables.insert(variable.name().to_string(), variable);
    }

    pub fn add_rule(&mut self, rule: FuzzyRule) {
        self.rules.push(rule);
    }

    pub fn variable(&self, name: &str) -> Option<&FuzzyVariable> {
        self.variables.get(name)
    }

    /// Feed a crisp input: computes and caches the membership degree for
    /// every set of the named variable.
    ///
    /// Referencing an undeclared variable is a programmer error; the rule
    /// base is static, so this trips a debug assertion and surfaces a typed
    /// error in release builds.
    pub fn fuzzify(&mut self, name: &str, crisp: f64) -> Result<(), FuzzyError> {
        if !crisp.is_finite() {
            return Err(FuzzyError::NonFiniteInput(name.to_string()));
        }
        match self.variables.get_mut(name) {
            Some(variable) => {
                variable.fuzzify(crisp);
                Ok(())
            }
            None => {
                debug_assert!(false, "fuzzify on undeclared variable '{name}'");
                Err(FuzzyError::UnknownVariable(name.to_string()))
            }
        }
    }

    /// Compute the crisp output of the named variable by clipping each
    /// firing rule's consequent and taking the centroid of the max-merged
    /// aggregate. Returns the domain midpoint when no rule fires.
    pub fn defuzzify(&self, name: &str) -> Result<f64, FuzzyError> {
        let output = self.variables.get(name).ok_or_else(|| {
            debug_assert!(false, "defuzzify on undeclared variable '{name}'");
            FuzzyError::UnknownVariable(name.to_string())
        })?;

        // Antecedent degrees are fixed for the whole sweep; evaluate once.
        let mut clips: Vec<(f64, &str)> = Vec::new();
        for rule in self.rules.iter().filter(|r| r.consequent_variable == name) {
            let degree = self.term_degree(&rule.antecedent)?;
            if degree > 0.0 {
                clips.push((degree, rule.consequent_set.as_str()));
            }
        }

        let (min, max) = (output.min(), output.max());
        let step = (max - min) / CENTROID_SAMPLES as f64;
        let mut weighted_sum = 0.0;
        let mut area = 0.0;
        for i in 0..=CENTROID_SAMPLES {
            let x = min + step * i as f64;
            let mut mu: f64 = 0.0;
            for &(degree, set_label) in &clips {
                let set = output.set(set_label).ok_or_else(|| FuzzyError::UnknownSet {
                    variable: name.to_string(),
                    set: set_label.to_string(),
                })?;
                mu = mu.max(set.membership(x).min(degree));
            }
            weighted_sum += x * mu;
            area += mu;
        }

        if area < 1e-9 {
            return Ok(output.midpoint());
        }
        Ok(weighted_sum / area)
    }

    /// Recursive antecedent evaluation: min over AND, max over OR
    fn term_degree(&self, term: &FuzzyTerm) -> Result<f64, FuzzyError> {
        match term {
            FuzzyTerm::Is { variable, set } => {
                let var = self
                    .variables
                    .get(variable)
                    .ok_or_else(|| FuzzyError::UnknownVariable(variable.clone()))?;
                var.degree_of(set).ok_or_else(|| FuzzyError::UnknownSet {
                    variable: variable.clone(),
                    set: set.clone(),
                })
            }
            FuzzyTerm::And(a, b) => Ok(self.term_degree(a)?.min(self.term_degree(b)?)),
            FuzzyTerm::Or(a, b) => Ok(self.term_degree(a)?.max(self.term_degree(b)?)),
        }
    }

    /// Check every rule reference against the declared variables and sets.
    ///
    /// Called once after construction so a typo in the static rule base
    /// fails at startup rather than mid-match.
    pub fn validate(&self) -> Result<(), FuzzyError> {
        for rule in &self.rules {
            let mut result = Ok(());
            rule.antecedent.for_each_leaf(&mut |variable, set| {
                if result.is_err() {
                    return;
                }
                match self.variables.get(variable) {
                    None => result = Err(FuzzyError::UnknownVariable(variable.to_string())),
                    Some(var) if var.set(set).is_none() => {
                        result = Err(FuzzyError::UnknownSet {
                            variable: variable.to_string(),
                            set: set.to_string(),
                        })
                    }
                    Some(_) => {}
                }
            });
            result?;

            let output = self
                .variables
                .get(&rule.consequent_variable)
                .ok_or_else(|| FuzzyError::UnknownVariable(rule.consequent_variable.clone()))?;
            if output.set(&rule.consequent_set).is_none() {
                return Err(FuzzyError::UnknownSet {
                    variable: rule.consequent_variable.clone(),
                    set: rule.consequent_set.clone(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fuzzy::set::FuzzySet;

    fn unit_sets(var: FuzzyVariable) -> FuzzyVariable {
        var.add(FuzzySet::left_shoulder("low", 0.2, 0.5))
            .add(FuzzySet::triangular("medium", 0.2, 0.5, 0.8))
            .add(FuzzySet::right_shoulder("high", 0.5, 0.8))
    }

    fn simple_module() -> FuzzyModule {
        let mut module = FuzzyModule::new();
        module.add_variable(unit_sets(FuzzyVariable::new("threat", 0.0, 1.0)));
        module.add_variable(unit_sets(FuzzyVariable::new("health", 0.0, 1.0)));
        module.add_variable(unit_sets(FuzzyVariable::new("aggression", 0.0, 1.0)));
        module.add_rule(FuzzyRule::new(
            FuzzyTerm::is("threat", "high").and(FuzzyTerm::is("health", "high")),
            "aggression",
            "high",
        ));
        module.add_rule(FuzzyRule::new(
            FuzzyTerm::is("health", "low"),
            "aggression",
            "low",
        ));
        module.add_rule(FuzzyRule::new(
            FuzzyTerm::is("threat", "medium"),
            "aggression",
            "medium",
        ));
        module
    }

    #[test]
    fn test_static_rule_base_validates() {
        assert!(simple_module().validate().is_ok());
    }

    #[test]
    fn test_bad_rule_reference_caught_at_validation() {
        let mut module = simple_module();
        module.add_rule(FuzzyRule::new(
            FuzzyTerm::is("threat", "extreme"),
            "aggression",
            "high",
        ));
        assert!(matches!(
            module.validate(),
            Err(FuzzyError::UnknownSet { .. })
        ));
    }

    #[test]
    fn test_high_threat_full_health_is_aggressive() {
        let mut module = simple_module();
        module.fuzzify("threat", 0.9).unwrap();
        module.fuzzify("health", 0.9).unwrap();
        let out = module.defuzzify("aggression").unwrap();
        assert!(out > 0.6, "expected aggressive output, got {out}");
    }

    #[test]
    fn test_low_health_is_passive() {
        let mut module = simple_module();
        module.fuzzify("threat", 0.9).unwrap();
        module.fuzzify("health", 0.05).unwrap();
        let out = module.defuzzify("aggression").unwrap();
        assert!(out < 0.4, "expected passive output, got {out}");
    }

    #[test]
    fn test_no_rule_fired_returns_midpoint() {
        let mut module = FuzzyModule::new();
        module.add_variable(unit_sets(FuzzyVariable::new("threat", 0.0, 1.0)));
        module.add_variable(unit_sets(FuzzyVariable::new("aggression", 0.0, 1.0)));
        module.add_rule(FuzzyRule::new(
            FuzzyTerm::is("threat", "high"),
            "aggression",
            "high",
        ));
        module.fuzzify("threat", 0.0).unwrap();
        let out = module.defuzzify("aggression").unwrap();
        assert!((out - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_defuzzify_is_deterministic() {
        let mut module = simple_module();
        module.fuzzify("threat", 0.63).unwrap();
        module.fuzzify("health", 0.41).unwrap();
        let first = module.defuzzify("aggression").unwrap();
        let second = module.defuzzify("aggression").unwrap();
        assert_eq!(first, second);

        // Re-fuzzifying the same crisp inputs must not drift either
        module.fuzzify("threat", 0.63).unwrap();
        module.fuzzify("health", 0.41).unwrap();
        assert_eq!(module.defuzzify("aggression").unwrap(), first);
    }

    #[test]
    fn test_nan_input_is_rejected() {
        let mut module = simple_module();
        assert_eq!(
            module.fuzzify("threat", f64::NAN),
            Err(FuzzyError::NonFiniteInput("threat".to_string()))
        );
    }

    #[test]
    #[cfg_attr(debug_assertions, should_panic(expected = "undeclared variable"))]
    fn test_unknown_variable_fails_loudly_in_debug() {
        let mut module = simple_module();
        let _ = module.fuzzify("morale", 0.5);
    }

    #[test]
    fn test_or_antecedent_takes_max() {
        let mut module = FuzzyModule::new();
        module.add_variable(unit_sets(FuzzyVariable::new("threat", 0.0, 1.0)));
        module.add_variable(unit_sets(FuzzyVariable::new("health", 0.0, 1.0)));
        module.add_variable(unit_sets(FuzzyVariable::new("urgency", 0.0, 1.0)));
        module.add_rule(FuzzyRule::new(
            FuzzyTerm::is("threat", "high").or(FuzzyTerm::is("health", "low")),
            "urgency",
            "high",
        ));
        // Threat calm, health critical: OR must still fire the rule hard
        module.fuzzify("threat", 0.0).unwrap();
        module.fuzzify("health", 0.05).unwrap();
        let out = module.defuzzify("urgency").unwrap();
        assert!(out > 0.6, "expected urgent output, got {out}");
    }
}
