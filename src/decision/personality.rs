//! Bot personality configuration loaded from TOML
//!
//! Personalities shape the decision core without touching the rule bases:
//! aggression biases the combat model, caution widens the weapon switch
//! margin, composure feeds the emotional-impact inputs.

use rand::Rng;
use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::core::error::{AiError, Result};

/// Behavioral traits (0.0 to 1.0)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotPersonality {
    /// Name of this personality (set from filename)
    #[serde(default)]
    pub name: String,
    /// Tendency to press fights (0.0 = passive, 1.0 = relentless)
    #[serde(default = "half")]
    pub aggression: f64,
    /// Reluctance to take marginal trades (widens switch margins)
    #[serde(default = "half")]
    pub caution: f64,
    /// Baseline reaction quality (feeds accuracy-need inputs)
    #[serde(default = "half")]
    pub reaction: f64,
    /// Resistance to emotional load
    #[serde(default = "half")]
    pub composure: f64,
}

fn half() -> f64 {
    0.5
}

impl Default for BotPersonality {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            aggression: 0.5,
            caution: 0.5,
            reaction: 0.5,
            composure: 0.5,
        }
    }
}

impl BotPersonality {
    /// Bias handed to `evaluate_combat_aggression`; zero means "no bias",
    /// so a perfectly average trait is passed through as-is rather than
    /// suppressed.
    pub fn aggression_bias(&self) -> f64 {
        self.aggression
    }

    /// Switch margin after the caution nudge: a cautious bot demands a
    /// slightly larger advantage before swapping weapons mid-fight.
    pub fn nudged_switch_margin(&self, base_margin: f32) -> f32 {
        let nudge = 1.0 + (self.caution as f32 - 0.5) * 0.04;
        base_margin * nudge
    }

    /// Generate a randomized personality around the defaults.
    ///
    /// Seeded so match replays reproduce the same roster.
    pub fn generate(name: impl Into<String>, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut trait_value = |base: f64| (base + rng.gen_range(-0.25..=0.25)).clamp(0.0, 1.0);
        Self {
            name: name.into(),
            aggression: trait_value(0.5),
            caution: trait_value(0.5),
            reaction: trait_value(0.5),
            composure: trait_value(0.5),
        }
    }

    /// Parse a personality from TOML text
    pub fn from_toml_str(name: &str, contents: &str) -> Result<Self> {
        let mut personality: BotPersonality = toml::from_str(contents)
            .map_err(|e| AiError::Personality(format!("Failed to parse personality TOML: {e}")))?;
        personality.name = name.to_string();
        personality.validate()?;
        Ok(personality)
    }

    /// Load personality from `data/personalities/{name}.toml`
    pub fn load(name: &str) -> Result<Self> {
        let path = personality_path(name);
        let contents = fs::read_to_string(&path)?;
        Self::from_toml_str(name, &contents)
    }

    fn validate(&self) -> Result<()> {
        for (label, value) in [
            ("aggression", self.aggression),
            ("caution", self.caution),
            ("reaction", self.reaction),
            ("composure", self.composure),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(AiError::Personality(format!(
                    "{label} ({value}) must be in [0, 1]"
                )));
            }
        }
        Ok(())
    }
}

fn personality_path(name: &str) -> PathBuf {
    PathBuf::from("data/personalities").join(format!("{}.toml", name))
}
