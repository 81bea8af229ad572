//! Goal priority levels with explicit ordering values
//!
//! Higher numeric value = higher priority. The interrupt protocol computes
//! integer gaps over these values; ties never preempt.

use derive_more::Display;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[repr(i32)]
pub enum GoalPriority {
    #[display(fmt = "idle")]
    Idle = 0,
    #[display(fmt = "explore")]
    Explore = 20,
    #[display(fmt = "resource_normal")]
    ResourceNormal = 40,
    #[display(fmt = "combat")]
    Combat = 55,
    #[display(fmt = "resource_high")]
    ResourceHigh = 60,
    #[display(fmt = "high_survival")]
    HighSurvival = 80,
    #[display(fmt = "resource_critical")]
    ResourceCritical = 90,
    #[display(fmt = "critical_survival")]
    CriticalSurvival = 100,
}

impl GoalPriority {
    pub fn value(&self) -> i32 {
        *self as i32
    }

    /// True if this priority strictly outranks the other
    pub fn outranks(&self, other: &GoalPriority) -> bool {
        self.value() > other.value()
    }
}

impl PartialOrd for GoalPriority {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for GoalPriority {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.value().cmp(&other.value())
    }
}
