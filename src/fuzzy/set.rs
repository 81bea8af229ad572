//! Labeled linguistic regions with piecewise-linear membership

use serde::{Deserialize, Serialize};

/// A labeled fuzzy set over a numeric range
///
/// Immutable after construction. Membership is piecewise linear from 2-3
/// breakpoints; shoulders saturate at full membership past their peak.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuzzySet {
    label: String,
    shape: SetShape,
}

/// Membership function shapes
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum SetShape {
    /// Full membership for x <= peak, linear falloff to zero at right
    LeftShoulder { peak: f64, right: f64 },
    /// Linear rise from left, peak of 1.0, linear fall to right
    Triangular { left: f64, peak: f64, right: f64 },
    /// Linear rise from left to peak, full membership for x >= peak
    RightShoulder { left: f64, peak: f64 },
}

impl FuzzySet {
    /// Shoulder saturated toward the low end of the domain
    pub fn left_shoulder(label: impl Into<String>, peak: f64, right: f64) -> Self {
        Self {
            label: label.into(),
            shape: SetShape::LeftShoulder { peak, right },
        }
    }

    /// Symmetric or skewed triangle
    pub fn triangular(label: impl Into<String>, left: f64, peak: f64, right: f64) -> Self {
        Self {
            label: label.into(),
            shape: SetShape::Triangular { left, peak, right },
        }
    }

    /// Shoulder saturated toward the high end of the domain
    pub fn right_shoulder(label: impl Into<String>, left: f64, peak: f64) -> Self {
        Self {
            label: label.into(),
            shape: SetShape::RightShoulder { left, peak },
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Membership degree of a crisp value, always in [0, 1]
    pub fn membership(&self, x: f64) -> f64 {
        let degree = match self.shape {
            SetShape::LeftShoulder { peak, right } => {
                if x <= peak {
                    1.0
                } else {
                    ramp_down(x, peak, right)
                }
            }
            SetShape::Triangular { left, peak, right } => {
                if x <= peak {
                    ramp_up(x, left, peak)
                } else {
                    ramp_down(x, peak, right)
                }
            }
            SetShape::RightShoulder { left, peak } => {
                if x >= peak {
                    1.0
                } else {
                    ramp_up(x, left, peak)
                }
            }
        };
        degree.clamp(0.0, 1.0)
    }
}

/// Linear rise from 0 at `from` to 1 at `to`; degenerate spans snap to a step
fn ramp_up(x: f64, from: f64, to: f64) -> f64 {
    if to - from <= f64::EPSILON {
        if x >= to { 1.0 } else { 0.0 }
    } else {
        (x - from) / (to - from)
    }
}

/// Linear fall from 1 at `from` to 0 at `to`
fn ramp_down(x: f64, from: f64, to: f64) -> f64 {
    if to - from <= f64::EPSILON {
        if x <= from { 1.0 } else { 0.0 }
    } else {
        (to - x) / (to - from)
    }
}
