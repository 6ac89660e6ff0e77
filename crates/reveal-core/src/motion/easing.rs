//! Pure easing functions
//!
//! Curves follow the "powerN.out" family: `power1.out` is quadratic,
//! `power2.out` cubic and so on.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Easing curve applied to tween progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Ease {
    /// No easing; progress maps straight through, same as `Linear`
    #[serde(rename = "none")]
    None,
    #[serde(rename = "linear")]
    Linear,
    /// f(t) = 1 - (1-t)²
    #[serde(rename = "power1.out", alias = "quad")]
    Power1Out,
    /// f(t) = 1 - (1-t)³
    #[default]
    #[serde(rename = "power2.out", alias = "cubic")]
    Power2Out,
    /// f(t) = 1 - (1-t)⁴
    #[serde(rename = "power3.out", alias = "quart")]
    Power3Out,
    /// f(t) = 1 - (1-t)⁵
    #[serde(rename = "power4.out", alias = "quint")]
    Power4Out,
    /// f(t) = 1 - 2^(-10t)
    #[serde(rename = "expo.out")]
    ExpoOut,
}

impl Ease {
    pub const ALL: [Ease; 7] = [
        Ease::None,
        Ease::Linear,
        Ease::Power1Out,
        Ease::Power2Out,
        Ease::Power3Out,
        Ease::Power4Out,
        Ease::ExpoOut,
    ];

    /// Apply the curve to a progress value, clamped to [0, 1]
    #[inline]
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::None | Ease::Linear => t,
            Ease::Power1Out => power_out(t, 2),
            Ease::Power2Out => power_out(t, 3),
            Ease::Power3Out => power_out(t, 4),
            Ease::Power4Out => power_out(t, 5),
            Ease::ExpoOut => {
                if t >= 1.0 {
                    1.0
                } else {
                    1.0 - 2.0_f64.powf(-10.0 * t)
                }
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Ease::None => "none",
            Ease::Linear => "linear",
            Ease::Power1Out => "power1.out",
            Ease::Power2Out => "power2.out",
            Ease::Power3Out => "power3.out",
            Ease::Power4Out => "power4.out",
            Ease::ExpoOut => "expo.out",
        }
    }
}

#[inline]
fn power_out(t: f64, exponent: i32) -> f64 {
    1.0 - (1.0 - t).powi(exponent)
}

impl fmt::Display for Ease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Ease {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();
        match name.as_str() {
            "none" => Ok(Ease::None),
            "linear" => Ok(Ease::Linear),
            "power1.out" | "power1" | "quad" => Ok(Ease::Power1Out),
            "power2.out" | "power2" | "cubic" => Ok(Ease::Power2Out),
            "power3.out" | "power3" | "quart" => Ok(Ease::Power3Out),
            "power4.out" | "power4" | "quint" => Ok(Ease::Power4Out),
            "expo.out" | "expo" => Ok(Ease::ExpoOut),
            _ => Err(Error::InvalidEase(s.to_string())),
        }
    }
}
