//! Visual property records
//!
//! `VisualProps` is the sparse record callers hand to the engine (a tween's
//! `from` or `to` vars). `VisualState` is what an element currently looks
//! like on the visual layer.

use serde::{Deserialize, Serialize};

use super::timing::{lerp, same_value};

/// Sparse set of visual properties; absent fields are left alone
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct VisualProps {
    /// Horizontal offset in page units
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    /// Vertical offset in page units (positive = down)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
}

impl VisualProps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_x(mut self, x: f64) -> Self {
        self.x = Some(x);
        self
    }

    pub fn with_y(mut self, y: f64) -> Self {
        self.y = Some(y);
        self
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = Some(opacity);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_none() && self.y.is_none() && self.opacity.is_none()
    }

    /// Write the present fields over `base`
    pub fn overlay_on(&self, base: VisualState) -> VisualState {
        VisualState {
            x: self.x.unwrap_or(base.x),
            y: self.y.unwrap_or(base.y),
            opacity: self.opacity.unwrap_or(base.opacity),
        }
    }
}

fn same_field(a: Option<f64>, b: Option<f64>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => same_value(a, b),
        (None, None) => true,
        _ => false,
    }
}

/// Field-wise value equality; a NaN field equals the same NaN
impl PartialEq for VisualProps {
    fn eq(&self, other: &Self) -> bool {
        same_field(self.x, other.x)
            && same_field(self.y, other.y)
            && same_field(self.opacity, other.opacity)
    }
}

/// Resolved visual state of an element
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualState {
    pub x: f64,
    pub y: f64,
    pub opacity: f64,
}

impl Default for VisualState {
    fn default() -> Self {
        Self::VISIBLE
    }
}

impl VisualState {
    /// Untransformed, fully opaque
    pub const VISIBLE: VisualState = VisualState {
        x: 0.0,
        y: 0.0,
        opacity: 1.0,
    };

    pub fn interpolate(&self, to: &VisualState, t: f64) -> VisualState {
        VisualState {
            x: lerp(self.x, to.x, t),
            y: lerp(self.y, to.y, t),
            opacity: lerp(self.opacity, to.opacity, t),
        }
    }

    /// Opacity as the visual layer applies it
    #[inline]
    pub fn effective_opacity(&self) -> f64 {
        if self.opacity.is_finite() {
            self.opacity.clamp(0.0, 1.0)
        } else {
            1.0
        }
    }

    /// Approximate equality used by tests and change detection
    pub fn approx_eq(&self, other: &VisualState, epsilon: f64) -> bool {
        (self.x - other.x).abs() <= epsilon
            && (self.y - other.y).abs() <= epsilon
            && (self.opacity - other.opacity).abs() <= epsilon
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlay_keeps_absent_fields() {
        let base = VisualState {
            x: 4.0,
            y: 2.0,
            opacity: 0.5,
        };
        let props = VisualProps::new().with_y(30.0);
        let state = props.overlay_on(base);
        assert_eq!(state.x, 4.0);
        assert_eq!(state.y, 30.0);
        assert_eq!(state.opacity, 0.5);
    }

    #[test]
    fn test_interpolate_midpoint() {
        let from = VisualState {
            x: 0.0,
            y: 30.0,
            opacity: 0.0,
        };
        let mid = from.interpolate(&VisualState::VISIBLE, 0.5);
        assert!(mid.approx_eq(
            &VisualState {
                x: 0.0,
                y: 15.0,
                opacity: 0.5
            },
            1e-9
        ));
    }

    #[test]
    fn test_effective_opacity_clamps() {
        let mut state = VisualState::VISIBLE;
        state.opacity = 1.7;
        assert_eq!(state.effective_opacity(), 1.0);
        state.opacity = -0.2;
        assert_eq!(state.effective_opacity(), 0.0);
    }

    #[test]
    fn test_props_from_toml() {
        let props: VisualProps = toml::from_str("y = 30\nopacity = 0").unwrap();
        assert_eq!(props, VisualProps::new().with_y(30.0).with_opacity(0.0));
        assert!(props.x.is_none());
    }

    #[test]
    fn test_props_equal_by_value_including_nan() {
        let a = VisualProps::new().with_y(f64::NAN).with_opacity(0.0);
        assert_eq!(a, a);
        assert_eq!(a, VisualProps::new().with_y(f64::NAN).with_opacity(0.0));
        assert_ne!(a, VisualProps::new().with_y(30.0).with_opacity(0.0));
        assert_ne!(a, VisualProps::new().with_opacity(0.0));
    }
}
