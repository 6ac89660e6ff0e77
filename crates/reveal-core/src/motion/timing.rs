//! Playhead and interpolation helpers
//!
//! Times are plain `f64` seconds so that malformed inputs (negative or NaN
//! durations) can be clamped instead of panicking in `Duration` conversions.

/// Clamp a user supplied time to a usable non-negative value
#[inline]
pub fn sanitize_seconds(value: f64) -> f64 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}

/// Tween progress in [0, 1] for a playhead that includes the start delay
///
/// Zero duration completes as soon as the delay has elapsed.
#[inline]
pub fn progress(elapsed: f64, delay: f64, duration: f64) -> f64 {
    let active = elapsed - delay;
    if active < 0.0 {
        return 0.0;
    }
    if duration <= 0.0 {
        return 1.0;
    }
    (active / duration).clamp(0.0, 1.0)
}

/// Linear interpolation between two values
#[inline]
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

/// Linear interpolation for u16 values (scroll positions)
#[inline]
pub fn lerp_u16(from: u16, to: u16, t: f64) -> u16 {
    lerp(from as f64, to as f64, t).round() as u16
}

/// Value equality for props: identical bit patterns (NaN included) or `==`
#[inline]
pub fn same_value(a: f64, b: f64) -> bool {
    a.to_bits() == b.to_bits() || a == b
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp() {
        assert!((lerp(0.0, 100.0, 0.0) - 0.0).abs() < 0.001);
        assert!((lerp(0.0, 100.0, 0.5) - 50.0).abs() < 0.001);
        assert!((lerp(30.0, 0.0, 1.0) - 0.0).abs() < 0.001);
    }

    #[test]
    fn test_lerp_u16() {
        assert_eq!(lerp_u16(0, 100, 0.5), 50);
        assert_eq!(lerp_u16(100, 0, 1.0), 0);
    }

    #[test]
    fn test_progress_waits_for_delay() {
        assert_eq!(progress(0.2, 0.5, 1.0), 0.0);
        assert!((progress(1.0, 0.5, 1.0) - 0.5).abs() < 1e-9);
        assert_eq!(progress(5.0, 0.5, 1.0), 1.0);
    }

    #[test]
    fn test_progress_zero_duration() {
        assert_eq!(progress(0.0, 0.0, 0.0), 1.0);
        assert_eq!(progress(0.1, 0.3, 0.0), 0.0);
    }

    #[test]
    fn test_sanitize_seconds() {
        assert_eq!(sanitize_seconds(-2.0), 0.0);
        assert_eq!(sanitize_seconds(f64::NAN), 0.0);
        assert_eq!(sanitize_seconds(f64::INFINITY), 0.0);
        assert_eq!(sanitize_seconds(0.8), 0.8);
    }

    #[test]
    fn test_same_value() {
        assert!(same_value(f64::NAN, f64::NAN));
        assert!(same_value(0.0, -0.0));
        assert!(same_value(0.8, 0.8));
        assert!(!same_value(0.8, f64::NAN));
        assert!(!same_value(0.8, 0.9));
    }
}
