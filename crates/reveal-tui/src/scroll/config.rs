//! Helpers on top of the `[ui.scroll]` config table

use std::time::Duration;

pub use reveal_core::ScrollConfig;

pub trait ScrollConfigExt {
    fn animation_duration(&self) -> Duration;

    /// Smooth scrolling is on and has a non-zero duration
    fn is_smooth(&self) -> bool;
}

impl ScrollConfigExt for ScrollConfig {
    #[inline]
    fn animation_duration(&self) -> Duration {
        Duration::from_millis(self.animation_duration_ms)
    }

    #[inline]
    fn is_smooth(&self) -> bool {
        self.smooth_enabled && self.animation_duration_ms > 0
    }
}
