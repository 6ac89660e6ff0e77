//! Page scroll animation controller

use std::time::Instant;

use reveal_core::motion::timing::{lerp_u16, progress};
use reveal_core::Ease;

use super::config::{ScrollConfig, ScrollConfigExt};

#[derive(Debug, Clone)]
struct ActiveScroll {
    start: Instant,
    from: u16,
    to: u16,
    duration: f64,
    ease: Ease,
}

/// Eased scroll offset, in rows
///
/// Deltas requested between two frames are batched and turned into a single
/// animation on the next `update`.
#[derive(Debug, Clone)]
pub struct PageScroller {
    animation: Option<ActiveScroll>,
    config: ScrollConfig,
    current: u16,
    pending_delta: i32,
}

impl Default for PageScroller {
    fn default() -> Self {
        Self::new(ScrollConfig::default())
    }
}

impl PageScroller {
    pub fn new(config: ScrollConfig) -> Self {
        Self {
            animation: None,
            config,
            current: 0,
            pending_delta: 0,
        }
    }

    pub fn config(&self) -> &ScrollConfig {
        &self.config
    }

    #[inline]
    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Pending work that wants a fast frame rate
    #[inline]
    pub fn needs_update(&self) -> bool {
        self.animation.is_some() || self.pending_delta != 0
    }

    /// Where the page will come to rest
    pub fn target(&self) -> u16 {
        let base = self.animation.as_ref().map(|a| a.to).unwrap_or(self.current);
        (base as i32 + self.pending_delta).max(0) as u16
    }

    #[inline]
    pub fn current(&self) -> u16 {
        self.current
    }

    /// Jump without animating
    pub fn set(&mut self, rows: u16) {
        self.animation = None;
        self.pending_delta = 0;
        self.current = rows;
    }

    pub fn scroll_to(&mut self, target: u16, max_scroll: u16) {
        let target = target.min(max_scroll);
        self.pending_delta = 0;

        if !self.config.is_smooth() || target == self.current {
            self.current = target;
            self.animation = None;
            return;
        }

        self.animation = Some(ActiveScroll {
            start: Instant::now(),
            from: self.current,
            to: target,
            duration: self.config.animation_duration().as_secs_f64(),
            ease: self.config.easing,
        });
    }

    /// Scroll by a row delta (positive = down)
    pub fn scroll_by(&mut self, delta: i32, max_scroll: u16) {
        if !self.config.is_smooth() {
            self.current = (self.current as i32 + delta).clamp(0, max_scroll as i32) as u16;
            self.animation = None;
            return;
        }
        self.pending_delta += delta;
    }

    pub fn scroll_lines(&mut self, direction: i32, max_scroll: u16) {
        let lines = if self.config.is_smooth() {
            1
        } else {
            self.config.scroll_lines.max(1) as i32
        };
        self.scroll_by(direction.signum() * lines, max_scroll);
    }

    pub fn scroll_half_page(&mut self, direction: i32, viewport_height: u16, max_scroll: u16) {
        let half = (viewport_height / 2).max(1) as i32;
        self.scroll_by(direction.signum() * half, max_scroll);
    }

    pub fn scroll_page(&mut self, direction: i32, viewport_height: u16, max_scroll: u16) {
        let page = viewport_height.max(1) as i32;
        self.scroll_by(direction.signum() * page, max_scroll);
    }

    /// Advance the animation and return the current offset
    pub fn update(&mut self, max_scroll: u16) -> u16 {
        if self.pending_delta != 0 {
            let base = self.animation.as_ref().map(|a| a.to).unwrap_or(self.current);
            let to = (base as i32 + self.pending_delta).clamp(0, max_scroll as i32) as u16;
            self.pending_delta = 0;
            if to != self.current {
                self.animation = Some(ActiveScroll {
                    start: Instant::now(),
                    from: self.current,
                    to,
                    duration: self.config.animation_duration().as_secs_f64(),
                    ease: self.config.easing,
                });
            }
        }

        if let Some(anim) = &self.animation {
            let t = progress(anim.start.elapsed().as_secs_f64(), 0.0, anim.duration);
            self.current = lerp_u16(anim.from, anim.to, anim.ease.apply(t)).min(max_scroll);
            if t >= 1.0 {
                self.animation = None;
            }
        }

        self.current = self.current.min(max_scroll);
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instant() -> ScrollConfig {
        ScrollConfig {
            smooth_enabled: false,
            scroll_lines: 3,
            ..Default::default()
        }
    }

    #[test]
    fn test_instant_scroll_when_disabled() {
        let mut scroller = PageScroller::new(instant());
        scroller.scroll_to(100, 200);
        assert_eq!(scroller.current(), 100);
        assert!(!scroller.is_animating());

        scroller.scroll_lines(1, 200);
        assert_eq!(scroller.current(), 103);
    }

    #[test]
    fn test_animation_starts() {
        let mut scroller = PageScroller::default();
        scroller.scroll_to(100, 200);
        assert!(scroller.is_animating());
        assert_eq!(scroller.target(), 100);
    }

    #[test]
    fn test_deltas_batch_until_update() {
        let mut scroller = PageScroller::default();
        scroller.scroll_by(10, 200);
        scroller.scroll_by(10, 200);
        scroller.scroll_by(10, 200);
        assert_eq!(scroller.target(), 30);

        scroller.update(200);
        assert_eq!(scroller.target(), 30);
        assert!(scroller.needs_update());
    }

    #[test]
    fn test_clamped_to_max_scroll() {
        let mut scroller = PageScroller::default();
        scroller.set(50);
        scroller.scroll_to(300, 100);
        assert_eq!(scroller.target(), 100);

        scroller.scroll_by(-500, 100);
        scroller.update(100);
        assert_eq!(scroller.target(), 0);
    }

    #[test]
    fn test_shrinking_page_pulls_offset_back() {
        let mut scroller = PageScroller::new(instant());
        scroller.set(80);
        assert_eq!(scroller.update(20), 20);
    }
}
