//! Animation engine seam
//!
//! Components never talk to a concrete engine; they go through
//! [`AnimationEngine`], which covers creating and killing tweens and scroll
//! rules. [`crate::stage::Stage`] is the engine shipped with this crate.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::motion::{Ease, VisualProps};
use crate::trigger::ToggleActions;

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }
    };
}

id_type!(
    /// Reference to an element on the host's visual layer
    ElementId,
    "element"
);
id_type!(TweenId, "tween");
id_type!(RuleId, "rule");

/// Parameters of a from-to tween
#[derive(Debug, Clone, PartialEq)]
pub struct TweenSpec {
    pub from: VisualProps,
    pub to: VisualProps,
    /// Seconds; malformed values are the engine's problem
    pub duration: f64,
    /// Seconds before interpolation begins once playing
    pub delay: f64,
    pub ease: Ease,
    /// Created paused, waiting for a scroll rule or an explicit play
    pub paused: bool,
}

/// Parameters of a scroll-observation rule
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollRuleSpec {
    /// Element whose position is observed
    pub trigger: ElementId,
    /// Tween driven by the rule
    pub tween: TweenId,
    /// Start expression, passed through verbatim
    pub start: String,
    /// End expression; `None` means the engine default
    pub end: Option<String>,
    pub actions: ToggleActions,
    /// Retire the rule after its first enter
    pub once: bool,
}

/// Tween and scroll-rule primitives an animated component needs
pub trait AnimationEngine {
    /// Create a tween and render its start state immediately
    fn create_tween(&mut self, target: ElementId, spec: TweenSpec) -> TweenId;

    /// Stop a tween where it is; unknown ids are ignored
    fn kill_tween(&mut self, id: TweenId);

    /// Bind a paused tween to scroll position
    fn create_scroll_rule(&mut self, spec: ScrollRuleSpec) -> RuleId;

    /// Stop observing; unknown ids are ignored
    fn kill_scroll_rule(&mut self, id: RuleId);
}

/// Shared single-threaded engine handle
pub type EngineHandle = Rc<RefCell<dyn AnimationEngine>>;
