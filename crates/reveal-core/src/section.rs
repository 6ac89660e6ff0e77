//! Animated entrance container
//!
//! [`AnimatedSection`] wraps opaque children in a container and, while
//! mounted, keeps one entrance effect alive against the container's element:
//! a from-to tween towards `{y: 0, opacity: 1}`, either playing at once or
//! bound to a fire-once scroll rule.
//!
//! # Lifecycle
//!
//! ```ignore
//! let stage = Rc::new(RefCell::new(Stage::new(viewport)));
//! let engine: EngineHandle = stage.clone();
//! let element = stage.borrow_mut().attach(Layout::new(top, height));
//!
//! let mut section = AnimatedSection::new(children, SectionProps::default());
//! section.mount(&engine, Some(element));   // effect set up
//! section.set_props(props);                // torn down and re-established if deps changed
//! section.unmount();                       // tween and rule disposed
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::config::RevealConfig;
use crate::engine::{ElementId, EngineHandle, RuleId, ScrollRuleSpec, TweenId, TweenSpec};
use crate::motion::timing::same_value;
use crate::motion::{Ease, VisualProps};
use crate::trigger::ToggleActions;

/// Ease used by every entrance tween
pub const ENTRANCE_EASE: Ease = Ease::Power2Out;

/// State every entrance ends in
pub fn entrance_target() -> VisualProps {
    VisualProps::new().with_y(0.0).with_opacity(1.0)
}

/// Configuration of an animated section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionProps {
    /// Seconds to wait once the entrance starts
    #[serde(default)]
    pub delay: f64,
    /// Applied verbatim to the rendered container
    #[serde(default)]
    pub class_name: String,
    /// Viewport threshold, passed verbatim to the scroll rule
    #[serde(default = "default_trigger_position")]
    pub trigger_position: String,
    /// Seconds
    #[serde(default = "default_duration")]
    pub duration: f64,
    /// Initial visual state, passed verbatim to the tween
    #[serde(default = "default_from")]
    pub from: VisualProps,
    /// Start on mount instead of on scroll
    #[serde(default)]
    pub immediate: bool,
}

impl Default for SectionProps {
    fn default() -> Self {
        Self {
            delay: 0.0,
            class_name: String::new(),
            trigger_position: default_trigger_position(),
            duration: default_duration(),
            from: default_from(),
            immediate: false,
        }
    }
}

pub(crate) fn default_trigger_position() -> String {
    "top 80%".to_string()
}

pub(crate) fn default_duration() -> f64 {
    0.8
}

pub(crate) fn default_from() -> VisualProps {
    VisualProps::new().with_y(30.0).with_opacity(0.0)
}

impl SectionProps {
    /// Defaults taken from the `[reveal]` config table
    pub fn from_config(config: &RevealConfig) -> Self {
        Self {
            delay: config.delay,
            class_name: String::new(),
            trigger_position: config.trigger_position.clone(),
            duration: config.duration,
            from: config.from,
            immediate: config.immediate,
        }
    }

    pub fn with_delay(mut self, delay: f64) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = class_name.into();
        self
    }

    pub fn with_trigger_position(mut self, trigger_position: impl Into<String>) -> Self {
        self.trigger_position = trigger_position.into();
        self
    }

    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = duration;
        self
    }

    pub fn with_from(mut self, from: VisualProps) -> Self {
        self.from = from;
        self
    }

    pub fn with_immediate(mut self, immediate: bool) -> Self {
        self.immediate = immediate;
        self
    }

    /// Whether switching from `self` to `other` needs a new effect
    ///
    /// Everything except the class name feeds the effect. `from` is compared
    /// by value, so an equal record never restarts the entrance.
    pub fn effect_changed(&self, other: &SectionProps) -> bool {
        !same_value(self.delay, other.delay)
            || self.trigger_position != other.trigger_position
            || !same_value(self.duration, other.duration)
            || self.from != other.from
            || self.immediate != other.immediate
    }

    fn tween_spec(&self) -> TweenSpec {
        TweenSpec {
            from: self.from,
            to: entrance_target(),
            duration: self.duration,
            delay: self.delay,
            ease: ENTRANCE_EASE,
            paused: !self.immediate,
        }
    }
}

/// What a section renders: its class and its untouched children
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Container<'a, C> {
    pub class_name: &'a str,
    pub children: &'a C,
    pub element: Option<ElementId>,
}

impl<C> Container<'_, C> {
    /// Class tokens, in order
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.class_name.split_whitespace()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }
}

/// Live entrance effect; dropping it disposes the tween and its rule
pub struct SectionEffect {
    engine: EngineHandle,
    element: ElementId,
    tween: TweenId,
    rule: Option<RuleId>,
}

impl SectionEffect {
    fn establish(engine: &EngineHandle, element: ElementId, props: &SectionProps) -> Self {
        let mut eng = engine.borrow_mut();
        let tween = eng.create_tween(element, props.tween_spec());
        let rule = if props.immediate {
            None
        } else {
            Some(eng.create_scroll_rule(ScrollRuleSpec {
                trigger: element,
                tween,
                start: props.trigger_position.clone(),
                end: None,
                actions: ToggleActions::PLAY_ONCE,
                once: true,
            }))
        };
        drop(eng);

        debug!(
            "entrance on {}: {}{}",
            element,
            tween,
            rule.map(|r| format!(" bound to {}", r)).unwrap_or_default()
        );
        Self {
            engine: engine.clone(),
            element,
            tween,
            rule,
        }
    }

    pub fn element(&self) -> ElementId {
        self.element
    }

    pub fn tween(&self) -> TweenId {
        self.tween
    }

    pub fn rule(&self) -> Option<RuleId> {
        self.rule
    }
}

impl Drop for SectionEffect {
    fn drop(&mut self) {
        match self.engine.try_borrow_mut() {
            Ok(mut engine) => {
                engine.kill_tween(self.tween);
                if let Some(rule) = self.rule {
                    engine.kill_scroll_rule(rule);
                }
                debug!("entrance on {} disposed", self.element);
            }
            Err(_) => {
                error!(
                    "engine busy while disposing entrance on {}; {} leaked",
                    self.element,
                    self.tween
                );
            }
        }
    }
}

impl std::fmt::Debug for SectionEffect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SectionEffect")
            .field("element", &self.element)
            .field("tween", &self.tween)
            .field("rule", &self.rule)
            .finish()
    }
}

struct Mounted {
    engine: EngineHandle,
    element: Option<ElementId>,
    effect: Option<SectionEffect>,
}

/// Container that animates into view
pub struct AnimatedSection<C> {
    children: C,
    props: SectionProps,
    mounted: Option<Mounted>,
}

impl<C> AnimatedSection<C> {
    pub fn new(children: C, props: SectionProps) -> Self {
        Self {
            children,
            props,
            mounted: None,
        }
    }

    pub fn props(&self) -> &SectionProps {
        &self.props
    }

    pub fn children(&self) -> &C {
        &self.children
    }

    /// The container, present whatever the animation is doing
    pub fn render(&self) -> Container<'_, C> {
        Container {
            class_name: &self.props.class_name,
            children: &self.children,
            element: self.element(),
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.is_some()
    }

    pub fn element(&self) -> Option<ElementId> {
        self.mounted.as_ref().and_then(|m| m.element)
    }

    pub fn effect(&self) -> Option<&SectionEffect> {
        self.mounted.as_ref().and_then(|m| m.effect.as_ref())
    }

    pub fn has_effect(&self) -> bool {
        self.effect().is_some()
    }

    /// Attach to an element and set up the entrance
    ///
    /// A missing element reference skips the setup. Mounting again first
    /// disposes the previous effect.
    pub fn mount(&mut self, engine: &EngineHandle, element: Option<ElementId>) {
        self.unmount();
        let effect = Self::setup(engine, element, &self.props);
        self.mounted = Some(Mounted {
            engine: engine.clone(),
            element,
            effect,
        });
    }

    /// Replace the props, re-establishing the effect when it depends on them
    pub fn set_props(&mut self, props: SectionProps) {
        let changed = self.props.effect_changed(&props);
        self.props = props;
        if !changed {
            return;
        }
        if let Some(mounted) = self.mounted.as_mut() {
            // Old effect goes first so one element never carries two entrances.
            mounted.effect = None;
            mounted.effect = Self::setup(&mounted.engine, mounted.element, &self.props);
        }
    }

    /// Detach, disposing the tween and any scroll rule
    pub fn unmount(&mut self) {
        if let Some(mounted) = self.mounted.take() {
            drop(mounted.effect);
            debug!("section unmounted from {:?}", mounted.element);
        }
    }

    fn setup(
        engine: &EngineHandle,
        element: Option<ElementId>,
        props: &SectionProps,
    ) -> Option<SectionEffect> {
        let Some(element) = element else {
            debug!("section has no element, skipping entrance");
            return None;
        };
        Some(SectionEffect::establish(engine, element, props))
    }
}

impl<C> Drop for AnimatedSection<C> {
    fn drop(&mut self) {
        self.unmount();
    }
}

impl<C: std::fmt::Debug> std::fmt::Debug for AnimatedSection<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimatedSection")
            .field("children", &self.children)
            .field("props", &self.props)
            .field("effect", &self.effect())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::engine::AnimationEngine;
    use crate::motion::VisualState;
    use crate::stage::{Layout, Stage};

    const EPS: f64 = 1e-6;

    /// Engine double that records every call
    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
        next: u64,
        specs: Vec<TweenSpec>,
        rules: Vec<ScrollRuleSpec>,
    }

    impl AnimationEngine for Recorder {
        fn create_tween(&mut self, target: ElementId, spec: TweenSpec) -> TweenId {
            self.next += 1;
            self.calls.push(format!("create_tween {} -> {}", target, self.next));
            self.specs.push(spec);
            TweenId(self.next)
        }

        fn kill_tween(&mut self, id: TweenId) {
            self.calls.push(format!("kill_tween {}", id.0));
        }

        fn create_scroll_rule(&mut self, spec: ScrollRuleSpec) -> RuleId {
            self.next += 1;
            self.calls
                .push(format!("create_rule {} -> {}", spec.tween.0, self.next));
            self.rules.push(spec);
            RuleId(self.next)
        }

        fn kill_scroll_rule(&mut self, id: RuleId) {
            self.calls.push(format!("kill_rule {}", id.0));
        }
    }

    fn recorder() -> (Rc<RefCell<Recorder>>, EngineHandle) {
        let rec = Rc::new(RefCell::new(Recorder::default()));
        let handle: EngineHandle = rec.clone();
        (rec, handle)
    }

    fn stage_with(viewport: f64, layout: Layout) -> (Rc<RefCell<Stage>>, EngineHandle, ElementId) {
        let stage = Rc::new(RefCell::new(Stage::new(viewport)));
        let element = stage.borrow_mut().attach(layout);
        let handle: EngineHandle = stage.clone();
        (stage, handle, element)
    }

    fn hidden() -> VisualState {
        VisualState {
            x: 0.0,
            y: 30.0,
            opacity: 0.0,
        }
    }

    #[test]
    fn test_default_props() {
        let props = SectionProps::default();
        assert_eq!(props.delay, 0.0);
        assert_eq!(props.duration, 0.8);
        assert_eq!(props.trigger_position, "top 80%");
        assert_eq!(props.from, VisualProps::new().with_y(30.0).with_opacity(0.0));
        assert!(!props.immediate);
        assert!(props.class_name.is_empty());
    }

    #[test]
    fn test_render_always_contains_children_and_class() {
        let (_rec, engine) = recorder();
        let mut section = AnimatedSection::new(
            vec!["hello"],
            SectionProps::default().with_class_name("card wide"),
        );

        let container = section.render();
        assert_eq!(container.class_name, "card wide");
        assert_eq!(container.children, &vec!["hello"]);
        assert!(container.has_class("wide"));

        section.mount(&engine, Some(ElementId(7)));
        let container = section.render();
        assert_eq!(container.children, &vec!["hello"]);
        assert_eq!(container.element, Some(ElementId(7)));

        section.unmount();
        assert_eq!(section.render().class_name, "card wide");
    }

    #[test]
    fn test_missing_element_is_a_no_op() {
        let (rec, engine) = recorder();
        let mut section = AnimatedSection::new((), SectionProps::default());
        section.mount(&engine, None);
        assert!(section.is_mounted());
        assert!(!section.has_effect());
        section.unmount();
        assert!(rec.borrow().calls.is_empty());
    }

    #[test]
    fn test_immediate_creates_playing_tween_without_rule() {
        let (rec, engine) = recorder();
        let mut section =
            AnimatedSection::new((), SectionProps::default().with_immediate(true));
        section.mount(&engine, Some(ElementId(1)));

        let rec = rec.borrow();
        assert_eq!(rec.calls, vec!["create_tween element#1 -> 1"]);
        assert!(!rec.specs[0].paused);
        assert_eq!(rec.specs[0].ease, Ease::Power2Out);
        assert_eq!(rec.specs[0].to, entrance_target());
    }

    #[test]
    fn test_scroll_mode_binds_fire_once_rule() {
        let (rec, engine) = recorder();
        let mut section = AnimatedSection::new(
            (),
            SectionProps::default().with_trigger_position("center 50%"),
        );
        section.mount(&engine, Some(ElementId(1)));

        let rec = rec.borrow();
        assert!(rec.specs[0].paused);
        let rule = &rec.rules[0];
        assert_eq!(rule.start, "center 50%");
        assert_eq!(rule.trigger, ElementId(1));
        assert_eq!(rule.actions, ToggleActions::PLAY_ONCE);
        assert!(rule.once);
    }

    #[test]
    fn test_unmount_disposes_tween_then_rule() {
        let (rec, engine) = recorder();
        let mut section = AnimatedSection::new((), SectionProps::default());
        section.mount(&engine, Some(ElementId(1)));
        section.unmount();
        assert!(!section.is_mounted());

        assert_eq!(
            rec.borrow().calls,
            vec![
                "create_tween element#1 -> 1",
                "create_rule 1 -> 2",
                "kill_tween 1",
                "kill_rule 2",
            ]
        );
    }

    #[test]
    fn test_drop_disposes_effect() {
        let (rec, engine) = recorder();
        {
            let mut section =
                AnimatedSection::new((), SectionProps::default().with_immediate(true));
            section.mount(&engine, Some(ElementId(3)));
        }
        assert_eq!(rec.borrow().calls.last().unwrap(), "kill_tween 1");
    }

    #[test]
    fn test_prop_change_disposes_before_setup() {
        let (rec, engine) = recorder();
        let mut section = AnimatedSection::new((), SectionProps::default());
        section.mount(&engine, Some(ElementId(1)));
        section.set_props(SectionProps::default().with_delay(0.3));

        assert_eq!(
            rec.borrow().calls,
            vec![
                "create_tween element#1 -> 1",
                "create_rule 1 -> 2",
                "kill_tween 1",
                "kill_rule 2",
                "create_tween element#1 -> 3",
                "create_rule 3 -> 4",
            ]
        );
        assert_eq!(rec.borrow().specs[1].delay, 0.3);
    }

    #[test]
    fn test_equal_from_or_class_change_keeps_effect() {
        let (rec, engine) = recorder();
        let mut section = AnimatedSection::new((), SectionProps::default());
        section.mount(&engine, Some(ElementId(1)));

        // A fresh but equal `from` record
        section.set_props(SectionProps::default().with_from(default_from()));
        section.set_props(SectionProps::default().with_class_name("card"));

        assert_eq!(rec.borrow().calls.len(), 2);
        assert_eq!(section.render().class_name, "card");
    }

    #[test]
    fn test_identical_nan_props_keep_finished_effect() {
        let (stage, engine, element) = stage_with(100.0, Layout::new(200.0, 40.0));
        let props = SectionProps::default()
            .with_immediate(true)
            .with_delay(f64::NAN);
        let mut section = AnimatedSection::new((), props.clone());
        section.mount(&engine, Some(element));
        let tween = section.effect().map(|e| e.tween());

        stage.borrow_mut().tick(1.0);
        assert!(stage
            .borrow()
            .visual(element)
            .unwrap()
            .approx_eq(&VisualState::VISIBLE, EPS));

        section.set_props(props.clone());
        assert_eq!(section.effect().map(|e| e.tween()), tween);
        assert_eq!(stage.borrow().tween_count(), 1);
        assert!(stage
            .borrow()
            .visual(element)
            .unwrap()
            .approx_eq(&VisualState::VISIBLE, EPS));
    }

    #[test]
    fn test_nan_from_compares_by_value() {
        let from = VisualProps::new().with_y(f64::NAN).with_opacity(0.0);
        let props = SectionProps::default().with_from(from);
        assert!(!props.effect_changed(&props.clone()));
        assert!(props.effect_changed(&SectionProps::default()));
    }

    #[test]
    fn test_prop_change_while_unmounted_only_stores() {
        let (rec, _engine) = recorder();
        let mut section = AnimatedSection::new((), SectionProps::default());
        section.set_props(SectionProps::default().with_duration(2.0));
        assert_eq!(section.props().duration, 2.0);
        assert!(rec.borrow().calls.is_empty());
    }

    #[test]
    fn test_scroll_scenario_with_default_props() {
        let (stage, engine, element) = stage_with(100.0, Layout::new(200.0, 40.0));
        let mut section = AnimatedSection::new("body", SectionProps::default());
        section.mount(&engine, Some(element));

        stage.borrow_mut().tick(2.0);
        assert!(stage.borrow().visual(element).unwrap().approx_eq(&hidden(), EPS));

        stage.borrow_mut().set_scroll(120.0);
        stage.borrow_mut().tick(0.4);
        let mid = stage.borrow().visual(element).unwrap();
        assert!(mid.y > 0.0 && mid.y < 30.0);

        stage.borrow_mut().tick(0.4);
        assert!(stage
            .borrow()
            .visual(element)
            .unwrap()
            .approx_eq(&VisualState::VISIBLE, EPS));
    }

    #[test]
    fn test_scroll_scenario_fires_once() {
        let (stage, engine, element) = stage_with(100.0, Layout::new(200.0, 40.0));
        let mut section = AnimatedSection::new((), SectionProps::default());
        section.mount(&engine, Some(element));
        let rule = section.effect().unwrap().rule().unwrap();

        stage.borrow_mut().set_scroll(150.0);
        assert!(!stage.borrow().has_rule(rule));
        stage.borrow_mut().tick(1.0);

        for offset in [0.0, 150.0, 0.0, 150.0] {
            stage.borrow_mut().set_scroll(offset);
            stage.borrow_mut().tick(0.2);
            assert!(stage
                .borrow()
                .visual(element)
                .unwrap()
                .approx_eq(&VisualState::VISIBLE, EPS));
        }
    }

    #[test]
    fn test_immediate_ignores_scroll_position() {
        let (stage, engine, element) = stage_with(100.0, Layout::new(5000.0, 40.0));
        let mut section = AnimatedSection::new((), SectionProps::default().with_immediate(true));
        section.mount(&engine, Some(element));

        let tween = section.effect().unwrap().tween();
        assert!(stage.borrow().is_tween_playing(tween));
        stage.borrow_mut().tick(0.8);
        assert!(stage
            .borrow()
            .visual(element)
            .unwrap()
            .approx_eq(&VisualState::VISIBLE, EPS));
    }

    #[test]
    fn test_unmount_leaves_no_engine_state_and_no_snap_back() {
        let (stage, engine, element) = stage_with(100.0, Layout::new(0.0, 40.0));
        let mut section = AnimatedSection::new((), SectionProps::default());
        section.mount(&engine, Some(element));
        stage.borrow_mut().tick(0.3);
        let frozen = stage.borrow().visual(element).unwrap();

        section.unmount();
        assert_eq!(stage.borrow().tween_count(), 0);
        assert_eq!(stage.borrow().rule_count(), 0);
        stage.borrow_mut().tick(1.0);
        assert_eq!(stage.borrow().visual(element).unwrap(), frozen);
    }

    #[test]
    fn test_prop_change_keeps_single_tween_per_element() {
        let (stage, engine, element) = stage_with(100.0, Layout::new(500.0, 40.0));
        let mut section = AnimatedSection::new((), SectionProps::default());
        section.mount(&engine, Some(element));

        for delay in [0.1, 0.2, 0.3] {
            section.set_props(SectionProps::default().with_delay(delay));
            assert_eq!(stage.borrow().tweens_on(element), 1);
            assert_eq!(stage.borrow().rule_count(), 1);
        }

        section.set_props(SectionProps::default().with_immediate(true));
        assert_eq!(stage.borrow().tweens_on(element), 1);
        assert_eq!(stage.borrow().rule_count(), 0);
    }

    #[test]
    fn test_remount_replays_from_start() {
        let (stage, engine, element) = stage_with(100.0, Layout::new(0.0, 40.0));
        let mut section = AnimatedSection::new((), SectionProps::default().with_immediate(true));
        section.mount(&engine, Some(element));
        stage.borrow_mut().tick(1.0);

        section.mount(&engine, Some(element));
        assert!(stage.borrow().visual(element).unwrap().approx_eq(&hidden(), EPS));
        assert_eq!(stage.borrow().tween_count(), 1);
    }
}
