//! Frame-driven animation engine
//!
//! The stage owns the visual layer (per-element layout and visual state),
//! the scroll position and viewport, and every live tween and scroll rule.
//! The host calls [`Stage::tick`] once per frame with the elapsed time and
//! [`Stage::set_scroll`] whenever the page moves.

use std::collections::BTreeMap;

use tracing::{debug, trace, warn};

use crate::engine::{AnimationEngine, ElementId, RuleId, ScrollRuleSpec, TweenId, TweenSpec};
use crate::motion::timing::{progress, sanitize_seconds};
use crate::motion::{Ease, VisualState};
use crate::trigger::{ToggleAction, ToggleActions, TriggerPosition};

/// Vertical placement of an element in page units
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Layout {
    pub top: f64,
    pub height: f64,
}

impl Layout {
    pub fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }
}

#[derive(Debug, Clone)]
struct ElementSlot {
    layout: Layout,
    visual: VisualState,
}

/// Playhead direction of a tween
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Backward,
}

#[derive(Debug, Clone)]
struct Tween {
    target: ElementId,
    start: VisualState,
    end: VisualState,
    duration: f64,
    delay: f64,
    ease: Ease,
    /// Local time including the delay, in [0, delay + duration]
    playhead: f64,
    direction: Direction,
    playing: bool,
}

impl Tween {
    fn total(&self) -> f64 {
        self.delay + self.duration
    }

    fn at_rest(&self) -> bool {
        match self.direction {
            Direction::Forward => self.playhead >= self.total(),
            Direction::Backward => self.playhead <= 0.0,
        }
    }

    fn visual(&self) -> VisualState {
        let t = progress(self.playhead, self.delay, self.duration);
        self.start.interpolate(&self.end, self.ease.apply(t))
    }

    fn apply(&mut self, action: ToggleAction) {
        match action {
            ToggleAction::Play => {
                self.direction = Direction::Forward;
                self.playing = true;
            }
            ToggleAction::Pause => self.playing = false,
            ToggleAction::Resume => self.playing = true,
            ToggleAction::Reverse => {
                self.direction = Direction::Backward;
                self.playing = true;
            }
            ToggleAction::Restart => {
                self.playhead = 0.0;
                self.direction = Direction::Forward;
                self.playing = true;
            }
            ToggleAction::Reset => {
                self.playhead = 0.0;
                self.direction = Direction::Forward;
                self.playing = false;
            }
            ToggleAction::Complete => {
                self.playhead = self.total();
                self.direction = Direction::Forward;
                self.playing = false;
            }
            ToggleAction::None => {}
        }
    }
}

/// Where an element sits relative to a rule's start and end lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Region {
    Before,
    Active,
    After,
}

#[derive(Debug, Clone)]
struct ScrollRule {
    trigger: ElementId,
    tween: TweenId,
    start: TriggerPosition,
    end: TriggerPosition,
    actions: ToggleActions,
    once: bool,
    region: Region,
}

/// The engine shipped with this crate
#[derive(Debug)]
pub struct Stage {
    elements: BTreeMap<ElementId, ElementSlot>,
    tweens: BTreeMap<TweenId, Tween>,
    rules: BTreeMap<RuleId, ScrollRule>,
    scroll: f64,
    viewport_height: f64,
    clock: f64,
    next_id: u64,
}

impl Default for Stage {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl Stage {
    pub fn new(viewport_height: f64) -> Self {
        Self {
            elements: BTreeMap::new(),
            tweens: BTreeMap::new(),
            rules: BTreeMap::new(),
            scroll: 0.0,
            viewport_height,
            clock: 0.0,
            next_id: 1,
        }
    }

    fn next_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    // ---- elements ----

    /// Put an element on the visual layer in its neutral state
    pub fn attach(&mut self, layout: Layout) -> ElementId {
        let id = ElementId(self.next_id());
        self.elements.insert(
            id,
            ElementSlot {
                layout,
                visual: VisualState::VISIBLE,
            },
        );
        trace!("attached {} at {:?}", id, layout);
        id
    }

    /// Remove an element; tweens and rules still pointing at it go idle
    pub fn detach(&mut self, id: ElementId) {
        if self.elements.remove(&id).is_some() {
            trace!("detached {}", id);
        }
    }

    pub fn set_layout(&mut self, id: ElementId, layout: Layout) {
        if let Some(slot) = self.elements.get_mut(&id) {
            slot.layout = layout;
        }
        self.evaluate_rules();
    }

    pub fn layout(&self, id: ElementId) -> Option<Layout> {
        self.elements.get(&id).map(|slot| slot.layout)
    }

    pub fn visual(&self, id: ElementId) -> Option<VisualState> {
        self.elements.get(&id).map(|slot| slot.visual)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.contains_key(&id)
    }

    // ---- viewport ----

    pub fn set_viewport(&mut self, height: f64) {
        self.viewport_height = height.max(0.0);
        self.evaluate_rules();
    }

    pub fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    pub fn set_scroll(&mut self, offset: f64) {
        self.scroll = offset;
        self.evaluate_rules();
    }

    pub fn scroll(&self) -> f64 {
        self.scroll
    }

    // ---- frame clock ----

    /// Advance every playing tween by `dt` seconds
    pub fn tick(&mut self, dt: f64) {
        let dt = sanitize_seconds(dt);
        self.clock += dt;

        let elements = &mut self.elements;
        for (id, tween) in self.tweens.iter_mut() {
            if !tween.playing {
                continue;
            }
            match tween.direction {
                Direction::Forward => tween.playhead = (tween.playhead + dt).min(tween.total()),
                Direction::Backward => tween.playhead = (tween.playhead - dt).max(0.0),
            }
            if let Some(slot) = elements.get_mut(&tween.target) {
                slot.visual = tween.visual();
            }
            if tween.at_rest() {
                tween.playing = false;
                debug!("{} finished on {}", id, tween.target);
            }
        }
    }

    /// Seconds of frame time seen so far
    pub fn clock(&self) -> f64 {
        self.clock
    }

    /// Whether another frame would change anything
    pub fn needs_frame(&self) -> bool {
        self.tweens
            .values()
            .any(|t| t.playing && self.elements.contains_key(&t.target))
    }

    // ---- introspection ----

    pub fn is_tween_active(&self, id: TweenId) -> bool {
        self.tweens.contains_key(&id)
    }

    pub fn is_tween_playing(&self, id: TweenId) -> bool {
        self.tweens.get(&id).is_some_and(|t| t.playing)
    }

    /// Eased progress of a tween in [0, 1]
    pub fn tween_progress(&self, id: TweenId) -> Option<f64> {
        self.tweens
            .get(&id)
            .map(|t| progress(t.playhead, t.delay, t.duration))
    }

    pub fn has_rule(&self, id: RuleId) -> bool {
        self.rules.contains_key(&id)
    }

    pub fn tween_count(&self) -> usize {
        self.tweens.len()
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Live tweens targeting `element`
    pub fn tweens_on(&self, element: ElementId) -> usize {
        self.tweens.values().filter(|t| t.target == element).count()
    }

    // ---- scroll rules ----

    fn region_of(&self, rule: &ScrollRule) -> Option<Region> {
        let slot = self.elements.get(&rule.trigger)?;
        let top = slot.layout.top - self.scroll;
        let height = slot.layout.height;
        if rule.start.distance(top, height, self.viewport_height) > 0.0 {
            Some(Region::Before)
        } else if rule.end.distance(top, height, self.viewport_height) > 0.0 {
            Some(Region::Active)
        } else {
            Some(Region::After)
        }
    }

    fn evaluate_rules(&mut self) {
        let ids: Vec<RuleId> = self.rules.keys().copied().collect();
        for id in ids {
            self.evaluate_rule(id);
        }
    }

    fn evaluate_rule(&mut self, id: RuleId) {
        let Some(rule) = self.rules.get(&id) else {
            return;
        };
        let Some(region) = self.region_of(rule) else {
            return;
        };
        let previous = rule.region;
        if region == previous {
            return;
        }

        let actions = rule.actions;
        let fired: Vec<(&'static str, ToggleAction)> = match (previous, region) {
            (Region::Before, Region::Active) => vec![("enter", actions.on_enter)],
            (Region::Active, Region::After) => vec![("leave", actions.on_leave)],
            (Region::After, Region::Active) => vec![("enter back", actions.on_enter_back)],
            (Region::Active, Region::Before) => vec![("leave back", actions.on_leave_back)],
            (Region::Before, Region::After) => vec![
                ("enter", actions.on_enter),
                ("leave", actions.on_leave),
            ],
            (Region::After, Region::Before) => vec![
                ("enter back", actions.on_enter_back),
                ("leave back", actions.on_leave_back),
            ],
            _ => Vec::new(),
        };

        let tween_id = rule.tween;
        let once = rule.once;
        let entered = previous == Region::Before;

        if let Some(rule) = self.rules.get_mut(&id) {
            rule.region = region;
        }

        for (event, action) in fired {
            debug!("{} {} -> {} on {}", id, event, action, tween_id);
            self.apply_to_tween(tween_id, action);
        }

        if once && entered {
            // Retired after the first enter; the tween keeps running.
            self.rules.remove(&id);
            debug!("{} retired after firing once", id);
        }
    }

    fn apply_to_tween(&mut self, id: TweenId, action: ToggleAction) {
        let Some(tween) = self.tweens.get_mut(&id) else {
            return;
        };
        tween.apply(action);
        if matches!(
            action,
            ToggleAction::Reset | ToggleAction::Complete | ToggleAction::Restart
        ) {
            if let Some(slot) = self.elements.get_mut(&tween.target) {
                slot.visual = tween.visual();
            }
        }
    }
}

impl AnimationEngine for Stage {
    fn create_tween(&mut self, target: ElementId, spec: TweenSpec) -> TweenId {
        let id = TweenId(self.next_id());
        let current = self
            .elements
            .get(&target)
            .map(|slot| slot.visual)
            .unwrap_or_default();
        let start = spec.from.overlay_on(current);
        let end = spec.to.overlay_on(start);

        let tween = Tween {
            target,
            start,
            end,
            duration: sanitize_seconds(spec.duration),
            delay: sanitize_seconds(spec.delay),
            ease: spec.ease,
            playhead: 0.0,
            direction: Direction::Forward,
            playing: !spec.paused,
        };

        // The start state renders right away, before any frame or trigger.
        if let Some(slot) = self.elements.get_mut(&target) {
            slot.visual = tween.visual();
        } else {
            warn!("{} created for unknown {}", id, target);
        }

        debug!(
            "created {} on {}: {:?} -> {:?} over {}s after {}s ({}{})",
            id,
            target,
            start,
            end,
            tween.duration,
            tween.delay,
            tween.ease,
            if spec.paused { ", paused" } else { "" }
        );
        self.tweens.insert(id, tween);
        id
    }

    fn kill_tween(&mut self, id: TweenId) {
        if self.tweens.remove(&id).is_some() {
            debug!("killed {}", id);
        }
    }

    fn create_scroll_rule(&mut self, spec: ScrollRuleSpec) -> RuleId {
        let id = RuleId(self.next_id());
        let start = TriggerPosition::parse(&spec.start).unwrap_or_else(|e| {
            warn!("{}; using \"{}\"", e, TriggerPosition::default());
            TriggerPosition::default()
        });
        let end = match spec.end.as_deref() {
            Some(expr) => TriggerPosition::parse(expr).unwrap_or_else(|e| {
                warn!("{}; using \"{}\"", e, TriggerPosition::DEFAULT_END);
                TriggerPosition::DEFAULT_END
            }),
            None => TriggerPosition::DEFAULT_END,
        };

        self.rules.insert(
            id,
            ScrollRule {
                trigger: spec.trigger,
                tween: spec.tween,
                start,
                end,
                actions: spec.actions,
                once: spec.once,
                region: Region::Before,
            },
        );
        debug!(
            "created {} on {} start=\"{}\" end=\"{}\" actions=\"{}\"{}",
            id,
            spec.trigger,
            start,
            end,
            spec.actions,
            if spec.once { " once" } else { "" }
        );

        // A page already scrolled past the start fires straight away.
        self.evaluate_rule(id);
        id
    }

    fn kill_scroll_rule(&mut self, id: RuleId) {
        if self.rules.remove(&id).is_some() {
            debug!("killed {}", id);
        }
    }
}
