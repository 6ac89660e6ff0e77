//! Scroll trigger expressions
//!
//! A trigger position pairs a point on the element with a line in the
//! viewport, written as two words: `"top 80%"` fires when the element's top
//! edge reaches 80% of the viewport height. Each word is a keyword (`top`,
//! `center`, `bottom`), a percentage, or a unit amount (`120` or `120px`),
//! optionally followed by a relative offset such as `top+=20`.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Base of an anchor: a fraction of the measured length or a fixed amount
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnchorBase {
    Fraction(f64),
    Units(f64),
}

/// One side of a trigger position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub base: AnchorBase,
    pub offset: f64,
}

impl Anchor {
    pub const TOP: Anchor = Anchor::fraction(0.0);
    pub const CENTER: Anchor = Anchor::fraction(0.5);
    pub const BOTTOM: Anchor = Anchor::fraction(1.0);

    pub const fn fraction(value: f64) -> Self {
        Self {
            base: AnchorBase::Fraction(value),
            offset: 0.0,
        }
    }

    pub const fn units(value: f64) -> Self {
        Self {
            base: AnchorBase::Units(value),
            offset: 0.0,
        }
    }

    /// Distance from the start of a span of `length` units
    #[inline]
    pub fn resolve(&self, length: f64) -> f64 {
        let base = match self.base {
            AnchorBase::Fraction(f) => f * length,
            AnchorBase::Units(u) => u,
        };
        base + self.offset
    }

    fn parse(word: &str) -> Result<Self> {
        let invalid = || Error::InvalidTrigger(word.to_string());

        // Offsets are only recognised after the first character so that a
        // bare negative amount ("-20") stays a base value.
        let split = word
            .char_indices()
            .skip(1)
            .find(|(i, _)| word[*i..].starts_with("+=") || word[*i..].starts_with("-="))
            .map(|(i, _)| i);

        let (base, offset) = match split {
            Some(i) => {
                let sign = if word[i..].starts_with('-') { -1.0 } else { 1.0 };
                let amount = parse_units(&word[i + 2..]).ok_or_else(invalid)?;
                (&word[..i], sign * amount)
            }
            None => (word, 0.0),
        };

        let base = match base.to_lowercase().as_str() {
            "top" => AnchorBase::Fraction(0.0),
            "center" => AnchorBase::Fraction(0.5),
            "bottom" => AnchorBase::Fraction(1.0),
            other => {
                if let Some(pct) = other.strip_suffix('%') {
                    let value: f64 = pct.trim().parse().map_err(|_| invalid())?;
                    if !value.is_finite() {
                        return Err(invalid());
                    }
                    AnchorBase::Fraction(value / 100.0)
                } else {
                    AnchorBase::Units(parse_units(other).ok_or_else(invalid)?)
                }
            }
        };

        Ok(Self { base, offset })
    }
}

fn parse_units(s: &str) -> Option<f64> {
    let s = s.trim();
    let s = s.strip_suffix("px").unwrap_or(s);
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.base {
            AnchorBase::Fraction(v) if v == 0.0 => f.write_str("top")?,
            AnchorBase::Fraction(v) if v == 0.5 => f.write_str("center")?,
            AnchorBase::Fraction(v) if v == 1.0 => f.write_str("bottom")?,
            AnchorBase::Fraction(v) => write!(f, "{}%", (v * 100.0 * 1e6).round() / 1e6)?,
            AnchorBase::Units(u) => write!(f, "{}px", u)?,
        }
        if self.offset > 0.0 {
            write!(f, "+={}", self.offset)?;
        } else if self.offset < 0.0 {
            write!(f, "-={}", -self.offset)?;
        }
        Ok(())
    }
}

/// Element point paired with a viewport line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriggerPosition {
    pub element: Anchor,
    pub viewport: Anchor,
}

impl Default for TriggerPosition {
    /// `"top 80%"`
    fn default() -> Self {
        Self {
            element: Anchor::TOP,
            viewport: Anchor::fraction(0.8),
        }
    }
}

impl TriggerPosition {
    /// Default end of a scroll rule: element bottom meets viewport top
    pub const DEFAULT_END: TriggerPosition = TriggerPosition {
        element: Anchor::BOTTOM,
        viewport: Anchor::TOP,
    };

    pub fn parse(expr: &str) -> Result<Self> {
        let mut words = expr.split_whitespace();
        let element = words
            .next()
            .ok_or_else(|| Error::InvalidTrigger(expr.to_string()))?;
        let element = Anchor::parse(element)?;
        let viewport = match words.next() {
            Some(word) => Anchor::parse(word)?,
            None => Anchor::BOTTOM,
        };
        if words.next().is_some() {
            return Err(Error::InvalidTrigger(expr.to_string()));
        }
        Ok(Self { element, viewport })
    }

    /// How far the element point sits below the viewport line
    ///
    /// `element_top` is relative to the viewport's top edge. The trigger has
    /// been passed once this value is zero or negative.
    pub fn distance(&self, element_top: f64, element_height: f64, viewport_height: f64) -> f64 {
        let element_point = element_top + self.element.resolve(element_height);
        let viewport_line = self.viewport.resolve(viewport_height);
        element_point - viewport_line
    }
}

impl FromStr for TriggerPosition {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for TriggerPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.element, self.viewport)
    }
}

/// What a scroll rule does to its tween on a region change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleAction {
    Play,
    Pause,
    Resume,
    Reverse,
    Restart,
    Reset,
    Complete,
    None,
}

impl FromStr for ToggleAction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "play" => Ok(ToggleAction::Play),
            "pause" => Ok(ToggleAction::Pause),
            "resume" => Ok(ToggleAction::Resume),
            "reverse" => Ok(ToggleAction::Reverse),
            "restart" => Ok(ToggleAction::Restart),
            "reset" => Ok(ToggleAction::Reset),
            "complete" => Ok(ToggleAction::Complete),
            "none" => Ok(ToggleAction::None),
            _ => Err(Error::InvalidToggleAction(s.to_string())),
        }
    }
}

impl fmt::Display for ToggleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ToggleAction::Play => "play",
            ToggleAction::Pause => "pause",
            ToggleAction::Resume => "resume",
            ToggleAction::Reverse => "reverse",
            ToggleAction::Restart => "restart",
            ToggleAction::Reset => "reset",
            ToggleAction::Complete => "complete",
            ToggleAction::None => "none",
        };
        f.write_str(name)
    }
}

/// Actions for entering, leaving, entering back and leaving back
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleActions {
    pub on_enter: ToggleAction,
    pub on_leave: ToggleAction,
    pub on_enter_back: ToggleAction,
    pub on_leave_back: ToggleAction,
}

impl Default for ToggleActions {
    /// `"play none none none"`
    fn default() -> Self {
        Self::PLAY_ONCE
    }
}

impl ToggleActions {
    pub const PLAY_ONCE: ToggleActions = ToggleActions {
        on_enter: ToggleAction::Play,
        on_leave: ToggleAction::None,
        on_enter_back: ToggleAction::None,
        on_leave_back: ToggleAction::None,
    };
}

impl FromStr for ToggleActions {
    type Err = Error;

    /// Up to four words; missing trailing words are `none`
    fn from_str(s: &str) -> Result<Self> {
        let words: Vec<&str> = s.split_whitespace().collect();
        if words.is_empty() || words.len() > 4 {
            return Err(Error::InvalidToggleAction(s.to_string()));
        }
        let mut actions = [ToggleAction::None; 4];
        for (slot, word) in actions.iter_mut().zip(words) {
            *slot = word.parse()?;
        }
        Ok(Self {
            on_enter: actions[0],
            on_leave: actions[1],
            on_enter_back: actions[2],
            on_leave_back: actions[3],
        })
    }
}

impl fmt::Display for ToggleActions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.on_enter, self.on_leave, self.on_enter_back, self.on_leave_back
        )
    }
}
