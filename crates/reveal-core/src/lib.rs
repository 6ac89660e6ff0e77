pub mod config;
pub mod engine;
pub mod error;
pub mod motion;
pub mod page;
pub mod section;
pub mod stage;
pub mod trigger;

pub use config::{AppConfig, RevealConfig, ScrollConfig};
pub use engine::{AnimationEngine, ElementId, EngineHandle, RuleId, TweenId};
pub use error::{Error, Result};
pub use motion::{Ease, VisualProps, VisualState};
pub use section::{AnimatedSection, Container, SectionEffect, SectionProps};
pub use stage::{Layout, Stage};
pub use trigger::{ToggleAction, ToggleActions, TriggerPosition};
