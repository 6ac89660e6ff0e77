//! Motion primitives shared by the stage engine and the terminal host
//!
//! # Layers
//!
//! ## Atoms
//! - `easing` - Pure easing curves mapping [0, 1] to [0, 1]
//! - `timing` - Playhead progress and interpolation helpers
//! - `visual` - Visual property records and their resolved state
//!
//! The stage engine (`crate::stage`) combines these atoms into tweens.

pub mod easing;
pub mod timing;
pub mod visual;

pub use easing::Ease;
pub use visual::{VisualProps, VisualState};
