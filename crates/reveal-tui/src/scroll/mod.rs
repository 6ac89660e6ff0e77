//! Smooth page scrolling
//!
//! The page scrolls by whole rows, eased over a short animation so that
//! scroll-triggered sections see a continuous stream of positions rather
//! than one jump.
//!
//! # Usage
//!
//! ```ignore
//! let mut scroller = PageScroller::new(config.ui.scroll.clone());
//! scroller.scroll_by(10);
//!
//! // every frame
//! let rows = scroller.update(max_scroll);
//! ```

pub mod animation;
pub mod config;

pub use animation::PageScroller;
pub use config::ScrollConfigExt;
