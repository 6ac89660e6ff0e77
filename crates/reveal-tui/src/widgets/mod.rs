mod page;
mod section;
mod status_bar;

pub use page::PageWidget;
pub use section::{ClassStyle, SectionWidget, MIN_VISIBLE_OPACITY};
pub use status_bar::StatusBarWidget;
