use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use reveal_core::page::{PageSpec, SectionContent};
use reveal_core::{AnimatedSection, AppConfig, ElementId, EngineHandle, SectionProps, Stage, VisualState};
use tracing::{debug, info};

use crate::input::Action;
use crate::page::PageLayout;
use crate::scroll::PageScroller;
use crate::theme::Theme;

/// Opacity at which a section counts as fully revealed
const REVEALED_OPACITY: f64 = 0.999;

/// Application state
pub struct App {
    pub config: Arc<AppConfig>,
    pub theme: Theme,
    stage: Rc<RefCell<Stage>>,
    engine: EngineHandle,
    sections: Vec<AnimatedSection<SectionContent>>,
    elements: Vec<ElementId>,
    layout: PageLayout,
    pub scroller: PageScroller,
    /// Rows available to the page, status bar excluded
    pub viewport_height: u16,
    pub should_quit: bool,
    pub status_message: Option<String>,
    pub pending_key: Option<char>,
    /// Every section animates on mount, ignoring scroll
    pub immediate: bool,
    /// Per-section props as loaded, restored when `immediate` is toggled off
    base_props: Vec<SectionProps>,
}

impl App {
    pub fn new(
        config: Arc<AppConfig>,
        theme: Theme,
        page: &PageSpec,
        force_immediate: bool,
        viewport_height: u16,
    ) -> Self {
        let contents: Vec<SectionContent> = page.sections.iter().map(|s| s.content()).collect();
        let base_props: Vec<SectionProps> = page
            .sections
            .iter()
            .map(|s| s.props(&config.reveal))
            .collect();

        let layout = PageLayout::new(
            contents
                .iter()
                .zip(&base_props)
                .map(|(content, props)| (content, props.class_name.as_str())),
            config.ui.section_gap,
            config.ui.units_per_row,
        );

        let stage = Rc::new(RefCell::new(Stage::new(
            layout.rows_to_units(viewport_height),
        )));
        let engine: EngineHandle = stage.clone();

        let elements: Vec<ElementId> = (0..layout.len())
            .filter_map(|i| layout.stage_layout(i))
            .map(|l| stage.borrow_mut().attach(l))
            .collect();

        let sections = contents
            .into_iter()
            .zip(&base_props)
            .map(|(content, props)| {
                let props = if force_immediate {
                    props.clone().with_immediate(true)
                } else {
                    props.clone()
                };
                AnimatedSection::new(content, props)
            })
            .collect();

        let mut app = Self {
            scroller: PageScroller::new(config.ui.scroll.clone()),
            config,
            theme,
            stage,
            engine,
            sections,
            elements,
            layout,
            viewport_height,
            should_quit: false,
            status_message: None,
            pending_key: None,
            immediate: force_immediate,
            base_props,
        };
        app.mount_all();
        info!("page mounted with {} sections", app.sections.len());
        app
    }

    fn mount_all(&mut self) {
        for (section, element) in self.sections.iter_mut().zip(&self.elements) {
            section.mount(&self.engine, Some(*element));
        }
    }

    pub fn sections(&self) -> &[AnimatedSection<SectionContent>] {
        &self.sections
    }

    pub fn layout(&self) -> &PageLayout {
        &self.layout
    }

    pub fn stage(&self) -> std::cell::Ref<'_, Stage> {
        self.stage.borrow()
    }

    /// Current visual state of section `index`
    pub fn visual(&self, index: usize) -> VisualState {
        self.elements
            .get(index)
            .and_then(|id| self.stage.borrow().visual(*id))
            .unwrap_or(VisualState::VISIBLE)
    }

    pub fn revealed_count(&self) -> usize {
        (0..self.sections.len())
            .filter(|&i| self.visual(i).effective_opacity() >= REVEALED_OPACITY)
            .count()
    }

    pub fn max_scroll(&self) -> u16 {
        self.layout.max_scroll(self.viewport_height)
    }

    pub fn resize(&mut self, viewport_height: u16) {
        if viewport_height == self.viewport_height {
            return;
        }
        self.viewport_height = viewport_height;
        let max_scroll = self.max_scroll();
        if self.scroller.current() > max_scroll {
            self.scroller.set(max_scroll);
        }
        let mut stage = self.stage.borrow_mut();
        stage.set_viewport(self.layout.rows_to_units(viewport_height));
        stage.set_scroll(self.layout.rows_to_units(self.scroller.current()));
    }

    /// Advance scrolling and animations by `dt` seconds
    pub fn update(&mut self, dt: f64) {
        let rows = self.scroller.update(self.max_scroll());
        let mut stage = self.stage.borrow_mut();
        let offset = self.layout.rows_to_units(rows);
        if offset != stage.scroll() {
            stage.set_scroll(offset);
        }
        stage.tick(dt);
    }

    /// Whether the next frame should come quickly
    pub fn needs_frame(&self) -> bool {
        self.scroller.needs_update() || self.stage.borrow().needs_frame()
    }

    /// Remount every section so entrances play again
    pub fn replay(&mut self) {
        self.mount_all();
        self.set_status("Replaying entrances");
        debug!("replayed {} sections", self.sections.len());
    }

    pub fn toggle_immediate(&mut self) {
        self.immediate = !self.immediate;
        for (section, base) in self.sections.iter_mut().zip(&self.base_props) {
            let props = if self.immediate {
                base.clone().with_immediate(true)
            } else {
                base.clone()
            };
            section.set_props(props);
        }
        let state = if self.immediate { "on" } else { "off" };
        self.set_status(format!("Immediate: {}", state));
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some(msg.into());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    pub fn handle_action(&mut self, action: Action) {
        if action != Action::PendingG {
            self.pending_key = None;
        }
        if !matches!(action, Action::None | Action::PendingG) {
            self.clear_status();
        }

        let max_scroll = self.max_scroll();
        let viewport = self.viewport_height;
        match action {
            Action::Quit => self.should_quit = true,
            Action::ScrollDown => self.scroller.scroll_lines(1, max_scroll),
            Action::ScrollUp => self.scroller.scroll_lines(-1, max_scroll),
            Action::ScrollHalfPageDown => self.scroller.scroll_half_page(1, viewport, max_scroll),
            Action::ScrollHalfPageUp => self.scroller.scroll_half_page(-1, viewport, max_scroll),
            Action::ScrollPageDown => self.scroller.scroll_page(1, viewport, max_scroll),
            Action::ScrollPageUp => self.scroller.scroll_page(-1, viewport, max_scroll),
            Action::JumpToTop => self.scroller.scroll_to(0, max_scroll),
            Action::JumpToBottom => self.scroller.scroll_to(max_scroll, max_scroll),
            Action::PendingG => self.pending_key = Some('g'),
            Action::Replay => self.replay(),
            Action::ToggleImmediate => self.toggle_immediate(),
            Action::None => {}
        }
    }

    /// Scroll by a raw row delta, as from a mouse wheel
    pub fn scroll_rows(&mut self, delta: i32) {
        let max_scroll = self.max_scroll();
        self.scroller.scroll_by(delta, max_scroll);
    }
}
