use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{bail, Result};

use reveal_core::page::{PageSpec, SectionContent};
use reveal_core::{AnimatedSection, AppConfig, EngineHandle, Stage};
use reveal_tui::page::PageLayout;

pub struct TraceOptions {
    /// Rows scrolled right after mount
    pub scroll: u16,
    pub viewport: u16,
    pub seconds: f64,
    pub fps: u32,
    pub immediate: bool,
}

/// Mount the page on a stage and print every section's visual state per sample
pub fn run(config: &AppConfig, page: &PageSpec, options: &TraceOptions) -> Result<()> {
    if options.fps == 0 {
        bail!("--fps must be at least 1");
    }
    if !options.seconds.is_finite() || options.seconds < 0.0 {
        bail!("--seconds must be a non-negative number");
    }

    let props: Vec<_> = page
        .sections
        .iter()
        .map(|s| {
            let props = s.props(&config.reveal);
            if options.immediate {
                props.with_immediate(true)
            } else {
                props
            }
        })
        .collect();
    let contents: Vec<SectionContent> = page.sections.iter().map(|s| s.content()).collect();

    let layout = PageLayout::new(
        contents
            .iter()
            .zip(&props)
            .map(|(c, p)| (c, p.class_name.as_str())),
        config.ui.section_gap,
        config.ui.units_per_row,
    );

    let stage = Rc::new(RefCell::new(Stage::new(layout.rows_to_units(options.viewport))));
    let engine: EngineHandle = stage.clone();

    let mut sections = Vec::new();
    let mut elements = Vec::new();
    for (index, (content, props)) in contents.into_iter().zip(props).enumerate() {
        let element = layout
            .stage_layout(index)
            .map(|l| stage.borrow_mut().attach(l));
        let mut section = AnimatedSection::new(content, props);
        section.mount(&engine, element);
        sections.push(section);
        elements.push(element);
    }

    let scroll = options.scroll.min(layout.max_scroll(options.viewport));
    stage.borrow_mut().set_scroll(layout.rows_to_units(scroll));

    println!(
        "{} sections, viewport {} rows, scroll {} rows",
        sections.len(),
        options.viewport,
        scroll
    );
    for (index, section) in sections.iter().enumerate() {
        let props = section.props();
        let slot = layout.slot(index).map(|s| s.top).unwrap_or_default();
        println!(
            "  [{}] {:<24} row {:>3}  trigger \"{}\"{}",
            index,
            section.children().title,
            slot,
            props.trigger_position,
            if props.immediate { "  immediate" } else { "" }
        );
    }
    println!();

    let dt = 1.0 / options.fps as f64;
    let steps = (options.seconds * options.fps as f64).round() as u64;
    for step in 0..=steps {
        if step > 0 {
            stage.borrow_mut().tick(dt);
        }
        let stage = stage.borrow();
        let cells: Vec<String> = elements
            .iter()
            .map(|element| match element.and_then(|id| stage.visual(id)) {
                Some(v) => format!("y{:>6.1} x{:>6.1} o{:.2}", v.y, v.x, v.effective_opacity()),
                None => "-".to_string(),
            })
            .collect();
        println!("t={:>5.2}  {}", stage.clock(), cells.join(" | "));
    }

    Ok(())
}
