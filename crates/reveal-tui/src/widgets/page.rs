use ratatui::{buffer::Buffer, layout::Rect, style::Style};

use crate::app::App;
use crate::widgets::SectionWidget;

/// Every section of the page at the current scroll offset
pub struct PageWidget;

impl PageWidget {
    pub fn render(buf: &mut Buffer, area: Rect, app: &App) {
        buf.set_style(area, Style::default().bg(app.theme.bg0));

        let scroll = app.scroller.current() as i32;
        let units = (app.config.ui.units_per_row, app.config.ui.units_per_column);
        for (index, section) in app.sections().iter().enumerate() {
            let Some(slot) = app.layout().slot(index) else {
                continue;
            };
            SectionWidget::render(
                buf,
                area,
                &section.render(),
                app.visual(index),
                slot.top as i32 - scroll,
                units,
                &app.theme,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use ratatui::{backend::TestBackend, Terminal};
    use reveal_core::page::{PageSpec, SectionSpec};
    use reveal_core::AppConfig;

    use crate::theme::Theme;

    fn screen(terminal: &Terminal<TestBackend>) -> String {
        let buf = terminal.backend().buffer();
        (0..buf.area.height)
            .map(|y| {
                (0..buf.area.width)
                    .map(|x| buf.cell((x, y)).map(|c| c.symbol()).unwrap_or(" "))
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_only_immediate_section_shows_after_mount() {
        let page = PageSpec {
            sections: vec![
                SectionSpec {
                    title: "Visible".into(),
                    immediate: Some(true),
                    ..Default::default()
                },
                SectionSpec {
                    title: "Hidden".into(),
                    // Never reached at this viewport size
                    trigger_position: Some("top top".into()),
                    ..Default::default()
                },
            ],
        };
        let mut app = App::new(Arc::new(AppConfig::default()), Theme::default(), &page, false, 10);
        for _ in 0..20 {
            app.update(0.1);
        }

        let mut terminal = Terminal::new(TestBackend::new(30, 10)).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.area();
                PageWidget::render(frame.buffer_mut(), area, &app)
            })
            .unwrap();

        let text = screen(&terminal);
        assert!(text.contains("Visible"));
        assert!(!text.contains("Hidden"));
    }
}
