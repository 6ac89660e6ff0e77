use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

use crate::app::App;

const HELP_HINT: &str = " q:quit j/k:scroll r:replay i:immediate ";

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render(buf: &mut Buffer, area: Rect, app: &App) {
        let theme = &app.theme;
        let status_text = match &app.status_message {
            Some(msg) => format!(" {}", msg),
            None => {
                let mode = if app.immediate { "IMMEDIATE" } else { "SCROLL" };
                let max = app.max_scroll();
                let percent = if max == 0 {
                    100
                } else {
                    app.scroller.current() as u32 * 100 / max as u32
                };
                format!(
                    " {} | Revealed: {}/{} | {}%",
                    mode,
                    app.revealed_count(),
                    app.sections().len(),
                    percent
                )
            }
        };

        let used = status_text.width() + HELP_HINT.width();
        let padding = (area.width as usize).saturating_sub(used);

        let line = Line::from(vec![
            Span::styled(status_text, Style::default().fg(theme.fg0).bg(theme.bg2)),
            Span::styled(" ".repeat(padding), Style::default().bg(theme.bg2)),
            Span::styled(HELP_HINT, Style::default().fg(theme.grey).bg(theme.bg2)),
        ]);

        Paragraph::new(line).render(area, buf);
    }
}
