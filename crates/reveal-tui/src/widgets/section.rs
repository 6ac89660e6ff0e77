use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget},
};
use reveal_core::page::SectionContent;
use reveal_core::{Container, VisualState};
use unicode_width::UnicodeWidthStr;

use crate::theme::{blend, Theme};

/// Below this opacity nothing of the section is drawn
pub const MIN_VISIBLE_OPACITY: f64 = 0.04;

/// Columns kept free on each side of a section
const SIDE_MARGIN: u16 = 2;

/// Look of a container, derived from its class tokens
///
/// - `card`: rounded border around the section
/// - `hero`: double border, bold highlighted title
/// - `accent`: accent colored border
/// - `muted`: body text in the muted color
///
/// Unknown tokens are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassStyle {
    pub bordered: bool,
    pub border_type: BorderType,
    pub border: Style,
    pub title: Style,
    pub body: Style,
    pub background: Style,
}

impl ClassStyle {
    pub fn from_class_name(class_name: &str, theme: &Theme) -> Self {
        let mut style = Self {
            bordered: false,
            border_type: BorderType::Rounded,
            border: Style::default().fg(theme.grey),
            title: Style::default().fg(theme.fg1).add_modifier(Modifier::BOLD),
            body: Style::default().fg(theme.fg0),
            background: Style::default().bg(theme.bg0),
        };

        for class in class_name.split_whitespace() {
            match class {
                "card" => {
                    style.bordered = true;
                    style.background = Style::default().bg(theme.bg1);
                }
                "hero" => {
                    style.bordered = true;
                    style.border_type = BorderType::Double;
                    style.title = Style::default()
                        .fg(theme.highlight)
                        .add_modifier(Modifier::BOLD);
                }
                "accent" => style.border = Style::default().fg(theme.accent),
                "muted" => style.body = Style::default().fg(theme.grey),
                _ => {}
            }
        }
        style
    }

    /// Whether the class draws a border, without needing a theme
    pub fn is_bordered(class_name: &str) -> bool {
        class_name
            .split_whitespace()
            .any(|c| c == "card" || c == "hero")
    }
}

/// Renders one section container at its animated position
pub struct SectionWidget;

impl SectionWidget {
    /// Rows a section occupies on the page
    pub fn height(content: &SectionContent, class_name: &str) -> u16 {
        let body = u16::try_from(content.body.len().max(1)).unwrap_or(u16::MAX);
        if ClassStyle::is_bordered(class_name) {
            body.saturating_add(2)
        } else {
            body.saturating_add(1)
        }
    }

    /// Draw `container` into `viewport`
    ///
    /// `top` is the section's resting row relative to the viewport's top edge
    /// and may be negative or past the bottom. `visual` shifts it by
    /// `units_per_row` / `units_per_column` and fades it against the page
    /// background.
    pub fn render(
        buf: &mut Buffer,
        viewport: Rect,
        container: &Container<'_, SectionContent>,
        visual: VisualState,
        top: i32,
        units: (f64, f64),
        theme: &Theme,
    ) {
        let opacity = visual.effective_opacity();
        if opacity < MIN_VISIBLE_OPACITY || viewport.width <= SIDE_MARGIN * 2 {
            return;
        }

        let (units_per_row, units_per_column) = units;
        let dy = offset_cells(visual.y, units_per_row);
        let dx = offset_cells(visual.x, units_per_column);

        let content = container.children;
        let width = viewport.width - SIDE_MARGIN * 2;
        let height = Self::height(content, container.class_name);

        let origin_y = viewport.y as i32 + top + dy;
        let origin_x = viewport.x as i32 + SIDE_MARGIN as i32 + dx;
        let bottom = viewport.y as i32 + viewport.height as i32;
        let right = viewport.x as i32 + viewport.width as i32;
        if origin_y >= bottom || origin_y + height as i32 <= viewport.y as i32 {
            return;
        }

        let style = ClassStyle::from_class_name(container.class_name, theme);
        let mut scratch = Buffer::empty(Rect::new(0, 0, width, height));
        Self::draw(&mut scratch, content, &style);

        for y in 0..height {
            let dest_y = origin_y + y as i32;
            if dest_y < viewport.y as i32 || dest_y >= bottom {
                continue;
            }
            for x in 0..width {
                let dest_x = origin_x + x as i32;
                if dest_x < viewport.x as i32 || dest_x >= right {
                    continue;
                }
                let (Some(src), Some(dst)) = (
                    scratch.cell((x, y)),
                    buf.cell_mut((dest_x as u16, dest_y as u16)),
                ) else {
                    continue;
                };
                let fg = blend(theme.resolve_fg(src.fg), theme.bg0, opacity);
                let bg = blend(theme.resolve_bg(src.bg), theme.bg0, opacity);
                dst.set_symbol(src.symbol());
                dst.set_fg(fg);
                dst.set_bg(bg);
                dst.modifier = src.modifier;
            }
        }
    }

    fn draw(buf: &mut Buffer, content: &SectionContent, style: &ClassStyle) {
        let area = buf.area;
        let body: Vec<Line> = content
            .body
            .iter()
            .map(|line| Line::from(Span::styled(line.clone(), style.body)))
            .collect();

        if style.bordered {
            let title = fit_title(&content.title, area.width.saturating_sub(4) as usize);
            let block = Block::default()
                .borders(Borders::ALL)
                .border_type(style.border_type)
                .border_style(style.border)
                .title(Span::styled(format!(" {} ", title), style.title))
                .style(style.background);
            Paragraph::new(body).block(block).render(area, buf);
        } else {
            let mut lines = vec![Line::from(Span::styled(content.title.clone(), style.title))];
            lines.extend(body);
            Paragraph::new(lines).style(style.background).render(area, buf);
        }
    }
}

fn offset_cells(units: f64, units_per_cell: f64) -> i32 {
    if !units.is_finite() || units_per_cell <= 0.0 {
        return 0;
    }
    (units / units_per_cell).round() as i32
}

/// Truncate a title to `max` display columns
fn fit_title(title: &str, max: usize) -> String {
    if title.width() <= max {
        return title.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in title.chars() {
        let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w + 1 > max {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push('…');
    out
}
