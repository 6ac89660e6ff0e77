use ratatui::style::Color;

/// Runtime theme with configurable colors
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    /// Page background
    pub bg0: Color,
    /// Section background
    pub bg1: Color,
    /// Status bar background
    pub bg2: Color,
    /// Body text
    pub fg0: Color,
    /// Titles
    pub fg1: Color,
    /// Borders and muted text
    pub grey: Color,
    pub accent: Color,
    pub highlight: Color,
}

impl Default for Theme {
    fn default() -> Self {
        crate::themes::gruvbox::dark()
    }
}

impl Theme {
    /// Resolve `Color::Reset` against the theme's own colors
    pub fn resolve_fg(&self, color: Color) -> Color {
        match color {
            Color::Reset => self.fg0,
            other => other,
        }
    }

    pub fn resolve_bg(&self, color: Color) -> Color {
        match color {
            Color::Reset => self.bg0,
            other => other,
        }
    }
}

/// Mix `fg` over `bg` with the given opacity
///
/// Only RGB colors can be mixed; anything else switches at half opacity.
pub fn blend(fg: Color, bg: Color, opacity: f64) -> Color {
    let opacity = opacity.clamp(0.0, 1.0);
    match (fg, bg) {
        (Color::Rgb(r1, g1, b1), Color::Rgb(r2, g2, b2)) => {
            let mix = |f: u8, b: u8| -> u8 {
                (b as f64 + (f as f64 - b as f64) * opacity).round() as u8
            };
            Color::Rgb(mix(r1, r2), mix(g1, g2), mix(b1, b2))
        }
        _ => {
            if opacity >= 0.5 {
                fg
            } else {
                bg
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blend_rgb() {
        let white = Color::Rgb(255, 255, 255);
        let black = Color::Rgb(0, 0, 0);
        assert_eq!(blend(white, black, 1.0), white);
        assert_eq!(blend(white, black, 0.0), black);
        assert_eq!(blend(white, black, 0.5), Color::Rgb(128, 128, 128));
    }

    #[test]
    fn test_blend_named_colors_switch() {
        assert_eq!(blend(Color::Red, Color::Black, 0.7), Color::Red);
        assert_eq!(blend(Color::Red, Color::Black, 0.3), Color::Black);
    }

    #[test]
    fn test_resolve_reset() {
        let theme = Theme::default();
        assert_eq!(theme.resolve_fg(Color::Reset), theme.fg0);
        assert_eq!(theme.resolve_bg(Color::Reset), theme.bg0);
        assert_eq!(theme.resolve_fg(Color::Red), Color::Red);
    }
}
