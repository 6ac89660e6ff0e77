//! Theme registry and loader

pub mod dracula;
pub mod gruvbox;
pub mod nord;

use ratatui::style::Color;
use reveal_core::config::{ThemeColorOverrides, ThemeConfig};
use tracing::warn;

use crate::theme::Theme;

/// Built-in theme names
pub const THEME_NAMES: [&str; 4] = ["gruvbox-dark", "gruvbox-light", "nord", "dracula"];

/// Parse a hex color string into a ratatui Color
/// Accepts formats: "#RRGGBB", "RRGGBB", "#RGB", "RGB"
pub fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.trim().trim_start_matches('#');
    if !hex.is_ascii() {
        return None;
    }

    match hex.len() {
        3 => {
            let r = u8::from_str_radix(&hex[0..1], 16).ok()? * 17;
            let g = u8::from_str_radix(&hex[1..2], 16).ok()? * 17;
            let b = u8::from_str_radix(&hex[2..3], 16).ok()? * 17;
            Some(Color::Rgb(r, g, b))
        }
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(Color::Rgb(r, g, b))
        }
        _ => None,
    }
}

/// Load a theme by name from config, then apply overrides
pub fn load_theme(config: &ThemeConfig) -> Theme {
    let base = match config.name.to_lowercase().as_str() {
        "gruvbox-dark" | "gruvbox" => gruvbox::dark(),
        "gruvbox-light" => gruvbox::light(),
        "nord" => nord::default(),
        "dracula" => dracula::default(),
        other => {
            warn!("Unknown theme '{}', using gruvbox-dark", other);
            gruvbox::dark()
        }
    };
    apply_overrides(base, &config.colors)
}

fn apply_overrides(mut theme: Theme, colors: &ThemeColorOverrides) -> Theme {
    let apply = |slot: &mut Color, value: &Option<String>, name: &str| {
        if let Some(hex) = value {
            match parse_hex_color(hex) {
                Some(color) => *slot = color,
                None => warn!("Invalid color for {}: '{}'", name, hex),
            }
        }
    };

    apply(&mut theme.bg0, &colors.bg0, "bg0");
    apply(&mut theme.bg1, &colors.bg1, "bg1");
    apply(&mut theme.fg0, &colors.fg0, "fg0");
    apply(&mut theme.fg1, &colors.fg1, "fg1");
    apply(&mut theme.grey, &colors.grey, "grey");
    apply(&mut theme.accent, &colors.accent, "accent");
    apply(&mut theme.highlight, &colors.highlight, "highlight");
    theme
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#ff0000"), Some(Color::Rgb(255, 0, 0)));
        assert_eq!(parse_hex_color("0f0"), Some(Color::Rgb(0, 255, 0)));
        assert_eq!(parse_hex_color("#12345"), None);
        assert_eq!(parse_hex_color("zzzzzz"), None);
    }

    #[test]
    fn test_load_known_and_unknown() {
        let nord = load_theme(&ThemeConfig {
            name: "Nord".to_string(),
            colors: ThemeColorOverrides::default(),
        });
        assert_eq!(nord, nord::default());

        let fallback = load_theme(&ThemeConfig {
            name: "does-not-exist".to_string(),
            colors: ThemeColorOverrides::default(),
        });
        assert_eq!(fallback, gruvbox::dark());
    }

    #[test]
    fn test_overrides() {
        let theme = load_theme(&ThemeConfig {
            name: "dracula".to_string(),
            colors: ThemeColorOverrides {
                accent: Some("#010203".to_string()),
                fg0: Some("not a color".to_string()),
                ..Default::default()
            },
        });
        assert_eq!(theme.accent, Color::Rgb(1, 2, 3));
        assert_eq!(theme.fg0, dracula::default().fg0);
    }

    #[test]
    fn test_every_listed_theme_loads() {
        for name in THEME_NAMES {
            let theme = load_theme(&ThemeConfig {
                name: name.to_string(),
                colors: ThemeColorOverrides::default(),
            });
            assert!(matches!(theme.bg0, Color::Rgb(..)));
        }
    }
}
