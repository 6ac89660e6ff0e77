//! Nord
//! https://www.nordtheme.com/

use ratatui::style::Color;
use crate::theme::Theme;

pub fn default() -> Theme {
    Theme {
        bg0: Color::Rgb(0x2e, 0x34, 0x40), // nord0
        bg1: Color::Rgb(0x3b, 0x42, 0x52), // nord1
        bg2: Color::Rgb(0x43, 0x4c, 0x5e), // nord2
        fg0: Color::Rgb(0xd8, 0xde, 0xe9), // nord4
        fg1: Color::Rgb(0xec, 0xef, 0xf4), // nord6
        grey: Color::Rgb(0x4c, 0x56, 0x6a), // nord3
        accent: Color::Rgb(0x88, 0xc0, 0xd0), // nord8
        highlight: Color::Rgb(0xeb, 0xcb, 0x8b), // nord13
    }
}
