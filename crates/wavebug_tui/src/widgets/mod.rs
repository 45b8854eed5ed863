//! TUI widget modules.
//!
//! Each module contains a stateless rendering function that draws a specific
//! panel of the TUI interface into a ratatui `Buffer`.

use ratatui::style::Color;

pub mod command_input;
pub mod signal_list;
pub mod status_bar;
pub mod waveform;

/// Converts a `#rrggbb` color into a terminal color.
///
/// Malformed input falls back to white.
pub fn hex_color(hex: &str) -> Color {
    let digits = hex.trim_start_matches('#');
    if digits.len() != 6 {
        return Color::White;
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    match (channel(0), channel(2), channel(4)) {
        (Some(r), Some(g), Some(b)) => Color::Rgb(r, g, b),
        _ => Color::White,
    }
}
