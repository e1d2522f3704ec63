use std::collections::HashMap;

use once_cell::sync::Lazy;
use ratatui::style::Color;

/// Used for any player without an entry in the table.
pub const DEFAULT_PLAYER_COLOR: &str = "#4e79a7";
pub const DEFAULT_SURFACE_COLOR: &str = "#bdc3c7";

static PLAYER_COLORS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("Roger Federer", "#1f77b4"),
        ("Rafael Nadal", "#d62728"),
        ("Novak Djokovic", "#2ca02c"),
        ("Andy Murray", "#9467bd"),
        ("Stan Wawrinka", "#ff7f0e"),
    ])
});

static SURFACE_COLORS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("Clay", "#e74c3c"),
        ("Hard", "#34495e"),
        ("Grass", "#2ecc71"),
        ("Carpet", "#f39c12"),
    ])
});

pub fn player_color_hex(player: &str) -> &'static str {
    PLAYER_COLORS.get(player).copied().unwrap_or(DEFAULT_PLAYER_COLOR)
}

pub fn surface_color_hex(surface: &str) -> &'static str {
    SURFACE_COLORS
        .get(surface)
        .copied()
        .unwrap_or(DEFAULT_SURFACE_COLOR)
}

pub fn player_color(player: &str) -> Color {
    hex_to_color(player_color_hex(player)).unwrap_or(Color::Blue)
}

/// Second colour for head-to-head views when both players map to the same hex.
pub fn opponent_color(player: &str, opponent: &str) -> Color {
    if player_color_hex(player) == player_color_hex(opponent) {
        return Color::LightRed;
    }
    player_color(opponent)
}

pub fn surface_color(surface: &str) -> Color {
    hex_to_color(surface_color_hex(surface)).unwrap_or(Color::Gray)
}

/// Heat colour for a win-difference cell: blue when the first player leads,
/// red when the second does, scaled against `max_abs`.
pub fn diff_color(value: i64, max_abs: i64) -> Color {
    if value == 0 || max_abs == 0 {
        return Color::DarkGray;
    }
    let strong = value.abs() * 2 > max_abs;
    match (value > 0, strong) {
        (true, true) => Color::Blue,
        (true, false) => Color::LightBlue,
        (false, true) => Color::Red,
        (false, false) => Color::LightRed,
    }
}

pub fn hex_to_color(hex: &str) -> Option<Color> {
    let raw = hex.strip_prefix('#')?;
    if raw.len() != 6 || !raw.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&raw[0..2], 16).ok()?;
    let g = u8::from_str_radix(&raw[2..4], 16).ok()?;
    let b = u8::from_str_radix(&raw[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_player_gets_default_color() {
        assert_eq!(player_color_hex("Nobody"), DEFAULT_PLAYER_COLOR);
        assert_eq!(player_color_hex("Rafael Nadal"), "#d62728");
    }

    #[test]
    fn hex_parsing() {
        assert_eq!(hex_to_color("#ff0080"), Some(Color::Rgb(255, 0, 128)));
        assert_eq!(hex_to_color("ff0080"), None);
        assert_eq!(hex_to_color("#ff00"), None);
        assert_eq!(hex_to_color("#éé00"), None);
        assert_eq!(hex_to_color("#日本"), None);
    }

    #[test]
    fn diff_color_sign() {
        assert_eq!(diff_color(0, 4), Color::DarkGray);
        assert_eq!(diff_color(4, 4), Color::Blue);
        assert_eq!(diff_color(-1, 4), Color::LightRed);
    }
}
