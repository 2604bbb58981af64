//! Color themes and the race palette
//!
//! The chrome (borders, selection, toasts) follows the selected [`Theme`];
//! character cards are tinted by race through [`race_color`].

use ratatui::style::Color;
use std::fmt;

/// Plain sRGB triple, convertible to a ratatui color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// YIQ brightness check used to pick dark or light text over a card.
    pub fn is_light(self) -> bool {
        let Rgb(r, g, b) = self;
        let yiq = (r as u32 * 299 + g as u32 * 587 + b as u32 * 114) / 1000;
        yiq >= 128
    }

    pub fn to_color(self) -> Color {
        Color::Rgb(self.0, self.1, self.2)
    }
}

/// Fallback for races missing from [`RACE_PALETTE`].
pub const DEFAULT_RACE_COLOR: Rgb = Rgb(0x5f, 0x73, 0x85);

/// Known races (lowercase) and their card color.
pub const RACE_PALETTE: &[(&str, Rgb)] = &[
    ("saiyan", Rgb(0xc5, 0xa3, 0x55)),
    ("human", Rgb(0x6a, 0x9f, 0xcf)),
    ("namekian", Rgb(0x6a, 0xab, 0x75)),
    ("frieza race", Rgb(0x9b, 0x7b, 0xb6)),
    ("android", Rgb(0x95, 0xa5, 0xa6)),
    ("majin", Rgb(0xe5, 0x8b, 0x8b)),
    ("jiren race", Rgb(0xc0, 0x70, 0x65)),
    ("god", Rgb(0x6a, 0x9f, 0xcf)),
    ("angel", Rgb(0xb3, 0x9b, 0xc8)),
    ("evil", Rgb(0xc0, 0x70, 0x65)),
];

/// Card color for a race name. Case-insensitive; `frieza-race` and
/// `Frieza Race` resolve to the same entry.
pub fn race_color(race: &str) -> Rgb {
    let key = race.trim().to_lowercase().replace('-', " ");
    RACE_PALETTE
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, rgb)| *rgb)
        .unwrap_or(DEFAULT_RACE_COLOR)
}

/// Text colors (plain, bold) readable on top of `bg`.
pub fn card_text_colors(bg: Rgb) -> (Color, Color) {
    if bg.is_light() {
        (Color::Rgb(31, 41, 55), Color::Black)
    } else {
        (Color::Rgb(243, 244, 246), Color::White)
    }
}

/// Available chrome themes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    /// Orange buttons and yellow spinner on a dark background (default)
    #[default]
    Capsule,
    /// Grayscale for terminals with poor color support
    Mono,
}

impl std::str::FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "capsule" | "default" => Ok(Theme::Capsule),
            "mono" | "monochrome" => Ok(Theme::Mono),
            _ => Err(format!("Unknown theme '{s}'. Available: capsule, mono")),
        }
    }
}

impl Theme {
    pub fn colors(&self) -> ColorScheme {
        match self {
            Theme::Capsule => ColorScheme::capsule(),
            Theme::Mono => ColorScheme::mono(),
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Capsule => write!(f, "capsule"),
            Theme::Mono => write!(f, "mono"),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ColorScheme {
    pub text: Color,
    pub text_dim: Color,
    pub focus_border: Color,
    pub unfocused_border: Color,
    pub selection_bg: Color,
    pub selection_fg: Color,
    /// Fill of the `dragonball` button variant
    pub button: Color,
    pub button_text: Color,
    pub spinner: Color,
    pub error: Color,
    pub toast: Color,
    pub debug_indicator: Color,
}

impl ColorScheme {
    pub fn capsule() -> Self {
        Self {
            text: Color::White,
            text_dim: Color::Gray,
            focus_border: Color::Rgb(250, 204, 21),
            unfocused_border: Color::DarkGray,
            selection_bg: Color::Rgb(250, 204, 21),
            selection_fg: Color::Black,
            button: Color::Rgb(249, 115, 22),
            button_text: Color::White,
            spinner: Color::Rgb(250, 204, 21),
            error: Color::Rgb(239, 68, 68),
            toast: Color::Green,
            debug_indicator: Color::Magenta,
        }
    }

    pub fn mono() -> Self {
        Self {
            text: Color::White,
            text_dim: Color::Gray,
            focus_border: Color::White,
            unfocused_border: Color::DarkGray,
            selection_bg: Color::White,
            selection_fg: Color::Black,
            button: Color::Gray,
            button_text: Color::Black,
            spinner: Color::White,
            error: Color::White,
            toast: Color::White,
            debug_indicator: Color::Gray,
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::capsule()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_parsing() {
        assert_eq!("capsule".parse::<Theme>().unwrap(), Theme::Capsule);
        assert_eq!("MONO".parse::<Theme>().unwrap(), Theme::Mono);
        assert!("neon".parse::<Theme>().is_err());
    }

    #[test]
    fn palette_entries_match_hex_table() {
        assert_eq!(race_color("saiyan"), Rgb(0xc5, 0xa3, 0x55));
        assert_eq!(race_color("namekian"), Rgb(0x6a, 0xab, 0x75));
        assert_eq!(DEFAULT_RACE_COLOR, Rgb(0x5f, 0x73, 0x85));
        assert_eq!(RACE_PALETTE.len(), 10);
    }

    #[test]
    fn race_lookup_ignores_case_and_dashes() {
        assert_eq!(race_color("SAIYAN"), race_color("saiyan"));
        assert_eq!(race_color("Frieza Race"), Rgb(0x9b, 0x7b, 0xb6));
        assert_eq!(race_color("frieza-race"), race_color("Frieza Race"));
        assert_eq!(race_color("Nucleico"), DEFAULT_RACE_COLOR);
        assert_eq!(race_color(""), DEFAULT_RACE_COLOR);
    }

    #[test]
    fn light_and_dark_cards() {
        assert!(race_color("Saiyan").is_light());
        assert!(!DEFAULT_RACE_COLOR.is_light());
        let (_, bold) = card_text_colors(race_color("android"));
        assert_eq!(bold, Color::Black);
    }
}
