use serde::{Deserialize, Serialize};

/// Light or dark - the only two the browser knows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

/// All color definitions for a theme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeColors {
    pub background: Color,
    pub foreground: Color,
    pub border: Color,
    pub border_focused: Color,
    pub primary: Color,
    pub secondary: Color,
    pub muted: Color,
    pub error: Color,
    pub selected_bg: Color,
    pub slider_track: Color,
    pub slider_fill: Color,
}

/// RGB color representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn rgb(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xFF) as u8,
            g: ((hex >> 8) & 0xFF) as u8,
            b: (hex & 0xFF) as u8,
        }
    }
}

impl Theme {
    pub fn name(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    /// Stored preference wins, then whatever the terminal says, then dark
    pub fn resolve(stored: Option<Theme>, system: Option<Theme>) -> Self {
        stored.or(system).unwrap_or_default()
    }

    /// Guess the terminal background from `COLORFGBG` ("fg;bg", sometimes "fg;default;bg")
    pub fn from_colorfgbg(value: &str) -> Option<Self> {
        let bg: u8 = value.rsplit(';').next()?.trim().parse().ok()?;
        // ANSI 0-6 and 8 are dark backgrounds, 7 and 9-15 light
        Some(if bg == 7 || (9..=15).contains(&bg) { Theme::Light } else { Theme::Dark })
    }

    pub fn detect_system() -> Option<Self> {
        std::env::var("COLORFGBG").ok().and_then(|v| Self::from_colorfgbg(&v))
    }

    pub fn colors(self) -> ThemeColors {
        match self {
            Theme::Dark => ThemeColors {
                background: Color::rgb(0x232740),
                foreground: Color::rgb(0xe6e6ef),
                border: Color::rgb(0x45475a),
                border_focused: Color::rgb(0x89b4fa),
                primary: Color::rgb(0xf5f5f7),
                secondary: Color::rgb(0xa6adc8),
                muted: Color::rgb(0x6c7086),
                error: Color::rgb(0xf38ba8),
                selected_bg: Color::rgb(0x313552),
                slider_track: Color::rgb(0x45475a),
                slider_fill: Color::rgb(0xf5f5f7),
            },
            Theme::Light => ThemeColors {
                background: Color::rgb(0xf5f5f7),
                foreground: Color::rgb(0x232740),
                border: Color::rgb(0xbcc0cc),
                border_focused: Color::rgb(0x1e66f5),
                primary: Color::rgb(0x232740),
                secondary: Color::rgb(0x5c5f77),
                muted: Color::rgb(0x9ca0b0),
                error: Color::rgb(0xd20f39),
                selected_bg: Color::rgb(0xdce0e8),
                slider_track: Color::rgb(0xccd0da),
                slider_fill: Color::rgb(0x232740),
            },
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle() {
        assert_eq!(Theme::Light.toggle(), Theme::Dark);
        assert_eq!(Theme::Dark.toggle().toggle(), Theme::Dark);
    }

    #[test]
    fn test_resolution_order() {
        assert_eq!(Theme::resolve(Some(Theme::Light), Some(Theme::Dark)), Theme::Light);
        assert_eq!(Theme::resolve(None, Some(Theme::Light)), Theme::Light);
        assert_eq!(Theme::resolve(None, None), Theme::Dark);
    }

    #[test]
    fn test_colorfgbg() {
        assert_eq!(Theme::from_colorfgbg("15;0"), Some(Theme::Dark));
        assert_eq!(Theme::from_colorfgbg("0;15"), Some(Theme::Light));
        assert_eq!(Theme::from_colorfgbg("0;default;7"), Some(Theme::Light));
        assert_eq!(Theme::from_colorfgbg("garbage"), None);
    }

    #[test]
    fn test_parse_and_name_agree() {
        for theme in [Theme::Light, Theme::Dark] {
            assert_eq!(Theme::parse(theme.name()), Some(theme));
        }
        assert_eq!(Theme::parse("solarized"), None);
    }

    #[test]
    fn test_color_from_hex() {
        assert_eq!(Color::rgb(0x232740), Color::new(0x23, 0x27, 0x40));
    }
}
