//! Theme management and ANSI escape sequence generation.
//!
//! Four Catppuccin palettes are built in; custom themes are read from TOML
//! files with the same shape.
//!
//! # Built-in Themes
//!
//! - `catppuccin-mocha`: Dark theme with warm tones (default)
//! - `catppuccin-latte`: Light theme with soft pastels
//! - `catppuccin-frappe`: Cool dark theme
//! - `catppuccin-macchiato`: Warm dark theme
//!
//! # TOML Format
//!
//! ```toml
//! name = "my-theme"
//!
//! [colors]
//! header_fg = "#cba6f7"
//! selection_fg = "#1e1e2e"
//! selection_bg = "#f5c2e7"
//! text_normal = "#cdd6f4"
//! text_dim = "#6c7086"
//! border = "#45475a"
//! accent = "#f5c2e7"
//! glyph_fg = "#f9e2af"
//! empty_state_fg = "#89b4fa"
//! success_fg = "#a6e3a1"
//! error_fg = "#f38ba8"
//! info_fg = "#89dceb"
//! ```
//!
//! # Example
//!
//! ```rust
//! use hanzi_cards::ui::theme::Theme;
//!
//! let theme = Theme::from_name("catppuccin-latte").unwrap();
//! print!("{}好{}", Theme::fg(&theme.colors.glyph_fg), Theme::reset());
//! ```

use crate::domain::{HanziError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Name of the theme used when nothing else is configured.
pub const DEFAULT_THEME: &str = "catppuccin-mocha";

/// Color scheme for UI rendering.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Theme {
    pub name: String,
    pub colors: ThemeColors,
}

/// Hex colors (`"#rrggbb"`) for every UI element.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ThemeColors {
    /// Title and active tab.
    pub header_fg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_bg: Option<String>,

    /// Selected card and active tab label.
    pub selection_fg: String,
    pub selection_bg: String,

    pub text_normal: String,
    /// Footer, pinyin hints, secondary text.
    pub text_dim: String,

    /// Separators and card frames.
    pub border: String,

    /// Search box, focused form field, overlay frame.
    pub accent: String,

    /// Chinese characters on cards and in the detail view.
    pub glyph_fg: String,

    pub empty_state_fg: String,

    /// Success notices and correct answers.
    pub success_fg: String,
    /// Error notices and wrong answers.
    pub error_fg: String,
    pub info_fg: String,
}

impl Theme {
    /// Loads a built-in theme by name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let toml_str = match name {
            "catppuccin-mocha" => include_str!("../../themes/catppuccin-mocha.toml"),
            "catppuccin-latte" => include_str!("../../themes/catppuccin-latte.toml"),
            "catppuccin-frappe" => include_str!("../../themes/catppuccin-frappe.toml"),
            "catppuccin-macchiato" => include_str!("../../themes/catppuccin-macchiato.toml"),
            _ => return None,
        };

        match toml::from_str(toml_str) {
            Ok(theme) => Some(theme),
            Err(e) => {
                tracing::warn!(theme = name, error = %e, "built-in theme failed to parse");
                None
            }
        }
    }

    /// Loads a theme from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`HanziError::Io`] if the file cannot be read and
    /// [`HanziError::Theme`] if its contents are not a valid theme.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parses a theme from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`HanziError::Theme`] on syntax errors or missing colors.
    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| HanziError::Theme(format!("failed to parse theme TOML: {e}")))
    }

    /// Plain 16-color-friendly palette used if the built-in themes are unusable.
    fn fallback() -> Self {
        let color = |hex: &str| hex.to_string();
        Self {
            name: "fallback".to_string(),
            colors: ThemeColors {
                header_fg: color("#ffffff"),
                header_bg: None,
                selection_fg: color("#000000"),
                selection_bg: color("#c0c0c0"),
                text_normal: color("#e0e0e0"),
                text_dim: color("#808080"),
                border: color("#606060"),
                accent: color("#ffffff"),
                glyph_fg: color("#ffff00"),
                empty_state_fg: color("#8080ff"),
                success_fg: color("#00ff00"),
                error_fg: color("#ff0000"),
                info_fg: color("#00ffff"),
            },
        }
    }

    /// Converts `#rrggbb` to RGB; malformed input renders as white.
    fn hex_to_rgb(hex: &str) -> (u8, u8, u8) {
        let hex = hex.trim_start_matches('#').trim();

        if hex.len() != 6 || !hex.is_ascii() {
            return (255, 255, 255);
        }

        let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(255);
        let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(255);
        let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(255);

        (r, g, b)
    }

    /// 24-bit foreground escape sequence for `hex`.
    #[must_use]
    pub fn fg(hex: &str) -> String {
        let (r, g, b) = Self::hex_to_rgb(hex);
        format!("\u{001b}[38;2;{r};{g};{b}m")
    }

    /// 24-bit background escape sequence for `hex`.
    #[must_use]
    pub fn bg(hex: &str) -> String {
        let (r, g, b) = Self::hex_to_rgb(hex);
        format!("\u{001b}[48;2;{r};{g};{b}m")
    }

    #[must_use]
    pub const fn bold() -> &'static str {
        "\u{001b}[1m"
    }

    #[must_use]
    pub const fn dim() -> &'static str {
        "\u{001b}[2m"
    }

    #[must_use]
    pub const fn reset() -> &'static str {
        "\u{001b}[0m"
    }
}

impl Default for Theme {
    /// Catppuccin Mocha.
    fn default() -> Self {
        Self::from_name(DEFAULT_THEME).unwrap_or_else(Self::fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn every_builtin_theme_parses() {
        for name in ["catppuccin-mocha", "catppuccin-latte", "catppuccin-frappe", "catppuccin-macchiato"] {
            let theme = Theme::from_name(name).unwrap();
            assert_eq!(theme.name, name);
        }
    }

    #[test]
    fn unknown_theme_is_none() {
        assert!(Theme::from_name("solarized").is_none());
    }

    #[test]
    fn default_is_mocha() {
        assert_eq!(Theme::default().name, DEFAULT_THEME);
    }

    #[test]
    fn fg_formats_truecolor_escape() {
        assert_eq!(Theme::fg("#a6e3a1"), "\u{1b}[38;2;166;227;161m");
        assert_eq!(Theme::bg("nonsense"), "\u{1b}[48;2;255;255;255m");
    }

    #[test]
    fn custom_theme_file_loads() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let builtin = toml::to_string(&Theme::default()).unwrap();
        file.write_all(builtin.replace("catppuccin-mocha", "mine").as_bytes()).unwrap();

        let theme = Theme::from_file(file.path()).unwrap();

        assert_eq!(theme.name, "mine");
    }

    #[test]
    fn incomplete_theme_is_rejected() {
        let err = Theme::from_toml("name = \"broken\"\n[colors]\nheader_fg = \"#fff\"\n").unwrap_err();
        assert!(matches!(err, HanziError::Theme(_)));
    }

    #[test]
    fn missing_theme_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Theme::from_file(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, HanziError::Io(_)));
    }
}
