//! Theme colors for the UI
//! Defaults can be overridden per color from the `[theme]` table of the config file

use ratatui::style::Color;
use std::sync::OnceLock;

use crate::config::ThemeConfig;

static THEME: OnceLock<Theme> = OnceLock::new();

/// Theme colors for the UI
#[derive(Debug, Clone)]
pub struct Theme {
    pub accent: Color,           // Active borders, highlights, focused tab
    pub accent_bright: Color,    // Secondary highlights (filter chips, totals)
    pub danger: Color,           // Errors, delete prompts, negative amounts
    pub success: Color,          // Paid/received states, positive amounts
    pub warning: Color,          // Status line, pending states
    pub text: Color,             // Primary text
    pub text_dim: Color,         // Secondary text, skeleton rows
    pub bg_selected: Color,      // Cursor row background
    pub inactive: Color,         // Inactive borders
    pub header: Color,           // Table headers and section titles
}

impl Default for Theme {
    fn default() -> Self {
        // Catppuccin-inspired
        Self {
            accent: Color::Rgb(250, 179, 135),
            accent_bright: Color::Rgb(245, 194, 231),
            danger: Color::Rgb(243, 139, 168),
            success: Color::Rgb(166, 218, 149),
            warning: Color::Rgb(249, 226, 175),
            text: Color::Rgb(205, 214, 244),
            text_dim: Color::Rgb(147, 153, 178),
            bg_selected: Color::Rgb(69, 71, 90),
            inactive: Color::Rgb(88, 91, 112),
            header: Color::Rgb(137, 180, 250),
        }
    }
}

impl Theme {
    /// Build a theme from defaults plus any valid hex overrides
    pub fn from_config(config: &ThemeConfig) -> Self {
        let mut theme = Self::default();

        let overrides: [(&Option<String>, &mut Color); 6] = [
            (&config.accent, &mut theme.accent),
            (&config.danger, &mut theme.danger),
            (&config.success, &mut theme.success),
            (&config.warning, &mut theme.warning),
            (&config.text, &mut theme.text),
            (&config.header, &mut theme.header),
        ];

        for (value, slot) in overrides {
            if let Some(raw) = value {
                match parse_hex_color(raw) {
                    Some(color) => *slot = color,
                    None => tracing::warn!("Ignoring invalid theme color: {}", raw),
                }
            }
        }

        theme
    }
}

/// Install the theme used by every draw call. Only the first call wins.
pub fn init(theme: Theme) {
    let _ = THEME.set(theme);
}

/// Current theme, falling back to defaults when `init` was never called
pub fn current() -> &'static Theme {
    THEME.get_or_init(Theme::default)
}

/// Parse a hex color string (#RRGGBB or #RGB)
fn parse_hex_color(s: &str) -> Option<Color> {
    let s = s.trim().trim_start_matches('#');

    if s.len() == 6 {
        let r = u8::from_str_radix(&s[0..2], 16).ok()?;
        let g = u8::from_str_radix(&s[2..4], 16).ok()?;
        let b = u8::from_str_radix(&s[4..6], 16).ok()?;
        Some(Color::Rgb(r, g, b))
    } else if s.len() == 3 {
        let r = u8::from_str_radix(&s[0..1], 16).ok()? * 17;
        let g = u8::from_str_radix(&s[1..2], 16).ok()? * 17;
        let b = u8::from_str_radix(&s[2..3], 16).ok()? * 17;
        Some(Color::Rgb(r, g, b))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#FFC107"), Some(Color::Rgb(255, 193, 7)));
        assert_eq!(parse_hex_color("fff"), Some(Color::Rgb(255, 255, 255)));
        assert_eq!(parse_hex_color("#12345"), None);
        assert_eq!(parse_hex_color("#GGGGGG"), None);
    }

    #[test]
    fn test_overrides_apply_and_bad_values_fall_back() {
        let config = ThemeConfig {
            accent: Some("#000000".to_string()),
            danger: Some("not-a-color".to_string()),
            ..ThemeConfig::default()
        };

        let theme = Theme::from_config(&config);
        assert_eq!(theme.accent, Color::Rgb(0, 0, 0));
        assert_eq!(theme.danger, Theme::default().danger);
    }
}
