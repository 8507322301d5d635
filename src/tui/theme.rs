use ratatui::style::Color;

use crate::model::UiConfig;

/// Parsed color theme for the TUI
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    /// Header, text and checked boxes
    pub primary: Color,
    /// Panel background
    pub surface: Color,
    /// Unchecked boxes, hints, status messages
    pub dim: Color,
    /// Selected row background
    pub selection_bg: Color,
    /// Delete and error accents
    pub danger: Color,
    /// Input field background
    pub input_bg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            primary: Color::Rgb(0x0A, 0x4B, 0x18),
            surface: Color::Rgb(0xD3, 0xED, 0xD0),
            dim: Color::Rgb(0x80, 0x80, 0x80),
            selection_bg: Color::Rgb(0xB5, 0xDB, 0xB0),
            danger: Color::Rgb(0xFF, 0x00, 0x00),
            input_bg: Color::Rgb(0xFF, 0xFF, 0xFF),
        }
    }
}

/// Parse a hex color string like "#0A4B18" into an RGB Color
fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

impl Theme {
    /// Create a theme from UI config, falling back to defaults
    pub fn from_config(ui: &UiConfig) -> Self {
        let mut theme = Theme::default();
        for (key, value) in &ui.colors {
            let Some(color) = parse_hex_color(value) else {
                tracing::warn!(key = %key, value = %value, "ignoring invalid color");
                continue;
            };
            match key.as_str() {
                "primary" => theme.primary = color,
                "surface" | "white" => theme.surface = color,
                "dim" => theme.dim = color,
                "selection_bg" => theme.selection_bg = color,
                "danger" => theme.danger = color,
                "input_bg" => theme.input_bg = color,
                _ => tracing::warn!(key = %key, "unknown color slot"),
            }
        }
        theme
    }

    /// Checkbox color for a task
    pub fn checkbox_color(&self, completed: bool) -> Color {
        if completed { self.primary } else { self.dim }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(
            parse_hex_color("#0A4B18"),
            Some(Color::Rgb(0x0A, 0x4B, 0x18))
        );
        assert_eq!(parse_hex_color("0A4B18"), None); // missing #
        assert_eq!(parse_hex_color("#0A4B"), None); // too short
        assert_eq!(parse_hex_color("#ZZZZZZ"), None); // invalid hex
        assert_eq!(parse_hex_color("#é0000"), None); // non-ascii
    }

    #[test]
    fn test_from_config_overrides() {
        let mut ui = UiConfig::default();
        ui.colors.insert("primary".into(), "#000000".into());
        ui.colors.insert("white".into(), "#FFFFFF".into());
        ui.colors.insert("bogus".into(), "#123456".into());
        ui.colors.insert("dim".into(), "grey".into());

        let theme = Theme::from_config(&ui);
        assert_eq!(theme.primary, Color::Rgb(0, 0, 0));
        assert_eq!(theme.surface, Color::Rgb(0xFF, 0xFF, 0xFF));
        // Invalid values keep defaults
        assert_eq!(theme.dim, Theme::default().dim);
    }

    #[test]
    fn test_checkbox_color() {
        let theme = Theme::default();
        assert_eq!(theme.checkbox_color(true), theme.primary);
        assert_eq!(theme.checkbox_color(false), theme.dim);
    }
}
