use ratatui::style::Color;

use crate::model::UiConfig;

/// Parsed color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub text_bright: Color,
    /// Foreground for panel rows; dark, sits on pastel status backgrounds
    pub panel_text: Color,
    pub highlight: Color,
    pub dim: Color,
    /// Flag color for duplicate keys
    pub warning: Color,
    /// Row background for sections whose status has no palette slot
    pub unset: Color,
    pub selection_bg: Color,
    pub selection_border: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            background: Color::Rgb(0x0C, 0x00, 0x1B),
            text: Color::Rgb(0xB0, 0xAA, 0xFF),
            text_bright: Color::Rgb(0xFF, 0xFF, 0xFF),
            panel_text: Color::Rgb(0x1A, 0x14, 0x26),
            highlight: Color::Rgb(0xFB, 0x41, 0x96),
            dim: Color::Rgb(0x7D, 0x78, 0xBF),
            warning: Color::Rgb(0xFF, 0x7B, 0x7B),
            unset: Color::Rgb(0xB2, 0xB2, 0xB2),
            selection_bg: Color::Rgb(0x3D, 0x14, 0x38),
            selection_border: Color::Rgb(0xFB, 0x41, 0x96),
        }
    }
}

/// Parse a hex color string like "#FF4444" into an RGB Color
pub fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

/// Darken an RGB color: each channel drops by round(2.55 * percent),
/// floored at zero. Non-RGB colors pass through unchanged.
pub fn darken(color: Color, percent: usize) -> Color {
    let Color::Rgb(r, g, b) = color else {
        return color;
    };
    let amt = (2.55 * percent as f32).round().min(255.0) as u8;
    Color::Rgb(
        r.saturating_sub(amt),
        g.saturating_sub(amt),
        b.saturating_sub(amt),
    )
}

impl Theme {
    /// Create a theme from UI config, falling back to defaults
    pub fn from_config(ui: &UiConfig) -> Self {
        let mut theme = Theme::default();

        // Apply color overrides from [ui.colors]
        for (key, value) in &ui.colors {
            if let Some(color) = parse_hex_color(value) {
                match key.as_str() {
                    "background" => theme.background = color,
                    "text" => theme.text = color,
                    "text_bright" => theme.text_bright = color,
                    "panel_text" => theme.panel_text = color,
                    "highlight" => theme.highlight = color,
                    "dim" => theme.dim = color,
                    "warning" => theme.warning = color,
                    "unset" => theme.unset = color,
                    "selection_bg" => theme.selection_bg = color,
                    "selection_border" => theme.selection_border = color,
                    _ => {}
                }
            }
        }

        theme
    }

    /// Background for a panel row: the status slot's color darkened by
    /// 6% per depth level, or the unset fallback when the status has no
    /// slot in the palette.
    pub fn row_bg(&self, status_hex: Option<&str>, depth: usize) -> Color {
        let base = status_hex.and_then(parse_hex_color).unwrap_or(self.unset);
        darken(base, depth * 6)
    }
}
