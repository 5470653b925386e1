use crate::config::ThemeSettings;
use ratatui::style::Color;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TuiTheme {
    pub highlight_fg: Color,
    pub highlight_bg: Color,
    pub border_fg: Color,
    pub help_fg: Color,
}

impl Default for TuiTheme {
    fn default() -> Self {
        Self {
            highlight_fg: Color::Black,
            highlight_bg: Color::Cyan,
            border_fg: Color::Gray,
            help_fg: Color::Yellow,
        }
    }
}

impl TuiTheme {
    /// Unknown or unparsable colors fall back to the default for that slot.
    pub fn from_settings(raw: Option<&ThemeSettings>) -> Self {
        let d = Self::default();
        let Some(raw) = raw else { return d };
        let pick = |v: &Option<String>, fallback: Color| {
            v.as_deref().and_then(parse_color).unwrap_or(fallback)
        };
        Self {
            highlight_fg: pick(&raw.highlight_fg, d.highlight_fg),
            highlight_bg: pick(&raw.highlight_bg, d.highlight_bg),
            border_fg: pick(&raw.border_fg, d.border_fg),
            help_fg: pick(&raw.help_fg, d.help_fg),
        }
    }
}

/// Named ANSI colors, `#rrggbb` or `rgb(r, g, b)`.
pub fn parse_color(s: &str) -> Option<Color> {
    let k = s.trim().to_ascii_lowercase();
    let named = match k.as_str() {
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        "white" => Color::White,
        "gray" | "grey" => Color::Gray,
        _ => {
            if let Some(hex) = k.strip_prefix('#') {
                return parse_hex(hex);
            }
            if let Some(rest) = k.strip_prefix("rgb(") {
                return parse_rgb(rest.strip_suffix(')')?);
            }
            return None;
        }
    };
    Some(named)
}

fn parse_hex(hex: &str) -> Option<Color> {
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?))
}

fn parse_rgb(body: &str) -> Option<Color> {
    let parts: Vec<u8> = body
        .split(',')
        .map(|p| p.trim().parse::<u8>().ok())
        .collect::<Option<_>>()?;
    match parts.as_slice() {
        [r, g, b] => Some(Color::Rgb(*r, *g, *b)),
        _ => None,
    }
}
