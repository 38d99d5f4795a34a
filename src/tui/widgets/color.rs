use ratatui::style::{Color, Modifier, Style};

use crate::config::{Config, Theme};
use crate::models::{EventKind, Priority, Role};

/// Parse a color string into a ratatui Color
/// Supports named colors (basic and light/dark variants), `#RRGGBB`, `#RGB`
/// and `rgb(r, g, b)`. Unrecognized input falls back to white.
pub fn parse_color(color_str: &str) -> Color {
    let s = color_str.trim().to_lowercase();

    match s.as_str() {
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        "white" => Color::White,
        "gray" | "grey" | "lightgray" | "lightgrey" => Color::Gray,
        "darkgray" | "darkgrey" => Color::DarkGray,
        "lightred" => Color::LightRed,
        "lightgreen" => Color::LightGreen,
        "lightyellow" => Color::LightYellow,
        "lightblue" => Color::LightBlue,
        "lightmagenta" => Color::LightMagenta,
        "lightcyan" => Color::LightCyan,
        _ => s
            .strip_prefix('#')
            .and_then(parse_hex_color)
            .or_else(|| parse_rgb_color(&s))
            .unwrap_or(Color::White),
    }
}

fn parse_hex_color(hex: &str) -> Option<Color> {
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(hex.get(range)?, 16).ok();
    match hex.len() {
        6 => Some(Color::Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
        3 => {
            // #RGB expands each digit: 0xF -> 0xFF
            let (r, g, b) = (channel(0..1)?, channel(1..2)?, channel(2..3)?);
            Some(Color::Rgb(r << 4 | r, g << 4 | g, b << 4 | b))
        }
        _ => None,
    }
}

fn parse_rgb_color(s: &str) -> Option<Color> {
    let content = s.strip_prefix("rgb(")?.strip_suffix(')')?;
    let parts: Vec<u8> = content
        .split(',')
        .map(|p| p.trim().parse::<u8>().ok())
        .collect::<Option<_>>()?;
    match parts.as_slice() {
        [r, g, b] => Some(Color::Rgb(*r, *g, *b)),
        _ => None,
    }
}

/// Format a Color back to string for display
pub fn format_color_for_display(color: &Color) -> String {
    match color {
        Color::Black => "black".to_string(),
        Color::Red => "red".to_string(),
        Color::Green => "green".to_string(),
        Color::Yellow => "yellow".to_string(),
        Color::Blue => "blue".to_string(),
        Color::Magenta => "magenta".to_string(),
        Color::Cyan => "cyan".to_string(),
        Color::Gray => "gray".to_string(),
        Color::DarkGray => "darkgray".to_string(),
        Color::LightRed => "lightred".to_string(),
        Color::LightGreen => "lightgreen".to_string(),
        Color::LightYellow => "lightyellow".to_string(),
        Color::LightBlue => "lightblue".to_string(),
        Color::LightMagenta => "lightmagenta".to_string(),
        Color::LightCyan => "lightcyan".to_string(),
        Color::Rgb(r, g, b) => format!("#{:02x}{:02x}{:02x}", r, g, b),
        _ => "white".to_string(),
    }
}

/// Black for light backgrounds, white for dark ones.
/// RGB colors use relative luminance; named colors a fixed list.
pub fn get_contrast_text_color(background: Color) -> Color {
    let dark = match background {
        Color::Rgb(r, g, b) => {
            let luminance = (0.299 * f64::from(r) + 0.587 * f64::from(g) + 0.114 * f64::from(b)) / 255.0;
            luminance < 0.5
        }
        Color::Black | Color::Blue | Color::Magenta | Color::Red | Color::DarkGray => true,
        _ => false,
    };
    if dark { Color::White } else { Color::Black }
}

/// Resolved colors of the active theme
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub fg: Color,
    pub bg: Color,
    pub highlight_fg: Color,
    pub highlight_bg: Color,
    pub tab_fg: Color,
    pub tab_bg: Color,
    pub accent: Color,
}

impl Palette {
    pub fn from_theme(theme: &Theme) -> Self {
        let highlight_bg = parse_color(&theme.highlight_bg);
        let tab_bg = parse_color(&theme.tab_bg);
        Self {
            fg: parse_color(&theme.fg),
            bg: parse_color(&theme.bg),
            highlight_fg: parse_color(&theme.highlight_fg),
            highlight_bg,
            tab_fg: get_contrast_text_color(tab_bg),
            tab_bg,
            accent: parse_color(&theme.accent),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::from_theme(&config.get_active_theme())
    }

    pub fn base(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    pub fn highlight(&self) -> Style {
        Style::default()
            .fg(self.highlight_fg)
            .bg(self.highlight_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn muted(&self) -> Style {
        self.base().fg(Color::DarkGray)
    }

    pub fn accent(&self) -> Style {
        self.base().fg(self.accent)
    }

    pub fn priority(&self, priority: Priority) -> Style {
        let color = match priority {
            Priority::High => Color::Red,
            Priority::Medium => Color::Yellow,
            Priority::Low => Color::Green,
        };
        self.base().fg(color)
    }

    pub fn role(&self, role: Role) -> Style {
        match role {
            Role::User => self.base().fg(self.highlight_bg).add_modifier(Modifier::BOLD),
            Role::Assistant => self.accent(),
        }
    }

    pub fn event(&self, kind: EventKind) -> Style {
        match kind {
            EventKind::AiSuggested => self.accent(),
            EventKind::FocusBlock => self.base().fg(Color::Cyan),
            EventKind::Event => self.base(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_named_hex_and_rgb() {
        assert_eq!(parse_color(" Blue "), Color::Blue);
        assert_eq!(parse_color("#ff0080"), Color::Rgb(255, 0, 128));
        assert_eq!(parse_color("#f08"), Color::Rgb(255, 0, 136));
        assert_eq!(parse_color("rgb(1, 2, 3)"), Color::Rgb(1, 2, 3));
        assert_eq!(parse_color("rgb(1, 2)"), Color::White);
        assert_eq!(parse_color("chartreuse"), Color::White);
    }

    #[test]
    fn contrast_follows_brightness() {
        assert_eq!(get_contrast_text_color(Color::Blue), Color::White);
        assert_eq!(get_contrast_text_color(Color::Yellow), Color::Black);
        assert_eq!(get_contrast_text_color(Color::Rgb(250, 250, 250)), Color::Black);
        assert_eq!(get_contrast_text_color(Color::Rgb(10, 10, 40)), Color::White);
    }

    #[test]
    fn display_round_trips_named_colors() {
        assert_eq!(format_color_for_display(&parse_color("lightcyan")), "lightcyan");
        assert_eq!(format_color_for_display(&Color::Rgb(0, 16, 255)), "#0010ff");
    }
}
