use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::Paragraph;

use crate::client::NoticeLevel;
use crate::tui::widgets::color::Palette;
use crate::tui::widgets::truncate;

const SEPARATOR: &str = " • ";

/// Fit as many hints as the width allows, ending in "..." when some are cut
pub fn fit_hints(key_hints: &[String], max_width: usize) -> String {
    let mut text = String::new();
    for hint in key_hints {
        let extra = if text.is_empty() {
            hint.chars().count()
        } else {
            SEPARATOR.chars().count() + hint.chars().count()
        };
        if text.chars().count() + extra > max_width {
            if text.is_empty() {
                return truncate(hint, max_width);
            }
            if text.chars().count() + 3 > max_width {
                text = text.chars().take(max_width.saturating_sub(3)).collect();
            }
            text.push_str("...");
            return text;
        }
        if !text.is_empty() {
            text.push_str(SEPARATOR);
        }
        text.push_str(hint);
    }
    text
}

pub fn render_status_bar(
    f: &mut Frame,
    area: Rect,
    notice: Option<&(String, NoticeLevel)>,
    key_hints: &[String],
    offline: bool,
    palette: &Palette,
) {
    let max_width = area.width as usize;
    let (content, style) = match notice {
        Some((message, NoticeLevel::Info)) => (truncate(message, max_width), palette.highlight()),
        Some((message, NoticeLevel::Error)) => (
            truncate(message, max_width),
            Style::default().fg(Color::White).bg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        None => {
            let prefix = if offline { "[offline] " } else { "" };
            let hints = fit_hints(key_hints, max_width.saturating_sub(prefix.len()));
            (format!("{}{}", prefix, hints), palette.base())
        }
    };

    f.render_widget(Paragraph::new(content).style(style), area);
}
