use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::client::view::{Dashboard, EMPTY_EVENTS, EMPTY_QUICK_NOTES};
use crate::tui::widgets::color::Palette;
use crate::tui::widgets::event_list::event_line;
use crate::tui::widgets::truncate;

/// Side pane: upcoming events, quick notes and wellness at a glance
pub fn render_summary(f: &mut Frame, area: Rect, dashboard: &Dashboard, palette: &Palette) {
    if area.width == 0 {
        return;
    }
    let max_width = area.width.saturating_sub(2) as usize;
    let mut lines: Vec<Line> = vec![Line::from(Span::styled("Upcoming", palette.accent()))];

    if dashboard.events.is_empty() {
        lines.push(Line::from(Span::styled(EMPTY_EVENTS, palette.muted())));
    } else {
        lines.extend(dashboard.events.iter().map(|row| event_line(row, max_width, palette)));
    }

    lines.push(Line::default());
    lines.push(Line::from(vec![
        Span::styled("Quick notes  ", palette.accent()),
        Span::styled(dashboard.notes_today.clone(), palette.muted()),
    ]));
    if dashboard.quick_notes.is_empty() {
        lines.push(Line::from(Span::styled(EMPTY_QUICK_NOTES, palette.muted())));
    }
    for note in &dashboard.quick_notes {
        lines.push(Line::from(Span::styled(truncate(&note.title, max_width), palette.base())));
        lines.push(Line::from(Span::styled(
            truncate(&format!("  {}", note.preview), max_width),
            palette.muted(),
        )));
    }

    lines.push(Line::default());
    lines.push(Line::from(Span::styled("Wellness", palette.accent())));
    lines.push(Line::from(Span::styled(
        format!(
            "{} {}   Focus {}%",
            dashboard.wellness.mood_icon, dashboard.wellness.mood_label, dashboard.wellness.focus
        ),
        palette.base(),
    )));

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Today").style(palette.base()))
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}
