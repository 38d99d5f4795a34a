use chrono::Local;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, List, ListItem, Paragraph};

use crate::client::view::WellnessSummary;
use crate::models::WellnessEntry;
use crate::tui::widgets::color::Palette;

pub fn render_wellness(
    f: &mut Frame,
    area: Rect,
    summary: &WellnessSummary,
    entries: &[WellnessEntry],
    palette: &Palette,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(3), Constraint::Min(1)])
        .split(area);

    let mood = Paragraph::new(Line::from(vec![
        Span::styled("Mood: ", palette.muted()),
        Span::styled(format!("{} {}", summary.mood_icon, summary.mood_label), palette.base()),
    ]))
    .block(Block::default().borders(Borders::ALL).title("Wellness").style(palette.base()));
    f.render_widget(mood, chunks[0]);

    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title("Focus").style(palette.base()))
        .gauge_style(palette.accent())
        .percent(summary.focus.min(100) as u16)
        .label(format!("{}%", summary.focus));
    f.render_widget(gauge, chunks[1]);

    let items: Vec<ListItem> = entries
        .iter()
        .map(|entry| {
            let focus = entry
                .focus_score
                .map(|s| format!("focus {}%", s))
                .unwrap_or_else(|| "focus -".to_string());
            let notes = entry.notes.as_deref().unwrap_or_default();
            ListItem::new(Line::from(vec![
                Span::styled(
                    entry.created_at.with_timezone(&Local).format("%b %-d %H:%M  ").to_string(),
                    palette.muted(),
                ),
                Span::styled(format!("mood {}/5  {}  {}", entry.mood, focus, notes), palette.base()),
            ]))
        })
        .collect();
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("Recent check-ins ({})", summary.entries))
            .style(palette.base()),
    );
    f.render_widget(list, chunks[2]);
}
