use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};

use crate::client::view::{EMPTY_NOTES, NoteCard};
use crate::tui::widgets::color::Palette;
use crate::tui::widgets::truncate;

pub fn render_note_list(
    f: &mut Frame,
    area: Rect,
    cards: &[NoteCard],
    list_state: &mut ListState,
    palette: &Palette,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("Documents & Notes ({})", cards.len()))
        .style(palette.base());

    if cards.is_empty() {
        let paragraph = Paragraph::new(EMPTY_NOTES)
            .block(block)
            .style(palette.muted())
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
        return;
    }

    let max_width = area.width.saturating_sub(4) as usize;

    let items: Vec<ListItem> = cards
        .iter()
        .map(|card| {
            let mut lines = vec![Line::from(vec![
                Span::styled(format!("{} ", card.icon), palette.base()),
                Span::styled(truncate(&card.title, max_width.saturating_sub(16)), palette.base()),
                Span::styled(format!("  {}", card.date), palette.muted()),
            ])];
            if let Some(ref summary) = card.summary {
                lines.push(Line::from(Span::styled(
                    truncate(&format!("   {}", summary), max_width),
                    palette.accent(),
                )));
            }
            if !card.tags.is_empty() {
                let tags = card
                    .tags
                    .iter()
                    .map(|t| format!("[{}]", t))
                    .collect::<Vec<_>>()
                    .join(" ");
                lines.push(Line::from(Span::styled(
                    truncate(&format!("   {}", tags), max_width),
                    palette.muted(),
                )));
            }
            ListItem::new(lines)
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(palette.highlight())
        .highlight_symbol("> ");

    f.render_stateful_widget(list, area, list_state);
}
