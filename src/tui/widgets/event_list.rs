use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};

use crate::client::view::{EMPTY_EVENTS, EventRow};
use crate::tui::widgets::color::Palette;
use crate::tui::widgets::truncate;

pub fn event_line<'a>(row: &EventRow, max_width: usize, palette: &Palette) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("{} ", row.icon), palette.base()),
        Span::styled(format!("{:<12} {:>8}  ", row.day, row.time), palette.muted()),
        Span::styled(truncate(&row.title, max_width.saturating_sub(26)), palette.event(row.kind)),
    ])
}

pub fn render_event_list(
    f: &mut Frame,
    area: Rect,
    rows: &[EventRow],
    list_state: &mut ListState,
    palette: &Palette,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Schedule")
        .style(palette.base());

    if rows.is_empty() {
        let paragraph = Paragraph::new(EMPTY_EVENTS)
            .block(block)
            .style(palette.muted())
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
        return;
    }

    let max_width = area.width.saturating_sub(4) as usize;
    let items: Vec<ListItem> = rows
        .iter()
        .map(|row| ListItem::new(event_line(row, max_width, palette)))
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(palette.highlight())
        .highlight_symbol("> ");

    f.render_stateful_widget(list, area, list_state);
}
