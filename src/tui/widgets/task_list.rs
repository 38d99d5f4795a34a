use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};

use crate::client::view::{EMPTY_TASKS, TaskRow};
use crate::tui::widgets::color::Palette;
use crate::tui::widgets::truncate;

pub fn render_task_list(
    f: &mut Frame,
    area: Rect,
    rows: &[TaskRow],
    progress: &str,
    list_state: &mut ListState,
    palette: &Palette,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("Tasks ({})", progress))
        .style(palette.base());

    if rows.is_empty() {
        let paragraph = Paragraph::new(EMPTY_TASKS)
            .block(block)
            .style(palette.muted())
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
        return;
    }

    // 2 for borders, 2 for the highlight symbol
    let max_width = area.width.saturating_sub(4) as usize;

    let items: Vec<ListItem> = rows
        .iter()
        .map(|row| {
            let check = if row.done { "✓" } else { "○" };
            let due = row
                .due
                .as_ref()
                .map(|d| format!(" [{}]", d))
                .unwrap_or_default();
            let title_style = if row.done { palette.muted() } else { palette.base() };

            let mut lines = vec![Line::from(vec![
                Span::styled(format!("{} ", check), palette.base()),
                Span::styled(format!("{} ", row.marker), palette.priority(row.priority)),
                Span::styled(truncate(&format!("{}{}", row.title, due), max_width.saturating_sub(5)), title_style),
            ])];
            if let Some(ref suggestion) = row.suggestion {
                lines.push(Line::from(Span::styled(
                    truncate(&format!("    AI: {}", suggestion), max_width),
                    palette.accent(),
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
