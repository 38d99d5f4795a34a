use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::tui::app::{PendingDelete, Tab};
use crate::tui::widgets::color::Palette;
use crate::tui::widgets::popup_area;

fn kind(tab: Tab) -> &'static str {
    match tab {
        Tab::Tasks => "task",
        Tab::Notes => "note",
        Tab::Calendar => "event",
        Tab::Chat | Tab::Wellness => "item",
    }
}

pub fn render_confirm_delete(f: &mut Frame, area: Rect, pending: &PendingDelete, palette: &Palette) {
    let popup_area = popup_area(area, 50, 30);
    f.render_widget(Clear, popup_area);

    let lines = vec![
        Line::from(Span::styled(
            format!("Delete this {}?", kind(pending.tab)),
            palette.base(),
        )),
        Line::default(),
        Line::from(Span::styled(pending.label.clone(), palette.accent())),
        Line::default(),
        Line::from(Span::styled("y / Enter: Delete    n / Esc: Cancel", palette.muted())),
    ];

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Confirm Delete")
                .title_alignment(Alignment::Center)
                .style(palette.base()),
        )
        .style(palette.base())
        .wrap(Wrap { trim: true })
        .alignment(Alignment::Center);

    f.render_widget(paragraph, popup_area);
}
