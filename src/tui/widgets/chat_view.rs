use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::client::view::ChatBubble;
use crate::models::Role;
use crate::tui::widgets::color::Palette;

fn speaker(role: Role) -> &'static str {
    match role {
        Role::User => "You",
        Role::Assistant => "AI Assistant",
    }
}

/// Conversation, pinned to the newest message
pub fn render_chat(f: &mut Frame, area: Rect, bubbles: &[ChatBubble], palette: &Palette) {
    let mut lines: Vec<Line> = Vec::new();
    for bubble in bubbles {
        lines.push(Line::from(Span::styled(
            format!("{}:", speaker(bubble.role)),
            palette.role(bubble.role),
        )));
        lines.push(Line::from(Span::styled(bubble.text.clone(), palette.base())));
        lines.push(Line::default());
    }

    // Rough scroll: wrapped lines are estimated from the inner width
    let inner_width = area.width.saturating_sub(2).max(1) as usize;
    let inner_height = area.height.saturating_sub(2) as usize;
    let total: usize = lines
        .iter()
        .map(|line| line.width().div_ceil(inner_width).max(1))
        .sum();
    let scroll = total.saturating_sub(inner_height).min(u16::MAX as usize) as u16;

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("AI Assistant")
                .style(palette.base()),
        )
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));

    f.render_widget(paragraph, area);
}
