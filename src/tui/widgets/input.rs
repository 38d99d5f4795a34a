use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::tui::app::Prompt;
use crate::tui::widgets::color::Palette;

/// One-line prompt with the cursor at the end of the text
pub fn render_input(f: &mut Frame, area: Rect, prompt: Prompt, text: &str, palette: &Palette) {
    if area.height < 3 {
        return;
    }
    let inner_width = area.width.saturating_sub(2) as usize;
    let len = text.chars().count();
    // Keep the tail visible once the text outgrows the box
    let visible: String = text.chars().skip(len.saturating_sub(inner_width.saturating_sub(1))).collect();

    let paragraph = Paragraph::new(visible.clone()).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("{}  ({})", prompt.title(), prompt.hint()))
            .style(palette.highlight()),
    );
    f.render_widget(paragraph, area);

    let cursor_x = area.x + 1 + visible.chars().count() as u16;
    f.set_cursor_position(Position::new(cursor_x, area.y + 1));
}
