use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::config::Config;
use crate::tui::widgets::color::Palette;
use crate::tui::widgets::popup_area;
use crate::utils::format_key_binding_for_display as key;

pub fn render_help(f: &mut Frame, area: Rect, config: &Config, palette: &Palette) {
    let popup_area = popup_area(area, 60, 70);
    f.render_widget(Clear, popup_area);

    let paragraph = Paragraph::new(build_help_text(config))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Help - Key Bindings")
                .title_alignment(Alignment::Center)
                .style(palette.base()),
        )
        .style(palette.base())
        .wrap(Wrap { trim: true });

    f.render_widget(paragraph, popup_area);
}

pub fn build_help_text(config: &Config) -> String {
    let k = &config.key_bindings;
    let mut text = String::new();

    text.push_str("Navigation:\n");
    text.push_str(&format!("  {} / {}: Switch tabs\n", key(&k.tab_left), key(&k.tab_right)));
    text.push_str("  1-5: Jump to tab\n");
    text.push_str(&format!("  {} / {}: Move up/down\n", key(&k.list_up), key(&k.list_down)));
    text.push('\n');

    text.push_str("Actions:\n");
    text.push_str(&format!("  {}: New task, note, message, event or mood\n", key(&k.new)));
    text.push_str(&format!("  {}: Delete selected item\n", key(&k.delete)));
    text.push_str(&format!("  {}: Toggle task status (Tasks)\n", key(&k.toggle_task_status)));
    text.push_str(&format!("  {}: Prioritize tasks with AI (Tasks)\n", key(&k.prioritize)));
    text.push_str(&format!("  {}: Summarize note (Notes)\n", key(&k.summarize)));
    text.push_str("  u: Upload document (Notes)\n");
    text.push_str(&format!("  {}: Refresh now\n", key(&k.refresh)));
    text.push('\n');

    text.push_str("Input:\n");
    text.push_str("  Enter: Submit\n");
    text.push_str("  Esc: Cancel\n");
    text.push('\n');

    text.push_str("General:\n");
    text.push_str(&format!("  {}: Quit\n", key(&k.quit)));
    text.push_str(&format!("  {}: Show/hide help\n", key(&k.help)));

    text
}
