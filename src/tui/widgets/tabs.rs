use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Tabs;

use crate::tui::app::Tab;
use crate::tui::widgets::color::Palette;

pub fn render_tabs(f: &mut Frame, area: Rect, current_tab: Tab, palette: &Palette) {
    let tab_style = Style::default().fg(palette.tab_fg).bg(palette.tab_bg);

    // Padded background on each title makes it read as a box
    let titles: Vec<Line> = Tab::ALL
        .iter()
        .map(|tab| {
            Line::from(vec![
                Span::styled("  ", tab_style),
                Span::styled(tab.title(), tab_style),
                Span::styled("  ", tab_style),
            ])
        })
        .collect();

    let tabs = Tabs::new(titles)
        .select(current_tab.index())
        .style(palette.base())
        .highlight_style(palette.highlight())
        .divider("  ")
        .padding("", "");

    f.render_widget(tabs, area);
}
