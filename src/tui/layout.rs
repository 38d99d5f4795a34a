use ratatui::layout::{Constraint, Direction, Layout as RatLayout, Rect};

pub struct Layout {
    pub inner_area: Rect, // Area inside the outer border
    pub tabs_area: Rect,
    pub header_area: Rect,
    pub main_area: Rect,
    pub side_area: Rect,
    pub input_area: Rect,
    pub status_area: Rect,
}

impl Layout {
    /// Minimum terminal dimensions required for the dashboard
    pub const MIN_WIDTH: u16 = 60;
    pub const MIN_HEIGHT: u16 = 16;
    /// Below this width the side pane is dropped
    pub const SIDE_PANE_MIN_WIDTH: u16 = 90;

    pub fn calculate(size: Rect, input_open: bool) -> Self {
        let width = size.width.max(Self::MIN_WIDTH + 2);
        let height = size.height.max(Self::MIN_HEIGHT + 2);
        let size = Rect::new(size.x, size.y, width, height);

        let inner_area = Rect::new(
            size.x + 1,
            size.y + 1,
            size.width.saturating_sub(2),
            size.height.saturating_sub(2),
        );

        // tabs, greeting + insight, content, input prompt, status
        let vertical = RatLayout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Min(1),
                Constraint::Length(if input_open { 3 } else { 0 }),
                Constraint::Length(1),
            ])
            .split(inner_area);

        let side_width = if inner_area.width >= Self::SIDE_PANE_MIN_WIDTH {
            (inner_area.width * 35) / 100
        } else {
            0
        };
        let horizontal = RatLayout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(1), Constraint::Length(side_width)])
            .split(vertical[2]);

        Self {
            inner_area,
            tabs_area: vertical[0],
            header_area: vertical[1],
            main_area: horizontal[0],
            side_area: horizontal[1],
            input_area: vertical[3],
            status_area: vertical[4],
        }
    }
}
