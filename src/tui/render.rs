use ratatui::Frame;
use ratatui::layout::Alignment;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::client::Backend;
use crate::tui::app::{App, Mode, Tab};
use crate::tui::layout::Layout;
use crate::tui::widgets::{
    chat_view::render_chat, color::Palette, confirm_delete::render_confirm_delete,
    event_list::render_event_list, help::render_help, input::render_input,
    note_list::render_note_list, status_bar::render_status_bar, summary::render_summary,
    tabs::render_tabs, task_list::render_task_list, wellness_view::render_wellness,
};
use crate::utils::format_key_binding_for_display as key;

pub fn render<B: Backend>(f: &mut Frame, app: &mut App<B>, layout: &Layout) {
    let palette = Palette::from_config(&app.config);

    let outer_block = Block::default()
        .borders(Borders::ALL)
        .title("LifeOS")
        .title_alignment(Alignment::Center)
        .style(palette.base());
    f.render_widget(outer_block, f.area());

    render_tabs(f, layout.tabs_area, app.current_tab, &palette);

    let header = Paragraph::new(vec![
        Line::from(vec![
            Span::styled(app.dashboard.greeting.clone(), palette.highlight()),
            Span::styled(format!("   Tasks {}", app.dashboard.progress), palette.muted()),
        ]),
        Line::from(Span::styled(app.dashboard.insight.clone(), palette.accent())),
    ])
    .style(palette.base())
    .wrap(Wrap { trim: true });
    f.render_widget(header, layout.header_area);

    match app.current_tab {
        Tab::Tasks => render_task_list(
            f,
            layout.main_area,
            &app.dashboard.tasks,
            &app.dashboard.progress,
            &mut app.list_state,
            &palette,
        ),
        Tab::Notes => render_note_list(
            f,
            layout.main_area,
            &app.dashboard.notes,
            &mut app.list_state,
            &palette,
        ),
        Tab::Chat => render_chat(f, layout.main_area, &app.dashboard.chat, &palette),
        Tab::Calendar => render_event_list(
            f,
            layout.main_area,
            &app.dashboard.schedule,
            &mut app.list_state,
            &palette,
        ),
        Tab::Wellness => render_wellness(
            f,
            layout.main_area,
            &app.dashboard.wellness,
            &app.store.state().wellness,
            &palette,
        ),
    }

    render_summary(f, layout.side_area, &app.dashboard, &palette);

    if app.mode == Mode::Input {
        render_input(f, layout.input_area, app.prompt, &app.input, &palette);
    }

    let hints = key_hints(app);
    render_status_bar(
        f,
        layout.status_area,
        app.dashboard.notice.as_ref(),
        &hints,
        app.dashboard.offline,
        &palette,
    );

    // Overlays go last
    match app.mode {
        Mode::Help => render_help(f, layout.inner_area, &app.config, &palette),
        Mode::ConfirmDelete => {
            if let Some(ref pending) = app.pending_delete {
                render_confirm_delete(f, layout.inner_area, pending, &palette);
            }
        }
        Mode::Normal | Mode::Input => {}
    }
}

fn key_hints<B: Backend>(app: &App<B>) -> Vec<String> {
    let k = &app.config.key_bindings;
    if app.mode == Mode::Input {
        return vec!["Enter: Submit".to_string(), "Esc: Cancel".to_string()];
    }

    let mut hints = vec![format!("{}: New", key(&k.new))];
    match app.current_tab {
        Tab::Tasks => {
            hints.push(format!("{}: Toggle", key(&k.toggle_task_status)));
            hints.push(format!("{}: Prioritize", key(&k.prioritize)));
            hints.push(format!("{}: Delete", key(&k.delete)));
        }
        Tab::Notes => {
            hints.push("u: Upload".to_string());
            hints.push(format!("{}: Summarize", key(&k.summarize)));
            hints.push(format!("{}: Delete", key(&k.delete)));
        }
        Tab::Calendar => hints.push(format!("{}: Delete", key(&k.delete))),
        Tab::Chat | Tab::Wellness => {}
    }
    hints.push(format!("{}: Refresh", key(&k.refresh)));
    hints.push(format!("{}: Help", key(&k.help)));
    hints.push(format!("{}: Quit", key(&k.quit)));
    hints
}
