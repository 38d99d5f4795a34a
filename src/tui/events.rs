use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode, size as terminal_size,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;

use crate::client::Backend;
use crate::config::KeyBindings;
use crate::tui::app::{App, Mode, Prompt, Tab};
use crate::tui::error::TuiError;
use crate::tui::layout::Layout;
use crate::utils::{ParsedKeyBinding, has_primary_modifier, parse_key_binding};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Guard that restores the terminal even on panic
struct TerminalGuard {
    raw_mode_enabled: bool,
    alternate_screen_enabled: bool,
}

impl TerminalGuard {
    fn new() -> Result<Self, TuiError> {
        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen)?;

        Ok(Self {
            raw_mode_enabled: true,
            alternate_screen_enabled: true,
        })
    }

    /// Restore on normal exit; the guard does nothing on drop afterwards
    fn restore(&mut self) -> Result<(), TuiError> {
        if self.raw_mode_enabled {
            disable_raw_mode()?;
            self.raw_mode_enabled = false;
        }
        if self.alternate_screen_enabled {
            execute!(io::stdout(), LeaveAlternateScreen)?;
            self.alternate_screen_enabled = false;
        }
        Ok(())
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        // Already cleaning up, errors are ignored
        if self.raw_mode_enabled {
            let _ = disable_raw_mode();
        }
        if self.alternate_screen_enabled {
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
        }
    }
}

/// Key bindings parsed once at startup
pub struct Bindings {
    quit: ParsedKeyBinding,
    new: ParsedKeyBinding,
    delete: ParsedKeyBinding,
    toggle_task_status: ParsedKeyBinding,
    prioritize: ParsedKeyBinding,
    summarize: ParsedKeyBinding,
    refresh: ParsedKeyBinding,
    help: ParsedKeyBinding,
    list_up: ParsedKeyBinding,
    list_down: ParsedKeyBinding,
    tab_left: ParsedKeyBinding,
    tab_right: ParsedKeyBinding,
}

impl Bindings {
    pub fn parse(keys: &KeyBindings) -> Result<Self, TuiError> {
        let parse = |raw: &str| parse_key_binding(raw).map_err(TuiError::KeyBindingError);
        Ok(Self {
            quit: parse(&keys.quit)?,
            new: parse(&keys.new)?,
            delete: parse(&keys.delete)?,
            toggle_task_status: parse(&keys.toggle_task_status)?,
            prioritize: parse(&keys.prioritize)?,
            summarize: parse(&keys.summarize)?,
            refresh: parse(&keys.refresh)?,
            help: parse(&keys.help)?,
            list_up: parse(&keys.list_up)?,
            list_down: parse(&keys.list_down)?,
            tab_left: parse(&keys.tab_left)?,
            tab_right: parse(&keys.tab_right)?,
        })
    }
}

pub fn run_event_loop<B: Backend>(mut app: App<B>) -> Result<(), TuiError> {
    // Check the size first so the error shows in the normal terminal
    let (width, height) = terminal_size()?;
    let min_width = Layout::MIN_WIDTH + 2;
    let min_height = Layout::MIN_HEIGHT + 2;
    if width < min_width || height < min_height {
        return Err(TuiError::RenderError(format!(
            "Terminal size too small. Current: {}x{}, Minimum required: {}x{}. Please resize your terminal window.",
            width, height, min_width, min_height
        )));
    }

    let bindings = Bindings::parse(&app.config.key_bindings)?;

    let mut guard = TerminalGuard::new()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;

    loop {
        app.tick(Instant::now());

        let size = terminal.size()?;
        let area = Rect::new(0, 0, size.width, size.height);
        terminal.draw(|f| {
            let layout = Layout::calculate(area, app.mode == Mode::Input);
            crate::tui::render::render(f, &mut app, &layout);
        })?;

        if event::poll(POLL_INTERVAL)? {
            match event::read()? {
                // Only Press events; Windows also reports releases
                Event::Key(key_event) if key_event.kind == KeyEventKind::Press => {
                    if handle_key_event(&mut app, &bindings, key_event) {
                        break;
                    }
                }
                // Next draw picks up the new size
                Event::Resize(_, _) => {}
                _ => {}
            }
        }
    }

    guard.restore()?;
    tracing::info!("dashboard closed");
    Ok(())
}

/// Returns true when quit was requested
pub fn handle_key_event<B: Backend>(app: &mut App<B>, bindings: &Bindings, key_event: KeyEvent) -> bool {
    match app.mode {
        Mode::Input => {
            handle_input_mode(app, key_event);
            false
        }
        Mode::ConfirmDelete => {
            handle_delete_confirmation(app, key_event);
            false
        }
        Mode::Help => {
            if key_event.code == KeyCode::Esc || matches_key_event(key_event, &bindings.help) {
                app.mode = Mode::Normal;
            }
            false
        }
        Mode::Normal => handle_normal_mode(app, bindings, key_event),
    }
}

fn handle_input_mode<B: Backend>(app: &mut App<B>, key_event: KeyEvent) {
    match key_event.code {
        KeyCode::Esc => app.close_prompt(),
        KeyCode::Enter => app.submit_input(),
        KeyCode::Backspace => {
            app.input.pop();
        }
        KeyCode::Char(c) if !has_primary_modifier(key_event.modifiers) => app.input.push(c),
        _ => {}
    }
}

fn handle_delete_confirmation<B: Backend>(app: &mut App<B>, key_event: KeyEvent) {
    match key_event.code {
        KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => app.confirm_delete(),
        KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => app.cancel_delete(),
        // Everything else is ignored while the modal is open
        _ => {}
    }
}

fn handle_normal_mode<B: Backend>(app: &mut App<B>, bindings: &Bindings, key_event: KeyEvent) -> bool {
    // Typing on the chat tab starts a message; plain letters are never bindings there
    if app.current_tab == Tab::Chat && !has_primary_modifier(key_event.modifiers) {
        if let KeyCode::Char(c) = key_event.code {
            app.open_prompt(Prompt::Message);
            app.input.push(c);
            return false;
        }
    }

    if matches_key_event(key_event, &bindings.quit) {
        return true;
    }
    if matches_key_event(key_event, &bindings.help) {
        app.mode = Mode::Help;
    } else if matches_key_event(key_event, &bindings.refresh) {
        app.refresh();
    } else if matches_key_event(key_event, &bindings.tab_left) {
        app.switch_tab(app.current_tab.prev());
    } else if matches_key_event(key_event, &bindings.tab_right) || key_event.code == KeyCode::Tab {
        app.switch_tab(app.current_tab.next());
    } else if matches_key_event(key_event, &bindings.list_up) || key_event.code == KeyCode::Up {
        app.move_selection_up();
    } else if matches_key_event(key_event, &bindings.list_down) || key_event.code == KeyCode::Down {
        app.move_selection_down();
    } else if matches_key_event(key_event, &bindings.new) {
        app.open_prompt(app.current_tab.new_prompt());
    } else if matches_key_event(key_event, &bindings.delete) {
        app.request_delete();
    } else if matches_key_event(key_event, &bindings.toggle_task_status) {
        app.toggle_selected();
    } else if matches_key_event(key_event, &bindings.prioritize) && app.current_tab == Tab::Tasks {
        app.prioritize();
    } else if matches_key_event(key_event, &bindings.summarize) {
        app.summarize_selected();
    } else {
        match key_event.code {
            KeyCode::Char('u') if app.current_tab == Tab::Notes => app.open_prompt(Prompt::Document),
            KeyCode::Char(c @ '1'..='5') => {
                let index = c as usize - '1' as usize;
                app.switch_tab(Tab::ALL[index]);
            }
            _ => {}
        }
    }
    false
}

fn matches_key_event(key_event: KeyEvent, binding: &ParsedKeyBinding) -> bool {
    // Ctrl on Windows/Linux, Option/Alt on macOS
    binding.requires_ctrl == has_primary_modifier(key_event.modifiers) && binding.key_code == key_event.code
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{LocalBackend, Store};
    use crate::config::Config;
    use crossterm::event::KeyModifiers;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn app(dir: &std::path::Path) -> App<LocalBackend> {
        let primary = LocalBackend::with_rng(
            crate::client::KeyValueStore::open(dir.join("primary")).unwrap(),
            StdRng::seed_from_u64(7),
        );
        let fallback = LocalBackend::open(dir.join("fallback")).unwrap();
        let store = Store::new(primary, fallback).with_rng(StdRng::seed_from_u64(7));
        App::new(Config::default(), store)
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text<B: Backend>(app: &mut App<B>, bindings: &Bindings, text: &str) {
        for c in text.chars() {
            handle_key_event(app, bindings, press(KeyCode::Char(c)));
        }
    }

    #[test]
    fn default_bindings_parse() {
        assert!(Bindings::parse(&KeyBindings::default()).is_ok());
        let broken = KeyBindings {
            quit: "Hyper+q".to_string(),
            ..KeyBindings::default()
        };
        assert!(matches!(Bindings::parse(&broken), Err(TuiError::KeyBindingError(_))));
    }

    #[test]
    fn new_task_through_the_prompt() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path());
        let bindings = Bindings::parse(&app.config.key_bindings).unwrap();
        let before = app.dashboard.tasks.len();

        handle_key_event(&mut app, &bindings, press(KeyCode::Char('n')));
        assert_eq!(app.mode, Mode::Input);
        type_text(&mut app, &bindings, "Write report !high");
        handle_key_event(&mut app, &bindings, press(KeyCode::Enter));

        assert_eq!(app.mode, Mode::Normal);
        assert_eq!(app.dashboard.tasks.len(), before + 1);
        assert!(app.dashboard.tasks.iter().any(|t| t.title == "Write report"));
    }

    #[test]
    fn delete_needs_confirmation() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path());
        let bindings = Bindings::parse(&app.config.key_bindings).unwrap();
        let before = app.dashboard.tasks.len();
        assert!(before > 0);

        handle_key_event(&mut app, &bindings, press(KeyCode::Char('d')));
        assert_eq!(app.mode, Mode::ConfirmDelete);
        handle_key_event(&mut app, &bindings, press(KeyCode::Esc));
        assert_eq!(app.dashboard.tasks.len(), before);

        handle_key_event(&mut app, &bindings, press(KeyCode::Char('d')));
        handle_key_event(&mut app, &bindings, press(KeyCode::Char('y')));
        assert_eq!(app.mode, Mode::Normal);
        assert_eq!(app.dashboard.tasks.len(), before - 1);
    }

    #[test]
    fn typing_on_chat_starts_a_message() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path());
        let bindings = Bindings::parse(&app.config.key_bindings).unwrap();

        handle_key_event(&mut app, &bindings, press(KeyCode::Char('3')));
        assert_eq!(app.current_tab, Tab::Chat);
        type_text(&mut app, &bindings, "hello");
        assert_eq!(app.mode, Mode::Input);
        assert_eq!(app.input, "hello");
        handle_key_event(&mut app, &bindings, press(KeyCode::Enter));

        assert_eq!(app.dashboard.chat.len(), 2);
    }

    #[test]
    fn chat_letters_are_never_shortcuts() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path());
        let bindings = Bindings::parse(&app.config.key_bindings).unwrap();
        app.switch_tab(Tab::Chat);

        assert!(!handle_key_event(&mut app, &bindings, press(KeyCode::Char('q'))));
        type_text(&mut app, &bindings, "uit");
        assert_eq!(app.mode, Mode::Input);
        assert_eq!(app.input, "quit");
        handle_key_event(&mut app, &bindings, press(KeyCode::Esc));

        type_text(&mut app, &bindings, "need to plan");
        assert_eq!(app.input, "need to plan");
        handle_key_event(&mut app, &bindings, press(KeyCode::Esc));

        // Keys outside the letter range still navigate
        handle_key_event(&mut app, &bindings, press(KeyCode::Tab));
        assert_eq!(app.current_tab, Tab::Calendar);
    }

    #[test]
    fn quit_only_in_normal_mode() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path());
        let bindings = Bindings::parse(&app.config.key_bindings).unwrap();

        handle_key_event(&mut app, &bindings, press(KeyCode::Char('n')));
        assert!(!handle_key_event(&mut app, &bindings, press(KeyCode::Char('q'))));
        handle_key_event(&mut app, &bindings, press(KeyCode::Esc));
        assert!(handle_key_event(&mut app, &bindings, press(KeyCode::Char('q'))));
    }
}
