use std::time::Instant;

use chrono::{DateTime, Duration, Local, NaiveDateTime, TimeZone, Utc};
use ratatui::widgets::ListState;

use crate::client::view::{self, Dashboard};
use crate::client::{Backend, ClientError, NoticeLevel, Region, Store};
use crate::config::Config;
use crate::models::{EventDraft, EventKind, NoteDraft, Priority, TaskDraft, WellnessDraft};
use crate::utils::parse_date;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Tasks,
    Notes,
    Chat,
    Calendar,
    Wellness,
}

impl Tab {
    pub const ALL: [Tab; 5] = [Tab::Tasks, Tab::Notes, Tab::Chat, Tab::Calendar, Tab::Wellness];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Tasks => "Tasks",
            Tab::Notes => "Notes",
            Tab::Chat => "Chat",
            Tab::Calendar => "Calendar",
            Tab::Wellness => "Wellness",
        }
    }

    pub fn index(self) -> usize {
        Tab::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }

    pub fn next(self) -> Tab {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }

    pub fn prev(self) -> Tab {
        Tab::ALL[(self.index() + Tab::ALL.len() - 1) % Tab::ALL.len()]
    }

    /// Prompt opened by the "new" key on this tab
    pub fn new_prompt(self) -> Prompt {
        match self {
            Tab::Tasks => Prompt::Task,
            Tab::Notes => Prompt::Note,
            Tab::Chat => Prompt::Message,
            Tab::Calendar => Prompt::Event,
            Tab::Wellness => Prompt::Mood,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Input,
    ConfirmDelete,
    Help,
}

/// Single-line input prompts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt {
    Task,
    Note,
    Document,
    Message,
    Event,
    Mood,
}

impl Prompt {
    pub fn title(self) -> &'static str {
        match self {
            Prompt::Task => "New task",
            Prompt::Note => "New note",
            Prompt::Document => "Upload document",
            Prompt::Message => "Message",
            Prompt::Event => "New event",
            Prompt::Mood => "Log mood",
        }
    }

    pub fn hint(self) -> &'static str {
        match self {
            Prompt::Task => "Title  [!high|!medium|!low]  [due:YYYY-MM-DD]",
            Prompt::Note => "Title | content",
            Prompt::Document => "File name, e.g. report.pdf",
            Prompt::Message => "Ask anything about your tasks or schedule",
            Prompt::Event => "YYYY-MM-DD HH:MM Title  [focus|ai]",
            Prompt::Mood => "Mood 1-5  [focus 0-100]",
        }
    }
}

/// Record waiting for delete confirmation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDelete {
    pub tab: Tab,
    pub id: String,
    pub label: String,
}

pub struct App<B: Backend> {
    pub config: Config,
    pub store: Store<B>,
    pub dashboard: Dashboard,
    pub current_tab: Tab,
    pub mode: Mode,
    pub prompt: Prompt,
    pub input: String,
    pub pending_delete: Option<PendingDelete>,
    pub list_state: ListState,
}

impl<B: Backend> App<B> {
    pub fn new(config: Config, store: Store<B>) -> Self {
        let dashboard = view::render(store.state(), &Local::now());
        let mut app = Self {
            config,
            store,
            dashboard,
            current_tab: Tab::Tasks,
            mode: Mode::Normal,
            prompt: Prompt::Task,
            input: String::new(),
            pending_delete: None,
            list_state: ListState::default(),
        };
        app.load();
        app
    }

    pub fn load(&mut self) {
        self.store.load();
        self.rebuild();
    }

    /// Re-derive the dashboard from the store
    pub fn rebuild(&mut self) {
        self.store.take_changes();
        self.dashboard = view::render(self.store.state(), &Local::now());
        self.clamp_selection();
    }

    /// Expire notices and run the periodic refresh. Returns true when the
    /// dashboard was rebuilt.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.store.expire_notice(now);
        if self.store.refresh_due(now) {
            self.store.refresh();
        }
        let changed = !self.store.take_changes().is_empty();
        if changed {
            self.dashboard = view::render(self.store.state(), &Local::now());
            self.clamp_selection();
        }
        changed
    }

    fn run(&mut self, result: Result<Region, ClientError>) {
        if let Err(err) = result {
            tracing::warn!(error = %err, "operation failed");
            self.store.notify(err.to_string(), NoticeLevel::Error);
        }
        self.rebuild();
    }

    fn fail(&mut self, message: impl Into<String>) {
        self.store.notify(message, NoticeLevel::Error);
        self.rebuild();
    }

    // ===== Selection =====

    pub fn item_count(&self) -> usize {
        match self.current_tab {
            Tab::Tasks => self.dashboard.tasks.len(),
            Tab::Notes => self.dashboard.notes.len(),
            Tab::Calendar => self.dashboard.schedule.len(),
            Tab::Chat | Tab::Wellness => 0,
        }
    }

    fn clamp_selection(&mut self) {
        let count = self.item_count();
        let selected = match (count, self.list_state.selected()) {
            (0, _) => None,
            (_, None) => Some(0),
            (n, Some(i)) => Some(i.min(n - 1)),
        };
        self.list_state.select(selected);
    }

    pub fn move_selection_up(&mut self) {
        if let Some(i) = self.list_state.selected() {
            self.list_state.select(Some(i.saturating_sub(1)));
        }
    }

    pub fn move_selection_down(&mut self) {
        let count = self.item_count();
        if let Some(i) = self.list_state.selected() {
            if i + 1 < count {
                self.list_state.select(Some(i + 1));
            }
        }
    }

    pub fn switch_tab(&mut self, tab: Tab) {
        if self.current_tab != tab {
            self.current_tab = tab;
            self.list_state = ListState::default();
            self.clamp_selection();
        }
    }

    /// Id and display label of the highlighted record
    pub fn selected(&self) -> Option<(String, String)> {
        let i = self.list_state.selected()?;
        match self.current_tab {
            Tab::Tasks => self.dashboard.tasks.get(i).map(|t| (t.id.clone(), t.title.clone())),
            Tab::Notes => self.dashboard.notes.get(i).map(|n| (n.id.clone(), n.title.clone())),
            Tab::Calendar => self
                .dashboard
                .schedule
                .get(i)
                .map(|e| (e.id.clone(), e.title.clone())),
            Tab::Chat | Tab::Wellness => None,
        }
    }

    // ===== Actions =====

    pub fn toggle_selected(&mut self) {
        if self.current_tab != Tab::Tasks {
            return;
        }
        if let Some((id, _)) = self.selected() {
            let result = self.store.toggle_task(&id);
            self.run(result);
        }
    }

    pub fn request_delete(&mut self) {
        if let Some((id, label)) = self.selected() {
            self.pending_delete = Some(PendingDelete {
                tab: self.current_tab,
                id,
                label,
            });
            self.mode = Mode::ConfirmDelete;
        }
    }

    pub fn confirm_delete(&mut self) {
        self.mode = Mode::Normal;
        let Some(pending) = self.pending_delete.take() else {
            return;
        };
        let result = match pending.tab {
            Tab::Tasks => self.store.delete_task(&pending.id),
            Tab::Notes => self.store.delete_note(&pending.id),
            Tab::Calendar => self.store.delete_event(&pending.id),
            Tab::Chat | Tab::Wellness => return,
        };
        self.run(result);
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
        self.mode = Mode::Normal;
    }

    pub fn prioritize(&mut self) {
        let result = self.store.prioritize_tasks();
        self.run(result);
    }

    pub fn summarize_selected(&mut self) {
        if self.current_tab != Tab::Notes {
            return;
        }
        if let Some((id, _)) = self.selected() {
            let result = self.store.summarize_note(&id);
            self.run(result);
        }
    }

    pub fn refresh(&mut self) {
        self.store.refresh();
        self.store.notify("Dashboard refreshed", NoticeLevel::Info);
        self.rebuild();
    }

    // ===== Input prompt =====

    pub fn open_prompt(&mut self, prompt: Prompt) {
        self.prompt = prompt;
        self.input.clear();
        self.mode = Mode::Input;
    }

    pub fn close_prompt(&mut self) {
        self.input.clear();
        self.mode = Mode::Normal;
    }

    pub fn submit_input(&mut self) {
        let raw = std::mem::take(&mut self.input);
        self.mode = Mode::Normal;
        if raw.trim().is_empty() {
            return;
        }

        let result = match self.prompt {
            Prompt::Task => self.store.add_task(parse_task_input(&raw)),
            Prompt::Note => self.store.add_note(parse_note_input(&raw)),
            Prompt::Document => self.store.upload_document(&raw),
            Prompt::Message => self.store.send_message(&raw),
            Prompt::Event => match parse_event_input(&raw, &Local) {
                Ok(draft) => self.store.add_event(draft),
                Err(message) => return self.fail(message),
            },
            Prompt::Mood => match parse_mood_input(&raw) {
                Ok(draft) => self.store.log_mood(draft),
                Err(message) => return self.fail(message),
            },
        };
        self.run(result);
    }
}

/// `Title [!high|!medium|!low] [due:YYYY-MM-DD]`; unknown markers stay in the title
pub fn parse_task_input(raw: &str) -> TaskDraft {
    let mut draft = TaskDraft::default();
    let mut words = Vec::new();
    for word in raw.split_whitespace() {
        if let Some(priority) = word.strip_prefix('!').and_then(Priority::parse) {
            draft.priority = priority;
        } else if let Some(date) = word.strip_prefix("due:").and_then(|d| parse_date(d).ok()) {
            draft.due_date = Some(date);
        } else {
            words.push(word);
        }
    }
    draft.title = words.join(" ");
    draft
}

/// `Title | content`; without a separator the text is both title and content
pub fn parse_note_input(raw: &str) -> NoteDraft {
    match raw.split_once('|') {
        Some((title, content)) => NoteDraft::new(title.trim(), content.trim()),
        None => NoteDraft::new(raw.trim(), raw.trim()),
    }
}

/// `YYYY-MM-DD HH:MM Title [focus|ai]` in the given zone, one hour long
pub fn parse_event_input<Tz: TimeZone>(raw: &str, tz: &Tz) -> Result<EventDraft, String> {
    let mut parts = raw.split_whitespace();
    let (Some(date), Some(time)) = (parts.next(), parts.next()) else {
        return Err("Expected: YYYY-MM-DD HH:MM Title".to_string());
    };
    let naive = NaiveDateTime::parse_from_str(&format!("{} {}", date, time), "%Y-%m-%d %H:%M")
        .map_err(|_| format!("Invalid date or time: {} {}", date, time))?;
    let start: DateTime<Utc> = tz
        .from_local_datetime(&naive)
        .earliest()
        .ok_or_else(|| format!("Time does not exist locally: {} {}", date, time))?
        .with_timezone(&Utc);

    let mut kind = EventKind::Event;
    let mut words = Vec::new();
    for word in parts {
        match word {
            "focus" => kind = EventKind::FocusBlock,
            "ai" => kind = EventKind::AiSuggested,
            _ => words.push(word),
        }
    }

    Ok(EventDraft {
        title: words.join(" "),
        description: None,
        start_time: start,
        end_time: start + Duration::hours(1),
        kind,
    })
}

/// `MOOD [FOCUS]`
pub fn parse_mood_input(raw: &str) -> Result<WellnessDraft, String> {
    let mut parts = raw.split_whitespace();
    let mood = parts
        .next()
        .and_then(|m| m.parse::<u8>().ok())
        .ok_or_else(|| "Mood must be a number from 1 to 5".to_string())?;
    let focus_score = match parts.next() {
        Some(f) => Some(
            f.parse::<u8>()
                .map_err(|_| "Focus must be a number from 0 to 100".to_string())?,
        ),
        None => None,
    };
    Ok(WellnessDraft {
        mood,
        focus_score,
        notes: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};
    use pretty_assertions::assert_eq;

    #[test]
    fn tabs_wrap_both_ways() {
        assert_eq!(Tab::Tasks.prev(), Tab::Wellness);
        assert_eq!(Tab::Wellness.next(), Tab::Tasks);
        assert_eq!(Tab::Chat.new_prompt(), Prompt::Message);
    }

    #[test]
    fn task_input_extracts_markers() {
        let draft = parse_task_input("Ship release !high due:2030-03-01 notes");
        assert_eq!(draft.title, "Ship release notes");
        assert_eq!(draft.priority, Priority::High);
        assert_eq!(draft.due_date, NaiveDate::from_ymd_opt(2030, 3, 1));

        let plain = parse_task_input("Buy milk !urgent");
        assert_eq!(plain.title, "Buy milk !urgent");
        assert_eq!(plain.priority, Priority::Medium);
    }

    #[test]
    fn note_input_splits_on_bar() {
        let draft = parse_note_input("Ideas | try the new layout");
        assert_eq!(draft.title, "Ideas");
        assert_eq!(draft.content, "try the new layout");
        assert_eq!(parse_note_input("Just a thought").content, "Just a thought");
    }

    #[test]
    fn event_input_is_one_hour_in_the_zone() {
        let draft = parse_event_input("2030-01-05 14:30 Deep work focus", &Utc).unwrap();
        assert_eq!(draft.title, "Deep work");
        assert_eq!(draft.kind, EventKind::FocusBlock);
        assert_eq!(draft.start_time.hour(), 14);
        assert_eq!(draft.end_time - draft.start_time, Duration::hours(1));

        assert!(parse_event_input("tomorrow lunch", &Utc).is_err());
        assert!(parse_event_input("2030-01-05", &Utc).is_err());
    }

    #[test]
    fn mood_input_parses_optional_focus() {
        let draft = parse_mood_input("4 80").unwrap();
        assert_eq!(draft.mood, 4);
        assert_eq!(draft.focus_score, Some(80));
        assert_eq!(parse_mood_input("3").unwrap().focus_score, None);
        assert!(parse_mood_input("great").is_err());
        assert!(parse_mood_input("3 lots").is_err());
    }
}
