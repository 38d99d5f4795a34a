//! Pure projection of [`DashboardState`] into display-ready rows.
//!
//! Nothing here touches a terminal; the TUI draws whatever [`render`] returns.

use chrono::{DateTime, Duration, TimeZone, Timelike};

use super::store::{DashboardState, NoticeLevel};
use crate::insights::average_focus;
use crate::models::{CalendarEvent, EventKind, Note, Priority, Role, Task};

/// Focus value assumed for entries without a score, and for no entries at all
pub const DEFAULT_FOCUS: u8 = 75;
pub const MAX_UPCOMING: usize = 4;
pub const QUICK_NOTES: usize = 3;

pub const EMPTY_TASKS: &str = "No tasks yet. Press the new key to create your first one.";
pub const EMPTY_NOTES: &str = "Upload documents to get AI-powered summaries and insights";
pub const EMPTY_QUICK_NOTES: &str = "Start capturing your thoughts and ideas";
pub const EMPTY_EVENTS: &str = "No upcoming events. Your schedule is clear!";

#[derive(Debug, Clone, PartialEq)]
pub struct TaskRow {
    pub id: String,
    pub title: String,
    pub done: bool,
    pub priority: Priority,
    pub marker: &'static str,
    pub suggestion: Option<String>,
    pub due: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatBubble {
    pub role: Role,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NoteCard {
    pub id: String,
    pub icon: &'static str,
    pub title: String,
    pub date: String,
    pub summary: Option<String>,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuickNote {
    pub id: String,
    pub title: String,
    pub preview: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventRow {
    pub id: String,
    pub title: String,
    pub day: String,
    pub time: String,
    pub kind: EventKind,
    pub icon: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WellnessSummary {
    pub focus: u32,
    pub mood_icon: &'static str,
    pub mood_label: &'static str,
    pub entries: usize,
}

/// The whole dashboard as plain data
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub greeting: String,
    pub progress: String,
    pub insight: String,
    pub tasks: Vec<TaskRow>,
    pub chat: Vec<ChatBubble>,
    pub notes: Vec<NoteCard>,
    pub quick_notes: Vec<QuickNote>,
    pub notes_today: String,
    /// Upcoming events for the side pane
    pub events: Vec<EventRow>,
    /// Every event, soonest first
    pub schedule: Vec<EventRow>,
    pub wellness: WellnessSummary,
    pub notice: Option<(String, NoticeLevel)>,
    pub offline: bool,
}

pub fn greeting(hour: u32) -> &'static str {
    if hour < 12 {
        "Good Morning"
    } else if hour < 18 {
        "Good Afternoon"
    } else {
        "Good Evening"
    }
}

pub fn priority_marker(priority: Priority) -> &'static str {
    match priority {
        Priority::High => "🔴",
        Priority::Medium => "🟡",
        Priority::Low => "🟢",
    }
}

/// Icon chosen from the title's file extension
pub fn file_icon(title: &str) -> &'static str {
    let ext = title.rsplit('.').next().unwrap_or_default().to_lowercase();
    match ext.as_str() {
        "doc" | "docx" => "📝",
        "txt" => "📋",
        "ppt" | "pptx" => "📊",
        _ => "📄",
    }
}

pub fn event_icon(kind: EventKind) -> &'static str {
    match kind {
        EventKind::AiSuggested => "🤖",
        EventKind::FocusBlock => "🎯",
        EventKind::Event => "📅",
    }
}

fn mood(mood: u8) -> (&'static str, &'static str) {
    match mood {
        1 => ("😢", "Low"),
        2 => ("😕", "Meh"),
        3 => ("😐", "Okay"),
        4 => ("😊", "Good"),
        5 => ("😄", "Great"),
        _ => ("😐", "Okay"),
    }
}

fn insight_text(state: &DashboardState) -> String {
    let tasks = &state.tasks;
    let total = tasks.len();
    let completed = tasks.iter().filter(|t| t.is_completed()).count();
    let rate = if total > 0 {
        (100.0 * completed as f64 / total as f64).round() as u32
    } else {
        0
    };

    let mut insight = if rate >= 70 {
        "Great productivity! You're completing most of your tasks.".to_string()
    } else if rate >= 50 {
        "Your productivity is steady. Consider breaking larger tasks into smaller ones.".to_string()
    } else if total == 0 {
        format!(
            "Welcome to LifeOS, {}! Start by creating your first task.",
            state.user.name
        )
    } else {
        "Focus on completing high-priority tasks first. You've got this!".to_string()
    };

    if !state.wellness.is_empty() {
        let focus = average_focus(&state.wellness, DEFAULT_FOCUS);
        if focus > 0 {
            insight.push_str(&format!(" Your average focus score this week: {}%.", focus));
        }
    }
    insight
}

fn day_label<Tz: TimeZone>(start: &DateTime<Tz>, now: &DateTime<Tz>) -> String {
    let day = start.date_naive();
    let today = now.date_naive();
    if day == today {
        "Today".to_string()
    } else if Some(day) == today.checked_add_signed(Duration::days(1)) {
        "Tomorrow".to_string()
    } else {
        day.format("%b %-d, %Y").to_string()
    }
}

fn task_row(task: &Task) -> TaskRow {
    TaskRow {
        id: task.id.clone(),
        title: task.title.clone(),
        done: task.is_completed(),
        priority: task.priority,
        marker: priority_marker(task.priority),
        suggestion: task.ai_suggestion.clone().filter(|s| !s.is_empty()),
        due: task.due_date.map(|d| d.format("%Y-%m-%d").to_string()),
    }
}

fn note_card<Tz: TimeZone>(note: &Note, tz: &Tz) -> NoteCard
where
    Tz::Offset: std::fmt::Display,
{
    NoteCard {
        id: note.id.clone(),
        icon: file_icon(&note.title),
        title: note.title.clone(),
        date: note
            .created_at
            .with_timezone(tz)
            .format("%b %-d, %Y")
            .to_string(),
        summary: note.summary.clone(),
        tags: note.tags.clone(),
    }
}

fn event_row<Tz: TimeZone>(event: &CalendarEvent, now: &DateTime<Tz>) -> EventRow
where
    Tz::Offset: std::fmt::Display,
{
    let start = event.start_time.with_timezone(&now.timezone());
    EventRow {
        id: event.id.clone(),
        title: event.title.clone(),
        day: day_label(&start, now),
        time: start.format("%-I:%M %p").to_string(),
        kind: event.kind,
        icon: event_icon(event.kind),
    }
}

/// Build the dashboard for the wall-clock time `now`
pub fn render<Tz: TimeZone>(state: &DashboardState, now: &DateTime<Tz>) -> Dashboard
where
    Tz::Offset: std::fmt::Display,
{
    let tz = now.timezone();
    let completed = state.tasks.iter().filter(|t| t.is_completed()).count();

    let mut schedule: Vec<&CalendarEvent> = state.events.iter().collect();
    schedule.sort_by_key(|e| e.start_time);
    let upcoming = schedule.iter().filter(|e| e.start_time > now.to_utc());

    let today = now.date_naive();
    let notes_today = state
        .notes
        .iter()
        .filter(|n| n.created_at.with_timezone(&tz).date_naive() == today)
        .count();

    let (mood_icon, mood_label) = state
        .wellness
        .first()
        .map(|e| mood(e.mood))
        .unwrap_or(("😊", "No entries yet"));
    let focus = if state.wellness.is_empty() {
        u32::from(DEFAULT_FOCUS)
    } else {
        average_focus(&state.wellness, DEFAULT_FOCUS)
    };

    Dashboard {
        greeting: format!("{}, {}", greeting(now.hour()), state.user.name),
        progress: format!("{}/{}", completed, state.tasks.len()),
        insight: insight_text(state),
        tasks: state.tasks.iter().map(task_row).collect(),
        chat: if state.chat.is_empty() {
            vec![ChatBubble {
                role: Role::Assistant,
                text: format!(
                    "Hi {}! I'm your AI productivity assistant. Ask me anything about your tasks, schedule, or how I can help optimize your day.",
                    state.user.name
                ),
            }]
        } else {
            state
                .chat
                .iter()
                .map(|m| ChatBubble {
                    role: m.role,
                    text: m.content.clone(),
                })
                .collect()
        },
        notes: state.notes.iter().map(|n| note_card(n, &tz)).collect(),
        quick_notes: state
            .notes
            .iter()
            .take(QUICK_NOTES)
            .map(|n| QuickNote {
                id: n.id.clone(),
                title: n.title.clone(),
                preview: n.content.clone(),
            })
            .collect(),
        notes_today: format!("{} notes today", notes_today),
        events: upcoming
            .take(MAX_UPCOMING)
            .map(|e| event_row(e, now))
            .collect(),
        schedule: schedule.iter().map(|e| event_row(e, now)).collect(),
        wellness: WellnessSummary {
            focus,
            mood_icon,
            mood_label,
            entries: state.wellness.len(),
        },
        notice: state.notice.as_ref().map(|n| (n.message.clone(), n.level)),
        offline: state.offline,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        EventDraft, NoteDraft, TaskDraft, TaskPatch, TaskStatus, WellnessDraft, WellnessEntry,
        new_id,
    };
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn state() -> DashboardState {
        DashboardState::new(at(2030, 1, 1, 0))
    }

    fn event(title: &str, start: DateTime<Utc>, kind: EventKind) -> CalendarEvent {
        CalendarEvent::from_draft(
            EventDraft {
                title: title.into(),
                description: None,
                start_time: start,
                end_time: start + Duration::hours(1),
                kind,
            },
            new_id(),
            start,
        )
    }

    #[test]
    fn greeting_follows_the_hour() {
        let s = state();
        assert_eq!(render(&s, &at(2030, 1, 1, 8)).greeting, "Good Morning, Ananya");
        assert_eq!(render(&s, &at(2030, 1, 1, 12)).greeting, "Good Afternoon, Ananya");
        assert_eq!(render(&s, &at(2030, 1, 1, 18)).greeting, "Good Evening, Ananya");
    }

    #[test]
    fn empty_dashboard_welcomes_the_user() {
        let view = render(&state(), &at(2030, 1, 1, 9));
        assert_eq!(view.progress, "0/0");
        assert_eq!(
            view.insight,
            "Welcome to LifeOS, Ananya! Start by creating your first task."
        );
        assert_eq!(view.chat.len(), 1);
        assert!(view.chat[0].text.starts_with("Hi Ananya!"));
        assert_eq!(view.wellness.focus, 75);
    }

    #[test]
    fn insight_bands_and_focus_suffix() {
        let mut s = state();
        let now = at(2030, 1, 1, 9);
        for i in 0..4 {
            let mut task = Task::from_draft(TaskDraft::new(format!("t{i}")), new_id(), now);
            if i < 3 {
                task.apply(TaskPatch::status(TaskStatus::Completed), now);
            }
            s.tasks.push(task);
        }
        s.wellness.push(WellnessEntry::from_draft(
            WellnessDraft { mood: 4, focus_score: None, notes: None },
            new_id(),
            now,
        ));
        s.wellness.push(WellnessEntry::from_draft(
            WellnessDraft { mood: 2, focus_score: Some(85), notes: None },
            new_id(),
            now,
        ));

        let view = render(&s, &now);
        assert_eq!(view.progress, "3/4");
        assert_eq!(
            view.insight,
            "Great productivity! You're completing most of your tasks. Your average focus score this week: 80%."
        );
        assert_eq!(view.wellness.focus, 80);
        assert_eq!(view.wellness.mood_label, "Good");
    }

    #[test]
    fn upcoming_events_are_future_sorted_and_capped() {
        let mut s = state();
        let now = at(2030, 1, 1, 9);
        s.events = vec![
            event("past", at(2029, 12, 31, 9), EventKind::Event),
            event("d5", at(2030, 1, 5, 9), EventKind::Event),
            event("d2", at(2030, 1, 2, 9), EventKind::FocusBlock),
            event("today", at(2030, 1, 1, 15), EventKind::AiSuggested),
            event("d4", at(2030, 1, 4, 9), EventKind::Event),
            event("d3", at(2030, 1, 3, 9), EventKind::Event),
        ];

        let view = render(&s, &now);
        let titles: Vec<_> = view.events.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["today", "d2", "d3", "d4"]);
        assert_eq!(view.events[0].day, "Today");
        assert_eq!(view.events[0].icon, "🤖");
        assert_eq!(view.events[0].time, "3:00 PM");
        assert_eq!(view.events[1].day, "Tomorrow");
        assert_eq!(view.events[2].day, "Jan 3, 2030");
        assert_eq!(view.schedule.len(), 6);
        assert_eq!(view.schedule[0].title, "past");
    }

    #[test]
    fn notes_get_icons_and_quick_list() {
        let mut s = state();
        let now = at(2030, 1, 1, 9);
        for title in ["slides.PPTX", "readme.txt", "Plan", "report.pdf"] {
            s.notes.push(Note::from_draft(NoteDraft::new(title, "body"), new_id(), now));
        }
        s.notes[3].created_at = at(2029, 12, 30, 9);

        let view = render(&s, &now);
        let icons: Vec<_> = view.notes.iter().map(|n| n.icon).collect();
        assert_eq!(icons, vec!["📊", "📋", "📄", "📄"]);
        assert_eq!(view.quick_notes.len(), 3);
        assert_eq!(view.notes_today, "3 notes today");
    }

    #[test]
    fn doc_files_use_the_memo_icon() {
        assert_eq!(file_icon("minutes.docx"), "📝");
        assert_eq!(file_icon("minutes.doc"), "📝");
    }
}
