use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejection raised when a draft or patch carries an invalid field
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),
    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: &'static str,
        min: i64,
        max: i64,
    },
}

fn require_text(value: &str, field: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required(field));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Rank used for ordering: high 3, medium 2, low 1
    pub fn rank(self) -> u8 {
        match self {
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "low" => Some(Priority::Low),
            "medium" => Some(Priority::Medium),
            "high" => Some(Priority::High),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    #[default]
    Pending,
    Completed,
    Cancelled,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Completed => "completed",
            TaskStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(TaskStatus::Pending),
            "completed" => Some(TaskStatus::Completed),
            "cancelled" => Some(TaskStatus::Cancelled),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub due_date: Option<NaiveDate>, // YYYY-MM-DD
    #[serde(default)]
    pub ai_suggestion: Option<String>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields a client may supply when creating a task
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_suggestion: Option<String>,
}

/// Partial update; absent fields are left alone
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_suggestion: Option<String>,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text(&self.title, "title")
    }
}

impl TaskPatch {
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.title {
            Some(ref title) => require_text(title, "title"),
            None => Ok(()),
        }
    }
}

impl Task {
    pub fn from_draft(draft: TaskDraft, id: String, now: DateTime<Utc>) -> Self {
        let completed_at = (draft.status == TaskStatus::Completed).then_some(now);
        Self {
            id,
            title: draft.title,
            description: draft.description,
            priority: draft.priority,
            status: draft.status,
            due_date: draft.due_date,
            ai_suggestion: draft.ai_suggestion,
            completed_at,
            created_at: now,
            updated_at: now,
        }
    }

    /// Merge a patch into the task.
    /// completed_at is stamped on entering `completed` and cleared on leaving it.
    pub fn apply(&mut self, patch: TaskPatch, now: DateTime<Utc>) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = Some(description);
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = Some(due_date);
        }
        if let Some(suggestion) = patch.ai_suggestion {
            self.ai_suggestion = Some(suggestion);
        }
        if let Some(status) = patch.status {
            if status == TaskStatus::Completed {
                self.completed_at.get_or_insert(now);
            } else {
                self.completed_at = None;
            }
            self.status = status;
        }
        self.updated_at = now;
    }

    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteKind {
    #[default]
    Note,
    Document,
}

impl NoteKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NoteKind::Note => "note",
            NoteKind::Document => "document",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "note" => Some(NoteKind::Note),
            "document" => Some(NoteKind::Document),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(rename = "type", default)]
    pub kind: NoteKind,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(rename = "type", default)]
    pub kind: NoteKind,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<NoteKind>,
}

impl NoteDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text(&self.title, "title")?;
        require_text(&self.content, "content")
    }
}

impl NotePatch {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(ref title) = self.title {
            require_text(title, "title")?;
        }
        if let Some(ref content) = self.content {
            require_text(content, "content")?;
        }
        Ok(())
    }
}

impl Note {
    pub fn from_draft(draft: NoteDraft, id: String, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: draft.title,
            content: draft.content,
            summary: draft.summary,
            tags: normalize_tags(draft.tags),
            kind: draft.kind,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, patch: NotePatch, now: DateTime<Utc>) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(content) = patch.content {
            self.content = content;
        }
        if let Some(summary) = patch.summary {
            self.summary = Some(summary);
        }
        if let Some(tags) = patch.tags {
            self.tags = normalize_tags(tags);
        }
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        self.updated_at = now;
    }

    /// Add tags that are not already present, keeping existing order
    pub fn merge_tags<I, S>(&mut self, extra: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut tags = std::mem::take(&mut self.tags);
        tags.extend(extra.into_iter().map(Into::into));
        self.tags = normalize_tags(tags);
    }
}

/// Trim, drop empties and duplicates (first occurrence wins)
pub fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if !tag.is_empty() && !out.iter().any(|t| t == tag) {
            out.push(tag.to_string());
        }
    }
    out
}

/// Parse a comma-separated tag string ("a, b,c")
pub fn parse_tag_list(raw: &str) -> Vec<String> {
    normalize_tags(raw.split(',').map(str::to_string).collect())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "user" => Some(Role::User),
            "assistant" => Some(Role::Assistant),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub role: Role,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatDraft {
    pub role: Role,
    pub content: String,
}

/// Body of `POST /api/chat/messages`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub content: String,
}

impl ChatRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text(&self.content, "content")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatExchange {
    pub user_message: ChatMessage,
    pub ai_message: ChatMessage,
}

impl ChatMessage {
    pub fn from_draft(draft: ChatDraft, id: String, now: DateTime<Utc>) -> Self {
        Self {
            id,
            role: draft.role,
            content: draft.content,
            created_at: now,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventKind {
    #[default]
    Event,
    AiSuggested,
    FocusBlock,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Event => "event",
            EventKind::AiSuggested => "ai-suggested",
            EventKind::FocusBlock => "focus-block",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "event" => Some(EventKind::Event),
            "ai-suggested" => Some(EventKind::AiSuggested),
            "focus-block" => Some(EventKind::FocusBlock),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(rename = "type", default)]
    pub kind: EventKind,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDraft {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(rename = "type", default)]
    pub kind: EventKind,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<EventKind>,
}

impl EventDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text(&self.title, "title")
    }
}

impl EventPatch {
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.title {
            Some(ref title) => require_text(title, "title"),
            None => Ok(()),
        }
    }
}

impl CalendarEvent {
    pub fn from_draft(draft: EventDraft, id: String, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            start_time: draft.start_time,
            end_time: draft.end_time,
            kind: draft.kind,
            created_at: now,
        }
    }

    // Events carry no updated_at
    pub fn apply(&mut self, patch: EventPatch, _now: DateTime<Utc>) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = Some(description);
        }
        if let Some(start_time) = patch.start_time {
            self.start_time = start_time;
        }
        if let Some(end_time) = patch.end_time {
            self.end_time = end_time;
        }
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WellnessEntry {
    pub id: String,
    pub mood: u8, // 1-5
    #[serde(default)]
    pub focus_score: Option<u8>, // 0-100
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WellnessDraft {
    pub mood: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focus_score: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl WellnessDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(1..=5).contains(&self.mood) {
            return Err(ValidationError::OutOfRange {
                field: "mood",
                min: 1,
                max: 5,
            });
        }
        if self.focus_score.is_some_and(|score| score > 100) {
            return Err(ValidationError::OutOfRange {
                field: "focusScore",
                min: 0,
                max: 100,
            });
        }
        Ok(())
    }
}

impl WellnessEntry {
    pub fn from_draft(draft: WellnessDraft, id: String, now: DateTime<Utc>) -> Self {
        Self {
            id,
            mood: draft.mood,
            focus_score: draft.focus_score,
            notes: draft.notes,
            created_at: now,
        }
    }
}

pub const DEFAULT_USER_NAME: &str = "Ananya";
pub const DEFAULT_THEME: &str = "light";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default = "default_theme")]
    pub theme: String,
    pub created_at: DateTime<Utc>,
}

fn default_theme() -> String {
    DEFAULT_THEME.to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
}

impl UserPatch {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(ref name) = self.name {
            require_text(name, "name")?;
        }
        if let Some(ref theme) = self.theme {
            require_text(theme, "theme")?;
        }
        Ok(())
    }
}

impl User {
    pub fn new(id: String, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: DEFAULT_USER_NAME.to_string(),
            email: None,
            theme: default_theme(),
            created_at: now,
        }
    }

    pub fn apply(&mut self, patch: UserPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(email) = patch.email {
            self.email = Some(email).filter(|e| !e.trim().is_empty());
        }
        if let Some(theme) = patch.theme {
            self.theme = theme;
        }
    }
}

/// Plain `{message}` acknowledgement body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Acknowledgement {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrioritizeOutcome {
    pub message: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteAnalysis {
    pub summary: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummarizedNote {
    pub note: Note,
    pub analysis: NoteAnalysis,
}

/// Generate a fresh record identifier
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    #[test]
    fn completing_a_task_stamps_completed_at_and_reopening_clears_it() {
        let mut task = Task::from_draft(TaskDraft::new("Write report"), "t1".into(), at(0));
        assert_eq!(task.completed_at, None);

        task.apply(TaskPatch::status(TaskStatus::Completed), at(10));
        assert_eq!(task.completed_at, Some(at(10)));
        assert_eq!(task.updated_at, at(10));

        // a repeated completion keeps the original stamp
        task.apply(TaskPatch::status(TaskStatus::Completed), at(20));
        assert_eq!(task.completed_at, Some(at(10)));

        task.apply(TaskPatch::status(TaskStatus::Pending), at(30));
        assert_eq!(task.completed_at, None);
        assert_eq!(task.status, TaskStatus::Pending);
    }

    #[test]
    fn task_created_as_completed_has_completed_at() {
        let draft = TaskDraft {
            status: TaskStatus::Completed,
            ..TaskDraft::new("Done already")
        };
        let task = Task::from_draft(draft, "t2".into(), at(5));
        assert_eq!(task.completed_at, Some(at(5)));
    }

    #[test]
    fn task_json_uses_camel_case_and_lowercase_enums() {
        let task = Task::from_draft(
            TaskDraft {
                priority: Priority::High,
                ..TaskDraft::new("Plan")
            },
            "t3".into(),
            at(0),
        );
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["priority"], "high");
        assert_eq!(json["status"], "pending");
        assert!(json.get("createdAt").is_some());
        assert!(json.get("aiSuggestion").is_some());
    }

    #[test]
    fn draft_defaults_fill_priority_and_status() {
        let draft: TaskDraft = serde_json::from_str(r#"{"title":"Call mom"}"#).unwrap();
        assert_eq!(draft.priority, Priority::Medium);
        assert_eq!(draft.status, TaskStatus::Pending);
    }

    #[test]
    fn blank_title_is_rejected() {
        assert_eq!(
            TaskDraft::new("   ").validate(),
            Err(ValidationError::Required("title"))
        );
        assert!(NoteDraft::new("t", "").validate().is_err());
    }

    #[test]
    fn wellness_ranges_are_checked() {
        let ok = WellnessDraft { mood: 3, focus_score: Some(100), notes: None };
        assert!(ok.validate().is_ok());
        let bad_mood = WellnessDraft { mood: 0, ..ok.clone() };
        assert!(bad_mood.validate().is_err());
        let bad_focus = WellnessDraft { focus_score: Some(101), ..ok };
        assert!(bad_focus.validate().is_err());
    }

    #[test]
    fn tags_behave_like_a_set() {
        let mut note = Note::from_draft(
            NoteDraft {
                tags: vec!["work".into(), " work ".into(), "".into(), "q4".into()],
                ..NoteDraft::new("Plan", "Body")
            },
            "n1".into(),
            at(0),
        );
        assert_eq!(note.tags, vec!["work".to_string(), "q4".to_string()]);

        note.merge_tags(["q4", "summarized"]);
        assert_eq!(note.tags, vec!["work", "q4", "summarized"]);
    }

    #[test]
    fn event_kind_serializes_kebab_case() {
        let json = serde_json::to_string(&EventKind::FocusBlock).unwrap();
        assert_eq!(json, "\"focus-block\"");
        assert_eq!(EventKind::parse("ai-suggested"), Some(EventKind::AiSuggested));
    }
}
