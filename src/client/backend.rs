use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::error::ClientError;
use crate::insights::{self, ProductivityReport};
use crate::models::{
    self,
    CalendarEvent, ChatDraft, ChatExchange, ChatMessage, EventDraft, EventPatch, Note, NoteDraft,
    NotePatch, PrioritizeOutcome, SummarizedNote, Task, TaskDraft, TaskPatch, User, UserPatch,
    WellnessDraft, WellnessEntry,
};

/// Which mutations a record kind allows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// create, update and delete
    ReadWrite,
    /// create only; entries are never changed
    AppendOnly,
    /// created in user/assistant pairs through `send_message`
    Conversation,
}

/// A record kind the dashboard keeps a collection of
pub trait Collection: Clone + Serialize + DeserializeOwned {
    type Draft: Clone + Serialize;
    type Patch: Clone + Serialize;

    /// Human readable kind, used in messages
    const KIND: &'static str;
    const ENDPOINT: &'static str;
    /// Key of the JSON array in the local store
    const LOCAL_KEY: &'static str;
    const ACCESS: Access;

    fn id(&self) -> &str;
    fn from_draft(draft: Self::Draft, id: String, now: DateTime<Utc>) -> Self;
    fn apply(&mut self, patch: Self::Patch, now: DateTime<Utc>);
    /// Put items into listing order (stable)
    fn sort(items: &mut [Self]);

    /// Starter records for a local store that has never been written
    fn samples(_now: DateTime<Utc>) -> Vec<Self> {
        Vec::new()
    }

    fn check(operation: &'static str) -> Result<(), ClientError> {
        let allowed = match (Self::ACCESS, operation) {
            (Access::ReadWrite, _) => true,
            (Access::AppendOnly, "created") => true,
            _ => false,
        };
        if allowed {
            Ok(())
        } else {
            Err(ClientError::Unsupported {
                kind: Self::KIND,
                operation,
            })
        }
    }

    /// Create a record with a local id and put it in listing position
    fn create_in(items: &mut Vec<Self>, draft: Self::Draft, now: DateTime<Utc>) -> Result<Self, ClientError> {
        Self::check("created")?;
        let record = Self::from_draft(draft, models::new_id(), now);
        items.push(record.clone());
        Self::sort(items);
        Ok(record)
    }

    fn update_in(
        items: &mut [Self],
        id: &str,
        patch: Self::Patch,
        now: DateTime<Utc>,
    ) -> Result<Self, ClientError> {
        Self::check("updated")?;
        let record = items
            .iter_mut()
            .find(|item| item.id() == id)
            .ok_or_else(|| ClientError::NotFound(Self::KIND.to_string()))?;
        record.apply(patch, now);
        Ok(record.clone())
    }

    fn delete_in(items: &mut Vec<Self>, id: &str) -> Result<(), ClientError> {
        Self::check("deleted")?;
        let before = items.len();
        items.retain(|item| item.id() != id);
        if items.len() == before {
            return Err(ClientError::NotFound(Self::KIND.to_string()));
        }
        Ok(())
    }
}

fn sample_records<C: Collection>(drafts: Vec<C::Draft>, now: DateTime<Utc>) -> Vec<C> {
    let mut items: Vec<C> = drafts
        .into_iter()
        .map(|draft| C::from_draft(draft, models::new_id(), now))
        .collect();
    C::sort(&mut items);
    items
}

fn newest_first<T>(items: &mut [T], created_at: impl Fn(&T) -> DateTime<Utc>) {
    items.sort_by(|a, b| created_at(b).cmp(&created_at(a)));
}

impl Collection for Task {
    type Draft = TaskDraft;
    type Patch = TaskPatch;
    const KIND: &'static str = "Task";
    const ENDPOINT: &'static str = "/api/tasks";
    const LOCAL_KEY: &'static str = "lifeos-tasks";
    const ACCESS: Access = Access::ReadWrite;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(draft: TaskDraft, id: String, now: DateTime<Utc>) -> Self {
        Task::from_draft(draft, id, now)
    }

    fn apply(&mut self, patch: TaskPatch, now: DateTime<Utc>) {
        Task::apply(self, patch, now)
    }

    fn sort(items: &mut [Self]) {
        newest_first(items, |t| t.created_at)
    }

    fn samples(now: DateTime<Utc>) -> Vec<Self> {
        sample_records(insights::sample_task_drafts(), now)
    }
}

impl Collection for Note {
    type Draft = NoteDraft;
    type Patch = NotePatch;
    const KIND: &'static str = "Note";
    const ENDPOINT: &'static str = "/api/notes";
    const LOCAL_KEY: &'static str = "lifeos-notes";
    const ACCESS: Access = Access::ReadWrite;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(draft: NoteDraft, id: String, now: DateTime<Utc>) -> Self {
        Note::from_draft(draft, id, now)
    }

    fn apply(&mut self, patch: NotePatch, now: DateTime<Utc>) {
        Note::apply(self, patch, now)
    }

    fn sort(items: &mut [Self]) {
        newest_first(items, |n| n.created_at)
    }

    fn samples(now: DateTime<Utc>) -> Vec<Self> {
        sample_records(insights::sample_note_drafts(), now)
    }
}

impl Collection for CalendarEvent {
    type Draft = EventDraft;
    type Patch = EventPatch;
    const KIND: &'static str = "Event";
    const ENDPOINT: &'static str = "/api/calendar/events";
    const LOCAL_KEY: &'static str = "lifeos-events";
    const ACCESS: Access = Access::ReadWrite;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(draft: EventDraft, id: String, now: DateTime<Utc>) -> Self {
        CalendarEvent::from_draft(draft, id, now)
    }

    fn apply(&mut self, patch: EventPatch, now: DateTime<Utc>) {
        CalendarEvent::apply(self, patch, now)
    }

    fn sort(items: &mut [Self]) {
        items.sort_by_key(|e| e.start_time);
    }

    fn samples(now: DateTime<Utc>) -> Vec<Self> {
        sample_records(insights::sample_event_drafts(now), now)
    }
}

impl Collection for ChatMessage {
    type Draft = ChatDraft;
    type Patch = ();
    const KIND: &'static str = "Chat message";
    const ENDPOINT: &'static str = "/api/chat/messages";
    const LOCAL_KEY: &'static str = "lifeos-chat";
    const ACCESS: Access = Access::Conversation;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(draft: ChatDraft, id: String, now: DateTime<Utc>) -> Self {
        ChatMessage::from_draft(draft, id, now)
    }

    fn apply(&mut self, _patch: (), _now: DateTime<Utc>) {}

    fn sort(items: &mut [Self]) {
        items.sort_by_key(|m| m.created_at);
    }
}

impl Collection for WellnessEntry {
    type Draft = WellnessDraft;
    type Patch = ();
    const KIND: &'static str = "Wellness entry";
    const ENDPOINT: &'static str = "/api/wellness";
    const LOCAL_KEY: &'static str = "lifeos-wellness";
    const ACCESS: Access = Access::AppendOnly;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(draft: WellnessDraft, id: String, now: DateTime<Utc>) -> Self {
        WellnessEntry::from_draft(draft, id, now)
    }

    fn apply(&mut self, _patch: (), _now: DateTime<Utc>) {}

    fn sort(items: &mut [Self]) {
        newest_first(items, |e| e.created_at)
    }
}

/// Where the dashboard's records live.
///
/// Implemented by the HTTP client and by the local snapshot store, so the
/// [`Store`](super::store::Store) can run against either.
pub trait Backend {
    fn list<C: Collection>(&self) -> Result<Vec<C>, ClientError>;
    fn create<C: Collection>(&self, draft: C::Draft) -> Result<C, ClientError>;
    fn update<C: Collection>(&self, id: &str, patch: C::Patch) -> Result<C, ClientError>;
    fn delete<C: Collection>(&self, id: &str) -> Result<(), ClientError>;

    /// Post a user message and get back the stored pair
    fn send_message(&self, content: &str) -> Result<ChatExchange, ClientError>;
    fn prioritize_tasks(&self) -> Result<PrioritizeOutcome, ClientError>;
    fn summarize_note(&self, id: &str) -> Result<SummarizedNote, ClientError>;
    fn productivity(&self) -> Result<ProductivityReport, ClientError>;

    fn user(&self) -> Result<User, ClientError>;
    fn update_user(&self, patch: UserPatch) -> Result<User, ClientError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_levels_gate_mutations() {
        assert!(Task::check("updated").is_ok());
        assert!(WellnessEntry::check("created").is_ok());
        assert!(WellnessEntry::check("deleted").is_err());
        assert!(ChatMessage::check("created").is_err());
        assert!(CalendarEvent::check("deleted").is_ok());
    }

    #[test]
    fn in_memory_mutations_follow_task_rules() {
        let now = Utc::now();
        let mut tasks: Vec<Task> = Vec::new();
        let task = Task::create_in(&mut tasks, TaskDraft::new("Offline"), now).unwrap();

        let done = Task::update_in(&mut tasks, &task.id, TaskPatch::status(crate::models::TaskStatus::Completed), now)
            .unwrap();
        assert_eq!(done.completed_at, Some(now));
        assert_eq!(tasks[0], done);

        assert!(matches!(Task::delete_in(&mut tasks, "missing"), Err(ClientError::NotFound(_))));
        Task::delete_in(&mut tasks, &task.id).unwrap();
        assert!(tasks.is_empty());
    }

    #[test]
    fn only_some_kinds_have_samples() {
        let now = Utc::now();
        assert_eq!(Task::samples(now).len(), 3);
        assert_eq!(Note::samples(now).len(), 2);
        assert_eq!(CalendarEvent::samples(now).len(), 3);
        assert!(ChatMessage::samples(now).is_empty());
        assert!(WellnessEntry::samples(now).is_empty());
    }
}
