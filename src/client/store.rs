//! Client-side state controller.
//!
//! The [`Store`] owns the five dashboard collections and the user profile.
//! Every operation tries the primary [`Backend`] first. When the backend is
//! unavailable the same change is made in memory and the whole snapshot is
//! written to the [`LocalBackend`], so the dashboard keeps working offline.
//! Operations report which [`Region`] changed and queue it for the renderer.

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::backend::{Backend, Collection};
use super::error::ClientError;
use super::local::{self, LocalBackend};
use crate::insights::{self, ANALYTICS_WELLNESS_WINDOW, ProductivityReport};
use crate::models::{
    CalendarEvent, ChatMessage, EventDraft, EventPatch, Note, NoteDraft, NoteKind, Task,
    TaskDraft, TaskPatch, TaskStatus, User, UserPatch, WellnessDraft, WellnessEntry,
};

/// How long a notice stays on screen
pub const NOTICE_TTL: Duration = Duration::from_secs(3);
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

const DOCUMENT_PLACEHOLDER: &str = "Document content would be extracted here...";
const DOCUMENT_SUMMARY_PLACEHOLDER: &str = "AI-generated summary would appear here after processing";

/// Part of the dashboard affected by a change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    User,
    Tasks,
    Notes,
    Events,
    Chat,
    Wellness,
    Notice,
}

impl Region {
    pub const ALL: [Region; 7] = [
        Region::User,
        Region::Tasks,
        Region::Notes,
        Region::Events,
        Region::Chat,
        Region::Wellness,
        Region::Notice,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub message: String,
    pub level: NoticeLevel,
    pub shown_at: Instant,
}

/// Everything the view needs to draw the dashboard
#[derive(Debug, Clone)]
pub struct DashboardState {
    pub user: User,
    pub tasks: Vec<Task>,
    pub notes: Vec<Note>,
    pub events: Vec<CalendarEvent>,
    pub chat: Vec<ChatMessage>,
    pub wellness: Vec<WellnessEntry>,
    pub notice: Option<Notice>,
    /// Set when the last backend call fell back to local data
    pub offline: bool,
}

impl DashboardState {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            user: User::new("local".to_string(), now),
            tasks: Vec::new(),
            notes: Vec::new(),
            events: Vec::new(),
            chat: Vec::new(),
            wellness: Vec::new(),
            notice: None,
            offline: false,
        }
    }
}

/// Ties a record kind to its slot in [`DashboardState`]
pub trait Tracked: Collection {
    const REGION: Region;
    fn items(state: &DashboardState) -> &Vec<Self>;
    fn items_mut(state: &mut DashboardState) -> &mut Vec<Self>;
}

impl Tracked for Task {
    const REGION: Region = Region::Tasks;
    fn items(state: &DashboardState) -> &Vec<Self> {
        &state.tasks
    }
    fn items_mut(state: &mut DashboardState) -> &mut Vec<Self> {
        &mut state.tasks
    }
}

impl Tracked for Note {
    const REGION: Region = Region::Notes;
    fn items(state: &DashboardState) -> &Vec<Self> {
        &state.notes
    }
    fn items_mut(state: &mut DashboardState) -> &mut Vec<Self> {
        &mut state.notes
    }
}

impl Tracked for CalendarEvent {
    const REGION: Region = Region::Events;
    fn items(state: &DashboardState) -> &Vec<Self> {
        &state.events
    }
    fn items_mut(state: &mut DashboardState) -> &mut Vec<Self> {
        &mut state.events
    }
}

impl Tracked for ChatMessage {
    const REGION: Region = Region::Chat;
    fn items(state: &DashboardState) -> &Vec<Self> {
        &state.chat
    }
    fn items_mut(state: &mut DashboardState) -> &mut Vec<Self> {
        &mut state.chat
    }
}

impl Tracked for WellnessEntry {
    const REGION: Region = Region::Wellness;
    fn items(state: &DashboardState) -> &Vec<Self> {
        &state.wellness
    }
    fn items_mut(state: &mut DashboardState) -> &mut Vec<Self> {
        &mut state.wellness
    }
}

/// Insert or replace a record coming back from the backend
fn merge<C: Collection>(items: &mut Vec<C>, record: C) {
    match items.iter_mut().find(|item| item.id() == record.id()) {
        Some(existing) => *existing = record,
        None => {
            items.push(record);
            C::sort(items);
        }
    }
}

pub struct Store<B: Backend> {
    backend: B,
    local: LocalBackend,
    state: DashboardState,
    changes: Vec<Region>,
    rng: StdRng,
    refresh_interval: Duration,
    last_refresh: Option<Instant>,
}

impl<B: Backend> Store<B> {
    pub fn new(backend: B, local: LocalBackend) -> Self {
        Self {
            backend,
            local,
            state: DashboardState::new(Utc::now()),
            changes: Vec::new(),
            rng: StdRng::from_os_rng(),
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            last_refresh: None,
        }
    }

    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = interval;
        self
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Regions changed since the last call
    pub fn take_changes(&mut self) -> Vec<Region> {
        std::mem::take(&mut self.changes)
    }

    fn changed(&mut self, region: Region) -> Region {
        if !self.changes.contains(&region) {
            self.changes.push(region);
        }
        region
    }

    pub fn notify(&mut self, message: impl Into<String>, level: NoticeLevel) {
        self.state.notice = Some(Notice {
            message: message.into(),
            level,
            shown_at: Instant::now(),
        });
        self.changed(Region::Notice);
    }

    /// Drop the notice once it has been visible for [`NOTICE_TTL`]
    pub fn expire_notice(&mut self, now: Instant) -> bool {
        let expired = self
            .state
            .notice
            .as_ref()
            .is_some_and(|n| now.duration_since(n.shown_at) >= NOTICE_TTL);
        if expired {
            self.state.notice = None;
            self.changed(Region::Notice);
        }
        expired
    }

    /// Pass through backend results; unavailability becomes `None`
    fn attempt<T>(&mut self, result: Result<T, ClientError>) -> Result<Option<T>, ClientError> {
        match result {
            Ok(value) => {
                self.state.offline = false;
                Ok(Some(value))
            }
            Err(err) if err.falls_back() => {
                tracing::warn!(error = %err, "backend unavailable, using local data");
                self.state.offline = true;
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    /// Write all five collections to the local store. Failures are logged only.
    fn persist(&self) {
        let results = [
            self.local.save(&self.state.tasks),
            self.local.save(&self.state.notes),
            self.local.save(&self.state.events),
            self.local.save(&self.state.chat),
            self.local.save(&self.state.wellness),
        ];
        for err in results.into_iter().filter_map(Result::err) {
            tracing::warn!(error = %err, "failed to write local snapshot");
        }
    }

    fn finish(&mut self, region: Region, message: &str, offline: bool) -> Region {
        if offline {
            self.persist();
            self.notify(format!("{} (offline)", message), NoticeLevel::Info);
        } else {
            self.notify(message, NoticeLevel::Info);
        }
        self.changed(region)
    }

    // ===== Loading =====

    fn fetch<C: Collection>(&self, previous: &[C]) -> (Vec<C>, bool) {
        match self.backend.list::<C>() {
            Ok(items) => (items, false),
            Err(err) => {
                tracing::warn!(kind = C::KIND, error = %err, "list failed, reading local store");
                match self.local.list::<C>() {
                    Ok(items) => (items, true),
                    Err(local_err) => {
                        tracing::warn!(kind = C::KIND, error = %local_err, "local store unreadable, keeping current data");
                        (previous.to_vec(), true)
                    }
                }
            }
        }
    }

    fn fetch_user(&self) -> (User, bool) {
        match self.backend.user() {
            Ok(user) => (user, false),
            Err(err) => {
                tracing::warn!(error = %err, "user fetch failed, reading local store");
                match self.local.user() {
                    Ok(user) => (user, true),
                    Err(_) => (self.state.user.clone(), true),
                }
            }
        }
    }

    /// Reload every collection. The new state is assembled completely before
    /// it replaces the old one.
    pub fn load(&mut self) -> Vec<Region> {
        let (user, user_offline) = self.fetch_user();
        let (tasks, tasks_offline) = self.fetch(&self.state.tasks);
        let (notes, notes_offline) = self.fetch(&self.state.notes);
        let (events, events_offline) = self.fetch(&self.state.events);
        let (chat, chat_offline) = self.fetch(&self.state.chat);
        let (wellness, wellness_offline) = self.fetch(&self.state.wellness);

        let fresh = DashboardState {
            user,
            tasks,
            notes,
            events,
            chat,
            wellness,
            notice: self.state.notice.take(),
            offline: user_offline
                || tasks_offline
                || notes_offline
                || events_offline
                || chat_offline
                || wellness_offline,
        };
        self.state = fresh;
        self.last_refresh = Some(Instant::now());

        for region in Region::ALL {
            self.changed(region);
        }
        Region::ALL.to_vec()
    }

    pub fn refresh_due(&self, now: Instant) -> bool {
        self.last_refresh
            .is_none_or(|last| now.duration_since(last) >= self.refresh_interval)
    }

    pub fn refresh(&mut self) -> Vec<Region> {
        tracing::debug!("periodic refresh");
        self.load()
    }

    // ===== Generic mutations =====

    fn create<C: Tracked>(&mut self, draft: C::Draft, message: &str) -> Result<C, ClientError> {
        let result = self.backend.create::<C>(draft.clone());
        let (record, offline) = match self.attempt(result)? {
            Some(record) => {
                merge(C::items_mut(&mut self.state), record.clone());
                (record, false)
            }
            None => (C::create_in(C::items_mut(&mut self.state), draft, Utc::now())?, true),
        };
        self.finish(C::REGION, message, offline);
        Ok(record)
    }

    fn update<C: Tracked>(&mut self, id: &str, patch: C::Patch, message: &str) -> Result<C, ClientError> {
        let result = self.backend.update::<C>(id, patch.clone());
        let (record, offline) = match self.attempt(result)? {
            Some(record) => {
                merge(C::items_mut(&mut self.state), record.clone());
                (record, false)
            }
            None => (C::update_in(C::items_mut(&mut self.state), id, patch, Utc::now())?, true),
        };
        self.finish(C::REGION, message, offline);
        Ok(record)
    }

    fn delete<C: Tracked>(&mut self, id: &str, message: &str) -> Result<Region, ClientError> {
        let result = self.backend.delete::<C>(id);
        let offline = match self.attempt(result)? {
            Some(()) => {
                C::items_mut(&mut self.state).retain(|item| item.id() != id);
                false
            }
            None => {
                C::delete_in(C::items_mut(&mut self.state), id)?;
                true
            }
        };
        Ok(self.finish(C::REGION, message, offline))
    }

    // ===== Tasks =====

    pub fn add_task(&mut self, draft: TaskDraft) -> Result<Region, ClientError> {
        draft.validate()?;
        self.create::<Task>(draft, "Task created successfully")?;
        Ok(Region::Tasks)
    }

    /// Flip between pending and completed
    pub fn toggle_task(&mut self, id: &str) -> Result<Region, ClientError> {
        let task = self
            .state
            .tasks
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| ClientError::NotFound(Task::KIND.to_string()))?;
        let next = if task.is_completed() {
            TaskStatus::Pending
        } else {
            TaskStatus::Completed
        };
        let message = match next {
            TaskStatus::Completed => "Task completed",
            _ => "Task reopened",
        };
        self.update::<Task>(id, TaskPatch::status(next), message)?;
        Ok(Region::Tasks)
    }

    pub fn edit_task(&mut self, id: &str, patch: TaskPatch) -> Result<Region, ClientError> {
        patch.validate()?;
        self.update::<Task>(id, patch, "Task updated")?;
        Ok(Region::Tasks)
    }

    pub fn delete_task(&mut self, id: &str) -> Result<Region, ClientError> {
        self.delete::<Task>(id, "Task deleted")
    }

    /// Ask for suggestions. Online, the tasks are reloaded afterwards.
    /// Offline, suggestions are assigned in memory and the list is sorted by priority.
    pub fn prioritize_tasks(&mut self) -> Result<Region, ClientError> {
        let result = self.backend.prioritize_tasks();
        let offline = match self.attempt(result)? {
            Some(outcome) => {
                tracing::info!(count = outcome.count, "tasks prioritized");
                let reload = self.backend.list::<Task>();
                if let Some(tasks) = self.attempt(reload)? {
                    self.state.tasks = tasks;
                }
                false
            }
            None => {
                local::prioritize_in(&mut self.state.tasks, &mut self.rng, Utc::now());
                true
            }
        };
        Ok(self.finish(Region::Tasks, "Tasks prioritized with AI assistance", offline))
    }

    // ===== Notes =====

    pub fn add_note(&mut self, draft: NoteDraft) -> Result<Region, ClientError> {
        draft.validate()?;
        self.create::<Note>(draft, "Note created successfully")?;
        Ok(Region::Notes)
    }

    /// Register a document by file name; its content is a placeholder
    pub fn upload_document(&mut self, filename: &str) -> Result<Region, ClientError> {
        let draft = NoteDraft {
            summary: Some(DOCUMENT_SUMMARY_PLACEHOLDER.to_string()),
            tags: vec!["uploaded".to_string(), "document".to_string()],
            kind: NoteKind::Document,
            ..NoteDraft::new(filename.trim(), DOCUMENT_PLACEHOLDER)
        };
        draft.validate()?;
        self.create::<Note>(draft, "Document uploaded successfully")?;
        Ok(Region::Notes)
    }

    pub fn summarize_note(&mut self, id: &str) -> Result<Region, ClientError> {
        let result = self.backend.summarize_note(id);
        let offline = match self.attempt(result)? {
            Some(summarized) => {
                merge(&mut self.state.notes, summarized.note);
                false
            }
            None => {
                local::summarize_in(&mut self.state.notes, id, Utc::now())?;
                true
            }
        };
        Ok(self.finish(Region::Notes, "Note summarized", offline))
    }

    pub fn delete_note(&mut self, id: &str) -> Result<Region, ClientError> {
        self.delete::<Note>(id, "Note deleted")
    }

    // ===== Calendar =====

    pub fn add_event(&mut self, draft: EventDraft) -> Result<Region, ClientError> {
        draft.validate()?;
        self.create::<CalendarEvent>(draft, "Event created successfully")?;
        Ok(Region::Events)
    }

    pub fn edit_event(&mut self, id: &str, patch: EventPatch) -> Result<Region, ClientError> {
        patch.validate()?;
        self.update::<CalendarEvent>(id, patch, "Event updated")?;
        Ok(Region::Events)
    }

    pub fn delete_event(&mut self, id: &str) -> Result<Region, ClientError> {
        self.delete::<CalendarEvent>(id, "Event deleted")
    }

    // ===== Chat =====

    pub fn send_message(&mut self, content: &str) -> Result<Region, ClientError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(crate::models::ValidationError::Required("content").into());
        }
        let result = self.backend.send_message(content);
        match self.attempt(result)? {
            Some(exchange) => {
                self.state.chat.push(exchange.user_message);
                self.state.chat.push(exchange.ai_message);
            }
            None => {
                let name = self.state.user.name.clone();
                local::exchange_in(&mut self.state.chat, content, &name, &mut self.rng, Utc::now())?;
                self.persist();
                self.notify("Reply generated offline", NoticeLevel::Info);
            }
        }
        Ok(self.changed(Region::Chat))
    }

    // ===== Wellness =====

    pub fn log_mood(&mut self, draft: WellnessDraft) -> Result<Region, ClientError> {
        draft.validate()?;
        self.create::<WellnessEntry>(draft, "Wellness data logged successfully")?;
        Ok(Region::Wellness)
    }

    // ===== User =====

    pub fn update_user(&mut self, patch: UserPatch) -> Result<Region, ClientError> {
        patch.validate()?;
        let result = self.backend.update_user(patch.clone());
        match self.attempt(result)? {
            Some(user) => self.state.user = user,
            None => {
                self.state.user.apply(patch);
                if let Err(err) = self.local.save_user(&self.state.user) {
                    tracing::warn!(error = %err, "failed to write local profile");
                }
            }
        }
        Ok(self.changed(Region::User))
    }

    /// Analytics from the backend, or computed from the loaded collections
    pub fn productivity(&mut self) -> Result<ProductivityReport, ClientError> {
        let result = self.backend.productivity();
        match self.attempt(result)? {
            Some(report) => Ok(report),
            None => {
                let window = self.state.wellness.len().min(ANALYTICS_WELLNESS_WINDOW);
                Ok(insights::productivity_report(
                    &self.state.tasks,
                    &self.state.wellness[..window],
                ))
            }
        }
    }

    pub fn find<C: Tracked>(&self, id: &str) -> Option<&C> {
        C::items(&self.state).iter().find(|item| item.id() == id)
    }
}
