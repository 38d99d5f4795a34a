use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;

use crate::insights;
use crate::models::{
    self, CalendarEvent, ChatDraft, ChatMessage, EventDraft, EventKind, EventPatch, Note,
    NoteDraft, NoteKind, NotePatch, Priority, Role, Task, TaskDraft, TaskPatch, TaskStatus, User,
    UserPatch, WellnessDraft, WellnessEntry,
};

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    SqliteError(#[from] rusqlite::Error),
    #[error("Failed to create database directory: {0}")]
    DirectoryError(String),
    #[error("Failed to encode column: {0}")]
    EncodeError(#[from] serde_json::Error),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("Database connection lock was poisoned")]
    LockPoisoned,
}

/// Inclusive window on an event's start time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

pub struct Database {
    conn: Mutex<Connection>,
}

const TASK_COLUMNS: &str =
    "id, title, description, priority, status, due_date, ai_suggestion, completed_at, created_at, updated_at";
const NOTE_COLUMNS: &str = "id, title, content, summary, tags, kind, created_at, updated_at";
const EVENT_COLUMNS: &str = "id, title, description, start_time, end_time, kind, created_at";
const WELLNESS_COLUMNS: &str = "id, mood, focus_score, notes, created_at";
const USER_COLUMNS: &str = "id, name, email, theme, created_at";

/// Fixed-width RFC 3339 so that text ordering matches time ordering.
/// Full precision, so a record reads back exactly as it was written.
fn ts(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn conversion_error(idx: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, message.into())
}

fn time_column(row: &rusqlite::Row, idx: usize) -> Result<DateTime<Utc>, rusqlite::Error> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| conversion_error(idx, format!("invalid timestamp '{}': {}", raw, e)))
}

fn optional_time_column(row: &rusqlite::Row, idx: usize) -> Result<Option<DateTime<Utc>>, rusqlite::Error> {
    let raw: Option<String> = row.get(idx)?;
    match raw {
        Some(_) => time_column(row, idx).map(Some),
        None => Ok(None),
    }
}

fn date_column(row: &rusqlite::Row, idx: usize) -> Result<Option<NaiveDate>, rusqlite::Error> {
    let raw: Option<String> = row.get(idx)?;
    raw.map(|value| {
        crate::utils::parse_date(&value)
            .map_err(|e| conversion_error(idx, format!("invalid date '{}': {}", value, e)))
    })
    .transpose()
}

fn enum_column<T>(
    row: &rusqlite::Row,
    idx: usize,
    parse: fn(&str) -> Option<T>,
) -> Result<T, rusqlite::Error> {
    let raw: String = row.get(idx)?;
    parse(&raw).ok_or_else(|| conversion_error(idx, format!("unexpected value '{}'", raw)))
}

fn tags_column(row: &rusqlite::Row, idx: usize) -> Result<Vec<String>, rusqlite::Error> {
    let raw: String = row.get(idx)?;
    serde_json::from_str(&raw).map_err(|e| conversion_error(idx, e.to_string()))
}

impl Database {
    /// Open (or create) the database file and initialize the schema
    pub fn new(path: &Path) -> Result<Self, DatabaseError> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| DatabaseError::DirectoryError(e.to_string()))?;
            }
        }

        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    /// Throwaway database, used by tests and `--dev` experiments
    pub fn open_in_memory() -> Result<Self, DatabaseError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, DatabaseError> {
        let db = Database { conn: Mutex::new(conn) };
        db.initialize_schema()?;
        Ok(db)
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, DatabaseError> {
        self.conn.lock().map_err(|_| DatabaseError::LockPoisoned)
    }

    /// Initialize the database schema (tables and indexes)
    fn initialize_schema(&self) -> Result<(), DatabaseError> {
        let conn = self.conn()?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS users (
                id              TEXT PRIMARY KEY,
                name            TEXT NOT NULL,
                email           TEXT UNIQUE,
                theme           TEXT NOT NULL DEFAULT 'light',
                created_at      TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS tasks (
                id              TEXT PRIMARY KEY,
                title           TEXT NOT NULL,
                description     TEXT,
                priority        TEXT NOT NULL DEFAULT 'medium',
                status          TEXT NOT NULL DEFAULT 'pending',
                due_date        TEXT,
                ai_suggestion   TEXT,
                completed_at    TEXT,
                created_at      TEXT NOT NULL,
                updated_at      TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS notes (
                id              TEXT PRIMARY KEY,
                title           TEXT NOT NULL,
                content         TEXT NOT NULL,
                summary         TEXT,
                tags            TEXT NOT NULL DEFAULT '[]',
                kind            TEXT NOT NULL DEFAULT 'note',
                created_at      TEXT NOT NULL,
                updated_at      TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS chat_messages (
                id              TEXT PRIMARY KEY,
                role            TEXT NOT NULL,
                content         TEXT NOT NULL,
                created_at      TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS calendar_events (
                id              TEXT PRIMARY KEY,
                title           TEXT NOT NULL,
                description     TEXT,
                start_time      TEXT NOT NULL,
                end_time        TEXT NOT NULL,
                kind            TEXT NOT NULL DEFAULT 'event',
                created_at      TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS wellness_entries (
                id              TEXT PRIMARY KEY,
                mood            INTEGER NOT NULL,
                focus_score     INTEGER,
                notes           TEXT,
                created_at      TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_tasks_created_at ON tasks(created_at);
            CREATE INDEX IF NOT EXISTS idx_tasks_status ON tasks(status);
            CREATE INDEX IF NOT EXISTS idx_notes_created_at ON notes(created_at);
            CREATE INDEX IF NOT EXISTS idx_chat_created_at ON chat_messages(created_at);
            CREATE INDEX IF NOT EXISTS idx_events_start_time ON calendar_events(start_time);
            CREATE INDEX IF NOT EXISTS idx_wellness_created_at ON wellness_entries(created_at);",
        )?;
        Ok(())
    }

    // ===== Tasks =====

    fn row_to_task(row: &rusqlite::Row) -> Result<Task, rusqlite::Error> {
        Ok(Task {
            id: row.get(0)?,
            title: row.get(1)?,
            description: row.get(2)?,
            priority: enum_column(row, 3, Priority::parse)?,
            status: enum_column(row, 4, TaskStatus::parse)?,
            due_date: date_column(row, 5)?,
            ai_suggestion: row.get(6)?,
            completed_at: optional_time_column(row, 7)?,
            created_at: time_column(row, 8)?,
            updated_at: time_column(row, 9)?,
        })
    }

    fn write_task(conn: &Connection, task: &Task) -> Result<(), DatabaseError> {
        conn.execute(
            "INSERT OR REPLACE INTO tasks (id, title, description, priority, status, due_date, ai_suggestion, completed_at, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            rusqlite::params![
                task.id,
                task.title,
                task.description,
                task.priority.as_str(),
                task.status.as_str(),
                task.due_date.map(|d| d.format("%Y-%m-%d").to_string()),
                task.ai_suggestion,
                task.completed_at.map(ts),
                ts(task.created_at),
                ts(task.updated_at),
            ],
        )?;
        Ok(())
    }

    fn fetch_task(conn: &Connection, id: &str) -> Result<Task, DatabaseError> {
        let sql = format!("SELECT {} FROM tasks WHERE id = ?1", TASK_COLUMNS);
        conn.query_row(&sql, rusqlite::params![id], Self::row_to_task)
            .optional()?
            .ok_or(DatabaseError::NotFound("Task"))
    }

    /// Create a task with a generated id and server timestamps
    pub fn create_task(&self, draft: TaskDraft) -> Result<Task, DatabaseError> {
        let task = Task::from_draft(draft, models::new_id(), Utc::now());
        let conn = self.conn()?;
        Self::write_task(&conn, &task)?;
        Ok(task)
    }

    /// All tasks newest first, optionally filtered by status
    pub fn get_all_tasks(&self, status: Option<TaskStatus>) -> Result<Vec<Task>, DatabaseError> {
        let conn = self.conn()?;
        let tasks = match status {
            Some(status) => {
                let sql = format!(
                    "SELECT {} FROM tasks WHERE status = ?1 ORDER BY created_at DESC, rowid DESC",
                    TASK_COLUMNS
                );
                let mut stmt = conn.prepare(&sql)?;
                stmt.query_map(rusqlite::params![status.as_str()], Self::row_to_task)?
                    .collect::<Result<Vec<_>, _>>()?
            }
            None => {
                let sql = format!("SELECT {} FROM tasks ORDER BY created_at DESC, rowid DESC", TASK_COLUMNS);
                let mut stmt = conn.prepare(&sql)?;
                stmt.query_map([], Self::row_to_task)?
                    .collect::<Result<Vec<_>, _>>()?
            }
        };
        Ok(tasks)
    }

    pub fn get_task(&self, id: &str) -> Result<Task, DatabaseError> {
        let conn = self.conn()?;
        Self::fetch_task(&conn, id)
    }

    /// Apply a partial update; last write wins
    pub fn update_task(&self, id: &str, patch: TaskPatch) -> Result<Task, DatabaseError> {
        let conn = self.conn()?;
        let tx = conn.unchecked_transaction()?;
        let mut task = Self::fetch_task(&tx, id)?;
        task.apply(patch, Utc::now());
        Self::write_task(&tx, &task)?;
        tx.commit()?;
        Ok(task)
    }

    /// Persist AI suggestions for the given tasks, bumping updated_at
    pub fn set_task_suggestions(&self, suggestions: &[(String, String)]) -> Result<usize, DatabaseError> {
        let conn = self.conn()?;
        let tx = conn.unchecked_transaction()?;
        let now = ts(Utc::now());
        let mut updated = 0;
        for (id, suggestion) in suggestions {
            updated += tx.execute(
                "UPDATE tasks SET ai_suggestion = ?1, updated_at = ?2 WHERE id = ?3",
                rusqlite::params![suggestion, now, id],
            )?;
        }
        tx.commit()?;
        Ok(updated)
    }

    /// Delete a task by ID
    pub fn delete_task(&self, id: &str) -> Result<(), DatabaseError> {
        let removed = self.conn()?.execute("DELETE FROM tasks WHERE id = ?1", rusqlite::params![id])?;
        if removed == 0 {
            return Err(DatabaseError::NotFound("Task"));
        }
        Ok(())
    }

    // ===== Notes =====

    fn row_to_note(row: &rusqlite::Row) -> Result<Note, rusqlite::Error> {
        Ok(Note {
            id: row.get(0)?,
            title: row.get(1)?,
            content: row.get(2)?,
            summary: row.get(3)?,
            tags: tags_column(row, 4)?,
            kind: enum_column(row, 5, NoteKind::parse)?,
            created_at: time_column(row, 6)?,
            updated_at: time_column(row, 7)?,
        })
    }

    fn write_note(conn: &Connection, note: &Note) -> Result<(), DatabaseError> {
        conn.execute(
            "INSERT OR REPLACE INTO notes (id, title, content, summary, tags, kind, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            rusqlite::params![
                note.id,
                note.title,
                note.content,
                note.summary,
                serde_json::to_string(&note.tags)?,
                note.kind.as_str(),
                ts(note.created_at),
                ts(note.updated_at),
            ],
        )?;
        Ok(())
    }

    fn fetch_note(conn: &Connection, id: &str) -> Result<Note, DatabaseError> {
        let sql = format!("SELECT {} FROM notes WHERE id = ?1", NOTE_COLUMNS);
        conn.query_row(&sql, rusqlite::params![id], Self::row_to_note)
            .optional()?
            .ok_or(DatabaseError::NotFound("Note"))
    }

    pub fn create_note(&self, draft: NoteDraft) -> Result<Note, DatabaseError> {
        let note = Note::from_draft(draft, models::new_id(), Utc::now());
        let conn = self.conn()?;
        Self::write_note(&conn, &note)?;
        Ok(note)
    }

    /// All notes newest first
    pub fn get_all_notes(&self) -> Result<Vec<Note>, DatabaseError> {
        let conn = self.conn()?;
        let sql = format!("SELECT {} FROM notes ORDER BY created_at DESC, rowid DESC", NOTE_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;
        let notes = stmt.query_map([], Self::row_to_note)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(notes)
    }

    pub fn update_note(&self, id: &str, patch: NotePatch) -> Result<Note, DatabaseError> {
        let conn = self.conn()?;
        let tx = conn.unchecked_transaction()?;
        let mut note = Self::fetch_note(&tx, id)?;
        note.apply(patch, Utc::now());
        Self::write_note(&tx, &note)?;
        tx.commit()?;
        Ok(note)
    }

    /// Attach a summary and merge its tags into the note
    pub fn summarize_note(&self, id: &str) -> Result<(Note, models::NoteAnalysis), DatabaseError> {
        let conn = self.conn()?;
        let tx = conn.unchecked_transaction()?;
        let mut note = Self::fetch_note(&tx, id)?;
        let analysis = insights::summarize(&note.content);
        note.summary = Some(analysis.summary.clone());
        note.merge_tags(analysis.tags.iter().cloned());
        note.updated_at = Utc::now();
        Self::write_note(&tx, &note)?;
        tx.commit()?;
        Ok((note, analysis))
    }

    pub fn delete_note(&self, id: &str) -> Result<(), DatabaseError> {
        let removed = self.conn()?.execute("DELETE FROM notes WHERE id = ?1", rusqlite::params![id])?;
        if removed == 0 {
            return Err(DatabaseError::NotFound("Note"));
        }
        Ok(())
    }

    // ===== Chat =====

    fn row_to_message(row: &rusqlite::Row) -> Result<ChatMessage, rusqlite::Error> {
        Ok(ChatMessage {
            id: row.get(0)?,
            role: enum_column(row, 1, Role::parse)?,
            content: row.get(2)?,
            created_at: time_column(row, 3)?,
        })
    }

    /// Append a message; messages are never updated afterwards
    pub fn insert_chat_message(&self, draft: ChatDraft) -> Result<ChatMessage, DatabaseError> {
        let message = ChatMessage::from_draft(draft, models::new_id(), Utc::now());
        self.conn()?.execute(
            "INSERT INTO chat_messages (id, role, content, created_at) VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![
                message.id,
                message.role.as_str(),
                message.content,
                ts(message.created_at),
            ],
        )?;
        Ok(message)
    }

    /// The latest `limit` messages, oldest first
    pub fn get_chat_messages(&self, limit: usize) -> Result<Vec<ChatMessage>, DatabaseError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, role, content, created_at FROM (
                 SELECT id, role, content, created_at, rowid AS seq FROM chat_messages
                 ORDER BY created_at DESC, rowid DESC LIMIT ?1
             ) ORDER BY created_at ASC, seq ASC",
        )?;
        let messages = stmt.query_map(rusqlite::params![limit as i64], Self::row_to_message)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(messages)
    }

    // ===== Calendar =====

    fn row_to_event(row: &rusqlite::Row) -> Result<CalendarEvent, rusqlite::Error> {
        Ok(CalendarEvent {
            id: row.get(0)?,
            title: row.get(1)?,
            description: row.get(2)?,
            start_time: time_column(row, 3)?,
            end_time: time_column(row, 4)?,
            kind: enum_column(row, 5, EventKind::parse)?,
            created_at: time_column(row, 6)?,
        })
    }

    fn write_event(conn: &Connection, event: &CalendarEvent) -> Result<(), DatabaseError> {
        conn.execute(
            "INSERT OR REPLACE INTO calendar_events (id, title, description, start_time, end_time, kind, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            rusqlite::params![
                event.id,
                event.title,
                event.description,
                ts(event.start_time),
                ts(event.end_time),
                event.kind.as_str(),
                ts(event.created_at),
            ],
        )?;
        Ok(())
    }

    pub fn create_event(&self, draft: EventDraft) -> Result<CalendarEvent, DatabaseError> {
        let event = CalendarEvent::from_draft(draft, models::new_id(), Utc::now());
        let conn = self.conn()?;
        Self::write_event(&conn, &event)?;
        Ok(event)
    }

    /// Events soonest first, optionally restricted to a start-time window
    pub fn get_events(&self, range: Option<TimeRange>) -> Result<Vec<CalendarEvent>, DatabaseError> {
        let conn = self.conn()?;
        let events = match range {
            Some(range) => {
                let sql = format!(
                    "SELECT {} FROM calendar_events WHERE start_time >= ?1 AND start_time <= ?2
                     ORDER BY start_time ASC, rowid ASC",
                    EVENT_COLUMNS
                );
                let mut stmt = conn.prepare(&sql)?;
                stmt.query_map(rusqlite::params![ts(range.start), ts(range.end)], Self::row_to_event)?
                    .collect::<Result<Vec<_>, _>>()?
            }
            None => {
                let sql = format!(
                    "SELECT {} FROM calendar_events ORDER BY start_time ASC, rowid ASC",
                    EVENT_COLUMNS
                );
                let mut stmt = conn.prepare(&sql)?;
                stmt.query_map([], Self::row_to_event)?
                    .collect::<Result<Vec<_>, _>>()?
            }
        };
        Ok(events)
    }

    pub fn update_event(&self, id: &str, patch: EventPatch) -> Result<CalendarEvent, DatabaseError> {
        let conn = self.conn()?;
        let tx = conn.unchecked_transaction()?;
        let sql = format!("SELECT {} FROM calendar_events WHERE id = ?1", EVENT_COLUMNS);
        let mut event = tx
            .query_row(&sql, rusqlite::params![id], Self::row_to_event)
            .optional()?
            .ok_or(DatabaseError::NotFound("Event"))?;
        event.apply(patch, Utc::now());
        Self::write_event(&tx, &event)?;
        tx.commit()?;
        Ok(event)
    }

    pub fn delete_event(&self, id: &str) -> Result<(), DatabaseError> {
        let removed = self
            .conn()?
            .execute("DELETE FROM calendar_events WHERE id = ?1", rusqlite::params![id])?;
        if removed == 0 {
            return Err(DatabaseError::NotFound("Event"));
        }
        Ok(())
    }

    // ===== Wellness =====

    fn row_to_wellness(row: &rusqlite::Row) -> Result<WellnessEntry, rusqlite::Error> {
        Ok(WellnessEntry {
            id: row.get(0)?,
            mood: row.get(1)?,
            focus_score: row.get(2)?,
            notes: row.get(3)?,
            created_at: time_column(row, 4)?,
        })
    }

    pub fn create_wellness(&self, draft: WellnessDraft) -> Result<WellnessEntry, DatabaseError> {
        let entry = WellnessEntry::from_draft(draft, models::new_id(), Utc::now());
        self.conn()?.execute(
            "INSERT INTO wellness_entries (id, mood, focus_score, notes, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![
                entry.id,
                entry.mood,
                entry.focus_score,
                entry.notes,
                ts(entry.created_at),
            ],
        )?;
        Ok(entry)
    }

    /// Most recent entries first, at most `limit`
    pub fn get_wellness(&self, limit: usize) -> Result<Vec<WellnessEntry>, DatabaseError> {
        let conn = self.conn()?;
        let sql = format!(
            "SELECT {} FROM wellness_entries ORDER BY created_at DESC, rowid DESC LIMIT ?1",
            WELLNESS_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let entries = stmt.query_map(rusqlite::params![limit as i64], Self::row_to_wellness)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    // ===== User =====

    fn row_to_user(row: &rusqlite::Row) -> Result<User, rusqlite::Error> {
        Ok(User {
            id: row.get(0)?,
            name: row.get(1)?,
            email: row.get(2)?,
            theme: row.get(3)?,
            created_at: time_column(row, 4)?,
        })
    }

    fn first_or_new_user(conn: &Connection) -> Result<User, DatabaseError> {
        let sql = format!("SELECT {} FROM users ORDER BY created_at ASC, rowid ASC LIMIT 1", USER_COLUMNS);
        if let Some(user) = conn.query_row(&sql, [], Self::row_to_user).optional()? {
            return Ok(user);
        }
        let user = User::new(models::new_id(), Utc::now());
        Self::write_user(conn, &user)?;
        Ok(user)
    }

    fn write_user(conn: &Connection, user: &User) -> Result<(), DatabaseError> {
        conn.execute(
            "INSERT OR REPLACE INTO users (id, name, email, theme, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![user.id, user.name, user.email, user.theme, ts(user.created_at)],
        )?;
        Ok(())
    }

    /// The singleton profile, created with defaults on first access
    pub fn get_or_create_user(&self) -> Result<User, DatabaseError> {
        let conn = self.conn()?;
        Self::first_or_new_user(&conn)
    }

    pub fn update_user(&self, patch: UserPatch) -> Result<User, DatabaseError> {
        let conn = self.conn()?;
        let tx = conn.unchecked_transaction()?;
        let mut user = Self::first_or_new_user(&tx)?;
        user.apply(patch);
        Self::write_user(&tx, &user)?;
        tx.commit()?;
        Ok(user)
    }

    // ===== Sample data =====

    fn count(&self, table: &str) -> Result<i64, DatabaseError> {
        let sql = format!("SELECT COUNT(*) FROM {}", table);
        Ok(self.conn()?.query_row(&sql, [], |row| row.get(0))?)
    }

    /// Fill empty task, note and event collections with starter records.
    /// Returns how many records were inserted.
    pub fn seed_sample_data(&self, now: DateTime<Utc>) -> Result<usize, DatabaseError> {
        let mut inserted = 0;
        if self.count("tasks")? == 0 {
            for draft in insights::sample_task_drafts() {
                self.create_task(draft)?;
                inserted += 1;
            }
        }
        if self.count("notes")? == 0 {
            for draft in insights::sample_note_drafts() {
                self.create_note(draft)?;
                inserted += 1;
            }
        }
        if self.count("calendar_events")? == 0 {
            for draft in insights::sample_event_drafts(now) {
                self.create_event(draft)?;
                inserted += 1;
            }
        }
        Ok(inserted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use pretty_assertions::assert_eq;

    fn db() -> Database {
        Database::open_in_memory().unwrap()
    }

    #[test]
    fn created_task_round_trips_through_the_table() {
        let db = db();
        let draft = TaskDraft {
            description: Some("Draft slides".into()),
            priority: Priority::High,
            due_date: NaiveDate::from_ymd_opt(2030, 1, 2),
            ..TaskDraft::new("Prepare talk")
        };
        let created = db.create_task(draft).unwrap();

        let listed = db.get_all_tasks(None).unwrap();
        assert_eq!(listed, vec![created.clone()]);
        assert!(!created.id.is_empty());
        assert_eq!(created.created_at, created.updated_at);
    }

    #[test]
    fn every_kind_reads_back_as_written() {
        let db = db();
        let start = "2030-03-04T09:15:00.123456789Z".parse::<DateTime<Utc>>().unwrap();
        let event = db
            .create_event(EventDraft {
                title: "Stand-up".into(),
                description: None,
                start_time: start,
                end_time: start + Duration::minutes(30),
                kind: EventKind::FocusBlock,
            })
            .unwrap();
        assert_eq!(db.get_events(None).unwrap(), vec![event]);

        let note = db.create_note(NoteDraft::new("Ideas", "Plant herbs")).unwrap();
        let edited = db
            .update_note(&note.id, NotePatch { title: Some("Garden".into()), ..NotePatch::default() })
            .unwrap();
        assert_eq!(db.get_all_notes().unwrap(), vec![edited]);

        let entry = db
            .create_wellness(WellnessDraft { mood: 3, focus_score: Some(55), notes: None })
            .unwrap();
        assert_eq!(db.get_wellness(7).unwrap(), vec![entry]);
    }

    #[test]
    fn tasks_list_newest_first() {
        let db = db();
        let first = db.create_task(TaskDraft::new("first")).unwrap();
        let second = db.create_task(TaskDraft::new("second")).unwrap();
        let ids: Vec<_> = db.get_all_tasks(None).unwrap().into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[test]
    fn status_update_maintains_completed_at() {
        let db = db();
        let task = db.create_task(TaskDraft::new("Toggle me")).unwrap();

        let done = db.update_task(&task.id, TaskPatch::status(TaskStatus::Completed)).unwrap();
        assert!(done.completed_at.is_some());
        assert_eq!(db.get_task(&task.id).unwrap().completed_at, done.completed_at);

        let reopened = db.update_task(&task.id, TaskPatch::status(TaskStatus::Pending)).unwrap();
        assert_eq!(reopened.completed_at, None);
    }

    #[test]
    fn missing_ids_report_not_found() {
        let db = db();
        db.create_task(TaskDraft::new("keep")).unwrap();

        assert!(matches!(db.delete_task("nope"), Err(DatabaseError::NotFound("Task"))));
        assert!(matches!(
            db.update_task("nope", TaskPatch::default()),
            Err(DatabaseError::NotFound("Task"))
        ));
        assert_eq!(db.get_all_tasks(None).unwrap().len(), 1);
    }

    #[test]
    fn status_filter_returns_pending_only() {
        let db = db();
        let open = db.create_task(TaskDraft::new("open")).unwrap();
        let closed = db.create_task(TaskDraft::new("closed")).unwrap();
        db.update_task(&closed.id, TaskPatch::status(TaskStatus::Completed)).unwrap();

        let pending = db.get_all_tasks(Some(TaskStatus::Pending)).unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, open.id);
    }

    #[test]
    fn summarize_merges_tags_once() {
        let db = db();
        let note = db
            .create_note(NoteDraft {
                tags: vec!["summarized".into()],
                ..NoteDraft::new("Retro", "We shipped the thing.")
            })
            .unwrap();

        let (note, analysis) = db.summarize_note(&note.id).unwrap();
        assert_eq!(note.summary.as_deref(), Some(analysis.summary.as_str()));
        assert_eq!(note.tags, vec!["summarized", "ai-processed"]);

        let (again, _) = db.summarize_note(&note.id).unwrap();
        assert_eq!(again.tags.len(), 2);
    }

    #[test]
    fn chat_history_returns_latest_messages_oldest_first() {
        let db = db();
        for i in 0..5 {
            db.insert_chat_message(ChatDraft { role: Role::User, content: format!("m{i}") })
                .unwrap();
        }
        let contents: Vec<_> = db
            .get_chat_messages(3)
            .unwrap()
            .into_iter()
            .map(|m| m.content)
            .collect();
        assert_eq!(contents, vec!["m2", "m3", "m4"]);
    }

    #[test]
    fn events_sort_by_start_and_filter_by_range() {
        let db = db();
        let base = Utc::now();
        let make = |title: &str, offset: i64| EventDraft {
            title: title.into(),
            description: None,
            start_time: base + Duration::hours(offset),
            end_time: base + Duration::hours(offset + 1),
            kind: EventKind::Event,
        };
        db.create_event(make("late", 48)).unwrap();
        db.create_event(make("early", 1)).unwrap();
        db.create_event(make("middle", 24)).unwrap();

        let titles: Vec<_> = db.get_events(None).unwrap().into_iter().map(|e| e.title).collect();
        assert_eq!(titles, vec!["early", "middle", "late"]);

        let range = TimeRange { start: base, end: base + Duration::hours(30) };
        let titles: Vec<_> = db.get_events(Some(range)).unwrap().into_iter().map(|e| e.title).collect();
        assert_eq!(titles, vec!["early", "middle"]);
    }

    #[test]
    fn wellness_limit_keeps_newest() {
        let db = db();
        for mood in 1..=5 {
            db.create_wellness(WellnessDraft { mood, focus_score: None, notes: None }).unwrap();
        }
        let moods: Vec<_> = db.get_wellness(2).unwrap().into_iter().map(|e| e.mood).collect();
        assert_eq!(moods, vec![5, 4]);
    }

    #[test]
    fn user_is_a_lazily_created_singleton() {
        let db = db();
        let first = db.get_or_create_user().unwrap();
        assert_eq!(first.name, "Ananya");
        assert_eq!(first.theme, "light");
        assert_eq!(db.get_or_create_user().unwrap().id, first.id);

        let updated = db
            .update_user(UserPatch { theme: Some("dark".into()), ..UserPatch::default() })
            .unwrap();
        assert_eq!(updated.id, first.id);
        assert_eq!(updated.theme, "dark");
    }

    #[test]
    fn seeding_only_fills_empty_collections() {
        let db = db();
        db.create_task(TaskDraft::new("mine")).unwrap();
        let inserted = db.seed_sample_data(Utc::now()).unwrap();
        assert_eq!(inserted, 5);
        assert_eq!(db.get_all_tasks(None).unwrap().len(), 1);
        assert_eq!(db.seed_sample_data(Utc::now()).unwrap(), 0);
    }

    #[test]
    fn file_backed_database_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("lifeos.db");
        let db = Database::new(&path).unwrap();
        db.create_note(NoteDraft::new("a", "b")).unwrap();
        drop(db);

        let reopened = Database::new(&path).unwrap();
        assert_eq!(reopened.get_all_notes().unwrap().len(), 1);
    }
}
