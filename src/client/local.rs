//! Local snapshot storage.
//!
//! A directory of JSON documents, one per key. The dashboard keeps each
//! collection as a single array under a fixed key, so a write always replaces
//! the whole collection (last write wins).

use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::backend::{Backend, Collection};
use super::error::ClientError;
use crate::assistant;
use crate::insights::{self, ANALYTICS_WELLNESS_WINDOW, ProductivityReport};
use crate::models::{
    ChatDraft, ChatExchange, ChatMessage, Note, PrioritizeOutcome, Role, SummarizedNote, Task,
    TaskStatus, User, UserPatch, WellnessEntry,
};

pub const USER_KEY: &str = "lifeos-user";

pub struct KeyValueStore {
    dir: PathBuf,
}

impl KeyValueStore {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, ClientError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, ClientError> {
        let path = self.path(key);
        if !path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&raw)?))
    }

    /// Replace the value under `key`; readers never see a partial file
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), ClientError> {
        let json = serde_json::to_string_pretty(value)?;
        let tmp = self.dir.join(format!(".{}.json.tmp", key));
        fs::write(&tmp, json)?;
        fs::rename(tmp, self.path(key))?;
        Ok(())
    }

}

/// Append a user message and one canned reply
pub(crate) fn exchange_in<R: Rng + ?Sized>(
    chat: &mut Vec<ChatMessage>,
    content: &str,
    name: &str,
    rng: &mut R,
    now: DateTime<Utc>,
) -> Result<ChatExchange, ClientError> {
    let request = crate::models::ChatRequest {
        content: content.to_string(),
    };
    request.validate()?;

    let user_message = ChatMessage::from_draft(
        ChatDraft {
            role: Role::User,
            content: request.content,
        },
        crate::models::new_id(),
        now,
    );
    let ai_message = ChatMessage::from_draft(
        ChatDraft {
            role: Role::Assistant,
            content: assistant::reply_to(content, name, rng),
        },
        crate::models::new_id(),
        now,
    );
    chat.push(user_message.clone());
    chat.push(ai_message.clone());
    Ok(ChatExchange {
        user_message,
        ai_message,
    })
}

/// Suggest for every task lacking one, then stable-sort by priority.
/// Pending tasks count as updated, like the server's variant.
pub(crate) fn prioritize_in<R: Rng + ?Sized>(
    tasks: &mut [Task],
    rng: &mut R,
    now: DateTime<Utc>,
) -> PrioritizeOutcome {
    insights::assign_suggestions(tasks, rng);
    let mut count = 0;
    for task in tasks.iter_mut().filter(|t| t.status == TaskStatus::Pending) {
        task.updated_at = now;
        count += 1;
    }
    insights::sort_by_priority(tasks);
    PrioritizeOutcome {
        message: "Tasks prioritized successfully".to_string(),
        count,
    }
}

pub(crate) fn summarize_in(
    notes: &mut [Note],
    id: &str,
    now: DateTime<Utc>,
) -> Result<SummarizedNote, ClientError> {
    let note = notes
        .iter_mut()
        .find(|n| n.id == id)
        .ok_or_else(|| ClientError::NotFound("Note".to_string()))?;
    let analysis = insights::summarize(&note.content);
    note.summary = Some(analysis.summary.clone());
    note.merge_tags(analysis.tags.iter().cloned());
    note.updated_at = now;
    Ok(SummarizedNote {
        note: note.clone(),
        analysis,
    })
}

/// Offline backend over a [`KeyValueStore`]
pub struct LocalBackend {
    kv: KeyValueStore,
    rng: Mutex<StdRng>,
}

impl LocalBackend {
    pub fn new(kv: KeyValueStore) -> Self {
        Self::with_rng(kv, StdRng::from_os_rng())
    }

    pub fn with_rng(kv: KeyValueStore, rng: StdRng) -> Self {
        Self {
            kv,
            rng: Mutex::new(rng),
        }
    }

    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, ClientError> {
        Ok(Self::new(KeyValueStore::open(dir)?))
    }

    /// Overwrite one collection
    pub fn save<C: Collection>(&self, items: &[C]) -> Result<(), ClientError> {
        self.kv.set(C::LOCAL_KEY, items)
    }

    pub fn save_user(&self, user: &User) -> Result<(), ClientError> {
        self.kv.set(USER_KEY, user)
    }

    fn with_rng_mut<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        // A panic elsewhere leaves the generator usable
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut *rng)
    }

    fn modify<C: Collection, T>(
        &self,
        f: impl FnOnce(&mut Vec<C>) -> Result<T, ClientError>,
    ) -> Result<T, ClientError> {
        let mut items = self.list::<C>()?;
        let out = f(&mut items)?;
        self.save(&items)?;
        Ok(out)
    }
}

impl Backend for LocalBackend {
    /// A key that was never written is seeded with the kind's sample records,
    /// so later reads see the same ids
    fn list<C: Collection>(&self) -> Result<Vec<C>, ClientError> {
        match self.kv.get::<Vec<C>>(C::LOCAL_KEY)? {
            Some(items) => Ok(items),
            None => {
                let samples = C::samples(Utc::now());
                self.save(&samples)?;
                Ok(samples)
            }
        }
    }

    fn create<C: Collection>(&self, draft: C::Draft) -> Result<C, ClientError> {
        self.modify::<C, _>(|items| C::create_in(items, draft, Utc::now()))
    }

    fn update<C: Collection>(&self, id: &str, patch: C::Patch) -> Result<C, ClientError> {
        self.modify::<C, _>(|items| C::update_in(items, id, patch, Utc::now()))
    }

    fn delete<C: Collection>(&self, id: &str) -> Result<(), ClientError> {
        self.modify::<C, _>(|items| C::delete_in(items, id))
    }

    fn send_message(&self, content: &str) -> Result<ChatExchange, ClientError> {
        let name = self.user()?.name;
        self.modify(|chat: &mut Vec<ChatMessage>| {
            self.with_rng_mut(|rng| exchange_in(chat, content, &name, rng, Utc::now()))
        })
    }

    fn prioritize_tasks(&self) -> Result<PrioritizeOutcome, ClientError> {
        self.modify(|tasks: &mut Vec<Task>| {
            Ok(self.with_rng_mut(|rng| prioritize_in(tasks, rng, Utc::now())))
        })
    }

    fn summarize_note(&self, id: &str) -> Result<SummarizedNote, ClientError> {
        self.modify(|notes: &mut Vec<Note>| summarize_in(notes, id, Utc::now()))
    }

    fn productivity(&self) -> Result<ProductivityReport, ClientError> {
        let tasks = self.list::<Task>()?;
        let mut wellness = self.list::<WellnessEntry>()?;
        wellness.truncate(ANALYTICS_WELLNESS_WINDOW);
        Ok(insights::productivity_report(&tasks, &wellness))
    }

    fn user(&self) -> Result<User, ClientError> {
        if let Some(user) = self.kv.get::<User>(USER_KEY)? {
            return Ok(user);
        }
        let user = User::new(crate::models::new_id(), Utc::now());
        self.save_user(&user)?;
        Ok(user)
    }

    fn update_user(&self, patch: UserPatch) -> Result<User, ClientError> {
        patch.validate()?;
        let mut user = self.user()?;
        user.apply(patch);
        self.save_user(&user)?;
        Ok(user)
    }
}
