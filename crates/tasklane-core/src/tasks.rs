//! Typed task layer over the document store.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::platform::identity::Session;
use crate::platform::store::{
    Document, DocumentStore, Fields, Query, SnapshotStream, StoreError, StoreResult,
    WriteReceipt,
};

/// Collection holding every user's tasks.
pub const TASKS_COLLECTION: &str = "tasks";

/// Fixed set of task categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Category {
    #[default]
    Work,
    Study,
    Personal,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Work, Category::Study, Category::Personal];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Work => "Work",
            Category::Study => "Study",
            Category::Personal => "Personal",
        }
    }

    /// Next category in display order, wrapping around.
    pub fn next(self) -> Self {
        match self {
            Category::Work => Category::Study,
            Category::Study => Category::Personal,
            Category::Personal => Category::Work,
        }
    }

    pub fn previous(self) -> Self {
        match self {
            Category::Work => Category::Personal,
            Category::Study => Category::Work,
            Category::Personal => Category::Study,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown category '{s}' (expected work, study or personal)"))
    }
}

/// A task as seen by its owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: String,
    pub text: String,
    pub completed: bool,
    pub category: Category,
}

/// Stored field layout of a task document.
#[derive(Debug, Serialize, Deserialize)]
struct TaskFields {
    text: String,
    completed: bool,
    category: Category,
}

impl Task {
    fn from_document(document: &Document) -> Result<Self, serde_json::Error> {
        let fields: TaskFields =
            serde_json::from_value(serde_json::Value::Object(document.fields.clone()))?;
        Ok(Self {
            id: document.id.clone(),
            text: fields.text,
            completed: fields.completed,
            category: fields.category,
        })
    }
}

/// A task about to be created. New tasks are never completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub text: String,
    pub category: Category,
}

impl NewTask {
    /// Builds a task from draft input; `None` when the text is blank.
    pub fn from_draft(text: &str, category: Category) -> Option<Self> {
        if text.trim().is_empty() {
            None
        } else {
            Some(Self {
                text: text.to_string(),
                category,
            })
        }
    }

    fn into_fields(self) -> StoreResult<Fields> {
        let value = serde_json::to_value(TaskFields {
            text: self.text,
            completed: false,
            category: self.category,
        })
        .map_err(|e| StoreError::storage(format!("Failed to encode task: {e}")))?;
        match value {
            serde_json::Value::Object(fields) => Ok(fields),
            _ => Err(StoreError::storage("Task did not encode to an object")),
        }
    }
}

/// Ordered tasks at one store revision.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskSnapshot {
    pub revision: u64,
    pub tasks: Vec<Task>,
}

/// Live feed of the signed-in user's tasks.
pub struct TaskFeed {
    inner: SnapshotStream,
}

impl TaskFeed {
    /// Waits for the next snapshot; the first one is the current state.
    pub async fn next(&mut self) -> Option<TaskSnapshot> {
        let snapshot = self.inner.next().await?;
        let tasks = snapshot
            .documents
            .iter()
            .filter_map(|document| match Task::from_document(document) {
                Ok(task) => Some(task),
                Err(e) => {
                    warn!(id = %document.id, "skipping undecodable task: {e}");
                    None
                }
            })
            .collect();
        Some(TaskSnapshot {
            revision: snapshot.revision,
            tasks,
        })
    }
}

/// Task commands and subscription for one store.
#[derive(Clone)]
pub struct TaskRepository {
    store: Arc<dyn DocumentStore>,
}

impl TaskRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, session: &Session, task: NewTask) -> StoreResult<WriteReceipt> {
        let fields = task.into_fields()?;
        self.store.insert(session, TASKS_COLLECTION, fields).await
    }

    pub async fn set_completed(
        &self,
        session: &Session,
        id: &str,
        completed: bool,
    ) -> StoreResult<WriteReceipt> {
        let mut fields = Fields::new();
        fields.insert("completed".to_string(), serde_json::Value::Bool(completed));
        self.store.update(session, TASKS_COLLECTION, id, fields).await
    }

    pub async fn remove(&self, session: &Session, id: &str) -> StoreResult<WriteReceipt> {
        self.store.delete(session, TASKS_COLLECTION, id).await
    }

    /// Subscribes to the session owner's tasks.
    pub fn subscribe(&self, session: &Session) -> StoreResult<TaskFeed> {
        let inner = self
            .store
            .subscribe(session, Query::owned_by(TASKS_COLLECTION, session))?;
        Ok(TaskFeed { inner })
    }
}
