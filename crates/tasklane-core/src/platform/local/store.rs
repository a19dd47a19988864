//! File-backed document store.
//!
//! All collections live in one `documents.json`, rewritten atomically on every
//! write. Each write re-reads the file first so writes made by another process
//! on the same data directory are not lost. Snapshots are pushed in-process
//! through a `watch` channel carrying the whole store state.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, info};

use super::files;
use crate::platform::identity::Session;
use crate::platform::store::{
    Document, DocumentStore, Fields, OWNER_FIELD, Query, Snapshot, SnapshotSource,
    SnapshotStream, StoreError, StoreResult, WriteReceipt,
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoreFile {
    #[serde(default)]
    revision: u64,
    #[serde(default)]
    collections: BTreeMap<String, Collection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Collection {
    /// Store revision of the last write to this collection.
    #[serde(default)]
    revision: u64,
    #[serde(default)]
    documents: Vec<StoredDocument>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredDocument {
    id: String,
    fields: Fields,
}

impl StoreFile {
    fn collection_revision(&self, name: &str) -> Option<u64> {
        self.collections.get(name).map(|c| c.revision)
    }

    fn snapshot(&self, query: &Query) -> Snapshot {
        let documents = self
            .collections
            .get(&query.collection)
            .map(|c| {
                c.documents
                    .iter()
                    .map(|d| Document {
                        id: d.id.clone(),
                        fields: d.fields.clone(),
                    })
                    .filter(|d| query.matches(d))
                    .collect()
            })
            .unwrap_or_default();
        Snapshot {
            revision: self.revision,
            documents,
        }
    }
}

fn storage_error(err: &anyhow::Error) -> StoreError {
    StoreError::storage(format!("{err:#}"))
}

/// Rejects writes to documents the session does not own.
fn check_owner(
    session: &Session,
    collection: &str,
    document: &StoredDocument,
) -> StoreResult<()> {
    let owner = document
        .fields
        .get(OWNER_FIELD)
        .and_then(serde_json::Value::as_str);
    if owner == Some(session.uid.as_str()) {
        Ok(())
    } else {
        Err(StoreError::permission_denied(format!(
            "Document {collection}/{} belongs to another user",
            document.id
        )))
    }
}

/// Document store persisted to a single JSON file.
#[derive(Debug)]
pub struct LocalDocumentStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles.
    lock: Mutex<()>,
    tx: watch::Sender<Arc<StoreFile>>,
}

impl LocalDocumentStore {
    /// Opens (or lazily creates) the store at `path`.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be parsed.
    pub fn open(path: &Path) -> Result<Self> {
        let state: StoreFile = files::read_json_or_default(path)?;
        let (tx, _rx) = watch::channel(Arc::new(state));
        Ok(Self {
            path: path.to_path_buf(),
            lock: Mutex::new(()),
            tx,
        })
    }

    /// Applies `mutate` to one collection, bumps the revision and persists.
    fn write(
        &self,
        collection: &str,
        mutate: impl FnOnce(&mut Vec<StoredDocument>) -> StoreResult<String>,
    ) -> StoreResult<WriteReceipt> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_poisoned| StoreError::storage("Document store lock poisoned"))?;

        let mut state: StoreFile =
            files::read_json_or_default(&self.path).map_err(|e| storage_error(&e))?;
        let entry = state.collections.entry(collection.to_string()).or_default();
        let id = mutate(&mut entry.documents)?;

        state.revision += 1;
        let revision = state.revision;
        if let Some(entry) = state.collections.get_mut(collection) {
            entry.revision = revision;
        }

        files::write_json_atomic(&self.path, &state).map_err(|e| storage_error(&e))?;
        self.tx.send_replace(Arc::new(state));
        Ok(WriteReceipt { id, revision })
    }
}

#[async_trait]
impl DocumentStore for LocalDocumentStore {
    async fn insert(
        &self,
        session: &Session,
        collection: &str,
        mut fields: Fields,
    ) -> StoreResult<WriteReceipt> {
        fields.insert(
            OWNER_FIELD.to_string(),
            serde_json::Value::String(session.uid.clone()),
        );
        let receipt = self.write(collection, |documents| {
            let id = uuid::Uuid::new_v4().to_string();
            documents.push(StoredDocument {
                id: id.clone(),
                fields,
            });
            Ok(id)
        })?;
        info!(%collection, id = %receipt.id, revision = receipt.revision, "document inserted");
        Ok(receipt)
    }

    async fn update(
        &self,
        session: &Session,
        collection: &str,
        id: &str,
        fields: Fields,
    ) -> StoreResult<WriteReceipt> {
        let receipt = self.write(collection, |documents| {
            let document = documents
                .iter_mut()
                .find(|d| d.id == id)
                .ok_or_else(|| StoreError::not_found(collection, id))?;
            check_owner(session, collection, document)?;
            for (key, value) in fields {
                // Ownership is fixed at creation.
                if key != OWNER_FIELD {
                    document.fields.insert(key, value);
                }
            }
            Ok(id.to_string())
        })?;
        info!(%collection, %id, revision = receipt.revision, "document updated");
        Ok(receipt)
    }

    async fn delete(
        &self,
        session: &Session,
        collection: &str,
        id: &str,
    ) -> StoreResult<WriteReceipt> {
        let receipt = self.write(collection, |documents| {
            let index = documents
                .iter()
                .position(|d| d.id == id)
                .ok_or_else(|| StoreError::not_found(collection, id))?;
            check_owner(session, collection, &documents[index])?;
            documents.remove(index);
            Ok(id.to_string())
        })?;
        info!(%collection, %id, revision = receipt.revision, "document deleted");
        Ok(receipt)
    }

    fn subscribe(&self, session: &Session, query: Query) -> StoreResult<SnapshotStream> {
        if query.owner != session.uid {
            return Err(StoreError::permission_denied(format!(
                "Subscriptions to {} are limited to the caller's own documents",
                query.collection
            )));
        }
        debug!(collection = %query.collection, "snapshot subscription opened");
        Ok(Box::new(LocalSnapshotSource {
            rx: self.tx.subscribe(),
            query,
            last_seen: None,
        }))
    }
}

struct LocalSnapshotSource {
    rx: watch::Receiver<Arc<StoreFile>>,
    query: Query,
    /// Collection revision of the last delivered snapshot; `None` before the
    /// initial one.
    last_seen: Option<Option<u64>>,
}

#[async_trait]
impl SnapshotSource for LocalSnapshotSource {
    async fn next(&mut self) -> Option<Snapshot> {
        if self.last_seen.is_some() {
            loop {
                self.rx.changed().await.ok()?;
                let touched = self
                    .rx
                    .borrow_and_update()
                    .collection_revision(&self.query.collection);
                if Some(touched) != self.last_seen {
                    break;
                }
            }
        }
        let state = Arc::clone(&self.rx.borrow_and_update());
        self.last_seen = Some(state.collection_revision(&self.query.collection));
        Some(state.snapshot(&self.query))
    }
}
