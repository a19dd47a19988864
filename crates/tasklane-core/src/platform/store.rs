//! Document store boundary.
//!
//! Collections hold ordered documents with JSON fields. Every write bumps a
//! store-wide revision; receipts and snapshots carry it, so a client can tell
//! whether a snapshot already reflects one of its writes.
//!
//! Documents are owned: `insert` stamps [`OWNER_FIELD`] with the caller's uid,
//! writes to documents owned by someone else are rejected, and subscriptions
//! are only accepted for the caller's own documents.

use std::fmt;

use async_trait::async_trait;
use serde_json::Value;

use super::identity::Session;

/// Field holding the uid of the document's owner.
pub const OWNER_FIELD: &str = "owner";

/// Document fields.
pub type Fields = serde_json::Map<String, Value>;

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Store-assigned, immutable id.
    pub id: String,
    pub fields: Fields,
}

impl Document {
    pub fn owner(&self) -> Option<&str> {
        self.fields.get(OWNER_FIELD).and_then(Value::as_str)
    }
}

/// A complete, ordered view of the documents matching a query.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Snapshot {
    pub revision: u64,
    pub documents: Vec<Document>,
}

/// Acknowledgement of an applied write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteReceipt {
    pub id: String,
    /// Revision at which the write became visible.
    pub revision: u64,
}

/// Subscription query: one collection, restricted to one owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub collection: String,
    pub owner: String,
}

impl Query {
    pub fn owned_by(collection: impl Into<String>, session: &Session) -> Self {
        Self {
            collection: collection.into(),
            owner: session.uid.clone(),
        }
    }

    pub fn matches(&self, document: &Document) -> bool {
        document.owner() == Some(self.owner.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorKind {
    PermissionDenied,
    NotFound,
    Storage,
}

impl fmt::Display for StoreErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreErrorKind::PermissionDenied => write!(f, "permission-denied"),
            StoreErrorKind::NotFound => write!(f, "not-found"),
            StoreErrorKind::Storage => write!(f, "storage"),
        }
    }
}

/// Structured store error with kind and a one-line message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreError {
    pub kind: StoreErrorKind,
    pub message: String,
}

impl StoreError {
    pub fn new(kind: StoreErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::PermissionDenied, message)
    }

    pub fn not_found(collection: &str, id: &str) -> Self {
        Self::new(
            StoreErrorKind::NotFound,
            format!("No document {collection}/{id}"),
        )
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::Storage, message)
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.kind)
    }
}

impl std::error::Error for StoreError {}

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Live source of snapshots for one query.
#[async_trait]
pub trait SnapshotSource: Send {
    /// Waits for the next snapshot.
    ///
    /// The first call resolves immediately with the current state. Returns
    /// `None` once the store has been dropped.
    async fn next(&mut self) -> Option<Snapshot>;
}

pub type SnapshotStream = Box<dyn SnapshotSource>;

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Inserts a document and returns its new id.
    async fn insert(
        &self,
        session: &Session,
        collection: &str,
        fields: Fields,
    ) -> StoreResult<WriteReceipt>;

    /// Merges `fields` into an existing document.
    async fn update(
        &self,
        session: &Session,
        collection: &str,
        id: &str,
        fields: Fields,
    ) -> StoreResult<WriteReceipt>;

    async fn delete(&self, session: &Session, collection: &str, id: &str)
    -> StoreResult<WriteReceipt>;

    /// Opens a live subscription.
    fn subscribe(&self, session: &Session, query: Query) -> StoreResult<SnapshotStream>;
}
