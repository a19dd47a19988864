//! Platform boundary: identity and document storage.

pub mod identity;
pub mod local;
pub mod store;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use self::identity::IdentityProvider;
use self::local::{DOCUMENTS_FILE, LocalDocumentStore, LocalIdentityProvider};
use self::store::DocumentStore;
use crate::tasks::TaskRepository;

/// Handles to the platform services, shared by every view and command.
#[derive(Clone)]
pub struct Platform {
    pub identity: Arc<dyn IdentityProvider>,
    pub store: Arc<dyn DocumentStore>,
}

impl Platform {
    pub fn new(identity: Arc<dyn IdentityProvider>, store: Arc<dyn DocumentStore>) -> Self {
        Self { identity, store }
    }

    /// Opens the local platform rooted at `data_dir`, creating it if needed.
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created or its files are
    /// corrupt.
    pub fn open_local(data_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("Failed to create data directory {}", data_dir.display()))?;
        let identity = LocalIdentityProvider::open(data_dir)
            .with_context(|| format!("Failed to open accounts in {}", data_dir.display()))?;
        let store = LocalDocumentStore::open(&data_dir.join(DOCUMENTS_FILE))
            .with_context(|| format!("Failed to open documents in {}", data_dir.display()))?;
        tracing::debug!(data_dir = %data_dir.display(), "local platform opened");
        Ok(Self::new(Arc::new(identity), Arc::new(store)))
    }

    /// Typed access to the tasks collection.
    pub fn tasks(&self) -> TaskRepository {
        TaskRepository::new(Arc::clone(&self.store))
    }
}
