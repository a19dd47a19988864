//! Local, file-backed platform backend.
//!
//! Everything lives in one data directory:
//!
//! | File | Content |
//! |---|---|
//! | `accounts.json` | accounts keyed by email, salted password digests |
//! | `session.json` | the signed-in session, if any |
//! | `documents.json` | all document collections |
//! | `outbox.jsonl` | password-reset messages |

mod files;
mod identity;
mod store;

pub use identity::LocalIdentityProvider;
pub use store::LocalDocumentStore;

/// File name of the document store inside the data directory.
pub const DOCUMENTS_FILE: &str = "documents.json";
