//! Core library for tasklane.
//!
//! Holds everything that is not terminal-specific: configuration, logging,
//! the identity/document-store boundary with its local backend, the typed
//! task layer, and the validation and notification policy shared by the TUI
//! and the headless CLI.

pub mod config;
pub mod credentials;
pub mod logging;
pub mod notify;
pub mod password;
pub mod platform;
pub mod tasks;
