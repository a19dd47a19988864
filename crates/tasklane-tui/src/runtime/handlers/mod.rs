//! Effect handlers for the TUI runtime.
//!
//! Handlers perform I/O against the platform and never touch state. One-shot
//! handlers are async functions returning a `UiEvent` that the dispatcher
//! spawns and forwards to the inbox. Streaming handlers (session and task
//! feeds) own the inbox sender and run until their view's scope is
//! cancelled.

pub mod auth;
pub mod session;
pub mod tasks;

pub use auth::*;
pub use session::*;
pub use tasks::*;
