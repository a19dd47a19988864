//! Feature slices for the TUI (state/update/render per slice).

pub mod auth;
pub mod gate;
pub mod tasks;
pub mod toast;
