//! CLI command handlers.

pub mod account;
pub mod config;
pub mod tasks;
pub mod tui;

use anyhow::{Result, bail};
use tasklane_core::notify::Notification;

/// Prints the notification of a command that went through.
fn done(notification: Notification) -> Result<()> {
    println!("{notification}");
    Ok(())
}

/// Fails the command with the notification as its error.
fn fail(notification: Notification) -> Result<()> {
    bail!("{notification}")
}
