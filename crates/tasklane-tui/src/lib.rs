//! Full-screen TUI for tasklane.

pub mod common;
pub mod effects;
pub mod events;
pub mod features;
pub mod overlays;
pub mod render;
pub mod runtime;
pub mod state;
pub mod terminal;
pub mod update;

use std::io::{IsTerminal, stderr};

use anyhow::Result;
pub use runtime::{Dispatcher, TuiRuntime};
use tasklane_core::config::Config;
use tasklane_core::platform::Platform;

/// Runs the interactive app until the user quits.
pub async fn run_interactive(config: &Config, platform: Platform) -> Result<()> {
    if !stderr().is_terminal() {
        anyhow::bail!(
            "The interactive app requires a terminal.\n\
             Use `tasklane tasks list` for non-interactive access."
        );
    }

    let mut runtime = TuiRuntime::new(config, platform)?;
    let result = runtime.run();
    drop(runtime);
    tracing::info!("interactive session ended");
    result
}
