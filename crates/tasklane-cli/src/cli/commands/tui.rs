use anyhow::{Context, Result};
use tasklane_core::config::Config;
use tasklane_core::platform::Platform;

pub async fn run(config: &Config, platform: Platform) -> Result<()> {
    tasklane_tui::run_interactive(config, platform)
        .await
        .context("interactive session failed")
}
