//! TUI runtime: owns the terminal, runs the event loop, executes effects.
//!
//! This is the "Elm runtime" boundary: all side effects happen here. The
//! reducer stays pure and produces effects; the [`Dispatcher`] executes them.
//!
//! ## Inbox Pattern
//!
//! - Handlers send `UiEvent`s to the inbox sender
//! - The runtime drains the receiver each loop iteration
//!
//! Structure:
//! - `mod.rs`: Core runtime (TuiRuntime, event loop)
//! - `dispatch.rs`: Effect execution
//! - `inbox.rs`: Inbox channel types
//! - `handlers/`: Effect handler implementations

mod dispatch;
mod handlers;
pub mod inbox;

use std::io::Stdout;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event;
pub use dispatch::Dispatcher;
use inbox::UiEventReceiver;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tasklane_core::config::Config;
use tasklane_core::platform::Platform;

use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::features::gate;
use crate::state::AppState;
use crate::{render, terminal, update};

/// Tick interval while something is animating (busy form, toasts).
pub const FRAME_DURATION: Duration = Duration::from_millis(16);

/// Tick interval when idle.
pub const IDLE_POLL_DURATION: Duration = Duration::from_millis(100);

/// Full-screen TUI runtime.
///
/// Owns the terminal and state. Terminal state is restored on drop and on
/// panic.
pub struct TuiRuntime {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    pub state: AppState,
    dispatcher: Dispatcher,
    inbox_rx: UiEventReceiver,
    last_tick: Instant,
}

impl TuiRuntime {
    pub fn new(config: &Config, platform: Platform) -> Result<Self> {
        terminal::install_panic_hook();
        let terminal = terminal::setup_terminal().context("Failed to setup terminal")?;

        let (inbox_tx, inbox_rx) = inbox::channel();
        Ok(Self {
            terminal,
            state: AppState::new(config.ui.clone()),
            dispatcher: Dispatcher::new(platform, inbox_tx),
            inbox_rx,
            last_tick: Instant::now(),
        })
    }

    /// Mounts the entry view and runs until the user quits.
    ///
    /// Must be called from a multi-threaded tokio runtime; the loop blocks
    /// its thread while polling the terminal.
    pub fn run(&mut self) -> Result<()> {
        let effects = gate::mount_initial(&mut self.state.tui);
        self.dispatcher.execute_effects(effects);

        let result = self.event_loop();

        // Release the mounted view's listener and subscription.
        if !self.state.tui.should_quit {
            self.dispatcher
                .execute_effects(gate::teardown(&self.state.tui));
        }
        result
    }

    fn event_loop(&mut self) -> Result<()> {
        let mut dirty = true;

        while !self.state.tui.should_quit {
            let events = self.collect_events()?;
            for event in events {
                if !matches!(event, UiEvent::Tick) {
                    dirty = true;
                }
                let effects = update::update(&mut self.state, event);
                self.execute_effects(effects);
            }

            if dirty {
                self.terminal.draw(|frame| {
                    render::render(&self.state, frame);
                })?;
                dirty = false;
            }
            if self.needs_fast_tick() {
                dirty = true;
            }
        }
        Ok(())
    }

    fn execute_effects(&mut self, effects: Vec<UiEffect>) {
        for effect in effects {
            if let UiEffect::Quit = effect {
                self.state.tui.should_quit = true;
                continue;
            }
            self.dispatcher.execute_effect(effect);
        }
    }

    /// Spinners and toast expiry need regular redraws.
    fn needs_fast_tick(&self) -> bool {
        use crate::state::View;

        let form_busy = match &self.state.tui.view {
            View::Login(form) | View::Register(form) => form.is_busy() || form.redirect_pending,
            View::Entry => true,
            View::Tasks(_) => !self.state.tui.session.resolved,
        };
        form_busy || !self.state.tui.toasts.is_empty()
    }

    // ========================================================================
    // Event Collection
    // ========================================================================

    fn collect_events(&mut self) -> Result<Vec<UiEvent>> {
        let mut events = Vec::new();

        let tick_interval = if self.needs_fast_tick() {
            FRAME_DURATION
        } else {
            IDLE_POLL_DURATION
        };

        while let Ok(event) = self.inbox_rx.try_recv() {
            events.push(event);
        }

        let time_until_tick = tick_interval.saturating_sub(self.last_tick.elapsed());
        let poll_duration = if events.is_empty() {
            time_until_tick
        } else {
            Duration::ZERO
        };

        if event::poll(poll_duration)? {
            events.push(UiEvent::Terminal(event::read()?));
            while event::poll(Duration::ZERO)? {
                events.push(UiEvent::Terminal(event::read()?));
            }
        }

        if self.last_tick.elapsed() >= tick_interval {
            events.push(UiEvent::Tick);
            self.last_tick = Instant::now();
        }

        Ok(events)
    }
}

impl Drop for TuiRuntime {
    fn drop(&mut self) {
        let _ = terminal::restore_terminal();
    }
}
