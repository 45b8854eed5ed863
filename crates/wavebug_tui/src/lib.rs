//! Terminal front end for the bug-detection waveform widget.
//!
//! Drives a [`wavebug_core::Simulation`] in real time and draws it with
//! ratatui: scrolling traces, the scanner bar, the fault highlight, and a
//! command bar for injecting faults and toggling rows.
//!
//! # Usage
//!
//! ```ignore
//! use rand::{rngs::StdRng, SeedableRng};
//! use wavebug_core::{RngBits, SimConfig, Simulation};
//!
//! let sim = Simulation::new(SimConfig::default(), RngBits(StdRng::from_entropy()));
//! wavebug_tui::run_tui(sim)?;
//! ```
//!
//! # Layout
//!
//! The TUI is divided into four panels:
//!
//! - **Signal List** (left): signals, visibility, bit under the scanner
//! - **Waveform** (right): scrolling traces with tick ruler
//! - **Status Bar**: lifecycle state, fault tick, playback, epoch
//! - **Command Input**: key hints or command prompt

#![warn(missing_docs)]

pub mod app;
pub mod commands;
pub mod error;
pub mod event;
pub mod render;
pub mod state;
pub mod terminal;
pub mod widgets;

use std::time::{Duration, Instant};

use tracing::info;
use wavebug_core::{BitSource, Simulation};

pub use app::TuiApp;
pub use error::TuiError;

use event::{poll_event, TuiEvent};
use terminal::{init_terminal, install_panic_hook, restore_terminal, Tui};

/// Runs the interactive widget until the user quits.
///
/// Sets up the terminal, runs the frame loop, and restores the terminal on
/// exit (including on error or panic).
///
/// # Errors
///
/// Returns [`TuiError`] if terminal I/O fails.
pub fn run_tui<B: BitSource>(sim: Simulation<B>) -> Result<(), TuiError> {
    install_panic_hook();
    let mut terminal = init_terminal()?;
    let mut app = TuiApp::new(sim);

    info!(fault = %app.sim.fault_tick(), "starting tui");
    let result = run_tui_loop(&mut app, &mut terminal);
    restore_terminal()?;
    info!(restarts = app.sim.restarts(), "tui closed");
    result
}

/// Frame loop: draw, wait up to one frame for input, feed elapsed time.
fn run_tui_loop<B: BitSource>(app: &mut TuiApp<B>, terminal: &mut Tui) -> Result<(), TuiError> {
    let frame = Duration::from_millis(50);
    let mut last = Instant::now();

    while !app.should_quit {
        terminal.draw(|f| render::render(app, f))?;

        match poll_event(frame)? {
            TuiEvent::Key(key) => app.handle_key(key.code),
            TuiEvent::Resize(..) | TuiEvent::Tick => {}
        }

        let now = Instant::now();
        app.tick(now - last);
        last = now;
    }
    Ok(())
}
