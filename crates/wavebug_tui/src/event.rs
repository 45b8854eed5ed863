//! Event source for the TUI.
//!
//! Polls crossterm for input and turns timeouts into frame ticks so the
//! animation keeps moving while no key is pressed.

use std::time::Duration;

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};

/// Events produced by the event source for the TUI main loop.
#[derive(Clone, Debug)]
pub enum TuiEvent {
    /// A key was pressed.
    Key(KeyEvent),
    /// Nothing happened within the poll timeout; redraw.
    Tick,
    /// The terminal was resized.
    Resize(u16, u16),
}

/// Polls for the next TUI event with a timeout.
///
/// Key releases and repeats are folded into [`TuiEvent::Tick`] so each
/// press is handled once on terminals that report them.
pub fn poll_event(timeout: Duration) -> std::io::Result<TuiEvent> {
    if !event::poll(timeout)? {
        return Ok(TuiEvent::Tick);
    }
    Ok(match event::read()? {
        CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => TuiEvent::Key(key),
        CrosstermEvent::Resize(w, h) => TuiEvent::Resize(w, h),
        _ => TuiEvent::Tick,
    })
}
