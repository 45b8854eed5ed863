//! TUI state management.
//!
//! Contains the horizontal viewport (columns per tick), the input mode,
//! the signal selection, and the status line.

use wavebug_core::{BITS_IN_LOOP, SIGNALS};

/// Current input mode of the TUI.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputMode {
    /// Normal mode: single-key shortcuts.
    Normal,
    /// Command entry mode (`:` prefix).
    Command,
}

/// Horizontal scale of the waveform panel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewPort {
    /// Terminal columns used per tick cell.
    pub cols_per_tick: u16,
}

impl Default for ViewPort {
    fn default() -> Self {
        Self { cols_per_tick: 1 }
    }
}

impl ViewPort {
    /// Widest supported cell.
    pub const MAX_COLS_PER_TICK: u16 = 4;

    /// Widens each tick cell by one column.
    pub fn zoom_in(&mut self) {
        self.cols_per_tick = (self.cols_per_tick + 1).min(Self::MAX_COLS_PER_TICK);
    }

    /// Narrows each tick cell by one column.
    pub fn zoom_out(&mut self) {
        self.cols_per_tick = self.cols_per_tick.saturating_sub(1).max(1);
    }

    /// Tick shown at `col` when the traces are scrolled by `offset_ticks`.
    pub fn tick_at_col(&self, col: u16, offset_ticks: f64) -> usize {
        let cpt = self.cols_per_tick.max(1) as usize;
        let shift = (offset_ticks * cpt as f64).floor().max(0.0) as usize;
        ((col as usize + shift) / cpt) % BITS_IN_LOOP
    }

    /// Column of an unscrolled position given in ticks, if it fits in `width`.
    pub fn col_at_tick(&self, ticks: f64, width: u16) -> Option<u16> {
        if ticks < 0.0 {
            return None;
        }
        let col = (ticks * self.cols_per_tick as f64).floor();
        (col < width as f64).then_some(col as u16)
    }
}

/// Full TUI state.
#[derive(Clone, Debug)]
pub struct TuiState {
    /// Current input mode.
    pub mode: InputMode,
    /// Horizontal scale for the waveform panel.
    pub viewport: ViewPort,
    /// Index of the selected row in the signal list.
    pub selected_signal: usize,
    /// Text currently being typed in command mode.
    pub command_buffer: String,
    /// Status message displayed in the status bar.
    pub status_message: String,
    /// Whether the status message reports an error.
    pub status_is_error: bool,
    /// Whether the help popup is visible.
    pub show_help: bool,
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

impl TuiState {
    /// Creates a new TUI state with default settings.
    pub fn new() -> Self {
        Self {
            mode: InputMode::Normal,
            viewport: ViewPort::default(),
            selected_signal: 0,
            command_buffer: String::new(),
            status_message: String::new(),
            status_is_error: false,
            show_help: false,
        }
    }

    /// Moves the signal selection up.
    pub fn select_prev_signal(&mut self) {
        if self.selected_signal > 0 {
            self.selected_signal -= 1;
        }
    }

    /// Moves the signal selection down.
    pub fn select_next_signal(&mut self) {
        if self.selected_signal + 1 < SIGNALS.len() {
            self.selected_signal += 1;
        }
    }

    /// Opens the command prompt pre-filled with `prefill`.
    pub fn open_prompt(&mut self, prefill: &str) {
        self.mode = InputMode::Command;
        self.command_buffer.clear();
        self.command_buffer.push_str(prefill);
    }

    /// Closes the prompt and returns what was typed.
    pub fn take_prompt(&mut self) -> String {
        self.mode = InputMode::Normal;
        std::mem::take(&mut self.command_buffer)
    }

    /// Shows an informational message.
    pub fn set_info(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
        self.status_is_error = false;
    }

    /// Shows an error message.
    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
        self.status_is_error = true;
    }
}
