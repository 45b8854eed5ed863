//! TUI application core.
//!
//! [`TuiApp`] owns the simulation and the TUI state. Key presses and prompt
//! commands are translated into simulation events here; the frame loop in
//! [`crate::run_tui`] feeds elapsed time through [`TuiApp::tick`].

use std::time::Duration;

use crossterm::event::KeyCode;
use tracing::debug;
use wavebug_core::{BitSource, SignalKind, Simulation};

use crate::commands::{parse_tui_command, TuiCommand};
use crate::state::{InputMode, TuiState};

/// The core TUI application state.
pub struct TuiApp<B> {
    /// The simulation being displayed.
    pub sim: Simulation<B>,
    /// UI state (viewport, selection, prompt).
    pub state: TuiState,
    /// Whether the application should quit.
    pub should_quit: bool,
}

impl<B: BitSource> TuiApp<B> {
    /// Wraps a simulation.
    pub fn new(sim: Simulation<B>) -> Self {
        Self {
            sim,
            state: TuiState::new(),
            should_quit: false,
        }
    }

    /// Advances the simulation by the wall-clock time since the last frame.
    pub fn tick(&mut self, elapsed: Duration) {
        self.sim.advance(elapsed);
    }

    /// Executes a prompt command and returns a status message.
    pub fn execute_command(&mut self, input: &str) -> Result<String, String> {
        let cmd = parse_tui_command(input)?;
        debug!(?cmd, "tui command");
        match cmd {
            TuiCommand::Inject { tick } => {
                let fault = self
                    .sim
                    .set_fault_position(&tick)
                    .map_err(|e| e.to_string())?;
                Ok(format!("Fault injected at tick {fault}"))
            }
            TuiCommand::TogglePause => Ok(self.toggle_pause()),
            TuiCommand::Restart => {
                self.sim.restart();
                Ok("Restarted".into())
            }
            TuiCommand::Toggle(kind) => Ok(self.toggle_row(kind)),
            TuiCommand::ZoomIn => {
                self.state.viewport.zoom_in();
                Ok(format!("{} col/tick", self.state.viewport.cols_per_tick))
            }
            TuiCommand::ZoomOut => {
                self.state.viewport.zoom_out();
                Ok(format!("{} col/tick", self.state.viewport.cols_per_tick))
            }
            TuiCommand::ToggleHelp => {
                self.state.show_help = !self.state.show_help;
                Ok(String::new())
            }
            TuiCommand::Quit => {
                self.should_quit = true;
                Ok("Quitting".into())
            }
        }
    }

    fn toggle_pause(&mut self) -> String {
        if self.sim.toggle_manual_pause() {
            "Paused".into()
        } else {
            "Resumed".into()
        }
    }

    fn toggle_row(&mut self, kind: SignalKind) -> String {
        let shown = self.sim.toggle_signal_visibility(kind);
        format!("{kind} {}", if shown { "shown" } else { "hidden" })
    }

    /// Handles a key event in normal mode.
    pub fn handle_normal_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char(' ') => {
                let msg = self.toggle_pause();
                self.state.set_info(msg);
            }
            KeyCode::Char(c @ '1'..='4') => {
                let idx = c as usize - '1' as usize;
                let msg = self.toggle_row(SignalKind::ALL[idx]);
                self.state.set_info(msg);
            }
            KeyCode::Char('i') => self.state.open_prompt("inject "),
            KeyCode::Char(':') => self.state.open_prompt(""),
            KeyCode::Char('r') => {
                self.sim.restart();
                self.state.set_info("Restarted");
            }
            KeyCode::Char('?') => {
                self.state.show_help = !self.state.show_help;
            }
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next_signal(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev_signal(),
            KeyCode::Enter => {
                let kind = SignalKind::ALL[self.state.selected_signal];
                let msg = self.toggle_row(kind);
                self.state.set_info(msg);
            }
            KeyCode::Char('+') | KeyCode::Char('=') => self.state.viewport.zoom_in(),
            KeyCode::Char('-') => self.state.viewport.zoom_out(),
            KeyCode::Esc => self.state.show_help = false,
            _ => {}
        }
    }

    /// Handles a key event in command mode.
    pub fn handle_command_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => {
                self.state.take_prompt();
            }
            KeyCode::Enter => {
                let cmd = self.state.take_prompt();
                if cmd.trim().is_empty() {
                    return;
                }
                match self.execute_command(&cmd) {
                    Ok(msg) => {
                        if !msg.is_empty() {
                            self.state.set_info(msg);
                        }
                    }
                    Err(err) => self.state.set_error(format!("Error: {err}")),
                }
            }
            KeyCode::Backspace => {
                self.state.command_buffer.pop();
            }
            KeyCode::Char(c) => {
                self.state.command_buffer.push(c);
            }
            _ => {}
        }
    }

    /// Routes a key to the handler for the current input mode.
    pub fn handle_key(&mut self, key: KeyCode) {
        match self.state.mode {
            InputMode::Normal => self.handle_normal_key(key),
            InputMode::Command => self.handle_command_key(key),
        }
    }
}

/// Returns the help text for the TUI.
pub fn help_text() -> &'static str {
    "\
Keys:
  Space      Pause / resume (resume restarts)
  1-4        Show / hide CLK, RESET_N, VALID, DATA
  j/k ↑/↓    Select row        Enter   Toggle selected row
  i          Inject fault      r       Restart
  +/-        Zoom              :       Command mode
  ?          Toggle help       q       Quit

Commands:
  inject <n>     Inject fault at tick 0-99
  pause          Pause / resume
  restart        Restart animation
  toggle <sig>   Show / hide a row (name or 1-4)
  zoomin/zo      Zoom in/out
  quit (q)       Exit

Press ? to close"
}
