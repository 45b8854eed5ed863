//! Command parsing for the TUI prompt.
//!
//! Commands are typed after `:` (or `i`, which pre-fills `inject `). Fault
//! tick validation is left to the simulation so the prompt reports exactly
//! the same error as any other front end.

use wavebug_core::SignalKind;

/// A parsed prompt command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TuiCommand {
    /// Inject a fault at the given tick (validated on execution).
    Inject {
        /// The tick as typed.
        tick: String,
    },
    /// Toggle the manual pause.
    TogglePause,
    /// Restart the animation and lifecycle.
    Restart,
    /// Show or hide a signal row.
    Toggle(SignalKind),
    /// Widen tick cells.
    ZoomIn,
    /// Narrow tick cells.
    ZoomOut,
    /// Toggle the help popup.
    ToggleHelp,
    /// Leave the TUI.
    Quit,
}

/// Parses a command string into a [`TuiCommand`].
pub fn parse_tui_command(input: &str) -> Result<TuiCommand, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err("empty command".to_string());
    }

    let (head, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (trimmed, ""),
    };
    let cmd = head.to_lowercase();

    match cmd.as_str() {
        "inject" | "i" => {
            if rest.is_empty() {
                return Err("inject requires a tick (e.g., 'inject 42')".to_string());
            }
            Ok(TuiCommand::Inject {
                tick: rest.to_string(),
            })
        }
        "pause" | "p" => Ok(TuiCommand::TogglePause),
        "restart" | "r" => Ok(TuiCommand::Restart),
        "toggle" | "t" => {
            if rest.is_empty() {
                return Err("toggle requires a signal name or row number".to_string());
            }
            parse_signal(rest).map(TuiCommand::Toggle)
        }
        "zoomin" | "zi" => Ok(TuiCommand::ZoomIn),
        "zoomout" | "zo" => Ok(TuiCommand::ZoomOut),
        "help" | "h" | "?" => Ok(TuiCommand::ToggleHelp),
        "quit" | "q" => Ok(TuiCommand::Quit),
        _ => Err(format!("unknown command '{head}' (try 'help')")),
    }
}

/// Resolves a signal by name or by 1-based row number.
fn parse_signal(arg: &str) -> Result<SignalKind, String> {
    if let Ok(row) = arg.parse::<usize>() {
        return row
            .checked_sub(1)
            .and_then(|i| SignalKind::ALL.get(i).copied())
            .ok_or_else(|| format!("row must be 1-{}, got {row}", SignalKind::ALL.len()));
    }
    SignalKind::from_name(arg).map_err(|e| e.to_string())
}
