//! Error type for the terminal front end.

/// Errors raised while driving the terminal.
#[derive(Debug, thiserror::Error)]
pub enum TuiError {
    /// Terminal setup, drawing, or event polling failed.
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
}
