//! Error types for the bug simulation.
//!
//! The simulation itself is total: the only failures are rejected user
//! input, represented as variants of [`WaveError`].

/// Errors surfaced to the user by the simulation controller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WaveError {
    /// A fault tick was non-numeric or outside `0..100`.
    #[error("fault tick must be an integer between 0 and {max}, got '{input}'")]
    InvalidFaultTick {
        /// The rejected input, as typed.
        input: String,
        /// The largest accepted tick.
        max: u32,
    },

    /// A signal name did not match any defined signal.
    #[error("unknown signal '{name}'")]
    UnknownSignal {
        /// The name that failed to resolve.
        name: String,
    },
}
