//! The bug lifecycle state machine.
//!
//! A fault walks through `Idle → Detected → Correcting → Fixed`. Each
//! transition is time-driven; this module only knows the ordering and how
//! long each state lasts. Scheduling lives in [`crate::scheduler`] and the
//! controller ties the two together.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::signal::{FaultTick, BITS_IN_LOOP};

/// Phase of the injected bug.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BugState {
    /// Waiting for the scanner to reach the fault.
    #[default]
    Idle,
    /// The scanner has found the fault.
    Detected,
    /// The fault is being repaired; the healed trace is shown.
    Correcting,
    /// Repaired. Terminal until the next restart.
    Fixed,
}

impl BugState {
    /// The state that follows this one, if any.
    pub fn successor(self) -> Option<BugState> {
        match self {
            BugState::Idle => Some(BugState::Detected),
            BugState::Detected => Some(BugState::Correcting),
            BugState::Correcting => Some(BugState::Fixed),
            BugState::Fixed => None,
        }
    }

    /// Whether this state freezes the scrolling animation.
    pub fn pauses_playback(self) -> bool {
        matches!(self, BugState::Detected | BugState::Correcting)
    }

    /// Whether the data row shows the healed trace.
    pub fn shows_corrected_trace(self) -> bool {
        matches!(self, BugState::Correcting | BugState::Fixed)
    }

    /// The annotation drawn next to the highlight, if any.
    pub fn annotation(self) -> Option<&'static str> {
        match self {
            BugState::Detected => Some("BUG DETECTED"),
            BugState::Correcting => Some("BUG CORRECTED"),
            _ => None,
        }
    }
}

impl fmt::Display for BugState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BugState::Idle => "idle",
            BugState::Detected => "detected",
            BugState::Correcting => "correcting",
            BugState::Fixed => "fixed",
        };
        f.write_str(s)
    }
}

/// Durations governing the scanner and the lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timing {
    /// Delay before the scanner starts moving.
    pub scan_delay: Duration,
    /// Time for the scanner to cross one loop.
    pub scan_duration: Duration,
    /// Time for the traces to scroll by one loop width.
    pub scroll_duration: Duration,
    /// How long `Detected` lasts.
    pub detect_hold: Duration,
    /// How long `Correcting` lasts.
    pub correct_hold: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            scan_delay: Duration::from_secs(1),
            scan_duration: Duration::from_secs(10),
            scroll_duration: Duration::from_secs(10),
            detect_hold: Duration::from_millis(1000),
            correct_hold: Duration::from_millis(1500),
        }
    }
}

impl Timing {
    /// When the scanner reaches the fault, measured from restart.
    pub fn detection_delay(&self, fault: FaultTick) -> Duration {
        self.scan_delay + self.scan_duration * fault.get() as u32 / BITS_IN_LOOP as u32
    }

    /// How long to wait in `state` before moving to its successor.
    ///
    /// Returns `None` for the terminal state.
    pub fn dwell(&self, state: BugState, fault: FaultTick) -> Option<Duration> {
        match state {
            BugState::Idle => Some(self.detection_delay(fault)),
            BugState::Detected => Some(self.detect_hold),
            BugState::Correcting => Some(self.correct_hold),
            BugState::Fixed => None,
        }
    }
}

/// The current lifecycle phase plus its transition history for the epoch.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Lifecycle {
    state: BugState,
    transitions: u32,
}

impl Lifecycle {
    /// A fresh lifecycle in `Idle`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> BugState {
        self.state
    }

    /// Transitions taken since the last reset.
    pub fn transitions(&self) -> u32 {
        self.transitions
    }

    /// Moves to `target` if it is the immediate successor of the current
    /// state. Anything else is refused and leaves the state untouched.
    pub fn advance_to(&mut self, target: BugState) -> bool {
        if self.state.successor() == Some(target) {
            self.state = target;
            self.transitions += 1;
            true
        } else {
            false
        }
    }

    /// Forces the lifecycle back to `Idle`.
    pub fn reset(&mut self) {
        self.state = BugState::Idle;
        self.transitions = 0;
    }
}
