//! Row layout, signal visibility, and overlay placement.

use serde::{Deserialize, Serialize};

use crate::lifecycle::BugState;
use crate::path::TraceLevels;
use crate::signal::{FaultTick, SignalKind, BITS_IN_LOOP, SIGNAL_COUNT};

/// Vertical distance from the highlight centre up to the annotation.
pub const ANNOTATION_RISE: f64 = 45.0;

/// Pixel geometry of the trace area.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RowLayout {
    /// Width of one tick cell.
    pub bit_width: f64,
    /// Height of one signal row.
    pub row_height: f64,
    /// Gap between consecutive rows.
    pub row_gap: f64,
}

impl Default for RowLayout {
    fn default() -> Self {
        Self {
            bit_width: 16.0,
            row_height: 40.0,
            row_gap: 16.0,
        }
    }
}

impl RowLayout {
    /// Width of one loop in pixels.
    pub fn loop_width(&self) -> f64 {
        BITS_IN_LOOP as f64 * self.bit_width
    }

    /// Trace levels scaled to the row height (high at 1/4, low at 3/4).
    pub fn levels(&self) -> TraceLevels {
        TraceLevels {
            high: self.row_height * 0.25,
            low: self.row_height * 0.75,
            mid: self.row_height * 0.5,
        }
    }

    /// Horizontal centre of the fault's cell.
    pub fn fault_x(&self, fault: FaultTick) -> f64 {
        fault.get() as f64 * self.bit_width + self.bit_width / 2.0
    }

    /// Top of the data row, given which rows are visible.
    pub fn data_row_top(&self, visibility: &Visibility) -> f64 {
        visibility.visible_before(SignalKind::Data) as f64 * (self.row_height + self.row_gap)
    }
}

/// Per-signal visibility flags. Everything starts visible.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visibility {
    shown: [bool; SIGNAL_COUNT],
}

impl Default for Visibility {
    fn default() -> Self {
        Self {
            shown: [true; SIGNAL_COUNT],
        }
    }
}

impl Visibility {
    /// Whether a signal row is shown.
    pub fn is_visible(&self, kind: SignalKind) -> bool {
        self.shown[kind.index()]
    }

    /// Sets one flag.
    pub fn set(&mut self, kind: SignalKind, visible: bool) {
        self.shown[kind.index()] = visible;
    }

    /// Flips one flag and returns the new value.
    pub fn toggle(&mut self, kind: SignalKind) -> bool {
        let slot = &mut self.shown[kind.index()];
        *slot = !*slot;
        *slot
    }

    /// Counts visible rows declared before `kind`.
    pub fn visible_before(&self, kind: SignalKind) -> usize {
        self.shown[..kind.index()].iter().filter(|&&v| v).count()
    }

    /// Visible signals in row order.
    pub fn visible(&self) -> impl Iterator<Item = SignalKind> + '_ {
        SignalKind::ALL
            .into_iter()
            .filter(move |&k| self.is_visible(k))
    }
}

/// Where and how to draw the fault highlight.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Overlay {
    /// Lifecycle state the overlay represents.
    pub state: BugState,
    /// Horizontal centre of the highlight (trace coordinates).
    pub x: f64,
    /// Top of the data row.
    pub row_top: f64,
    /// Vertical centre of the highlight.
    pub center_y: f64,
    /// Top of the annotation box.
    pub annotation_y: f64,
    /// Annotation text.
    pub annotation: &'static str,
}

/// Computes the overlay for the current state, or `None` when nothing
/// should be drawn (idle/fixed, or the data row hidden).
pub fn overlay_for(
    state: BugState,
    fault: FaultTick,
    layout: &RowLayout,
    visibility: &Visibility,
) -> Option<Overlay> {
    if !visibility.is_visible(SignalKind::Data) {
        return None;
    }
    let annotation = state.annotation()?;
    let row_top = layout.data_row_top(visibility);
    let center_y = row_top + layout.row_height / 2.0;
    Some(Overlay {
        state,
        x: layout.fault_x(fault),
        row_top,
        center_y,
        annotation_y: center_y - ANNOTATION_RISE,
        annotation,
    })
}
