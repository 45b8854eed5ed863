//! Trace geometry: converts bit sequences into vector paths.
//!
//! A trace is a step waveform drawn cell by cell at a fixed horizontal
//! pitch. Unknown cells are left out of the main path and marked instead by
//! a crossing glyph on a separate overlay path, the way a logic analyzer
//! shows a conflict.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::bit::Bit;

/// A point in trace coordinates (pixels, y grows downward).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
}

impl Point {
    /// Creates a point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One SVG path command.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum PathCommand {
    /// Lift the pen and move to a point (`M`).
    MoveTo(Point),
    /// Draw a straight line to a point (`L`).
    LineTo(Point),
}

impl fmt::Display for PathCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathCommand::MoveTo(p) => write!(f, "M {},{}", p.x, p.y),
            PathCommand::LineTo(p) => write!(f, "L {},{}", p.x, p.y),
        }
    }
}

/// Vertical placement of the three trace levels within a row.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TraceLevels {
    /// y for a high bit.
    pub high: f64,
    /// y for a low bit.
    pub low: f64,
    /// y for an unknown bit.
    pub mid: f64,
}

impl Default for TraceLevels {
    fn default() -> Self {
        Self {
            high: 10.0,
            low: 30.0,
            mid: 20.0,
        }
    }
}

impl TraceLevels {
    /// Returns the y coordinate for a bit.
    pub fn level(&self, bit: Bit) -> f64 {
        match bit {
            Bit::High => self.high,
            Bit::Low => self.low,
            Bit::Unknown => self.mid,
        }
    }
}

/// A crossing glyph covering one unknown cell.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FaultGlyph {
    /// Index of the cell within the traced sequence.
    pub cell: usize,
    /// Left edge of the cell.
    pub x1: f64,
    /// Right edge of the cell.
    pub x2: f64,
}

/// Geometry for one signal row.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TraceGeometry {
    /// Main step trace.
    pub commands: Vec<PathCommand>,
    /// Fault glyphs, left to right.
    pub faults: Vec<FaultGlyph>,
    /// Levels the geometry was built with (needed to draw the glyphs).
    pub levels: TraceLevels,
}

impl TraceGeometry {
    /// SVG path data for the main trace.
    pub fn path_data(&self) -> String {
        join_commands(&self.commands)
    }

    /// SVG path data for the fault overlay; empty when there are no faults.
    pub fn fault_path_data(&self) -> String {
        let mut cmds = Vec::with_capacity(self.faults.len() * 4);
        for g in &self.faults {
            cmds.push(PathCommand::MoveTo(Point::new(g.x1, self.levels.high)));
            cmds.push(PathCommand::LineTo(Point::new(g.x2, self.levels.low)));
            cmds.push(PathCommand::MoveTo(Point::new(g.x1, self.levels.low)));
            cmds.push(PathCommand::LineTo(Point::new(g.x2, self.levels.high)));
        }
        join_commands(&cmds)
    }

    /// Returns `true` if the overlay path has any glyphs.
    pub fn has_faults(&self) -> bool {
        !self.faults.is_empty()
    }
}

fn join_commands(cmds: &[PathCommand]) -> String {
    cmds.iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Incremental path writer that merges collinear horizontal runs.
#[derive(Debug, Default)]
struct PathBuilder {
    commands: Vec<PathCommand>,
    pen: Option<Point>,
    // start of the segment ending at `pen`
    anchor: Option<Point>,
}

impl PathBuilder {
    fn move_to(&mut self, p: Point) {
        if let Some(PathCommand::MoveTo(last)) = self.commands.last_mut() {
            *last = p;
        } else {
            self.commands.push(PathCommand::MoveTo(p));
        }
        self.pen = Some(p);
        self.anchor = Some(p);
    }

    fn line_to(&mut self, p: Point) {
        let Some(pen) = self.pen else {
            self.move_to(p);
            return;
        };
        if pen == p {
            return;
        }
        let extends_run = matches!(self.commands.last(), Some(PathCommand::LineTo(_)))
            && self.anchor.is_some_and(|a| a.y == p.y)
            && pen.y == p.y;
        if extends_run {
            if let Some(PathCommand::LineTo(last)) = self.commands.last_mut() {
                *last = p;
            }
        } else {
            self.commands.push(PathCommand::LineTo(p));
            self.anchor = Some(pen);
        }
        self.pen = Some(p);
    }

    fn finish(self) -> Vec<PathCommand> {
        self.commands
    }
}

/// Builds the trace and fault overlay for a bit sequence.
///
/// Each bit occupies one cell of width `pitch`. High, low and unknown map to
/// the corresponding [`TraceLevels`]. Value changes draw a vertical edge at
/// the cell boundary; an unknown cell ends the current segment at the
/// boundary and the next known cell starts a fresh one.
pub fn build_trace(bits: &[Bit], pitch: f64, levels: TraceLevels) -> TraceGeometry {
    let mut builder = PathBuilder::default();
    let mut faults = Vec::new();

    if let Some(&first) = bits.first() {
        builder.move_to(Point::new(0.0, levels.level(first)));
    }

    for (i, &bit) in bits.iter().enumerate() {
        let prev = if i > 0 { bits[i - 1] } else { bit };
        let x1 = i as f64 * pitch;
        let x2 = (i + 1) as f64 * pitch;
        let y = levels.level(bit);
        let prev_y = levels.level(prev);

        if bit.is_unknown() {
            if !prev.is_unknown() {
                builder.line_to(Point::new(x1, prev_y));
            }
            faults.push(FaultGlyph { cell: i, x1, x2 });
            continue;
        }

        if prev.is_unknown() {
            builder.move_to(Point::new(x1, y));
        } else if bit != prev {
            builder.line_to(Point::new(x1, prev_y));
            builder.line_to(Point::new(x1, y));
        }
        builder.line_to(Point::new(x2, y));
    }

    TraceGeometry {
        commands: builder.finish(),
        faults,
        levels,
    }
}

/// Builds geometry for a loop drawn twice back to back, so that scrolling
/// by one loop width wraps seamlessly.
pub fn build_looped_trace(bits: &[Bit], pitch: f64, levels: TraceLevels) -> TraceGeometry {
    let doubled: Vec<Bit> = bits.iter().chain(bits.iter()).copied().collect();
    build_trace(&doubled, pitch, levels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bit::parse_bits;

    fn trace(s: &str) -> TraceGeometry {
        build_trace(&parse_bits(s).unwrap(), 16.0, TraceLevels::default())
    }

    #[test]
    fn all_high_is_single_horizontal_segment() {
        let g = trace(&"1".repeat(200));
        assert_eq!(
            g.commands,
            vec![
                PathCommand::MoveTo(Point::new(0.0, 10.0)),
                PathCommand::LineTo(Point::new(3200.0, 10.0)),
            ]
        );
        assert!(!g.has_faults());
        assert_eq!(g.fault_path_data(), "");
        assert_eq!(g.path_data(), "M 0,10 L 3200,10");
    }

    #[test]
    fn rising_edge_draws_vertical_at_boundary() {
        let g = trace("0011");
        assert_eq!(g.path_data(), "M 0,30 L 32,30 L 32,10 L 64,10");
    }

    #[test]
    fn falling_edge_draws_vertical_at_boundary() {
        let g = trace("10");
        assert_eq!(g.path_data(), "M 0,10 L 16,10 L 16,30 L 32,30");
    }

    #[test]
    fn single_unknown_yields_one_glyph_at_its_cell() {
        let g = trace("1101");
        assert!(!g.has_faults());
        let g = trace("11X11");
        assert_eq!(g.faults.len(), 1);
        assert_eq!(
            g.faults[0],
            FaultGlyph {
                cell: 2,
                x1: 32.0,
                x2: 48.0
            }
        );
        assert_eq!(g.fault_path_data(), "M 32,10 L 48,30 M 32,30 L 48,10");
    }

    #[test]
    fn leaving_unknown_starts_fresh_segment() {
        let g = trace("1X0");
        assert_eq!(g.path_data(), "M 0,10 L 16,10 M 32,30 L 48,30");
    }

    #[test]
    fn leading_unknown_moves_to_first_known_cell() {
        let g = trace("X1");
        assert_eq!(g.path_data(), "M 16,10 L 32,10");
        assert_eq!(g.faults.len(), 1);
        assert_eq!(g.faults[0].x1, 0.0);
    }

    #[test]
    fn consecutive_unknowns_make_one_glyph_each() {
        let g = trace("0XX0");
        assert_eq!(g.faults.len(), 2);
        assert_eq!(g.path_data(), "M 0,30 L 16,30 M 48,30 L 64,30");
    }

    #[test]
    fn empty_sequence_is_empty_geometry() {
        let g = build_trace(&[], 16.0, TraceLevels::default());
        assert!(g.commands.is_empty());
        assert!(g.faults.is_empty());
    }

    #[test]
    fn pitch_scales_coordinates() {
        let g = build_trace(&parse_bits("01").unwrap(), 10.0, TraceLevels::default());
        assert_eq!(g.path_data(), "M 0,30 L 10,30 L 10,10 L 20,10");
    }

    #[test]
    fn looped_trace_doubles_faults() {
        let g = build_looped_trace(&parse_bits("1X").unwrap(), 16.0, TraceLevels::default());
        let cells: Vec<usize> = g.faults.iter().map(|f| f.cell).collect();
        assert_eq!(cells, vec![1, 3]);
    }

    #[test]
    fn custom_levels_are_used() {
        let levels = TraceLevels {
            high: 2.0,
            low: 18.0,
            mid: 10.0,
        };
        let g = build_trace(&parse_bits("1").unwrap(), 16.0, levels);
        assert_eq!(g.path_data(), "M 0,2 L 16,2");
    }
}
