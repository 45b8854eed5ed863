//! Simulation core for the wavebug logic-analyzer widget.
//!
//! The widget shows four synthetic digital signals scrolling past a scanner
//! bar. A fault is injected into the data bus at a chosen tick; when the
//! scanner reaches it the bug is flagged, corrected, and marked fixed.
//!
//! # Architecture
//!
//! Bit generation ([`signal`]) is pure apart from a pluggable
//! [`BitSource`], so every sequence is reproducible under a seeded or stub
//! source. Geometry ([`path`]) turns bits into SVG path commands. The
//! lifecycle ([`lifecycle`]) is a linear state machine whose transitions are
//! queued on an epoch-tagged virtual clock ([`scheduler`]); restarts bump
//! the epoch so that stale timers can never fire. [`Simulation`] ties these
//! together and is the only type front ends need to drive.
//!
//! # Usage
//!
//! ```
//! use std::time::Duration;
//! use rand::SeedableRng;
//! use wavebug_core::{BugState, RngBits, SimConfig, Simulation};
//!
//! let rng = rand::rngs::StdRng::seed_from_u64(7);
//! let mut sim = Simulation::new(SimConfig::default(), RngBits(rng));
//! sim.set_fault_position("30").unwrap();
//! sim.advance(Duration::from_secs(4));
//! assert_eq!(sim.state(), BugState::Detected);
//! ```
//!
//! # Modules
//!
//! - `bit`: three-state logic values
//! - `signal`: signal table, fault tick, bit generation
//! - `path`: trace geometry
//! - `lifecycle`: bug states and timing
//! - `scheduler`: virtual-time timer queue
//! - `layout`: row geometry, visibility, overlay placement
//! - `simulation`: the controller
//! - `svg`: static frame rendering

#![warn(missing_docs)]

pub mod bit;
pub mod error;
pub mod layout;
pub mod lifecycle;
pub mod path;
pub mod scheduler;
pub mod signal;
pub mod simulation;
pub mod svg;

pub use bit::Bit;
pub use error::WaveError;
pub use layout::{Overlay, RowLayout, Visibility};
pub use lifecycle::{BugState, Timing};
pub use path::{PathCommand, TraceGeometry};
pub use scheduler::Epoch;
pub use signal::{BitSource, FaultTick, LoopBits, RngBits, SignalKind, BITS_IN_LOOP, SIGNALS};
pub use simulation::{SimConfig, Simulation, Trace};
pub use svg::render_svg;
