//! Signal definitions and per-tick bit generation.
//!
//! Four signals are simulated: a free-running clock, an active-low reset, a
//! randomly asserted `VALID` strobe, and an 8-bit data bus that carries the
//! injected fault. Clock and reset are pure functions of the tick; `VALID`
//! and the data bus draw from a [`BitSource`] so tests can substitute a
//! deterministic stub.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::bit::Bit;
use crate::error::WaveError;

/// Number of ticks in one animation loop.
pub const BITS_IN_LOOP: usize = 100;

/// Number of defined signals.
pub const SIGNAL_COUNT: usize = 4;

/// Probability that `VALID` is asserted inside its duty window.
pub const VALID_PROBABILITY: f64 = 0.7;

/// Reset is held low for ticks below this value.
const RESET_RELEASE_TICK: usize = 15;
/// `VALID` stays low up to and including this tick.
const VALID_QUIET_TICKS: usize = 20;
/// Length of the `VALID` duty window; the first half may assert.
const VALID_WINDOW: usize = 20;

/// Identity of one of the simulated signals.
///
/// Declaration order is row order.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum SignalKind {
    /// Free-running clock, 2 ticks high / 2 ticks low.
    Clock,
    /// Active-low reset.
    Reset,
    /// Data-valid strobe.
    Valid,
    /// The data bus, which carries the fault.
    Data,
}

impl SignalKind {
    /// All signals in row order.
    pub const ALL: [SignalKind; SIGNAL_COUNT] = [
        SignalKind::Clock,
        SignalKind::Reset,
        SignalKind::Valid,
        SignalKind::Data,
    ];

    /// Row index of this signal.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Returns the static definition of this signal.
    pub fn def(self) -> &'static SignalDef {
        &SIGNALS[self.index()]
    }

    /// Looks up a signal by its display name (case-insensitive).
    ///
    /// Also accepts the bare bus name `DATA` for `DATA[7:0]`.
    pub fn from_name(name: &str) -> Result<Self, WaveError> {
        let wanted = name.trim();
        SIGNALS
            .iter()
            .find(|def| {
                def.name.eq_ignore_ascii_case(wanted)
                    || def
                        .name
                        .split('[')
                        .next()
                        .is_some_and(|base| base.eq_ignore_ascii_case(wanted))
            })
            .map(|def| def.kind)
            .ok_or_else(|| WaveError::UnknownSignal {
                name: wanted.to_string(),
            })
    }
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.def().name)
    }
}

/// Static description of one signal row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignalDef {
    /// Which signal this is.
    pub kind: SignalKind,
    /// Row label.
    pub name: &'static str,
    /// Label color as `#rrggbb`.
    pub label_color: &'static str,
    /// Trace stroke color as `#rrggbb`.
    pub trace_color: &'static str,
}

/// The signal table, in row order.
pub static SIGNALS: [SignalDef; SIGNAL_COUNT] = [
    SignalDef {
        kind: SignalKind::Clock,
        name: "CLK",
        label_color: "#22d3ee",
        trace_color: "#22d3ee",
    },
    SignalDef {
        kind: SignalKind::Reset,
        name: "RESET_N",
        label_color: "#ef4444",
        trace_color: "#ef4444",
    },
    SignalDef {
        kind: SignalKind::Valid,
        name: "VALID",
        label_color: "#4ade80",
        trace_color: "#4ade80",
    },
    SignalDef {
        kind: SignalKind::Data,
        name: "DATA[7:0]",
        label_color: "#fb923c",
        trace_color: "#fb923c",
    },
];

/// The tick within a loop at which the data bus is corrupted.
///
/// Always in `0..BITS_IN_LOOP`; construct through [`FaultTick::new`] or by
/// parsing user input.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct FaultTick(u8);

impl FaultTick {
    /// Largest accepted tick.
    pub const MAX: u32 = BITS_IN_LOOP as u32 - 1;

    /// Creates a fault tick, returning `None` when out of range.
    pub fn new(tick: u32) -> Option<Self> {
        if tick <= Self::MAX {
            Some(Self(tick as u8))
        } else {
            None
        }
    }

    /// Returns the tick index.
    pub fn get(self) -> usize {
        self.0 as usize
    }

    /// Returns the fault position as a fraction of the loop, in `[0, 1)`.
    pub fn fraction(self) -> f64 {
        self.0 as f64 / BITS_IN_LOOP as f64
    }
}

impl Default for FaultTick {
    fn default() -> Self {
        Self(55)
    }
}

impl fmt::Display for FaultTick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for FaultTick {
    type Error = WaveError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u32::try_from(value)
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| WaveError::InvalidFaultTick {
                input: value.to_string(),
                max: Self::MAX,
            })
    }
}

impl From<FaultTick> for u8 {
    fn from(tick: FaultTick) -> Self {
        tick.0
    }
}

impl FromStr for FaultTick {
    type Err = WaveError;

    /// Parses a decimal tick, rejecting anything non-numeric or out of range.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || WaveError::InvalidFaultTick {
            input: s.to_string(),
            max: Self::MAX,
        };
        let value: i64 = s.trim().parse().map_err(|_| invalid())?;
        Self::try_from(value).map_err(|_| invalid())
    }
}

/// A source of independent random bits.
///
/// Consumed once per geometry regeneration; not required to be reproducible.
pub trait BitSource {
    /// Returns `true` with probability `p`.
    fn chance(&mut self, p: f64) -> bool;
}

/// Adapts any [`rand::Rng`] into a [`BitSource`].
#[derive(Clone, Debug)]
pub struct RngBits<R>(pub R);

impl<R: Rng> BitSource for RngBits<R> {
    fn chance(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }
}

impl<B: BitSource + ?Sized> BitSource for &mut B {
    fn chance(&mut self, p: f64) -> bool {
        (**self).chance(p)
    }
}

/// Clock: high while `tick mod 4 < 2`.
pub fn clock_bit(tick: usize) -> Bit {
    Bit::from_bool(tick % 4 < 2)
}

/// Active-low reset: low for the first 15 ticks, then released.
pub fn reset_bit(tick: usize) -> Bit {
    Bit::from_bool(tick >= RESET_RELEASE_TICK)
}

/// `VALID`: quiet through tick 20, then asserted with probability 0.7
/// during the first half of every 20-tick window.
pub fn valid_bit(tick: usize, source: &mut impl BitSource) -> Bit {
    if tick <= VALID_QUIET_TICKS || tick % VALID_WINDOW >= VALID_WINDOW / 2 {
        return Bit::Low;
    }
    Bit::from_bool(source.chance(VALID_PROBABILITY))
}

/// Data bus bit given the `VALID` sample for the same tick.
///
/// Driven low while `VALID` is low; the fault tick yields [`Bit::Unknown`];
/// anything else is a fair coin.
pub fn data_bit(
    tick: usize,
    valid: Bit,
    fault: Option<FaultTick>,
    source: &mut impl BitSource,
) -> Bit {
    if valid != Bit::High {
        return Bit::Low;
    }
    if fault.is_some_and(|f| tick % BITS_IN_LOOP == f.get()) {
        return Bit::Unknown;
    }
    Bit::from_bool(source.chance(0.5))
}

/// Bit sequences for every signal over one loop.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LoopBits {
    rows: [Vec<Bit>; SIGNAL_COUNT],
}

impl LoopBits {
    /// Builds a loop from explicit rows, in [`SignalKind::ALL`] order.
    pub fn from_rows(rows: [Vec<Bit>; SIGNAL_COUNT]) -> Self {
        Self { rows }
    }

    /// Returns the bits of one signal.
    pub fn get(&self, kind: SignalKind) -> &[Bit] {
        &self.rows[kind.index()]
    }

    /// Replaces the bits of one signal.
    pub fn set(&mut self, kind: SignalKind, bits: Vec<Bit>) {
        self.rows[kind.index()] = bits;
    }

    /// Iterates `(kind, bits)` pairs in row order.
    pub fn iter(&self) -> impl Iterator<Item = (SignalKind, &[Bit])> {
        SignalKind::ALL
            .into_iter()
            .map(move |kind| (kind, self.get(kind)))
    }
}

/// Generates one loop of bits for all signals.
///
/// The data bus is derived from the `VALID` samples of this same pass, so a
/// low `VALID` always coincides with a low data bit.
pub fn generate_loop(fault: FaultTick, source: &mut impl BitSource) -> LoopBits {
    let clock: Vec<Bit> = (0..BITS_IN_LOOP).map(clock_bit).collect();
    let reset: Vec<Bit> = (0..BITS_IN_LOOP).map(reset_bit).collect();
    let valid: Vec<Bit> = (0..BITS_IN_LOOP)
        .map(|tick| valid_bit(tick, source))
        .collect();
    let data: Vec<Bit> = valid
        .iter()
        .enumerate()
        .map(|(tick, &v)| data_bit(tick, v, Some(fault), source))
        .collect();
    LoopBits::from_rows([clock, reset, valid, data])
}

/// Generates a fault-free data sequence gated by an existing `VALID` row.
///
/// Used as the healed trace once the fault has been corrected. The data bits
/// are freshly drawn, not patched from the faulty sequence.
pub fn corrected_data(valid: &[Bit], source: &mut impl BitSource) -> Vec<Bit> {
    valid
        .iter()
        .enumerate()
        .map(|(tick, &v)| data_bit(tick, v, None, source))
        .collect()
}
