//! Three-state bit values carried by a generated signal trace.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single trace sample.
///
/// The three states represent:
/// - `Low`: driven 0
/// - `High`: driven 1
/// - `Unknown`: the injected fault marker (drawn as a crossing glyph)
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[repr(u8)]
pub enum Bit {
    /// Logic low (0).
    Low = 0,
    /// Logic high (1).
    High = 1,
    /// Unknown / faulted value.
    Unknown = 2,
}

impl Bit {
    /// Converts a character to a [`Bit`].
    ///
    /// Accepts '0', '1', and 'x'/'X'.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '0' => Some(Bit::Low),
            '1' => Some(Bit::High),
            'x' | 'X' => Some(Bit::Unknown),
            _ => None,
        }
    }

    /// Converts a boolean into a driven bit.
    pub fn from_bool(b: bool) -> Self {
        if b {
            Bit::High
        } else {
            Bit::Low
        }
    }

    /// Returns `true` for the fault marker.
    pub fn is_unknown(self) -> bool {
        self == Bit::Unknown
    }
}

impl fmt::Display for Bit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bit::Low => write!(f, "0"),
            Bit::High => write!(f, "1"),
            Bit::Unknown => write!(f, "X"),
        }
    }
}

/// Parses a string of `0`/`1`/`X` characters into bits.
///
/// Returns `None` if any character is not a valid bit.
pub fn parse_bits(s: &str) -> Option<Vec<Bit>> {
    s.chars().map(Bit::from_char).collect()
}

/// Formats a bit slice as a compact `0`/`1`/`X` string.
pub fn format_bits(bits: &[Bit]) -> String {
    bits.iter().map(|b| b.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_char_accepts_both_cases() {
        assert_eq!(Bit::from_char('0'), Some(Bit::Low));
        assert_eq!(Bit::from_char('1'), Some(Bit::High));
        assert_eq!(Bit::from_char('x'), Some(Bit::Unknown));
        assert_eq!(Bit::from_char('X'), Some(Bit::Unknown));
        assert_eq!(Bit::from_char('z'), None);
    }

    #[test]
    fn display_matches_trace_notation() {
        assert_eq!(format_bits(&[Bit::High, Bit::Low, Bit::Unknown]), "10X");
    }

    #[test]
    fn parse_bits_rejects_garbage() {
        assert_eq!(parse_bits("01x").unwrap().len(), 3);
        assert!(parse_bits("012").is_none());
    }

    #[test]
    fn serde_roundtrip() {
        let json = serde_json::to_string(&Bit::Unknown).unwrap();
        let back: Bit = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Bit::Unknown);
    }
}
