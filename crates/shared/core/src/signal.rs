//! Trading signal and its wire encoding
//!
//! A signal is a discrete direction plus a model confidence. On the wire
//! (the shared signal log) each record is a single text line:
//! `<direction:int>,<confidence with 4 decimals>`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Discrete trade direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalDirection {
    Down,
    Neutral,
    Up,
}

impl SignalDirection {
    /// Integer encoding used on the wire: -1 / 0 / 1
    #[inline]
    pub fn as_i8(&self) -> i8 {
        match self {
            SignalDirection::Down => -1,
            SignalDirection::Neutral => 0,
            SignalDirection::Up => 1,
        }
    }

    pub fn from_i8(value: i8) -> Option<Self> {
        match value {
            -1 => Some(SignalDirection::Down),
            0 => Some(SignalDirection::Neutral),
            1 => Some(SignalDirection::Up),
            _ => None,
        }
    }
}

impl fmt::Display for SignalDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SignalDirection::Down => "SELL",
            SignalDirection::Neutral => "NEUTRAL",
            SignalDirection::Up => "BUY",
        };
        write!(f, "{}", label)
    }
}

/// One emitted trading signal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub direction: SignalDirection,
    /// Model probability-of-up estimate in [0, 1]
    pub confidence: f64,
}

impl Signal {
    pub fn new(direction: SignalDirection, confidence: f64) -> Self {
        Self {
            direction,
            confidence: confidence.clamp(0.0, 1.0),
        }
    }

    /// The neutral signal used when prediction degrades
    pub fn neutral() -> Self {
        Self::new(SignalDirection::Neutral, 0.5)
    }

    /// Encode as a wire record (no trailing newline)
    pub fn wire_line(&self) -> String {
        format!("{},{:.4}", self.direction.as_i8(), self.confidence)
    }

    /// Decode a wire record; `None` for malformed lines
    pub fn from_wire_line(line: &str) -> Option<Self> {
        let (dir, conf) = line.trim().split_once(',')?;
        let direction = SignalDirection::from_i8(dir.trim().parse().ok()?)?;
        let confidence: f64 = conf.trim().parse().ok()?;
        if !confidence.is_finite() || !(0.0..=1.0).contains(&confidence) {
            return None;
        }
        Some(Self {
            direction,
            confidence,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_round_trip() {
        let s = Signal::new(SignalDirection::Up, 0.9);
        assert_eq!(s.wire_line(), "1,0.9000");
        assert_eq!(Signal::from_wire_line("1,0.9000"), Some(s));
    }

    #[test]
    fn test_malformed_lines_rejected() {
        assert!(Signal::from_wire_line("").is_none());
        assert!(Signal::from_wire_line("1").is_none());
        assert!(Signal::from_wire_line("2,0.5").is_none());
        assert!(Signal::from_wire_line("1,1.5").is_none());
        assert!(Signal::from_wire_line("up,0.5").is_none());
        assert!(Signal::from_wire_line("signal,confidence").is_none());
    }

    #[test]
    fn test_confidence_clamped() {
        assert_eq!(Signal::new(SignalDirection::Down, 1.7).confidence, 1.0);
        assert_eq!(Signal::new(SignalDirection::Down, -0.2).confidence, 0.0);
    }

    #[test]
    fn test_direction_encoding() {
        for dir in [
            SignalDirection::Down,
            SignalDirection::Neutral,
            SignalDirection::Up,
        ] {
            assert_eq!(SignalDirection::from_i8(dir.as_i8()), Some(dir));
        }
        assert_eq!(SignalDirection::from_i8(3), None);
    }
}
