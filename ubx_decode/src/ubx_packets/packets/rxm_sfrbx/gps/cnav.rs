use super::NavWord;
use crate::{bits, error::DecodeError};

/// CNAV message type ids, IS-GPS-200 section 30
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CnavMessageType {
    Ephemeris1,
    Ephemeris2,
    ReducedAlmanac,
    ClockDifferentialCorrection,
    EphemerisDifferentialCorrection,
    Text,
    ClockIonoGroupDelay,
    ClockReducedAlmanac,
    ClockEop,
    ClockUtc,
    ClockDifferentialCorrectionSet,
    ClockGgto,
    ClockText,
    ClockMidiAlmanac,
    /// Default message (type 0) or any id not listed above
    Other(u8),
}

impl From<u8> for CnavMessageType {
    fn from(id: u8) -> Self {
        match id {
            10 => Self::Ephemeris1,
            11 => Self::Ephemeris2,
            12 => Self::ReducedAlmanac,
            13 => Self::ClockDifferentialCorrection,
            14 => Self::EphemerisDifferentialCorrection,
            15 => Self::Text,
            30 => Self::ClockIonoGroupDelay,
            31 => Self::ClockReducedAlmanac,
            32 => Self::ClockEop,
            33 => Self::ClockUtc,
            34 => Self::ClockDifferentialCorrectionSet,
            35 => Self::ClockGgto,
            36 => Self::ClockText,
            37 => Self::ClockMidiAlmanac,
            other => Self::Other(other),
        }
    }
}

/// CNAV message header. The message body is not interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CnavMessage {
    /// Leading byte of the first word
    pub preamble: u8,
    pub prn: u8,
    pub message_type: CnavMessageType,
}

impl CnavMessage {
    pub fn decode(words: &[NavWord]) -> Result<Self, DecodeError> {
        let first = words.first().ok_or(DecodeError::SchemaMismatch {
            message: "GPS CNAV message",
            expect: 1,
            got: 0,
        })?;
        Ok(Self {
            preamble: bits::unsigned(first.raw(), 24, 8) as u8,
            prn: bits::unsigned(first.raw(), 18, 6) as u8,
            message_type: CnavMessageType::from(bits::unsigned(first.raw(), 12, 6) as u8),
        })
    }
}
