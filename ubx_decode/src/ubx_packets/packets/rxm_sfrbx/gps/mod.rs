//! GPS navigation messages carried by RXM-SFRBX

//////////////////////////////////////////////////////////////
// NB: the receiver strips nothing, each 30-bit word keeps its
// 6 parity bits in the container LSBs. See bits.rs
//////////////////////////////////////////////////////////////
mod cnav;
mod lnav;
mod pages;

pub use cnav::*;
pub use lnav::*;
pub use pages::*;

use chrono::TimeDelta;
use log::trace;

use super::NavWord;
use crate::{
    bits,
    constants::{GPS_DATA_BITS, GPS_L1CA_PREAMBLE, GPS_LNAV_WORDS, GPS_PARITY_SIZE},
    error::DecodeError,
};

/// Position of a field inside a 30-bit navigation word
#[derive(Debug, Clone, Copy)]
pub(crate) struct Field {
    offset: u32,
    width: u32,
}

impl Field {
    /// Field occupying bits `first..=last` of a word, bits numbered 1..=30
    /// from the MSB as in the IS-GPS-200 subframe figures.
    pub(crate) const fn icd(first: u32, last: u32) -> Self {
        Self {
            offset: 30 - last,
            width: last - first + 1,
        }
    }

    pub(crate) fn unsigned(self, word: NavWord) -> u32 {
        bits::unsigned(word.raw(), self.offset, self.width)
    }

    pub(crate) fn signed(self, word: NavWord) -> i32 {
        bits::signed(word.raw(), self.offset, self.width)
    }

    pub(crate) fn flag(self, word: NavWord) -> bool {
        self.unsigned(word) != 0
    }
}

/// `width` data bits starting at data bit `start` of a subframe, data bits
/// counted from 0 at the MSB of word 1 with parity skipped.
/// A field may straddle two consecutive words.
pub(crate) fn data_bits(words: &[NavWord; GPS_LNAV_WORDS], start: u32, width: u32) -> u32 {
    let word = (start / GPS_DATA_BITS) as usize;
    let bit = start % GPS_DATA_BITS;
    let first = GPS_DATA_BITS - bit;
    if width <= first {
        let offset = GPS_PARITY_SIZE + first - width;
        words[word].unsigned(offset, width)
    } else {
        bits::spanning(
            words[word + 1].raw(),
            words[word].raw(),
            width - first,
            first,
        )
    }
}

pub(crate) fn data_bits_signed(words: &[NavWord; GPS_LNAV_WORDS], start: u32, width: u32) -> i32 {
    bits::sign_extend(data_bits(words, start, width), width)
}

const TLM_PREAMBLE: Field = Field::icd(1, 8);
const TLM_MESSAGE: Field = Field::icd(9, 22);
const TLM_INTEGRITY: Field = Field::icd(23, 23);
const TLM_RESERVED: Field = Field::icd(24, 24);

const HOW_TOW: Field = Field::icd(1, 17);
const HOW_ALERT: Field = Field::icd(18, 18);
const HOW_ANTI_SPOOFING: Field = Field::icd(19, 19);
pub(crate) const HOW_SUBFRAME_ID: Field = Field::icd(20, 22);

/// Telemetry word, first word of every LNAV subframe
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GpsTelemetry {
    pub preamble: u8,

    /// 14-bit TLM message
    pub message: u16,

    /// Integrity status flag: the signal is provided with an enhanced
    /// level of integrity assurance
    pub integrity: bool,

    pub reserved: bool,
}

impl GpsTelemetry {
    pub fn decode(word: NavWord) -> Self {
        Self {
            preamble: TLM_PREAMBLE.unsigned(word) as u8,
            message: TLM_MESSAGE.unsigned(word) as u16,
            integrity: TLM_INTEGRITY.flag(word),
            reserved: TLM_RESERVED.flag(word),
        }
    }
}

/// Handover word, second word of every LNAV subframe
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GpsHandover {
    /// Time of week of the next subframe start (s)
    pub tow_s: u32,

    /// SV URA may be worse than indicated in subframe 1,
    /// use this SV at your own risk.
    pub alert: bool,

    /// A-S mode is ON in that SV
    pub anti_spoofing: bool,

    /// 3-bit subframe id
    pub subframe_id: u8,
}

impl GpsHandover {
    pub fn decode(word: NavWord) -> Self {
        Self {
            tow_s: HOW_TOW.unsigned(word) * 6,
            alert: HOW_ALERT.flag(word),
            anti_spoofing: HOW_ANTI_SPOOFING.flag(word),
            subframe_id: HOW_SUBFRAME_ID.unsigned(word) as u8,
        }
    }

    pub fn time_of_week(&self) -> TimeDelta {
        TimeDelta::seconds(i64::from(self.tow_s))
    }
}

/// GPS navigation message, one variant per signal family
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum GpsNavMessage {
    /// L1 C/A legacy navigation subframe
    Lnav(LnavSubframe),
    /// Civil navigation message, header only
    Cnav(CnavMessage),
}

struct NavFamily {
    name: &'static str,
    matches: fn(NavWord) -> bool,
    decode: fn(&[NavWord]) -> Result<GpsNavMessage, DecodeError>,
}

/// Tried in order, the last entry takes whatever is left.
const FAMILIES: &[NavFamily] = &[
    NavFamily {
        name: "LNAV",
        matches: is_lnav,
        decode: decode_lnav,
    },
    NavFamily {
        name: "CNAV",
        matches: any_word,
        decode: decode_cnav,
    },
];

/// Word 0 starts with the L1 C/A preamble, read from the leading byte
/// of the 30-bit word
pub fn is_lnav(first: NavWord) -> bool {
    TLM_PREAMBLE.unsigned(first) == u32::from(GPS_L1CA_PREAMBLE)
}

fn any_word(_: NavWord) -> bool {
    true
}

fn decode_lnav(words: &[NavWord]) -> Result<GpsNavMessage, DecodeError> {
    LnavSubframe::decode(words).map(GpsNavMessage::Lnav)
}

fn decode_cnav(words: &[NavWord]) -> Result<GpsNavMessage, DecodeError> {
    CnavMessage::decode(words).map(GpsNavMessage::Cnav)
}

impl GpsNavMessage {
    /// Classifies `words` on the leading word and decodes them
    pub fn decode(words: &[NavWord]) -> Result<Self, DecodeError> {
        let first = words.first().copied().ok_or(DecodeError::SchemaMismatch {
            message: "GPS navigation message",
            expect: 1,
            got: 0,
        })?;

        let family = FAMILIES
            .iter()
            .find(|family| (family.matches)(first))
            .ok_or(DecodeError::ReservedOrUnsupported {
                what: "GPS navigation preamble",
                id: (first.raw() >> 22) as u8,
            })?;

        trace!("GPS {} message, {} words", family.name, words.len());
        (family.decode)(words)
    }
}
