use alloc::vec::Vec;

use log::debug;

use super::super::{GnssId, GNSS_ID};
use crate::{
    bits,
    constants::{SFRBX_MAX_WORDS, UBX_CLASS_RXM, UBX_ID_RXM_SFRBX},
    error::DecodeError,
    registry::SchemaRegistry,
    schema::{DecodedMessage, FieldSpec, MessageSchema, RepeatedGroup, Value},
};

mod gps;
pub use gps::*;

/// UBX-RXM-SFRBX, broadcast navigation data subframe
pub struct RxmSfrbx;

impl RxmSfrbx {
    pub const CLASS: u8 = UBX_CLASS_RXM;
    pub const ID: u8 = UBX_ID_RXM_SFRBX;
    pub const NAME: &'static str = "RXM-SFRBX";

    pub fn schema() -> Result<MessageSchema, DecodeError> {
        MessageSchema::builder(Self::NAME)
            .field(FieldSpec::enumerated("gnssId", 1, 1, &GNSS_ID))
            // gnssId:svId numbering
            .field(FieldSpec::unsigned("svId", 2, 1))
            .field(FieldSpec::unsigned("reserved0", 3, 1))
            // GLONASS only: frequency slot + 7
            .field(FieldSpec::unsigned("freqId", 4, 1))
            .field(FieldSpec::unsigned("numWords", 5, 1))
            // tracking channel the subframe was received on
            .field(FieldSpec::unsigned("chn", 6, 1))
            .field(FieldSpec::unsigned("version", 7, 1).allowed(&[2]))
            .field(FieldSpec::unsigned("reserved1", 8, 1))
            .repeated(
                RepeatedGroup::new("numWords")
                    .max_count(SFRBX_MAX_WORDS)
                    .field(FieldSpec::unsigned("dwrd", 1, 4)),
            )
            .build()
    }
}

/// One navigation data word as delivered by the receiver.
///
/// For GPS LNAV the 30-bit word is right aligned: parity in bits 0..=5,
/// data in bits 6..=29.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NavWord(u32);

impl NavWord {
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }

    /// `width` bits starting at bit `offset` (from the LSB)
    pub fn unsigned(self, offset: u32, width: u32) -> u32 {
        bits::unsigned(self.0, offset, width)
    }

    pub fn signed(self, offset: u32, width: u32) -> i32 {
        bits::signed(self.0, offset, width)
    }
}

impl From<u32> for NavWord {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

/// Navigation words of one RXM-SFRBX message and where they came from
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SfrbxFrame {
    pub gnss_id: GnssId,
    pub sv_id: u8,
    /// Raw frequency identifier, see [SfrbxFrame::glonass_frequency_slot]
    pub freq_id: u8,
    /// Tracking channel number
    pub channel: u8,
    pub words: Vec<NavWord>,
}

impl SfrbxFrame {
    /// Reassembles the frame from a decoded RXM-SFRBX message
    pub fn from_message(msg: &DecodedMessage<'_>) -> Result<Self, DecodeError> {
        let gnss = msg.enumerated("gnssId")?;
        let gnss_id = u8::try_from(gnss.raw)
            .ok()
            .and_then(|raw| GnssId::try_from(raw).ok())
            .ok_or(DecodeError::InvalidValue {
                message: msg.name(),
                field: "gnssId",
                value: gnss.raw as i64,
            })?;

        let words = msg
            .repeated("dwrd")
            .filter_map(Value::as_u64)
            .map(|dword| NavWord::new(dword as u32))
            .collect();

        Ok(Self {
            gnss_id,
            sv_id: msg.unsigned("svId")? as u8,
            freq_id: msg.unsigned("freqId")? as u8,
            channel: msg.unsigned("chn")? as u8,
            words,
        })
    }

    /// Decodes an RXM-SFRBX payload with the schema registered in `registry`
    pub fn from_payload(registry: &SchemaRegistry, payload: &[u8]) -> Result<Self, DecodeError> {
        let msg = registry.decode(RxmSfrbx::CLASS, RxmSfrbx::ID, payload)?;
        Self::from_message(&msg)
    }

    /// GLONASS frequency slot (-7..=6), `None` for other constellations
    pub fn glonass_frequency_slot(&self) -> Option<i8> {
        match self.gnss_id {
            GnssId::GLONASS => Some(self.freq_id.wrapping_sub(7) as i8),
            _ => None,
        }
    }

    /// Interprets the navigation words.
    ///
    /// Only GPS is decoded, other constellations fail with
    /// [DecodeError::ReservedOrUnsupported].
    pub fn interpret(&self) -> Result<NavMessage, DecodeError> {
        match self.gnss_id {
            GnssId::GPS => GpsNavMessage::decode(&self.words).map(NavMessage::Gps),
            other => {
                debug!(
                    "no navigation decoder for gnssId {:?} (sv {})",
                    other, self.sv_id
                );
                Err(DecodeError::ReservedOrUnsupported {
                    what: "gnssId",
                    id: other as u8,
                })
            },
        }
    }
}

impl TryFrom<&DecodedMessage<'_>> for SfrbxFrame {
    type Error = DecodeError;

    fn try_from(msg: &DecodedMessage<'_>) -> Result<Self, Self::Error> {
        Self::from_message(msg)
    }
}

/// Interpreted navigation message, per constellation
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum NavMessage {
    Gps(GpsNavMessage),
}
