use bitflags::bitflags;

use super::super::GNSS_ID;
use crate::{
    constants::{UBX_CLASS_RXM, UBX_ID_RXM_RAWX},
    error::DecodeError,
    schema::{FieldSpec, MessageSchema, RepeatedGroup},
};

/// UBX-RXM-RAWX, multi-GNSS raw measurements.
///
/// Only the payload layout lives here, turning measurements into
/// observation records is left to consumers of the decoded message.
pub struct RxmRawx;

const REC_STAT_MASKS: &[(&str, u64)] = &[
    ("leapSec", RecStatFlags::LEAP_SEC.bits() as u64),
    ("clkReset", RecStatFlags::CLK_RESET.bits() as u64),
];

const STDEV_MASK: u64 = 0x0f;

const TRK_STAT_MASKS: &[(&str, u64)] = &[
    ("prValid", TrkStatFlags::PR_VALID.bits() as u64),
    ("cpValid", TrkStatFlags::CP_VALID.bits() as u64),
    ("halfCyc", TrkStatFlags::HALF_CYCLE.bits() as u64),
    ("subHalfCyc", TrkStatFlags::SUB_HALF_CYCLE.bits() as u64),
];

impl RxmRawx {
    pub const CLASS: u8 = UBX_CLASS_RXM;
    pub const ID: u8 = UBX_ID_RXM_RAWX;
    pub const NAME: &'static str = "RXM-RAWX";
    /// Bytes per measurement block
    pub const MEAS_LEN: usize = 32;

    pub fn schema() -> Result<MessageSchema, DecodeError> {
        MessageSchema::builder(Self::NAME)
            // measurement time of week, receiver local time (s)
            .field(FieldSpec::float("rcvTow", 1, 8))
            .field(FieldSpec::unsigned("week", 2, 2))
            // GPS leap seconds (GPS-UTC)
            .field(FieldSpec::signed("leapS", 3, 1))
            .field(FieldSpec::unsigned("numMeas", 4, 1))
            .field(FieldSpec::bitmask("recStat", 5, 1, REC_STAT_MASKS))
            .field(FieldSpec::unsigned("version", 6, 1).allowed(&[1]))
            .field(FieldSpec::unsigned("reserved0", 7, 2))
            .repeated(
                RepeatedGroup::new("numMeas")
                    .field(FieldSpec::float("prMes", 1, 8))
                    .field(FieldSpec::float("cpMes", 2, 8))
                    .field(FieldSpec::float("doMes", 3, 4))
                    .field(FieldSpec::enumerated("gnssId", 4, 1, &GNSS_ID))
                    .field(FieldSpec::unsigned("svId", 5, 1))
                    .field(FieldSpec::unsigned("sigId", 6, 1))
                    .field(FieldSpec::unsigned("freqId", 7, 1))
                    .field(FieldSpec::unsigned("locktime", 8, 2))
                    .field(FieldSpec::unsigned("cno", 9, 1))
                    .field(FieldSpec::bitmask("prStdev", 10, 1, &[("prStdev", STDEV_MASK)]))
                    .field(FieldSpec::bitmask("cpStdev", 11, 1, &[("cpStdev", STDEV_MASK)]))
                    .field(FieldSpec::bitmask("doStdev", 12, 1, &[("doStdev", STDEV_MASK)]))
                    .field(FieldSpec::bitmask("trkStat", 13, 1, TRK_STAT_MASKS))
                    .field(FieldSpec::unsigned("reserved1", 14, 1)),
            )
            .build()
    }
}

bitflags! {
    /// Receiver tracking status of RXM-RAWX
    #[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
    pub struct RecStatFlags: u8 {
        /// Leap seconds have been determined
        const LEAP_SEC = 0x1;
        /// Clock reset applied.
        const CLK_RESET = 0x2;
    }
}

bitflags! {
    /// Per measurement tracking status of RXM-RAWX
    #[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
    pub struct TrkStatFlags: u8 {
        const PR_VALID = 0x01;
        const CP_VALID = 0x02;
        const HALF_CYCLE = 0x04;
        const SUB_HALF_CYCLE = 0x08;
    }
}

impl From<&crate::schema::Bitmask> for RecStatFlags {
    fn from(mask: &crate::schema::Bitmask) -> Self {
        Self::from_bits_truncate(mask.raw() as u8)
    }
}

impl From<&crate::schema::Bitmask> for TrkStatFlags {
    fn from(mask: &crate::schema::Bitmask) -> Self {
        Self::from_bits_truncate(mask.raw() as u8)
    }
}
