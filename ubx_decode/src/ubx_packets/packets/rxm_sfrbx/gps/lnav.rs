//! L1 C/A legacy navigation subframes

use chrono::TimeDelta;
use log::{debug, trace};

use super::{
    pages::{decode_subframe4, decode_subframe5, LnavPageRecord},
    Field, GpsHandover, GpsTelemetry, HOW_SUBFRAME_ID,
};
use crate::{
    bits::{pow2, scale, spanning, spanning_signed},
    constants::GPS_LNAV_WORDS,
    error::DecodeError,
    ubx_packets::NavWord,
};

type Words = [NavWord; GPS_LNAV_WORDS];

const SF1_WORD3_WEEK: Field = Field::icd(1, 10);
const SF1_WORD3_CA_P_L2: Field = Field::icd(11, 12);
const SF1_WORD3_URA: Field = Field::icd(13, 16);
const SF1_WORD3_HEALTH: Field = Field::icd(17, 22);
const SF1_WORD4_L2P_DATA: Field = Field::icd(1, 1);
const SF1_WORD7_TGD: Field = Field::icd(17, 24);
const SF1_WORD8_TOC: Field = Field::icd(9, 24);
const SF1_WORD9_AF2: Field = Field::icd(1, 8);
const SF1_WORD9_AF1: Field = Field::icd(9, 24);
const SF1_WORD10_AF0: Field = Field::icd(1, 22);

const SF2_WORD3_IODE: Field = Field::icd(1, 8);
const SF2_WORD3_CRS: Field = Field::icd(9, 24);
const SF2_WORD4_DN: Field = Field::icd(1, 16);
const SF2_WORD6_CUC: Field = Field::icd(1, 16);
const SF2_WORD8_CUS: Field = Field::icd(1, 16);
const SF2_WORD10_TOE: Field = Field::icd(1, 16);
const SF2_WORD10_FIT_INT: Field = Field::icd(17, 17);
const SF2_WORD10_AODO: Field = Field::icd(18, 22);

const SF3_WORD3_CIC: Field = Field::icd(1, 16);
const SF3_WORD5_CIS: Field = Field::icd(1, 16);
const SF3_WORD7_CRC: Field = Field::icd(1, 16);
const SF3_WORD9_OMEGA_DOT: Field = Field::icd(1, 24);
const SF3_WORD10_IODE: Field = Field::icd(1, 8);
const SF3_WORD10_IDOT: Field = Field::icd(9, 22);

/// One decoded LNAV subframe
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LnavSubframe {
    pub telemetry: GpsTelemetry,
    pub how: GpsHandover,
    /// Content selected by the handover subframe id
    pub body: LnavBody,
}

/// Subframe content, by subframe id
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LnavBody {
    /// Subframe 1
    Clock(LnavClock),
    /// Subframe 2
    Ephemeris1(LnavEphemeris1),
    /// Subframe 3
    Ephemeris2(LnavEphemeris2),
    /// Subframe 4, pages 1 to 25
    Subframe4(LnavPageRecord),
    /// Subframe 5, pages 1 to 25
    Subframe5(LnavPageRecord),
    /// Subframe id 0, 6 or 7
    Reserved { subframe_id: u8 },
}

type SubframeDecoder = fn(&Words) -> LnavBody;

/// Indexed by the 3-bit handover subframe id
const SUBFRAME_DECODERS: [SubframeDecoder; 8] = [
    reserved, clock, ephemeris1, ephemeris2, subframe4, subframe5, reserved, reserved,
];

fn clock(words: &Words) -> LnavBody {
    LnavBody::Clock(LnavClock::decode(words))
}

fn ephemeris1(words: &Words) -> LnavBody {
    LnavBody::Ephemeris1(LnavEphemeris1::decode(words))
}

fn ephemeris2(words: &Words) -> LnavBody {
    LnavBody::Ephemeris2(LnavEphemeris2::decode(words))
}

fn subframe4(words: &Words) -> LnavBody {
    LnavBody::Subframe4(decode_subframe4(words))
}

fn subframe5(words: &Words) -> LnavBody {
    LnavBody::Subframe5(decode_subframe5(words))
}

fn reserved(words: &Words) -> LnavBody {
    let subframe_id = HOW_SUBFRAME_ID.unsigned(words[1]) as u8;
    debug!("reserved LNAV subframe id {}", subframe_id);
    LnavBody::Reserved { subframe_id }
}

impl LnavSubframe {
    /// Decodes the first ten words of `words`. Preamble classification
    /// happens upstream, see [super::GpsNavMessage::decode].
    pub fn decode(words: &[NavWord]) -> Result<Self, DecodeError> {
        let words: &Words = words
            .get(..GPS_LNAV_WORDS)
            .and_then(|w| w.try_into().ok())
            .ok_or(DecodeError::SchemaMismatch {
                message: "GPS LNAV subframe",
                expect: GPS_LNAV_WORDS,
                got: words.len(),
            })?;

        let telemetry = GpsTelemetry::decode(words[0]);
        let how = GpsHandover::decode(words[1]);
        trace!(
            "LNAV subframe {} tow {}s alert {} A-S {}",
            how.subframe_id,
            how.tow_s,
            how.alert,
            how.anti_spoofing
        );

        let decoder = SUBFRAME_DECODERS[usize::from(how.subframe_id & 0x07)];
        Ok(Self {
            telemetry,
            how,
            body: decoder(words),
        })
    }
}

/// Subframe 1: week number, satellite health and clock correction
#[derive(Debug, Default, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LnavClock {
    /// 10-bit week counter (no rollover compensation)
    pub week: u16,

    /// 2-bit codes on L2: 1 = P code, 2 = C/A code
    pub ca_or_p_l2: u8,

    /// 4-bit URA index, the lower the better
    pub ura: u8,

    /// 6-bit SV health
    pub health: u8,

    /// Issue of data, clock
    pub iodc: u16,

    /// NAV data stream commanded off on the L2 P code
    pub l2_p_data_flag: bool,

    /// Group delay differential (s)
    pub tgd_s: f64,

    /// Clock data reference time (s)
    pub toc_s: u32,

    /// (s.s⁻²)
    pub af2_s_s2: f64,

    /// (s.s⁻¹)
    pub af1_s_s: f64,

    /// (s)
    pub af0_s: f64,
}

impl LnavClock {
    pub(crate) fn decode(w: &Words) -> Self {
        Self {
            week: SF1_WORD3_WEEK.unsigned(w[2]) as u16,
            ca_or_p_l2: SF1_WORD3_CA_P_L2.unsigned(w[2]) as u8,
            ura: SF1_WORD3_URA.unsigned(w[2]) as u8,
            health: SF1_WORD3_HEALTH.unsigned(w[2]) as u8,
            // 2 MSBs close word 3, 8 LSBs open word 8
            iodc: spanning(w[7].raw(), w[2].raw(), 8, 2) as u16,
            l2_p_data_flag: SF1_WORD4_L2P_DATA.flag(w[3]),
            tgd_s: scale(SF1_WORD7_TGD.signed(w[6]), pow2(-31)),
            toc_s: SF1_WORD8_TOC.unsigned(w[7]) * 16,
            af2_s_s2: scale(SF1_WORD9_AF2.signed(w[8]), pow2(-55)),
            af1_s_s: scale(SF1_WORD9_AF1.signed(w[8]), pow2(-43)),
            af0_s: scale(SF1_WORD10_AF0.signed(w[9]), pow2(-31)),
        }
    }

    pub fn toc(&self) -> TimeDelta {
        TimeDelta::seconds(i64::from(self.toc_s))
    }

    /// SV clock offset at `t` seconds of week (s), without the relativistic
    /// and group delay terms
    pub fn clock_offset(&self, t: f64) -> f64 {
        let mut dt = t - f64::from(self.toc_s);
        // half week crossover
        if dt > 302_400.0 {
            dt -= 604_800.0;
        } else if dt < -302_400.0 {
            dt += 604_800.0;
        }
        self.af0_s + self.af1_s_s * dt + self.af2_s_s2 * dt * dt
    }
}

/// Subframe 2: first half of the ephemeris
#[derive(Debug, Default, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LnavEphemeris1 {
    /// Issue of data, ephemeris
    pub iode: u8,

    /// Sine harmonic correction to the orbit radius (m)
    pub crs_m: f64,

    /// Mean motion difference (semicircles.s⁻¹)
    pub dn_semicircles_s: f64,

    /// Mean anomaly at reference time (semicircles)
    pub m0_semicircles: f64,

    /// Cosine harmonic correction to the argument of latitude (rad)
    pub cuc_rad: f64,

    /// Eccentricity
    pub e: f64,

    /// Sine harmonic correction to the argument of latitude (rad)
    pub cus_rad: f64,

    /// Square root of the semi-major axis (m^1/2)
    pub sqrt_a: f64,

    /// Ephemeris reference time (s)
    pub toe_s: u32,

    /// Curve fit interval is greater than 4 hours
    pub fit_interval_flag: bool,

    /// Age of data offset (s)
    pub aodo_s: u32,
}

impl LnavEphemeris1 {
    pub(crate) fn decode(w: &Words) -> Self {
        Self {
            iode: SF2_WORD3_IODE.unsigned(w[2]) as u8,
            crs_m: scale(SF2_WORD3_CRS.signed(w[2]), pow2(-5)),
            dn_semicircles_s: scale(SF2_WORD4_DN.signed(w[3]), pow2(-43)),
            m0_semicircles: scale(spanning_signed(w[4].raw(), w[3].raw(), 24, 8), pow2(-31)),
            cuc_rad: scale(SF2_WORD6_CUC.signed(w[5]), pow2(-29)),
            e: scale(spanning(w[6].raw(), w[5].raw(), 24, 8), pow2(-33)),
            cus_rad: scale(SF2_WORD8_CUS.signed(w[7]), pow2(-29)),
            sqrt_a: scale(spanning(w[8].raw(), w[7].raw(), 24, 8), pow2(-19)),
            toe_s: SF2_WORD10_TOE.unsigned(w[9]) * 16,
            fit_interval_flag: SF2_WORD10_FIT_INT.flag(w[9]),
            aodo_s: SF2_WORD10_AODO.unsigned(w[9]) * 900,
        }
    }

    pub fn toe(&self) -> TimeDelta {
        TimeDelta::seconds(i64::from(self.toe_s))
    }
}

/// Subframe 3: second half of the ephemeris
#[derive(Debug, Default, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LnavEphemeris2 {
    /// Cosine harmonic correction to the angle of inclination (rad)
    pub cic_rad: f64,

    /// Longitude of ascending node at weekly epoch (semicircles)
    pub omega0_semicircles: f64,

    /// Sine harmonic correction to the angle of inclination (rad)
    pub cis_rad: f64,

    /// Inclination angle at reference time (semicircles)
    pub i0_semicircles: f64,

    /// Cosine harmonic correction to the orbit radius (m)
    pub crc_m: f64,

    /// Argument of perigee (semicircles)
    pub omega_semicircles: f64,

    /// Rate of right ascension (semicircles.s⁻¹)
    pub omega_dot_semicircles_s: f64,

    /// Issue of data, ephemeris
    pub iode: u8,

    /// Rate of inclination angle (semicircles.s⁻¹)
    pub idot_semicircles_s: f64,
}

impl LnavEphemeris2 {
    pub(crate) fn decode(w: &Words) -> Self {
        Self {
            cic_rad: scale(SF3_WORD3_CIC.signed(w[2]), pow2(-29)),
            omega0_semicircles: scale(spanning_signed(w[3].raw(), w[2].raw(), 24, 8), pow2(-31)),
            cis_rad: scale(SF3_WORD5_CIS.signed(w[4]), pow2(-29)),
            i0_semicircles: scale(spanning_signed(w[5].raw(), w[4].raw(), 24, 8), pow2(-31)),
            crc_m: scale(SF3_WORD7_CRC.signed(w[6]), pow2(-5)),
            omega_semicircles: scale(spanning_signed(w[7].raw(), w[6].raw(), 24, 8), pow2(-31)),
            omega_dot_semicircles_s: scale(SF3_WORD9_OMEGA_DOT.signed(w[8]), pow2(-43)),
            iode: SF3_WORD10_IODE.unsigned(w[9]) as u8,
            idot_semicircles_s: scale(SF3_WORD10_IDOT.signed(w[9]), pow2(-43)),
        }
    }
}
