//! Subframe 4 and 5 pages.
//!
//! Both subframes are commutated over 25 pages. The page being broadcast is
//! identified by the 6-bit SV (page) id of word 3, mapped to a page number
//! through IS-GPS-200 Table 20-V.

use core::array;

use log::debug;

use super::{data_bits, data_bits_signed, Field};
use crate::{
    bits::{pow2, scale, sign_extend},
    constants::GPS_LNAV_WORDS,
    ubx_packets::NavWord,
};

type Words = [NavWord; GPS_LNAV_WORDS];

/// SV id broadcast on each subframe 4 page, page 1 first
const SUBFRAME4_PAGE_SV_ID: [u8; 25] = [
    57, 25, 26, 27, 28, 57, 29, 30, 31, 32, 57, 62, 52, 53, 54, 57, 55, 56, 58, 59, 57, 60, 61, 62,
    63,
];

/// SV id broadcast on each subframe 5 page, page 1 first
const SUBFRAME5_PAGE_SV_ID: [u8; 25] = [
    1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23, 24, 51,
];

/// SV id 0 marks a dummy satellite
pub const DUMMY_SV_ID: u8 = 0;

fn page_of(table: &[u8; 25], sv_id: u8) -> Option<u8> {
    table
        .iter()
        .position(|id| *id == sv_id)
        .map(|index| index as u8 + 1)
}

/// Subframe 4 page carrying `sv_id`. SV ids 57 and 62 are broadcast on
/// several pages, the first one is returned.
pub fn subframe4_page(sv_id: u8) -> Option<u8> {
    page_of(&SUBFRAME4_PAGE_SV_ID, sv_id)
}

/// Subframe 5 page carrying `sv_id`
pub fn subframe5_page(sv_id: u8) -> Option<u8> {
    page_of(&SUBFRAME5_PAGE_SV_ID, sv_id)
}

const PAGE_DATA_ID: Field = Field::icd(1, 2);
const PAGE_SV_ID: Field = Field::icd(3, 8);

/// Data bit index of word `word` (1-based), ICD bit `bit` (1-based)
const fn data_bit(word: u32, bit: u32) -> u32 {
    (word - 1) * 24 + (bit - 1)
}

/// Subframe 4 or 5 page with its header
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LnavPageRecord {
    /// 2-bit data id
    pub data_id: u8,

    /// 6-bit SV (page) id
    pub sv_id: u8,

    /// Page number, `None` when the SV id is not listed for this subframe
    pub page: Option<u8>,

    pub content: LnavPage,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LnavPage {
    /// Subframe 4 pages 2-5 and 7-10, subframe 5 pages 1-24
    Almanac(AlmanacEntry),
    /// Subframe 4 page 13
    Nmct(NmctTable),
    /// Subframe 4 page 17
    SpecialMessage(SpecialMessage),
    /// Subframe 4 page 18
    IonoUtc(IonoUtcModel),
    /// Subframe 4 page 25
    AntiSpoofHealth(AntiSpoofHealth),
    /// Subframe 5 page 25
    SvHealth(SvHealthPage),
    /// Dummy satellite (SV id 0)
    Dummy,
    /// Reserved pages, or pages this crate does not interpret
    Reserved,
}

fn header(words: &Words) -> (u8, u8) {
    (
        PAGE_DATA_ID.unsigned(words[2]) as u8,
        PAGE_SV_ID.unsigned(words[2]) as u8,
    )
}

pub(crate) fn decode_subframe4(words: &Words) -> LnavPageRecord {
    let (data_id, sv_id) = header(words);
    let page = subframe4_page(sv_id);
    let content = if sv_id == DUMMY_SV_ID {
        LnavPage::Dummy
    } else {
        match page {
            Some(2..=5 | 7..=10) => LnavPage::Almanac(AlmanacEntry::decode(words)),
            Some(13) => LnavPage::Nmct(NmctTable::decode(words)),
            Some(17) => LnavPage::SpecialMessage(SpecialMessage::decode(words)),
            Some(18) => LnavPage::IonoUtc(IonoUtcModel::decode(words)),
            Some(25) => LnavPage::AntiSpoofHealth(AntiSpoofHealth::decode(words)),
            _ => LnavPage::Reserved,
        }
    };
    if matches!(content, LnavPage::Dummy | LnavPage::Reserved) {
        debug!("subframe 4 sv id {} page {:?}: {:?}", sv_id, page, content);
    }
    LnavPageRecord {
        data_id,
        sv_id,
        page,
        content,
    }
}

pub(crate) fn decode_subframe5(words: &Words) -> LnavPageRecord {
    let (data_id, sv_id) = header(words);
    let page = subframe5_page(sv_id);
    let content = if sv_id == DUMMY_SV_ID {
        LnavPage::Dummy
    } else {
        match page {
            Some(1..=24) => LnavPage::Almanac(AlmanacEntry::decode(words)),
            Some(25) => LnavPage::SvHealth(SvHealthPage::decode(words)),
            _ => LnavPage::Reserved,
        }
    };
    if matches!(content, LnavPage::Dummy | LnavPage::Reserved) {
        debug!("subframe 5 sv id {} page {:?}: {:?}", sv_id, page, content);
    }
    LnavPageRecord {
        data_id,
        sv_id,
        page,
        content,
    }
}

const ALM_WORD3_E: Field = Field::icd(9, 24);
const ALM_WORD4_TOA: Field = Field::icd(1, 8);
const ALM_WORD4_DELTA_I: Field = Field::icd(9, 24);
const ALM_WORD5_OMEGA_DOT: Field = Field::icd(1, 16);
const ALM_WORD5_HEALTH: Field = Field::icd(17, 24);
const ALM_WORD6_SQRT_A: Field = Field::icd(1, 24);
const ALM_WORD7_OMEGA0: Field = Field::icd(1, 24);
const ALM_WORD8_OMEGA: Field = Field::icd(1, 24);
const ALM_WORD9_M0: Field = Field::icd(1, 24);
const ALM_WORD10_AF0_MSB: Field = Field::icd(1, 8);
const ALM_WORD10_AF1: Field = Field::icd(9, 19);
const ALM_WORD10_AF0_LSB: Field = Field::icd(20, 22);

/// Reduced precision orbit and clock of one satellite
#[derive(Debug, Default, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AlmanacEntry {
    /// Satellite the entry describes
    pub sv_id: u8,

    /// Eccentricity
    pub e: f64,

    /// Almanac reference time (s)
    pub toa_s: u32,

    /// Inclination offset from 0.3 semicircles (semicircles)
    pub delta_i_semicircles: f64,

    /// Rate of right ascension (semicircles.s⁻¹)
    pub omega_dot_semicircles_s: f64,

    /// 8-bit SV health
    pub health: u8,

    /// Square root of the semi-major axis (m^1/2)
    pub sqrt_a: f64,

    /// Longitude of ascending node at weekly epoch (semicircles)
    pub omega0_semicircles: f64,

    /// Argument of perigee (semicircles)
    pub omega_semicircles: f64,

    /// Mean anomaly at reference time (semicircles)
    pub m0_semicircles: f64,

    /// (s)
    pub af0_s: f64,

    /// (s.s⁻¹)
    pub af1_s_s: f64,
}

impl AlmanacEntry {
    fn decode(w: &Words) -> Self {
        // 8 MSBs then 3 LSBs, af1 sits in between
        let af0 = (ALM_WORD10_AF0_MSB.unsigned(w[9]) << 3) | ALM_WORD10_AF0_LSB.unsigned(w[9]);
        Self {
            sv_id: PAGE_SV_ID.unsigned(w[2]) as u8,
            e: scale(ALM_WORD3_E.unsigned(w[2]), pow2(-21)),
            toa_s: ALM_WORD4_TOA.unsigned(w[3]) << 12,
            delta_i_semicircles: scale(ALM_WORD4_DELTA_I.signed(w[3]), pow2(-19)),
            omega_dot_semicircles_s: scale(ALM_WORD5_OMEGA_DOT.signed(w[4]), pow2(-38)),
            health: ALM_WORD5_HEALTH.unsigned(w[4]) as u8,
            sqrt_a: scale(ALM_WORD6_SQRT_A.unsigned(w[5]), pow2(-11)),
            omega0_semicircles: scale(ALM_WORD7_OMEGA0.signed(w[6]), pow2(-23)),
            omega_semicircles: scale(ALM_WORD8_OMEGA.signed(w[7]), pow2(-23)),
            m0_semicircles: scale(ALM_WORD9_M0.signed(w[8]), pow2(-23)),
            af0_s: scale(sign_extend(af0, 11), pow2(-20)),
            af1_s_s: scale(ALM_WORD10_AF1.signed(w[9]), pow2(-38)),
        }
    }
}

/// NMCT availability indicator
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NmctAvailability {
    #[default]
    Unencrypted,
    Encrypted,
    Unavailable,
    Reserved,
}

impl From<u8> for NmctAvailability {
    fn from(raw: u8) -> Self {
        match raw & 0x03 {
            0 => Self::Unencrypted,
            1 => Self::Encrypted,
            2 => Self::Unavailable,
            _ => Self::Reserved,
        }
    }
}

const NMCT_WORD3_AI: Field = Field::icd(9, 10);
const NMCT_ERD_START: u32 = data_bit(3, 11);
const NMCT_ERD_BITS: u32 = 6;
const NMCT_ERD_NOT_AVAILABLE: i32 = -32;
const NMCT_ERD_SCALE_M: f64 = 0.3;

/// Navigation message correction table
#[derive(Debug, Default, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NmctTable {
    pub availability: NmctAvailability,

    /// Estimated range deviation of the 30 other satellites (m),
    /// in broadcast order. `None` when not available.
    pub erd_m: [Option<f64>; 30],
}

impl NmctTable {
    fn decode(w: &Words) -> Self {
        let erd_m = array::from_fn(|i| {
            let start = NMCT_ERD_START + NMCT_ERD_BITS * i as u32;
            match data_bits_signed(w, start, NMCT_ERD_BITS) {
                NMCT_ERD_NOT_AVAILABLE => None,
                erd => Some(f64::from(erd) * NMCT_ERD_SCALE_M),
            }
        });
        Self {
            availability: NmctAvailability::from(NMCT_WORD3_AI.unsigned(w[2]) as u8),
            erd_m,
        }
    }
}

const SPECIAL_MESSAGE_START: u32 = data_bit(3, 9);

/// 22 character message broadcast on subframe 4 page 17
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpecialMessage {
    pub chars: [u8; 22],
}

impl SpecialMessage {
    fn decode(w: &Words) -> Self {
        Self {
            chars: array::from_fn(|i| data_bits(w, SPECIAL_MESSAGE_START + 8 * i as u32, 8) as u8),
        }
    }

    /// Message text, `None` unless every character is ASCII
    pub fn as_str(&self) -> Option<&str> {
        if self.chars.is_ascii() {
            core::str::from_utf8(&self.chars).ok()
        } else {
            None
        }
    }
}

const IONO_WORD3_ALPHA0: Field = Field::icd(9, 16);
const IONO_WORD3_ALPHA1: Field = Field::icd(17, 24);
const IONO_WORD4_ALPHA2: Field = Field::icd(1, 8);
const IONO_WORD4_ALPHA3: Field = Field::icd(9, 16);
const IONO_WORD4_BETA0: Field = Field::icd(17, 24);
const IONO_WORD5_BETA1: Field = Field::icd(1, 8);
const IONO_WORD5_BETA2: Field = Field::icd(9, 16);
const IONO_WORD5_BETA3: Field = Field::icd(17, 24);
const UTC_WORD6_A1: Field = Field::icd(1, 24);
const UTC_WORD8_TOT: Field = Field::icd(9, 16);
const UTC_WORD8_WNT: Field = Field::icd(17, 24);
const UTC_WORD9_DT_LS: Field = Field::icd(1, 8);
const UTC_WORD9_WN_LSF: Field = Field::icd(9, 16);
const UTC_WORD9_DN: Field = Field::icd(17, 24);
const UTC_WORD10_DT_LSF: Field = Field::icd(1, 8);
const UTC_A0_START: u32 = data_bit(7, 1);

/// Klobuchar ionospheric model and GPS to UTC parameters
#[derive(Debug, Default, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IonoUtcModel {
    /// α0 (s), α1 (s.semicircle⁻¹), α2 (s.semicircle⁻²), α3 (s.semicircle⁻³)
    pub alpha: [f64; 4],

    /// β0 (s), β1 (s.semicircle⁻¹), β2 (s.semicircle⁻²), β3 (s.semicircle⁻³)
    pub beta: [f64; 4],

    /// (s)
    pub a0_s: f64,

    /// (s.s⁻¹)
    pub a1_s_s: f64,

    /// UTC data reference time of week (s)
    pub tot_s: u32,

    /// UTC data reference week number
    pub wnt: u8,

    /// Current leap seconds delta (s)
    pub dt_ls_s: i8,

    /// Week of the next leap second
    pub wn_lsf: u8,

    /// Day of week of the next leap second
    pub dn: u8,

    /// Leap seconds delta once the next leap second applies (s)
    pub dt_lsf_s: i8,
}

impl IonoUtcModel {
    fn decode(w: &Words) -> Self {
        Self {
            alpha: [
                scale(IONO_WORD3_ALPHA0.signed(w[2]), pow2(-30)),
                scale(IONO_WORD3_ALPHA1.signed(w[2]), pow2(-27)),
                scale(IONO_WORD4_ALPHA2.signed(w[3]), pow2(-24)),
                scale(IONO_WORD4_ALPHA3.signed(w[3]), pow2(-24)),
            ],
            beta: [
                scale(IONO_WORD4_BETA0.signed(w[3]), pow2(11)),
                scale(IONO_WORD5_BETA1.signed(w[4]), pow2(14)),
                scale(IONO_WORD5_BETA2.signed(w[4]), pow2(16)),
                scale(IONO_WORD5_BETA3.signed(w[4]), pow2(16)),
            ],
            // 24 MSBs in word 7, 8 LSBs open word 8
            a0_s: scale(data_bits_signed(w, UTC_A0_START, 32), pow2(-30)),
            a1_s_s: scale(UTC_WORD6_A1.signed(w[5]), pow2(-50)),
            tot_s: UTC_WORD8_TOT.unsigned(w[7]) << 12,
            wnt: UTC_WORD8_WNT.unsigned(w[7]) as u8,
            dt_ls_s: UTC_WORD9_DT_LS.signed(w[8]) as i8,
            wn_lsf: UTC_WORD9_WN_LSF.unsigned(w[8]) as u8,
            dn: UTC_WORD9_DN.unsigned(w[8]) as u8,
            dt_lsf_s: UTC_WORD10_DT_LSF.signed(w[9]) as i8,
        }
    }
}

/// 4-bit anti-spoofing and configuration code of one satellite
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SvConfig {
    /// A-S mode is ON
    pub anti_spoofing: bool,

    /// 3-bit signal capability / block type code
    pub config: u8,
}

impl From<u8> for SvConfig {
    fn from(raw: u8) -> Self {
        Self {
            anti_spoofing: raw & 0x08 != 0,
            config: raw & 0x07,
        }
    }
}

const AS_CONFIG_START: u32 = data_bit(3, 9);
const AS_HEALTH_START: u32 = data_bit(8, 19);
const SV_HEALTH_BITS: u32 = 6;

/// Subframe 4 page 25: A-S flags and configuration of SV 1 to 32,
/// 6-bit health of SV 25 to 32
#[derive(Debug, Default, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AntiSpoofHealth {
    /// Indexed by SV id - 1
    pub sv_config: [SvConfig; 32],

    /// SV 25 first
    pub health: [u8; 8],
}

impl AntiSpoofHealth {
    fn decode(w: &Words) -> Self {
        Self {
            sv_config: array::from_fn(|i| {
                SvConfig::from(data_bits(w, AS_CONFIG_START + 4 * i as u32, 4) as u8)
            }),
            health: array::from_fn(|i| {
                data_bits(w, AS_HEALTH_START + SV_HEALTH_BITS * i as u32, SV_HEALTH_BITS) as u8
            }),
        }
    }

    /// 6-bit health of `sv_id` when broadcast on this page
    pub fn sv_health(&self, sv_id: u8) -> Option<u8> {
        self.health.get(usize::from(sv_id.checked_sub(25)?)).copied()
    }
}

const SV_HEALTH_WORD3_TOA: Field = Field::icd(9, 16);
const SV_HEALTH_WORD3_WNA: Field = Field::icd(17, 24);
const SV_HEALTH_START: u32 = data_bit(4, 1);

/// Subframe 5 page 25: almanac reference time and week,
/// 6-bit health of SV 1 to 24
#[derive(Debug, Default, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SvHealthPage {
    /// Almanac reference time (s)
    pub toa_s: u32,

    /// Almanac reference week (8 LSBs)
    pub wna: u8,

    /// SV 1 first
    pub health: [u8; 24],
}

impl SvHealthPage {
    fn decode(w: &Words) -> Self {
        Self {
            toa_s: SV_HEALTH_WORD3_TOA.unsigned(w[2]) << 12,
            wna: SV_HEALTH_WORD3_WNA.unsigned(w[2]) as u8,
            health: array::from_fn(|i| {
                data_bits(w, SV_HEALTH_START + SV_HEALTH_BITS * i as u32, SV_HEALTH_BITS) as u8
            }),
        }
    }

    pub fn sv_health(&self, sv_id: u8) -> Option<u8> {
        self.health.get(usize::from(sv_id.checked_sub(1)?)).copied()
    }
}
