use crate::schema::EnumDesc;

/// GNSS identifiers used by the `gnssId` fields of UBX messages
#[repr(u8)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GnssId {
    #[default]
    GPS = 0,
    SBAS = 1,
    GALILEO = 2,
    BEIDOU = 3,
    IMES = 4,
    QZSS = 5,
    GLONASS = 6,
}

/// Raw value mapping of [GnssId], used by schema enum fields
pub static GNSS_ID: EnumDesc = EnumDesc {
    name: "GnssId",
    variants: &[
        ("GPS", GnssId::GPS as u64),
        ("SBAS", GnssId::SBAS as u64),
        ("Galileo", GnssId::GALILEO as u64),
        ("BeiDou", GnssId::BEIDOU as u64),
        ("IMES", GnssId::IMES as u64),
        ("QZSS", GnssId::QZSS as u64),
        ("GLONASS", GnssId::GLONASS as u64),
    ],
};

impl TryFrom<u8> for GnssId {
    type Error = &'static str;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(GnssId::GPS),
            1 => Ok(GnssId::SBAS),
            2 => Ok(GnssId::GALILEO),
            3 => Ok(GnssId::BEIDOU),
            4 => Ok(GnssId::IMES),
            5 => Ok(GnssId::QZSS),
            6 => Ok(GnssId::GLONASS),
            _ => Err("Invalid GnssId value: value must be in range [0, 6]"),
        }
    }
}
