pub const UBX_CLASS_RXM: u8 = 0x02;
pub const UBX_ID_RXM_SFRBX: u8 = 0x13;
pub const UBX_ID_RXM_RAWX: u8 = 0x15;

/// L1 C/A LNAV preamble, leading 8 bits of every telemetry word
pub const GPS_L1CA_PREAMBLE: u8 = 0x8b;

/// Words per LNAV subframe (TLM, HOW and 8 data words)
pub const GPS_LNAV_WORDS: usize = 10;

/// Each 30-bit LNAV word is right aligned in a 32-bit container,
/// parity occupies the 6 least significant bits.
pub(crate) const GPS_PARITY_SIZE: u32 = 6;
pub(crate) const GPS_DATA_BITS: u32 = 24;

/// RXM-SFRBX never carries more words than this for supported signals
pub(crate) const SFRBX_MAX_WORDS: usize = 10;
