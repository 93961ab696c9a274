use core::fmt;

/// Error that possible during payload decoding and schema declaration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum DecodeError {
    /// Payload too short for the fields declared by the schema
    SchemaMismatch {
        message: &'static str,
        expect: usize,
        got: usize,
    },
    /// Value outside of the declared allowed set, unmapped enum raw value,
    /// or repeated group count above its declared maximum
    InvalidValue {
        message: &'static str,
        field: &'static str,
        value: i64,
    },
    /// No schema registered for this `(class, id)` pair
    UnknownMessage { class: u8, id: u8 },
    /// Recognized content that this crate does not decode
    ReservedOrUnsupported { what: &'static str, id: u8 },
    /// Decoded message does not carry a field an adapter relies on
    MissingField {
        message: &'static str,
        field: &'static str,
    },
    /// Schema declaration rejected by the builder
    InvalidSchema {
        message: &'static str,
        reason: &'static str,
    },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::SchemaMismatch {
                message,
                expect,
                got,
            } => write!(
                f,
                "Payload of {} too short, expect at least {} bytes, got {}",
                message, expect, got
            ),
            DecodeError::InvalidValue {
                message,
                field,
                value,
            } => write!(f, "Invalid value {} for field {} of {}", value, field, message),
            DecodeError::UnknownMessage { class, id } => {
                write!(f, "No schema registered for class {:#04x} id {:#04x}", class, id)
            },
            DecodeError::ReservedOrUnsupported { what, id } => {
                write!(f, "Unsupported {} {}", what, id)
            },
            DecodeError::MissingField { message, field } => {
                write!(f, "Field {} missing from decoded {}", field, message)
            },
            DecodeError::InvalidSchema { message, reason } => {
                write!(f, "Invalid schema {}: {}", message, reason)
            },
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DecodeError {}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn display_names_the_packet() {
        let err = DecodeError::SchemaMismatch {
            message: "RXM-SFRBX",
            expect: 8,
            got: 3,
        };
        assert_eq!(
            err.to_string(),
            "Payload of RXM-SFRBX too short, expect at least 8 bytes, got 3"
        );

        let err = DecodeError::UnknownMessage {
            class: 0x02,
            id: 0x99,
        };
        assert_eq!(err.to_string(), "No schema registered for class 0x02 id 0x99");
    }
}
