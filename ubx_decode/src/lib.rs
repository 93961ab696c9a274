//! # ubx_decode
//!
//! Schema driven decoding of UBX message payloads and interpretation of the
//! GPS navigation subframes u-blox receivers forward in UBX-RXM-SFRBX.
//!
//! Payloads are described by [MessageSchema]s: ordered, typed field
//! declarations with count driven repeated groups. A [SchemaRegistry] maps
//! `(class, id)` pairs to schemas, [SchemaRegistry::ubx] holds the messages
//! this crate ships with.
//!
//! Decoding navigation data
//! ========================
//!
//! Frame synchronisation and checksum validation happen upstream, this crate
//! starts from the payload of a validated packet:
//! ```
//! # #[cfg(feature = "std")] {
//! use ubx_decode::{GpsNavMessage, NavMessage, SchemaRegistry, SfrbxFrame};
//!
//! // GPS SV 17, a single CNAV word
//! let mut payload = vec![0, 17, 0, 0, 1, 3, 2, 0];
//! payload.extend_from_slice(&0x8b44_1000u32.to_le_bytes());
//!
//! let registry = SchemaRegistry::ubx().unwrap();
//! let frame = SfrbxFrame::from_payload(registry, &payload).unwrap();
//! assert_eq!(frame.sv_id, 17);
//!
//! match frame.interpret().unwrap() {
//!     NavMessage::Gps(GpsNavMessage::Cnav(cnav)) => assert_eq!(cnav.prn, 17),
//!     other => panic!("unexpected {:?}", other),
//! }
//! # }
//! ```
//!
//! no_std Support
//! ==============
//!
//! Disable the default `std` feature to build against `core` and `alloc`
//! only. The process wide registry is then unavailable, assemble one with
//! [SchemaRegistry::builder] and [SchemaRegistryBuilder::with_ubx_defaults].

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;
extern crate core;
#[cfg(feature = "serde")]
extern crate serde;

pub use crate::{
    error::DecodeError,
    registry::{SchemaRegistry, SchemaRegistryBuilder},
    schema::{
        decode, Bitmask, DecodedMessage, EnumDesc, EnumValue, FieldKey, FieldKind, FieldSpec,
        MessageSchema, MessageSchemaBuilder, RepeatedGroup, SchemaItem, Value,
    },
    ubx_packets::*,
};

pub mod bits;
pub mod constants;
mod error;
mod registry;
pub mod schema;
mod ubx_packets;
