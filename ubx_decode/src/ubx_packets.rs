//! UBX message schemas and the interpretation built on top of them.

pub mod packets;
mod types;

pub use packets::*;
pub use types::*;
