//! Schemas of the UBX messages this crate knows about.

mod rxm_rawx;
mod rxm_sfrbx;

pub use rxm_rawx::*;
pub use rxm_sfrbx::*;

use crate::{error::DecodeError, registry::SchemaRegistryBuilder};

impl SchemaRegistryBuilder {
    /// Registers every UBX schema shipped with this crate
    pub fn with_ubx_defaults(self) -> Result<Self, DecodeError> {
        Ok(self
            .register(RxmSfrbx::CLASS, RxmSfrbx::ID, RxmSfrbx::schema()?)
            .register(RxmRawx::CLASS, RxmRawx::ID, RxmRawx::schema()?))
    }
}
