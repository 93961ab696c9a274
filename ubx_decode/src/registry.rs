//! `(class, id)` → [MessageSchema] lookup.
//!
//! A registry is assembled once with [SchemaRegistryBuilder] and is
//! immutable afterwards, so shared references can be handed to any number
//! of decoding threads.

use alloc::collections::BTreeMap;

use log::{debug, warn};

use crate::{
    error::DecodeError,
    schema::{DecodedMessage, MessageSchema},
};

#[derive(Debug, Default)]
pub struct SchemaRegistry {
    schemas: BTreeMap<(u8, u8), MessageSchema>,
}

impl SchemaRegistry {
    pub fn builder() -> SchemaRegistryBuilder {
        SchemaRegistryBuilder::default()
    }

    /// Process wide registry holding the UBX schemas of this crate,
    /// populated on first use.
    #[cfg(feature = "std")]
    pub fn ubx() -> Result<&'static SchemaRegistry, DecodeError> {
        static REGISTRY: std::sync::OnceLock<Result<SchemaRegistry, DecodeError>> =
            std::sync::OnceLock::new();

        REGISTRY
            .get_or_init(|| Ok(SchemaRegistry::builder().with_ubx_defaults()?.build()))
            .as_ref()
            .map_err(Clone::clone)
    }

    pub fn lookup(&self, class: u8, id: u8) -> Result<&MessageSchema, DecodeError> {
        self.schemas
            .get(&(class, id))
            .ok_or(DecodeError::UnknownMessage { class, id })
    }

    /// Looks the schema up and decodes `payload` with it
    pub fn decode<'a>(
        &self,
        class: u8,
        id: u8,
        payload: &'a [u8],
    ) -> Result<DecodedMessage<'a>, DecodeError> {
        self.lookup(class, id)?.decode(payload)
    }

    /// Registered `(class, id)` pairs, in ascending order
    pub fn keys(&self) -> impl Iterator<Item = (u8, u8)> + '_ {
        self.schemas.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct SchemaRegistryBuilder {
    schemas: BTreeMap<(u8, u8), MessageSchema>,
}

impl SchemaRegistryBuilder {
    /// Registers `schema` for `(class, id)`. The first registration of a pair wins.
    pub fn register(mut self, class: u8, id: u8, schema: MessageSchema) -> Self {
        if let Some(existing) = self.schemas.get(&(class, id)) {
            warn!(
                "ignoring {} for class {:#04x} id {:#04x}, already registered as {}",
                schema.name(),
                class,
                id,
                existing.name()
            );
        } else {
            debug!(
                "registered {} for class {:#04x} id {:#04x}",
                schema.name(),
                class,
                id
            );
            self.schemas.insert((class, id), schema);
        }
        self
    }

    pub fn build(self) -> SchemaRegistry {
        SchemaRegistry {
            schemas: self.schemas,
        }
    }
}
