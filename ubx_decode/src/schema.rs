//! Declarative description of UBX payloads.
//!
//! A [MessageSchema] is an ordered list of [FieldSpec]s and [RepeatedGroup]s.
//! Fields are laid out back to back in ordinal order, the byte offset of a
//! field is the sum of the widths of everything declared before it.

use alloc::vec::Vec;

use crate::error::DecodeError;

pub(crate) mod engine;

pub use engine::{decode, Bitmask, DecodedMessage, EnumValue, FieldKey, Value};

/// Closed set of identifiers a raw value may map onto
#[derive(Debug, PartialEq, Eq)]
pub struct EnumDesc {
    pub name: &'static str,
    pub variants: &'static [(&'static str, u64)],
}

impl EnumDesc {
    pub fn identifier(&self, raw: u64) -> Option<&'static str> {
        self.variants
            .iter()
            .find(|(_, value)| *value == raw)
            .map(|(name, _)| *name)
    }

    pub fn raw(&self, identifier: &str) -> Option<u64> {
        self.variants
            .iter()
            .find(|(name, _)| *name == identifier)
            .map(|(_, value)| *value)
    }
}

/// How the bytes of a field are interpreted
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    Unsigned,
    /// Two's complement
    Signed,
    /// IEEE-754, 4 or 8 bytes
    Float,
    /// Raw unsigned value split into named sub-ranges
    Bitmask(&'static [(&'static str, u64)]),
    Enum(&'static EnumDesc),
}

/// One field of a payload
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    /// 1-based ordinal position, within the schema or within a group
    pub index: u8,
    pub width: usize,
    pub kind: FieldKind,
    pub allowed: Option<&'static [i64]>,
}

impl FieldSpec {
    pub const fn new(name: &'static str, index: u8, width: usize, kind: FieldKind) -> Self {
        Self {
            name,
            index,
            width,
            kind,
            allowed: None,
        }
    }

    pub const fn unsigned(name: &'static str, index: u8, width: usize) -> Self {
        Self::new(name, index, width, FieldKind::Unsigned)
    }

    pub const fn signed(name: &'static str, index: u8, width: usize) -> Self {
        Self::new(name, index, width, FieldKind::Signed)
    }

    pub const fn float(name: &'static str, index: u8, width: usize) -> Self {
        Self::new(name, index, width, FieldKind::Float)
    }

    pub const fn bitmask(
        name: &'static str,
        index: u8,
        width: usize,
        masks: &'static [(&'static str, u64)],
    ) -> Self {
        Self::new(name, index, width, FieldKind::Bitmask(masks))
    }

    pub const fn enumerated(
        name: &'static str,
        index: u8,
        width: usize,
        desc: &'static EnumDesc,
    ) -> Self {
        Self::new(name, index, width, FieldKind::Enum(desc))
    }

    /// Restricts the decoded value to `values`
    pub const fn allowed(mut self, values: &'static [i64]) -> Self {
        self.allowed = Some(values);
        self
    }

    fn validate(&self, message: &'static str) -> Result<(), DecodeError> {
        let invalid = |reason| Err(DecodeError::InvalidSchema { message, reason });
        match self.kind {
            FieldKind::Float if !matches!(self.width, 4 | 8) => {
                invalid("float fields are 4 or 8 bytes wide")
            },
            FieldKind::Float if self.allowed.is_some() => {
                invalid("allowed values only apply to integer fields")
            },
            _ if !matches!(self.width, 1 | 2 | 4 | 8) => {
                invalid("integer fields are 1, 2, 4 or 8 bytes wide")
            },
            FieldKind::Bitmask(masks) if masks.iter().any(|(_, mask)| *mask == 0) => {
                invalid("bitmask sub-ranges need a non-zero mask")
            },
            FieldKind::Bitmask(masks)
                if self.width < 8 && masks.iter().any(|(_, mask)| *mask >> (self.width * 8) != 0) =>
            {
                invalid("bitmask sub-range exceeds field width")
            },
            _ => Ok(()),
        }
    }
}

/// Templates repeated as many times as an earlier count field says
#[derive(Debug, Clone, PartialEq)]
pub struct RepeatedGroup {
    pub count_field: &'static str,
    pub max_count: Option<usize>,
    pub templates: Vec<FieldSpec>,
}

impl RepeatedGroup {
    pub fn new(count_field: &'static str) -> Self {
        Self {
            count_field,
            max_count: None,
            templates: Vec::new(),
        }
    }

    pub fn max_count(mut self, max: usize) -> Self {
        self.max_count = Some(max);
        self
    }

    pub fn field(mut self, field: FieldSpec) -> Self {
        self.templates.push(field);
        self
    }

    /// Bytes taken by one instance of the group
    pub fn instance_width(&self) -> usize {
        self.templates.iter().map(|f| f.width).sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SchemaItem {
    Field(FieldSpec),
    Repeated(RepeatedGroup),
}

/// Ordered payload description of one UBX message type
#[derive(Debug, Clone, PartialEq)]
pub struct MessageSchema {
    name: &'static str,
    items: Vec<SchemaItem>,
}

impl MessageSchema {
    pub fn builder(name: &'static str) -> MessageSchemaBuilder {
        MessageSchemaBuilder {
            name,
            items: Vec::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn items(&self) -> &[SchemaItem] {
        &self.items
    }

    /// Payload length with every repeated group empty
    pub fn fixed_len(&self) -> usize {
        self.items
            .iter()
            .map(|item| match item {
                SchemaItem::Field(f) => f.width,
                SchemaItem::Repeated(_) => 0,
            })
            .sum()
    }

    /// Scalar field lookup
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.items.iter().find_map(|item| match item {
            SchemaItem::Field(f) if f.name == name => Some(f),
            _ => None,
        })
    }

    /// Decodes `payload` against this schema, see [decode]
    pub fn decode<'a>(&self, payload: &'a [u8]) -> Result<DecodedMessage<'a>, DecodeError> {
        decode(self, payload)
    }
}

pub struct MessageSchemaBuilder {
    name: &'static str,
    items: Vec<SchemaItem>,
}

impl MessageSchemaBuilder {
    pub fn field(mut self, field: FieldSpec) -> Self {
        self.items.push(SchemaItem::Field(field));
        self
    }

    pub fn repeated(mut self, group: RepeatedGroup) -> Self {
        self.items.push(SchemaItem::Repeated(group));
        self
    }

    /// Checks ordering and count field invariants
    pub fn build(self) -> Result<MessageSchema, DecodeError> {
        let message = self.name;
        let invalid = |reason| DecodeError::InvalidSchema { message, reason };

        let mut last_index = 0;
        let mut scalars: Vec<&FieldSpec> = Vec::new();

        for item in &self.items {
            match item {
                SchemaItem::Field(f) => {
                    if f.index <= last_index {
                        return Err(invalid("field indices must be strictly increasing"));
                    }
                    f.validate(message)?;
                    last_index = f.index;
                    scalars.push(f);
                },
                SchemaItem::Repeated(group) => {
                    let count = scalars
                        .iter()
                        .find(|f| f.name == group.count_field)
                        .ok_or_else(|| invalid("count field must be declared before its group"))?;
                    if count.kind != FieldKind::Unsigned {
                        return Err(invalid("count field must be unsigned"));
                    }
                    if group.templates.is_empty() {
                        return Err(invalid("repeated group without templates"));
                    }
                    let mut last_template = 0;
                    for t in &group.templates {
                        if t.index <= last_template {
                            return Err(invalid("field indices must be strictly increasing"));
                        }
                        t.validate(message)?;
                        last_template = t.index;
                    }
                },
            }
        }

        Ok(MessageSchema {
            name: self.name,
            items: self.items,
        })
    }
}
