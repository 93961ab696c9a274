use alloc::vec::Vec;

use super::{FieldKind, FieldSpec, MessageSchema, RepeatedGroup, SchemaItem};
use crate::error::DecodeError;

/// Named sub-ranges of a bitmask field, always complete
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Bitmask {
    raw: u64,
    parts: Vec<(&'static str, u64)>,
}

impl Bitmask {
    fn split(raw: u64, masks: &'static [(&'static str, u64)]) -> Self {
        let parts = masks
            .iter()
            .map(|(name, mask)| (*name, (raw & mask) >> mask.trailing_zeros()))
            .collect();
        Self { raw, parts }
    }

    /// Undivided field value
    pub fn raw(&self) -> u64 {
        self.raw
    }

    /// Sub-range value, shifted down to bit 0
    pub fn get(&self, name: &str) -> Option<u64> {
        self.parts
            .iter()
            .find(|(part, _)| *part == name)
            .map(|(_, value)| *value)
    }

    pub fn is_set(&self, name: &str) -> bool {
        self.get(name).is_some_and(|v| v != 0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, u64)> + '_ {
        self.parts.iter().copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct EnumValue {
    pub raw: u64,
    pub identifier: &'static str,
}

/// Decoded field value
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Value {
    Unsigned(u64),
    Signed(i64),
    Float(f64),
    Bitmask(Bitmask),
    Enum(EnumValue),
}

impl Value {
    /// Unsigned, bitmask and enum values as their raw integer
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::Unsigned(v) => Some(*v),
            Value::Signed(v) => u64::try_from(*v).ok(),
            Value::Bitmask(mask) => Some(mask.raw()),
            Value::Enum(e) => Some(e.raw),
            Value::Float(_) => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Signed(v) => Some(*v),
            Value::Float(_) => None,
            _ => self.as_u64().and_then(|v| i64::try_from(v).ok()),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Signed(v) => Some(*v as f64),
            _ => self.as_u64().map(|v| v as f64),
        }
    }

    pub fn as_bitmask(&self) -> Option<&Bitmask> {
        match self {
            Value::Bitmask(mask) => Some(mask),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<EnumValue> {
        match self {
            Value::Enum(e) => Some(*e),
            _ => None,
        }
    }
}

/// Identity of a decoded field: repeated instances carry their 1-based index
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FieldKey {
    pub name: &'static str,
    pub index: Option<usize>,
}

/// Result of [decode]: decoded fields in payload order
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedMessage<'a> {
    name: &'static str,
    payload: &'a [u8],
    fields: Vec<(FieldKey, Value)>,
}

impl<'a> DecodedMessage<'a> {
    /// Schema name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The bytes this message was decoded from
    pub fn payload(&self) -> &'a [u8] {
        self.payload
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FieldKey, &Value)> {
        self.fields.iter().map(|(key, value)| (key, value))
    }

    /// Scalar (non repeated) field
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.find(name, None)
    }

    /// Instance `index` (1-based) of a repeated field
    pub fn get_indexed(&self, name: &str, index: usize) -> Option<&Value> {
        self.find(name, Some(index))
    }

    /// Every instance of a repeated field, in index order
    pub fn repeated<'s>(&'s self, name: &'s str) -> impl Iterator<Item = &'s Value> + 's {
        self.fields
            .iter()
            .filter(move |(key, _)| key.index.is_some() && key.name == name)
            .map(|(_, value)| value)
    }

    /// Scalar field as an unsigned integer
    pub fn unsigned(&self, name: &'static str) -> Result<u64, DecodeError> {
        self.get(name)
            .and_then(Value::as_u64)
            .ok_or(DecodeError::MissingField {
                message: self.name,
                field: name,
            })
    }

    /// Scalar enum field
    pub fn enumerated(&self, name: &'static str) -> Result<EnumValue, DecodeError> {
        self.get(name)
            .and_then(Value::as_enum)
            .ok_or(DecodeError::MissingField {
                message: self.name,
                field: name,
            })
    }

    /// Scalar bitmask field
    pub fn bitmask(&self, name: &'static str) -> Result<&Bitmask, DecodeError> {
        self.get(name)
            .and_then(Value::as_bitmask)
            .ok_or(DecodeError::MissingField {
                message: self.name,
                field: name,
            })
    }

    fn find(&self, name: &str, index: Option<usize>) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(key, _)| key.index == index && key.name == name)
            .map(|(_, value)| value)
    }
}

/// Decodes `payload` against `schema`.
///
/// Fails with [DecodeError::SchemaMismatch] when the payload is too short,
/// with [DecodeError::InvalidValue] on enum, allowed set or group count
/// violations. Nothing is returned on failure.
pub fn decode<'a>(
    schema: &MessageSchema,
    payload: &'a [u8],
) -> Result<DecodedMessage<'a>, DecodeError> {
    let message = schema.name();
    let mut fixed_remaining = schema.fixed_len();
    if payload.len() < fixed_remaining {
        return Err(DecodeError::SchemaMismatch {
            message,
            expect: fixed_remaining,
            got: payload.len(),
        });
    }

    let mut fields = Vec::new();
    let mut cursor = 0;

    for item in schema.items() {
        match item {
            SchemaItem::Field(spec) => {
                let value = read_field(message, spec, &payload[cursor..cursor + spec.width])?;
                fields.push((
                    FieldKey {
                        name: spec.name,
                        index: None,
                    },
                    value,
                ));
                cursor += spec.width;
                fixed_remaining -= spec.width;
            },
            SchemaItem::Repeated(group) => {
                let count = group_count(message, group, &fields)?;
                let expect = count
                    .checked_mul(group.instance_width())
                    .and_then(|len| len.checked_add(cursor + fixed_remaining))
                    .unwrap_or(usize::MAX);
                if payload.len() < expect {
                    return Err(DecodeError::SchemaMismatch {
                        message,
                        expect,
                        got: payload.len(),
                    });
                }
                for index in 1..=count {
                    for spec in &group.templates {
                        let value =
                            read_field(message, spec, &payload[cursor..cursor + spec.width])?;
                        fields.push((
                            FieldKey {
                                name: spec.name,
                                index: Some(index),
                            },
                            value,
                        ));
                        cursor += spec.width;
                    }
                }
            },
        }
    }

    Ok(DecodedMessage {
        name: message,
        payload,
        fields,
    })
}

fn group_count(
    message: &'static str,
    group: &RepeatedGroup,
    decoded: &[(FieldKey, Value)],
) -> Result<usize, DecodeError> {
    let count = decoded
        .iter()
        .find(|(key, _)| key.index.is_none() && key.name == group.count_field)
        .and_then(|(_, value)| value.as_u64())
        .ok_or(DecodeError::MissingField {
            message,
            field: group.count_field,
        })?;

    let too_many = DecodeError::InvalidValue {
        message,
        field: group.count_field,
        value: i64::try_from(count).unwrap_or(i64::MAX),
    };
    let count = usize::try_from(count).map_err(|_| too_many.clone())?;
    match group.max_count {
        Some(max) if count > max => Err(too_many),
        _ => Ok(count),
    }
}

fn read_field(
    message: &'static str,
    spec: &FieldSpec,
    bytes: &[u8],
) -> Result<Value, DecodeError> {
    // little endian, zero extended
    let raw = bytes
        .iter()
        .rev()
        .fold(0u64, |acc, b| (acc << 8) | u64::from(*b));

    let value = match spec.kind {
        FieldKind::Unsigned => Value::Unsigned(raw),
        FieldKind::Signed => {
            let shift = 64 - 8 * spec.width as u32;
            Value::Signed(((raw << shift) as i64) >> shift)
        },
        FieldKind::Float => {
            if spec.width == 4 {
                Value::Float(f64::from(f32::from_bits(raw as u32)))
            } else {
                Value::Float(f64::from_bits(raw))
            }
        },
        FieldKind::Bitmask(masks) => Value::Bitmask(Bitmask::split(raw, masks)),
        FieldKind::Enum(desc) => {
            let identifier = desc
                .identifier(raw)
                .ok_or(DecodeError::InvalidValue {
                    message,
                    field: spec.name,
                    value: raw as i64,
                })?;
            Value::Enum(EnumValue { raw, identifier })
        },
    };

    if let Some(allowed) = spec.allowed {
        let v = value.as_i64();
        if !v.is_some_and(|v| allowed.contains(&v)) {
            return Err(DecodeError::InvalidValue {
                message,
                field: spec.name,
                value: v.unwrap_or(i64::MAX),
            });
        }
    }

    Ok(value)
}
