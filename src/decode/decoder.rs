// Structure decoder
// Walks a schema and a hex payload in lock-step: validates the schema first,
// then a single linear pass consuming container-sized spans of input.

use thiserror::Error;

use crate::hexbits::{chars_from_hex, container_value, extract_bits, take_hex_digits, HexError};
use crate::schema::{validate, FieldKind, Schema, SchemaError};

use super::value::{StructValue, Value};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("hex payload has odd length ({digits} digits)")]
    OddLength { digits: usize },

    #[error("payload contains a non-hex character at digit {position}")]
    InvalidDigit { position: usize },

    #[error("payload is {actual_bits} bits but the schema describes {expected_bits} bits")]
    LengthMismatch {
        expected_bits: u32,
        actual_bits: usize,
    },

    #[error("payload ended early while reading field '{field}'")]
    Truncated { field: String },

    #[error(transparent)]
    Hex(#[from] HexError),
}

pub type Result<T> = std::result::Result<T, DecodeError>;

/// Decode a hex payload against a schema.
///
/// The payload is case-insensitive hex text; multi-byte containers arrive
/// little-endian and are normalized once per container. Packed fields are
/// assigned bits in declaration order starting from the least-significant
/// bit of their container; this LSB-first order is the on-wire contract.
///
/// The schema is validated and the payload length checked before any field
/// is read; on failure nothing is decoded (no partial results). The call is
/// a pure function of its inputs and holds no state between invocations.
pub fn decode(schema: &Schema, hex: &str) -> Result<StructValue> {
    let expected_bits = validate(schema)?;

    if hex.len() % 2 != 0 {
        return Err(DecodeError::OddLength { digits: hex.len() });
    }
    if let Some(position) = hex.bytes().position(|b| !b.is_ascii_hexdigit()) {
        return Err(DecodeError::InvalidDigit { position });
    }
    let actual_bits = hex.len() * 4;
    if actual_bits as u32 != expected_bits {
        return Err(DecodeError::LengthMismatch {
            expected_bits,
            actual_bits,
        });
    }

    tracing::debug!("Decoding {} bits into {} fields", expected_bits, schema.len());
    decode_fields(schema, hex)
}

/// One pass over validated input. Byte-level consumption goes through the
/// nom combinators; the bit cursor tracks the position inside the open
/// container.
fn decode_fields(schema: &Schema, hex: &str) -> Result<StructValue> {
    let mut out = StructValue::new();
    let mut input = hex;
    let mut container: u64 = 0;
    let mut container_bits = 0u32;
    let mut bit_cursor = 0u32;

    for field in schema.fields() {
        match &field.kind {
            FieldKind::Array(bits) => {
                let (rest, raw) = take_span(&field.name, *bits, input)?;
                out.insert(&field.name, Value::Hex(raw.to_string()));
                input = rest;
            }
            FieldKind::Str(bits) => {
                let (rest, raw) = take_span(&field.name, *bits, input)?;
                out.insert(&field.name, Value::Text(chars_from_hex(raw)?));
                input = rest;
            }
            FieldKind::Struct(inner) => {
                let bits = validate(inner)?;
                let (rest, raw) = take_span(&field.name, bits, input)?;
                out.insert(&field.name, Value::Struct(decode_fields(inner, raw)?));
                input = rest;
            }
            FieldKind::Scalar(width) => {
                // The validator guarantees no container is open here.
                let (rest, value) =
                    container_value(*width)(input).map_err(|_| DecodeError::Truncated {
                        field: field.name.clone(),
                    })?;
                out.insert(&field.name, Value::Uint(extract_bits(value, 0, *width)));
                input = rest;
            }
            FieldKind::Packed {
                width,
                container: cbits,
                transform,
            } => {
                if bit_cursor == 0 {
                    let (rest, value) =
                        container_value(*cbits)(input).map_err(|_| DecodeError::Truncated {
                            field: field.name.clone(),
                        })?;
                    container = value;
                    container_bits = *cbits;
                    input = rest;
                    tracing::trace!("Opened {}-bit container: {:#x}", cbits, value);
                }

                let raw = extract_bits(container, bit_cursor, *width);
                let value = match transform {
                    Some(t) => t.apply(raw),
                    None => raw,
                };
                out.insert(&field.name, Value::Uint(value));

                bit_cursor += *width;
                if bit_cursor == container_bits {
                    bit_cursor = 0;
                }
            }
        }
    }

    Ok(out)
}

fn take_span<'a>(field: &str, bits: u32, input: &'a str) -> Result<(&'a str, &'a str)> {
    take_hex_digits((bits / 4) as usize)(input).map_err(|_| DecodeError::Truncated {
        field: field.to_string(),
    })
}
