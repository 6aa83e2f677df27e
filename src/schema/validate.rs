// Schema self-validation
// Walks a schema in declaration order, checking container alignment before
// any payload byte is interpreted, and computes the total bit length.

use std::collections::HashSet;

use thiserror::Error;

use super::field::{FieldKind, Schema};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("container width {width} for field '{field}' is not a multiple of 8 bits")]
    WidthNotByteAligned { field: String, width: u32 },

    #[error("unsupported container width {width} for field '{field}' (expected 8, 16 or 32)")]
    UnsupportedContainer { field: String, width: u32 },

    #[error("packed fields overflow the {container}-bit container at field '{field}'")]
    ContainerOverflow { field: String, container: u32 },

    #[error("field '{field}' opens a {new}-bit container before the {open}-bit container is filled")]
    ContainerChanged { field: String, open: u32, new: u32 },

    #[error("duplicate field name '{field}'")]
    DuplicateName { field: String },
}

impl SchemaError {
    /// Prefix the failing field's path with the name of the struct field
    /// it was reached through.
    fn prefixed(self, outer: &str) -> SchemaError {
        let prefix = |field: String| format!("{}.{}", outer, field);
        match self {
            SchemaError::WidthNotByteAligned { field, width } => {
                SchemaError::WidthNotByteAligned {
                    field: prefix(field),
                    width,
                }
            }
            SchemaError::UnsupportedContainer { field, width } => {
                SchemaError::UnsupportedContainer {
                    field: prefix(field),
                    width,
                }
            }
            SchemaError::ContainerOverflow { field, container } => {
                SchemaError::ContainerOverflow {
                    field: prefix(field),
                    container,
                }
            }
            SchemaError::ContainerChanged { field, open, new } => {
                SchemaError::ContainerChanged {
                    field: prefix(field),
                    open,
                    new,
                }
            }
            SchemaError::DuplicateName { field } => SchemaError::DuplicateName {
                field: prefix(field),
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, SchemaError>;

fn check_container(field: &str, width: u32) -> Result<()> {
    if width % 8 != 0 {
        return Err(SchemaError::WidthNotByteAligned {
            field: field.to_string(),
            width,
        });
    }
    if !matches!(width, 8 | 16 | 32) {
        return Err(SchemaError::UnsupportedContainer {
            field: field.to_string(),
            width,
        });
    }
    Ok(())
}

/// Validate a schema and return its total bit length.
///
/// Tracks a running packed offset that resets each time it fills the open
/// container. A scalar is accounted as a packed field of full container
/// width, so a scalar landing mid-run fails the same overflow check as an
/// oversized packed field. Struct fields are validated recursively; their
/// errors come back with the outer field name prefixed onto the field path.
///
/// The returned total is the sum of fully-closed container widths, used by
/// the decoder's input length check.
pub fn validate(schema: &Schema) -> Result<u32> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut total = 0u32;
    let mut packed_offset = 0u32;
    let mut open_container = 0u32;

    for field in schema.fields() {
        if !seen.insert(field.name.as_str()) {
            return Err(SchemaError::DuplicateName {
                field: field.name.clone(),
            });
        }

        let (field_bits, container_bits) = match &field.kind {
            FieldKind::Scalar(width) => {
                check_container(&field.name, *width)?;
                (*width, *width)
            }
            FieldKind::Packed {
                width, container, ..
            } => {
                check_container(&field.name, *container)?;
                (*width, *container)
            }
            FieldKind::Array(bits) | FieldKind::Str(bits) => {
                if bits % 8 != 0 {
                    return Err(SchemaError::WidthNotByteAligned {
                        field: field.name.clone(),
                        width: *bits,
                    });
                }
                (*bits, *bits)
            }
            FieldKind::Struct(inner) => {
                let bits = validate(inner).map_err(|e| e.prefixed(&field.name))?;
                (bits, bits)
            }
        };

        if packed_offset > 0 && container_bits != open_container {
            return Err(SchemaError::ContainerChanged {
                field: field.name.clone(),
                open: open_container,
                new: container_bits,
            });
        }

        packed_offset += field_bits;
        if packed_offset > container_bits {
            return Err(SchemaError::ContainerOverflow {
                field: field.name.clone(),
                container: container_bits,
            });
        }

        if packed_offset == container_bits {
            total += container_bits;
            packed_offset = 0;
        } else {
            open_container = container_bits;
        }
    }

    tracing::trace!("Schema validated: {} bits over {} fields", total, schema.len());
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_schema() {
        assert_eq!(validate(&Schema::new()).unwrap(), 0);
    }

    #[test]
    fn test_scalar_run() {
        let schema = Schema::new()
            .field("a", FieldKind::Scalar(8))
            .field("b", FieldKind::Scalar(16))
            .field("c", FieldKind::Scalar(32));
        assert_eq!(validate(&schema).unwrap(), 56);
    }

    #[test]
    fn test_packed_fill() {
        let schema = Schema::new()
            .field("low", FieldKind::packed(5, 8))
            .field("high", FieldKind::packed(3, 8));
        assert_eq!(validate(&schema).unwrap(), 8);
    }

    #[test]
    fn test_packed_overflow() {
        // 5 + 4 = 9 bits into an 8-bit container
        let schema = Schema::new()
            .field("low", FieldKind::packed(5, 8))
            .field("high", FieldKind::packed(4, 8));
        assert_eq!(
            validate(&schema),
            Err(SchemaError::ContainerOverflow {
                field: "high".to_string(),
                container: 8,
            })
        );
    }

    #[test]
    fn test_container_changed_mid_run() {
        let schema = Schema::new()
            .field("low", FieldKind::packed(4, 8))
            .field("wide", FieldKind::packed(12, 16));
        assert_eq!(
            validate(&schema),
            Err(SchemaError::ContainerChanged {
                field: "wide".to_string(),
                open: 8,
                new: 16,
            })
        );
    }

    #[test]
    fn test_scalar_mid_run_rejected() {
        let schema = Schema::new()
            .field("low", FieldKind::packed(4, 8))
            .field("whole", FieldKind::Scalar(8));
        assert_eq!(
            validate(&schema),
            Err(SchemaError::ContainerOverflow {
                field: "whole".to_string(),
                container: 8,
            })
        );
    }

    #[test]
    fn test_array_not_byte_aligned() {
        let schema = Schema::new().field("raw", FieldKind::Array(12));
        assert_eq!(
            validate(&schema),
            Err(SchemaError::WidthNotByteAligned {
                field: "raw".to_string(),
                width: 12,
            })
        );
    }

    #[test]
    fn test_unsupported_container() {
        let schema = Schema::new().field("odd", FieldKind::Scalar(24));
        assert_eq!(
            validate(&schema),
            Err(SchemaError::UnsupportedContainer {
                field: "odd".to_string(),
                width: 24,
            })
        );
    }

    #[test]
    fn test_duplicate_name() {
        let schema = Schema::new()
            .field("twice", FieldKind::Scalar(8))
            .field("twice", FieldKind::Scalar(8));
        assert_eq!(
            validate(&schema),
            Err(SchemaError::DuplicateName {
                field: "twice".to_string(),
            })
        );
    }

    #[test]
    fn test_nested_struct_total() {
        let inner = Schema::new()
            .field("id", FieldKind::Scalar(8))
            .field("name", FieldKind::Str(56));
        let schema = Schema::new()
            .field("header", FieldKind::Scalar(16))
            .field("record", FieldKind::Struct(inner));
        assert_eq!(validate(&schema).unwrap(), 16 + 64);
    }

    #[test]
    fn test_nested_error_is_prefixed() {
        let inner = Schema::new()
            .field("a", FieldKind::packed(5, 8))
            .field("b", FieldKind::packed(4, 8));
        let schema = Schema::new().field("record", FieldKind::Struct(inner));
        assert_eq!(
            validate(&schema),
            Err(SchemaError::ContainerOverflow {
                field: "record.b".to_string(),
                container: 8,
            })
        );
    }

    #[test]
    fn test_trailing_open_container_not_counted() {
        // Totals cover fully-closed containers only; a trailing half-filled
        // container surfaces later as an input length mismatch.
        let schema = Schema::new()
            .field("whole", FieldKind::Scalar(8))
            .field("half", FieldKind::packed(4, 8));
        assert_eq!(validate(&schema).unwrap(), 8);
    }
}
