// JSON layout definitions
// A layout file declares a schema in data: field order, widths and optional
// declarative transforms. Layouts compile into schema::Schema for decoding.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::schema::{FieldKind, Schema, Transform};

#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("failed to read layout file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse layout JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LayoutError>;

/// Declarative transform applied to a raw extracted integer.
///
/// The closed set keeps layouts serializable; in-code schemas can attach
/// arbitrary functions instead.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformDef {
    /// Wrapping add of a signed constant.
    Add(i64),
    /// Wrapping multiply by a constant.
    Scale(u64),
    /// Bitwise AND with a constant.
    Mask(u64),
    /// Logical shift right.
    ShiftRight(u32),
}

impl TransformDef {
    /// Compile into the function value the decoder applies.
    pub fn compile(&self) -> Transform {
        match *self {
            TransformDef::Add(n) => Transform::new(move |raw| raw.wrapping_add_signed(n)),
            TransformDef::Scale(n) => Transform::new(move |raw| raw.wrapping_mul(n)),
            TransformDef::Mask(n) => Transform::new(move |raw| raw & n),
            TransformDef::ShiftRight(n) => Transform::new(move |raw| raw >> n),
        }
    }
}

/// One field definition, tagged by kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldDef {
    Scalar {
        bits: u32,
    },
    Packed {
        bits: u32,
        container: u32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        transform: Option<TransformDef>,
    },
    Array {
        bits: u32,
    },
    String {
        bits: u32,
    },
    Struct {
        fields: Vec<LayoutField>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutField {
    pub name: String,
    #[serde(flatten)]
    pub def: FieldDef,
}

/// A named structure layout loaded from JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layout {
    #[serde(default)]
    pub description: String,
    pub fields: Vec<LayoutField>,
}

impl Layout {
    /// Build the decode schema. The result is unchecked here; the decoder
    /// validates it before reading any payload.
    pub fn to_schema(&self) -> Schema {
        fields_to_schema(&self.fields)
    }
}

fn fields_to_schema(defs: &[LayoutField]) -> Schema {
    let mut schema = Schema::new();
    for field in defs {
        let kind = match &field.def {
            FieldDef::Scalar { bits } => FieldKind::Scalar(*bits),
            FieldDef::Packed {
                bits,
                container,
                transform,
            } => FieldKind::Packed {
                width: *bits,
                container: *container,
                transform: transform.as_ref().map(TransformDef::compile),
            },
            FieldDef::Array { bits } => FieldKind::Array(*bits),
            FieldDef::String { bits } => FieldKind::Str(*bits),
            FieldDef::Struct { fields } => FieldKind::Struct(fields_to_schema(fields)),
        };
        schema.push(&field.name, kind);
    }
    schema
}

/// Parse a layout from JSON text.
pub fn parse_layout(json: &str) -> Result<Layout> {
    Ok(serde_json::from_str(json)?)
}

/// Load a layout from a JSON file.
pub fn load_layout(path: impl AsRef<Path>) -> Result<Layout> {
    parse_layout(&fs::read_to_string(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::decode;
    use crate::schema::validate;

    const STATUS_LAYOUT: &str = r#"{
        "description": "instrument status word",
        "fields": [
            {"name": "model", "type": "scalar", "bits": 8},
            {"name": "level", "type": "packed", "bits": 12, "container": 16,
             "transform": {"add": 1}},
            {"name": "range", "type": "packed", "bits": 4, "container": 16},
            {"name": "ident", "type": "string", "bits": 56}
        ]
    }"#;

    #[test]
    fn test_parse_layout() {
        let layout = parse_layout(STATUS_LAYOUT).unwrap();
        assert_eq!(layout.description, "instrument status word");
        assert_eq!(layout.fields.len(), 4);
    }

    #[test]
    fn test_layout_decodes_like_handwritten_schema() {
        let layout = parse_layout(STATUS_LAYOUT).unwrap();
        let schema = layout.to_schema();
        assert_eq!(validate(&schema).unwrap(), 8 + 16 + 56);

        let out = decode(&schema, "8f715655727567756179").unwrap();
        assert_eq!(out.get("model").unwrap().as_uint(), Some(0x8f));
        assert_eq!(out.get("level").unwrap().as_uint(), Some(0x672));
        assert_eq!(out.get("range").unwrap().as_uint(), Some(0x5));
        assert_eq!(out.get("ident").unwrap().as_text(), Some("Uruguay"));
    }

    #[test]
    fn test_nested_struct_layout() {
        let json = r#"{
            "fields": [
                {"name": "header", "type": "scalar", "bits": 8},
                {"name": "record", "type": "struct", "fields": [
                    {"name": "id", "type": "scalar", "bits": 8},
                    {"name": "tag", "type": "array", "bits": 16}
                ]}
            ]
        }"#;
        let schema = parse_layout(json).unwrap().to_schema();
        let out = decode(&schema, "01ffabcd").unwrap();
        assert_eq!(out.path("record.id").unwrap().as_uint(), Some(0xff));
        assert_eq!(out.path("record.tag").unwrap().as_hex(), Some("abcd"));
    }

    #[test]
    fn test_transform_compile() {
        assert_eq!(TransformDef::Add(-2).compile().apply(10), 8);
        assert_eq!(TransformDef::Scale(3).compile().apply(5), 15);
        assert_eq!(TransformDef::Mask(0x0f).compile().apply(0xabc), 0xc);
        assert_eq!(TransformDef::ShiftRight(4).compile().apply(0xabc), 0xab);
    }

    #[test]
    fn test_layout_round_trip() {
        let layout = parse_layout(STATUS_LAYOUT).unwrap();
        let json = serde_json::to_string(&layout).unwrap();
        let reparsed = parse_layout(&json).unwrap();
        assert_eq!(reparsed.fields.len(), layout.fields.len());
    }

    #[test]
    fn test_bad_json_rejected() {
        assert!(parse_layout("{\"fields\": 3}").is_err());
    }
}
