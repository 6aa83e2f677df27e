// HEXSTRUCT: schema-driven decoder for bit-packed instrument payloads
// Copyright 2025 - Licensed under GPLv3

pub mod decode;
pub mod formats;
pub mod hexbits;
pub mod schema;

// Re-export commonly used types
pub use decode::{decode, DecodeError, StructValue, Value};
pub use formats::{load_layout, parse_layout, Layout, LayoutError};
pub use hexbits::{
    byte_at, chars_from_hex, extract_bits, swap_byte_order, to_hex_le, to_word_le,
};
pub use schema::{validate, Field, FieldKind, Schema, SchemaError, Transform};

/// HEXSTRUCT version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
