// Schema model for fixed-layout binary structures

pub mod field;
pub mod validate;

pub use field::{Field, FieldKind, Schema, Transform};
pub use validate::{validate, SchemaError};
