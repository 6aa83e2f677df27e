// Field descriptors and ordered schemas
// A schema declares the on-wire layout of one structure: field order defines
// both container sequencing and intra-container bit packing order.

use std::fmt;
use std::sync::Arc;

/// Post-extraction hook applied to a raw packed-field integer.
///
/// Pure function of the raw value; it never sees the surrounding container
/// or any other field. Shared ownership so schemas stay cheap to clone and
/// safe to use from several decode threads at once.
#[derive(Clone)]
pub struct Transform(Arc<dyn Fn(u64) -> u64 + Send + Sync>);

impl Transform {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(u64) -> u64 + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Apply the transform to a raw extracted value.
    pub fn apply(&self, raw: u64) -> u64 {
        (self.0)(raw)
    }
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Transform(..)")
    }
}

/// Layout descriptor for one named field.
#[derive(Debug, Clone)]
pub enum FieldKind {
    /// Standalone numeric field occupying a full container (8, 16 or 32 bits).
    Scalar(u32),
    /// Sub-field sharing a container with its neighbours. Fields declared
    /// earlier occupy the least-significant bits of the container.
    Packed {
        width: u32,
        container: u32,
        transform: Option<Transform>,
    },
    /// Fixed-length raw byte span, preserved as hex digits.
    Array(u32),
    /// Fixed-length byte span converted to characters, wire order preserved.
    Str(u32),
    /// Fixed-length span decoded recursively with a nested schema.
    Struct(Schema),
}

impl FieldKind {
    /// A packed sub-field with no transform.
    pub fn packed(width: u32, container: u32) -> Self {
        FieldKind::Packed {
            width,
            container,
            transform: None,
        }
    }

    /// A packed sub-field with a transform applied to the raw value.
    pub fn packed_with<F>(width: u32, container: u32, transform: F) -> Self
    where
        F: Fn(u64) -> u64 + Send + Sync + 'static,
    {
        FieldKind::Packed {
            width,
            container,
            transform: Some(Transform::new(transform)),
        }
    }
}

/// One named field of a schema.
#[derive(Debug, Clone)]
pub struct Field {
    pub name: String,
    pub kind: FieldKind,
}

/// Ordered field list describing one structure layout.
///
/// Declaration order is load-bearing; schemas are immutable once built and
/// hold no decode state.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Append a field, builder style.
    pub fn field(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.push(name, kind);
        self
    }

    /// Append a field in place.
    pub fn push(&mut self, name: impl Into<String>, kind: FieldKind) {
        self.fields.push(Field {
            name: name.into(),
            kind,
        });
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
