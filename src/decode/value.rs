// Decoded field values and the ordered result mapping

use serde::ser::{Serialize, SerializeMap, Serializer};

/// One decoded field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Numeric field (post-transform, if the field carried one).
    Uint(u64),
    /// Raw span preserved as hex digits, exactly as received.
    Hex(String),
    /// Character data in wire byte order.
    Text(String),
    /// Nested decoded structure.
    Struct(StructValue),
}

impl Value {
    pub fn as_uint(&self) -> Option<u64> {
        match self {
            Value::Uint(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_hex(&self) -> Option<&str> {
        match self {
            Value::Hex(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<&StructValue> {
        match self {
            Value::Struct(s) => Some(s),
            _ => None,
        }
    }
}

/// Decoded structure: field names mapped to values, ordered by construction.
///
/// Iteration order equals insertion order equals schema declaration order;
/// the ordering is structural, not asserted at runtime. Lookups are linear
/// scans, which is fine at schema sizes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StructValue {
    entries: Vec<(String, Value)>,
}

impl StructValue {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append a decoded field.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.entries.push((name.into(), value));
    }

    /// Look up a field by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Look up a value by dotted path, descending into nested structs.
    ///
    /// Example: `path("sub_struct_0.sub_field_4")`.
    pub fn path(&self, path: &str) -> Option<&Value> {
        let mut parts = path.split('.');
        let mut current = self.get(parts.next()?)?;
        for part in parts {
            current = current.as_struct()?.get(part)?;
        }
        Some(current)
    }

    /// Fields in decode order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// Hand-written so JSON output keeps schema field order; a derived map
// serializer would not.
impl Serialize for StructValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Uint(v) => serializer.serialize_u64(*v),
            Value::Hex(s) | Value::Text(s) => serializer.serialize_str(s),
            Value::Struct(s) => s.serialize(serializer),
        }
    }
}
