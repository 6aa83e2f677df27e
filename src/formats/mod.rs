// File format handlers
pub mod layout;

pub use layout::{load_layout, parse_layout, FieldDef, Layout, LayoutError, TransformDef};
