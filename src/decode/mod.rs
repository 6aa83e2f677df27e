// Decoding of hex payloads into ordered structure values

pub mod decoder;
pub mod value;

pub use decoder::{decode, DecodeError};
pub use value::{StructValue, Value};
