// Hex-string primitives for bit extraction, byte order and character decoding

pub mod bits;
pub mod chars;
pub mod endian;
pub mod parse;

pub use bits::extract_bits;
pub use chars::{byte_at, chars_from_hex, HexError};
pub use endian::{swap_byte_order, to_hex_le, to_word_le};
pub use parse::{container_value, take_hex_digits};
