// Byte and character views over hex-encoded payloads

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HexError {
    #[error("hex string holds {bytes} bytes, byte {index} requested")]
    OutOfRange { index: usize, bytes: usize },

    #[error("invalid hex digit in byte {index}")]
    InvalidDigit { index: usize },

    #[error("hex string has odd length ({digits} digits)")]
    OddLength { digits: usize },
}

pub type Result<T> = std::result::Result<T, HexError>;

/// Read the byte at `index` (starting at 0) from a hex string.
pub fn byte_at(hex: &str, index: usize) -> Result<u8> {
    let start = index * 2;
    let digits = hex.get(start..start + 2).ok_or(HexError::OutOfRange {
        index,
        bytes: hex.len() / 2,
    })?;
    u8::from_str_radix(digits, 16).map_err(|_| HexError::InvalidDigit { index })
}

/// Convert a hex string to characters, one per byte, preserving byte order.
///
/// This is the textual-payload path: no endian normalization is applied.
pub fn chars_from_hex(hex: &str) -> Result<String> {
    if hex.len() % 2 != 0 {
        return Err(HexError::OddLength { digits: hex.len() });
    }

    let mut out = String::with_capacity(hex.len() / 2);
    for index in 0..hex.len() / 2 {
        out.push(char::from(byte_at(hex, index)?));
    }
    Ok(out)
}
