// Byte-order handling for hex-encoded containers

/// Reverse the byte order of a hex string.
///
/// Byte `i` (digits `2i..2i+2`) moves to position `N-1-i`; nibble order
/// within each byte is preserved. Converts a little-endian wire rendering
/// into the digit order needed for numeric parsing (and back, the swap is
/// its own inverse). A single byte is returned unchanged. The input must
/// hold whole bytes (even digit count).
pub fn swap_byte_order(hex: &str) -> String {
    hex.as_bytes()
        .chunks(2)
        .rev()
        .flat_map(|pair| pair.iter().copied())
        .map(char::from)
        .collect()
}

/// Format an integer as `len_bytes` bytes of little-endian hex.
///
/// Example: `to_hex_le(0x1234, 2) == "3412"`. Digits above `len_bytes`
/// are dropped, matching a fixed-width register write.
pub fn to_hex_le(value: u64, len_bytes: usize) -> String {
    let mut out = String::with_capacity(len_bytes * 2);
    for i in 0..len_bytes {
        out.push_str(&format!("{:02X}", (value >> (8 * i)) & 0xFF));
    }
    out
}

/// Format a 16-bit word as 4 hex digits, little-endian.
pub fn to_word_le(value: u16) -> String {
    to_hex_le(value as u64, 2)
}
