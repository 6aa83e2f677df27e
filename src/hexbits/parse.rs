// Parser combinators using nom for walking hex-encoded payloads

use super::endian::swap_byte_order;
use nom::{
    bytes::complete::take_while_m_n,
    error::{Error, ErrorKind},
    IResult,
};

/// Consume exactly `count` hex digits (case-insensitive).
pub fn take_hex_digits(count: usize) -> impl Fn(&str) -> IResult<&str, &str> {
    move |input: &str| take_while_m_n(count, count, |c: char| c.is_ascii_hexdigit())(input)
}

/// Consume one container of `bits` width and parse its numeric value.
///
/// The container arrives little-endian on the wire; its byte order is
/// reversed once here, then the digits are parsed as an unsigned integer.
pub fn container_value(bits: u32) -> impl Fn(&str) -> IResult<&str, u64> {
    move |input: &str| {
        let digits = (bits / 4) as usize;
        let (input, raw) = take_hex_digits(digits)(input)?;
        let value = u64::from_str_radix(&swap_byte_order(raw), 16)
            .map_err(|_| nom::Err::Error(Error::new(input, ErrorKind::HexDigit)))?;
        Ok((input, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_hex_digits() {
        let (rest, taken) = take_hex_digits(4)("8fe37156").unwrap();
        assert_eq!(taken, "8fe3");
        assert_eq!(rest, "7156");
    }

    #[test]
    fn test_take_hex_digits_rejects_non_hex() {
        assert!(take_hex_digits(4)("8fzz").is_err());
    }

    #[test]
    fn test_take_hex_digits_short_input() {
        assert!(take_hex_digits(4)("8f").is_err());
    }

    #[test]
    fn test_container_value_byte() {
        let (rest, value) = container_value(8)("e3").unwrap();
        assert_eq!(value, 0xe3);
        assert!(rest.is_empty());
    }

    #[test]
    fn test_container_value_word() {
        // "f135" is little-endian on the wire, so the value is 0x35f1
        let (_, value) = container_value(16)("f135").unwrap();
        assert_eq!(value, 0x35f1);
    }

    #[test]
    fn test_container_value_double_word() {
        let (_, value) = container_value(32)("0f512332").unwrap();
        assert_eq!(value, 0x3223510f);
    }

    #[test]
    fn test_container_value_case_insensitive() {
        let (_, upper) = container_value(16)("F135").unwrap();
        let (_, lower) = container_value(16)("f135").unwrap();
        assert_eq!(upper, lower);
    }
}
