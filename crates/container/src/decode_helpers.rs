/// Consumes a single byte from the input, returning the remainder and the
/// byte, or `None` if the input is empty.
///
/// Returns `None` so that each call site can map truncation to the parse
/// error specific to its position in the header.
#[inline]
pub(crate) fn consume_u8(input: &[u8]) -> Option<(&[u8], u8)> {
    let (byte, rest) = input.split_first()?;
    Some((rest, *byte))
}

/// Consumes a big-endian u16 from the input, or `None` on short input.
#[inline]
pub(crate) fn consume_u16(input: &[u8]) -> Option<(&[u8], u16)> {
    if input.len() < 2 {
        return None;
    }
    let (int_bytes, rest) = input.split_at(2);
    Some((rest, u16::from_be_bytes([int_bytes[0], int_bytes[1]])))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consume() {
        assert_eq!(consume_u8(&[]), None);
        assert_eq!(consume_u8(&[0xab]), Some((&[][..], 0xab)));
        assert_eq!(consume_u16(&[0x01]), None);
        assert_eq!(consume_u16(&[0x01, 0x02, 0x03]), Some((&[0x03][..], 0x0102)));
    }
}
