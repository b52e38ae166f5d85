//! Immediate-operand readers.

/// Reads a big-endian `u16` from the front of the slice.
///
/// # Panics
///
/// Panics if the slice is shorter than 2 bytes. Callers check immediate
/// bounds before reading.
#[inline]
pub(crate) fn read_u16(bytes: &[u8]) -> u16 {
    u16::from_be_bytes([bytes[0], bytes[1]])
}

/// Reads a big-endian `i16` from the front of the slice.
#[inline]
pub(crate) fn read_i16(bytes: &[u8]) -> i16 {
    read_u16(bytes) as i16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn big_endian_reads() {
        assert_eq!(read_u16(&[0x12, 0x34]), 0x1234);
        assert_eq!(read_u16(&[0xff, 0xff]), 0xffff);
        assert_eq!(read_i16(&[0xff, 0xff]), -1);
        assert_eq!(read_i16(&[0x80, 0x00]), i16::MIN);
        assert_eq!(read_i16(&[0x7f, 0xff]), i16::MAX);
        // Reads are offset-based into the code slice.
        let code = [0xe0, 0x00, 0x05];
        assert_eq!(read_i16(&code[1..]), 5);
    }
}
