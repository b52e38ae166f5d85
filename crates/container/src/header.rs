use super::{
    decode_helpers::{consume_u16, consume_u8},
    ParseError, EOF_MAGIC, EOF_VERSION,
};
use std::vec::Vec;

/// Decoded EOF section-size header.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EofHeader {
    /// Size of the type section in bytes (4 bytes per code section).
    pub types_size: u16,
    /// Sizes of the code sections. Always at least one, none zero.
    pub code_sizes: Vec<u16>,
    /// Sizes of the container sections. May be empty, none zero.
    pub container_sizes: Vec<u16>,
    /// Declared data size. May exceed the bytes actually present.
    pub data_size: u16,
    /// Sum of code sizes.
    pub sum_code_sizes: usize,
    /// Sum of container sizes.
    pub sum_container_sizes: usize,
}

const KIND_TERMINATOR: u8 = 0x00;
const KIND_TYPES: u8 = 0x01;
const KIND_CODE: u8 = 0x02;
const KIND_CONTAINER: u8 = 0x03;
const KIND_DATA: u8 = 0x04;

/// Hard cap on the number of code sections.
pub(crate) const MAX_CODE_SECTIONS: usize = 1024;
/// Hard cap on the number of container sections.
pub(crate) const MAX_CONTAINER_SECTIONS: usize = 256;

/// Reads a section count followed by that many non-zero 16-bit sizes.
#[inline]
fn consume_section_sizes(input: &[u8]) -> Result<(&[u8], Vec<u16>, usize), ParseError> {
    let (input, count) = consume_u16(input).ok_or(ParseError::IncompleteSectionNumber)?;
    if count == 0 {
        return Err(ParseError::ZeroSectionSize);
    }
    let byte_size = count as usize * 2;
    if input.len() < byte_size {
        return Err(ParseError::IncompleteSectionSize);
    }
    let mut sizes = Vec::with_capacity(count as usize);
    let mut sum = 0;
    for i in 0..count as usize {
        let size = u16::from_be_bytes([input[i * 2], input[i * 2 + 1]]);
        if size == 0 {
            return Err(ParseError::ZeroSectionSize);
        }
        sum += size as usize;
        sizes.push(size);
    }
    Ok((&input[byte_size..], sizes, sum))
}

impl EofHeader {
    /// Length of the encoded header in bytes.
    ///
    /// 2 (magic) + 1 (version) + 3 (type kind/size) + 3 (code kind/count) +
    /// 2 per code section + optionally 3 + 2 per container section +
    /// 3 (data kind/size) + 1 (terminator). Minimum 15 bytes.
    pub fn size(&self) -> usize {
        let optional_container_sizes = if self.container_sizes.is_empty() {
            0
        } else {
            3 + self.container_sizes.len() * 2
        };
        13 + self.code_sizes.len() * 2 + optional_container_sizes
    }

    /// Number of type entries the type section holds (whole entries only).
    pub fn types_count(&self) -> usize {
        self.types_size as usize / 4
    }

    /// Body size: types + code + containers + declared data.
    pub fn body_size(&self) -> usize {
        self.types_size as usize
            + self.sum_code_sizes
            + self.sum_container_sizes
            + self.data_size as usize
    }

    /// Size of the full container (header plus body).
    pub fn eof_size(&self) -> usize {
        self.size() + self.body_size()
    }

    /// Encodes the header into binary form.
    pub fn encode(&self, buffer: &mut Vec<u8>) {
        buffer.extend_from_slice(&EOF_MAGIC.to_be_bytes());
        buffer.push(EOF_VERSION);
        buffer.push(KIND_TYPES);
        buffer.extend_from_slice(&self.types_size.to_be_bytes());
        buffer.push(KIND_CODE);
        buffer.extend_from_slice(&(self.code_sizes.len() as u16).to_be_bytes());
        for size in &self.code_sizes {
            buffer.extend_from_slice(&size.to_be_bytes());
        }
        if !self.container_sizes.is_empty() {
            buffer.push(KIND_CONTAINER);
            buffer.extend_from_slice(&(self.container_sizes.len() as u16).to_be_bytes());
            for size in &self.container_sizes {
                buffer.extend_from_slice(&size.to_be_bytes());
            }
        }
        buffer.push(KIND_DATA);
        buffer.extend_from_slice(&self.data_size.to_be_bytes());
        buffer.push(KIND_TERMINATOR);
    }

    /// Decodes the header from binary form, returning it together with the
    /// input remainder (the body bytes).
    ///
    /// Purely structural: section ordering, field completeness and size
    /// bounds. Type-entry contents and the type/code count relationship are
    /// left to the semantic layer.
    pub fn decode(input: &[u8]) -> Result<(Self, &[u8]), ParseError> {
        let mut header = EofHeader::default();

        let (input, magic) = consume_u16(input).ok_or(ParseError::InvalidMagicOrVersion)?;
        if magic != EOF_MAGIC {
            return Err(ParseError::InvalidMagicOrVersion);
        }
        let (input, version) = consume_u8(input).ok_or(ParseError::InvalidMagicOrVersion)?;
        if version != EOF_VERSION {
            return Err(ParseError::InvalidMagicOrVersion);
        }

        let (input, kind_types) = consume_u8(input).ok_or(ParseError::MissingTypeHeader)?;
        if kind_types != KIND_TYPES {
            return Err(ParseError::MissingTypeHeader);
        }
        let (input, types_size) = consume_u16(input).ok_or(ParseError::IncompleteSectionSize)?;
        if types_size == 0 {
            return Err(ParseError::ZeroSectionSize);
        }
        header.types_size = types_size;

        let (input, kind_code) = consume_u8(input).ok_or(ParseError::MissingCodeHeader)?;
        if kind_code != KIND_CODE {
            return Err(ParseError::MissingCodeHeader);
        }
        let (input, code_sizes, sum_code_sizes) = consume_section_sizes(input)?;
        if code_sizes.len() > MAX_CODE_SECTIONS {
            return Err(ParseError::TooManyCodeSections);
        }
        header.code_sizes = code_sizes;
        header.sum_code_sizes = sum_code_sizes;

        let (input, kind_container_or_data) =
            consume_u8(input).ok_or(ParseError::MissingDataSection)?;
        let input = match kind_container_or_data {
            KIND_CONTAINER => {
                let (input, container_sizes, sum_container_sizes) =
                    consume_section_sizes(input)?;
                if container_sizes.len() > MAX_CONTAINER_SECTIONS {
                    return Err(ParseError::TooManyContainers);
                }
                header.container_sizes = container_sizes;
                header.sum_container_sizes = sum_container_sizes;
                let (input, kind_data) =
                    consume_u8(input).ok_or(ParseError::MissingDataSection)?;
                if kind_data != KIND_DATA {
                    return Err(ParseError::MissingDataSection);
                }
                input
            }
            KIND_DATA => input,
            _ => return Err(ParseError::MissingDataSection),
        };

        // Data size of zero is legal; the field itself must be present.
        let (input, data_size) =
            consume_u16(input).ok_or(ParseError::MissingHeadersTerminator)?;
        header.data_size = data_size;

        let (input, terminator) =
            consume_u8(input).ok_or(ParseError::MissingHeadersTerminator)?;
        if terminator != KIND_TERMINATOR {
            return Err(ParseError::MissingTerminator);
        }

        Ok((header, input))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::hex;

    #[test]
    fn sanity_header_decode() {
        let input = hex!("ef000101000402000100010400000000800000fe");
        let (header, body) = EofHeader::decode(&input).unwrap();
        assert_eq!(header.types_size, 4);
        assert_eq!(header.code_sizes, vec![1]);
        assert_eq!(header.container_sizes, Vec::<u16>::new());
        assert_eq!(header.data_size, 0);
        assert_eq!(header.size(), 15);
        assert_eq!(body.len(), 5);
    }

    #[test]
    fn header_with_containers() {
        let input = hex!("ef00010100040200010006030001001404000200");
        let (header, _) = EofHeader::decode(&input).unwrap();
        assert_eq!(header.container_sizes, vec![0x14]);
        assert_eq!(header.data_size, 2);
        assert_eq!(header.size(), 20);
    }

    #[test]
    fn magic_and_version() {
        assert_eq!(
            EofHeader::decode(&[]),
            Err(ParseError::InvalidMagicOrVersion)
        );
        assert_eq!(
            EofHeader::decode(&hex!("ef01")),
            Err(ParseError::InvalidMagicOrVersion)
        );
        assert_eq!(
            EofHeader::decode(&hex!("ef0002")),
            Err(ParseError::InvalidMagicOrVersion)
        );
    }

    #[test]
    fn truncation_points() {
        // After the version byte the type kind marker is required.
        assert_eq!(
            EofHeader::decode(&hex!("ef0001")),
            Err(ParseError::MissingTypeHeader)
        );
        // Type size cut mid-field.
        assert_eq!(
            EofHeader::decode(&hex!("ef00010100")),
            Err(ParseError::IncompleteSectionSize)
        );
        // Code count absent.
        assert_eq!(
            EofHeader::decode(&hex!("ef000101000402")),
            Err(ParseError::IncompleteSectionNumber)
        );
        // Code count cut mid-field.
        assert_eq!(
            EofHeader::decode(&hex!("ef00010100040200")),
            Err(ParseError::IncompleteSectionNumber)
        );
        // Declared one code size, none present.
        assert_eq!(
            EofHeader::decode(&hex!("ef0001010004020001")),
            Err(ParseError::IncompleteSectionSize)
        );
        // Data size absent after its kind marker.
        assert_eq!(
            EofHeader::decode(&hex!("ef0001010004020001000104")),
            Err(ParseError::MissingHeadersTerminator)
        );
        // Terminator byte absent.
        assert_eq!(
            EofHeader::decode(&hex!("ef00010100040200010001040000")),
            Err(ParseError::MissingHeadersTerminator)
        );
        // Terminator byte wrong.
        assert_eq!(
            EofHeader::decode(&hex!("ef0001010004020001000104000001")),
            Err(ParseError::MissingTerminator)
        );
    }

    #[test]
    fn kind_markers() {
        assert_eq!(
            EofHeader::decode(&hex!("ef000102")),
            Err(ParseError::MissingTypeHeader)
        );
        assert_eq!(
            EofHeader::decode(&hex!("ef000101000401")),
            Err(ParseError::MissingCodeHeader)
        );
        // After the code sizes only container (0x03) or data (0x04) may follow.
        assert_eq!(
            EofHeader::decode(&hex!("ef000101000402000100 0105")),
            Err(ParseError::MissingDataSection)
        );
    }

    #[test]
    fn zero_sizes() {
        assert_eq!(
            EofHeader::decode(&hex!("ef000101000002000100010400000000")),
            Err(ParseError::ZeroSectionSize)
        );
        assert_eq!(
            EofHeader::decode(&hex!("ef000101000402000100000400000000")),
            Err(ParseError::ZeroSectionSize)
        );
        // Zero code sections declared.
        assert_eq!(
            EofHeader::decode(&hex!("ef000101000402000004000000")),
            Err(ParseError::ZeroSectionSize)
        );
    }

    #[test]
    fn too_many_container_sections() {
        let mut input = hex!("ef000101000402000100010301 01").to_vec();
        for _ in 0..257 {
            input.extend_from_slice(&1u16.to_be_bytes());
        }
        input.extend_from_slice(&hex!("04000000"));
        assert_eq!(
            EofHeader::decode(&input),
            Err(ParseError::TooManyContainers)
        );
    }

    #[test]
    fn too_many_code_sections() {
        let mut input = hex!("ef0001011004 02 0401").to_vec();
        for _ in 0..1025 {
            input.extend_from_slice(&1u16.to_be_bytes());
        }
        input.extend_from_slice(&hex!("04000000"));
        assert_eq!(
            EofHeader::decode(&input),
            Err(ParseError::TooManyCodeSections)
        );
    }

    #[test]
    fn encode_round_trip() {
        let input = hex!("ef00010100040200010006030001001404000200");
        let (header, _) = EofHeader::decode(&input).unwrap();
        let mut buffer = Vec::new();
        header.encode(&mut buffer);
        assert_eq!(buffer, input);
    }
}
