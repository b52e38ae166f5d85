use super::{CodeInfo, Eof, EofHeader, ParseError};
use alloy_primitives::Bytes;
use std::vec::Vec;

/// EOF container body.
///
/// Sections are sliced out of the raw container bytes; code sections share a
/// single [`Bytes`] to keep slicing cheap.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EofBody {
    /// Type-section entries, one per code section when well formed.
    pub code_info: Vec<CodeInfo>,
    /// End offset of each code section inside [`Self::code`].
    pub code_section: Vec<usize>,
    /// All code sections concatenated.
    pub code: Bytes,
    /// Sub-container sections, raw and undecoded.
    pub container_section: Vec<Bytes>,
    /// Data section bytes actually present.
    pub data_section: Bytes,
    /// Whether the data section carries all of its declared bytes.
    pub is_data_filled: bool,
}

impl EofBody {
    /// Returns the code section at `index`, if any.
    pub fn code(&self, index: usize) -> Option<Bytes> {
        if index == 0 {
            self.code_section
                .first()
                .map(|end| self.code.slice(..*end))
        } else {
            self.code_section
                .get(index)
                .map(|end| self.code.slice(self.code_section[index - 1]..*end))
        }
    }

    /// Offset of the given code section inside the full container bytes.
    pub fn eof_code_section_start(&self, header: &EofHeader, index: usize) -> Option<usize> {
        let code_start = header.size() + header.types_size as usize;
        if index == 0 {
            (!self.code_section.is_empty()).then_some(code_start)
        } else {
            self.code_section
                .get(index - 1)
                .map(|end| code_start + end)
        }
    }

    /// Consumes the body and builds a full container around it, re-deriving
    /// the header from the section contents.
    pub fn into_eof(self) -> Eof {
        let mut code_sizes = Vec::with_capacity(self.code_section.len());
        let mut sum_code_sizes = 0;
        let mut prev = 0;
        for end in &self.code_section {
            code_sizes.push((end - prev) as u16);
            sum_code_sizes += end - prev;
            prev = *end;
        }
        let mut container_sizes = Vec::with_capacity(self.container_section.len());
        let mut sum_container_sizes = 0;
        for container in &self.container_section {
            container_sizes.push(container.len() as u16);
            sum_container_sizes += container.len();
        }
        let header = EofHeader {
            types_size: (self.code_info.len() * 4) as u16,
            code_sizes,
            container_sizes,
            data_size: self.data_section.len() as u16,
            sum_code_sizes,
            sum_container_sizes,
        };
        let mut buffer = Vec::with_capacity(header.eof_size());
        header.encode(&mut buffer);
        self.encode(&mut buffer);
        Eof {
            header,
            body: self,
            raw: buffer.into(),
        }
    }

    /// Encodes the body into the buffer.
    pub fn encode(&self, buffer: &mut Vec<u8>) {
        for info in &self.code_info {
            info.encode(buffer);
        }
        buffer.extend_from_slice(&self.code);
        for container in &self.container_section {
            buffer.extend_from_slice(container);
        }
        buffer.extend_from_slice(&self.data_section);
    }

    /// Slices the body out of the full container bytes per the decoded header.
    ///
    /// Everything before the data section must be fully present; the data
    /// section alone may fall short of its declared size. Bytes past the
    /// declared end are rejected. Type entries are read four bytes at a
    /// time; a trailing partial entry is left to the semantic layer to
    /// reject via the type-size rules.
    pub fn decode(input: &Bytes, header: &EofHeader) -> Result<Self, ParseError> {
        let header_len = header.size();
        let partial_body_len =
            header_len + header.types_size as usize + header.sum_code_sizes + header.sum_container_sizes;
        let full_body_len = partial_body_len + header.data_size as usize;

        if input.len() < partial_body_len {
            return Err(ParseError::InvalidSectionBodiesSize);
        }
        if input.len() > full_body_len {
            return Err(ParseError::InvalidSectionBodiesSize);
        }

        let mut body = EofBody::default();

        let mut types_input = &input[header_len..header_len + header.types_size as usize];
        while types_input.len() >= 4 {
            let (info, rest) = CodeInfo::decode(types_input);
            body.code_info.push(info);
            types_input = rest;
        }

        let mut start = header_len + header.types_size as usize;
        let mut code_end = 0;
        for size in &header.code_sizes {
            code_end += *size as usize;
            body.code_section.push(code_end);
        }
        body.code = input.slice(start..start + header.sum_code_sizes);
        start += header.sum_code_sizes;

        for size in &header.container_sizes {
            body.container_section
                .push(input.slice(start..start + *size as usize));
            start += *size as usize;
        }

        body.data_section = input.slice(start..);
        body.is_data_filled = body.data_section.len() == header.data_size as usize;

        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::bytes;

    #[test]
    fn body_round_trip() {
        let bytes = bytes!("ef00010100040200010006030001001404000200 00800002 6000e0000000 ef000101000402000100010400000000800000fe 0102");
        let (header, _) = EofHeader::decode(&bytes).unwrap();
        let body = EofBody::decode(&bytes, &header).unwrap();
        assert_eq!(body.code_info.len(), 1);
        assert_eq!(body.code(0).unwrap(), bytes!("6000e0000000"));
        assert_eq!(body.container_section.len(), 1);
        assert_eq!(body.container_section[0].len(), 0x14);
        assert_eq!(body.data_section, bytes!("0102"));
        assert!(body.is_data_filled);

        let mut buffer = Vec::new();
        header.encode(&mut buffer);
        body.encode(&mut buffer);
        assert_eq!(Bytes::from(buffer), bytes);
    }

    #[test]
    fn code_section_slicing() {
        let bytes = bytes!("ef00010100080200020003000104000000 00800001 00800000 600100 00");
        let (header, _) = EofHeader::decode(&bytes).unwrap();
        let body = EofBody::decode(&bytes, &header).unwrap();
        assert_eq!(body.code(0).unwrap(), bytes!("600100"));
        assert_eq!(body.code(1).unwrap(), bytes!("00"));
        assert_eq!(body.code(2), None);
        assert_eq!(body.eof_code_section_start(&header, 0), Some(header.size() + 8));
        assert_eq!(body.eof_code_section_start(&header, 1), Some(header.size() + 8 + 3));
    }

    #[test]
    fn short_non_data_body() {
        // Code section declared as four bytes, only two present.
        let bytes = bytes!("ef000101000402000100040400000000800000e000");
        let (header, _) = EofHeader::decode(&bytes).unwrap();
        assert_eq!(
            EofBody::decode(&bytes, &header),
            Err(ParseError::InvalidSectionBodiesSize)
        );
    }

    #[test]
    fn into_eof_rebuilds_header() {
        let body = EofBody {
            code_info: vec![CodeInfo::new(0, 0x80, 0)],
            code_section: vec![1],
            code: bytes!("fe"),
            container_section: vec![bytes!("aabb")],
            data_section: bytes!("cc"),
            is_data_filled: true,
        };
        let eof = body.into_eof();
        assert_eq!(eof.header.code_sizes, vec![1]);
        assert_eq!(eof.header.container_sizes, vec![2]);
        assert_eq!(eof.header.data_size, 1);
        assert_eq!(Eof::decode(eof.raw.clone()).unwrap(), eof);
    }
}
