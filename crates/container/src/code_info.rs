use std::vec::Vec;

/// Outputs value marking a non-returning code section.
const NON_RETURNING_FUNCTION: u8 = 0x80;

/// Type-section entry holding the stack contract of one code section.
///
/// Decoding only reads the fields; range rules (input/output limits, stack
/// height cap) belong to the semantic layer.
#[derive(Debug, Clone, Default, Hash, PartialEq, Eq, Copy, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CodeInfo {
    /// `inputs` - 1 byte - `0x00-0x7F`
    ///
    /// Number of stack elements the code section consumes.
    pub inputs: u8,
    /// `outputs` - 1 byte - `0x00-0x80`
    ///
    /// Number of stack elements the code section returns, or `0x80` for
    /// non-returning sections.
    pub outputs: u8,
    /// `max_stack_height` - 2 bytes - `0x0000-0x03FF`
    ///
    /// Absolute bound on the operand-stack height inside this section,
    /// inputs included.
    pub max_stack_height: u16,
}

impl CodeInfo {
    /// Returns a new entry with the given inputs, outputs and max stack height.
    pub fn new(inputs: u8, outputs: u8, max_stack_height: u16) -> Self {
        Self {
            inputs,
            outputs,
            max_stack_height,
        }
    }

    /// Returns a new non-returning entry.
    pub fn new_non_returning(inputs: u8, max_stack_height: u16) -> Self {
        Self::new(inputs, NON_RETURNING_FUNCTION, max_stack_height)
    }

    /// Returns `true` if the section never returns to its caller.
    pub fn is_non_returning(&self) -> bool {
        self.outputs == NON_RETURNING_FUNCTION
    }

    /// Difference between output and input stack elements.
    #[inline]
    pub const fn io_diff(&self) -> i32 {
        self.outputs as i32 - self.inputs as i32
    }

    /// Encodes the entry into the buffer.
    #[inline]
    pub fn encode(&self, buffer: &mut Vec<u8>) {
        buffer.push(self.inputs);
        buffer.push(self.outputs);
        buffer.extend_from_slice(&self.max_stack_height.to_be_bytes());
    }

    /// Decodes one 4-byte entry from the front of `input`.
    ///
    /// # Panics
    ///
    /// Panics if `input` is shorter than 4 bytes; the body decoder only
    /// calls this with a whole entry available.
    #[inline]
    pub(crate) fn decode(input: &[u8]) -> (Self, &[u8]) {
        let entry = Self {
            inputs: input[0],
            outputs: input[1],
            max_stack_height: u16::from_be_bytes([input[2], input[3]]),
        };
        (entry, &input[4..])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_decode() {
        let info = CodeInfo::new(2, 3, 0x0105);
        let mut buffer = Vec::new();
        info.encode(&mut buffer);
        assert_eq!(buffer, [0x02, 0x03, 0x01, 0x05]);
        let (decoded, rest) = CodeInfo::decode(&buffer);
        assert_eq!(decoded, info);
        assert!(rest.is_empty());
    }

    #[test]
    fn non_returning() {
        assert!(CodeInfo::new_non_returning(0, 0).is_non_returning());
        assert!(!CodeInfo::new(0, 0x7f, 0).is_non_returning());
    }
}
