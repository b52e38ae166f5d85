use core::fmt;

/// Structural (parse-layer) errors.
///
/// These are raised while decoding the header and slicing the body, before
/// any semantic rule is evaluated, and always take precedence over the
/// validation-layer errors of the validator crate.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParseError {
    /// Input does not start with `0xEF00` followed by a supported version.
    InvalidMagicOrVersion,
    /// Header ended in the middle of a section-count field.
    IncompleteSectionNumber,
    /// Header ended in the middle of a section-size field.
    IncompleteSectionSize,
    /// A Type, Code or Container section (or section count) was declared with size zero.
    ZeroSectionSize,
    /// The Type-section kind marker is absent or out of order.
    MissingTypeHeader,
    /// The Code-section kind marker is absent or out of order.
    MissingCodeHeader,
    /// The Data-section kind marker is absent or out of order.
    MissingDataSection,
    /// Header ended before the data size and terminator byte.
    MissingHeadersTerminator,
    /// The byte after the header table is not the `0x00` terminator.
    MissingTerminator,
    /// More than 1024 code sections declared.
    TooManyCodeSections,
    /// More than 256 container sections declared.
    TooManyContainers,
    /// Body bytes do not match the header declarations (short non-data body
    /// or trailing bytes past the declared end).
    InvalidSectionBodiesSize,
    /// The outermost container's Data section is shorter than declared where
    /// full data is required.
    TopLevelContainerTruncated,
    /// Raw container is larger than the size cap.
    ContainerSizeAboveLimit,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::InvalidMagicOrVersion => "Invalid EOF magic or version",
            Self::IncompleteSectionNumber => "Truncated section-count field",
            Self::IncompleteSectionSize => "Truncated section-size field",
            Self::ZeroSectionSize => "Declared section size is zero",
            Self::MissingTypeHeader => "Missing type section header",
            Self::MissingCodeHeader => "Missing code section header",
            Self::MissingDataSection => "Missing data section header",
            Self::MissingHeadersTerminator => "Header ends before its terminator",
            Self::MissingTerminator => "Missing header terminator byte",
            Self::TooManyCodeSections => "Too many code sections",
            Self::TooManyContainers => "Too many container sections",
            Self::InvalidSectionBodiesSize => "Body size does not match header",
            Self::TopLevelContainerTruncated => "Top level container is truncated",
            Self::ContainerSizeAboveLimit => "Container size is above the limit",
        };
        f.write_str(s)
    }
}

impl core::error::Error for ParseError {}
