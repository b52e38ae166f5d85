use container::ParseError;
use core::fmt;

/// Any error a container can be rejected with.
///
/// The two layers are disjoint: a structurally broken container never reaches
/// semantic validation, so a given input maps to exactly one leaf code.
#[derive(Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EofError {
    /// Structural error raised while decoding.
    Parse(ParseError),
    /// Semantic error raised while validating a decoded container.
    Validation(ValidationError),
}

impl From<ParseError> for EofError {
    fn from(err: ParseError) -> Self {
        EofError::Parse(err)
    }
}

impl From<ValidationError> for EofError {
    fn from(err: ValidationError) -> Self {
        EofError::Validation(err)
    }
}

impl fmt::Display for EofError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EofError::Parse(e) => write!(f, "Container parse error: {e}"),
            EofError::Validation(e) => write!(f, "Container validation error: {e}"),
        }
    }
}

impl core::error::Error for EofError {}

/// Semantic validation errors.
///
/// A closed set; every rejection carries the leaf code of the first rule the
/// deterministic validation order finds violated.
#[derive(Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ValidationError {
    /// Opcode undefined in the table or disabled inside EOF.
    UndefinedInstruction,
    /// Code ends inside an instruction's immediate bytes (fixed-size or
    /// RJUMPV table).
    TruncatedInstruction,
    /// Instruction after a terminator is not the target of any forward jump.
    UnreachableInstruction,
    /// Code section does not end on a terminating instruction.
    MissingStopOpcode,
    /// Relative-jump target is out of bounds or lands on immediate bytes.
    InvalidRjumpDestination,
    /// An instruction needs more stack items than every path can guarantee.
    StackUnderflow,
    /// Stack height can exceed the 1024-item limit.
    StackOverflow,
    /// Backward-jump target recorded a different stack-height interval.
    StackHeightMismatch,
    /// RETF (or JUMPF to a returning section) with more items on the stack
    /// than the declared outputs.
    StackHigherThanOutputs,
    /// CALLF or JUMPF target section index is out of range.
    InvalidCodeSectionIndex,
    /// CALLF targets a non-returning section.
    CallfToNonReturning,
    /// JUMPF target section declares more outputs than this section has.
    JumpfIncompatibleOutputs,
    /// DATALOADN immediate reads past the declared data section.
    InvalidDataloadnIndex,
    /// EOFCREATE or RETURNCONTRACT container index is out of range.
    InvalidContainerSectionIndex,
    /// STOP/RETURN in initcode, RETURNCONTRACT in runtime code, or a
    /// sub-container referenced in both modes.
    IncompatibleContainerKind,
    /// EOFCREATE targets a sub-container whose data section is truncated.
    EofCreateWithTruncatedContainer,
    /// Type-section size is not a multiple of 4 or its entry count does not
    /// match the number of code sections.
    InvalidTypeSectionSize,
    /// First type entry is not `(0, non-returning)`.
    InvalidFirstSectionType,
    /// Type entry with inputs above `0x7F` or outputs above `0x7F` that are
    /// not the non-returning sentinel.
    InputsOutputsNumAboveLimit,
    /// Declared max stack height above `0x03FF`.
    MaxStackHeightAboveLimit,
    /// A section returns while declared non-returning, or never returns
    /// while declared returning.
    InvalidNonReturningFlag,
    /// Computed max stack height differs from the declared one.
    InvalidMaxStackHeight,
    /// A code section is not reachable through CALLF/JUMPF from section 0.
    UnreachableCodeSection,
    /// A sub-container is referenced by no EOFCREATE or RETURNCONTRACT.
    UnreachableSubContainer,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::UndefinedInstruction => "Undefined instruction",
            Self::TruncatedInstruction => "Truncated instruction immediates",
            Self::UnreachableInstruction => "Instruction is not forward-reachable",
            Self::MissingStopOpcode => "Code section does not end on a terminator",
            Self::InvalidRjumpDestination => "Invalid relative jump destination",
            Self::StackUnderflow => "Stack requirement is above smallest stack items",
            Self::StackOverflow => "Stack can grow above its limit",
            Self::StackHeightMismatch => "Backward jump has a different stack height",
            Self::StackHigherThanOutputs => "Stack is higher than declared outputs",
            Self::InvalidCodeSectionIndex => "Code section index is out of bounds",
            Self::CallfToNonReturning => "CALLF to a non-returning section",
            Self::JumpfIncompatibleOutputs => "JUMPF target declares too many outputs",
            Self::InvalidDataloadnIndex => "DATALOADN reads past the data section",
            Self::InvalidContainerSectionIndex => "Container section index is out of bounds",
            Self::IncompatibleContainerKind => "Incompatible container kind",
            Self::EofCreateWithTruncatedContainer => {
                "EOFCREATE target has a truncated data section"
            }
            Self::InvalidTypeSectionSize => "Invalid type section size",
            Self::InvalidFirstSectionType => "Invalid first type entry",
            Self::InputsOutputsNumAboveLimit => "Type entry inputs or outputs above limit",
            Self::MaxStackHeightAboveLimit => "Declared max stack height above limit",
            Self::InvalidNonReturningFlag => "Non-returning flag does not match the code",
            Self::InvalidMaxStackHeight => "Max stack height mismatches",
            Self::UnreachableCodeSection => "Code section was not accessed",
            Self::UnreachableSubContainer => "Sub container was not accessed",
        };
        f.write_str(s)
    }
}

impl core::error::Error for ValidationError {}
