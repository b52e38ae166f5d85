//! Cross-validation of the type section against the code sections.

use crate::ValidationError;
use container::Eof;

/// Highest legal inputs value for a type entry.
const MAX_INPUTS: u8 = 0x7F;
/// Highest legal outputs value for a returning section; `0x80` marks a
/// non-returning one.
const MAX_OUTPUTS: u8 = 0x7F;
/// Highest legal declared stack height.
const MAX_STACK_HEIGHT: u16 = 0x03FF;

/// Checks the type section as a whole against the code sections.
///
/// Runs before any code section is interpreted: the stack-height pass
/// trusts every type entry it reads.
pub fn cross_validate_types(eof: &Eof) -> Result<(), ValidationError> {
    if eof.header.types_size % 4 != 0 {
        return Err(ValidationError::InvalidTypeSectionSize);
    }
    if eof.header.types_count() != eof.body.code_section.len() {
        return Err(ValidationError::InvalidTypeSectionSize);
    }

    // The first section is the container entry point: no inputs, and nothing
    // to return to.
    let Some(first) = eof.body.code_info.first() else {
        return Err(ValidationError::InvalidTypeSectionSize);
    };
    if first.inputs != 0 || !first.is_non_returning() {
        return Err(ValidationError::InvalidFirstSectionType);
    }

    for info in &eof.body.code_info {
        if info.inputs > MAX_INPUTS {
            return Err(ValidationError::InputsOutputsNumAboveLimit);
        }
        if info.outputs > MAX_OUTPUTS && !info.is_non_returning() {
            return Err(ValidationError::InputsOutputsNumAboveLimit);
        }
        if info.max_stack_height > MAX_STACK_HEIGHT {
            return Err(ValidationError::MaxStackHeightAboveLimit);
        }
    }

    Ok(())
}
