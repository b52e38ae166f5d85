//! Stack-height interpretation of code sections and container orchestration.

use crate::{
    cross_validate_types,
    opcode::{self, OPCODE_INFO},
    utils::{read_i16, read_u16},
    EofError, ValidationError,
};
use container::{CodeInfo, Eof, ParseError, MAX_CONTAINER_SIZE, STACK_LIMIT};

use core::{convert::identity, fmt, mem};
use std::{borrow::Cow, vec, vec::Vec};

/// The mode a container is meant to run in.
///
/// A container cannot mix RETURNCONTRACT with RETURN/STOP opcodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ContainerKind {
    /// Deployed code: may STOP or RETURN, never RETURNCONTRACT.
    Runtime,
    /// Deployment code: must end in RETURNCONTRACT, never STOP or RETURN.
    Initcode,
}

impl ContainerKind {
    /// Returns `true` if the kind is [`Initcode`][ContainerKind::Initcode].
    pub fn is_initcode(&self) -> bool {
        matches!(self, ContainerKind::Initcode)
    }
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ContainerKind::Runtime => "runtime",
            ContainerKind::Initcode => "initcode",
        })
    }
}

/// Validation policy knobs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ValidationConfig {
    /// Rejects a top-level runtime container whose data section is shorter
    /// than declared. Truncated data reads as zero-filled at run time, so
    /// the default is to accept it; initcode is always rejected.
    pub reject_truncated_data: bool,
}

/// Decodes `raw` and fully validates it, nested sub-containers included.
pub fn validate_raw(raw: container::Bytes, kind: ContainerKind) -> Result<Eof, EofError> {
    validate_raw_with_config(raw, kind, &ValidationConfig::default())
}

/// Decodes `raw` and fully validates it under the given policy.
#[inline]
pub fn validate_raw_with_config(
    raw: container::Bytes,
    kind: ContainerKind,
    config: &ValidationConfig,
) -> Result<Eof, EofError> {
    if raw.len() > MAX_CONTAINER_SIZE {
        return Err(ParseError::ContainerSizeAboveLimit.into());
    }
    let eof = Eof::decode(raw)?;
    if !eof.body.is_data_filled && (kind.is_initcode() || config.reject_truncated_data) {
        return Err(ParseError::TopLevelContainerTruncated.into());
    }
    validate_container(&eof, Some(kind))?;
    Ok(eof)
}

/// Validates a decoded container and every sub-container reachable from it.
///
/// `kind` of `None` lets the first STOP/RETURN or RETURNCONTRACT decide the
/// mode; sub-containers always inherit the mode their reference implies.
pub fn validate_container(eof: &Eof, kind: Option<ContainerKind>) -> Result<(), EofError> {
    let mut stack = Vec::with_capacity(4);
    stack.push((Cow::Borrowed(eof), kind));

    while let Some((eof, kind)) = stack.pop() {
        let subcontainer_kinds = validate_codes(&eof, kind)?;
        for (container, kind) in eof
            .body
            .container_section
            .iter()
            .zip(subcontainer_kinds.into_iter())
        {
            let sub = Eof::decode(container.clone())?;
            // An initcode sub-container is hashed whole by EOFCREATE, so its
            // data must be complete. A runtime one gets aux data appended at
            // deploy time and may be short.
            if kind.is_initcode() && !sub.body.is_data_filled {
                return Err(ValidationError::EofCreateWithTruncatedContainer.into());
            }
            stack.push((Cow::Owned(sub), Some(kind)));
        }
    }

    Ok(())
}

/// Validates the type and code sections of a single container, without
/// recursing into sub-containers.
///
/// Returns the kind each sub-container is referenced as.
#[inline]
pub fn validate_codes(
    eof: &Eof,
    kind: Option<ContainerKind>,
) -> Result<Vec<ContainerKind>, ValidationError> {
    cross_validate_types(eof)?;

    let mut tracker = AccessTracker::new(
        kind,
        eof.body.code_section.len(),
        eof.body.container_section.len(),
    );

    while let Some(index) = tracker.processing_stack.pop() {
        // The tracker only holds indexes checked against the type section.
        let code = eof.body.code(index).unwrap();
        validate_code(
            &code,
            eof.header.data_size as usize,
            index,
            eof.body.container_section.len(),
            &eof.body.code_info,
            &mut tracker,
        )?;
    }

    if !tracker.codes.into_iter().all(identity) {
        return Err(ValidationError::UnreachableCodeSection);
    }
    if !tracker.subcontainers.iter().all(|kind| kind.is_some()) {
        return Err(ValidationError::UnreachableSubContainer);
    }

    Ok(tracker
        .subcontainers
        .into_iter()
        .map(|kind| kind.unwrap())
        .collect())
}

/// Section and sub-container reachability, worked off as a stack.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccessTracker {
    /// The kind of the container being validated. Deduced on the first
    /// kind-constraining opcode when seeded with `None`.
    pub this_kind: Option<ContainerKind>,
    /// Which code sections have been reached.
    pub codes: Vec<bool>,
    /// Sections reached but not yet validated.
    pub processing_stack: Vec<usize>,
    /// The kind each sub-container is referenced as; `None` when unreferenced.
    /// An EOFCREATE reference demands initcode, a RETURNCONTRACT reference
    /// demands runtime code.
    pub subcontainers: Vec<Option<ContainerKind>>,
}

impl AccessTracker {
    /// Creates a new instance with section 0 marked reached and queued.
    ///
    /// # Panics
    ///
    /// Panics if `codes_size` is zero.
    pub fn new(
        this_kind: Option<ContainerKind>,
        codes_size: usize,
        subcontainers_size: usize,
    ) -> Self {
        assert!(codes_size != 0, "container has no code sections");
        let mut this = Self {
            this_kind,
            codes: vec![false; codes_size],
            processing_stack: Vec::with_capacity(4),
            subcontainers: vec![None; subcontainers_size],
        };
        this.codes[0] = true;
        this.processing_stack.push(0);
        this
    }

    /// Marks a code section as reached, queueing it on first sight.
    ///
    /// # Panics
    ///
    /// Panics if the index is out of bounds.
    pub fn access_code(&mut self, index: usize) {
        let was_accessed = mem::replace(&mut self.codes[index], true);
        if !was_accessed {
            self.processing_stack.push(index);
        }
    }

    /// Records the kind a sub-container is referenced as, rejecting a second
    /// reference in the other mode.
    ///
    /// # Panics
    ///
    /// Panics if the index is out of bounds.
    fn set_subcontainer_kind(
        &mut self,
        index: usize,
        new_kind: ContainerKind,
    ) -> Result<(), ValidationError> {
        let slot = &mut self.subcontainers[index];

        let Some(kind) = slot else {
            *slot = Some(new_kind);
            return Ok(());
        };

        if *kind != new_kind {
            return Err(ValidationError::IncompatibleContainerKind);
        }
        Ok(())
    }
}

/// Validates one code section in a single forward pass:
/// * Every instruction is defined, enabled and has its immediates.
/// * Every relative jump lands on an instruction boundary.
/// * Stack heights are consistent along all paths and match the declared
///   type entry.
/// * The section ends on a terminating instruction.
///
/// Marks CALLF/JUMPF targets and referenced sub-containers in the tracker.
pub fn validate_code(
    code: &[u8],
    data_size: usize,
    this_section: usize,
    num_of_containers: usize,
    types: &[CodeInfo],
    tracker: &mut AccessTracker,
) -> Result<(), ValidationError> {
    let this_types = &types[this_section];

    #[derive(Debug, Copy, Clone)]
    struct InstructionInfo {
        /// Is immediate byte, jumps can't happen on this part of code.
        is_immediate: bool,
        /// Has a forward jump to this opcode. Used to check if an opcode
        /// after a terminator is reached.
        is_jumpdest: bool,
        /// Smallest stack height this instruction is entered with.
        smallest: i32,
        /// Biggest stack height this instruction is entered with.
        biggest: i32,
    }

    impl InstructionInfo {
        #[inline]
        fn mark_as_immediate(&mut self) -> Result<(), ValidationError> {
            if self.is_jumpdest {
                // A previous jump already targets this byte.
                return Err(ValidationError::InvalidRjumpDestination);
            }
            self.is_immediate = true;
            Ok(())
        }
    }

    impl Default for InstructionInfo {
        fn default() -> Self {
            Self {
                is_immediate: false,
                is_jumpdest: false,
                smallest: i32::MAX,
                biggest: i32::MIN,
            }
        }
    }

    // One slot per code byte.
    let mut jumps = vec![InstructionInfo::default(); code.len()];
    let mut is_after_termination = false;

    // Heights are absolute: the section is entered with its inputs on the stack.
    let mut next_smallest = this_types.inputs as i32;
    let mut next_biggest = this_types.inputs as i32;

    let mut is_returning = false;

    let mut i = 0;
    // Validity, jump destinations and stack heights in one pass.
    while i < code.len() {
        let op = code[i];
        let Some(opcode) = &OPCODE_INFO[op as usize] else {
            return Err(ValidationError::UndefinedInstruction);
        };

        if opcode.is_disabled_in_eof() {
            return Err(ValidationError::UndefinedInstruction);
        }

        let this_instruction = &mut jumps[i];

        // Merge the fall-through edge, unless the previous instruction
        // terminated and this one is only reachable by jump.
        if !is_after_termination {
            this_instruction.smallest = core::cmp::min(this_instruction.smallest, next_smallest);
            this_instruction.biggest = core::cmp::max(this_instruction.biggest, next_biggest);
        }

        let this_instruction = *this_instruction;

        // Opcodes after a terminator must be targets of a forward jump.
        if is_after_termination && !this_instruction.is_jumpdest {
            return Err(ValidationError::UnreachableInstruction);
        }
        is_after_termination = opcode.is_terminating();

        // Mark immediates as non-jumpable. The RJUMPV table is handled below.
        if opcode.immediate_size() != 0 {
            if i + opcode.immediate_size() as usize >= code.len() {
                return Err(ValidationError::TruncatedInstruction);
            }

            for imm in 1..opcode.immediate_size() as usize + 1 {
                jumps[i + imm].mark_as_immediate()?;
            }
        }
        // Height change this opcode applies to the next instruction.
        let mut stack_io_diff = opcode.io_diff() as i32;
        // How many stack items this opcode needs on entry.
        let mut stack_requirement = opcode.inputs() as i32;
        // Additional immediate bytes for RJUMPV, it has a dynamic table.
        let mut rjumpv_additional_immediates = 0;
        // Absolute targets of RJUMP/RJUMPI/RJUMPV.
        let mut absolute_jumpdest = vec![];
        match op {
            opcode::RJUMP | opcode::RJUMPI => {
                let offset = read_i16(&code[i + 1..]) as isize;
                absolute_jumpdest = vec![offset + 3 + i as isize];
                // RJUMPI keeps its fall-through edge; for RJUMP the
                // terminating flag already cuts it off.
            }
            opcode::RJUMPV => {
                // The max_index byte is covered by the immediate size check.
                let max_index = code[i + 1] as usize;
                let len = max_index + 1;
                rjumpv_additional_immediates = len * 2;

                // +1 is for the max_index byte.
                if i + 1 + rjumpv_additional_immediates >= code.len() {
                    return Err(ValidationError::TruncatedInstruction);
                }

                for imm in 0..rjumpv_additional_immediates {
                    jumps[i + 2 + imm].mark_as_immediate()?;
                }

                let mut targets = Vec::with_capacity(len);
                for entry in 0..len {
                    let offset = read_i16(&code[i + 2 + 2 * entry..]) as isize;
                    targets.push(offset + i as isize + 2 + rjumpv_additional_immediates as isize);
                }
                absolute_jumpdest = targets;
            }
            opcode::CALLF => {
                let section = read_u16(&code[i + 1..]) as usize;
                let Some(target_types) = types.get(section) else {
                    return Err(ValidationError::InvalidCodeSectionIndex);
                };

                if target_types.is_non_returning() {
                    return Err(ValidationError::CallfToNonReturning);
                }
                // The call transfers the callee inputs and gets its outputs back.
                stack_requirement = target_types.inputs as i32;
                stack_io_diff = target_types.io_diff();
                tracker.access_code(section);

                // The callee reaches its own max height on top of what this
                // section leaves below the transferred inputs.
                if this_instruction.biggest - stack_requirement
                    + target_types.max_stack_height as i32
                    > STACK_LIMIT as i32
                {
                    return Err(ValidationError::StackOverflow);
                }
            }
            opcode::JUMPF => {
                let target_section = read_u16(&code[i + 1..]) as usize;
                let Some(target_types) = types.get(target_section) else {
                    return Err(ValidationError::InvalidCodeSectionIndex);
                };

                if this_instruction.biggest - target_types.inputs as i32
                    + target_types.max_stack_height as i32
                    > STACK_LIMIT as i32
                {
                    return Err(ValidationError::StackOverflow);
                }
                tracker.access_code(target_section);

                if target_types.is_non_returning() {
                    stack_requirement = target_types.inputs as i32;
                } else {
                    is_returning = true;
                    // The target returns on this section's behalf.
                    if this_types.outputs < target_types.outputs {
                        return Err(ValidationError::JumpfIncompatibleOutputs);
                    }

                    stack_requirement = this_types.outputs as i32 + target_types.inputs as i32
                        - target_types.outputs as i32;

                    if this_instruction.biggest > stack_requirement {
                        return Err(ValidationError::StackHigherThanOutputs);
                    }
                }
            }
            opcode::EOFCREATE => {
                let index = code[i + 1] as usize;
                if index >= num_of_containers {
                    return Err(ValidationError::InvalidContainerSectionIndex);
                }
                tracker.set_subcontainer_kind(index, ContainerKind::Initcode)?;
            }
            opcode::RETURNCONTRACT => {
                let index = code[i + 1] as usize;
                if index >= num_of_containers {
                    return Err(ValidationError::InvalidContainerSectionIndex);
                }
                if *tracker
                    .this_kind
                    .get_or_insert(ContainerKind::Initcode)
                    != ContainerKind::Initcode
                {
                    return Err(ValidationError::IncompatibleContainerKind);
                }
                tracker.set_subcontainer_kind(index, ContainerKind::Runtime)?;
            }
            opcode::RETURN | opcode::STOP => {
                if *tracker
                    .this_kind
                    .get_or_insert(ContainerKind::Runtime)
                    != ContainerKind::Runtime
                {
                    return Err(ValidationError::IncompatibleContainerKind);
                }
            }
            opcode::DATALOADN => {
                let index = read_u16(&code[i + 1..]) as isize;
                if data_size < 32 || index > data_size as isize - 32 {
                    // The 32-byte read must stay inside the declared data.
                    return Err(ValidationError::InvalidDataloadnIndex);
                }
            }
            opcode::RETF => {
                stack_requirement = this_types.outputs as i32;
                is_returning = true;

                if this_instruction.biggest > stack_requirement {
                    return Err(ValidationError::StackHigherThanOutputs);
                }
            }
            opcode::DUPN => {
                stack_requirement = code[i + 1] as i32 + 1;
            }
            opcode::SWAPN => {
                stack_requirement = code[i + 1] as i32 + 2;
            }
            opcode::EXCHANGE => {
                let imm = code[i + 1];
                let n = (imm >> 4) + 1;
                let m = (imm & 0x0F) + 1;
                stack_requirement = n as i32 + m as i32 + 1;
            }
            _ => {}
        }
        // Even the lowest path must carry the required items.
        if stack_requirement > this_instruction.smallest {
            return Err(ValidationError::StackUnderflow);
        }

        next_smallest = this_instruction.smallest + stack_io_diff;
        next_biggest = this_instruction.biggest + stack_io_diff;

        // Check jump destinations and mark forward edges.
        for absolute_jump in absolute_jumpdest {
            if absolute_jump < 0 || absolute_jump >= code.len() as isize {
                return Err(ValidationError::InvalidRjumpDestination);
            }
            // Fine to cast as bounds are checked.
            let absolute_jump = absolute_jump as usize;

            let target_jump = &mut jumps[absolute_jump];
            if target_jump.is_immediate {
                return Err(ValidationError::InvalidRjumpDestination);
            }

            // Needed to mark forward jumps. It does nothing for backward jumps.
            target_jump.is_jumpdest = true;

            if absolute_jump <= i {
                // A backward edge must find exactly the interval it brings,
                // otherwise a second pass could widen it further.
                if target_jump.biggest != next_biggest
                    || target_jump.smallest != next_smallest
                {
                    return Err(ValidationError::StackHeightMismatch);
                }
            } else {
                // Forward edges widen the recorded interval.
                target_jump.smallest = core::cmp::min(target_jump.smallest, next_smallest);
                target_jump.biggest = core::cmp::max(target_jump.biggest, next_biggest);
            }
        }

        // Additional immediates are the RJUMPV table.
        i += 1 + opcode.immediate_size() as usize + rjumpv_additional_immediates;
    }

    // Either the section returns and is declared returning, or neither.
    if is_returning == this_types.is_non_returning() {
        return Err(ValidationError::InvalidNonReturningFlag);
    }

    // Control may not run off the end of the section.
    if !is_after_termination {
        return Err(ValidationError::MissingStopOpcode);
    }

    let mut max_stack_height = this_types.inputs as i32;
    for instruction in jumps {
        max_stack_height = core::cmp::max(max_stack_height, instruction.biggest);
    }

    if max_stack_height != this_types.max_stack_height as i32 {
        return Err(ValidationError::InvalidMaxStackHeight);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::hex;

    fn validate(raw: &[u8], kind: ContainerKind) -> Result<Eof, EofError> {
        validate_raw(raw.to_vec().into(), kind)
    }

    #[test]
    fn minimal_valid_containers() {
        // INVALID.
        assert!(validate(
            &hex!("ef000101000402000100010400000000800000fe"),
            ContainerKind::Runtime
        )
        .is_ok());

        // RJUMP 0 over nothing into STOP.
        assert!(validate(
            &hex!("ef000101000402000100040400000000800000e0000000"),
            ContainerKind::Runtime
        )
        .is_ok());
    }

    #[test]
    fn stop_decides_the_kind() {
        let raw = hex!("ef000101000402000100040400000000800000e0000000");
        assert_eq!(
            validate(&raw, ContainerKind::Initcode),
            Err(EofError::Validation(
                ValidationError::IncompatibleContainerKind
            ))
        );
    }

    #[test]
    fn rjump_into_own_immediate() {
        let raw = hex!("ef000101000402000100030400000000800000e0ffff");
        assert_eq!(
            validate(&raw, ContainerKind::Runtime),
            Err(EofError::Validation(
                ValidationError::InvalidRjumpDestination
            ))
        );
    }

    #[test]
    fn undefined_and_disabled_instructions() {
        let raw = hex!("ef000101000402000100010400000000800000ef");
        assert_eq!(
            validate(&raw, ContainerKind::Runtime),
            Err(EofError::Validation(ValidationError::UndefinedInstruction))
        );

        // SELFDESTRUCT exists but is disabled inside EOF.
        let raw = hex!("ef000101000402000100010400000000800000ff");
        assert_eq!(
            validate(&raw, ContainerKind::Runtime),
            Err(EofError::Validation(ValidationError::UndefinedInstruction))
        );
    }

    #[test]
    fn truncated_immediates() {
        let raw = hex!("ef00010100040200010001040000000080000060");
        assert_eq!(
            validate(&raw, ContainerKind::Runtime),
            Err(EofError::Validation(ValidationError::TruncatedInstruction))
        );

        // RJUMPV with max_index 1 needs a four-byte table, two are present.
        let raw = hex!("ef0001010004020001000604000000008000015fe201000000");
        assert_eq!(
            validate(&raw, ContainerKind::Runtime),
            Err(EofError::Validation(ValidationError::TruncatedInstruction))
        );
    }

    #[test]
    fn rjumpv_single_target() {
        let raw = hex!("ef0001010004020001000604000000008000015fe200000000");
        assert!(validate(&raw, ContainerKind::Runtime).is_ok());
    }

    #[test]
    fn code_must_end_on_terminator() {
        let raw = hex!("ef0001010004020001000204000000008000015f50");
        assert_eq!(
            validate(&raw, ContainerKind::Runtime),
            Err(EofError::Validation(ValidationError::MissingStopOpcode))
        );
    }

    #[test]
    fn instruction_after_terminator_unreachable() {
        let raw = hex!("ef0001010004020001000204000000008000000000");
        assert_eq!(
            validate(&raw, ContainerKind::Runtime),
            Err(EofError::Validation(
                ValidationError::UnreachableInstruction
            ))
        );
    }

    #[test]
    fn stack_underflow() {
        let raw = hex!("ef0001010004020001000204000000008000005000");
        assert_eq!(
            validate(&raw, ContainerKind::Runtime),
            Err(EofError::Validation(ValidationError::StackUnderflow))
        );
    }

    #[test]
    fn exchange_requires_deep_enough_stack() {
        // EXCHANGE 0x00 swaps slots 1 and 2 below the top: three items needed,
        // two present.
        let raw = hex!("ef0001010004020001000504000000 00800002 5f5fe80000");
        assert_eq!(
            validate(&raw, ContainerKind::Runtime),
            Err(EofError::Validation(ValidationError::StackUnderflow))
        );
    }

    #[test]
    fn dupn_swapn_immediate_requirements() {
        // DUPN 0x01 needs two items, SWAPN 0x01 needs three.
        let raw = hex!("ef0001010004020001000804000000 00800004 5f5f5fe601e70100");
        assert!(validate(&raw, ContainerKind::Runtime).is_ok());

        // DUPN 0x02 on a two-item stack reaches one slot too deep.
        let raw = hex!("ef0001010004020001000504000000 00800002 5f5fe60200");
        assert_eq!(
            validate(&raw, ContainerKind::Runtime),
            Err(EofError::Validation(ValidationError::StackUnderflow))
        );
    }

    #[test]
    fn retf_with_too_few_items() {
        // Section 1 declares two outputs and RETFs with an empty stack.
        let raw = hex!(
            "ef00010100080200020004000104000000 00800002 00020000 e3000100 e4"
        );
        assert_eq!(
            validate(&raw, ContainerKind::Runtime),
            Err(EofError::Validation(ValidationError::StackUnderflow))
        );
    }

    #[test]
    fn retf_with_too_many_items() {
        // Section 1 declares zero outputs and RETFs with one item.
        let raw = hex!(
            "ef00010100080200020004000204000000 00800000 00000001 e3000100 5fe4"
        );
        assert_eq!(
            validate(&raw, ContainerKind::Runtime),
            Err(EofError::Validation(
                ValidationError::StackHigherThanOutputs
            ))
        );
    }

    #[test]
    fn callf_retf_round_trip() {
        let raw = hex!(
            "ef00010100080200020005000204000000 00800001 00010001 e300015000 5fe4"
        );
        assert!(validate(&raw, ContainerKind::Runtime).is_ok());
    }

    #[test]
    fn callf_out_of_bounds() {
        let raw = hex!("ef000101000402000100040400000000800000e3000500");
        assert_eq!(
            validate(&raw, ContainerKind::Runtime),
            Err(EofError::Validation(
                ValidationError::InvalidCodeSectionIndex
            ))
        );
    }

    #[test]
    fn callf_to_non_returning() {
        let raw = hex!(
            "ef00010100080200020004000104000000 00800000 00800000 e3000100 fe"
        );
        assert_eq!(
            validate(&raw, ContainerKind::Runtime),
            Err(EofError::Validation(ValidationError::CallfToNonReturning))
        );
    }

    #[test]
    fn callf_stack_overflow() {
        // Two items below a callee that may reach height 1023.
        let raw = hex!(
            "ef00010100080200020008000104000000 00800002 000003ff 5f5fe30001505000 e4"
        );
        assert_eq!(
            validate(&raw, ContainerKind::Runtime),
            Err(EofError::Validation(ValidationError::StackOverflow))
        );
    }

    #[test]
    fn jumpf_stack_overflow() {
        // Two items below a non-returning target that may reach height 1023.
        let raw = hex!(
            "ef00010100080200020005000104000000 00800002 008003ff 5f5fe50001 fe"
        );
        assert_eq!(
            validate(&raw, ContainerKind::Runtime),
            Err(EofError::Validation(ValidationError::StackOverflow))
        );
    }

    #[test]
    fn jumpf_out_of_bounds() {
        let raw = hex!("ef000101000402000100030400000000800000e5ffff");
        assert_eq!(
            validate(&raw, ContainerKind::Runtime),
            Err(EofError::Validation(
                ValidationError::InvalidCodeSectionIndex
            ))
        );
    }

    #[test]
    fn jumpf_to_non_returning() {
        let raw = hex!(
            "ef00010100080200020003000104000000 00800000 00800000 e50001 00"
        );
        assert!(validate(&raw, ContainerKind::Runtime).is_ok());
    }

    #[test]
    fn jumpf_incompatible_outputs() {
        // Section 1 declares one output, jumps to a section declaring two.
        let raw = hex!(
            "ef000101000c020003000500030003 04000000 00800001 00010000 00020002 e300015000 e50002 5f5fe4"
        );
        assert_eq!(
            validate(&raw, ContainerKind::Runtime),
            Err(EofError::Validation(
                ValidationError::JumpfIncompatibleOutputs
            ))
        );
    }

    #[test]
    fn backward_jump_height_mismatch() {
        let raw = hex!(
            "ef0001010004020001000e04000000 00800004 5f6000e100025f5f6000e1fffd00"
        );
        assert_eq!(
            validate(&raw, ContainerKind::Runtime),
            Err(EofError::Validation(ValidationError::StackHeightMismatch))
        );
    }

    #[test]
    fn forward_jump_joins_different_heights() {
        // The RJUMPI edge reaches STOP with zero items, the fall-through path
        // with one; the join widens to the [0, 1] interval and validates.
        let raw = hex!("ef0001010004020001000704000000 00800001 6000e100015f00");
        assert!(validate(&raw, ContainerKind::Runtime).is_ok());
    }

    #[test]
    fn non_returning_flag_mismatch() {
        // Section 1 is declared returning but ends on STOP.
        let raw = hex!(
            "ef00010100080200020004000104000000 00800000 00000000 e3000100 00"
        );
        assert_eq!(
            validate(&raw, ContainerKind::Runtime),
            Err(EofError::Validation(
                ValidationError::InvalidNonReturningFlag
            ))
        );
    }

    #[test]
    fn declared_max_height_must_match() {
        let raw = hex!("ef0001010004020001000204000000008000005f00");
        assert_eq!(
            validate(&raw, ContainerKind::Runtime),
            Err(EofError::Validation(ValidationError::InvalidMaxStackHeight))
        );
    }

    #[test]
    fn unreachable_code_section() {
        let raw = hex!(
            "ef000101000c020003000300010003 04000000 00800000 00800000 00800000 e50001 fe e50002"
        );
        assert_eq!(
            validate(&raw, ContainerKind::Runtime),
            Err(EofError::Validation(
                ValidationError::UnreachableCodeSection
            ))
        );
    }

    #[test]
    fn dataloadn_needs_32_bytes_of_data() {
        let raw = hex!("ef00010100040200010004 04000000 00800001 d1000000");
        assert_eq!(
            validate(&raw, ContainerKind::Runtime),
            Err(EofError::Validation(
                ValidationError::InvalidDataloadnIndex
            ))
        );

        // With exactly 32 data bytes index 0 is fine.
        let mut raw = hex!("ef00010100040200010004 04002000 00800001 d1000000").to_vec();
        raw.extend_from_slice(&[0u8; 32]);
        assert!(validate(&raw, ContainerKind::Runtime).is_ok());
    }

    #[test]
    fn returncontract_in_runtime_container() {
        let raw = hex!(
            "ef00010100040200010006030001001404000000 00800002 60006000ee00 ef000101000402000100010400000000800000fe"
        );
        assert_eq!(
            validate(&raw, ContainerKind::Runtime),
            Err(EofError::Validation(
                ValidationError::IncompatibleContainerKind
            ))
        );
        // The same container is valid as initcode.
        assert!(validate(&raw, ContainerKind::Initcode).is_ok());
    }

    #[test]
    fn subcontainer_referenced_in_two_modes() {
        let raw = hex!(
            "ef0001010004020001000b030001001404000000 00800004 5f5f5f5fec00505f5fee00 ef000101000402000100010400000000800000fe"
        );
        assert_eq!(
            validate(&raw, ContainerKind::Initcode),
            Err(EofError::Validation(
                ValidationError::IncompatibleContainerKind
            ))
        );
    }

    #[test]
    fn eofcreate_target_must_have_full_data() {
        // The sub-container declares one data byte and carries none.
        let raw = hex!(
            "ef00010100040200010008030001001404000000 00800004 5f5f5f5fec005000 ef000101000402000100010401000000800000fe"
        );
        assert_eq!(
            validate(&raw, ContainerKind::Runtime),
            Err(EofError::Validation(
                ValidationError::EofCreateWithTruncatedContainer
            ))
        );
    }

    #[test]
    fn unreferenced_subcontainer() {
        let raw = hex!(
            "ef00010100040200010001030001001404000000 00800000 00 ef000101000402000100010400000000800000fe"
        );
        assert_eq!(
            validate(&raw, ContainerKind::Runtime),
            Err(EofError::Validation(
                ValidationError::UnreachableSubContainer
            ))
        );
    }

    #[test]
    fn truncated_top_level_data_policy() {
        let raw = hex!("ef000101000402000100010400020000800000feaa");

        // Runtime code reads missing data bytes as zero.
        assert!(validate(&raw, ContainerKind::Runtime).is_ok());

        // Initcode is hashed whole and must be complete.
        assert_eq!(
            validate(&raw, ContainerKind::Initcode),
            Err(EofError::Parse(ParseError::TopLevelContainerTruncated))
        );

        // The strict policy rejects it for runtime code too.
        assert_eq!(
            validate_raw_with_config(
                raw.to_vec().into(),
                ContainerKind::Runtime,
                &ValidationConfig {
                    reject_truncated_data: true
                }
            ),
            Err(EofError::Parse(ParseError::TopLevelContainerTruncated))
        );
    }

    #[test]
    fn container_size_limit() {
        let raw = vec![0u8; MAX_CONTAINER_SIZE + 1];
        assert_eq!(
            validate(&raw, ContainerKind::Runtime),
            Err(EofError::Parse(ParseError::ContainerSizeAboveLimit))
        );
    }

    #[test]
    fn structural_errors_come_first() {
        // Undefined opcode behind a broken header: the parse error wins.
        let raw = hex!("ef0001010004020001000104000001ef");
        assert_eq!(
            validate(&raw, ContainerKind::Runtime),
            Err(EofError::Parse(ParseError::MissingTerminator))
        );
    }
}
