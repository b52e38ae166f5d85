//! Semantic validation of EOF containers.
//!
//! The container crate guarantees structural well-formedness; this crate
//! enforces the semantic rules on top of it: type-section cross-validation,
//! per-section stack-height interpretation, container-kind tracking and the
//! orchestration over nested sub-containers.
//!
//! The entry point is [`validate_raw`] (or [`validate_raw_with_config`]),
//! which decodes and fully validates a raw container.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc as std;

mod error;
pub mod opcode;
mod printer;
mod types;
mod utils;
mod validation;

pub use error::{EofError, ValidationError};
pub use opcode::{OpCode, OpCodeInfo, OPCODE_INFO};
#[cfg(feature = "std")]
pub use printer::print_code;
pub use types::cross_validate_types;
pub use validation::{
    validate_code, validate_codes, validate_container, validate_raw, validate_raw_with_config,
    AccessTracker, ContainerKind, ValidationConfig,
};

pub use container::{self, Bytes, Eof, ParseError};
