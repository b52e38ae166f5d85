//! Single-container validation.

use crate::cmd::Error;
use clap::Args;
use validator::{container::alloy_primitives::hex, validate_raw, Bytes, ContainerKind};

/// Validate command.
#[derive(Args, Debug)]
pub struct Cmd {
    /// Container bytes in hex, with or without the 0x prefix.
    #[arg(required = true)]
    bytes: String,
    /// Validate as initcode instead of runtime code.
    #[arg(long)]
    initcode: bool,
}

impl Cmd {
    /// Validates the container and prints the verdict.
    pub fn run(&self) -> Result<(), Error> {
        let trimmed = self.bytes.trim_start_matches("0x");
        let Ok(bytes) = hex::decode(trimmed) else {
            return Err(Error::InvalidHex);
        };
        let bytes: Bytes = bytes.into();

        let kind = if self.initcode {
            ContainerKind::Initcode
        } else {
            ContainerKind::Runtime
        };

        match validate_raw(bytes, kind) {
            Ok(eof) => {
                println!("OK: {eof}");
                Ok(())
            }
            Err(e) => {
                println!("{e}");
                Err(e.into())
            }
        }
    }
}
