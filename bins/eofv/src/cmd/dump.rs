//! Instruction-level dump of a container or raw code.

use crate::cmd::Error;
use clap::Args;
use validator::{container::alloy_primitives::hex, print_code, Bytes, Eof};

/// Dump command.
#[derive(Args, Debug)]
pub struct Cmd {
    /// Bytes in hex. Input starting with 0xEF is decoded as a container,
    /// anything else is dumped as a bare code section.
    #[arg(required = true)]
    bytes: String,
}

impl Cmd {
    /// Prints the decoded sections or the bare instructions.
    pub fn run(&self) -> Result<(), Error> {
        let trimmed = self.bytes.trim_start_matches("0x");
        let Ok(bytes) = hex::decode(trimmed) else {
            return Err(Error::InvalidHex);
        };
        let bytes: Bytes = bytes.into();
        if bytes.is_empty() {
            return Err(Error::InvalidHex);
        }

        if bytes[0] == 0xEF {
            let eof = Eof::decode(bytes).map_err(validator::EofError::from)?;
            println!("{eof}");
            for index in 0..eof.body.code_section.len() {
                // Indexes are in range by construction.
                let code = eof.body.code(index).unwrap();
                println!("\ncode section {index}:");
                print_code(&code);
            }
        } else {
            print_code(&bytes);
        }
        Ok(())
    }
}
