//! Subcommand dispatch.

pub mod dump;
pub mod validate;
pub mod vectors;

use clap::Parser;
use validator::EofError;

/// Top-level command.
#[derive(Parser, Debug)]
#[command(version, about, infer_subcommands = true)]
pub enum MainCmd {
    /// Validate a single container given as a hex string.
    Validate(validate::Cmd),
    /// Run EOF validation conformance fixtures.
    Vectors(vectors::Cmd),
    /// Print the instructions of a container or raw code section.
    Dump(dump::Cmd),
}

/// Any error a subcommand can exit with.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A given fixture path does not exist.
    #[error("The specified path does not exist")]
    PathNotExists,
    /// The input is not a hex string.
    #[error("Invalid hex string")]
    InvalidHex,
    /// The container was rejected.
    #[error(transparent)]
    Eof(#[from] EofError),
    /// Some fixture vectors disagreed with the validator.
    #[error("{failed}/{total} vectors failed")]
    VectorsFailed {
        /// Vectors whose verdict did not match.
        failed: usize,
        /// Vectors checked.
        total: usize,
    },
    /// A fixture file could not be parsed.
    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),
    /// A fixture file could not be read.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl MainCmd {
    /// Runs the selected subcommand.
    pub fn run(&self) -> Result<(), Error> {
        match self {
            Self::Validate(cmd) => cmd.run(),
            Self::Vectors(cmd) => cmd.run(),
            Self::Dump(cmd) => cmd.run(),
        }
    }
}
