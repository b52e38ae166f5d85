//! EOF container validation executable.

use clap::Parser;
use eofv::cmd::MainCmd;

fn main() -> anyhow::Result<()> {
    MainCmd::parse().run()?;
    Ok(())
}
