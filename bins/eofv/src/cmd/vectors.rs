//! Conformance-fixture runner.

mod test_suite;

pub use test_suite::{TestResult, TestResults, TestSuite, TestUnit, TestVector};

use crate::{cmd::Error, dir_utils::find_all_json_tests};
use clap::Args;
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};
use validator::{validate_raw, ContainerKind, EofError};

/// Vectors command.
#[derive(Args, Debug)]
pub struct Cmd {
    /// Paths to fixture files or directories to scan for them.
    #[arg(required = true)]
    path: Vec<PathBuf>,
}

impl Cmd {
    /// Runs every fixture under the given paths.
    pub fn run(&self) -> Result<(), Error> {
        for path in &self.path {
            if !path.exists() {
                return Err(Error::PathNotExists);
            }
            run_fixtures(path)?;
        }
        Ok(())
    }
}

/// Runs all fixture files under `path` and prints a summary.
pub fn run_fixtures(path: &Path) -> Result<(), Error> {
    let test_files = find_all_json_tests(path);
    let mut total = 0;
    let mut passed = 0;

    #[derive(Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
    enum Mismatch {
        FalsePositive,
        Error(EofError),
    }
    let mut mismatches: BTreeMap<Mismatch, usize> = BTreeMap::new();

    for test_file in test_files {
        let s = std::fs::read_to_string(test_file)?;
        let suite: TestSuite = serde_json::from_str(&s)?;
        for (name, test_unit) in suite.0 {
            for (vector_name, test_vector) in test_unit.vectors {
                total += 1;
                let kind = match test_vector.container_kind.as_deref() {
                    Some("INITCODE") => ContainerKind::Initcode,
                    _ => ContainerKind::Runtime,
                };
                let res = validate_raw(test_vector.code.clone(), kind);
                if res.is_ok() != test_vector.results.prague.result {
                    println!(
                        "\nVector failed: {} - {}\nexpected: {:?}\ngot: {:#?}\nbytes: {:?}\n",
                        name,
                        vector_name,
                        test_vector.results.prague,
                        res.as_ref().err(),
                        test_vector.code
                    );
                    *mismatches
                        .entry(
                            res.err()
                                .map(Mismatch::Error)
                                .unwrap_or(Mismatch::FalsePositive),
                        )
                        .or_default() += 1;
                } else {
                    passed += 1;
                }
            }
        }
    }
    println!("Passed vectors: {passed}/{total}");
    if passed != total {
        println!("Mismatches: {mismatches:#?}");
        Err(Error::VectorsFailed {
            failed: total - passed,
            total,
        })
    } else {
        Ok(())
    }
}
