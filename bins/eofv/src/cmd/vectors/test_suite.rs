//! Shape of the EOF validation fixture files.

use serde::Deserialize;
use std::collections::BTreeMap;
use validator::Bytes;

/// One fixture file: named test units.
#[derive(Debug, PartialEq, Eq, Deserialize)]
pub struct TestSuite(pub BTreeMap<String, TestUnit>);

/// One test unit: named vectors plus generator metadata.
#[derive(Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TestUnit {
    /// Generator metadata, unused here.
    #[serde(default, rename = "_info")]
    pub info: Option<serde_json::Value>,
    /// The vectors of this unit.
    #[serde(default)]
    pub vectors: BTreeMap<String, TestVector>,
}

/// One container and its expected verdict.
#[derive(Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TestVector {
    /// The raw container bytes.
    pub code: Bytes,
    /// `"INITCODE"` to validate in initcode mode; absent means runtime.
    pub container_kind: Option<String>,
    /// Expected verdicts per fork.
    pub results: TestResults,
}

/// Per-fork verdicts. EOF fixtures carry Prague only.
#[derive(Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TestResults {
    /// The Prague verdict.
    #[serde(rename = "Prague")]
    pub prague: TestResult,
}

/// The expected outcome of one vector.
#[derive(Debug, PartialEq, Eq, Deserialize)]
pub struct TestResult {
    /// Whether the container is expected to validate.
    pub result: bool,
    /// The exception name expected on rejection.
    pub exception: Option<String>,
}
