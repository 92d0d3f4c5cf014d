//! # Shared Test Fixtures
//!
//! Stub collaborators for integration tests: an executor that records every
//! query it receives, a validator that always reports a count mismatch, and a
//! helper that writes definition files into a temporary directory.

#![allow(dead_code)]

use std::cell::RefCell;
use std::fs;
use std::path::Path;

use serde_json::{json, Value};
use sparql_tester::executor::QueryExecutor;
use sparql_tester::validators::{Binding, ValidationOutcome, Validator, ValidatorRegistry};
use sparql_tester::HarnessResult;

pub const CATS: &str =
    "# Find all cats\n## validator: NoValidator\nSELECT * WHERE { ?a wdt:P31 wd:Q146 }\n";

/// Executor stub that records composed queries and answers with a fixed payload.
pub struct RecordingExecutor {
    payload: Value,
    pub queries: RefCell<Vec<String>>,
}

impl RecordingExecutor {
    pub fn new(payload: Value) -> Self {
        Self {
            payload,
            queries: RefCell::new(Vec::new()),
        }
    }

    pub fn with_bindings(count: usize) -> Self {
        let bindings: Vec<Value> = (0..count)
            .map(|i| json!({ "item": { "type": "uri", "value": format!("http://www.wikidata.org/entity/Q{}", i) } }))
            .collect();
        Self::new(json!({ "head": { "vars": ["item"] }, "results": { "bindings": bindings } }))
    }

    pub fn calls(&self) -> usize {
        self.queries.borrow().len()
    }
}

impl QueryExecutor for RecordingExecutor {
    fn execute(&self, query: &str) -> HarnessResult<Value> {
        self.queries.borrow_mut().push(query.to_string());
        Ok(self.payload.clone())
    }
}

/// Executor stub that fails the test if it is ever called.
pub struct UnreachableExecutor;

impl QueryExecutor for UnreachableExecutor {
    fn execute(&self, query: &str) -> HarnessResult<Value> {
        panic!("executor must not be called, got query:\n{}", query);
    }
}

/// Validator that always fails with a fixed message.
pub struct CountMismatch;

impl Validator for CountMismatch {
    fn description(&self) -> &str {
        "Counts must match"
    }

    fn validate(&self, _bindings: &[Binding]) -> ValidationOutcome {
        ValidationOutcome::fail(self.description(), "count mismatch")
    }
}

fn count_mismatch() -> Box<dyn Validator> {
    Box::new(CountMismatch)
}

/// The default registry plus `CountMismatch`.
pub fn registry_with_failing_validator() -> ValidatorRegistry {
    let mut registry = sparql_tester::registry::build_default_validator_registry();
    registry.register("CountMismatch", count_mismatch);
    registry
}

/// Writes `(file name, text)` pairs into `dir`.
pub fn write_definitions(dir: &Path, files: &[(&str, &str)]) {
    for (name, text) in files {
        fs::write(dir.join(name), text).unwrap();
    }
}
