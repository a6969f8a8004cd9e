//! Conformance test suite for `FormStore` implementations.
//!
//! This module provides a backend-agnostic test suite that any `FormStore`
//! implementation can run to verify correctness. The suite covers:
//!
//! - **Save**: id assignment, upsert by trimmed name, timestamps
//! - **Query**: lookup by id, listing order, deletion
//! - **Round-trip**: field lists come back exactly as saved
//! - **Errors**: correct error variants for invalid input
//! - **Concurrency**: parallel saves never lose a form
//!
//! # Usage
//!
//! Callers pass a factory that creates a fresh, empty store for each test:
//!
//! ```ignore
//! use formwright_storage::conformance::run_conformance_suite;
//! use formwright_storage::{KvFormStore, MemoryBackend};
//!
//! #[tokio::test]
//! async fn memory_conformance() {
//!     let report = run_conformance_suite(|| async {
//!         KvFormStore::new(MemoryBackend::new())
//!     })
//!     .await;
//!     assert!(report.failed == 0, "{report}");
//! }
//! ```

mod concurrent;
mod error;
mod query;
mod roundtrip;
mod save;

use std::fmt;
use std::future::Future;

use formwright_core::{FieldDefinition, FieldType};

use crate::FormStore;

/// Result of a single conformance test.
#[derive(Debug, Clone)]
pub struct TestResult {
    /// Test category (e.g. "save", "query", "errors").
    pub category: String,
    pub name: String,
    pub passed: bool,
    /// Error message if the test failed.
    pub message: Option<String>,
}

impl TestResult {
    fn pass(category: &str, name: &str) -> Self {
        Self {
            category: category.to_string(),
            name: name.to_string(),
            passed: true,
            message: None,
        }
    }

    fn fail(category: &str, name: &str, msg: String) -> Self {
        Self {
            category: category.to_string(),
            name: name.to_string(),
            passed: false,
            message: Some(msg),
        }
    }

    fn from_result(category: &str, name: &str, result: Result<(), String>) -> Self {
        match result {
            Ok(()) => Self::pass(category, name),
            Err(msg) => Self::fail(category, name, msg),
        }
    }
}

/// Aggregated report from a full conformance suite run.
#[derive(Debug, Clone)]
pub struct ConformanceReport {
    pub results: Vec<TestResult>,
    pub passed: usize,
    pub failed: usize,
    pub total: usize,
}

impl fmt::Display for ConformanceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Conformance: {}/{} passed ({} failed)",
            self.passed, self.total, self.failed
        )?;
        for r in &self.results {
            if !r.passed {
                writeln!(
                    f,
                    "  FAIL [{}/{}]: {}",
                    r.category,
                    r.name,
                    r.message.as_deref().unwrap_or("(no message)")
                )?;
            }
        }
        Ok(())
    }
}

/// Run the full conformance suite against a form store.
///
/// The `factory` function is called once per test to create a fresh, empty
/// store, ensuring test isolation.
pub async fn run_conformance_suite<S, F, Fut>(factory: F) -> ConformanceReport
where
    S: FormStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let mut results = Vec::new();

    results.extend(save::run_save_tests(&factory).await);
    results.extend(query::run_query_tests(&factory).await);
    results.extend(roundtrip::run_roundtrip_tests(&factory).await);
    results.extend(error::run_error_tests(&factory).await);
    results.extend(concurrent::run_concurrent_tests(&factory).await);

    let passed = results.iter().filter(|r| r.passed).count();
    let total = results.len();

    ConformanceReport {
        results,
        passed,
        failed: total - passed,
        total,
    }
}

// ── Helpers: field constructors with fixed ids ───────────────────────────────

fn make_field(id: &str, field_type: FieldType) -> FieldDefinition {
    let mut f = FieldDefinition::new(field_type);
    f.id = id.to_string();
    f.label = format!("{id} label");
    f
}

fn make_derived(id: &str, parent: &str, formula: &str) -> FieldDefinition {
    let mut f = make_field(id, FieldType::Number);
    f.derived_from = Some(parent.to_string());
    f.formula = formula.to_string();
    f
}

/// A small form with one derivation of each kind.
fn sample_fields() -> Vec<FieldDefinition> {
    vec![
        make_field("name", FieldType::Text),
        make_field("dob", FieldType::Date),
        make_derived("age", "dob", "age"),
        make_field("price", FieldType::Number),
        make_derived("total", "price", "value * 1.2"),
    ]
}
