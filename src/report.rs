// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Aggregated results of a suite run.
//!
//! The report decides the process exit code: 0 only when no selected check
//! failed or errored. Skipped checks never affect the verdict.

use crate::environment::TargetEnvironment;
use crate::suite::{Check, CheckOutcome};
use serde::Serialize;
use std::time::Duration;

/// Outcome of a single check with timing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    pub name: String,
    pub description: String,
    pub outcome: CheckOutcome,
    pub duration_ms: u64,
}

impl CheckResult {
    #[must_use]
    pub fn new(check: &Check, outcome: CheckOutcome, duration: Duration) -> Self {
        Self {
            name: check.name.to_string(),
            description: check.description.to_string(),
            outcome,
            duration_ms: u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
        }
    }
}

/// Results of every check in one run.
#[derive(Debug, Clone, Serialize)]
pub struct SuiteReport {
    pub environment: TargetEnvironment,
    pub namespace: String,
    pub results: Vec<CheckResult>,
}

impl SuiteReport {
    #[must_use]
    pub fn new(
        environment: TargetEnvironment,
        namespace: String,
        results: Vec<CheckResult>,
    ) -> Self {
        Self {
            environment,
            namespace,
            results,
        }
    }

    #[must_use]
    pub fn passed(&self) -> usize {
        self.count(|outcome| matches!(outcome, CheckOutcome::Passed))
    }

    /// Checks that failed an assertion or could not be evaluated.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(CheckOutcome::is_failure)
    }

    #[must_use]
    pub fn skipped(&self) -> usize {
        self.count(|outcome| matches!(outcome, CheckOutcome::Skipped(_)))
    }

    fn count(&self, predicate: impl Fn(&CheckOutcome) -> bool) -> usize {
        self.results
            .iter()
            .filter(|result| predicate(&result.outcome))
            .count()
    }

    /// Whether every non-skipped check passed.
    #[must_use]
    pub fn success(&self) -> bool {
        self.failed() == 0
    }

    /// Process exit code for this report.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        u8::from(!self.success())
    }

    /// Human-readable report: one line per check, details indented, then a summary.
    #[must_use]
    pub fn render_text(&self) -> String {
        let mut out = format!(
            "jarombek.com smoke tests ({} environment, namespace {})\n",
            self.environment, self.namespace
        );

        for result in &self.results {
            let status = match &result.outcome {
                CheckOutcome::Passed => "PASS",
                CheckOutcome::Failed(_) => "FAIL",
                CheckOutcome::Errored(_) => "ERROR",
                CheckOutcome::Skipped(_) => "SKIP",
            };
            out.push_str(&format!(
                "{status:<5} {} ({}ms)\n",
                result.name, result.duration_ms
            ));

            match &result.outcome {
                CheckOutcome::Passed => {}
                CheckOutcome::Failed(mismatches) => {
                    for mismatch in mismatches {
                        out.push_str(&format!("      {mismatch}\n"));
                    }
                }
                CheckOutcome::Errored(message) | CheckOutcome::Skipped(message) => {
                    out.push_str(&format!("      {message}\n"));
                }
            }
        }

        out.push_str(&format!(
            "{} passed, {} failed, {} skipped\n",
            self.passed(),
            self.failed(),
            self.skipped()
        ));
        out
    }

    /// Machine-readable report.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod report_tests;
