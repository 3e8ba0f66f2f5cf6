// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! The jarombek.com smoke test suite.
//!
//! A suite is a flat list of independent [`Check`]s. Each check declares one
//! [`Assertion`] about an object in the namespace under test; the literal
//! expected values come from the [`ExpectationSet`] resolved at startup.
//! Checks only read from the cluster, so they may run concurrently.
//!
//! # Outcomes
//!
//! | Situation | Outcome |
//! |-----------|---------|
//! | Every comparison holds | [`CheckOutcome::Passed`] |
//! | One or more comparisons differ | [`CheckOutcome::Failed`] with every mismatch |
//! | A lookup fails or times out | [`CheckOutcome::Errored`] with the underlying message |
//! | Check disabled | [`CheckOutcome::Skipped`] with the reason, body never runs |
//!
//! One check never affects another: a failure or error is recorded and the
//! remaining checks still run.

use crate::cluster::{ClusterReader, ObjectKind};
use crate::constants::{
    APP_NAME, DATABASE_NAME, DEFAULT_CHECK_TIMEOUT_SECS, EXPECTED_DEPLOYMENT_COUNT,
    EXPECTED_INGRESS_COUNT, EXPECTED_SERVICE_COUNT, INGRESS_NAME, SERVICE_TYPE_NODE_PORT,
};
use crate::environment::ExpectationSet;
use crate::errors::{Result, SmokeError};
use crate::report::{CheckResult, SuiteReport};
use crate::verify::{self, DeploymentStatusExpectation, Mismatch};
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

/// Reason recorded for the disabled ingress count check
pub const INGRESS_COUNT_SKIP_REASON: &str =
    "Skipping test due to k8s client issue: listing Ingress objects is unreliable";

/// What a check asserts about the namespace under test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Assertion {
    /// A `Deployment` with this name exists
    DeploymentExists { name: &'static str },
    /// A `Deployment` reports the expected conditions and replica counts
    DeploymentStatus {
        name: &'static str,
        expected: DeploymentStatusExpectation,
    },
    /// A `Service` with this name and type exists
    ServiceExists {
        name: &'static str,
        service_type: &'static str,
    },
    /// An `Ingress` with this name exists
    IngressExists { name: &'static str },
    /// An `Ingress` carries exactly the expected annotations
    IngressAnnotations { name: &'static str },
    /// The namespace holds exactly `expected` objects of `kind`
    ObjectCount { kind: ObjectKind, expected: usize },
}

impl Assertion {
    /// Evaluate against the cluster, returning every mismatch found.
    ///
    /// # Errors
    ///
    /// Returns an error if a lookup fails; the check cannot reach a verdict.
    pub async fn evaluate(
        &self,
        reader: &dyn ClusterReader,
        expectations: &ExpectationSet,
    ) -> Result<Vec<Mismatch>> {
        let namespace = expectations.namespace.as_str();

        match self {
            Self::DeploymentExists { name } => {
                Ok(reader.deployment(namespace, name).await?.map_or_else(
                    || vec![absent("Deployment", namespace, name)],
                    |_| Vec::new(),
                ))
            }

            Self::DeploymentStatus { name, expected } => {
                Ok(match reader.deployment(namespace, name).await? {
                    Some(deployment) => verify::deployment_status(&deployment, expected),
                    None => vec![absent("Deployment", namespace, name)],
                })
            }

            Self::ServiceExists { name, service_type } => {
                Ok(match reader.service(namespace, name).await? {
                    Some(service) => verify::service_type(&service, service_type),
                    None => vec![absent("Service", namespace, name)],
                })
            }

            Self::IngressExists { name } => Ok(reader
                .ingress(namespace, name)
                .await?
                .map_or_else(|| vec![absent("Ingress", namespace, name)], |_| Vec::new())),

            Self::IngressAnnotations { name } => {
                let Some(ingress) = reader.ingress(namespace, name).await? else {
                    return Err(SmokeError::NotFound {
                        object: format!("Ingress {namespace}/{name}"),
                    });
                };

                let annotations = ingress.metadata.annotations.unwrap_or_default();
                let mismatches = verify::annotations(&annotations, &expectations.annotations);

                let expected_count = expectations.annotations.expected_count();
                if verify::annotation_count(annotations.len(), expected_count).is_none() {
                    info!(
                        ingress = name,
                        "Ingress has the expected number of annotations. Expected {}, got {}.",
                        expected_count,
                        annotations.len()
                    );
                }

                Ok(mismatches)
            }

            Self::ObjectCount { kind, expected } => {
                let actual = reader.count(namespace, *kind).await?;
                Ok(verify::object_count(&kind.to_string(), *expected, actual)
                    .into_iter()
                    .collect())
            }
        }
    }
}

fn absent(kind: &str, namespace: &str, name: &str) -> Mismatch {
    Mismatch::new(format!("{kind} {namespace}/{name}"), "present", "absent")
}

/// A single named assertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Check {
    /// Stable identifier used for filtering and reports
    pub name: &'static str,
    /// One-line summary of what is verified
    pub description: &'static str,
    /// What is asserted
    pub assertion: Assertion,
    /// When set, the check is reported as skipped and never evaluated
    pub skip: Option<&'static str>,
}

impl Check {
    #[must_use]
    pub const fn new(name: &'static str, description: &'static str, assertion: Assertion) -> Self {
        Self {
            name,
            description,
            assertion,
            skip: None,
        }
    }

    /// Disable the check, keeping it in the suite and in every report.
    #[must_use]
    pub fn skipped(mut self, reason: &'static str) -> Self {
        self.skip = Some(reason);
        self
    }

    /// Run the check, bounded by `timeout`.
    pub async fn run(
        &self,
        reader: &dyn ClusterReader,
        expectations: &ExpectationSet,
        timeout: Duration,
    ) -> CheckOutcome {
        if let Some(reason) = self.skip {
            return CheckOutcome::Skipped(reason.to_string());
        }

        let evaluation =
            tokio::time::timeout(timeout, self.assertion.evaluate(reader, expectations))
                .await
                .unwrap_or_else(|_| {
                    Err(SmokeError::Timeout {
                        check: self.name.to_string(),
                        timeout,
                    })
                });

        match evaluation {
            Ok(mismatches) if mismatches.is_empty() => CheckOutcome::Passed,
            Ok(mismatches) => CheckOutcome::Failed(mismatches),
            Err(e) => CheckOutcome::Errored(e.to_string()),
        }
    }
}

/// Result of running one check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "lowercase")]
pub enum CheckOutcome {
    Passed,
    Failed(Vec<Mismatch>),
    Errored(String),
    Skipped(String),
}

impl CheckOutcome {
    /// Whether this outcome makes the run unsuccessful.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_) | Self::Errored(_))
    }
}

/// How the suite executes its checks.
#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    /// Run all checks at once instead of one after another
    pub concurrent: bool,
    /// Time limit for each check
    pub check_timeout: Duration,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            concurrent: true,
            check_timeout: Duration::from_secs(DEFAULT_CHECK_TIMEOUT_SECS),
        }
    }
}

/// An ordered collection of checks.
#[derive(Debug, Clone)]
pub struct Suite {
    checks: Vec<Check>,
}

impl Suite {
    #[must_use]
    pub fn new(checks: Vec<Check>) -> Self {
        Self { checks }
    }

    /// The checks for the jarombek.com deployment.
    #[must_use]
    pub fn jarombek_com() -> Self {
        Self::new(jarombek_com_checks())
    }

    #[must_use]
    pub fn checks(&self) -> &[Check] {
        &self.checks
    }

    /// Keep only checks whose name contains `pattern`.
    #[must_use]
    pub fn filtered(self, pattern: Option<&str>) -> Self {
        match pattern {
            Some(pattern) => Self::new(
                self.checks
                    .into_iter()
                    .filter(|check| check.name.contains(pattern))
                    .collect(),
            ),
            None => self,
        }
    }

    /// Run every check and collect the results in suite order.
    pub async fn run(
        &self,
        reader: &dyn ClusterReader,
        expectations: &ExpectationSet,
        options: RunOptions,
    ) -> SuiteReport {
        info!(
            environment = %expectations.environment,
            namespace = %expectations.namespace,
            checks = self.checks.len(),
            concurrent = options.concurrent,
            "Running smoke test suite"
        );

        let results = if options.concurrent {
            futures::future::join_all(
                self.checks
                    .iter()
                    .map(|check| run_check(check, reader, expectations, options.check_timeout)),
            )
            .await
        } else {
            let mut results = Vec::with_capacity(self.checks.len());
            for check in &self.checks {
                results.push(run_check(check, reader, expectations, options.check_timeout).await);
            }
            results
        };

        SuiteReport::new(
            expectations.environment,
            expectations.namespace.clone(),
            results,
        )
    }
}

async fn run_check(
    check: &Check,
    reader: &dyn ClusterReader,
    expectations: &ExpectationSet,
    timeout: Duration,
) -> CheckResult {
    let started = Instant::now();
    let outcome = check.run(reader, expectations, timeout).await;
    log_outcome(check, &outcome);
    CheckResult::new(check, outcome, started.elapsed())
}

fn log_outcome(check: &Check, outcome: &CheckOutcome) {
    match outcome {
        CheckOutcome::Passed => info!(check = check.name, "PASS: {}", check.description),
        CheckOutcome::Failed(mismatches) => {
            for mismatch in mismatches {
                error!(
                    check = check.name,
                    subject = %mismatch.subject,
                    expected = %mismatch.expected,
                    actual = %mismatch.actual,
                    "FAIL: {}",
                    check.description
                );
            }
        }
        CheckOutcome::Errored(message) => {
            error!(check = check.name, error = %message, "ERROR: {}", check.description);
        }
        CheckOutcome::Skipped(reason) => {
            warn!(check = check.name, reason = %reason, "SKIP: {}", check.description);
        }
    }
}

/// The checks for the jarombek.com deployment, in reporting order.
#[must_use]
pub fn jarombek_com_checks() -> Vec<Check> {
    vec![
        Check::new(
            "jarombek_com_deployment_exists",
            "Deployment 'jarombek-com' exists",
            Assertion::DeploymentExists { name: APP_NAME },
        ),
        Check::new(
            "jarombek_com_deployment_error_free",
            "Deployment 'jarombek-com' is running error free",
            Assertion::DeploymentStatus {
                name: APP_NAME,
                expected: DeploymentStatusExpectation::healthy_single_replica(),
            },
        ),
        Check::new(
            "jarombek_com_service_exists",
            "NodePort Service 'jarombek-com' exists",
            Assertion::ServiceExists {
                name: APP_NAME,
                service_type: SERVICE_TYPE_NODE_PORT,
            },
        ),
        Check::new(
            "jarombek_com_database_deployment_exists",
            "Deployment 'jarombek-com-database' exists",
            Assertion::DeploymentExists {
                name: DATABASE_NAME,
            },
        ),
        Check::new(
            "jarombek_com_database_deployment_error_free",
            "Deployment 'jarombek-com-database' is running error free",
            Assertion::DeploymentStatus {
                name: DATABASE_NAME,
                expected: DeploymentStatusExpectation::healthy_single_replica(),
            },
        ),
        Check::new(
            "jarombek_com_database_service_exists",
            "NodePort Service 'jarombek-com-database' exists",
            Assertion::ServiceExists {
                name: DATABASE_NAME,
                service_type: SERVICE_TYPE_NODE_PORT,
            },
        ),
        Check::new(
            "jarombek_com_ingress_exists",
            "Ingress 'jarombek-com-ingress' exists",
            Assertion::IngressExists { name: INGRESS_NAME },
        ),
        Check::new(
            "jarombek_com_ingress_annotations",
            "Ingress 'jarombek-com-ingress' has the expected annotations",
            Assertion::IngressAnnotations { name: INGRESS_NAME },
        ),
        Check::new(
            "namespace_deployment_count",
            "Namespace holds the expected number of Deployments",
            Assertion::ObjectCount {
                kind: ObjectKind::Deployment,
                expected: EXPECTED_DEPLOYMENT_COUNT,
            },
        ),
        Check::new(
            "namespace_service_count",
            "Namespace holds the expected number of Services",
            Assertion::ObjectCount {
                kind: ObjectKind::Service,
                expected: EXPECTED_SERVICE_COUNT,
            },
        ),
        // TODO: re-enable once Ingress list calls work with the k8s-openapi version in use
        Check::new(
            "namespace_ingress_count",
            "Namespace holds the expected number of Ingresses",
            Assertion::ObjectCount {
                kind: ObjectKind::Ingress,
                expected: EXPECTED_INGRESS_COUNT,
            },
        )
        .skipped(INGRESS_COUNT_SKIP_REASON),
    ]
}

#[cfg(test)]
#[path = "suite_tests.rs"]
mod suite_tests;
