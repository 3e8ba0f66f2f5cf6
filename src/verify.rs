// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Comparison functions used by the checks.
//!
//! Every function here is pure: it takes objects already fetched from the
//! API server and returns the list of [`Mismatch`]es found. An empty list
//! means the object satisfies the expectation. Collecting mismatches rather
//! than stopping at the first one lets a single check report every wrong
//! annotation at once.

use crate::expectations::{AnnotationExpectation, AnnotationExpectations};
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::Service;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Condition type reported once a deployment has its minimum replicas available
pub const CONDITION_AVAILABLE: &str = "Available";

/// Condition type reported while a rollout is progressing or complete
pub const CONDITION_PROGRESSING: &str = "Progressing";

/// Service type Kubernetes assigns when `spec.type` is unset
pub const DEFAULT_SERVICE_TYPE: &str = "ClusterIP";

/// A single expected-versus-actual difference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mismatch {
    /// What was compared, e.g. `annotation alb.ingress.kubernetes.io/scheme`
    pub subject: String,
    /// Expected value, rendered for humans
    pub expected: String,
    /// Actual value, rendered for humans
    pub actual: String,
}

impl Mismatch {
    pub fn new(
        subject: impl Into<String>,
        expected: impl fmt::Display,
        actual: impl fmt::Display,
    ) -> Self {
        Self {
            subject: subject.into(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: expected {}, got {}",
            self.subject, self.expected, self.actual
        )
    }
}

/// Expected rollout state of a deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeploymentStatusExpectation {
    /// Expected status of the `Available` condition
    pub available: bool,
    /// Expected status of the `Progressing` condition
    pub progressing: bool,
    /// Expected `status.replicas`
    pub total_replicas: i32,
    /// Expected `status.availableReplicas`
    pub available_replicas: i32,
    /// Expected `status.readyReplicas`
    pub ready_replicas: i32,
    /// Expected `status.unavailableReplicas`
    pub unavailable_replicas: i32,
}

impl DeploymentStatusExpectation {
    /// One replica, fully rolled out, nothing unavailable.
    #[must_use]
    pub const fn healthy_single_replica() -> Self {
        Self {
            available: true,
            progressing: true,
            total_replicas: 1,
            available_replicas: 1,
            ready_replicas: 1,
            unavailable_replicas: 0,
        }
    }
}

/// Compare a deployment's conditions and replica counts with `expected`.
///
/// Replica counts the API server omits are read as zero. A missing
/// condition is reported as a mismatch with actual value `missing`.
#[must_use]
pub fn deployment_status(
    deployment: &Deployment,
    expected: &DeploymentStatusExpectation,
) -> Vec<Mismatch> {
    let status = deployment.status.clone().unwrap_or_default();
    let mut mismatches = Vec::new();

    for (condition_type, expected_status) in [
        (CONDITION_AVAILABLE, expected.available),
        (CONDITION_PROGRESSING, expected.progressing),
    ] {
        let actual = status
            .conditions
            .as_deref()
            .unwrap_or_default()
            .iter()
            .find(|condition| condition.type_ == condition_type)
            .map(|condition| condition.status == "True");

        match actual {
            Some(actual) if actual == expected_status => {}
            Some(actual) => mismatches.push(Mismatch::new(
                format!("condition {condition_type}"),
                expected_status,
                actual,
            )),
            None => mismatches.push(Mismatch::new(
                format!("condition {condition_type}"),
                expected_status,
                "missing",
            )),
        }
    }

    for (field, expected_count, actual_count) in [
        ("replicas", expected.total_replicas, status.replicas),
        (
            "availableReplicas",
            expected.available_replicas,
            status.available_replicas,
        ),
        (
            "readyReplicas",
            expected.ready_replicas,
            status.ready_replicas,
        ),
        (
            "unavailableReplicas",
            expected.unavailable_replicas,
            status.unavailable_replicas,
        ),
    ] {
        let actual_count = actual_count.unwrap_or(0);
        if actual_count != expected_count {
            mismatches.push(Mismatch::new(
                format!("status.{field}"),
                expected_count,
                actual_count,
            ));
        }
    }

    mismatches
}

/// Compare a service's `spec.type` with `expected_type`.
#[must_use]
pub fn service_type(service: &Service, expected_type: &str) -> Vec<Mismatch> {
    let actual = service
        .spec
        .as_ref()
        .and_then(|spec| spec.type_.as_deref())
        .unwrap_or(DEFAULT_SERVICE_TYPE);

    if actual == expected_type {
        Vec::new()
    } else {
        vec![Mismatch::new("spec.type", expected_type, actual)]
    }
}

/// Check that annotation `key` equals `expected`.
#[must_use]
pub fn annotations_equal(
    annotations: &BTreeMap<String, String>,
    key: &str,
    expected: &str,
) -> Option<Mismatch> {
    match annotations.get(key) {
        Some(actual) if actual == expected => None,
        actual => Some(annotation_mismatch(key, format!("{expected:?}"), actual)),
    }
}

/// Check that annotation `key` matches `pattern`.
#[must_use]
pub fn annotations_match_pattern(
    annotations: &BTreeMap<String, String>,
    key: &str,
    pattern: &Regex,
) -> Option<Mismatch> {
    match annotations.get(key) {
        Some(actual) if pattern.is_match(actual) => None,
        actual => Some(annotation_mismatch(
            key,
            format!("value matching /{}/", pattern.as_str()),
            actual,
        )),
    }
}

fn annotation_mismatch(key: &str, expected: String, actual: Option<&String>) -> Mismatch {
    let actual = actual.map_or_else(|| "<absent>".to_string(), |value| format!("{value:?}"));
    Mismatch::new(format!("annotation {key}"), expected, actual)
}

/// Check every expected annotation, then the total annotation count.
#[must_use]
pub fn annotations(
    annotations: &BTreeMap<String, String>,
    expected: &AnnotationExpectations,
) -> Vec<Mismatch> {
    let mut mismatches: Vec<Mismatch> = expected
        .iter()
        .filter_map(|(key, expectation)| match expectation {
            AnnotationExpectation::Exact(value) => annotations_equal(annotations, key, value),
            AnnotationExpectation::Pattern(pattern) => {
                annotations_match_pattern(annotations, key, pattern)
            }
        })
        .collect();

    if let Some(count) = annotation_count(annotations.len(), expected.expected_count()) {
        mismatches.push(count);
    }

    mismatches
}

/// Compare the number of annotations on the object with the expected total.
#[must_use]
pub fn annotation_count(actual: usize, expected: usize) -> Option<Mismatch> {
    (actual != expected).then(|| Mismatch::new("annotation count", expected, actual))
}

/// Compare the number of objects of `kind` found in a namespace.
#[must_use]
pub fn object_count(kind: &str, expected: usize, actual: usize) -> Option<Mismatch> {
    (actual != expected)
        .then(|| Mismatch::new(format!("number of {kind} objects"), expected, actual))
}

#[cfg(test)]
#[path = "verify_tests.rs"]
mod verify_tests;
