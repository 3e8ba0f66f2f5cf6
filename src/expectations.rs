// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Annotation contract for the jarombek.com ingress.
//!
//! Each annotation is expected either to equal a literal string or to match
//! a regex. Values that AWS generates per deployment (certificate ARNs,
//! security groups, subnets) are matched by shape; everything else is
//! compared byte for byte.
//!
//! # Example
//!
//! ```rust
//! use jarombek_com_smoke::expectations::AnnotationExpectations;
//!
//! let expected = AnnotationExpectations::for_ingress(
//!     "jarombek.com,www.jarombek.com",
//!     "production",
//! )
//! .unwrap();
//! assert_eq!(expected.len(), 13);
//! ```

use crate::annotations::{
    ALB_BACKEND_PROTOCOL, ALB_CERTIFICATE_ARN, ALB_HEALTHCHECK_PATH, ALB_HEALTHCHECK_PROTOCOL,
    ALB_LISTEN_PORTS, ALB_SCHEME, ALB_SECURITY_GROUPS, ALB_SSL_REDIRECT_ACTION, ALB_SUBNETS,
    ALB_TAGS, ALB_TARGET_TYPE, EXTERNAL_DNS_HOSTNAME, HEALTHCHECK_PATH_ROOT, INGRESS_CLASS,
    INGRESS_CLASS_ALB, LISTEN_PORTS_JSON, PROTOCOL_HTTP, SCHEME_INTERNET_FACING,
    SECURITY_GROUP_PATTERN, SSL_REDIRECT_ACTION_JSON, SUBNETS_PATTERN, TARGET_TYPE_INSTANCE,
    UUID_PATTERN,
};
use crate::constants::{
    APP_NAME, AWS_ACCOUNT_ID, AWS_REGION, EXPECTED_INGRESS_ANNOTATION_COUNT, LOAD_BALANCER_NAME,
};
use crate::errors::{Result, SmokeError};
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;

/// Expected value of a single annotation.
#[derive(Debug, Clone)]
pub enum AnnotationExpectation {
    /// The annotation must equal this string exactly
    Exact(String),
    /// The annotation must match this regex
    Pattern(Regex),
}

impl AnnotationExpectation {
    /// Compile a pattern expectation for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`SmokeError::InvalidPattern`] if `pattern` is not a valid regex.
    pub fn pattern(key: &str, pattern: &str) -> Result<Self> {
        Regex::new(pattern)
            .map(Self::Pattern)
            .map_err(|source| SmokeError::InvalidPattern {
                key: key.to_string(),
                source,
            })
    }

    /// Whether `actual` satisfies this expectation.
    #[must_use]
    pub fn matches(&self, actual: &str) -> bool {
        match self {
            Self::Exact(expected) => expected == actual,
            Self::Pattern(regex) => regex.is_match(actual),
        }
    }
}

impl fmt::Display for AnnotationExpectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(expected) => write!(f, "{expected:?}"),
            Self::Pattern(regex) => write!(f, "value matching /{}/", regex.as_str()),
        }
    }
}

/// Every annotation the ingress must carry, plus the exact total count.
#[derive(Debug, Clone)]
pub struct AnnotationExpectations {
    entries: BTreeMap<String, AnnotationExpectation>,
    expected_count: usize,
}

impl AnnotationExpectations {
    /// Build the annotation contract for the jarombek.com ingress.
    ///
    /// # Arguments
    ///
    /// * `hostname_value` - Comma-joined hostnames published by ExternalDNS
    /// * `environment_tag` - `development` or `production`, interpolated into the tags annotation
    ///
    /// # Errors
    ///
    /// Returns [`SmokeError::InvalidPattern`] if a built-in pattern fails to compile.
    pub fn for_ingress(hostname_value: &str, environment_tag: &str) -> Result<Self> {
        let mut entries = BTreeMap::new();

        // Kubernetes ingress class and ExternalDNS
        insert_exact(&mut entries, INGRESS_CLASS, INGRESS_CLASS_ALB);
        insert_exact(&mut entries, EXTERNAL_DNS_HOSTNAME, hostname_value);

        // ALB literals
        insert_exact(
            &mut entries,
            ALB_SSL_REDIRECT_ACTION,
            SSL_REDIRECT_ACTION_JSON,
        );
        insert_exact(&mut entries, ALB_BACKEND_PROTOCOL, PROTOCOL_HTTP);
        insert_exact(&mut entries, ALB_SCHEME, SCHEME_INTERNET_FACING);
        insert_exact(&mut entries, ALB_LISTEN_PORTS, LISTEN_PORTS_JSON);
        insert_exact(&mut entries, ALB_HEALTHCHECK_PATH, HEALTHCHECK_PATH_ROOT);
        insert_exact(&mut entries, ALB_HEALTHCHECK_PROTOCOL, PROTOCOL_HTTP);
        insert_exact(&mut entries, ALB_TARGET_TYPE, TARGET_TYPE_INSTANCE);
        insert_exact(&mut entries, ALB_TAGS, &load_balancer_tags(environment_tag));

        // ALB values generated by AWS
        entries.insert(
            ALB_CERTIFICATE_ARN.to_string(),
            AnnotationExpectation::pattern(ALB_CERTIFICATE_ARN, &certificate_arns_pattern())?,
        );
        entries.insert(
            ALB_SECURITY_GROUPS.to_string(),
            AnnotationExpectation::pattern(ALB_SECURITY_GROUPS, SECURITY_GROUP_PATTERN)?,
        );
        entries.insert(
            ALB_SUBNETS.to_string(),
            AnnotationExpectation::pattern(ALB_SUBNETS, SUBNETS_PATTERN)?,
        );

        Ok(Self {
            entries,
            expected_count: EXPECTED_INGRESS_ANNOTATION_COUNT,
        })
    }

    /// Iterate over `(key, expectation)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AnnotationExpectation)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value))
    }

    /// Look up the expectation for a single key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&AnnotationExpectation> {
        self.entries.get(key)
    }

    /// Number of annotations with an expectation.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Exact number of annotations the ingress must carry.
    #[must_use]
    pub fn expected_count(&self) -> usize {
        self.expected_count
    }
}

fn insert_exact(entries: &mut BTreeMap<String, AnnotationExpectation>, key: &str, value: &str) {
    entries.insert(
        key.to_string(),
        AnnotationExpectation::Exact(value.to_string()),
    );
}

/// AWS tags applied to the load balancer for the given environment.
#[must_use]
pub fn load_balancer_tags(environment_tag: &str) -> String {
    format!("Name={LOAD_BALANCER_NAME},Application={APP_NAME},Environment={environment_tag}")
}

/// Pattern for one ACM certificate ARN owned by the jarombek.com account.
#[must_use]
pub fn certificate_arn_pattern() -> String {
    format!("arn:aws:acm:{AWS_REGION}:{AWS_ACCOUNT_ID}:certificate/{UUID_PATTERN}")
}

/// Anchored pattern for exactly two comma-joined certificate ARNs.
#[must_use]
pub fn certificate_arns_pattern() -> String {
    let arn = certificate_arn_pattern();
    format!("^{arn},{arn}$")
}

#[cfg(test)]
#[path = "expectations_tests.rs"]
mod expectations_tests;
