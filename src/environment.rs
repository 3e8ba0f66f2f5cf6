// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Target environment resolution.
//!
//! The suite runs against either the development or the production
//! deployment of jarombek.com. The choice is read once from `TEST_ENV` and
//! turned into a single [`ExpectationSet`] that every check borrows.
//!
//! Only the literal value `dev` selects development. Anything else,
//! including an unset variable, selects production.
//!
//! # Example
//!
//! ```rust
//! use jarombek_com_smoke::environment::{ExpectationSet, TargetEnvironment};
//!
//! let env = TargetEnvironment::from_indicator(Some("dev"));
//! let expectations = ExpectationSet::for_environment(env).unwrap();
//! assert_eq!(expectations.namespace, "jarombek-com-dev");
//! ```

use crate::constants::{
    ENVIRONMENT_TAG_DEV, ENVIRONMENT_TAG_PROD, ENV_INDICATORS_PROD, ENV_INDICATOR_DEV,
    HOSTNAMES_DEV, HOSTNAMES_PROD, NAMESPACE_DEV, NAMESPACE_PROD, TEST_ENV_VAR,
};
use crate::errors::Result;
use crate::expectations::AnnotationExpectations;
use serde::Serialize;
use std::fmt;

/// Deployment environment under test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetEnvironment {
    Development,
    Production,
}

impl TargetEnvironment {
    /// Map the raw indicator to an environment.
    ///
    /// `Some("dev")` selects development; every other value, and `None`,
    /// selects production.
    #[must_use]
    pub fn from_indicator(indicator: Option<&str>) -> Self {
        match indicator {
            Some(ENV_INDICATOR_DEV) => Self::Development,
            _ => Self::Production,
        }
    }

    /// Read the indicator from `TEST_ENV`.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_indicator(read_indicator().as_deref())
    }

    /// Whether `indicator` is one of the values that names an environment
    /// explicitly. Unrecognized values still resolve to production.
    #[must_use]
    pub fn is_recognized_indicator(indicator: &str) -> bool {
        indicator == ENV_INDICATOR_DEV || ENV_INDICATORS_PROD.contains(&indicator)
    }
}

impl fmt::Display for TargetEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => f.write_str("development"),
            Self::Production => f.write_str("production"),
        }
    }
}

/// Raw value of `TEST_ENV`, if set and valid unicode.
#[must_use]
pub fn read_indicator() -> Option<String> {
    std::env::var(TEST_ENV_VAR).ok()
}

/// Everything the checks need to know about the environment under test.
#[derive(Debug, Clone)]
pub struct ExpectationSet {
    /// Environment the values were derived from
    pub environment: TargetEnvironment,
    /// Namespace holding the application objects
    pub namespace: String,
    /// Hostnames published for the ingress, in annotation order
    pub hostnames: Vec<String>,
    /// Value of the `Environment` AWS tag
    pub environment_tag: String,
    /// Annotation contract for the ingress
    pub annotations: AnnotationExpectations,
}

impl ExpectationSet {
    /// Derive the expectation set for `environment`.
    ///
    /// # Errors
    ///
    /// Returns an error only if a built-in annotation pattern fails to compile.
    pub fn for_environment(environment: TargetEnvironment) -> Result<Self> {
        let (namespace, hostnames, environment_tag) = match environment {
            TargetEnvironment::Development => (NAMESPACE_DEV, HOSTNAMES_DEV, ENVIRONMENT_TAG_DEV),
            TargetEnvironment::Production => (NAMESPACE_PROD, HOSTNAMES_PROD, ENVIRONMENT_TAG_PROD),
        };

        let hostnames: Vec<String> = hostnames.iter().map(ToString::to_string).collect();
        let annotations =
            AnnotationExpectations::for_ingress(&hostnames.join(","), environment_tag)?;

        Ok(Self {
            environment,
            namespace: namespace.to_string(),
            hostnames,
            environment_tag: environment_tag.to_string(),
            annotations,
        })
    }
}

#[cfg(test)]
#[path = "environment_tests.rs"]
mod environment_tests;
