// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Error types for the smoke test library.
//!
//! Assertion mismatches are not errors: they are collected as
//! [`crate::verify::Mismatch`] values so every comparison in a check gets
//! reported. The variants here cover everything that stops a check (or the
//! whole run) from producing a verdict at all.

use std::time::Duration;
use thiserror::Error;

/// Errors raised while preparing or running the suite.
#[derive(Error, Debug)]
pub enum SmokeError {
    /// A built-in annotation pattern failed to compile
    #[error("Invalid pattern for annotation '{key}': {source}")]
    InvalidPattern {
        /// Annotation key the pattern belongs to
        key: String,
        /// Underlying regex compilation error
        #[source]
        source: regex::Error,
    },

    /// The kubeconfig file could not be read or applied
    #[error("Failed to load kubeconfig from {path}: {reason}")]
    Kubeconfig {
        /// Path given on the command line
        path: String,
        /// Explanation from the kube config loader
        reason: String,
    },

    /// Running with `--in-cluster` outside a pod, or without a mounted token
    #[error("Failed to load in-cluster configuration: {reason}")]
    InClusterConfig {
        /// Explanation from the kube config loader
        reason: String,
    },

    /// Neither a kubeconfig nor an in-cluster environment was found
    #[error("Failed to infer Kubernetes configuration: {reason}")]
    InferConfig {
        /// Explanation from the kube config loader
        reason: String,
    },

    /// The client could not be constructed from a valid configuration
    #[error("Failed to build Kubernetes client: {0}")]
    Client(#[source] kube::Error),

    /// A non-retryable Kubernetes API error
    #[error("Failed to {operation}: {source}")]
    Api {
        /// Human-readable operation, e.g. "get Ingress jarombek-com/jarombek-com-ingress"
        operation: String,
        /// Underlying API error
        #[source]
        source: kube::Error,
    },

    /// A transient Kubernetes API error that persisted through every retry
    #[error("Gave up on {operation} after {attempts} attempts: {source}")]
    RetriesExhausted {
        /// Human-readable operation
        operation: String,
        /// Number of attempts made
        attempts: u32,
        /// Last error observed
        #[source]
        source: kube::Error,
    },

    /// An object the check reads from could not be found
    #[error("{object} not found")]
    NotFound {
        /// Kind and namespaced name, e.g. "Ingress jarombek-com/jarombek-com-ingress"
        object: String,
    },

    /// A check did not finish within its time limit
    #[error("Check '{check}' timed out after {timeout:?}")]
    Timeout {
        /// Check name
        check: String,
        /// Time limit that elapsed
        timeout: Duration,
    },
}

/// Result alias used throughout the library.
pub type Result<T, E = SmokeError> = std::result::Result<T, E>;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod errors_tests;
