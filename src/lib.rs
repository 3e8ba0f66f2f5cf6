// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! # jarombek-com-smoke - Kubernetes smoke tests for jarombek.com
//!
//! Validates that the jarombek.com web application is deployed correctly in a
//! Kubernetes cluster: its Deployments and Services exist and are healthy, and
//! its Ingress carries exactly the load balancer annotations expected for the
//! target environment.
//!
//! ## Modules
//!
//! - [`environment`] - Resolves `TEST_ENV` into the expectations for one run
//! - [`expectations`] - Ingress annotation contract (exact values and patterns)
//! - [`verify`] - Pure comparisons producing expected/actual mismatches
//! - [`cluster`] - Client acquisition and read-only API access
//! - [`suite`] - The checks and their runner
//! - [`report`] - Aggregated results and exit code
//!
//! ## Example
//!
//! ```rust,no_run
//! use jarombek_com_smoke::cluster::{connect, ClientOptions, KubeReader};
//! use jarombek_com_smoke::environment::{ExpectationSet, TargetEnvironment};
//! use jarombek_com_smoke::suite::{RunOptions, Suite};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let expectations = ExpectationSet::for_environment(TargetEnvironment::from_env())?;
//! let reader = KubeReader::new(connect(&ClientOptions::default()).await?);
//!
//! let report = Suite::jarombek_com()
//!     .run(&reader, &expectations, RunOptions::default())
//!     .await;
//! println!("{}", report.render_text());
//! # Ok(())
//! # }
//! ```

pub mod annotations;
pub mod cluster;
pub mod constants;
pub mod environment;
pub mod errors;
pub mod expectations;
pub mod report;
pub mod suite;
pub mod verify;

#[cfg(test)]
mod test_support;
