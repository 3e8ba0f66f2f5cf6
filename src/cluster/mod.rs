// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Kubernetes client acquisition and read-only access for the checks.
//!
//! The suite never writes to the cluster. Everything it needs is expressed by
//! the [`ClusterReader`] trait: three single-object lookups and a per-kind
//! count. [`KubeReader`] implements it over one shared `kube::Client`; tests
//! substitute an in-memory implementation.
//!
//! # Client configuration
//!
//! | Options | Source |
//! |---------|--------|
//! | `in_cluster: true` | Service account token mounted in the pod |
//! | `kubeconfig: Some(path)` | The given kubeconfig file, current context |
//! | neither | `KUBECONFIG`, `~/.kube/config`, then in-cluster |

pub mod kube_reader;
pub mod pagination;
pub mod retry;

pub use kube_reader::KubeReader;

use crate::errors::{Result, SmokeError};
use async_trait::async_trait;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::Service;
use k8s_openapi::api::networking::v1::Ingress;
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use tracing::{debug, info};

/// Object kinds the suite inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ObjectKind {
    Deployment,
    Service,
    Ingress,
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deployment => f.write_str("Deployment"),
            Self::Service => f.write_str("Service"),
            Self::Ingress => f.write_str("Ingress"),
        }
    }
}

/// Read-only view of the cluster used by every check.
///
/// Lookups return `Ok(None)` when the object does not exist; `Err` is kept
/// for failures that leave the answer unknown.
#[async_trait]
pub trait ClusterReader: Send + Sync {
    /// Fetch a `Deployment` by name.
    async fn deployment(&self, namespace: &str, name: &str) -> Result<Option<Deployment>>;

    /// Fetch a `Service` by name.
    async fn service(&self, namespace: &str, name: &str) -> Result<Option<Service>>;

    /// Fetch an `Ingress` by name.
    async fn ingress(&self, namespace: &str, name: &str) -> Result<Option<Ingress>>;

    /// Count the objects of `kind` in `namespace`.
    async fn count(&self, namespace: &str, kind: ObjectKind) -> Result<usize>;
}

/// How to reach the API server.
#[derive(Debug, Clone, Default)]
pub struct ClientOptions {
    /// Explicit kubeconfig file
    pub kubeconfig: Option<PathBuf>,
    /// Use the pod's service account instead of a kubeconfig
    pub in_cluster: bool,
}

/// Resolve a client configuration from `options`.
///
/// `in_cluster` wins over `kubeconfig` when both are given.
///
/// # Errors
///
/// Returns an error if the selected configuration source is unavailable or
/// malformed.
pub async fn load_config(options: &ClientOptions) -> Result<Config> {
    if options.in_cluster {
        debug!("Loading in-cluster Kubernetes configuration");
        return Config::incluster().map_err(|e| SmokeError::InClusterConfig {
            reason: e.to_string(),
        });
    }

    if let Some(path) = &options.kubeconfig {
        debug!(path = %path.display(), "Loading kubeconfig file");
        let kubeconfig_error = |reason: String| SmokeError::Kubeconfig {
            path: path.display().to_string(),
            reason,
        };
        let kubeconfig =
            Kubeconfig::read_from(path).map_err(|e| kubeconfig_error(e.to_string()))?;
        return Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default())
            .await
            .map_err(|e| kubeconfig_error(e.to_string()));
    }

    debug!("Inferring Kubernetes configuration");
    Config::infer().await.map_err(|e| SmokeError::InferConfig {
        reason: e.to_string(),
    })
}

/// Build a client according to `options`.
///
/// # Errors
///
/// Returns an error if no configuration can be loaded or the client cannot be built.
pub async fn connect(options: &ClientOptions) -> Result<Client> {
    let config = load_config(options).await?;
    info!(cluster_url = %config.cluster_url, "Connecting to Kubernetes API server");
    Client::try_from(config).map_err(SmokeError::Client)
}
