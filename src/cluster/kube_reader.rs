// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! [`ClusterReader`] backed by the Kubernetes API.

use super::pagination::count_all_paginated;
use super::retry::retry_api_call;
use super::{ClusterReader, ObjectKind};
use crate::constants::DEFAULT_MAX_RETRY_SECS;
use crate::errors::Result;
use async_trait::async_trait;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::Service;
use k8s_openapi::api::networking::v1::Ingress;
use k8s_openapi::NamespaceResourceScope;
use kube::api::ListParams;
use kube::{Api, Client, Resource};
use serde::de::DeserializeOwned;
use std::fmt::Debug;
use std::time::Duration;
use tracing::debug;

/// Reads objects through a shared `kube::Client`.
///
/// The client is cheap to clone, so each call builds its own typed `Api`.
#[derive(Clone)]
pub struct KubeReader {
    client: Client,
    retry_budget: Duration,
}

impl KubeReader {
    /// Create a reader with the default retry budget.
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self::with_retry_budget(client, Duration::from_secs(DEFAULT_MAX_RETRY_SECS))
    }

    /// Create a reader that retries each transient failure for at most `retry_budget`.
    #[must_use]
    pub fn with_retry_budget(client: Client, retry_budget: Duration) -> Self {
        Self {
            client,
            retry_budget,
        }
    }

    async fn get<K>(&self, namespace: &str, name: &str) -> Result<Option<K>>
    where
        K: Resource<Scope = NamespaceResourceScope, DynamicType = ()>
            + Clone
            + DeserializeOwned
            + Debug,
    {
        let api: Api<K> = Api::namespaced(self.client.clone(), namespace);
        let operation = format!("get {} {namespace}/{name}", K::kind(&()));
        debug!(operation = %operation, "Fetching object");

        retry_api_call(|| api.get_opt(name), &operation, self.retry_budget).await
    }

    async fn count_kind<K>(&self, namespace: &str) -> Result<usize>
    where
        K: Resource<Scope = NamespaceResourceScope, DynamicType = ()>
            + Clone
            + DeserializeOwned
            + Debug,
    {
        let api: Api<K> = Api::namespaced(self.client.clone(), namespace);
        let operation = format!("list {} in {namespace}", K::kind(&()));

        count_all_paginated(&api, ListParams::default(), &operation, self.retry_budget).await
    }
}

#[async_trait]
impl ClusterReader for KubeReader {
    async fn deployment(&self, namespace: &str, name: &str) -> Result<Option<Deployment>> {
        self.get(namespace, name).await
    }

    async fn service(&self, namespace: &str, name: &str) -> Result<Option<Service>> {
        self.get(namespace, name).await
    }

    async fn ingress(&self, namespace: &str, name: &str) -> Result<Option<Ingress>> {
        self.get(namespace, name).await
    }

    async fn count(&self, namespace: &str, kind: ObjectKind) -> Result<usize> {
        match kind {
            ObjectKind::Deployment => self.count_kind::<Deployment>(namespace).await,
            ObjectKind::Service => self.count_kind::<Service>(namespace).await,
            ObjectKind::Ingress => self.count_kind::<Ingress>(namespace).await,
        }
    }
}
