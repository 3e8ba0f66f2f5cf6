// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Shared fixtures for unit tests: an in-memory cluster and correctly
//! configured objects.

use crate::cluster::{ClusterReader, ObjectKind};
use crate::constants::{APP_NAME, DATABASE_NAME, INGRESS_NAME};
use crate::errors::{Result, SmokeError};
use async_trait::async_trait;
use k8s_openapi::api::apps::v1::{Deployment, DeploymentCondition, DeploymentStatus};
use k8s_openapi::api::core::v1::{Service, ServiceSpec};
use k8s_openapi::api::networking::v1::Ingress;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use std::collections::BTreeMap;
use std::sync::Mutex;

type Key = (String, String);

/// In-memory [`ClusterReader`] that records every call it receives.
#[derive(Default)]
pub struct FakeCluster {
    pub deployments: BTreeMap<Key, Deployment>,
    pub services: BTreeMap<Key, Service>,
    pub ingresses: BTreeMap<Key, Ingress>,
    /// When set, every Ingress lookup fails with this HTTP status
    pub ingress_error: Option<u16>,
    calls: Mutex<Vec<String>>,
}

impl FakeCluster {
    /// A namespace where every check passes.
    pub fn healthy(namespace: &str, ingress_annotations: BTreeMap<String, String>) -> Self {
        let mut cluster = Self::default();
        for name in [APP_NAME, DATABASE_NAME] {
            cluster.insert_deployment(namespace, healthy_deployment(namespace, name));
            cluster.insert_service(namespace, service(namespace, name, "NodePort"));
        }
        cluster.insert_ingress(
            namespace,
            ingress(namespace, INGRESS_NAME, ingress_annotations),
        );
        cluster
    }

    pub fn insert_deployment(&mut self, namespace: &str, deployment: Deployment) {
        let key = key(namespace, &deployment.metadata);
        self.deployments.insert(key, deployment);
    }

    pub fn insert_service(&mut self, namespace: &str, service: Service) {
        let key = key(namespace, &service.metadata);
        self.services.insert(key, service);
    }

    pub fn insert_ingress(&mut self, namespace: &str, ingress: Ingress) {
        let key = key(namespace, &ingress.metadata);
        self.ingresses.insert(key, ingress);
    }

    /// Every call received, e.g. `get Ingress jarombek-com/jarombek-com-ingress`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

fn key(namespace: &str, metadata: &ObjectMeta) -> Key {
    (
        namespace.to_string(),
        metadata.name.clone().unwrap_or_default(),
    )
}

fn lookup<T: Clone>(objects: &BTreeMap<Key, T>, namespace: &str, name: &str) -> Option<T> {
    objects
        .get(&(namespace.to_string(), name.to_string()))
        .cloned()
}

fn count_in<T>(objects: &BTreeMap<Key, T>, namespace: &str) -> usize {
    objects.keys().filter(|(ns, _)| ns == namespace).count()
}

#[async_trait]
impl ClusterReader for FakeCluster {
    async fn deployment(&self, namespace: &str, name: &str) -> Result<Option<Deployment>> {
        self.record(format!("get Deployment {namespace}/{name}"));
        Ok(lookup(&self.deployments, namespace, name))
    }

    async fn service(&self, namespace: &str, name: &str) -> Result<Option<Service>> {
        self.record(format!("get Service {namespace}/{name}"));
        Ok(lookup(&self.services, namespace, name))
    }

    async fn ingress(&self, namespace: &str, name: &str) -> Result<Option<Ingress>> {
        let operation = format!("get Ingress {namespace}/{name}");
        self.record(operation.clone());

        if let Some(code) = self.ingress_error {
            return Err(SmokeError::Api {
                operation,
                source: api_error(code),
            });
        }
        Ok(lookup(&self.ingresses, namespace, name))
    }

    async fn count(&self, namespace: &str, kind: ObjectKind) -> Result<usize> {
        self.record(format!("list {kind} in {namespace}"));
        Ok(match kind {
            ObjectKind::Deployment => count_in(&self.deployments, namespace),
            ObjectKind::Service => count_in(&self.services, namespace),
            ObjectKind::Ingress => count_in(&self.ingresses, namespace),
        })
    }
}

pub fn api_error(code: u16) -> kube::Error {
    kube::Error::Api(
        kube::core::Status::failure(&format!("request rejected with status {code}"), "Forbidden")
            .with_code(code)
            .boxed(),
    )
}

fn metadata(namespace: &str, name: &str) -> ObjectMeta {
    ObjectMeta {
        name: Some(name.to_string()),
        namespace: Some(namespace.to_string()),
        ..Default::default()
    }
}

/// A one-replica deployment that is available and fully rolled out.
pub fn healthy_deployment(namespace: &str, name: &str) -> Deployment {
    let condition = |type_: &str| DeploymentCondition {
        type_: type_.to_string(),
        status: "True".to_string(),
        ..Default::default()
    };

    Deployment {
        metadata: metadata(namespace, name),
        status: Some(DeploymentStatus {
            replicas: Some(1),
            available_replicas: Some(1),
            ready_replicas: Some(1),
            conditions: Some(vec![condition("Available"), condition("Progressing")]),
            ..Default::default()
        }),
        ..Default::default()
    }
}

pub fn service(namespace: &str, name: &str, service_type: &str) -> Service {
    Service {
        metadata: metadata(namespace, name),
        spec: Some(ServiceSpec {
            type_: Some(service_type.to_string()),
            ..Default::default()
        }),
        ..Default::default()
    }
}

pub fn ingress(namespace: &str, name: &str, annotations: BTreeMap<String, String>) -> Ingress {
    Ingress {
        metadata: ObjectMeta {
            annotations: Some(annotations),
            ..metadata(namespace, name)
        },
        ..Default::default()
    }
}

/// Annotations as they appear on a correctly deployed ingress.
pub fn ingress_annotations(hostnames: &str, environment_tag: &str) -> BTreeMap<String, String> {
    let tags = format!(
        "Name=jarombek-com-load-balancer,Application=jarombek-com,Environment={environment_tag}"
    );

    [
        ("kubernetes.io/ingress.class", "alb"),
        ("external-dns.alpha.kubernetes.io/hostname", hostnames),
        (
            "alb.ingress.kubernetes.io/actions.ssl-redirect",
            r#"{"Type": "redirect", "RedirectConfig": {"Protocol": "HTTPS", "Port": "443", "StatusCode": "HTTP_301"}}"#,
        ),
        ("alb.ingress.kubernetes.io/backend-protocol", "HTTP"),
        ("alb.ingress.kubernetes.io/scheme", "internet-facing"),
        (
            "alb.ingress.kubernetes.io/listen-ports",
            r#"[{"HTTP":80}, {"HTTPS":443}]"#,
        ),
        ("alb.ingress.kubernetes.io/healthcheck-path", "/"),
        ("alb.ingress.kubernetes.io/healthcheck-protocol", "HTTP"),
        ("alb.ingress.kubernetes.io/target-type", "instance"),
        ("alb.ingress.kubernetes.io/tags", tags.as_str()),
        (
            "alb.ingress.kubernetes.io/certificate-arn",
            "arn:aws:acm:us-east-1:739088120071:certificate/0b1c2d3e-4f5a-6b7c-8d9e-0f1a2b3c4d5e,\
             arn:aws:acm:us-east-1:739088120071:certificate/aaaaaaaa-bbbb-cccc-dddd-eeeeeeeeeeee",
        ),
        ("alb.ingress.kubernetes.io/security-groups", "sg-0a1b2c3d"),
        ("alb.ingress.kubernetes.io/subnets", "subnet-0a1b,subnet-2c3d"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

/// Production ingress annotations.
pub fn production_annotations() -> BTreeMap<String, String> {
    ingress_annotations("jarombek.com,www.jarombek.com", "production")
}
