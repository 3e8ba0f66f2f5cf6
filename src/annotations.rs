// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Annotation keys and literal values expected on the jarombek.com ingress.
//!
//! The ingress is reconciled by the AWS Load Balancer Controller and by
//! ExternalDNS, so most keys belong to those two projects.

// ============================================================================
// Kubernetes / ExternalDNS Annotations
// ============================================================================

/// Ingress class consumed by the AWS Load Balancer Controller
pub const INGRESS_CLASS: &str = "kubernetes.io/ingress.class";

/// Hostnames ExternalDNS publishes for the load balancer
pub const EXTERNAL_DNS_HOSTNAME: &str = "external-dns.alpha.kubernetes.io/hostname";

// ============================================================================
// ALB Ingress Annotations
// https://kubernetes-sigs.github.io/aws-load-balancer-controller/latest/guide/ingress/annotations/
// ============================================================================

/// Custom action redirecting HTTP to HTTPS
pub const ALB_SSL_REDIRECT_ACTION: &str = "alb.ingress.kubernetes.io/actions.ssl-redirect";

/// Protocol used between the load balancer and its targets
pub const ALB_BACKEND_PROTOCOL: &str = "alb.ingress.kubernetes.io/backend-protocol";

/// Whether the load balancer is internal or internet-facing
pub const ALB_SCHEME: &str = "alb.ingress.kubernetes.io/scheme";

/// Listener ports as a JSON array
pub const ALB_LISTEN_PORTS: &str = "alb.ingress.kubernetes.io/listen-ports";

/// Health check path on the targets
pub const ALB_HEALTHCHECK_PATH: &str = "alb.ingress.kubernetes.io/healthcheck-path";

/// Health check protocol on the targets
pub const ALB_HEALTHCHECK_PROTOCOL: &str = "alb.ingress.kubernetes.io/healthcheck-protocol";

/// How traffic is routed to pods (`instance` or `ip`)
pub const ALB_TARGET_TYPE: &str = "alb.ingress.kubernetes.io/target-type";

/// AWS tags applied to the load balancer
pub const ALB_TAGS: &str = "alb.ingress.kubernetes.io/tags";

/// ACM certificates attached to the HTTPS listener
pub const ALB_CERTIFICATE_ARN: &str = "alb.ingress.kubernetes.io/certificate-arn";

/// Security group attached to the load balancer
pub const ALB_SECURITY_GROUPS: &str = "alb.ingress.kubernetes.io/security-groups";

/// Subnets the load balancer is placed in
pub const ALB_SUBNETS: &str = "alb.ingress.kubernetes.io/subnets";

// ============================================================================
// Expected Literal Values
// ============================================================================

/// Expected ingress class
pub const INGRESS_CLASS_ALB: &str = "alb";

/// Expected SSL redirect action, byte for byte
pub const SSL_REDIRECT_ACTION_JSON: &str = r#"{"Type": "redirect", "RedirectConfig": {"Protocol": "HTTPS", "Port": "443", "StatusCode": "HTTP_301"}}"#;

/// Expected backend and health check protocol
pub const PROTOCOL_HTTP: &str = "HTTP";

/// Expected load balancer scheme
pub const SCHEME_INTERNET_FACING: &str = "internet-facing";

/// Expected listener ports, byte for byte
pub const LISTEN_PORTS_JSON: &str = r#"[{"HTTP":80}, {"HTTPS":443}]"#;

/// Expected health check path
pub const HEALTHCHECK_PATH_ROOT: &str = "/";

/// Expected target type
pub const TARGET_TYPE_INSTANCE: &str = "instance";

// ============================================================================
// Expected Patterns
// ============================================================================

/// Lowercase hex UUID as used in ACM certificate ids
pub const UUID_PATTERN: &str = "[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}";

/// A single security group id
pub const SECURITY_GROUP_PATTERN: &str = "^sg-[0-9a-f]+$";

/// Exactly two comma-joined subnet ids
pub const SUBNETS_PATTERN: &str = "^subnet-[0-9a-f]+,subnet-[0-9a-f]+$";
