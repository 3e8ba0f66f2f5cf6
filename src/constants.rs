// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Global constants for the jarombek.com smoke tests.
//!
//! This module contains the object names, namespaces, hostnames and numeric
//! limits used throughout the suite. Annotation keys live in
//! [`crate::annotations`].

// ============================================================================
// Environment Constants
// ============================================================================

/// Environment variable selecting the target environment
pub const TEST_ENV_VAR: &str = "TEST_ENV";

/// Indicator value selecting the development environment
pub const ENV_INDICATOR_DEV: &str = "dev";

/// Indicator values that explicitly select production
pub const ENV_INDICATORS_PROD: [&str; 2] = ["prod", "production"];

/// Namespace holding the development deployment
pub const NAMESPACE_DEV: &str = "jarombek-com-dev";

/// Namespace holding the production deployment
pub const NAMESPACE_PROD: &str = "jarombek-com";

/// Hostnames routed to the development ingress, in annotation order
pub const HOSTNAMES_DEV: [&str; 2] = ["dev.jarombek.com", "www.dev.jarombek.com"];

/// Hostnames routed to the production ingress, in annotation order
pub const HOSTNAMES_PROD: [&str; 2] = ["jarombek.com", "www.jarombek.com"];

/// Environment tag applied to development load balancer resources
pub const ENVIRONMENT_TAG_DEV: &str = "development";

/// Environment tag applied to production load balancer resources
pub const ENVIRONMENT_TAG_PROD: &str = "production";

// ============================================================================
// Object Names
// ============================================================================

/// Web application `Deployment` and `Service` name
pub const APP_NAME: &str = "jarombek-com";

/// Database `Deployment` and `Service` name
pub const DATABASE_NAME: &str = "jarombek-com-database";

/// `Ingress` routing external traffic to the web application
pub const INGRESS_NAME: &str = "jarombek-com-ingress";

/// Load balancer name written into the ALB tags annotation
pub const LOAD_BALANCER_NAME: &str = "jarombek-com-load-balancer";

/// Service type exposed by both application services
pub const SERVICE_TYPE_NODE_PORT: &str = "NodePort";

// ============================================================================
// Expected Counts
// ============================================================================

/// Number of `Deployment` objects expected in the namespace
pub const EXPECTED_DEPLOYMENT_COUNT: usize = 2;

/// Number of `Service` objects expected in the namespace
pub const EXPECTED_SERVICE_COUNT: usize = 2;

/// Number of `Ingress` objects expected in the namespace
pub const EXPECTED_INGRESS_COUNT: usize = 1;

/// Number of annotations expected on the ingress
pub const EXPECTED_INGRESS_ANNOTATION_COUNT: usize = 13;

// ============================================================================
// AWS Constants
// ============================================================================

/// AWS account owning the ACM certificates
pub const AWS_ACCOUNT_ID: &str = "739088120071";

/// AWS region of the ACM certificates
pub const AWS_REGION: &str = "us-east-1";

// ============================================================================
// Kubernetes API Constants
// ============================================================================

/// Page size for list operations
pub const KUBE_LIST_PAGE_SIZE: u32 = 100;

/// Initial retry interval for transient API errors (100ms)
pub const RETRY_INITIAL_INTERVAL_MILLIS: u64 = 100;

/// Maximum interval between retries (5 seconds)
pub const RETRY_MAX_INTERVAL_SECS: u64 = 5;

/// Backoff multiplier (exponential growth factor)
pub const RETRY_BACKOFF_MULTIPLIER: f64 = 2.0;

/// Default total time spent retrying a single API call
pub const DEFAULT_MAX_RETRY_SECS: u64 = 30;

// ============================================================================
// Runtime Constants
// ============================================================================

/// Default time limit for a single check
pub const DEFAULT_CHECK_TIMEOUT_SECS: u64 = 30;

/// Number of worker threads for Tokio runtime
pub const TOKIO_WORKER_THREADS: usize = 4;
