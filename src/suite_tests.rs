// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `suite.rs`

#[cfg(test)]
mod tests {
    use crate::cluster::{ClusterReader, ObjectKind};
    use crate::environment::{ExpectationSet, TargetEnvironment};
    use crate::errors::Result;
    use crate::suite::{
        jarombek_com_checks, Assertion, Check, CheckOutcome, RunOptions, Suite,
        INGRESS_COUNT_SKIP_REASON,
    };
    use crate::test_support::{ingress_annotations, production_annotations, service, FakeCluster};
    use crate::verify::Mismatch;
    use async_trait::async_trait;
    use k8s_openapi::api::apps::v1::Deployment;
    use k8s_openapi::api::core::v1::Service;
    use k8s_openapi::api::networking::v1::Ingress;
    use std::time::Duration;

    /// Healthy cluster whose Ingress lookups never complete.
    struct StalledIngress(FakeCluster);

    #[async_trait]
    impl ClusterReader for StalledIngress {
        async fn deployment(&self, namespace: &str, name: &str) -> Result<Option<Deployment>> {
            self.0.deployment(namespace, name).await
        }

        async fn service(&self, namespace: &str, name: &str) -> Result<Option<Service>> {
            self.0.service(namespace, name).await
        }

        async fn ingress(&self, _namespace: &str, _name: &str) -> Result<Option<Ingress>> {
            futures::future::pending().await
        }

        async fn count(&self, namespace: &str, kind: ObjectKind) -> Result<usize> {
            self.0.count(namespace, kind).await
        }
    }

    fn production() -> ExpectationSet {
        ExpectationSet::for_environment(TargetEnvironment::Production).unwrap()
    }

    fn development() -> ExpectationSet {
        ExpectationSet::for_environment(TargetEnvironment::Development).unwrap()
    }

    fn outcome_of<'a>(report: &'a crate::report::SuiteReport, name: &str) -> &'a CheckOutcome {
        &report
            .results
            .iter()
            .find(|result| result.name == name)
            .unwrap()
            .outcome
    }

    #[test]
    fn test_check_list_matches_deployment_layout() {
        let names: Vec<&str> = jarombek_com_checks().iter().map(|c| c.name).collect();
        assert_eq!(
            names,
            vec![
                "jarombek_com_deployment_exists",
                "jarombek_com_deployment_error_free",
                "jarombek_com_service_exists",
                "jarombek_com_database_deployment_exists",
                "jarombek_com_database_deployment_error_free",
                "jarombek_com_database_service_exists",
                "jarombek_com_ingress_exists",
                "jarombek_com_ingress_annotations",
                "namespace_deployment_count",
                "namespace_service_count",
                "namespace_ingress_count",
            ]
        );
    }

    #[test]
    fn test_only_ingress_count_is_skipped() {
        let skipped: Vec<Check> = jarombek_com_checks()
            .into_iter()
            .filter(|check| check.skip.is_some())
            .collect();

        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].name, "namespace_ingress_count");
        assert_eq!(skipped[0].skip, Some(INGRESS_COUNT_SKIP_REASON));
        assert_eq!(
            skipped[0].assertion,
            Assertion::ObjectCount {
                kind: ObjectKind::Ingress,
                expected: 1
            }
        );
    }

    #[tokio::test]
    async fn test_healthy_production_namespace_passes() {
        let expectations = production();
        let cluster = FakeCluster::healthy("jarombek-com", production_annotations());

        let report = Suite::jarombek_com()
            .run(&cluster, &expectations, RunOptions::default())
            .await;

        assert_eq!(report.passed(), 10, "{}", report.render_text());
        assert_eq!(report.skipped(), 1);
        assert_eq!(report.exit_code(), 0);
        assert_eq!(report.namespace, "jarombek-com");
    }

    #[tokio::test]
    async fn test_healthy_development_namespace_passes_sequentially() {
        let expectations = development();
        let cluster = FakeCluster::healthy(
            "jarombek-com-dev",
            ingress_annotations("dev.jarombek.com,www.dev.jarombek.com", "development"),
        );
        let options = RunOptions {
            concurrent: false,
            ..RunOptions::default()
        };

        let report = Suite::jarombek_com()
            .run(&cluster, &expectations, options)
            .await;

        assert!(report.success(), "{}", report.render_text());
        assert!(cluster
            .calls()
            .iter()
            .all(|call| call.contains("jarombek-com-dev")));
    }

    #[tokio::test]
    async fn test_wrong_namespace_fails_existence_checks() {
        // Production objects, development expectations
        let expectations = development();
        let cluster = FakeCluster::healthy("jarombek-com", production_annotations());

        let report = Suite::jarombek_com()
            .run(&cluster, &expectations, RunOptions::default())
            .await;

        assert_eq!(
            outcome_of(&report, "jarombek_com_deployment_exists"),
            &CheckOutcome::Failed(vec![Mismatch::new(
                "Deployment jarombek-com-dev/jarombek-com",
                "present",
                "absent"
            )])
        );
        assert_eq!(report.exit_code(), 1);
    }

    #[tokio::test]
    async fn test_skipped_check_never_calls_the_api() {
        let expectations = production();
        let cluster = FakeCluster::healthy("jarombek-com", production_annotations());

        let report = Suite::jarombek_com()
            .run(&cluster, &expectations, RunOptions::default())
            .await;

        assert_eq!(
            outcome_of(&report, "namespace_ingress_count"),
            &CheckOutcome::Skipped(INGRESS_COUNT_SKIP_REASON.to_string())
        );
        assert!(
            !cluster
                .calls()
                .iter()
                .any(|call| call.starts_with("list Ingress")),
            "skipped check must not list ingresses: {:?}",
            cluster.calls()
        );
    }

    #[tokio::test]
    async fn test_skipped_check_is_skipped_even_when_cluster_is_broken() {
        let expectations = production();
        let cluster = FakeCluster::default();
        let check = jarombek_com_checks().pop().unwrap();

        let outcome = check
            .run(&cluster, &expectations, Duration::from_secs(1))
            .await;

        assert!(matches!(outcome, CheckOutcome::Skipped(_)));
        assert!(cluster.calls().is_empty());
    }

    #[tokio::test]
    async fn test_missing_annotation_reports_count() {
        let expectations = production();
        let mut annotations = production_annotations();
        annotations.remove("alb.ingress.kubernetes.io/scheme");
        let cluster = FakeCluster::healthy("jarombek-com", annotations);

        let report = Suite::jarombek_com()
            .run(&cluster, &expectations, RunOptions::default())
            .await;

        match outcome_of(&report, "jarombek_com_ingress_annotations") {
            CheckOutcome::Failed(mismatches) => {
                assert!(mismatches.contains(&Mismatch::new("annotation count", 13, 12)));
            }
            other => panic!("expected failure, got {other:?}"),
        }
        // Independent checks still run and pass
        assert_eq!(report.passed(), 9);
        assert_eq!(report.failed(), 1);
    }

    #[tokio::test]
    async fn test_ingress_api_error_aborts_only_ingress_checks() {
        let expectations = production();
        let mut cluster = FakeCluster::healthy("jarombek-com", production_annotations());
        cluster.ingress_error = Some(403);

        let report = Suite::jarombek_com()
            .run(&cluster, &expectations, RunOptions::default())
            .await;

        match outcome_of(&report, "jarombek_com_ingress_annotations") {
            CheckOutcome::Errored(message) => {
                assert!(message.contains("get Ingress jarombek-com/jarombek-com-ingress"));
                assert!(message.contains("request rejected with status 403"));
            }
            other => panic!("expected error, got {other:?}"),
        }
        assert!(matches!(
            outcome_of(&report, "jarombek_com_ingress_exists"),
            CheckOutcome::Errored(_)
        ));
        assert_eq!(report.passed(), 8);
        assert_eq!(report.failed(), 2);
    }

    #[tokio::test]
    async fn test_service_type_and_counts() {
        let expectations = production();
        let mut cluster = FakeCluster::healthy("jarombek-com", production_annotations());
        cluster.insert_service(
            "jarombek-com",
            service("jarombek-com", "jarombek-com", "ClusterIP"),
        );
        cluster.insert_service(
            "jarombek-com",
            service("jarombek-com", "extra", "ClusterIP"),
        );

        let report = Suite::jarombek_com()
            .run(&cluster, &expectations, RunOptions::default())
            .await;

        assert_eq!(
            outcome_of(&report, "jarombek_com_service_exists"),
            &CheckOutcome::Failed(vec![Mismatch::new("spec.type", "NodePort", "ClusterIP")])
        );
        assert_eq!(
            outcome_of(&report, "namespace_service_count"),
            &CheckOutcome::Failed(vec![Mismatch::new("number of Service objects", 2, 3)])
        );
        assert_eq!(
            outcome_of(&report, "namespace_deployment_count"),
            &CheckOutcome::Passed
        );
    }

    #[test]
    fn test_filter_selects_checks_by_name() {
        let suite = Suite::jarombek_com().filtered(Some("database"));
        let names: Vec<&str> = suite.checks().iter().map(|c| c.name).collect();

        assert_eq!(
            names,
            vec![
                "jarombek_com_database_deployment_exists",
                "jarombek_com_database_deployment_error_free",
                "jarombek_com_database_service_exists",
            ]
        );
        assert_eq!(Suite::jarombek_com().filtered(None).checks().len(), 11);
        assert!(Suite::jarombek_com()
            .filtered(Some("nope"))
            .checks()
            .is_empty());
    }

    #[tokio::test]
    async fn test_results_keep_suite_order_when_concurrent() {
        let expectations = production();
        let cluster = FakeCluster::healthy("jarombek-com", production_annotations());

        let report = Suite::jarombek_com()
            .run(&cluster, &expectations, RunOptions::default())
            .await;

        let names: Vec<String> = report.results.iter().map(|r| r.name.clone()).collect();
        let expected: Vec<String> = jarombek_com_checks()
            .iter()
            .map(|c| c.name.to_string())
            .collect();
        assert_eq!(names, expected);
    }

    #[tokio::test]
    async fn test_missing_ingress_errors_annotation_check() {
        let expectations = production();
        let mut cluster = FakeCluster::healthy("jarombek-com", production_annotations());
        cluster.ingresses.clear();

        let report = Suite::jarombek_com()
            .run(&cluster, &expectations, RunOptions::default())
            .await;

        assert_eq!(
            outcome_of(&report, "jarombek_com_ingress_annotations"),
            &CheckOutcome::Errored(
                "Ingress jarombek-com/jarombek-com-ingress not found".to_string()
            )
        );
        assert_eq!(
            outcome_of(&report, "jarombek_com_ingress_exists"),
            &CheckOutcome::Failed(vec![Mismatch::new(
                "Ingress jarombek-com/jarombek-com-ingress",
                "present",
                "absent"
            )])
        );
        assert_eq!(report.passed(), 8);
    }

    #[tokio::test]
    async fn test_stalled_lookup_times_out_without_blocking_other_checks() {
        let expectations = production();
        let cluster = StalledIngress(FakeCluster::healthy(
            "jarombek-com",
            production_annotations(),
        ));
        let options = RunOptions {
            check_timeout: Duration::from_millis(50),
            ..RunOptions::default()
        };

        let report = Suite::jarombek_com()
            .run(&cluster, &expectations, options)
            .await;

        for name in [
            "jarombek_com_ingress_exists",
            "jarombek_com_ingress_annotations",
        ] {
            match outcome_of(&report, name) {
                CheckOutcome::Errored(message) => {
                    assert_eq!(message, &format!("Check '{name}' timed out after 50ms"));
                }
                other => panic!("expected {name} to time out, got {other:?}"),
            }
        }
        assert_eq!(report.passed(), 8);
        assert_eq!(report.skipped(), 1);
        assert_eq!(report.results.len(), 11);
    }
}
