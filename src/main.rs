// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use jarombek_com_smoke::{
    cluster::{connect, ClientOptions, KubeReader},
    constants::{
        DEFAULT_CHECK_TIMEOUT_SECS, DEFAULT_MAX_RETRY_SECS, TEST_ENV_VAR, TOKIO_WORKER_THREADS,
    },
    environment::{read_indicator, ExpectationSet, TargetEnvironment},
    suite::{RunOptions, Suite},
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Smoke tests for the jarombek.com Kubernetes deployment.
///
/// The target environment is read from `TEST_ENV`: `dev` checks the
/// development namespace, anything else checks production.
#[derive(Debug, Parser)]
#[command(name = "jarombek-com-smoke", version, about)]
struct Cli {
    /// Path to a kubeconfig file (defaults to KUBECONFIG or ~/.kube/config)
    #[arg(long, value_name = "PATH")]
    kubeconfig: Option<PathBuf>,

    /// Use the pod service account instead of a kubeconfig
    #[arg(long)]
    in_cluster: bool,

    /// Only run checks whose name contains this substring
    #[arg(long, value_name = "SUBSTR")]
    filter: Option<String>,

    /// Print the selected checks and exit without contacting the cluster
    #[arg(long)]
    list: bool,

    /// Run checks one after another
    #[arg(long)]
    sequential: bool,

    /// Time limit for each check, in seconds
    #[arg(long, value_name = "N", default_value_t = DEFAULT_CHECK_TIMEOUT_SECS)]
    check_timeout_secs: u64,

    /// Total time spent retrying a transient API error, in seconds
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_RETRY_SECS)]
    max_retry_secs: u64,

    /// Report format written to stdout
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

impl Cli {
    fn client_options(&self) -> ClientOptions {
        ClientOptions {
            kubeconfig: self.kubeconfig.clone(),
            in_cluster: self.in_cluster,
        }
    }

    fn run_options(&self) -> RunOptions {
        RunOptions {
            concurrent: !self.sequential,
            check_timeout: Duration::from_secs(self.check_timeout_secs),
        }
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(TOKIO_WORKER_THREADS)
        .thread_name("jarombek-com-smoke")
        .enable_all()
        .build()?;

    runtime.block_on(async_main(cli))
}

fn init_logging() {
    // Respects RUST_LOG if set, otherwise defaults to INFO level
    // Respects RUST_LOG_FORMAT=json for JSON output
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let log_format = std::env::var("RUST_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    // Logs go to stderr so the report on stdout stays parseable
    match log_format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .with_writer(std::io::stderr)
                .json()
                .init();
        }
        _ => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .with_writer(std::io::stderr)
                .with_ansi(true)
                .compact()
                .init();
        }
    }
}

/// Resolve the target environment, warning when `TEST_ENV` holds a value
/// that is neither a development nor a production indicator.
fn resolve_environment() -> TargetEnvironment {
    let indicator = read_indicator();

    if let Some(value) = indicator.as_deref() {
        if !value.is_empty() && !TargetEnvironment::is_recognized_indicator(value) {
            warn!(
                variable = TEST_ENV_VAR,
                value, "Unrecognized environment indicator, defaulting to production"
            );
        }
    }

    TargetEnvironment::from_indicator(indicator.as_deref())
}

async fn async_main(cli: Cli) -> Result<ExitCode> {
    init_logging();

    let suite = Suite::jarombek_com().filtered(cli.filter.as_deref());

    if cli.list {
        for check in suite.checks() {
            match check.skip {
                Some(reason) => println!("{} (skipped: {reason})", check.name),
                None => println!("{}", check.name),
            }
        }
        return Ok(ExitCode::SUCCESS);
    }

    let environment = resolve_environment();
    let expectations = ExpectationSet::for_environment(environment)
        .context("Failed to build expectations for the target environment")?;

    info!(
        environment = %expectations.environment,
        namespace = %expectations.namespace,
        "Starting jarombek.com smoke tests"
    );

    debug!("Initializing Kubernetes client");
    let client = connect(&cli.client_options())
        .await
        .context("Failed to acquire a Kubernetes client")?;
    debug!("Kubernetes client initialized successfully");

    let reader = KubeReader::with_retry_budget(client, Duration::from_secs(cli.max_retry_secs));

    let report = suite.run(&reader, &expectations, cli.run_options()).await;

    match cli.output {
        OutputFormat::Text => print!("{}", report.render_text()),
        OutputFormat::Json => println!(
            "{}",
            report
                .render_json()
                .context("Failed to serialize the report")?
        ),
    }

    info!(
        passed = report.passed(),
        failed = report.failed(),
        skipped = report.skipped(),
        "Smoke tests finished"
    );

    Ok(ExitCode::from(report.exit_code()))
}
