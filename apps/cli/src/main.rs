//! Command-line scanner for Sentinel analytic rules that still use classic
//! automation.

#![forbid(unsafe_code)]

mod cli_args;
mod cli_config;
mod report_output;

use std::process::ExitCode;
use std::sync::Arc;

use chrono::Utc;
use clap::Parser;
use sentinel_detect_application::{CredentialResolver, ScanService, ScanSummary};
use sentinel_detect_core::{AppError, AppResult};
use sentinel_detect_infrastructure::{
    ArmSentinelClient, AzureCliCredential, ChainedCredential, EnvironmentCredential,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::cli_args::Cli;
use crate::cli_config::{CliConfig, CredentialMode};
use crate::report_output::{ERROR_EXIT_STATUS, ScanOutcome, scan_and_render, write_report};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(outcome) => outcome.exit_code(),
        Err(error) => {
            error!(error = %error, "scan aborted");
            eprintln!("\n❌ Error: {error}\n{error:?}");
            ExitCode::from(ERROR_EXIT_STATUS)
        }
    }
}

async fn run(cli: Cli) -> AppResult<ScanOutcome> {
    let config = CliConfig::load(cli)?;

    let http_client = reqwest::Client::builder()
        .timeout(config.http_timeout)
        .build()
        .map_err(|error| AppError::Internal(format!("failed to build HTTP client: {error}")))?;

    info!(
        subscription_id = %config.subscription_id,
        arm_endpoint = %config.arm_endpoint,
        "initializing Azure connection"
    );
    let credential = build_credential(&config, http_client.clone());
    let token = credential.resolve().await?;

    let client = Arc::new(ArmSentinelClient::new(
        http_client,
        config.arm_client_config(),
        token,
    ));
    let scan_service = ScanService::new(client.clone(), client);

    let scan = scan_and_render(&scan_service, &config, Utc::now()).await?;

    match config.output_file.as_deref() {
        Some(path) => {
            write_report(path, scan.report.as_str()).await?;
            info!(path = %path.display(), format = %config.format, "results saved");
        }
        None => println!("{}", scan.report),
    }

    if config.print_summary {
        eprintln!("{}", ScanSummary::from_records(&scan.records).render());
    }

    Ok(scan.outcome())
}

fn build_credential(
    config: &CliConfig,
    http_client: reqwest::Client,
) -> Arc<dyn CredentialResolver> {
    let azure_cli: Arc<dyn CredentialResolver> =
        Arc::new(AzureCliCredential::new(config.management_resource()));

    match config.credential_mode {
        CredentialMode::AzureCli => Arc::new(ChainedCredential::new(vec![azure_cli])),
        CredentialMode::Default => Arc::new(ChainedCredential::new(vec![
            Arc::new(EnvironmentCredential::from_env(
                http_client,
                config.authority_host.clone(),
                config.management_scope(),
            )),
            azure_cli,
        ])),
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
