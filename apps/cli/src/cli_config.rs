use std::env;
use std::path::PathBuf;
use std::time::Duration;

use sentinel_detect_application::{RenderOptions, ReportFormat, ScanTarget};
use sentinel_detect_core::{AppError, AppResult, SubscriptionId};
use sentinel_detect_infrastructure::ArmClientConfig;
use url::Url;

use crate::cli_args::Cli;

const DEFAULT_ARM_ENDPOINT: &str = "https://management.azure.com";
const DEFAULT_AUTHORITY_HOST: &str = "https://login.microsoftonline.com";
const DEFAULT_RESOURCES_API_VERSION: &str = "2021-04-01";
const DEFAULT_SECURITY_INSIGHTS_API_VERSION: &str = "2024-09-01";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Which credential source resolves the management token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialMode {
    /// Environment first, then the Azure CLI.
    Default,
    /// Azure CLI only.
    AzureCli,
}

#[derive(Debug, Clone)]
pub struct CliConfig {
    pub subscription_id: SubscriptionId,
    pub target: ScanTarget,
    pub inventory_resource_group: Option<String>,
    pub format: ReportFormat,
    pub render_options: RenderOptions,
    pub output_file: Option<PathBuf>,
    pub print_summary: bool,
    pub credential_mode: CredentialMode,
    pub arm_endpoint: Url,
    pub authority_host: Url,
    pub http_timeout: Duration,
    pub resources_api_version: String,
    pub security_insights_api_version: String,
}

impl CliConfig {
    pub fn load(cli: Cli) -> AppResult<Self> {
        Self::load_with(cli, |name| env::var(name).ok())
    }

    pub fn load_with(cli: Cli, lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let subscription_id = cli.subscription_id.parse::<SubscriptionId>()?;

        let resource_group = non_blank(cli.resource_group);
        let workspace_name = non_blank(cli.workspace_name);
        let (target, inventory_resource_group) = match (resource_group, workspace_name) {
            (Some(resource_group), Some(workspace_name)) => (
                ScanTarget::Workspace {
                    resource_group,
                    workspace_name,
                },
                None,
            ),
            (resource_group, None) => (ScanTarget::AllWorkspaces, resource_group),
            (None, Some(_)) => {
                return Err(AppError::Validation(
                    "--workspace-name requires --resource-group".to_owned(),
                ));
            }
        };

        let arm_endpoint = parse_url_env(
            &lookup,
            "SENTINEL_DETECT_ARM_ENDPOINT",
            DEFAULT_ARM_ENDPOINT,
        )?;
        let authority_host = parse_url_env(
            &lookup,
            "SENTINEL_DETECT_AUTHORITY_HOST",
            DEFAULT_AUTHORITY_HOST,
        )?;
        let http_timeout_secs = parse_env_u64(
            &lookup,
            "SENTINEL_DETECT_HTTP_TIMEOUT_SECS",
            DEFAULT_HTTP_TIMEOUT_SECS,
        )?;
        if http_timeout_secs == 0 {
            return Err(AppError::Validation(
                "SENTINEL_DETECT_HTTP_TIMEOUT_SECS must be greater than zero".to_owned(),
            ));
        }

        let resources_api_version = lookup("SENTINEL_DETECT_RESOURCES_API_VERSION")
            .and_then(|value| non_blank(Some(value)))
            .unwrap_or_else(|| DEFAULT_RESOURCES_API_VERSION.to_owned());
        let security_insights_api_version = lookup("SENTINEL_DETECT_SECURITY_INSIGHTS_API_VERSION")
            .and_then(|value| non_blank(Some(value)))
            .unwrap_or_else(|| DEFAULT_SECURITY_INSIGHTS_API_VERSION.to_owned());

        Ok(Self {
            subscription_id,
            target,
            inventory_resource_group,
            format: cli.output_format.into(),
            render_options: RenderOptions {
                compact_json: cli.compact,
            },
            output_file: cli.output_file,
            print_summary: cli.summary,
            credential_mode: if cli.use_cli_credential {
                CredentialMode::AzureCli
            } else {
                CredentialMode::Default
            },
            arm_endpoint,
            authority_host,
            http_timeout: Duration::from_secs(http_timeout_secs),
            resources_api_version,
            security_insights_api_version,
        })
    }

    pub fn arm_client_config(&self) -> ArmClientConfig {
        ArmClientConfig {
            endpoint: self.arm_endpoint.clone(),
            subscription_id: self.subscription_id,
            inventory_resource_group: self.inventory_resource_group.clone(),
            resources_api_version: self.resources_api_version.clone(),
            security_insights_api_version: self.security_insights_api_version.clone(),
        }
    }

    /// Resource the Azure CLI issues tokens for, e.g. `https://management.azure.com/`.
    pub fn management_resource(&self) -> String {
        let endpoint = self.arm_endpoint.as_str().trim_end_matches('/');
        format!("{endpoint}/")
    }

    /// OAuth scope for client-credential token requests.
    pub fn management_scope(&self) -> String {
        format!("{}.default", self.management_resource())
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

fn parse_url_env(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: &str,
) -> AppResult<Url> {
    let value = lookup(name)
        .and_then(|value| non_blank(Some(value)))
        .unwrap_or_else(|| default.to_owned());

    Url::parse(value.as_str()).map_err(|error| {
        AppError::Validation(format!("invalid {name} value '{value}': {error}"))
    })
}

fn parse_env_u64(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: u64,
) -> AppResult<u64> {
    match lookup(name) {
        Some(value) => value.trim().parse::<u64>().map_err(|error| {
            AppError::Validation(format!("invalid {name} value '{value}': {error}"))
        }),
        None => Ok(default),
    }
}
