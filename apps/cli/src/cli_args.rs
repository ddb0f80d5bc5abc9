use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use sentinel_detect_application::ReportFormat;

const EXAMPLES: &str = "\
Examples:
  # Scan all workspaces in a subscription
  sentinel-detect --subscription-id 12345678-1234-1234-1234-123456789012

  # Scan one workspace
  sentinel-detect --subscription-id 12345678-1234-1234-1234-123456789012 \\
                  --resource-group myRG --workspace-name mySentinelWorkspace

  # Save results as JSON or CSV
  sentinel-detect --subscription-id 12345678-1234-1234-1234-123456789012 \\
                  --output-format csv --output-file results.csv

Exit codes: 0 = no rules need migration, 1 = rules need migration, 2 = error.";

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(
    name = "sentinel-detect",
    version,
    about = "Detect Microsoft Sentinel analytic rules using classic automation that need migration",
    after_help = EXAMPLES
)]
pub struct Cli {
    /// Azure subscription ID
    #[arg(long, env = "AZURE_SUBSCRIPTION_ID")]
    pub subscription_id: String,

    /// Resource group to scan; alone it limits workspace discovery to this group
    #[arg(long)]
    pub resource_group: Option<String>,

    /// Sentinel workspace to scan
    #[arg(long, requires = "resource_group")]
    pub workspace_name: Option<String>,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Console)]
    pub output_format: OutputFormat,

    /// Write the report to this file instead of stdout
    #[arg(long, value_name = "FILE")]
    pub output_file: Option<PathBuf>,

    /// Use Azure CLI credentials only
    #[arg(long)]
    pub use_cli_credential: bool,

    /// Emit single-line JSON
    #[arg(long)]
    pub compact: bool,

    /// Print a severity and playbook summary to stderr after the report
    #[arg(long)]
    pub summary: bool,
}

/// Report formats accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable report
    Console,
    /// JSON document
    Json,
    /// CSV table
    Csv,
}

impl From<OutputFormat> for ReportFormat {
    fn from(value: OutputFormat) -> Self {
        match value {
            OutputFormat::Console => Self::Console,
            OutputFormat::Json => Self::Json,
            OutputFormat::Csv => Self::Csv,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use clap::error::ErrorKind;

    use super::{Cli, OutputFormat};

    const SUBSCRIPTION: &str = "12345678-1234-1234-1234-123456789012";

    #[test]
    fn defaults_to_console_output() {
        let cli = Cli::try_parse_from(["sentinel-detect", "--subscription-id", SUBSCRIPTION])
            .unwrap_or_else(|_| unreachable!());

        assert_eq!(cli.output_format, OutputFormat::Console);
        assert!(cli.output_file.is_none());
        assert!(!cli.use_cli_credential);
    }

    #[test]
    fn workspace_name_requires_resource_group() {
        let result = Cli::try_parse_from([
            "sentinel-detect",
            "--subscription-id",
            SUBSCRIPTION,
            "--workspace-name",
            "ws",
        ]);

        assert!(matches!(
            result.map_err(|error| error.kind()),
            Err(ErrorKind::MissingRequiredArgument)
        ));
    }

    #[test]
    fn rejects_unknown_output_format() {
        let result = Cli::try_parse_from([
            "sentinel-detect",
            "--subscription-id",
            SUBSCRIPTION,
            "--output-format",
            "xml",
        ]);

        assert!(result.is_err());
    }

    #[test]
    fn parses_full_single_workspace_invocation() {
        let cli = Cli::try_parse_from([
            "sentinel-detect",
            "--subscription-id",
            SUBSCRIPTION,
            "--resource-group",
            "rg",
            "--workspace-name",
            "ws",
            "--output-format",
            "json",
            "--output-file",
            "results.json",
            "--use-cli-credential",
        ])
        .unwrap_or_else(|_| unreachable!());

        assert_eq!(cli.workspace_name.as_deref(), Some("ws"));
        assert_eq!(cli.output_format, OutputFormat::Json);
        assert!(cli.use_cli_credential);
    }
}
