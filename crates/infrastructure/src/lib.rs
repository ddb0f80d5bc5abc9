//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod arm_sentinel_client;
mod azure_cli_credential;
mod chained_credential;
mod environment_credential;

pub use arm_sentinel_client::{ArmClientConfig, ArmSentinelClient};
pub use azure_cli_credential::AzureCliCredential;
pub use chained_credential::ChainedCredential;
pub use environment_credential::{ClientSecretSettings, EnvironmentCredential};
