mod credentials;
mod inventory;
mod rules;

pub use credentials::CredentialResolver;
pub use inventory::WorkspaceInventory;
pub use rules::{ActionLookup, AnalyticRuleSource};
