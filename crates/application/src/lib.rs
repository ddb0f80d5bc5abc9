//! Application services and ports.

#![forbid(unsafe_code)]

mod report;
mod scan_ports;
mod scan_service;

pub use report::{
    CSV_COLUMNS, NO_RESULTS_CONSOLE, NO_RESULTS_CSV, RenderOptions, ReportEnvelope, ReportFormat,
    ScanSummary, render_console, render_csv, render_json, render_report,
};
pub use scan_ports::{ActionLookup, AnalyticRuleSource, CredentialResolver, WorkspaceInventory};
pub use scan_service::{ScanService, ScanTarget};
