//! DM activity dashboard
//!
//! Resolves per-account usage records (Google Drive, or sample data when
//! Drive is unavailable), aggregates them and renders the result.
//!
//! # CLI Usage
//! Use the `cmd_*` functions for CLI commands that format and print output.
//!
//! # Programmatic Usage
//! [`load_report`] returns a typed [`Report`] and never prints.

mod config;
mod display;
mod sample;
mod service;
mod summary;
mod today;
mod tui;
mod types;

use anyhow::Result;
use chrono::Utc;
use tracing::debug;

use config::DashboardConfig;
use summary::Report;
use today::TodayPolicy;
use types::OutputFormat;

use crate::drive::{self, DriveClient, DriveConfig};

// ============================================================================
// Reusable functions - return typed data, never print
// ============================================================================

/// Settings for one load, plus the fallbacks taken while reading them
struct Settings {
    drive: DriveConfig,
    dashboard: DashboardConfig,
    policy: TodayPolicy,
    warnings: Vec<String>,
}

fn settings_from(drive: Result<DriveConfig>, dashboard: Result<DashboardConfig>) -> Settings {
    let mut warnings = Vec::new();

    let drive = drive.unwrap_or_else(|e| {
        service::push_warning(
            &mut warnings,
            format!("Failed to load drive settings, using defaults: {:#}", e),
        );
        DriveConfig::default()
    });
    let dashboard = dashboard.unwrap_or_else(|e| {
        service::push_warning(
            &mut warnings,
            format!("Failed to load dashboard settings, using defaults: {:#}", e),
        );
        DashboardConfig::default()
    });
    let policy = dashboard.today_policy().unwrap_or_else(|e| {
        service::push_warning(&mut warnings, format!("{:#}, using local time", e));
        TodayPolicy::Local
    });

    Settings {
        drive,
        dashboard,
        policy,
        warnings,
    }
}

fn load_settings() -> Settings {
    settings_from(drive::load_config(), config::load_config())
}

/// Authenticated Drive client, if credentials are present and usable
///
/// Missing or broken credentials are not a problem worth reporting: the
/// dashboard just shows sample data.
async fn drive_client(drive: &DriveConfig) -> Option<DriveClient> {
    let Some(source) = drive::credentials_from_env(drive) else {
        debug!("no Google credentials found");
        return None;
    };

    match drive::connect(&source).await {
        Ok(client) => Some(client),
        Err(e) => {
            debug!(credentials = %source, "could not connect to Google Drive: {:#}", e);
            None
        }
    }
}

/// Load one complete report
///
/// Never fails: problems end in a warning, sample data, or both.
pub async fn load_report(force_sample: bool) -> Report {
    let Settings {
        drive,
        dashboard,
        policy,
        mut warnings,
    } = load_settings();
    let now = Utc::now();

    let client = if force_sample {
        None
    } else {
        drive_client(&drive).await
    };

    let mut dataset =
        service::resolve_records(client.as_ref(), &drive, &dashboard, &policy, now).await;
    warnings.append(&mut dataset.warnings);
    dataset.warnings = warnings;

    summary::build_report(dataset, &policy, now)
}

// ============================================================================
// CLI command handlers - load, format and print
// ============================================================================

/// Render the dashboard once
#[cfg(not(tarpaulin_include))]
pub async fn cmd_show(json: bool, sample: bool) -> Result<()> {
    let report = load_report(sample).await;
    display::output_report(&report, OutputFormat::from_json_flag(json))
}

/// Interactive dashboard, refreshed on demand
#[cfg(not(tarpaulin_include))]
pub async fn cmd_watch(sample: bool) -> Result<()> {
    tui::run(|| load_report(sample)).await
}

/// Print raw sample records
#[cfg(not(tarpaulin_include))]
pub fn cmd_sample(json: bool) -> Result<()> {
    let settings = load_settings();
    display::output_warnings(&settings.warnings);
    let records = service::sample_records(
        &settings.drive,
        &settings.dashboard,
        &settings.policy,
        Utc::now(),
    );
    display::output_records(&records, OutputFormat::from_json_flag(json))
}

/// Show config status
#[cfg(not(tarpaulin_include))]
pub fn cmd_config(json: bool) -> Result<()> {
    let settings = load_settings();
    display::output_warnings(&settings.warnings);
    let credentials = drive::credentials_from_env(&settings.drive);
    display::output_config_status(
        &settings.drive,
        &settings.dashboard,
        credentials.as_ref(),
        OutputFormat::from_json_flag(json),
    )
}
