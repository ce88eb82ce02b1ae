//! Dashboard service layer - resolves usage records
//!
//! Functions in this module accept trait objects and return typed data.
//! They never print - that's the CLI layer's job. Nothing here returns an
//! error: failures become warnings and, at worst, sample data.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tracing::{debug, info};

use super::config::DashboardConfig;
use super::sample;
use super::today::TodayPolicy;
use super::types::{DataOrigin, Dataset, UsageRecord};
use crate::drive::{DriveApi, DriveConfig};

/// Decode one stats file and stamp it with its folder name
pub fn parse_record(bytes: &[u8], folder_name: &str) -> Result<UsageRecord> {
    let text = std::str::from_utf8(bytes).context("File is not valid UTF-8")?;
    let mut record: UsageRecord = serde_json::from_str(text).context("Invalid usage stats JSON")?;
    record.account_name = folder_name.to_string();
    Ok(record)
}

/// Fetch one record per matching account folder
///
/// A folder whose stats cannot be read is skipped with a warning.
pub async fn fetch_drive_records(
    api: &impl DriveApi,
    config: &DriveConfig,
    warnings: &mut Vec<String>,
) -> Vec<UsageRecord> {
    let root = match api.find_folder(&config.root_folder).await {
        Ok(Some(root)) => root,
        Ok(None) => {
            push_warning(
                warnings,
                format!("Parent folder '{}' not found", config.root_folder),
            );
            return Vec::new();
        }
        Err(e) => {
            push_warning(warnings, format!("Error finding folders: {:#}", e));
            return Vec::new();
        }
    };

    let folders = match api
        .list_child_folders(&root.id, &config.folder_pattern)
        .await
    {
        Ok(folders) => folders,
        Err(e) => {
            push_warning(warnings, format!("Error finding folders: {:#}", e));
            return Vec::new();
        }
    };

    info!(count = folders.len(), root = %root.name, "found account folders");

    let mut records = Vec::with_capacity(folders.len());
    for folder in &folders {
        match fetch_folder_record(api, &folder.id, &folder.name, &config.stats_file).await {
            Ok(Some(record)) => records.push(record),
            Ok(None) => {}
            Err(e) => push_warning(
                warnings,
                format!("Could not read usage stats for {}: {:#}", folder.name, e),
            ),
        }
    }
    records
}

async fn fetch_folder_record(
    api: &impl DriveApi,
    folder_id: &str,
    folder_name: &str,
    stats_file: &str,
) -> Result<Option<UsageRecord>> {
    let Some(file) = api.find_child_file(folder_id, stats_file).await? else {
        return Ok(None);
    };
    let bytes = api.download(&file.id).await?;
    parse_record(&bytes, folder_name).map(Some)
}

/// Record a user-visible warning for this load
pub fn push_warning(warnings: &mut Vec<String>, message: String) {
    debug!(%message, "load warning");
    warnings.push(message);
}

/// Resolve the records for one load
///
/// Uses Drive when a client is available and it returns anything, sample
/// data otherwise.
pub async fn resolve_records<A: DriveApi>(
    api: Option<&A>,
    drive: &DriveConfig,
    dashboard: &DashboardConfig,
    policy: &TodayPolicy,
    now: DateTime<Utc>,
) -> Dataset {
    let mut warnings = Vec::new();

    if let Some(api) = api {
        let records = fetch_drive_records(api, drive, &mut warnings).await;
        if !records.is_empty() {
            return Dataset {
                records,
                origin: DataOrigin::Drive,
                warnings,
            };
        }
        info!("no usage records in Drive, using sample data");
    }

    Dataset {
        records: sample_records(drive, dashboard, policy, now),
        origin: DataOrigin::Sample,
        warnings,
    }
}

/// Sample data named after the configured folder pattern
pub fn sample_records(
    drive: &DriveConfig,
    dashboard: &DashboardConfig,
    policy: &TodayPolicy,
    now: DateTime<Utc>,
) -> Vec<UsageRecord> {
    sample::generate(
        &mut rand::thread_rng(),
        dashboard.sample_ids(),
        &drive.folder_pattern,
        policy,
        now,
    )
}
