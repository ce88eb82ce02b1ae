//! Daily aggregates and per-account display values
//!
//! Pure functions over a slice of records; no I/O happens here.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;

use super::today::TodayPolicy;
use super::types::{DataOrigin, Dataset, UsageRecord};

/// Aggregates across all accounts
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DailySummary {
    pub total_accounts: usize,
    pub total_dms_today: u64,
    pub active_accounts_today: usize,
    pub inactive_accounts: usize,
    /// 0 when no account is active
    pub avg_dms_per_active: f64,
    pub total_dms_lifetime: u64,
    /// 0 when there are no accounts
    pub avg_lifetime_per_account: f64,
}

/// Counts come from external files, so totals stop at `u64::MAX`
fn saturating_sum(values: impl Iterator<Item = u64>) -> u64 {
    values.fold(0, u64::saturating_add)
}

pub fn summarize(records: &[UsageRecord]) -> DailySummary {
    let total_accounts = records.len();
    let total_dms_today = saturating_sum(records.iter().map(|r| r.dms_sent_today));
    let active_accounts_today = records.iter().filter(|r| r.dms_sent_today > 0).count();
    let total_dms_lifetime = saturating_sum(records.iter().map(|r| r.total_dms_sent));

    let avg_dms_per_active = if active_accounts_today > 0 {
        total_dms_today as f64 / active_accounts_today as f64
    } else {
        0.0
    };

    let avg_lifetime_per_account = if total_accounts > 0 {
        total_dms_lifetime as f64 / total_accounts as f64
    } else {
        0.0
    };

    DailySummary {
        total_accounts,
        total_dms_today,
        active_accounts_today,
        inactive_accounts: total_accounts - active_accounts_today,
        avg_dms_per_active,
        total_dms_lifetime,
        avg_lifetime_per_account,
    }
}

/// Most active first; ties keep their input order
pub fn sort_by_today(records: &mut [UsageRecord]) {
    records.sort_by(|a, b| b.dms_sent_today.cmp(&a.dms_sent_today));
}

/// Share of the daily limit used, clamped to `[0, 100]`
pub fn progress_pct(dms_today: u64, limit: u64) -> f64 {
    if limit == 0 {
        return 0.0;
    }
    (dms_today as f64 / limit as f64 * 100.0).min(100.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityStatus {
    Active,
    Inactive,
}

impl ActivityStatus {
    pub fn of(dms_today: u64) -> Self {
        if dms_today > 0 {
            ActivityStatus::Active
        } else {
            ActivityStatus::Inactive
        }
    }
}

/// What one account card shows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountView {
    pub account_name: String,
    pub dms_sent_today: u64,
    pub total_dms_sent: u64,
    pub current_period_limit: u64,
    pub progress_pct: f64,
    pub status: ActivityStatus,
    /// `HH:MM`, only when the last send happened today
    pub last_active: Option<String>,
    /// Date the today counter applies to
    pub today_date: Option<String>,
    /// `today_date` is not the current date
    pub stale: bool,
}

impl AccountView {
    pub fn new(record: &UsageRecord, policy: &TodayPolicy, now: DateTime<Utc>) -> Self {
        let today = policy.date_of(now);

        let last_active = policy
            .last_used_wall_time(&record.last_used)
            .filter(|wall| wall.date() == today)
            .map(|wall| wall.format("%H:%M").to_string());

        let stale = record
            .today_date
            .as_deref()
            .is_some_and(|date| date != today.format("%Y-%m-%d").to_string());

        Self {
            account_name: record.account_name.clone(),
            dms_sent_today: record.dms_sent_today,
            total_dms_sent: record.total_dms_sent,
            current_period_limit: record.current_period_limit,
            progress_pct: progress_pct(record.dms_sent_today, record.current_period_limit),
            status: ActivityStatus::of(record.dms_sent_today),
            last_active,
            today_date: record.today_date.clone(),
            stale,
        }
    }
}

/// Everything one render pass needs
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    /// Wall-clock time of `generated_at` in the policy zone
    pub local_time: NaiveDateTime,
    pub timezone: String,
    pub origin: DataOrigin,
    pub summary: DailySummary,
    pub accounts: Vec<AccountView>,
    pub warnings: Vec<String>,
}

impl Report {
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

/// Sort, aggregate and derive display values for one dataset
pub fn build_report(dataset: Dataset, policy: &TodayPolicy, now: DateTime<Utc>) -> Report {
    let Dataset {
        mut records,
        origin,
        warnings,
    } = dataset;

    sort_by_today(&mut records);
    let summary = summarize(&records);
    let accounts = records
        .iter()
        .map(|r| AccountView::new(r, policy, now))
        .collect();

    Report {
        generated_at: now,
        local_time: policy.wall_time(now),
        timezone: policy.to_string(),
        origin,
        summary,
        accounts,
        warnings,
    }
}
