//! Synthetic usage records for when no real data source is available

use chrono::{DateTime, Duration, Utc};
use rand::Rng;

use super::today::TodayPolicy;
use super::types::{LastUsed, UsageRecord};

/// Daily limit given to every sample account
pub const SAMPLE_PERIOD_LIMIT: u64 = 20;

/// Activity tier of a sample account
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    High,
    Medium,
    Low,
}

impl Tier {
    pub fn for_account(id: u32) -> Self {
        match id {
            3 | 13 => Tier::High,
            17 | 18 => Tier::Medium,
            _ => Tier::Low,
        }
    }

    /// Upper bound (inclusive) for DMs sent today
    pub fn max_daily(self) -> u64 {
        match self {
            Tier::High => 25,
            Tier::Medium => 15,
            Tier::Low => 8,
        }
    }
}

/// Generate one record per account id, named `"<prefix> <id>"`
pub fn generate<R: Rng + ?Sized>(
    rng: &mut R,
    accounts: &[u32],
    prefix: &str,
    policy: &TodayPolicy,
    now: DateTime<Utc>,
) -> Vec<UsageRecord> {
    let today = policy.date_of(now).format("%Y-%m-%d").to_string();

    accounts
        .iter()
        .map(|&id| {
            let dms_today = rng.gen_range(0..=Tier::for_account(id).max_daily());

            let since = if dms_today > 0 {
                Duration::minutes(rng.gen_range(5..=120))
            } else {
                Duration::hours(rng.gen_range(2..=24))
            };

            UsageRecord {
                account_name: format!("{} {}", prefix, id),
                total_dms_sent: rng.gen_range(50..=500),
                dms_sent_today: dms_today,
                last_used: LastUsed::At((now - since).fixed_offset()),
                current_period_limit: SAMPLE_PERIOD_LIMIT,
                today_date: Some(today.clone()),
            }
        })
        .collect()
}
