//! Dashboard data types

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

const DEFAULT_ACCOUNT_NAME: &str = "Unknown";
const DEFAULT_PERIOD_LIMIT: u64 = 20;

/// One account's daily and lifetime DM stats, as stored in `usage_stats.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageRecord {
    /// Display identifier (the account folder name when fetched)
    #[serde(default = "default_account_name")]
    pub account_name: String,
    /// Lifetime count
    #[serde(default)]
    pub total_dms_sent: u64,
    /// Count for the current day
    #[serde(default)]
    pub dms_sent_today: u64,
    /// Most recent send event
    #[serde(default)]
    pub last_used: LastUsed,
    /// Soft daily cap, only used for the progress percentage
    #[serde(default = "default_period_limit")]
    pub current_period_limit: u64,
    /// Date (`YYYY-MM-DD`) the today counter applies to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub today_date: Option<String>,
}

fn default_account_name() -> String {
    DEFAULT_ACCOUNT_NAME.to_string()
}

fn default_period_limit() -> u64 {
    DEFAULT_PERIOD_LIMIT
}

/// Last send time: a timestamp or "Never"
#[derive(Debug, Clone, Default, PartialEq)]
pub enum LastUsed {
    #[default]
    Never,
    /// Timestamp carrying an offset (RFC 3339, `Z` allowed)
    At(DateTime<FixedOffset>),
    /// Offset-less ISO 8601 timestamp, read as wall-clock time
    Local(NaiveDateTime),
    /// Unparsable value, kept verbatim
    Unknown(String),
}

impl LastUsed {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("never") {
            return LastUsed::Never;
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
            return LastUsed::At(dt);
        }
        for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
                return LastUsed::Local(naive);
            }
        }
        LastUsed::Unknown(trimmed.to_string())
    }
}

impl fmt::Display for LastUsed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LastUsed::Never => write!(f, "Never"),
            LastUsed::At(dt) => write!(f, "{}", dt.to_rfc3339()),
            LastUsed::Local(naive) => write!(f, "{}", naive.format("%Y-%m-%dT%H:%M:%S%.f")),
            LastUsed::Unknown(raw) => write!(f, "{}", raw),
        }
    }
}

impl Serialize for LastUsed {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for LastUsed {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map(LastUsed::parse).unwrap_or_default())
    }
}

/// Where a dataset came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataOrigin {
    Drive,
    Sample,
}

impl fmt::Display for DataOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataOrigin::Drive => write!(f, "Google Drive"),
            DataOrigin::Sample => write!(f, "sample data"),
        }
    }
}

/// Records from one load, with their origin and non-fatal warnings
#[derive(Debug, Clone)]
pub struct Dataset {
    pub records: Vec<UsageRecord>,
    pub origin: DataOrigin,
    pub warnings: Vec<String>,
}

/// Output format
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl OutputFormat {
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            OutputFormat::Json
        } else {
            OutputFormat::Table
        }
    }
}
