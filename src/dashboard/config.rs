//! Dashboard configuration
//!
//! Loads the `[dashboard]` section of `~/.config/dmboard/settings.toml`

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::today::TodayPolicy;
use crate::util::config as settings;

/// Account ids used for sample data
pub const DEFAULT_SAMPLE_ACCOUNTS: [u32; 6] = [3, 5, 13, 17, 18, 24];

/// Dashboard configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// IANA timezone deciding what "today" means (machine local when unset)
    pub timezone: Option<String>,
    /// Account ids to synthesize when no real data is available
    ///
    /// Read through [`DashboardConfig::sample_ids`].
    pub sample_accounts: Vec<u32>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            timezone: None,
            sample_accounts: DEFAULT_SAMPLE_ACCOUNTS.to_vec(),
        }
    }
}

impl DashboardConfig {
    /// Configured sample ids, or the defaults when the list is empty
    pub fn sample_ids(&self) -> &[u32] {
        if self.sample_accounts.is_empty() {
            &DEFAULT_SAMPLE_ACCOUNTS
        } else {
            &self.sample_accounts
        }
    }

    /// Resolve the today policy from the configured timezone
    pub fn today_policy(&self) -> Result<TodayPolicy> {
        match self.timezone.as_deref() {
            Some(name) if !name.trim().is_empty() => TodayPolicy::parse(name),
            _ => Ok(TodayPolicy::Local),
        }
    }
}

/// Load dashboard config from settings file and environment
pub fn load_config() -> Result<DashboardConfig> {
    let mut config: DashboardConfig = settings::load_section("dashboard")?;
    if let Ok(tz) = std::env::var("DMBOARD_TIMEZONE") {
        config.timezone = Some(tz);
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_has_six_sample_accounts() {
        let config = DashboardConfig::default();
        assert_eq!(config.sample_accounts, vec![3, 5, 13, 17, 18, 24]);
        assert!(config.timezone.is_none());
    }

    #[test]
    fn parses_section() {
        let toml = "[dashboard]\ntimezone = \"Asia/Tokyo\"\nsample_accounts = [1, 2]\n";
        let config: DashboardConfig = settings::parse_section(toml, "dashboard").unwrap();
        assert_eq!(config.timezone.as_deref(), Some("Asia/Tokyo"));
        assert_eq!(config.sample_accounts, vec![1, 2]);
    }

    #[test]
    fn sample_ids_fall_back_when_empty() {
        let config: DashboardConfig =
            settings::parse_section("[dashboard]\nsample_accounts = []\n", "dashboard").unwrap();
        assert_eq!(config.sample_ids(), &DEFAULT_SAMPLE_ACCOUNTS);

        let custom = DashboardConfig {
            sample_accounts: vec![7],
            ..DashboardConfig::default()
        };
        assert_eq!(custom.sample_ids(), &[7]);
    }

    #[test]
    fn today_policy_defaults_to_local() {
        let config = DashboardConfig::default();
        assert_eq!(config.today_policy().unwrap(), TodayPolicy::Local);

        let blank = DashboardConfig {
            timezone: Some(" ".into()),
            ..DashboardConfig::default()
        };
        assert_eq!(blank.today_policy().unwrap(), TodayPolicy::Local);
    }

    #[test]
    fn today_policy_from_zone() {
        let config = DashboardConfig {
            timezone: Some("Asia/Tokyo".into()),
            ..DashboardConfig::default()
        };
        assert_eq!(
            config.today_policy().unwrap(),
            TodayPolicy::Zone(chrono_tz::Asia::Tokyo)
        );
    }

    #[test]
    fn today_policy_invalid_zone_errors() {
        let config = DashboardConfig {
            timezone: Some("Nowhere/Land".into()),
            ..DashboardConfig::default()
        };
        assert!(config.today_policy().is_err());
    }
}
