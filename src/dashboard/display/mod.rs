//! Dashboard output formatting

use anyhow::{Context, Result};
use comfy_table::{
    presets::UTF8_FULL_CONDENSED, Attribute, Cell, CellAlignment, Color, ContentArrangement,
    Table,
};
use owo_colors::OwoColorize;

use super::config::DashboardConfig;
use super::summary::{ActivityStatus, AccountView, DailySummary, Report};
use super::types::{OutputFormat, UsageRecord};
use crate::drive::{CredentialSource, DriveConfig};


const CHART_WIDTH: usize = 40;
const PROGRESS_WIDTH: usize = 10;
const NO_DATA: &str = "No usage data found.";

// --- Helper formatting ---

/// Group digits in thousands: `12345` -> `12,345`
pub fn format_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Card color for an activity status
pub fn status_color(status: ActivityStatus) -> Color {
    match status {
        ActivityStatus::Active => Color::Green,
        ActivityStatus::Inactive => Color::Red,
    }
}

/// Fixed-width progress bar for a clamped percentage
pub fn progress_bar(percent: f64) -> String {
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * PROGRESS_WIDTH as f64).round() as usize;
    let empty = PROGRESS_WIDTH.saturating_sub(filled);
    format!("[{}{}]", "█".repeat(filled), "░".repeat(empty))
}

/// Bar length for a chart row, scaled to the largest value
///
/// Any non-zero value gets at least one cell.
pub fn bar_length(value: u64, max: u64, width: usize) -> usize {
    if value == 0 || max == 0 {
        return 0;
    }
    let scaled = (value as f64 / max as f64 * width as f64).round() as usize;
    scaled.clamp(1, width)
}

/// Pad a name to a display width, counting chars
fn pad(s: &str, width: usize) -> String {
    let len = s.chars().count();
    format!("{}{}", s, " ".repeat(width.saturating_sub(len)))
}

// --- Sections ---

fn render_header(report: &Report) -> String {
    format!(
        "{}\n{}  {}\n",
        "Today's Twitter Activity".bold(),
        report
            .local_time
            .format("%A, %B %d, %Y at %H:%M")
            .to_string()
            .dimmed(),
        format!("({})", report.origin).dimmed(),
    )
}

/// "Today's Performance" tiles
pub fn render_summary_tiles(summary: &DailySummary) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Total DMs Today").add_attribute(Attribute::Dim),
            Cell::new("Active Accounts").add_attribute(Attribute::Dim),
            Cell::new("Avg per Active").add_attribute(Attribute::Dim),
        ]);

    table.add_row(vec![
        Cell::new(summary.total_dms_today.to_string())
            .add_attribute(Attribute::Bold)
            .set_alignment(CellAlignment::Center),
        Cell::new(summary.active_accounts_today.to_string())
            .add_attribute(Attribute::Bold)
            .set_alignment(CellAlignment::Center),
        Cell::new(format!("{:.1}", summary.avg_dms_per_active))
            .add_attribute(Attribute::Bold)
            .set_alignment(CellAlignment::Center),
    ]);

    format!("{}\n{table}\n", "Today's Performance".bold())
}

/// Horizontal bar chart of today's DMs, one row per account
pub fn render_chart(accounts: &[AccountView]) -> String {
    let max = accounts.iter().map(|a| a.dms_sent_today).max().unwrap_or(0);
    let name_width = accounts
        .iter()
        .map(|a| a.account_name.chars().count())
        .max()
        .unwrap_or(0);

    let mut out = format!("{}\n", "Today's Activity by Account".bold());
    for account in accounts {
        let bar = "█".repeat(bar_length(account.dms_sent_today, max, CHART_WIDTH));
        let bar = match account.status {
            ActivityStatus::Active => bar.green().to_string(),
            ActivityStatus::Inactive => bar.red().to_string(),
        };
        out.push_str(&format!(
            "  {} │{} {}\n",
            pad(&account.account_name, name_width),
            bar,
            account.dms_sent_today
        ));
    }
    out
}

/// One card row per account
pub fn render_cards(accounts: &[AccountView]) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Account").add_attribute(Attribute::Dim),
            Cell::new("Today").add_attribute(Attribute::Dim),
            Cell::new("Progress").add_attribute(Attribute::Dim),
            Cell::new("Last Active").add_attribute(Attribute::Dim),
            Cell::new("Lifetime").add_attribute(Attribute::Dim),
        ]);

    for account in accounts {
        let color = status_color(account.status);

        let mut name = account.account_name.clone();
        if account.stale {
            if let Some(date) = &account.today_date {
                name.push_str(&format!("\nstale: {}", date));
            }
        }

        table.add_row(vec![
            Cell::new(name).fg(color).add_attribute(Attribute::Bold),
            Cell::new(account.dms_sent_today.to_string())
                .fg(color)
                .add_attribute(Attribute::Bold)
                .set_alignment(CellAlignment::Right),
            Cell::new(format!(
                "{} {:>3.0}% ({}/{})",
                progress_bar(account.progress_pct),
                account.progress_pct,
                account.dms_sent_today,
                account.current_period_limit
            ))
            .fg(color),
            Cell::new(account.last_active.as_deref().unwrap_or("-")),
            Cell::new(format_thousands(account.total_dms_sent))
                .fg(Color::Cyan)
                .set_alignment(CellAlignment::Right),
        ]);
    }

    format!("{}\n{table}\n", "Account Performance Today".bold())
}

/// Lifetime totals
pub fn render_lifetime(summary: &DailySummary) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Total Accounts").add_attribute(Attribute::Dim),
            Cell::new("Lifetime DMs").add_attribute(Attribute::Dim),
            Cell::new("Avg per Account").add_attribute(Attribute::Dim),
        ]);

    table.add_row(vec![
        Cell::new(summary.total_accounts.to_string()).set_alignment(CellAlignment::Center),
        Cell::new(format_thousands(summary.total_dms_lifetime))
            .set_alignment(CellAlignment::Center),
        Cell::new(format!("{:.0}", summary.avg_lifetime_per_account))
            .set_alignment(CellAlignment::Center),
    ]);

    format!("{}\n{table}\n", "Lifetime Overview".bold())
}

/// Last updated time and quick stats
pub fn render_quick_stats(report: &Report) -> String {
    let summary = &report.summary;
    let mut out = format!("{}\n", "Quick Stats".bold());
    out.push_str(&format!(
        "  {} {} {}\n",
        "Last Updated:".dimmed(),
        report.local_time.format("%H:%M:%S"),
        report.local_time.format("%B %d, %Y")
    ));
    out.push_str(&format!(
        "  {} {}\n",
        "Today's Total:".dimmed(),
        summary.total_dms_today
    ));
    out.push_str(&format!(
        "  {} {}\n",
        "Active Now:".dimmed(),
        summary.active_accounts_today
    ));
    if summary.inactive_accounts > 0 {
        out.push_str(&format!(
            "  {} {}\n",
            "Inactive:".dimmed(),
            summary.inactive_accounts
        ));
    }
    out
}

/// Full dashboard, or the no-data message when there are no accounts
pub fn render_report(report: &Report) -> String {
    if report.is_empty() {
        return NO_DATA.to_string();
    }

    [
        render_header(report),
        render_summary_tiles(&report.summary),
        render_chart(&report.accounts),
        render_cards(&report.accounts),
        render_lifetime(&report.summary),
        render_quick_stats(report),
    ]
    .join("\n")
}

// --- Output functions ---

/// Print warnings raised while loading
pub fn output_warnings(warnings: &[String]) {
    for warning in warnings {
        eprintln!("Warning: {}", warning);
    }
}

/// Output the dashboard
pub fn output_report(report: &Report, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            output_warnings(&report.warnings);
            println!("{}", render_report(report));
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(report).context("Failed to serialize report")?;
            println!("{json}");
        }
    }
    Ok(())
}

/// Raw records table
pub fn format_records(records: &[UsageRecord]) -> String {
    if records.is_empty() {
        return NO_DATA.to_string();
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            "Account", "Today", "Lifetime", "Limit", "Last Used", "Date",
        ]);

    for record in records {
        table.add_row(vec![
            Cell::new(&record.account_name).fg(Color::Cyan),
            Cell::new(record.dms_sent_today.to_string()),
            Cell::new(format_thousands(record.total_dms_sent)),
            Cell::new(record.current_period_limit.to_string()),
            Cell::new(record.last_used.to_string()),
            Cell::new(record.today_date.as_deref().unwrap_or("-")),
        ]);
    }

    table.to_string()
}

/// Output raw records
pub fn output_records(records: &[UsageRecord], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            println!("{}", format_records(records));
            println!("\n{} accounts", records.len());
        }
        OutputFormat::Json => {
            let json =
                serde_json::to_string_pretty(records).context("Failed to serialize records")?;
            println!("{json}");
        }
    }
    Ok(())
}

/// Configuration as shown by `dmboard config`
pub fn format_config_status(
    drive: &DriveConfig,
    dashboard: &DashboardConfig,
    credentials: Option<&CredentialSource>,
) -> String {
    let accounts: Vec<String> = dashboard
        .sample_ids()
        .iter()
        .map(|id| id.to_string())
        .collect();

    let lines = [
        "Dashboard Configuration".to_string(),
        "-".repeat(40),
        format!(
            "Credentials:     {}",
            credentials
                .map(|c| c.to_string())
                .unwrap_or_else(|| "Not found (sample data)".to_string())
        ),
        format!("Root folder:     {}", drive.root_folder),
        format!("Folder pattern:  {}", drive.folder_pattern),
        format!("Stats file:      {}", drive.stats_file),
        format!(
            "Timezone:        {}",
            dashboard.timezone.as_deref().unwrap_or("local")
        ),
        format!("Sample accounts: {}", accounts.join(", ")),
    ];
    lines.join("\n")
}

/// Output config status
pub fn output_config_status(
    drive: &DriveConfig,
    dashboard: &DashboardConfig,
    credentials: Option<&CredentialSource>,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", format_config_status(drive, dashboard, credentials)),
        OutputFormat::Json => {
            let json = serde_json::json!({
                "credentials": credentials.map(|c| c.to_string()),
                "drive": drive,
                "dashboard": dashboard,
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
    }
    Ok(())
}
