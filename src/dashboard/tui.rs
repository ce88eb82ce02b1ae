//! Full-screen dashboard for `dmboard watch`
//!
//! Renders the same report as `dmboard show`. Data is only reloaded when the
//! user presses `r`.

use std::future::Future;
use std::io::{self, Stdout};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Cell, Paragraph, Row, Table};
use ratatui::{Frame, Terminal};

use super::display::{bar_length, format_thousands, progress_bar};
use super::summary::{AccountView, ActivityStatus, Report};

const POLL_INTERVAL: Duration = Duration::from_millis(200);

struct App {
    report: Report,
    message: Option<String>,
    running: bool,
}

impl App {
    fn new(report: Report) -> Self {
        let message = status_message(&report);
        Self {
            report,
            message,
            running: true,
        }
    }

    fn replace(&mut self, report: Report) {
        self.message = status_message(&report).or_else(|| Some("Refreshed".to_string()));
        self.report = report;
    }
}

fn status_message(report: &Report) -> Option<String> {
    match report.warnings.len() {
        0 => None,
        1 => Some(format!("Warning: {}", report.warnings[0])),
        n => Some(format!("Warning: {} (+{} more)", report.warnings[0], n - 1)),
    }
}

type Term = Terminal<CrosstermBackend<Stdout>>;

/// Run the interactive dashboard until the user quits
///
/// `reload` is awaited once up front and again on every refresh.
#[cfg(not(tarpaulin_include))]
pub async fn run<F, Fut>(mut reload: F) -> Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Report>,
{
    let mut app = App::new(reload().await);

    enable_raw_mode().context("Failed to enable raw mode")?;
    io::stdout()
        .execute(EnterAlternateScreen)
        .context("Failed to enter alternate screen")?;

    let result = match Terminal::new(CrosstermBackend::new(io::stdout())) {
        Ok(mut terminal) => event_loop(&mut terminal, &mut app, &mut reload).await,
        Err(e) => Err(e).context("Failed to create terminal"),
    };

    disable_raw_mode().context("Failed to disable raw mode")?;
    io::stdout()
        .execute(LeaveAlternateScreen)
        .context("Failed to leave alternate screen")?;

    result
}

#[cfg(not(tarpaulin_include))]
async fn event_loop<F, Fut>(terminal: &mut Term, app: &mut App, reload: &mut F) -> Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Report>,
{
    while app.running {
        terminal.draw(|f| draw(f, app))?;

        if !event::poll(POLL_INTERVAL)? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => app.running = false,
            KeyCode::Char('r') => {
                app.message = Some("Refreshing...".to_string());
                terminal.draw(|f| draw(f, app))?;
                let report = reload().await;
                app.replace(report);
            }
            _ => {}
        }
    }
    Ok(())
}

fn status_style(status: ActivityStatus) -> Style {
    match status {
        ActivityStatus::Active => Style::default().fg(Color::Green),
        ActivityStatus::Inactive => Style::default().fg(Color::Red),
    }
}

fn draw(f: &mut Frame, app: &App) {
    let [header, tiles, body, lifetime, status, keys] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(3),
        Constraint::Min(6),
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .areas(f.area());

    let report = &app.report;

    let title = Paragraph::new(vec![
        Line::from(Span::styled(
            "Today's Twitter Activity",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!(
                "{}  ({}, {})",
                report.local_time.format("%A, %B %d, %Y at %H:%M"),
                report.origin,
                report.timezone
            ),
            Style::default().fg(Color::DarkGray),
        )),
    ]);
    f.render_widget(title, header);

    if report.is_empty() {
        let empty = Paragraph::new("No usage data found.").block(Block::bordered());
        f.render_widget(empty, body);
    } else {
        draw_tiles(f, tiles, report);
        let [chart, cards] =
            Layout::horizontal([Constraint::Percentage(35), Constraint::Percentage(65)])
                .areas(body);
        draw_chart(f, chart, &report.accounts);
        draw_cards(f, cards, &report.accounts);
        draw_lifetime(f, lifetime, report);
    }

    let msg = Paragraph::new(app.message.as_deref().unwrap_or(""))
        .block(Block::bordered().title(" Status "));
    f.render_widget(msg, status);

    let help = Paragraph::new(format!(
        " q:quit  r:refresh    Last updated {}",
        report.local_time.format("%H:%M:%S")
    ))
    .style(Style::default().fg(Color::DarkGray));
    f.render_widget(help, keys);
}

fn tile(f: &mut Frame, area: Rect, label: &str, value: String) {
    let widget = Paragraph::new(Span::styled(
        value,
        Style::default().add_modifier(Modifier::BOLD),
    ))
    .centered()
    .block(Block::bordered().title(format!(" {} ", label)));
    f.render_widget(widget, area);
}

fn draw_tiles(f: &mut Frame, area: Rect, report: &Report) {
    let [total, active, avg] = Layout::horizontal([Constraint::Ratio(1, 3); 3]).areas(area);
    let summary = &report.summary;
    tile(f, total, "Total DMs Today", summary.total_dms_today.to_string());
    tile(f, active, "Active Accounts", summary.active_accounts_today.to_string());
    tile(
        f,
        avg,
        "Avg per Active",
        format!("{:.1}", summary.avg_dms_per_active),
    );
}

fn draw_chart(f: &mut Frame, area: Rect, accounts: &[AccountView]) {
    let max = accounts.iter().map(|a| a.dms_sent_today).max().unwrap_or(0);
    let name_width = accounts
        .iter()
        .map(|a| a.account_name.chars().count())
        .max()
        .unwrap_or(0);
    // Borders, name column, separator and count
    let bar_width = (area.width as usize).saturating_sub(name_width + 8).max(1);

    let lines: Vec<Line> = accounts
        .iter()
        .map(|a| {
            Line::from(vec![
                Span::raw(format!("{:<width$} ", a.account_name, width = name_width)),
                Span::styled(
                    "█".repeat(bar_length(a.dms_sent_today, max, bar_width)),
                    status_style(a.status),
                ),
                Span::raw(format!(" {}", a.dms_sent_today)),
            ])
        })
        .collect();

    let chart = Paragraph::new(lines).block(Block::bordered().title(" Activity by Account "));
    f.render_widget(chart, area);
}

fn draw_cards(f: &mut Frame, area: Rect, accounts: &[AccountView]) {
    let rows: Vec<Row> = accounts
        .iter()
        .map(|a| {
            let name = if a.stale {
                format!("{} (stale)", a.account_name)
            } else {
                a.account_name.clone()
            };
            Row::new(vec![
                Cell::from(name).style(status_style(a.status).add_modifier(Modifier::BOLD)),
                Cell::from(a.dms_sent_today.to_string()).style(status_style(a.status)),
                Cell::from(format!(
                    "{} {:>3.0}% ({}/{})",
                    progress_bar(a.progress_pct),
                    a.progress_pct,
                    a.dms_sent_today,
                    a.current_period_limit
                )),
                Cell::from(a.last_active.clone().unwrap_or_else(|| "-".to_string())),
                Cell::from(format_thousands(a.total_dms_sent))
                    .style(Style::default().fg(Color::Cyan)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Min(16),
        Constraint::Length(5),
        Constraint::Length(26),
        Constraint::Length(11),
        Constraint::Length(10),
    ];

    let header = Row::new(vec!["Account", "Today", "Progress", "Last Active", "Lifetime"])
        .style(Style::default().fg(Color::DarkGray));

    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::bordered().title(" Account Performance Today "));
    f.render_widget(table, area);
}

fn draw_lifetime(f: &mut Frame, area: Rect, report: &Report) {
    let summary = &report.summary;
    let mut text = format!(
        "Accounts: {}   Lifetime DMs: {}   Avg per Account: {:.0}   Active Now: {}",
        summary.total_accounts,
        format_thousands(summary.total_dms_lifetime),
        summary.avg_lifetime_per_account,
        summary.active_accounts_today,
    );
    if summary.inactive_accounts > 0 {
        text.push_str(&format!("   Inactive: {}", summary.inactive_accounts));
    }

    let widget = Paragraph::new(text).block(Block::bordered().title(" Lifetime Overview "));
    f.render_widget(widget, area);
}
