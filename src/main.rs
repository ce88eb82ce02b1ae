mod cli;
mod dashboard;
mod drive;
mod util;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::{Cli, Command};

fn init_logging(command: &Command) {
    // Anything written while the alternate screen is up corrupts it
    let writer = match command {
        Command::Watch { .. } => BoxMakeWriter::new(std::io::sink),
        _ => BoxMakeWriter::new(std::io::stderr),
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dmboard=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(writer))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or_default();
    init_logging(&command);

    match command {
        Command::Show { json, sample } => dashboard::cmd_show(json, sample).await,
        Command::Watch { sample } => dashboard::cmd_watch(sample).await,
        Command::Sample { json } => dashboard::cmd_sample(json),
        Command::Config { json } => dashboard::cmd_config(json),
        Command::Auth { path } => drive::register_credentials(&path),
    }
}
