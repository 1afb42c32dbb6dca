mod backend;
mod commands;
mod render;
mod utils;

use anyhow::Result;
use clap::{Parser, Subcommand};
use studycal_core::DateKey;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "studycal")]
#[command(about = "Log daily study time on a calendar and see your totals")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the month grid with recorded time and totals
    Month {
        /// Month to show (YYYY-MM), defaults to the current month
        #[arg(short, long)]
        month: Option<String>,

        /// Move this many months forward (or back, if negative)
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        offset: i32,
    },
    /// Record study time for a day, replacing any earlier record
    Log {
        /// Day to record (YYYY-MM-DD)
        date: DateKey,

        #[arg(long)]
        hours: Option<String>,

        #[arg(long)]
        minutes: Option<String>,

        /// What was studied (up to 30 characters)
        #[arg(short, long)]
        content: Option<String>,
    },
    /// Show what was recorded for a day
    Show {
        /// Day to show (YYYY-MM-DD)
        date: DateKey,
    },
    /// Delete the record for a day
    Remove {
        /// Day to delete (YYYY-MM-DD)
        date: DateKey,
    },
    /// Print monthly, yearly and all-time totals
    Totals {
        /// Month the monthly and yearly totals refer to (YYYY-MM)
        #[arg(short, long)]
        month: Option<String>,
    },
    /// Print the config file location, creating it if missing
    Config {
        /// Base URL of the hosted project to store records in
        #[arg(long)]
        store_url: Option<String>,

        #[arg(long)]
        api_key: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Month { month, offset } => {
            let reference = commands::resolve_month(month.as_deref(), offset)?;
            commands::month::run(reference).await
        }
        Commands::Log {
            date,
            hours,
            minutes,
            content,
        } => commands::log::run(date, hours, minutes, content).await,
        Commands::Show { date } => commands::show::run(date).await,
        Commands::Remove { date } => commands::remove::run(date).await,
        Commands::Totals { month } => {
            let reference = commands::resolve_month(month.as_deref(), 0)?;
            commands::totals::run(reference).await
        }
        Commands::Config { store_url, api_key } => commands::config::run(store_url, api_key),
    }
}
