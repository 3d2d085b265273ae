use std::path::PathBuf;

use anyhow::Context;
use chrono::Utc;
use clap::{ArgGroup, Args, Parser, Subcommand};
use sqlx::postgres::{PgPool, PgPoolOptions};

mod analytics;
mod config;
mod db;
mod error;
mod input;
mod insights;
mod models;
mod report;
mod risk;
mod stats;
mod timeframe;

use analytics::WellnessAnalytics;
use config::Config;
use models::{AnalyticsResult, CheckInRecord};
use timeframe::Timeframe;

#[derive(Parser)]
#[command(name = "wellness-analytics")]
#[command(about = "Wellness check-in analytics and risk scoring", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
#[command(group(
    ArgGroup::new("source")
        .args(["email", "input"])
        .required(true)
        .multiple(false)
))]
struct Source {
    /// Analyze the stored check-ins of this user
    #[arg(long)]
    email: Option<String>,
    /// Analyze a JSON array of check-ins instead of the database
    #[arg(long)]
    input: Option<PathBuf>,
    #[arg(long, default_value = "30d")]
    timeframe: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    InitDb,
    /// Load demo check-ins
    Seed,
    /// Import check-ins from a CSV file
    Import {
        #[arg(long)]
        csv: PathBuf,
    },
    /// Print analytics for a user as JSON
    Analyze {
        #[command(flatten)]
        source: Source,
        #[arg(long)]
        pretty: bool,
    },
    /// Generate a markdown report
    Report {
        #[command(flatten)]
        source: Source,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

fn init_tracing(config: &Config) {
    let env_filter = tracing_subscriber::EnvFilter::try_new(&config.log_filter)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .compact()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(env_filter)
        .init();
}

async fn connect(config: &Config) -> anyhow::Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(config.require_database_url()?)
        .await
        .context("failed to connect to Postgres")
}

/// Loads the check-ins for `source` and runs analytics over them.
async fn analyze(config: &Config, source: &Source) -> anyhow::Result<(String, AnalyticsResult)> {
    let timeframe = Timeframe::parse(&source.timeframe)?;

    let (subject, records): (String, Vec<CheckInRecord>) = match (&source.email, &source.input) {
        (Some(email), _) => {
            let pool = connect(config).await?;
            let since = timeframe.cutoff(Utc::now());
            (email.clone(), db::fetch_check_ins(&pool, email, since).await?)
        }
        (None, Some(path)) => (path.display().to_string(), input::read_json(path)?),
        (None, None) => anyhow::bail!("either --email or --input is required"),
    };

    tracing::info!(
        subject = %subject,
        timeframe = timeframe.label(),
        days = timeframe.days(),
        check_ins = records.len(),
        "running wellness analytics"
    );
    let result = WellnessAnalytics::new().generate_user_analytics(&records, timeframe.label());
    if result.degraded {
        tracing::warn!(subject = %subject, "analytics degraded to the empty result");
    }

    Ok((subject, result))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;
    init_tracing(&config);

    match cli.command {
        Commands::InitDb => {
            let pool = connect(&config).await?;
            db::init_db(&pool).await?;
            println!("Schema ready.");
        }
        Commands::Seed => {
            let pool = connect(&config).await?;
            let inserted = db::seed(&pool).await?;
            println!("Inserted {inserted} demo check-ins.");
        }
        Commands::Import { csv } => {
            let pool = connect(&config).await?;
            let inserted = db::import_csv(&pool, &csv).await?;
            println!("Inserted {inserted} check-ins from {}.", csv.display());
        }
        Commands::Analyze { source, pretty } => {
            let (_, result) = analyze(&config, &source).await?;
            let json = if pretty {
                serde_json::to_string_pretty(&result)?
            } else {
                serde_json::to_string(&result)?
            };
            println!("{json}");
        }
        Commands::Report { source, out } => {
            let (subject, result) = analyze(&config, &source).await?;
            let report = report::build_report(&subject, &result);
            std::fs::write(&out, report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}
