use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use teamtrack::{
    config::Config,
    database::Database,
    ingest::{JsonFileSource, StandingsImportService, StandingsSource},
    progression::{ProgressionFilter, ProgressionTracker},
    repositories::{ClubRepository, SeasonRepository, TeamRepository, TeamSeasonRepository},
    resolver::{CandidateGenerator, IdentityResolver},
};

#[derive(Parser)]
#[command(name = "teamtrack")]
#[command(version = "0.1.0")]
#[command(about = "Youth-soccer team identity resolution and progression tracking")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Database URL (overrides config file)
    #[arg(short = 'd', long, value_name = "URL")]
    database_url: Option<String>,

    /// Log level
    #[arg(short = 'v', long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Import division standings payloads from JSON files
    Import {
        /// Standings files (single object or array per file)
        files: Vec<PathBuf>,
    },
    /// Resolve a raw team name to its durable team identity
    Resolve {
        /// Raw team name, e.g. "PASS FC 2013B - White"
        name: String,
    },
    /// Show ranked candidate matches for a raw team name
    Candidates {
        /// Raw team name
        name: String,
    },
    /// Reconstruct team progressions across age groups
    Progression {
        /// Track a single team by name
        #[arg(long, conflicts_with = "club")]
        team: Option<String>,

        /// Track all teams of a club
        #[arg(long)]
        club: Option<String>,
    },
    /// Print database row counts
    Stats,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_filter = format!("teamtrack={}", cli.log_level);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting teamtrack v{}", env!("CARGO_PKG_VERSION"));

    std::env::set_var("CONFIG_FILE", &cli.config);
    let mut config = Config::load()?;

    if let Some(database_url) = cli.database_url {
        config.database.url = database_url;
    }

    info!("Using database: {}", config.database.url);

    let database = Database::new(&config.database).await?;
    database.migrate().await?;
    info!("Database connection established and migrations applied");

    match cli.command {
        Command::Import { files } => {
            if files.is_empty() {
                anyhow::bail!("no standings files given");
            }
            let source = JsonFileSource::new(files);
            let payloads = source.load().await?;
            info!("Loaded {} standings payload(s)", payloads.len());

            let resolver = IdentityResolver::new(database.clone(), config.matching.clone())?;
            let service = StandingsImportService::new(
                database,
                resolver,
                config.ingestion.worker_concurrency,
            );
            let summary = service.import_all(payloads).await?;
            println!(
                "Imported {} division(s): {} team-seasons, {} new teams, {} matched",
                summary.divisions,
                summary.team_seasons,
                summary.teams_created,
                summary.teams_matched
            );
        }
        Command::Resolve { name } => {
            let resolver = IdentityResolver::new(database, config.matching.clone())?;
            let outcome = resolver.resolve(&name).await?;
            println!(
                "{} -> {} ({}){}",
                name,
                outcome.team.canonical_name,
                outcome.team.id,
                if outcome.is_new { " [created]" } else { "" }
            );
        }
        Command::Candidates { name } => {
            let generator = CandidateGenerator::new(database, config.matching.clone())?;
            let report = generator.candidates(&name).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Progression { team, club } => {
            let filter = match (team, club) {
                (Some(team), _) => ProgressionFilter::Team(team),
                (None, Some(club)) => ProgressionFilter::Club(club),
                (None, None) => ProgressionFilter::All,
            };
            let tracker = ProgressionTracker::new(database, config.matching.clone());
            let report = tracker.track(filter).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Stats => {
            let pool = database.pool();
            let mut conn = pool.acquire().await?;
            println!("clubs:        {}", ClubRepository::count(&mut conn).await?);
            println!("teams:        {}", TeamRepository::count(&mut conn).await?);
            println!(
                "seasons:      {}",
                SeasonRepository::count_seasons(&mut conn).await?
            );
            println!(
                "divisions:    {}",
                SeasonRepository::count_divisions(&mut conn).await?
            );
            println!(
                "team_seasons: {}",
                TeamSeasonRepository::count(&mut conn).await?
            );
        }
    }

    Ok(())
}
