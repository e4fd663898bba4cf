mod query;
mod scrape;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "scholar-cli")]
#[command(about = "Scholar topic scraper command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run a scrape in the foreground, replacing every stored result
    Scrape {
        /// Topic to search for; repeat for several topics
        #[arg(long = "topic")]
        topics: Vec<String>,
        /// Search every topic in the catalogue
        #[arg(long, conflicts_with = "topics")]
        all_topics: bool,
        /// First publication year (catalogue default when omitted)
        #[arg(long)]
        year_start: Option<i32>,
        /// Last publication year (catalogue default when omitted)
        #[arg(long)]
        year_end: Option<i32>,
        /// Records to collect per topic (catalogue default when omitted)
        #[arg(long)]
        min_results: Option<u32>,
    },
    /// List stored results, newest first
    Results {
        /// Maximum number of rows to show
        #[arg(long, default_value = "20")]
        limit: i64,
    },
    /// Summarise the stored collection
    Report {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the topic catalogue and search defaults
    Topics,
    /// Database utilities
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Check database connectivity
    Ping,
    /// Apply pending migrations
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("scholar-cli: run with --help to list commands");
        return Ok(());
    };

    let config = scholar_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match command {
        Commands::Scrape {
            topics,
            all_topics,
            year_start,
            year_end,
            min_results,
        } => {
            let catalogue = scholar_core::load_topics(&config.topics_path)?;
            let request = scrape::build_request(
                &catalogue,
                topics,
                all_topics,
                year_start,
                year_end,
                min_results,
            )?;
            let pool = connect(&config).await?;
            scholar_db::run_migrations(&pool).await?;
            scrape::run_scrape(pool, &config, request).await?;
        }
        Commands::Results { limit } => {
            query::run_results(&connect(&config).await?, limit).await?;
        }
        Commands::Report { json } => query::run_report(&connect(&config).await?, json).await?,
        Commands::Topics => {
            let catalogue = scholar_core::load_topics(&config.topics_path)?;
            query::run_topics(&catalogue);
        }
        Commands::Db {
            command: DbCommands::Ping,
        } => {
            scholar_db::health_check(&connect(&config).await?).await?;
            println!("database: ok");
        }
        Commands::Db {
            command: DbCommands::Migrate,
        } => {
            let applied = scholar_db::run_migrations(&connect(&config).await?).await?;
            println!("migrations applied: {applied}");
        }
    }

    Ok(())
}

async fn connect(config: &scholar_core::AppConfig) -> anyhow::Result<sqlx::PgPool> {
    let pool_config = scholar_db::PoolConfig::from_app_config(config);
    Ok(scholar_db::connect_pool(&config.database_url, pool_config).await?)
}
