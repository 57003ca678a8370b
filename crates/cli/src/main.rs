use clap::{Parser, Subcommand};
use sentinel_cli::commands::{companies, filings, filters, reassign, reconcile, seed};
use sentinel_node::config::NodeConfig;
use sentinel_persistence::FilingFilter;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sentinel")]
#[command(about = "Sentinel - incremental SEC filing tracker", long_about = None)]
struct Cli {
    /// Ledger database (defaults to SENTINEL_DB_PATH or data/sentinel.db)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Print debug logs
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the company reference list into an empty ledger.
    Seed {
        /// Reference CSV (defaults to SENTINEL_COMPANIES_CSV)
        csv: Option<PathBuf>,
    },
    /// Fetch, filter and persist new filings for every company.
    Run {
        #[arg(long)]
        json: bool,
    },
    /// List stored filings, newest first.
    Filings {
        #[arg(long)]
        company: Option<String>,

        #[arg(long)]
        assigned_to: Option<String>,

        #[arg(long)]
        form: Option<String>,

        #[arg(long)]
        json: bool,
    },
    /// Show the distinct values each filing filter accepts.
    Filters {
        /// Only this column: company_name, assigned_to or form
        column: Option<String>,
    },
    /// List companies with their latest filing.
    Companies,
    /// Change a company's assignee and back-fill its filings.
    Reassign {
        company_id: String,

        /// New assignee; omit to clear
        assignee: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut cfg = NodeConfig::from_env()?;
    if let Some(db) = cli.db {
        cfg.db_path = db;
    }
    if cli.verbose {
        sentinel_node::telemetry::init_telemetry();
    }

    match cli.command {
        Commands::Seed { csv } => {
            let csv = csv.unwrap_or_else(|| cfg.companies_csv.clone());
            seed::run(&cfg.db_path, &csv).map(|_| ())
        }
        Commands::Run { json } => reconcile::run(&cfg, json).map(|_| ()),
        Commands::Filings {
            company,
            assigned_to,
            form,
            json,
        } => {
            let filter = FilingFilter {
                company_name: company,
                assigned_to,
                form,
            };
            filings::run(&cfg.db_path, &filter, json).map(|_| ())
        }
        Commands::Filters { column } => filters::run(&cfg.db_path, column.as_deref()).map(|_| ()),
        Commands::Companies => companies::run(&cfg.db_path),
        Commands::Reassign {
            company_id,
            assignee,
        } => reassign::run(&cfg.db_path, &company_id, assignee.as_deref()).map(|_| ()),
    }
}
