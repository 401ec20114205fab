use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use lead_priority::config::Config;
use lead_priority::leads::{LeadRecord, RankedLead};
use lead_priority::priority::{PriorityBucket, PriorityConfig};

const EXIT_SUCCESS: i32 = 0;
const EXIT_INPUT: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum BucketArg {
    Hot,
    Warm,
    Cold,
}

impl From<BucketArg> for PriorityBucket {
    fn from(arg: BucketArg) -> Self {
        match arg {
            BucketArg::Hot => PriorityBucket::Hot,
            BucketArg::Warm => PriorityBucket::Warm,
            BucketArg::Cold => PriorityBucket::Cold,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Table,
    Tsv,
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Rank leads from a JSON file by priority
    Rank {
        /// JSON file with an array of leads (or an object with a `leads` array)
        leads: PathBuf,
        /// Only show leads in this bucket
        #[arg(long, value_enum)]
        bucket: Option<BucketArg>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
        /// Reference time for recency (RFC 3339, defaults to now)
        #[arg(long, value_parser = parse_as_of)]
        as_of: Option<DateTime<Utc>>,
    },
    /// Show how one lead's priority was calculated
    Explain {
        leads: PathBuf,
        /// Id of the lead to explain
        id: String,
        /// Reference time for recency (RFC 3339, defaults to now)
        #[arg(long, value_parser = parse_as_of)]
        as_of: Option<DateTime<Utc>>,
    },
    /// Validate the priority configuration
    Check,
    /// Print the effective priority configuration as YAML
    ShowConfig,
    /// Write a config file with default priority settings
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Parser, Debug)]
#[command(name = "lead-priority")]
#[command(about = "Lead priority scoring CLI", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/lead-priority/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

fn parse_as_of(s: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("expected an RFC 3339 timestamp: {}", e))
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Log validation problems without stopping; scoring still runs on the config.
fn warn_if_invalid(config: &PriorityConfig) {
    if let Err(errors) = lead_priority::priority::validate_priority_config(config) {
        for error in errors {
            warn!("Priority config: {}", error);
        }
    }
}

fn load_config_or_exit(path: Option<PathBuf>) -> Config {
    match lead_priority::config::load_config(path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    }
}

fn load_leads_or_exit(path: &Path) -> Vec<LeadRecord> {
    match lead_priority::leads::load_leads(path) {
        Ok(leads) => leads,
        Err(e) => {
            eprintln!("Input error: {:#}", e);
            std::process::exit(EXIT_INPUT);
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = cli.config.map(PathBuf::from);

    match cli.command {
        Commands::Init { force } => {
            let path = match config_path {
                Some(p) => p,
                None => match lead_priority::config::get_config_path() {
                    Ok(p) => p,
                    Err(e) => {
                        eprintln!("Config error: {:#}", e);
                        std::process::exit(EXIT_CONFIG);
                    }
                },
            };
            if let Err(e) = lead_priority::config::write_default_config(&path, force) {
                eprintln!("Config error: {:#}", e);
                std::process::exit(EXIT_CONFIG);
            }
            println!("Config written to {}", path.display());
        }
        Commands::Check => {
            let priority = load_config_or_exit(config_path).priority_config();
            if let Err(errors) = lead_priority::priority::validate_priority_config(&priority) {
                eprintln!("Priority config errors:");
                for error in errors {
                    eprintln!("  - {}", error);
                }
                std::process::exit(EXIT_CONFIG);
            }
            println!("Priority config OK");
        }
        Commands::ShowConfig => {
            let priority = load_config_or_exit(config_path).priority_config();
            match serde_saphyr::to_string(&priority) {
                Ok(yaml) => print!("{}", yaml),
                Err(e) => {
                    eprintln!("Failed to serialize config: {}", e);
                    std::process::exit(EXIT_CONFIG);
                }
            }
        }
        Commands::Rank {
            leads,
            bucket,
            format,
            as_of,
        } => {
            let config = load_config_or_exit(config_path);
            let priority = config.priority_config();
            warn_if_invalid(&priority);
            let records = load_leads_or_exit(&leads);
            let now = as_of.unwrap_or_else(Utc::now);

            let (ranked, summary) = lead_priority::leads::rank_leads(
                records,
                &priority,
                &config.priority_context(),
                now,
                bucket.map(PriorityBucket::from),
            );

            match format {
                OutputFormat::Table => {
                    let use_colors = lead_priority::output::should_use_colors();
                    println!(
                        "{}",
                        lead_priority::output::format_ranked_table(&ranked, use_colors)
                    );
                    if cli.verbose {
                        eprintln!();
                        eprintln!("{}", lead_priority::output::format_summary(&summary));
                    }
                }
                OutputFormat::Tsv => {
                    let tsv = lead_priority::output::format_tsv(&ranked);
                    if !tsv.is_empty() {
                        println!("{}", tsv);
                    }
                }
                OutputFormat::Json => match lead_priority::output::format_json(&ranked) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        eprintln!("Output error: {:#}", e);
                        std::process::exit(EXIT_INPUT);
                    }
                },
            }
        }
        Commands::Explain { leads, id, as_of } => {
            let config = load_config_or_exit(config_path);
            let priority = config.priority_config();
            warn_if_invalid(&priority);
            let records = load_leads_or_exit(&leads);
            let now = as_of.unwrap_or_else(Utc::now);

            let Some(lead) = records.into_iter().find(|l| l.id == id) else {
                eprintln!("No lead with id '{}' in {}", id, leads.display());
                std::process::exit(EXIT_INPUT);
            };
            let evaluation = lead_priority::priority::evaluate_lead_priority(
                &lead.signals,
                Some(&priority),
                Some(&config.priority_context()),
                now,
            );
            let ranked = RankedLead { lead, evaluation };
            let use_colors = lead_priority::output::should_use_colors();
            println!(
                "{}",
                lead_priority::output::format_lead_detail(&ranked, use_colors)
            );
        }
    }

    std::process::exit(EXIT_SUCCESS);
}
