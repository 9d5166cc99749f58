//! CLI definitions and entry point

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use super::commands;
use faultline::core::models::Domain;
use faultline::output::OutputMode;

/// faultline - Log triage with root-cause chains
#[derive(Parser, Debug)]
#[command(
    name = "faultline",
    version,
    about = "Classify logs and rebuild root-cause chains",
    long_about = "Classify hardware, firmware and application log lines by severity.\n\n\
                  Successful operations are never reported as errors.\n\
                  Related errors are grouped into causal chains with a confidence score."
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output in JSON format (machine-readable)
    #[arg(long, global = true)]
    pub json: bool,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// faultline subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Analyze one or more log files
    Analyze {
        /// Log files to analyze
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Analysis config (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Rule catalog to use instead of the built-in one
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Fixed grouping window in seconds
        #[arg(short, long)]
        window: Option<f64>,

        /// Year for timestamps that omit it (syslog)
        #[arg(long)]
        year: Option<i32>,
    },

    /// Classify a single line
    Classify {
        /// The log line
        text: String,

        /// Source tag for rules restricted to a source
        #[arg(short, long, default_value = "cli")]
        source: String,

        /// Analysis config (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Rule catalog to use instead of the built-in one
        #[arg(long)]
        catalog: Option<PathBuf>,
    },

    /// List catalog rules
    Rules {
        /// Only rules for this domain
        #[arg(short, long)]
        domain: Option<Domain>,

        /// Rule catalog to use instead of the built-in one
        #[arg(long)]
        catalog: Option<PathBuf>,
    },

    /// Show version
    Version,
}

/// Run the CLI
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    let output_mode = OutputMode::from_json_flag(cli.json);

    match cli.command {
        Some(Command::Analyze {
            files,
            config,
            catalog,
            window,
            year,
        }) => commands::analyze(
            &files,
            &commands::Overrides {
                config,
                catalog,
                window,
            },
            year,
            output_mode,
        ),
        Some(Command::Classify {
            text,
            source,
            config,
            catalog,
        }) => commands::classify(
            &text,
            &source,
            &commands::Overrides {
                config,
                catalog,
                window: None,
            },
            output_mode,
        ),
        Some(Command::Rules { domain, catalog }) => commands::rules(domain, catalog, output_mode),
        Some(Command::Version) | None => {
            if output_mode == OutputMode::Json {
                println!(
                    "{}",
                    serde_json::json!({
                        "version": faultline::VERSION,
                        "hint": "Use --help for usage"
                    })
                );
            } else {
                println!("faultline v{}", faultline::VERSION);
                println!("\nRun 'faultline --help' for usage");
                println!("Run 'faultline analyze <FILE>' to get started");
            }
            Ok(())
        },
    }
}
