//! Qupacabras Command-Line Interface
//!
//! Validates community benchmark submissions and builds the index the
//! Qupacabras site renders.
//!
//! ```text
//!   submissions/                       public/
//!   ├── grover_3q/                     └── benchmarks.json
//!   │   ├── benchmark.json    ──▶  validate ──▶ enrich ──▶ sort
//!   │   └── grover.qasm
//!   └── vqe_h2/
//!       └── benchmark.json
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::common::ConfigArgs;
use commands::{analyze_qasm, build_index, stamp, status, validate, version};

/// Qupacabras - quantum benchmark validation and indexing
#[derive(Parser)]
#[command(name = "qupacabras")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file (defaults to ./qupacabras.yaml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate all submissions, or a single benchmark.json
    Validate {
        /// Validate only this file; the folder name is its parent directory
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Submissions directory
        #[arg(short, long)]
        submissions: Option<PathBuf>,

        /// Accept submissions without id/timestamp
        #[arg(long)]
        allow_unstamped: bool,
    },

    /// Build the benchmark index from all valid submissions
    BuildIndex {
        /// Submissions directory
        #[arg(short, long)]
        submissions: Option<PathBuf>,

        /// Output file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Accept submissions without id/timestamp and stamp them
        #[arg(long)]
        allow_unstamped: bool,
    },

    /// Analyze a QASM file, or every .qasm file in a directory
    AnalyzeQasm {
        /// File or directory
        path: PathBuf,

        /// Print the analysis as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the validation status section as Markdown
    Status {
        /// Submissions directory
        #[arg(short, long)]
        submissions: Option<PathBuf>,
    },

    /// Add contributor and timestamp to a benchmark.json where missing
    Stamp {
        /// benchmark.json to update
        #[arg(short, long)]
        file: PathBuf,

        /// Contributor to record
        #[arg(long, env = "QUPACABRAS_CONTRIBUTOR")]
        contributor: String,

        /// Timestamp to record (RFC 3339, defaults to now)
        #[arg(short, long)]
        timestamp: Option<String>,
    },

    /// Show version information
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging; RUST_LOG applies when no -v is given
    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = cli.config;

    // Execute command
    let result = match cli.command {
        Commands::Validate {
            file,
            submissions,
            allow_unstamped,
        } => {
            let args = ConfigArgs {
                config,
                submissions,
                output: None,
                allow_unstamped,
            };
            validate::execute(&args, file.as_deref())
        }

        Commands::BuildIndex {
            submissions,
            output,
            allow_unstamped,
        } => build_index::execute(&ConfigArgs {
            config,
            submissions,
            output,
            allow_unstamped,
        }),

        Commands::AnalyzeQasm { path, json } => analyze_qasm::execute(&path, json),

        Commands::Status { submissions } => status::execute(&ConfigArgs {
            config,
            submissions,
            output: None,
            allow_unstamped: false,
        }),

        Commands::Stamp {
            file,
            contributor,
            timestamp,
        } => stamp::execute(&file, &contributor, timestamp.as_deref()),

        Commands::Version => {
            version::execute();
            Ok(())
        }
    };

    // Handle errors
    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
