//! h2trainer CLI: hydrogen safety quiz and dispersion demo.

use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "h2trainer", version, about = "Hydrogen safety quiz trainer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Take a quiz in the terminal
    Quiz(QuizArgs),

    /// Check a question bank for problems
    Validate {
        /// Path to a JSON question bank
        #[arg(long)]
        bank: PathBuf,
    },

    /// Run the gas-dispersion model
    Simulate(SimulateArgs),

    /// Print the summary of a saved JSON result
    Review {
        /// Results JSON written by `quiz --format json`
        #[arg(long)]
        results: PathBuf,
    },

    /// Print hydrogen safety tips
    Tips,

    /// Create starter config and sample question bank
    Init,
}

#[derive(Args)]
pub struct QuizArgs {
    /// Path to a JSON question bank (defaults to `question_bank` in config)
    #[arg(long)]
    pub bank: Option<PathBuf>,

    /// Trainee name, asked for interactively if omitted
    #[arg(long)]
    pub name: Option<String>,

    /// Number of questions
    #[arg(long)]
    pub count: Option<String>,

    /// Only ask questions from this category
    #[arg(long)]
    pub category: Option<String>,

    /// Keep bank order
    #[arg(long)]
    pub no_shuffle: bool,

    /// Pass threshold in percent
    #[arg(long)]
    pub threshold: Option<String>,

    /// Export format: json, html, all
    #[arg(long)]
    pub format: Option<String>,

    /// Output directory for exports
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Write an HTML certificate here if the quiz is passed
    #[arg(long)]
    pub certificate: Option<PathBuf>,

    /// Issuer named on the certificate
    #[arg(long)]
    pub issuer: Option<String>,

    /// Verification URL prefix for the certificate
    #[arg(long)]
    pub verify_url: Option<String>,

    /// Config file path
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Args)]
pub struct SimulateArgs {
    /// Number of ticks to run
    #[arg(long, default_value = "200")]
    pub ticks: u64,

    /// Animate in the terminal at the configured tick interval
    #[arg(long)]
    pub live: bool,

    /// Write the final field as an SVG heat-map
    #[arg(long)]
    pub svg: Option<PathBuf>,

    /// Leak rate (0 to 2)
    #[arg(long)]
    pub leak_rate: Option<f64>,

    /// Vent strength (0 to 1)
    #[arg(long)]
    pub vent_strength: Option<f64>,

    /// Buoyancy (0 to 1)
    #[arg(long)]
    pub buoyancy: Option<f64>,

    /// Diffusion (0 to 0.6)
    #[arg(long)]
    pub diffusion: Option<f64>,

    /// Milliseconds between live ticks
    #[arg(long)]
    pub interval_ms: Option<u64>,

    /// Config file path
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("h2trainer=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Quiz(args) => commands::quiz::execute(args),
        Commands::Validate { bank } => commands::validate::execute(bank),
        Commands::Simulate(args) => commands::simulate::execute(args).await,
        Commands::Review { results } => commands::review::execute(results),
        Commands::Tips => commands::tips::execute(),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
