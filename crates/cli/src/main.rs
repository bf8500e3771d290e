use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use sqlsift_analyzer::{AnalyzerConfig, BatchAnalyzer};
use sqlsift_detector::SqlDetector;
use sqlsift_protocol::{serialize_json, serialize_json_pretty, AnalysisResult};

#[derive(Parser)]
#[command(name = "sqlsift")]
#[command(about = "Locate hand-built SQL inside Java source trees", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors (stdout is reserved for JSON)
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze every Java file under a directory
    Analyze(AnalyzeArgs),

    /// Analyze a single Java file
    File(FileArgs),
}

#[derive(Args)]
struct AnalyzeArgs {
    /// Root directory to scan
    path: PathBuf,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,

    /// Print a run summary to stderr after the results
    #[arg(long)]
    stats: bool,

    /// Per-file analysis budget in seconds
    #[arg(long, default_value_t = 10)]
    timeout_secs: u64,

    /// Override the concurrent-file cap
    #[arg(long)]
    max_concurrency: Option<usize>,
}

#[derive(Args)]
struct FileArgs {
    /// Java file to analyze
    path: PathBuf,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    match cli.command {
        Commands::Analyze(args) => run_analyze(args).await,
        Commands::File(args) => run_file(args),
    }
}

async fn run_analyze(args: AnalyzeArgs) -> Result<()> {
    let mut config = AnalyzerConfig {
        per_file_timeout: Duration::from_secs(args.timeout_secs.max(1)),
        ..AnalyzerConfig::default()
    };
    if let Some(cap) = args.max_concurrency {
        config.max_concurrency = cap.max(1);
    }

    let analyzer = BatchAnalyzer::new(config);
    let outcome = analyzer
        .analyze_directory(&args.path)
        .await
        .with_context(|| format!("analyzing {}", args.path.display()))?;

    print_results(&outcome.results, args.pretty)?;
    if args.stats {
        eprintln!("{}", outcome.stats);
    }
    Ok(())
}

fn run_file(args: FileArgs) -> Result<()> {
    let content = std::fs::read_to_string(&args.path)
        .with_context(|| format!("reading {}", args.path.display()))?;

    let detector = SqlDetector::new();
    let result = detector.analyze(&args.path.to_string_lossy(), &content);

    let json = if args.pretty {
        serialize_json_pretty(&result)?
    } else {
        serialize_json(&result)?
    };
    println!("{json}");
    Ok(())
}

fn print_results(results: &[AnalysisResult], pretty: bool) -> Result<()> {
    let json = if pretty {
        serialize_json_pretty(&results)?
    } else {
        serialize_json(&results)?
    };
    println!("{json}");
    Ok(())
}
