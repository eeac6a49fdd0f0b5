use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tagsplit::config::check_proportion;
use tagsplit::progress::ProgressReporter;
use tagsplit::{Split, SplitConfig, SplitSizes, SplitWriters, Splitter, Strategy};

#[derive(Parser, Debug)]
#[command(name = "tagsplit")]
#[command(about = "Splits a tagged corpus into train, dev, and test sets")]
#[command(version)]
struct Args {
    /// Input corpus: whitespace-separated columns, blank line between sentences
    input: PathBuf,

    /// Output path for the training split
    train: PathBuf,

    /// Output path for the development split
    dev: PathBuf,

    /// Output path for the test split
    test: PathBuf,

    /// Seed for the random number generator
    #[arg(short, long)]
    seed: u64,

    /// Proportion of sentences for training
    #[arg(short = 't', long = "train_size", default_value_t = 0.8, value_parser = parse_proportion)]
    train_size: f64,

    /// Proportion of sentences for development
    #[arg(short = 'd', long = "dev_size", default_value_t = 0.1, value_parser = parse_proportion)]
    dev_size: f64,

    /// Proportion of sentences for testing
    #[arg(short = 'e', long = "test_size", default_value_t = 0.1, value_parser = parse_proportion)]
    test_size: f64,

    /// Partitioning strategy
    #[arg(long, value_enum, default_value_t = Strategy::Streaming)]
    strategy: Strategy,

    /// Write a JSON run report to this path
    #[arg(long)]
    stats_out: Option<PathBuf>,

    /// Suppress the console progress bar
    #[arg(long)]
    no_progress: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn parse_proportion(value: &str) -> Result<f64, String> {
    let parsed: f64 = value
        .parse()
        .map_err(|e| format!("`{value}` is not a number: {e}"))?;
    check_proportion("size", parsed).map_err(|e| e.to_string())
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // Logs go to stderr as JSON; stdout carries the summary only
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .json()
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    info!(?args, "Parsed CLI arguments");

    // WHY: Sizes are validated before any output file exists so a rejected run leaves nothing behind
    let sizes = SplitSizes::new(args.train_size, args.dev_size, args.test_size)?;
    let config = SplitConfig::new(sizes, args.seed).with_strategy(args.strategy);
    let splitter = Splitter::new(config);

    let writers = SplitWriters::create(&args.train, &args.dev, &args.test)?;
    let mut sink = ProgressReporter::new(writers, args.no_progress);
    let report = splitter
        .run(&args.input, &mut sink)
        .with_context(|| format!("Failed to split {}", args.input.display()))?;
    drop(sink);

    if let Some(stats_path) = &args.stats_out {
        report
            .save_json(stats_path)
            .with_context(|| format!("Failed to write stats to {}", stats_path.display()))?;
        info!("Wrote run report to {}", stats_path.display());
    }

    println!(
        "tagsplit v{} - {} strategy, seed {}",
        env!("CARGO_PKG_VERSION"),
        report.strategy,
        report.seed
    );
    println!("  Sentences read: {}", report.total_sentences);
    for split in Split::ALL {
        let stats = report.split(split);
        println!("  {split}: {} of {} (quota)", stats.written, stats.quota);
    }
    if report.dropped > 0 {
        println!("  Dropped: {}", report.dropped);
    }

    Ok(())
}
