// Fri Feb 20 2026 - Alex

use clap::Parser;
use colored::Colorize;
use memprobe::{logging, Config, Repl};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author = "Alex")]
#[command(version = "1.0.0")]
#[command(about = "Interactive live-process memory inspector", long_about = None)]
struct Args {
    /// Load tuning options from a JSON config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Upper bound in bytes on in-flight block reads.
    #[arg(long)]
    memory_budget: Option<u64>,

    /// Multiplier on the allocation granularity forming the block stride.
    #[arg(long)]
    block_factor: Option<usize>,

    /// Worker pool ceiling.
    #[arg(long)]
    max_workers: Option<usize>,

    /// Report short reads and read failures with region metadata.
    #[arg(long)]
    verbose_reads: bool,

    /// Suppress the per-match listing above this many matches.
    #[arg(long)]
    result_ceiling: Option<usize>,

    /// Debug-level logging.
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    logging::init(args.verbose);

    let mut config = match &args.config {
        Some(path) => match Config::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{} Failed loading config: {}", "[!]".red(), e);
                std::process::exit(1);
            }
        },
        None => Config::default(),
    };
    if let Some(bytes) = args.memory_budget {
        config = config.with_memory_budget(bytes);
    }
    if let Some(factor) = args.block_factor {
        config = config.with_block_factor(factor);
    }
    if let Some(workers) = args.max_workers {
        config = config.with_max_workers(workers);
    }
    if args.verbose_reads {
        config = config.with_verbose_reads(true);
    }
    if let Some(ceiling) = args.result_ceiling {
        config = config.with_result_ceiling(ceiling);
    }

    if let Err(e) = config.validate() {
        eprintln!("{} Invalid configuration: {}", "[!]".red(), e);
        std::process::exit(1);
    }

    println!("{}", "memprobe".cyan().bold());
    println!("{}", "=".repeat(50).cyan());
    println!();

    let mut repl = Repl::new(config);
    if let Err(e) = repl.run() {
        eprintln!("{} {}", "[!]".red(), e);
        std::process::exit(1);
    }
}
