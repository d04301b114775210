//! extwalk - Group every file under a path by extension, in parallel.
//!
//! Usage:
//!   extwalk <PATH>                 Walk PATH and list files per extension
//!   extwalk -j 32 <PATH>           Use 32 worker threads
//!   extwalk --format json <PATH>   Print the full report as JSON
//!   extwalk --help                 Show help

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, ValueEnum};
use color_eyre::eyre::{Context, Result};
use tracing_subscriber::EnvFilter;

use extwalk_core::{DEFAULT_THREADS, WalkConfig, WalkReport};
use extwalk_scan::{Walker, normalize_root};

#[derive(Parser)]
#[command(
    name = "extwalk",
    version,
    about = "Group every file under a path by extension",
    long_about = "extwalk walks a file or directory tree with a fixed pool of worker \
                  threads and lists every regular file grouped by its lower-cased \
                  extension."
)]
struct Cli {
    /// File or directory to walk
    path: PathBuf,

    /// Number of worker threads
    #[arg(short = 'j', long, default_value_t = DEFAULT_THREADS)]
    threads: usize,

    /// Follow symbolic links (no cycle detection)
    #[arg(long)]
    follow_symlinks: bool,

    /// Skip entries whose name starts with a dot
    #[arg(long)]
    no_hidden: bool,

    /// Maximum depth to descend to (the root is depth 0)
    #[arg(short = 'd', long)]
    max_depth: Option<u32>,

    /// Glob pattern of entry names to skip (repeatable)
    #[arg(short, long = "ignore", value_name = "PATTERN")]
    ignore: Vec<String>,

    /// Output format
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    /// Log every task at debug level
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Parsing outcome that ends the program before any walk.
enum EarlyExit {
    /// No path given: print usage to stdout and fail.
    Usage(String),
    /// Help, version or a malformed argument, reported by clap.
    Clap(clap::Error),
}

fn parse_cli<I, T>(args: I) -> std::result::Result<Cli, EarlyExit>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    Cli::try_parse_from(args).map_err(|err| match err.kind() {
        ErrorKind::MissingRequiredArgument => {
            EarlyExit::Usage(Cli::command().render_usage().to_string())
        }
        _ => EarlyExit::Clap(err),
    })
}

fn main() -> Result<ExitCode> {
    color_eyre::install()?;

    let cli = match parse_cli(std::env::args_os()) {
        Ok(cli) => cli,
        Err(EarlyExit::Usage(usage)) => {
            println!("{usage}");
            return Ok(ExitCode::FAILURE);
        }
        Err(EarlyExit::Clap(err)) => err.exit(),
    };
    setup_logging(cli.verbose);

    let root = normalize_root(&cli.path).context("Invalid path")?;
    match cli.format {
        OutputFormat::Text => println!("Called with {}", root.display()),
        OutputFormat::Json => eprintln!("Called with {}", root.display()),
    }

    let config = WalkConfig::builder()
        .root(root)
        .threads(cli.threads)
        .follow_symlinks(cli.follow_symlinks)
        .include_hidden(!cli.no_hidden)
        .max_depth(cli.max_depth)
        .ignore_patterns(cli.ignore)
        .build()
        .context("Invalid configuration")?;

    let report = Walker::new(config).walk().context("Walk failed")?;

    match cli.format {
        OutputFormat::Text => print_report(&report),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(ExitCode::SUCCESS)
}

fn setup_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("extwalk=debug,extwalk_scan=debug,warn")
    } else {
        EnvFilter::new("extwalk=info,extwalk_scan=info,warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Print the completion line and every group with its files.
fn print_report(report: &WalkReport) {
    println!("Completed in {:.2}s", report.duration.as_secs_f64());

    for (key, paths) in report.groups.iter() {
        println!("{key}");
        for path in paths {
            println!("    {}", path.display());
        }
    }

    if report.has_warnings() {
        println!();
        println!("{} warning(s) during walk", report.warnings.len());
    }
}
