//! Branch Sweep - prune local branches already squash-merged into a base branch
//!
//! Run with `branch-sweep` for the interactive prompt, or `branch-sweep
//! --help` for usage.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use branch_sweep::{
    APP_NAME, VERSION,
    config::Config,
    git::{GitBackend, GitExecutor},
    prompt,
    sweep::{RunMode, SweepReport, Sweeper},
};

#[derive(Parser)]
#[command(name = APP_NAME)]
#[command(version = VERSION)]
#[command(about = "Find and delete local branches already squash-merged into a base branch")]
#[command(long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Path to the repository (default: discover from the current directory)
    #[arg(short, long)]
    repo: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List branches that can be safely removed (dry run)
    List {
        /// Base branch to check against
        #[arg(short, long)]
        base: Option<String>,
    },

    /// Delete branches whose content is already in the base branch
    Delete {
        /// Base branch to check against
        #[arg(short, long)]
        base: Option<String>,
    },

    /// Show configuration
    Config {
        /// Initialize config file with defaults
        #[arg(long)]
        init: bool,
    },
}

fn setup_logging(debug: bool, log_file: Option<&Path>) -> Result<()> {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        // Use info level for our crate, warn for dependencies
        EnvFilter::new("info")
            .add_directive("gix=warn".parse()?)
            .add_directive("tokio=warn".parse()?)
    };

    if let Some(path) = log_file {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;

        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(file).with_target(false))
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false),
            )
            .with(filter)
            .init();
    }

    Ok(())
}

/// Resolve the base branch: CLI arg → config → detected main branch
fn resolve_base(arg: Option<String>, config: &Config, backend: &GitBackend) -> Result<String> {
    if let Some(base) = arg {
        return Ok(base);
    }
    if let Some(base) = config.default_base.clone() {
        return Ok(base);
    }
    Ok(backend.detect_main_branch()?)
}

fn render_report(report: &SweepReport, mode: RunMode) {
    match mode {
        RunMode::List => {
            println!("Branches already squash-merged into '{}':", report.base);
            if report.deletable.is_empty() {
                println!("No local branches can be safely removed.");
            } else {
                for branch in &report.deletable {
                    println!("  {}", branch);
                }
            }
        }
        RunMode::Delete => {
            if report.deletable.is_empty() {
                println!("No local branches can be safely removed.");
            }
            for outcome in &report.deletions {
                match &outcome.result {
                    Ok(message) => println!("{}", message),
                    Err(e) => eprintln!("Failed to delete '{}': {}", outcome.branch, e),
                }
            }
        }
    }

    if !report.retained.is_empty() {
        println!(
            "Keeping {} branch(es) with work not yet in '{}'.",
            report.retained.len(),
            report.base
        );
    }

    for (branch, error) in &report.failures {
        eprintln!("Could not classify '{}': {}", branch, error);
    }
}

async fn run_sweep(
    backend: &GitBackend,
    config: &Config,
    base: Option<String>,
    mode: Option<RunMode>,
) -> Result<()> {
    let git = GitExecutor::with_max_concurrent(backend.path(), config.max_concurrent_git);
    let sweeper = Sweeper::new(git);
    sweeper.check_git().await?;

    let default_base = resolve_base(base, config, backend)?;

    // No explicit mode means interactive: the operator picks the base
    // branch from the enumerated list and chooses what to do.
    let (base, mode) = match mode {
        Some(mode) => (default_base, mode),
        None => {
            let branches = sweeper.branches().await?;
            if branches.is_empty() {
                println!("No local branches found.");
                return Ok(());
            }
            let base = prompt::select_base_branch(&branches, &default_base)?;
            let mode = prompt::select_mode()?;
            (base, mode)
        }
    };

    info!(
        "Sweeping '{}' against '{}' in {:?} mode",
        backend.repo_name(),
        base,
        mode
    );

    let report = sweeper.run(&base, mode).await?;
    render_report(&report, mode);

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Install color-eyre error hooks
    color_eyre::install()?;

    let cli = Cli::parse();

    // Load configuration
    let config = Config::load().unwrap_or_else(|e| {
        eprintln!("Warning: Failed to load config, using defaults: {}", e);
        Config::default()
    });

    setup_logging(cli.debug || config.debug, config.log_file.as_deref())?;

    match cli.command {
        Some(Commands::Config { init }) => {
            if init {
                config.save()?;
                println!(
                    "Configuration initialized at {:?}",
                    Config::config_file_path()?
                );
            } else {
                println!("Configuration:");
                println!("{}", toml::to_string_pretty(&config)?);
                println!("\nConfig file: {:?}", Config::config_file_path()?);
            }
        }

        Some(Commands::List { base }) => {
            let backend = discover(&cli.repo)?;
            run_sweep(&backend, &config, base, Some(RunMode::List)).await?;
        }

        Some(Commands::Delete { base }) => {
            let backend = discover(&cli.repo)?;
            run_sweep(&backend, &config, base, Some(RunMode::Delete)).await?;
        }

        None => {
            let backend = discover(&cli.repo)?;
            run_sweep(&backend, &config, None, None).await?;
        }
    }

    Ok(())
}

fn discover(repo: &Option<PathBuf>) -> Result<GitBackend> {
    let backend = match repo {
        Some(path) => GitBackend::open(path)?,
        None => GitBackend::discover(std::env::current_dir()?)?,
    };
    Ok(backend)
}
