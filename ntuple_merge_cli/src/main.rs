use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;
use std::sync::Arc;

use ntuple_merge_cli::config::ConfigManager;
use ntuple_merge_cli::error::{CliError, CliResult, ErrorContext, ExitCode};
use ntuple_merge_cli::jobs::{self, JobMode, JobSettings};
use ntuple_merge_cli::logging;
use ntuple_merge_cli::output::{OutputFormat, render_report};
use ntuple_merge_core::{
    DEFAULT_OUTPUT, DEFAULT_PATTERN, EngineFactory, LogObserver, MergeOrchestrator, MergeRequest,
};

#[derive(Parser)]
#[command(name = "ntuple-merge")]
#[command(author, version, about = "Merge per-directory ROOT ntuples and generate the jobs that do it", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a local script or batch submission file for every subdirectory
    Jobs {
        /// Kind of descriptor to write
        #[arg(short, long, value_enum)]
        mode: JobMode,
    },

    /// Merge all matching files under a directory into one output
    Merge {
        /// Directory to search recursively
        #[arg(long, default_value = ".")]
        dir: PathBuf,

        /// File pattern; the text before the first '*' selects files
        #[arg(long, default_value = DEFAULT_PATTERN)]
        pat: String,

        /// Merged output file
        #[arg(long, default_value = DEFAULT_OUTPUT)]
        out: PathBuf,

        /// Report format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print the effective configuration as TOML
    Show,

    /// Print the configuration file location
    Path,

    /// Print a single value
    Get {
        /// Configuration key (e.g., merge.engine)
        key: String,
    },
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    logging::init(cli.debug);

    match run(cli.command) {
        Ok(code) => code.into(),
        Err(error) => {
            eprint!("{}", error.format_for_user(cli.debug));
            error.exit_code().into()
        }
    }
}

fn run(command: Commands) -> CliResult<ExitCode> {
    match command {
        Commands::Jobs { mode } => jobs_command(mode),
        Commands::Merge {
            dir,
            pat,
            out,
            format,
        } => merge_command(dir, &pat, out, format),
        Commands::Config { command } => config_command(command),
    }
}

fn jobs_command(mode: JobMode) -> CliResult<ExitCode> {
    let config = ConfigManager::new().load()?;
    let settings = JobSettings::from(&config.jobs);

    log::debug!("Generating {mode:?} descriptor for '{}'", settings.storage_root.display());
    let generated = jobs::generate(mode, &settings)?;

    let message = match generated.mode {
        JobMode::Local => "Local run script generated:",
        JobMode::Batch => "Condor submission file generated:",
    };
    println!("{} {}", message.green(), generated.path.display());
    log::debug!("{} work units scheduled", generated.units.len());

    Ok(ExitCode::Success)
}

fn merge_command(
    dir: PathBuf,
    pattern: &str,
    out: PathBuf,
    format: OutputFormat,
) -> CliResult<ExitCode> {
    let config = ConfigManager::new().load()?;
    let base_dir = std::path::absolute(&dir)
        .with_context(|| format!("Failed to resolve directory '{}'", dir.display()))?;

    let request = MergeRequest::new(base_dir, pattern, out)
        .with_policy(config.merge.match_policy)
        .with_discovery(config.merge.discovery_options());
    let mut engine = EngineFactory::create(&config.merge.engine_settings());

    let orchestrator = MergeOrchestrator::new(Arc::new(LogObserver));
    let report = orchestrator
        .run(&request, engine.as_mut())
        .context("Merge could not start")?;

    println!("{}", render_report(&report, format, true)?);

    if report.is_success() {
        Ok(ExitCode::Success)
    } else {
        Ok(ExitCode::MergeFailed)
    }
}

fn config_command(command: ConfigCommand) -> CliResult<ExitCode> {
    let manager = ConfigManager::new();

    match command {
        ConfigCommand::Show => {
            eprintln!("Config file: {}", manager.get_config_path().display());
            print!("{}", manager.show()?);
        }
        ConfigCommand::Path => {
            println!("{}", manager.get_config_path().display());
        }
        ConfigCommand::Get { key } => {
            let value = manager.get(&key).map_err(|e| {
                CliError::misuse(&e.to_string()).with_context("key", &key)
            })?;
            println!("{value}");
        }
    }

    Ok(ExitCode::Success)
}
