mod cli_args;
mod commands;
mod output;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use colored::*;
use log;
use std::path::Path;
use std::process;

use cli_args::{Cli, Commands, ConfigFileOpts, MergeOpts, SourceOpts};
use xamalgam_core::{AppError, Config};

fn main() {
    let cli_args = Cli::parse();

    setup_logging(cli_args.quiet, cli_args.verbose);

    let quiet = cli_args.quiet;

    log::debug!("CLI args parsed: {:?}", cli_args);

    let exit_code = match run_app(cli_args, quiet) {
        Ok(_) => {
            log::info!("Application finished successfully.");
            0
        }
        Err(e) => {
            let exit_code = exit_code_for(&e);

            // Configuration and argument errors are shown even when quiet.
            if !quiet || exit_code == 1 || exit_code == 5 {
                eprintln!("{} {:#}", "Error:".red().bold(), e);
            } else {
                log::error!("Application failed: {:#}", e);
            }

            exit_code
        }
    };
    log::debug!("Exiting with code {}", exit_code);
    process::exit(exit_code);
}

fn exit_code_for(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<AppError>() {
        Some(AppError::Config(_)) => 1,
        Some(AppError::TomlParse(_)) => 1,
        Some(AppError::TomlSerialize(_)) => 1,
        Some(AppError::Io(_)) => 2,
        Some(AppError::FileRead { .. }) => 2,
        Some(AppError::FileWrite { .. }) => 2,
        Some(AppError::DirCreation { .. }) => 2,
        Some(AppError::WalkDir(_)) => 2,
        Some(AppError::InvalidArgument(_)) => 5,
        Some(AppError::JsonSerialize(_)) => 6,
        Some(AppError::YamlError(_)) => 6,
        Some(AppError::XmlSerialize(_)) => 6,
        Some(_) => 1,
        None => 1,
    }
}

fn setup_logging(quiet: bool, verbose: u8) {
    let log_level = if quiet {
        log::LevelFilter::Off
    } else {
        match verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    };
    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .init();
    log::trace!("Logger initialized with level: {:?}", log_level);
}

fn run_app(cli: Cli, quiet: bool) -> Result<()> {
    match cli.command {
        None => {
            Cli::command().print_help()?;
        }
        Some(command) => match command {
            Commands::Generate(args) => {
                log::debug!("Executing 'generate' command...");
                commands::generate::handle_generate_command(args, quiet)?;
            }
            Commands::Plan(args) => {
                log::debug!("Executing 'plan' command...");
                commands::plan::handle_plan_command(args, quiet)?;
            }
            Commands::Config(args) => {
                log::debug!("Executing 'config' command...");
                let base_dir = Config::current_dir().context("Failed to read current directory")?;
                commands::config::handle_config_command(&args, &base_dir, quiet)?;
            }
            Commands::Completion(args) => {
                log::debug!("Executing 'completion' command...");
                commands::completion::handle_completion_command(&args)?;
            }
        },
    }
    Ok(())
}

fn merge_config_with_cli_overrides(
    mut config: Config,
    sources: &SourceOpts,
    merge: &MergeOpts,
) -> Config {
    log::trace!("Applying CLI overrides to config...");

    if let Some(source) = &sources.source {
        config.general.source = Some(source.clone());
    }
    if let Some(output) = &sources.output {
        config.general.output = Some(output.clone());
    }
    if let Some(excluded) = &sources.excluded {
        config.general.excluded = excluded.clone();
    }
    if sources.recursive {
        config.general.recursive = true;
    }
    if sources.flat {
        config.general.recursive = false;
    }

    if let Some(define) = &merge.define {
        config.merge.define = Some(define.clone());
    }
    if let Some(inline_macro) = &merge.inline_macro {
        config.merge.inline_macro = Some(inline_macro.clone());
    }

    log::trace!("Config after CLI overrides: {:?}", config);
    config
}

/// Loads `xamalgam.toml` (or the file given on the command line) from `base_dir` and layers
/// the command's flags on top.
pub fn load_config_for_command(
    base_dir: &Path,
    config_opts: &ConfigFileOpts,
    sources: &SourceOpts,
    merge: &MergeOpts,
) -> Result<Config> {
    let config_path = Config::resolve_config_path(
        base_dir,
        config_opts.config_file.as_ref(),
        config_opts.disable_config_file,
    )
    .context("Failed to resolve configuration path")?;

    let config = match &config_path {
        Some(path) => Config::load_from_path(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::default(),
    };

    Ok(merge_config_with_cli_overrides(config, sources, merge))
}
