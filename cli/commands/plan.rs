use crate::cli_args::PlanArgs;
use crate::load_config_for_command;
use crate::output::{print_plan_table, print_structured};
use anyhow::{Context, Result};
use colored::*;
use log;
use xamalgam_core::{self as core, Config, PlanReport};

pub fn handle_plan_command(args: PlanArgs, quiet: bool) -> Result<()> {
    let base_dir = Config::current_dir().context("Failed to read current directory")?;
    let config = load_config_for_command(&base_dir, &args.config_file, &args.sources, &args.merge)
        .context("Failed to load configuration for plan command")?;
    let params = config.to_params()?;

    log::debug!("Plan: running every stage except the write...");
    let Some(result) = core::plan(&params).context("Failed to build amalgamation plan")? else {
        if !quiet {
            println!(
                "{} No files to merge in {}.",
                "ℹ️".blue(),
                params.source_folder.display().to_string().cyan()
            );
        }
        return Ok(());
    };

    let report = PlanReport::build(&result, &params.source_folder, &params.output);
    if args.format_output.format.is_none() {
        print_plan_table(&report)?;
    } else {
        log::debug!(
            "Plan: printing structured output (format: {:?})...",
            args.format_output.format
        );
        print_structured(&report, &args.format_output, "PlanReport")?;
    }
    Ok(())
}
