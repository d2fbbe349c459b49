use crate::cli_args::GenerateArgs;
use crate::load_config_for_command;
use anyhow::{Context, Result};
use colored::*;
use log;
use xamalgam_core::{self as core, Config};

pub fn handle_generate_command(args: GenerateArgs, quiet: bool) -> Result<()> {
    let base_dir = Config::current_dir().context("Failed to read current directory")?;
    let config = load_config_for_command(&base_dir, &args.config_file, &args.sources, &args.merge)
        .context("Failed to load configuration for generate command")?;
    let params = config.to_params()?;
    log::debug!("Generate params: {:?}", params);

    let outcome = core::generate_header(&params).with_context(|| {
        format!(
            "Failed to amalgamate {} into {}",
            params.source_folder.display(),
            params.output.display()
        )
    })?;

    if quiet {
        return Ok(());
    }
    match outcome {
        Some(result) => {
            let breaks = result.ordering.forced().len();
            println!(
                "{} Merged {} files into: {}",
                "✅".green(),
                result.ordering.len().to_string().cyan(),
                params.output.display().to_string().blue()
            );
            if breaks > 0 {
                println!(
                    "{} {} include cycle break(s); run `xamalgam plan` for details.",
                    "⚠️".yellow(),
                    breaks
                );
            }
        }
        None => {
            println!(
                "{} No files to merge in {}; nothing written.",
                "ℹ️".blue(),
                params.source_folder.display().to_string().cyan()
            );
        }
    }
    Ok(())
}
