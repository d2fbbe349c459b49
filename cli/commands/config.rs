use anyhow::{Context, Result};
use colored::*;
use std::io::{self, Write};
use std::path::Path;
use xamalgam_core::Config;
use xamalgam_core::config::DEFAULT_CONFIG_FILENAME;
use xamalgam_core::output::write_atomically;

use crate::cli_args::ConfigArgs;
use crate::output::write_to_stdout;

pub fn handle_config_command(args: &ConfigArgs, base_dir: &Path, quiet: bool) -> Result<()> {
    let content = Config::template()
        .to_toml_string()
        .context("Failed to serialize default configuration")?;

    if !args.save {
        return write_to_stdout(&content);
    }

    let save_path = base_dir.join(DEFAULT_CONFIG_FILENAME);
    if save_path.exists() {
        if !quiet {
            print!(
                "{} Config file already exists at '{}'. Overwrite? [{}/{}] ",
                "⚠️".yellow(),
                save_path.display().to_string().cyan(),
                "y".green(),
                "N".red()
            );
            io::stdout().flush().context("Failed to flush stdout")?;
            let mut response = String::new();
            io::stdin()
                .read_line(&mut response)
                .context("Failed to read user input")?;
            if !response.trim().eq_ignore_ascii_case("y") {
                println!("Save cancelled.");
                return Ok(());
            }
        } else {
            anyhow::bail!(
                "Target file '{}' exists. Overwrite prevented in quiet mode.",
                save_path.display()
            );
        }
    }

    write_atomically(&save_path, &content)?;
    if !quiet {
        println!(
            "{} Default config saved to: {}",
            "✅".green(),
            save_path.display().to_string().blue()
        );
    }
    Ok(())
}
