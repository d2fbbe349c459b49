use anyhow::{Context, Result};
use byte_unit::{Byte, UnitType};
use colored::*;
use comfy_table::{Cell, CellAlignment, Color, ContentArrangement, Table, presets::UTF8_FULL};
use serde::Serialize;
use std::io::{self, Write};
use xamalgam_core::{PlanReport, output_formats};

use crate::cli_args::FormatOutputOpts;

pub fn print_structured<T: Serialize>(
    data: &T,
    format_opts: &FormatOutputOpts,
    root_name: &str,
) -> Result<()> {
    let format = format_opts.format.as_deref().unwrap_or("json");
    let pretty_json = !format_opts.enable_json_minify;
    let content = serialize_output(data, format, pretty_json, root_name)?;
    write_to_stdout(&content)
}

fn serialize_output<T: Serialize>(
    data: &T,
    format: &str,
    pretty_json: bool,
    xml_root: &str,
) -> Result<String> {
    let content = match format.to_lowercase().as_str() {
        "yaml" | "yml" => output_formats::serialize_to_yaml(data)?,
        "xml" => output_formats::serialize_to_xml(data, xml_root)?,
        _ => output_formats::serialize_to_json(data, pretty_json)?,
    };
    Ok(content)
}

pub fn write_to_stdout(content: &str) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle
        .write_all(content.as_bytes())
        .context("Failed to write to stdout")?;
    if !content.ends_with('\n') {
        handle
            .write_all(b"\n")
            .context("Failed to write newline to stdout")?;
    }
    handle.flush().context("Failed to flush stdout")?;
    Ok(())
}

pub fn human_size(bytes: usize) -> String {
    Byte::from_u64(bytes as u64)
        .get_appropriate_unit(UnitType::Binary)
        .to_string()
}

pub fn print_plan_table(report: &PlanReport) -> Result<()> {
    println!();
    println!("{}", " Amalgamation Plan ".green().bold().underline());
    println!("{:<16} {}", "Source:".green(), report.source_folder.cyan());
    println!("{:<16} {}", "Output:".green(), report.output.cyan());
    println!(
        "{:<16} {}",
        "Files:".green(),
        report.total_files.to_string().cyan()
    );
    println!(
        "{:<16} {}",
        "Dependencies:".green(),
        report.edge_count.to_string().cyan()
    );
    println!(
        "{:<16} {}",
        "Merged size:".green(),
        human_size(report.total_bytes).cyan()
    );
    if !report.excluded.is_empty() {
        println!(
            "{:<16} {}",
            "Excluded:".green(),
            report.excluded.join(", ").yellow()
        );
    }
    if !report.cycle_breaks.is_empty() {
        println!(
            "{:<16} {}",
            "Cycle breaks:".green(),
            report.cycle_breaks.join(", ").red()
        );
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("#").fg(Color::Green),
        Cell::new("Path").fg(Color::Green),
        Cell::new("Size").fg(Color::Green),
        Cell::new("Depends on").fg(Color::Green),
        Cell::new("Unresolved").fg(Color::Green),
    ]);
    for file in &report.files {
        let path_cell = if file.forced {
            Cell::new(format!("{} (cycle break)", file.path)).fg(Color::Red)
        } else {
            Cell::new(&file.path).fg(Color::Cyan)
        };
        table.add_row(vec![
            Cell::new(file.position).set_alignment(CellAlignment::Right),
            path_cell,
            Cell::new(human_size(file.size))
                .set_alignment(CellAlignment::Right)
                .fg(Color::DarkGrey),
            Cell::new(file.dependencies.join("\n")),
            Cell::new(file.unresolved.join("\n")).fg(Color::Yellow),
        ]);
    }
    println!("\n{table}");
    println!();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_use_binary_units() {
        assert!(human_size(512).starts_with("512"));
        let two_kib = human_size(2048);
        assert!(two_kib.starts_with('2') && two_kib.ends_with("KiB"));
    }

    #[test]
    fn unknown_format_falls_back_to_json() {
        let data = vec!["a.h"];
        assert_eq!(serialize_output(&data, "json", false, "Files").unwrap(), r#"["a.h"]"#);
        assert!(serialize_output(&data, "yml", false, "Files").unwrap().contains("- a.h"));
    }
}
