//! Build command implementation

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;

use crate::session::Session;

pub fn run_build(session: &Session, out_dir: &Path, format: &str) -> Result<()> {
    if !matches!(format, "text" | "json") {
        anyhow::bail!("Unknown format: {}", format);
    }
    if format == "text" {
        println!(
            "{} index for {:?} into {:?}",
            "Building".green().bold(),
            session.ast_dir(),
            out_dir
        );
    }

    let report = session
        .build()
        .run(out_dir)
        .with_context(|| format!("Build into {} failed", out_dir.display()))?;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    for skipped in &report.skipped {
        eprintln!(
            "{} Skipped {}: {}",
            "Warning:".yellow().bold(),
            skipped.identifier,
            skipped.reason
        );
    }
    for diagnostic in report.warnings() {
        eprintln!("{} {}", "Warning:".yellow().bold(), diagnostic.message);
    }

    println!("\n{}", "Summary:".bold());
    println!("  Modules indexed: {}", report.indexed);
    println!("  Modules skipped: {}", report.skipped.len());
    if !report.ignored.is_empty() {
        println!("  Non-module trees: {}", report.ignored.len());
    }
    println!("  Ambiguous symbols: {}", report.ambiguous_symbols);
    if !report.top_modules.is_empty() {
        println!("  Most used modules:");
        for entry in &report.top_modules {
            println!("    {:<30} {:>6}", entry.name, entry.count);
        }
    }
    println!("\n{} Wrote {} files:", "Done:".green().bold(), report.written.len());
    for path in &report.written {
        println!("  {}", path.display());
    }

    Ok(())
}
