//! Ambiguities command implementation

use anyhow::Result;
use colored::Colorize;

use crate::session::Session;

pub fn print_ambiguities(session: &Session, format: &str) -> Result<()> {
    match format {
        "json" => {
            let analysis = session.analyze(false)?;
            println!("{}", serde_json::to_string_pretty(&analysis.disambiguation)?);
        }
        "text" => {
            let analysis = session.analyze(true)?;
            let report = &analysis.disambiguation;

            if report.is_empty() {
                println!("{} Every exported symbol has a single owner", "Info:".cyan().bold());
                return Ok(());
            }

            println!(
                "{} {} symbols exported by more than one module:\n",
                "Results:".green().bold(),
                report.len()
            );
            for entry in &report.symbols {
                println!("  {}", entry.symbol.bold());
                for owner in &entry.owners {
                    println!("    {owner}");
                }
            }
        }
        _ => anyhow::bail!("Unknown format: {}", format),
    }

    Ok(())
}
