//! Stats command implementation

use anyhow::Result;
use colored::Colorize;
use sx_usage::UsageEntry;

use crate::session::Session;

pub fn print_stats(session: &Session, format: &str) -> Result<()> {
    match format {
        "json" => {
            let analysis = session.analyze(false)?;
            println!("{}", serde_json::to_string_pretty(&analysis.stats)?);
        }
        "text" => {
            println!(
                "{} usage statistics for {:?}",
                "Calculating".green().bold(),
                session.ast_dir()
            );
            let analysis = session.analyze(true)?;
            let stats = &analysis.stats;

            print_ranking("Most used modules", &stats.modules, "Module");
            print_ranking("Most used symbols", &stats.symbols, "Symbol");

            for (package, usage) in &stats.packages {
                println!("\n{} {}", "Package:".cyan().bold(), package);
                print_ranking("Modules", &usage.modules, "Module");
                print_ranking("Symbols", &usage.symbols, "Symbol");
            }
        }
        _ => anyhow::bail!("Unknown format: {}", format),
    }

    Ok(())
}

fn print_ranking(title: &str, entries: &[UsageEntry], column: &str) {
    if entries.is_empty() {
        println!("\n{} {}: nothing used by more than one module", "Info:".cyan().bold(), title);
        return;
    }

    println!("\n{} {}:\n", "Results:".green().bold(), title);
    println!("{:<50} {:>10}", column, "Consumers");
    println!("{}", "-".repeat(61));
    for entry in entries {
        println!("{:<50} {:>10}", truncate_name(&entry.name, 50), entry.count);
    }
}

fn truncate_name(name: &str, max_len: usize) -> String {
    if name.chars().count() <= max_len {
        name.to_string()
    } else {
        let kept: String = name.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}
