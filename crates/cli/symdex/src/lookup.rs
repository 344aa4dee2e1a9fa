//! Lookup command implementation

use anyhow::Result;
use colored::Colorize;
use sx_resolve::SymbolOrigin;

use crate::session::Session;

pub fn lookup_symbol(session: &Session, symbol: &str, module: Option<&str>) -> Result<()> {
    let analysis = session.analyze(true)?;
    let index = &analysis.index;
    let corpus = index.corpus();

    let Some(module) = module else {
        let owners = index.owners_by_name(symbol);
        if owners.is_empty() {
            println!("{} No module owns `{}`", "Info:".cyan().bold(), symbol);
        } else {
            println!("{} `{}` is owned by:", "Results:".green().bold(), symbol);
            for &owner in owners {
                println!("  {}", corpus.module_name(owner));
            }
        }
        return Ok(());
    };

    let Some(module_id) = index.lookup(module) else {
        anyhow::bail!("Module `{}` is not in the corpus", module);
    };
    let origin = corpus
        .interner()
        .get(symbol)
        .and_then(|name| index.origin(module_id, name));

    let rendered = match origin {
        None => "not referenced".to_string(),
        Some(SymbolOrigin::Private) => "private to the module".to_string(),
        Some(SymbolOrigin::LocalPublic) => "defined and exported by the module".to_string(),
        Some(SymbolOrigin::Intrinsic) => "provided outside the corpus".to_string(),
        Some(SymbolOrigin::External(target)) => format!("imported from {}", corpus.qualified(*target)),
        Some(SymbolOrigin::Ambiguous(targets)) => {
            let candidates: Vec<String> = targets.iter().map(|target| corpus.qualified(*target)).collect();
            format!("ambiguous between {}", candidates.join(", "))
        }
    };
    let label = origin.map_or("unbound", SymbolOrigin::label);
    println!(
        "{} `{}` in {} [{}]: {}",
        "Results:".green().bold(),
        symbol,
        corpus.module_name(module_id),
        label,
        rendered
    );

    Ok(())
}
