//! Disambiguation report
//!
//! Lists every symbol name exported by more than one module. No owner is
//! preferred over another; the reader of the report picks.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use sx_index::CorpusIndex;

/// A symbol with every module owning it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmbiguousSymbol {
    /// Canonical symbol name
    pub symbol: String,

    /// Owning modules in discovery order
    pub owners: Vec<String>,
}

/// All ambiguous symbols, sorted by name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisambiguationReport {
    /// Ambiguous symbols with their owners
    pub symbols: Vec<AmbiguousSymbol>,
}

impl DisambiguationReport {
    /// Collect the symbols of `index` with more than one owner
    #[must_use]
    pub fn from_index(index: &CorpusIndex) -> Self {
        let corpus = index.corpus();
        let mut symbols: Vec<AmbiguousSymbol> = index
            .symbol_owners()
            .filter(|(_, owners)| owners.len() > 1)
            .map(|(symbol, owners)| AmbiguousSymbol {
                symbol: corpus.name(symbol).to_string(),
                owners: owners
                    .iter()
                    .map(|&owner| corpus.module_name(owner).to_string())
                    .collect(),
            })
            .collect();
        symbols.sort_by(|left, right| left.symbol.cmp(&right.symbol));

        Self { symbols }
    }

    /// Number of ambiguous symbols
    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Whether every symbol has a single owner
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Owners of `symbol` if it is ambiguous
    #[must_use]
    pub fn owners(&self, symbol: &str) -> Option<&[String]> {
        let symbol = symbol.trim().to_lowercase();
        self.symbols
            .binary_search_by(|entry| entry.symbol.as_str().cmp(symbol.as_str()))
            .ok()
            .map(|position| self.symbols[position].owners.as_slice())
    }

    /// Symbol to owners map, as emitted for the lookup page
    #[must_use]
    pub fn to_map(&self) -> BTreeMap<String, Vec<String>> {
        self.symbols
            .iter()
            .map(|entry| (entry.symbol.clone(), entry.owners.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sx_ast::{ImportStmt, ModuleAst};
    use sx_intern::Interner;
    use sx_resolve::{Corpus, resolve_corpus};

    fn report(modules: &[ModuleAst]) -> DisambiguationReport {
        let mut corpus = Corpus::new(Interner::new());
        for module in modules {
            corpus.add_module(&module.name, module).unwrap();
        }
        DisambiguationReport::from_index(&CorpusIndex::new(resolve_corpus(corpus).corpus))
    }

    #[test]
    fn test_single_owner_excluded() {
        let report = report(&[
            ModuleAst::new("A").with_publics(["foo"]),
            ModuleAst::new("B").with_import(ImportStmt::symbol("A", "foo")),
        ]);

        assert!(report.is_empty());
        assert_eq!(report.owners("foo"), None);
    }

    #[test]
    fn test_sorted_symbols_with_owner_order_kept() {
        let report = report(&[
            ModuleAst::new("zeta").with_publics(["norm", "bar"]),
            ModuleAst::new("alpha").with_publics(["bar", "norm", "solo"]),
        ]);

        let symbols: Vec<&str> = report.symbols.iter().map(|entry| entry.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["bar", "norm"]);
        assert_eq!(
            report.owners("BAR"),
            Some(&["zeta".to_string(), "alpha".to_string()][..])
        );
    }

    #[test]
    fn test_import_level_ambiguity_not_reported() {
        let report = report(&[
            ModuleAst::new("A").with_publics(["bar"]),
            ModuleAst::new("B").with_publics(["baz"]),
            ModuleAst::new("C")
                .with_import(ImportStmt::everything("A"))
                .with_import(ImportStmt::everything("B")),
            ModuleAst::new("D")
                .with_publics(["bar"])
                .with_import(ImportStmt::symbol("A", "bar")),
        ]);

        assert!(report.is_empty());
    }

    #[test]
    fn test_to_map() {
        let report = report(&[
            ModuleAst::new("a").with_publics(["x"]),
            ModuleAst::new("b").with_publics(["x"]),
        ]);

        let map = report.to_map();
        assert_eq!(map["x"], vec!["a".to_string(), "b".to_string()]);
    }
}
