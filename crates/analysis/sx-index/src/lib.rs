//! Corpus-wide symbol index
//!
//! Aggregates the resolved symbol tables of every module into reverse maps:
//! which modules own a given symbol, and which symbols a module exports. The
//! index owns the module descriptors for the rest of the build.

use indexmap::{IndexMap, IndexSet};
use std::collections::BTreeMap;
use sx_intern::Name;
use sx_resolve::{Corpus, ModuleDescriptor, ModuleId, ResolvedCorpus, SymbolOrigin};

/// Reverse maps over a fully resolved corpus
#[derive(Debug, Clone)]
pub struct CorpusIndex {
    corpus: Corpus,
    symbol_owners: IndexMap<Name, Vec<ModuleId>>,
}

impl CorpusIndex {
    /// Index a resolved corpus
    ///
    /// Owners are recorded in module discovery order. A module counts as an
    /// owner of a symbol only when it defines and exports it itself; passing
    /// on somebody else's symbol does not make it an owner.
    #[must_use]
    pub fn new(resolved: ResolvedCorpus) -> Self {
        let corpus = resolved.into_inner();
        let mut symbol_owners: IndexMap<Name, Vec<ModuleId>> = IndexMap::new();

        for (id, module) in corpus.modules() {
            for &symbol in module.public_symbols() {
                if !module.owns(symbol) {
                    continue;
                }
                let owners = symbol_owners.entry(symbol).or_default();
                if !owners.contains(&id) {
                    owners.push(id);
                }
            }
        }

        Self {
            corpus,
            symbol_owners,
        }
    }

    /// The indexed corpus
    #[must_use]
    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    /// Number of indexed modules
    #[must_use]
    pub fn module_count(&self) -> usize {
        self.corpus.len()
    }

    /// All owners of `symbol`
    #[must_use]
    pub fn owners(&self, symbol: Name) -> &[ModuleId] {
        self.symbol_owners
            .get(&symbol)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// All owners of a symbol given by name in any spelling
    #[must_use]
    pub fn owners_by_name(&self, symbol: &str) -> &[ModuleId] {
        self.corpus
            .interner()
            .get(symbol)
            .map(|symbol| self.owners(symbol))
            .unwrap_or_default()
    }

    /// Every symbol with its owners, in discovery order
    pub fn symbol_owners(&self) -> impl Iterator<Item = (Name, &[ModuleId])> {
        self.symbol_owners
            .iter()
            .map(|(&symbol, owners)| (symbol, owners.as_slice()))
    }

    /// All public symbols of `module`
    #[must_use]
    pub fn publics(&self, module: ModuleId) -> &IndexSet<Name> {
        self.corpus.module(module).public_symbols()
    }

    /// Resolved origin of `symbol` as referenced inside `module`
    #[must_use]
    pub fn origin(&self, module: ModuleId, symbol: Name) -> Option<&SymbolOrigin> {
        self.corpus.module(module).origin(symbol)
    }

    /// Descriptor of a module
    #[must_use]
    pub fn module(&self, module: ModuleId) -> &ModuleDescriptor {
        self.corpus.module(module)
    }

    /// Module with the given name in any spelling
    #[must_use]
    pub fn lookup(&self, module: &str) -> Option<ModuleId> {
        self.corpus.lookup(module)
    }

    /// Module to sorted public symbol names, keyed by module name
    #[must_use]
    pub fn module_publics(&self) -> BTreeMap<String, Vec<String>> {
        self.corpus
            .modules()
            .map(|(id, module)| {
                let mut publics: Vec<String> = module
                    .public_symbols()
                    .iter()
                    .map(|&symbol| self.corpus.name(symbol).to_string())
                    .collect();
                publics.sort();
                (self.corpus.module_name(id).to_string(), publics)
            })
            .collect()
    }

    /// Symbol name to owning module names, owners in discovery order
    #[must_use]
    pub fn owner_names(&self) -> BTreeMap<String, Vec<String>> {
        self.symbol_owners()
            .map(|(symbol, owners)| {
                let owners = owners
                    .iter()
                    .map(|&id| self.corpus.module_name(id).to_string())
                    .collect();
                (self.corpus.name(symbol).to_string(), owners)
            })
            .collect()
    }

    /// Module to the sorted private names it refers to
    ///
    /// Modules without private references are left out.
    #[must_use]
    pub fn privates_referenced(&self) -> BTreeMap<String, Vec<String>> {
        self.corpus
            .modules()
            .filter_map(|(id, module)| {
                let mut privates: Vec<String> = module
                    .import_map()
                    .iter()
                    .filter(|(_, origin)| matches!(origin, SymbolOrigin::Private))
                    .map(|(&symbol, _)| self.corpus.name(symbol).to_string())
                    .collect();
                if privates.is_empty() {
                    return None;
                }
                privates.sort();
                Some((self.corpus.module_name(id).to_string(), privates))
            })
            .collect()
    }
}
