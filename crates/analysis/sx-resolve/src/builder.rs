//! Module symbol table builder

use crate::corpus::{Corpus, ImportBinding, ModuleId, ResolvedCorpus};
use crate::diagnostic::ResolutionDiagnostic;
use crate::origin::{QualifiedName, SymbolOrigin};
use indexmap::{IndexMap, IndexSet};
use sx_intern::Name;

/// Import map of one module plus what went wrong while building it
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    /// Origin of every name the module refers to
    pub import_map: IndexMap<Name, SymbolOrigin>,
    /// Recoverable problems met on the way
    pub diagnostics: Vec<ResolutionDiagnostic>,
}

/// Result of resolving every module of a corpus
#[derive(Debug, Clone)]
pub struct ResolutionResult {
    /// The corpus with all import maps in place
    pub corpus: ResolvedCorpus,
    /// Diagnostics of all modules, in module order
    pub diagnostics: Vec<ResolutionDiagnostic>,
}

/// Build the import map of every module in `corpus`
///
/// Each module only reads the exports and raw imports of other modules, never
/// their import maps, so the order modules are visited in does not matter.
#[must_use]
pub fn resolve_corpus(mut corpus: Corpus) -> ResolutionResult {
    let mut tables = Vec::with_capacity(corpus.len());
    let mut diagnostics = Vec::new();

    {
        let builder = SymbolTableBuilder::new(&corpus);
        for (id, _) in corpus.modules() {
            let table = builder.build(id);
            diagnostics.extend(table.diagnostics);
            tables.push((id, table.import_map));
        }
    }

    for (id, import_map) in tables {
        corpus.install(id, import_map);
    }

    tracing::info!(
        modules = corpus.len(),
        diagnostics = diagnostics.len(),
        "symbol tables built"
    );

    ResolutionResult {
        corpus: ResolvedCorpus { inner: corpus },
        diagnostics,
    }
}

/// Candidates collected for one local name
#[derive(Debug, Default)]
struct Outcome {
    candidates: IndexSet<QualifiedName>,
    intrinsic: bool,
    cycle: bool,
}

impl Outcome {
    fn merge(&mut self, other: Self) {
        self.candidates.extend(other.candidates);
        self.intrinsic |= other.intrinsic;
        self.cycle |= other.cycle;
    }

    fn into_origin(self) -> SymbolOrigin {
        if self.cycle || self.candidates.len() > 1 {
            return SymbolOrigin::Ambiguous(self.candidates.into_iter().collect());
        }
        match self.candidates.into_iter().next() {
            Some(owner) => SymbolOrigin::External(owner),
            None => SymbolOrigin::Intrinsic,
        }
    }
}

/// One pending step of a re-export walk
struct Frame {
    module: Name,
    symbol: Name,
    depth: usize,
}

/// Builds module symbol tables against a fixed corpus
pub struct SymbolTableBuilder<'a> {
    corpus: &'a Corpus,
}

impl<'a> SymbolTableBuilder<'a> {
    /// Create a builder reading exports from `corpus`
    #[must_use]
    pub fn new(corpus: &'a Corpus) -> Self {
        Self { corpus }
    }

    /// Build the symbol table of one module
    ///
    /// Imports are processed in source order. A local name bound by several
    /// imports collects the owners of all of them; it only stays unambiguous
    /// when they all lead to the same symbol.
    #[must_use]
    pub fn build(&self, id: ModuleId) -> SymbolTable {
        let module = self.corpus.module(id);
        let mut bindings: IndexMap<Name, Outcome> = IndexMap::new();
        let mut diagnostics = Vec::new();

        for import in module.imports() {
            match import.binding {
                ImportBinding::Symbol { name, local } => {
                    let outcome = self.resolve_export(id, import.source, name, &mut diagnostics);
                    bindings.entry(local).or_default().merge(outcome);
                }
                ImportBinding::Everything => {
                    let Some(source) = self.corpus.module_id(import.source) else {
                        tracing::debug!(
                            module = self.corpus.module_name(id),
                            source = self.corpus.name(import.source),
                            "catch-all import of a module outside the corpus"
                        );
                        continue;
                    };
                    for &symbol in self.corpus.module(source).public_symbols() {
                        let outcome =
                            self.resolve_export(id, import.source, symbol, &mut diagnostics);
                        bindings.entry(symbol).or_default().merge(outcome);
                    }
                }
            }
        }

        let mut import_map: IndexMap<Name, SymbolOrigin> = bindings
            .into_iter()
            .map(|(local, outcome)| (local, outcome.into_origin()))
            .collect();

        for &public in module.public_symbols() {
            import_map.entry(public).or_insert(SymbolOrigin::LocalPublic);
        }
        for &private in module.private_symbols() {
            import_map.entry(private).or_insert(SymbolOrigin::Private);
        }

        SymbolTable {
            import_map,
            diagnostics,
        }
    }

    /// Find the ultimate owners of `symbol` as exported by module `start`
    ///
    /// Walks forwarding edges depth first. The path holds the modules between
    /// the start and the current frame. Meeting one of them again drops that
    /// branch only, so sibling imports still contribute their owners.
    fn resolve_export(
        &self,
        importer: ModuleId,
        start: Name,
        symbol: Name,
        diagnostics: &mut Vec<ResolutionDiagnostic>,
    ) -> Outcome {
        let mut outcome = Outcome::default();
        let mut path: Vec<ModuleId> = Vec::new();
        let mut stack = vec![Frame {
            module: start,
            symbol,
            depth: 0,
        }];

        while let Some(frame) = stack.pop() {
            path.truncate(frame.depth);

            let Some(current) = self.corpus.module_id(frame.module) else {
                outcome.intrinsic = true;
                continue;
            };

            if path.contains(&current) {
                outcome.cycle = true;
                let mut names: Vec<String> = path
                    .iter()
                    .map(|&id| self.corpus.module_name(id).to_string())
                    .collect();
                names.push(self.corpus.module_name(current).to_string());
                tracing::warn!(
                    module = self.corpus.module_name(importer),
                    symbol = self.corpus.name(symbol),
                    path = %names.join(" -> "),
                    "import cycle, origin left ambiguous"
                );
                diagnostics.push(ResolutionDiagnostic::ImportCycle {
                    module: self.corpus.module_name(importer).to_string(),
                    symbol: self.corpus.name(symbol).to_string(),
                    path: names,
                });
                continue;
            }
            path.push(current);

            let edges = self.forwarding_edges(current, frame.symbol);
            if edges.is_empty() {
                if !self.corpus.module(current).public_symbols().contains(&frame.symbol) {
                    tracing::debug!(
                        importer = self.corpus.module_name(importer),
                        module = self.corpus.module_name(current),
                        symbol = self.corpus.name(frame.symbol),
                        "symbol not exported by its source module"
                    );
                    diagnostics.push(ResolutionDiagnostic::SymbolNotExported {
                        importer: self.corpus.module_name(importer).to_string(),
                        source_module: self.corpus.module_name(current).to_string(),
                        symbol: self.corpus.name(frame.symbol).to_string(),
                    });
                }
                outcome
                    .candidates
                    .insert(QualifiedName::new(current, frame.symbol));
                continue;
            }

            // Reversed so the first import is explored first.
            for (module, symbol) in edges.into_iter().rev() {
                stack.push(Frame {
                    module,
                    symbol,
                    depth: frame.depth + 1,
                });
            }
        }

        outcome
    }

    /// Imports of `module` through which it forwards `symbol`
    fn forwarding_edges(&self, module: ModuleId, symbol: Name) -> Vec<(Name, Name)> {
        let mut edges = Vec::new();
        for import in self.corpus.module(module).imports() {
            match import.binding {
                ImportBinding::Symbol { name, local } if local == symbol => {
                    edges.push((import.source, name));
                }
                ImportBinding::Everything => {
                    let exports = self
                        .corpus
                        .module_id(import.source)
                        .is_some_and(|source| {
                            self.corpus.module(source).public_symbols().contains(&symbol)
                        });
                    if exports {
                        edges.push((import.source, symbol));
                    }
                }
                ImportBinding::Symbol { .. } => {}
            }
        }
        edges
    }
}
