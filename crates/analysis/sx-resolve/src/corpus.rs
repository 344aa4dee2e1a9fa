//! Module surfaces of the whole corpus

use crate::diagnostic::ResolutionDiagnostic;
use crate::origin::{QualifiedName, SymbolOrigin};
use indexmap::{IndexMap, IndexSet};
use la_arena::{Arena, Idx};
use rustc_hash::FxHashMap;
use sx_ast::{ImportKind, ModuleAst};
use sx_intern::{Interner, Name};

/// Index of a module inside the corpus arena
pub type ModuleId = Idx<ModuleDescriptor>;

/// One import statement with interned names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Import {
    /// Module the statement imports from
    pub source: Name,
    /// What the statement binds
    pub binding: ImportBinding,
}

/// Names bound by an import statement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportBinding {
    /// `name` from the source module, bound locally as `local`
    Symbol {
        /// Name inside the source module
        name: Name,
        /// Name inside the importing module
        local: Name,
    },
    /// Every export of the source module under its own name
    Everything,
}

/// Everything known about one module
///
/// Exports, private names and raw imports come straight from the module
/// tree. The import map is filled in once by [`crate::resolve_corpus`] and
/// never changes afterwards.
#[derive(Debug, Clone)]
pub struct ModuleDescriptor {
    name: Name,
    publics: IndexSet<Name>,
    privates: IndexSet<Name>,
    imports: Vec<Import>,
    pub(crate) import_map: IndexMap<Name, SymbolOrigin>,
}

impl ModuleDescriptor {
    /// Canonical module name
    #[must_use]
    pub fn name(&self) -> Name {
        self.name
    }

    /// Names the module exports, including re-exported ones
    #[must_use]
    pub fn public_symbols(&self) -> &IndexSet<Name> {
        &self.publics
    }

    /// Unexported names the module refers to
    #[must_use]
    pub fn private_symbols(&self) -> &IndexSet<Name> {
        &self.privates
    }

    /// Import statements in source order
    #[must_use]
    pub fn imports(&self) -> &[Import] {
        &self.imports
    }

    /// Resolved origin of every referenced name
    #[must_use]
    pub fn import_map(&self) -> &IndexMap<Name, SymbolOrigin> {
        &self.import_map
    }

    /// Resolved origin of `symbol` as referenced inside this module
    #[must_use]
    pub fn origin(&self, symbol: Name) -> Option<&SymbolOrigin> {
        self.import_map.get(&symbol)
    }

    /// Whether this module defines and exports `symbol` itself
    #[must_use]
    pub fn owns(&self, symbol: Name) -> bool {
        matches!(self.import_map.get(&symbol), Some(SymbolOrigin::LocalPublic))
    }
}

/// Arena of every module in the corpus, keyed by canonical name
#[derive(Debug, Clone)]
pub struct Corpus {
    interner: Interner,
    modules: Arena<ModuleDescriptor>,
    by_name: FxHashMap<Name, ModuleId>,
}

impl Corpus {
    /// Create an empty corpus interning names into `interner`
    #[must_use]
    pub fn new(interner: Interner) -> Self {
        Self {
            interner,
            modules: Arena::new(),
            by_name: FxHashMap::default(),
        }
    }

    /// Add the module described by `ast`
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionDiagnostic::DuplicateModule`] when a module with the
    /// same canonical name is already present; the corpus is left unchanged.
    pub fn add_module(
        &mut self,
        identifier: &str,
        ast: &ModuleAst,
    ) -> Result<ModuleId, ResolutionDiagnostic> {
        let name = self.interner.intern(&ast.name);
        if self.by_name.contains_key(&name) {
            return Err(ResolutionDiagnostic::DuplicateModule {
                name: self.interner.resolve(name).to_string(),
                identifier: identifier.to_string(),
            });
        }

        let publics = ast.publics.iter().map(|symbol| self.interner.intern(symbol)).collect();
        let privates = ast.privates.iter().map(|symbol| self.interner.intern(symbol)).collect();
        let imports = ast
            .imports
            .iter()
            .map(|import| Import {
                source: self.interner.intern(&import.module),
                binding: match &import.kind {
                    ImportKind::Everything => ImportBinding::Everything,
                    ImportKind::Symbol { name, rename } => {
                        let name = self.interner.intern(name);
                        let local = rename
                            .as_deref()
                            .map_or(name, |rename| self.interner.intern(rename));
                        ImportBinding::Symbol { name, local }
                    }
                },
            })
            .collect();

        let id = self.modules.alloc(ModuleDescriptor {
            name,
            publics,
            privates,
            imports,
            import_map: IndexMap::new(),
        });
        self.by_name.insert(name, id);
        Ok(id)
    }

    /// Interner holding every module and symbol name
    #[must_use]
    pub fn interner(&self) -> &Interner {
        &self.interner
    }

    /// Module with the given canonical name
    #[must_use]
    pub fn module_id(&self, name: Name) -> Option<ModuleId> {
        self.by_name.get(&name).copied()
    }

    /// Module with the given name in any spelling
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<ModuleId> {
        self.interner.get(name).and_then(|name| self.module_id(name))
    }

    /// Descriptor of a module
    #[must_use]
    pub fn module(&self, id: ModuleId) -> &ModuleDescriptor {
        &self.modules[id]
    }

    /// Canonical name of a module
    #[must_use]
    pub fn module_name(&self, id: ModuleId) -> &str {
        self.interner.resolve(self.modules[id].name)
    }

    /// Spelling of an interned name
    #[must_use]
    pub fn name(&self, name: Name) -> &str {
        self.interner.resolve(name)
    }

    /// `module:symbol` rendering of a qualified name
    #[must_use]
    pub fn qualified(&self, target: QualifiedName) -> String {
        format!("{}:{}", self.module_name(target.module), self.name(target.symbol))
    }

    /// Every module in the order it was added
    pub fn modules(&self) -> impl Iterator<Item = (ModuleId, &ModuleDescriptor)> {
        self.modules.iter()
    }

    /// Number of modules
    #[must_use]
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Whether the corpus has no modules
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub(crate) fn install(&mut self, id: ModuleId, import_map: IndexMap<Name, SymbolOrigin>) {
        self.modules[id].import_map = import_map;
    }
}

/// A corpus whose import maps have all been built
#[derive(Debug, Clone)]
pub struct ResolvedCorpus {
    pub(crate) inner: Corpus,
}

impl ResolvedCorpus {
    /// Give up the resolved marker and get the corpus back
    #[must_use]
    pub fn into_inner(self) -> Corpus {
        self.inner
    }
}

impl std::ops::Deref for ResolvedCorpus {
    type Target = Corpus;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
