//! Where a referenced name comes from

use crate::corpus::ModuleId;
use sx_intern::Name;

/// A symbol as known inside one particular module
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct QualifiedName {
    /// Module owning the symbol
    pub module: ModuleId,
    /// Name of the symbol inside that module
    pub symbol: Name,
}

impl QualifiedName {
    /// Pair a module with one of its symbols
    #[must_use]
    pub fn new(module: ModuleId, symbol: Name) -> Self {
        Self { module, symbol }
    }
}

/// Classification of one entry of a module's import map
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SymbolOrigin {
    /// Module-local and not exported
    Private,
    /// Defined and exported by the referencing module itself
    LocalPublic,
    /// Owned by exactly one other module of the corpus
    External(QualifiedName),
    /// Owned by something outside the corpus
    Intrinsic,
    /// Several modules of the corpus could own it, in discovery order
    Ambiguous(Vec<QualifiedName>),
}

impl SymbolOrigin {
    /// Corpus symbols this entry depends on
    ///
    /// Empty for private, local and intrinsic names; one element for an
    /// external name; every candidate for an ambiguous one.
    #[must_use]
    pub fn targets(&self) -> &[QualifiedName] {
        match self {
            Self::External(target) => std::slice::from_ref(target),
            Self::Ambiguous(candidates) => candidates,
            Self::Private | Self::LocalPublic | Self::Intrinsic => &[],
        }
    }

    /// Whether the entry names more than one possible owner
    #[must_use]
    pub fn is_ambiguous(&self) -> bool {
        matches!(self, Self::Ambiguous(_))
    }

    /// Short label used in reports
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Private => "private",
            Self::LocalPublic => "local",
            Self::External(_) => "external",
            Self::Intrinsic => "intrinsic",
            Self::Ambiguous(_) => "ambiguous",
        }
    }
}
