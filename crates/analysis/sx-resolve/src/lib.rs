//! Symbol resolution across a corpus of modules
//!
//! This crate turns the module trees handed over by the AST provider into one
//! symbol table per module. Every name a module refers to is classified as
//! private, locally public, owned by another module of the corpus, intrinsic
//! (owned by something outside the corpus) or ambiguous.
//!
//! # Architecture
//!
//! - **Corpus**: arena of [`ModuleDescriptor`]s holding each module's exports
//!   and raw imports, addressed by [`ModuleId`]
//! - **Symbol table builder**: follows re-export chains to the ultimate owner
//!   of every imported name, with an explicit path for cycle detection
//! - **Diagnostics**: import cycles, unexported symbols and duplicate modules,
//!   all recoverable
//!
//! # Usage
//!
//! ```rust,ignore
//! use sx_resolve::{Corpus, resolve_corpus};
//!
//! let mut corpus = Corpus::new(interner);
//! for ast in &trees {
//!     corpus.add_module("identifier", ast)?;
//! }
//! let result = resolve_corpus(corpus);
//! // result.corpus now carries every module's import map
//! ```

pub mod builder;
pub mod corpus;
pub mod diagnostic;
pub mod origin;

pub use builder::{ResolutionResult, SymbolTable, SymbolTableBuilder, resolve_corpus};
pub use corpus::{Corpus, Import, ImportBinding, ModuleDescriptor, ModuleId, ResolvedCorpus};
pub use diagnostic::ResolutionDiagnostic;
pub use origin::{QualifiedName, SymbolOrigin};
