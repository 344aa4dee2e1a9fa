//! Module descriptions as handed over by the AST provider
//!
//! The provider parses raw sources elsewhere and leaves one structured tree per
//! module behind. This crate defines the shape of those trees, validates them,
//! and exposes the read-only package grouping used to bucket statistics.
//!
//! # Architecture
//!
//! - **Module trees**: [`ModuleAst`] and [`ImportStmt`], validated from JSON
//! - **Providers**: the [`AstProvider`] trait with a directory-backed and an
//!   in-memory implementation
//! - **Packages**: [`PackageMap`], the module to package lookup

pub mod error;
pub mod module;
pub mod package;
pub mod provider;

pub use error::AstError;
pub use module::{ImportKind, ImportStmt, LoadedAst, ModuleAst, parse_module_ast};
pub use package::{PackageDef, PackageMap, encode_package_name};
pub use provider::{AstProvider, JsonDirProvider, MemoryProvider};
