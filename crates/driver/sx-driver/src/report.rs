//! Summary of a finished build

use serde::Serialize;
use std::path::PathBuf;
use sx_usage::UsageEntry;

use crate::build::Analysis;
use crate::load::SkippedModule;

/// Number of most used modules copied into the report
pub const TOP_MODULES: usize = 5;

/// A resolution condition as shown to the operator
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportedDiagnostic {
    /// Whether it is shown as a warning rather than a note
    pub warning: bool,
    /// Rendered diagnostic text
    pub message: String,
}

/// What a build did
#[derive(Debug, Clone, Serialize)]
pub struct BuildReport {
    /// Modules in the index
    pub indexed: usize,

    /// Modules left out, with reasons
    pub skipped: Vec<SkippedModule>,

    /// Trees that were not modules
    pub ignored: Vec<String>,

    /// Resolution conditions
    pub diagnostics: Vec<ReportedDiagnostic>,

    /// Number of symbols exported by more than one module
    pub ambiguous_symbols: usize,

    /// Most used modules
    pub top_modules: Vec<UsageEntry>,

    /// Payload files written
    pub written: Vec<PathBuf>,
}

impl BuildReport {
    /// Summarize `analysis`
    #[must_use]
    pub fn new(analysis: &Analysis, written: Vec<PathBuf>) -> Self {
        Self {
            indexed: analysis.index.module_count(),
            skipped: analysis.skipped.clone(),
            ignored: analysis.ignored.clone(),
            diagnostics: analysis
                .diagnostics
                .iter()
                .map(|diagnostic| ReportedDiagnostic {
                    warning: diagnostic.is_warning(),
                    message: diagnostic.to_string(),
                })
                .collect(),
            ambiguous_symbols: analysis.disambiguation.len(),
            top_modules: analysis.stats.modules.iter().take(TOP_MODULES).cloned().collect(),
            written,
        }
    }

    /// Diagnostics shown as warnings
    pub fn warnings(&self) -> impl Iterator<Item = &ReportedDiagnostic> {
        self.diagnostics.iter().filter(|diagnostic| diagnostic.warning)
    }
}
