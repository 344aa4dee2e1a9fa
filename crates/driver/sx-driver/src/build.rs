//! The build pipeline

use std::path::{Path, PathBuf};
use sx_ast::{AstProvider, JsonDirProvider, PackageMap};
use sx_disambig::DisambiguationReport;
use sx_index::CorpusIndex;
use sx_resolve::{ResolutionDiagnostic, resolve_corpus};
use sx_usage::{UsageAggregator, UsageStats};
use tracing::info;

use crate::config::Config;
use crate::emit::{build_payloads, write_payloads};
use crate::load::{SkippedModule, load_corpus};
use crate::lock::OutputLock;
use crate::report::BuildReport;
use crate::DriverError;

/// Everything computed from one corpus, before anything is written
#[derive(Debug, Clone)]
pub struct Analysis {
    /// Resolved and indexed corpus
    pub index: CorpusIndex,

    /// Ranked usage statistics
    pub stats: UsageStats,

    /// Symbols exported by more than one module
    pub disambiguation: DisambiguationReport,

    /// Modules left out of the index
    pub skipped: Vec<SkippedModule>,

    /// Trees that were not modules
    pub ignored: Vec<String>,

    /// Resolution conditions, in module order
    pub diagnostics: Vec<ResolutionDiagnostic>,
}

/// A configured build over one AST provider
#[derive(Debug)]
pub struct Build<P> {
    provider: P,
    packages: PackageMap,
    config: Config,
}

impl Build<JsonDirProvider> {
    /// Build over the module trees stored in `ast_dir`
    #[must_use]
    pub fn from_dir(ast_dir: &Path, config: Config) -> Self {
        let provider = JsonDirProvider::with_extension(ast_dir, config.corpus.ast_extension.as_str());
        Self::new(provider, config)
    }
}

impl<P: AstProvider> Build<P> {
    /// Build over `provider` with no package grouping
    #[must_use]
    pub fn new(provider: P, config: Config) -> Self {
        Self {
            provider,
            packages: PackageMap::empty(),
            config,
        }
    }

    /// Group statistics by `packages`
    #[must_use]
    pub fn with_packages(mut self, packages: PackageMap) -> Self {
        self.packages = packages;
        self
    }

    /// Load, resolve, index and aggregate the corpus without writing anything
    ///
    /// # Errors
    ///
    /// Fails if the corpus cannot be read.
    pub fn analyze(&self) -> Result<Analysis, DriverError> {
        let loaded = load_corpus(&self.provider)?;
        let resolution = resolve_corpus(loaded.corpus);
        let index = CorpusIndex::new(resolution.corpus);

        let stats = UsageAggregator::new()
            .with_min_consumers(self.config.stats.min_consumers)
            .with_limit(self.config.stats.limit)
            .aggregate(&index, &self.packages);
        let disambiguation = DisambiguationReport::from_index(&index);
        info!(
            modules_used = stats.modules.len(),
            symbols_used = stats.symbols.len(),
            ambiguous = disambiguation.len(),
            "aggregated corpus"
        );

        Ok(Analysis {
            index,
            stats,
            disambiguation,
            skipped: loaded.skipped,
            ignored: loaded.ignored,
            diagnostics: resolution.diagnostics,
        })
    }

    /// Run the whole build and write payloads into `out_dir`
    ///
    /// The directory is locked for the duration of the build.
    ///
    /// # Errors
    ///
    /// Fails if the output names are unusable, the directory is locked, the
    /// corpus cannot be read or a payload cannot be written.
    pub fn run(&self, out_dir: &Path) -> Result<BuildReport, DriverError> {
        self.config
            .output
            .validate()
            .map_err(|reason| DriverError::Output { reason })?;
        let lock = OutputLock::acquire(out_dir)?;
        let analysis = self.analyze()?;
        let written = self.emit(&analysis, lock.dir())?;
        info!(dir = %out_dir.display(), files = written.len(), "build finished");
        Ok(BuildReport::new(&analysis, written))
    }

    fn emit(&self, analysis: &Analysis, dir: &Path) -> Result<Vec<PathBuf>, DriverError> {
        let payloads = build_payloads(
            &analysis.index,
            &self.packages,
            &analysis.stats,
            &analysis.disambiguation,
            &self.config.output,
        )?;
        write_payloads(dir, &payloads)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lock::LOCK_FILE_NAME;
    use sx_ast::MemoryProvider;

    fn provider() -> MemoryProvider {
        MemoryProvider::new()
            .with("a", r#"{"name": "A", "publics": ["foo", "bar"], "imports": []}"#)
            .with("b", r#"{"name": "B", "publics": ["bar"], "imports": [{"module": "A", "symbol": "foo"}]}"#)
            .with("c", r#"{"name": "C", "publics": [], "imports": [{"module": "A", "symbol": "foo"}, {"module": "B", "all": true}]}"#)
            .with("bad", r#"{"name": "bad"}"#)
    }

    #[test]
    fn test_analyze() {
        let analysis = Build::new(provider(), Config::default()).analyze().unwrap();

        assert_eq!(analysis.index.module_count(), 3);
        assert_eq!(analysis.skipped.len(), 1);
        assert_eq!(analysis.stats.symbols[0].name, "a:foo");
        assert_eq!(analysis.stats.symbols[0].count, 2);
        assert_eq!(analysis.disambiguation.owners("bar").map(<[String]>::len), Some(2));
    }

    #[test]
    fn test_run_writes_payloads_and_releases_lock() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");

        let report = Build::new(provider(), Config::default()).run(&out).unwrap();
        assert_eq!(report.indexed, 3);
        assert_eq!(report.written.len(), 5);
        assert!(report.written.iter().all(|path| path.exists()));
        assert!(!out.join(LOCK_FILE_NAME).exists());
    }

    #[test]
    fn test_run_rejects_escaping_output_name() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        let mut config = Config::default();
        config.output.disambiguation = "../disambiguation.json".to_string();

        let err = Build::new(provider(), config).run(&out).unwrap_err();
        assert!(matches!(err, DriverError::Output { .. }));
        assert!(!out.exists());
        assert!(!dir.path().join("disambiguation.json").exists());
    }

    #[test]
    fn test_locked_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let _lock = OutputLock::acquire(dir.path()).unwrap();

        let err = Build::new(provider(), Config::default()).run(dir.path()).unwrap_err();
        assert!(matches!(err, DriverError::Locked { .. }));
    }
}
