//! Configuration and corpus shared by every command

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::{Path, PathBuf};
use sx_ast::{JsonDirProvider, PackageMap};
use sx_driver::{Analysis, Build, Config};

/// A configured build over one AST directory
pub struct Session {
    ast_dir: PathBuf,
    config: Config,
    packages: PackageMap,
}

impl Session {
    /// Read configuration and package grouping for `ast_dir`
    pub fn open(ast_dir: &Path, config: Option<&Path>, packages: Option<&Path>) -> Result<Self> {
        let config = match config {
            Some(path) => Config::from_file(path),
            None => Config::find_in_dir(ast_dir),
        }
        .context("Failed to load configuration")?;

        let packages = match packages {
            Some(path) => PackageMap::from_file(path)
                .with_context(|| format!("Failed to load package file: {}", path.display()))?,
            None => PackageMap::empty(),
        };

        tracing::debug!(
            ast_dir = %ast_dir.display(),
            extension = %config.corpus.ast_extension,
            packages = packages.packages().count(),
            "opened corpus"
        );
        Ok(Self {
            ast_dir: ast_dir.to_path_buf(),
            config,
            packages,
        })
    }

    /// Override the configured consumer threshold
    pub fn with_min_consumers(mut self, min_consumers: Option<usize>) -> Self {
        if let Some(min) = min_consumers {
            self.config.stats.min_consumers = min.max(sx_usage::MIN_CONSUMERS);
        }
        self
    }

    /// Override the configured list length
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        if limit.is_some() {
            self.config.stats.limit = limit;
        }
        self
    }

    /// Directory the module trees are read from
    pub fn ast_dir(&self) -> &Path {
        &self.ast_dir
    }

    /// The configured build
    pub fn build(&self) -> Build<JsonDirProvider> {
        Build::from_dir(&self.ast_dir, self.config.clone()).with_packages(self.packages.clone())
    }

    /// Analyze the corpus, printing per-module failures when `text` is set
    pub fn analyze(&self, text: bool) -> Result<Analysis> {
        let analysis = self
            .build()
            .analyze()
            .with_context(|| format!("Failed to index {}", self.ast_dir.display()))?;

        if text {
            for skipped in &analysis.skipped {
                eprintln!(
                    "{} Skipped {}: {}",
                    "Warning:".yellow().bold(),
                    skipped.identifier,
                    skipped.reason
                );
            }
        }
        Ok(analysis)
    }
}
