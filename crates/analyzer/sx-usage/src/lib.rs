//! Cross-module usage statistics
//!
//! Counts how many distinct modules rely on each module and on each
//! `module:symbol` pair, keeps the targets used by more than one module and
//! ranks them. The same ranking is bucketed by the package owning the target.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use sx_ast::PackageMap;
use sx_index::CorpusIndex;
use sx_resolve::{ModuleDescriptor, ModuleId, QualifiedName};

/// Smallest number of consumers a target needs to be reported
pub const MIN_CONSUMERS: usize = 2;

/// One ranked target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageEntry {
    /// Module name, or `module:symbol` for symbol targets
    pub name: String,

    /// Number of distinct modules using the target
    pub count: usize,
}

/// Ranked targets owned by one package
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageUsage {
    /// Modules of the package, most used first
    pub modules: Vec<UsageEntry>,

    /// Symbols of the package, most used first
    pub symbols: Vec<UsageEntry>,
}

/// Ranked usage of the whole corpus
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageStats {
    /// Most used modules
    pub modules: Vec<UsageEntry>,

    /// Most used symbols
    pub symbols: Vec<UsageEntry>,

    /// Same entries grouped by encoded package identifier
    pub packages: BTreeMap<String, PackageUsage>,
}

/// Number of distinct consumers per target
///
/// Targets keep the order in which they were first counted, which is what
/// keeps ties stable in the ranking.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsageCounters {
    /// Consumers per module
    pub modules: IndexMap<ModuleId, usize>,

    /// Consumers per qualified symbol
    pub symbols: IndexMap<QualifiedName, usize>,
}

impl UsageCounters {
    /// Count every module's import map
    #[must_use]
    pub fn count(index: &CorpusIndex) -> Self {
        index
            .corpus()
            .modules()
            .fold(Self::default(), |counters, (id, module)| {
                counters.with_consumer(id, module)
            })
    }

    /// Add the targets one consuming module depends on
    ///
    /// Private, local and intrinsic names have no targets. An ambiguous name
    /// counts once for each of its candidates. A consumer contributes at most
    /// one to any target, however often it refers to it, and nothing to its
    /// own symbols.
    #[must_use]
    pub fn with_consumer(mut self, consumer: ModuleId, module: &ModuleDescriptor) -> Self {
        let targets: IndexSet<QualifiedName> = module
            .import_map()
            .values()
            .flat_map(|origin| origin.targets().iter().copied())
            .filter(|target| target.module != consumer)
            .collect();
        let modules: IndexSet<ModuleId> = targets.iter().map(|target| target.module).collect();

        for module in modules {
            *self.modules.entry(module).or_default() += 1;
        }
        for target in targets {
            *self.symbols.entry(target).or_default() += 1;
        }
        self
    }
}

/// Turns counters into ranked, filtered, bucketed statistics
#[derive(Debug, Clone)]
pub struct UsageAggregator {
    min_consumers: usize,
    limit: Option<usize>,
}

impl Default for UsageAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl UsageAggregator {
    /// Aggregator keeping every target with more than one consumer
    #[must_use]
    pub fn new() -> Self {
        Self {
            min_consumers: MIN_CONSUMERS,
            limit: None,
        }
    }

    /// Raise the number of consumers a target needs
    ///
    /// Values below [`MIN_CONSUMERS`] are raised to it; singletons are never
    /// reported.
    #[must_use]
    pub fn with_min_consumers(mut self, min: usize) -> Self {
        self.min_consumers = min.max(MIN_CONSUMERS);
        self
    }

    /// Keep at most `limit` entries per list
    #[must_use]
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    /// Count, filter, rank and bucket the usage of `index`
    #[must_use]
    pub fn aggregate(&self, index: &CorpusIndex, packages: &PackageMap) -> UsageStats {
        let counters = UsageCounters::count(index);
        self.rank(index, &counters, packages)
    }

    /// Filter, rank and bucket already computed counters
    #[must_use]
    pub fn rank(
        &self,
        index: &CorpusIndex,
        counters: &UsageCounters,
        packages: &PackageMap,
    ) -> UsageStats {
        let corpus = index.corpus();
        let modules = self.ranked(counters.modules.iter().map(|(&module, &count)| (module, count)));
        let symbols = self.ranked(
            counters
                .symbols
                .iter()
                .map(|(&target, &count)| (target, count)),
        );

        let mut buckets: BTreeMap<String, PackageUsage> = BTreeMap::new();
        for &(module, count) in &modules {
            if let Some(package) = packages.encoded_package_of(corpus.module_name(module)) {
                buckets.entry(package).or_default().modules.push(UsageEntry {
                    name: corpus.module_name(module).to_string(),
                    count,
                });
            }
        }
        for &(target, count) in &symbols {
            if let Some(package) = packages.encoded_package_of(corpus.module_name(target.module)) {
                buckets.entry(package).or_default().symbols.push(UsageEntry {
                    name: corpus.qualified(target),
                    count,
                });
            }
        }
        for bucket in buckets.values_mut() {
            self.truncate(&mut bucket.modules);
            self.truncate(&mut bucket.symbols);
        }

        let mut modules: Vec<UsageEntry> = modules
            .into_iter()
            .map(|(module, count)| UsageEntry {
                name: corpus.module_name(module).to_string(),
                count,
            })
            .collect();
        let mut symbols: Vec<UsageEntry> = symbols
            .into_iter()
            .map(|(target, count)| UsageEntry {
                name: corpus.qualified(target),
                count,
            })
            .collect();
        self.truncate(&mut modules);
        self.truncate(&mut symbols);

        UsageStats {
            modules,
            symbols,
            packages: buckets,
        }
    }

    fn ranked<T>(&self, counts: impl Iterator<Item = (T, usize)>) -> Vec<(T, usize)> {
        let mut ranked: Vec<(T, usize)> = counts
            .filter(|&(_, count)| count >= self.min_consumers)
            .collect();
        // Stable, so ties keep counting order.
        ranked.sort_by(|left, right| right.1.cmp(&left.1));
        ranked
    }

    fn truncate(&self, entries: &mut Vec<UsageEntry>) {
        if let Some(limit) = self.limit {
            entries.truncate(limit);
        }
    }
}
