//! Payload files handed to the rendering layer
//!
//! Each payload is a text file of `key = '<json>'` lines. The JSON is lower
//! cased so lookups on the consuming side are case-insensitive.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use sx_ast::{PackageMap, encode_package_name};
use sx_disambig::DisambiguationReport;
use sx_index::CorpusIndex;
use sx_usage::{UsageEntry, UsageStats};

use crate::DriverError;
use crate::config::OutputConfig;

/// One payload file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    /// File name inside the output directory
    pub file_name: String,

    /// `(key, encoded value)` pairs in output order
    pub entries: Vec<(String, String)>,
}

impl Payload {
    fn new(file_name: &str) -> Self {
        Self {
            file_name: file_name.to_string(),
            entries: Vec::new(),
        }
    }

    fn with<T: Serialize + ?Sized>(mut self, key: &str, value: &T) -> Result<Self, DriverError> {
        self.entries.push((key.to_string(), encode_value(key, value)?));
        Ok(self)
    }

    /// Text written to disk
    #[must_use]
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(|(key, value)| format!("{key} = '{value}'\n"))
            .collect()
    }
}

/// Serialize `value` as lower-case JSON safe to embed in single quotes
///
/// # Errors
///
/// Returns [`DriverError::Encode`] if `value` cannot be serialized.
pub fn encode_value<T: Serialize + ?Sized>(key: &str, value: &T) -> Result<String, DriverError> {
    let json = serde_json::to_string(value).map_err(|source| DriverError::Encode {
        key: key.to_string(),
        source,
    })?;
    Ok(json.to_lowercase().replace('\'', "\\'"))
}

fn ranked(entries: &[UsageEntry]) -> Vec<(&str, usize)> {
    entries.iter().map(|entry| (entry.name.as_str(), entry.count)).collect()
}

/// Build every payload of a finished analysis
///
/// # Errors
///
/// Fails only if a value cannot be serialized.
pub fn build_payloads(
    index: &CorpusIndex,
    packages: &PackageMap,
    stats: &UsageStats,
    disambiguation: &DisambiguationReport,
    output: &OutputConfig,
) -> Result<Vec<Payload>, DriverError> {
    let modules_publics = Payload::new(&output.modules_publics)
        .with("modules", &index.module_publics())?
        .with("symbols", &index.owner_names())?;

    let mut package_ids: Vec<String> = packages
        .packages()
        .map(|package| encode_package_name(&package.path))
        .collect();
    package_ids.sort();
    package_ids.dedup();
    let module_packages: BTreeMap<&str, String> = packages
        .assignments()
        .map(|(module, package)| (module, encode_package_name(package)))
        .collect();
    let packages_modules = Payload::new(&output.packages_modules)
        .with("packages", &package_ids)?
        .with("modules", &module_packages)?;

    let packages_used: BTreeMap<&str, BTreeMap<&str, Vec<(&str, usize)>>> = stats
        .packages
        .iter()
        .map(|(package, usage)| {
            let lists = BTreeMap::from([
                ("modules", ranked(&usage.modules)),
                ("symbols", ranked(&usage.symbols)),
            ]);
            (package.as_str(), lists)
        })
        .collect();
    let usage_stats = Payload::new(&output.usage_stats)
        .with("modules_used", &ranked(&stats.modules))?
        .with("symbols_used", &ranked(&stats.symbols))?
        .with("packages_used", &packages_used)?;

    let modules_privates = index.privates_referenced();
    let mut private_users: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for (module, privates) in &modules_privates {
        for private in privates {
            private_users.entry(private.as_str()).or_default().push(module.as_str());
        }
    }
    let privates_referenced = Payload::new(&output.privates_referenced)
        .with("modules_priv_symbols", &modules_privates)?
        .with("priv_symbols", &private_users)?;

    let disambiguation = Payload::new(&output.disambiguation)
        .with("ambiguous_symbols", &disambiguation.to_map())?;

    Ok(vec![
        modules_publics,
        packages_modules,
        usage_stats,
        privates_referenced,
        disambiguation,
    ])
}

/// Write payloads into `dir`, returning the written paths
///
/// # Errors
///
/// Returns [`DriverError::Io`] on the first file that cannot be written.
pub fn write_payloads(dir: &Path, payloads: &[Payload]) -> Result<Vec<PathBuf>, DriverError> {
    payloads
        .iter()
        .map(|payload| {
            let path = dir.join(&payload.file_name);
            fs::write(&path, payload.render()).map_err(|err| DriverError::io(&path, err))?;
            tracing::debug!(path = %path.display(), "wrote payload");
            Ok(path)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use expect_test::expect;

    #[test]
    fn test_encode_lowercases_and_escapes() {
        let value = BTreeMap::from([("Kinds", vec!["O'Brien_DP"])]);
        expect![[r#"{"kinds":["o\'brien_dp"]}"#]].assert_eq(&encode_value("k", &value).unwrap());
    }

    #[test]
    fn test_render_lines() {
        let payload = Payload::new("x.json")
            .with("modules_used", &[("a", 3), ("b", 2)])
            .unwrap()
            .with("packages", &["pkg__ROOT"])
            .unwrap();

        expect![[r#"
            modules_used = '[["a",3],["b",2]]'
            packages = '["pkg__root"]'
        "#]]
        .assert_eq(&payload.render());
    }
}
