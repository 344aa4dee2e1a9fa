//! Read-only module to package lookup

use crate::error::AstError;
use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use serde::Deserialize;
use std::path::Path;

const SLASH_REPLACEMENT: &str = "__";

/// Encode a package path into the identifier used in emitted payloads
///
/// `"common/util"` becomes `"pkg__COMMON__UTIL"`, the root package `"."`
/// becomes `"pkg__ROOT"`.
#[must_use]
pub fn encode_package_name(path: &str) -> String {
    let trimmed = path.trim_matches('/');
    let package = if trimmed.is_empty() || trimmed == "." {
        "ROOT".to_string()
    } else {
        trimmed.replace('/', SLASH_REPLACEMENT).to_uppercase()
    };
    format!("pkg__{package}")
}

/// One package of the source tree
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PackageDef {
    /// Path of the package relative to the source root
    pub path: String,

    /// Free-text description
    #[serde(default)]
    pub description: Option<String>,

    /// Modules that live in this package
    #[serde(default)]
    pub modules: Vec<String>,
}

#[derive(Deserialize)]
struct PackageFile {
    #[serde(default, rename = "package")]
    packages: Vec<PackageDef>,
}

/// Module to package lookup supplied alongside the corpus
#[derive(Debug, Clone, Default)]
pub struct PackageMap {
    packages: IndexMap<String, PackageDef>,
    module_to_package: FxHashMap<String, String>,
}

impl PackageMap {
    /// Lookup with no packages; every module is unbucketed
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build the lookup from package definitions
    ///
    /// A module listed by several packages stays with the first one.
    #[must_use]
    pub fn from_packages(packages: impl IntoIterator<Item = PackageDef>) -> Self {
        let mut map = Self::default();
        for package in packages {
            for module in &package.modules {
                let key = module.trim().to_lowercase();
                if let Some(existing) = map.module_to_package.get(&key) {
                    tracing::warn!(module = %key, kept = %existing, ignored = %package.path, "module listed in two packages");
                    continue;
                }
                map.module_to_package.insert(key, package.path.clone());
            }
            map.packages.insert(package.path.clone(), package);
        }
        map
    }

    /// Parse a TOML package file
    ///
    /// # Errors
    ///
    /// Returns [`AstError::Packages`] when the text is not a valid package file.
    pub fn from_toml(path: &Path, text: &str) -> Result<Self, AstError> {
        let file: PackageFile = toml::from_str(text).map_err(|err| AstError::Packages {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;
        Ok(Self::from_packages(file.packages))
    }

    /// Load a TOML package file from disk
    ///
    /// # Errors
    ///
    /// Returns [`AstError::Io`] when the file cannot be read and
    /// [`AstError::Packages`] when it cannot be decoded.
    pub fn from_file(path: &Path) -> Result<Self, AstError> {
        let text = std::fs::read_to_string(path).map_err(|source| AstError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(path, &text)
    }

    /// Package path owning `module`, if any
    #[must_use]
    pub fn package_of(&self, module: &str) -> Option<&str> {
        self.module_to_package
            .get(&module.trim().to_lowercase())
            .map(String::as_str)
    }

    /// Encoded identifier of the package owning `module`, if any
    #[must_use]
    pub fn encoded_package_of(&self, module: &str) -> Option<String> {
        self.package_of(module).map(encode_package_name)
    }

    /// All packages in definition order
    pub fn packages(&self) -> impl Iterator<Item = &PackageDef> {
        self.packages.values()
    }

    /// Every `(module, package path)` pair
    pub fn assignments(&self) -> impl Iterator<Item = (&str, &str)> {
        self.module_to_package
            .iter()
            .map(|(module, package)| (module.as_str(), package.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_package_name() {
        assert_eq!(encode_package_name("."), "pkg__ROOT");
        assert_eq!(encode_package_name("common"), "pkg__COMMON");
        assert_eq!(encode_package_name("common/util"), "pkg__COMMON__UTIL");
    }

    #[test]
    fn test_lookup_from_toml() {
        let text = r#"
            [[package]]
            path = "common"
            description = "Shared kinds"
            modules = ["Kinds", "util"]

            [[package]]
            path = "."
            modules = ["main_driver"]
        "#;

        let map = PackageMap::from_toml(Path::new("PACKAGES.toml"), text).unwrap();
        assert_eq!(map.package_of("KINDS"), Some("common"));
        assert_eq!(map.package_of(" kinds "), Some("common"));
        assert_eq!(map.encoded_package_of("main_driver").as_deref(), Some("pkg__ROOT"));
        assert_eq!(map.package_of("unknown"), None);
        assert_eq!(map.packages().count(), 2);
    }

    #[test]
    fn test_first_package_wins() {
        let map = PackageMap::from_packages(vec![
            PackageDef {
                path: "a".to_string(),
                description: None,
                modules: vec!["shared".to_string()],
            },
            PackageDef {
                path: "b".to_string(),
                description: None,
                modules: vec!["shared".to_string()],
            },
        ]);
        assert_eq!(map.package_of("shared"), Some("a"));
    }

    #[test]
    fn test_invalid_toml() {
        let result = PackageMap::from_toml(Path::new("bad.toml"), "[[package]]\nmodules = 3");
        assert!(matches!(result, Err(AstError::Packages { .. })));
    }
}
