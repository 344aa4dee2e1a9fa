//! Build configuration (`symdex.toml`)

use serde::{Deserialize, Serialize};
use std::path::Path;
use sx_ast::provider::DEFAULT_AST_EXTENSION;
use sx_usage::MIN_CONSUMERS;

use crate::DriverError;
use crate::lock::LOCK_FILE_NAME;

/// File name looked up by [`Config::find_in_dir`]
pub const CONFIG_FILE_NAME: &str = "symdex.toml";

/// Complete build configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where and how module trees are read
    pub corpus: CorpusConfig,

    /// Usage statistics thresholds
    pub stats: StatsConfig,

    /// Payload file names
    pub output: OutputConfig,
}

/// `[corpus]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusConfig {
    /// Extension of module tree files, without the dot
    pub ast_extension: String,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            ast_extension: DEFAULT_AST_EXTENSION.to_string(),
        }
    }
}

/// `[stats]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    /// Distinct consumers a target needs to be listed (at least 2)
    pub min_consumers: usize,

    /// Longest list reported, unlimited when absent
    pub limit: Option<usize>,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            min_consumers: MIN_CONSUMERS,
            limit: None,
        }
    }
}

/// `[output]` section
///
/// Every name is a plain file name inside the output directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Module publics and symbol owners
    pub modules_publics: String,

    /// Package ids and the module to package map
    pub packages_modules: String,

    /// Ranked module, symbol and per-package usage
    pub usage_stats: String,

    /// Private names and the modules referencing them
    pub privates_referenced: String,

    /// Symbols exported by more than one module
    pub disambiguation: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            modules_publics: "modules_publics.json".to_string(),
            packages_modules: "packages_modules.json".to_string(),
            usage_stats: "usage_stats.json".to_string(),
            privates_referenced: "privates_referenced.json".to_string(),
            disambiguation: "disambiguation.json".to_string(),
        }
    }
}

impl OutputConfig {
    /// `(key, file name)` of every payload, in emission order
    #[must_use]
    pub fn file_names(&self) -> [(&'static str, &str); 5] {
        [
            ("modules_publics", self.modules_publics.as_str()),
            ("packages_modules", self.packages_modules.as_str()),
            ("usage_stats", self.usage_stats.as_str()),
            ("privates_referenced", self.privates_referenced.as_str()),
            ("disambiguation", self.disambiguation.as_str()),
        ]
    }

    /// Check that every payload gets its own plain file name
    ///
    /// # Errors
    ///
    /// Describes the first name that is empty, leaves the output directory,
    /// collides with the lock file or is shared by two payloads.
    pub fn validate(&self) -> Result<(), String> {
        let names = self.file_names();
        for (position, &(key, name)) in names.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(format!("`{key}` is empty"));
            }
            if name.contains(['/', '\\']) || name == "." || name == ".." {
                return Err(format!("`{key}` = {name:?} is not a plain file name"));
            }
            if name == LOCK_FILE_NAME {
                return Err(format!("`{key}` = {name:?} is reserved for the lock file"));
            }
            if let Some((other, _)) = names[..position].iter().find(|(_, earlier)| *earlier == name) {
                return Err(format!("`{other}` and `{key}` both write {name:?}"));
            }
        }
        Ok(())
    }
}

impl Config {
    /// Decode a configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::Config`] if the text is not a valid configuration
    /// or the output file names are unusable.
    pub fn from_toml(path: &Path, text: &str) -> Result<Self, DriverError> {
        let invalid = |reason: String| DriverError::Config {
            path: path.to_path_buf(),
            reason,
        };
        let mut config: Self =
            toml::from_str(text).map_err(|err| invalid(err.message().to_string()))?;
        config.stats.min_consumers = config.stats.min_consumers.max(MIN_CONSUMERS);
        config.output.validate().map_err(invalid)?;
        Ok(config)
    }

    /// Load a configuration file
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or decoded.
    pub fn from_file(path: &Path) -> Result<Self, DriverError> {
        let text = std::fs::read_to_string(path).map_err(|err| DriverError::io(path, err))?;
        Self::from_toml(path, &text)
    }

    /// Load `symdex.toml` from `dir`, or the defaults if there is none
    ///
    /// # Errors
    ///
    /// Fails if the file exists but cannot be read or decoded.
    pub fn find_in_dir(dir: &Path) -> Result<Self, DriverError> {
        let path = dir.join(CONFIG_FILE_NAME);
        if path.is_file() {
            Self::from_file(&path)
        } else {
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = Config::from_toml(Path::new("symdex.toml"), "").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.stats.min_consumers, 2);
        assert_eq!(config.corpus.ast_extension, "ast");
    }

    #[test]
    fn test_partial_sections() {
        let config = Config::from_toml(
            Path::new("symdex.toml"),
            "[stats]\nlimit = 20\n\n[output]\nusage_stats = \"usage.json\"\n",
        )
        .unwrap();

        assert_eq!(config.stats.limit, Some(20));
        assert_eq!(config.stats.min_consumers, 2);
        assert_eq!(config.output.usage_stats, "usage.json");
        assert_eq!(config.output.disambiguation, "disambiguation.json");
    }

    #[test]
    fn test_min_consumers_clamped() {
        let config =
            Config::from_toml(Path::new("symdex.toml"), "[stats]\nmin_consumers = 1\n").unwrap();
        assert_eq!(config.stats.min_consumers, 2);
    }

    #[test]
    fn test_invalid_config() {
        let err = Config::from_toml(Path::new("bad.toml"), "[stats]\nmin_consumers = \"many\"\n")
            .unwrap_err();
        assert!(matches!(err, DriverError::Config { .. }));
    }

    #[test]
    fn test_duplicate_output_names_rejected() {
        let err = Config::from_toml(
            Path::new("symdex.toml"),
            "[output]\nusage_stats = \"same.json\"\ndisambiguation = \"same.json\"\n",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            DriverError::Config { reason, .. }
                if reason.contains("usage_stats") && reason.contains("disambiguation")
        ));
    }

    #[test]
    fn test_output_names_stay_in_output_dir() {
        for name in ["../x", "sub/x.json", "..\\x", "..", ".", "  ", LOCK_FILE_NAME] {
            let text = format!("[output]\nusage_stats = {name:?}\n");
            let err = Config::from_toml(Path::new("symdex.toml"), &text).unwrap_err();
            assert!(
                matches!(&err, DriverError::Config { reason, .. } if reason.contains("usage_stats")),
                "{name:?} accepted: {err}"
            );
        }
    }

    #[test]
    fn test_default_output_names_are_valid() {
        assert_eq!(OutputConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_find_in_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Config::find_in_dir(dir.path()).unwrap(), Config::default());

        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "[corpus]\nast_extension = \"json\"\n")
            .unwrap();
        let config = Config::find_in_dir(dir.path()).unwrap();
        assert_eq!(config.corpus.ast_extension, "json");
    }
}
