//! Optional `apidiff.toml` configuration
//!
//! Every key is optional. Command-line flags win over the file, the file wins
//! over built-in defaults.

use apidiff_core::errors::{io_error, ApiDiffError};
use apidiff_core::locator::{ArtifactFilter, DEFAULT_MAX_DEPTH};
use apidiff_core::version::{VersionPolicy, VersionSource};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Read from the working directory when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "apidiff.toml";

pub const DEFAULT_RELEASES: [&str; 3] = ["jetty-9.4", "jetty-10.0", "jetty-11.0"];
pub const DEFAULT_OUTPUT_DIR: &str = "target";
pub const DEFAULT_JAVA: &str = "java";
pub const DEFAULT_JAPICMP_JAR: &str = "japicmp.jar";

/// Linked from reports when present in the working directory
pub const DEFAULT_STYLESHEET: &str = "src/main/resources/report.css";

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub base_dir: Option<PathBuf>,
    pub releases: Option<Vec<String>>,
    pub output_dir: Option<PathBuf>,
    pub stylesheet: Option<PathBuf>,
    pub product: Option<String>,
    pub max_depth: Option<usize>,
    pub require_version: Option<bool>,
    pub artifacts: ArtifactsSection,
    pub version: VersionSection,
    pub engine: EngineSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArtifactsSection {
    pub suffix: Option<String>,
    pub include: Option<String>,
    pub exclude: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VersionSection {
    /// Properties file, relative to each release root
    pub file: Option<PathBuf>,
    pub key: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineSection {
    pub java: Option<PathBuf>,
    pub jar: Option<PathBuf>,
}

impl FileConfig {
    /// Load `explicit`, or `apidiff.toml` when present, or nothing
    ///
    /// # Errors
    ///
    /// - `Io`: an explicitly named file cannot be read
    /// - `InvalidConfig`: the file is not valid configuration
    pub fn load(explicit: Option<&Path>) -> Result<Self, ApiDiffError> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !default.is_file() {
                    return Ok(Self::default());
                }
                default
            }
        };

        let text =
            std::fs::read_to_string(&path).map_err(|e| io_error("load_config", &path, e))?;
        let config = Self::parse(&text)?;
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns `InvalidConfig` for malformed TOML or unknown keys.
    pub fn parse(text: &str) -> Result<Self, ApiDiffError> {
        toml::from_str(text).map_err(|e| ApiDiffError::InvalidConfig {
            reason: e.to_string(),
        })
    }

    pub fn artifact_filter(&self) -> ArtifactFilter {
        let mut filter = ArtifactFilter::default();
        if let Some(suffix) = &self.artifacts.suffix {
            filter.suffix = suffix.clone();
        }
        if let Some(include) = &self.artifacts.include {
            filter.include = include.clone();
        }
        if let Some(exclude) = &self.artifacts.exclude {
            filter.exclude = exclude.clone();
        }
        filter
    }

    pub fn version_source(&self, require_version: bool) -> VersionSource {
        let mut source = VersionSource::default();
        if let Some(file) = &self.version.file {
            source.properties_file = file.clone();
        }
        if let Some(key) = &self.version.key {
            source.key = key.clone();
        }
        if require_version || self.require_version.unwrap_or(false) {
            source.policy = VersionPolicy::Required;
        }
        source
    }

    /// # Errors
    ///
    /// Returns `InvalidConfig` when the resolved depth is zero.
    pub fn max_depth(&self, flag: Option<usize>) -> Result<usize, ApiDiffError> {
        let depth = flag.or(self.max_depth).unwrap_or(DEFAULT_MAX_DEPTH);
        if depth == 0 {
            return Err(ApiDiffError::InvalidConfig {
                reason: "max_depth must be at least 1".to_string(),
            });
        }
        Ok(depth)
    }
}

/// `path` joined to the working directory unless already absolute
///
/// # Errors
///
/// Fails when the working directory cannot be determined.
pub fn absolute(path: &Path) -> std::io::Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config = FileConfig::parse(
            r#"
            base_dir = "/builds"
            releases = ["jetty-10.0", "jetty-11.0", "jetty-12.0"]
            output_dir = "reports"
            product = "Eclipse Jetty"
            max_depth = 6
            require_version = true

            [artifacts]
            suffix = ".jar"
            include = "org/eclipse/jetty"
            exclude = ["/toolchain/"]

            [version]
            file = "target/classes/version.properties"
            key = "project.version"

            [engine]
            java = "/opt/java/bin/java"
            jar = "/opt/japicmp/japicmp.jar"
            "#,
        )
        .unwrap();

        assert_eq!(config.base_dir, Some(PathBuf::from("/builds")));
        assert_eq!(config.releases.as_ref().map(Vec::len), Some(3));
        assert_eq!(config.artifact_filter().exclude, vec!["/toolchain/".to_string()]);
        assert_eq!(config.max_depth(None).unwrap(), 6);
        assert_eq!(config.engine.jar, Some(PathBuf::from("/opt/japicmp/japicmp.jar")));

        let source = config.version_source(false);
        assert_eq!(source.key, "project.version");
        assert_eq!(source.policy, VersionPolicy::Required);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = FileConfig::parse("").unwrap();
        assert_eq!(config.artifact_filter(), ArtifactFilter::default());
        assert_eq!(config.version_source(false), VersionSource::default());
        assert_eq!(config.max_depth(None).unwrap(), DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn test_flags_override_file() {
        let config = FileConfig::parse("max_depth = 3").unwrap();
        assert_eq!(config.max_depth(Some(12)).unwrap(), 12);
        assert_eq!(
            config.version_source(true).policy,
            VersionPolicy::Required
        );
    }

    #[test]
    fn test_zero_depth_is_invalid() {
        let config = FileConfig::default();
        let err = config.max_depth(Some(0)).unwrap_err();
        assert!(matches!(err, ApiDiffError::InvalidConfig { .. }));
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let err = FileConfig::parse("relases = []").unwrap_err();
        assert!(matches!(err, ApiDiffError::InvalidConfig { .. }));
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = FileConfig::load(Some(&dir.path().join("absent.toml"))).unwrap_err();
        assert!(matches!(err, ApiDiffError::Io { .. }));
    }
}
