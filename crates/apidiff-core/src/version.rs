//! Release version lookup
//!
//! Each release records its version in a properties file inside its build
//! output (`target/classes/build.properties`, key `jetty.version`).

use crate::errors::{ApiDiffError, Result};
use crate::fs::Filesystem;
use crate::model::ReleaseRoot;
use crate::properties;
use std::path::PathBuf;

/// Default properties file, relative to a release root
pub const DEFAULT_PROPERTIES_FILE: &str = "target/classes/build.properties";

/// Default key holding the version
pub const DEFAULT_VERSION_KEY: &str = "jetty.version";

/// What to do when the properties file lacks the version key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VersionPolicy {
    /// Continue with an empty version
    #[default]
    Lenient,
    /// Fail with [`ApiDiffError::MissingVersionKey`]
    Required,
}

/// Where a release's version is recorded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionSource {
    pub properties_file: PathBuf,
    pub key: String,
    pub policy: VersionPolicy,
}

impl Default for VersionSource {
    fn default() -> Self {
        Self {
            properties_file: PathBuf::from(DEFAULT_PROPERTIES_FILE),
            key: DEFAULT_VERSION_KEY.to_string(),
            policy: VersionPolicy::default(),
        }
    }
}

/// Read the version of the release at `root`
///
/// ## Errors
///
/// - `PropertiesUnreadable`: the properties file is absent or unreadable
/// - `MissingVersionKey`: the key is absent and the policy is `Required`
pub fn load_version(
    fs: &dyn Filesystem,
    root: &ReleaseRoot,
    source: &VersionSource,
) -> Result<String> {
    let path = root.path().join(&source.properties_file);
    let bytes = fs
        .read(&path)
        .map_err(|e| ApiDiffError::PropertiesUnreadable {
            path: path.clone(),
            message: e.to_string(),
        })?;
    let text = decode_latin1(&bytes);

    match properties::parse(&text).remove(&source.key) {
        Some(version) => {
            tracing::debug!(root = %root.path().display(), version = %version, "version loaded");
            Ok(version)
        }
        None if source.policy == VersionPolicy::Required => Err(ApiDiffError::MissingVersionKey {
            path,
            key: source.key.clone(),
        }),
        None => {
            tracing::warn!(
                path = %path.display(),
                key = %source.key,
                "version key missing, continuing with an empty version"
            );
            Ok(String::new())
        }
    }
}

/// Properties files are ISO-8859-1; every byte is one code point
fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MemFs;

    fn root() -> ReleaseRoot {
        ReleaseRoot::new("jetty-10.0", "/w/jetty-10.0")
    }

    #[test]
    fn test_load_version() {
        let fs = MemFs::new();
        fs.add_file(
            "/w/jetty-10.0/target/classes/build.properties",
            "timestamp=1\njetty.version=10.0.0-SNAPSHOT\n",
        );
        let version = load_version(&fs, &root(), &VersionSource::default()).unwrap();
        assert_eq!(version, "10.0.0-SNAPSHOT");
    }

    #[test]
    fn test_latin1_properties_are_decoded() {
        let fs = MemFs::new();
        fs.add_file(
            "/w/jetty-10.0/target/classes/build.properties",
            b"copyright=\xA9 Webtide\njetty.version=10.0.0 \xE9\n",
        );
        let version = load_version(&fs, &root(), &VersionSource::default()).unwrap();
        assert_eq!(version, "10.0.0 \u{e9}");
    }

    #[test]
    fn test_missing_file_is_io_failure() {
        let fs = MemFs::new();
        let err = load_version(&fs, &root(), &VersionSource::default()).unwrap_err();
        assert!(matches!(err, ApiDiffError::PropertiesUnreadable { .. }));
    }

    #[test]
    fn test_missing_key_lenient_yields_empty() {
        let fs = MemFs::new();
        fs.add_file("/w/jetty-10.0/target/classes/build.properties", "other=1\n");
        let version = load_version(&fs, &root(), &VersionSource::default()).unwrap();
        assert_eq!(version, "");
    }

    #[test]
    fn test_missing_key_required_fails() {
        let fs = MemFs::new();
        fs.add_file("/w/jetty-10.0/target/classes/build.properties", "other=1\n");
        let source = VersionSource {
            policy: VersionPolicy::Required,
            ..VersionSource::default()
        };
        let err = load_version(&fs, &root(), &source).unwrap_err();
        assert_eq!(
            err,
            ApiDiffError::MissingVersionKey {
                path: PathBuf::from("/w/jetty-10.0/target/classes/build.properties"),
                key: "jetty.version".to_string(),
            }
        );
    }

    #[test]
    fn test_custom_source() {
        let fs = MemFs::new();
        fs.add_file("/w/jetty-10.0/release.properties", "product.version = 3\n");
        let source = VersionSource {
            properties_file: PathBuf::from("release.properties"),
            key: "product.version".to_string(),
            policy: VersionPolicy::Required,
        };
        assert_eq!(load_version(&fs, &root(), &source).unwrap(), "3");
    }
}
