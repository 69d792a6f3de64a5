//! Artifact discovery beneath a release root
//!
//! Walks `<root>/target/dependency` and keeps the files that are the
//! product's own artifacts. The result is unordered; see
//! [`crate::ordering`] for the list order.

use crate::errors::Result;
use crate::fs::Filesystem;
use crate::model::{ArtifactReference, ReleaseRoot};
use std::path::Path;

/// Default walk depth below the dependency directory
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// Which files under the dependency directory are artifacts of the product
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactFilter {
    /// File names must end with this
    pub suffix: String,
    /// Paths must contain this package-path fragment
    pub include: String,
    /// Paths containing any of these are build tooling or platform artifacts
    pub exclude: Vec<String>,
}

impl Default for ArtifactFilter {
    fn default() -> Self {
        Self {
            suffix: ".jar".to_string(),
            include: "org/eclipse/jetty".to_string(),
            exclude: vec!["/toolchain/".to_string(), "/orbit/".to_string()],
        }
    }
}

impl ArtifactFilter {
    /// Whether the file at `path` is an artifact of the product
    pub fn matches(&self, path: &Path) -> bool {
        let name_matches = path
            .file_name()
            .map(|n| n.to_string_lossy().ends_with(&self.suffix))
            .unwrap_or(false);
        if !name_matches {
            return false;
        }

        let text = normalized(path);
        text.contains(&self.include) && !self.exclude.iter().any(|ex| text.contains(ex.as_str()))
    }
}

/// `path` as text with `/` separators
pub(crate) fn normalized(path: &Path) -> String {
    let text = path.to_string_lossy();
    if std::path::MAIN_SEPARATOR == '/' {
        text.into_owned()
    } else {
        text.replace(std::path::MAIN_SEPARATOR, "/")
    }
}

/// Discover the artifacts of one release
///
/// ## Errors
///
/// - `Traversal`: any entry of the tree could not be visited; no partial
///   result is returned
pub fn locate_artifacts(
    fs: &dyn Filesystem,
    root: &ReleaseRoot,
    version: &str,
    filter: &ArtifactFilter,
    max_depth: usize,
) -> Result<Vec<ArtifactReference>> {
    let dependency_dir = root.dependency_dir();
    let files = fs.walk_files(&dependency_dir, max_depth)?;
    let visited = files.len();

    let artifacts: Vec<ArtifactReference> = files
        .into_iter()
        .filter(|path| filter.matches(path))
        .map(|path| ArtifactReference::new(path, version))
        .collect();

    tracing::debug!(
        root = %root.path().display(),
        visited,
        selected = artifacts.len(),
        "artifacts located"
    );

    Ok(artifacts)
}
