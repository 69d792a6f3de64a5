use serde::Serialize;
use std::path::{Path, PathBuf};

/// One discovered artifact file and the version of the release it belongs to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ArtifactReference {
    path: PathBuf,
    version: String,
}

impl ArtifactReference {
    pub fn new(path: impl Into<PathBuf>, version: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            version: version.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn version(&self) -> &str {
        &self.version
    }
}

/// Artifacts of one release side, sorted by path
///
/// Only built by [`crate::ordering::order_artifacts`], so the order invariant
/// holds for every instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ArtifactList {
    artifacts: Vec<ArtifactReference>,
}

impl ArtifactList {
    pub(crate) fn from_sorted(artifacts: Vec<ArtifactReference>) -> Self {
        Self { artifacts }
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ArtifactReference> {
        self.artifacts.iter()
    }

    /// Artifact paths in list order
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.artifacts.iter().map(|a| a.path())
    }
}

impl<'a> IntoIterator for &'a ArtifactList {
    type Item = &'a ArtifactReference;
    type IntoIter = std::slice::Iter<'a, ArtifactReference>;

    fn into_iter(self) -> Self::IntoIter {
        self.artifacts.iter()
    }
}
