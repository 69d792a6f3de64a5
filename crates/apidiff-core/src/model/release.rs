use serde::Serialize;
use std::path::{Path, PathBuf};

/// Which half of a comparison a release plays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Old,
    New,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Old => write!(f, "OLD"),
            Side::New => write!(f, "NEW"),
        }
    }
}

/// Top-level build output directory of one release
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleaseRoot {
    name: String,
    path: PathBuf,
}

impl ReleaseRoot {
    /// Create a release root from a short name and its directory
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    /// Resolve a release directory named `name` beneath `base_dir`
    pub fn resolve(base_dir: &Path, name: &str) -> Self {
        Self::new(name, base_dir.join(name))
    }

    /// Short name of the release (its directory name)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Directory of the release
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory holding the release's packaged artifacts
    pub fn dependency_dir(&self) -> PathBuf {
        self.path.join("target").join("dependency")
    }
}

/// Two consecutive releases compared against each other
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleasePair {
    old: ReleaseRoot,
    new: ReleaseRoot,
    name: String,
}

impl ReleasePair {
    /// Create a pair, deriving its name from the two release names
    pub fn new(old: ReleaseRoot, new: ReleaseRoot) -> Self {
        let name = pair_name(old.name(), new.name());
        Self { old, new, name }
    }

    pub fn old(&self) -> &ReleaseRoot {
        &self.old
    }

    pub fn new_root(&self) -> &ReleaseRoot {
        &self.new
    }

    /// Root for the given side
    pub fn root(&self, side: Side) -> &ReleaseRoot {
        match side {
            Side::Old => &self.old,
            Side::New => &self.new,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// File name of the HTML report for this pair
    pub fn report_file_name(&self) -> String {
        format!("{}-diff.html", self.name)
    }
}

/// Derive a pair name from two release names
///
/// The old name is kept whole. The new name loses the prefix both names share
/// up to their last common `-`: `jetty-9.4` and `jetty-10.0` give
/// `jetty-9.4-to-10.0`.
pub fn pair_name(old: &str, new: &str) -> String {
    let mut shared = 0;
    for ((i, a), b) in old.char_indices().zip(new.chars()) {
        if a != b {
            break;
        }
        if a == '-' {
            shared = i + a.len_utf8();
        }
    }
    format!("{}-to-{}", old, &new[shared..])
}
