//! apidiff Core - artifact discovery and report post-processing
//!
//! This crate provides the building blocks of the API-diff pipeline that do
//! not depend on the external comparison engine:
//! - Release, artifact and comparison-configuration models
//! - A filesystem seam with OS and in-memory implementations
//! - Version lookup from Java-style properties files
//! - Artifact discovery with a deterministic ordering policy
//! - Literal, line-oriented cleanup of generated reports
//!
//! The comparison itself is owned by `apidiff-engine`.

pub mod cleanup;
pub mod errors;
pub mod fs;
pub mod locator;
pub mod logging_facility;
pub mod model;
pub mod ordering;
pub mod properties;
pub mod version;

// Re-export commonly used types
pub use errors::{ApiDiffError, ExError, ExErrorKind, Result};
pub use fs::{Filesystem, MemFs, OsFs};
pub use model::{
    AccessModifier, ArtifactList, ArtifactReference, ComparisonConfig, ReleasePair, ReleaseRoot,
    Side,
};
