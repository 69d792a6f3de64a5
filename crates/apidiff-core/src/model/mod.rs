pub mod artifact;
pub mod config;
pub mod release;

pub use artifact::{ArtifactList, ArtifactReference};
pub use config::{report_title, AccessModifier, ComparisonConfig};
pub use release::{pair_name, ReleasePair, ReleaseRoot, Side};
