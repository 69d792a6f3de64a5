//! apidiff Engine - Orchestration layer
//!
//! Connects artifact discovery and report cleanup from `apidiff-core` to the
//! external comparison engine, and runs the per-release-pair pipeline.

pub mod comparator;
pub mod driver;
pub mod japicmp;
pub mod pipeline;

pub use comparator::{ArchiveComparator, DiffResult, FsReportWriter, ReportWriter};
pub use driver::{release_pairs, run_pairs, run_releases, PairOutcome, RunSummary};
pub use japicmp::JapicmpCli;
pub use pipeline::{
    generate_diff, NoopObserver, PairReport, Pipeline, PipelineObserver, PipelineSettings,
};
