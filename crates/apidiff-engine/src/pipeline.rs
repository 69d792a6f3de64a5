//! Per-release-pair pipeline
//!
//! `generate_diff` is the boundary operation: it owns the start/end/error
//! events for a pair. Steps run in order and the first fatal failure ends the
//! pair:
//!
//! 1. both release roots must exist
//! 2. versions are read from each root
//! 3. artifacts are located and ordered
//! 4. the comparison engine runs
//! 5. the report is emitted (a failure here is logged and the pair continues)
//! 6. the report is cleaned
//!
//! Lower layers (core) use only `tracing::debug!()` for internal details.

#![allow(clippy::result_large_err)]

use crate::comparator::{compare_releases, ArchiveComparator, DiffResult, ReportWriter};
use apidiff_core::cleanup::{cleanup_report, copy_path_for, CleanupRules, CleanupStats};
use apidiff_core::errors::{ApiDiffError, ExError, Result};
use apidiff_core::fs::Filesystem;
use apidiff_core::locator::{locate_artifacts, ArtifactFilter, DEFAULT_MAX_DEPTH};
use apidiff_core::model::{report_title, ComparisonConfig, ReleasePair, Side};
use apidiff_core::ordering::order_artifacts;
use apidiff_core::version::{load_version, VersionSource};
use apidiff_core::{log_op_end, log_op_error, log_op_start};
use apidiff_core_types::RequestId;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Product name used in report titles unless configured otherwise
pub const DEFAULT_PRODUCT: &str = "Eclipse Jetty";

/// Run-wide settings shared by every pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineSettings {
    /// Directory receiving reports and their intermediate copies
    pub output_dir: PathBuf,
    pub stylesheet: Option<PathBuf>,
    pub product: String,
    pub filter: ArtifactFilter,
    pub max_depth: usize,
    pub version: VersionSource,
}

impl PipelineSettings {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            stylesheet: None,
            product: DEFAULT_PRODUCT.to_string(),
            filter: ArtifactFilter::default(),
            max_depth: DEFAULT_MAX_DEPTH,
            version: VersionSource::default(),
        }
    }

    /// Where the report for `pair` is written
    pub fn report_path(&self, pair: &ReleasePair) -> PathBuf {
        self.output_dir.join(pair.report_file_name())
    }
}

/// Progress notifications for a caller presenting the run
///
/// Every method defaults to doing nothing.
pub trait PipelineObserver {
    /// The comparison finished and the report is about to be written
    fn generating(&self, _pair: &ReleasePair, _report: &Path) {}

    fn cleaning(&self, _pair: &ReleasePair, _report: &Path) {}

    /// Emission failed; the pair continues to cleanup
    fn emit_failed(&self, _pair: &ReleasePair, _err: &ExError) {}

    /// The pair ended with a fatal error
    fn pair_failed(&self, _pair: &ReleasePair, _err: &ExError) {}
}

/// Observer that ignores every notification
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {}

/// Collaborators for a run
pub struct Pipeline<'a> {
    pub fs: &'a dyn Filesystem,
    pub comparator: &'a dyn ArchiveComparator,
    pub writer: &'a dyn ReportWriter,
    pub observer: &'a dyn PipelineObserver,
    pub settings: &'a PipelineSettings,
}

/// What a completed pair produced
#[derive(Debug, Clone)]
pub struct PairReport {
    pub pair: String,
    pub report: PathBuf,
    /// Intermediate copy left behind by cleanup
    pub copy: PathBuf,
    pub old_version: String,
    pub new_version: String,
    pub old_artifacts: usize,
    pub new_artifacts: usize,
    /// Set when emission failed and cleanup ran anyway
    pub emit_error: Option<ExError>,
    pub cleanup: CleanupStats,
}

/// Generate, emit and clean the report for one release pair
///
/// ## Errors
///
/// - `ERR_ROOT_NOT_FOUND`: a release root is missing
/// - `ERR_IO` / `ERR_MISSING_VERSION`: a version could not be read
/// - `ERR_TRAVERSAL`: artifact discovery failed
/// - `ERR_EMPTY_ARTIFACT_SET`: a side has no artifacts
/// - `ERR_EXTERNAL_SERVICE`: the comparison engine failed
/// - `ERR_CLEANUP`: the report could not be cleaned
///
/// The returned error carries the pair name and `request_id`.
pub fn generate_diff(
    pipeline: &Pipeline<'_>,
    pair: &ReleasePair,
    request_id: &RequestId,
) -> std::result::Result<PairReport, ExError> {
    log_op_start!(
        "generate_diff",
        pair = pair.name(),
        request_id = request_id.as_str()
    );
    let start = Instant::now();

    let result = generate_diff_impl(pipeline, pair, request_id).map_err(|e| {
        let ex = e.with_pair(pair.name()).with_request_id(request_id.clone());
        log_op_error!(
            "generate_diff",
            ex.clone(),
            duration_ms = start.elapsed().as_millis() as u64,
            pair = pair.name(),
            request_id = request_id.as_str()
        );
        pipeline.observer.pair_failed(pair, &ex);
        ex
    })?;

    log_op_end!(
        "generate_diff",
        duration_ms = start.elapsed().as_millis() as u64,
        pair = pair.name(),
        request_id = request_id.as_str(),
        old_version = result.old_version.as_str(),
        new_version = result.new_version.as_str()
    );

    Ok(result)
}

fn generate_diff_impl(
    pipeline: &Pipeline<'_>,
    pair: &ReleasePair,
    request_id: &RequestId,
) -> std::result::Result<PairReport, ExError> {
    let settings = pipeline.settings;

    validate_roots(pipeline.fs, pair)?;

    let old_version = load_version(pipeline.fs, pair.old(), &settings.version)?;
    let new_version = load_version(pipeline.fs, pair.new_root(), &settings.version)?;

    let old_artifacts = order_artifacts(locate_artifacts(
        pipeline.fs,
        pair.old(),
        &old_version,
        &settings.filter,
        settings.max_depth,
    )?);
    let new_artifacts = order_artifacts(locate_artifacts(
        pipeline.fs,
        pair.new_root(),
        &new_version,
        &settings.filter,
        settings.max_depth,
    )?);

    let report = settings.report_path(pair);
    let config = ComparisonConfig::for_pair(
        report.clone(),
        settings.stylesheet.clone(),
        report_title(&settings.product, &old_version, &new_version),
    );

    let diff = compare_releases(
        pipeline.comparator,
        pair,
        &old_artifacts,
        &new_artifacts,
        &config,
    )?;
    pipeline.observer.generating(pair, &report);

    let emit_error = emit(pipeline, pair, request_id, &diff, &config);

    pipeline.observer.cleaning(pair, &report);
    let copy = copy_path_for(&report, &settings.output_dir);
    let rules = CleanupRules::for_dependency_dirs(
        &pair.old().dependency_dir(),
        &pair.new_root().dependency_dir(),
    );
    let cleanup = cleanup_report(pipeline.fs, &report, &copy, &rules)?;

    Ok(PairReport {
        pair: pair.name().to_string(),
        report,
        copy,
        old_version,
        new_version,
        old_artifacts: old_artifacts.len(),
        new_artifacts: new_artifacts.len(),
        emit_error,
        cleanup,
    })
}

/// Both roots are checked before anything else is read.
fn validate_roots(fs: &dyn Filesystem, pair: &ReleasePair) -> Result<()> {
    for side in [Side::Old, Side::New] {
        let root = pair.root(side);
        if !fs.exists(root.path()) {
            return Err(ApiDiffError::ReleaseRootNotFound {
                side,
                path: root.path().to_path_buf(),
            });
        }
    }
    Ok(())
}

fn emit(
    pipeline: &Pipeline<'_>,
    pair: &ReleasePair,
    request_id: &RequestId,
    diff: &DiffResult,
    config: &ComparisonConfig,
) -> Option<ExError> {
    let start = Instant::now();
    match pipeline.writer.write_report(diff, config) {
        Ok(written) => {
            tracing::debug!(pair = pair.name(), documents = written.len(), "report emitted");
            None
        }
        Err(e) => {
            let ex = ExError::from(e)
                .with_pair(pair.name())
                .with_request_id(request_id.clone());
            log_op_error!(
                "emit_report",
                ex.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                pair = pair.name()
            );
            pipeline.observer.emit_failed(pair, &ex);
            Some(ex)
        }
    }
}
