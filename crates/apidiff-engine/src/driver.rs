//! Run a list of releases as consecutive pairs
//!
//! Releases are given oldest first. Each adjacent pair is processed on its
//! own; a failed pair is recorded and the run moves on to the next.

#![allow(clippy::result_large_err)]

use crate::pipeline::{generate_diff, PairReport, Pipeline};
use apidiff_core::errors::ExError;
use apidiff_core::model::{ReleasePair, ReleaseRoot};
use apidiff_core_types::RequestId;
use std::path::Path;

/// Adjacent pairs of `names`, resolved beneath `base_dir`
///
/// Fewer than two names produce no pairs.
pub fn release_pairs(base_dir: &Path, names: &[String]) -> Vec<ReleasePair> {
    names
        .windows(2)
        .map(|w| {
            ReleasePair::new(
                ReleaseRoot::resolve(base_dir, &w[0]),
                ReleaseRoot::resolve(base_dir, &w[1]),
            )
        })
        .collect()
}

/// Result of one pair within a run
#[derive(Debug, Clone)]
pub struct PairOutcome {
    pub pair: String,
    pub request_id: RequestId,
    pub result: Result<PairReport, ExError>,
}

impl PairOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Outcomes of every pair, in run order
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub outcomes: Vec<PairOutcome>,
}

impl RunSummary {
    pub fn succeeded(&self) -> impl Iterator<Item = &PairReport> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &ExError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.pair.as_str(), e)))
    }

    pub fn failed_count(&self) -> usize {
        self.failures().count()
    }

    /// Process exit code: 1 when any pair failed
    pub fn exit_code(&self) -> i32 {
        if self.failed_count() > 0 {
            1
        } else {
            0
        }
    }
}

/// Process every pair in order, isolating failures
pub fn run_pairs(pipeline: &Pipeline<'_>, pairs: &[ReleasePair]) -> RunSummary {
    let outcomes = pairs
        .iter()
        .map(|pair| {
            let request_id = RequestId::new();
            let result = generate_diff(pipeline, pair, &request_id);
            PairOutcome {
                pair: pair.name().to_string(),
                request_id,
                result,
            }
        })
        .collect();

    let summary = RunSummary { outcomes };
    tracing::info!(
        pairs = pairs.len(),
        failed = summary.failed_count(),
        "run complete"
    );
    summary
}

/// Resolve `names` beneath `base_dir` and process each adjacent pair
pub fn run_releases(pipeline: &Pipeline<'_>, base_dir: &Path, names: &[String]) -> RunSummary {
    run_pairs(pipeline, &release_pairs(base_dir, names))
}
