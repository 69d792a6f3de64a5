//! Report cleanup
//!
//! Generated reports embed the absolute dependency directories of both
//! releases and long `;`/`:`-separated artifact lists. Cleanup swaps the
//! directories for a placeholder token and breaks the lists into one artifact
//! per line.
//!
//! The report is moved to a sibling copy first and rebuilt from it line by
//! line, so the file is never read and written through the same handle. The
//! copy is left behind for inspection.
//!
//! All replacements are literal: paths may contain characters that would be
//! metacharacters in a pattern language.

use crate::errors::{ApiDiffError, Result};
use crate::fs::Filesystem;
use std::path::{Path, PathBuf};

/// Stand-in for an environment-specific artifact directory
pub const PLACEHOLDER: &str = "${maven.repo}";

/// Markup ending an artifact entry once a list separator is removed
pub const LINE_BREAK: &str = "<br/>\n";

/// Ordered literal replacements applied to every line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupRules {
    replacements: Vec<(String, String)>,
}

impl CleanupRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a literal replacement; empty patterns are ignored
    pub fn replace(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        let from = from.into();
        if !from.is_empty() {
            self.replacements.push((from, to.into()));
        }
        self
    }

    /// Rules for a report comparing the two dependency directories
    ///
    /// 1. old directory → placeholder
    /// 2. new directory → placeholder
    /// 3. `.jar;` and `.jar:` → `.jar` plus a line break
    pub fn for_dependency_dirs(old_dir: &Path, new_dir: &Path) -> Self {
        let jar_break = format!(".jar{}", LINE_BREAK);
        Self::new()
            .replace(old_dir.display().to_string(), PLACEHOLDER)
            .replace(new_dir.display().to_string(), PLACEHOLDER)
            .replace(".jar;", jar_break.clone())
            .replace(".jar:", jar_break)
    }

    /// Apply every rule, in order, to one line
    ///
    /// Returns the rewritten line and the number of replacements made.
    pub fn apply(&self, line: &str) -> (String, usize) {
        let mut current = line.to_string();
        let mut count = 0;
        for (from, to) in &self.replacements {
            let hits = current.matches(from.as_str()).count();
            if hits > 0 {
                count += hits;
                current = current.replace(from.as_str(), to);
            }
        }
        (current, count)
    }

    pub fn is_empty(&self) -> bool {
        self.replacements.is_empty()
    }
}

/// Outcome of one cleanup pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanupStats {
    /// Lines read from the original report
    pub lines_read: usize,
    /// Lines in the rewritten report
    pub lines_written: usize,
    /// Replacements made across all lines
    pub replacements: usize,
}

/// Path of the intermediate copy for `report` inside `scratch_dir`
pub fn copy_path_for(report: &Path, scratch_dir: &Path) -> PathBuf {
    let name = report
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    scratch_dir.join(format!("copy-of-{}", name))
}

/// Rewrite `report` in place through the copy at `copy_path`
///
/// ## Errors
///
/// - `Cleanup`: the report could not be moved, the copy could not be read,
///   or the rewritten report could not be written
pub fn cleanup_report(
    fs: &dyn Filesystem,
    report: &Path,
    copy_path: &Path,
    rules: &CleanupRules,
) -> Result<CleanupStats> {
    let cleanup_error = |e: std::io::Error| ApiDiffError::Cleanup {
        path: report.to_path_buf(),
        message: e.to_string(),
    };

    fs.rename(report, copy_path).map_err(cleanup_error)?;
    let original = fs.read_to_string(copy_path).map_err(cleanup_error)?;

    let mut stats = CleanupStats::default();
    let mut rewritten = String::with_capacity(original.len());
    for line in original.lines() {
        let (result, count) = rules.apply(line);
        stats.lines_read += 1;
        stats.replacements += count;
        rewritten.push_str(&result);
        rewritten.push('\n');
    }
    stats.lines_written = rewritten.matches('\n').count();

    fs.write(report, rewritten.as_bytes())
        .map_err(cleanup_error)?;

    tracing::debug!(
        report = %report.display(),
        lines_read = stats.lines_read,
        lines_written = stats.lines_written,
        replacements = stats.replacements,
        "report cleaned"
    );

    Ok(stats)
}
