//! Seam to the external comparison engine and its report output.

#![allow(clippy::result_large_err)]

use apidiff_core::errors::{ApiDiffError, Result};
use apidiff_core::model::{ArtifactList, ComparisonConfig, ReleasePair, Side};
use apidiff_core::Filesystem;
use std::path::{Path, PathBuf};

/// Documents rendered by the comparison engine
///
/// Carried unmodified from comparison to emission; the pipeline does not look
/// inside.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffResult {
    html: Option<Vec<u8>>,
    xml: Option<Vec<u8>>,
    schema: Option<Vec<u8>>,
}

impl DiffResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_html(mut self, html: impl Into<Vec<u8>>) -> Self {
        self.html = Some(html.into());
        self
    }

    pub fn with_xml(mut self, xml: impl Into<Vec<u8>>) -> Self {
        self.xml = Some(xml.into());
        self
    }

    pub fn with_schema(mut self, schema: impl Into<Vec<u8>>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn html(&self) -> Option<&[u8]> {
        self.html.as_deref()
    }

    pub fn xml(&self) -> Option<&[u8]> {
        self.xml.as_deref()
    }

    pub fn schema(&self) -> Option<&[u8]> {
        self.schema.as_deref()
    }
}

/// External engine comparing two ordered artifact lists
pub trait ArchiveComparator {
    /// Compare the old release's artifacts against the new release's.
    ///
    /// # Errors
    ///
    /// Returns `ApiDiffError::Comparator` when the engine fails.
    fn compare(
        &self,
        old: &ArtifactList,
        new: &ArtifactList,
        config: &ComparisonConfig,
    ) -> Result<DiffResult>;
}

/// Serializes a [`DiffResult`] to the locations named in the config
pub trait ReportWriter {
    /// Write the report documents, returning the paths written.
    ///
    /// # Errors
    ///
    /// Returns `ApiDiffError::ReportWrite` when a document cannot be written.
    fn write_report(&self, diff: &DiffResult, config: &ComparisonConfig) -> Result<Vec<PathBuf>>;
}

/// Refuse empty release sides unless the config tolerates them, then compare
///
/// # Errors
///
/// - `EmptyArtifactSet`: a side has no artifacts and is not tolerated
/// - whatever the comparator returns
pub fn compare_releases(
    comparator: &dyn ArchiveComparator,
    pair: &ReleasePair,
    old: &ArtifactList,
    new: &ArtifactList,
    config: &ComparisonConfig,
) -> Result<DiffResult> {
    if old.is_empty() && !config.ignore_missing_old_version {
        return Err(ApiDiffError::EmptyArtifactSet {
            side: Side::Old,
            root: pair.old().path().to_path_buf(),
        });
    }
    if new.is_empty() && !config.ignore_missing_new_version {
        return Err(ApiDiffError::EmptyArtifactSet {
            side: Side::New,
            root: pair.new_root().path().to_path_buf(),
        });
    }
    comparator.compare(old, new, config)
}

/// Report writer backed by a [`Filesystem`]
///
/// Writes the HTML report with the configured title, plus the XML description
/// and schema next to it when the config asks for them and the engine
/// produced them.
pub struct FsReportWriter<'a> {
    fs: &'a dyn Filesystem,
}

impl<'a> FsReportWriter<'a> {
    pub fn new(fs: &'a dyn Filesystem) -> Self {
        Self { fs }
    }

    fn put(&self, path: &Path, contents: &[u8]) -> Result<PathBuf> {
        self.fs
            .write(path, contents)
            .map_err(|e| ApiDiffError::ReportWrite {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        Ok(path.to_path_buf())
    }
}

impl ReportWriter for FsReportWriter<'_> {
    fn write_report(&self, diff: &DiffResult, config: &ComparisonConfig) -> Result<Vec<PathBuf>> {
        let html = diff.html().ok_or_else(|| ApiDiffError::ReportWrite {
            path: config.html_output.clone(),
            message: "comparison engine produced no HTML document".to_string(),
        })?;
        let titled = apply_title(&String::from_utf8_lossy(html), &config.title);

        let mut written = vec![self.put(&config.html_output, titled.as_bytes())?];

        if config.create_schema_file {
            if let Some(xml) = diff.xml() {
                written.push(self.put(&config.xml_companion(), xml)?);
            }
            if let Some(schema) = diff.schema() {
                written.push(self.put(&config.schema_companion(), schema)?);
            }
        }

        Ok(written)
    }
}

/// Replace the content of the first `<title>` element
///
/// Documents without a title element are returned unchanged.
pub fn apply_title(html: &str, title: &str) -> String {
    let Some(open) = html.find("<title>") else {
        return html.to_string();
    };
    let content_start = open + "<title>".len();
    let Some(close) = html[content_start..].find("</title>") else {
        return html.to_string();
    };

    let mut out = String::with_capacity(html.len() + title.len());
    out.push_str(&html[..content_start]);
    out.push_str(&escape_html(title));
    out.push_str(&html[content_start + close..]);
    out
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
