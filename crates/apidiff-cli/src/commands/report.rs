//! Report command: one API-diff report per consecutive release pair

use super::config::{
    absolute, FileConfig, DEFAULT_JAPICMP_JAR, DEFAULT_JAVA, DEFAULT_OUTPUT_DIR, DEFAULT_RELEASES,
    DEFAULT_STYLESHEET,
};
use apidiff_core::errors::ExError;
use apidiff_core::fs::OsFs;
use apidiff_core::model::ReleasePair;
use apidiff_engine::pipeline::DEFAULT_PRODUCT;
use apidiff_engine::{
    run_releases, FsReportWriter, JapicmpCli, Pipeline, PipelineObserver, PipelineSettings,
};
use clap::Args;
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct ReportArgs {
    /// Directory holding the release roots (default: parent of the working directory)
    #[arg(long)]
    pub base_dir: Option<PathBuf>,

    /// Release root name, oldest first; repeat for each release
    #[arg(long = "release", value_name = "NAME")]
    pub releases: Vec<String>,

    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    #[arg(long)]
    pub japicmp_jar: Option<PathBuf>,

    #[arg(long)]
    pub java: Option<PathBuf>,

    /// CSS stylesheet linked from the HTML reports (default: src/main/resources/report.css if present)
    #[arg(long)]
    pub stylesheet: Option<PathBuf>,

    /// Walk depth below each dependency directory
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Fail a pair whose properties file lacks the version key
    #[arg(long)]
    pub require_version: bool,

    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Prints progress to stdout and failures to stderr
struct ConsoleObserver;

impl PipelineObserver for ConsoleObserver {
    fn generating(&self, _pair: &ReleasePair, report: &Path) {
        println!("## Generating report: {}", report.display());
    }

    fn cleaning(&self, _pair: &ReleasePair, report: &Path) {
        println!("## Cleaning report: {}", report.display());
    }

    fn emit_failed(&self, _pair: &ReleasePair, err: &ExError) {
        eprintln!("Error: {}", err);
    }

    fn pair_failed(&self, _pair: &ReleasePair, err: &ExError) {
        eprintln!("Error: {}", err);
    }
}

fn default_base_dir() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let cwd = std::env::current_dir()?;
    let parent = cwd
        .parent()
        .ok_or("working directory has no parent; pass --base-dir")?;
    Ok(parent.to_path_buf())
}

/// The bundled stylesheet, when the working directory has one
fn default_stylesheet() -> Option<PathBuf> {
    let path = absolute(Path::new(DEFAULT_STYLESHEET)).ok()?;
    path.is_file().then_some(path)
}

pub fn execute(args: ReportArgs) -> Result<(), Box<dyn std::error::Error>> {
    let file = FileConfig::load(args.config.as_deref())?;

    let base_dir = match args.base_dir.or_else(|| file.base_dir.clone()) {
        Some(dir) => absolute(&dir)?,
        None => default_base_dir()?,
    };
    let releases: Vec<String> = if !args.releases.is_empty() {
        args.releases
    } else if let Some(releases) = file.releases.clone() {
        releases
    } else {
        DEFAULT_RELEASES.iter().map(|s| s.to_string()).collect()
    };
    if releases.len() < 2 {
        return Err("at least two releases are needed to form a pair".into());
    }

    let output_dir = absolute(
        &args
            .output_dir
            .or_else(|| file.output_dir.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
    )?;

    let settings = PipelineSettings {
        output_dir,
        stylesheet: args
            .stylesheet
            .or_else(|| file.stylesheet.clone())
            .or_else(default_stylesheet),
        product: file
            .product
            .clone()
            .unwrap_or_else(|| DEFAULT_PRODUCT.to_string()),
        filter: file.artifact_filter(),
        max_depth: file.max_depth(args.max_depth)?,
        version: file.version_source(args.require_version),
    };

    let comparator = JapicmpCli::new(
        args.java
            .or_else(|| file.engine.java.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_JAVA)),
        args.japicmp_jar
            .or_else(|| file.engine.jar.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_JAPICMP_JAR)),
    );

    tracing::debug!(
        base_dir = %base_dir.display(),
        output_dir = %settings.output_dir.display(),
        releases = releases.len(),
        "starting report run"
    );

    let fs = OsFs;
    let writer = FsReportWriter::new(&fs);
    let pipeline = Pipeline {
        fs: &fs,
        comparator: &comparator,
        writer: &writer,
        observer: &ConsoleObserver,
        settings: &settings,
    };

    let summary = run_releases(&pipeline, &base_dir, &releases);

    let total = summary.outcomes.len();
    let failed = summary.failed_count();
    println!("{} of {} reports generated", total - failed, total);

    if summary.exit_code() != 0 {
        return Err(format!("{} of {} release pairs failed", failed, total).into());
    }
    Ok(())
}
