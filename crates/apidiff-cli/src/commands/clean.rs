//! Clean command: rewrite an existing report without regenerating it

use super::config::absolute;
use apidiff_core::cleanup::{cleanup_report, copy_path_for, CleanupRules};
use apidiff_core::fs::OsFs;
use apidiff_core::model::ReleaseRoot;
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct CleanArgs {
    /// HTML report to clean in place
    pub report: PathBuf,

    /// Root of the release the report compares from
    #[arg(long)]
    pub old_root: PathBuf,

    /// Root of the release the report compares to
    #[arg(long)]
    pub new_root: PathBuf,

    /// Where the intermediate copy goes (default: next to the report)
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
}

pub fn execute(args: CleanArgs) -> Result<(), Box<dyn std::error::Error>> {
    let report = absolute(&args.report)?;
    let old = ReleaseRoot::new("old", absolute(&args.old_root)?);
    let new = ReleaseRoot::new("new", absolute(&args.new_root)?);

    let scratch_dir = match args.output_dir {
        Some(dir) => absolute(&dir)?,
        None => report
            .parent()
            .map(PathBuf::from)
            .ok_or("report path has no parent directory")?,
    };
    let copy = copy_path_for(&report, &scratch_dir);
    let rules = CleanupRules::for_dependency_dirs(&old.dependency_dir(), &new.dependency_dir());

    println!("## Cleaning report: {}", report.display());
    let stats = cleanup_report(&OsFs, &report, &copy, &rules)?;
    println!(
        "{} lines read, {} lines written, {} replacements",
        stats.lines_read, stats.lines_written, stats.replacements
    );

    Ok(())
}
