//! Artifacts command: show what a release contributes to a comparison

use super::config::{absolute, FileConfig};
use apidiff_core::fs::{Filesystem, OsFs};
use apidiff_core::locator::locate_artifacts;
use apidiff_core::model::ReleaseRoot;
use apidiff_core::ordering::order_artifacts;
use apidiff_core::version::load_version;
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ArtifactsArgs {
    /// Release root directory
    pub root: PathBuf,

    /// Print the list as JSON
    #[arg(long)]
    pub json: bool,

    #[arg(long)]
    pub max_depth: Option<usize>,

    #[arg(long)]
    pub config: Option<PathBuf>,
}

pub fn execute(args: ArtifactsArgs) -> Result<(), Box<dyn std::error::Error>> {
    let file = FileConfig::load(args.config.as_deref())?;
    let path = absolute(&args.root)?;
    let fs = OsFs;

    if !fs.exists(&path) {
        return Err(format!("Unable to find Root Path: {}", path.display()).into());
    }

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let root = ReleaseRoot::new(name, path);

    let version = load_version(&fs, &root, &file.version_source(false))?;
    let artifacts = order_artifacts(locate_artifacts(
        &fs,
        &root,
        &version,
        &file.artifact_filter(),
        file.max_depth(args.max_depth)?,
    )?);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&artifacts)?);
    } else {
        println!("# {} {}", root.name(), version);
        for path in artifacts.paths() {
            println!("{}", path.display());
        }
    }

    Ok(())
}
