//! japicmp, driven as a `java -jar` subprocess
//!
//! The engine writes its documents into a private staging directory; they
//! are read back into the [`DiffResult`] so the emitter decides where they
//! land.

#![allow(clippy::result_large_err)]

use crate::comparator::{ArchiveComparator, DiffResult};
use apidiff_core::errors::{ApiDiffError, Result};
use apidiff_core::model::{ArtifactList, ComparisonConfig};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

const STAGED_HTML: &str = "report.html";
const STAGED_XML: &str = "report.xml";
/// japicmp names its schema itself, next to the XML report
const STAGED_SCHEMA: &str = "japicmp.xsd";

/// japicmp command-line runner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JapicmpCli {
    java: PathBuf,
    jar: PathBuf,
}

impl JapicmpCli {
    pub fn new(java: impl Into<PathBuf>, jar: impl Into<PathBuf>) -> Self {
        Self {
            java: java.into(),
            jar: jar.into(),
        }
    }

    /// Arguments after `java` for one comparison staged in `staging`
    pub fn arguments(
        &self,
        old: &ArtifactList,
        new: &ArtifactList,
        config: &ComparisonConfig,
        staging: &Path,
    ) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "-jar".into(),
            self.jar.clone().into_os_string(),
            "--old".into(),
            archive_list(old),
            "--new".into(),
            archive_list(new),
            "-a".into(),
            config.access_modifier.as_str().into(),
        ];

        if config.output_only_modifications {
            args.push("-m".into());
        }
        if config.output_only_binary_incompatible {
            args.push("-b".into());
        }
        if config.ignore_missing_classes {
            args.push("--ignore-missing-classes".into());
        }
        if config.semantic_versioning {
            args.push("-s".into());
        }

        args.push("--html-file".into());
        args.push(staging.join(STAGED_HTML).into_os_string());

        if config.create_schema_file {
            args.push("-x".into());
            args.push(staging.join(STAGED_XML).into_os_string());
        }

        if let Some(stylesheet) = &config.html_stylesheet {
            args.push("--html-stylesheet".into());
            args.push(stylesheet.clone().into_os_string());
        }

        args
    }
}

/// Archives joined the way japicmp splits its `--old`/`--new` values
fn archive_list(artifacts: &ArtifactList) -> OsString {
    let mut joined = OsString::new();
    for (i, path) in artifacts.paths().enumerate() {
        if i > 0 {
            joined.push(";");
        }
        joined.push(path.as_os_str());
    }
    joined
}

/// HTML, XML and schema documents japicmp leaves in `staging`
fn staged_documents(staging: &Path) -> [PathBuf; 3] {
    [
        staging.join(STAGED_HTML),
        staging.join(STAGED_XML),
        staging.join(STAGED_SCHEMA),
    ]
}

fn read_staged(path: &Path) -> Option<Vec<u8>> {
    std::fs::read(path).ok()
}

impl ArchiveComparator for JapicmpCli {
    fn compare(
        &self,
        old: &ArtifactList,
        new: &ArtifactList,
        config: &ComparisonConfig,
    ) -> Result<DiffResult> {
        if !self.jar.is_file() {
            return Err(ApiDiffError::Comparator {
                message: format!("japicmp jar not found: {}", self.jar.display()),
            });
        }

        let staging = tempfile::Builder::new()
            .prefix("apidiff-")
            .tempdir()
            .map_err(|e| ApiDiffError::Comparator {
                message: format!("unable to create staging directory: {}", e),
            })?;

        let args = self.arguments(old, new, config, staging.path());
        tracing::debug!(
            java = %self.java.display(),
            old_count = old.len(),
            new_count = new.len(),
            "invoking japicmp"
        );

        let output = Command::new(&self.java)
            .args(&args)
            .output()
            .map_err(|e| ApiDiffError::Comparator {
                message: format!("failed to launch {}: {}", self.java.display(), e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ApiDiffError::Comparator {
                message: format!("japicmp exited with {}: {}", output.status, stderr.trim()),
            });
        }

        let [html, xml, schema] = staged_documents(staging.path());
        let mut diff = DiffResult::new();
        if let Some(html) = read_staged(&html) {
            diff = diff.with_html(html);
        }
        if let Some(xml) = read_staged(&xml) {
            diff = diff.with_xml(xml);
        }
        match read_staged(&schema) {
            Some(schema) => diff = diff.with_schema(schema),
            None if config.create_schema_file => {
                tracing::warn!(path = %schema.display(), "japicmp wrote no schema");
            }
            None => {}
        }

        Ok(diff)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apidiff_core::model::AccessModifier;
    use apidiff_core::ordering::order_artifacts;
    use apidiff_core::ArtifactReference;

    fn list(paths: &[&str]) -> ArtifactList {
        order_artifacts(
            paths
                .iter()
                .map(|p| ArtifactReference::new(*p, "1"))
                .collect(),
        )
    }

    fn strings(args: &[OsString]) -> Vec<String> {
        args.iter().map(|a| a.to_string_lossy().into_owned()).collect()
    }

    #[test]
    fn test_arguments_for_default_config() {
        let cli = JapicmpCli::new("java", "/tools/japicmp.jar");
        let config = ComparisonConfig::for_pair(
            "/out/a-diff.html",
            Some(PathBuf::from("/css/report.css")),
            "t",
        );
        let args = strings(&cli.arguments(
            &list(&["/o/b.jar", "/o/a.jar"]),
            &list(&["/n/a.jar"]),
            &config,
            Path::new("/stage"),
        ));

        assert_eq!(
            args,
            vec![
                "-jar",
                "/tools/japicmp.jar",
                "--old",
                "/o/a.jar;/o/b.jar",
                "--new",
                "/n/a.jar",
                "-a",
                "protected",
                "-m",
                "--ignore-missing-classes",
                "--html-file",
                "/stage/report.html",
                "-x",
                "/stage/report.xml",
                "--html-stylesheet",
                "/css/report.css",
            ]
        );
    }

    #[test]
    fn test_arguments_follow_flags() {
        let cli = JapicmpCli::new("java", "/tools/japicmp.jar");
        let mut config = ComparisonConfig::for_pair("/out/a-diff.html", None, "t");
        config.output_only_modifications = false;
        config.output_only_binary_incompatible = true;
        config.ignore_missing_classes = false;
        config.semantic_versioning = true;
        config.create_schema_file = false;
        config.access_modifier = AccessModifier::Public;

        let args = strings(&cli.arguments(
            &list(&["/o/a.jar"]),
            &list(&["/n/a.jar"]),
            &config,
            Path::new("/stage"),
        ));

        assert!(args.contains(&"-b".to_string()));
        assert!(args.contains(&"-s".to_string()));
        assert!(args.contains(&"public".to_string()));
        assert!(!args.contains(&"-m".to_string()));
        assert!(!args.contains(&"-x".to_string()));
        assert!(!args.contains(&"--ignore-missing-classes".to_string()));
        assert!(!args.contains(&"--html-stylesheet".to_string()));
    }

    #[test]
    fn test_staged_documents_use_japicmp_schema_name() {
        let names: Vec<String> = staged_documents(Path::new("/stage"))
            .iter()
            .map(|p| p.display().to_string())
            .collect();
        assert_eq!(
            names,
            vec!["/stage/report.html", "/stage/report.xml", "/stage/japicmp.xsd"]
        );
    }

    /// Stand-in for `java` that writes what japicmp writes next to `--html-file`
    #[cfg(unix)]
    fn fake_java(dir: &Path) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let script = dir.join("java");
        std::fs::write(
            &script,
            "#!/bin/sh\n\
             while [ $# -gt 0 ]; do\n\
               if [ \"$1\" = \"--html-file\" ]; then out=$(dirname \"$2\"); fi\n\
               shift\n\
             done\n\
             echo '<html><title>japicmp</title></html>' > \"$out/report.html\"\n\
             echo '<japicmp/>' > \"$out/report.xml\"\n\
             echo '<xs:schema/>' > \"$out/japicmp.xsd\"\n",
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
        script
    }

    #[cfg(unix)]
    #[test]
    fn test_compare_reads_back_schema_companion() {
        let dir = tempfile::TempDir::new().unwrap();
        let jar = dir.path().join("japicmp.jar");
        std::fs::write(&jar, b"PK").unwrap();
        let cli = JapicmpCli::new(fake_java(dir.path()), jar);
        let config = ComparisonConfig::for_pair("/out/a-diff.html", None, "t");

        let diff = cli
            .compare(&list(&["/o/a.jar"]), &list(&["/n/a.jar"]), &config)
            .unwrap();

        assert!(diff.html().is_some());
        assert_eq!(diff.xml(), Some(b"<japicmp/>\n".as_slice()));
        assert_eq!(diff.schema(), Some(b"<xs:schema/>\n".as_slice()));
    }

    #[test]
    fn test_missing_jar_is_comparator_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let cli = JapicmpCli::new("java", dir.path().join("absent.jar"));
        let config = ComparisonConfig::for_pair("/out/a-diff.html", None, "t");

        let err = cli
            .compare(&list(&["/o/a.jar"]), &list(&["/n/a.jar"]), &config)
            .unwrap_err();
        match err {
            ApiDiffError::Comparator { message } => assert!(message.contains("absent.jar")),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
