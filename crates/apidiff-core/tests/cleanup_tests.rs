#![allow(clippy::unwrap_used, clippy::expect_used)]

use apidiff_core::cleanup::{cleanup_report, copy_path_for, CleanupRules, LINE_BREAK, PLACEHOLDER};
use apidiff_core::{OsFs, ReleaseRoot};
use std::fs;
use tempfile::TempDir;

fn roots(dir: &TempDir) -> (ReleaseRoot, ReleaseRoot) {
    (
        ReleaseRoot::resolve(dir.path(), "jetty-9.4"),
        ReleaseRoot::resolve(dir.path(), "jetty-10.0"),
    )
}

#[test]
fn test_cleanup_on_disk_report() {
    let dir = TempDir::new().unwrap();
    let (old, new) = roots(&dir);
    let out = dir.path().join("target");
    fs::create_dir_all(&out).unwrap();

    let report = out.join("jetty-9.4-to-10.0-diff.html");
    let old_dep = old.dependency_dir().display().to_string();
    let new_dep = new.dependency_dir().display().to_string();
    let original = format!(
        "<html>\n<p>Old: {o}/server.jar;{o}/http.jar</p>\n<p>New: {n}/server.jar:{n}/http.jar</p>\n</html>\n",
        o = old_dep,
        n = new_dep
    );
    fs::write(&report, &original).unwrap();

    let copy = copy_path_for(&report, &out);
    let rules = CleanupRules::for_dependency_dirs(&old.dependency_dir(), &new.dependency_dir());
    let stats = cleanup_report(&OsFs, &report, &copy, &rules).unwrap();

    let cleaned = fs::read_to_string(&report).unwrap();
    assert!(!cleaned.contains(&old_dep));
    assert!(!cleaned.contains(&new_dep));
    assert!(!cleaned.contains(".jar;"));
    assert!(!cleaned.contains(".jar:"));
    assert_eq!(cleaned.matches(PLACEHOLDER).count(), 4);
    assert!(cleaned.contains(&format!("{}/server.jar{}", PLACEHOLDER, LINE_BREAK)));

    // The intermediate copy stays behind, untouched
    assert_eq!(fs::read_to_string(&copy).unwrap(), original);
    assert_eq!(
        copy.file_name().unwrap().to_string_lossy(),
        "copy-of-jetty-9.4-to-10.0-diff.html"
    );

    // Each separator adds exactly one line
    assert_eq!(stats.lines_read, 4);
    assert_eq!(stats.lines_written, stats.lines_read + 2);
    assert_eq!(cleaned.lines().count(), stats.lines_written);
}

#[test]
fn test_cleanup_twice_is_noop() {
    let dir = TempDir::new().unwrap();
    let (old, new) = roots(&dir);
    let report = dir.path().join("r.html");
    fs::write(
        &report,
        format!("{}/a.jar;{}/b.jar\n", old.dependency_dir().display(), new.dependency_dir().display()),
    )
    .unwrap();

    let copy = copy_path_for(&report, dir.path());
    let rules = CleanupRules::for_dependency_dirs(&old.dependency_dir(), &new.dependency_dir());

    cleanup_report(&OsFs, &report, &copy, &rules).unwrap();
    let first = fs::read_to_string(&report).unwrap();

    let stats = cleanup_report(&OsFs, &report, &copy, &rules).unwrap();
    assert_eq!(stats.replacements, 0);
    assert_eq!(fs::read_to_string(&report).unwrap(), first);
}

#[test]
fn test_reverse_substitution_restores_line_content() {
    let dir = TempDir::new().unwrap();
    let (old, new) = roots(&dir);
    let old_dep = old.dependency_dir().display().to_string();
    let line = format!("{o}/a.jar;{o}/b.jar;{o}/c.jar", o = old_dep);
    let report = dir.path().join("r.html");
    fs::write(&report, format!("{}\n", line)).unwrap();

    let copy = copy_path_for(&report, dir.path());
    let rules = CleanupRules::for_dependency_dirs(&old.dependency_dir(), &new.dependency_dir());
    let stats = cleanup_report(&OsFs, &report, &copy, &rules).unwrap();
    assert_eq!(stats.lines_written, 3);

    let cleaned = fs::read_to_string(&report).unwrap();
    let restored = cleaned
        .trim_end_matches('\n')
        .replace(&format!(".jar{}", LINE_BREAK), ".jar;")
        .replace(PLACEHOLDER, &old_dep);
    assert_eq!(restored, line);
}
