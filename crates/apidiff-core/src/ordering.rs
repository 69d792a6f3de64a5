//! Deterministic artifact ordering
//!
//! The comparison engine reports classes in input order, so artifacts are
//! sorted by path before they reach it. Traversal order differs between
//! platforms and filesystems; path order does not.
//!
//! Paths compare as whole `/`-separated strings, not component by component:
//! `jetty-util-ajax/` sorts before `jetty-util/` because `-` precedes `/`.

use crate::locator::normalized;
use crate::model::{ArtifactList, ArtifactReference};
use std::cmp::Ordering;

/// Total order over artifacts by full path text
pub fn compare_artifacts(a: &ArtifactReference, b: &ArtifactReference) -> Ordering {
    normalized(a.path()).cmp(&normalized(b.path()))
}

/// Sort located artifacts into an [`ArtifactList`]
pub fn order_artifacts(mut artifacts: Vec<ArtifactReference>) -> ArtifactList {
    artifacts.sort_by_cached_key(|a| normalized(a.path()));
    ArtifactList::from_sorted(artifacts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_orders_by_path() {
        let list = order_artifacts(vec![
            ArtifactReference::new("/d/org/eclipse/jetty/server/server.jar", "1"),
            ArtifactReference::new("/d/org/eclipse/jetty/http/http.jar", "1"),
            ArtifactReference::new("/d/org/eclipse/jetty/io/io.jar", "1"),
        ]);
        let paths: Vec<&Path> = list.paths().collect();
        assert_eq!(
            paths,
            vec![
                Path::new("/d/org/eclipse/jetty/http/http.jar"),
                Path::new("/d/org/eclipse/jetty/io/io.jar"),
                Path::new("/d/org/eclipse/jetty/server/server.jar"),
            ]
        );
    }

    #[test]
    fn test_sibling_with_longer_name_sorts_first() {
        let list = order_artifacts(vec![
            ArtifactReference::new("/d/org/eclipse/jetty/jetty-util/jetty-util.jar", "1"),
            ArtifactReference::new(
                "/d/org/eclipse/jetty/jetty-util-ajax/jetty-util-ajax.jar",
                "1",
            ),
            ArtifactReference::new("/d/org/eclipse/jetty/jetty-http/jetty-http.jar", "1"),
            ArtifactReference::new("/d/org/eclipse/jetty/jetty-http-spi/jetty-http-spi.jar", "1"),
        ]);
        let paths: Vec<&Path> = list.paths().collect();
        assert_eq!(
            paths,
            vec![
                Path::new("/d/org/eclipse/jetty/jetty-http-spi/jetty-http-spi.jar"),
                Path::new("/d/org/eclipse/jetty/jetty-http/jetty-http.jar"),
                Path::new("/d/org/eclipse/jetty/jetty-util-ajax/jetty-util-ajax.jar"),
                Path::new("/d/org/eclipse/jetty/jetty-util/jetty-util.jar"),
            ]
        );
    }

    #[test]
    fn test_empty_input() {
        let list = order_artifacts(Vec::new());
        assert!(list.is_empty());
    }

    #[test]
    fn test_compare_is_path_order() {
        let a = ArtifactReference::new("/a.jar", "2");
        let b = ArtifactReference::new("/b.jar", "1");
        assert_eq!(compare_artifacts(&a, &b), Ordering::Less);
        assert_eq!(compare_artifacts(&b, &a), Ordering::Greater);
        assert_eq!(compare_artifacts(&a, &a), Ordering::Equal);

        let util = ArtifactReference::new("/d/jetty-util/jetty-util.jar", "1");
        let ajax = ArtifactReference::new("/d/jetty-util-ajax/jetty-util-ajax.jar", "1");
        assert_eq!(compare_artifacts(&ajax, &util), Ordering::Less);
    }
}
