//! Property-based tests for cache-key derivation and description equality.
//!
//! These tests use proptest to generate random inputs and verify that
//! invariants hold for all possible inputs.

#[cfg(test)]
mod proptest_tests {
    use crate::description::{descriptions_equal, normalize_url, PackageDescription};
    use crate::layout::{mirror_dir_name, repo_name, url_hash, CacheLayout};
    use proptest::prelude::*;

    proptest! {
        /// Property: mirror directory names never contain path separators
        #[test]
        fn mirror_dir_name_is_a_single_component(url in ".*") {
            let name = mirror_dir_name(&url);
            let unsafe_chars = ['/', '\\', ':', '*', '?', '"', '<', '>', '|'];
            for ch in unsafe_chars {
                prop_assert!(
                    !name.contains(ch),
                    "mirror_dir_name produced unsafe character '{}' from input '{}'",
                    ch,
                    url
                );
            }
        }

        /// Property: mirror paths are a pure function of the URL
        #[test]
        fn mirror_path_is_deterministic(url in ".*") {
            let layout = CacheLayout::new("/cache");
            prop_assert_eq!(layout.mirror_path(&url), layout.mirror_path(&url));
        }

        /// Property: the hash is always 64 lowercase hex characters
        #[test]
        fn url_hash_shape(url in ".*") {
            let hash = url_hash(&url);
            prop_assert_eq!(hash.len(), 64);
            prop_assert!(hash.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
        }

        /// Property: normalizing twice changes nothing
        #[test]
        fn normalize_url_is_idempotent(url in "[a-zA-Z0-9:/._@-]{0,40}") {
            let once = normalize_url(&url);
            prop_assert_eq!(normalize_url(&once), once);
        }

        /// Property: the repository name is never empty
        #[test]
        fn repo_name_never_empty(url in ".*") {
            prop_assert!(!repo_name(&url).is_empty());
        }

        /// Property: snapshot paths differ whenever the commit differs
        #[test]
        fn snapshot_paths_separate_commits(a in "[0-9a-f]{40}", b in "[0-9a-f]{40}") {
            let layout = CacheLayout::new("/cache");
            prop_assert_eq!(
                layout.snapshot_path("pkg", &a) == layout.snapshot_path("pkg", &b),
                a == b
            );
        }

        /// Property: the pinned commit never affects equivalence
        #[test]
        fn equality_ignores_resolved_ref(
            url in "[a-z]{1,10}\\.git",
            r in proptest::option::of("[a-z]{1,8}"),
            x in "[0-9a-f]{40}",
            y in "[0-9a-f]{40}",
        ) {
            let base = PackageDescription::new(url, r);
            prop_assert!(descriptions_equal(
                &base.with_resolved_ref(x),
                &base.with_resolved_ref(y)
            ));
        }

        /// Property: different requested refs are never equivalent
        #[test]
        fn equality_respects_ref(a in "[a-z]{1,8}", b in "[a-z]{1,8}") {
            let left = PackageDescription::new("repo.git", Some(a.clone()));
            let right = PackageDescription::new("repo.git", Some(b.clone()));
            prop_assert_eq!(descriptions_equal(&left, &right), a == b);
        }
    }
}
