//! Shared test utilities for the brochure test suite.
//!
//! Provides fixture setup and lookup helpers for the loaded [`Site`]
//! structures.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let site = content::load_site(tmp.path()).unwrap();
//!
//! let page = find_page(&site, "contact");
//! let post = find_post(&site, "on-burnout");
//! assert_eq!(post.date, "2025-05-05");
//! ```

use std::fs;
use std::path::Path;
use tempfile::TempDir;
use walkdir::WalkDir;

use crate::content::{PageDoc, PostDoc, Site};

// =========================================================================
// Fixture staging
// =========================================================================

/// Stage the bundled `fixtures/content/` export in a fresh [`TempDir`].
///
/// Every test works on its own throwaway copy; rewriting or deleting
/// content files in one test never leaks into another, or into the
/// checked-in fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/content");
    for entry in WalkDir::new(&root) {
        let entry = entry.unwrap();
        let target = tmp.path().join(entry.path().strip_prefix(&root).unwrap());
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).unwrap();
        } else {
            fs::copy(entry.path(), &target).unwrap();
        }
    }
    tmp
}

// =========================================================================
// Site lookups — panics with a clear message on miss
// =========================================================================

/// Find a page by slug. Panics if not found.
pub fn find_page<'a>(site: &'a Site, slug: &str) -> &'a PageDoc {
    site.pages
        .iter()
        .find(|p| p.slug == slug)
        .unwrap_or_else(|| {
            let slugs: Vec<&str> = site.pages.iter().map(|p| p.slug.as_str()).collect();
            panic!("page '{slug}' not found. Available: {slugs:?}")
        })
}

/// Find a post by slug. Panics if not found.
pub fn find_post<'a>(site: &'a Site, slug: &str) -> &'a PostDoc {
    site.posts
        .iter()
        .find(|p| p.slug == slug)
        .unwrap_or_else(|| {
            let slugs: Vec<&str> = site.posts.iter().map(|p| p.slug.as_str()).collect();
            panic!("post '{slug}' not found. Available: {slugs:?}")
        })
}

// =========================================================================
// Bulk extractors
// =========================================================================

/// All page slugs in load order.
pub fn page_slugs(site: &Site) -> Vec<&str> {
    site.pages.iter().map(|p| p.slug.as_str()).collect()
}

/// All post slugs, newest first.
pub fn post_slugs(site: &Site) -> Vec<&str> {
    site.posts.iter().map(|p| p.slug.as_str()).collect()
}
