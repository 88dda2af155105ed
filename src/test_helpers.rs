//! Shared test utilities for the nbblog test suite.
//!
//! Provides fixture writers for post folders and templates, plus lookup
//! helpers over scan-phase data structures (`Manifest`, `Post`).
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! write_post(tmp.path(), "2020_3_14_pi_day");
//! let manifest = scan(tmp.path()).unwrap();
//!
//! let post = find_post(&manifest, "pi_day");
//! assert_eq!(post.title, "Pi day");
//! ```

use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};

use crate::scan::Manifest;
use crate::templates::{self, Templates};
use crate::types::Post;

// =========================================================================
// Fixture setup
// =========================================================================

/// Create `root/folder/` with a `<slug>.ipynb` notebook inside and return the
/// folder path. The slug is everything after the date components.
pub fn write_post(root: &Path, folder: &str) -> PathBuf {
    let dir = root.join(folder);
    fs::create_dir_all(&dir).unwrap();
    let slug = folder.splitn(4, '_').nth(3).unwrap_or(folder);
    fs::write(
        dir.join(format!("{slug}.ipynb")),
        r#"{"cells": [], "metadata": {}, "nbformat": 4, "nbformat_minor": 5}"#,
    )
    .unwrap();
    dir
}

const POST_TOP_HTML: &str = "<html><body class=\"post\">\n";
const POST_BOTTOM_HTML: &str = "</body></html>\n";
const LIST_TOP_HTML: &str = "<html><body class=\"list\">\n";
const LIST_BOTTOM_HTML: &str = "</body></html>\n";

/// Write the four required template fragments into `dir`.
pub fn write_templates(dir: &Path) {
    fs::create_dir_all(dir).unwrap();
    fs::write(dir.join(templates::POST_TOP), POST_TOP_HTML).unwrap();
    fs::write(dir.join(templates::POST_BOTTOM), POST_BOTTOM_HTML).unwrap();
    fs::write(dir.join(templates::LIST_TOP), LIST_TOP_HTML).unwrap();
    fs::write(dir.join(templates::LIST_BOTTOM), LIST_BOTTOM_HTML).unwrap();
}

/// The same fragments `write_templates` puts on disk, already loaded.
pub fn sample_templates() -> Templates {
    Templates {
        post_top: POST_TOP_HTML.into(),
        post_bottom: POST_BOTTOM_HTML.into(),
        list_top: LIST_TOP_HTML.into(),
        list_bottom: LIST_BOTTOM_HTML.into(),
        comments: None,
    }
}

/// An in-memory post whose short name equals its slug.
pub fn make_post(year: i32, month: u32, day: u32, slug: &str) -> Post {
    Post {
        folder: format!("{year}_{month}_{day}_{slug}"),
        date: NaiveDate::from_ymd_opt(year, month, day).unwrap(),
        slug: slug.into(),
        title: crate::naming::display_title(slug),
        short_name: slug.into(),
    }
}

// =========================================================================
// Manifest lookups: panics with a clear message on miss
// =========================================================================

/// Find a post by slug. Panics if not found.
pub fn find_post<'a>(manifest: &'a Manifest, slug: &str) -> &'a Post {
    manifest
        .posts
        .iter()
        .find(|p| p.slug == slug)
        .unwrap_or_else(|| {
            let slugs = slugs(manifest);
            panic!("post '{slug}' not found. Available: {slugs:?}")
        })
}

/// All slugs in manifest order.
pub fn slugs(manifest: &Manifest) -> Vec<&str> {
    manifest.posts.iter().map(|p| p.slug.as_str()).collect()
}
