//! Post repository scanning.
//!
//! Stage 1 of the build pipeline. Lists the posts directory, parses each post
//! folder name, and produces a [`Manifest`] that the render and index stages
//! consume.
//!
//! ## Directory Structure
//!
//! ```text
//! posts/                                   # Posts directory
//! ├── config.toml                          # Site configuration (optional)
//! ├── 2017_2_22_observing_random_variables/
//! │   ├── observing_random_variables.ipynb # Notebook named after the slug
//! │   └── img/                             # Images referenced as img/...
//! │       └── histogram.png
//! ├── 2020_3_14_pi_day/
//! │   └── pi_day.ipynb
//! └── 2020_4_1_unfinished/
//!     ├── unfinished.ipynb
//!     └── no_publish                       # Marker: never published
//! ```
//!
//! ## Rules
//!
//! - Only directories are considered; hidden entries (`.git`, `.ipynb_checkpoints`)
//!   are ignored.
//! - A folder containing a `no_publish` file is skipped entirely.
//! - Every other folder must be named `YYYY_M_D_slug`; anything else aborts
//!   the scan with [`ScanError::MalformedFolderName`].
//!
//! ## Short Names
//!
//! Public URLs use a short name: the slug truncated to
//! `posts.short_name_length` characters. When two posts truncate to the same
//! short name, the later ones get `_2`, `_3`, ... Suffixes are handed out in
//! (date, slug, folder) order, so the oldest post keeps the bare name and the
//! result doesn't depend on directory listing order. Publishing a newer post
//! never renames an existing one; publishing an *older* one with the same
//! prefix (a backdated folder, or a removed `no_publish` marker) shifts the
//! suffixes of the posts after it. Rendered pages record their source folder,
//! so the renderer notices and rebuilds them.

use crate::config::{self, SiteConfig};
use crate::naming;
use crate::types::Post;
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Marker file that keeps a post out of the build.
pub const NO_PUBLISH_MARKER: &str = "no_publish";

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Post folder name is not YYYY_M_D_slug: {0}")]
    MalformedFolderName(String),
}

/// Manifest output from the scan stage.
#[derive(Debug, Serialize)]
pub struct Manifest {
    /// Published posts, newest first.
    pub posts: Vec<Post>,
    /// Folder names carrying the `no_publish` marker, sorted.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unpublished: Vec<String>,
    pub config: SiteConfig,
}

pub fn scan(root: &Path) -> Result<Manifest, ScanError> {
    let config = config::load_config(root)?;

    let mut posts = Vec::new();
    let mut unpublished = Vec::new();

    for folder in collect_post_folders(root)? {
        if root.join(&folder).join(NO_PUBLISH_MARKER).exists() {
            unpublished.push(folder);
            continue;
        }
        let parsed = naming::parse_folder_name(&folder)
            .ok_or_else(|| ScanError::MalformedFolderName(folder.clone()))?;
        posts.push(Post {
            title: naming::display_title(&parsed.slug),
            date: parsed.date,
            slug: parsed.slug,
            short_name: String::new(),
            folder,
        });
    }

    assign_short_names(&mut posts, config.posts.short_name_length);
    sort_newest_first(&mut posts);
    unpublished.sort();

    Ok(Manifest {
        posts,
        unpublished,
        config,
    })
}

/// Names of the candidate post folders directly under `root`.
fn collect_post_folders(root: &Path) -> Result<Vec<String>, ScanError> {
    let mut folders = Vec::new();
    for entry in fs::read_dir(root)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        if name.starts_with('.') {
            continue;
        }
        folders.push(name);
    }
    Ok(folders)
}

/// Newest first; posts published the same day are ordered by slug.
pub fn sort_newest_first(posts: &mut [Post]) {
    posts.sort_by(|a, b| {
        b.date
            .cmp(&a.date)
            .then_with(|| a.slug.cmp(&b.slug))
            .then_with(|| a.folder.cmp(&b.folder))
    });
}

/// Fill in `short_name` for every post. See the module docs for the ordering
/// guarantee.
fn assign_short_names(posts: &mut [Post], max_len: usize) {
    posts.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then_with(|| a.slug.cmp(&b.slug))
            .then_with(|| a.folder.cmp(&b.folder))
    });

    let mut taken: HashSet<String> = HashSet::new();
    for post in posts.iter_mut() {
        let base = truncate_slug(&post.slug, max_len);
        let mut candidate = base.clone();
        let mut n = 2;
        while taken.contains(&candidate) {
            candidate = format!("{}_{}", base, n);
            n += 1;
        }
        taken.insert(candidate.clone());
        post.short_name = candidate;
    }
}

/// Slug cut to `max_len` characters with trailing underscores removed. An
/// all-digit result is prefixed so it can't be read as an index page number.
fn truncate_slug(slug: &str, max_len: usize) -> String {
    let truncated: String = slug.chars().take(max_len).collect();
    let trimmed = truncated.trim_end_matches('_');
    let base = if trimmed.is_empty() { truncated.as_str() } else { trimmed };
    if base.chars().all(|c| c.is_ascii_digit()) {
        format!("post_{}", base)
    } else {
        base.to_string()
    }
}
