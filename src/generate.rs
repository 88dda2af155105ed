//! Site generation.
//!
//! Runs the render and index stages over a scanned [`Manifest`]: every
//! published post is rendered (or skipped when up to date), then the index
//! pages are rebuilt from scratch.
//!
//! ## Output Structure
//!
//! ```text
//! site/
//! ├── blog-posts/          # One page per post
//! ├── blog-post-pages/     # blog0.html, blog1.html, ...
//! ├── img/<short_name>/    # Post images
//! └── notebooks/           # Source notebooks for download
//! ```
//!
//! The site root `index.html` is not generated; it is served as-is if present.
//!
//! Templates are loaded before any post is touched, so a missing fragment
//! fails the build without writing anything. The first render failure aborts
//! the run.

use crate::cache::RenderStats;
use crate::convert::NotebookConverter;
use crate::index;
use crate::render::{self, OutputLayout, RenderContext, RenderError, RenderStatus};
use crate::scan::Manifest;
use crate::templates::{TemplateError, Templates};
use crate::types::Post;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Template error: {0}")]
    Template(#[from] TemplateError),
    #[error("Failed to render {folder}: {source}")]
    Render { folder: String, source: RenderError },
}

/// Filesystem locations for a build.
#[derive(Debug, Clone)]
pub struct BuildPaths {
    pub posts_dir: PathBuf,
    pub templates_dir: PathBuf,
    pub output_dir: PathBuf,
    pub temp_dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct PostOutcome {
    pub post: Post,
    pub status: RenderStatus,
}

/// What a build did, for reporting.
#[derive(Debug)]
pub struct GenerateReport {
    /// Published posts in index order.
    pub posts: Vec<PostOutcome>,
    pub index_pages: Vec<PathBuf>,
    pub stats: RenderStats,
}

pub fn generate(
    manifest: &Manifest,
    paths: &BuildPaths,
    converter: &dyn NotebookConverter,
    force: bool,
) -> Result<GenerateReport, GenerateError> {
    let templates = Templates::load(&paths.templates_dir, &manifest.config.posts)?;

    let layout = OutputLayout::new(&paths.output_dir, &paths.temp_dir);
    layout.create_dirs()?;

    let ctx = RenderContext {
        posts_root: &paths.posts_dir,
        layout: &layout,
        templates: &templates,
        config: &manifest.config.posts,
        converter,
        force,
    };

    let mut stats = RenderStats::default();
    let mut outcomes = Vec::with_capacity(manifest.posts.len());
    for post in &manifest.posts {
        let status = render::render_post(&ctx, post).map_err(|source| GenerateError::Render {
            folder: post.folder.clone(),
            source,
        })?;
        match status {
            RenderStatus::Rendered => stats.render(),
            RenderStatus::Skipped => stats.skip(),
        }
        outcomes.push(PostOutcome {
            post: post.clone(),
            status,
        });
    }

    let index_pages = index::write_index(
        &manifest.posts,
        &templates,
        &manifest.config.index,
        &paths.output_dir,
    )?;

    Ok(GenerateReport {
        posts: outcomes,
        index_pages,
        stats,
    })
}
