//! Per-post rendering.
//!
//! Stage 2 of the build pipeline. For each published post:
//!
//! 1. Skip it if the rendered HTML is newer than the notebook ([`cache`]).
//! 2. Run the notebook converter and move its output into the temporary
//!    workspace.
//! 3. Point relative `img/...` references at the public image directory.
//! 4. Concatenate `post-top`, the post header, the converted body, the
//!    optional comments snippet, and `post-bottom`.
//! 5. Publish the page, the post's images, and the source notebook.
//!
//! ## Output Structure
//!
//! ```text
//! site/
//! ├── blog-posts/
//! │   └── pi_day.html            # Rendered post
//! ├── img/
//! │   └── pi_day/                # Copy of posts/2020_3_14_pi_day/img/
//! │       └── circle.png
//! └── notebooks/
//!     └── pi_day.ipynb           # Source download
//! ```

use crate::cache;
use crate::config::PostsConfig;
use crate::convert::{ConvertError, NotebookConverter};
use crate::templates::Templates;
use crate::types::Post;
use maud::{Markup, PreEscaped, html};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Name of the per-post image folder, both in the source folder and in the
/// references nbconvert leaves in the HTML.
pub const IMAGE_DIR: &str = "img";

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Conversion failed: {0}")]
    Convert(#[from] ConvertError),
    #[error("Notebook not found: {0}")]
    NotebookNotFound(PathBuf),
    #[error("Failed to copy images from {path}: {source}")]
    CopyImages {
        path: PathBuf,
        source: walkdir::Error,
    },
}

/// Where rendered files go.
#[derive(Debug, Clone)]
pub struct OutputLayout {
    /// `site/blog-posts`
    pub posts_dir: PathBuf,
    /// `site/img`
    pub images_dir: PathBuf,
    /// `site/notebooks`
    pub notebooks_dir: PathBuf,
    /// Scratch space for converter output.
    pub workspace_dir: PathBuf,
}

impl OutputLayout {
    pub fn new(output_dir: &Path, temp_dir: &Path) -> Self {
        Self {
            posts_dir: output_dir.join("blog-posts"),
            images_dir: output_dir.join(IMAGE_DIR),
            notebooks_dir: output_dir.join("notebooks"),
            workspace_dir: temp_dir.join("converted"),
        }
    }

    pub fn create_dirs(&self) -> io::Result<()> {
        fs::create_dir_all(&self.posts_dir)?;
        fs::create_dir_all(&self.images_dir)?;
        fs::create_dir_all(&self.notebooks_dir)?;
        fs::create_dir_all(&self.workspace_dir)
    }

    pub fn post_path(&self, post: &Post) -> PathBuf {
        self.posts_dir.join(post.output_filename())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStatus {
    /// The notebook was converted and the page rewritten.
    Rendered,
    /// The existing page was newer than the notebook.
    Skipped,
}

/// Everything the renderer needs besides the post itself.
pub struct RenderContext<'a> {
    pub posts_root: &'a Path,
    pub layout: &'a OutputLayout,
    pub templates: &'a Templates,
    pub config: &'a PostsConfig,
    pub converter: &'a dyn NotebookConverter,
    /// Ignore timestamps and re-render unconditionally.
    pub force: bool,
}

pub fn render_post(ctx: &RenderContext<'_>, post: &Post) -> Result<RenderStatus, RenderError> {
    let folder = ctx.posts_root.join(&post.folder);
    let notebook = folder.join(post.notebook_filename());
    if !notebook.is_file() {
        return Err(RenderError::NotebookNotFound(notebook));
    }

    let output = ctx.layout.post_path(post);
    if !ctx.force
        && cache::is_up_to_date(&notebook, &output)?
        && rendered_from(&output, &post.folder)?
    {
        return Ok(RenderStatus::Skipped);
    }

    let produced = ctx.converter.convert(&notebook)?;
    let staged = ctx.layout.workspace_dir.join(post.output_filename());
    move_file(&produced, &staged)?;
    let body = fs::read_to_string(&staged)?;

    let body = rewrite_image_paths(&body, &image_url_base(ctx.config, post));
    let page = compose_post(ctx.templates, post, &notebook_url(ctx.config, post), &body);
    fs::write(&output, page)?;

    let images = ctx.layout.images_dir.join(&post.short_name);
    if images.is_dir() {
        // may hold another post's images after a short-name reassignment
        fs::remove_dir_all(&images)?;
    }
    copy_images(&folder.join(IMAGE_DIR), &images)?;
    fs::copy(
        &notebook,
        ctx.layout
            .notebooks_dir
            .join(format!("{}.ipynb", post.short_name)),
    )?;

    Ok(RenderStatus::Rendered)
}

/// `/img/pi_day`
pub fn image_url_base(config: &PostsConfig, post: &Post) -> String {
    format!(
        "{}/{}",
        config.image_url_prefix.trim_end_matches('/'),
        post.short_name
    )
}

/// `/notebooks/pi_day.ipynb`
pub fn notebook_url(config: &PostsConfig, post: &Post) -> String {
    format!(
        "{}/{}.ipynb",
        config.notebook_url_prefix.trim_end_matches('/'),
        post.short_name
    )
}

/// Rewrite quoted `src`/`href` values that start with `img/` or `./img/` so
/// they start with `{base}/` instead.
pub fn rewrite_image_paths(html: &str, base: &str) -> String {
    let mut out = html.to_string();
    for attr in ["src=", "href="] {
        for quote in ['"', '\''] {
            for relative in ["./img/", "img/"] {
                let from = format!("{attr}{quote}{relative}");
                let to = format!("{attr}{quote}{base}/");
                out = out.replace(&from, &to);
            }
        }
    }
    out
}

/// `data-folder="2020_3_14_pi_day"`, stamped on the article so a later build
/// can tell which folder produced a page.
fn source_marker(folder: &str) -> String {
    format!("data-folder=\"{}\"", html! { (folder) }.into_string())
}

/// Whether the page at `output` was rendered from `folder`. Short names move
/// to another post when an older post with the same prefix is published.
fn rendered_from(output: &Path, folder: &str) -> io::Result<bool> {
    Ok(fs::read_to_string(output)?.contains(&source_marker(folder)))
}

/// Title, date, and source download link shown above the post body.
fn post_header(post: &Post, notebook_href: &str) -> Markup {
    html! {
        header.post-header {
            h1.post-title { (post.title) }
            p.post-meta {
                time datetime=(post.date.format("%Y-%m-%d").to_string()) {
                    (post.display_date())
                }
                " · "
                a.post-source href=(notebook_href) { "Download notebook" }
            }
        }
    }
}

/// Concatenate the page: `post-top`, header, body, comments, `post-bottom`.
pub fn compose_post(templates: &Templates, post: &Post, notebook_href: &str, body: &str) -> String {
    let article = html! {
        article.post data-folder=(post.folder) {
            (post_header(post, notebook_href))
            div.post-body { (PreEscaped(body)) }
            @if let Some(comments) = &templates.comments {
                section.post-comments { (PreEscaped(comments)) }
            }
        }
    };

    let mut page = String::with_capacity(
        templates.post_top.len() + templates.post_bottom.len() + body.len() + 512,
    );
    page.push_str(&templates.post_top);
    page.push_str(&article.into_string());
    page.push_str(&templates.post_bottom);
    page
}

/// `rename`, falling back to copy + remove when the workspace is on another
/// filesystem.
fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    if fs::rename(from, to).is_ok() {
        return Ok(());
    }
    fs::copy(from, to)?;
    fs::remove_file(from)
}

/// Mirror `src` into `dst`. A post without an image folder is fine.
fn copy_images(src: &Path, dst: &Path) -> Result<(), RenderError> {
    if !src.is_dir() {
        return Ok(());
    }
    for entry in WalkDir::new(src) {
        let entry = entry.map_err(|source| RenderError::CopyImages {
            path: src.to_path_buf(),
            source,
        })?;
        // strip_prefix can't fail: every entry is under `src`
        let relative = entry.path().strip_prefix(src).unwrap_or(entry.path());
        let target = dst.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}
