//! Site template fragments.
//!
//! Templates are plain HTML files read verbatim and concatenated around the
//! generated markup; there is no templating language.
//!
//! ```text
//! templates/
//! ├── post-top.html      # Opens the post document (head, site header)
//! ├── post-bottom.html   # Closes it
//! ├── list-top.html      # Opens the index page
//! ├── list-bottom.html   # Closes it
//! └── comments.html      # Optional, named by `posts.comments`
//! ```
//!
//! All fragments are loaded up front so a missing one fails the build before
//! anything is written.

use crate::config::PostsConfig;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const POST_TOP: &str = "post-top.html";
pub const POST_BOTTOM: &str = "post-bottom.html";
pub const LIST_TOP: &str = "list-top.html";
pub const LIST_BOTTOM: &str = "list-bottom.html";

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Template not found: {0}")]
    Missing(PathBuf),
    #[error("Failed to read template {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Templates {
    pub post_top: String,
    pub post_bottom: String,
    pub list_top: String,
    pub list_bottom: String,
    /// Comment-widget snippet appended after each post body.
    pub comments: Option<String>,
}

impl Templates {
    /// Load every fragment from `dir`. The comments snippet is read only when
    /// `posts.comments` names one, and is then required to exist.
    pub fn load(dir: &Path, posts: &PostsConfig) -> Result<Self, TemplateError> {
        Ok(Self {
            post_top: read_fragment(&dir.join(POST_TOP))?,
            post_bottom: read_fragment(&dir.join(POST_BOTTOM))?,
            list_top: read_fragment(&dir.join(LIST_TOP))?,
            list_bottom: read_fragment(&dir.join(LIST_BOTTOM))?,
            comments: posts
                .comments
                .as_ref()
                .map(|name| read_fragment(&dir.join(name)))
                .transpose()?,
        })
    }
}

fn read_fragment(path: &Path) -> Result<String, TemplateError> {
    fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            TemplateError::Missing(path.to_path_buf())
        } else {
            TemplateError::Read {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}
