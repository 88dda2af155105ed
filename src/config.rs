//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. The file lives in
//! the posts directory next to the post folders; the scanner ignores it
//! because it isn't a directory.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [converter]
//! program = "jupyter"
//! args = ["nbconvert", "--to", "html", "--template", "basic"]
//!
//! [posts]
//! short_name_length = 40          # Max characters of the slug kept in URLs
//! image_url_prefix = "/img"       # Public URL prefix for post images
//! notebook_url_prefix = "/notebooks"
//! # comments = "comments.html"    # Comment-widget snippet (templates dir)
//!
//! [index]
//! posts_per_page = 0              # 0 = everything on one page
//! empty_message = "No posts yet."
//!
//! [server]
//! address = "127.0.0.1"
//! port = 8080
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse. Override just the values you want:
//!
//! ```toml
//! [index]
//! posts_per_page = 20
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Name of the config file inside the posts directory.
pub const CONFIG_FILENAME: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
///
/// All fields have defaults. User config files need only specify the values
/// they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// External notebook-to-HTML command line.
    pub converter: ConverterConfig,
    /// Per-post rendering settings.
    pub posts: PostsConfig,
    /// Index page settings.
    pub index: IndexConfig,
    /// Static server defaults.
    pub server: ServerConfig,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.converter.program.trim().is_empty() {
            return Err(ConfigError::Validation(
                "converter.program must not be empty".into(),
            ));
        }
        if self.posts.short_name_length == 0 {
            return Err(ConfigError::Validation(
                "posts.short_name_length must be greater than 0".into(),
            ));
        }
        for (key, prefix) in [
            ("posts.image_url_prefix", &self.posts.image_url_prefix),
            ("posts.notebook_url_prefix", &self.posts.notebook_url_prefix),
        ] {
            if !prefix.starts_with('/') {
                return Err(ConfigError::Validation(format!(
                    "{key} must start with '/'"
                )));
            }
        }
        if let Some(comments) = &self.posts.comments
            && comments.trim().is_empty()
        {
            return Err(ConfigError::Validation(
                "posts.comments must name a file when set".into(),
            ));
        }
        Ok(())
    }
}

/// How to invoke the notebook converter. The notebook path is appended as
/// the final argument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConverterConfig {
    pub program: String,
    pub args: Vec<String>,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            program: "jupyter".to_string(),
            args: ["nbconvert", "--to", "html", "--template", "basic"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PostsConfig {
    /// Maximum number of slug characters kept in a short name.
    pub short_name_length: usize,
    /// URL prefix that relative `img/` references are rewritten to. The
    /// post's short name is inserted after it.
    pub image_url_prefix: String,
    /// URL prefix for the downloadable source notebooks.
    pub notebook_url_prefix: String,
    /// Comment-widget snippet, relative to the templates directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}

impl Default for PostsConfig {
    fn default() -> Self {
        Self {
            short_name_length: 40,
            image_url_prefix: "/img".to_string(),
            notebook_url_prefix: "/notebooks".to_string(),
            comments: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IndexConfig {
    /// Posts per index page; `0` puts every post on a single page.
    pub posts_per_page: usize,
    /// Shown instead of the list when there are no posts.
    pub empty_message: String,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            posts_per_page: 0,
            empty_message: "No posts yet.".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged on top of.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the directory has no config file.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILENAME);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Load config from `config.toml` in the given directory, merged over the
/// stock defaults and validated.
pub fn load_config(dir: &Path) -> Result<SiteConfig, ConfigError> {
    let merged = match load_raw_config(dir)? {
        Some(overlay) => merge_toml(stock_defaults_value(), overlay),
        None => stock_defaults_value(),
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `config.toml`. Used by `gen-config`.
pub fn stock_config_toml() -> &'static str {
    r##"# nbblog configuration
# ====================
# Place this file in the posts directory, next to the post folders.
# All settings are optional; values shown are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Notebook converter
# ---------------------------------------------------------------------------
[converter]
# The notebook path is appended after `args`. The command must leave
# <slug>.html next to the notebook.
program = "jupyter"
args = ["nbconvert", "--to", "html", "--template", "basic"]

# ---------------------------------------------------------------------------
# Posts
# ---------------------------------------------------------------------------
[posts]
# Slugs longer than this are truncated for URLs; collisions get _2, _3, ...
short_name_length = 40

# Relative img/ references are rewritten to <prefix>/<short_name>/...
image_url_prefix = "/img"

# Each post links to <prefix>/<short_name>.ipynb for download.
notebook_url_prefix = "/notebooks"

# HTML snippet (e.g. a comment widget) inserted after every post body,
# relative to the templates directory.
# comments = "comments.html"

# ---------------------------------------------------------------------------
# Index
# ---------------------------------------------------------------------------
[index]
# 0 keeps every post on a single page (/blog). Otherwise older pages are
# served at /blog/1, /blog/2, ...
posts_per_page = 0

empty_message = "No posts yet."

# ---------------------------------------------------------------------------
# Server (`nbblog serve`)
# ---------------------------------------------------------------------------
[server]
address = "127.0.0.1"
port = 8080
"##
}
