//! # nbblog
//!
//! A static blog generator for Jupyter notebooks, plus a small server for the
//! generated site. The posts directory is the data source: each folder holds
//! one notebook, and the folder name carries the publication date and slug.
//!
//! # Architecture: Three-Stage Pipeline
//!
//! ```text
//! 1. Scan      posts/    →  manifest.json   (folders → dated, named posts)
//! 2. Render    manifest  →  site/blog-posts (nbconvert + templates, per post)
//! 3. Index     manifest  →  site/blog-post-pages
//! ```
//!
//! The scan manifest is written to the temp directory as JSON so it can be
//! inspected. Rendering is incremental: a post whose HTML is newer than its
//! notebook is left alone. The index is always rebuilt.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Stage 1: lists post folders, parses names, assigns short names |
//! | [`render`] | Stage 2: converts one notebook and assembles its page |
//! | [`index`] | Stage 3: month-grouped list pages |
//! | [`generate`] | Runs stages 2 and 3 over a manifest |
//! | [`cache`] | Timestamp staleness check and render counters |
//! | [`convert`] | Converter trait and the `jupyter nbconvert` backend |
//! | [`templates`] | Loads the HTML fragments wrapped around generated markup |
//! | [`config`] | `config.toml` loading, merging over defaults, and validation |
//! | [`naming`] | `YYYY_M_D_slug` folder-name parser and display formatting |
//! | [`types`] | The [`types::Post`] record shared by every stage |
//! | [`serve`] | actix-web server mapping blog URLs onto the built site |
//! | [`output`] | CLI output formatting for each command |
//!
//! # Design Decisions
//!
//! ## Notebook Conversion Is External
//!
//! Notebooks are rendered by `jupyter nbconvert`, run as a child process per
//! post. The [`convert::NotebookConverter`] trait keeps the rest of the
//! pipeline independent of it, so tests run without a Python install.
//!
//! ## Templates Are Concatenated, Not Interpreted
//!
//! Site chrome lives in four plain HTML fragments that are read verbatim and
//! placed around the generated markup. Generated markup itself is built with
//! [Maud](https://maud.lambda.xyz/), so titles and dates are escaped.
//!
//! ## Short Names
//!
//! Public URLs use a truncated slug. Collisions are resolved by suffix in
//! date order, so publishing a newer post never changes an existing URL.
//! Publishing an older post with the same prefix does shift the suffixes of
//! the posts after it; each rendered page carries its source folder so those
//! pages are rebuilt rather than served stale.

pub mod cache;
pub mod config;
pub mod convert;
pub mod generate;
pub mod index;
pub mod naming;
pub mod output;
pub mod render;
pub mod scan;
pub mod serve;
pub mod templates;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
