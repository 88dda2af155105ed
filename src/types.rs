//! Shared types used across all pipeline stages.
//!
//! A [`Post`] is produced by the scan stage and consumed unchanged by the
//! render, index, and output stages.

use crate::naming;
use chrono::NaiveDate;
use serde::Serialize;

/// A published post discovered in the posts directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Post {
    /// Source folder name, e.g. `2020_3_14_pi_day`.
    pub folder: String,
    pub date: NaiveDate,
    /// Slug parsed from the folder name; also the notebook's file stem.
    pub slug: String,
    /// Display title derived from the slug.
    pub title: String,
    /// Truncated, uniquified slug used in public URLs and output file names.
    pub short_name: String,
}

impl Post {
    /// `14 March 2020`
    pub fn display_date(&self) -> String {
        naming::display_date(self.date)
    }

    /// Notebook file name inside the post folder.
    pub fn notebook_filename(&self) -> String {
        format!("{}.ipynb", self.slug)
    }

    /// Public URL of the rendered post.
    pub fn url(&self) -> String {
        format!("/blog/{}", self.short_name)
    }

    /// Output file name under `blog-posts/`.
    pub fn output_filename(&self) -> String {
        format!("{}.html", self.short_name)
    }
}
