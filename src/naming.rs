//! Centralized parsing for the `YYYY_M_D_slug` post folder convention.
//!
//! Every post lives in a folder whose name carries its publication date and
//! its slug, separated by underscores:
//!
//! - `2020_3_14_pi_day` → date 2020-03-14, slug `pi_day`
//! - `2017_02_22_observing_random_variables` → zero padding is accepted
//!
//! ## Display Titles
//!
//! Underscores in the slug become spaces and the first letter is upper-cased;
//! the rest of the slug keeps its case:
//! - `pi_day` → "Pi day"
//! - `observing_functions_of_random_variables_in_PyMC` →
//!   "Observing functions of random variables in PyMC"

use chrono::NaiveDate;

/// Result of parsing a post folder name like `2020_3_14_pi_day`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFolderName {
    pub date: NaiveDate,
    /// Everything after the day component, underscores preserved.
    pub slug: String,
}

/// Parse a post folder name. Returns `None` for anything that doesn't encode a
/// real calendar date followed by a slug usable as a URL path segment.
pub fn parse_folder_name(name: &str) -> Option<ParsedFolderName> {
    let mut parts = name.splitn(4, '_');
    let year = parse_component(parts.next()?)?;
    let month = parse_component(parts.next()?)?;
    let day = parse_component(parts.next()?)?;
    let slug = parts.next()?;
    if !is_servable_slug(slug) {
        return None;
    }
    let date = NaiveDate::from_ymd_opt(i32::try_from(year).ok()?, month, day)?;
    Some(ParsedFolderName {
        date,
        slug: slug.to_string(),
    })
}

/// The short name derived from a slug becomes `/blog/<short_name>` and
/// `/img/<short_name>/`; the server refuses segments like these.
fn is_servable_slug(slug: &str) -> bool {
    !slug.is_empty() && !slug.starts_with('.') && !slug.contains("..") && !slug.contains('\\')
}

/// Date components are plain ASCII digits; `u32::from_str` alone would also
/// accept a leading `+`.
fn parse_component(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Human-readable title for a slug: underscores → spaces, first letter
/// capitalized.
pub fn display_title(slug: &str) -> String {
    let spaced = slug.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `14 March 2020`
pub fn display_date(date: NaiveDate) -> String {
    date.format("%-d %B %Y").to_string()
}

/// `March 2020`, the heading used to group posts on the index.
pub fn month_heading(date: NaiveDate) -> String {
    date.format("%B %Y").to_string()
}
