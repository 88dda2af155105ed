//! Blog index pages.
//!
//! Stage 3 of the build pipeline. Lists every published post, newest first,
//! under month headings:
//!
//! ```text
//! March 2020
//!   Pi day                         14 March 2020
//! February 2017
//!   Observing random variables     22 February 2017
//! ```
//!
//! With `index.posts_per_page = 0` (the default) everything goes on one
//! page, `blog-post-pages/blog0.html`. Otherwise the list is split into
//! `blog0.html`, `blog1.html`, ... served at `/blog`, `/blog/1`, ... Each page
//! starts its own headings and links to its neighbours.

use crate::config::IndexConfig;
use crate::naming;
use crate::scan;
use crate::templates::Templates;
use crate::types::Post;
use chrono::Datelike;
use maud::{Markup, html};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Directory under the output root holding the index pages.
pub const PAGES_DIR: &str = "blog-post-pages";

/// `blog3.html`
pub fn page_filename(number: usize) -> String {
    format!("blog{}.html", number)
}

/// Public URL of index page `number`. Page 0 is the blog root.
pub fn page_url(number: usize) -> String {
    if number == 0 {
        "/blog".to_string()
    } else {
        format!("/blog/{}", number)
    }
}

/// Split `posts` into pages. Always yields at least one (possibly empty) page.
pub fn paginate(posts: &[Post], per_page: usize) -> Vec<&[Post]> {
    if per_page == 0 || posts.is_empty() {
        return vec![posts];
    }
    posts.chunks(per_page).collect()
}

/// Post list with a heading before the first post of each month.
fn post_list(posts: &[Post], empty_message: &str) -> Markup {
    html! {
        @if posts.is_empty() {
            p.empty { (empty_message) }
        } @else {
            @for (i, post) in posts.iter().enumerate() {
                @if i == 0 || !same_month(&posts[i - 1], post) {
                    h2.month { (naming::month_heading(post.date)) }
                }
                div.post-entry {
                    a href=(post.url()) { (post.title) }
                    " "
                    time datetime=(post.date.format("%Y-%m-%d").to_string()) {
                        (post.display_date())
                    }
                }
            }
        }
    }
}

fn same_month(a: &Post, b: &Post) -> bool {
    a.date.year() == b.date.year() && a.date.month() == b.date.month()
}

/// Newer/older links. Omitted entirely on a single-page index.
fn pager(number: usize, total: usize) -> Markup {
    html! {
        @if total > 1 {
            nav.pager {
                @if number > 0 {
                    a.newer href=(page_url(number - 1)) { "Newer posts" }
                }
                @if number + 1 < total {
                    a.older href=(page_url(number + 1)) { "Older posts" }
                }
            }
        }
    }
}

/// Full HTML of index page `number` out of `total`.
pub fn render_page(
    templates: &Templates,
    posts: &[Post],
    number: usize,
    total: usize,
    empty_message: &str,
) -> String {
    let body = html! {
        section.post-list {
            (post_list(posts, empty_message))
        }
        (pager(number, total))
    };
    format!(
        "{}{}{}",
        templates.list_top,
        body.into_string(),
        templates.list_bottom
    )
}

/// Write every index page under `<output_dir>/blog-post-pages/` and return
/// their paths in page order.
///
/// Posts are re-sorted newest first, so callers may pass them in any order.
pub fn write_index(
    posts: &[Post],
    templates: &Templates,
    config: &IndexConfig,
    output_dir: &Path,
) -> io::Result<Vec<PathBuf>> {
    let mut sorted = posts.to_vec();
    scan::sort_newest_first(&mut sorted);

    let dir = output_dir.join(PAGES_DIR);
    fs::create_dir_all(&dir)?;

    let pages = paginate(&sorted, config.posts_per_page);
    let total = pages.len();
    let mut written = Vec::with_capacity(total);
    for (number, page) in pages.into_iter().enumerate() {
        let path = dir.join(page_filename(number));
        fs::write(
            &path,
            render_page(templates, page, number, total, &config.empty_message),
        )?;
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{make_post, sample_templates};
    use tempfile::TempDir;

    fn single_page(posts: &[Post]) -> String {
        render_page(&sample_templates(), posts, 0, 1, "No posts yet.")
    }

    #[test]
    fn headings_only_at_month_transitions() {
        let posts = vec![
            make_post(2020, 3, 20, "later"),
            make_post(2020, 3, 14, "pi_day"),
            make_post(2020, 2, 1, "february"),
            make_post(2019, 2, 1, "last_year"),
        ];
        let html = single_page(&posts);

        assert_eq!(html.matches("<h2 class=\"month\">").count(), 3);
        let march = html.find("March 2020").unwrap();
        let later = html.find("/blog/later").unwrap();
        let pi = html.find("/blog/pi_day").unwrap();
        let feb = html.find("February 2020").unwrap();
        let feb_post = html.find("/blog/february").unwrap();
        let last_year = html.find("February 2019").unwrap();
        assert!(march < later && later < pi && pi < feb && feb < feb_post);
        assert!(feb_post < last_year);
    }

    #[test]
    fn same_month_different_year_gets_heading() {
        let posts = vec![make_post(2020, 3, 1, "a"), make_post(2019, 3, 1, "b")];
        let html = single_page(&posts);
        assert!(html.contains("March 2020"));
        assert!(html.contains("March 2019"));
    }

    #[test]
    fn entry_links_and_date() {
        let html = single_page(&[make_post(2020, 3, 14, "pi_day")]);
        assert!(html.contains("<a href=\"/blog/pi_day\">Pi day</a>"));
        assert!(html.contains("<time datetime=\"2020-03-14\">14 March 2020</time>"));
    }

    #[test]
    fn empty_index_shows_placeholder() {
        let html = single_page(&[]);
        assert!(html.contains("No posts yet."));
        assert!(!html.contains("<h2"));
    }

    #[test]
    fn page_wrapped_in_list_templates() {
        let html = single_page(&[]);
        assert!(html.starts_with("<html><body class=\"list\">\n"));
        assert!(html.ends_with("</body></html>\n"));
    }

    #[test]
    fn single_page_has_no_pager() {
        let html = single_page(&[make_post(2020, 3, 14, "pi_day")]);
        assert!(!html.contains("pager"));
    }

    #[test]
    fn write_index_sorts_newest_first() {
        let tmp = TempDir::new().unwrap();
        let posts = vec![
            make_post(2017, 2, 22, "old"),
            make_post(2020, 3, 14, "b_same_day"),
            make_post(2020, 3, 14, "a_same_day"),
        ];

        let written =
            write_index(&posts, &sample_templates(), &IndexConfig::default(), tmp.path()).unwrap();
        assert_eq!(written, vec![tmp.path().join("blog-post-pages/blog0.html")]);

        let html = fs::read_to_string(&written[0]).unwrap();
        let a = html.find("/blog/a_same_day").unwrap();
        let b = html.find("/blog/b_same_day").unwrap();
        let old = html.find("/blog/old").unwrap();
        assert!(a < b && b < old);
    }

    #[test]
    fn custom_empty_message() {
        let tmp = TempDir::new().unwrap();
        let config = IndexConfig {
            empty_message: "Nothing here".into(),
            ..Default::default()
        };
        let written = write_index(&[], &sample_templates(), &config, tmp.path()).unwrap();
        let html = fs::read_to_string(&written[0]).unwrap();
        assert!(html.contains("Nothing here"));
    }

    // =========================================================================
    // Pagination
    // =========================================================================

    #[test]
    fn paginate_splits_into_chunks() {
        let posts: Vec<Post> = (1..=5).map(|d| make_post(2020, 1, d, "p")).collect();
        let pages = paginate(&posts, 2);
        assert_eq!(pages.iter().map(|p| p.len()).collect::<Vec<_>>(), vec![2, 2, 1]);
    }

    #[test]
    fn paginate_zero_is_single_page() {
        let posts: Vec<Post> = (1..=5).map(|d| make_post(2020, 1, d, "p")).collect();
        assert_eq!(paginate(&posts, 0).len(), 1);
        assert_eq!(paginate(&[], 3).len(), 1);
    }

    #[test]
    fn paged_index_links_neighbours() {
        let tmp = TempDir::new().unwrap();
        let posts = vec![
            make_post(2020, 3, 3, "c"),
            make_post(2020, 3, 2, "b"),
            make_post(2020, 3, 1, "a"),
        ];
        let config = IndexConfig {
            posts_per_page: 1,
            ..Default::default()
        };

        let written = write_index(&posts, &sample_templates(), &config, tmp.path()).unwrap();
        assert_eq!(written.len(), 3);

        let first = fs::read_to_string(&written[0]).unwrap();
        assert!(first.contains("/blog/c"));
        assert!(!first.contains("Newer posts"));
        assert!(first.contains("<a class=\"older\" href=\"/blog/1\">"));

        let middle = fs::read_to_string(&written[1]).unwrap();
        assert!(middle.contains("<a class=\"newer\" href=\"/blog\">"));
        assert!(middle.contains("<a class=\"older\" href=\"/blog/2\">"));
        // headings restart on every page
        assert!(middle.contains("March 2020"));

        let last = fs::read_to_string(&written[2]).unwrap();
        assert!(last.contains("/blog/a"));
        assert!(!last.contains("Older posts"));
    }

    #[test]
    fn page_urls() {
        assert_eq!(page_url(0), "/blog");
        assert_eq!(page_url(4), "/blog/4");
        assert_eq!(page_filename(4), "blog4.html");
    }
}
