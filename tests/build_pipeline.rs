//! End-to-end build: scan a posts directory, render with a fake converter,
//! and check the published site.

use nbblog::convert::{ConvertError, NotebookConverter, expected_output};
use nbblog::generate::{BuildPaths, generate};
use nbblog::render::RenderStatus;
use nbblog::scan::{NO_PUBLISH_MARKER, scan};
use std::cell::Cell;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

/// Writes a body naming the notebook, with one relative image reference.
struct FakeNbconvert {
    runs: Cell<usize>,
}

impl FakeNbconvert {
    fn new() -> Self {
        Self { runs: Cell::new(0) }
    }
}

impl NotebookConverter for FakeNbconvert {
    fn convert(&self, notebook: &Path) -> Result<PathBuf, ConvertError> {
        self.runs.set(self.runs.get() + 1);
        let stem = notebook.file_stem().unwrap().to_string_lossy();
        let out = expected_output(notebook);
        fs::write(
            &out,
            format!("<div class=\"cell\">{stem}</div><img src=\"img/plot.png\">"),
        )?;
        Ok(out)
    }
}

fn add_post(posts: &Path, folder: &str, slug: &str) -> PathBuf {
    let dir = posts.join(folder);
    fs::create_dir_all(dir.join("img")).unwrap();
    fs::write(dir.join(format!("{slug}.ipynb")), "{\"cells\": []}").unwrap();
    fs::write(dir.join("img/plot.png"), "png").unwrap();
    dir
}

fn site(tmp: &TempDir) -> BuildPaths {
    let root = tmp.path();
    let templates = root.join("templates");
    fs::create_dir_all(&templates).unwrap();
    fs::write(templates.join("post-top.html"), "<!-- post top -->\n").unwrap();
    fs::write(templates.join("post-bottom.html"), "<!-- post bottom -->\n").unwrap();
    fs::write(templates.join("list-top.html"), "<!-- list top -->\n").unwrap();
    fs::write(templates.join("list-bottom.html"), "<!-- list bottom -->\n").unwrap();
    fs::write(templates.join("comments.html"), "<div id=\"comments\"></div>").unwrap();

    let posts = root.join("posts");
    fs::create_dir_all(&posts).unwrap();
    fs::write(
        posts.join("config.toml"),
        "[posts]\ncomments = \"comments.html\"\n",
    )
    .unwrap();

    BuildPaths {
        posts_dir: posts,
        templates_dir: templates,
        output_dir: root.join("site"),
        temp_dir: root.join(".nbblog-temp"),
    }
}

#[test]
fn full_build_publishes_site() {
    let tmp = TempDir::new().unwrap();
    let paths = site(&tmp);
    add_post(&paths.posts_dir, "2020_3_14_pi_day", "pi_day");
    add_post(
        &paths.posts_dir,
        "2017_2_22_observing_random_variables",
        "observing_random_variables",
    );
    let draft = add_post(&paths.posts_dir, "2020_4_1_draft", "draft");
    fs::write(draft.join(NO_PUBLISH_MARKER), "").unwrap();

    let manifest = scan(&paths.posts_dir).unwrap();
    let converter = FakeNbconvert::new();
    let report = generate(&manifest, &paths, &converter, false).unwrap();

    assert_eq!(converter.runs.get(), 2);
    assert_eq!(report.stats.rendered, 2);

    let out = &paths.output_dir;
    let post = fs::read_to_string(out.join("blog-posts/pi_day.html")).unwrap();
    assert!(post.starts_with("<!-- post top -->"));
    assert!(post.ends_with("<!-- post bottom -->\n"));
    assert!(post.contains("Pi day"));
    assert!(post.contains("14 March 2020"));
    assert!(post.contains("<div class=\"cell\">pi_day</div>"));
    assert!(post.contains("src=\"/img/pi_day/plot.png\""));
    assert!(post.contains("<div id=\"comments\"></div>"));

    assert!(out.join("img/pi_day/plot.png").exists());
    assert!(out.join("notebooks/pi_day.ipynb").exists());
    assert!(!out.join("blog-posts/draft.html").exists());

    let index = fs::read_to_string(out.join("blog-post-pages/blog0.html")).unwrap();
    assert!(index.starts_with("<!-- list top -->"));
    let march = index.find("March 2020").unwrap();
    let feb = index.find("February 2017").unwrap();
    assert!(march < feb);
    assert!(index.contains("href=\"/blog/pi_day\""));
    assert!(index.contains("href=\"/blog/observing_random_variables\""));
    assert!(!index.contains("draft"));
}

#[test]
fn rebuild_skips_unchanged_notebooks() {
    let tmp = TempDir::new().unwrap();
    let paths = site(&tmp);
    let old = add_post(&paths.posts_dir, "2017_2_22_old", "old");
    add_post(&paths.posts_dir, "2020_3_14_edited", "edited");

    let manifest = scan(&paths.posts_dir).unwrap();
    generate(&manifest, &paths, &FakeNbconvert::new(), false).unwrap();

    // "old" untouched since its render; "edited" modified after it
    let hour_ago = SystemTime::now() - Duration::from_secs(3600);
    fs::File::options()
        .write(true)
        .open(old.join("old.ipynb"))
        .unwrap()
        .set_modified(hour_ago)
        .unwrap();
    fs::File::options()
        .write(true)
        .open(paths.output_dir.join("blog-posts/edited.html"))
        .unwrap()
        .set_modified(hour_ago)
        .unwrap();

    let converter = FakeNbconvert::new();
    let report = generate(&manifest, &paths, &converter, false).unwrap();

    assert_eq!(converter.runs.get(), 1);
    let status = |slug: &str| {
        report
            .posts
            .iter()
            .find(|o| o.post.slug == slug)
            .unwrap()
            .status
    };
    assert_eq!(status("old"), RenderStatus::Skipped);
    assert_eq!(status("edited"), RenderStatus::Rendered);

    let index = fs::read_to_string(&report.index_pages[0]).unwrap();
    assert!(index.contains("/blog/old"));
    assert!(index.contains("/blog/edited"));
}

#[test]
fn empty_blog_gets_placeholder_index() {
    let tmp = TempDir::new().unwrap();
    let paths = site(&tmp);

    let manifest = scan(&paths.posts_dir).unwrap();
    let report = generate(&manifest, &paths, &FakeNbconvert::new(), false).unwrap();

    let index = fs::read_to_string(&report.index_pages[0]).unwrap();
    assert!(index.contains("No posts yet."));
}

#[test]
fn publishing_older_post_rebuilds_shifted_short_names() {
    let tmp = TempDir::new().unwrap();
    let paths = site(&tmp);
    let draft = add_post(&paths.posts_dir, "2019_1_1_notes", "notes");
    fs::write(draft.join(NO_PUBLISH_MARKER), "").unwrap();
    add_post(&paths.posts_dir, "2020_1_1_notes", "notes");

    let first = scan(&paths.posts_dir).unwrap();
    generate(&first, &paths, &FakeNbconvert::new(), false).unwrap();

    // The draft's notebook predates every rendered page
    fs::File::options()
        .write(true)
        .open(draft.join("notes.ipynb"))
        .unwrap()
        .set_modified(SystemTime::now() - Duration::from_secs(3600))
        .unwrap();
    fs::remove_file(draft.join(NO_PUBLISH_MARKER)).unwrap();

    let second = scan(&paths.posts_dir).unwrap();
    let report = generate(&second, &paths, &FakeNbconvert::new(), false).unwrap();

    let status = |folder: &str| {
        report
            .posts
            .iter()
            .find(|o| o.post.folder == folder)
            .unwrap()
            .status
    };
    assert_eq!(status("2019_1_1_notes"), RenderStatus::Rendered);
    assert_eq!(status("2020_1_1_notes"), RenderStatus::Rendered);

    let bare = fs::read_to_string(paths.output_dir.join("blog-posts/notes.html")).unwrap();
    assert!(bare.contains("datetime=\"2019-01-01\""));
    assert!(!bare.contains("datetime=\"2020-01-01\""));
    let suffixed = fs::read_to_string(paths.output_dir.join("blog-posts/notes_2.html")).unwrap();
    assert!(suffixed.contains("datetime=\"2020-01-01\""));
}
