//! Static file server for a built site.
//!
//! Maps a handful of URL shapes onto files under the site root:
//!
//! | Path                       | File                                |
//! |----------------------------|-------------------------------------|
//! | `/`                        | `index.html`                        |
//! | `/blog`                    | `blog-post-pages/blog0.html`        |
//! | `/blog/<n>` (digits)       | `blog-post-pages/blog<n>.html`      |
//! | `/blog/<short_name>`       | `blog-posts/<short_name>.html`      |
//! | `/img/<short_name>/<file>` | `img/<short_name>/<file>`           |
//! | `/notebooks/<file>`        | `notebooks/<file>`                  |
//!
//! Anything else, a missing file, or a path segment that is empty, contains
//! `..`, or starts with `.` is a 404. Other read failures are a 500.
//!
//! The only shared state is the read-only site root.

use crate::index::{self, PAGES_DIR};
use actix_web::http::header;
use actix_web::{App, HttpResponse, HttpServer, web};
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;

const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// Root directory of the built site.
#[derive(Debug, Clone)]
pub struct SiteRoot(pub PathBuf);

/// Register every route. Callers provide `web::Data<SiteRoot>`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/").route(web::get().to(home)))
        .service(web::resource("/blog").route(web::get().to(blog_index)))
        .service(web::resource("/blog/{name}").route(web::get().to(blog_entry)))
        .service(web::resource("/img/{short_name}/{file:.*}").route(web::get().to(image)))
        .service(web::resource("/notebooks/{file}").route(web::get().to(notebook)));
}

/// Serve `root` until the process is stopped.
pub async fn run(root: PathBuf, address: &str, port: u16) -> io::Result<()> {
    let data = web::Data::new(SiteRoot(root));
    HttpServer::new(move || App::new().app_data(data.clone()).configure(configure))
        .bind((address, port))?
        .run()
        .await
}

async fn home(root: web::Data<SiteRoot>) -> HttpResponse {
    serve_file(&root.0.join("index.html")).await
}

async fn blog_index(root: web::Data<SiteRoot>) -> HttpResponse {
    serve_file(&root.0.join(PAGES_DIR).join(index::page_filename(0))).await
}

async fn blog_entry(root: web::Data<SiteRoot>, name: web::Path<String>) -> HttpResponse {
    let name = name.into_inner();
    match resolve_blog_path(&root.0, &name) {
        Some(path) => serve_file(&path).await,
        None => HttpResponse::NotFound().finish(),
    }
}

async fn image(root: web::Data<SiteRoot>, path: web::Path<(String, String)>) -> HttpResponse {
    let (short_name, file) = path.into_inner();
    if !is_safe_segment(&short_name) || !file.split('/').all(is_safe_segment) {
        return HttpResponse::NotFound().finish();
    }
    serve_file(&root.0.join("img").join(short_name).join(file)).await
}

async fn notebook(root: web::Data<SiteRoot>, file: web::Path<String>) -> HttpResponse {
    let file = file.into_inner();
    if !is_safe_segment(&file) {
        return HttpResponse::NotFound().finish();
    }
    serve_file(&root.0.join("notebooks").join(file)).await
}

/// File behind `/blog/<name>`: an index page for all-digit names, otherwise
/// a post. `None` when the name is unsafe or the page number overflows.
fn resolve_blog_path(root: &Path, name: &str) -> Option<PathBuf> {
    if !is_safe_segment(name) {
        return None;
    }
    if name.chars().all(|c| c.is_ascii_digit()) {
        let number: usize = name.parse().ok()?;
        return Some(root.join(PAGES_DIR).join(index::page_filename(number)));
    }
    Some(root.join("blog-posts").join(format!("{}.html", name)))
}

fn is_safe_segment(segment: &str) -> bool {
    !segment.is_empty()
        && !segment.contains("..")
        && !segment.starts_with('.')
        && !segment.contains(['/', '\\'])
}

fn content_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("html") => HTML_CONTENT_TYPE,
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("ipynb") => "application/x-ipynb+json",
        _ => "application/octet-stream",
    }
}

async fn serve_file(path: &Path) -> HttpResponse {
    match fs::read(path).await {
        Ok(body) => HttpResponse::Ok()
            .append_header((header::CONTENT_TYPE, content_type(path)))
            .body(body),
        Err(e) if e.kind() == io::ErrorKind::NotFound => HttpResponse::NotFound().finish(),
        Err(e) => {
            eprintln!("Failed to read {}: {}", path.display(), e);
            HttpResponse::InternalServerError().finish()
        }
    }
}
