//! Site generation: render every page and post, write the output tree.
//!
//! The build stage of the pipeline. Takes the content tree loaded by
//! [`content::load_site`] and produces a complete static site:
//!
//! ```text
//! dist/
//! ├── index.html                   # home page
//! ├── contact/index.html           # other pages
//! ├── news/index.html              # blog host page, listing page 1
//! ├── news/page/2/index.html       # further listing pages
//! ├── blog/first-post/index.html   # post pages
//! └── robots.txt                   # static/ passthrough
//! ```
//!
//! Rendering and writing are separate steps: [`render_site`] produces the
//! whole site in memory, [`generate`] writes it, and [`check`] stops after
//! rendering. A content tree that passes `check` will build.
//!
//! A page hosting a blog section expands into one rendition per listing
//! page. Rendition 1 lands at the page's own path, rendition `n` at
//! `page/<n>/` beneath it, matching the hrefs the pagination control emits.

use crate::config::{self, SiteConfig};
use crate::content::{self, ContentError, PageDoc, Site};
use crate::pagination;
use crate::render::{self, RenderContext, SkipNote};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Base stylesheet, embedded at compile time.
const CSS_STATIC: &str = include_str!("../static/style.css");

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Content(#[from] ContentError),
}

/// What a build produced.
#[derive(Debug, Default)]
pub struct BuildReport {
    /// Page files in write order, listing renditions included.
    pub pages: Vec<WrittenFile>,
    /// Post files in write order.
    pub posts: Vec<WrittenFile>,
    /// Number of files copied from the `static/` passthrough directory.
    pub assets_copied: usize,
    /// Sections that rendered nothing.
    pub skips: Vec<PageSkip>,
}

impl BuildReport {
    pub fn total_written(&self) -> usize {
        self.pages.len() + self.posts.len()
    }
}

/// One written HTML file: what it is, and where it landed.
#[derive(Debug, Clone)]
pub struct WrittenFile {
    /// Document title, with the listing page number when beyond the first.
    pub label: String,
    /// Output-relative path.
    pub path: String,
}

/// The outcome of a dry-run build.
#[derive(Debug)]
pub struct CheckReport {
    pub pages: usize,
    pub posts: usize,
    /// HTML documents the site renders to, listing renditions included.
    pub documents: usize,
    pub skips: Vec<PageSkip>,
}

/// A skipped section, tied to the page that carried it.
#[derive(Debug, Clone)]
pub struct PageSkip {
    pub page_slug: String,
    pub note: SkipNote,
}

impl PageSkip {
    /// One line for reports: `legacy: sectionGallery: unknown section type`.
    pub fn describe(&self) -> String {
        format!("{}: {}", self.page_slug, self.note.describe())
    }
}

/// Build the site at `source` into `output`.
pub fn generate(source: &Path, output: &Path) -> Result<BuildReport, GenerateError> {
    let site = content::load_site(source)?;
    let rendered = render_site(&site);

    fs::create_dir_all(output)?;
    let mut report = BuildReport {
        skips: rendered.skips,
        ..BuildReport::default()
    };
    for doc in rendered.pages {
        report.pages.push(write_document(output, doc)?);
    }
    for doc in rendered.posts {
        report.posts.push(write_document(output, doc)?);
    }

    let static_dir = source.join("static");
    if static_dir.is_dir() {
        report.assets_copied = copy_dir_recursive(&static_dir, output)?;
    }

    Ok(report)
}

/// Validate and render the full site without writing anything.
pub fn check(source: &Path) -> Result<CheckReport, GenerateError> {
    let site = content::load_site(source)?;
    let rendered = render_site(&site);
    Ok(CheckReport {
        pages: site.pages.len(),
        posts: site.posts.len(),
        documents: rendered.pages.len() + rendered.posts.len(),
        skips: rendered.skips,
    })
}

/// The full stylesheet: generated color variables first, then the base
/// styles that consume them.
pub fn site_css(config: &SiteConfig) -> String {
    format!(
        "{}\n{}",
        config::generate_color_css(&config.colors),
        CSS_STATIC
    )
}

/// One rendered document, not yet written anywhere.
struct RenderedDoc {
    label: String,
    path: PathBuf,
    html: String,
}

/// A fully rendered site held in memory.
struct RenderedSite {
    pages: Vec<RenderedDoc>,
    posts: Vec<RenderedDoc>,
    skips: Vec<PageSkip>,
}

fn render_site(site: &Site) -> RenderedSite {
    let css = site_css(&site.config);
    let home_slug = &site.config.site.home_slug;
    let mut pages = Vec::new();
    let mut posts = Vec::new();
    let mut skips = Vec::new();

    // Post pages link back to the first listing page, by slug order, when
    // the site has one.
    let listing_base = site
        .pages
        .iter()
        .find(|p| p.has_blog_section())
        .map(|p| render::nav_href(&p.slug, home_slug));

    for page in &site.pages {
        let base_path = render::nav_href(&page.slug, home_slug);
        let renditions = if page.has_blog_section() {
            listing_page_count(site)
        } else {
            1
        };
        for number in 1..=renditions {
            let ctx = RenderContext::for_site(site).with_listing(number, base_path.clone());
            let (markup, notes) = render::render_page(page, &ctx, &css);
            // Every rendition reports the same skips; keep one copy.
            if number == 1 {
                skips.extend(notes.into_iter().map(|note| PageSkip {
                    page_slug: page.slug.clone(),
                    note,
                }));
            }
            pages.push(RenderedDoc {
                label: rendition_label(page, number),
                path: rendition_file(&base_path, number),
                html: markup.into_string(),
            });
        }
    }

    for post in &site.posts {
        let ctx = RenderContext::for_site(site);
        let markup = render::render_post(post, &ctx, listing_base.as_deref(), &css);
        posts.push(RenderedDoc {
            label: post.title.clone(),
            path: PathBuf::from(site.config.blog.prefix.as_str())
                .join(&post.slug)
                .join("index.html"),
            html: markup.into_string(),
        });
    }

    RenderedSite {
        pages,
        posts,
        skips,
    }
}

fn write_document(output: &Path, doc: RenderedDoc) -> Result<WrittenFile, GenerateError> {
    let target = output.join(&doc.path);
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&target, doc.html)?;
    Ok(WrittenFile {
        label: doc.label,
        path: doc.path.display().to_string(),
    })
}

/// A blog host page renders at least once even with zero posts.
fn listing_page_count(site: &Site) -> u32 {
    pagination::page_count(site.posts.len(), site.config.blog.posts_per_page).max(1)
}

fn rendition_label(page: &PageDoc, number: u32) -> String {
    let title = if page.title.is_empty() {
        page.slug.as_str()
    } else {
        page.title.as_str()
    };
    if number == 1 {
        title.to_string()
    } else {
        format!("{title} (page {number})")
    }
}

/// Output file for listing rendition `number` of the page at `base_path`.
fn rendition_file(base_path: &str, number: u32) -> PathBuf {
    let href = pagination::page_href(base_path, number);
    let mut path = PathBuf::new();
    for part in href.split('/').filter(|p| !p.is_empty()) {
        path.push(part);
    }
    path.join("index.html")
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<usize> {
    let mut copied = 0;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            fs::create_dir_all(&dst_path)?;
            copied += copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            fs::copy(&src_path, &dst_path)?;
            copied += 1;
        }
    }
    Ok(copied)
}
