//! Content export loading.
//!
//! Stage 1 of the build pipeline. Reads a CMS export directory into a typed
//! [`Site`] model that the render and generate stages consume.
//!
//! ## Directory Structure
//!
//! ```text
//! content/                         # Export root
//! ├── config.toml                  # Site configuration (optional)
//! ├── pages/
//! │   ├── home.json                # {_type:"page", slug, title, sections:[…]}
//! │   ├── coaching.json
//! │   └── contact.json
//! └── posts/
//!     ├── first-post.json          # {_type:"post", slug, title, date, body}
//!     └── ...
//! ```
//!
//! Documents keep their `sections` arrays as raw JSON here. Turning a
//! section into markup is the renderer's job, where a malformed section
//! skips just that section. Problems that poison the whole site are caught
//! at this stage instead and fail the load.
//!
//! ## Validation
//!
//! The loader enforces these rules:
//! - Every document file must parse as JSON with the expected `_type`
//! - Slugs must be lowercase `[a-z0-9-]` and unique within pages / posts
//! - Exactly one page must carry the configured home slug
//! - A page may contain at most one `sectionBlog`
//! - Post dates must be `YYYY-MM-DD`
//!
//! When a document has no `slug` field, the file stem is used.

use crate::config::{self, SiteConfig, is_valid_slug};
use crate::section::{self, ImageRef, SectionKind};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Expected a \"{expected}\" document in {path}, found \"{found}\"")]
    WrongDocType {
        expected: &'static str,
        found: String,
        path: PathBuf,
    },
    #[error("Invalid slug \"{slug}\" in {path}")]
    InvalidSlug { slug: String, path: PathBuf },
    #[error("Duplicate slug \"{slug}\" in {path}")]
    DuplicateSlug { slug: String, path: PathBuf },
    #[error("No page has the home slug \"{0}\" (set site.home_slug to change it)")]
    MissingHomePage(String),
    #[error("Page \"{0}\" has more than one blog section")]
    MultipleBlogSections(String),
    #[error("Invalid date \"{date}\" in post \"{slug}\" (expected YYYY-MM-DD)")]
    BadDate { date: String, slug: String },
}

/// The loaded site: config plus every page and post document.
#[derive(Debug)]
pub struct Site {
    pub pages: Vec<PageDoc>,
    pub posts: Vec<PostDoc>,
    pub config: SiteConfig,
}

impl Site {
    /// Pages that appear in the site navigation, in nav order.
    pub fn nav_pages(&self) -> Vec<&PageDoc> {
        let mut pages: Vec<&PageDoc> = self
            .pages
            .iter()
            .filter(|p| p.nav_label.is_some())
            .collect();
        pages.sort_by_key(|p| (p.nav_order.unwrap_or(u32::MAX), p.slug.clone()));
        pages
    }

    /// The page rendered at the site root.
    pub fn home_page(&self) -> Option<&PageDoc> {
        self.pages
            .iter()
            .find(|p| p.slug == self.config.site.home_slug)
    }
}

/// A page document with its sections still in raw JSON form.
#[derive(Debug, Clone)]
pub struct PageDoc {
    pub title: String,
    pub slug: String,
    /// Meta description. Empty means none.
    pub description: String,
    /// Label in the site nav; `None` keeps the page out of the nav.
    pub nav_label: Option<String>,
    /// Sort key within the nav; unordered pages go last.
    pub nav_order: Option<u32>,
    pub sections: Vec<Value>,
}

impl PageDoc {
    /// Whether this page hosts the paginated blog listing.
    pub fn has_blog_section(&self) -> bool {
        self.sections
            .iter()
            .any(|s| section::detect(s) == Some(SectionKind::Blog))
    }
}

/// A blog post document.
#[derive(Debug, Clone)]
pub struct PostDoc {
    pub title: String,
    pub slug: String,
    /// Publication date, `YYYY-MM-DD`. Validated at load, so lexicographic
    /// order is chronological order.
    pub date: String,
    /// Listing excerpt. Empty means derive one from the body.
    pub excerpt: String,
    /// Post body, markdown.
    pub body: String,
    pub cover: Option<ImageRef>,
    pub tags: Vec<String>,
}

#[derive(Deserialize)]
struct PageWire {
    #[serde(rename = "_type", default)]
    doc_type: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    slug: Option<String>,
    #[serde(default)]
    description: String,
    #[serde(default)]
    nav_label: Option<String>,
    #[serde(default)]
    nav_order: Option<u32>,
    #[serde(default)]
    sections: Vec<Value>,
}

#[derive(Deserialize)]
struct PostWire {
    #[serde(rename = "_type", default)]
    doc_type: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    slug: Option<String>,
    #[serde(default)]
    date: String,
    #[serde(default)]
    excerpt: String,
    #[serde(default)]
    body: String,
    #[serde(default)]
    cover: Option<ImageRef>,
    #[serde(default)]
    tags: Vec<String>,
}

/// Load a content export directory into a [`Site`].
///
/// Posts come back newest first (date descending, slug as tie-breaker);
/// pages are sorted by slug.
pub fn load_site(root: &Path) -> Result<Site, ContentError> {
    let config = config::load_config(root)?;

    let pages = load_pages(&root.join("pages"))?;
    let posts = load_posts(&root.join("posts"))?;

    if !pages.iter().any(|p| p.slug == config.site.home_slug) {
        return Err(ContentError::MissingHomePage(
            config.site.home_slug.clone(),
        ));
    }

    Ok(Site {
        pages,
        posts,
        config,
    })
}

fn load_pages(dir: &Path) -> Result<Vec<PageDoc>, ContentError> {
    let mut pages = Vec::new();
    let mut seen = BTreeSet::new();

    for path in json_files(dir) {
        let wire: PageWire = read_document(&path)?;
        expect_doc_type("page", &wire.doc_type, &path)?;

        let slug = resolve_slug(wire.slug, &path)?;
        if !seen.insert(slug.clone()) {
            return Err(ContentError::DuplicateSlug { slug, path });
        }

        let page = PageDoc {
            title: wire.title,
            slug,
            description: wire.description,
            nav_label: wire.nav_label,
            nav_order: wire.nav_order,
            sections: wire.sections,
        };

        let blog_sections = page
            .sections
            .iter()
            .filter(|s| section::detect(s) == Some(SectionKind::Blog))
            .count();
        if blog_sections > 1 {
            return Err(ContentError::MultipleBlogSections(page.slug));
        }

        pages.push(page);
    }

    pages.sort_by(|a, b| a.slug.cmp(&b.slug));
    Ok(pages)
}

fn load_posts(dir: &Path) -> Result<Vec<PostDoc>, ContentError> {
    let mut posts = Vec::new();
    let mut seen = BTreeSet::new();

    for path in json_files(dir) {
        let wire: PostWire = read_document(&path)?;
        expect_doc_type("post", &wire.doc_type, &path)?;

        let slug = resolve_slug(wire.slug, &path)?;
        if !seen.insert(slug.clone()) {
            return Err(ContentError::DuplicateSlug { slug, path });
        }

        if !is_valid_date(&wire.date) {
            return Err(ContentError::BadDate {
                date: wire.date,
                slug,
            });
        }

        posts.push(PostDoc {
            title: wire.title,
            slug,
            date: wire.date,
            excerpt: wire.excerpt,
            body: wire.body,
            cover: wire.cover.filter(|c| !c.src.trim().is_empty()),
            tags: wire.tags,
        });
    }

    posts.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.slug.cmp(&b.slug)));
    Ok(posts)
}

/// All `.json` files under `dir`, deterministically ordered. A missing
/// directory is just an empty site half, not an error.
fn json_files(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path().to_path_buf())
        .filter(|p| {
            p.extension()
                .map(|e| e.eq_ignore_ascii_case("json"))
                .unwrap_or(false)
        })
        .collect()
}

fn read_document<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ContentError> {
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|source| ContentError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn expect_doc_type(expected: &'static str, found: &str, path: &Path) -> Result<(), ContentError> {
    if found == expected {
        Ok(())
    } else {
        Err(ContentError::WrongDocType {
            expected,
            found: found.to_string(),
            path: path.to_path_buf(),
        })
    }
}

fn resolve_slug(field: Option<String>, path: &Path) -> Result<String, ContentError> {
    let slug = field.unwrap_or_else(|| {
        path.file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default()
    });
    if is_valid_slug(&slug) {
        Ok(slug)
    } else {
        Err(ContentError::InvalidSlug {
            slug,
            path: path.to_path_buf(),
        })
    }
}

/// Check a `YYYY-MM-DD` date string. Only shape and ranges are verified;
/// sorting relies on the zero-padded layout, not on calendar math.
fn is_valid_date(date: &str) -> bool {
    let bytes = date.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return false;
    }
    let all_digits =
        |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
    if !all_digits(&date[0..4]) || !all_digits(&date[5..7]) || !all_digits(&date[8..10]) {
        return false;
    }
    let month: u32 = date[5..7].parse().unwrap_or(0);
    let day: u32 = date[8..10].parse().unwrap_or(0);
    (1..=12).contains(&month) && (1..=31).contains(&day)
}

/// Format a validated `YYYY-MM-DD` date for display: `January 15, 2025`.
///
/// A string that does not match the validated shape comes back unchanged.
pub fn format_date(date: &str) -> String {
    const MONTHS: [&str; 12] = [
        "January",
        "February",
        "March",
        "April",
        "May",
        "June",
        "July",
        "August",
        "September",
        "October",
        "November",
        "December",
    ];
    if !is_valid_date(date) {
        return date.to_string();
    }
    let month: usize = date[5..7].parse().unwrap_or(0);
    let day: u32 = date[8..10].parse().unwrap_or(0);
    format!("{} {}, {}", MONTHS[month - 1], day, &date[0..4])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn write_doc(dir: &Path, name: &str, doc: &Value) {
        fs::create_dir_all(dir).unwrap();
        fs::write(dir.join(name), serde_json::to_string_pretty(doc).unwrap()).unwrap();
    }

    fn minimal_site() -> TempDir {
        let tmp = TempDir::new().unwrap();
        write_doc(
            &tmp.path().join("pages"),
            "home.json",
            &json!({"_type": "page", "title": "Welcome", "slug": "home", "sections": []}),
        );
        tmp
    }

    #[test]
    fn loads_minimal_site() {
        let tmp = minimal_site();
        let site = load_site(tmp.path()).unwrap();
        assert_eq!(site.pages.len(), 1);
        assert!(site.posts.is_empty());
        assert_eq!(site.home_page().unwrap().title, "Welcome");
    }

    #[test]
    fn slug_defaults_to_file_stem() {
        let tmp = minimal_site();
        write_doc(
            &tmp.path().join("pages"),
            "coaching.json",
            &json!({"_type": "page", "title": "Coaching"}),
        );
        let site = load_site(tmp.path()).unwrap();
        assert!(site.pages.iter().any(|p| p.slug == "coaching"));
    }

    #[test]
    fn missing_home_page_is_error() {
        let tmp = TempDir::new().unwrap();
        write_doc(
            &tmp.path().join("pages"),
            "about.json",
            &json!({"_type": "page", "title": "About"}),
        );
        let result = load_site(tmp.path());
        assert!(matches!(result, Err(ContentError::MissingHomePage(_))));
    }

    #[test]
    fn home_slug_is_configurable() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            "[site]\nhome_slug = \"start\"\n",
        )
        .unwrap();
        write_doc(
            &tmp.path().join("pages"),
            "start.json",
            &json!({"_type": "page", "title": "Start"}),
        );
        let site = load_site(tmp.path()).unwrap();
        assert_eq!(site.home_page().unwrap().slug, "start");
    }

    #[test]
    fn malformed_json_is_error() {
        let tmp = minimal_site();
        let pages = tmp.path().join("pages");
        fs::write(pages.join("broken.json"), "{not json").unwrap();
        let result = load_site(tmp.path());
        assert!(matches!(result, Err(ContentError::Json { .. })));
    }

    #[test]
    fn wrong_doc_type_is_error() {
        let tmp = minimal_site();
        write_doc(
            &tmp.path().join("pages"),
            "stray.json",
            &json!({"_type": "post", "title": "Misplaced"}),
        );
        let result = load_site(tmp.path());
        assert!(matches!(
            result,
            Err(ContentError::WrongDocType { expected: "page", .. })
        ));
    }

    #[test]
    fn duplicate_page_slug_is_error() {
        let tmp = minimal_site();
        write_doc(
            &tmp.path().join("pages"),
            "also-home.json",
            &json!({"_type": "page", "slug": "home", "title": "Second home"}),
        );
        let result = load_site(tmp.path());
        assert!(matches!(result, Err(ContentError::DuplicateSlug { .. })));
    }

    #[test]
    fn invalid_slug_is_error() {
        let tmp = minimal_site();
        write_doc(
            &tmp.path().join("pages"),
            "bad.json",
            &json!({"_type": "page", "slug": "Bad Slug", "title": "Bad"}),
        );
        let result = load_site(tmp.path());
        assert!(matches!(result, Err(ContentError::InvalidSlug { .. })));
    }

    #[test]
    fn two_blog_sections_on_one_page_is_error() {
        let tmp = minimal_site();
        write_doc(
            &tmp.path().join("pages"),
            "news.json",
            &json!({"_type": "page", "title": "News", "sections": [
                {"_type": "sectionBlog"},
                {"_type": "sectionContent"},
                {"_type": "sectionBlog"},
            ]}),
        );
        let result = load_site(tmp.path());
        assert!(matches!(
            result,
            Err(ContentError::MultipleBlogSections(slug)) if slug == "news"
        ));
    }

    #[test]
    fn one_blog_section_is_fine() {
        let tmp = minimal_site();
        write_doc(
            &tmp.path().join("pages"),
            "news.json",
            &json!({"_type": "page", "title": "News", "sections": [
                {"_type": "sectionBlog"},
            ]}),
        );
        let site = load_site(tmp.path()).unwrap();
        let news = site.pages.iter().find(|p| p.slug == "news").unwrap();
        assert!(news.has_blog_section());
        assert!(!site.home_page().unwrap().has_blog_section());
    }

    // =========================================================================
    // Posts
    // =========================================================================

    fn post(slug: &str, date: &str) -> Value {
        json!({
            "_type": "post",
            "title": format!("Post {slug}"),
            "slug": slug,
            "date": date,
            "body": "Hello **world**.",
        })
    }

    #[test]
    fn posts_sorted_newest_first() {
        let tmp = minimal_site();
        let posts = tmp.path().join("posts");
        write_doc(&posts, "a.json", &post("older", "2025-01-05"));
        write_doc(&posts, "b.json", &post("newest", "2025-03-20"));
        write_doc(&posts, "c.json", &post("middle", "2025-02-11"));

        let site = load_site(tmp.path()).unwrap();
        let slugs: Vec<&str> = site.posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["newest", "middle", "older"]);
    }

    #[test]
    fn same_day_posts_tie_break_on_slug() {
        let tmp = minimal_site();
        let posts = tmp.path().join("posts");
        write_doc(&posts, "z.json", &post("zebra", "2025-02-01"));
        write_doc(&posts, "a.json", &post("aster", "2025-02-01"));

        let site = load_site(tmp.path()).unwrap();
        let slugs: Vec<&str> = site.posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["aster", "zebra"]);
    }

    #[test]
    fn bad_post_date_is_error() {
        let tmp = minimal_site();
        write_doc(
            &tmp.path().join("posts"),
            "p.json",
            &post("p", "2025-13-01"),
        );
        let result = load_site(tmp.path());
        assert!(matches!(result, Err(ContentError::BadDate { .. })));
    }

    #[test]
    fn duplicate_post_slug_is_error() {
        let tmp = minimal_site();
        let posts = tmp.path().join("posts");
        write_doc(&posts, "one.json", &post("same", "2025-01-01"));
        write_doc(&posts, "two.json", &post("same", "2025-01-02"));
        let result = load_site(tmp.path());
        assert!(matches!(result, Err(ContentError::DuplicateSlug { .. })));
    }

    #[test]
    fn post_cover_without_src_is_dropped() {
        let tmp = minimal_site();
        let mut doc = post("covered", "2025-01-01");
        doc["cover"] = json!({"alt": "no source"});
        write_doc(&tmp.path().join("posts"), "covered.json", &doc);

        let site = load_site(tmp.path()).unwrap();
        assert!(site.posts[0].cover.is_none());
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    #[test]
    fn nav_pages_filtered_and_ordered() {
        let tmp = minimal_site();
        let pages = tmp.path().join("pages");
        write_doc(
            &pages,
            "contact.json",
            &json!({"_type": "page", "title": "Contact",
                    "nav_label": "Contact", "nav_order": 30}),
        );
        write_doc(
            &pages,
            "coaching.json",
            &json!({"_type": "page", "title": "Coaching",
                    "nav_label": "Coaching", "nav_order": 10}),
        );
        write_doc(
            &pages,
            "hidden.json",
            &json!({"_type": "page", "title": "Hidden"}),
        );
        write_doc(
            &pages,
            "unordered.json",
            &json!({"_type": "page", "title": "Extras", "nav_label": "Extras"}),
        );

        let site = load_site(tmp.path()).unwrap();
        let labels: Vec<&str> = site
            .nav_pages()
            .iter()
            .filter_map(|p| p.nav_label.as_deref())
            .collect();
        // Ordered pages first, unordered last.
        assert_eq!(labels, vec!["Coaching", "Contact", "Extras"]);
    }

    // =========================================================================
    // Dates
    // =========================================================================

    #[test]
    fn date_shape_validation() {
        assert!(is_valid_date("2025-01-15"));
        assert!(is_valid_date("1999-12-31"));
        assert!(!is_valid_date("2025-1-15"));
        assert!(!is_valid_date("2025/01/15"));
        assert!(!is_valid_date("2025-00-10"));
        assert!(!is_valid_date("2025-13-10"));
        assert!(!is_valid_date("2025-06-00"));
        assert!(!is_valid_date("2025-06-32"));
        assert!(!is_valid_date("someday"));
        assert!(!is_valid_date(""));
    }

    #[test]
    fn format_date_for_display() {
        assert_eq!(format_date("2025-01-15"), "January 15, 2025");
        assert_eq!(format_date("1999-12-31"), "December 31, 1999");
        // Unvalidated input passes through untouched.
        assert_eq!(format_date("someday"), "someday");
    }
}
