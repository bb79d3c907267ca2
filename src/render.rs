//! HTML rendering: sections, pagination control, page chrome.
//!
//! The render stage turns typed content into markup. Its dispatch point is
//! [`render_section`]: one raw CMS document in, one [`SectionOutcome`] out.
//! A document that cannot be rendered never takes the page down with it:
//!
//! - missing or unknown `_type` → [`SectionOutcome::Skipped`], the defined
//!   no-render outcome for vocabulary the site does not know,
//! - transform failure → `Skipped` carrying the error text, surfaced later
//!   by the `check` command and watch-mode notices,
//! - success → section markup, concatenated with its siblings.
//!
//! Everything a component needs arrives through [`RenderContext`]: config
//! (UI strings, colors, blog settings), the post list, and the pagination
//! state of the listing rendition being rendered. Components never reach
//! for globals.
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! Templates are type-safe Rust code with automatic XSS escaping. The FAQ
//! section renders as native `<details>`/`<summary>` so the published site
//! needs no JavaScript.

use crate::config::SiteConfig;
use crate::content::{self, PageDoc, PostDoc, Site};
use crate::pagination::{self, PageToken};
use crate::section::{
    self, BlogSection, Card, CardsSection, ContentSection, FaqSection, FormField, FormSection,
    HeaderSection, Section, SectionKind,
};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use pulldown_cmark::{Event, Parser, TagEnd, html as md_html};
use serde_json::Value;

/// Display width requested for section illustrations.
const SECTION_IMAGE_WIDTH: u32 = 800;
/// Display width requested for post cover images.
const COVER_IMAGE_WIDTH: u32 = 1200;
/// Target length for excerpts derived from post bodies.
const EXCERPT_CHARS: usize = 160;

/// Everything the section components need, passed explicitly.
#[derive(Debug, Clone)]
pub struct RenderContext<'a> {
    pub config: &'a SiteConfig,
    /// All posts, newest first.
    pub posts: &'a [PostDoc],
    /// Nav pages in display order.
    pub nav: Vec<&'a PageDoc>,
    /// Pagination state of the rendition being rendered.
    pub listing: ListingState,
}

impl<'a> RenderContext<'a> {
    pub fn for_site(site: &'a Site) -> Self {
        Self {
            config: &site.config,
            posts: &site.posts,
            nav: site.nav_pages(),
            listing: ListingState::default(),
        }
    }

    /// Same context, pointed at listing page `page` of the page hosted at
    /// `base_path`.
    pub fn with_listing(mut self, page: u32, base_path: impl Into<String>) -> Self {
        self.listing = ListingState {
            page,
            base_path: base_path.into(),
        };
        self
    }
}

/// Where a rendition sits in its listing sequence. For pages without a
/// blog section this stays at the default and is never consulted.
#[derive(Debug, Clone)]
pub struct ListingState {
    /// 1-based listing page shown by this rendition.
    pub page: u32,
    /// Absolute path of the hosting page, with trailing slash.
    pub base_path: String,
}

impl Default for ListingState {
    fn default() -> Self {
        Self {
            page: 1,
            base_path: "/".to_string(),
        }
    }
}

/// What became of one raw section document.
pub enum SectionOutcome {
    Rendered(Markup),
    Skipped(SkipNote),
}

/// A section that produced no markup, and why.
#[derive(Debug, Clone)]
pub struct SkipNote {
    /// The document's `_type`, when it had one.
    pub tag: Option<String>,
    /// Human-readable reason, shown by reports and watch notices.
    pub reason: String,
}

impl SkipNote {
    /// One line for reports: `sectionFAQ: malformed …`.
    pub fn describe(&self) -> String {
        match &self.tag {
            Some(tag) => format!("{}: {}", tag, self.reason),
            None => self.reason.clone(),
        }
    }
}

/// Render one raw section document.
///
/// This is the only path from CMS JSON to markup, and it cannot fail: bad
/// input degrades to a [`SkipNote`] so sibling sections still render.
pub fn render_section(raw: &Value, ctx: &RenderContext) -> SectionOutcome {
    let Some(tag) = raw.get("_type").and_then(Value::as_str) else {
        return SectionOutcome::Skipped(SkipNote {
            tag: None,
            reason: "document has no _type".to_string(),
        });
    };
    let Some(kind) = SectionKind::from_tag(tag) else {
        return SectionOutcome::Skipped(SkipNote {
            tag: Some(tag.to_string()),
            reason: "unknown section type".to_string(),
        });
    };
    match section::transform(kind, raw) {
        Ok(sec) => SectionOutcome::Rendered(render_transformed(&sec, ctx)),
        Err(err) => SectionOutcome::Skipped(SkipNote {
            tag: Some(tag.to_string()),
            reason: err.to_string(),
        }),
    }
}

fn render_transformed(sec: &Section, ctx: &RenderContext) -> Markup {
    match sec {
        Section::Header(s) => header_section(s),
        Section::Content(s) => content_section(s),
        Section::Cards(s) => cards_section(s),
        Section::Faq(s) => faq_section(s),
        Section::Form(s) => form_section(s, ctx),
        Section::Blog(s) => blog_section(s, ctx),
    }
}

// ============================================================================
// Section Components
// ============================================================================

fn section_class(base: &str, tint: Option<&str>) -> String {
    match tint {
        Some(t) => format!("{base} tint-{t}"),
        None => base.to_string(),
    }
}

fn header_section(s: &HeaderSection) -> Markup {
    html! {
        section class=(section_class("section-header", s.background.as_deref())) {
            div.section-inner {
                h1 { (s.title) }
                @if !s.subtitle.is_empty() {
                    p.subtitle { (s.subtitle) }
                }
                @if !s.ctas.is_empty() {
                    div.cta-row {
                        @for cta in &s.ctas {
                            a.button href=(cta.href) { (cta.label) }
                        }
                    }
                }
            }
        }
    }
}

fn content_section(s: &ContentSection) -> Markup {
    html! {
        section class=(section_class("section-content", s.background.as_deref())) {
            div.section-inner {
                @if !s.title.is_empty() {
                    h2 { (s.title) }
                }
                @if let Some(image) = &s.image {
                    figure.section-figure {
                        img src=(section::image_url(image, Some(SECTION_IMAGE_WIDTH)))
                            alt=(image.alt) loading="lazy";
                    }
                }
                div.prose {
                    (crate::richtext::render_blocks(&s.body))
                }
            }
        }
    }
}

fn cards_section(s: &CardsSection) -> Markup {
    html! {
        section class=(section_class("section-cards", s.background.as_deref())) {
            div.section-inner {
                @if !s.title.is_empty() {
                    h2 { (s.title) }
                }
                div.card-grid {
                    @for card in &s.cards {
                        (card_item(card))
                    }
                }
            }
        }
    }
}

fn card_item(card: &Card) -> Markup {
    html! {
        article.card {
            @if !card.icon.is_empty() {
                span.card-icon aria-hidden="true" { (card.icon) }
            }
            h3 { (card.title) }
            div.prose {
                (crate::richtext::render_blocks(&card.body))
            }
            @if let Some(link) = &card.link {
                a.card-link href=(link.href) { (link.label) }
            }
        }
    }
}

fn faq_section(s: &FaqSection) -> Markup {
    html! {
        section.section-faq {
            div.section-inner {
                @if !s.title.is_empty() {
                    h2 { (s.title) }
                }
                div.faq-list {
                    @for item in &s.items {
                        details.faq-item id=[non_empty(&item.key)] {
                            summary { (item.question) }
                            div.faq-answer {
                                (crate::richtext::render_blocks(&item.answer))
                            }
                        }
                    }
                }
            }
        }
    }
}

fn form_section(s: &FormSection, ctx: &RenderContext) -> Markup {
    let strings = &ctx.config.strings;
    html! {
        section.section-form {
            div.section-inner {
                @if !s.title.is_empty() {
                    h2 { (s.title) }
                }
                @if !s.intro.is_empty() {
                    div.prose {
                        (crate::richtext::render_blocks(&s.intro))
                    }
                }
                // Without an endpoint the form is inert markup: no action.
                form.contact-form method="post" action=[s.endpoint.as_deref()] {
                    @for field in &s.fields {
                        (form_field(field, &strings.required_mark))
                    }
                    button.button type="submit" { (strings.submit) }
                }
            }
        }
    }
}

fn form_field(field: &FormField, required_mark: &str) -> Markup {
    let input_type = match field.kind.as_str() {
        "email" => "email",
        "tel" => "tel",
        // Unrecognized kinds degrade to a plain text input.
        _ => "text",
    };
    html! {
        div.form-field {
            label for=(field.name) {
                (field.label)
                @if field.required {
                    span.required-mark aria-hidden="true" { (required_mark) }
                }
            }
            @if field.kind == "textarea" {
                textarea id=(field.name) name=(field.name) rows="5"
                    placeholder=[non_empty(&field.placeholder)]
                    required[field.required] {}
            } @else {
                input type=(input_type) id=(field.name) name=(field.name)
                    placeholder=[non_empty(&field.placeholder)]
                    required[field.required];
            }
        }
    }
}

fn blog_section(s: &BlogSection, ctx: &RenderContext) -> Markup {
    let per_page = ctx.config.blog.posts_per_page;
    let total_pages = pagination::page_count(ctx.posts.len(), per_page);
    let range = pagination::page_slice(ctx.posts.len(), per_page, ctx.listing.page);
    let shown = &ctx.posts[range];

    html! {
        section.section-blog {
            div.section-inner {
                @if !s.title.is_empty() {
                    h2 { (s.title) }
                }
                @if shown.is_empty() {
                    p.blog-empty { (ctx.config.strings.empty_blog) }
                } @else {
                    div.post-list {
                        @for post in shown {
                            (post_preview(post, ctx))
                        }
                    }
                }
                (pagination_control(total_pages, ctx.listing.page, ctx))
            }
        }
    }
}

fn post_preview(post: &PostDoc, ctx: &RenderContext) -> Markup {
    let href = post_href(&ctx.config.blog.prefix, &post.slug);
    html! {
        article.post-preview {
            h3 { a href=(href) { (post.title) } }
            p.post-meta {
                (ctx.config.strings.posted_on) " " (content::format_date(&post.date))
            }
            p.post-excerpt { (listing_excerpt(post)) }
            p { a.read-more href=(href) { (ctx.config.strings.read_more) } }
        }
    }
}

/// Canonical URL path of a post page.
pub fn post_href(prefix: &str, slug: &str) -> String {
    format!("/{prefix}/{slug}/")
}

// ============================================================================
// Pagination Control
// ============================================================================

/// Render the pagination control for a listing rendition.
///
/// With one page (or none) there is no control at all. Otherwise the
/// window tokens become links, the current page a marked non-link, and
/// the Previous/Next controls render disabled at the boundaries so no
/// navigation target past either end exists.
pub fn pagination_control(total_pages: u32, current_page: u32, ctx: &RenderContext) -> Markup {
    let tokens = pagination::page_window(
        total_pages,
        current_page,
        ctx.config.blog.max_visible_pages,
    );
    if tokens.is_empty() {
        return html! {};
    }
    let strings = &ctx.config.strings;
    let base = &ctx.listing.base_path;

    html! {
        nav.pagination aria-label="Pagination" {
            @if current_page > 1 {
                a.page-prev rel="prev"
                    href=(pagination::page_href(base, current_page - 1)) {
                    (strings.previous_page)
                }
            } @else {
                span.page-prev.disabled aria-disabled="true" { (strings.previous_page) }
            }
            ul.page-list {
                @for token in &tokens {
                    li {
                        @match token {
                            PageToken::Page(n) => {
                                @if *n == current_page {
                                    span.page-current aria-current="page" { (n) }
                                } @else {
                                    a.page-link href=(pagination::page_href(base, *n)) { (n) }
                                }
                            }
                            PageToken::Ellipsis => {
                                span.page-gap { "…" }
                            }
                        }
                    }
                }
            }
            @if current_page < total_pages {
                a.page-next rel="next"
                    href=(pagination::page_href(base, current_page + 1)) {
                    (strings.next_page)
                }
            } @else {
                span.page-next.disabled aria-disabled="true" { (strings.next_page) }
            }
        }
    }
}

// ============================================================================
// Page Chrome
// ============================================================================

/// Renders the base HTML document structure
pub fn base_document(
    title: &str,
    lang: &str,
    description: &str,
    canonical: Option<&str>,
    css: &str,
    content: Markup,
) -> Markup {
    html! {
        (DOCTYPE)
        html lang=(lang) {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                @if !description.is_empty() {
                    meta name="description" content=(description);
                }
                @if let Some(href) = canonical {
                    link rel="canonical" href=(href);
                }
                style { (css) }
            }
            body {
                (content)
            }
        }
    }
}

/// Renders the site header with skip link, title and navigation
pub fn site_header(config: &SiteConfig, nav: Markup) -> Markup {
    html! {
        a.skip-link href="#main" { (config.strings.skip_link) }
        header.site-header {
            a.site-title href="/" { (config.site.title) }
            nav.site-nav { (nav) }
        }
    }
}

/// Renders the navigation menu (hamburger style, slides from right)
pub fn render_nav(pages: &[&PageDoc], current_slug: &str, home_slug: &str) -> Markup {
    html! {
        input.nav-toggle type="checkbox" id="nav-toggle";
        label.nav-hamburger for="nav-toggle" {
            span.hamburger-line {}
            span.hamburger-line {}
            span.hamburger-line {}
        }
        div.nav-panel {
            label.nav-close for="nav-toggle" { "×" }
            ul {
                @for page in pages {
                    @let is_current = page.slug == current_slug;
                    li class=[is_current.then_some("current")] {
                        a href=(nav_href(&page.slug, home_slug)) {
                            (page.nav_label.as_deref().unwrap_or(&page.title))
                        }
                    }
                }
            }
        }
    }
}

/// Nav target for a page: the home page collapses to the site root.
pub fn nav_href(slug: &str, home_slug: &str) -> String {
    if slug == home_slug {
        "/".to_string()
    } else {
        format!("/{slug}/")
    }
}

pub fn site_footer(config: &SiteConfig) -> Markup {
    html! {
        footer.site-footer {
            p.footer-title { (config.site.title) }
            @if !config.site.tagline.is_empty() {
                p.footer-tagline { (config.site.tagline) }
            }
            @if !config.strings.footer_note.is_empty() {
                p.footer-note { (config.strings.footer_note) }
            }
        }
    }
}

// ============================================================================
// Page Renderers
// ============================================================================

/// Render a full page document.
///
/// Sections that could not render come back as skip notes next to the
/// markup; the page itself always renders.
pub fn render_page(
    page: &PageDoc,
    ctx: &RenderContext,
    css: &str,
) -> (Markup, Vec<SkipNote>) {
    let mut notes = Vec::new();
    let mut sections = Vec::new();
    for raw in &page.sections {
        match render_section(raw, ctx) {
            SectionOutcome::Rendered(markup) => sections.push(markup),
            SectionOutcome::Skipped(note) => notes.push(note),
        }
    }

    let nav = render_nav(&ctx.nav, &page.slug, &ctx.config.site.home_slug);
    let content = html! {
        (site_header(ctx.config, nav))
        main #main {
            @for markup in &sections {
                (markup)
            }
        }
        (site_footer(ctx.config))
    };

    let canonical = canonical_url(
        ctx.config,
        &pagination::page_href(&ctx.listing.base_path, ctx.listing.page),
    );
    let document = base_document(
        &page_title(&page.title, &ctx.config.site.title),
        &ctx.config.site.language,
        &page.description,
        canonical.as_deref(),
        css,
        content,
    );
    (document, notes)
}

/// Render a post page.
///
/// `listing_href` is the blog listing to link back to, when the site has
/// one.
pub fn render_post(
    post: &PostDoc,
    ctx: &RenderContext,
    listing_href: Option<&str>,
    css: &str,
) -> Markup {
    let config = ctx.config;
    let nav = render_nav(&ctx.nav, "", &config.site.home_slug);
    let content = html! {
        (site_header(config, nav))
        main #main {
            article.post {
                header.post-header {
                    h1 { (post.title) }
                    p.post-meta {
                        (config.strings.posted_on) " " (content::format_date(&post.date))
                    }
                }
                @if let Some(cover) = &post.cover {
                    figure.post-cover {
                        img src=(section::image_url(cover, Some(COVER_IMAGE_WIDTH)))
                            alt=(cover.alt);
                    }
                }
                div.prose {
                    (markdown_to_html(&post.body))
                }
                @if !post.tags.is_empty() {
                    ul.tag-list {
                        @for tag in &post.tags {
                            li.tag { (tag) }
                        }
                    }
                }
                @if let Some(href) = listing_href {
                    p.back-link {
                        a href=(href) { "← " (config.strings.previous_page) }
                    }
                }
            }
        }
        (site_footer(config))
    };

    let canonical = canonical_url(config, &post_href(&config.blog.prefix, &post.slug));
    base_document(
        &page_title(&post.title, &config.site.title),
        &config.site.language,
        non_empty(&post.excerpt).unwrap_or(""),
        canonical.as_deref(),
        css,
        content,
    )
}

/// Convert a markdown post body to HTML.
pub fn markdown_to_html(markdown: &str) -> Markup {
    let parser = Parser::new(markdown);
    let mut out = String::new();
    md_html::push_html(&mut out, parser);
    PreEscaped(out)
}

/// The excerpt shown for a post in the listing: the authored one when
/// present, otherwise the start of the body with formatting stripped.
pub fn listing_excerpt(post: &PostDoc) -> String {
    let authored = post.excerpt.trim();
    if !authored.is_empty() {
        return authored.to_string();
    }
    excerpt_from_markdown(&post.body, EXCERPT_CHARS)
}

fn excerpt_from_markdown(markdown: &str, limit: usize) -> String {
    let mut text = String::new();
    for event in Parser::new(markdown) {
        match event {
            Event::Text(t) | Event::Code(t) => text.push_str(&t),
            Event::SoftBreak | Event::HardBreak => text.push(' '),
            Event::End(TagEnd::Paragraph | TagEnd::Heading(_)) => text.push(' '),
            _ => {}
        }
        if text.chars().count() > limit {
            break;
        }
    }
    let text = text.trim();
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let cut: String = text.chars().take(limit).collect();
    // Break at a word boundary when there is one.
    let cut = match cut.rsplit_once(' ') {
        Some((head, _)) => head,
        None => cut.as_str(),
    };
    format!("{}…", cut.trim_end())
}

fn page_title(page: &str, site: &str) -> String {
    if page.is_empty() {
        site.to_string()
    } else {
        format!("{page} · {site}")
    }
}

fn canonical_url(config: &SiteConfig, path: &str) -> Option<String> {
    if config.site.base_url.is_empty() {
        return None;
    }
    Some(format!(
        "{}{}",
        config.site.base_url.trim_end_matches('/'),
        path
    ))
}

fn non_empty(s: &str) -> Option<&str> {
    (!s.is_empty()).then_some(s)
}
