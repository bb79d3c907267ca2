//! # Brochure
//!
//! A minimal static site generator for small marketing and coaching sites.
//! Your content is a folder of JSON documents — the export format of a
//! headless CMS — plus one `config.toml`: pages are built from typed
//! sections, posts become a paginated blog, and the output is plain HTML.
//!
//! # Architecture: Load, Render, Write
//!
//! Brochure processes a site in three steps, and the whole site exists in
//! memory before the first byte lands on disk:
//!
//! ```text
//! 1. Load     content/  →  Site         (JSON documents → typed pages and posts)
//! 2. Render   Site      →  documents    (sections → Maud markup, in memory)
//! 3. Write    documents →  dist/        (pages, listing pages, posts, static files)
//! ```
//!
//! This separation exists for three reasons:
//!
//! - **Checkability**: `brochure check` runs load and render and stops, so a
//!   content tree that checks clean is guaranteed to build.
//! - **Atomic failures**: broken content fails before any file is written —
//!   `dist/` is never left half updated.
//! - **Testability**: rendering is a pure function of the loaded site, so
//!   tests assert on markup without touching an output directory.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`content`] | Loads and validates the content tree: pages, posts, slugs, dates |
//! | [`section`] | The section registry — decodes raw CMS documents into typed section data |
//! | [`render`] | Renders sections, pages, and posts to HTML using Maud |
//! | [`richtext`] | Markdown handling: HTML conversion and excerpt derivation |
//! | [`pagination`] | The listing window algorithm and page path scheme |
//! | [`generate`] | Drives a full build: render everything, write the output tree |
//! | [`config`] | `config.toml` loading, merging over stock defaults, palette CSS generation |
//! | [`output`] | CLI output formatting — grouped `title → path` build reports |
//! | [`notice`] | Async notification center for watch mode: ordered notices, timed dismissal |
//! | [`watch`] | Watch mode — debounced rebuilds with terminal notices |
//!
//! # Design Decisions
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/), a compile-time
//! HTML macro system, rather than Handlebars or Tera. Malformed markup is a
//! compile error, template variables are ordinary Rust expressions, every
//! interpolation is escaped unless explicitly opted out, and there is no
//! template directory to ship or get out of sync with the binary.
//!
//! ## A Closed Section Registry That Skips What It Doesn't Know
//!
//! The renderer understands a fixed set of section types. Anything else in a
//! page — a section type added to the CMS but not yet to the generator, or a
//! section too malformed to decode — is skipped and reported, never fatal.
//! Editors keep publishing; the build report says exactly what was dropped
//! and why. Hard failures are reserved for structural problems the site
//! cannot render around, like a missing home page.
//!
//! ## Listing Pages Are Renditions of One Page
//!
//! A page containing a blog section expands into one output file per listing
//! page: rendition 1 at the page's own path, rendition `n` under
//! `page/<n>/`. The pagination window shown on each rendition is bounded at
//! seven tokens no matter how many pages exist, and a gap that would hide
//! exactly one page number shows the number instead — an ellipsis should
//! never cost more than it saves.
//!
//! ## Watch Mode Coalesces Bursts
//!
//! Editors save in bursts and tools write temp files. The watcher batches
//! filesystem events behind a quiet period, ignores editor droppings and its
//! own output directory, and holds a cooldown between rebuilds. Results
//! surface as tinted terminal notices through an async notice center whose
//! ordering and dismissal rules are tested independently of any terminal.
//!
//! # No JavaScript
//!
//! The generated site is plain HTML and a single stylesheet. There is no
//! client-side JavaScript at all — even the mobile navigation drawer is a
//! CSS checkbox toggle. The output can be dropped on any static file host
//! and will render identically for as long as browsers render HTML.

pub mod config;
pub mod content;
pub mod generate;
pub mod notice;
pub mod output;
pub mod pagination;
pub mod render;
pub mod richtext;
pub mod section;
pub mod watch;

#[cfg(test)]
pub(crate) mod test_helpers;
