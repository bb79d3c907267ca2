//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Configuration is
//! layered: stock defaults are overridden by the user file at the content
//! root.
//!
//! ## Config File Location
//!
//! Place `config.toml` at the root of the content export:
//!
//! ```text
//! content/
//! ├── config.toml              # Overrides stock defaults
//! ├── pages/
//! │   └── ...
//! └── posts/
//!     └── ...
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [site]
//! title = "My Site"         # Header and <title> text
//! tagline = ""              # Footer line, empty hides it
//! base_url = ""             # Origin for canonical URLs, empty = relative
//! language = "en"           # <html lang> attribute
//! home_slug = "home"        # Page served at the site root
//!
//! [colors.light]
//! background = "#faf8f5"
//! surface = "#f0ece4"       # Cards, form fields
//! text = "#27241d"
//! text_muted = "#6e6a60"    # Dates, captions, footer
//! border = "#e3ddd1"
//! link = "#34655f"
//! accent = "#4a8f7b"        # Buttons, current pagination page
//!
//! [colors.dark]
//! background = "#161513"
//! surface = "#211f1c"
//! text = "#ece9e2"
//! text_muted = "#a39e92"
//! border = "#3a372f"
//! link = "#8fc1b5"
//! accent = "#6faf9b"
//!
//! [strings]                 # Every fixed UI string, override to localize
//! read_more = "Read more"
//! previous_page = "Previous"
//! next_page = "Next"
//! posted_on = "Posted on"
//! submit = "Send message"
//! required_mark = "*"
//! empty_blog = "No posts yet."
//! skip_link = "Skip to content"
//! footer_note = ""
//!
//! [blog]
//! prefix = "blog"           # Post pages live at /<prefix>/<slug>/
//! posts_per_page = 6        # Minimum 1
//! max_visible_pages = 5     # Pagination window size, minimum 3
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse — override just the values you want:
//!
//! ```toml
//! # Only override the accent color
//! [colors.light]
//! accent = "#b3577e"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Site identity: title, base URL, home page.
    pub site: SiteInfo,
    /// Color schemes for light and dark modes.
    pub colors: ColorConfig,
    /// Fixed UI strings; overriding them localizes the site.
    pub strings: StringsConfig,
    /// Blog listing and permalink settings.
    pub blog: BlogConfig,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_valid_slug(&self.site.home_slug) {
            return Err(ConfigError::Validation(
                "site.home_slug must be a lowercase slug (a-z, 0-9, -)".into(),
            ));
        }
        if self.site.language.trim().is_empty() {
            return Err(ConfigError::Validation(
                "site.language must not be empty".into(),
            ));
        }
        if !self.site.base_url.is_empty()
            && !self.site.base_url.starts_with("http://")
            && !self.site.base_url.starts_with("https://")
        {
            return Err(ConfigError::Validation(
                "site.base_url must start with http:// or https://".into(),
            ));
        }
        if !is_valid_slug(&self.blog.prefix) {
            return Err(ConfigError::Validation(
                "blog.prefix must be a lowercase slug (a-z, 0-9, -)".into(),
            ));
        }
        if self.blog.posts_per_page == 0 {
            return Err(ConfigError::Validation(
                "blog.posts_per_page must be at least 1".into(),
            ));
        }
        if self.blog.max_visible_pages < 3 {
            return Err(ConfigError::Validation(
                "blog.max_visible_pages must be at least 3".into(),
            ));
        }
        Ok(())
    }
}

/// A URL slug: lowercase ASCII letters, digits and hyphens, not empty,
/// no leading or trailing hyphen.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

/// Site identity settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteInfo {
    /// Shown in the site header and every page `<title>`.
    pub title: String,
    /// Short line in the footer. Empty hides it.
    pub tagline: String,
    /// Absolute origin for canonical URLs (e.g. `https://example.com`).
    /// Empty keeps all links relative.
    pub base_url: String,
    /// Value of the `<html lang>` attribute.
    pub language: String,
    /// Slug of the page served at the site root.
    pub home_slug: String,
}

impl Default for SiteInfo {
    fn default() -> Self {
        Self {
            title: "My Site".to_string(),
            tagline: String::new(),
            base_url: String::new(),
            language: "en".to_string(),
            home_slug: "home".to_string(),
        }
    }
}

/// Blog listing and permalink settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BlogConfig {
    /// URL prefix for post pages: `/<prefix>/<slug>/`.
    pub prefix: String,
    /// Posts per listing page.
    pub posts_per_page: usize,
    /// Page buttons shown in the pagination control before collapsing to
    /// ellipses. Odd values give balanced windows.
    pub max_visible_pages: u32,
}

impl Default for BlogConfig {
    fn default() -> Self {
        Self {
            prefix: "blog".to_string(),
            posts_per_page: 6,
            max_visible_pages: 5,
        }
    }
}

/// Every fixed string in the rendered site.
///
/// Defaults are English; any other locale is a config overlay away.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StringsConfig {
    /// Link from a listing excerpt to the full post.
    pub read_more: String,
    /// Pagination: previous-page control.
    pub previous_page: String,
    /// Pagination: next-page control.
    pub next_page: String,
    /// Prefix before a post date.
    pub posted_on: String,
    /// Contact form submit button.
    pub submit: String,
    /// Marker appended to required form field labels.
    pub required_mark: String,
    /// Shown when the blog listing has no posts.
    pub empty_blog: String,
    /// Accessibility link that jumps past the header.
    pub skip_link: String,
    /// Extra line in the footer. Empty hides it.
    pub footer_note: String,
}

impl Default for StringsConfig {
    fn default() -> Self {
        Self {
            read_more: "Read more".to_string(),
            previous_page: "Previous".to_string(),
            next_page: "Next".to_string(),
            posted_on: "Posted on".to_string(),
            submit: "Send message".to_string(),
            required_mark: "*".to_string(),
            empty_blog: "No posts yet.".to_string(),
            skip_link: "Skip to content".to_string(),
            footer_note: String::new(),
        }
    }
}

/// Color configuration for light and dark modes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    /// Light mode color scheme.
    pub light: ColorScheme,
    /// Dark mode color scheme.
    pub dark: ColorScheme,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            light: ColorScheme::default_light(),
            dark: ColorScheme::default_dark(),
        }
    }
}

/// Individual color scheme (light or dark).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorScheme {
    /// Page background color.
    pub background: String,
    /// Raised-surface color (cards, form fields, notice chips).
    pub surface: String,
    /// Primary text color.
    pub text: String,
    /// Muted/secondary text color (dates, captions, footer).
    pub text_muted: String,
    /// Border color.
    pub border: String,
    /// Link color.
    pub link: String,
    /// Accent color (buttons, current pagination page).
    pub accent: String,
}

impl ColorScheme {
    pub fn default_light() -> Self {
        Self {
            background: "#faf8f5".to_string(),
            surface: "#f0ece4".to_string(),
            text: "#27241d".to_string(),
            text_muted: "#6e6a60".to_string(),
            border: "#e3ddd1".to_string(),
            link: "#34655f".to_string(),
            accent: "#4a8f7b".to_string(),
        }
    }

    pub fn default_dark() -> Self {
        Self {
            background: "#161513".to_string(),
            surface: "#211f1c".to_string(),
            text: "#ece9e2".to_string(),
            text_muted: "#a39e92".to_string(),
            border: "#3a372f".to_string(),
            link: "#8fc1b5".to_string(),
            accent: "#6faf9b".to_string(),
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::default_light()
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Brochure Configuration
# ======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Place this file at the root of the content export:
#   content/config.toml
#
# Only the keys you want to override need to be present.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Site identity
# ---------------------------------------------------------------------------
[site]
# Shown in the site header and every page <title>.
title = "My Site"

# Short line in the footer. Empty hides it.
tagline = ""

# Absolute origin for canonical URLs, e.g. "https://example.com".
# Empty keeps all links relative.
base_url = ""

# Value of the <html lang> attribute.
language = "en"

# Slug of the page served at the site root (/index.html).
home_slug = "home"

# ---------------------------------------------------------------------------
# Colors - Light mode (prefers-color-scheme: light)
# ---------------------------------------------------------------------------
[colors.light]
background = "#faf8f5"
surface = "#f0ece4"       # Cards, form fields
text = "#27241d"
text_muted = "#6e6a60"    # Dates, captions, footer
border = "#e3ddd1"
link = "#34655f"
accent = "#4a8f7b"        # Buttons, current pagination page

# ---------------------------------------------------------------------------
# Colors - Dark mode (prefers-color-scheme: dark)
# ---------------------------------------------------------------------------
[colors.dark]
background = "#161513"
surface = "#211f1c"
text = "#ece9e2"
text_muted = "#a39e92"
border = "#3a372f"
link = "#8fc1b5"
accent = "#6faf9b"

# ---------------------------------------------------------------------------
# UI strings
# ---------------------------------------------------------------------------
# Every fixed string in the rendered site. Override to localize.
[strings]
read_more = "Read more"
previous_page = "Previous"
next_page = "Next"
posted_on = "Posted on"
submit = "Send message"
required_mark = "*"
empty_blog = "No posts yet."
skip_link = "Skip to content"
footer_note = ""

# ---------------------------------------------------------------------------
# Blog
# ---------------------------------------------------------------------------
[blog]
# Post pages live at /<prefix>/<slug>/.
prefix = "blog"

# Posts per listing page (minimum 1).
posts_per_page = 6

# Page buttons shown in the pagination control before runs collapse to
# ellipses (minimum 3; odd values give balanced windows).
max_visible_pages = 5
"##
}

/// Generate CSS custom properties from color config.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    format!(
        r#":root {{
    --color-bg: {light_bg};
    --color-surface: {light_surface};
    --color-text: {light_text};
    --color-text-muted: {light_text_muted};
    --color-border: {light_border};
    --color-link: {light_link};
    --color-accent: {light_accent};
}}

@media (prefers-color-scheme: dark) {{
    :root {{
        --color-bg: {dark_bg};
        --color-surface: {dark_surface};
        --color-text: {dark_text};
        --color-text-muted: {dark_text_muted};
        --color-border: {dark_border};
        --color-link: {dark_link};
        --color-accent: {dark_accent};
    }}
}}"#,
        light_bg = colors.light.background,
        light_surface = colors.light.surface,
        light_text = colors.light.text,
        light_text_muted = colors.light.text_muted,
        light_border = colors.light.border,
        light_link = colors.light.link,
        light_accent = colors.light.accent,
        dark_bg = colors.dark.background,
        dark_surface = colors.dark.surface,
        dark_text = colors.dark.text,
        dark_text_muted = colors.dark.text_muted,
        dark_border = colors.dark.border,
        dark_link = colors.dark.link,
        dark_accent = colors.dark.accent,
    )
}
